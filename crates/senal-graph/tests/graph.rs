//! Integration tests for the graph substrate: memoisation, connection
//! integrity, removal cascades, cycle detection, and persistence.

use std::cell::Cell;
use std::rc::Rc;

use serde_json::json;
use senal_graph::{
    Graph, GraphError, NodeContext, NodeError, NodeRegistry, Operator, PortLayout, Ui, Value,
    ValueKind,
};

/// Deterministic ramp source with a configurable length.
struct Wave {
    samples: usize,
}

impl Operator for Wave {
    fn type_name(&self) -> &'static str {
        "Wave"
    }

    fn label(&self) -> &'static str {
        "Wave"
    }

    fn ports(&self) -> PortLayout {
        PortLayout::new().output("Out", ValueKind::Signal)
    }

    fn parameters(&self) -> serde_json::Value {
        json!({ "samples": self.samples })
    }

    fn compute(&self, _port: &str, _ctx: &NodeContext<'_>) -> Result<Value, NodeError> {
        Ok(Value::signal((0..self.samples).map(|i| i as f64).collect()))
    }
}

fn wave_factory(params: &serde_json::Value) -> Result<Box<dyn Operator>, GraphError> {
    let samples = params
        .get("samples")
        .and_then(serde_json::Value::as_u64)
        .unwrap_or(8) as usize;
    Ok(Box::new(Wave { samples }))
}

/// Source that counts how often its producer runs.
struct CountingSource {
    computes: Rc<Cell<usize>>,
}

impl Operator for CountingSource {
    fn type_name(&self) -> &'static str {
        "CountingSource"
    }

    fn label(&self) -> &'static str {
        "Counting source"
    }

    fn ports(&self) -> PortLayout {
        PortLayout::new().output("Out", ValueKind::Signal)
    }

    fn compute(&self, _port: &str, _ctx: &NodeContext<'_>) -> Result<Value, NodeError> {
        self.computes.set(self.computes.get() + 1);
        Ok(Value::signal(vec![1.0, 2.0, 3.0]))
    }
}

/// Scales its input; propagates structural pull errors with `?`.
struct Gain {
    gain: f64,
}

impl Operator for Gain {
    fn type_name(&self) -> &'static str {
        "Gain"
    }

    fn label(&self) -> &'static str {
        "Gain"
    }

    fn ports(&self) -> PortLayout {
        PortLayout::new()
            .input("In", Value::signal(Vec::new()))
            .output("Out", ValueKind::Signal)
    }

    fn parameters(&self) -> serde_json::Value {
        json!({ "gain": self.gain })
    }

    fn compute(&self, _port: &str, ctx: &NodeContext<'_>) -> Result<Value, NodeError> {
        let input = ctx.input("In")?;
        let samples = input.as_signal().unwrap_or(&[]);
        Ok(Value::signal(samples.iter().map(|x| x * self.gain).collect()))
    }
}

fn gain_factory(params: &serde_json::Value) -> Result<Box<dyn Operator>, GraphError> {
    let gain = params
        .get("gain")
        .and_then(serde_json::Value::as_f64)
        .unwrap_or(1.0);
    Ok(Box::new(Gain { gain }))
}

/// Pure sink with a single signal input.
struct Probe;

impl Operator for Probe {
    fn type_name(&self) -> &'static str {
        "Probe"
    }

    fn label(&self) -> &'static str {
        "Probe"
    }

    fn ports(&self) -> PortLayout {
        PortLayout::new().input("In", Value::signal(Vec::new()))
    }
}

fn probe_factory(_params: &serde_json::Value) -> Result<Box<dyn Operator>, GraphError> {
    Ok(Box::new(Probe))
}

/// Scalar-kind source used for type-mismatch tests.
struct Knob;

impl Operator for Knob {
    fn type_name(&self) -> &'static str {
        "Knob"
    }

    fn label(&self) -> &'static str {
        "Knob"
    }

    fn ports(&self) -> PortLayout {
        PortLayout::new().output("Out", ValueKind::Scalar)
    }

    fn compute(&self, _port: &str, _ctx: &NodeContext<'_>) -> Result<Value, NodeError> {
        Ok(Value::scalar(0.5))
    }
}

/// Operator whose producer always fails.
struct Broken;

impl Operator for Broken {
    fn type_name(&self) -> &'static str {
        "Broken"
    }

    fn label(&self) -> &'static str {
        "Broken"
    }

    fn ports(&self) -> PortLayout {
        PortLayout::new().output("Out", ValueKind::Signal)
    }

    fn compute(&self, _port: &str, _ctx: &NodeContext<'_>) -> Result<Value, NodeError> {
        Err(NodeError::operator("synthetic failure"))
    }
}

fn test_registry() -> NodeRegistry {
    let mut registry = NodeRegistry::new();
    registry.register("Wave", wave_factory);
    registry.register("Gain", gain_factory);
    registry.register("Probe", probe_factory);
    registry
}

fn empty_graph() -> Graph {
    Graph::new(NodeRegistry::new())
}

#[test]
fn producers_run_once_per_tick_with_shared_sinks() {
    let computes = Rc::new(Cell::new(0));
    let mut graph = empty_graph();
    graph
        .create(
            "source",
            Box::new(CountingSource {
                computes: Rc::clone(&computes),
            }),
        )
        .unwrap();
    graph.create("probe-a", Box::new(Probe)).unwrap();
    graph.create("probe-b", Box::new(Probe)).unwrap();
    graph.connect(("source", "Out"), ("probe-a", "In")).unwrap();
    graph.connect(("source", "Out"), ("probe-b", "In")).unwrap();

    graph.input_value("probe-a", "In").unwrap();
    graph.input_value("probe-b", "In").unwrap();
    graph.input_value("probe-a", "In").unwrap();
    assert_eq!(computes.get(), 1, "memo cache must absorb repeated pulls");

    graph.tick();
    graph.input_value("probe-b", "In").unwrap();
    graph.input_value("probe-a", "In").unwrap();
    assert_eq!(computes.get(), 2, "tick must invalidate exactly once");
}

#[test]
fn connect_then_disconnect_is_identity() {
    let mut graph = empty_graph();
    graph.create("wave", Box::new(Wave { samples: 4 })).unwrap();
    graph.create("probe", Box::new(Probe)).unwrap();

    graph.connect(("wave", "Out"), ("probe", "In")).unwrap();
    graph.disconnect(("probe", "In"), ("wave", "Out")).unwrap();

    let wave = graph.node("wave").unwrap();
    assert!(wave.output("Out").unwrap().sinks().is_empty());
    let probe = graph.node("probe").unwrap();
    assert!(probe.input("In").unwrap().upstream().is_none());
}

#[test]
fn reconnecting_the_same_pair_is_idempotent() {
    let mut graph = empty_graph();
    graph.create("wave", Box::new(Wave { samples: 4 })).unwrap();
    graph.create("probe", Box::new(Probe)).unwrap();

    graph.connect(("wave", "Out"), ("probe", "In")).unwrap();
    graph.connect(("wave", "Out"), ("probe", "In")).unwrap();

    assert_eq!(graph.node("wave").unwrap().output("Out").unwrap().sinks().len(), 1);
}

#[test]
fn connecting_a_new_upstream_steals_the_input() {
    let mut graph = empty_graph();
    graph.create("first", Box::new(Wave { samples: 4 })).unwrap();
    graph.create("second", Box::new(Wave { samples: 8 })).unwrap();
    graph.create("probe", Box::new(Probe)).unwrap();

    graph.connect(("first", "Out"), ("probe", "In")).unwrap();
    graph.connect(("second", "Out"), ("probe", "In")).unwrap();

    assert!(graph.node("first").unwrap().output("Out").unwrap().sinks().is_empty());
    assert_eq!(graph.node("second").unwrap().output("Out").unwrap().sinks().len(), 1);
    let upstream = graph
        .node("probe")
        .unwrap()
        .input("In")
        .unwrap()
        .upstream()
        .cloned()
        .unwrap();
    assert_eq!(upstream.node, "second");
}

#[test]
fn disconnect_all_clears_every_sink() {
    let mut graph = empty_graph();
    graph.create("wave", Box::new(Wave { samples: 4 })).unwrap();
    graph.create("probe-a", Box::new(Probe)).unwrap();
    graph.create("probe-b", Box::new(Probe)).unwrap();
    graph.connect(("wave", "Out"), ("probe-a", "In")).unwrap();
    graph.connect(("wave", "Out"), ("probe-b", "In")).unwrap();

    graph.disconnect_all(("wave", "Out")).unwrap();

    assert!(graph.node("wave").unwrap().output("Out").unwrap().sinks().is_empty());
    assert!(graph.node("probe-a").unwrap().input("In").unwrap().upstream().is_none());
    assert!(graph.node("probe-b").unwrap().input("In").unwrap().upstream().is_none());
}

#[test]
fn disconnecting_a_stranger_fails() {
    let mut graph = empty_graph();
    graph.create("wave", Box::new(Wave { samples: 4 })).unwrap();
    graph.create("other", Box::new(Wave { samples: 4 })).unwrap();
    graph.create("probe", Box::new(Probe)).unwrap();
    graph.connect(("wave", "Out"), ("probe", "In")).unwrap();

    assert!(matches!(
        graph.disconnect(("probe", "In"), ("other", "Out")),
        Err(GraphError::NotConnected { .. })
    ));
    // The real connection survives.
    assert_eq!(graph.node("wave").unwrap().output("Out").unwrap().sinks().len(), 1);
}

#[test]
fn removal_leaves_no_dangling_references() {
    let mut graph = empty_graph();
    graph.create("wave", Box::new(Wave { samples: 4 })).unwrap();
    graph.create("gain", Box::new(Gain { gain: 2.0 })).unwrap();
    graph.create("probe", Box::new(Probe)).unwrap();
    graph.connect(("wave", "Out"), ("gain", "In")).unwrap();
    graph.connect(("gain", "Out"), ("probe", "In")).unwrap();

    graph.remove("gain").unwrap();

    assert!(graph.node("gain").is_none());
    assert!(graph.node("wave").unwrap().output("Out").unwrap().sinks().is_empty());
    assert!(graph.node("probe").unwrap().input("In").unwrap().upstream().is_none());
}

#[test]
fn removing_an_unknown_node_fails() {
    let mut graph = empty_graph();
    assert!(matches!(
        graph.remove("ghost"),
        Err(GraphError::NodeNotFound(name)) if name == "ghost"
    ));
}

#[test]
fn duplicate_names_are_rejected() {
    let mut graph = empty_graph();
    graph.create("wave", Box::new(Wave { samples: 4 })).unwrap();
    assert!(matches!(
        graph.create("wave", Box::new(Wave { samples: 8 })),
        Err(GraphError::DuplicateName(name)) if name == "wave"
    ));
}

#[test]
fn ids_are_monotonic_across_removals() {
    let mut graph = empty_graph();
    let a = graph.create("a", Box::new(Wave { samples: 1 })).unwrap();
    let b = graph.create("b", Box::new(Wave { samples: 1 })).unwrap();
    graph.remove("b").unwrap();
    let c = graph.create("c", Box::new(Wave { samples: 1 })).unwrap();

    assert_eq!(a, 0);
    assert_eq!(b, 1);
    assert_eq!(c, 2, "removal must not free ids for reuse");

    graph.clear();
    assert!(graph.is_empty());
    let fresh = graph.create("d", Box::new(Wave { samples: 1 })).unwrap();
    assert_eq!(fresh, 0, "clear resets the id counter");
}

#[test]
fn type_mismatch_mutates_neither_port() {
    let mut graph = empty_graph();
    graph.create("knob", Box::new(Knob)).unwrap();
    graph.create("gain", Box::new(Gain { gain: 1.0 })).unwrap();

    let result = graph.connect(("knob", "Out"), ("gain", "In"));
    assert!(matches!(result, Err(GraphError::TypeMismatch { .. })));

    assert!(graph.node("knob").unwrap().output("Out").unwrap().sinks().is_empty());
    assert!(graph.node("gain").unwrap().input("In").unwrap().upstream().is_none());
}

#[test]
fn type_mismatch_keeps_an_existing_connection() {
    let mut graph = empty_graph();
    graph.create("wave", Box::new(Wave { samples: 4 })).unwrap();
    graph.create("knob", Box::new(Knob)).unwrap();
    graph.create("gain", Box::new(Gain { gain: 1.0 })).unwrap();
    graph.connect(("wave", "Out"), ("gain", "In")).unwrap();

    assert!(graph.connect(("knob", "Out"), ("gain", "In")).is_err());

    let upstream = graph
        .node("gain")
        .unwrap()
        .input("In")
        .unwrap()
        .upstream()
        .cloned()
        .unwrap();
    assert_eq!(upstream.node, "wave");
}

#[test]
fn cycles_are_detected_within_one_pull() {
    let mut graph = empty_graph();
    graph.create("a", Box::new(Gain { gain: 1.0 })).unwrap();
    graph.create("b", Box::new(Gain { gain: 1.0 })).unwrap();
    graph.connect(("a", "Out"), ("b", "In")).unwrap();
    graph.connect(("b", "Out"), ("a", "In")).unwrap();

    assert!(matches!(
        graph.output_value("b", "Out"),
        Err(GraphError::CycleDetected { .. })
    ));

    // The graph stays usable: breaking the loop restores evaluation.
    graph.disconnect(("a", "In"), ("b", "Out")).unwrap();
    let value = graph.output_value("b", "Out").unwrap();
    assert_eq!(value.as_signal(), Some(&[][..]));
}

#[test]
fn failed_operators_soften_to_an_empty_value() {
    let mut graph = empty_graph();
    graph.create("broken", Box::new(Broken)).unwrap();
    graph.create("gain", Box::new(Gain { gain: 3.0 })).unwrap();
    graph.connect(("broken", "Out"), ("gain", "In")).unwrap();

    let value = graph.output_value("gain", "Out").unwrap();
    assert_eq!(value.as_signal(), Some(&[][..]));
}

#[test]
fn evaluation_flows_through_a_chain() {
    let mut graph = empty_graph();
    graph.create("wave", Box::new(Wave { samples: 4 })).unwrap();
    graph.create("gain", Box::new(Gain { gain: 2.0 })).unwrap();
    graph.connect(("wave", "Out"), ("gain", "In")).unwrap();

    let value = graph.output_value("gain", "Out").unwrap();
    assert_eq!(value.as_signal(), Some(&[0.0, 2.0, 4.0, 6.0][..]));
}

#[test]
fn unconnected_inputs_fall_back_to_their_default() {
    let mut graph = empty_graph();
    graph.create("probe", Box::new(Probe)).unwrap();
    let value = graph.input_value("probe", "In").unwrap();
    assert_eq!(value.as_signal(), Some(&[][..]));
}

#[test]
fn serialisation_round_trips() {
    let mut graph = Graph::new(test_registry());
    // Alphabetical creation order keeps ids aligned with the loader's
    // stable (name-ordered) pass.
    graph
        .create_from_registry("Wave", "a-wave", &json!({ "samples": 5 }))
        .unwrap();
    graph
        .create_from_registry("Gain", "b-gain", &json!({ "gain": 2.5 }))
        .unwrap();
    graph
        .create_from_registry("Probe", "c-probe", &json!({}))
        .unwrap();
    graph.connect(("a-wave", "Out"), ("b-gain", "In")).unwrap();
    graph.connect(("b-gain", "Out"), ("c-probe", "In")).unwrap();

    let serialized = graph.to_json();
    let reloaded = Graph::load(&serialized, test_registry()).unwrap();

    assert_eq!(reloaded.serialize(), graph.serialize());

    let original = graph.output_value("b-gain", "Out").unwrap();
    let replayed = reloaded.output_value("b-gain", "Out").unwrap();
    assert_eq!(original, replayed);
}

#[test]
fn load_rejects_unknown_types() {
    let json = r#"{ "nodes": [ { "type": "Mystery", "name": "x" } ] }"#;
    assert!(matches!(
        Graph::load(json, test_registry()),
        Err(GraphError::UnknownType(tag)) if tag == "Mystery"
    ));
}

#[test]
fn load_rejects_missing_fields() {
    assert!(matches!(
        Graph::load(r#"{}"#, test_registry()),
        Err(GraphError::MissingField("nodes"))
    ));
    assert!(matches!(
        Graph::load(r#"{ "nodes": [ { "name": "x" } ] }"#, test_registry()),
        Err(GraphError::MissingField("type"))
    ));
    assert!(matches!(
        Graph::load(r#"{ "nodes": [ { "type": "Wave" } ] }"#, test_registry()),
        Err(GraphError::MissingField("name"))
    ));
}

#[test]
fn load_rejects_dangling_connections() {
    let json = r#"{
        "nodes": [
            {
                "type": "Wave",
                "name": "wave",
                "outputs": [
                    { "name": "Out", "connections": [ { "node": "ghost", "port": "In" } ] }
                ]
            }
        ]
    }"#;
    assert!(matches!(
        Graph::load(json, test_registry()),
        Err(GraphError::DanglingReference { node, .. }) if node == "ghost"
    ));
}

#[test]
fn load_ignores_unknown_fields() {
    let json = r#"{
        "editor": { "zoom": 1.5 },
        "nodes": [
            { "type": "Wave", "name": "wave", "position": [10, 20], "outputs": [] }
        ]
    }"#;
    let graph = Graph::load(json, test_registry()).unwrap();
    assert_eq!(graph.len(), 1);
}

/// Render sweeps see every node once and can pull inputs.
#[test]
fn render_sweep_reaches_every_node() {
    struct RecordingUi {
        lines: Vec<String>,
    }

    impl Ui for RecordingUi {
        fn text(&mut self, text: &str) {
            self.lines.push(text.to_string());
        }

        fn plot(&mut self, _label: &str, _series: &[f64]) {}

        fn input_usize(&mut self, _label: &str, _value: &mut usize) -> bool {
            false
        }

        fn input_f64(&mut self, _label: &str, _value: &mut f64) -> bool {
            false
        }

        fn slider_f64(&mut self, _label: &str, _value: &mut f64, _min: f64, _max: f64) -> bool {
            false
        }

        fn slider_usize(
            &mut self,
            _label: &str,
            _value: &mut usize,
            _min: usize,
            _max: usize,
        ) -> bool {
            false
        }

        fn combo(&mut self, _label: &str, _selected: &mut usize, _options: &[&str]) -> bool {
            false
        }
    }

    struct Chatty;

    impl Operator for Chatty {
        fn type_name(&self) -> &'static str {
            "Chatty"
        }

        fn label(&self) -> &'static str {
            "Chatty"
        }

        fn ports(&self) -> PortLayout {
            PortLayout::new()
        }

        fn render(&mut self, ui: &mut dyn Ui, ctx: &NodeContext<'_>) {
            ui.text(&format!("{}@{}", ctx.node_name(), ctx.frame()));
        }
    }

    let mut graph = empty_graph();
    graph.create("one", Box::new(Chatty)).unwrap();
    graph.create("two", Box::new(Chatty)).unwrap();

    let mut ui = RecordingUi { lines: Vec::new() };
    graph.tick();
    graph.render(&mut ui);

    assert_eq!(ui.lines, vec!["one@2".to_string(), "two@2".to_string()]);
}
