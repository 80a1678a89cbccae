//! The graph: node ownership, connection mediation, the frame clock,
//! memoised pull evaluation, and JSON persistence.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use crate::error::{GraphError, NodeError};
use crate::node::{Node, NodeContext, NodeId, Operator};
use crate::port::PortRef;
use crate::registry::NodeRegistry;
use crate::ui::Ui;
use crate::value::Value;

/// An owning dataflow graph over named nodes.
///
/// The graph is single-threaded: it is mutated and evaluated on one
/// logical thread (the host's frame loop). Evaluation is pull-based and
/// memoised per frame; [`tick`](Graph::tick) is the only way cached
/// output values become stale.
pub struct Graph {
    nodes: BTreeMap<String, Node>,
    registry: NodeRegistry,
    next_id: NodeId,
    frame: u64,
}

impl Graph {
    /// Creates an empty graph that consults `registry` during [`load`].
    ///
    /// [`load`]: Graph::load
    pub fn new(registry: NodeRegistry) -> Self {
        Self {
            nodes: BTreeMap::new(),
            registry,
            next_id: 0,
            frame: 1,
        }
    }

    /// The operator registry this graph was built with.
    pub fn registry(&self) -> &NodeRegistry {
        &self.registry
    }

    /// Current frame index. Frames start at 1 so a fresh cache (frame 0)
    /// is always stale.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Advances the frame clock. Call exactly once per host frame.
    pub fn tick(&mut self) {
        self.frame += 1;
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the graph holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node by name.
    pub fn node(&self, name: &str) -> Option<&Node> {
        self.nodes.get(name)
    }

    /// All nodes in stable (name) order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Node names in stable order.
    pub fn node_names(&self) -> Vec<&str> {
        self.nodes.keys().map(String::as_str).collect()
    }

    /// Inserts a node for `op` under a graph-unique name.
    ///
    /// Ids are allocated monotonically and never reused within this
    /// graph's lifetime, even across removals.
    pub fn create(
        &mut self,
        name: impl Into<String>,
        op: Box<dyn Operator>,
    ) -> Result<NodeId, GraphError> {
        let name = name.into();
        if self.nodes.contains_key(&name) {
            return Err(GraphError::DuplicateName(name));
        }

        let id = self.next_id;
        self.next_id += 1;
        self.nodes.insert(name.clone(), Node::new(id, name, op));
        Ok(id)
    }

    /// Instantiates a registered operator type and inserts it.
    pub fn create_from_registry(
        &mut self,
        type_tag: &str,
        name: &str,
        parameters: &serde_json::Value,
    ) -> Result<NodeId, GraphError> {
        let op = self.registry.create(type_tag, parameters)?;
        self.create(name, op)
    }

    /// Removes a node, disconnecting every port it owns first so no
    /// surviving port references it.
    pub fn remove(&mut self, name: &str) -> Result<(), GraphError> {
        let node = self
            .nodes
            .remove(name)
            .ok_or_else(|| GraphError::NodeNotFound(name.to_string()))?;

        for output in &node.outputs {
            for sink in output.sinks() {
                if let Some(target) = self.nodes.get_mut(&sink.node) {
                    if let Some(input) = target.input_mut(&sink.port) {
                        input.clear_upstream();
                    }
                }
            }
        }

        for input in &node.inputs {
            if let Some(up) = input.upstream() {
                if let Some(source) = self.nodes.get_mut(&up.node) {
                    if let Some(output) = source.output_mut(&up.port) {
                        output.remove_sink(&PortRef::new(name, input.name()));
                    }
                }
            }
        }

        Ok(())
    }

    /// Removes every node and resets the id counter to 0.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.next_id = 0;
    }

    /// Connects an output to an input.
    ///
    /// Types must match exactly; on mismatch neither port is touched.
    /// Connecting an input that already has a different upstream first
    /// disconnects it; reconnecting the same pair is a no-op.
    pub fn connect(
        &mut self,
        output: (&str, &str),
        input: (&str, &str),
    ) -> Result<(), GraphError> {
        let output_kind = {
            let node = self
                .nodes
                .get(output.0)
                .ok_or_else(|| GraphError::NodeNotFound(output.0.to_string()))?;
            node.output(output.1)
                .ok_or_else(|| GraphError::port_not_found(output.0, output.1))?
                .kind()
        };
        let (input_kind, existing) = {
            let node = self
                .nodes
                .get(input.0)
                .ok_or_else(|| GraphError::NodeNotFound(input.0.to_string()))?;
            let port = node
                .input(input.1)
                .ok_or_else(|| GraphError::port_not_found(input.0, input.1))?;
            (port.kind(), port.upstream().cloned())
        };

        if output_kind != input_kind {
            return Err(GraphError::TypeMismatch {
                output: format!("{}.{}", output.0, output.1),
                input: format!("{}.{}", input.0, input.1),
                output_kind,
                input_kind,
            });
        }

        let output_ref = PortRef::new(output.0, output.1);
        let input_ref = PortRef::new(input.0, input.1);

        if let Some(previous) = existing {
            if previous == output_ref {
                return Ok(());
            }
            if let Some(source) = self.nodes.get_mut(&previous.node) {
                if let Some(port) = source.output_mut(&previous.port) {
                    port.remove_sink(&input_ref);
                }
            }
        }

        self.nodes
            .get_mut(input.0)
            .expect("validated above")
            .input_mut(input.1)
            .expect("validated above")
            .set_upstream(output_ref);
        self.nodes
            .get_mut(output.0)
            .expect("validated above")
            .output_mut(output.1)
            .expect("validated above")
            .add_sink(input_ref);

        Ok(())
    }

    /// Disconnects an input from the output it is currently fed by.
    ///
    /// Fails with [`GraphError::NotConnected`] when `output` is not the
    /// input's current upstream.
    pub fn disconnect(
        &mut self,
        input: (&str, &str),
        output: (&str, &str),
    ) -> Result<(), GraphError> {
        let upstream = {
            let node = self
                .nodes
                .get(input.0)
                .ok_or_else(|| GraphError::NodeNotFound(input.0.to_string()))?;
            node.input(input.1)
                .ok_or_else(|| GraphError::port_not_found(input.0, input.1))?
                .upstream()
                .cloned()
        };

        let output_ref = PortRef::new(output.0, output.1);
        if upstream.as_ref() != Some(&output_ref) {
            return Err(GraphError::NotConnected {
                input: format!("{}.{}", input.0, input.1),
                output: format!("{}.{}", output.0, output.1),
            });
        }

        self.nodes
            .get_mut(input.0)
            .expect("validated above")
            .input_mut(input.1)
            .expect("validated above")
            .clear_upstream();
        if let Some(source) = self.nodes.get_mut(output.0) {
            if let Some(port) = source.output_mut(output.1) {
                port.remove_sink(&PortRef::new(input.0, input.1));
            }
        }

        Ok(())
    }

    /// Disconnects every sink of an output port.
    pub fn disconnect_all(&mut self, output: (&str, &str)) -> Result<(), GraphError> {
        let sinks = self
            .nodes
            .get(output.0)
            .ok_or_else(|| GraphError::NodeNotFound(output.0.to_string()))?
            .output(output.1)
            .ok_or_else(|| GraphError::port_not_found(output.0, output.1))?
            .sinks()
            .to_vec();

        for sink in sinks {
            self.disconnect((&sink.node, &sink.port), output)?;
        }
        Ok(())
    }

    /// Pulls the memoised value of an output port.
    ///
    /// The producer runs at most once per port per frame. Operator
    /// failures are logged and soften to the port kind's empty value
    /// (cached nothing, so a later pull retries); structural failures —
    /// above all [`GraphError::CycleDetected`] — propagate.
    pub fn output_value(&self, node: &str, port: &str) -> Result<Value, GraphError> {
        let owner = self
            .nodes
            .get(node)
            .ok_or_else(|| GraphError::NodeNotFound(node.to_string()))?;
        let output = owner
            .output(port)
            .ok_or_else(|| GraphError::port_not_found(node, port))?;

        {
            let cache = output.cache.borrow();
            if cache.computing {
                return Err(GraphError::cycle(node, port));
            }
            if cache.frame == self.frame {
                if let Some(value) = &cache.value {
                    return Ok(value.clone());
                }
            }
        }

        output.cache.borrow_mut().computing = true;
        let computed = match owner.op.try_borrow() {
            Ok(op) => {
                let ctx = NodeContext::new(self, owner.name());
                op.compute(port, &ctx)
            }
            // The operator is mid-render and asked for its own output.
            Err(_) => Err(NodeError::Graph(GraphError::cycle(node, port))),
        };

        let mut cache = output.cache.borrow_mut();
        cache.computing = false;

        match computed {
            Ok(value) if value.kind() == output.kind() => {
                cache.frame = self.frame;
                cache.value = Some(value.clone());
                Ok(value)
            }
            Ok(value) => {
                warn!(
                    node,
                    port,
                    expected = %output.kind(),
                    produced = %value.kind(),
                    "operator produced a value of the wrong kind; emitting empty value"
                );
                Ok(Value::empty(output.kind()))
            }
            Err(NodeError::Graph(error)) => Err(error),
            Err(NodeError::Operator(error)) => {
                warn!(node, port, error = %error, "operator failed; emitting empty value");
                Ok(Value::empty(output.kind()))
            }
        }
    }

    /// Value seen by an input port: the upstream's memoised value when
    /// connected, the input's default otherwise.
    pub fn input_value(&self, node: &str, port: &str) -> Result<Value, GraphError> {
        let owner = self
            .nodes
            .get(node)
            .ok_or_else(|| GraphError::NodeNotFound(node.to_string()))?;
        let input = owner
            .input(port)
            .ok_or_else(|| GraphError::port_not_found(node, port))?;

        match input.upstream() {
            Some(up) => self.output_value(&up.node, &up.port),
            None => Ok(input.default().clone()),
        }
    }

    /// Runs every node's render hook once. Call at most once per frame.
    pub fn render(&self, ui: &mut dyn Ui) {
        for node in self.nodes.values() {
            let ctx = NodeContext::new(self, node.name());
            if let Ok(mut op) = node.op.try_borrow_mut() {
                op.render(ui, &ctx);
            }
        }
    }

    /// Serialises the graph: all nodes in stable order, each output
    /// carrying its connection list.
    pub fn serialize(&self) -> serde_json::Value {
        let nodes: Vec<serde_json::Value> =
            self.nodes.values().map(|node| node.serialize()).collect();
        json!({ "nodes": nodes })
    }

    /// Serialises to a compact JSON string.
    pub fn to_json(&self) -> String {
        self.serialize().to_string()
    }

    /// Rebuilds a graph from serialised JSON.
    ///
    /// Pass 1 instantiates every node through the registry; pass 2
    /// replays the output-side connection lists. Any failure aborts the
    /// load and the partial graph is dropped, so the caller's destination
    /// stays empty.
    pub fn load(json: &str, registry: NodeRegistry) -> Result<Graph, GraphError> {
        let raw: RawGraph = serde_json::from_str(json)?;
        let raw_nodes = raw.nodes.ok_or(GraphError::MissingField("nodes"))?;

        let mut graph = Graph::new(registry);

        for raw_node in &raw_nodes {
            let type_tag = raw_node
                .type_tag
                .as_deref()
                .ok_or(GraphError::MissingField("type"))?;
            let name = raw_node
                .name
                .as_deref()
                .ok_or(GraphError::MissingField("name"))?;

            let parameters = if raw_node.parameters.is_null() {
                json!({})
            } else {
                raw_node.parameters.clone()
            };
            let op = graph.registry.create(type_tag, &parameters)?;
            graph.create(name, op)?;
        }

        for raw_node in &raw_nodes {
            let name = raw_node.name.as_deref().expect("checked in pass 1");
            for raw_output in &raw_node.outputs {
                let Some(port) = raw_output.name.as_deref() else {
                    continue;
                };
                if graph.node(name).and_then(|n| n.output(port)).is_none() {
                    return Err(GraphError::dangling(name, port));
                }

                for conn in &raw_output.connections {
                    let target_exists = graph
                        .node(&conn.node)
                        .map(|n| n.input(&conn.port).is_some())
                        .unwrap_or(false);
                    if !target_exists {
                        return Err(GraphError::dangling(&conn.node, &conn.port));
                    }
                    graph.connect((name, port), (&conn.node, &conn.port))?;
                }
            }
        }

        Ok(graph)
    }
}

// Loose mirror of the external format. Unknown fields are ignored, the
// input-side connection entries included; the outputs list is
// authoritative for rebuilding connections.
#[derive(Deserialize)]
struct RawGraph {
    nodes: Option<Vec<RawNode>>,
}

#[derive(Deserialize)]
struct RawNode {
    #[serde(rename = "type")]
    type_tag: Option<String>,
    name: Option<String>,
    #[serde(default)]
    parameters: serde_json::Value,
    #[serde(default)]
    outputs: Vec<RawOutput>,
}

#[derive(Deserialize)]
struct RawOutput {
    name: Option<String>,
    #[serde(default)]
    connections: Vec<RawConnection>,
}

#[derive(Deserialize)]
struct RawConnection {
    node: String,
    port: String,
}
