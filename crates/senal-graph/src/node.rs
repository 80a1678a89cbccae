//! Node base: the operator trait, port declaration, and the per-node
//! evaluation context.

use std::cell::RefCell;

use serde_json::json;

use crate::error::{GraphError, NodeError};
use crate::graph::Graph;
use crate::port::{InputPort, OutputPort};
use crate::ui::Ui;
use crate::value::{Value, ValueKind};

/// Process-unique node identifier, allocated monotonically by the graph
/// and never reused within a graph lifetime.
pub type NodeId = u64;

/// Declared port set of an operator, consumed once at node creation.
#[derive(Debug, Default)]
pub struct PortLayout {
    pub(crate) inputs: Vec<(String, Value)>,
    pub(crate) outputs: Vec<(String, ValueKind)>,
}

impl PortLayout {
    /// An empty layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares an input port; its element type is the default's kind.
    pub fn input(mut self, name: impl Into<String>, default: Value) -> Self {
        self.inputs.push((name.into(), default));
        self
    }

    /// Declares an output port of the given element type.
    pub fn output(mut self, name: impl Into<String>, kind: ValueKind) -> Self {
        self.outputs.push((name.into(), kind));
        self
    }
}

/// Behaviour plugged into a [`Node`].
///
/// An operator declares its ports once, produces output values on demand
/// through [`compute`](Operator::compute), and exposes its parameters to
/// the host through [`render`](Operator::render) (editing) and
/// [`parameters`](Operator::parameters) (persistence).
pub trait Operator {
    /// Type tag used by the registry and the serialised format.
    fn type_name(&self) -> &'static str;

    /// Human-readable display label.
    fn label(&self) -> &'static str;

    /// Declares the operator's ports. Called once when the node is
    /// created; the layout is fixed for the node's lifetime.
    fn ports(&self) -> PortLayout;

    /// Parameter bundle for the serialised format.
    fn parameters(&self) -> serde_json::Value {
        json!({})
    }

    /// Produces the value of the named output port for the current frame.
    ///
    /// Called at most once per port per frame; results are cached on the
    /// output. Input values are pulled through `ctx`, and structural
    /// errors from those pulls should be propagated with `?`.
    fn compute(&self, port: &str, _ctx: &NodeContext<'_>) -> Result<Value, NodeError> {
        Err(NodeError::operator(format!(
            "{} has no computable output '{port}'",
            self.type_name()
        )))
    }

    /// Collaborator hook for the host's per-frame sweep. May mutate
    /// parameters and pull input values; must not change graph structure.
    fn render(&mut self, _ui: &mut dyn Ui, _ctx: &NodeContext<'_>) {}
}

/// A node: stable identity, unique name, display label, operator, and
/// the ports the operator declared.
pub struct Node {
    id: NodeId,
    name: String,
    label: String,
    pub(crate) op: RefCell<Box<dyn Operator>>,
    pub(crate) inputs: Vec<InputPort>,
    pub(crate) outputs: Vec<OutputPort>,
}

impl Node {
    pub(crate) fn new(id: NodeId, name: String, op: Box<dyn Operator>) -> Self {
        let layout = op.ports();
        let inputs = layout
            .inputs
            .into_iter()
            .map(|(port_name, default)| InputPort::new(port_name, default))
            .collect();
        let outputs = layout
            .outputs
            .into_iter()
            .map(|(port_name, kind)| OutputPort::new(port_name, kind))
            .collect();
        let label = op.label().to_string();

        Self {
            id,
            name,
            label,
            op: RefCell::new(op),
            inputs,
            outputs,
        }
    }

    /// Stable node id.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Graph-unique node name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Display label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The operator's type tag.
    pub fn type_name(&self) -> &'static str {
        self.op.borrow().type_name()
    }

    /// Input port by name.
    pub fn input(&self, name: &str) -> Option<&InputPort> {
        self.inputs.iter().find(|p| p.name() == name)
    }

    /// Output port by name.
    pub fn output(&self, name: &str) -> Option<&OutputPort> {
        self.outputs.iter().find(|p| p.name() == name)
    }

    pub(crate) fn input_mut(&mut self, name: &str) -> Option<&mut InputPort> {
        self.inputs.iter_mut().find(|p| p.name() == name)
    }

    pub(crate) fn output_mut(&mut self, name: &str) -> Option<&mut OutputPort> {
        self.outputs.iter_mut().find(|p| p.name() == name)
    }

    /// Input port names in declaration order.
    pub fn input_names(&self) -> Vec<&str> {
        self.inputs.iter().map(|p| p.name()).collect()
    }

    /// Output port names in declaration order.
    pub fn output_names(&self) -> Vec<&str> {
        self.outputs.iter().map(|p| p.name()).collect()
    }

    /// Serialises the node: type, identity, parameters, and both port
    /// lists with their connections (the outputs side is authoritative).
    pub fn serialize(&self) -> serde_json::Value {
        let op = self.op.borrow();

        let inputs: Vec<serde_json::Value> = self
            .inputs
            .iter()
            .map(|input| {
                let mut entry = json!({ "name": input.name() });
                if let Some(up) = input.upstream() {
                    entry["connection"] = json!({ "node": up.node, "port": up.port });
                }
                entry
            })
            .collect();

        let outputs: Vec<serde_json::Value> = self
            .outputs
            .iter()
            .map(|output| {
                let connections: Vec<serde_json::Value> = output
                    .sinks()
                    .iter()
                    .map(|sink| json!({ "node": sink.node, "port": sink.port }))
                    .collect();
                json!({ "name": output.name(), "connections": connections })
            })
            .collect();

        json!({
            "type": op.type_name(),
            "name": self.name,
            "id": self.id,
            "label": self.label,
            "parameters": op.parameters(),
            "inputs": inputs,
            "outputs": outputs,
        })
    }
}

/// Pull-access handle passed to an operator's `compute` and `render`.
pub struct NodeContext<'g> {
    graph: &'g Graph,
    node: &'g str,
}

impl<'g> NodeContext<'g> {
    pub(crate) fn new(graph: &'g Graph, node: &'g str) -> Self {
        Self { graph, node }
    }

    /// Name of the node being evaluated.
    pub fn node_name(&self) -> &str {
        self.node
    }

    /// Current frame index.
    pub fn frame(&self) -> u64 {
        self.graph.frame()
    }

    /// Pulls the value of one of this node's inputs: the upstream's
    /// memoised value when connected, the input default otherwise.
    pub fn input(&self, port: &str) -> Result<Value, GraphError> {
        self.graph.input_value(self.node, port)
    }
}
