//! Input and output ports.
//!
//! Ports are owned by their node; connections are stored symmetrically as
//! name-keyed [`PortRef`]s (the same addressing the serialised format
//! uses) and are only ever mutated through the graph, which keeps the two
//! directions in step.

use std::cell::RefCell;

use crate::value::{Value, ValueKind};

/// Address of a port: owning node name plus port name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortRef {
    /// Name of the owning node.
    pub node: String,
    /// Name of the port on that node.
    pub port: String,
}

impl PortRef {
    /// Creates a port reference.
    pub fn new(node: impl Into<String>, port: impl Into<String>) -> Self {
        Self {
            node: node.into(),
            port: port.into(),
        }
    }
}

impl std::fmt::Display for PortRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.node, self.port)
    }
}

/// An input port: unary sink with a default value.
#[derive(Debug)]
pub struct InputPort {
    name: String,
    kind: ValueKind,
    default: Value,
    upstream: Option<PortRef>,
}

impl InputPort {
    pub(crate) fn new(name: String, default: Value) -> Self {
        let kind = default.kind();
        Self {
            name,
            kind,
            default,
            upstream: None,
        }
    }

    /// Port name, unique among the node's inputs.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Element type this input accepts.
    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    /// Value used while no upstream is connected.
    pub fn default(&self) -> &Value {
        &self.default
    }

    /// The connected upstream output, if any.
    pub fn upstream(&self) -> Option<&PortRef> {
        self.upstream.as_ref()
    }

    pub(crate) fn set_upstream(&mut self, upstream: PortRef) {
        self.upstream = Some(upstream);
    }

    pub(crate) fn clear_upstream(&mut self) {
        self.upstream = None;
    }
}

/// Per-frame memo cell of an output port.
#[derive(Debug)]
pub(crate) struct OutputCache {
    /// Frame the cached value was computed at (0 = never).
    pub frame: u64,
    pub value: Option<Value>,
    /// Set while the producer runs; a pull that sees it is a cycle.
    pub computing: bool,
}

/// An output port: fan-out source with a per-frame value cache.
#[derive(Debug)]
pub struct OutputPort {
    name: String,
    kind: ValueKind,
    sinks: Vec<PortRef>,
    pub(crate) cache: RefCell<OutputCache>,
}

impl OutputPort {
    pub(crate) fn new(name: String, kind: ValueKind) -> Self {
        Self {
            name,
            kind,
            sinks: Vec::new(),
            cache: RefCell::new(OutputCache {
                frame: 0,
                value: None,
                computing: false,
            }),
        }
    }

    /// Port name, unique among the node's outputs.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Element type this output produces.
    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    /// Connected downstream inputs.
    pub fn sinks(&self) -> &[PortRef] {
        &self.sinks
    }

    pub(crate) fn add_sink(&mut self, sink: PortRef) {
        if !self.sinks.contains(&sink) {
            self.sinks.push(sink);
        }
    }

    pub(crate) fn remove_sink(&mut self, sink: &PortRef) {
        self.sinks.retain(|s| s != sink);
    }
}
