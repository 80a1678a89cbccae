//! Error types for graph construction, evaluation and persistence.

use thiserror::Error;

use crate::value::ValueKind;

/// Errors raised by the graph core.
#[derive(Debug, Error)]
pub enum GraphError {
    /// A node with this name already exists in the graph.
    #[error("a node named '{0}' already exists")]
    DuplicateName(String),

    /// No node with this name exists in the graph.
    #[error("node '{0}' not found")]
    NodeNotFound(String),

    /// The node exists but has no port with this name on the relevant side.
    #[error("node '{node}' has no port named '{port}'")]
    PortNotFound {
        /// Node that was searched.
        node: String,
        /// Missing port name.
        port: String,
    },

    /// Output and input ports carry different element types.
    #[error("type mismatch: output '{output}' carries {output_kind}, input '{input}' expects {input_kind}")]
    TypeMismatch {
        /// Output port as `node.port`.
        output: String,
        /// Input port as `node.port`.
        input: String,
        /// Kind produced by the output.
        output_kind: ValueKind,
        /// Kind expected by the input.
        input_kind: ValueKind,
    },

    /// Disconnect was asked for an output that is not the current upstream.
    #[error("input '{input}' is not connected to output '{output}'")]
    NotConnected {
        /// Input port as `node.port`.
        input: String,
        /// Output port as `node.port`.
        output: String,
    },

    /// Pull evaluation re-entered an output that is still computing.
    #[error("cycle detected while evaluating '{node}.{port}'")]
    CycleDetected {
        /// Node owning the re-entered output.
        node: String,
        /// Re-entered output port.
        port: String,
    },

    /// Deserialisation met a type tag missing from the registry.
    #[error("unknown node type '{0}'")]
    UnknownType(String),

    /// Deserialisation met a node entry without a required field.
    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    /// A factory rejected its parameter bundle.
    #[error("invalid parameters for node type '{type_tag}': {reason}")]
    InvalidParameter {
        /// Type tag whose factory failed.
        type_tag: String,
        /// Why the parameters were rejected.
        reason: String,
    },

    /// A serialised connection references a node or port that does not exist.
    #[error("connection references unknown port '{node}.{port}'")]
    DanglingReference {
        /// Referenced node name.
        node: String,
        /// Referenced port name.
        port: String,
    },

    /// The graph JSON could not be parsed at all.
    #[error("malformed graph JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl GraphError {
    pub(crate) fn port_not_found(node: &str, port: &str) -> Self {
        GraphError::PortNotFound {
            node: node.to_string(),
            port: port.to_string(),
        }
    }

    pub(crate) fn cycle(node: &str, port: &str) -> Self {
        GraphError::CycleDetected {
            node: node.to_string(),
            port: port.to_string(),
        }
    }

    pub(crate) fn dangling(node: &str, port: &str) -> Self {
        GraphError::DanglingReference {
            node: node.to_string(),
            port: port.to_string(),
        }
    }

    /// Create an invalid-parameter error for a node type.
    pub fn invalid_parameter(type_tag: impl Into<String>, reason: impl ToString) -> Self {
        GraphError::InvalidParameter {
            type_tag: type_tag.into(),
            reason: reason.to_string(),
        }
    }
}

/// Error returned by an operator's `compute`.
///
/// Structural graph errors (cycles above all) tunnel through operator
/// frames unchanged so the pull that triggered them fails; anything else
/// is an operator-local failure that the evaluation boundary softens to
/// an empty output value.
#[derive(Debug, Error)]
pub enum NodeError {
    /// A structural error from pulling an input.
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// The operator itself failed.
    #[error("operator error: {0}")]
    Operator(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl NodeError {
    /// Wraps an operator-local failure.
    pub fn operator(error: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        NodeError::Operator(error.into())
    }
}
