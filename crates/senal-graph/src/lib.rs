//! Señal graph - typed pull-based dataflow substrate
//!
//! Nodes own named, typed ports; sinks pull values on demand and every
//! output memoises its value for the current frame, so each producer runs
//! at most once per tick however many sinks share it. The graph owns the
//! nodes, mediates connections so the symmetric references stay
//! consistent, drives the frame clock, and (de)serialises itself to the
//! JSON graph format.
//!
//! Operator behaviour is plugged in through the [`Operator`] trait and
//! instantiated from type tags via the [`NodeRegistry`]; the shipped
//! operator catalogue lives in the `senal-nodes` crate.
//!
//! # Example
//!
//! ```rust,ignore
//! use senal_graph::{Graph, HeadlessUi};
//! use senal_nodes::builtin_registry;
//!
//! let mut graph = Graph::new(builtin_registry());
//! graph.create_from_registry("SineNode", "sine", &serde_json::json!({}))?;
//! graph.create_from_registry("ViewerNode", "scope", &serde_json::json!({}))?;
//! graph.connect(("sine", "Out"), ("scope", "In"))?;
//!
//! graph.tick();
//! graph.render(&mut HeadlessUi);
//! let seen = graph.input_value("scope", "In")?;
//! ```

pub mod error;
pub mod graph;
pub mod node;
pub mod port;
pub mod registry;
pub mod ui;
pub mod value;

pub use error::{GraphError, NodeError};
pub use graph::Graph;
pub use node::{Node, NodeContext, NodeId, Operator, PortLayout};
pub use port::{InputPort, OutputPort, PortRef};
pub use registry::{NodeFactory, NodeRegistry};
pub use ui::{HeadlessUi, Ui};
pub use value::{Value, ValueKind};
