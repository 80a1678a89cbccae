//! Operator factory registry.
//!
//! The registry maps external type tags to factories so persistence can
//! reinstantiate operators from serialised parameter bundles. It is an
//! explicit object handed to the graph at construction; nothing is
//! registered through module-load side effects.

use std::collections::BTreeMap;

use crate::error::GraphError;
use crate::node::Operator;

/// Factory producing an operator from its serialised parameters.
pub type NodeFactory = fn(&serde_json::Value) -> Result<Box<dyn Operator>, GraphError>;

/// Name→factory table consulted during deserialisation.
#[derive(Default)]
pub struct NodeRegistry {
    factories: BTreeMap<String, NodeFactory>,
}

impl NodeRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a factory under a type tag, replacing any previous entry.
    pub fn register(&mut self, type_tag: impl Into<String>, factory: NodeFactory) {
        self.factories.insert(type_tag.into(), factory);
    }

    /// True when a factory is registered for the tag.
    pub fn contains(&self, type_tag: &str) -> bool {
        self.factories.contains_key(type_tag)
    }

    /// Registered type tags in sorted order.
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Instantiates an operator for a type tag.
    pub fn create(
        &self,
        type_tag: &str,
        parameters: &serde_json::Value,
    ) -> Result<Box<dyn Operator>, GraphError> {
        let factory = self
            .factories
            .get(type_tag)
            .ok_or_else(|| GraphError::UnknownType(type_tag.to_string()))?;
        factory(parameters)
    }
}
