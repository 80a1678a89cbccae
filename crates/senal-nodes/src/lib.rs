//! Señal nodes - shipped operator catalogue
//!
//! Sources ([`SineNode`], [`RandomDataNode`], [`CsvNode`]), transforms
//! ([`MixerNode`], [`FilterNode`]) and sinks ([`ViewerNode`],
//! [`MultiViewerNode`]) wired onto the `senal-graph` substrate. The
//! [`FilterNode`] calls into `senal-filter` for its coefficients.
//!
//! [`builtin_registry`] returns the factory registry persistence needs to
//! reinstantiate all of these from their external type tags.
//!
//! # Example
//!
//! ```rust
//! use senal_graph::Graph;
//! use senal_nodes::builtin_registry;
//! use serde_json::json;
//!
//! let mut graph = Graph::new(builtin_registry());
//! graph.create_from_registry("SineNode", "tone", &json!({ "frequency": 440.0 }))?;
//! graph.create_from_registry("ViewerNode", "scope", &json!({}))?;
//! graph.connect(("tone", "Out"), ("scope", "In"))?;
//! # Ok::<(), senal_graph::GraphError>(())
//! ```

pub mod csv;
pub mod csv_node;
pub mod filter;
pub mod mixer;
pub mod random;
pub mod sine;
pub mod viewer;

pub use csv::{load_csv, save_csv, CsvData, CsvError};
pub use csv_node::{CsvNode, CsvParams};
pub use filter::{FilterNode, FilterParams};
pub use mixer::{MixerNode, MixerParams};
pub use random::{RandomDataNode, RandomParams};
pub use sine::{SineNode, SineParams};
pub use viewer::{MultiViewerNode, MultiViewerParams, ViewerNode, ViewerParams};

use senal_graph::{GraphError, NodeRegistry, Operator};

fn parse_params<T: serde::de::DeserializeOwned>(
    type_tag: &'static str,
    params: &serde_json::Value,
) -> Result<T, GraphError> {
    serde_json::from_value(params.clone())
        .map_err(|e| GraphError::invalid_parameter(type_tag, e))
}

fn sine_factory(params: &serde_json::Value) -> Result<Box<dyn Operator>, GraphError> {
    Ok(Box::new(SineNode::new(parse_params("SineNode", params)?)))
}

fn random_factory(params: &serde_json::Value) -> Result<Box<dyn Operator>, GraphError> {
    Ok(Box::new(RandomDataNode::new(parse_params(
        "RandomDataNode",
        params,
    )?)))
}

fn csv_factory(params: &serde_json::Value) -> Result<Box<dyn Operator>, GraphError> {
    let params: CsvParams = parse_params("CSVNode", params)?;
    let node = CsvNode::new(params).map_err(|e| GraphError::invalid_parameter("CSVNode", e))?;
    Ok(Box::new(node))
}

fn mixer_factory(params: &serde_json::Value) -> Result<Box<dyn Operator>, GraphError> {
    Ok(Box::new(MixerNode::new(parse_params("MixerNode", params)?)))
}

fn filter_factory(params: &serde_json::Value) -> Result<Box<dyn Operator>, GraphError> {
    Ok(Box::new(FilterNode::new(parse_params(
        "FilterNode",
        params,
    )?)))
}

fn viewer_factory(params: &serde_json::Value) -> Result<Box<dyn Operator>, GraphError> {
    Ok(Box::new(ViewerNode::new(parse_params(
        "ViewerNode",
        params,
    )?)))
}

fn multi_viewer_factory(params: &serde_json::Value) -> Result<Box<dyn Operator>, GraphError> {
    Ok(Box::new(MultiViewerNode::new(parse_params(
        "MultiViewerNode",
        params,
    )?)))
}

/// Registry with every shipped operator type registered under its
/// external type tag. Hand this to [`Graph::new`](senal_graph::Graph::new)
/// (or [`Graph::load`](senal_graph::Graph::load)) at construction.
pub fn builtin_registry() -> NodeRegistry {
    let mut registry = NodeRegistry::new();
    registry.register("SineNode", sine_factory);
    registry.register("RandomDataNode", random_factory);
    registry.register("CSVNode", csv_factory);
    registry.register("MixerNode", mixer_factory);
    registry.register("FilterNode", filter_factory);
    registry.register("ViewerNode", viewer_factory);
    registry.register("MultiViewerNode", multi_viewer_factory);
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn every_shipped_type_is_registered() {
        let registry = builtin_registry();
        for tag in [
            "SineNode",
            "RandomDataNode",
            "CSVNode",
            "MixerNode",
            "FilterNode",
            "ViewerNode",
            "MultiViewerNode",
        ] {
            assert!(registry.contains(tag), "missing {tag}");
            if tag != "CSVNode" {
                let op = registry.create(tag, &json!({})).unwrap();
                assert_eq!(op.type_name(), tag);
            }
        }

        // CSVNode defaults to an empty path, which is valid too.
        let csv = registry.create("CSVNode", &json!({})).unwrap();
        assert_eq!(csv.type_name(), "CSVNode");
    }

    #[test]
    fn malformed_parameters_are_invalid() {
        let registry = builtin_registry();
        let result = registry.create("SineNode", &json!({ "samples": "not a number" }));
        assert!(matches!(
            result,
            Err(GraphError::InvalidParameter { type_tag, .. }) if type_tag == "SineNode"
        ));
    }

    #[test]
    fn unknown_parameters_are_ignored() {
        let registry = builtin_registry();
        let op = registry
            .create("SineNode", &json!({ "frequency": 10.0, "legacy": true }))
            .unwrap();
        assert_eq!(op.type_name(), "SineNode");
    }
}
