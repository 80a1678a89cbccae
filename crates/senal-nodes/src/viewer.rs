//! Display sinks: single and multi-input viewers.
//!
//! Viewers have no outputs; their render pull is the root request that
//! drives evaluation of everything upstream.

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;
use senal_graph::{NodeContext, Operator, PortLayout, Ui, Value};

/// Parameters of [`ViewerNode`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerParams {
    /// Sampling frequency used to scale the time axis.
    pub fs: f64,
}

impl Default for ViewerParams {
    fn default() -> Self {
        Self { fs: 1000.0 }
    }
}

/// Plots its single input signal.
#[derive(Debug)]
pub struct ViewerNode {
    params: ViewerParams,
}

impl ViewerNode {
    /// Creates a viewer.
    pub fn new(params: ViewerParams) -> Self {
        Self { params }
    }
}

impl Operator for ViewerNode {
    fn type_name(&self) -> &'static str {
        "ViewerNode"
    }

    fn label(&self) -> &'static str {
        "Viewer"
    }

    fn ports(&self) -> PortLayout {
        PortLayout::new().input("In", Value::signal(Vec::new()))
    }

    fn parameters(&self) -> serde_json::Value {
        serde_json::to_value(&self.params).unwrap_or_else(|_| json!({}))
    }

    fn render(&mut self, ui: &mut dyn Ui, ctx: &NodeContext<'_>) {
        match ctx.input("In") {
            Ok(value) => match value.as_signal() {
                Some(samples) if !samples.is_empty() => ui.plot("Time plot", samples),
                _ => ui.text("No data connected."),
            },
            Err(error) => {
                warn!(node = ctx.node_name(), %error, "viewer failed to pull its input");
                ui.text("No data connected.");
            }
        }
    }
}

/// Parameters of [`MultiViewerNode`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MultiViewerParams {
    /// Number of input ports.
    pub inputs: usize,
    /// Sampling frequency used to scale the time axis.
    pub fs: f64,
}

impl Default for MultiViewerParams {
    fn default() -> Self {
        Self {
            inputs: 2,
            fs: 1000.0,
        }
    }
}

/// Plots up to `k` input signals in one view.
#[derive(Debug)]
pub struct MultiViewerNode {
    params: MultiViewerParams,
}

impl MultiViewerNode {
    /// Creates a multi-viewer with `inputs` ports named `In 1…In k`.
    pub fn new(params: MultiViewerParams) -> Self {
        Self { params }
    }

    fn input_name(index: usize) -> String {
        format!("In {}", index + 1)
    }
}

impl Operator for MultiViewerNode {
    fn type_name(&self) -> &'static str {
        "MultiViewerNode"
    }

    fn label(&self) -> &'static str {
        "Multi-Viewer"
    }

    fn ports(&self) -> PortLayout {
        let mut layout = PortLayout::new();
        for i in 0..self.params.inputs {
            layout = layout.input(Self::input_name(i), Value::signal(Vec::new()));
        }
        layout
    }

    fn parameters(&self) -> serde_json::Value {
        serde_json::to_value(&self.params).unwrap_or_else(|_| json!({}))
    }

    fn render(&mut self, ui: &mut dyn Ui, ctx: &NodeContext<'_>) {
        for i in 0..self.params.inputs {
            let name = Self::input_name(i);
            match ctx.input(&name) {
                Ok(value) => {
                    if let Some(samples) = value.as_signal() {
                        if !samples.is_empty() {
                            ui.plot(&format!("Input {}", i + 1), samples);
                        }
                    }
                }
                Err(error) => {
                    warn!(node = ctx.node_name(), port = %name, %error, "multi-viewer failed to pull an input");
                }
            }
        }
    }
}
