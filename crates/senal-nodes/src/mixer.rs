//! Weighted signal mixer.

use serde::{Deserialize, Serialize};
use serde_json::json;
use senal_graph::{NodeContext, NodeError, Operator, PortLayout, Ui, Value, ValueKind};

/// Parameters of [`MixerNode`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MixerParams {
    /// Number of input ports.
    pub inputs: usize,
    /// Per-input gains; filled with 1.0 when absent or short.
    pub gains: Vec<f64>,
}

impl Default for MixerParams {
    fn default() -> Self {
        Self {
            inputs: 2,
            gains: Vec::new(),
        }
    }
}

/// Sums `k` input signals with per-input gains.
///
/// Inputs shorter than the longest one are treated as zero-padded, so the
/// output always has the length of the longest connected input.
#[derive(Debug)]
pub struct MixerNode {
    inputs: usize,
    gains: Vec<f64>,
}

impl MixerNode {
    /// Creates a mixer with `inputs` ports named `In 1…In k`.
    pub fn new(params: MixerParams) -> Self {
        let mut gains = params.gains;
        gains.resize(params.inputs, 1.0);
        Self {
            inputs: params.inputs,
            gains,
        }
    }

    fn input_name(index: usize) -> String {
        format!("In {}", index + 1)
    }
}

impl Operator for MixerNode {
    fn type_name(&self) -> &'static str {
        "MixerNode"
    }

    fn label(&self) -> &'static str {
        "Mixer"
    }

    fn ports(&self) -> PortLayout {
        let mut layout = PortLayout::new();
        for i in 0..self.inputs {
            layout = layout.input(Self::input_name(i), Value::signal(Vec::new()));
        }
        layout.output("Out", ValueKind::Signal)
    }

    fn parameters(&self) -> serde_json::Value {
        json!({ "inputs": self.inputs, "gains": self.gains })
    }

    fn compute(&self, _port: &str, ctx: &NodeContext<'_>) -> Result<Value, NodeError> {
        let mut signals = Vec::with_capacity(self.inputs);
        for i in 0..self.inputs {
            signals.push(ctx.input(&Self::input_name(i))?);
        }

        let longest = signals
            .iter()
            .filter_map(|v| v.as_signal())
            .map(<[f64]>::len)
            .max()
            .unwrap_or(0);

        let mut mixed = vec![0.0; longest];
        for (value, &gain) in signals.iter().zip(&self.gains) {
            let Some(samples) = value.as_signal() else {
                continue;
            };
            for (acc, &sample) in mixed.iter_mut().zip(samples) {
                *acc += gain * sample;
            }
        }

        Ok(Value::signal(mixed))
    }

    fn render(&mut self, ui: &mut dyn Ui, _ctx: &NodeContext<'_>) {
        for (i, gain) in self.gains.iter_mut().enumerate() {
            ui.input_f64(&format!("Gain {}", i + 1), gain);
        }
    }
}
