//! Sine wave source.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};
use serde_json::json;
use senal_graph::{NodeContext, NodeError, Operator, PortLayout, Ui, Value, ValueKind};

/// Parameters of [`SineNode`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SineParams {
    /// Number of samples generated per frame.
    pub samples: usize,
    /// Tone frequency in Hz.
    pub frequency: f64,
    /// Peak amplitude.
    pub amplitude: f64,
    /// Phase offset in radians.
    pub phase: f64,
    /// Sampling frequency in Hz.
    pub fs: f64,
    /// DC offset added to every sample.
    pub offset: f64,
}

impl Default for SineParams {
    fn default() -> Self {
        Self {
            samples: 1000,
            frequency: 50.0,
            amplitude: 1.0,
            phase: 0.0,
            fs: 1000.0,
            offset: 0.0,
        }
    }
}

/// Source producing `amplitude · sin(2π·f·i/fs + phase) + offset`.
#[derive(Debug)]
pub struct SineNode {
    params: SineParams,
}

impl SineNode {
    /// Creates a sine source with the given parameters.
    pub fn new(params: SineParams) -> Self {
        Self { params }
    }

    fn generate(&self) -> Result<Vec<f64>, NodeError> {
        let p = &self.params;
        if p.fs <= 0.0 {
            return Err(NodeError::operator("sampling frequency must be positive"));
        }

        let scale = TAU * p.frequency / p.fs;
        Ok((0..p.samples)
            .map(|i| p.amplitude * (scale * i as f64 + p.phase).sin() + p.offset)
            .collect())
    }
}

impl Operator for SineNode {
    fn type_name(&self) -> &'static str {
        "SineNode"
    }

    fn label(&self) -> &'static str {
        "Sine wave"
    }

    fn ports(&self) -> PortLayout {
        PortLayout::new().output("Out", ValueKind::Signal)
    }

    fn parameters(&self) -> serde_json::Value {
        serde_json::to_value(&self.params).unwrap_or_else(|_| json!({}))
    }

    fn compute(&self, _port: &str, _ctx: &NodeContext<'_>) -> Result<Value, NodeError> {
        Ok(Value::signal(self.generate()?))
    }

    fn render(&mut self, ui: &mut dyn Ui, _ctx: &NodeContext<'_>) {
        ui.text("Parameters:");
        ui.input_usize("Number of samples", &mut self.params.samples);
        ui.slider_f64("f (Hz)", &mut self.params.frequency, 0.1, self.params.fs / 2.0);
        ui.input_f64("Amplitude", &mut self.params.amplitude);
        ui.slider_f64("Phase (rad)", &mut self.params.phase, 0.0, TAU);
        ui.input_f64("fs (Hz)", &mut self.params.fs);
        ui.input_f64("Offset", &mut self.params.offset);
    }
}
