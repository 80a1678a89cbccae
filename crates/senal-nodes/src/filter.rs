//! IIR filter operator bridging the graph to the filter engine.

use serde::{Deserialize, Serialize};
use serde_json::json;
use senal_filter::{design, design_band, lfilter, zpk2tf, Family, Mode};
use senal_graph::{NodeContext, NodeError, Operator, PortLayout, Ui, Value, ValueKind};

/// Parameters of [`FilterNode`]. `mode` and `type` use the external
/// integer tags (0=lowpass…3=bandstop, 0=Butterworth…2=Chebyshev II).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterParams {
    /// Response shape tag.
    pub mode: i64,
    /// Prototype family tag.
    #[serde(rename = "type")]
    pub family: i64,
    /// Filter order (band designs double it).
    pub order: usize,
    /// Cutoff frequency in Hz; lower corner for band designs.
    pub fc: f64,
    /// Upper corner frequency in Hz, used by band designs only.
    pub fc2: f64,
    /// Sampling frequency in Hz.
    pub fs: f64,
    /// Chebyshev ripple/attenuation in dB; Butterworth ignores it.
    pub ripple: f64,
}

impl Default for FilterParams {
    fn default() -> Self {
        Self {
            mode: 0,
            family: 0,
            order: 2,
            fc: 100.0,
            fc2: 200.0,
            fs: 1000.0,
            ripple: 3.0,
        }
    }
}

/// Filters its input signal with a freshly designed digital IIR filter.
#[derive(Debug)]
pub struct FilterNode {
    params: FilterParams,
}

impl FilterNode {
    /// Creates a filter operator with the given design parameters.
    pub fn new(params: FilterParams) -> Self {
        Self { params }
    }

    fn design(&self) -> Result<senal_filter::Zpk, NodeError> {
        let p = &self.params;
        let mode = Mode::from_index(p.mode)
            .ok_or_else(|| NodeError::operator(format!("unknown filter mode tag {}", p.mode)))?;
        let family = Family::from_index(p.family)
            .ok_or_else(|| NodeError::operator(format!("unknown filter type tag {}", p.family)))?;
        let ripple = match family {
            Family::Butterworth => None,
            Family::Chebyshev1 | Family::Chebyshev2 => Some(p.ripple),
        };

        let zpk = if mode.is_band() {
            design_band(p.order, p.fc, p.fc2, p.fs, family, mode, ripple)
        } else {
            design(p.order, p.fc, p.fs, family, mode, ripple)
        };
        zpk.map_err(NodeError::operator)
    }
}

impl Operator for FilterNode {
    fn type_name(&self) -> &'static str {
        "FilterNode"
    }

    fn label(&self) -> &'static str {
        "Filter"
    }

    fn ports(&self) -> PortLayout {
        PortLayout::new()
            .input("In", Value::signal(Vec::new()))
            .output("Out", ValueKind::Signal)
    }

    fn parameters(&self) -> serde_json::Value {
        serde_json::to_value(&self.params).unwrap_or_else(|_| json!({}))
    }

    fn compute(&self, _port: &str, ctx: &NodeContext<'_>) -> Result<Value, NodeError> {
        let input = ctx.input("In")?;
        let samples = input.as_signal().unwrap_or(&[]);

        let zpk = self.design()?;
        let tf = zpk2tf(&zpk);
        let filtered = lfilter(&tf, samples).map_err(NodeError::operator)?;

        Ok(Value::signal(filtered))
    }

    fn render(&mut self, ui: &mut dyn Ui, _ctx: &NodeContext<'_>) {
        const FAMILIES: [&str; 3] = ["Butterworth", "Chebyshev I", "Chebyshev II"];
        const MODES: [&str; 4] = ["Lowpass", "Highpass", "Bandpass", "Bandstop"];

        ui.text("Parameters:");

        let mut family = self.params.family.clamp(0, 2) as usize;
        if ui.combo("Type", &mut family, &FAMILIES) {
            self.params.family = family as i64;
        }

        let mut mode = self.params.mode.clamp(0, 3) as usize;
        if ui.combo("Mode", &mut mode, &MODES) {
            self.params.mode = mode as i64;
        }

        ui.slider_usize("Order", &mut self.params.order, 1, 10);

        let nyquist = self.params.fs / 2.0;
        if self.params.mode == 2 || self.params.mode == 3 {
            ui.slider_f64("f low (Hz)", &mut self.params.fc, 1.0, nyquist);
            ui.slider_f64("f high (Hz)", &mut self.params.fc2, self.params.fc, nyquist);
        } else {
            ui.slider_f64("fc (Hz)", &mut self.params.fc, 1.0, nyquist);
        }

        if self.params.family != 0 {
            ui.input_f64("Ripple (dB)", &mut self.params.ripple);
        }

        ui.slider_f64("fs (Hz)", &mut self.params.fs, 10.0, 10000.0);
    }
}
