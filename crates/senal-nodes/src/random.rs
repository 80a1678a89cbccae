//! Uniform random data source.

use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::json;
use senal_graph::{NodeContext, NodeError, Operator, PortLayout, Ui, Value, ValueKind};

/// Parameters of [`RandomDataNode`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomParams {
    /// Number of samples to generate.
    pub samples: usize,
}

impl Default for RandomParams {
    fn default() -> Self {
        Self { samples: 1000 }
    }
}

/// Source holding a buffer of uniform samples in `[-1, 1]`.
///
/// The buffer is drawn once at construction and only redrawn when the
/// sample count is edited, so repeated frames see the same data.
#[derive(Debug)]
pub struct RandomDataNode {
    samples: usize,
    data: Vec<f64>,
}

impl RandomDataNode {
    /// Creates the source and draws its buffer.
    pub fn new(params: RandomParams) -> Self {
        Self {
            samples: params.samples,
            data: draw(params.samples),
        }
    }
}

fn draw(samples: usize) -> Vec<f64> {
    let mut rng = rand::thread_rng();
    (0..samples).map(|_| rng.gen_range(-1.0..=1.0)).collect()
}

impl Operator for RandomDataNode {
    fn type_name(&self) -> &'static str {
        "RandomDataNode"
    }

    fn label(&self) -> &'static str {
        "Random data"
    }

    fn ports(&self) -> PortLayout {
        PortLayout::new().output("Out", ValueKind::Signal)
    }

    fn parameters(&self) -> serde_json::Value {
        json!({ "samples": self.samples })
    }

    fn compute(&self, _port: &str, _ctx: &NodeContext<'_>) -> Result<Value, NodeError> {
        Ok(Value::signal(self.data.clone()))
    }

    fn render(&mut self, ui: &mut dyn Ui, _ctx: &NodeContext<'_>) {
        if ui.input_usize("Number of samples", &mut self.samples) {
            self.data = draw(self.samples);
        }
    }
}
