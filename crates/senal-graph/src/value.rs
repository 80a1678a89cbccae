//! Typed values carried between ports.
//!
//! Ports are statically tagged with a [`ValueKind`]; connections require
//! exact tag equality. `Signal` is the only kind the shipped operators
//! use, but the core stays generic over the closed kind set.

use std::fmt;
use std::sync::Arc;

/// Tag identifying the element type a port carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// A sampled real-valued signal (`f64` array).
    Signal,
    /// A single real number.
    Scalar,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Signal => write!(f, "signal"),
            ValueKind::Scalar => write!(f, "scalar"),
        }
    }
}

/// A value produced by an output port or stored as an input default.
///
/// Signals are shared behind an `Arc`, so handing a cached frame value to
/// several sinks never copies the sample data.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A sampled real-valued signal.
    Signal(Arc<Vec<f64>>),
    /// A single real number.
    Scalar(f64),
}

impl Value {
    /// Wraps a sample buffer as a signal value.
    pub fn signal(samples: Vec<f64>) -> Self {
        Value::Signal(Arc::new(samples))
    }

    /// Wraps a number as a scalar value.
    pub fn scalar(value: f64) -> Self {
        Value::Scalar(value)
    }

    /// The empty/neutral value of a kind: a zero-length signal or 0.0.
    pub fn empty(kind: ValueKind) -> Self {
        match kind {
            ValueKind::Signal => Value::Signal(Arc::new(Vec::new())),
            ValueKind::Scalar => Value::Scalar(0.0),
        }
    }

    /// The kind tag of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Signal(_) => ValueKind::Signal,
            Value::Scalar(_) => ValueKind::Scalar,
        }
    }

    /// Borrows the samples if this is a signal.
    pub fn as_signal(&self) -> Option<&[f64]> {
        match self {
            Value::Signal(samples) => Some(samples),
            Value::Scalar(_) => None,
        }
    }

    /// Returns the number if this is a scalar.
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Value::Scalar(value) => Some(*value),
            Value::Signal(_) => None,
        }
    }
}
