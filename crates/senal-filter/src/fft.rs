//! Real↔complex FFT pair used by the block-convolution filter.

use num_complex::Complex64;
use rustfft::{Fft as RustFft, FftPlanner};
use std::sync::Arc;

/// Forward/inverse FFT pair planned once for a fixed size.
pub struct Fft {
    forward: Arc<dyn RustFft<f64>>,
    inverse: Arc<dyn RustFft<f64>>,
    size: usize,
}

impl Fft {
    /// Plans a forward/inverse pair for the given transform size.
    pub fn new(size: usize) -> Self {
        let mut planner = FftPlanner::new();
        let forward = planner.plan_fft_forward(size);
        let inverse = planner.plan_fft_inverse(size);

        Self {
            forward,
            inverse,
            size,
        }
    }

    /// Transform size.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Forward FFT of a real signal, zero-padded (or truncated) to the
    /// transform size. Returns the full complex spectrum.
    pub fn forward_real(&self, input: &[f64]) -> Vec<Complex64> {
        let mut buffer: Vec<Complex64> =
            input.iter().map(|&x| Complex64::new(x, 0.0)).collect();
        buffer.resize(self.size, Complex64::new(0.0, 0.0));

        self.forward.process(&mut buffer);
        buffer
    }

    /// Inverse FFT of a full spectrum, normalised by `1/N`. Returns the
    /// real part of the time-domain signal.
    pub fn inverse_real(&self, spectrum: &[Complex64]) -> Vec<f64> {
        let mut buffer = spectrum.to_vec();
        buffer.resize(self.size, Complex64::new(0.0, 0.0));

        self.inverse.process(&mut buffer);

        let scale = 1.0 / self.size as f64;
        buffer.iter().map(|c| c.re * scale).collect()
    }
}

/// Smallest power of two that is at least `n` (1 for `n = 0`).
pub fn next_pow2(n: usize) -> usize {
    let mut size = 1;
    while size < n {
        size <<= 1;
    }
    size
}
