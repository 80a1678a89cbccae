//! FFT-based block filtering via effective impulse response truncation.
//!
//! An IIR filter has an infinite impulse response, but a stable one decays
//! below any threshold eventually. [`effective_ir`] filters a Kronecker
//! delta and truncates the tail below `epsilon`; [`fft_filter`] then runs
//! a single zero-padded FFT convolution against the input. Unstable
//! transfer functions never decay, so they are rejected up front.

use crate::error::FilterError;
use crate::fft::{next_pow2, Fft};
use crate::lfilter::{lfilter, normalize};
use crate::poly::poly_roots;
use crate::zpk::Tf;

/// Truncation threshold for the effective impulse response.
pub const DEFAULT_IR_EPSILON: f64 = 1e-12;

/// Maximum effective impulse response length in samples.
pub const DEFAULT_IR_MAX_LEN: usize = 10_000;

/// Verifies that every pole of the normalised denominator lies strictly
/// inside the unit circle.
pub fn check_stable(tf: &Tf) -> Result<(), FilterError> {
    let (_, a) = normalize(tf)?;
    for root in poly_roots(&a) {
        let magnitude = root.norm();
        if magnitude >= 1.0 {
            return Err(FilterError::Unstable { magnitude });
        }
    }
    Ok(())
}

/// Computes the effective finite impulse response of an IIR filter.
///
/// The delta is filtered through at most `max_len` samples, then the
/// response is truncated after the last sample with `|h| >= epsilon`.
/// If no tail sample clears the threshold the full response is returned.
pub fn effective_ir(tf: &Tf, epsilon: f64, max_len: usize) -> Result<Vec<f64>, FilterError> {
    if max_len == 0 {
        return Err(FilterError::invalid(
            "impulse response length must be at least 1",
        ));
    }

    let mut impulse = vec![0.0; max_len];
    impulse[0] = 1.0;
    let mut ir = lfilter(tf, &impulse)?;

    let mut length = ir.len();
    for i in (1..ir.len()).rev() {
        if ir[i].abs() >= epsilon {
            length = i + 1;
            break;
        }
    }
    ir.truncate(length);

    Ok(ir)
}

/// Linear convolution of two real signals via zero-padded FFTs.
///
/// The result has length `f.len() + g.len() - 1`; both inputs are padded
/// to the next power of two at least that long.
pub fn fast_convolve(f: &[f64], g: &[f64]) -> Vec<f64> {
    if f.is_empty() || g.is_empty() {
        return Vec::new();
    }

    let out_len = f.len() + g.len() - 1;
    let fft = Fft::new(next_pow2(out_len));

    let mut spectrum = fft.forward_real(f);
    let other = fft.forward_real(g);
    for (a, b) in spectrum.iter_mut().zip(&other) {
        *a *= *b;
    }

    let mut y = fft.inverse_real(&spectrum);
    y.truncate(out_len);
    y
}

/// FFT-filters `x` with the default truncation parameters.
pub fn fft_filter(tf: &Tf, x: &[f64]) -> Result<Vec<f64>, FilterError> {
    fft_filter_with(tf, x, DEFAULT_IR_EPSILON, DEFAULT_IR_MAX_LEN)
}

/// FFT-filters `x`, convolving its effective impulse response and
/// truncating to the input length.
///
/// Fails with [`FilterError::Unstable`] when the denominator has a pole
/// on or outside the unit circle.
pub fn fft_filter_with(
    tf: &Tf,
    x: &[f64],
    epsilon: f64,
    max_len: usize,
) -> Result<Vec<f64>, FilterError> {
    check_stable(tf)?;

    let ir = effective_ir(tf, epsilon, max_len)?;
    let mut y = fast_convolve(&ir, x);
    y.truncate(x.len());
    Ok(y)
}
