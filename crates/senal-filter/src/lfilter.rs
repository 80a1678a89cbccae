//! Time-domain IIR filtering, Direct Form II Transposed.
//!
//! The transposed form keeps `N−1` state elements and updates them as
//!
//! ```text
//! y[k]      = s[0] + b[0]·x[k]
//! s[i]      = s[i+1] + b[i+1]·x[k] − a[i+1]·y[k]    (i = 0 … N−3)
//! s[N−2]    = b[N−1]·x[k] − a[N−1]·y[k]
//! ```
//!
//! Coefficients are normalised by `a[0]` first, and the shorter of the two
//! coefficient sequences is padded with trailing zeros so both have the
//! same length `N`.

use rayon::prelude::*;

use crate::error::FilterError;
use crate::zpk::Tf;

/// Normalises a transfer function for filtering: equal-length `b`/`a`
/// (trailing-zero padded) divided through by `a[0]`.
pub(crate) fn normalize(tf: &Tf) -> Result<(Vec<f64>, Vec<f64>), FilterError> {
    if tf.b.is_empty() || tf.a.is_empty() {
        return Err(FilterError::invalid(
            "transfer function coefficients must be non-empty",
        ));
    }
    let a0 = tf.a[0];
    if a0 == 0.0 {
        return Err(FilterError::invalid(
            "leading denominator coefficient must be non-zero",
        ));
    }

    let len = tf.b.len().max(tf.a.len());
    let mut b = tf.b.clone();
    let mut a = tf.a.clone();
    b.resize(len, 0.0);
    a.resize(len, 0.0);

    if a0 != 1.0 {
        for c in b.iter_mut().chain(a.iter_mut()) {
            *c /= a0;
        }
    }

    Ok((b, a))
}

/// Filters `x`, carrying `state` across calls.
///
/// A state shorter than `N−1` is zero-extended first, so an empty vector
/// is a valid "fresh" state. The state left behind can be fed to the next
/// call to continue a stream without discontinuity.
pub fn lfilter_with_state(
    tf: &Tf,
    x: &[f64],
    state: &mut Vec<f64>,
) -> Result<Vec<f64>, FilterError> {
    let (b, a) = normalize(tf)?;
    let n = b.len();
    let order = n - 1;

    if state.len() < order {
        state.resize(order, 0.0);
    }

    let mut y = Vec::with_capacity(x.len());
    for &xk in x {
        if order == 0 {
            y.push(b[0] * xk);
            continue;
        }

        let yk = state[0] + b[0] * xk;
        for i in 0..order - 1 {
            state[i] = state[i + 1] + b[i + 1] * xk - a[i + 1] * yk;
        }
        state[order - 1] = b[n - 1] * xk - a[n - 1] * yk;
        y.push(yk);
    }

    Ok(y)
}

/// Filters a batch with a zero initial state; the state is discarded.
pub fn lfilter(tf: &Tf, x: &[f64]) -> Result<Vec<f64>, FilterError> {
    let mut state = Vec::new();
    lfilter_with_state(tf, x, &mut state)
}

/// Filters independent channels in parallel, one state row per channel.
///
/// `channels` is row-major (channel × samples). Rows are disjoint, so
/// they are distributed across the rayon pool.
pub fn lfilter_multi(
    tf: &Tf,
    channels: &[Vec<f64>],
    states: &mut [Vec<f64>],
) -> Result<Vec<Vec<f64>>, FilterError> {
    if channels.len() != states.len() {
        return Err(FilterError::invalid(format!(
            "expected one state row per channel, got {} channels and {} states",
            channels.len(),
            states.len()
        )));
    }

    channels
        .par_iter()
        .zip(states.par_iter_mut())
        .map(|(x, state)| lfilter_with_state(tf, x, state))
        .collect()
}
