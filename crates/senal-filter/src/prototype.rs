//! Analogue lowpass prototypes at unit cutoff.
//!
//! Each prototype returns an analogue [`Zpk`] that the s-plane transforms
//! in [`transform`](crate::transform) reshape and the bilinear map turns
//! digital. Order zero returns the trivial prototype: empty zeros/poles
//! with the family's flat gain.

use std::f64::consts::PI;

use num_complex::Complex64;

use crate::zpk::{neg_product, Zpk};

/// Integer range `[start, stop)` with a signed step, like NumPy's `arange`.
fn arange(start: i64, stop: i64, step: i64) -> Vec<i64> {
    if step == 0 {
        return Vec::new();
    }
    let span = stop - start;
    let count = (span + step - step.signum()) / step;
    if count <= 0 {
        return Vec::new();
    }
    (0..count).map(|i| start + i * step).collect()
}

/// Butterworth analogue prototype: maximally flat passband.
///
/// Poles lie on the left half of the unit circle at
/// `p_k = -exp(iπ m_k / 2n)` for `m_k = -n+1, -n+3, …, n-1`; no zeros,
/// unit gain.
pub fn buttap(order: usize) -> Zpk {
    let n = order as i64;
    let poles: Vec<Complex64> = arange(-n + 1, n, 2)
        .iter()
        .map(|&m| {
            let theta = PI * m as f64 / (2 * n) as f64;
            -Complex64::new(0.0, theta).exp()
        })
        .collect();

    Zpk::new(Vec::new(), poles, 1.0)
}

/// Chebyshev type I analogue prototype: equiripple passband.
///
/// `ripple_db` is the peak-to-peak passband ripple in dB and must be
/// positive (validated by the design facade).
pub fn cheb1ap(order: usize, ripple_db: f64) -> Zpk {
    if order == 0 {
        // Even-order Chebyshev I has its ripple at DC.
        return Zpk::new(Vec::new(), Vec::new(), 10f64.powf(-ripple_db / 20.0));
    }

    let n = order as i64;
    let eps = (10f64.powf(0.1 * ripple_db) - 1.0).sqrt();
    let mu = (1.0 / eps).asinh() / order as f64;

    let poles: Vec<Complex64> = arange(-n + 1, n, 2)
        .iter()
        .map(|&m| {
            let theta = PI * m as f64 / (2 * n) as f64;
            -Complex64::new(mu, theta).sinh()
        })
        .collect();

    let mut gain = neg_product(&poles).re;
    if order % 2 == 0 {
        gain /= (1.0 + eps * eps).sqrt();
    }

    Zpk::new(Vec::new(), poles, gain)
}

/// Chebyshev type II analogue prototype: equiripple stopband.
///
/// `attenuation_db` is the minimum stopband attenuation in dB and must be
/// positive (validated by the design facade).
pub fn cheb2ap(order: usize, attenuation_db: f64) -> Zpk {
    if order == 0 {
        return Zpk::new(Vec::new(), Vec::new(), 1.0);
    }

    let n = order as i64;
    let de = 1.0 / (10f64.powf(0.1 * attenuation_db) - 1.0).sqrt();
    let mu = (1.0 / de).asinh() / order as f64;

    // Odd orders skip the middle index: a zero at infinity, not on the
    // imaginary axis.
    let zero_indices = if order % 2 == 1 {
        let mut m = arange(-n + 1, 0, 2);
        m.extend(arange(2, n, 2));
        m
    } else {
        arange(-n + 1, n, 2)
    };

    let zeros: Vec<Complex64> = zero_indices
        .iter()
        .map(|&m| {
            let theta = PI * m as f64 / (2 * n) as f64;
            -(Complex64::new(0.0, 1.0) / Complex64::new(theta.sin(), 0.0)).conj()
        })
        .collect();

    let poles: Vec<Complex64> = arange(-n + 1, n, 2)
        .iter()
        .map(|&m| {
            let theta = PI * m as f64 / (2 * n) as f64;
            let p = -Complex64::new(0.0, theta).exp();
            let warped = Complex64::new(mu.sinh() * p.re, mu.cosh() * p.im);
            warped.inv()
        })
        .collect();

    let gain = (neg_product(&poles) / neg_product(&zeros)).re;

    Zpk::new(zeros, poles, gain)
}
