//! Zero-pole-gain and transfer-function representations.

use num_complex::Complex64;

/// A rational transfer function in factored zero-pole-gain form.
///
/// Zeros and poles with non-zero imaginary part are expected to appear in
/// conjugate pairs for real filters; [`zpk2tf`](crate::design::zpk2tf)
/// relies on this when it projects the expanded polynomials onto the reals.
/// Every analogue→digital transform in this crate preserves
/// `poles.len() >= zeros.len()`.
#[derive(Debug, Clone, PartialEq)]
pub struct Zpk {
    /// Zeros of the transfer function.
    pub zeros: Vec<Complex64>,
    /// Poles of the transfer function.
    pub poles: Vec<Complex64>,
    /// Real overall gain.
    pub gain: f64,
}

impl Zpk {
    /// Creates a zero-pole-gain triple.
    pub fn new(zeros: Vec<Complex64>, poles: Vec<Complex64>, gain: f64) -> Self {
        Self { zeros, poles, gain }
    }

    /// Relative degree `|poles| - |zeros|` (zero when there are more zeros).
    pub fn degree(&self) -> usize {
        self.poles.len().saturating_sub(self.zeros.len())
    }
}

/// A transfer function as two real coefficient sequences, highest-degree
/// term first. `b` is the numerator, `a` the denominator.
#[derive(Debug, Clone, PartialEq)]
pub struct Tf {
    /// Numerator coefficients.
    pub b: Vec<f64>,
    /// Denominator coefficients. `a[0]` must be non-zero.
    pub a: Vec<f64>,
}

impl Tf {
    /// Creates a transfer function from numerator and denominator coefficients.
    pub fn new(b: Vec<f64>, a: Vec<f64>) -> Self {
        Self { b, a }
    }
}

/// Product of `-r` over all roots. Empty products are 1, matching the
/// convention used by the gain-update formulas of the s-plane transforms.
pub(crate) fn neg_product(roots: &[Complex64]) -> Complex64 {
    roots
        .iter()
        .fold(Complex64::new(1.0, 0.0), |acc, &r| acc * -r)
}
