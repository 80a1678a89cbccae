//! Polynomial helpers: root-product expansion, evaluation, root finding.

use num_complex::Complex64;

/// Expands `∏ (x - rᵢ)` into polynomial coefficients, highest degree first.
///
/// The result is complex. Callers that know the roots come in conjugate
/// pairs should project with [`real_poly`] instead of dropping imaginary
/// parts ad hoc.
pub fn roots_to_poly(roots: &[Complex64]) -> Vec<Complex64> {
    let mut coeffs = vec![Complex64::new(1.0, 0.0)];

    for &root in roots {
        let mut next = vec![Complex64::new(0.0, 0.0); coeffs.len() + 1];
        for (i, &c) in coeffs.iter().enumerate() {
            next[i] += c;
            next[i + 1] -= root * c;
        }
        coeffs = next;
    }

    coeffs
}

/// Expands `∏ (x - rᵢ)` and takes the real part of each coefficient.
///
/// Precondition: complex roots appear in conjugate pairs, so the imaginary
/// parts of the expanded polynomial are rounding noise. With unpaired
/// complex roots the projection silently discards information.
pub fn real_poly(roots: &[Complex64]) -> Vec<f64> {
    roots_to_poly(roots).iter().map(|c| c.re).collect()
}

/// Evaluates a polynomial given highest-degree-first coefficients at `x`
/// using Horner's scheme.
pub fn polyval(coeffs: &[f64], x: Complex64) -> Complex64 {
    coeffs
        .iter()
        .fold(Complex64::new(0.0, 0.0), |acc, &c| acc * x + c)
}

/// Finds all complex roots of a real polynomial (highest degree first)
/// with the Durand-Kerner simultaneous iteration.
///
/// Accuracy is more than sufficient for the yes/no stability gate in the
/// FFT filter; this is not a general-purpose polished root finder.
pub fn poly_roots(coeffs: &[f64]) -> Vec<Complex64> {
    // Strip leading zeros; they only lower the effective degree.
    let first = coeffs.iter().position(|&c| c != 0.0);
    let coeffs = match first {
        Some(i) => &coeffs[i..],
        None => return Vec::new(),
    };
    let degree = coeffs.len() - 1;
    if degree == 0 {
        return Vec::new();
    }

    // Monic complex coefficients.
    let lead = coeffs[0];
    let monic: Vec<Complex64> = coeffs
        .iter()
        .map(|&c| Complex64::new(c / lead, 0.0))
        .collect();

    let eval = |x: Complex64| {
        monic
            .iter()
            .fold(Complex64::new(0.0, 0.0), |acc, &c| acc * x + c)
    };

    // Standard non-real starting points spread around the unit circle.
    let seed = Complex64::new(0.4, 0.9);
    let mut roots: Vec<Complex64> = (0..degree).map(|k| seed.powu(k as u32 + 1)).collect();

    const MAX_ITERATIONS: usize = 200;
    const TOLERANCE: f64 = 1e-12;

    for _ in 0..MAX_ITERATIONS {
        let mut delta: f64 = 0.0;

        for k in 0..degree {
            let mut denom = Complex64::new(1.0, 0.0);
            for j in 0..degree {
                if j != k {
                    denom *= roots[k] - roots[j];
                }
            }
            if denom.norm() == 0.0 {
                // Coincident estimates; nudge apart and retry next sweep.
                roots[k] += Complex64::new(1e-6, 1e-6);
                continue;
            }
            let step = eval(roots[k]) / denom;
            roots[k] -= step;
            delta = delta.max(step.norm());
        }

        if delta < TOLERANCE {
            break;
        }
    }

    roots
}
