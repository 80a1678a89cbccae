//! S-plane frequency transforms and the bilinear s→z map.
//!
//! All functions take a unit-cutoff analogue prototype (or its already
//! transformed descendant) and return a new [`Zpk`]; the input is never
//! mutated. Gain updates follow the standard change-of-variable algebra;
//! the empty product is 1.

use num_complex::Complex64;

use crate::zpk::{neg_product, Zpk};

/// Lowpass→lowpass: scales every root by the target cutoff `wc`.
pub fn lp2lp(zpk: &Zpk, wc: f64) -> Zpk {
    let zeros = zpk.zeros.iter().map(|&z| z * wc).collect();
    let poles = zpk.poles.iter().map(|&p| p * wc).collect();
    let gain = zpk.gain * wc.powi(zpk.degree() as i32);

    Zpk::new(zeros, poles, gain)
}

/// Lowpass→highpass: inverts every root about `wc` and fills the relative
/// degree with zeros at the origin.
pub fn lp2hp(zpk: &Zpk, wc: f64) -> Zpk {
    let degree = zpk.degree();

    let mut zeros: Vec<Complex64> = zpk.zeros.iter().map(|&z| wc / z).collect();
    zeros.extend(std::iter::repeat(Complex64::new(0.0, 0.0)).take(degree));
    let poles: Vec<Complex64> = zpk.poles.iter().map(|&p| wc / p).collect();

    let gain = zpk.gain * (neg_product(&zpk.zeros) / neg_product(&zpk.poles)).re;

    Zpk::new(zeros, poles, gain)
}

/// Lowpass→bandpass: splits each root `x` into the pair
/// `x·bw/2 ± √((x·bw/2)² − wc²)` and fills the relative degree with zeros
/// at the origin.
pub fn lp2bp(zpk: &Zpk, wc: f64, bw: f64) -> Zpk {
    let degree = zpk.degree();

    let split = |roots: &[Complex64]| -> Vec<Complex64> {
        let scaled: Vec<Complex64> = roots.iter().map(|&x| x * (bw / 2.0)).collect();
        let terms: Vec<Complex64> = scaled
            .iter()
            .map(|&x| (x * x - wc * wc).sqrt())
            .collect();
        let mut out: Vec<Complex64> =
            scaled.iter().zip(&terms).map(|(&x, &t)| x + t).collect();
        out.extend(scaled.iter().zip(&terms).map(|(&x, &t)| x - t));
        out
    };

    let mut zeros = split(&zpk.zeros);
    zeros.extend(std::iter::repeat(Complex64::new(0.0, 0.0)).take(degree));
    let poles = split(&zpk.poles);

    let gain = zpk.gain * bw.powi(degree as i32);

    Zpk::new(zeros, poles, gain)
}

/// Lowpass→bandstop: splits each inverted root `(bw/2)/x` like [`lp2bp`]
/// and appends `degree` zero pairs at `±i·wc` (one pair per missing zero,
/// so `2·degree` zeros in total).
pub fn lp2bs(zpk: &Zpk, wc: f64, bw: f64) -> Zpk {
    let degree = zpk.degree();

    let split = |roots: &[Complex64]| -> Vec<Complex64> {
        let inverted: Vec<Complex64> = roots.iter().map(|&x| (bw / 2.0) / x).collect();
        let terms: Vec<Complex64> = inverted
            .iter()
            .map(|&x| (x * x - wc * wc).sqrt())
            .collect();
        let mut out: Vec<Complex64> =
            inverted.iter().zip(&terms).map(|(&x, &t)| x + t).collect();
        out.extend(inverted.iter().zip(&terms).map(|(&x, &t)| x - t));
        out
    };

    let mut zeros = split(&zpk.zeros);
    zeros.extend(std::iter::repeat(Complex64::new(0.0, wc)).take(degree));
    zeros.extend(std::iter::repeat(Complex64::new(0.0, -wc)).take(degree));
    let poles = split(&zpk.poles);

    let gain = zpk.gain * (neg_product(&zpk.zeros) / neg_product(&zpk.poles)).re;

    Zpk::new(zeros, poles, gain)
}

/// Bilinear transform `z = (2fs + s) / (2fs − s)`.
///
/// The relative degree becomes zeros at `z = -1` (the image of s = ∞) and
/// the gain picks up `Re(∏(2fs − z) / ∏(2fs − p))` over the analogue roots.
pub fn bilinear(zpk: &Zpk, fs: f64) -> Zpk {
    let q = 2.0 * fs;
    let degree = zpk.degree();

    let mut zeros: Vec<Complex64> = zpk.zeros.iter().map(|&z| (q + z) / (q - z)).collect();
    zeros.extend(std::iter::repeat(Complex64::new(-1.0, 0.0)).take(degree));
    let poles: Vec<Complex64> = zpk.poles.iter().map(|&p| (q + p) / (q - p)).collect();

    let num = zpk
        .zeros
        .iter()
        .fold(Complex64::new(1.0, 0.0), |acc, &z| acc * (q - z));
    let den = zpk
        .poles
        .iter()
        .fold(Complex64::new(1.0, 0.0), |acc, &p| acc * (q - p));
    let gain = zpk.gain * (num / den).re;

    Zpk::new(zeros, poles, gain)
}
