//! Filter design facade: prototype selection, prewarping, digital mapping,
//! ZPK↔TF conversion and frequency response.

use num_complex::Complex64;
use std::f64::consts::PI;

use crate::error::FilterError;
use crate::poly::real_poly;
use crate::prototype::{buttap, cheb1ap, cheb2ap};
use crate::transform::{bilinear, lp2bp, lp2bs, lp2hp, lp2lp};
use crate::zpk::{Tf, Zpk};

/// Analogue prototype family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    /// Maximally flat passband.
    Butterworth,
    /// Equiripple passband (takes a passband ripple in dB).
    Chebyshev1,
    /// Equiripple stopband (takes a stopband attenuation in dB).
    Chebyshev2,
}

impl Family {
    /// External integer tag used by the serialised graph format.
    pub fn index(self) -> i64 {
        match self {
            Family::Butterworth => 0,
            Family::Chebyshev1 => 1,
            Family::Chebyshev2 => 2,
        }
    }

    /// Family for an external integer tag.
    pub fn from_index(index: i64) -> Option<Self> {
        match index {
            0 => Some(Family::Butterworth),
            1 => Some(Family::Chebyshev1),
            2 => Some(Family::Chebyshev2),
            _ => None,
        }
    }

    /// Human-readable family name.
    pub fn name(self) -> &'static str {
        match self {
            Family::Butterworth => "Butterworth",
            Family::Chebyshev1 => "Chebyshev I",
            Family::Chebyshev2 => "Chebyshev II",
        }
    }
}

/// Filter response shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Pass below the cutoff.
    Lowpass,
    /// Pass above the cutoff.
    Highpass,
    /// Pass between two corner frequencies.
    Bandpass,
    /// Reject between two corner frequencies.
    Bandstop,
}

impl Mode {
    /// External integer tag used by the serialised graph format.
    pub fn index(self) -> i64 {
        match self {
            Mode::Lowpass => 0,
            Mode::Highpass => 1,
            Mode::Bandpass => 2,
            Mode::Bandstop => 3,
        }
    }

    /// Mode for an external integer tag.
    pub fn from_index(index: i64) -> Option<Self> {
        match index {
            0 => Some(Mode::Lowpass),
            1 => Some(Mode::Highpass),
            2 => Some(Mode::Bandpass),
            3 => Some(Mode::Bandstop),
            _ => None,
        }
    }

    /// True for the two-corner modes (bandpass, bandstop).
    pub fn is_band(self) -> bool {
        matches!(self, Mode::Bandpass | Mode::Bandstop)
    }

    /// Human-readable mode name.
    pub fn name(self) -> &'static str {
        match self {
            Mode::Lowpass => "Lowpass",
            Mode::Highpass => "Highpass",
            Mode::Bandpass => "Bandpass",
            Mode::Bandstop => "Bandstop",
        }
    }
}

/// Designs a digital lowpass or highpass IIR filter.
///
/// `ripple` is the passband ripple (Chebyshev I) or stopband attenuation
/// (Chebyshev II) in dB; Butterworth designs ignore it.
pub fn design(
    order: usize,
    fc: f64,
    fs: f64,
    family: Family,
    mode: Mode,
    ripple: Option<f64>,
) -> Result<Zpk, FilterError> {
    if mode.is_band() {
        return Err(FilterError::invalid(
            "bandpass/bandstop designs take two corner frequencies; use design_band",
        ));
    }
    if order < 1 {
        return Err(FilterError::invalid("filter order must be at least 1"));
    }
    if fs <= 0.0 {
        return Err(FilterError::invalid("sampling frequency must be positive"));
    }
    if fc <= 0.0 || fc >= fs / 2.0 {
        return Err(FilterError::invalid(format!(
            "cutoff frequency {fc} must lie in (0, {})",
            fs / 2.0
        )));
    }

    let analog = prototype(order, family, ripple)?;

    // Prewarp: normalise the cutoff to Nyquist, then design against fs = 2
    // so the bilinear map lands the corner exactly where asked.
    let fc = fc / (fs / 2.0);
    let fs = 2.0;
    let warped = 2.0 * fs * (PI * fc / fs).tan();

    let shaped = match mode {
        Mode::Lowpass => lp2lp(&analog, warped),
        Mode::Highpass => lp2hp(&analog, warped),
        Mode::Bandpass | Mode::Bandstop => unreachable!(),
    };

    Ok(bilinear(&shaped, fs))
}

/// Designs a digital bandpass or bandstop IIR filter between `flow` and
/// `fhigh`. The resulting digital filter has order `2·order`.
pub fn design_band(
    order: usize,
    flow: f64,
    fhigh: f64,
    fs: f64,
    family: Family,
    mode: Mode,
    ripple: Option<f64>,
) -> Result<Zpk, FilterError> {
    if !mode.is_band() {
        return Err(FilterError::invalid(
            "lowpass/highpass designs take a single cutoff; use design",
        ));
    }
    if order < 1 {
        return Err(FilterError::invalid("filter order must be at least 1"));
    }
    if fs <= 0.0 {
        return Err(FilterError::invalid("sampling frequency must be positive"));
    }
    if flow <= 0.0 {
        return Err(FilterError::invalid("lower corner frequency must be positive"));
    }
    if flow >= fhigh {
        return Err(FilterError::invalid(format!(
            "lower corner {flow} must be below upper corner {fhigh}"
        )));
    }
    if fhigh >= fs / 2.0 {
        return Err(FilterError::invalid(format!(
            "upper corner {fhigh} must be below Nyquist {}",
            fs / 2.0
        )));
    }

    let analog = prototype(order, family, ripple)?;

    // Centre and width are prewarped independently.
    let fc = (flow * fhigh).sqrt() / (fs / 2.0);
    let bw = (fhigh - flow) / (fs / 2.0);
    let fs = 2.0;
    let warped_fc = 2.0 * fs * (PI * fc / fs).tan();
    let warped_bw = 2.0 * fs * (PI * bw / fs).tan();

    let shaped = match mode {
        Mode::Bandpass => lp2bp(&analog, warped_fc, warped_bw),
        Mode::Bandstop => lp2bs(&analog, warped_fc, warped_bw),
        Mode::Lowpass | Mode::Highpass => unreachable!(),
    };

    Ok(bilinear(&shaped, fs))
}

fn prototype(order: usize, family: Family, ripple: Option<f64>) -> Result<Zpk, FilterError> {
    match family {
        Family::Butterworth => Ok(buttap(order)),
        Family::Chebyshev1 => {
            let rp = ripple.ok_or_else(|| {
                FilterError::invalid("Chebyshev I design requires a passband ripple in dB")
            })?;
            if rp <= 0.0 {
                return Err(FilterError::invalid("passband ripple must be positive"));
            }
            Ok(cheb1ap(order, rp))
        }
        Family::Chebyshev2 => {
            let rs = ripple.ok_or_else(|| {
                FilterError::invalid("Chebyshev II design requires a stopband attenuation in dB")
            })?;
            if rs <= 0.0 {
                return Err(FilterError::invalid("stopband attenuation must be positive"));
            }
            Ok(cheb2ap(order, rs))
        }
    }
}

/// Converts a zero-pole-gain triple to transfer-function coefficients.
///
/// `b = gain · Re(∏(x − zᵢ))`, `a = Re(∏(x − pᵢ))`; conjugate-pair zeros
/// and poles are assumed (see [`Zpk`]). The shorter sequence is padded
/// with leading zeros so `b.len() == a.len()`, which the time-domain
/// filter relies on.
pub fn zpk2tf(zpk: &Zpk) -> Tf {
    let mut b: Vec<f64> = real_poly(&zpk.zeros)
        .into_iter()
        .map(|c| c * zpk.gain)
        .collect();
    let mut a = real_poly(&zpk.poles);

    let len = b.len().max(a.len());
    if b.len() < len {
        let mut padded = vec![0.0; len - b.len()];
        padded.extend(b);
        b = padded;
    }
    if a.len() < len {
        let mut padded = vec![0.0; len - a.len()];
        padded.extend(a);
        a = padded;
    }

    Tf::new(b, a)
}

/// Complex frequency response at the angular frequencies `w` (radians per
/// sample): `h(ω) = gain · ∏(e^{iω} − zᵢ) / ∏(e^{iω} − pᵢ)`.
pub fn freqz(zpk: &Zpk, w: &[f64]) -> Vec<Complex64> {
    w.iter()
        .map(|&omega| {
            let e = Complex64::new(0.0, omega).exp();
            let num = zpk
                .zeros
                .iter()
                .fold(Complex64::new(1.0, 0.0), |acc, &z| acc * (e - z));
            let den = zpk
                .poles
                .iter()
                .fold(Complex64::new(1.0, 0.0), |acc, &p| acc * (e - p));
            num / den * zpk.gain
        })
        .collect()
}
