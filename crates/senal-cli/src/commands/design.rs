//! Filter design command: print ZPK, coefficients, and optionally a
//! sampled magnitude response.

use anyhow::Context;
use clap::{Args, ValueEnum};
use senal_filter::{design, design_band, freqz, zpk2tf, Family, Mode};

/// Prototype families selectable from the CLI.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum CliFamily {
    #[default]
    Butter,
    Cheb1,
    Cheb2,
}

impl From<CliFamily> for Family {
    fn from(f: CliFamily) -> Self {
        match f {
            CliFamily::Butter => Family::Butterworth,
            CliFamily::Cheb1 => Family::Chebyshev1,
            CliFamily::Cheb2 => Family::Chebyshev2,
        }
    }
}

/// Response shapes selectable from the CLI.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum CliMode {
    #[default]
    Lowpass,
    Highpass,
    Bandpass,
    Bandstop,
}

impl From<CliMode> for Mode {
    fn from(m: CliMode) -> Self {
        match m {
            CliMode::Lowpass => Mode::Lowpass,
            CliMode::Highpass => Mode::Highpass,
            CliMode::Bandpass => Mode::Bandpass,
            CliMode::Bandstop => Mode::Bandstop,
        }
    }
}

#[derive(Args)]
pub struct DesignArgs {
    /// Filter order (band designs double it)
    #[arg(long, default_value = "2")]
    order: usize,

    /// Prototype family
    #[arg(long, value_enum, default_value_t = CliFamily::Butter)]
    family: CliFamily,

    /// Response shape
    #[arg(long, value_enum, default_value_t = CliMode::Lowpass)]
    mode: CliMode,

    /// Cutoff frequency in Hz (lower corner for band designs)
    #[arg(long, default_value = "100.0")]
    fc: f64,

    /// Upper corner frequency in Hz (band designs only)
    #[arg(long)]
    fc2: Option<f64>,

    /// Sampling frequency in Hz
    #[arg(long, default_value = "1000.0")]
    fs: f64,

    /// Chebyshev ripple/attenuation in dB
    #[arg(long)]
    ripple: Option<f64>,

    /// Print the magnitude response at this many points up to Nyquist
    #[arg(long)]
    response: Option<usize>,
}

pub fn run(args: DesignArgs) -> anyhow::Result<()> {
    let family: Family = args.family.into();
    let mode: Mode = args.mode.into();

    let ripple = match family {
        Family::Butterworth => None,
        Family::Chebyshev1 | Family::Chebyshev2 => Some(args.ripple.unwrap_or(3.0)),
    };

    let zpk = if mode.is_band() {
        let fc2 = args
            .fc2
            .context("band designs need --fc2 for the upper corner")?;
        design_band(args.order, args.fc, fc2, args.fs, family, mode, ripple)?
    } else {
        design(args.order, args.fc, args.fs, family, mode, ripple)?
    };

    println!("{} {} design, order {}", family.name(), mode.name(), args.order);
    println!("k: {:.10}", zpk.gain);
    println!("z: {:?}", zpk.zeros);
    println!("p: {:?}", zpk.poles);

    let tf = zpk2tf(&zpk);
    println!("b: {:?}", tf.b);
    println!("a: {:?}", tf.a);

    if let Some(points) = args.response {
        let w: Vec<f64> = (0..points)
            .map(|i| std::f64::consts::PI * i as f64 / points as f64)
            .collect();
        let response = freqz(&zpk, &w);

        println!("frequency_hz,magnitude_db");
        for (omega, h) in w.iter().zip(&response) {
            let hz = omega * args.fs / (2.0 * std::f64::consts::PI);
            let db = 20.0 * h.norm().max(1e-12).log10();
            println!("{hz:.3},{db:.3}");
        }
    }

    Ok(())
}
