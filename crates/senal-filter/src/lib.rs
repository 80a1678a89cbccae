//! Señal filter engine - digital IIR design and filtering
//!
//! This crate implements the numeric half of the Señal playground:
//!
//! - Analogue lowpass prototypes at unit cutoff ([`buttap`], [`cheb1ap`],
//!   [`cheb2ap`])
//! - S-plane frequency transforms and the bilinear map
//!   ([`lp2lp`], [`lp2hp`], [`lp2bp`], [`lp2bs`], [`bilinear`])
//! - A design facade with prewarping and validation ([`design`],
//!   [`design_band`]), plus [`zpk2tf`] and [`freqz`]
//! - Streaming Direct Form II Transposed filtering ([`lfilter`],
//!   [`lfilter_with_state`], [`lfilter_multi`])
//! - FFT block filtering over a truncated effective impulse response
//!   ([`fft_filter`])
//!
//! # Example
//!
//! ```rust
//! use senal_filter::{design, lfilter, zpk2tf, Family, Mode};
//!
//! let zpk = design(2, 100.0, 1000.0, Family::Butterworth, Mode::Lowpass, None)?;
//! let tf = zpk2tf(&zpk);
//! let smoothed = lfilter(&tf, &[1.0, 0.0, 0.0, 0.0])?;
//! assert_eq!(smoothed.len(), 4);
//! # Ok::<(), senal_filter::FilterError>(())
//! ```

pub mod design;
pub mod error;
pub mod fft;
pub mod fft_filter;
pub mod lfilter;
pub mod poly;
pub mod prototype;
pub mod transform;
pub mod zpk;

pub use design::{design, design_band, freqz, zpk2tf, Family, Mode};
pub use error::FilterError;
pub use fft::{next_pow2, Fft};
pub use fft_filter::{
    check_stable, effective_ir, fast_convolve, fft_filter, fft_filter_with, DEFAULT_IR_EPSILON,
    DEFAULT_IR_MAX_LEN,
};
pub use lfilter::{lfilter, lfilter_multi, lfilter_with_state};
pub use poly::{poly_roots, polyval, real_poly, roots_to_poly};
pub use prototype::{buttap, cheb1ap, cheb2ap};
pub use transform::{bilinear, lp2bp, lp2bs, lp2hp, lp2lp};
pub use zpk::{Tf, Zpk};

pub use num_complex::Complex64;
