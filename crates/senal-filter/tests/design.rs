//! End-to-end tests for the design → coefficients → filtering pipeline.

use senal_filter::{
    design, effective_ir, fft_filter, freqz, lfilter, polyval, zpk2tf, Complex64, Family, Mode,
    DEFAULT_IR_EPSILON, DEFAULT_IR_MAX_LEN,
};

fn sine(samples: usize, frequency: f64, fs: f64) -> Vec<f64> {
    (0..samples)
        .map(|i| (2.0 * std::f64::consts::PI * frequency * i as f64 / fs).sin())
        .collect()
}

#[test]
fn butterworth_lowpass_designs_are_stable_across_orders() {
    for order in 1..=8 {
        for fc in [10.0, 100.0, 250.0, 450.0] {
            let zpk = design(order, fc, 1000.0, Family::Butterworth, Mode::Lowpass, None)
                .unwrap_or_else(|e| panic!("order {order}, fc {fc}: {e}"));

            assert_eq!(zpk.zeros.len(), order);
            assert_eq!(zpk.poles.len(), order);
            for p in &zpk.poles {
                assert!(
                    p.norm() < 1.0,
                    "order {order}, fc {fc}: pole {p} not inside unit circle"
                );
            }
        }
    }
}

#[test]
fn lowpass_attenuates_a_tone_far_above_cutoff() {
    let fs = 1000.0;
    let zpk = design(2, 100.0, fs, Family::Butterworth, Mode::Lowpass, None).unwrap();
    let tf = zpk2tf(&zpk);

    let x = sine(400, 450.0, fs);
    let y = lfilter(&tf, &x).unwrap();

    let peak = y[20..]
        .iter()
        .fold(0.0f64, |acc, &v| acc.max(v.abs()));
    assert!(peak <= 0.08, "steady-state amplitude {peak} too large");
}

#[test]
fn highpass_rejects_a_tone_far_below_cutoff() {
    let fs = 1000.0;
    let zpk = design(4, 200.0, fs, Family::Butterworth, Mode::Highpass, None).unwrap();
    let tf = zpk2tf(&zpk);

    let x = sine(1000, 50.0, fs);
    let y = lfilter(&tf, &x).unwrap();

    // |H| at 50 Hz is about 2.3e-3 for this design.
    let mean_abs: f64 = y[100..].iter().map(|v| v.abs()).sum::<f64>() / (y.len() - 100) as f64;
    assert!(mean_abs < 2.5e-3, "mean absolute value {mean_abs} too large");
}

#[test]
fn fft_filter_matches_time_domain_filtering() {
    let fs = 1000.0;
    let zpk = design(4, 100.0, fs, Family::Butterworth, Mode::Lowpass, None).unwrap();
    let tf = zpk2tf(&zpk);

    // Deterministic broadband-ish input.
    let x: Vec<f64> = (0..1024)
        .map(|i| {
            let t = i as f64;
            (t * 0.013).sin() + 0.5 * (t * 0.37).sin() + 0.25 * (t * 1.9).cos()
        })
        .collect();

    let direct = lfilter(&tf, &x).unwrap();
    let blocked = fft_filter(&tf, &x).unwrap();
    assert_eq!(blocked.len(), x.len());

    let ir_len = effective_ir(&tf, DEFAULT_IR_EPSILON, DEFAULT_IR_MAX_LEN)
        .unwrap()
        .len();
    assert!(ir_len < x.len(), "effective IR unexpectedly long: {ir_len}");

    for (i, (a, b)) in direct.iter().zip(&blocked).enumerate() {
        let bound = if i < x.len() - ir_len { 1e-8 } else { 1e-6 };
        assert!((a - b).abs() < bound, "index {i}: {a} vs {b}");
    }
}

#[test]
fn fft_filter_of_a_step_matches_time_domain() {
    let zpk = design(4, 100.0, 1000.0, Family::Butterworth, Mode::Lowpass, None).unwrap();
    let tf = zpk2tf(&zpk);

    let step = vec![1.0; 1024];
    let direct = lfilter(&tf, &step).unwrap();
    let blocked = fft_filter(&tf, &step).unwrap();

    for i in 64..1024 {
        assert!(
            (direct[i] - blocked[i]).abs() < 1e-6,
            "index {i}: {} vs {}",
            direct[i],
            blocked[i]
        );
    }
}

#[test]
fn transfer_function_agrees_with_pole_zero_response() {
    let designs = [
        design(2, 100.0, 1000.0, Family::Butterworth, Mode::Lowpass, None).unwrap(),
        design(5, 180.0, 1000.0, Family::Butterworth, Mode::Highpass, None).unwrap(),
        design(3, 120.0, 1000.0, Family::Chebyshev1, Mode::Lowpass, Some(1.0)).unwrap(),
        design(3, 120.0, 1000.0, Family::Chebyshev2, Mode::Lowpass, Some(40.0)).unwrap(),
    ];

    for zpk in &designs {
        let tf = zpk2tf(zpk);
        for &omega in &[0.0, 0.1, 0.5, 1.0, 2.0, 3.0] {
            let e = Complex64::new(0.0, omega).exp();
            let from_tf = polyval(&tf.b, e) / polyval(&tf.a, e);
            let from_zpk = freqz(zpk, &[omega])[0];
            assert!(
                (from_tf - from_zpk).norm() < 1e-9,
                "omega {omega}: {from_tf} vs {from_zpk}"
            );
        }
    }
}

#[test]
fn dc_gain_of_every_lowpass_family_is_unity() {
    for (family, ripple) in [
        (Family::Butterworth, None),
        (Family::Chebyshev2, Some(40.0)),
    ] {
        for order in [1, 2, 4, 7] {
            let zpk = design(order, 100.0, 1000.0, family, Mode::Lowpass, ripple).unwrap();
            let h = freqz(&zpk, &[0.0])[0];
            assert!(
                (h - Complex64::new(1.0, 0.0)).norm() < 1e-9,
                "{} order {order}: DC gain {h}",
                family.name()
            );
        }
    }
}
