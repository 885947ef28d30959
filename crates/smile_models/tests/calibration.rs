//! End-to-end calibration tests: synthetic parameter recovery, the 3M10Y
//! reference market smile, objective non-regression and bounds.

use smile_models::calibration::{calibrate_atm, calibrate_full, CalibrationError, MarketSmile};
use smile_models::sabr::{atm_alpha, lognormal_vol, SabrParams};

const BETA: f64 = 0.5;

/// 3M expiry smile on a 10Y rate: ATM point first, then the wings.
fn market_smile() -> MarketSmile {
    let strikes = vec![
        0.0266, 0.0100, 0.0150, 0.0200, 0.0250, 0.0300, 0.0350, 0.0400, 0.0500, 0.0600, 0.0700,
        0.0800, 0.0900, 0.1000,
    ];
    let vols = vec![
        0.4084, 0.7376, 0.5685, 0.4668, 0.4154, 0.4048, 0.4161, 0.4347, 0.4734, 0.5072, 0.5358,
        0.5602, 0.5813, 0.5998,
    ];
    MarketSmile::new(0.0266, 0.25, strikes, vols)
        .unwrap()
        .with_atm_vol(0.4084)
        .unwrap()
}

fn synthetic_smile(truth: &SabrParams, forward: f64, expiry: f64, strikes: &[f64]) -> MarketSmile {
    let vols: Vec<f64> = strikes
        .iter()
        .map(|&k| lognormal_vol(forward, k, expiry, truth).unwrap())
        .collect();
    MarketSmile::new(forward, expiry, strikes.to_vec(), vols)
        .unwrap()
        .with_atm_vol(lognormal_vol(forward, forward, expiry, truth).unwrap())
        .unwrap()
}

fn sse(smile: &MarketSmile, params: &SabrParams) -> f64 {
    smile
        .strikes()
        .iter()
        .zip(smile.market_vols())
        .map(|(&k, &quote)| {
            let model = lognormal_vol(smile.forward(), k, smile.expiry(), params).unwrap();
            (model - quote) * (model - quote)
        })
        .sum()
}

#[test]
fn full_mode_recovers_synthetic_parameters() {
    let truth = SabrParams::new(0.04, BETA, -0.3, 0.4).unwrap();
    let strikes = [0.015, 0.02, 0.025, 0.03, 0.035, 0.04, 0.045];
    let smile = synthetic_smile(&truth, 0.03, 1.0, &strikes);

    let fit = calibrate_full(&smile, BETA, 0.05, -0.1, 0.3).unwrap();

    assert!(fit.converged(), "synthetic full calibration did not converge");
    assert!(fit.objective() < 1e-6);
    assert!((fit.params().alpha() - 0.04).abs() < 0.01, "alpha mismatch");
    assert!((fit.params().rho() - (-0.3)).abs() < 0.1, "rho mismatch");
    assert!((fit.params().nu() - 0.4).abs() < 0.1, "nu mismatch");
}

#[test]
fn atm_mode_recovers_synthetic_parameters() {
    let truth = SabrParams::new(0.04, BETA, -0.3, 0.4).unwrap();
    let strikes = [0.02, 0.025, 0.03, 0.035, 0.04];
    let smile = synthetic_smile(&truth, 0.03, 1.0, &strikes);

    let fit = calibrate_atm(&smile, BETA, -0.1, 0.3).unwrap();

    assert!(fit.converged(), "synthetic ATM calibration did not converge");
    assert!((fit.params().rho() - (-0.3)).abs() < 0.1, "rho mismatch");
    assert!((fit.params().nu() - 0.4).abs() < 0.1, "nu mismatch");
    assert!((fit.params().alpha() - 0.04).abs() < 0.01, "alpha mismatch");
}

#[test]
fn full_mode_market_smile_never_regresses() {
    let smile = market_smile();
    let guess = SabrParams::new(0.05, BETA, 0.1, 0.7).unwrap();
    let initial_sse = sse(&smile, &guess);

    let fit = calibrate_full(&smile, BETA, 0.05, 0.1, 0.7).unwrap();

    assert!(
        fit.objective() <= initial_sse,
        "objective {} exceeds the initial guess objective {}",
        fit.objective(),
        initial_sse
    );
    assert!(fit.objective() <= sse(&smile, fit.params()) + 1e-12);
}

#[test]
fn atm_mode_market_smile_never_regresses() {
    let smile = market_smile();
    let alpha = atm_alpha(0.0266, 0.4084, 0.25, BETA, 0.1, 0.7).unwrap();
    let guess = SabrParams::new(alpha, BETA, 0.1, 0.7).unwrap();
    let initial_sse = sse(&smile, &guess);

    let fit = calibrate_atm(&smile, BETA, 0.1, 0.7).unwrap();

    assert!(fit.objective() <= initial_sse);
}

#[test]
fn market_fit_respects_bounds_and_echoes_strikes() {
    let smile = market_smile();

    for fit in [
        calibrate_full(&smile, BETA, 0.05, 0.1, 0.7).unwrap(),
        calibrate_atm(&smile, BETA, 0.1, 0.7).unwrap(),
    ] {
        assert!(fit.params().alpha() > 0.0);
        assert!(fit.params().rho() > -1.0 && fit.params().rho() < 1.0);
        assert!(fit.params().nu() >= 0.0);

        assert_eq!(fit.strikes(), smile.strikes());
        assert_eq!(fit.fitted_vols().len(), smile.len());
        assert!(fit.fitted_vols().iter().all(|v| v.is_finite() && *v > 0.0));
    }
}

#[test]
fn market_fit_improves_on_the_guess_substantially() {
    // The reference smile is well inside SABR territory; the fitted smile
    // should track the quotes to within a couple of vol points everywhere
    let smile = market_smile();
    let fit = calibrate_full(&smile, BETA, 0.05, 0.1, 0.7).unwrap();

    for (model, quote) in fit.fitted_vols().iter().zip(smile.market_vols()) {
        assert!(
            (model - quote).abs() < 0.05,
            "fitted vol {} too far from quote {}",
            model,
            quote
        );
    }
}

#[test]
fn calibration_is_deterministic() {
    let smile = market_smile();
    let first = calibrate_full(&smile, BETA, 0.05, 0.1, 0.7).unwrap();
    let second = calibrate_full(&smile, BETA, 0.05, 0.1, 0.7).unwrap();
    assert_eq!(first.params(), second.params());
    assert_eq!(first.fitted_vols(), second.fitted_vols());
}

#[test]
fn mismatched_vectors_fail_before_any_numeric_work() {
    let result = MarketSmile::new(0.0266, 0.25, vec![0.02, 0.03, 0.04], vec![0.4, 0.41]);
    assert!(matches!(
        result,
        Err(CalibrationError::MismatchedLengths { strikes: 3, vols: 2 })
    ));
}

#[test]
fn invalid_guesses_are_rejected() {
    let smile = market_smile();

    assert!(matches!(
        calibrate_full(&smile, BETA, -0.05, 0.1, 0.7),
        Err(CalibrationError::InvalidGuess { name: "alpha", .. })
    ));
    assert!(matches!(
        calibrate_full(&smile, BETA, 0.05, 1.2, 0.7),
        Err(CalibrationError::InvalidGuess { name: "rho", .. })
    ));
    assert!(matches!(
        calibrate_atm(&smile, BETA, 0.1, -0.7),
        Err(CalibrationError::InvalidGuess { name: "nu", .. })
    ));
}
