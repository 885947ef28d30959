//! ATM-constrained calibration.
//!
//! Free parameters are (ρ, ν); at every objective evaluation α is derived
//! from the quoted ATM volatility through the ATM cubic, so the fitted smile
//! reprices the ATM quote by construction.

use smile_core::math::solvers::{
    BoundedLeastSquares, LeastSquaresConfig, ParameterBounds,
};
use smile_core::traits::calibration::{CalibrationResult, Calibrator};

use super::{fitted_vols, from_solve_error, CalibrationError, MarketSmile, SmileFit, RHO_LIMIT};
use crate::sabr::{atm_alpha, lognormal_vol, SabrError, SabrParams};

/// Initial guess for the ATM-constrained mode.
///
/// Validation follows the reference implementation: |ρ| ≤ 1 and ν > 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtmGuess {
    rho: f64,
    nu: f64,
}

impl AtmGuess {
    /// Create a validated guess.
    ///
    /// # Errors
    /// `InvalidGuess` when |ρ| > 1 or ν ≤ 0.
    pub fn new(rho: f64, nu: f64) -> Result<Self, CalibrationError> {
        if rho.abs() > 1.0 || rho.is_nan() {
            return Err(CalibrationError::InvalidGuess {
                name: "rho",
                value: rho,
            });
        }
        if nu <= 0.0 || nu.is_nan() {
            return Err(CalibrationError::InvalidGuess {
                name: "nu",
                value: nu,
            });
        }
        Ok(Self { rho, nu })
    }

    /// Guessed correlation.
    pub fn rho(&self) -> f64 {
        self.rho
    }

    /// Guessed vol-of-vol.
    pub fn nu(&self) -> f64 {
        self.nu
    }
}

/// Immutable context handed to the stateless ATM objective.
#[derive(Debug, Clone)]
pub(crate) struct AtmContext<'a> {
    pub(crate) forward: f64,
    pub(crate) expiry: f64,
    pub(crate) atm_vol: f64,
    pub(crate) beta: f64,
    pub(crate) strikes: &'a [f64],
    pub(crate) market_vols: &'a [f64],
}

/// Residuals (model − market) for an ATM-mode trial vector `[ρ, ν]`.
///
/// Derives α through the ATM cubic, then maps every strike. A domain error
/// from either step propagates and aborts the surrounding solve.
pub(crate) fn atm_residuals(trial: &[f64], ctx: &AtmContext<'_>) -> Result<Vec<f64>, SabrError> {
    let (rho, nu) = (trial[0], trial[1]);
    let alpha = atm_alpha(ctx.forward, ctx.atm_vol, ctx.expiry, ctx.beta, rho, nu)?;
    let params = SabrParams::new(alpha, ctx.beta, rho, nu)?;

    ctx.strikes
        .iter()
        .zip(ctx.market_vols)
        .map(|(&strike, &quote)| {
            lognormal_vol(ctx.forward, strike, ctx.expiry, &params).map(|model| model - quote)
        })
        .collect()
}

/// ATM-constrained SABR calibrator.
///
/// # Example
///
/// ```
/// use smile_core::traits::calibration::Calibrator;
/// use smile_models::calibration::{AtmCalibrator, AtmGuess, MarketSmile};
///
/// let smile = MarketSmile::new(
///     0.0266,
///     0.25,
///     vec![0.02, 0.0266, 0.035],
///     vec![0.4668, 0.4084, 0.4161],
/// )
/// .unwrap()
/// .with_atm_vol(0.4084)
/// .unwrap();
///
/// let calibrator = AtmCalibrator::new(0.5).unwrap();
/// let fit = calibrator
///     .calibrate(&smile, AtmGuess::new(0.1, 0.7).unwrap())
///     .unwrap();
/// assert!(fit.params().nu() >= 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct AtmCalibrator {
    beta: f64,
    config: LeastSquaresConfig,
}

impl AtmCalibrator {
    /// Create a calibrator with a fixed β and default solver configuration.
    ///
    /// # Errors
    /// `SabrError::InvalidBeta` (via [`CalibrationError::Model`]) when β is
    /// outside [0, 1].
    pub fn new(beta: f64) -> Result<Self, CalibrationError> {
        if !(0.0..=1.0).contains(&beta) {
            return Err(SabrError::InvalidBeta(beta).into());
        }
        Ok(Self {
            beta,
            config: LeastSquaresConfig::default(),
        })
    }

    /// Replace the solver configuration.
    pub fn with_config(mut self, config: LeastSquaresConfig) -> Self {
        self.config = config;
        self
    }

    /// The fixed backbone parameter.
    pub fn beta(&self) -> f64 {
        self.beta
    }
}

impl Calibrator for AtmCalibrator {
    type MarketData = MarketSmile;
    type Guess = AtmGuess;
    type Output = SmileFit;
    type Error = CalibrationError;

    fn calibrate(
        &self,
        market_data: &MarketSmile,
        guess: AtmGuess,
    ) -> Result<SmileFit, CalibrationError> {
        let atm_vol = market_data
            .atm_vol()
            .ok_or(CalibrationError::MissingAtmVol)?;

        let ctx = AtmContext {
            forward: market_data.forward(),
            expiry: market_data.expiry(),
            atm_vol,
            beta: self.beta,
            strikes: market_data.strikes(),
            market_vols: market_data.market_vols(),
        };

        let solver = BoundedLeastSquares::new(self.config).with_bounds(vec![
            ParameterBounds::new(-RHO_LIMIT, RHO_LIMIT),
            ParameterBounds::non_negative(),
        ]);

        let solve = solver
            .solve(|trial| atm_residuals(trial, &ctx), vec![guess.rho, guess.nu])
            .map_err(from_solve_error)?;

        let (rho, nu) = (solve.params[0], solve.params[1]);
        let alpha = atm_alpha(
            market_data.forward(),
            atm_vol,
            market_data.expiry(),
            self.beta,
            rho,
            nu,
        )?;
        let params = SabrParams::new(alpha, self.beta, rho, nu)?;
        let vols = fitted_vols(market_data, &params)?;

        let status = if solve.converged {
            CalibrationResult::converged(params, solve.iterations, solve.residual_ss)
        } else {
            CalibrationResult::not_converged(
                params,
                solve.iterations,
                solve.residual_ss,
                "iteration cap reached before convergence",
            )
        };
        Ok(SmileFit::new(status, market_data.strikes().to_vec(), vols))
    }
}

/// Convenience wrapper: ATM-constrained calibration in one call.
///
/// # Errors
/// Guess validation, missing ATM volatility, and any domain error raised
/// while evaluating the objective.
pub fn calibrate_atm(
    smile: &MarketSmile,
    beta: f64,
    guess_rho: f64,
    guess_nu: f64,
) -> Result<SmileFit, CalibrationError> {
    AtmCalibrator::new(beta)?.calibrate(smile, AtmGuess::new(guess_rho, guess_nu)?)
}
