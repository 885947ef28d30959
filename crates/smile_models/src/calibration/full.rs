//! Full calibration.
//!
//! Free parameters are (α, ρ, ν), fitted directly against the quoted smile.
//! α is bounded away from zero so the mapper is never evaluated at its
//! singular α = 0 configuration.

use smile_core::math::solvers::{
    BoundedLeastSquares, LeastSquaresConfig, ParameterBounds,
};
use smile_core::traits::calibration::{CalibrationResult, Calibrator};

use super::{fitted_vols, from_solve_error, CalibrationError, MarketSmile, SmileFit, RHO_LIMIT};
use crate::sabr::{lognormal_vol, SabrError, SabrParams};

/// Initial guess for the full mode.
///
/// Validation follows the reference implementation: α > 0, |ρ| ≤ 1, ν > 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FullGuess {
    alpha: f64,
    rho: f64,
    nu: f64,
}

impl FullGuess {
    /// Create a validated guess.
    ///
    /// # Errors
    /// `InvalidGuess` when α ≤ 0, |ρ| > 1, or ν ≤ 0.
    pub fn new(alpha: f64, rho: f64, nu: f64) -> Result<Self, CalibrationError> {
        if alpha <= 0.0 || alpha.is_nan() {
            return Err(CalibrationError::InvalidGuess {
                name: "alpha",
                value: alpha,
            });
        }
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
        Ok(Self { alpha, rho, nu })
    }

    /// Guessed diffusion scale.
    pub fn alpha(&self) -> f64 {
        self.alpha
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

/// Immutable context handed to the stateless full-mode objective.
#[derive(Debug, Clone)]
pub(crate) struct FullContext<'a> {
    pub(crate) forward: f64,
    pub(crate) expiry: f64,
    pub(crate) beta: f64,
    pub(crate) strikes: &'a [f64],
    pub(crate) market_vols: &'a [f64],
}

/// Residuals (model − market) for a full-mode trial vector `[α, ρ, ν]`.
pub(crate) fn full_residuals(trial: &[f64], ctx: &FullContext<'_>) -> Result<Vec<f64>, SabrError> {
    let params = SabrParams::new(trial[0], ctx.beta, trial[1], trial[2])?;

    ctx.strikes
        .iter()
        .zip(ctx.market_vols)
        .map(|(&strike, &quote)| {
            lognormal_vol(ctx.forward, strike, ctx.expiry, &params).map(|model| model - quote)
        })
        .collect()
}

/// Full SABR calibrator.
///
/// # Example
///
/// ```
/// use smile_core::traits::calibration::Calibrator;
/// use smile_models::calibration::{FullCalibrator, FullGuess, MarketSmile};
///
/// let smile = MarketSmile::new(
///     0.0266,
///     0.25,
///     vec![0.02, 0.0266, 0.035],
///     vec![0.4668, 0.4084, 0.4161],
/// )
/// .unwrap();
///
/// let calibrator = FullCalibrator::new(0.5).unwrap();
/// let fit = calibrator
///     .calibrate(&smile, FullGuess::new(0.05, 0.1, 0.7).unwrap())
///     .unwrap();
/// assert!(fit.params().alpha() > 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct FullCalibrator {
    beta: f64,
    config: LeastSquaresConfig,
}

impl FullCalibrator {
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

impl Calibrator for FullCalibrator {
    type MarketData = MarketSmile;
    type Guess = FullGuess;
    type Output = SmileFit;
    type Error = CalibrationError;

    fn calibrate(
        &self,
        market_data: &MarketSmile,
        guess: FullGuess,
    ) -> Result<SmileFit, CalibrationError> {
        let ctx = FullContext {
            forward: market_data.forward(),
            expiry: market_data.expiry(),
            beta: self.beta,
            strikes: market_data.strikes(),
            market_vols: market_data.market_vols(),
        };

        let solver = BoundedLeastSquares::new(self.config).with_bounds(vec![
            ParameterBounds::positive(),
            ParameterBounds::new(-RHO_LIMIT, RHO_LIMIT),
            ParameterBounds::non_negative(),
        ]);

        let solve = solver
            .solve(
                |trial| full_residuals(trial, &ctx),
                vec![guess.alpha, guess.rho, guess.nu],
            )
            .map_err(from_solve_error)?;

        let params = SabrParams::new(solve.params[0], self.beta, solve.params[1], solve.params[2])?;
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

/// Convenience wrapper: full calibration in one call.
///
/// # Errors
/// Guess validation and any domain error raised while evaluating the
/// objective.
pub fn calibrate_full(
    smile: &MarketSmile,
    beta: f64,
    guess_alpha: f64,
    guess_rho: f64,
    guess_nu: f64,
) -> Result<SmileFit, CalibrationError> {
    FullCalibrator::new(beta)?.calibrate(smile, FullGuess::new(guess_alpha, guess_rho, guess_nu)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_smile() -> MarketSmile {
        MarketSmile::new(
            0.0266,
            0.25,
            vec![0.0200, 0.0266, 0.0350],
            vec![0.4668, 0.4084, 0.4161],
        )
        .unwrap()
    }

    #[test]
    fn guess_validation() {
        assert!(FullGuess::new(0.05, 0.1, 0.7).is_ok());
        assert!(matches!(
            FullGuess::new(0.0, 0.1, 0.7),
            Err(CalibrationError::InvalidGuess { name: "alpha", .. })
        ));
        assert!(matches!(
            FullGuess::new(0.05, -1.5, 0.7),
            Err(CalibrationError::InvalidGuess { name: "rho", .. })
        ));
        assert!(matches!(
            FullGuess::new(0.05, 0.1, 0.0),
            Err(CalibrationError::InvalidGuess { name: "nu", .. })
        ));
    }

    #[test]
    fn beta_validation() {
        assert!(FullCalibrator::new(0.0).is_ok());
        assert!(FullCalibrator::new(-0.1).is_err());
    }

    #[test]
    fn residuals_are_stateless_and_testable() {
        let smile = sample_smile();
        let ctx = FullContext {
            forward: smile.forward(),
            expiry: smile.expiry(),
            beta: 0.5,
            strikes: smile.strikes(),
            market_vols: smile.market_vols(),
        };

        let resids = full_residuals(&[0.05, 0.1, 0.7], &ctx).unwrap();
        assert_eq!(resids.len(), smile.len());
        assert_eq!(resids, full_residuals(&[0.05, 0.1, 0.7], &ctx).unwrap());
    }

    #[test]
    fn bounds_are_respected() {
        let smile = sample_smile();
        let fit = calibrate_full(&smile, 0.5, 0.05, 0.9, 2.0).unwrap();
        assert!(fit.params().alpha() > 0.0);
        assert!(fit.params().rho().abs() <= 1.0);
        assert!(fit.params().nu() >= 0.0);
    }

    #[test]
    fn fitted_vols_align_with_strikes() {
        let smile = sample_smile();
        let fit = calibrate_full(&smile, 0.5, 0.05, 0.1, 0.7).unwrap();
        assert_eq!(fit.strikes(), smile.strikes());
        assert_eq!(fit.fitted_vols().len(), smile.len());
        assert!(fit.fitted_vols().iter().all(|v| v.is_finite() && *v > 0.0));
    }
}
