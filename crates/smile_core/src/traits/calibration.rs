//! Calibration abstractions.
//!
//! This module defines:
//! - [`Calibrator`]: the interface for fitting model parameters to market data
//! - [`CalibrationResult`]: the status-carrying result of a calibration run
//!
//! Failing to converge is a *status* on [`CalibrationResult`], not an error:
//! a calibrator returns `Err` only for invalid inputs or for domain failures
//! raised while evaluating its objective.

use std::fmt;

/// Result of a calibration run.
///
/// Carries the fitted parameters together with convergence diagnostics.
/// Callers must check [`converged`](CalibrationResult::converged) explicitly.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CalibrationResult<P> {
    /// Fitted parameters.
    pub params: P,
    /// Whether the optimizer reported convergence.
    pub converged: bool,
    /// Number of optimizer iterations performed.
    pub iterations: usize,
    /// Final objective value (sum of squared errors).
    pub objective: f64,
    /// Optional detail about how the run ended.
    pub message: Option<String>,
}

impl<P> CalibrationResult<P> {
    /// Create a converged result.
    pub fn converged(params: P, iterations: usize, objective: f64) -> Self {
        Self {
            params,
            converged: true,
            iterations,
            objective,
            message: None,
        }
    }

    /// Create a non-converged result with a reason.
    pub fn not_converged(
        params: P,
        iterations: usize,
        objective: f64,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            params,
            converged: false,
            iterations,
            objective,
            message: Some(reason.into()),
        }
    }

    /// Root mean square error over `n_observations` residuals.
    pub fn rmse(&self, n_observations: usize) -> f64 {
        if n_observations == 0 {
            return 0.0;
        }
        (self.objective / n_observations as f64).sqrt()
    }
}

impl<P: fmt::Debug> fmt::Display for CalibrationResult<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CalibrationResult {{ converged: {}, iterations: {}, objective: {:.6e} }}",
            self.converged, self.iterations, self.objective
        )
    }
}

/// Interface for fitting model parameters to market observations.
///
/// # Example
///
/// ```
/// use smile_core::traits::calibration::{CalibrationResult, Calibrator};
///
/// struct MeanFitter;
///
/// impl Calibrator for MeanFitter {
///     type MarketData = Vec<f64>;
///     type Guess = f64;
///     type Output = CalibrationResult<f64>;
///     type Error = std::convert::Infallible;
///
///     fn calibrate(&self, data: &Vec<f64>, _guess: f64) -> Result<Self::Output, Self::Error> {
///         let mean = data.iter().sum::<f64>() / data.len() as f64;
///         let sse = data.iter().map(|x| (x - mean) * (x - mean)).sum();
///         Ok(CalibrationResult::converged(mean, 1, sse))
///     }
/// }
///
/// let fit = MeanFitter.calibrate(&vec![1.0, 2.0, 3.0], 0.0).unwrap();
/// assert!((fit.params - 2.0).abs() < 1e-12);
/// ```
pub trait Calibrator {
    /// Market observations to fit against.
    type MarketData;
    /// Initial-guess type for the free parameters.
    type Guess;
    /// Output of a successful run (typically wraps a [`CalibrationResult`]).
    type Output;
    /// Error raised for invalid inputs or objective-evaluation failures.
    type Error;

    /// Fit the model to `market_data` starting from `guess`.
    fn calibrate(
        &self,
        market_data: &Self::MarketData,
        guess: Self::Guess,
    ) -> Result<Self::Output, Self::Error>;
}
