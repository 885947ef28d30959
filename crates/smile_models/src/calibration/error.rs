//! Error types for smile calibration.

use smile_core::types::SolverError;
use thiserror::Error;

use crate::sabr::SabrError;

/// Calibration input and propagation errors.
///
/// Convergence failure is NOT represented here: it is a status on the
/// returned fit. These variants cover invalid inputs (rejected before any
/// numeric work) and domain/solver failures raised while evaluating the
/// objective, which abort the calibration call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalibrationError {
    /// Strike and volatility vectors differ in length.
    #[error("strikes vector length {strikes} does not match market vols length {vols}")]
    MismatchedLengths {
        /// Number of strikes supplied
        strikes: usize,
        /// Number of volatilities supplied
        vols: usize,
    },

    /// The smile contains no quotes.
    #[error("smile must contain at least one strike")]
    EmptySmile,

    /// A strike or volatility quote is out of domain.
    #[error("invalid market quote at index {index}: {name} = {value} (must be positive)")]
    InvalidQuote {
        /// Index of the offending quote
        index: usize,
        /// Which vector the quote came from
        name: &'static str,
        /// The offending value
        value: f64,
    },

    /// An initial-guess component is out of domain.
    #[error("invalid initial guess: {name} = {value}")]
    InvalidGuess {
        /// Name of the guessed parameter
        name: &'static str,
        /// The offending value
        value: f64,
    },

    /// The ATM-constrained mode needs a quoted ATM volatility on the smile.
    #[error("ATM-constrained calibration requires an ATM volatility on the smile")]
    MissingAtmVol,

    /// Domain failure from the SABR model while evaluating the objective.
    #[error(transparent)]
    Model(#[from] SabrError),

    /// Failure from the numerical layer.
    #[error(transparent)]
    Solver(#[from] SolverError),
}
