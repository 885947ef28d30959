//! Error types for structured error handling.
//!
//! This module provides:
//! - `SolverError`: Errors from root-finding and least-squares solvers

use thiserror::Error;

/// Categorised solver errors.
///
/// Provides structured error handling for the numerical layer with
/// descriptive context for each failure mode.
///
/// # Variants
/// - `NoBracket`: the supplied interval does not bracket a sign change
/// - `MaxIterationsExceeded`: the iteration cap was hit before convergence
/// - `NumericalInstability`: a degenerate problem or non-finite intermediate
///
/// # Examples
/// ```
/// use smile_core::types::SolverError;
///
/// let err = SolverError::NoBracket { a: 1.0, b: 2.0 };
/// assert!(format!("{}", err).contains("bracket"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    /// The function has the same sign at both bracket endpoints.
    #[error("no sign change over bracket [{a}, {b}]")]
    NoBracket {
        /// Left bracket endpoint
        a: f64,
        /// Right bracket endpoint
        b: f64,
    },

    /// The solver hit its iteration cap before converging.
    #[error("failed to converge within {iterations} iterations")]
    MaxIterationsExceeded {
        /// The iteration cap that was exhausted
        iterations: usize,
    },

    /// Degenerate problem or non-finite intermediate value.
    #[error("numerical instability: {0}")]
    NumericalInstability(String),
}
