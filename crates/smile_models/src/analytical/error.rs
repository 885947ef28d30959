//! Error types for analytical pricing operations.

use thiserror::Error;

/// Analytical pricing errors.
///
/// # Variants
/// - `InvalidForward`: non-positive forward rate
/// - `InvalidStrike`: non-positive strike
/// - `InvalidExpiry`: non-positive time to expiry
/// - `InvalidVolatility`: non-positive volatility
/// - `InvalidOptionFlag`: call/put flag other than `'c'` or `'p'`
///
/// # Examples
/// ```
/// use smile_models::analytical::AnalyticalError;
///
/// let err = AnalyticalError::InvalidVolatility { volatility: -0.2 };
/// assert!(format!("{}", err).contains("volatility"));
/// ```
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AnalyticalError {
    /// Invalid forward rate (non-positive).
    #[error("Invalid forward rate: F0 = {forward}")]
    InvalidForward {
        /// The invalid forward value
        forward: f64,
    },

    /// Invalid strike (non-positive).
    #[error("Invalid strike: K = {strike}")]
    InvalidStrike {
        /// The invalid strike value
        strike: f64,
    },

    /// Invalid time to expiry (non-positive).
    #[error("Invalid time to expiry: tex = {expiry}")]
    InvalidExpiry {
        /// The invalid expiry value
        expiry: f64,
    },

    /// Invalid volatility (non-positive).
    #[error("Invalid volatility: vol = {volatility}")]
    InvalidVolatility {
        /// The invalid volatility value
        volatility: f64,
    },

    /// Call/put flag other than `'c'` or `'p'`.
    #[error("CallOrPut flag can only take values 'c' or 'p', got '{flag}'")]
    InvalidOptionFlag {
        /// The rejected flag
        flag: String,
    },
}
