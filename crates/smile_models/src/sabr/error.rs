//! Error types for the SABR core.

use smile_core::types::SolverError;
use thiserror::Error;

/// SABR input and domain errors.
///
/// Input variants reject out-of-domain arguments before any numeric work;
/// domain variants surface numerical singularities detected during
/// evaluation instead of propagating NaN.
///
/// # Examples
/// ```
/// use smile_models::sabr::SabrError;
///
/// let err = SabrError::InvalidRho(1.5);
/// assert!(format!("{}", err).contains("1.5"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SabrError {
    /// Non-positive forward rate.
    #[error("invalid forward rate: F0 = {0} (must be positive)")]
    InvalidForward(f64),

    /// Non-positive strike.
    #[error("invalid strike: K = {0} (must be positive)")]
    InvalidStrike(f64),

    /// Non-positive time to expiry.
    #[error("invalid time to expiry: tex = {0} (must be positive)")]
    InvalidExpiry(f64),

    /// Non-positive diffusion parameter.
    #[error("invalid diffusion parameter: alpha = {0} (must be positive)")]
    InvalidAlpha(f64),

    /// Backbone parameter outside [0, 1].
    #[error("invalid backbone parameter: beta = {0} (must lie in [0, 1])")]
    InvalidBeta(f64),

    /// Correlation outside (-1, 1).
    #[error("invalid correlation: rho = {0} (must lie in (-1, 1))")]
    InvalidRho(f64),

    /// Negative vol-of-vol.
    #[error("invalid vol-of-vol: nu = {0} (must be non-negative)")]
    InvalidNu(f64),

    /// Non-positive ATM volatility.
    #[error("invalid ATM volatility: {0} (must be positive)")]
    InvalidAtmVol(f64),

    /// The x(z) log argument is non-positive; occurs as rho approaches ±1
    /// combined with extreme moneyness.
    #[error("singular smile configuration: x(z) log argument {arg} at rho = {rho}, z = {z}")]
    SingularSmile {
        /// Correlation at the singular evaluation
        rho: f64,
        /// Normalised vol-of-vol argument
        z: f64,
        /// The non-positive log argument
        arg: f64,
    },

    /// The ATM alpha cubic has no positive real root over the search bracket.
    #[error("no positive root for the ATM alpha cubic over [{lo}, {hi}]")]
    NoAlphaRoot {
        /// Lower end of the search bracket
        lo: f64,
        /// Upper end of the search bracket
        hi: f64,
    },

    /// A non-finite value was produced where a finite one was required.
    #[error("non-finite value in {0}")]
    NonFinite(&'static str),

    /// Failure propagated from the numerical layer.
    #[error(transparent)]
    Solver(#[from] SolverError),
}
