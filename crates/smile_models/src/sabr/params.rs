//! SABR parameter set.

use super::error::SabrError;

/// Validated SABR parameters.
///
/// Immutable once constructed; produced either directly by the caller (for
/// risk-only calls) or by a calibrator.
///
/// # Domains
/// - `alpha` > 0 — diffusion scale
/// - `beta` ∈ [0, 1] — backbone shape (0: normal, 1: lognormal)
/// - `rho` ∈ (-1, 1) — forward/vol correlation
/// - `nu` ≥ 0 — vol-of-vol (ν = 0 is the CEV limit)
///
/// # Examples
/// ```
/// use smile_models::sabr::SabrParams;
///
/// let params = SabrParams::new(0.0651, 0.5, -0.0356, 1.0504).unwrap();
/// assert_eq!(params.beta(), 0.5);
///
/// assert!(SabrParams::new(-0.1, 0.5, 0.0, 0.4).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SabrParams {
    alpha: f64,
    beta: f64,
    rho: f64,
    nu: f64,
}

impl SabrParams {
    /// Create a validated parameter set.
    ///
    /// # Errors
    /// One of `InvalidAlpha`, `InvalidBeta`, `InvalidRho`, `InvalidNu` when
    /// the corresponding argument is outside its domain (NaN included).
    pub fn new(alpha: f64, beta: f64, rho: f64, nu: f64) -> Result<Self, SabrError> {
        if alpha <= 0.0 || alpha.is_nan() || alpha.is_infinite() {
            return Err(SabrError::InvalidAlpha(alpha));
        }
        if !(0.0..=1.0).contains(&beta) {
            return Err(SabrError::InvalidBeta(beta));
        }
        if rho <= -1.0 || rho >= 1.0 || rho.is_nan() {
            return Err(SabrError::InvalidRho(rho));
        }
        if nu < 0.0 || nu.is_nan() || nu.is_infinite() {
            return Err(SabrError::InvalidNu(nu));
        }
        Ok(Self {
            alpha,
            beta,
            rho,
            nu,
        })
    }

    /// Diffusion scale.
    #[inline]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Backbone shape.
    #[inline]
    pub fn beta(&self) -> f64 {
        self.beta
    }

    /// Forward/vol correlation.
    #[inline]
    pub fn rho(&self) -> f64 {
        self.rho
    }

    /// Vol-of-vol.
    #[inline]
    pub fn nu(&self) -> f64 {
        self.nu
    }

    /// Copy of the parameters with a replaced alpha.
    pub fn with_alpha(&self, alpha: f64) -> Result<Self, SabrError> {
        Self::new(alpha, self.beta, self.rho, self.nu)
    }
}
