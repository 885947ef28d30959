//! Hagan's asymptotic SABR-to-lognormal volatility mapping.
//!
//! Implements eqn 2.17a of Hagan et al., "Managing Smile Risk" (2002):
//!
//! ```text
//! σ_B(K, F) = α / [(FK)^((1-β)/2) · D(ln(F/K))] · z/x(z) · (1 + H·tex)
//! ```
//!
//! where
//! - `D(u) = 1 + (1-β)²u²/24 + (1-β)⁴u⁴/1920`
//! - `z = (ν/α)·(FK)^((1-β)/2)·ln(F/K)`
//! - `x(z) = ln[(√(1-2ρz+z²) + z - ρ)/(1-ρ)]`
//! - `H` collects the backbone-curvature, correlation-skew and vol-of-vol
//!   convexity corrections.
//!
//! At the money the `z/x(z)` ratio is a 0/0 form whose limit is 1, so the
//! `F == K` case takes the collapsed closed form directly.

use super::error::SabrError;
use super::params::SabrParams;

/// Below this |z| the `z/x(z)` ratio is taken at its limit of 1.
const Z_EPS: f64 = 1e-12;

/// Black-76-equivalent lognormal volatility for a SABR parameter set.
///
/// # Errors
///
/// - `InvalidForward` / `InvalidStrike` / `InvalidExpiry` for non-positive
///   arguments (checked before any numeric work)
/// - `SingularSmile` when the `x(z)` log argument is non-positive, which
///   occurs as ρ → ±1 combined with extreme moneyness
/// - `NonFinite` if the expansion produces a non-finite value
///
/// # Examples
/// ```
/// use smile_models::sabr::{lognormal_vol, SabrParams};
///
/// let params = SabrParams::new(0.0651, 0.5, -0.0356, 1.0504).unwrap();
/// let vol = lognormal_vol(0.0266, 0.0250, 0.25, &params).unwrap();
/// assert!(vol > 0.0);
/// ```
pub fn lognormal_vol(
    forward: f64,
    strike: f64,
    expiry: f64,
    params: &SabrParams,
) -> Result<f64, SabrError> {
    if forward <= 0.0 || forward.is_nan() {
        return Err(SabrError::InvalidForward(forward));
    }
    if strike <= 0.0 || strike.is_nan() {
        return Err(SabrError::InvalidStrike(strike));
    }
    if expiry <= 0.0 || expiry.is_nan() {
        return Err(SabrError::InvalidExpiry(expiry));
    }

    let alpha = params.alpha();
    let beta = params.beta();
    let rho = params.rho();
    let nu = params.nu();

    let one_minus_beta = 1.0 - beta;
    let fk_mid = (forward * strike).powf(one_minus_beta / 2.0);

    // Time-decay corrections, evaluated at the geometric mid of (F, K)
    let term1 = one_minus_beta * one_minus_beta * alpha * alpha / (24.0 * fk_mid * fk_mid);
    let term2 = 0.25 * rho * beta * nu * alpha / fk_mid;
    let term3 = (2.0 - 3.0 * rho * rho) * nu * nu / 24.0;
    let higher_order = 1.0 + (term1 + term2 + term3) * expiry;

    let vol = if forward == strike {
        // z/x(z) → 1 and the log-moneyness expansion collapses to 1
        alpha / fk_mid * higher_order
    } else {
        let log_fk = (forward / strike).ln();
        let log_fk_2 = log_fk * log_fk;

        let one_minus_beta_2 = one_minus_beta * one_minus_beta;
        let denom = 1.0
            + one_minus_beta_2 * log_fk_2 / 24.0
            + one_minus_beta_2 * one_minus_beta_2 * log_fk_2 * log_fk_2 / 1920.0;

        let z = (nu / alpha) * fk_mid * log_fk;
        alpha / (fk_mid * denom) * z_over_x(z, rho)? * higher_order
    };

    if !vol.is_finite() {
        return Err(SabrError::NonFinite("lognormal_vol"));
    }
    Ok(vol)
}

/// The `z/x(z)` coefficient with `x(z) = ln[(√(1-2ρz+z²)+z-ρ)/(1-ρ)]`.
///
/// Fails when the log argument is non-positive or non-finite.
fn z_over_x(z: f64, rho: f64) -> Result<f64, SabrError> {
    if z.abs() < Z_EPS {
        return Ok(1.0);
    }

    let sqrt_term = (1.0 - 2.0 * rho * z + z * z).sqrt();
    let arg = (sqrt_term + z - rho) / (1.0 - rho);
    if !arg.is_finite() || arg <= 0.0 {
        return Err(SabrError::SingularSmile { rho, z, arg });
    }

    let x = arg.ln();
    if x == 0.0 {
        // arg rounded to exactly 1: only reachable hard against the ρ → 1
        // singularity
        return Err(SabrError::SingularSmile { rho, z, arg });
    }
    Ok(z / x)
}
