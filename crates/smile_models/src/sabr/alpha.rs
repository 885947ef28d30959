//! ATM diffusion-parameter (alpha) solver.
//!
//! Requiring the Hagan ATM volatility to match a quoted ATM lognormal vol
//! turns the expansion into a cubic in alpha:
//!
//! ```text
//! A3·α³ + A2·α² + A1·α + A0 = 0
//!
//! A3 = (1-β)²·tex / (24·F0^(2-2β))
//! A2 = ρ·ν·β·tex / (4·F0^(1-β))
//! A1 = 1 + (2-3ρ²)/24·ν²·tex
//! A0 = -ATMVol·F0^(1-β)
//! ```
//!
//! The cubic can have up to three real roots; the financially meaningful one
//! is the smallest positive real root. Rather than trusting a single
//! bracketed search over [`ALPHA_BRACKET`], the residual's critical points
//! (closed-form derivative roots) split the bracket into monotonic pieces,
//! each sign-changing piece is solved with Brent, and the smallest positive
//! root is selected from the full enumeration.

use smile_core::math::solvers::{BrentSolver, SolverConfig};

use super::error::SabrError;

/// Search bracket for the alpha root, matching the wide interval used by the
/// reference calibration.
pub const ALPHA_BRACKET: (f64, f64) = (-10_000.0, 10_000.0);

/// The cubic residual whose positive root is the ATM alpha.
///
/// # Examples
/// ```
/// use smile_models::sabr::AlphaCubic;
///
/// let cubic = AlphaCubic::new(0.0266, 0.4084, 0.25, 0.5, -0.0356, 1.0504).unwrap();
/// // The residual is negative at zero (A0 < 0) and crosses on the way up
/// assert!(cubic.eval(0.0) < 0.0);
/// assert!(cubic.eval(1.0) > 0.0);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct AlphaCubic {
    a3: f64,
    a2: f64,
    a1: f64,
    a0: f64,
}

impl AlphaCubic {
    /// Build the cubic coefficients from market inputs.
    ///
    /// # Errors
    /// Input validation: `F0 > 0`, `ATMVol > 0`, `tex > 0`, `β ∈ [0, 1]`,
    /// `ρ ∈ (-1, 1)`, `ν ≥ 0`.
    pub fn new(
        forward: f64,
        atm_vol: f64,
        expiry: f64,
        beta: f64,
        rho: f64,
        nu: f64,
    ) -> Result<Self, SabrError> {
        if forward <= 0.0 || forward.is_nan() {
            return Err(SabrError::InvalidForward(forward));
        }
        if atm_vol <= 0.0 || atm_vol.is_nan() {
            return Err(SabrError::InvalidAtmVol(atm_vol));
        }
        if expiry <= 0.0 || expiry.is_nan() {
            return Err(SabrError::InvalidExpiry(expiry));
        }
        if !(0.0..=1.0).contains(&beta) {
            return Err(SabrError::InvalidBeta(beta));
        }
        if rho <= -1.0 || rho >= 1.0 || rho.is_nan() {
            return Err(SabrError::InvalidRho(rho));
        }
        if nu < 0.0 || nu.is_nan() {
            return Err(SabrError::InvalidNu(nu));
        }

        let one_minus_beta = 1.0 - beta;
        let f_pow = forward.powf(one_minus_beta);

        Ok(Self {
            a3: one_minus_beta * one_minus_beta * expiry / (24.0 * forward.powf(2.0 * one_minus_beta)),
            a2: rho * nu * beta * expiry / (4.0 * f_pow),
            a1: 1.0 + (2.0 - 3.0 * rho * rho) / 24.0 * nu * nu * expiry,
            a0: -atm_vol * f_pow,
        })
    }

    /// Evaluate the residual at `x` (Horner form).
    #[inline]
    pub fn eval(&self, x: f64) -> f64 {
        ((self.a3 * x + self.a2) * x + self.a1) * x + self.a0
    }

    /// Real roots of the derivative `3·A3·x² + 2·A2·x + A1`, ascending.
    ///
    /// These are the residual's critical points: between consecutive ones
    /// the residual is strictly monotonic.
    fn critical_points(&self) -> Vec<f64> {
        let a = 3.0 * self.a3;
        let b = 2.0 * self.a2;
        let c = self.a1;

        if a == 0.0 {
            // Degenerate (β = 1): derivative is linear
            if b == 0.0 {
                return Vec::new();
            }
            return vec![-c / b];
        }

        let disc = b * b - 4.0 * a * c;
        if disc <= 0.0 {
            return Vec::new();
        }

        // Numerically stable quadratic roots
        let q = -0.5 * (b + b.signum() * disc.sqrt());
        let (r1, r2) = if q == 0.0 {
            (0.0, 0.0)
        } else {
            (q / a, c / q)
        };
        let mut roots = vec![r1, r2];
        roots.sort_by(|x, y| x.partial_cmp(y).unwrap());
        roots
    }

    /// Enumerate the real roots inside `[lo, hi]`, ascending.
    ///
    /// Each monotonic sub-interval contributes at most one root, found with
    /// Brent when its endpoints change sign.
    pub fn real_roots(&self, lo: f64, hi: f64) -> Result<Vec<f64>, SabrError> {
        let mut knots = vec![lo];
        for c in self.critical_points() {
            if c > lo && c < hi {
                knots.push(c);
            }
        }
        knots.push(hi);

        let solver = BrentSolver::new(SolverConfig::default());
        let mut roots = Vec::new();

        for pair in knots.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let (fa, fb) = (self.eval(a), self.eval(b));

            if fa == 0.0 {
                roots.push(a);
            } else if fa * fb < 0.0 {
                let root = solver.find_root(|x| self.eval(x), a, b)?;
                roots.push(root);
            }
        }
        if self.eval(hi) == 0.0 {
            roots.push(hi);
        }

        roots.dedup_by(|x, y| (*x - *y).abs() < 1e-9);
        Ok(roots)
    }
}

/// Solve for the ATM alpha implied by a quoted ATM lognormal volatility.
///
/// Returns the smallest strictly positive real root of the ATM cubic over
/// [`ALPHA_BRACKET`].
///
/// # Errors
///
/// - Input validation errors as for [`AlphaCubic::new`]
/// - `NoAlphaRoot` if the cubic has no positive real root in the bracket
///
/// # Examples
/// ```
/// use smile_models::sabr::atm_alpha;
///
/// let alpha = atm_alpha(0.0266, 0.4084, 0.25, 0.5, -0.0356, 1.0504).unwrap();
/// assert!(alpha > 0.0);
/// ```
pub fn atm_alpha(
    forward: f64,
    atm_vol: f64,
    expiry: f64,
    beta: f64,
    rho: f64,
    nu: f64,
) -> Result<f64, SabrError> {
    let (lo, hi) = ALPHA_BRACKET;
    let cubic = AlphaCubic::new(forward, atm_vol, expiry, beta, rho, nu)?;

    cubic
        .real_roots(lo, hi)?
        .into_iter()
        .find(|&root| root > 0.0)
        .ok_or(SabrError::NoAlphaRoot { lo, hi })
}
