//! SABR Greeks.
//!
//! Each sensitivity combines the analytic Black-76 Greek evaluated at the
//! SABR-implied volatility with a central-difference correction from
//! bumping the relevant SABR input:
//!
//! - **Delta**: Black-76 Delta + Vega · ∂σ/∂F (forward bump)
//! - **Gamma**: Black-76 Gamma + Vega · ∂²σ/∂F² + ∂σ/∂F · discounted-density
//!   cross term
//! - **Vega**: Black-76 Vega scaled by the σ(K)/σ(ATM) backbone ratio
//! - **Vanna**: Black-76 Vega · ∂σ/∂ρ (correlation bump)
//! - **Volga**: Black-76 Vega · ∂σ/∂ν (vol-of-vol bump)
//!
//! The central differences use the half-basis-point default bump on each
//! side, a one-basis-point total width.

use smile_models::analytical::{norm_pdf, Black76, OptionType};
use smile_models::sabr::{lognormal_vol, SabrError, SabrParams};

use crate::bump::{BumpDirection, BumpSpec, BumpTarget, DEFAULT_BUMP_SIZE};
use crate::error::RiskError;

/// Sensitivity engine for one option point under calibrated SABR
/// parameters.
///
/// Pure evaluation of the inputs held: no calibration is re-run and no
/// state survives a call. The parameters may come from either calibration
/// mode or be supplied directly.
///
/// # Examples
/// ```
/// use smile_models::analytical::OptionType;
/// use smile_models::sabr::SabrParams;
/// use smile_risk::SabrGreeks;
///
/// let params = SabrParams::new(0.06943288, 0.5, 0.02668178, 0.9025896).unwrap();
/// let greeks = SabrGreeks::new(0.018, 0.025, 0.25, 0.02, params).unwrap();
///
/// let delta = greeks.delta(OptionType::Call).unwrap();
/// assert!(delta > 0.0 && delta < 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct SabrGreeks {
    forward: f64,
    strike: f64,
    expiry: f64,
    rate: f64,
    params: SabrParams,
    bump_size: f64,
}

impl SabrGreeks {
    /// Create a sensitivity engine for one option point.
    ///
    /// # Errors
    /// `InvalidForward` / `InvalidStrike` / `InvalidExpiry` (via
    /// [`RiskError::Model`]) for non-positive market inputs.
    pub fn new(
        forward: f64,
        strike: f64,
        expiry: f64,
        rate: f64,
        params: SabrParams,
    ) -> Result<Self, RiskError> {
        if forward <= 0.0 || forward.is_nan() {
            return Err(SabrError::InvalidForward(forward).into());
        }
        if strike <= 0.0 || strike.is_nan() {
            return Err(SabrError::InvalidStrike(strike).into());
        }
        if expiry <= 0.0 || expiry.is_nan() {
            return Err(SabrError::InvalidExpiry(expiry).into());
        }
        Ok(Self {
            forward,
            strike,
            expiry,
            rate,
            params,
            bump_size: DEFAULT_BUMP_SIZE,
        })
    }

    /// Replace the bump magnitude used for the central differences.
    ///
    /// # Errors
    /// `InvalidBumpSize` for a non-positive magnitude.
    pub fn with_bump_size(mut self, size: f64) -> Result<Self, RiskError> {
        if size <= 0.0 || size.is_nan() {
            return Err(RiskError::InvalidBumpSize(size));
        }
        self.bump_size = size;
        Ok(self)
    }

    /// The SABR parameters in use.
    pub fn params(&self) -> &SabrParams {
        &self.params
    }

    /// The Black-76-equivalent implied volatility at this point.
    pub fn implied_vol(&self) -> Result<f64, RiskError> {
        Ok(lognormal_vol(
            self.forward,
            self.strike,
            self.expiry,
            &self.params,
        )?)
    }

    fn black(&self, vol: f64) -> Result<Black76<f64>, RiskError> {
        Ok(Black76::new(self.forward, self.rate, vol)?)
    }

    /// Up/down bumped vols for a target, at the engine's bump magnitude.
    fn bumped_pair(&self, target: BumpTarget) -> Result<(f64, f64), RiskError> {
        let up = BumpSpec::new(target, BumpDirection::Up)
            .with_size(self.bump_size)?
            .bumped_vol(self.forward, self.strike, self.expiry, &self.params)?;
        let dn = BumpSpec::new(target, BumpDirection::Down)
            .with_size(self.bump_size)?
            .bumped_vol(self.forward, self.strike, self.expiry, &self.params)?;
        Ok((up, dn))
    }

    /// Central-difference sensitivity of the implied vol to a target.
    fn vol_sensitivity(&self, target: BumpTarget) -> Result<f64, RiskError> {
        let (up, dn) = self.bumped_pair(target)?;
        Ok((up - dn) / (2.0 * self.bump_size))
    }

    /// First-order risk against the forward, with the smile correction.
    ///
    /// Black-76 Delta plus Black-76 Vega times the central-difference
    /// sensitivity of the implied vol to the forward.
    ///
    /// # Errors
    /// Domain failures from the mapper or the analytics.
    pub fn delta(&self, option_type: OptionType) -> Result<f64, RiskError> {
        let vol = self.implied_vol()?;
        let black = self.black(vol)?;

        let delta = black.delta(self.strike, self.expiry, option_type)?;
        let vega = black.vega(self.strike, self.expiry)?;
        let dvol_df = self.vol_sensitivity(BumpTarget::Forward)?;

        Ok(delta + vega * dvol_df)
    }

    /// Second-order risk against the forward, with the smile correction.
    ///
    /// Black-76 Gamma, plus Vega times the second-order central difference
    /// of the implied vol, plus the first-order difference times a
    /// discounted-density cross term.
    ///
    /// # Errors
    /// Domain failures from the mapper or the analytics.
    pub fn gamma(&self) -> Result<f64, RiskError> {
        let vol = self.implied_vol()?;
        let black = self.black(vol)?;

        let gamma = black.gamma(self.strike, self.expiry)?;
        let vega = black.vega(self.strike, self.expiry)?;
        let d1 = black.d1(self.strike, self.expiry);

        let (up, dn) = self.bumped_pair(BumpTarget::Forward)?;
        let width = 2.0 * self.bump_size;
        let first_order = (up - dn) / width;
        let second_order = (up - 2.0 * vol + dn) / (width * width);

        let density = (-self.rate * self.expiry).exp() * norm_pdf(d1);
        let cross_term = density - self.strike * density;

        Ok(gamma + vega * second_order + first_order * cross_term)
    }

    /// First-order risk against the implied volatility level.
    ///
    /// Black-76 Vega scaled by the ratio of the strike-level implied vol to
    /// the ATM-level implied vol, capturing the backbone correction. At the
    /// money the ratio is 1 and this is the plain Black-76 Vega.
    ///
    /// # Errors
    /// Domain failures from the mapper or the analytics.
    pub fn vega(&self) -> Result<f64, RiskError> {
        let vol = self.implied_vol()?;
        let black = self.black(vol)?;

        let vega = black.vega(self.strike, self.expiry)?;
        let atm_vol = lognormal_vol(self.forward, self.forward, self.expiry, &self.params)?;

        Ok(vega * vol / atm_vol)
    }

    /// First-order risk against the correlation parameter.
    ///
    /// Black-76 Vega times the central-difference sensitivity of the
    /// implied vol to a ρ bump.
    ///
    /// # Errors
    /// Domain failures from the mapper or the analytics.
    pub fn vanna(&self) -> Result<f64, RiskError> {
        let vol = self.implied_vol()?;
        let black = self.black(vol)?;

        let vega = black.vega(self.strike, self.expiry)?;
        Ok(vega * self.vol_sensitivity(BumpTarget::Rho)?)
    }

    /// First-order risk against the vol-of-vol parameter.
    ///
    /// Black-76 Vega times the central-difference sensitivity of the
    /// implied vol to a ν bump.
    ///
    /// # Errors
    /// Domain failures from the mapper or the analytics.
    pub fn volga(&self) -> Result<f64, RiskError> {
        let vol = self.implied_vol()?;
        let black = self.black(vol)?;

        let vega = black.vega(self.strike, self.expiry)?;
        Ok(vega * self.vol_sensitivity(BumpTarget::Nu)?)
    }
}
