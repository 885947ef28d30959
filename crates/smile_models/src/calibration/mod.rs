//! SABR smile calibration.
//!
//! Fits SABR parameters to a market smile by minimising the sum of squared
//! differences between model-implied and market-quoted lognormal
//! volatilities, in two modes:
//!
//! - [`AtmCalibrator`]: ATM-constrained — fits (ρ, ν), deriving α from the
//!   quoted ATM volatility through the ATM cubic at every objective
//!   evaluation
//! - [`FullCalibrator`]: full — fits (α, ρ, ν) directly
//!
//! Both run the bounded least-squares solver over a *stateless* objective: a
//! free function of the trial vector and an immutable context value holding
//! the market data, so the objective is independently testable and carries
//! no hidden state.
//!
//! Failing to converge is reported on the returned [`SmileFit`], not raised;
//! a domain error inside an objective evaluation aborts the calibration
//! call.
//!
//! # Example
//!
//! ```
//! use smile_models::calibration::{calibrate_full, MarketSmile};
//!
//! let smile = MarketSmile::new(
//!     0.0266,
//!     0.25,
//!     vec![0.02, 0.0266, 0.035],
//!     vec![0.4668, 0.4084, 0.4161],
//! )
//! .unwrap();
//!
//! let fit = calibrate_full(&smile, 0.5, 0.05, 0.1, 0.7).unwrap();
//! assert!(fit.params().alpha() > 0.0);
//! ```

pub mod atm;
pub mod error;
pub mod full;
pub mod result;

pub use atm::{calibrate_atm, AtmCalibrator, AtmGuess};
pub use error::CalibrationError;
pub use full::{calibrate_full, FullCalibrator, FullGuess};
pub use result::SmileFit;

use smile_core::math::solvers::LeastSquaresError;

use crate::sabr::{lognormal_vol, SabrError, SabrParams};

/// Practical correlation box for both calibration modes.
///
/// The mapper is singular at ρ = ±1, so the search box is kept strictly
/// inside the open interval; every point of the box is then evaluable.
pub const RHO_LIMIT: f64 = 0.999;

/// A market-quoted volatility smile.
///
/// Holds a strike vector and a matching lognormal-volatility vector
/// (alignment by index), the forward and the expiry, plus an optional quoted
/// ATM volatility required by the ATM-constrained mode. The length match is
/// validated before any numeric work, as are the positivity constraints on
/// every quote.
///
/// # Examples
/// ```
/// use smile_models::calibration::MarketSmile;
///
/// let smile = MarketSmile::new(0.0266, 0.25, vec![0.025, 0.03], vec![0.42, 0.40])
///     .unwrap()
///     .with_atm_vol(0.4084)
///     .unwrap();
/// assert_eq!(smile.len(), 2);
/// assert_eq!(smile.atm_vol(), Some(0.4084));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MarketSmile {
    forward: f64,
    expiry: f64,
    atm_vol: Option<f64>,
    strikes: Vec<f64>,
    market_vols: Vec<f64>,
}

impl MarketSmile {
    /// Create a validated smile.
    ///
    /// # Errors
    ///
    /// - `MismatchedLengths` if the vectors differ in length
    /// - `EmptySmile` for zero strikes
    /// - `InvalidQuote` for a non-positive strike or volatility
    /// - forward/expiry domain errors via [`SabrError`]
    pub fn new(
        forward: f64,
        expiry: f64,
        strikes: Vec<f64>,
        market_vols: Vec<f64>,
    ) -> Result<Self, CalibrationError> {
        if strikes.len() != market_vols.len() {
            return Err(CalibrationError::MismatchedLengths {
                strikes: strikes.len(),
                vols: market_vols.len(),
            });
        }
        if strikes.is_empty() {
            return Err(CalibrationError::EmptySmile);
        }
        if forward <= 0.0 || forward.is_nan() {
            return Err(SabrError::InvalidForward(forward).into());
        }
        if expiry <= 0.0 || expiry.is_nan() {
            return Err(SabrError::InvalidExpiry(expiry).into());
        }
        for (index, &strike) in strikes.iter().enumerate() {
            if strike <= 0.0 || strike.is_nan() {
                return Err(CalibrationError::InvalidQuote {
                    index,
                    name: "strike",
                    value: strike,
                });
            }
        }
        for (index, &vol) in market_vols.iter().enumerate() {
            if vol <= 0.0 || vol.is_nan() {
                return Err(CalibrationError::InvalidQuote {
                    index,
                    name: "vol",
                    value: vol,
                });
            }
        }

        Ok(Self {
            forward,
            expiry,
            atm_vol: None,
            strikes,
            market_vols,
        })
    }

    /// Attach the quoted ATM volatility (required by the ATM-constrained
    /// mode).
    ///
    /// # Errors
    /// `InvalidAtmVol` for a non-positive value.
    pub fn with_atm_vol(mut self, atm_vol: f64) -> Result<Self, CalibrationError> {
        if atm_vol <= 0.0 || atm_vol.is_nan() {
            return Err(SabrError::InvalidAtmVol(atm_vol).into());
        }
        self.atm_vol = Some(atm_vol);
        Ok(self)
    }

    /// Forward rate.
    pub fn forward(&self) -> f64 {
        self.forward
    }

    /// Time to expiry in years.
    pub fn expiry(&self) -> f64 {
        self.expiry
    }

    /// Quoted ATM volatility, if attached.
    pub fn atm_vol(&self) -> Option<f64> {
        self.atm_vol
    }

    /// Strike vector.
    pub fn strikes(&self) -> &[f64] {
        &self.strikes
    }

    /// Market volatility vector, aligned with [`strikes`](Self::strikes).
    pub fn market_vols(&self) -> &[f64] {
        &self.market_vols
    }

    /// Number of quotes.
    pub fn len(&self) -> usize {
        self.strikes.len()
    }

    /// Whether the smile has no quotes (never true for a constructed smile).
    pub fn is_empty(&self) -> bool {
        self.strikes.is_empty()
    }
}

/// Re-evaluate the mapper at every strike of the smile.
pub(crate) fn fitted_vols(smile: &MarketSmile, params: &SabrParams) -> Result<Vec<f64>, SabrError> {
    smile
        .strikes()
        .iter()
        .map(|&strike| lognormal_vol(smile.forward(), strike, smile.expiry(), params))
        .collect()
}

/// Unwrap a solver failure into the calibration error taxonomy.
pub(crate) fn from_solve_error(err: LeastSquaresError<SabrError>) -> CalibrationError {
    match err {
        LeastSquaresError::Objective(model) => CalibrationError::Model(model),
        LeastSquaresError::Solver(solver) => CalibrationError::Solver(solver),
    }
}
