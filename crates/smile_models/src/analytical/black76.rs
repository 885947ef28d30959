//! Black-76 pricing model for European options on forwards.
//!
//! Closed-form price and Greeks under lognormal forward dynamics:
//!
//! **Call price**: C = e^(-r·T)·(F·N(d₁) - K·N(d₂))
//! **Put price**:  P = e^(-r·T)·(K·N(-d₂) - F·N(-d₁))
//!
//! where
//! - d₁ = (ln(F/K) + σ²T/2) / (σ√T)
//! - d₂ = d₁ - σ√T
//!
//! For swaptions these are the simple price and Greeks of a European-style
//! payer or receiver exercise.

use num_traits::Float;

use super::distributions::{norm_cdf, norm_pdf};
use super::error::AnalyticalError;

/// Call/put flag.
///
/// Parses from the `'c'`/`'p'` characters used by market-data conventions;
/// any other flag is rejected before any pricing work.
///
/// # Examples
/// ```
/// use smile_models::analytical::OptionType;
///
/// assert_eq!(OptionType::try_from('c').unwrap(), OptionType::Call);
/// assert_eq!("p".parse::<OptionType>().unwrap(), OptionType::Put);
/// assert!(OptionType::try_from('x').is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OptionType {
    /// European call (payer).
    Call,
    /// European put (receiver).
    Put,
}

impl OptionType {
    /// Payoff sign: +1 for a call, -1 for a put.
    #[inline]
    fn sign<T: Float>(self) -> T {
        match self {
            OptionType::Call => T::one(),
            OptionType::Put => -T::one(),
        }
    }
}

impl TryFrom<char> for OptionType {
    type Error = AnalyticalError;

    fn try_from(flag: char) -> Result<Self, Self::Error> {
        match flag {
            'c' => Ok(OptionType::Call),
            'p' => Ok(OptionType::Put),
            other => Err(AnalyticalError::InvalidOptionFlag {
                flag: other.to_string(),
            }),
        }
    }
}

impl std::str::FromStr for OptionType {
    type Err = AnalyticalError;

    fn from_str(flag: &str) -> Result<Self, Self::Err> {
        match flag {
            "c" => Ok(OptionType::Call),
            "p" => Ok(OptionType::Put),
            other => Err(AnalyticalError::InvalidOptionFlag {
                flag: other.to_string(),
            }),
        }
    }
}

/// Black-76 model for European options on a forward.
///
/// Holds the forward level, the riskless rate used for discounting, and the
/// lognormal implied volatility; strikes and expiries are method arguments.
///
/// # Examples
/// ```
/// use smile_models::analytical::{Black76, OptionType};
///
/// let black = Black76::new(0.0266_f64, 0.02, 0.4084).unwrap();
/// let call = black.price(0.025, 0.25, OptionType::Call).unwrap();
/// let put = black.price(0.025, 0.25, OptionType::Put).unwrap();
///
/// // Put-call parity: C - P = e^(-rT)·(F - K)
/// let parity = call - put - (-0.02_f64 * 0.25).exp() * (0.0266 - 0.025);
/// assert!(parity.abs() < 1e-10);
/// ```
#[derive(Debug, Clone)]
pub struct Black76<T: Float> {
    /// Forward rate (F0)
    forward: T,
    /// Riskless rate used for discounting
    rate: T,
    /// Lognormal implied volatility
    volatility: T,
}

impl<T: Float> Black76<T> {
    /// Creates a new Black-76 model.
    ///
    /// # Errors
    /// - `AnalyticalError::InvalidForward` if `forward <= 0`
    /// - `AnalyticalError::InvalidVolatility` if `volatility <= 0`
    pub fn new(forward: T, rate: T, volatility: T) -> Result<Self, AnalyticalError> {
        let zero = T::zero();

        if forward <= zero || forward.is_nan() {
            return Err(AnalyticalError::InvalidForward {
                forward: forward.to_f64().unwrap_or(f64::NAN),
            });
        }
        if volatility <= zero || volatility.is_nan() {
            return Err(AnalyticalError::InvalidVolatility {
                volatility: volatility.to_f64().unwrap_or(f64::NAN),
            });
        }

        Ok(Self {
            forward,
            rate,
            volatility,
        })
    }

    /// Returns the forward rate.
    #[inline]
    pub fn forward(&self) -> T {
        self.forward
    }

    /// Returns the riskless rate.
    #[inline]
    pub fn rate(&self) -> T {
        self.rate
    }

    /// Returns the volatility.
    #[inline]
    pub fn volatility(&self) -> T {
        self.volatility
    }

    fn validate_point(&self, strike: T, expiry: T) -> Result<(), AnalyticalError> {
        let zero = T::zero();
        if strike <= zero || strike.is_nan() {
            return Err(AnalyticalError::InvalidStrike {
                strike: strike.to_f64().unwrap_or(f64::NAN),
            });
        }
        if expiry <= zero || expiry.is_nan() {
            return Err(AnalyticalError::InvalidExpiry {
                expiry: expiry.to_f64().unwrap_or(f64::NAN),
            });
        }
        Ok(())
    }

    /// The d₁ term: (ln(F/K) + σ²T/2) / (σ√T).
    ///
    /// Assumes `strike > 0` and `expiry > 0`; the pricing methods validate
    /// this before calling.
    #[inline]
    pub fn d1(&self, strike: T, expiry: T) -> T {
        let half = T::from(0.5).unwrap();
        let vol_sqrt_t = self.volatility * expiry.sqrt();
        ((self.forward / strike).ln() + half * self.volatility * self.volatility * expiry)
            / vol_sqrt_t
    }

    /// The d₂ term: d₁ - σ√T.
    #[inline]
    pub fn d2(&self, strike: T, expiry: T) -> T {
        self.d1(strike, expiry) - self.volatility * expiry.sqrt()
    }

    /// European option price.
    ///
    /// V = e^(-r·T)·a·(F·N(a·d₁) - K·N(a·d₂)) with a = +1 (call) or -1 (put).
    ///
    /// # Errors
    /// `InvalidStrike` / `InvalidExpiry` for non-positive arguments.
    pub fn price(&self, strike: T, expiry: T, option_type: OptionType) -> Result<T, AnalyticalError> {
        self.validate_point(strike, expiry)?;

        let a: T = option_type.sign();
        let d1 = self.d1(strike, expiry);
        let d2 = self.d2(strike, expiry);
        let discount = (-self.rate * expiry).exp();

        Ok(discount * a * (self.forward * norm_cdf(a * d1) - strike * norm_cdf(a * d2)))
    }

    /// European option Delta (∂V/∂F).
    ///
    /// Call: e^(-r·T)·N(d₁); put: e^(-r·T)·(N(d₁) - 1).
    ///
    /// # Errors
    /// `InvalidStrike` / `InvalidExpiry` for non-positive arguments.
    pub fn delta(&self, strike: T, expiry: T, option_type: OptionType) -> Result<T, AnalyticalError> {
        self.validate_point(strike, expiry)?;

        let d1 = self.d1(strike, expiry);
        let discount = (-self.rate * expiry).exp();
        let value = match option_type {
            OptionType::Call => discount * norm_cdf(d1),
            OptionType::Put => discount * (norm_cdf(d1) - T::one()),
        };
        Ok(value)
    }

    /// Gamma (∂²V/∂F²), identical for calls and puts.
    ///
    /// Γ = e^(-r·T)·φ(d₁) / (F·σ·√T)
    ///
    /// # Errors
    /// `InvalidStrike` / `InvalidExpiry` for non-positive arguments.
    pub fn gamma(&self, strike: T, expiry: T) -> Result<T, AnalyticalError> {
        self.validate_point(strike, expiry)?;

        let d1 = self.d1(strike, expiry);
        let discount = (-self.rate * expiry).exp();
        Ok(discount / (self.forward * self.volatility * expiry.sqrt()) * norm_pdf(d1))
    }

    /// Vega (∂V/∂σ), identical for calls and puts.
    ///
    /// ν = F·e^(-r·T)·φ(d₁)·√T
    ///
    /// # Errors
    /// `InvalidStrike` / `InvalidExpiry` for non-positive arguments.
    pub fn vega(&self, strike: T, expiry: T) -> Result<T, AnalyticalError> {
        self.validate_point(strike, expiry)?;

        let d1 = self.d1(strike, expiry);
        let discount = (-self.rate * expiry).exp();
        Ok(self.forward * discount * norm_pdf(d1) * expiry.sqrt())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn itm() -> Black76<f64> {
        // 3M option on a forward rate, OTM call / ITM put at K = 2.5%
        Black76::new(0.018, 0.02, 0.4084).unwrap()
    }

    #[test]
    fn constructor_validates() {
        assert!(matches!(
            Black76::new(-0.01_f64, 0.02, 0.4),
            Err(AnalyticalError::InvalidForward { .. })
        ));
        assert!(matches!(
            Black76::new(0.0_f64, 0.02, 0.4),
            Err(AnalyticalError::InvalidForward { .. })
        ));
        assert!(matches!(
            Black76::new(0.018_f64, 0.02, 0.0),
            Err(AnalyticalError::InvalidVolatility { .. })
        ));
        assert!(matches!(
            Black76::new(f64::NAN, 0.02, 0.4),
            Err(AnalyticalError::InvalidForward { .. })
        ));
    }

    #[test]
    fn accessors() {
        let black = itm();
        assert_eq!(black.forward(), 0.018);
        assert_eq!(black.rate(), 0.02);
        assert_eq!(black.volatility(), 0.4084);
    }

    #[test]
    fn methods_validate_strike_and_expiry() {
        let black = itm();
        assert!(matches!(
            black.price(0.0, 0.25, OptionType::Call),
            Err(AnalyticalError::InvalidStrike { .. })
        ));
        assert!(matches!(
            black.delta(0.025, -1.0, OptionType::Call),
            Err(AnalyticalError::InvalidExpiry { .. })
        ));
        assert!(matches!(
            black.gamma(-0.025, 0.25),
            Err(AnalyticalError::InvalidStrike { .. })
        ));
        assert!(matches!(
            black.vega(0.025, 0.0),
            Err(AnalyticalError::InvalidExpiry { .. })
        ));
    }

    #[test]
    fn option_type_parsing() {
        assert_eq!(OptionType::try_from('c').unwrap(), OptionType::Call);
        assert_eq!(OptionType::try_from('p').unwrap(), OptionType::Put);
        assert!(matches!(
            OptionType::try_from('x'),
            Err(AnalyticalError::InvalidOptionFlag { .. })
        ));
        assert_eq!("c".parse::<OptionType>().unwrap(), OptionType::Call);
        assert!("call".parse::<OptionType>().is_err());
    }

    #[test]
    fn put_call_parity() {
        let black = itm();
        let call = black.price(0.025, 0.25, OptionType::Call).unwrap();
        let put = black.price(0.025, 0.25, OptionType::Put).unwrap();
        let forward_value = (-0.02_f64 * 0.25).exp() * (0.018 - 0.025);
        assert_abs_diff_eq!(call - put, forward_value, epsilon = 1e-12);
    }

    #[test]
    fn price_reference_values() {
        // The OTM price is a small difference of two CDF terms, so the
        // comparison is absolute at the CDF approximation scale
        let otm = itm().price(0.025, 0.25, OptionType::Call).unwrap();
        assert_abs_diff_eq!(otm, 9.775347e-05, epsilon = 1e-8);

        let deep = Black76::new(0.03, 0.02, 0.4084).unwrap();
        let itm_price = deep.price(0.025, 0.25, OptionType::Call).unwrap();
        assert_relative_eq!(itm_price, 0.005539448, max_relative = 1e-5);
    }

    #[test]
    fn delta_reference_values() {
        let otm = itm().delta(0.025, 0.25, OptionType::Call).unwrap();
        assert_relative_eq!(otm, 0.06562295, max_relative = 1e-5);

        let deep = Black76::new(0.03, 0.02, 0.4084).unwrap();
        let itm_delta = deep.delta(0.025, 0.25, OptionType::Call).unwrap();
        assert_relative_eq!(itm_delta, 0.8359315, max_relative = 1e-5);
    }

    #[test]
    fn put_delta_is_call_delta_minus_discount() {
        let black = itm();
        let call = black.delta(0.025, 0.25, OptionType::Call).unwrap();
        let put = black.delta(0.025, 0.25, OptionType::Put).unwrap();
        let discount = (-0.02_f64 * 0.25).exp();
        assert_abs_diff_eq!(call - put, discount, epsilon = 1e-12);
    }

    #[test]
    fn gamma_reference_values() {
        let otm = itm().gamma(0.025, 0.25).unwrap();
        assert_relative_eq!(otm, 34.71331, max_relative = 1e-5);

        let deep = Black76::new(0.03, 0.02, 0.4084).unwrap();
        assert_relative_eq!(deep.gamma(0.025, 0.25).unwrap(), 39.50014, max_relative = 1e-5);
    }

    #[test]
    fn vega_reference_values() {
        let otm = itm().vega(0.025, 0.25).unwrap();
        assert_relative_eq!(otm, 0.00114833, max_relative = 1e-5);

        let deep = Black76::new(0.03, 0.02, 0.4084).unwrap();
        assert_relative_eq!(deep.vega(0.025, 0.25).unwrap(), 0.003629668, max_relative = 1e-5);
    }

    #[test]
    fn greeks_are_positive_where_expected() {
        let black = itm();
        assert!(black.gamma(0.025, 0.25).unwrap() > 0.0);
        assert!(black.vega(0.025, 0.25).unwrap() > 0.0);
        assert!(black.price(0.025, 0.25, OptionType::Call).unwrap() > 0.0);
    }

    #[test]
    fn d2_below_d1() {
        let black = itm();
        assert!(black.d2(0.025, 0.25) < black.d1(0.025, 0.25));
    }
}
