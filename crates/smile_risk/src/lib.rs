//! # smile_risk
//!
//! Risk sensitivities for calibrated SABR positions, following the
//! bump-and-reval scheme of Hagan et al., "Managing Smile Risk" (p. 12):
//! analytic Black-76 Greeks evaluated at the SABR-implied volatility are
//! combined with central-difference bumps of the SABR inputs.
//!
//! - [`BumpSpec`]: a named parameter bump (target, direction, magnitude)
//! - [`SabrGreeks`]: Delta, Gamma, Vega, Vanna, Volga for one option point
//!
//! All operations assume the parameters are already calibrated; nothing here
//! re-runs calibration, and every call is a pure function of its inputs.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod bump;
pub mod error;
pub mod greeks;

pub use bump::{BumpDirection, BumpSpec, BumpTarget, DEFAULT_BUMP_SIZE};
pub use error::RiskError;
pub use greeks::SabrGreeks;
