//! SABR model core.
//!
//! The SABR (Stochastic Alpha, Beta, Rho) model describes a forward rate as
//! a CEV process with stochastic volatility:
//!
//! ```text
//! dF     = alpha · F^beta · dW_F
//! dalpha = nu · alpha · dW_a
//! dW_F · dW_a = rho · dt
//! ```
//!
//! This module provides:
//! - [`SabrParams`]: the validated (Alpha, Beta, Rho, Nu) parameter set
//! - [`lognormal_vol`]: Hagan's asymptotic mapping from SABR parameters to a
//!   Black-76-equivalent lognormal volatility (eqn 2.17a of Hagan et al.,
//!   "Managing Smile Risk", 2002)
//! - [`atm_alpha`] / [`AlphaCubic`]: the ATM diffusion-parameter solve
//! - [`SabrError`]: typed input and domain errors

pub mod alpha;
pub mod error;
pub mod hagan;
pub mod params;

pub use alpha::{atm_alpha, AlphaCubic, ALPHA_BRACKET};
pub use error::SabrError;
pub use hagan::lognormal_vol;
pub use params::SabrParams;
