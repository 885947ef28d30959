//! # smile_models
//!
//! Black-76 analytics and the SABR smile engine:
//! - Closed-form Black-76 price and Greeks for options on forwards
//!   (`analytical`)
//! - Hagan's asymptotic SABR-to-lognormal volatility mapping and the ATM
//!   alpha solver (`sabr`)
//! - Smile calibration in two modes, ATM-constrained and full
//!   (`calibration`)
//!
//! ## Design principles
//!
//! - All components are pure functions of their inputs; nothing is stateful
//!   and values are immutable once constructed.
//! - Input domains are validated before any numeric work; numerical
//!   singularities surface as typed errors, never as NaN.
//! - Failure of the optimizer to converge is a status on the returned fit,
//!   not an error.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod analytical;
pub mod calibration;
pub mod sabr;
