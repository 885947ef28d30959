//! # smile_core: Numerical Foundation for the SABR Smile Engine
//!
//! Bottom layer of the three-crate workspace, providing:
//! - Root-finding and bounded least-squares solvers (`math::solvers`)
//! - Calibration abstractions: `Calibrator`, `CalibrationResult` (`traits`)
//! - Error types: `SolverError` (`types::error`)
//!
//! This crate has no dependencies on other `smile_*` crates and a minimal
//! external footprint:
//! - num-traits: generic floating-point computation
//! - thiserror: structured error types
//! - serde: serialisation support (optional)
//!
//! ## Usage
//!
//! ```rust
//! use smile_core::math::solvers::{BrentSolver, SolverConfig};
//!
//! let solver = BrentSolver::new(SolverConfig::default());
//! let root = solver.find_root(|x: f64| x * x - 2.0, 0.0, 2.0).unwrap();
//! assert!((root - std::f64::consts::SQRT_2).abs() < 1e-10);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod math;
pub mod traits;
pub mod types;
