//! Root-finding and least-squares solvers.
//!
//! This module provides the two numerical primitives the calibration engine
//! is built on:
//!
//! - [`BrentSolver`]: robust bracketed root finding without derivatives
//! - [`BoundedLeastSquares`]: Levenberg-Marquardt nonlinear least squares
//!   with per-parameter box bounds
//!
//! Root-finding solvers are configured through [`SolverConfig`]
//! (`tolerance`, `max_iterations`); the least-squares solver through
//! [`LeastSquaresConfig`], which adds damping control.
//!
//! ## Examples
//!
//! ### Root-finding
//!
//! ```
//! use smile_core::math::solvers::{BrentSolver, SolverConfig};
//!
//! // Solve x³ - x - 2 = 0 in [1, 2]
//! let solver = BrentSolver::new(SolverConfig::default());
//! let f = |x: f64| x * x * x - x - 2.0;
//!
//! let root = solver.find_root(f, 1.0, 2.0).unwrap();
//! assert!(f(root).abs() < 1e-10);
//! ```
//!
//! ### Bounded least squares
//!
//! ```
//! use smile_core::math::solvers::{BoundedLeastSquares, ParameterBounds};
//! use smile_core::types::SolverError;
//!
//! // Minimise (p[0] - 2)² + (p[1] - 3)² with p[0] capped at 1
//! let solver = BoundedLeastSquares::with_defaults().with_bounds(vec![
//!     ParameterBounds::new(0.0, 1.0),
//!     ParameterBounds::unbounded(),
//! ]);
//!
//! let residuals = |p: &[f64]| -> Result<Vec<f64>, SolverError> {
//!     Ok(vec![p[0] - 2.0, p[1] - 3.0])
//! };
//!
//! let fit = solver.solve(residuals, vec![0.5, 0.5]).unwrap();
//! assert!(fit.params[0] <= 1.0);
//! assert!((fit.params[1] - 3.0).abs() < 1e-5);
//! ```

mod brent;
mod config;
mod least_squares;

pub use brent::BrentSolver;
pub use config::SolverConfig;
pub use least_squares::{
    BoundedLeastSquares, LeastSquaresConfig, LeastSquaresError, LeastSquaresFit, ParameterBounds,
};
