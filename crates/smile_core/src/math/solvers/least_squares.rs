//! Bounded Levenberg-Marquardt nonlinear least squares.
//!
//! Solves problems of the form
//!
//! ```text
//! min_p ||f(p)||²   subject to   lo_i <= p_i <= hi_i
//! ```
//!
//! where `f(p)` is a vector-valued residual function. The damped normal
//! equations `(JᵀJ + λI) δ = -Jᵀ r` are solved with a finite-difference
//! Jacobian and Cholesky factorisation; trial points are projected into the
//! box before every residual evaluation.
//!
//! Two properties of the implementation are relied on by the calibration
//! layer:
//!
//! - Steps are accepted only when they reduce the sum of squares, so the
//!   returned objective is never worse than the objective at the (projected)
//!   initial guess.
//! - The residual function is fallible; an `Err` from any evaluation aborts
//!   the solve immediately instead of iterating on a poisoned objective.

use crate::types::SolverError;
use thiserror::Error;

/// Inclusive box bounds for a single parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParameterBounds {
    /// Minimum allowed value.
    pub min: f64,
    /// Maximum allowed value.
    pub max: f64,
}

impl ParameterBounds {
    /// Create new bounds.
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Bounds for a strictly positive parameter (floored at 1e-9).
    pub fn positive() -> Self {
        Self {
            min: 1e-9,
            max: f64::INFINITY,
        }
    }

    /// Bounds for a non-negative parameter.
    pub fn non_negative() -> Self {
        Self {
            min: 0.0,
            max: f64::INFINITY,
        }
    }

    /// Bounds for a parameter in `[0, 1]`.
    pub fn unit_interval() -> Self {
        Self { min: 0.0, max: 1.0 }
    }

    /// Unbounded in both directions.
    pub fn unbounded() -> Self {
        Self {
            min: f64::NEG_INFINITY,
            max: f64::INFINITY,
        }
    }

    /// Check whether a value lies within the bounds.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Clamp a value into the bounds.
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

impl Default for ParameterBounds {
    fn default() -> Self {
        Self::unbounded()
    }
}

/// Configuration for the bounded least-squares solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeastSquaresConfig {
    /// Convergence tolerance on the residual norm.
    pub tolerance: f64,
    /// Convergence tolerance on the relative parameter step.
    pub param_tolerance: f64,
    /// Maximum number of iterations.
    pub max_iterations: usize,
    /// Initial damping factor.
    pub initial_lambda: f64,
    /// Factor applied to lambda on a rejected step.
    pub lambda_up: f64,
    /// Factor applied to lambda on an accepted step.
    pub lambda_down: f64,
    /// Lower cap for lambda.
    pub min_lambda: f64,
    /// Upper cap for lambda.
    pub max_lambda: f64,
}

impl Default for LeastSquaresConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-10,
            param_tolerance: 1e-10,
            max_iterations: 100,
            initial_lambda: 1e-3,
            lambda_up: 10.0,
            lambda_down: 0.1,
            min_lambda: 1e-10,
            max_lambda: 1e10,
        }
    }
}

impl LeastSquaresConfig {
    /// Create a configuration with the given tolerance and iteration cap.
    pub fn new(tolerance: f64, max_iterations: usize) -> Self {
        Self {
            tolerance,
            max_iterations,
            ..Default::default()
        }
    }

    /// Relaxed tolerances for quick fits.
    pub fn fast() -> Self {
        Self {
            tolerance: 1e-6,
            max_iterations: 50,
            ..Default::default()
        }
    }

    /// Tight tolerances for high-precision fits.
    pub fn high_precision() -> Self {
        Self {
            tolerance: 1e-14,
            param_tolerance: 1e-14,
            max_iterations: 500,
            ..Default::default()
        }
    }
}

/// Result of a bounded least-squares solve.
#[derive(Debug, Clone, PartialEq)]
pub struct LeastSquaresFit {
    /// Final parameter vector (inside the box).
    pub params: Vec<f64>,
    /// Final residual sum of squares.
    pub residual_ss: f64,
    /// Number of iterations performed.
    pub iterations: usize,
    /// Whether a convergence criterion was met.
    pub converged: bool,
}

impl LeastSquaresFit {
    /// Root mean square error over `n_observations` residuals.
    pub fn rmse(&self, n_observations: usize) -> f64 {
        if n_observations == 0 {
            return 0.0;
        }
        (self.residual_ss / n_observations as f64).sqrt()
    }
}

/// Error from a bounded least-squares solve.
#[derive(Error, Debug)]
pub enum LeastSquaresError<E: std::error::Error> {
    /// The residual function failed at a trial point; the solve was aborted.
    #[error("objective evaluation failed: {0}")]
    Objective(E),
    /// The problem was degenerate before iteration started.
    #[error(transparent)]
    Solver(SolverError),
}

/// Levenberg-Marquardt solver with per-parameter box bounds.
///
/// # Example
///
/// ```
/// use smile_core::math::solvers::BoundedLeastSquares;
/// use smile_core::types::SolverError;
///
/// // Fit y = a·exp(-b·x) with true (a, b) = (2, 0.5)
/// let x_data: [f64; 5] = [0.0, 1.0, 2.0, 3.0, 4.0];
/// let y_data: Vec<f64> = x_data.iter().map(|&x| 2.0 * (-0.5 * x).exp()).collect();
///
/// let residuals = |p: &[f64]| -> Result<Vec<f64>, SolverError> {
///     Ok(x_data
///         .iter()
///         .zip(&y_data)
///         .map(|(&x, &y)| p[0] * (-p[1] * x).exp() - y)
///         .collect())
/// };
///
/// let fit = BoundedLeastSquares::with_defaults()
///     .solve(residuals, vec![1.0, 1.0])
///     .unwrap();
/// assert!(fit.converged);
/// assert!((fit.params[0] - 2.0).abs() < 0.01);
/// ```
#[derive(Debug, Clone)]
pub struct BoundedLeastSquares {
    config: LeastSquaresConfig,
    bounds: Vec<ParameterBounds>,
}

impl BoundedLeastSquares {
    /// Create a solver with the given configuration and no bounds.
    pub fn new(config: LeastSquaresConfig) -> Self {
        Self {
            config,
            bounds: Vec::new(),
        }
    }

    /// Create a solver with default configuration and no bounds.
    pub fn with_defaults() -> Self {
        Self::new(LeastSquaresConfig::default())
    }

    /// Attach per-parameter box bounds.
    ///
    /// Parameters beyond the end of the bounds vector are unbounded.
    pub fn with_bounds(mut self, bounds: Vec<ParameterBounds>) -> Self {
        self.bounds = bounds;
        self
    }

    /// The solver configuration.
    pub fn config(&self) -> &LeastSquaresConfig {
        &self.config
    }

    /// The attached box bounds.
    pub fn bounds(&self) -> &[ParameterBounds] {
        &self.bounds
    }

    fn project(&self, params: &[f64]) -> Vec<f64> {
        params
            .iter()
            .enumerate()
            .map(|(i, &p)| self.bounds.get(i).map_or(p, |b| b.clamp(p)))
            .collect()
    }

    /// Minimise `||residuals(p)||²` over the box, starting from
    /// `initial_params` (projected into the box first).
    ///
    /// # Errors
    ///
    /// - [`LeastSquaresError::Objective`] if any residual evaluation fails
    /// - [`LeastSquaresError::Solver`] for a degenerate problem (empty
    ///   parameter or residual vector)
    ///
    /// A solve that merely fails to converge is NOT an error: the best
    /// point found is returned with `converged = false`.
    pub fn solve<F, E>(
        &self,
        residuals: F,
        initial_params: Vec<f64>,
    ) -> Result<LeastSquaresFit, LeastSquaresError<E>>
    where
        F: Fn(&[f64]) -> Result<Vec<f64>, E>,
        E: std::error::Error,
    {
        if initial_params.is_empty() {
            return Err(LeastSquaresError::Solver(SolverError::NumericalInstability(
                "empty parameter vector".to_string(),
            )));
        }

        let n_params = initial_params.len();
        let mut params = self.project(&initial_params);
        let mut lambda = self.config.initial_lambda;

        let mut r = residuals(&params).map_err(LeastSquaresError::Objective)?;
        if r.is_empty() {
            return Err(LeastSquaresError::Solver(SolverError::NumericalInstability(
                "empty residual vector".to_string(),
            )));
        }
        let mut ss = sum_of_squares(&r);

        for iteration in 0..self.config.max_iterations {
            if ss.sqrt() < self.config.tolerance {
                return Ok(LeastSquaresFit {
                    params,
                    residual_ss: ss,
                    iterations: iteration,
                    converged: true,
                });
            }

            let jacobian = self
                .jacobian(&residuals, &params, &r)
                .map_err(LeastSquaresError::Objective)?;

            let delta = match solve_damped_normal_equations(&jacobian, &r, lambda, n_params) {
                Some(d) => d,
                None => {
                    // Singular normal equations; damp harder and retry
                    lambda = (lambda * self.config.lambda_up).min(self.config.max_lambda);
                    continue;
                }
            };

            let step_norm = delta.iter().map(|d| d * d).sum::<f64>().sqrt();
            let param_norm = params.iter().map(|p| p * p).sum::<f64>().sqrt().max(1.0);
            if step_norm / param_norm < self.config.param_tolerance {
                return Ok(LeastSquaresFit {
                    params,
                    residual_ss: ss,
                    iterations: iteration,
                    converged: true,
                });
            }

            let trial: Vec<f64> = params.iter().zip(&delta).map(|(p, d)| p + d).collect();
            let trial = self.project(&trial);
            let trial_r = residuals(&trial).map_err(LeastSquaresError::Objective)?;
            let trial_ss = sum_of_squares(&trial_r);

            if trial_ss < ss {
                params = trial;
                r = trial_r;
                ss = trial_ss;
                lambda = (lambda * self.config.lambda_down).max(self.config.min_lambda);
            } else {
                lambda = (lambda * self.config.lambda_up).min(self.config.max_lambda);
            }
        }

        Ok(LeastSquaresFit {
            params,
            residual_ss: ss,
            iterations: self.config.max_iterations,
            converged: false,
        })
    }

    /// Forward-difference Jacobian. Perturbations flip direction when they
    /// would leave the box, so every evaluation stays inside it.
    fn jacobian<F, E>(&self, residuals: &F, params: &[f64], r0: &[f64]) -> Result<Vec<Vec<f64>>, E>
    where
        F: Fn(&[f64]) -> Result<Vec<f64>, E>,
        E: std::error::Error,
    {
        let n_params = params.len();
        let n_residuals = r0.len();
        let eps = 1e-8;

        let mut jacobian = vec![vec![0.0; n_params]; n_residuals];

        for j in 0..n_params {
            let mut h = eps * params[j].abs().max(1.0);
            if let Some(b) = self.bounds.get(j) {
                if params[j] + h > b.max {
                    h = -h;
                }
            }

            let mut shifted = params.to_vec();
            shifted[j] += h;
            let r_shifted = residuals(&shifted)?;

            for i in 0..n_residuals {
                jacobian[i][j] = (r_shifted[i] - r0[i]) / h;
            }
        }

        Ok(jacobian)
    }
}

/// Solve `(JᵀJ + λI) δ = -Jᵀ r` via Cholesky. Returns `None` when the
/// damped normal matrix is not positive definite.
fn solve_damped_normal_equations(
    jacobian: &[Vec<f64>],
    residuals: &[f64],
    lambda: f64,
    n_params: usize,
) -> Option<Vec<f64>> {
    let n_residuals = residuals.len();

    let mut jtj = vec![vec![0.0; n_params]; n_params];
    for i in 0..n_params {
        for j in 0..n_params {
            let mut sum = 0.0;
            for k in 0..n_residuals {
                sum += jacobian[k][i] * jacobian[k][j];
            }
            jtj[i][j] = sum;
        }
        jtj[i][i] += lambda;
    }

    let mut jtr = vec![0.0; n_params];
    for (i, entry) in jtr.iter_mut().enumerate() {
        let mut sum = 0.0;
        for k in 0..n_residuals {
            sum += jacobian[k][i] * residuals[k];
        }
        *entry = -sum;
    }

    solve_cholesky(&jtj, &jtr)
}

#[inline]
fn sum_of_squares(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum()
}

/// Solve `A x = b` for symmetric positive-definite `A`.
fn solve_cholesky(a: &[Vec<f64>], b: &[f64]) -> Option<Vec<f64>> {
    let n = b.len();
    if n == 0 || a.len() != n {
        return None;
    }

    let mut l = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in 0..=i {
            let mut sum = a[i][j];
            for k in 0..j {
                sum -= l[i][k] * l[j][k];
            }
            if i == j {
                if sum <= 0.0 {
                    return None;
                }
                l[i][j] = sum.sqrt();
            } else {
                if l[j][j].abs() < 1e-30 {
                    return None;
                }
                l[i][j] = sum / l[j][j];
            }
        }
    }

    let mut y = vec![0.0; n];
    for i in 0..n {
        let mut sum = b[i];
        for j in 0..i {
            sum -= l[i][j] * y[j];
        }
        y[i] = sum / l[i][i];
    }

    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let mut sum = y[i];
        for j in (i + 1)..n {
            sum -= l[j][i] * x[j];
        }
        x[i] = sum / l[i][i];
    }

    Some(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok_residuals<F>(f: F) -> impl Fn(&[f64]) -> Result<Vec<f64>, SolverError>
    where
        F: Fn(&[f64]) -> Vec<f64>,
    {
        move |p: &[f64]| Ok(f(p))
    }

    #[test]
    fn simple_quadratic() {
        let solver = BoundedLeastSquares::with_defaults();
        let fit = solver
            .solve(
                ok_residuals(|p| vec![p[0] - 2.0, p[1] - 3.0]),
                vec![0.0, 0.0],
            )
            .unwrap();
        assert!(fit.converged);
        assert!((fit.params[0] - 2.0).abs() < 1e-6);
        assert!((fit.params[1] - 3.0).abs() < 1e-6);
    }

    #[test]
    fn exponential_fit() {
        let x_data: [f64; 5] = [0.0, 1.0, 2.0, 3.0, 4.0];
        let y_data: Vec<f64> = x_data.iter().map(|&x| 2.0 * (-0.5 * x).exp()).collect();

        let residuals = ok_residuals(move |p: &[f64]| {
            x_data
                .iter()
                .zip(&y_data)
                .map(|(&x, &y)| p[0] * (-p[1] * x).exp() - y)
                .collect()
        });

        let fit = BoundedLeastSquares::with_defaults()
            .solve(residuals, vec![1.0, 1.0])
            .unwrap();
        assert!(fit.converged);
        assert!((fit.params[0] - 2.0).abs() < 0.01);
        assert!((fit.params[1] - 0.5).abs() < 0.01);
    }

    #[test]
    fn bounds_are_respected() {
        let solver = BoundedLeastSquares::with_defaults().with_bounds(vec![
            ParameterBounds::new(0.0, 1.0),
            ParameterBounds::new(0.0, 10.0),
        ]);

        // Unconstrained optimum is (2, 3); param 0 must stop at 1
        let fit = solver
            .solve(
                ok_residuals(|p| vec![p[0] - 2.0, p[1] - 3.0]),
                vec![0.5, 0.5],
            )
            .unwrap();

        assert!(fit.params[0] <= 1.0 + 1e-12);
        assert!((fit.params[1] - 3.0).abs() < 1e-5);
    }

    #[test]
    fn initial_guess_is_projected() {
        let solver =
            BoundedLeastSquares::with_defaults().with_bounds(vec![ParameterBounds::new(0.0, 1.0)]);
        let fit = solver
            .solve(ok_residuals(|p| vec![p[0] - 0.5]), vec![5.0])
            .unwrap();
        assert!((fit.params[0] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn objective_never_regresses() {
        // Rosenbrock-style residuals from a poor start: whatever happens,
        // the returned objective must not exceed the starting objective.
        let residuals =
            ok_residuals(|p: &[f64]| vec![10.0 * (p[1] - p[0] * p[0]), 1.0 - p[0]]);

        let start = vec![-1.2, 1.0];
        let start_ss: f64 = residuals(&start).unwrap().iter().map(|r| r * r).sum();

        let fit = BoundedLeastSquares::with_defaults()
            .solve(residuals, start)
            .unwrap();
        assert!(fit.residual_ss <= start_ss);
    }

    #[test]
    fn failing_objective_aborts() {
        #[derive(Debug, thiserror::Error, PartialEq)]
        #[error("bad region")]
        struct BadRegion;

        let residuals = |p: &[f64]| -> Result<Vec<f64>, BadRegion> {
            if p[0] > 0.5 {
                Err(BadRegion)
            } else {
                Ok(vec![p[0] - 2.0])
            }
        };

        // The optimum (2.0) lies inside the failing region, so some trial
        // must cross p[0] > 0.5 and the solve must abort.
        let result = BoundedLeastSquares::with_defaults().solve(residuals, vec![0.0]);
        assert!(matches!(result, Err(LeastSquaresError::Objective(BadRegion))));
    }

    #[test]
    fn empty_params_rejected() {
        let result = BoundedLeastSquares::with_defaults()
            .solve(ok_residuals(|_| vec![1.0]), Vec::new());
        assert!(matches!(result, Err(LeastSquaresError::Solver(_))));
    }

    #[test]
    fn empty_residuals_rejected() {
        let result =
            BoundedLeastSquares::with_defaults().solve(ok_residuals(|_| Vec::new()), vec![1.0]);
        assert!(matches!(result, Err(LeastSquaresError::Solver(_))));
    }

    #[test]
    fn non_convergence_is_a_status() {
        let config = LeastSquaresConfig {
            max_iterations: 1,
            tolerance: 1e-300,
            param_tolerance: 1e-300,
            ..Default::default()
        };
        let fit = BoundedLeastSquares::new(config)
            .solve(ok_residuals(|p| vec![(p[0] - 2.0) * (p[0] - 2.0)]), vec![10.0])
            .unwrap();
        assert!(!fit.converged);
        assert_eq!(fit.iterations, 1);
    }

    #[test]
    fn rmse_helper() {
        let fit = LeastSquaresFit {
            params: vec![1.0],
            residual_ss: 4.0,
            iterations: 3,
            converged: true,
        };
        assert!((fit.rmse(4) - 1.0).abs() < 1e-12);
        assert_eq!(fit.rmse(0), 0.0);
    }

    #[test]
    fn parameter_bounds_helpers() {
        let b = ParameterBounds::new(0.0, 1.0);
        assert!(b.contains(0.5));
        assert!(!b.contains(1.5));
        assert_eq!(b.clamp(-0.5), 0.0);
        assert_eq!(b.clamp(1.5), 1.0);

        assert!(ParameterBounds::positive().min > 0.0);
        assert_eq!(ParameterBounds::non_negative().min, 0.0);
        assert_eq!(ParameterBounds::unit_interval().max, 1.0);
        assert_eq!(ParameterBounds::default(), ParameterBounds::unbounded());
    }
}
