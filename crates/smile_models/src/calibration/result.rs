//! Calibration output.

use smile_core::traits::calibration::CalibrationResult;

use crate::sabr::SabrParams;

/// Result of a smile calibration.
///
/// Carries the fitted [`SabrParams`], the echoed strike vector, the fitted
/// volatility vector (one per strike, re-evaluated through the mapper at the
/// optimum) and the optimizer status. Immutable once constructed.
///
/// A non-converged optimizer is reported through
/// [`converged`](SmileFit::converged), never as an error — callers must
/// check it explicitly.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SmileFit {
    status: CalibrationResult<SabrParams>,
    strikes: Vec<f64>,
    fitted_vols: Vec<f64>,
}

impl SmileFit {
    pub(crate) fn new(
        status: CalibrationResult<SabrParams>,
        strikes: Vec<f64>,
        fitted_vols: Vec<f64>,
    ) -> Self {
        debug_assert_eq!(strikes.len(), fitted_vols.len());
        Self {
            status,
            strikes,
            fitted_vols,
        }
    }

    /// The fitted SABR parameters.
    pub fn params(&self) -> &SabrParams {
        &self.status.params
    }

    /// Whether the optimizer reported convergence.
    pub fn converged(&self) -> bool {
        self.status.converged
    }

    /// Number of optimizer iterations performed.
    pub fn iterations(&self) -> usize {
        self.status.iterations
    }

    /// Final objective value (sum of squared vol errors).
    pub fn objective(&self) -> f64 {
        self.status.objective
    }

    /// The echoed strike vector.
    pub fn strikes(&self) -> &[f64] {
        &self.strikes
    }

    /// Fitted volatilities, aligned with [`strikes`](Self::strikes).
    pub fn fitted_vols(&self) -> &[f64] {
        &self.fitted_vols
    }

    /// The full optimizer status.
    pub fn status(&self) -> &CalibrationResult<SabrParams> {
        &self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors() {
        let params = SabrParams::new(0.05, 0.5, -0.1, 0.6).unwrap();
        let fit = SmileFit::new(
            CalibrationResult::converged(params, 12, 1e-6),
            vec![0.02, 0.03],
            vec![0.45, 0.41],
        );
        assert!(fit.converged());
        assert_eq!(fit.iterations(), 12);
        assert_eq!(fit.strikes().len(), 2);
        assert_eq!(fit.fitted_vols().len(), 2);
        assert_eq!(fit.params().beta(), 0.5);
        assert!(fit.objective() < 1e-5);
    }

    #[test]
    fn non_converged_status_is_carried() {
        let params = SabrParams::new(0.05, 0.5, -0.1, 0.6).unwrap();
        let fit = SmileFit::new(
            CalibrationResult::not_converged(params, 100, 0.5, "iteration cap"),
            vec![0.02],
            vec![0.45],
        );
        assert!(!fit.converged());
        assert_eq!(fit.status().message.as_deref(), Some("iteration cap"));
    }
}
