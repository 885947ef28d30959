//! Error types for the sensitivity engine.

use thiserror::Error;

use smile_models::analytical::AnalyticalError;
use smile_models::sabr::SabrError;

/// Sensitivity-engine errors.
///
/// Flag-parsing variants reject unknown bump targets and directions before
/// any evaluation; model and analytical failures propagate transparently.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RiskError {
    /// Bump target other than F0, Alpha, Beta, Rho or Nu.
    #[error("bump parameter must be one of 'F0', 'Alpha', 'Beta', 'Rho' or 'Nu', got '{0}'")]
    UnknownBumpTarget(String),

    /// Bump direction other than `up` or `dn`.
    #[error("bump direction must be 'up' or 'dn', got '{0}'")]
    UnknownBumpDirection(String),

    /// Non-positive bump magnitude.
    #[error("bump size must be positive, got {0}")]
    InvalidBumpSize(f64),

    /// Domain failure from the SABR volatility mapping.
    #[error(transparent)]
    Model(#[from] SabrError),

    /// Failure from the Black-76 analytics.
    #[error(transparent)]
    Analytical(#[from] AnalyticalError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_target_display() {
        let err = RiskError::UnknownBumpTarget("Sigma".to_string());
        assert!(format!("{}", err).contains("Sigma"));
    }

    #[test]
    fn model_errors_convert() {
        let err: RiskError = SabrError::InvalidStrike(-1.0).into();
        assert!(matches!(err, RiskError::Model(_)));
    }

    #[test]
    fn analytical_errors_convert() {
        let err: RiskError = AnalyticalError::InvalidOptionFlag {
            flag: "x".to_string(),
        }
        .into();
        assert!(matches!(err, RiskError::Analytical(_)));
    }
}
