//! Property tests for the SABR core.

use proptest::prelude::*;
use smile_models::sabr::{atm_alpha, lognormal_vol, SabrParams};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Solving for alpha from an ATM quote and mapping back through the
    /// expansion must reproduce the quote.
    #[test]
    fn atm_round_trip(
        forward in 0.005f64..0.2,
        atm_vol in 0.05f64..0.5,
        expiry in 0.05f64..2.0,
        beta in 0.0f64..=1.0,
        rho in -0.7f64..0.7,
        nu in 0.01f64..1.0,
    ) {
        let alpha = atm_alpha(forward, atm_vol, expiry, beta, rho, nu).unwrap();
        prop_assert!(alpha > 0.0);

        let params = SabrParams::new(alpha, beta, rho, nu).unwrap();
        let mapped = lognormal_vol(forward, forward, expiry, &params).unwrap();
        prop_assert!(
            (mapped - atm_vol).abs() < 1e-6,
            "round trip drifted: solved alpha {} maps to {} vs quoted {}",
            alpha, mapped, atm_vol
        );
    }

    /// The closed-form K = F branch must agree with the general branch as
    /// K approaches F from either side.
    #[test]
    fn atm_branch_continuity(
        forward in 0.01f64..0.1,
        alpha in 0.01f64..0.3,
        expiry in 0.05f64..2.0,
        beta in 0.0f64..=1.0,
        rho in -0.7f64..0.7,
        nu in 0.01f64..1.0,
    ) {
        let params = SabrParams::new(alpha, beta, rho, nu).unwrap();
        let atm = lognormal_vol(forward, forward, expiry, &params).unwrap();
        let above = lognormal_vol(forward, forward * (1.0 + 1e-9), expiry, &params).unwrap();
        let below = lognormal_vol(forward, forward * (1.0 - 1e-9), expiry, &params).unwrap();

        prop_assert!((atm - above).abs() < 1e-6);
        prop_assert!((atm - below).abs() < 1e-6);
    }

    /// The mapper stays positive and finite over the sane parameter region.
    #[test]
    fn mapper_is_well_behaved_on_sane_inputs(
        forward in 0.01f64..0.1,
        moneyness in 0.5f64..2.0,
        alpha in 0.01f64..0.3,
        expiry in 0.05f64..2.0,
        beta in 0.0f64..=1.0,
        rho in -0.7f64..0.7,
        nu in 0.01f64..1.0,
    ) {
        let params = SabrParams::new(alpha, beta, rho, nu).unwrap();
        let vol = lognormal_vol(forward, forward * moneyness, expiry, &params).unwrap();
        prop_assert!(vol.is_finite());
        prop_assert!(vol > 0.0);
    }
}
