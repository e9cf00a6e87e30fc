//! Property tests for the root finder and the quantile inversions built on it

use approx::assert_abs_diff_eq;
use precision_core::distributions::{beta, gamma};
use precision_core::{brent, Error, SolverConfig};
use proptest::prelude::*;
use statrs::distribution::{Beta, ContinuousCDF, Gamma};

#[test]
fn test_finds_cube_root() {
    let config = SolverConfig::default().with_bracket(0.0, 10.0).with_tolerance(1e-12);
    let result = brent(|x| Ok(x * x * x - 27.0), &config).unwrap();
    assert_abs_diff_eq!(result.root, 3.0, epsilon = 1e-9);
}

#[test]
fn test_objective_errors_propagate() {
    let result = brent(
        |x| {
            if x > 5.0 {
                Err(Error::Computation("out of domain".into()))
            } else {
                Ok(x - 2.0)
            }
        },
        &SolverConfig::default().with_bracket(0.0, 10.0),
    );
    assert!(matches!(result, Err(Error::Computation(_))));
}

proptest! {
    #[test]
    fn prop_decreasing_width_is_inverted(
        scale in 0.01f64..100.0,
        n in 1.5f64..1e6,
    ) {
        // Widths of the form scale / sqrt(n) mimic every interval formula
        let target = scale / n.sqrt();
        let config = SolverConfig::default().with_tolerance(1e-10);
        let result = brent(|x| Ok(scale / x.sqrt() - target), &config).unwrap();
        prop_assert!((result.root - n).abs() / n < 1e-6, "{} vs {}", result.root, n);
    }

    #[test]
    fn prop_unbracketed_is_reported(offset in 1.0f64..100.0) {
        let config = SolverConfig::default().with_bracket(0.0, 1.0);
        let result = brent(|x| Ok(x + offset), &config);
        let is_unbracketed = matches!(result, Err(Error::RootNotBracketed { .. }));
        prop_assert!(is_unbracketed);
    }

    #[test]
    fn prop_gamma_quantile_inverts_cdf(
        p in 0.001f64..0.999,
        shape in 0.5f64..500.0,
    ) {
        let q = gamma::quantile(p, shape).unwrap();
        let cdf = Gamma::new(shape, 1.0).unwrap().cdf(q);
        prop_assert!((cdf - p).abs() < 1e-6, "cdf = {}, p = {}", cdf, p);
    }

    #[test]
    fn prop_beta_quantile_inverts_cdf(
        p in 0.001f64..0.999,
        a in 1.0f64..200.0,
        b in 1.0f64..200.0,
    ) {
        let q = beta::quantile(p, a, b).unwrap();
        prop_assert!((0.0..=1.0).contains(&q));
        let cdf = Beta::new(a, b).unwrap().cdf(q);
        prop_assert!((cdf - p).abs() < 1e-6, "cdf = {}, p = {}", cdf, p);
    }
}
