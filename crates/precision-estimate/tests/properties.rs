//! Property-based checks of the width formulas and their inverses

mod common;

use common::*;
use precision_estimate::{MeanPrecision, ProportionPrecision, RatePrecision};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_mean_width_shrinks_with_n(
        sd in 0.1f64..50.0,
        n in 2.0f64..5_000.0,
    ) {
        let small = MeanPrecision::new(0.0, sd).with_n(n).estimate().unwrap();
        let large = MeanPrecision::new(0.0, sd).with_n(n * 2.0).estimate().unwrap();
        prop_assert!(large.conf_width < small.conf_width);
    }

    #[test]
    fn prop_mean_round_trip(
        mu in -100.0f64..100.0,
        sd in 0.1f64..50.0,
        n in 3.0f64..5_000.0,
    ) {
        let forward = MeanPrecision::new(mu, sd).with_n(n).estimate().unwrap();
        let inverse = MeanPrecision::new(mu, sd)
            .with_conf_width(forward.conf_width)
            .estimate()
            .unwrap();
        prop_assert!((inverse.n - n).abs() / n < COUNT_RTOL, "{} vs {}", inverse.n, n);
    }

    #[test]
    fn prop_rate_width_shrinks_with_x(
        r in 0.1f64..100.0,
        x in 1.0f64..10_000.0,
        method in 0usize..4,
    ) {
        let method = RATE_METHODS[method];
        let small = RatePrecision::new(r).with_x(x).with_method(method).estimate().unwrap();
        let large = RatePrecision::new(r).with_x(x * 2.0).with_method(method).estimate().unwrap();
        prop_assert!(large.conf_width < small.conf_width, "{method}");
    }

    #[test]
    fn prop_rate_round_trip(
        r in 0.1f64..100.0,
        x in 2.0f64..10_000.0,
        method in 0usize..4,
    ) {
        let method = RATE_METHODS[method];
        let forward = RatePrecision::new(r).with_x(x).with_method(method).estimate().unwrap();
        let inverse = RatePrecision::new(r)
            .with_conf_width(forward.conf_width)
            .with_method(method)
            .estimate()
            .unwrap();
        prop_assert!((inverse.x - x).abs() / x < COUNT_RTOL, "{method}: {} vs {}", inverse.x, x);
    }

    #[test]
    fn prop_proportion_width_shrinks_with_n(
        p in 0.05f64..0.95,
        n in 10.0f64..10_000.0,
        method in 0usize..4,
    ) {
        let method = PROPORTION_METHODS[method];
        let small = ProportionPrecision::new(p).with_n(n).with_method(method).estimate().unwrap();
        let large = ProportionPrecision::new(p)
            .with_n(n * 2.0)
            .with_method(method)
            .estimate()
            .unwrap();
        prop_assert!(large.conf_width < small.conf_width, "{method}");
    }

    #[test]
    fn prop_proportion_round_trip(
        p in 0.05f64..0.95,
        n in 10.0f64..10_000.0,
        method in 0usize..4,
    ) {
        let method = PROPORTION_METHODS[method];
        let forward = ProportionPrecision::new(p).with_n(n).with_method(method).estimate().unwrap();
        let inverse = ProportionPrecision::new(p)
            .with_conf_width(forward.conf_width)
            .with_method(method)
            .estimate()
            .unwrap();
        prop_assert!((inverse.n - n).abs() / n < COUNT_RTOL, "{method}: {} vs {}", inverse.n, n);
    }

    #[test]
    fn prop_adjusted_estimate_only_for_adjusting_methods(
        p in 0.05f64..0.95,
        n in 10.0f64..1_000.0,
        method in 0usize..4,
    ) {
        let method = PROPORTION_METHODS[method];
        let result = ProportionPrecision::new(p).with_n(n).with_method(method).estimate().unwrap();
        let adjusts = matches!(method, "wilson" | "agresti-coull");
        prop_assert_eq!(result.padj.is_some(), adjusts);
        prop_assert_eq!(result.note.is_some(), adjusts);
    }

    #[test]
    fn prop_wilson_stays_in_unit_interval(
        p in 0.0f64..=1.0,
        n in 1.0f64..1_000.0,
    ) {
        let result = ProportionPrecision::new(p).with_n(n).estimate().unwrap();
        prop_assert!(result.lwr >= 0.0 && result.upr <= 1.0);
        prop_assert!(result.warnings.is_empty(), "{:?}", result.warnings);
    }
}
