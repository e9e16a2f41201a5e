use proptest::prelude::*;
use season_core::{beta_binomial_pmf, compute, EstimateError, Prior, Record, SEASON_LENGTH};

fn record_strategy() -> impl Strategy<Value = (i64, i64)> {
    let season = i64::from(SEASON_LENGTH);
    (0..=season).prop_flat_map(move |wins| (Just(wins), 0..=season - wins))
}

fn prior_strategy() -> impl Strategy<Value = (f64, f64)> {
    (0.05f64..300.0, 0.05f64..300.0)
}

/// One pseudo-count between 1e3 and 1e6 (log-uniform), the other between
/// 0.1 and 10, on either side.
fn lopsided_prior_strategy() -> impl Strategy<Value = (f64, f64)> {
    (3.0f64..6.0, 0.1f64..10.0, any::<bool>()).prop_map(|(exponent, weak, mirrored)| {
        let strong = 10f64.powf(exponent);
        if mirrored {
            (weak, strong)
        } else {
            (strong, weak)
        }
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn mass_sums_to_one((wins, losses) in record_strategy(), (pw, pl) in prior_strategy()) {
        let record = Record::new(wins, losses).unwrap();
        let prior = Prior::new(pw, pl).unwrap();
        let dist = compute(&record, &prior).unwrap();

        let mass = dist.total_mass();
        prop_assert!((mass - 1.0).abs() < 1e-6, "mass = {}", mass);
        for &p in dist.probabilities() {
            prop_assert!((0.0..=1.0).contains(&p));
        }
    }

    #[test]
    fn expectation_within_reachable_range(
        (wins, losses) in record_strategy(),
        (pw, pl) in prior_strategy(),
    ) {
        let record = Record::new(wins, losses).unwrap();
        let prior = Prior::new(pw, pl).unwrap();
        let dist = compute(&record, &prior).unwrap();

        let lo = wins as f64 - 1e-9;
        let hi = (i64::from(SEASON_LENGTH) - losses) as f64 + 1e-9;
        prop_assert!(dist.expected_wins() >= lo && dist.expected_wins() <= hi);
        prop_assert_eq!(dist.len() as i64, i64::from(SEASON_LENGTH) - losses - wins + 1);
        prop_assert_eq!(dist.possible_totals()[0] as i64, wins);
    }

    #[test]
    fn agrees_with_beta_binomial(
        (wins, losses) in record_strategy(),
        (pw, pl) in prior_strategy(),
    ) {
        let record = Record::new(wins, losses).unwrap();
        let prior = Prior::new(pw, pl).unwrap();
        let dist = compute(&record, &prior).unwrap();

        for (total, p) in dist.iter() {
            let exact = beta_binomial_pmf(&record, &prior, total);
            prop_assert!((p - exact).abs() < 1e-7, "P({}) = {} vs {}", total, p, exact);
        }
    }

    #[test]
    fn lopsided_strong_prior_keeps_mass(
        (wins, losses) in record_strategy(),
        (pw, pl) in lopsided_prior_strategy(),
    ) {
        let record = Record::new(wins, losses).unwrap();
        let prior = Prior::new(pw, pl).unwrap();
        let dist = compute(&record, &prior).unwrap();

        let mass = dist.total_mass();
        prop_assert!((mass - 1.0).abs() < 1e-6, "mass = {}", mass);
        for (total, p) in dist.iter() {
            let exact = beta_binomial_pmf(&record, &prior, total);
            prop_assert!((p - exact).abs() < 1e-7, "P({}) = {} vs {}", total, p, exact);
        }
    }

    #[test]
    fn stronger_prior_narrows_even_record(
        games in 0i64..=40,
        strength in 0.1f64..5.0,
        scale in 2.0f64..50.0,
    ) {
        // .500 record with a .500 prior keeps the mean fixed while the
        // pseudo-counts grow
        let record = Record::new(games, games).unwrap();
        let weak = Prior::new(strength, strength).unwrap();
        let strong = Prior::new(strength * scale, strength * scale).unwrap();

        let weak_dist = compute(&record, &weak).unwrap();
        let strong_dist = compute(&record, &strong).unwrap();
        prop_assert!((weak_dist.expected_wins() - 41.0).abs() < 1e-6);
        prop_assert!((strong_dist.expected_wins() - 41.0).abs() < 1e-6);
        prop_assert!(
            strong_dist.variance() < weak_dist.variance(),
            "{} >= {}",
            strong_dist.variance(),
            weak_dist.variance()
        );
    }

    #[test]
    fn negative_or_overfull_records_rejected(wins in -100i64..200, losses in -100i64..200) {
        let result = Record::new(wins, losses);
        let valid = wins >= 0 && losses >= 0 && wins + losses <= i64::from(SEASON_LENGTH);
        prop_assert_eq!(result.is_ok(), valid);
        if let Err(err) = result {
            let is_invalid_record = matches!(err, EstimateError::InvalidRecord { .. });
            prop_assert!(is_invalid_record);
        }
    }

    #[test]
    fn non_positive_priors_rejected(pw in -10.0f64..=0.0, pl in 0.01f64..10.0) {
        for (a, b) in [(pw, pl), (pl, pw)] {
            let is_invalid_prior =
                matches!(Prior::new(a, b), Err(EstimateError::InvalidPrior { .. }));
            prop_assert!(is_invalid_prior);
        }
    }
}
