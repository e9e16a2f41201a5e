use rand::distributions::Distribution;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use statrs::distribution::Beta;
use tracing::debug;

use crate::distribution::OutcomeDistribution;
use crate::error::{EstimateError, Result};
use crate::record::{Prior, Record};

/// Empirical spread of final win totals from Monte Carlo seasons.
#[derive(Clone, Debug, Serialize)]
pub struct SimulatedSpread {
    pub possible_totals: Vec<u32>,
    pub frequencies: Vec<f64>,
    pub mean: f64,
    pub n_simulations: usize,
}

impl SimulatedSpread {
    /// Largest per-outcome gap between simulated frequency and `exact`.
    pub fn max_deviation(&self, exact: &OutcomeDistribution) -> f64 {
        self.possible_totals
            .iter()
            .zip(&self.frequencies)
            .map(|(&n, &f)| (f - exact.probability_of(n)).abs())
            .fold(0.0, f64::max)
    }
}

/// Play out the rest of the season `n_simulations` times.
///
/// Each season draws a true win rate from the Beta posterior, then wins each
/// remaining game independently at that rate. At least one season is played.
pub fn simulate_spread(
    record: &Record,
    prior: &Prior,
    n_simulations: usize,
    seed: Option<u64>,
) -> Result<SimulatedSpread> {
    let (alpha, beta) = prior.posterior(record);
    let posterior = Beta::new(alpha, beta).map_err(|_| EstimateError::InvalidPrior {
        prior_wins: prior.prior_wins(),
        prior_losses: prior.prior_losses(),
    })?;

    let mut rng = match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    };

    let n_simulations = n_simulations.max(1);
    let possible_totals: Vec<u32> = record.possible_totals().collect();
    let mut counts = vec![0usize; possible_totals.len()];

    for _ in 0..n_simulations {
        let rate: f64 = posterior.sample(&mut rng);
        let extra = (0..record.remaining()).filter(|_| rng.gen::<f64>() < rate).count();
        counts[extra] += 1;
    }

    let frequencies: Vec<f64> = counts
        .iter()
        .map(|&c| c as f64 / n_simulations as f64)
        .collect();
    let mean = possible_totals
        .iter()
        .zip(&frequencies)
        .map(|(&n, &f)| f64::from(n) * f)
        .sum();

    debug!(
        wins = record.wins(),
        losses = record.losses(),
        n_simulations,
        mean,
        "simulated remaining season"
    );

    Ok(SimulatedSpread {
        possible_totals,
        frequencies,
        mean,
        n_simulations,
    })
}
