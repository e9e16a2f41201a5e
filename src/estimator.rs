use rayon::prelude::*;
use statrs::function::beta::ln_beta;
use statrs::function::factorial::ln_binomial;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, trace, warn};

use crate::constants::{BREAKPOINT_RUNGS, MASS_TOLERANCE, MASS_WARN_THRESHOLD};
use crate::distribution::OutcomeDistribution;
use crate::error::{EstimateError, Result};
use crate::quadrature::{integrate_with_breakpoints, Tolerance};
use crate::record::{Prior, Record};

/// Compute the distribution of final win totals for a team.
///
/// For each reachable total `N` the posterior Beta density over the true win
/// rate is integrated against the binomial probability of winning exactly
/// `N - wins` of the remaining games.
pub fn compute(record: &Record, prior: &Prior) -> Result<OutcomeDistribution> {
    compute_with_tolerance(record, prior, Tolerance::default())
}

/// [`compute`] with explicit quadrature settings.
pub fn compute_with_tolerance(
    record: &Record,
    prior: &Prior,
    tolerance: Tolerance,
) -> Result<OutcomeDistribution> {
    if record.remaining() == 0 {
        return Ok(OutcomeDistribution::certain(record.wins()));
    }

    let probabilities = record
        .possible_totals()
        .map(|total| integrate_total(record, prior, total, tolerance))
        .collect::<Result<Vec<_>>>()?;

    let mass: f64 = probabilities.iter().sum();
    let deviation = (mass - 1.0).abs();
    if deviation > MASS_TOLERANCE {
        return Err(EstimateError::MassMismatch {
            mass,
            tolerance: MASS_TOLERANCE,
        });
    }
    if deviation > MASS_WARN_THRESHOLD {
        warn!(
            wins = record.wins(),
            losses = record.losses(),
            mass,
            "distribution mass drifts from 1"
        );
    }

    let distribution = OutcomeDistribution::new(record.wins(), probabilities);
    debug!(
        wins = record.wins(),
        losses = record.losses(),
        prior_wins = prior.prior_wins(),
        prior_losses = prior.prior_losses(),
        outcomes = distribution.len(),
        expected_wins = distribution.expected_wins(),
        "computed win distribution"
    );
    Ok(distribution)
}

/// Probability that the team finishes with exactly `total` wins.
///
/// Unreachable totals have probability 0.
pub fn probability_of_total(record: &Record, prior: &Prior, total: u32) -> Result<f64> {
    if total < record.wins() || total > record.max_total() {
        return Ok(0.0);
    }
    if record.remaining() == 0 {
        return Ok(1.0);
    }
    integrate_total(record, prior, total, Tolerance::default())
}

/// Closed-form Beta-Binomial mass for `total`, used to cross-check the
/// quadrature.
pub fn beta_binomial_pmf(record: &Record, prior: &Prior, total: u32) -> f64 {
    if total < record.wins() || total > record.max_total() {
        return 0.0;
    }
    let (alpha, beta) = prior.posterior(record);
    let n = record.remaining();
    let k = total - record.wins();

    let ln_p = ln_binomial(u64::from(n), u64::from(k))
        + ln_beta(alpha + f64::from(k), beta + f64::from(n - k))
        - ln_beta(alpha, beta);
    ln_p.exp()
}

/// Compute many independent teams in parallel. Results keep input order.
pub fn compute_all(inputs: &[(Record, Prior)]) -> Vec<Result<OutcomeDistribution>> {
    inputs
        .par_iter()
        .map(|(record, prior)| compute(record, prior))
        .collect()
}

fn integrate_total(
    record: &Record,
    prior: &Prior,
    total: u32,
    tolerance: Tolerance,
) -> Result<f64> {
    let (alpha, beta) = prior.posterior(record);
    let n = record.remaining();
    let k = total - record.wins();

    // Posterior density times binomial likelihood collapses to
    // scale * r^(a - 1) * (1 - r)^(b - 1). It is evaluated in log space
    // relative to its value at `split`, the mean of that Beta shape, so
    // huge pseudo-counts do not cancel catastrophically near the peak.
    let a = alpha + f64::from(k);
    let b = beta + f64::from(n - k);
    let split = a / (a + b);
    let sd = (a * b / ((a + b) * (a + b) * (a + b + 1.0))).sqrt();
    let odds = split / (1.0 - split);
    let ln_peak = ln_binomial(u64::from(n), u64::from(k)) - ln_beta(alpha, beta)
        + (a - 1.0) * split.ln()
        + (b - 1.0) * (1.0 - split).ln();

    // On the left r = split * u^p, on the right 1 - r = (1 - split) * v^q.
    // With p = 1/a for a < 1 the endpoint singularity cancels against the
    // Jacobian (likewise q for b).
    let p = if a < 1.0 { 1.0 / a } else { 1.0 };
    let q = if b < 1.0 { 1.0 / b } else { 1.0 };
    let ln_left_jacobian = ln_peak + split.ln() + p.ln();
    let ln_right_jacobian = ln_peak + (1.0 - split).ln() + q.ln();

    let left = |u: f64| {
        let ln_u = u.ln();
        // ln(r / split) and ln((1 - r) / (1 - split))
        let ln_r = p * ln_u;
        let ln_rest = (-odds * ln_r.exp_m1()).ln_1p();
        (ln_left_jacobian + (a - 1.0) * ln_r + (b - 1.0) * ln_rest + (p - 1.0) * ln_u).exp()
    };
    let right = |v: f64| {
        let ln_v = v.ln();
        let ln_rest = q * ln_v;
        let ln_r = (-ln_rest.exp_m1() / odds).ln_1p();
        (ln_right_jacobian + (a - 1.0) * ln_r + (b - 1.0) * ln_rest + (q - 1.0) * ln_v).exp()
    };

    let (low, high) = breakpoint_ladder(split, sd);
    let left_breaks: Vec<f64> = low.iter().map(|&r| (r / split).powf(1.0 / p)).collect();
    let right_breaks: Vec<f64> = high
        .iter()
        .map(|&r| ((1.0 - r) / (1.0 - split)).powf(1.0 / q))
        .collect();

    let half = Tolerance {
        abs: 0.5 * tolerance.abs,
        ..tolerance
    };
    let integrate_half = |f: &dyn Fn(f64) -> f64, breaks: &[f64]| {
        integrate_with_breakpoints(f, 0.0, 1.0, breaks, half)
            .map_err(|source| EstimateError::NumericalIntegration { total, source })
    };
    let lower = integrate_half(&left, &left_breaks)?;
    let upper = integrate_half(&right, &right_breaks)?;
    let value = lower.value + upper.value;

    trace!(
        total,
        value,
        error = lower.error + upper.error,
        intervals = lower.intervals + upper.intervals,
        "integrated outcome"
    );

    checked_probability(total, value)
}

/// Reject integrals outside `[0, 1 + MASS_TOLERANCE]`. Only round-off within
/// the mass tolerance is folded back to 1.
fn checked_probability(total: u32, value: f64) -> Result<f64> {
    if !(0.0..=1.0 + MASS_TOLERANCE).contains(&value) {
        return Err(EstimateError::ProbabilityOutOfRange { total, value });
    }
    Ok(value.min(1.0))
}

/// Breakpoints at `split - m * sd` and `split + m * sd` for m = 1, 2, 4, ...
/// until the endpoints are passed.
///
/// Each rung is twice as wide as the last, so a skewed tail whose decay
/// length is near `sd` is never squeezed against the edge of a single wide
/// subinterval.
fn breakpoint_ladder(split: f64, sd: f64) -> (Vec<f64>, Vec<f64>) {
    let mut low = Vec::new();
    let mut high = Vec::new();
    if !(sd > 0.0) {
        return (low, high);
    }

    let mut width = sd;
    for _ in 0..BREAKPOINT_RUNGS {
        let (l, h) = (split - width, split + width);
        if l > 0.0 {
            low.push(l);
        }
        if h < 1.0 {
            high.push(h);
        }
        if l <= 0.0 && h >= 1.0 {
            break;
        }
        width *= 2.0;
    }
    (low, high)
}

type CacheKey = (Record, (u64, u64));

/// Memoizing front end over [`compute`].
///
/// Distributions are computed once per `(record, prior)` and shared.
#[derive(Debug, Default)]
pub struct WinDistributionEstimator {
    tolerance: Tolerance,
    cache: HashMap<CacheKey, Arc<OutcomeDistribution>>,
}

impl WinDistributionEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tolerance(tolerance: Tolerance) -> Self {
        WinDistributionEstimator {
            tolerance,
            cache: HashMap::new(),
        }
    }

    /// Return the cached distribution, computing it on first request.
    ///
    /// Failures are not cached.
    pub fn estimate(
        &mut self,
        record: &Record,
        prior: &Prior,
    ) -> Result<Arc<OutcomeDistribution>> {
        let key = (*record, prior.cache_key());
        if let Some(hit) = self.cache.get(&key) {
            return Ok(Arc::clone(hit));
        }

        let distribution = Arc::new(compute_with_tolerance(record, prior, self.tolerance)?);
        self.cache.insert(key, Arc::clone(&distribution));
        Ok(distribution)
    }

    /// Number of memoized distributions.
    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    pub fn clear(&mut self) {
        self.cache.clear();
    }
}
