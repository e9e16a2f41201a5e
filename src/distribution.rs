use serde::Serialize;

/// Probability mass over every reachable final win total.
///
/// `possible_totals` is the contiguous range `wins..=season_length - losses`
/// and `probabilities` is index-aligned with it. Values are fixed at
/// construction.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OutcomeDistribution {
    possible_totals: Vec<u32>,
    probabilities: Vec<f64>,
    expected_wins: f64,
}

impl OutcomeDistribution {
    /// Build from the lowest reachable total and the masses of each total
    /// from there upward.
    pub(crate) fn new(first_total: u32, probabilities: Vec<f64>) -> Self {
        let possible_totals: Vec<u32> = (first_total..).take(probabilities.len()).collect();
        let expected_wins = possible_totals
            .iter()
            .zip(&probabilities)
            .map(|(&n, &p)| f64::from(n) * p)
            .sum();

        OutcomeDistribution {
            possible_totals,
            probabilities,
            expected_wins,
        }
    }

    /// All mass on a single total (season already decided).
    pub(crate) fn certain(total: u32) -> Self {
        Self::new(total, vec![1.0])
    }

    pub fn possible_totals(&self) -> &[u32] {
        &self.possible_totals
    }

    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    pub fn expected_wins(&self) -> f64 {
        self.expected_wins
    }

    pub fn len(&self) -> usize {
        self.possible_totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.possible_totals.is_empty()
    }

    /// `(total, probability)` pairs in ascending total order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.possible_totals
            .iter()
            .copied()
            .zip(self.probabilities.iter().copied())
    }

    pub fn total_mass(&self) -> f64 {
        self.probabilities.iter().sum()
    }

    pub fn min_total(&self) -> u32 {
        self.possible_totals.first().copied().unwrap_or(0)
    }

    pub fn max_total(&self) -> u32 {
        self.possible_totals.last().copied().unwrap_or(0)
    }

    /// Probability of finishing with exactly `total` wins (0 if unreachable).
    pub fn probability_of(&self, total: u32) -> f64 {
        if self.is_empty() || total < self.min_total() || total > self.max_total() {
            return 0.0;
        }
        self.probabilities[(total - self.min_total()) as usize]
    }

    /// Probability of finishing with at least `total` wins.
    pub fn probability_at_least(&self, total: u32) -> f64 {
        self.iter().filter(|&(n, _)| n >= total).map(|(_, p)| p).sum()
    }

    /// Probability of finishing with at most `total` wins.
    pub fn probability_at_most(&self, total: u32) -> f64 {
        self.iter().filter(|&(n, _)| n <= total).map(|(_, p)| p).sum()
    }

    pub fn variance(&self) -> f64 {
        let mean = self.expected_wins;
        self.iter()
            .map(|(n, p)| {
                let d = f64::from(n) - mean;
                d * d * p
            })
            .sum()
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Most likely final total. Ties resolve to the lower total.
    pub fn mode(&self) -> u32 {
        let mut best = (self.min_total(), f64::NEG_INFINITY);
        for (n, p) in self.iter() {
            if p > best.1 {
                best = (n, p);
            }
        }
        best.0
    }

    /// Largest single-outcome probability (height of the tallest bar).
    pub fn peak_probability(&self) -> f64 {
        self.probabilities.iter().copied().fold(0.0, f64::max)
    }

    /// Central interval `(low, high)` holding at least `level` of the mass.
    ///
    /// `level` is clamped to `[0, 1]`.
    pub fn credible_interval(&self, level: f64) -> (u32, u32) {
        let tail = 0.5 * (1.0 - level.clamp(0.0, 1.0));
        let mut low = None;
        let mut high = self.max_total();
        let mut cumulative = 0.0;

        for (n, p) in self.iter() {
            cumulative += p;
            if low.is_none() && cumulative > tail {
                low = Some(n);
            }
            if cumulative >= 1.0 - tail {
                high = n;
                break;
            }
        }

        (low.unwrap_or(self.min_total()), high)
    }
}
