use serde::Serialize;

use crate::constants::{DEFAULT_PRIOR_LOSSES, DEFAULT_PRIOR_WINS, SEASON_LENGTH};
use crate::error::{EstimateError, Result};

/// Observed state of a team partway through a season.
///
/// Always satisfies `wins + losses <= season_length`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Record {
    wins: u32,
    losses: u32,
    season_length: u32,
}

impl Record {
    /// Create a record for a standard 82-game season.
    pub fn new(wins: i64, losses: i64) -> Result<Self> {
        Self::with_season_length(wins, losses, i64::from(SEASON_LENGTH))
    }

    /// Create a record for a season of arbitrary length.
    ///
    /// Counts are taken as signed integers so that negative input coming from
    /// config files or bindings is rejected here rather than wrapping.
    pub fn with_season_length(wins: i64, losses: i64, season_length: i64) -> Result<Self> {
        let invalid = |reason| EstimateError::InvalidRecord {
            wins,
            losses,
            season_length,
            reason,
        };

        if season_length <= 0 {
            return Err(invalid("season length must be positive"));
        }
        if wins < 0 {
            return Err(invalid("wins must be non-negative"));
        }
        if losses < 0 {
            return Err(invalid("losses must be non-negative"));
        }
        if wins.saturating_add(losses) > season_length {
            return Err(invalid("more games played than the season holds"));
        }

        let season_length =
            u32::try_from(season_length).map_err(|_| invalid("season length too large"))?;
        Ok(Record {
            wins: wins as u32,
            losses: losses as u32,
            season_length,
        })
    }

    pub fn wins(&self) -> u32 {
        self.wins
    }

    pub fn losses(&self) -> u32 {
        self.losses
    }

    pub fn season_length(&self) -> u32 {
        self.season_length
    }

    pub fn games_played(&self) -> u32 {
        self.wins + self.losses
    }

    /// Games left to play
    pub fn remaining(&self) -> u32 {
        self.season_length - self.games_played()
    }

    /// Highest final win total still reachable (win out).
    pub fn max_total(&self) -> u32 {
        self.season_length - self.losses
    }

    /// Every final win total still reachable, in ascending order.
    pub fn possible_totals(&self) -> impl Iterator<Item = u32> {
        self.wins..=self.max_total()
    }
}

/// Beta prior over the team's true per-game win probability,
/// expressed as pseudo-counts.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Prior {
    prior_wins: f64,
    prior_losses: f64,
}

impl Prior {
    /// Create a prior. Both pseudo-counts must be finite and strictly positive.
    pub fn new(prior_wins: f64, prior_losses: f64) -> Result<Self> {
        let valid = |x: f64| x.is_finite() && x > 0.0;
        if !valid(prior_wins) || !valid(prior_losses) {
            return Err(EstimateError::InvalidPrior {
                prior_wins,
                prior_losses,
            });
        }
        Ok(Prior {
            prior_wins,
            prior_losses,
        })
    }

    /// Uniform Beta(1, 1) prior.
    pub fn uniform() -> Self {
        Prior {
            prior_wins: DEFAULT_PRIOR_WINS,
            prior_losses: DEFAULT_PRIOR_LOSSES,
        }
    }

    pub fn prior_wins(&self) -> f64 {
        self.prior_wins
    }

    pub fn prior_losses(&self) -> f64 {
        self.prior_losses
    }

    /// Shape parameters `(alpha, beta)` of the posterior after `record`.
    pub fn posterior(&self, record: &Record) -> (f64, f64) {
        (
            f64::from(record.wins()) + self.prior_wins,
            f64::from(record.losses()) + self.prior_losses,
        )
    }

    /// Bit-exact key for memoization (f64 is not `Hash`).
    pub(crate) fn cache_key(&self) -> (u64, u64) {
        (self.prior_wins.to_bits(), self.prior_losses.to_bits())
    }
}

impl Default for Prior {
    fn default() -> Self {
        Self::uniform()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reason(err: EstimateError) -> &'static str {
        match err {
            EstimateError::InvalidRecord { reason, .. } => reason,
            other => panic!("expected InvalidRecord, got {other:?}"),
        }
    }

    #[test]
    fn test_record_accessors() {
        let record = Record::new(24, 0).unwrap();
        assert_eq!(record.wins(), 24);
        assert_eq!(record.losses(), 0);
        assert_eq!(record.season_length(), 82);
        assert_eq!(record.remaining(), 58);
        assert_eq!(record.max_total(), 82);
        assert_eq!(record.possible_totals().count(), 59);
    }

    #[test]
    fn test_negative_counts_rejected() {
        assert_eq!(reason(Record::new(-1, 0).unwrap_err()), "wins must be non-negative");
        assert_eq!(reason(Record::new(0, -3).unwrap_err()), "losses must be non-negative");
    }

    #[test]
    fn test_overfull_season_rejected() {
        let err = Record::new(50, 33).unwrap_err();
        assert!(matches!(
            err,
            EstimateError::InvalidRecord {
                wins: 50,
                losses: 33,
                ..
            }
        ));
        assert!(Record::with_season_length(5, 6, 10).is_err());
        assert!(Record::with_season_length(4, 6, 10).is_ok());
    }

    #[test]
    fn test_non_positive_season_rejected() {
        assert!(Record::with_season_length(0, 0, 0).is_err());
        assert!(Record::with_season_length(0, 0, -82).is_err());
    }

    #[test]
    fn test_completed_season() {
        let record = Record::new(82, 0).unwrap();
        assert_eq!(record.remaining(), 0);
        assert_eq!(record.possible_totals().collect::<Vec<_>>(), vec![82]);
    }

    #[test]
    fn test_prior_validation() {
        assert!(matches!(Prior::new(0.0, 1.0), Err(EstimateError::InvalidPrior { .. })));
        assert!(Prior::new(1.0, -2.0).is_err());
        assert!(Prior::new(f64::NAN, 1.0).is_err());
        assert!(Prior::new(1.0, f64::INFINITY).is_err());
        assert!(Prior::new(0.5, 0.5).is_ok());
    }

    #[test]
    fn test_posterior_shape() {
        let record = Record::new(24, 0).unwrap();
        let prior = Prior::new(67.0, 15.0).unwrap();
        assert_eq!(prior.posterior(&record), (91.0, 15.0));
        assert_eq!(Prior::default(), Prior::uniform());
    }
}
