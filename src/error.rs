use thiserror::Error;

use crate::quadrature::QuadratureError;

/// Failures of the win-distribution computation.
///
/// Validation errors are raised before any integration work starts.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EstimateError {
    #[error("invalid record {wins}-{losses} over a {season_length}-game season: {reason}")]
    InvalidRecord {
        wins: i64,
        losses: i64,
        season_length: i64,
        reason: &'static str,
    },

    #[error(
        "invalid prior ({prior_wins}, {prior_losses}): pseudo-counts must be finite and positive"
    )]
    InvalidPrior { prior_wins: f64, prior_losses: f64 },

    #[error("integration failed for a final total of {total} wins: {source}")]
    NumericalIntegration {
        total: u32,
        #[source]
        source: QuadratureError,
    },

    #[error("integration for a final total of {total} wins gave probability {value}")]
    ProbabilityOutOfRange { total: u32, value: f64 },

    #[error("distribution mass {mass} deviates from 1 by more than {tolerance}")]
    MassMismatch { mass: f64, tolerance: f64 },
}

pub type Result<T> = std::result::Result<T, EstimateError>;
