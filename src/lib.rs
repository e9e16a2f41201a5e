//! Season Core - season-end win projections from a partial record.
//!
//! Given a team's wins and losses so far and a Beta prior over its true
//! win rate, computes the probability of every reachable final win total by
//! integrating a binomial likelihood against the Beta posterior. Python
//! bindings are available with the `python` feature.

pub mod config;
pub mod constants;
pub mod distribution;
pub mod error;
pub mod estimator;
pub mod quadrature;
pub mod record;
pub mod render;
pub mod simulation;
pub mod team;

#[cfg(feature = "python")]
mod python;

pub use config::{ConfigError, MatchupConfig, TeamConfig};
pub use constants::SEASON_LENGTH;
pub use distribution::OutcomeDistribution;
pub use error::{EstimateError, Result};
pub use estimator::{
    beta_binomial_pmf, compute, compute_all, compute_with_tolerance, probability_of_total,
    WinDistributionEstimator,
};
pub use quadrature::{QuadratureError, Tolerance};
pub use record::{Prior, Record};
pub use render::{ComparisonChart, JsonRenderer, RenderError, Renderer, TextRenderer};
pub use simulation::{simulate_spread, SimulatedSpread};
pub use team::Team;
