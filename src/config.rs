// Matchup configuration: which teams to compare and how to label the chart.

use rayon::prelude::*;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::constants::{DEFAULT_PRIOR_LOSSES, DEFAULT_PRIOR_WINS, SEASON_LENGTH};
use crate::error::EstimateError;
use crate::record::{Prior, Record};
use crate::team::Team;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("config lists no teams")]
    NoTeams,

    #[error("team `{name}`: {source}")]
    Team {
        name: String,
        source: EstimateError,
    },
}

fn default_title() -> String {
    "Projected Wins".to_string()
}

fn default_season_length() -> i64 {
    i64::from(SEASON_LENGTH)
}

fn default_prior_wins() -> f64 {
    DEFAULT_PRIOR_WINS
}

fn default_prior_losses() -> f64 {
    DEFAULT_PRIOR_LOSSES
}

/// Top-level matchup file.
#[derive(Debug, Clone, Deserialize)]
pub struct MatchupConfig {
    #[serde(default = "default_title")]
    pub title: String,

    #[serde(default = "default_season_length")]
    pub season_length: i64,

    pub teams: Vec<TeamConfig>,
}

/// One `[[teams]]` entry. Counts are signed so negative values reach
/// record validation instead of failing to parse.
#[derive(Debug, Clone, Deserialize)]
pub struct TeamConfig {
    pub name: String,
    pub wins: i64,
    pub losses: i64,

    #[serde(default = "default_prior_wins")]
    pub prior_wins: f64,

    #[serde(default = "default_prior_losses")]
    pub prior_losses: f64,

    #[serde(default)]
    pub face_color: Option<String>,

    #[serde(default)]
    pub edge_color: Option<String>,
}

impl TeamConfig {
    fn build(&self, season_length: i64) -> Result<Team, EstimateError> {
        let record = Record::with_season_length(self.wins, self.losses, season_length)?;
        let prior = Prior::new(self.prior_wins, self.prior_losses)?;
        Ok(Team::new(self.name.clone(), record, prior)?
            .with_colors(self.face_color.clone(), self.edge_color.clone()))
    }
}

impl MatchupConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: PathBuf::from("<inline>"),
            source,
        })
    }

    /// Warriors vs 76ers, 2015/16, after the Warriors' 24-0 start.
    pub fn demo() -> Self {
        MatchupConfig {
            title: "Warriors vs Sixers Projected Wins 2015/16".to_string(),
            season_length: default_season_length(),
            teams: vec![
                TeamConfig {
                    name: "Warriors".to_string(),
                    wins: 24,
                    losses: 0,
                    prior_wins: 67.0,
                    prior_losses: 15.0,
                    face_color: Some("#fdb927".to_string()),
                    edge_color: Some("#006bb6".to_string()),
                },
                TeamConfig {
                    name: "76ers".to_string(),
                    wins: 1,
                    losses: 22,
                    prior_wins: 18.0,
                    prior_losses: 64.0,
                    face_color: Some("#006bb6".to_string()),
                    edge_color: Some("#ed174c".to_string()),
                },
            ],
        }
    }

    /// Validate every team and compute its distribution. Teams are
    /// independent, so they are computed in parallel; order is preserved.
    pub fn build_teams(&self) -> Result<Vec<Team>, ConfigError> {
        if self.teams.is_empty() {
            return Err(ConfigError::NoTeams);
        }
        self.teams
            .par_iter()
            .map(|t| {
                t.build(self.season_length).map_err(|source| ConfigError::Team {
                    name: t.name.clone(),
                    source,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_defaults() {
        let config = MatchupConfig::from_toml_str(
            r#"
            [[teams]]
            name = "Celtics"
            wins = 10
            losses = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.title, "Projected Wins");
        assert_eq!(config.season_length, 82);
        assert_eq!(config.teams[0].prior_wins, 1.0);
        assert_eq!(config.teams[0].prior_losses, 1.0);
        assert!(config.teams[0].face_color.is_none());
    }

    #[test]
    fn test_integer_priors_accepted() {
        let config = MatchupConfig::from_toml_str(
            r#"
            title = "Short season"
            season_length = 20

            [[teams]]
            name = "A"
            wins = 3
            losses = 2
            prior_wins = 7
            prior_losses = 3
            "#,
        )
        .unwrap();

        let teams = config.build_teams().unwrap();
        assert_eq!(teams[0].record().season_length(), 20);
        assert_eq!(teams[0].win_spread().0, (3..=18).collect::<Vec<_>>().as_slice());
    }

    #[test]
    fn test_negative_wins_rejected_at_build() {
        let config = MatchupConfig::from_toml_str(
            r#"
            [[teams]]
            name = "Broken"
            wins = -1
            losses = 0
            "#,
        )
        .unwrap();

        match config.build_teams() {
            Err(ConfigError::Team { name, source }) => {
                assert_eq!(name, "Broken");
                assert!(matches!(source, EstimateError::InvalidRecord { .. }));
            }
            other => panic!("expected team error, got {other:?}"),
        }
    }

    #[test]
    fn test_zero_prior_rejected_at_build() {
        let mut config = MatchupConfig::demo();
        config.teams[1].prior_wins = 0.0;
        assert!(matches!(
            config.build_teams(),
            Err(ConfigError::Team { source: EstimateError::InvalidPrior { .. }, .. })
        ));
    }

    #[test]
    fn test_empty_and_malformed() {
        assert!(matches!(
            MatchupConfig::from_toml_str("teams = []").unwrap().build_teams(),
            Err(ConfigError::NoTeams)
        ));
        assert!(matches!(
            MatchupConfig::from_toml_str("teams = 3"),
            Err(ConfigError::Parse { .. })
        ));
        assert!(matches!(
            MatchupConfig::load(Path::new("/nonexistent/matchup.toml")),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn test_demo_builds() {
        let teams = MatchupConfig::demo().build_teams().unwrap();
        assert_eq!(teams.len(), 2);
        assert_eq!(teams[0].name(), "Warriors");
        assert_eq!(teams[1].name(), "76ers");
        assert!(teams[0].expected_wins() > teams[1].expected_wins());
    }
}
