use serde::Serialize;

use crate::distribution::OutcomeDistribution;
use crate::error::Result;
use crate::estimator::compute;
use crate::record::{Prior, Record};

/// A named team whose win distribution is computed once, at construction.
#[derive(Clone, Debug, Serialize)]
pub struct Team {
    name: String,
    record: Record,
    prior: Prior,

    /// Bar fill color for renderers (e.g. "#fdb927")
    face_color: Option<String>,

    /// Bar outline and marker color for renderers
    edge_color: Option<String>,

    distribution: OutcomeDistribution,
}

impl Team {
    pub fn new(name: impl Into<String>, record: Record, prior: Prior) -> Result<Self> {
        let distribution = compute(&record, &prior)?;
        Ok(Team {
            name: name.into(),
            record,
            prior,
            face_color: None,
            edge_color: None,
            distribution,
        })
    }

    /// Attach chart colors.
    pub fn with_colors(mut self, face_color: Option<String>, edge_color: Option<String>) -> Self {
        self.face_color = face_color;
        self.edge_color = edge_color;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn record(&self) -> &Record {
        &self.record
    }

    pub fn prior(&self) -> &Prior {
        &self.prior
    }

    pub fn face_color(&self) -> Option<&str> {
        self.face_color.as_deref()
    }

    pub fn edge_color(&self) -> Option<&str> {
        self.edge_color.as_deref()
    }

    pub fn distribution(&self) -> &OutcomeDistribution {
        &self.distribution
    }

    /// Reachable totals and their probabilities.
    pub fn win_spread(&self) -> (&[u32], &[f64]) {
        (
            self.distribution.possible_totals(),
            self.distribution.probabilities(),
        )
    }

    pub fn expected_wins(&self) -> f64 {
        self.distribution.expected_wins()
    }
}
