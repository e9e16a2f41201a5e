//! Chart model handed to renderers, plus two small renderers.
//!
//! The estimator knows nothing about presentation. A [`Renderer`] receives a
//! [`ComparisonChart`] built from computed teams and owns every visual
//! decision.

use serde::Serialize;
use std::io::Write;
use thiserror::Error;

use crate::constants::{CHART_Y_MAX, SEASON_LENGTH};
use crate::distribution::OutcomeDistribution;
use crate::team::Team;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to write chart: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize chart: {0}")]
    Json(#[from] serde_json::Error),
}

/// One team's bar series and expected-value marker.
#[derive(Clone, Debug, Serialize)]
pub struct ChartSeries<'a> {
    pub name: &'a str,
    pub face_color: Option<&'a str>,
    pub edge_color: Option<&'a str>,
    pub distribution: &'a OutcomeDistribution,
}

impl ChartSeries<'_> {
    pub fn expected_label(&self) -> String {
        format!("Expected: {:.1}", self.distribution.expected_wins())
    }
}

/// Several teams' distributions on shared axes.
#[derive(Clone, Debug, Serialize)]
pub struct ComparisonChart<'a> {
    pub title: &'a str,
    pub x_max: u32,
    pub y_max: f64,
    pub series: Vec<ChartSeries<'a>>,
}

impl<'a> ComparisonChart<'a> {
    pub fn from_teams(title: &'a str, teams: &'a [Team]) -> Self {
        let x_max = teams
            .iter()
            .map(|t| t.record().season_length())
            .max()
            .unwrap_or(SEASON_LENGTH);
        let peak = teams
            .iter()
            .map(|t| t.distribution().peak_probability())
            .fold(0.0, f64::max);

        ComparisonChart {
            title,
            x_max,
            y_max: CHART_Y_MAX.max(peak),
            series: teams
                .iter()
                .map(|t| ChartSeries {
                    name: t.name(),
                    face_color: t.face_color(),
                    edge_color: t.edge_color(),
                    distribution: t.distribution(),
                })
                .collect(),
        }
    }
}

/// Consumer of computed distributions.
pub trait Renderer {
    fn render(&mut self, chart: &ComparisonChart<'_>) -> Result<(), RenderError>;
}

/// Format a likelihood as a whole percentage, e.g. `0.137` -> `"14%"`.
pub fn format_percent(y: f64) -> String {
    format!("{:.0}%", 100.0 * y)
}

/// Horizontal text bar chart, one block per team.
pub struct TextRenderer<W: Write> {
    out: W,
    width: usize,
    min_probability: f64,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W) -> Self {
        TextRenderer {
            out,
            width: 50,
            min_probability: 0.0005,
        }
    }

    /// Bar length, in characters, of a likelihood equal to the chart's `y_max`.
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn render(&mut self, chart: &ComparisonChart<'_>) -> Result<(), RenderError> {
        writeln!(self.out, "{}", chart.title)?;
        writeln!(self.out, "{}", "=".repeat(chart.title.chars().count()))?;

        for series in &chart.series {
            let dist = series.distribution;
            let marker = dist.expected_wins().round() as u32;
            let (low, high) = dist.credible_interval(0.9);

            writeln!(self.out)?;
            writeln!(
                self.out,
                "{} ({}, 90% interval {}-{})",
                series.name,
                series.expected_label(),
                low,
                high
            )?;

            for (total, p) in dist.iter() {
                if p < self.min_probability {
                    continue;
                }
                let len = ((p / chart.y_max) * self.width as f64).round() as usize;
                let tag = if total == marker { " <- expected" } else { "" };
                writeln!(
                    self.out,
                    "{:>3} | {:<width$} {:>4}{}",
                    total,
                    "#".repeat(len.min(self.width)),
                    format_percent(p),
                    tag,
                    width = self.width
                )?;
            }
        }

        self.out.flush()?;
        Ok(())
    }
}

/// Pretty-printed JSON export of the whole chart.
pub struct JsonRenderer<W: Write> {
    out: W,
}

impl<W: Write> JsonRenderer<W> {
    pub fn new(out: W) -> Self {
        JsonRenderer { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for JsonRenderer<W> {
    fn render(&mut self, chart: &ComparisonChart<'_>) -> Result<(), RenderError> {
        serde_json::to_writer_pretty(&mut self.out, chart)?;
        writeln!(self.out)?;
        Ok(())
    }
}
