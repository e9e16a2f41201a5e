use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;

use crate::constants::{DEFAULT_PRIOR_LOSSES, DEFAULT_PRIOR_WINS, SEASON_LENGTH};
use crate::error::EstimateError;
use crate::estimator;
use crate::record::{Prior, Record};
use crate::team::Team;

const DEFAULT_SEASON_LENGTH: i64 = SEASON_LENGTH as i64;

impl From<EstimateError> for PyErr {
    fn from(err: EstimateError) -> PyErr {
        match err {
            EstimateError::InvalidRecord { .. } | EstimateError::InvalidPrior { .. } => {
                PyValueError::new_err(err.to_string())
            }
            EstimateError::NumericalIntegration { .. }
            | EstimateError::ProbabilityOutOfRange { .. }
            | EstimateError::MassMismatch { .. } => PyRuntimeError::new_err(err.to_string()),
        }
    }
}

/// Team with a record, a prior and its computed win spread.
#[pyclass(name = "Team")]
#[derive(Clone)]
pub struct PyTeam {
    inner: Team,
}

#[pymethods]
impl PyTeam {
    #[new]
    #[pyo3(signature = (
        wins,
        losses,
        prior_wins = DEFAULT_PRIOR_WINS,
        prior_losses = DEFAULT_PRIOR_LOSSES,
        name = None,
        fc = None,
        ec = None,
        season_length = DEFAULT_SEASON_LENGTH,
    ))]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        wins: i64,
        losses: i64,
        prior_wins: f64,
        prior_losses: f64,
        name: Option<String>,
        fc: Option<String>,
        ec: Option<String>,
        season_length: i64,
    ) -> PyResult<Self> {
        let record = Record::with_season_length(wins, losses, season_length)?;
        let prior = Prior::new(prior_wins, prior_losses)?;
        let inner = Team::new(name.unwrap_or_default(), record, prior)?.with_colors(fc, ec);
        Ok(PyTeam { inner })
    }

    #[getter]
    pub fn name(&self) -> String {
        self.inner.name().to_string()
    }

    #[getter]
    pub fn expected_wins(&self) -> f64 {
        self.inner.expected_wins()
    }

    #[getter]
    pub fn fc(&self) -> Option<String> {
        self.inner.face_color().map(str::to_string)
    }

    #[getter]
    pub fn ec(&self) -> Option<String> {
        self.inner.edge_color().map(str::to_string)
    }

    /// Returns `(possible_totals, probabilities)`.
    pub fn win_spread(&self) -> (Vec<u32>, Vec<f64>) {
        let (totals, spread) = self.inner.win_spread();
        (totals.to_vec(), spread.to_vec())
    }

    /// Probability of finishing with exactly `total` wins.
    pub fn prob_n_w(&self, total: u32) -> f64 {
        self.inner.distribution().probability_of(total)
    }

    fn __repr__(&self) -> String {
        let record = self.inner.record();
        format!(
            "Team({:?}, {}-{}, expected_wins={:.1})",
            self.inner.name(),
            record.wins(),
            record.losses(),
            self.inner.expected_wins()
        )
    }
}

/// Compute `(possible_totals, probabilities, expected_wins)` for a record.
#[pyfunction]
#[pyo3(signature = (
    wins,
    losses,
    prior_wins = DEFAULT_PRIOR_WINS,
    prior_losses = DEFAULT_PRIOR_LOSSES,
    season_length = DEFAULT_SEASON_LENGTH,
))]
fn compute(
    wins: i64,
    losses: i64,
    prior_wins: f64,
    prior_losses: f64,
    season_length: i64,
) -> PyResult<(Vec<u32>, Vec<f64>, f64)> {
    let record = Record::with_season_length(wins, losses, season_length)?;
    let prior = Prior::new(prior_wins, prior_losses)?;
    let dist = estimator::compute(&record, &prior)?;
    Ok((
        dist.possible_totals().to_vec(),
        dist.probabilities().to_vec(),
        dist.expected_wins(),
    ))
}

/// Python module definition
#[pymodule]
fn season_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyTeam>()?;
    m.add_function(wrap_pyfunction!(compute, m)?)?;
    m.add("SEASON_LENGTH", SEASON_LENGTH)?;
    Ok(())
}
