//! Solver output: a time vector paired with a state matrix.

use nalgebra::{DMatrix, RowDVector};

use crate::{CoreError, CoreResult, Real};

/// Time samples plus a `[n_dimensions][n_samples]` state matrix.
///
/// Column `j` of `states` is the state at `times[j]`. Consumers treat the
/// trajectory as read-only.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Trajectory {
    pub times: Vec<Real>,
    pub states: DMatrix<Real>,
}

impl Trajectory {
    /// Build a trajectory, checking that every column has a time stamp.
    pub fn new(times: Vec<Real>, states: DMatrix<Real>) -> CoreResult<Self> {
        if states.nrows() == 0 {
            return Err(CoreError::InvalidArg {
                what: "trajectory needs at least one state dimension",
            });
        }
        if times.len() != states.ncols() {
            return Err(CoreError::ShapeMismatch {
                what: "times length vs state columns",
                expected: states.ncols(),
                actual: times.len(),
            });
        }
        Ok(Self { times, states })
    }

    /// Build from one `Vec` per state dimension.
    pub fn from_rows(times: Vec<Real>, rows: &[Vec<Real>]) -> CoreResult<Self> {
        let n_samples = times.len();
        for row in rows {
            if row.len() != n_samples {
                return Err(CoreError::ShapeMismatch {
                    what: "state row length vs times length",
                    expected: n_samples,
                    actual: row.len(),
                });
            }
        }
        let states = DMatrix::from_fn(rows.len(), n_samples, |i, j| rows[i][j]);
        Self::new(times, states)
    }

    /// Number of state variables (rows of the state matrix).
    pub fn dimensions(&self) -> usize {
        self.states.nrows()
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// One state variable over time.
    pub fn row(&self, dim: usize) -> CoreResult<RowDVector<Real>> {
        if dim >= self.dimensions() {
            return Err(CoreError::ShapeMismatch {
                what: "state dimension index",
                expected: self.dimensions(),
                actual: dim,
            });
        }
        Ok(self.states.row(dim).into_owned())
    }

    /// State vector at sample `j`.
    pub fn sample(&self, j: usize) -> Option<Vec<Real>> {
        (j < self.len()).then(|| self.states.column(j).iter().copied().collect())
    }

    /// First and last time stamps.
    pub fn time_span(&self) -> Option<(Real, Real)> {
        Some((*self.times.first()?, *self.times.last()?))
    }
}
