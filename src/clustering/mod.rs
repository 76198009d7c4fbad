//! Bootstrap-based cluster stability.
//!
//! Items (cells) are resampled with replacement, reclustered with a
//! caller-supplied clustering function, and the co-assignment probabilities
//! between the original and the new clustering are averaged over trials. A
//! stable cluster keeps its items together (high diagonal values) and does not
//! absorb items of other clusters (low off-diagonal values).
//!
//! ## Quick Example
//!
//! ```rust
//! use ndarray::Array2;
//! use single_stability::clustering::{BootstrapConfig, ContingencyCoassign, bootstrap_cluster};
//!
//! // 2 genes x 6 cells, two obvious groups of cells
//! let data = Array2::from_shape_vec(
//!     (2, 6),
//!     vec![0.0, 0.1, 0.2, 5.0, 5.1, 5.2, 0.0, 0.1, 0.2, 5.0, 5.1, 5.2],
//! )
//! .unwrap();
//!
//! let threshold = |data: &Array2<f64>| -> anyhow::Result<Vec<u8>> {
//!     Ok(data.row(0).iter().map(|&x| u8::from(x > 2.5)).collect())
//! };
//!
//! let config = BootstrapConfig::default().with_iterations(10).with_seed(42u64);
//! let result = bootstrap_cluster(&data, &threshold, &ContingencyCoassign, None, &config).unwrap();
//! assert_eq!(result.get(&0, &0), Some(1.0));
//! ```

use ndarray::Array2;

use crate::error::{Result, StabilityError};
use crate::random::Seed;

mod accumulator;
mod bootstrap;
mod coassign;
mod labels;
mod resample;

pub use accumulator::CoassignAccumulator;
pub use bootstrap::{bootstrap_cluster, bootstrap_stability};
pub use coassign::{CoassignProb, ContingencyCoassign};
pub use labels::LabelSet;
pub use resample::{ItemMatrix, draw_with_replacement};

/// Which axis of the data holds the items being clustered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ItemAxis {
    /// Items are columns (genes x cells)
    #[default]
    Columns,
    /// Items are rows (cells x genes)
    Rows,
}

impl ItemAxis {
    pub fn from_transposed(transposed: bool) -> Self {
        if transposed {
            ItemAxis::Rows
        } else {
            ItemAxis::Columns
        }
    }
}

/// A clustering procedure: one label per item of the data it is given.
///
/// Any extra parameters of the procedure are captured by the implementor.
/// Closures `Fn(&D) -> anyhow::Result<Vec<L>>` implement this trait.
pub trait ClusterFn<D>: Sync {
    type Label: Ord + Clone + Send + Sync;

    fn cluster(&self, data: &D) -> anyhow::Result<Vec<Self::Label>>;
}

impl<D, L, F> ClusterFn<D> for F
where
    F: Fn(&D) -> anyhow::Result<Vec<L>> + Sync,
    L: Ord + Clone + Send + Sync,
{
    type Label = L;

    fn cluster(&self, data: &D) -> anyhow::Result<Vec<L>> {
        self(data)
    }
}

/// Settings for a bootstrap stability run.
#[derive(Debug, Clone)]
pub struct BootstrapConfig {
    /// Number of bootstrap trials, must be positive
    pub iterations: usize,
    /// Items are the rows of the data instead of its columns
    pub transposed: bool,
    /// Reduce the co-assignment matrix to a per-label summary
    pub summarize: bool,
    /// Seed shared by all trials; trial `t` uses stream `t`
    pub seed: Seed,
    /// Run trials on the rayon thread pool
    pub parallel: bool,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        BootstrapConfig {
            iterations: 20,
            transposed: false,
            summarize: false,
            seed: Seed::Integer(0),
            parallel: false,
        }
    }
}

impl BootstrapConfig {
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_transposed(mut self, transposed: bool) -> Self {
        self.transposed = transposed;
        self
    }

    pub fn with_summarize(mut self, summarize: bool) -> Self {
        self.summarize = summarize;
        self
    }

    pub fn with_seed(mut self, seed: impl Into<Seed>) -> Self {
        self.seed = seed.into();
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn axis(&self) -> ItemAxis {
        ItemAxis::from_transposed(self.transposed)
    }

    /// Check that the configuration can drive a bootstrap run.
    ///
    /// Fails with `InvalidArgument` for zero iterations and `InvalidSeed` for
    /// a seed that does not normalize.
    pub fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(StabilityError::InvalidArgument(
                "number of bootstrap iterations must be positive".to_string(),
            ));
        }
        self.normalized_seed()?;
        Ok(())
    }

    /// The seed reduced to the 64 bits every trial generator starts from.
    pub fn normalized_seed(&self) -> Result<u64> {
        self.seed.normalize()
    }
}

/// Averaged co-assignment probabilities between the original labels.
///
/// Only the upper triangle (`i <= j`) of `values` is populated; use
/// [`CoassignMatrix::get`] for symmetric lookups.
#[derive(Debug, Clone)]
pub struct CoassignMatrix<L> {
    /// Original labels in canonical (sorted) order
    pub labels: Vec<L>,
    pub values: Array2<f64>,
}

impl<L> CoassignMatrix<L>
where
    L: Ord + Clone,
{
    pub fn n_labels(&self) -> usize {
        self.labels.len()
    }

    /// Probability for a pair of positions, in either order.
    pub fn value_at(&self, i: usize, j: usize) -> f64 {
        if i <= j {
            self.values[[i, j]]
        } else {
            self.values[[j, i]]
        }
    }

    /// Probability for a pair of labels, in either order; `None` for unknown labels.
    pub fn get(&self, a: &L, b: &L) -> Option<f64> {
        let i = self.labels.binary_search(a).ok()?;
        let j = self.labels.binary_search(b).ok()?;
        Some(self.value_at(i, j))
    }

    /// One row per label: its diagonal entry, and the largest defined
    /// off-diagonal entry involving it (NaN if there is none).
    pub fn summarize(&self) -> StabilitySummary<L> {
        let n = self.n_labels();
        let mut self_coassign = Vec::with_capacity(n);
        let mut other_coassign = Vec::with_capacity(n);

        for i in 0..n {
            self_coassign.push(self.value_at(i, i));

            let other = (0..n)
                .filter(|&j| j != i)
                .map(|j| self.value_at(i, j))
                .filter(|x| x.is_finite())
                .fold(None, |acc: Option<f64>, x| Some(acc.map_or(x, |m| m.max(x))));
            other_coassign.push(other.unwrap_or(f64::NAN));
        }

        StabilitySummary {
            labels: self.labels.clone(),
            self_coassign,
            other_coassign,
        }
    }
}

/// Per-label stability summary.
#[derive(Debug, Clone)]
pub struct StabilitySummary<L> {
    pub labels: Vec<L>,
    /// Probability that a label's items stay together
    pub self_coassign: Vec<f64>,
    /// Largest probability of being co-assigned with another label
    pub other_coassign: Vec<f64>,
}

impl<L> StabilitySummary<L>
where
    L: PartialEq,
{
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// `(self, other)` for a label.
    pub fn row(&self, label: &L) -> Option<(f64, f64)> {
        let idx = self.labels.iter().position(|l| l == label)?;
        Some((self.self_coassign[idx], self.other_coassign[idx]))
    }
}

/// Result of [`bootstrap_stability`], depending on `BootstrapConfig::summarize`.
#[derive(Debug, Clone)]
pub enum BootstrapOutput<L> {
    Matrix(CoassignMatrix<L>),
    Summary(StabilitySummary<L>),
}

impl<L> BootstrapOutput<L> {
    pub fn as_matrix(&self) -> Option<&CoassignMatrix<L>> {
        match self {
            BootstrapOutput::Matrix(matrix) => Some(matrix),
            BootstrapOutput::Summary(_) => None,
        }
    }

    pub fn as_summary(&self) -> Option<&StabilitySummary<L>> {
        match self {
            BootstrapOutput::Matrix(_) => None,
            BootstrapOutput::Summary(summary) => Some(summary),
        }
    }
}
