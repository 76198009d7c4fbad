use ndarray::{Array2, ArrayView2, Zip};

use crate::error::{Result, StabilityError};

/// Running average of per-trial co-assignment matrices.
///
/// Every cell keeps its own sum and count of finite contributions, so a label
/// pair that could not be estimated in some trials is averaged only over the
/// trials where it was defined. Accumulation is a per-cell sum, which makes
/// the final result independent of the order in which trials arrive.
#[derive(Debug, Clone)]
pub struct CoassignAccumulator {
    sum: Array2<f64>,
    count: Array2<u32>,
    trials: usize,
}

impl CoassignAccumulator {
    /// Accumulator for an `n_labels` x `n_labels` co-assignment matrix.
    pub fn new(n_labels: usize) -> Self {
        CoassignAccumulator {
            sum: Array2::zeros((n_labels, n_labels)),
            count: Array2::zeros((n_labels, n_labels)),
            trials: 0,
        }
    }

    /// Add one trial's matrix. Non-finite cells are skipped entirely.
    pub fn accumulate(&mut self, trial: ArrayView2<'_, f64>) -> Result<()> {
        if trial.dim() != self.sum.dim() {
            return Err(StabilityError::dimension_mismatch(
                "accumulated label pairs",
                "trial label pairs",
            ));
        }

        Zip::from(&mut self.sum)
            .and(&mut self.count)
            .and(&trial)
            .for_each(|sum, count, &value| {
                if value.is_finite() {
                    *sum += value;
                    *count += 1;
                }
            });

        self.trials += 1;
        Ok(())
    }

    /// Fold a partial accumulator, e.g. one built on another worker, into this one.
    pub fn merge(&mut self, other: &CoassignAccumulator) -> Result<()> {
        if other.sum.dim() != self.sum.dim() {
            return Err(StabilityError::dimension_mismatch(
                "accumulated label pairs",
                "merged label pairs",
            ));
        }

        self.sum += &other.sum;
        self.count += &other.count;
        self.trials += other.trials;
        Ok(())
    }

    /// Elementwise `sum / count`; cells without any valid contribution are NaN.
    pub fn finalize(&self) -> Array2<f64> {
        Zip::from(&self.sum)
            .and(&self.count)
            .map_collect(|&sum, &count| {
                if count == 0 {
                    f64::NAN
                } else {
                    sum / f64::from(count)
                }
            })
    }

    /// Number of trial matrices accumulated so far, including merged ones.
    pub fn trials(&self) -> usize {
        self.trials
    }

    /// Number of finite contributions received by each cell.
    pub fn counts(&self) -> &Array2<u32> {
        &self.count
    }
}
