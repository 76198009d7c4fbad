use ndarray::Array2;

use crate::error::StabilityError;

/// Co-assignment probabilities between two clusterings of the same items.
///
/// Both clusterings are given as canonical codes (see
/// [`LabelSet`](crate::clustering::LabelSet)). The returned matrix is
/// `n_reference` x `n_reference`; entry `(i, j)` with `i <= j` is the
/// probability that a random item of reference label `i` and a random item of
/// reference label `j` share the same label in `other`. Entries that cannot be
/// estimated must be non-finite. The lower triangle is never read.
pub trait CoassignProb: Sync {
    fn coassign(
        &self,
        reference: &[usize],
        n_reference: usize,
        other: &[usize],
        n_other: usize,
    ) -> anyhow::Result<Array2<f64>>;
}

impl<F> CoassignProb for F
where
    F: Fn(&[usize], usize, &[usize], usize) -> anyhow::Result<Array2<f64>> + Sync,
{
    fn coassign(
        &self,
        reference: &[usize],
        n_reference: usize,
        other: &[usize],
        n_other: usize,
    ) -> anyhow::Result<Array2<f64>> {
        self(reference, n_reference, other, n_other)
    }
}

/// Co-assignment from the contingency table of the two clusterings.
///
/// With `f_ik` the fraction of items of reference label `i` that carry label
/// `k` in the other clustering, `p(i, j) = sum_k f_ik * f_jk`. Reference labels
/// with no items give NaN for every pair they are part of.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContingencyCoassign;

impl CoassignProb for ContingencyCoassign {
    fn coassign(
        &self,
        reference: &[usize],
        n_reference: usize,
        other: &[usize],
        n_other: usize,
    ) -> anyhow::Result<Array2<f64>> {
        if reference.len() != other.len() {
            return Err(
                StabilityError::dimension_mismatch("reference labels", "other labels").into(),
            );
        }

        let mut fractions = Array2::<f64>::zeros((n_reference, n_other));
        let mut totals = vec![0usize; n_reference];

        for (&r, &o) in reference.iter().zip(other.iter()) {
            if r >= n_reference || o >= n_other {
                return Err(anyhow::anyhow!(
                    "label code out of range: reference {} of {}, other {} of {}",
                    r,
                    n_reference,
                    o,
                    n_other
                ));
            }
            fractions[[r, o]] += 1.0;
            totals[r] += 1;
        }

        for (mut row, &total) in fractions.rows_mut().into_iter().zip(totals.iter()) {
            if total > 0 {
                row /= total as f64;
            }
        }

        let mut result = Array2::from_elem((n_reference, n_reference), f64::NAN);
        for i in 0..n_reference {
            if totals[i] == 0 {
                continue;
            }
            for j in i..n_reference {
                if totals[j] == 0 {
                    continue;
                }
                result[[i, j]] = fractions.row(i).dot(&fractions.row(j));
            }
        }

        Ok(result)
    }
}
