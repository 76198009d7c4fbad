use nalgebra_sparse::CsrMatrix;
use ndarray::{Array2, Axis};
use single_utilities::traits::FloatOpsTS;

use crate::clustering::ItemAxis;
use crate::error::Result;
use crate::random::{Pcg32, UniformDraws};

/// A two-dimensional data container whose items (rows or columns) can be resampled.
pub trait ItemMatrix: Sized + Sync {
    /// Number of items along `axis`.
    fn n_items(&self, axis: ItemAxis) -> usize;

    /// New container holding the items at `chosen`, in that order.
    /// Indices may repeat.
    fn select_items(&self, chosen: &[usize], axis: ItemAxis) -> anyhow::Result<Self>;
}

impl<T> ItemMatrix for Array2<T>
where
    T: Clone + Sync,
{
    fn n_items(&self, axis: ItemAxis) -> usize {
        match axis {
            ItemAxis::Columns => self.ncols(),
            ItemAxis::Rows => self.nrows(),
        }
    }

    fn select_items(&self, chosen: &[usize], axis: ItemAxis) -> anyhow::Result<Self> {
        let n = self.n_items(axis);
        if let Some(&bad) = chosen.iter().find(|&&item| item >= n) {
            return Err(anyhow::anyhow!("item index {} out of bounds for {} items", bad, n));
        }

        let selected = match axis {
            ItemAxis::Columns => self.select(Axis(1), chosen),
            ItemAxis::Rows => self.select(Axis(0), chosen),
        };
        Ok(selected)
    }
}

impl<T> ItemMatrix for CsrMatrix<T>
where
    T: FloatOpsTS,
{
    fn n_items(&self, axis: ItemAxis) -> usize {
        match axis {
            ItemAxis::Columns => self.ncols(),
            ItemAxis::Rows => self.nrows(),
        }
    }

    fn select_items(&self, chosen: &[usize], axis: ItemAxis) -> anyhow::Result<Self> {
        let n = self.n_items(axis);
        if let Some(&bad) = chosen.iter().find(|&&item| item >= n) {
            return Err(anyhow::anyhow!("item index {} out of bounds for {} items", bad, n));
        }

        match axis {
            ItemAxis::Rows => select_csr_rows(self, chosen),
            ItemAxis::Columns => select_csr_columns(self, chosen),
        }
    }
}

fn select_csr_rows<T>(matrix: &CsrMatrix<T>, chosen: &[usize]) -> anyhow::Result<CsrMatrix<T>>
where
    T: FloatOpsTS,
{
    let mut row_offsets = Vec::with_capacity(chosen.len() + 1);
    let mut col_indices = Vec::new();
    let mut values = Vec::new();
    row_offsets.push(0);

    for &row_idx in chosen {
        let row = matrix.row(row_idx);
        col_indices.extend_from_slice(row.col_indices());
        values.extend_from_slice(row.values());
        row_offsets.push(col_indices.len());
    }

    CsrMatrix::try_from_csr_data(chosen.len(), matrix.ncols(), row_offsets, col_indices, values)
        .map_err(|e| anyhow::anyhow!("Failed to build resampled sparse matrix: {}", e))
}

fn select_csr_columns<T>(matrix: &CsrMatrix<T>, chosen: &[usize]) -> anyhow::Result<CsrMatrix<T>>
where
    T: FloatOpsTS,
{
    // A column drawn several times maps to several new positions
    let mut new_positions: Vec<Vec<usize>> = vec![Vec::new(); matrix.ncols()];
    for (new_idx, &old_idx) in chosen.iter().enumerate() {
        new_positions[old_idx].push(new_idx);
    }

    let mut row_offsets = Vec::with_capacity(matrix.nrows() + 1);
    let mut col_indices = Vec::new();
    let mut values = Vec::new();
    let mut entries: Vec<(usize, T)> = Vec::new();
    row_offsets.push(0);

    for row_idx in 0..matrix.nrows() {
        let row = matrix.row(row_idx);
        entries.clear();
        for (&col, &value) in row.col_indices().iter().zip(row.values()) {
            entries.extend(new_positions[col].iter().map(|&new_idx| (new_idx, value)));
        }
        entries.sort_unstable_by_key(|&(new_idx, _)| new_idx);

        for &(new_idx, value) in &entries {
            col_indices.push(new_idx);
            values.push(value);
        }
        row_offsets.push(col_indices.len());
    }

    CsrMatrix::try_from_csr_data(matrix.nrows(), chosen.len(), row_offsets, col_indices, values)
        .map_err(|e| anyhow::anyhow!("Failed to build resampled sparse matrix: {}", e))
}

/// Draw `n_items` positions uniformly with replacement.
pub fn draw_with_replacement(rng: &mut Pcg32, n_items: usize) -> Result<Vec<usize>> {
    (0..n_items).map(|_| rng.uniform_index(n_items)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra_sparse::CooMatrix;
    use ndarray::array;

    fn sparse_example() -> CsrMatrix<f64> {
        // [[1, 0, 2],
        //  [0, 3, 0]]
        let mut coo = CooMatrix::new(2, 3);
        coo.push(0, 0, 1.0);
        coo.push(0, 2, 2.0);
        coo.push(1, 1, 3.0);
        CsrMatrix::from(&coo)
    }

    fn dense(matrix: &CsrMatrix<f64>) -> Array2<f64> {
        let mut out = Array2::zeros((matrix.nrows(), matrix.ncols()));
        for (row, col, &value) in matrix.triplet_iter() {
            out[[row, col]] = value;
        }
        out
    }

    #[test]
    fn test_dense_column_selection() {
        let data = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
        let picked = data.select_items(&[2, 2, 0], ItemAxis::Columns).unwrap();
        assert_eq!(picked, array![[3.0, 3.0, 1.0], [6.0, 6.0, 4.0]]);
        assert_eq!(data.n_items(ItemAxis::Columns), 3);
    }

    #[test]
    fn test_dense_row_selection() {
        let data = array![[1, 2], [3, 4], [5, 6]];
        let picked = data.select_items(&[1, 1], ItemAxis::Rows).unwrap();
        assert_eq!(picked, array![[3, 4], [3, 4]]);
        assert_eq!(data.n_items(ItemAxis::Rows), 3);
    }

    #[test]
    fn test_out_of_bounds_selection() {
        let data = array![[1.0, 2.0]];
        assert!(data.select_items(&[2], ItemAxis::Columns).is_err());
    }

    #[test]
    fn test_sparse_column_selection() {
        let matrix = sparse_example();
        let picked = matrix.select_items(&[2, 0, 2], ItemAxis::Columns).unwrap();
        assert_eq!(dense(&picked), array![[2.0, 1.0, 2.0], [0.0, 0.0, 0.0]]);
    }

    #[test]
    fn test_sparse_row_selection() {
        let matrix = sparse_example();
        let picked = matrix.select_items(&[1, 1, 0], ItemAxis::Rows).unwrap();
        assert_eq!(
            dense(&picked),
            array![[0.0, 3.0, 0.0], [0.0, 3.0, 0.0], [1.0, 0.0, 2.0]]
        );
    }

    #[test]
    fn test_draw_with_replacement() {
        let mut rng = Pcg32::new(3, 0);
        let chosen = draw_with_replacement(&mut rng, 50).unwrap();
        assert_eq!(chosen.len(), 50);
        assert!(chosen.iter().all(|&i| i < 50));

        let mut again = Pcg32::new(3, 0);
        assert_eq!(draw_with_replacement(&mut again, 50).unwrap(), chosen);
    }
}
