// ─────────────────────────────────────────────────────────────────────
// PUMA Kernel - miRNA Constraint Mask
// ─────────────────────────────────────────────────────────────────────
//! TFs with a microRNA correspondence keep their pre-loop PPI rows and
//! columns for the whole run. Only their diagonal follows the loop.

use puma_types::{PumaError, PumaResult};

use crate::matrix::Matrix;

/// Positions of `mirnas` on the TF axis.
///
/// Lookup goes through a sorted view of `tfs`, so the axis order does
/// not matter. Names with no match are skipped. The result is sorted
/// and free of duplicates.
pub fn resolve_constraint_indices<S: AsRef<str>, T: AsRef<str>>(tfs: &[S], mirnas: &[T]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..tfs.len()).collect();
    order.sort_by(|&a, &b| tfs[a].as_ref().cmp(tfs[b].as_ref()));

    let mut hits: Vec<usize> = mirnas
        .iter()
        .filter_map(|name| {
            order
                .binary_search_by(|&idx| tfs[idx].as_ref().cmp(name.as_ref()))
                .ok()
                .map(|pos| order[pos])
        })
        .collect();
    hits.sort_unstable();
    hits.dedup();

    let misses = mirnas.len().saturating_sub(hits.len());
    if misses > 0 {
        log::warn!("{misses} miRNA id(s) not found on the TF axis (or duplicated), skipped");
    }
    hits
}

/// Pins the rows and columns of a fixed TF subset to a snapshot of the
/// initial PPI matrix.
#[derive(Debug, Clone)]
pub struct ConstraintMask {
    indices: Vec<usize>,
    pinned: Matrix,
}

impl ConstraintMask {
    /// `initial_ppi` is the normalized PPI matrix before the first
    /// iteration. Every index must lie on its axis.
    pub fn new(indices: Vec<usize>, initial_ppi: &Matrix) -> PumaResult<Self> {
        if !initial_ppi.is_square() {
            return Err(PumaError::Shape(format!(
                "PPI matrix must be square, got {:?}",
                initial_ppi.shape()
            )));
        }
        let n = initial_ppi.rows();
        if let Some(&bad) = indices.iter().find(|&&i| i >= n) {
            return Err(PumaError::Shape(format!(
                "constraint index {bad} out of range for {n} TFs"
            )));
        }
        Ok(Self {
            indices,
            pinned: initial_ppi.clone(),
        })
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Overwrite constrained rows and columns of `ppi` with the snapshot,
    /// keeping `ppi`'s own diagonal.
    pub fn apply(&self, ppi: &mut Matrix) -> PumaResult<()> {
        if ppi.shape() != self.pinned.shape() {
            return Err(PumaError::Shape(format!(
                "PPI shape {:?} differs from pinned snapshot {:?}",
                ppi.shape(),
                self.pinned.shape()
            )));
        }
        if self.indices.is_empty() {
            return Ok(());
        }

        let diag = ppi.diagonal();
        let n = ppi.rows();
        for &k in &self.indices {
            for j in 0..n {
                ppi.set(k, j, self.pinned.get(k, j));
                ppi.set(j, k, self.pinned.get(j, k));
            }
        }
        ppi.fill_diagonal(&diag);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ppi_init() -> Matrix {
        Matrix::from_rows(&[
            vec![1.0, 0.2, 0.3],
            vec![0.2, 1.0, 0.4],
            vec![0.3, 0.4, 1.0],
        ])
        .unwrap()
    }

    fn ppi_moved() -> Matrix {
        Matrix::from_rows(&[
            vec![5.0, 0.9, 0.8],
            vec![0.9, 6.0, 0.7],
            vec![0.8, 0.7, 7.0],
        ])
        .unwrap()
    }

    #[test]
    fn test_resolve_hits_and_misses() {
        let tfs = ["AHR", "ARNT", "MYC", "TP53"];
        let mirnas = ["TP53", "NOPE", "AHR"];
        assert_eq!(resolve_constraint_indices(&tfs, &mirnas), vec![0, 3]);
    }

    #[test]
    fn test_resolve_unsorted_axis() {
        let tfs = ["MYC", "AHR", "TP53"];
        let mirnas = ["AHR", "TP53"];
        assert_eq!(resolve_constraint_indices(&tfs, &mirnas), vec![1, 2]);
    }

    #[test]
    fn test_resolve_empty() {
        let tfs: [&str; 0] = [];
        assert!(resolve_constraint_indices(&tfs, &["X"]).is_empty());
    }

    #[test]
    fn test_apply_pins_rows_and_cols_keeps_diagonal() {
        let mask = ConstraintMask::new(vec![1], &ppi_init()).unwrap();
        let mut ppi = ppi_moved();
        mask.apply(&mut ppi).unwrap();
        assert_eq!(ppi.get(1, 0), 0.2);
        assert_eq!(ppi.get(0, 1), 0.2);
        assert_eq!(ppi.get(1, 2), 0.4);
        assert_eq!(ppi.get(2, 1), 0.4);
        // Diagonal follows the loop
        assert_eq!(ppi.get(1, 1), 6.0);
        // Unconstrained pair untouched
        assert_eq!(ppi.get(0, 2), 0.8);
        assert_eq!(ppi.max_asymmetry(), 0.0);
    }

    #[test]
    fn test_apply_is_idempotent() {
        let mask = ConstraintMask::new(vec![0, 2], &ppi_init()).unwrap();
        let mut once = ppi_moved();
        mask.apply(&mut once).unwrap();
        let mut twice = once.clone();
        mask.apply(&mut twice).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_empty_mask_noop() {
        let mask = ConstraintMask::new(Vec::new(), &ppi_init()).unwrap();
        let mut ppi = ppi_moved();
        mask.apply(&mut ppi).unwrap();
        assert_eq!(ppi, ppi_moved());
    }

    #[test]
    fn test_out_of_range_index() {
        assert!(matches!(
            ConstraintMask::new(vec![3], &ppi_init()),
            Err(PumaError::Shape(_))
        ));
    }
}
