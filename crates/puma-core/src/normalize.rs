// ─────────────────────────────────────────────────────────────────────
// PUMA Kernel - Network Normalizer
// ─────────────────────────────────────────────────────────────────────
//! Dual-axis z-score normalization applied to every input network
//! before the convergence loop.
//!
//!   N = (colZ + rowZ) / √2
//!
//! with per-cell fallbacks where a row or column has zero variance:
//!   colZ undefined → (rowZ + totalZ) / √2
//!   rowZ undefined → (colZ + totalZ) / √2
//!   both undefined → 2·colZ / √2  (stays NaN)
//!
//! All standard deviations are population (ddof = 0).

use std::f64::consts::SQRT_2;

use crate::matrix::{mean_std, Matrix};

/// Which z-score components are undefined at each cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellFallback {
    /// Both components defined.
    Base,
    /// Column z-score undefined; row and total are used.
    ColumnDegenerate,
    /// Row z-score undefined; column and total are used.
    RowDegenerate,
    /// Neither defined. The result is NaN.
    BothDegenerate,
}

impl CellFallback {
    #[inline]
    pub fn classify(col_z: f64, row_z: f64) -> Self {
        match (col_z.is_nan(), row_z.is_nan()) {
            (false, false) => CellFallback::Base,
            (true, false) => CellFallback::ColumnDegenerate,
            (false, true) => CellFallback::RowDegenerate,
            (true, true) => CellFallback::BothDegenerate,
        }
    }

    #[inline]
    pub fn combine(self, col_z: f64, row_z: f64, total_z: f64) -> f64 {
        match self {
            CellFallback::Base => (col_z + row_z) / SQRT_2,
            CellFallback::ColumnDegenerate => (row_z + total_z) / SQRT_2,
            CellFallback::RowDegenerate => (col_z + total_z) / SQRT_2,
            // colZ is NaN here, so this cell stays undefined.
            CellFallback::BothDegenerate => 2.0 * col_z / SQRT_2,
        }
    }
}

/// Z-score of every column against its own mean and std.
pub fn zscore_columns(x: &Matrix) -> Matrix {
    let (rows, cols) = x.shape();
    let mut out = Matrix::zeros(rows, cols);
    for j in 0..cols {
        let (mean, std) = mean_std((0..rows).map(|i| x.get(i, j)));
        for i in 0..rows {
            out.set(i, j, (x.get(i, j) - mean) / std);
        }
    }
    out
}

/// Z-score of every row against its own mean and std.
pub fn zscore_rows(x: &Matrix) -> Matrix {
    let (rows, cols) = x.shape();
    let mut out = Matrix::zeros(rows, cols);
    for i in 0..rows {
        let (mean, std) = mean_std(x.row(i).iter().copied());
        for j in 0..cols {
            out.set(i, j, (x.get(i, j) - mean) / std);
        }
    }
    out
}

/// Z-score of every cell against the global mean and std.
pub fn zscore_total(x: &Matrix) -> Matrix {
    let (mean, std) = mean_std(x.as_slice().iter().copied());
    x.map(|v| (v - mean) / std)
}

/// Per-cell fallback mask, computed once from the two axis z-scores.
pub fn fallback_mask(col_z: &Matrix, row_z: &Matrix) -> Vec<CellFallback> {
    col_z
        .as_slice()
        .iter()
        .zip(row_z.as_slice())
        .map(|(&c, &r)| CellFallback::classify(c, r))
        .collect()
}

/// Normalize a network matrix of any shape.
///
/// Never fails. Cells whose row and column are both constant come
/// back NaN; callers treat those as failure markers.
pub fn normalize_network(x: &Matrix) -> Matrix {
    let col_z = zscore_columns(x);
    let row_z = if x.is_square() {
        col_z.transpose()
    } else {
        zscore_rows(x)
    };
    let total_z = zscore_total(x);
    let mask = fallback_mask(&col_z, &row_z);

    let (rows, cols) = x.shape();
    let out = Matrix::from_fn(rows, cols, |i, j| {
        mask[i * cols + j].combine(col_z.get(i, j), row_z.get(i, j), total_z.get(i, j))
    });

    let unresolved = mask
        .iter()
        .filter(|m| **m == CellFallback::BothDegenerate)
        .count();
    if unresolved > 0 {
        log::warn!(
            "normalize_network: {unresolved} cell(s) of a {}x{} matrix have constant row and column, left as NaN",
            rows,
            cols
        );
    }

    out
}
