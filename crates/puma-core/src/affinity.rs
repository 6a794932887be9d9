// ─────────────────────────────────────────────────────────────────────
// PUMA Kernel - Affinity Transform (T-function)
// ─────────────────────────────────────────────────────────────────────
//! Cosine-like normalized similarity used by every update step.
//!
//!   single:  A = X·Xᵗ,  A_ij /= sqrt(s_i + s_j − |A_ij|),   s_i = Σ_l X_il²
//!   pair:    A = X·Y,   A_ij /= sqrt(c_j + r_i − |A_ij|),   r_i = Σ_l X_il², c_j = Σ_l Y_lj²
//!
//! Both forms are data-parallel over output rows.

use rayon::prelude::*;

use puma_types::{PumaError, PumaResult};

use crate::matrix::Matrix;

#[inline]
fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Single-argument T-function: similarity between rows of `x`.
///
/// Output is p×p and exactly symmetric.
pub fn t_single(x: &Matrix) -> Matrix {
    let p = x.rows();
    let s = x.row_sum_sq();
    let mut out = Matrix::zeros(p, p);
    if p == 0 {
        return out;
    }

    out.as_mut_slice()
        .par_chunks_mut(p)
        .enumerate()
        .for_each(|(i, row_out)| {
            let xi = x.row(i);
            for (j, cell) in row_out.iter_mut().enumerate() {
                let a = dot(xi, x.row(j));
                *cell = a / (s[i] + s[j] - a.abs()).sqrt();
            }
        });
    out
}

/// Two-argument T-function: similarity between rows of `x` (p×k) and
/// columns of `y` (k×q). Output is p×q.
pub fn t_pair(x: &Matrix, y: &Matrix) -> PumaResult<Matrix> {
    let (p, k) = x.shape();
    let (k_y, q) = y.shape();
    if k != k_y {
        return Err(PumaError::Shape(format!(
            "T-function inner dimensions differ: {p}x{k} · {k_y}x{q}"
        )));
    }

    let r = x.row_sum_sq();
    let c = y.col_sum_sq();
    let mut out = Matrix::zeros(p, q);
    if q == 0 {
        return Ok(out);
    }

    out.as_mut_slice()
        .par_chunks_mut(q)
        .enumerate()
        .for_each(|(i, row_out)| {
            // i-l-j order keeps Y row access contiguous.
            for (l, &x_il) in x.row(i).iter().enumerate() {
                for (cell, &y_lj) in row_out.iter_mut().zip(y.row(l)) {
                    *cell += x_il * y_lj;
                }
            }
            for (j, cell) in row_out.iter_mut().enumerate() {
                let a = *cell;
                *cell = a / (c[j] + r[i] - a.abs()).sqrt();
            }
        });
    Ok(out)
}
