// ─────────────────────────────────────────────────────────────────────
// PUMA Kernel - Diagonal Stabilizer
// ─────────────────────────────────────────────────────────────────────
//! Replaces the self-affinity of a square similarity matrix with a
//! noise-scaled estimate:
//!
//!   D_ii = std(D_i,j≠i) · num · exp(2·alpha·step)
//!
//! The std is the population std of the finite off-diagonal entries.

use puma_types::{PumaError, PumaResult};

use crate::matrix::{mean_std, Matrix};

/// Overwrite the diagonal of `d` in place.
///
/// `num` is the axis length of the paired matrix, `step` the loop
/// iteration counter.
pub fn stabilize_diagonal(d: &mut Matrix, num: usize, alpha: f64, step: usize) -> PumaResult<()> {
    if !d.is_square() {
        return Err(PumaError::Shape(format!(
            "diagonal stabilizer needs a square matrix, got {:?}",
            d.shape()
        )));
    }
    let n = d.rows();
    let scale = num as f64 * (2.0 * alpha * step as f64).exp();

    let fill: Vec<f64> = (0..n)
        .map(|i| {
            let row = d.row(i);
            let off_diag = row
                .iter()
                .enumerate()
                .filter(move |(j, v)| *j != i && !v.is_nan())
                .map(|(_, &v)| v);
            mean_std(off_diag).1 * scale
        })
        .collect();

    d.fill_diagonal(&fill);
    Ok(())
}
