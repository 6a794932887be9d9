// ─────────────────────────────────────────────────────────────────────
// PUMA Kernel - Result Expander
// ─────────────────────────────────────────────────────────────────────
//! Flattens the TFs × genes prior and posterior into one row per pair.
//!
//! Row order follows a column-major walk of the grid: all TFs for gene 0,
//! then all TFs for gene 1, and so on. Row `k` is (tf = k % tfs,
//! gene = k / tfs).

use puma_types::{PumaError, PumaResult, RegulatoryEdge};

use crate::matrix::Matrix;

pub fn expand_results<T: AsRef<str>, G: AsRef<str>>(
    tfs: &[T],
    genes: &[G],
    prior: &Matrix,
    posterior: &Matrix,
) -> PumaResult<Vec<RegulatoryEdge>> {
    let shape = (tfs.len(), genes.len());
    if prior.shape() != shape || posterior.shape() != shape {
        return Err(PumaError::Shape(format!(
            "labels are {}x{}, prior {:?}, posterior {:?}",
            shape.0,
            shape.1,
            prior.shape(),
            posterior.shape()
        )));
    }

    let mut rows = Vec::with_capacity(shape.0 * shape.1);
    for (g, gene) in genes.iter().enumerate() {
        for (t, tf) in tfs.iter().enumerate() {
            rows.push(RegulatoryEdge {
                tf: tf.as_ref().to_string(),
                gene: gene.as_ref().to_string(),
                prior: prior.get(t, g),
                posterior: posterior.get(t, g),
            });
        }
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_major_order() {
        let tfs = ["A", "B"];
        let genes = ["g1", "g2", "g3"];
        let prior = Matrix::from_rows(&[vec![1.0, 0.0, 1.0], vec![0.0, 1.0, 0.0]]).unwrap();
        let post = Matrix::from_rows(&[vec![0.1, 0.2, 0.3], vec![0.4, 0.5, 0.6]]).unwrap();
        let rows = expand_results(&tfs, &genes, &prior, &post).unwrap();

        assert_eq!(rows.len(), 6);
        let labels: Vec<(&str, &str)> = rows
            .iter()
            .map(|r| (r.tf.as_str(), r.gene.as_str()))
            .collect();
        assert_eq!(
            labels,
            vec![
                ("A", "g1"),
                ("B", "g1"),
                ("A", "g2"),
                ("B", "g2"),
                ("A", "g3"),
                ("B", "g3"),
            ]
        );
        assert_eq!(rows[3].prior, 1.0);
        assert_eq!(rows[3].posterior, 0.5);
        assert_eq!(rows[4].posterior, 0.3);
    }

    #[test]
    fn test_label_shape_mismatch() {
        let tfs = ["A"];
        let genes = ["g1", "g2"];
        let m = Matrix::zeros(2, 2);
        assert!(matches!(
            expand_results(&tfs, &genes, &m, &m),
            Err(PumaError::Shape(_))
        ));
    }
}
