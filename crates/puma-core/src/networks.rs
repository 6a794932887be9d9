// ─────────────────────────────────────────────────────────────────────
// PUMA Kernel - Input Network Construction
// ─────────────────────────────────────────────────────────────────────
//! Dense input matrices built from already-parsed data:
//!   - co-expression: Pearson correlation between gene rows
//!   - motif prior: (TF, gene, weight) triples → TFs × genes
//!   - PPI: (TF, TF, weight) triples → symmetric TFs × TFs on identity

use std::collections::{BTreeSet, HashMap};

use puma_types::{PumaError, PumaResult};

use crate::matrix::Matrix;

/// Pearson correlation between the rows of a genes × samples matrix.
///
/// Constant rows give undefined correlations. If any appear, the
/// diagonal is set to 1 and every remaining NaN to 0.
pub fn coexpression(expression: &Matrix) -> PumaResult<Matrix> {
    let (genes, samples) = expression.shape();
    if genes == 0 || samples == 0 {
        return Err(PumaError::Empty(format!(
            "expression matrix is {genes}x{samples}"
        )));
    }

    let centered: Vec<Vec<f64>> = (0..genes)
        .map(|g| {
            let row = expression.row(g);
            let mean = row.iter().sum::<f64>() / samples as f64;
            row.iter().map(|v| v - mean).collect()
        })
        .collect();
    let norms: Vec<f64> = centered
        .iter()
        .map(|r| r.iter().map(|v| v * v).sum::<f64>().sqrt())
        .collect();

    let mut corr = Matrix::zeros(genes, genes);
    for i in 0..genes {
        for j in i..genes {
            let cov: f64 = centered[i].iter().zip(&centered[j]).map(|(a, b)| a * b).sum();
            let r = (cov / (norms[i] * norms[j])).clamp(-1.0, 1.0);
            corr.set(i, j, r);
            corr.set(j, i, r);
        }
    }

    let undefined = corr.count_nan();
    if undefined > 0 {
        log::warn!("coexpression: {undefined} undefined correlation(s) from constant genes, zeroed");
        corr.fill_diagonal(&vec![1.0; genes]);
        for v in corr.as_mut_slice() {
            if v.is_nan() {
                *v = 0.0;
            }
        }
    }
    Ok(corr)
}

/// Motif prior from (TF, gene, weight) triples.
///
/// The TF axis is the sorted set of TFs named in `edges`; the gene axis
/// is `genes` as given. A repeated pair keeps the last weight.
pub fn motif_prior<S: AsRef<str>, G: AsRef<str>>(
    edges: &[(S, S, f64)],
    genes: &[G],
) -> PumaResult<(Vec<String>, Matrix)> {
    if edges.is_empty() {
        return Err(PumaError::Empty("motif edge list".into()));
    }
    let tfs: Vec<String> = edges
        .iter()
        .map(|(tf, _, _)| tf.as_ref().to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let tf_idx = label_index(&tfs);
    let gene_idx = label_index(genes);

    let mut motif = Matrix::zeros(tfs.len(), genes.len());
    for (tf, gene, weight) in edges {
        let g = *gene_idx
            .get(gene.as_ref())
            .ok_or_else(|| PumaError::UnknownLabel(format!("gene {}", gene.as_ref())))?;
        motif.set(tf_idx[tf.as_ref()], g, *weight);
    }
    Ok((tfs, motif))
}

/// PPI network on the TF axis: identity plus each edge in both directions.
pub fn ppi_network<T: AsRef<str>, S: AsRef<str>>(
    tfs: &[T],
    edges: &[(S, S, f64)],
) -> PumaResult<Matrix> {
    let tf_idx = label_index(tfs);
    let lookup = |name: &str| {
        tf_idx
            .get(name)
            .copied()
            .ok_or_else(|| PumaError::UnknownLabel(format!("TF {name}")))
    };

    let mut ppi = Matrix::identity(tfs.len());
    for (a, b, weight) in edges {
        let i = lookup(a.as_ref())?;
        let j = lookup(b.as_ref())?;
        ppi.set(i, j, *weight);
        ppi.set(j, i, *weight);
    }
    Ok(ppi)
}

fn label_index<S: AsRef<str>>(labels: &[S]) -> HashMap<&str, usize> {
    labels
        .iter()
        .enumerate()
        .map(|(i, l)| (l.as_ref(), i))
        .collect()
}
