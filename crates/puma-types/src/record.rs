// ─────────────────────────────────────────────────────────────────────
// PUMA Kernel - Trace and Result Records
// ─────────────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};

/// Convergence statistic for one loop iteration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    pub step: usize,
    /// Mean absolute difference between the motif estimate and W.
    pub hamming: f64,
}

/// How the convergence loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConvergenceStatus {
    /// Hamming fell to or below the threshold.
    Converged,
    /// `max_iterations` ran out first; the motif matrix is the last estimate.
    IterationCapReached,
}

impl ConvergenceStatus {
    pub fn is_converged(self) -> bool {
        matches!(self, ConvergenceStatus::Converged)
    }
}

/// Summary of a finished run.
///
/// `motif` is the TFs × genes posterior, row-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PumaOutcome {
    pub tf_count: usize,
    pub gene_count: usize,
    pub motif: Vec<f64>,
    pub status: ConvergenceStatus,
    /// Number of iterations executed.
    pub steps: usize,
    pub final_hamming: f64,
    pub trace: Vec<StepRecord>,
}

impl PumaOutcome {
    pub fn converged(&self) -> bool {
        self.status.is_converged()
    }

    /// Posterior weight for (tf, gene), `None` outside the grid.
    pub fn weight(&self, tf: usize, gene: usize) -> Option<f64> {
        if tf >= self.tf_count || gene >= self.gene_count {
            return None;
        }
        self.motif.get(tf * self.gene_count + gene).copied()
    }
}

/// One row of the expanded regulatory table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegulatoryEdge {
    pub tf: String,
    pub gene: String,
    /// Unnormalized motif prior weight.
    pub prior: f64,
    /// Converged motif weight.
    pub posterior: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_flag() {
        assert!(ConvergenceStatus::Converged.is_converged());
        assert!(!ConvergenceStatus::IterationCapReached.is_converged());
    }

    #[test]
    fn test_outcome_weight_row_major() {
        let outcome = PumaOutcome {
            tf_count: 2,
            gene_count: 3,
            motif: vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0],
            status: ConvergenceStatus::Converged,
            steps: 1,
            final_hamming: 0.0,
            trace: Vec::new(),
        };
        assert_eq!(outcome.weight(1, 0), Some(3.0));
        assert_eq!(outcome.weight(0, 2), Some(2.0));
        assert_eq!(outcome.weight(2, 0), None);
        // (0, 3) would alias (1, 0) without the column check
        assert_eq!(outcome.weight(0, 3), None);
    }

    #[test]
    fn test_edge_serializes() {
        let edge = RegulatoryEdge {
            tf: "AHR".into(),
            gene: "CYP1A1".into(),
            prior: 1.0,
            posterior: 0.42,
        };
        let json = serde_json::to_string(&edge).unwrap();
        assert!(json.contains("\"tf\":\"AHR\""));
    }
}
