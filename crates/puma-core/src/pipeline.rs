// ─────────────────────────────────────────────────────────────────────
// PUMA Kernel - Network Pipeline
// ─────────────────────────────────────────────────────────────────────
//! End-to-end run: build inputs, normalize, iterate, and keep the
//! labels needed to expand the result when `retain_metadata` is set.

use puma_types::{PumaConfig, PumaError, PumaOutcome, PumaResult, RegulatoryEdge};

use crate::constraint::resolve_constraint_indices;
use crate::engine::PumaEngine;
use crate::expand::expand_results;
use crate::matrix::Matrix;
use crate::networks::{coexpression, motif_prior, ppi_network};

/// Labels and unnormalized prior kept for result expansion.
#[derive(Debug, Clone)]
pub struct NetworkMetadata {
    pub tfs: Vec<String>,
    pub genes: Vec<String>,
    pub motif_prior: Matrix,
}

/// A configured run over one set of input networks.
pub struct PumaNetwork {
    engine: PumaEngine,
    metadata: Option<NetworkMetadata>,
}

impl PumaNetwork {
    /// Build from dense unnormalized matrices and their axis labels.
    ///
    /// `tfs` labels the motif rows and PPI axes, `genes` the motif
    /// columns and correlation axes. `mirnas` are matched against `tfs`;
    /// unmatched ids are ignored.
    pub fn from_matrices(
        correlation: &Matrix,
        motif: &Matrix,
        ppi: &Matrix,
        tfs: Vec<String>,
        genes: Vec<String>,
        mirnas: &[String],
        config: PumaConfig,
    ) -> PumaResult<Self> {
        if tfs.len() != motif.rows() || genes.len() != motif.cols() {
            return Err(PumaError::Shape(format!(
                "{} TF and {} gene labels for a {:?} motif matrix",
                tfs.len(),
                genes.len(),
                motif.shape()
            )));
        }
        let constraint = resolve_constraint_indices(&tfs, mirnas);
        let engine = PumaEngine::from_raw(correlation, motif, ppi, constraint, config)?;

        let metadata = if engine.config().retain_metadata {
            Some(NetworkMetadata {
                tfs,
                genes,
                motif_prior: motif.clone(),
            })
        } else {
            log::info!("Dropping TF/gene labels and motif prior; expansion disabled");
            None
        };
        Ok(Self { engine, metadata })
    }

    /// Build from an expression matrix (genes × samples, rows labelled by
    /// `genes`), motif triples, PPI triples and miRNA ids.
    pub fn from_edges(
        expression: &Matrix,
        genes: Vec<String>,
        motif_edges: &[(String, String, f64)],
        ppi_edges: &[(String, String, f64)],
        mirnas: &[String],
        config: PumaConfig,
    ) -> PumaResult<Self> {
        if expression.rows() != genes.len() {
            return Err(PumaError::Shape(format!(
                "expression has {} rows, {} gene labels",
                expression.rows(),
                genes.len()
            )));
        }
        let correlation = coexpression(expression)?;
        let (tfs, motif) = motif_prior(motif_edges, &genes)?;
        let ppi = ppi_network(&tfs, ppi_edges)?;
        log::info!(
            "Built networks: {} genes, {} TFs, {} motif edges, {} PPI edges",
            genes.len(),
            tfs.len(),
            motif_edges.len(),
            ppi_edges.len()
        );
        Self::from_matrices(&correlation, &motif, &ppi, tfs, genes, mirnas, config)
    }

    pub fn engine(&self) -> &PumaEngine {
        &self.engine
    }

    pub fn metadata(&self) -> Option<&NetworkMetadata> {
        self.metadata.as_ref()
    }

    /// Run the loop to completion and return the summary.
    pub fn run(&mut self) -> PumaResult<PumaOutcome> {
        if self.engine.status().is_none() {
            self.engine.run()?;
        }
        self.engine
            .outcome()
            .ok_or_else(|| PumaError::Numerical("loop ended without a status".into()))
    }

    /// Expanded (TF, gene, prior, posterior) table for the current motif
    /// estimate.
    pub fn expanded(&self) -> PumaResult<Vec<RegulatoryEdge>> {
        let meta = self.metadata.as_ref().ok_or_else(|| {
            PumaError::MissingMetadata("run with retain_metadata = true to expand results".into())
        })?;
        expand_results(&meta.tfs, &meta.genes, &meta.motif_prior, self.engine.motif())
    }
}
