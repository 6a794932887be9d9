// ─────────────────────────────────────────────────────────────────────
// PUMA Kernel - Convergence Loop
// ─────────────────────────────────────────────────────────────────────
//! Message-passing loop over the three normalized networks.
//!
//! One iteration:
//!   1. W = ½·(T(PPI, Motif) + T(Motif, Corr))
//!   2. hamming = mean |Motif − W|
//!   3. Motif ← (1−α)·Motif + α·W
//!   4. if hamming > threshold:
//!        PPI  ← (1−α)·PPI  + α·stab(T(Motif),  genes)   then miRNA mask
//!        Corr ← (1−α)·Corr + α·stab(T(Motifᵗ), TFs)
//!   5. step += 1
//!
//! The loop stops on the first iteration with hamming ≤ threshold; that
//! iteration updates Motif only.

use std::time::Instant;

use puma_types::{
    ConvergenceStatus, PumaConfig, PumaError, PumaOutcome, PumaResult, StepRecord,
};

use crate::affinity::{t_pair, t_single};
use crate::constraint::ConstraintMask;
use crate::diagonal::stabilize_diagonal;
use crate::matrix::Matrix;
use crate::normalize::normalize_network;

/// Mutable state threaded through the loop.
#[derive(Debug, Clone)]
pub struct LoopState {
    /// TFs × genes.
    pub motif: Matrix,
    /// TFs × TFs, symmetric.
    pub ppi: Matrix,
    /// genes × genes, symmetric.
    pub correlation: Matrix,
    pub step: usize,
}

impl LoopState {
    pub fn tf_count(&self) -> usize {
        self.motif.rows()
    }

    pub fn gene_count(&self) -> usize {
        self.motif.cols()
    }
}

/// Check that correlation is genes × genes, motif TFs × genes and PPI
/// TFs × TFs, none of them empty.
pub fn validate_shapes(correlation: &Matrix, motif: &Matrix, ppi: &Matrix) -> PumaResult<()> {
    let (tfs, genes) = motif.shape();
    if tfs == 0 || genes == 0 {
        return Err(PumaError::Empty(format!("motif matrix is {tfs}x{genes}")));
    }
    if correlation.shape() != (genes, genes) {
        return Err(PumaError::Shape(format!(
            "correlation is {:?}, expected {genes}x{genes} to match motif genes",
            correlation.shape()
        )));
    }
    if ppi.shape() != (tfs, tfs) {
        return Err(PumaError::Shape(format!(
            "PPI is {:?}, expected {tfs}x{tfs} to match motif TFs",
            ppi.shape()
        )));
    }
    Ok(())
}

/// Run one iteration on `state`. Returns the iteration's hamming record.
///
/// Secondary updates (PPI, correlation) are skipped once hamming is at
/// or below `threshold`.
pub fn iterate(
    state: &mut LoopState,
    mask: &ConstraintMask,
    alpha: f64,
    threshold: f64,
) -> PumaResult<StepRecord> {
    let tf_count = state.tf_count();
    let gene_count = state.gene_count();

    let responsibility = t_pair(&state.ppi, &state.motif)?;
    let availability = t_pair(&state.motif, &state.correlation)?;
    let w = Matrix::from_fn(tf_count, gene_count, |i, j| {
        0.5 * (responsibility.get(i, j) + availability.get(i, j))
    });

    let hamming = state.motif.mean_abs_diff(&w)?;
    state.motif.blend(&w, alpha)?;

    if hamming > threshold {
        let mut ppi_update = t_single(&state.motif);
        stabilize_diagonal(&mut ppi_update, gene_count, alpha, state.step)?;
        state.ppi.blend(&ppi_update, alpha)?;
        mask.apply(&mut state.ppi)?;

        let mut corr_update = t_single(&state.motif.transpose());
        stabilize_diagonal(&mut corr_update, tf_count, alpha, state.step)?;
        state.correlation.blend(&corr_update, alpha)?;
    }

    let record = StepRecord {
        step: state.step,
        hamming,
    };
    state.step += 1;
    Ok(record)
}

/// Convergence loop driver.
pub struct PumaEngine {
    cfg: PumaConfig,
    state: LoopState,
    mask: ConstraintMask,
    trace: Vec<StepRecord>,
    last_hamming: f64,
    status: Option<ConvergenceStatus>,
    /// Set once an iteration produced a non-finite hamming; the state
    /// is partly updated from then on and the loop refuses to advance.
    failure: Option<PumaError>,
}

impl PumaEngine {
    /// Build from already-normalized matrices.
    ///
    /// `constraint` holds TF positions whose PPI rows/columns stay pinned
    /// to `ppi` as given here.
    pub fn new(
        correlation: Matrix,
        motif: Matrix,
        ppi: Matrix,
        constraint: Vec<usize>,
        config: PumaConfig,
    ) -> PumaResult<Self> {
        config.validate()?;
        validate_shapes(&correlation, &motif, &ppi)?;
        let mask = ConstraintMask::new(constraint, &ppi)?;

        Ok(Self {
            cfg: config,
            state: LoopState {
                motif,
                ppi,
                correlation,
                step: 0,
            },
            mask,
            trace: Vec::new(),
            last_hamming: f64::INFINITY,
            status: None,
            failure: None,
        })
    }

    /// Validate shapes, normalize all three networks, then build.
    pub fn from_raw(
        correlation: &Matrix,
        motif: &Matrix,
        ppi: &Matrix,
        constraint: Vec<usize>,
        config: PumaConfig,
    ) -> PumaResult<Self> {
        validate_shapes(correlation, motif, ppi)?;
        let started = Instant::now();
        let correlation = normalize_network(correlation);
        let motif = normalize_network(motif);
        let ppi = normalize_network(ppi);
        log::info!(
            "Normalized networks ({} TFs, {} genes) in {:.2?}",
            motif.rows(),
            motif.cols(),
            started.elapsed()
        );
        Self::new(correlation, motif, ppi, constraint, config)
    }

    pub fn config(&self) -> &PumaConfig {
        &self.cfg
    }

    pub fn state(&self) -> &LoopState {
        &self.state
    }

    pub fn motif(&self) -> &Matrix {
        &self.state.motif
    }

    pub fn constraint_indices(&self) -> &[usize] {
        self.mask.indices()
    }

    pub fn step_count(&self) -> usize {
        self.state.step
    }

    pub fn trace(&self) -> &[StepRecord] {
        &self.trace
    }

    /// `None` while the loop can still advance.
    pub fn status(&self) -> Option<ConvergenceStatus> {
        self.status
    }

    /// Hamming of the most recent iteration, infinite before the first.
    pub fn last_hamming(&self) -> f64 {
        self.last_hamming
    }

    /// Summary of a finished run. `None` while the loop can still advance.
    pub fn outcome(&self) -> Option<PumaOutcome> {
        let status = self.status?;
        Some(PumaOutcome {
            tf_count: self.state.tf_count(),
            gene_count: self.state.gene_count(),
            motif: self.state.motif.as_slice().to_vec(),
            status,
            steps: self.state.step,
            final_hamming: self.last_hamming,
            trace: self.trace.clone(),
        })
    }

    /// Advance one iteration.
    ///
    /// Returns `Ok(None)` when the loop has already finished, and the
    /// original error again after a numerical failure.
    pub fn step(&mut self) -> PumaResult<Option<StepRecord>> {
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        if self.status.is_some() {
            return Ok(None);
        }

        let record = iterate(
            &mut self.state,
            &self.mask,
            self.cfg.alpha,
            self.cfg.threshold,
        )?;
        log::debug!("step: {}, hamming: {}", record.step, record.hamming);

        if !record.hamming.is_finite() {
            let err = PumaError::Numerical(format!(
                "hamming is {} at step {}",
                record.hamming, record.step
            ));
            log::warn!("PUMA loop aborted: {err}");
            self.failure = Some(err.clone());
            return Err(err);
        }

        self.last_hamming = record.hamming;
        if self.cfg.record_trace {
            self.trace.push(record);
        }

        if record.hamming <= self.cfg.threshold {
            self.status = Some(ConvergenceStatus::Converged);
        } else if self.state.step >= self.cfg.max_iterations {
            log::warn!(
                "Iteration cap {} reached with hamming {:.6} > {}",
                self.cfg.max_iterations,
                record.hamming,
                self.cfg.threshold
            );
            self.status = Some(ConvergenceStatus::IterationCapReached);
        }
        Ok(Some(record))
    }

    /// Iterate until convergence or the iteration cap.
    pub fn run(&mut self) -> PumaResult<ConvergenceStatus> {
        let started = Instant::now();
        log::info!(
            "Running PUMA loop: {} TFs, {} genes, {} constrained TFs",
            self.state.tf_count(),
            self.state.gene_count(),
            self.mask.indices().len()
        );

        while self.step()?.is_some() {}

        let status = self
            .status
            .unwrap_or(ConvergenceStatus::IterationCapReached);
        log::info!(
            "PUMA loop finished ({status:?}) after {} steps in {:.2?}",
            self.state.step,
            started.elapsed()
        );
        Ok(status)
    }

    /// Consume the engine into its run summary. Runs the loop first if
    /// it has not finished.
    pub fn into_outcome(mut self) -> PumaResult<PumaOutcome> {
        let status = match self.status {
            Some(status) => status,
            None => self.run()?,
        };
        Ok(PumaOutcome {
            tf_count: self.state.tf_count(),
            gene_count: self.state.gene_count(),
            steps: self.state.step,
            final_hamming: self.last_hamming,
            trace: self.trace,
            motif: self.state.motif.into_vec(),
            status,
        })
    }

    /// Consume the engine and return the final loop state.
    pub fn into_state(self) -> LoopState {
        self.state
    }
}
