// ─────────────────────────────────────────────────────────────────────
// PUMA Kernel - Core Engine
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Gene regulatory network inference by message passing between three
//! networks: gene co-expression, TF → gene motif prior, and TF
//! protein-protein interaction, with a microRNA constraint mask on the
//! PPI side.
//!
//! Architecture:
//!   - Matrix: dense row-major storage
//!   - Normalizer: dual-axis z-score with degenerate-variance fallbacks
//!   - Affinity: T-function similarity (rayon-parallel over rows)
//!   - Diagonal: noise-scaled self-affinity
//!   - Constraint: miRNA-pinned PPI rows/columns
//!   - Engine: convergence loop with trace and iteration cap
//!   - Expand: (TF, gene, prior, posterior) table
//!   - Networks / Pipeline: input construction and end-to-end runs
//!
//! # Invariants
//!
//! 1. PPI and correlation matrices stay symmetric after every iteration.
//! 2. The motif matrix keeps its TFs × genes shape for the whole run.
//! 3. Shape mismatches are rejected before normalization.
//! 4. A non-finite convergence statistic aborts the run with
//!    `PumaError::Numerical`.

pub mod affinity;
pub mod constraint;
pub mod diagonal;
pub mod engine;
pub mod expand;
pub mod matrix;
pub mod networks;
pub mod normalize;
pub mod pipeline;

pub use affinity::{t_pair, t_single};
pub use constraint::{resolve_constraint_indices, ConstraintMask};
pub use diagonal::stabilize_diagonal;
pub use engine::{iterate, validate_shapes, LoopState, PumaEngine};
pub use expand::expand_results;
pub use matrix::{mean_std, Matrix};
pub use normalize::{normalize_network, CellFallback};
pub use pipeline::{NetworkMetadata, PumaNetwork};
