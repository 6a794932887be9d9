// ─────────────────────────────────────────────────────────────────────
// PUMA Kernel - Types
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Type definitions, configuration, and error hierarchy for the
//! PUMA kernel: message-passing integration of co-expression, motif
//! prior and TF cooperativity networks.

pub mod config;
pub mod error;
pub mod record;

pub use config::{PumaConfig, MAX_DIAGONAL_GROWTH};
pub use error::{PumaError, PumaResult};
pub use record::{ConvergenceStatus, PumaOutcome, RegulatoryEdge, StepRecord};
