// ─────────────────────────────────────────────────────────────────────
// PUMA Kernel - Error Hierarchy
// ─────────────────────────────────────────────────────────────────────

use thiserror::Error;

/// Root error type for all PUMA kernel failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PumaError {
    /// Matrix axes disagree across inputs or with an operation's contract.
    #[error("shape mismatch: {0}")]
    Shape(String),

    /// An input matrix or label list has no entries.
    #[error("empty input: {0}")]
    Empty(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// Numerical error (NaN/Inf in the convergence statistic).
    #[error("numerical error: {0}")]
    Numerical(String),

    /// Result expansion requested after metadata was dropped.
    #[error("metadata not retained: {0}")]
    MissingMetadata(String),

    /// Edge list references a TF or gene that is not on the axis.
    #[error("unknown label: {0}")]
    UnknownLabel(String),
}

pub type PumaResult<T> = Result<T, PumaError>;
