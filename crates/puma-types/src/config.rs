// ─────────────────────────────────────────────────────────────────────
// PUMA Kernel - Configuration
// ─────────────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};

use crate::error::{PumaError, PumaResult};

/// Upper bound on the diagonal growth exponent `2·alpha·step` reached
/// within `max_iterations`. Past roughly 354 the squared diagonal in the
/// T-function overflows f64.
pub const MAX_DIAGONAL_GROWTH: f64 = 300.0;

/// Runtime configuration for the convergence loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PumaConfig {
    /// Blend weight between the running estimate and the new one.
    /// Default: 0.1.
    pub alpha: f64,

    /// Mean absolute motif change at or below which the loop stops.
    /// Default: 0.001.
    pub threshold: f64,

    /// Safety cap on loop iterations. Reaching it is reported through
    /// `ConvergenceStatus::IterationCapReached`, not as an error.
    /// Bounded by `2·alpha·max_iterations <= MAX_DIAGONAL_GROWTH`.
    /// Default: 1_000.
    pub max_iterations: usize,

    /// Keep TF/gene names and the unnormalized motif prior so the
    /// expanded (TF, gene, prior, posterior) table can be produced.
    /// Default: true.
    pub retain_metadata: bool,

    /// Collect one `StepRecord` per iteration.
    /// Default: true.
    pub record_trace: bool,
}

impl Default for PumaConfig {
    fn default() -> Self {
        Self {
            alpha: 0.1,
            threshold: 0.001,
            max_iterations: 1_000,
            retain_metadata: true,
            record_trace: true,
        }
    }
}

impl PumaConfig {
    /// Validate configuration parameters.
    pub fn validate(&self) -> PumaResult<()> {
        if !(self.alpha > 0.0 && self.alpha <= 1.0) {
            return Err(PumaError::Config(format!(
                "alpha must be in (0, 1], got {}",
                self.alpha
            )));
        }
        if !self.threshold.is_finite() || self.threshold <= 0.0 {
            return Err(PumaError::Config(format!(
                "threshold must be finite and > 0, got {}",
                self.threshold
            )));
        }
        if self.max_iterations == 0 {
            return Err(PumaError::Config(
                "max_iterations must be >= 1".to_string(),
            ));
        }
        let growth = 2.0 * self.alpha * self.max_iterations as f64;
        if growth > MAX_DIAGONAL_GROWTH {
            return Err(PumaError::Config(format!(
                "2·alpha·max_iterations = {growth} exceeds {MAX_DIAGONAL_GROWTH}; \
                 the stabilized diagonal would overflow before the cap"
            )));
        }
        Ok(())
    }

    /// Load from JSON string. Missing fields take their defaults.
    pub fn from_json(json: &str) -> PumaResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| PumaError::Config(format!("JSON parse error: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let cfg = PumaConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.alpha, 0.1);
        assert_eq!(cfg.threshold, 0.001);
        assert_eq!(cfg.max_iterations, 1_000);
    }

    #[test]
    fn test_alpha_out_of_range() {
        let cfg = PumaConfig {
            alpha: 0.0,
            ..PumaConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(PumaError::Config(_))));

        let cfg = PumaConfig {
            alpha: 1.5,
            ..PumaConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_nan_threshold_rejected() {
        let cfg = PumaConfig {
            threshold: f64::NAN,
            ..PumaConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_zero_cap_rejected() {
        let cfg = PumaConfig {
            max_iterations: 0,
            ..PumaConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_cap_bounded_by_diagonal_growth() {
        let cfg = PumaConfig {
            max_iterations: 10_000,
            ..PumaConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(PumaError::Config(_))));

        let cfg = PumaConfig {
            alpha: 1.0,
            max_iterations: 150,
            ..PumaConfig::default()
        };
        assert!(cfg.validate().is_ok());

        let cfg = PumaConfig {
            alpha: 1.0,
            max_iterations: 151,
            ..PumaConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_from_json_partial() {
        let cfg = PumaConfig::from_json(r#"{"max_iterations": 50, "retain_metadata": false}"#)
            .unwrap();
        assert_eq!(cfg.max_iterations, 50);
        assert!(!cfg.retain_metadata);
        assert_eq!(cfg.alpha, 0.1);
    }

    #[test]
    fn test_from_json_invalid() {
        assert!(matches!(
            PumaConfig::from_json("{not json"),
            Err(PumaError::Config(_))
        ));
    }
}
