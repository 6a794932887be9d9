// ─────────────────────────────────────────────────────────────────────
// PUMA Kernel - PyO3 FFI Bindings
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
// Note: #[deny(unsafe_code)] not applied. PyO3 proc macros generate
// unsafe blocks internally. All hand-written code in this crate is safe.
//! Python-callable wrappers around the PUMA kernel.
//!
//! Exposes `PumaConfig` and `RustPuma` to Python via PyO3. Matrices cross
//! the boundary as nested lists of floats (rows first).
//!
//! Install: `pip install -e crates/puma-ffi` (requires maturin).
//!
//! Usage from Python:
//! ```python
//! from puma_kernel import PumaConfig, RustPuma
//!
//! puma = RustPuma(corr, motif, ppi, tfs=tfs, genes=genes, mirnas=["MYC"])
//! result = puma.run()
//! table = puma.expanded()
//! ```

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};

use puma_core::{Matrix, PumaNetwork};
use puma_types::{PumaConfig, PumaError, PumaOutcome};

fn to_py_err(e: PumaError) -> PyErr {
    PyValueError::new_err(e.to_string())
}

fn matrix_from_lists(name: &str, rows: &[Vec<f64>]) -> PyResult<Matrix> {
    Matrix::from_rows(rows).map_err(|e| PyValueError::new_err(format!("{name}: {e}")))
}

fn default_labels(prefix: &str, n: usize) -> Vec<String> {
    (0..n).map(|i| format!("{prefix}{i}")).collect()
}

// ─── PyPumaConfig ───────────────────────────────────────────────────

/// Python-visible configuration for the convergence loop.
#[pyclass(name = "PumaConfig")]
#[derive(Clone)]
struct PyPumaConfig {
    inner: PumaConfig,
}

#[pymethods]
impl PyPumaConfig {
    #[new]
    #[pyo3(signature = (
        alpha = 0.1,
        threshold = 0.001,
        max_iterations = 1_000,
        retain_metadata = true,
        record_trace = true,
    ))]
    fn new(
        alpha: f64,
        threshold: f64,
        max_iterations: usize,
        retain_metadata: bool,
        record_trace: bool,
    ) -> PyResult<Self> {
        let config = PumaConfig {
            alpha,
            threshold,
            max_iterations,
            retain_metadata,
            record_trace,
        };
        config.validate().map_err(to_py_err)?;
        Ok(Self { inner: config })
    }

    /// Construct from JSON string.
    #[staticmethod]
    fn from_json(json: &str) -> PyResult<Self> {
        let config = PumaConfig::from_json(json).map_err(to_py_err)?;
        config.validate().map_err(to_py_err)?;
        Ok(Self { inner: config })
    }

    #[getter]
    fn alpha(&self) -> f64 {
        self.inner.alpha
    }

    #[getter]
    fn threshold(&self) -> f64 {
        self.inner.threshold
    }

    #[getter]
    fn max_iterations(&self) -> usize {
        self.inner.max_iterations
    }

    fn __repr__(&self) -> String {
        format!(
            "PumaConfig(alpha={}, threshold={}, max_iterations={})",
            self.inner.alpha, self.inner.threshold, self.inner.max_iterations
        )
    }
}

// ─── RustPuma ───────────────────────────────────────────────────────

/// One PUMA run over unnormalized correlation, motif and PPI matrices.
///
/// Without `tfs`/`genes`, axes are labelled `TF0..` and `G0..`. `mirnas`
/// are matched against the TF labels; unmatched ids are ignored.
#[pyclass(name = "RustPuma")]
struct PyPuma {
    inner: PumaNetwork,
}

#[pymethods]
impl PyPuma {
    #[new]
    #[pyo3(signature = (correlation, motif, ppi, tfs = None, genes = None, mirnas = None, config = None))]
    fn new(
        correlation: Vec<Vec<f64>>,
        motif: Vec<Vec<f64>>,
        ppi: Vec<Vec<f64>>,
        tfs: Option<Vec<String>>,
        genes: Option<Vec<String>>,
        mirnas: Option<Vec<String>>,
        config: Option<PyPumaConfig>,
    ) -> PyResult<Self> {
        let correlation = matrix_from_lists("correlation", &correlation)?;
        let motif = matrix_from_lists("motif", &motif)?;
        let ppi = matrix_from_lists("ppi", &ppi)?;

        let tfs = tfs.unwrap_or_else(|| default_labels("TF", motif.rows()));
        let genes = genes.unwrap_or_else(|| default_labels("G", motif.cols()));
        let cfg = config.map(|c| c.inner).unwrap_or_default();

        let inner = PumaNetwork::from_matrices(
            &correlation,
            &motif,
            &ppi,
            tfs,
            genes,
            &mirnas.unwrap_or_default(),
            cfg,
        )
        .map_err(to_py_err)?;
        Ok(Self { inner })
    }

    /// Run to convergence (or the iteration cap). Returns dict with
    /// motif, converged, steps, final_hamming, trace.
    fn run<'py>(&mut self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        let outcome = py
            .allow_threads(|| self.inner.run())
            .map_err(to_py_err)?;
        outcome_dict(py, &outcome)
    }

    /// Expanded (tf, gene, prior, posterior) rows in column-major order.
    fn expanded<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyList>> {
        let rows = self.inner.expanded().map_err(to_py_err)?;
        let list = PyList::empty(py);
        for row in rows {
            let dict = PyDict::new(py);
            dict.set_item("tf", row.tf)?;
            dict.set_item("gene", row.gene)?;
            dict.set_item("prior", row.prior)?;
            dict.set_item("posterior", row.posterior)?;
            list.append(dict)?;
        }
        Ok(list)
    }

    /// Resolved constraint TF positions.
    #[getter]
    fn constraint_indices(&self) -> Vec<usize> {
        self.inner.engine().constraint_indices().to_vec()
    }

    #[getter]
    fn step_count(&self) -> usize {
        self.inner.engine().step_count()
    }

    fn __repr__(&self) -> String {
        let state = self.inner.engine().state();
        format!(
            "RustPuma(tfs={}, genes={}, steps={})",
            state.tf_count(),
            state.gene_count(),
            state.step
        )
    }
}

fn outcome_dict<'py>(py: Python<'py>, outcome: &PumaOutcome) -> PyResult<Bound<'py, PyDict>> {
    let motif: Vec<Vec<f64>> = outcome
        .motif
        .chunks(outcome.gene_count.max(1))
        .map(|r| r.to_vec())
        .collect();
    let trace: Vec<(usize, f64)> = outcome
        .trace
        .iter()
        .map(|r| (r.step, r.hamming))
        .collect();

    let dict = PyDict::new(py);
    dict.set_item("motif", motif)?;
    dict.set_item("converged", outcome.converged())?;
    dict.set_item("steps", outcome.steps)?;
    dict.set_item("final_hamming", outcome.final_hamming)?;
    dict.set_item("trace", trace)?;
    Ok(dict)
}

// ─── Module Registration ────────────────────────────────────────────

/// PUMA Kernel: Rust-accelerated gene regulatory network inference.
///
/// - `PumaConfig`: loop configuration
/// - `RustPuma`: normalization, convergence loop and result expansion
#[pymodule]
fn puma_kernel(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyPumaConfig>()?;
    m.add_class::<PyPuma>()?;
    Ok(())
}
