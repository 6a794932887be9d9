// ─────────────────────────────────────────────────────────────────────
// PUMA Kernel - Dense Matrix
// ─────────────────────────────────────────────────────────────────────
//! Dense row-major `f64` matrix with the handful of element-wise
//! operations the convergence loop needs.

use puma_types::{PumaError, PumaResult};

/// Population mean and std (ddof 0) of `values`. Both NaN when empty.
pub fn mean_std(values: impl Iterator<Item = f64> + Clone) -> (f64, f64) {
    let (sum, count) = values.clone().fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        return (f64::NAN, f64::NAN);
    }
    let mean = sum / count as f64;
    let var = values.map(|v| (v - mean) * (v - mean)).sum::<f64>() / count as f64;
    (mean, var.sqrt())
}

/// Dense matrix, rows × cols, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m.data[i * n + i] = 1.0;
        }
        m
    }

    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> f64) -> Self {
        let mut data = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            for j in 0..cols {
                data.push(f(i, j));
            }
        }
        Self { rows, cols, data }
    }

    /// Element-wise map into a new matrix of the same shape.
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Matrix {
        Self {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|&v| f(v)).collect(),
        }
    }

    /// Wrap a row-major buffer. `data.len()` must equal `rows * cols`.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> PumaResult<Self> {
        if data.len() != rows * cols {
            return Err(PumaError::Shape(format!(
                "buffer length {} != {rows}x{cols}",
                data.len()
            )));
        }
        Ok(Self { rows, cols, data })
    }

    /// Build from nested rows. All rows must have the same length.
    pub fn from_rows(rows: &[Vec<f64>]) -> PumaResult<Self> {
        let n_rows = rows.len();
        let n_cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(n_rows * n_cols);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != n_cols {
                return Err(PumaError::Shape(format!(
                    "row {i} has {} columns, expected {n_cols}",
                    row.len()
                )));
            }
            data.extend_from_slice(row);
        }
        Ok(Self {
            rows: n_rows,
            cols: n_cols,
            data,
        })
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[row * self.cols + col] = value;
    }

    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.data.chunks(self.cols.max(1)).map(<[f64]>::to_vec).collect()
    }

    pub fn transpose(&self) -> Matrix {
        let mut out = Matrix::zeros(self.cols, self.rows);
        for i in 0..self.rows {
            for j in 0..self.cols {
                out.data[j * self.rows + i] = self.data[i * self.cols + j];
            }
        }
        out
    }

    pub fn diagonal(&self) -> Vec<f64> {
        let n = self.rows.min(self.cols);
        (0..n).map(|i| self.get(i, i)).collect()
    }

    pub fn fill_diagonal(&mut self, values: &[f64]) {
        let n = self.rows.min(self.cols).min(values.len());
        for (i, &v) in values.iter().enumerate().take(n) {
            self.set(i, i, v);
        }
    }

    /// Sum of squares of each row.
    pub fn row_sum_sq(&self) -> Vec<f64> {
        (0..self.rows)
            .map(|i| self.row(i).iter().map(|v| v * v).sum())
            .collect()
    }

    /// Sum of squares of each column.
    pub fn col_sum_sq(&self) -> Vec<f64> {
        let mut out = vec![0.0; self.cols];
        for i in 0..self.rows {
            for (acc, v) in out.iter_mut().zip(self.row(i)) {
                *acc += v * v;
            }
        }
        out
    }

    /// `self = (1 - alpha) * self + alpha * update`.
    pub fn blend(&mut self, update: &Matrix, alpha: f64) -> PumaResult<()> {
        if self.shape() != update.shape() {
            return Err(PumaError::Shape(format!(
                "cannot blend {:?} with {:?}",
                self.shape(),
                update.shape()
            )));
        }
        for (a, &b) in self.data.iter_mut().zip(&update.data) {
            *a = (1.0 - alpha) * *a + alpha * b;
        }
        Ok(())
    }

    /// Mean of |self - other| over all cells.
    pub fn mean_abs_diff(&self, other: &Matrix) -> PumaResult<f64> {
        if self.shape() != other.shape() {
            return Err(PumaError::Shape(format!(
                "cannot compare {:?} with {:?}",
                self.shape(),
                other.shape()
            )));
        }
        if self.data.is_empty() {
            return Err(PumaError::Empty("mean of an empty matrix".into()));
        }
        let sum: f64 = self
            .data
            .iter()
            .zip(&other.data)
            .map(|(a, b)| (a - b).abs())
            .sum();
        Ok(sum / self.data.len() as f64)
    }

    /// Largest |A[i,j] - A[j,i]|. NaN cells are skipped.
    pub fn max_asymmetry(&self) -> f64 {
        let n = self.rows.min(self.cols);
        let mut worst = 0.0_f64;
        for i in 0..n {
            for j in (i + 1)..n {
                let d = (self.get(i, j) - self.get(j, i)).abs();
                if d.is_finite() {
                    worst = worst.max(d);
                }
            }
        }
        worst
    }

    pub fn count_nan(&self) -> usize {
        self.data.iter().filter(|v| v.is_nan()).count()
    }
}
