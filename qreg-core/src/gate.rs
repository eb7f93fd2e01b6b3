//! Gates built from explicit matrices
//!
//! A [`Gate`] is an immutable 2^k × 2^k complex matrix acting on k qubits.
//! The engine never checks unitarity: the matrix is stored exactly as given
//! and the caller vouches for it. [`Gate::is_unitary`] is available for
//! callers that want to check.
//!
//! Row and column indices of the matrix address the gate's targets in order:
//! bit `t` of a row index is the value of the `t`-th target qubit.
//!
//! # Example
//!
//! ```rust
//! use qreg_core::Gate;
//! use num_complex::Complex64;
//!
//! let h = std::f64::consts::FRAC_1_SQRT_2;
//! let hadamard = Gate::from_rows(1, &[
//!     vec![Complex64::new(h, 0.0), Complex64::new(h, 0.0)],
//!     vec![Complex64::new(h, 0.0), Complex64::new(-h, 0.0)],
//! ]).unwrap();
//!
//! assert_eq!(hadamard.num_qubits(), 1);
//! assert!(hadamard.is_unitary(1e-12));
//! ```

use crate::error::QuantumError;
use crate::Result;
use num_complex::Complex64;
use std::fmt;
use std::sync::Arc;

/// Largest gate arity accepted (the matrix alone would hold 4^k elements)
pub const MAX_GATE_QUBITS: usize = 12;

/// Immutable dense operator over a fixed number of qubits
///
/// Cloning a gate is cheap: the matrix is shared.
#[derive(Clone, PartialEq)]
pub struct Gate {
    num_qubits: usize,
    dimension: usize,
    /// Row-major, `dimension * dimension` elements
    matrix: Arc<[Complex64]>,
}

impl Gate {
    /// Create a gate from a flattened row-major matrix
    ///
    /// # Errors
    /// Returns an error if `num_qubits` is zero or too large, or if the
    /// matrix does not hold exactly 4^`num_qubits` elements.
    pub fn new(num_qubits: usize, matrix: Vec<Complex64>) -> Result<Self> {
        let dimension = Self::checked_dimension(num_qubits)?;
        let expected = dimension * dimension;

        if matrix.len() != expected {
            return Err(QuantumError::DimensionMismatch {
                expected,
                actual: matrix.len(),
            });
        }

        Ok(Self {
            num_qubits,
            dimension,
            matrix: matrix.into(),
        })
    }

    /// Create a gate from a list of matrix rows
    ///
    /// # Errors
    /// Returns an error if there are not 2^`num_qubits` rows or any row has
    /// the wrong length.
    pub fn from_rows(num_qubits: usize, rows: &[Vec<Complex64>]) -> Result<Self> {
        let dimension = Self::checked_dimension(num_qubits)?;

        if rows.len() != dimension {
            return Err(QuantumError::DimensionMismatch {
                expected: dimension,
                actual: rows.len(),
            });
        }

        let mut matrix = Vec::with_capacity(dimension * dimension);
        for row in rows {
            if row.len() != dimension {
                return Err(QuantumError::DimensionMismatch {
                    expected: dimension,
                    actual: row.len(),
                });
            }
            matrix.extend_from_slice(row);
        }

        Self::new(num_qubits, matrix)
    }

    fn checked_dimension(num_qubits: usize) -> Result<usize> {
        if num_qubits == 0 {
            return Err(QuantumError::ArityMismatch {
                expected: 1,
                actual: 0,
            });
        }
        if num_qubits > MAX_GATE_QUBITS {
            return Err(QuantumError::TooManyQubits {
                requested: num_qubits,
                max: MAX_GATE_QUBITS,
            });
        }
        Ok(1 << num_qubits)
    }

    /// Number of target qubits (k)
    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Matrix side length (2^k)
    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Matrix element at (`row`, `col`)
    ///
    /// # Panics
    /// Panics if either index is not below [`Gate::dimension`].
    #[inline]
    pub fn element(&self, row: usize, col: usize) -> Complex64 {
        self.matrix[row * self.dimension + col]
    }

    /// Flattened row-major matrix
    #[inline]
    pub fn matrix(&self) -> &[Complex64] {
        &self.matrix
    }

    /// Shared handle to the flattened matrix
    #[inline]
    pub fn shared_matrix(&self) -> Arc<[Complex64]> {
        Arc::clone(&self.matrix)
    }

    /// Single matrix row
    #[inline]
    pub fn row(&self, row: usize) -> &[Complex64] {
        let start = row * self.dimension;
        &self.matrix[start..start + self.dimension]
    }

    /// Check U†U = I within `tolerance` (element-wise)
    pub fn is_unitary(&self, tolerance: f64) -> bool {
        let dim = self.dimension;
        for i in 0..dim {
            for j in 0..dim {
                let mut sum = Complex64::new(0.0, 0.0);
                for k in 0..dim {
                    sum += self.element(k, i).conj() * self.element(k, j);
                }
                let expected = if i == j { 1.0 } else { 0.0 };
                if (sum - Complex64::new(expected, 0.0)).norm() > tolerance {
                    return false;
                }
            }
        }
        true
    }

    /// Conjugate transpose of this gate
    pub fn adjoint(&self) -> Self {
        let dim = self.dimension;
        let mut matrix = Vec::with_capacity(dim * dim);
        for i in 0..dim {
            for j in 0..dim {
                matrix.push(self.element(j, i).conj());
            }
        }

        Self {
            num_qubits: self.num_qubits,
            dimension: dim,
            matrix: matrix.into(),
        }
    }
}

impl fmt::Debug for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gate")
            .field("num_qubits", &self.num_qubits)
            .field("dimension", &self.dimension)
            .finish()
    }
}
