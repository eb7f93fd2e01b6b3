//! Leaf operators
//!
//! Every other [`FunMatrix`] is eventually built on top of one of these.

use crate::matrix::FunMatrix;
use crate::node::Node;
use num_complex::Complex64;
use qreg_core::{Gate, QuantumError, Result, MAX_QUBITS};
use std::sync::Arc;

fn side(num_qubits: usize) -> Result<usize> {
    if num_qubits > MAX_QUBITS {
        return Err(QuantumError::TooManyQubits {
            requested: num_qubits,
            max: MAX_QUBITS,
        });
    }
    Ok(1 << num_qubits)
}

impl FunMatrix {
    /// 2^n × 2^n identity
    pub fn identity(num_qubits: usize) -> Result<Self> {
        let n = side(num_qubits)?;
        Ok(Self::from_node(n, n, Node::Identity))
    }

    /// 2^n × 2^n projector onto the all-zero basis state
    pub fn zero_projector(num_qubits: usize) -> Result<Self> {
        let n = side(num_qubits)?;
        Ok(Self::from_node(n, n, Node::ZeroProjector))
    }

    /// Unnormalized 2^n × 2^n Walsh matrix (entries ±1, Sylvester order)
    pub fn walsh(num_qubits: usize) -> Result<Self> {
        let n = side(num_qubits)?;
        Ok(Self::from_node(n, n, Node::Walsh { normalized: false }))
    }

    /// Hadamard transform on n qubits: the Walsh matrix scaled by 2^(-n/2)
    pub fn hadamard(num_qubits: usize) -> Result<Self> {
        let n = side(num_qubits)?;
        Ok(Self::from_node(n, n, Node::Walsh { normalized: true }))
    }

    /// Controlled version of `self`: the block diagonal matrix (I, U)
    ///
    /// The result has twice as many rows and columns as `self`.
    pub fn controlled(&self) -> Result<Self> {
        let (rows, cols) = self.shape();
        let widest = rows.max(cols);
        if widest > (1 << (MAX_QUBITS - 1)) {
            return Err(QuantumError::TooManyQubits {
                requested: (usize::BITS - widest.leading_zeros()) as usize,
                max: MAX_QUBITS,
            });
        }
        Ok(Self::from_node(rows * 2, cols * 2, Node::Controlled(self.clone())))
    }

    /// Matrix backed by an explicit row-major buffer
    ///
    /// # Errors
    /// Returns [`QuantumError::DimensionMismatch`] if `data` does not hold
    /// exactly `rows * cols` elements.
    pub fn dense(rows: usize, cols: usize, data: Vec<Complex64>) -> Result<Self> {
        let expected = rows.checked_mul(cols).ok_or(QuantumError::DimensionMismatch {
            expected: usize::MAX,
            actual: data.len(),
        })?;
        if data.len() != expected {
            return Err(QuantumError::DimensionMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self::from_node(rows, cols, Node::Dense(data.into())))
    }

    /// The matrix of `gate`, sharing its storage
    pub fn from_gate(gate: &Gate) -> Self {
        let n = gate.dimension();
        Self::from_node(n, n, Node::Dense(gate.shared_matrix()))
    }

    /// |v⟩⟨v| for a vector v: element (i, j) is `v[i] * conj(v[j])`
    ///
    /// The vector is captured by the node; nothing is expanded.
    pub fn outer_product(vector: impl Into<Arc<[Complex64]>>) -> Self {
        let vector = vector.into();
        let n = vector.len();
        Self::from_node(n, n, Node::OuterProduct(vector))
    }
}
