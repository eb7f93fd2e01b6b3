//! Operator node kinds and their evaluation rules

use crate::cache::Memo;
use crate::matrix::FunMatrix;
use num_complex::Complex64;
use qreg_core::QubitId;
use std::sync::Arc;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);

/// One node of an operator DAG
///
/// Leaves compute elements directly; every other kind refers to its operands
/// through shared [`FunMatrix`] handles. Operand shapes are checked when the
/// node is built, so evaluation never has to.
pub(crate) enum Node {
    /// Row-major element buffer
    Dense(Arc<[Complex64]>),
    /// |v⟩⟨v| for a captured vector v
    OuterProduct(Arc<[Complex64]>),
    Identity,
    /// |0…0⟩⟨0…0|
    ZeroProjector,
    /// Sylvester ±1 matrix, optionally scaled by 1/√size
    Walsh { normalized: bool },
    /// Block diagonal (I, U)
    Controlled(FunMatrix),
    Scaled(Complex64, FunMatrix),
    Sum(FunMatrix, FunMatrix),
    Difference(FunMatrix, FunMatrix),
    Product(FunMatrix, FunMatrix),
    ElementWise(FunMatrix, FunMatrix),
    Kronecker(FunMatrix, FunMatrix),
    Transpose(FunMatrix),
    Conjugate(FunMatrix),
    Adjoint(FunMatrix),
    PartialTrace { parent: FunMatrix, qubit: QubitId },
    Cached(Memo),
}

impl Node {
    /// Short name of the node kind
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Self::Dense(_) => "dense",
            Self::OuterProduct(_) => "outer-product",
            Self::Identity => "identity",
            Self::ZeroProjector => "zero-projector",
            Self::Walsh { normalized: false } => "walsh",
            Self::Walsh { normalized: true } => "hadamard",
            Self::Controlled(_) => "controlled",
            Self::Scaled(..) => "scaled",
            Self::Sum(..) => "sum",
            Self::Difference(..) => "difference",
            Self::Product(..) => "product",
            Self::ElementWise(..) => "element-wise",
            Self::Kronecker(..) => "kronecker",
            Self::Transpose(_) => "transpose",
            Self::Conjugate(_) => "conjugate",
            Self::Adjoint(_) => "adjoint",
            Self::PartialTrace { .. } => "partial-trace",
            Self::Cached(_) => "cached",
        }
    }

    /// Element (`i`, `j`) of a node whose matrix is `rows` × `cols`
    ///
    /// Callers guarantee `i < rows` and `j < cols`.
    pub(crate) fn eval(&self, rows: usize, cols: usize, i: usize, j: usize) -> Complex64 {
        match self {
            Self::Dense(data) => data[i * cols + j],
            Self::OuterProduct(v) => v[i] * v[j].conj(),
            Self::Identity => delta(i, j),
            Self::ZeroProjector => {
                if i == 0 && j == 0 {
                    ONE
                } else {
                    ZERO
                }
            },
            Self::Walsh { normalized } => {
                let sign = if (i & j).count_ones() % 2 == 0 { 1.0 } else { -1.0 };
                if *normalized {
                    Complex64::new(sign / (rows as f64).sqrt(), 0.0)
                } else {
                    Complex64::new(sign, 0.0)
                }
            },
            Self::Controlled(u) => {
                let (ur, uc) = u.shape();
                if i < ur || j < uc {
                    delta(i, j)
                } else {
                    u.eval(i - ur, j - uc)
                }
            },
            Self::Scaled(s, m) => s * m.eval(i, j),
            Self::Sum(a, b) => a.eval(i, j) + b.eval(i, j),
            Self::Difference(a, b) => a.eval(i, j) - b.eval(i, j),
            Self::Product(a, b) => (0..a.cols()).map(|k| a.eval(i, k) * b.eval(k, j)).sum(),
            Self::ElementWise(a, b) => a.eval(i, j) * b.eval(i, j),
            Self::Kronecker(a, b) => {
                let (br, bc) = b.shape();
                a.eval(i / br, j / bc) * b.eval(i % br, j % bc)
            },
            Self::Transpose(m) => m.eval(j, i),
            Self::Conjugate(m) => m.eval(i, j).conj(),
            Self::Adjoint(m) => m.eval(j, i).conj(),
            Self::PartialTrace { parent, qubit } => {
                let q = qubit.index();
                parent.eval(insert_bit(i, q, 0), insert_bit(j, q, 0))
                    + parent.eval(insert_bit(i, q, 1), insert_bit(j, q, 1))
            },
            Self::Cached(memo) => memo.get(i, j),
        }
    }

    /// Bytes held by this node and everything below it
    ///
    /// Shared operands are counted once per reference.
    pub(crate) fn memory_size(&self) -> usize {
        let elem = std::mem::size_of::<Complex64>();
        match self {
            Self::Dense(data) | Self::OuterProduct(data) => data.len() * elem,
            Self::Identity | Self::ZeroProjector | Self::Walsh { .. } => 0,
            Self::Controlled(m)
            | Self::Scaled(_, m)
            | Self::Transpose(m)
            | Self::Conjugate(m)
            | Self::Adjoint(m)
            | Self::PartialTrace { parent: m, .. } => m.memory_size(),
            Self::Sum(a, b)
            | Self::Difference(a, b)
            | Self::Product(a, b)
            | Self::ElementWise(a, b)
            | Self::Kronecker(a, b) => a.memory_size() + b.memory_size(),
            Self::Cached(memo) => memo.memory_size(),
        }
    }
}

#[inline]
fn delta(i: usize, j: usize) -> Complex64 {
    if i == j {
        ONE
    } else {
        ZERO
    }
}

/// Insert `bit` at position `q` of `x`, shifting the higher bits up by one
#[inline]
pub(crate) fn insert_bit(x: usize, q: usize, bit: usize) -> usize {
    let low = x & ((1 << q) - 1);
    ((x >> q) << (q + 1)) | (bit << q) | low
}
