//! The [`FunMatrix`] handle and its combinators

use crate::cache::Memo;
use crate::node::Node;
use num_complex::Complex64;
use qreg_core::{QuantumError, QubitId, Result};
use std::fmt;
use std::sync::Arc;

struct Inner {
    rows: usize,
    cols: usize,
    node: Node,
}

/// Lazily evaluated complex matrix
///
/// A `FunMatrix` is a cheap handle to one node of an operator DAG. Building a
/// new matrix out of existing ones (sum, product, Kronecker product, partial
/// trace, ...) only records the operation; elements are computed on demand by
/// [`FunMatrix::get`]. Operands are shared, so the same sub-operator may feed
/// any number of parents, and a node lives as long as any handle or parent
/// still refers to it.
///
/// # Example
/// ```
/// use qreg_funmatrix::FunMatrix;
/// use num_complex::Complex64;
///
/// let h = FunMatrix::hadamard(1).unwrap();
/// let hh = h.matmul(&h).unwrap();
/// assert!((hh.get(0, 0).unwrap() - Complex64::new(1.0, 0.0)).norm() < 1e-12);
/// assert!(hh.get(0, 1).unwrap().norm() < 1e-12);
/// ```
#[derive(Clone)]
pub struct FunMatrix(Arc<Inner>);

impl FunMatrix {
    pub(crate) fn from_node(rows: usize, cols: usize, node: Node) -> Self {
        Self(Arc::new(Inner { rows, cols, node }))
    }

    /// Number of rows
    #[inline]
    pub fn rows(&self) -> usize {
        self.0.rows
    }

    /// Number of columns
    #[inline]
    pub fn cols(&self) -> usize {
        self.0.cols
    }

    /// (rows, columns)
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.0.rows, self.0.cols)
    }

    /// Whether both handles refer to the same node
    #[inline]
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }

    /// Name of the operation this node performs
    pub fn kind(&self) -> &'static str {
        self.0.node.kind()
    }

    /// Element at row `i`, column `j`
    ///
    /// # Errors
    /// Returns [`QuantumError::IndexOutOfRange`] if `i` or `j` lies outside
    /// the matrix.
    pub fn get(&self, i: usize, j: usize) -> Result<Complex64> {
        if i >= self.0.rows {
            return Err(QuantumError::index_out_of_range(i, self.0.rows));
        }
        if j >= self.0.cols {
            return Err(QuantumError::index_out_of_range(j, self.0.cols));
        }
        Ok(self.eval(i, j))
    }

    #[inline]
    pub(crate) fn eval(&self, i: usize, j: usize) -> Complex64 {
        self.0.node.eval(self.0.rows, self.0.cols, i, j)
    }

    fn check_same_shape(&self, other: &Self, op: &'static str) -> Result<()> {
        if self.shape() == other.shape() {
            Ok(())
        } else {
            Err(QuantumError::ShapeMismatch {
                op,
                left: self.shape(),
                right: other.shape(),
            })
        }
    }

    /// Element-wise sum
    pub fn add(&self, other: &Self) -> Result<Self> {
        self.check_same_shape(other, "add")?;
        Ok(Self::from_node(
            self.rows(),
            self.cols(),
            Node::Sum(self.clone(), other.clone()),
        ))
    }

    /// Element-wise difference
    pub fn sub(&self, other: &Self) -> Result<Self> {
        self.check_same_shape(other, "subtract")?;
        Ok(Self::from_node(
            self.rows(),
            self.cols(),
            Node::Difference(self.clone(), other.clone()),
        ))
    }

    /// Multiply every element by `scalar`
    ///
    /// Scaling an already scaled node folds both factors into one node.
    pub fn scale(&self, scalar: Complex64) -> Self {
        let (rows, cols) = self.shape();
        match &self.0.node {
            Node::Scaled(s, inner) => Self::from_node(rows, cols, Node::Scaled(s * scalar, inner.clone())),
            _ => Self::from_node(rows, cols, Node::Scaled(scalar, self.clone())),
        }
    }

    /// Divide every element by `scalar`
    ///
    /// Dividing by zero yields non-finite elements.
    pub fn div_scalar(&self, scalar: Complex64) -> Self {
        self.scale(scalar.inv())
    }

    /// Matrix product `self · other`
    ///
    /// # Errors
    /// Returns [`QuantumError::ShapeMismatch`] unless `self` has as many
    /// columns as `other` has rows.
    pub fn matmul(&self, other: &Self) -> Result<Self> {
        if self.cols() != other.rows() {
            return Err(QuantumError::ShapeMismatch {
                op: "multiply",
                left: self.shape(),
                right: other.shape(),
            });
        }
        Ok(Self::from_node(
            self.rows(),
            other.cols(),
            Node::Product(self.clone(), other.clone()),
        ))
    }

    /// Entity-wise (Hadamard) product
    ///
    /// A row vector combined with a column vector (in either order) yields
    /// their outer product, column first.
    pub fn hadamard_product(&self, other: &Self) -> Result<Self> {
        if self.shape() == other.shape() {
            return Ok(Self::from_node(
                self.rows(),
                self.cols(),
                Node::ElementWise(self.clone(), other.clone()),
            ));
        }
        if self.rows() == 1 && other.cols() == 1 {
            return other.matmul(self);
        }
        if other.rows() == 1 && self.cols() == 1 {
            return self.matmul(other);
        }
        Err(QuantumError::ShapeMismatch {
            op: "element-wise multiply",
            left: self.shape(),
            right: other.shape(),
        })
    }

    /// Kronecker product `self ⊗ other`
    ///
    /// `self` selects the block, `other` the element within the block.
    pub fn kron(&self, other: &Self) -> Result<Self> {
        let overflow = || QuantumError::ShapeMismatch {
            op: "take the Kronecker product of",
            left: self.shape(),
            right: other.shape(),
        };
        let rows = self.rows().checked_mul(other.rows()).ok_or_else(overflow)?;
        let cols = self.cols().checked_mul(other.cols()).ok_or_else(overflow)?;
        Ok(Self::from_node(rows, cols, Node::Kronecker(self.clone(), other.clone())))
    }

    /// Transpose
    pub fn transpose(&self) -> Self {
        if let Node::Transpose(inner) = &self.0.node {
            return inner.clone();
        }
        Self::from_node(self.cols(), self.rows(), Node::Transpose(self.clone()))
    }

    /// Complex conjugate of every element
    pub fn conj(&self) -> Self {
        if let Node::Conjugate(inner) = &self.0.node {
            return inner.clone();
        }
        Self::from_node(self.rows(), self.cols(), Node::Conjugate(self.clone()))
    }

    /// Conjugate transpose
    pub fn adjoint(&self) -> Self {
        if let Node::Adjoint(inner) = &self.0.node {
            return inner.clone();
        }
        Self::from_node(self.cols(), self.rows(), Node::Adjoint(self.clone()))
    }

    /// Trace out one qubit of a square operator
    ///
    /// For a 2^n × 2^n operator, the result is 2^(n-1) × 2^(n-1) and its
    /// element (i, j) is the sum, over both values of `qubit`, of the parent
    /// element at `i` and `j` with that value inserted at bit `qubit`. The
    /// remaining qubits keep their relative order.
    ///
    /// # Errors
    /// Returns [`QuantumError::NotSquare`] unless the operator is square with
    /// a power-of-two side of at least 2, and
    /// [`QuantumError::QubitOutOfRange`] if `qubit` is not below n.
    pub fn partial_trace(&self, qubit: impl Into<QubitId>) -> Result<Self> {
        let qubit = qubit.into();
        let (rows, cols) = self.shape();
        if rows != cols || rows < 2 || !rows.is_power_of_two() {
            return Err(QuantumError::NotSquare { rows, cols });
        }

        let num_qubits = rows.trailing_zeros() as usize;
        if qubit.index() >= num_qubits {
            return Err(QuantumError::qubit_out_of_range(qubit, num_qubits));
        }

        tracing::trace!(num_qubits, %qubit, "partial trace node");
        Ok(Self::from_node(
            rows / 2,
            cols / 2,
            Node::PartialTrace {
                parent: self.clone(),
                qubit,
            },
        ))
    }

    /// Wrap this matrix in a node that remembers every element it evaluates
    ///
    /// Values are identical to those of `self`; repeated reads of the same
    /// element are served from memory. Useful under a partial trace chain or a
    /// matrix product, where the same parent element is requested many times.
    pub fn cached(&self) -> Self {
        if let Node::Cached(_) = &self.0.node {
            return self.clone();
        }
        Self::from_node(self.rows(), self.cols(), Node::Cached(Memo::new(self.clone())))
    }

    /// Number of elements currently remembered by a [`FunMatrix::cached`] node
    pub fn cached_len(&self) -> Option<usize> {
        match &self.0.node {
            Node::Cached(memo) => Some(memo.len()),
            _ => None,
        }
    }

    /// Bytes held by this operator graph
    ///
    /// Shared sub-operators are counted once per reference, so this is an
    /// upper bound on the memory actually in use.
    pub fn memory_size(&self) -> usize {
        std::mem::size_of::<Inner>() + self.0.node.memory_size()
    }

    /// Evaluate every element into a row-major buffer
    pub fn to_dense(&self) -> Vec<Complex64> {
        let (rows, cols) = self.shape();
        let mut out = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            for j in 0..cols {
                out.push(self.eval(i, j));
            }
        }
        out
    }

    /// Sum of the diagonal
    ///
    /// # Errors
    /// Returns [`QuantumError::NotSquare`] for non-square matrices.
    pub fn trace(&self) -> Result<Complex64> {
        let (rows, cols) = self.shape();
        if rows != cols {
            return Err(QuantumError::NotSquare { rows, cols });
        }
        Ok((0..rows).map(|i| self.eval(i, i)).sum())
    }

    /// Check A = A† element-wise within `tolerance`
    pub fn is_hermitian(&self, tolerance: f64) -> bool {
        let (rows, cols) = self.shape();
        if rows != cols {
            return false;
        }
        for i in 0..rows {
            for j in i..cols {
                if (self.eval(i, j) - self.eval(j, i).conj()).norm() > tolerance {
                    return false;
                }
            }
        }
        true
    }
}

impl fmt::Debug for FunMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunMatrix")
            .field("rows", &self.rows())
            .field("cols", &self.cols())
            .field("kind", &self.kind())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    fn m2(a: [[Complex64; 2]; 2]) -> FunMatrix {
        FunMatrix::dense(2, 2, vec![a[0][0], a[0][1], a[1][0], a[1][1]]).unwrap()
    }

    #[test]
    fn test_get_out_of_bounds() {
        let m = FunMatrix::identity(1).unwrap();
        assert_eq!(m.get(2, 0), Err(QuantumError::index_out_of_range(2, 2)));
        assert_eq!(m.get(0, 5), Err(QuantumError::index_out_of_range(5, 2)));
    }

    #[test]
    fn test_add_sub_shape_checked() {
        let a = FunMatrix::identity(1).unwrap();
        let b = FunMatrix::identity(2).unwrap();
        assert!(matches!(a.add(&b), Err(QuantumError::ShapeMismatch { op: "add", .. })));
        assert!(a.sub(&b).is_err());

        let diff = a.sub(&a).unwrap();
        assert_eq!(diff.to_dense(), vec![c(0.0, 0.0); 4]);
    }

    #[test]
    fn test_scale_folds() {
        let a = FunMatrix::identity(1).unwrap();
        let s = a.scale(c(2.0, 0.0)).scale(c(0.0, 1.0));
        assert_eq!(s.kind(), "scaled");
        assert_eq!(s.get(1, 1).unwrap(), c(0.0, 2.0));

        let d = s.div_scalar(c(0.0, 2.0));
        assert_relative_eq!(d.get(0, 0).unwrap().re, 1.0);
    }

    #[test]
    fn test_transpose_of_rectangular() {
        let m = FunMatrix::dense(1, 3, vec![c(1.0, 0.0), c(2.0, 0.0), c(3.0, 0.0)]).unwrap();
        let t = m.transpose();
        assert_eq!(t.shape(), (3, 1));
        assert_eq!(t.get(2, 0).unwrap(), c(3.0, 0.0));
        assert!(FunMatrix::ptr_eq(&t.transpose(), &m));
    }

    #[test]
    fn test_adjoint() {
        let m = m2([[c(1.0, 1.0), c(2.0, -1.0)], [c(0.0, 3.0), c(4.0, 0.0)]]);
        let a = m.adjoint();
        assert_eq!(a.get(0, 1).unwrap(), c(0.0, -3.0));
        assert_eq!(a.get(1, 0).unwrap(), c(2.0, 1.0));
        assert_eq!(m.conj().get(0, 0).unwrap(), c(1.0, -1.0));
    }

    #[test]
    fn test_matmul_shapes() {
        let row = FunMatrix::dense(1, 2, vec![c(1.0, 0.0), c(2.0, 0.0)]).unwrap();
        let col = FunMatrix::dense(2, 1, vec![c(3.0, 0.0), c(4.0, 0.0)]).unwrap();

        let inner = row.matmul(&col).unwrap();
        assert_eq!(inner.shape(), (1, 1));
        assert_eq!(inner.get(0, 0).unwrap(), c(11.0, 0.0));

        assert!(row.matmul(&row).is_err());
    }

    #[test]
    fn test_hadamard_product_vector_fallback() {
        let row = FunMatrix::dense(1, 2, vec![c(1.0, 0.0), c(2.0, 0.0)]).unwrap();
        let col = FunMatrix::dense(2, 1, vec![c(3.0, 0.0), c(4.0, 0.0)]).unwrap();

        let outer = row.hadamard_product(&col).unwrap();
        assert_eq!(outer.shape(), (2, 2));
        assert_eq!(outer.get(1, 0).unwrap(), c(4.0, 0.0));
        assert_eq!(outer.get(1, 1).unwrap(), c(8.0, 0.0));

        let same = col.hadamard_product(&row).unwrap();
        assert_eq!(same.to_dense(), outer.to_dense());

        let sq = FunMatrix::identity(1).unwrap();
        assert!(sq.hadamard_product(&row).is_err());
    }

    #[test]
    fn test_partial_trace_validation() {
        let rect = FunMatrix::dense(2, 4, vec![c(0.0, 0.0); 8]).unwrap();
        assert!(matches!(rect.partial_trace(0usize), Err(QuantumError::NotSquare { .. })));

        let one = FunMatrix::identity(0).unwrap();
        assert!(one.partial_trace(0usize).is_err());

        let id = FunMatrix::identity(2).unwrap();
        assert!(matches!(
            id.partial_trace(2usize),
            Err(QuantumError::QubitOutOfRange { num_qubits: 2, .. })
        ));
        let reduced = id.partial_trace(1usize).unwrap();
        assert_eq!(reduced.shape(), (2, 2));
        assert_eq!(reduced.get(0, 0).unwrap(), c(2.0, 0.0));
    }

    #[test]
    fn test_trace_and_hermitian() {
        let m = m2([[c(1.0, 0.0), c(0.0, -1.0)], [c(0.0, 1.0), c(2.0, 0.0)]]);
        assert!(m.is_hermitian(1e-12));
        assert_eq!(m.trace().unwrap(), c(3.0, 0.0));

        let n = m2([[c(1.0, 0.0), c(1.0, 0.0)], [c(0.0, 0.0), c(1.0, 0.0)]]);
        assert!(!n.is_hermitian(1e-12));
    }

    #[test]
    fn test_memory_counts_shared_nodes_per_reference() {
        let id = FunMatrix::identity(1).unwrap();
        let single = id.memory_size();
        let sum = id.add(&id).unwrap();
        assert_eq!(sum.memory_size(), std::mem::size_of::<Inner>() + 2 * single);
    }
}
