//! Lazily evaluated operator algebra
//!
//! A [`FunMatrix`] describes a complex matrix by how to compute its elements
//! rather than by storing them. Leaves are explicit buffers, captured vectors
//! (|v⟩⟨v|) or closed-form operators (identity, Walsh/Hadamard, projectors);
//! everything else is a combinator over other `FunMatrix` handles:
//!
//! | Combinator                       | Element (i, j)                                  |
//! |----------------------------------|-------------------------------------------------|
//! | [`add`](FunMatrix::add) / [`sub`](FunMatrix::sub) | `a(i,j) ± b(i,j)`              |
//! | [`scale`](FunMatrix::scale)      | `s · a(i,j)`                                    |
//! | [`matmul`](FunMatrix::matmul)    | `Σ_k a(i,k) · b(k,j)`                           |
//! | [`hadamard_product`](FunMatrix::hadamard_product) | `a(i,j) · b(i,j)`              |
//! | [`kron`](FunMatrix::kron)        | `a(i / rb, j / cb) · b(i % rb, j % cb)`         |
//! | [`transpose`](FunMatrix::transpose) / [`adjoint`](FunMatrix::adjoint) | `a(j,i)` / `conj(a(j,i))` |
//! | [`partial_trace`](FunMatrix::partial_trace) | sum over the traced qubit's two values |
//!
//! Operands are reference counted and shared, so one sub-operator can feed
//! several parents (the graph is a DAG). Nothing is ever materialized unless
//! asked for with [`FunMatrix::to_dense`].
//!
//! # Example
//!
//! ```
//! use qreg_funmatrix::FunMatrix;
//! use num_complex::Complex64;
//!
//! // |+⟩⟨+| ⊗ |0⟩⟨0|, then trace out qubit 0 (the |0⟩ factor)
//! let h = std::f64::consts::FRAC_1_SQRT_2;
//! let plus = FunMatrix::outer_product(vec![Complex64::new(h, 0.0), Complex64::new(h, 0.0)]);
//! let rho = plus.kron(&FunMatrix::zero_projector(1).unwrap()).unwrap();
//!
//! let reduced = rho.partial_trace(0usize).unwrap();
//! assert_eq!(reduced.shape(), (2, 2));
//! assert!((reduced.get(0, 1).unwrap().re - 0.5).abs() < 1e-12);
//! ```

mod builders;
mod cache;
mod display;
pub mod matrix;
mod node;

pub use matrix::FunMatrix;
pub use qreg_core::{QuantumError, Result};
