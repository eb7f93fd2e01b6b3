//! State-vector register engine
//!
//! This crate holds the [`Register`] type and the operations that drive it:
//!
//! - [`Register::apply`]: apply a [`Gate`] to target qubits, optionally
//!   conditioned on controls and anticontrols
//! - [`Register::measure`]: measure a set of qubits with caller-supplied
//!   randomness and collapse the state
//! - [`Register::prob`]: probability of reading 1 on a qubit, without
//!   collapsing
//! - [`Register::join`]: tensor product of two registers
//! - [`Register::density`]: lazy density operator, ready for
//!   [`FunMatrix::partial_trace`]
//! - [`Register::get`]: amplitude reads, raw or with the global phase removed
//!
//! Every pass over the amplitude vector runs on the worker configuration
//! given by its [`ThreadCount`] argument.
//!
//! # Qubit order
//!
//! Bit `b` of an amplitude index is qubit `b`. [`Register::join`] places the
//! first operand's qubits above the second's.
//!
//! # Example
//!
//! ```
//! use qreg_core::{Gate, QubitId, QubitMask, ThreadCount};
//! use qreg_state::Register;
//! use num_complex::Complex64;
//!
//! let h = std::f64::consts::FRAC_1_SQRT_2;
//! let hadamard = Gate::new(1, vec![
//!     Complex64::new(h, 0.0), Complex64::new(h, 0.0),
//!     Complex64::new(h, 0.0), Complex64::new(-h, 0.0),
//! ]).unwrap();
//! let zero = Complex64::new(0.0, 0.0);
//! let one = Complex64::new(1.0, 0.0);
//! let x = Gate::new(1, vec![zero, one, one, zero]).unwrap();
//!
//! // Bell pair: H on q0, then CNOT q0 → q1
//! let threads = ThreadCount::default();
//! let reg = Register::new(2).unwrap();
//! let reg = reg.apply(&hadamard, &[QubitId::new(0)], &[], &[], threads).unwrap();
//! let reg = reg.apply(&x, &[QubitId::new(1)], &[QubitId::new(0)], &[], threads).unwrap();
//!
//! assert!((reg.prob(1usize, threads).unwrap() - 0.5).abs() < 1e-12);
//!
//! let m = reg.measure(QubitMask::all(2), &[0.25, 0.5], threads).unwrap();
//! assert_eq!(m.outcome(0usize), m.outcome(1usize));
//! ```

mod apply;
mod density;
mod join;
pub mod measure;
pub mod register;

pub use measure::Measurement;
pub use register::Register;

pub use qreg_core::{
    Complex64, ErrorKind, Gate, QuantumError, QubitId, QubitMask, Result, ThreadCount, MAX_QUBITS,
};
pub use qreg_funmatrix::FunMatrix;
