//! Core types for the qreg state-vector engine
//!
//! This crate provides the pieces shared by the operator algebra and the
//! register engine:
//! - [`QubitId`], [`QubitList`] and [`QubitMask`]: qubit addressing
//! - [`Gate`]: immutable dense operator built from an explicit matrix
//! - [`ThreadCount`] and [`Parallelism`]: worker configuration and the
//!   fork-join helpers every amplitude pass runs on
//! - [`QuantumError`]: the error type of the whole workspace
//!
//! # Example
//! ```
//! use qreg_core::{Parallelism, ThreadCount};
//!
//! let threads = ThreadCount::from_raw(2).unwrap();
//! let par = Parallelism::new(threads).unwrap();
//! let total = par.sum(10, |i| i as f64);
//! assert_eq!(total, 45.0);
//! ```

pub mod error;
pub mod gate;
pub mod parallel;
pub mod qubit;
pub mod threads;

// Re-exports for convenience
pub use error::{ErrorKind, QuantumError};
pub use gate::{Gate, MAX_GATE_QUBITS};
pub use num_complex::Complex64;
pub use parallel::{Parallelism, PARALLEL_THRESHOLD};
pub use qubit::{qubit_list, QubitId, QubitList, QubitMask};
pub use threads::{ThreadCount, Workers, THREADS_ENVIRONMENT, THREADS_PLATFORM};

/// Largest number of qubits a register or operator may span
///
/// A 30-qubit register holds 2^30 amplitudes (16 GiB).
pub const MAX_QUBITS: usize = 30;

/// Type alias for results in qreg
pub type Result<T> = std::result::Result<T, QuantumError>;
