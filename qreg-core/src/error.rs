//! Error types for qreg

use crate::QubitId;
use thiserror::Error;

/// Coarse classification of [`QuantumError`]s
///
/// Bindings map these onto their own exception types; the engine itself only
/// ever reports the precise variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed input: bad qubit ids, shapes, thread counts, masks...
    InvalidArgument,
    /// Element index outside of the addressed vector or matrix
    IndexError,
    /// Amplitude read on a register with no qubits left
    EmptyRegistry,
}

/// Errors that can occur in register, gate and operator operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QuantumError {
    /// Requested more qubits than the engine can address
    #[error("Cannot allocate {requested} qubits (maximum is {max})")]
    TooManyQubits { requested: usize, max: usize },

    /// Qubit id outside of the register
    #[error("Qubit {qubit} out of range for a {num_qubits}-qubit register")]
    QubitOutOfRange { qubit: QubitId, num_qubits: usize },

    /// Same qubit used twice among targets, controls and anticontrols
    #[error("Qubit {0} appears more than once among targets, controls and anticontrols")]
    DuplicateQubit(QubitId),

    /// Gate applied to the wrong number of targets
    #[error("Gate acts on {expected} qubits, but {actual} targets were given")]
    ArityMismatch { expected: usize, actual: usize },

    /// Data length does not match the declared dimension
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Thread count that is neither positive nor a known sentinel
    #[error("Invalid thread count {0}: use a positive number, -1 (platform) or -2 (environment)")]
    InvalidThreadCount(i64),

    /// Thread configuration variable holds garbage
    #[error("Environment variable {var} has invalid value {value:?}")]
    InvalidEnvironment { var: String, value: String },

    /// Element index outside of the vector/matrix
    #[error("Index {index} out of range (size {size})")]
    IndexOutOfRange { index: usize, size: usize },

    /// Read on a zero-qubit register
    #[error("Register has no qubits left to read from")]
    EmptyRegister,

    /// Measurement mask selects qubits the register does not have
    #[error("Mask {mask:#b} selects qubits outside of a {num_qubits}-qubit register")]
    InvalidMask { mask: u64, num_qubits: usize },

    /// Not enough random draws for the requested measurement
    #[error("Measurement needs {expected} random draws, got {actual}")]
    MissingDraws { expected: usize, actual: usize },

    /// Random draw outside of [0, 1)
    #[error("Random draw {0} is not in [0, 1)")]
    InvalidDraw(f64),

    /// Operands of a matrix combinator have incompatible shapes
    #[error("Cannot {op} a {left:?} matrix with a {right:?} matrix")]
    ShapeMismatch {
        op: &'static str,
        left: (usize, usize),
        right: (usize, usize),
    },

    /// Operation only defined for square matrices whose side is a power of two
    #[error("Operation requires a square matrix with a power-of-two side, got {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },

    /// Worker pool could not be created
    #[error("Failed to build worker pool: {0}")]
    ThreadPool(String),
}

impl QuantumError {
    /// Create a qubit out of range error
    pub fn qubit_out_of_range(qubit: impl Into<QubitId>, num_qubits: usize) -> Self {
        Self::QubitOutOfRange {
            qubit: qubit.into(),
            num_qubits,
        }
    }

    /// Create an index out of range error
    pub fn index_out_of_range(index: usize, size: usize) -> Self {
        Self::IndexOutOfRange { index, size }
    }

    /// Abstract kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::IndexOutOfRange { .. } => ErrorKind::IndexError,
            Self::EmptyRegister => ErrorKind::EmptyRegistry,
            _ => ErrorKind::InvalidArgument,
        }
    }
}
