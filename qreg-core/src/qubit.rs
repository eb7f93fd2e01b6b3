//! Qubit addressing: ids, id lists and bit masks

use crate::error::QuantumError;
use crate::Result;
use smallvec::SmallVec;
use std::fmt;

/// Type-safe identifier for a qubit
///
/// Qubit `b` of a register is bit `b` of an amplitude index.
///
/// # Example
/// ```
/// use qreg_core::QubitId;
///
/// let q0 = QubitId::new(0);
/// let q3 = QubitId::new(3);
/// assert!(q0 < q3);
/// assert_eq!(q3.bit(), 0b1000);
/// ```
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct QubitId(usize);

impl QubitId {
    /// Create a new qubit identifier
    #[inline]
    pub const fn new(id: usize) -> Self {
        Self(id)
    }

    /// Get the underlying index
    #[inline]
    pub const fn index(&self) -> usize {
        self.0
    }

    /// Single-bit mask selecting this qubit in an amplitude index
    #[inline]
    pub const fn bit(&self) -> usize {
        1 << self.0
    }
}

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

impl From<usize> for QubitId {
    #[inline]
    fn from(id: usize) -> Self {
        Self::new(id)
    }
}

impl From<QubitId> for usize {
    #[inline]
    fn from(qid: QubitId) -> Self {
        qid.index()
    }
}

/// Short growable list of qubit ids
///
/// Gates rarely touch more than a handful of qubits, so the first four ids
/// live inline.
pub type QubitList = SmallVec<[QubitId; 4]>;

/// Collect raw ids into a [`QubitList`]
pub fn qubit_list<I>(ids: I) -> QubitList
where
    I: IntoIterator,
    I::Item: Into<QubitId>,
{
    ids.into_iter().map(Into::into).collect()
}

/// Set of qubits encoded as a bit mask (bit `b` set = qubit `b` selected)
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct QubitMask(u64);

impl QubitMask {
    /// Mask with no qubit selected
    pub const EMPTY: Self = Self(0);

    /// Wrap raw mask bits
    #[inline]
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    /// Mask selecting qubits `0..num_qubits`
    pub fn all(num_qubits: usize) -> Self {
        if num_qubits >= 64 {
            Self(u64::MAX)
        } else {
            Self((1u64 << num_qubits) - 1)
        }
    }

    /// Build a mask from qubit ids
    ///
    /// # Errors
    /// Returns an error if an id does not fit in 64 bits or is repeated.
    pub fn from_qubits<I>(ids: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<QubitId>,
    {
        let mut bits = 0u64;
        for id in ids {
            let id = id.into();
            if id.index() >= 64 {
                return Err(QuantumError::qubit_out_of_range(id, 64));
            }
            let bit = 1u64 << id.index();
            if bits & bit != 0 {
                return Err(QuantumError::DuplicateQubit(id));
            }
            bits |= bit;
        }
        Ok(Self(bits))
    }

    /// Raw mask bits
    #[inline]
    pub const fn bits(&self) -> u64 {
        self.0
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Number of selected qubits
    #[inline]
    pub const fn count(&self) -> usize {
        self.0.count_ones() as usize
    }

    #[inline]
    pub fn contains(&self, qubit: QubitId) -> bool {
        qubit.index() < 64 && self.0 & (1u64 << qubit.index()) != 0
    }

    /// Whether every selected qubit exists in a register of `num_qubits`
    pub fn fits(&self, num_qubits: usize) -> bool {
        self.0 & !Self::all(num_qubits).0 == 0
    }

    /// Selected qubits in ascending id order
    pub fn iter(&self) -> impl Iterator<Item = QubitId> {
        let mut rest = self.0;
        std::iter::from_fn(move || {
            if rest == 0 {
                None
            } else {
                let id = rest.trailing_zeros() as usize;
                rest &= rest - 1;
                Some(QubitId::new(id))
            }
        })
    }
}

impl From<u64> for QubitMask {
    fn from(bits: u64) -> Self {
        Self(bits)
    }
}

impl fmt::Display for QubitMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#b}", self.0)
    }
}
