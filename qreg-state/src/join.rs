//! Tensor composition of registers

use crate::register::{check_qubits, Register};
use num_complex::Complex64;
use qreg_core::{Parallelism, Result, ThreadCount};

impl Register {
    /// Tensor product `self ⊗ other`
    ///
    /// The joined register has `self.num_qubits() + other.num_qubits()`
    /// qubits. `other` keeps its qubit ids and `self`'s qubits are shifted up
    /// by `other.num_qubits()`, so the amplitude at `i * 2^m + j` is
    /// `self[i] * other[j]` (m = `other.num_qubits()`).
    ///
    /// # Errors
    /// Returns [`QuantumError::TooManyQubits`](qreg_core::QuantumError) if the
    /// combined register would be too large.
    pub fn join(&self, other: &Register, threads: ThreadCount) -> Result<Register> {
        let num_qubits = self.num_qubits() + other.num_qubits();
        check_qubits(num_qubits)?;
        let par = Parallelism::new(threads)?;

        tracing::debug!(
            high = self.num_qubits(),
            low = other.num_qubits(),
            workers = par.workers(),
            "join registers"
        );

        let high = self.amplitudes();
        let low = other.amplitudes();
        let shift = other.num_qubits();
        let low_mask = low.len() - 1;

        let mut out = vec![Complex64::new(0.0, 0.0); 1 << num_qubits];
        par.fill(&mut out, |i| high[i >> shift] * low[i & low_mask]);

        Ok(Register::from_parts(num_qubits, out))
    }
}
