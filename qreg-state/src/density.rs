//! Density operators of registers

use crate::register::Register;
use qreg_core::{QuantumError, QubitMask, Result};
use qreg_funmatrix::FunMatrix;

impl Register {
    /// Density operator |ψ⟩⟨ψ| of this register
    ///
    /// The amplitudes are copied into the operator, which stays valid after
    /// the register is dropped. Elements are computed on demand.
    pub fn density(&self) -> FunMatrix {
        tracing::debug!(num_qubits = self.num_qubits(), "density operator");
        FunMatrix::outer_product(self.amplitudes().to_vec())
    }

    /// Density operator with every qubit in `traced` summed out
    ///
    /// The remaining qubits keep their relative order. Qubits are traced from
    /// the highest id down so every id still addresses its original qubit.
    ///
    /// # Errors
    /// Returns [`QuantumError::InvalidMask`] if `traced` selects qubits not
    /// below n.
    pub fn reduced_density(&self, traced: QubitMask) -> Result<FunMatrix> {
        if !traced.fits(self.num_qubits()) {
            return Err(QuantumError::InvalidMask {
                mask: traced.bits(),
                num_qubits: self.num_qubits(),
            });
        }

        let mut ids: Vec<_> = traced.iter().collect();
        ids.reverse();
        ids.into_iter()
            .try_fold(self.density(), |rho, qubit| rho.partial_trace(qubit))
    }
}
