//! Gate application
//!
//! Every output amplitude is computed independently from the input vector,
//! so the index space splits across workers with no shared writes:
//!
//! ```text
//! out[i] = Σ_c U[row(i), c] · in[base(i) | spread(c)]   if controls hold
//! out[i] = in[i]                                         otherwise
//! ```
//!
//! where `row(i)` gathers the target bits of `i` (target `k` becomes bit `k`),
//! `base(i)` clears them, and `spread(c)` scatters the bits of column `c`
//! back onto the target positions.

use crate::register::Register;
use num_complex::Complex64;
use qreg_core::{Gate, Parallelism, QuantumError, QubitId, Result, ThreadCount};
use smallvec::SmallVec;

/// Bit layout of one gate application, validated against a register
struct Layout {
    /// Bit position of each target, in gate order
    targets: SmallVec<[usize; 4]>,
    target_mask: usize,
    control_mask: usize,
    anticontrol_mask: usize,
    /// `spread(c)` for every gate column `c`
    offsets: Vec<usize>,
}

impl Layout {
    fn new(
        num_qubits: usize,
        gate: &Gate,
        targets: &[QubitId],
        controls: &[QubitId],
        anticontrols: &[QubitId],
    ) -> Result<Self> {
        if targets.len() != gate.num_qubits() {
            return Err(QuantumError::ArityMismatch {
                expected: gate.num_qubits(),
                actual: targets.len(),
            });
        }

        let mut used = 0usize;
        let mut claim = |qubit: QubitId| -> Result<usize> {
            if qubit.index() >= num_qubits {
                return Err(QuantumError::qubit_out_of_range(qubit, num_qubits));
            }
            if used & qubit.bit() != 0 {
                return Err(QuantumError::DuplicateQubit(qubit));
            }
            used |= qubit.bit();
            Ok(qubit.bit())
        };

        let mut target_mask = 0;
        for &t in targets {
            target_mask |= claim(t)?;
        }
        let mut control_mask = 0;
        for &c in controls {
            control_mask |= claim(c)?;
        }
        let mut anticontrol_mask = 0;
        for &a in anticontrols {
            anticontrol_mask |= claim(a)?;
        }

        let targets: SmallVec<[usize; 4]> = targets.iter().map(|t| t.index()).collect();
        let offsets = (0..gate.dimension())
            .map(|col| {
                targets
                    .iter()
                    .enumerate()
                    .filter(|(k, _)| col >> k & 1 == 1)
                    .fold(0, |acc, (_, &pos)| acc | 1 << pos)
            })
            .collect();

        Ok(Self {
            targets,
            target_mask,
            control_mask,
            anticontrol_mask,
            offsets,
        })
    }

    #[inline]
    fn is_active(&self, i: usize) -> bool {
        i & self.control_mask == self.control_mask && i & self.anticontrol_mask == 0
    }

    #[inline]
    fn row(&self, i: usize) -> usize {
        self.targets
            .iter()
            .enumerate()
            .fold(0, |acc, (k, &pos)| acc | (i >> pos & 1) << k)
    }
}

impl Register {
    /// Apply `gate` to `targets`, conditioned on `controls` (must be 1) and
    /// `anticontrols` (must be 0)
    ///
    /// Target `k` of the list addresses bit `k` of the gate's row and column
    /// indices. Returns a new register; `self` is left untouched. The gate is
    /// used verbatim, so a non-unitary matrix yields an unnormalized result.
    ///
    /// # Arguments
    /// * `gate` - Operator acting on `targets.len()` qubits
    /// * `targets` - Distinct qubits the gate acts on
    /// * `controls` - Qubits that must read 1 (may be empty)
    /// * `anticontrols` - Qubits that must read 0 (may be empty)
    /// * `threads` - Worker configuration
    ///
    /// # Errors
    /// - [`QuantumError::ArityMismatch`] if the gate arity differs from the
    ///   number of targets
    /// - [`QuantumError::QubitOutOfRange`] for ids not below n
    /// - [`QuantumError::DuplicateQubit`] if an id appears twice across the
    ///   three lists
    ///
    /// # Example
    /// ```
    /// use qreg_core::{Gate, QubitId, ThreadCount};
    /// use qreg_state::Register;
    /// use num_complex::Complex64;
    ///
    /// let zero = Complex64::new(0.0, 0.0);
    /// let one = Complex64::new(1.0, 0.0);
    /// let x = Gate::new(1, vec![zero, one, one, zero]).unwrap();
    ///
    /// let reg = Register::new(2).unwrap();
    /// let reg = reg.apply(&x, &[QubitId::new(1)], &[], &[], ThreadCount::default()).unwrap();
    /// assert_eq!(reg.get(0b10, false).unwrap(), one);
    /// ```
    pub fn apply(
        &self,
        gate: &Gate,
        targets: &[QubitId],
        controls: &[QubitId],
        anticontrols: &[QubitId],
        threads: ThreadCount,
    ) -> Result<Register> {
        let layout = Layout::new(self.num_qubits(), gate, targets, controls, anticontrols)?;
        let par = Parallelism::new(threads)?;

        tracing::debug!(
            num_qubits = self.num_qubits(),
            arity = gate.num_qubits(),
            controls = controls.len(),
            anticontrols = anticontrols.len(),
            workers = par.workers(),
            "apply gate"
        );

        let input = self.amplitudes();
        let mut output = vec![Complex64::new(0.0, 0.0); input.len()];
        par.fill(&mut output, |i| {
            if !layout.is_active(i) {
                return input[i];
            }
            let base = i & !layout.target_mask;
            gate.row(layout.row(i))
                .iter()
                .zip(&layout.offsets)
                .map(|(u, &offset)| u * input[base | offset])
                .sum()
        });

        Ok(Register::from_parts(self.num_qubits(), output))
    }
}
