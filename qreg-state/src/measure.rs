//! Measurement with collapse, and non-destructive probabilities
//!
//! Randomness is always supplied by the caller, either as pre-drawn uniform
//! samples ([`Register::measure`]) or as a generator
//! ([`Register::measure_with_rng`]). With the same inputs a measurement
//! always yields the same outcomes.
//!
//! Masked qubits are measured one at a time in ascending id order. For each
//! one, the probability p that it reads 1 is computed conditioned on the
//! outcomes already fixed in this call; the next draw r gives outcome 1 iff
//! r < p. The surviving amplitudes are then gathered into a register over the
//! unmeasured qubits (which keep their relative order) and renormalized.

use crate::register::Register;
use num_complex::Complex64;
use qreg_core::{Parallelism, QuantumError, QubitId, QubitMask, Result, ThreadCount};
use rand::Rng;
use smallvec::SmallVec;
use std::borrow::Cow;

/// Result of [`Register::measure`]
#[derive(Debug, Clone)]
pub struct Measurement<'a> {
    /// Register over the unmeasured qubits
    ///
    /// Borrowed (the very same register that was measured) when the mask was
    /// empty; owned otherwise.
    pub register: Cow<'a, Register>,
    /// Outcome per original qubit id; `None` for qubits not measured
    pub outcomes: Vec<Option<bool>>,
}

impl Measurement<'_> {
    /// Outcome of `qubit`, if it was measured
    pub fn outcome(&self, qubit: impl Into<QubitId>) -> Option<bool> {
        self.outcomes.get(qubit.into().index()).copied().flatten()
    }

    /// Measured outcomes packed into an integer (bit b = qubit b)
    pub fn outcome_bits(&self) -> u64 {
        self.outcomes
            .iter()
            .enumerate()
            .filter(|(_, o)| **o == Some(true))
            .fold(0, |acc, (b, _)| acc | 1 << b)
    }

    /// Take the collapsed register, cloning it if it was borrowed
    pub fn into_register(self) -> Register {
        self.register.into_owned()
    }
}

impl Register {
    /// Measure the qubits selected by `mask`, collapsing the state
    ///
    /// `draws` supplies one uniform sample in [0, 1) per selected qubit, used
    /// in ascending qubit order. An empty mask returns `self` unchanged (as a
    /// borrow, so identity is preserved) and no outcomes.
    ///
    /// # Errors
    /// - [`QuantumError::InvalidMask`] if the mask selects qubits not below n
    /// - [`QuantumError::MissingDraws`] if there are fewer draws than
    ///   selected qubits
    /// - [`QuantumError::InvalidDraw`] for a used draw outside [0, 1)
    ///
    /// # Example
    /// ```
    /// use qreg_core::{QubitMask, ThreadCount};
    /// use qreg_state::Register;
    ///
    /// let reg = Register::new(3).unwrap();
    /// let m = reg.measure(QubitMask::from_bits(0b101), &[0.3, 0.9], ThreadCount::SINGLE).unwrap();
    /// assert_eq!(m.outcomes, vec![Some(false), None, Some(false)]);
    /// assert_eq!(m.register.num_qubits(), 1);
    /// ```
    pub fn measure(&self, mask: QubitMask, draws: &[f64], threads: ThreadCount) -> Result<Measurement<'_>> {
        let n = self.num_qubits();
        if mask.is_empty() {
            return Ok(Measurement {
                register: Cow::Borrowed(self),
                outcomes: vec![None; n],
            });
        }
        if !mask.fits(n) {
            return Err(QuantumError::InvalidMask {
                mask: mask.bits(),
                num_qubits: n,
            });
        }

        let wanted = mask.count();
        if draws.len() < wanted {
            return Err(QuantumError::MissingDraws {
                expected: wanted,
                actual: draws.len(),
            });
        }
        if draws.len() > wanted {
            tracing::warn!(wanted, supplied = draws.len(), "ignoring surplus measurement draws");
        }
        let draws = &draws[..wanted];
        if let Some(&bad) = draws.iter().find(|r| !(0.0..1.0).contains(*r)) {
            return Err(QuantumError::InvalidDraw(bad));
        }

        let par = Parallelism::new(threads)?;
        let amps = self.amplitudes();

        // Bits fixed so far and their values
        let mut fixed_mask = 0usize;
        let mut fixed_value = 0usize;
        let mut branch = 1.0;
        let mut outcomes = vec![None; n];

        for (qubit, &r) in mask.iter().zip(draws) {
            let bit = qubit.bit();
            let (p_branch, p_one) = par.map_reduce(
                amps.len(),
                (0.0, 0.0),
                |i| {
                    if i & fixed_mask != fixed_value {
                        return (0.0, 0.0);
                    }
                    let p = amps[i].norm_sqr();
                    if i & bit != 0 {
                        (p, p)
                    } else {
                        (p, 0.0)
                    }
                },
                |a, b| (a.0 + b.0, a.1 + b.1),
            );

            let p = if p_branch > 0.0 { p_one / p_branch } else { 0.0 };
            let outcome = r < p;
            tracing::trace!(%qubit, p, r, outcome, "measured qubit");

            fixed_mask |= bit;
            if outcome {
                fixed_value |= bit;
            }
            branch = if outcome { p_one } else { p_branch - p_one };
            outcomes[qubit.index()] = Some(outcome);
        }

        let register = collapse(amps, n, fixed_mask, fixed_value, branch, &par);
        tracing::debug!(
            num_qubits = n,
            measured = wanted,
            remaining = register.num_qubits(),
            workers = par.workers(),
            "measure"
        );

        Ok(Measurement {
            register: Cow::Owned(register),
            outcomes,
        })
    }

    /// Measure the qubits selected by `mask`, drawing samples from `rng`
    ///
    /// Exactly one `f64` is drawn per selected qubit, then this behaves like
    /// [`Register::measure`].
    pub fn measure_with_rng<R>(&self, mask: QubitMask, rng: &mut R, threads: ThreadCount) -> Result<Measurement<'_>>
    where
        R: Rng + ?Sized,
    {
        let draws: SmallVec<[f64; 8]> = (0..mask.count()).map(|_| rng.gen::<f64>()).collect();
        self.measure(mask, &draws, threads)
    }

    /// Probability that `qubit` would be measured as 1
    ///
    /// The register is not modified.
    ///
    /// # Errors
    /// Returns [`QuantumError::QubitOutOfRange`] if `qubit` is not below n.
    pub fn prob(&self, qubit: impl Into<QubitId>, threads: ThreadCount) -> Result<f64> {
        let qubit = qubit.into();
        if qubit.index() >= self.num_qubits() {
            return Err(QuantumError::qubit_out_of_range(qubit, self.num_qubits()));
        }

        let par = Parallelism::new(threads)?;
        let bit = qubit.bit();
        let amps = self.amplitudes();
        Ok(par.sum(amps.len(), |i| if i & bit != 0 { amps[i].norm_sqr() } else { 0.0 }))
    }
}

/// Gather the amplitudes consistent with `fixed_value` on `fixed_mask` into a
/// register over the remaining qubits, scaled by 1/√`branch`
fn collapse(
    amps: &[Complex64],
    num_qubits: usize,
    fixed_mask: usize,
    fixed_value: usize,
    branch: f64,
    par: &Parallelism,
) -> Register {
    let remaining: SmallVec<[usize; 32]> = (0..num_qubits).filter(|b| fixed_mask >> b & 1 == 0).collect();
    let scale = if branch > 0.0 { 1.0 / branch.sqrt() } else { 1.0 };

    let mut out = vec![Complex64::new(0.0, 0.0); 1 << remaining.len()];
    par.fill(&mut out, |k| {
        let source = remaining
            .iter()
            .enumerate()
            .fold(fixed_value, |acc, (j, &pos)| acc | (k >> j & 1) << pos);
        amps[source] * scale
    });

    Register::from_parts(remaining.len(), out)
}
