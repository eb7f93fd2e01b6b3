//! Register: the amplitude vector of an n-qubit state
//!
//! Amplitude index `i` is read as an n-bit pattern where bit `b` is the value
//! of qubit `b` (little endian). Every operation in this crate uses that
//! convention.

use num_complex::Complex64;
use qreg_core::{Parallelism, QuantumError, Result, ThreadCount, MAX_QUBITS};
use std::fmt;
use std::sync::OnceLock;

/// State vector of an n-qubit register
///
/// Engine operations never modify a register in place: [`Register::apply`],
/// [`Register::join`] and [`Register::measure`] read their inputs and return
/// new registers. A register with zero qubits is what remains after every
/// qubit has been measured; it still carries the global phase of the
/// realized branch but has no readable amplitudes.
///
/// # Example
/// ```
/// use qreg_state::Register;
/// use num_complex::Complex64;
///
/// let reg = Register::new(2).unwrap();
/// assert_eq!(reg.dimension(), 4);
/// assert_eq!(reg.get(0, false).unwrap(), Complex64::new(1.0, 0.0));
/// ```
///
/// [`Register::apply`]: crate::Register::apply
/// [`Register::join`]: crate::Register::join
/// [`Register::measure`]: crate::Register::measure
#[derive(Clone)]
pub struct Register {
    num_qubits: usize,
    amplitudes: Vec<Complex64>,
    /// e^{-iθ} with θ = arg(amplitudes[0]), computed on first canonical read
    phase: OnceLock<Complex64>,
}

impl Register {
    /// Create an `num_qubits` register in |0…0⟩
    ///
    /// # Errors
    /// Returns [`QuantumError::TooManyQubits`] above [`MAX_QUBITS`].
    pub fn new(num_qubits: usize) -> Result<Self> {
        check_qubits(num_qubits)?;
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); 1 << num_qubits];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Ok(Self::from_parts(num_qubits, amplitudes))
    }

    /// Create a register holding the given amplitudes
    ///
    /// The amplitudes are taken as they are: normalizing them is the
    /// caller's job, and operations on an unnormalized register give
    /// numerically meaningless (but memory safe) results.
    ///
    /// # Errors
    /// Returns [`QuantumError::DimensionMismatch`] if `amplitudes` does not
    /// hold exactly 2^`num_qubits` values.
    pub fn from_amplitudes(num_qubits: usize, amplitudes: Vec<Complex64>) -> Result<Self> {
        check_qubits(num_qubits)?;
        let expected = 1usize << num_qubits;
        if amplitudes.len() != expected {
            return Err(QuantumError::DimensionMismatch {
                expected,
                actual: amplitudes.len(),
            });
        }
        Ok(Self::from_parts(num_qubits, amplitudes))
    }

    pub(crate) fn from_parts(num_qubits: usize, amplitudes: Vec<Complex64>) -> Self {
        debug_assert_eq!(amplitudes.len(), 1 << num_qubits);
        Self {
            num_qubits,
            amplitudes,
            phase: OnceLock::new(),
        }
    }

    /// Number of qubits
    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Number of amplitudes (2^n)
    #[inline]
    pub fn dimension(&self) -> usize {
        self.amplitudes.len()
    }

    /// Raw amplitude vector
    #[inline]
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    pub fn into_amplitudes(self) -> Vec<Complex64> {
        self.amplitudes
    }

    /// Amplitude at `index`
    ///
    /// With `canonical` set, the amplitude is multiplied by e^{-iθ} where θ is
    /// the argument of amplitude 0. Two states that differ only by a global
    /// phase then read the same.
    ///
    /// # Errors
    /// - [`QuantumError::EmptyRegister`] on a zero-qubit register
    /// - [`QuantumError::IndexOutOfRange`] if `index` is not below 2^n
    pub fn get(&self, index: usize, canonical: bool) -> Result<Complex64> {
        if self.num_qubits == 0 {
            return Err(QuantumError::EmptyRegister);
        }
        let amp = self
            .amplitudes
            .get(index)
            .copied()
            .ok_or_else(|| QuantumError::index_out_of_range(index, self.dimension()))?;
        if canonical {
            Ok(amp * self.canonical_phase())
        } else {
            Ok(amp)
        }
    }

    /// Factor that rotates amplitude 0 onto the non-negative real axis
    ///
    /// Equal to 1 when amplitude 0 is zero.
    pub fn canonical_phase(&self) -> Complex64 {
        *self.phase.get_or_init(|| {
            let first = self.amplitudes[0];
            // arg(-0.0) is π, so test the magnitude rather than the sign
            if first.norm_sqr() == 0.0 {
                Complex64::new(1.0, 0.0)
            } else {
                Complex64::from_polar(1.0, -first.arg())
            }
        })
    }

    /// Whole amplitude vector with the global phase removed
    pub fn canonical_amplitudes(&self) -> Vec<Complex64> {
        let phase = self.canonical_phase();
        self.amplitudes.iter().map(|a| a * phase).collect()
    }

    /// Euclidean norm of the amplitude vector
    pub fn norm(&self) -> f64 {
        self.amplitudes.iter().map(|a| a.norm_sqr()).sum::<f64>().sqrt()
    }

    /// Probability of every basis state, |amplitude|²
    pub fn probabilities(&self, threads: ThreadCount) -> Result<Vec<f64>> {
        let par = Parallelism::new(threads)?;
        let mut out = vec![0.0; self.dimension()];
        par.fill(&mut out, |i| self.amplitudes[i].norm_sqr());
        Ok(out)
    }
}

pub(crate) fn check_qubits(num_qubits: usize) -> Result<()> {
    if num_qubits > MAX_QUBITS {
        return Err(QuantumError::TooManyQubits {
            requested: num_qubits,
            max: MAX_QUBITS,
        });
    }
    Ok(())
}

impl fmt::Debug for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Register")
            .field("num_qubits", &self.num_qubits)
            .field("dimension", &self.dimension())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const EPSILON: f64 = 1e-13;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    #[test]
    fn test_new_is_all_zero_state() {
        for n in 0..6 {
            let reg = Register::new(n).unwrap();
            assert_eq!(reg.dimension(), 1 << n);
            assert_eq!(reg.amplitudes()[0], c(1.0, 0.0));
            assert!(reg.amplitudes()[1..].iter().all(|a| *a == c(0.0, 0.0)));
            assert_relative_eq!(reg.norm(), 1.0);
        }
    }

    #[test]
    fn test_too_many_qubits() {
        assert_eq!(
            Register::new(MAX_QUBITS + 1).unwrap_err(),
            QuantumError::TooManyQubits {
                requested: MAX_QUBITS + 1,
                max: MAX_QUBITS
            }
        );
    }

    #[test]
    fn test_from_amplitudes_checks_length() {
        let err = Register::from_amplitudes(2, vec![c(1.0, 0.0); 3]).unwrap_err();
        assert_eq!(err, QuantumError::DimensionMismatch { expected: 4, actual: 3 });

        let h = std::f64::consts::FRAC_1_SQRT_2;
        let reg = Register::from_amplitudes(1, vec![c(h, 0.0), c(0.0, h)]).unwrap();
        assert_eq!(reg.get(1, false).unwrap(), c(0.0, h));
    }

    #[test]
    fn test_get_bounds() {
        let reg = Register::new(2).unwrap();
        assert_eq!(reg.get(4, false), Err(QuantumError::index_out_of_range(4, 4)));
        assert_eq!(reg.get(4, true).unwrap_err().kind(), qreg_core::ErrorKind::IndexError);
    }

    #[test]
    fn test_zero_qubit_register_is_unreadable() {
        let reg = Register::new(0).unwrap();
        assert_eq!(reg.dimension(), 1);
        assert_eq!(reg.get(0, false), Err(QuantumError::EmptyRegister));
        assert_eq!(reg.get(0, true), Err(QuantumError::EmptyRegister));
    }

    #[test]
    fn test_canonical_removes_global_phase() {
        let phase = Complex64::from_polar(1.0, 1.234);
        let h = std::f64::consts::FRAC_1_SQRT_2;
        let reg = Register::from_amplitudes(1, vec![c(h, 0.0) * phase, c(0.0, h) * phase]).unwrap();

        let a0 = reg.get(0, true).unwrap();
        let a1 = reg.get(1, true).unwrap();
        assert_relative_eq!(a0.re, h, epsilon = EPSILON);
        assert_relative_eq!(a0.im, 0.0, epsilon = EPSILON);
        assert_relative_eq!(a1.re, 0.0, epsilon = EPSILON);
        assert_relative_eq!(a1.im, h, epsilon = EPSILON);

        let all = reg.canonical_amplitudes();
        assert_relative_eq!(all[1].im, h, epsilon = EPSILON);
    }

    #[test]
    fn test_canonical_phase_with_zero_first_amplitude() {
        let reg = Register::from_amplitudes(1, vec![c(0.0, 0.0), c(0.0, 1.0)]).unwrap();
        assert_eq!(reg.canonical_phase(), c(1.0, 0.0));
        assert_eq!(reg.get(1, true).unwrap(), c(0.0, 1.0));
    }

    #[test]
    fn test_canonical_phase_with_negative_zero_first_amplitude() {
        let h = std::f64::consts::FRAC_1_SQRT_2;
        let signed = Register::from_amplitudes(1, vec![c(-0.0, 0.0), c(-h, 0.0)]).unwrap();
        let unsigned = Register::from_amplitudes(1, vec![c(0.0, 0.0), c(-h, 0.0)]).unwrap();

        assert_eq!(signed.canonical_phase(), c(1.0, 0.0));
        assert_eq!(signed.canonical_amplitudes(), unsigned.canonical_amplitudes());
    }

    #[test]
    fn test_probabilities() {
        let reg = Register::from_amplitudes(1, vec![c(0.6, 0.0), c(0.0, 0.8)]).unwrap();
        let p = reg.probabilities(ThreadCount::SINGLE).unwrap();
        assert_relative_eq!(p[0], 0.36, epsilon = EPSILON);
        assert_relative_eq!(p[1], 0.64, epsilon = EPSILON);
    }
}
