//! Gates and helpers shared by the integration tests

#![allow(dead_code)]

use num_complex::Complex64;
use qreg_state::{Gate, QubitId, Register, ThreadCount};

pub const EPSILON: f64 = 1e-13;

pub fn c(re: f64, im: f64) -> Complex64 {
    Complex64::new(re, im)
}

pub fn q(id: usize) -> QubitId {
    QubitId::new(id)
}

pub fn hadamard() -> Gate {
    let h = std::f64::consts::FRAC_1_SQRT_2;
    Gate::from_rows(1, &[vec![c(h, 0.0), c(h, 0.0)], vec![c(h, 0.0), c(-h, 0.0)]]).unwrap()
}

pub fn pauli_x() -> Gate {
    Gate::from_rows(1, &[vec![c(0.0, 0.0), c(1.0, 0.0)], vec![c(1.0, 0.0), c(0.0, 0.0)]]).unwrap()
}

/// Rotation about Y: |0⟩ → cos(θ/2)|0⟩ + sin(θ/2)|1⟩
pub fn ry(theta: f64) -> Gate {
    let (s, co) = (theta / 2.0).sin_cos();
    Gate::from_rows(1, &[vec![c(co, 0.0), c(-s, 0.0)], vec![c(s, 0.0), c(co, 0.0)]]).unwrap()
}

/// e^{iθ}·I: changes nothing observable
pub fn global_phase(theta: f64) -> Gate {
    let p = Complex64::from_polar(1.0, theta);
    Gate::from_rows(1, &[vec![p, c(0.0, 0.0)], vec![c(0.0, 0.0), p]]).unwrap()
}

pub fn apply1(reg: &Register, gate: &Gate, target: usize, threads: ThreadCount) -> Register {
    reg.apply(gate, &[q(target)], &[], &[], threads).unwrap()
}

/// Product state with qubit i rotated by `angles[i]` about Y
pub fn rotated(angles: &[f64], threads: ThreadCount) -> Register {
    angles
        .iter()
        .enumerate()
        .fold(Register::new(angles.len()).unwrap(), |reg, (i, &theta)| {
            apply1(&reg, &ry(theta), i, threads)
        })
}

/// Row-major Kronecker product of two vectors, first operand high
pub fn kron_vec(a: &[Complex64], b: &[Complex64]) -> Vec<Complex64> {
    a.iter().flat_map(|x| b.iter().map(move |y| x * y)).collect()
}

pub fn assert_amplitudes_eq(actual: &[Complex64], expected: &[Complex64], tol: f64) {
    assert_eq!(actual.len(), expected.len());
    for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
        assert!((a - e).norm() <= tol, "amplitude {i}: {a} != {e}");
    }
}
