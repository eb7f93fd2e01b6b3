//! Measurement: collapse, determinism and outcome statistics

mod common;

use approx::assert_relative_eq;
use common::*;
use qreg_state::{ErrorKind, QuantumError, QubitMask, Register, ThreadCount};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::borrow::Cow;

#[test]
fn test_empty_mask_returns_same_register() {
    let reg = rotated(&[0.3, 1.2, 2.0], ThreadCount::SINGLE);
    let m = reg.measure(QubitMask::EMPTY, &[], ThreadCount::default()).unwrap();

    assert!(matches!(m.register, Cow::Borrowed(r) if std::ptr::eq(r, &reg)));
    assert_eq!(m.register.num_qubits(), 3);
    assert_eq!(m.register.amplitudes(), reg.amplitudes());
    assert_eq!(m.outcomes, vec![None; 3]);
}

#[test]
fn test_full_measurement_of_basis_states() {
    let mut rng = StdRng::seed_from_u64(7);

    for pattern in 0..16usize {
        let reg = (0..4)
            .filter(|b| pattern >> b & 1 == 1)
            .fold(Register::new(4).unwrap(), |reg, b| apply1(&reg, &pauli_x(), b, ThreadCount::SINGLE));

        for _ in 0..5 {
            let draws: Vec<f64> = (0..4).map(|_| rng.gen()).collect();
            let m = reg.measure(QubitMask::all(4), &draws, ThreadCount::SINGLE).unwrap();

            assert_eq!(m.outcome_bits(), pattern as u64);
            assert_eq!(m.register.num_qubits(), 0);
            let err = m.register.get(0, false).unwrap_err();
            assert_eq!(err, QuantumError::EmptyRegister);
            assert_eq!(err.kind(), ErrorKind::EmptyRegistry);
        }
    }
}

#[test]
fn test_measure_one_qubit_at_a_time() {
    // GHZ state: every qubit agrees with the first one measured
    let reg = apply1(&Register::new(3).unwrap(), &hadamard(), 0, ThreadCount::SINGLE);
    let reg = reg.apply(&pauli_x(), &[q(1)], &[q(0)], &[], ThreadCount::SINGLE).unwrap();
    let reg = reg.apply(&pauli_x(), &[q(2)], &[q(1)], &[], ThreadCount::SINGLE).unwrap();

    let first = reg.measure(QubitMask::from_bits(0b010), &[0.3], ThreadCount::SINGLE).unwrap();
    assert_eq!(first.outcomes, vec![None, Some(true), None]);

    let rest = first.register.measure(QubitMask::all(2), &[0.99, 0.99], ThreadCount::SINGLE).unwrap();
    assert_eq!(rest.outcomes, vec![Some(true), Some(true)]);
}

#[test]
fn test_collapsed_register_is_normalized() {
    let reg = rotated(&[0.4, 1.7, 2.6, 1.1], ThreadCount::SINGLE);
    let m = reg.measure(QubitMask::from_bits(0b0101), &[0.5, 0.2], ThreadCount::SINGLE).unwrap();
    assert_eq!(m.register.num_qubits(), 2);
    assert_relative_eq!(m.register.norm(), 1.0, epsilon = EPSILON);

    // Unmeasured qubits of a product state are undisturbed
    let remaining = m.into_register();
    assert_relative_eq!(
        remaining.prob(q(0), ThreadCount::SINGLE).unwrap(),
        (1.7f64 / 2.0).sin().powi(2),
        epsilon = 1e-12
    );
    assert_relative_eq!(
        remaining.prob(q(1), ThreadCount::SINGLE).unwrap(),
        (1.1f64 / 2.0).sin().powi(2),
        epsilon = 1e-12
    );
}

#[test]
fn test_outcome_threshold() {
    // p(1) = sin²(θ/2) = 0.25
    let theta = 2.0 * 0.5f64.asin();
    let reg = rotated(&[theta], ThreadCount::SINGLE);

    let below = reg.measure(QubitMask::all(1), &[0.2499], ThreadCount::SINGLE).unwrap();
    assert_eq!(below.outcome(q(0)), Some(true));

    let above = reg.measure(QubitMask::all(1), &[0.2501], ThreadCount::SINGLE).unwrap();
    assert_eq!(above.outcome(q(0)), Some(false));
}

#[test]
fn test_measure_with_rng_is_reproducible() {
    let reg = rotated(&[0.9, 1.4, 2.2, 0.6, 1.9], ThreadCount::SINGLE);
    let mask = QubitMask::from_bits(0b10110);

    let a = reg
        .measure_with_rng(mask, &mut StdRng::seed_from_u64(42), ThreadCount::SINGLE)
        .unwrap();
    let b = reg
        .measure_with_rng(mask, &mut StdRng::seed_from_u64(42), ThreadCount::fixed(2).unwrap())
        .unwrap();

    assert_eq!(a.outcomes, b.outcomes);
    assert_amplitudes_eq(a.register.amplitudes(), b.register.amplitudes(), 1e-14);
}

#[test]
fn test_measure_agrees_across_worker_counts() {
    // 2^14 amplitudes: the reductions and the gather split across workers
    let angles: Vec<f64> = (0..14).map(|i| 0.2 + 0.17 * i as f64).collect();
    let reg = rotated(&angles, ThreadCount::SINGLE)
        .apply(&pauli_x(), &[q(7)], &[q(5)], &[], ThreadCount::SINGLE)
        .unwrap();
    // p(1) for q0, q5, q11 is about 0.01, 0.25, 0.74
    let mask = QubitMask::from_bits(0b1000_0010_0001);
    let draws = [0.3, 0.6, 0.1];

    let serial = reg.measure(mask, &draws, ThreadCount::SINGLE).unwrap();
    assert_eq!(serial.outcome_bits(), 1 << 11);
    assert_eq!(serial.register.num_qubits(), 11);

    for workers in [2, 4] {
        let parallel = reg.measure(mask, &draws, ThreadCount::fixed(workers).unwrap()).unwrap();
        assert_eq!(parallel.outcomes, serial.outcomes);
        assert_amplitudes_eq(parallel.register.amplitudes(), serial.register.amplitudes(), 1e-14);
    }
}

#[test]
fn test_outcome_frequencies_follow_probabilities() {
    let angles = [0.6, 1.6, 2.4];
    let reg = rotated(&angles, ThreadCount::SINGLE);
    let mut rng = StdRng::seed_from_u64(2024);

    let shots = 4000;
    let mut ones = [0usize; 3];
    for _ in 0..shots {
        let m = reg.measure_with_rng(QubitMask::all(3), &mut rng, ThreadCount::SINGLE).unwrap();
        for (count, outcome) in ones.iter_mut().zip(&m.outcomes) {
            if *outcome == Some(true) {
                *count += 1;
            }
        }
    }

    for (i, theta) in angles.iter().enumerate() {
        let expected = (theta / 2.0).sin().powi(2);
        let observed = ones[i] as f64 / shots as f64;
        assert!((observed - expected).abs() < 0.04, "qubit {i}: {observed} vs {expected}");
    }
}

#[test]
fn test_canonical_read_after_measurement() {
    let reg = apply1(&rotated(&[1.0, 2.0, 0.5], ThreadCount::SINGLE), &global_phase(2.1), 0, ThreadCount::SINGLE);
    let m = reg.measure(QubitMask::from_bits(0b001), &[0.9], ThreadCount::SINGLE).unwrap();

    let raw = m.register.get(0, false).unwrap();
    let canonical = m.register.get(0, true).unwrap();
    assert_relative_eq!(canonical.im, 0.0, epsilon = EPSILON);
    assert_relative_eq!(canonical.re, raw.norm(), epsilon = EPSILON);
}

#[test]
fn test_measurement_input_errors() {
    let reg = Register::new(2).unwrap();
    assert_eq!(
        reg.measure(QubitMask::from_bits(0b111), &[0.1, 0.1, 0.1], ThreadCount::SINGLE)
            .unwrap_err()
            .kind(),
        ErrorKind::InvalidArgument
    );
    assert!(matches!(
        reg.measure(QubitMask::all(2), &[], ThreadCount::SINGLE),
        Err(QuantumError::MissingDraws { expected: 2, actual: 0 })
    ));
    assert!(matches!(
        reg.measure(QubitMask::all(2), &[0.1, f64::NAN], ThreadCount::SINGLE),
        Err(QuantumError::InvalidDraw(_))
    ));
}
