// tests/simulation_tests.rs

// Import necessary types from the qwalk crate
use qwalk::{Circuit, CircuitBuilder, Gate, Simulator, StateVector, WalkError};

use std::f64::consts::{FRAC_1_SQRT_2, PI};

const TOLERANCE: f64 = 1e-12;

// Helper to run a circuit from |0…0⟩
fn run(circuit: &Circuit) -> Result<StateVector, WalkError> {
    Simulator::new().run(circuit)
}

// Helper function to check the probability of a basis state
fn check_probability(state: &StateVector, index: usize, expected: f64) {
    let actual = state.probability_of(index);
    assert!(
        (actual - expected).abs() < TOLERANCE,
        "P(|{:b}>) = {}, expected {}",
        index,
        actual,
        expected
    );
}

#[test]
fn test_empty_circuit() -> Result<(), WalkError> {
    let circuit = CircuitBuilder::new(2).build()?;
    let state = run(&circuit)?;

    check_probability(&state, 0, 1.0);
    assert!(circuit.is_empty());
    Ok(())
}

#[test]
fn test_barrier_is_a_no_op() -> Result<(), WalkError> {
    let mut builder = CircuitBuilder::new(2);
    builder.hadamard(0).barrier([0, 1]);
    let with_barrier = run(&builder.build()?)?;

    let mut builder = CircuitBuilder::new(2);
    builder.hadamard(0);
    let without = run(&builder.build()?)?;

    assert_eq!(with_barrier, without);
    Ok(())
}

#[test]
fn test_flip_operation() -> Result<(), WalkError> {
    let circuit = CircuitBuilder::new(1).add_op(Gate::Flip { target: 0 }).build()?;
    let state = run(&circuit)?;

    // Started in |0>, flipped to |1>
    check_probability(&state, 1, 1.0);
    Ok(())
}

#[test]
fn test_phase_operation() -> Result<(), WalkError> {
    let circuit = CircuitBuilder::new(1)
        .add_ops([Gate::Hadamard { target: 0 }, Gate::Phase { target: 0, theta: PI / 2.0 }])
        .build()?;
    let state = run(&circuit)?;

    // (|0> + i|1>) / sqrt(2)
    let one = state.vector()[1];
    assert!(one.re.abs() < TOLERANCE);
    assert!((one.im - FRAC_1_SQRT_2).abs() < TOLERANCE);
    check_probability(&state, 0, 0.5);
    Ok(())
}

#[test]
fn test_rotation_operation() -> Result<(), WalkError> {
    let circuit = CircuitBuilder::new(1).add_op(Gate::Rotation { target: 0, theta: PI }).build()?;
    let state = run(&circuit)?;

    // Ry(π)|0> = |1>
    check_probability(&state, 1, 1.0);
    Ok(())
}

#[test]
fn test_controlled_not_control0() -> Result<(), WalkError> {
    let circuit = CircuitBuilder::new(2)
        .add_op(Gate::ControlledNot { control: 0, target: 1 })
        .build()?;
    // Control |0>, target untouched
    check_probability(&run(&circuit)?, 0b00, 1.0);
    Ok(())
}

#[test]
fn test_controlled_not_control1() -> Result<(), WalkError> {
    let circuit = CircuitBuilder::new(2)
        .add_ops([Gate::Flip { target: 0 }, Gate::ControlledNot { control: 0, target: 1 }])
        .build()?;
    // |01> -> |11> in little-endian basis indices
    check_probability(&run(&circuit)?, 0b11, 1.0);
    Ok(())
}

#[test]
fn test_controlled_phase_is_symmetric() -> Result<(), WalkError> {
    let prepare = [Gate::Hadamard { target: 0 }, Gate::Hadamard { target: 1 }];
    let a = CircuitBuilder::new(2)
        .add_ops(prepare.clone())
        .add_op(Gate::ControlledPhase { control: 0, target: 1, theta: 0.3 })
        .build()?;
    let b = CircuitBuilder::new(2)
        .add_ops(prepare)
        .add_op(Gate::ControlledPhase { control: 1, target: 0, theta: 0.3 })
        .build()?;

    let (sa, sb) = (run(&a)?, run(&b)?);
    for (x, y) in sa.vector().iter().zip(sb.vector()) {
        assert!((x - y).norm() < TOLERANCE);
    }
    Ok(())
}

#[test]
fn test_gate_inverse_undoes_gate() -> Result<(), WalkError> {
    let gates = vec![
        Gate::Hadamard { target: 0 },
        Gate::Rotation { target: 1, theta: 0.9 },
        Gate::ControlledPhase { control: 0, target: 1, theta: 1.7 },
        Gate::Phase { target: 1, theta: -0.4 },
        Gate::ControlledNot { control: 1, target: 0 },
    ];
    let inverse: Vec<Gate> = gates.iter().rev().map(Gate::inverse).collect();
    let circuit = CircuitBuilder::new(2).add_ops(gates).add_ops(inverse).build()?;

    check_probability(&run(&circuit)?, 0, 1.0);
    Ok(())
}

#[test]
fn test_out_of_range_qubit() {
    let result = CircuitBuilder::new(2).add_op(Gate::Hadamard { target: 2 }).build();

    match result {
        Err(WalkError::QubitOutOfRange { qubit, num_qubits }) => {
            assert_eq!(qubit, 2);
            assert_eq!(num_qubits, 2);
        }
        Ok(_) => panic!("Expected QubitOutOfRange error, but got Ok"),
        Err(e) => panic!("Expected QubitOutOfRange error, but got different error: {:?}", e),
    }
}

#[test]
fn test_run_from_rejects_wrong_dimension() -> Result<(), WalkError> {
    let circuit = CircuitBuilder::new(3).build()?;
    let result = Simulator::new().run_from(&circuit, StateVector::zero(2)?);
    assert!(matches!(result, Err(WalkError::Incoherence { .. })));
    Ok(())
}
