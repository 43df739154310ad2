// tests/walk_tests.rs

use qwalk::walk::{apply_coin, apply_shift, fourier_phase, forward_qft, inverse_qft};
use qwalk::{
    compose, Backend, CircuitBuilder, CoinAngles, Direction, ExecutionRequest, Simulator, StateVector,
    StateVectorBackend, StepSchedule, WalkConfig, WalkError,
};

use approx::assert_relative_eq;
use num_complex::Complex;

const TOLERANCE: f64 = 1e-9;

// Basis index of a walker at `position` (qubit 1 most significant) with the
// given coin bit.
fn walker_index(num_qubits: usize, position: usize, coin: usize) -> usize {
    (1..num_qubits).fold(coin, |acc, q| acc | (((position >> (num_qubits - 1 - q)) & 1) << q))
}

fn translate(num_qubits: usize, direction: Direction) -> Result<CircuitBuilder, WalkError> {
    let mut builder = CircuitBuilder::new(num_qubits);
    inverse_qft(&mut builder, 1..num_qubits)?;
    apply_shift(&mut builder, direction)?;
    forward_qft(&mut builder, 1..num_qubits)?;
    Ok(builder)
}

// Helper to assert a state is a single basis state up to global phase.
fn assert_basis(state: &StateVector, index: usize) {
    assert_relative_eq!(state.probability_of(index), 1.0, epsilon = TOLERANCE);
}

#[test]
fn test_translation_moves_every_position_by_one() -> Result<(), WalkError> {
    for n in 2..=5 {
        let cycle = 1usize << (n - 1);
        let circuit = translate(n, Direction::Plus)?.build()?;
        for position in 0..cycle {
            let start = StateVector::basis(n, walker_index(n, position, 0))?;
            let end = Simulator::new().run_from(&circuit, start)?;
            assert_basis(&end, walker_index(n, (position + 1) % cycle, 0));
        }
    }
    Ok(())
}

#[test]
fn test_minus_translation_moves_back() -> Result<(), WalkError> {
    let n = 4;
    let circuit = translate(n, Direction::Minus)?.build()?;
    let start = StateVector::basis(n, walker_index(n, 0, 0))?;
    let end = Simulator::new().run_from(&circuit, start)?;
    assert_basis(&end, walker_index(n, 7, 0));
    Ok(())
}

#[test]
fn test_coin_one_leaves_position_unchanged() -> Result<(), WalkError> {
    let n = 3;
    let circuit = translate(n, Direction::Plus)?.build()?;
    for position in 0..4 {
        let index = walker_index(n, position, 1);
        let end = Simulator::new().run_from(&circuit, StateVector::basis(n, index)?)?;
        assert_basis(&end, index);
    }
    Ok(())
}

#[test]
fn test_shift_phases_match_closed_form() -> Result<(), WalkError> {
    let n = 4;
    let mut builder = CircuitBuilder::new(n);
    apply_shift(&mut builder, Direction::Plus)?;
    let circuit = builder.build()?;

    for index in 0..(1 << n) {
        let end = Simulator::new().run_from(&circuit, StateVector::basis(n, index)?)?;
        let expected = Complex::from_polar(1.0, fourier_phase(Direction::Plus, n, index));
        let actual = end.vector()[index];
        assert_relative_eq!(actual.re, expected.re, epsilon = TOLERANCE);
        assert_relative_eq!(actual.im, expected.im, epsilon = TOLERANCE);
    }
    Ok(())
}

#[test]
fn test_coin_rotates_by_control_value() -> Result<(), WalkError> {
    let angles = CoinAngles::new(0.7, -1.3);
    let mut builder = CircuitBuilder::new(2);
    apply_coin(&mut builder, &angles, 1)?;
    let circuit = builder.build()?;

    // control 0: Ry(-0.7) on |0>
    let end = Simulator::new().run_from(&circuit, StateVector::basis(2, 0b00)?)?;
    assert_relative_eq!(end.probability_of(0b00), (0.35f64).cos().powi(2), epsilon = TOLERANCE);
    // control 1: Ry(1.3) on |0>
    let end = Simulator::new().run_from(&circuit, StateVector::basis(2, 0b10)?)?;
    assert_relative_eq!(end.probability_of(0b10), (0.65f64).cos().powi(2), epsilon = TOLERANCE);
    assert_relative_eq!(end.vector()[0b11].re, (0.65f64).sin(), epsilon = TOLERANCE);
    Ok(())
}

#[test]
fn test_zero_steps_flipped_coin_reads_zero() -> Result<(), WalkError> {
    let config = WalkConfig::new(2, 0).with_initial_flips(vec![0]).with_shots(256);
    let counts = StateVectorBackend::new().execute(&ExecutionRequest::new(compose(&config)?, config.shots))?;
    assert_eq!(counts.get(0), 256);
    assert_eq!(counts.to_string(), "{'0': 256}");
    Ok(())
}

#[test]
fn test_zero_steps_flipped_position_reads_one() -> Result<(), WalkError> {
    let config = WalkConfig::new(2, 0).with_shots(256);
    let counts = StateVectorBackend::new().execute(&ExecutionRequest::new(compose(&config)?, config.shots))?;
    assert_eq!(counts.to_string(), "{'1': 256}");
    Ok(())
}

#[test]
fn test_three_qubit_single_step_counts() -> Result<(), WalkError> {
    let config = WalkConfig::new(3, 1);
    let circuit = compose(&config)?;
    let counts = StateVectorBackend::new().execute(&ExecutionRequest::new(circuit, config.shots).with_seed(3))?;

    assert_eq!(counts.total(), 8192);
    for (bits, _) in counts.iter() {
        assert_eq!(bits.width(), 2);
        assert_eq!(bits.to_string().len(), 2);
    }
    Ok(())
}

#[test]
fn test_three_qubit_single_step_marginal() -> Result<(), WalkError> {
    let circuit = compose(&WalkConfig::new(3, 1))?;
    let marginal = StateVectorBackend::new().marginal_probabilities(&circuit)?;

    assert_relative_eq!(marginal.iter().sum::<f64>(), 1.0, epsilon = TOLERANCE);
    assert_relative_eq!(marginal[0b00], 0.0379117, epsilon = 1e-6);
    assert_relative_eq!(marginal[0b01], 0.0394695, epsilon = 1e-6);
    assert_relative_eq!(marginal[0b10], 0.9226188, epsilon = 1e-6);
    assert!(marginal[0b11] < TOLERANCE);
    Ok(())
}

#[test]
fn test_interleaved_schedule_is_normalised() -> Result<(), WalkError> {
    let config = WalkConfig::new(4, 3).with_schedule(StepSchedule::Interleaved);
    let state = Simulator::strict().run(&compose(&config)?)?;
    assert_relative_eq!(state.norm_sqr(), 1.0, epsilon = TOLERANCE);
    Ok(())
}

#[test]
fn test_config_round_trips_through_json() -> Result<(), WalkError> {
    let config = WalkConfig::new(5, 2).with_schedule(StepSchedule::Interleaved).with_shots(100);
    let json = serde_json::to_string(&config).map_err(|e| WalkError::invalid_config("json", e.to_string()))?;
    assert_eq!(WalkConfig::from_json(&json)?, config);
    Ok(())
}
