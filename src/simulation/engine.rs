// src/simulation/engine.rs
use crate::circuits::validate_gate;
use crate::core::{Result, StateVector};
use crate::operations::Gate;
use num_complex::Complex;
use num_traits::Zero;
use std::f64::consts::FRAC_1_SQRT_2;

/// Owns one state vector and evolves it gate by gate.
/// (Internal visibility)
pub(crate) struct SimulationEngine {
    state: StateVector,
}

impl SimulationEngine {
    /// Initialises the engine in `|0…0⟩`.
    pub(crate) fn init(num_qubits: usize) -> Result<Self> {
        Ok(Self { state: StateVector::zero(num_qubits)? })
    }

    /// Initialises the engine from an existing state.
    pub(crate) fn from_state(state: StateVector) -> Self {
        Self { state }
    }

    pub(crate) fn num_qubits(&self) -> usize {
        self.state.num_qubits()
    }

    #[cfg(test)]
    pub(crate) fn get_state(&self) -> &StateVector {
        &self.state
    }

    pub(crate) fn into_state(self) -> StateVector {
        self.state
    }

    /// Applies a single gate to the state in place.
    ///
    /// Indices are checked before any amplitude is touched, so a rejected gate
    /// leaves the state unchanged.
    pub(crate) fn apply_gate(&mut self, gate: &Gate) -> Result<()> {
        validate_gate(gate, self.num_qubits())?;
        match gate {
            Gate::Hadamard { target } => self.apply_single_qubit_gate(*target, &hadamard_matrix()),
            Gate::Flip { target } => self.apply_single_qubit_gate(*target, &flip_matrix()),
            Gate::Phase { target, theta } => self.apply_single_qubit_gate(*target, &phase_matrix(*theta)),
            Gate::Rotation { target, theta } => {
                self.apply_single_qubit_gate(*target, &rotation_matrix(*theta))
            }
            Gate::ControlledPhase { control, target, theta } => {
                self.apply_controlled_phase(*control, *target, *theta)
            }
            Gate::ControlledNot { control, target } => self.apply_controlled_not(*control, *target),
            Gate::Barrier { .. } => {}
        }
        Ok(())
    }

    /// Checks the unit-norm invariant.
    pub(crate) fn validate_state(&self) -> Result<()> {
        crate::validation::check_normalization(&self.state, None)
    }

    /// Applies a 2x2 matrix to the amplitude pairs that differ only in the
    /// target qubit.
    fn apply_single_qubit_gate(&mut self, target: usize, matrix: &[[Complex<f64>; 2]; 2]) {
        let mask = 1usize << target;
        let amplitudes = self.state.vector_mut();
        for i0 in 0..amplitudes.len() {
            if i0 & mask != 0 {
                continue;
            }
            let i1 = i0 | mask;
            let psi_0 = amplitudes[i0];
            let psi_1 = amplitudes[i1];
            amplitudes[i0] = matrix[0][0] * psi_0 + matrix[0][1] * psi_1;
            amplitudes[i1] = matrix[1][0] * psi_0 + matrix[1][1] * psi_1;
        }
    }

    /// Multiplies every amplitude with both bits set by `e^{iθ}`.
    fn apply_controlled_phase(&mut self, control: usize, target: usize, theta: f64) {
        let both = (1usize << control) | (1usize << target);
        let factor = Complex::from_polar(1.0, theta);
        for (index, amplitude) in self.state.vector_mut().iter_mut().enumerate() {
            if index & both == both {
                *amplitude *= factor;
            }
        }
    }

    /// Swaps the target-0 and target-1 amplitudes wherever the control is 1.
    fn apply_controlled_not(&mut self, control: usize, target: usize) {
        let control_mask = 1usize << control;
        let target_mask = 1usize << target;
        let amplitudes = self.state.vector_mut();
        for index in 0..amplitudes.len() {
            if index & control_mask != 0 && index & target_mask == 0 {
                amplitudes.swap(index, index | target_mask);
            }
        }
    }
}

fn hadamard_matrix() -> [[Complex<f64>; 2]; 2] {
    let h = Complex::new(FRAC_1_SQRT_2, 0.0);
    [[h, h], [h, -h]]
}

fn flip_matrix() -> [[Complex<f64>; 2]; 2] {
    [
        [Complex::zero(), Complex::new(1.0, 0.0)],
        [Complex::new(1.0, 0.0), Complex::zero()],
    ]
}

/// `diag(1, e^{iθ})`
fn phase_matrix(theta: f64) -> [[Complex<f64>; 2]; 2] {
    [
        [Complex::new(1.0, 0.0), Complex::zero()],
        [Complex::zero(), Complex::from_polar(1.0, theta)],
    ]
}

/// `Ry(θ) = [[cos(θ/2), -sin(θ/2)], [sin(θ/2), cos(θ/2)]]`
fn rotation_matrix(theta: f64) -> [[Complex<f64>; 2]; 2] {
    let (sin_a, cos_a) = (theta / 2.0).sin_cos();
    [
        [Complex::new(cos_a, 0.0), Complex::new(-sin_a, 0.0)],
        [Complex::new(sin_a, 0.0), Complex::new(cos_a, 0.0)],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::WalkError;
    use std::f64::consts::PI;

    const TEST_TOLERANCE: f64 = 1e-12;

    fn assert_amplitude(state: &StateVector, index: usize, expected: Complex<f64>) {
        let diff = state.vector()[index] - expected;
        assert!(
            diff.norm_sqr() < TEST_TOLERANCE,
            "amplitude {} is {}, expected {}",
            index,
            state.vector()[index],
            expected
        );
    }

    #[test]
    fn test_hadamard_creates_superposition() -> Result<()> {
        let mut engine = SimulationEngine::init(2)?;
        engine.apply_gate(&Gate::Hadamard { target: 1 })?;
        let half = Complex::new(FRAC_1_SQRT_2, 0.0);
        assert_amplitude(engine.get_state(), 0b00, half);
        assert_amplitude(engine.get_state(), 0b10, half);
        assert_amplitude(engine.get_state(), 0b01, Complex::zero());
        Ok(())
    }

    #[test]
    fn test_cnot_respects_little_endian_indices() -> Result<()> {
        let mut engine = SimulationEngine::init(3)?;
        engine.apply_gate(&Gate::Flip { target: 2 })?;
        engine.apply_gate(&Gate::ControlledNot { control: 2, target: 0 })?;
        assert_amplitude(engine.get_state(), 0b101, Complex::new(1.0, 0.0));
        Ok(())
    }

    #[test]
    fn test_controlled_phase_only_hits_both_set() -> Result<()> {
        let mut engine = SimulationEngine::init(2)?;
        engine.apply_gate(&Gate::Hadamard { target: 0 })?;
        engine.apply_gate(&Gate::Hadamard { target: 1 })?;
        engine.apply_gate(&Gate::ControlledPhase { control: 0, target: 1, theta: PI / 2.0 })?;
        assert_amplitude(engine.get_state(), 0b01, Complex::new(0.5, 0.0));
        assert_amplitude(engine.get_state(), 0b11, Complex::new(0.0, 0.5));
        Ok(())
    }

    #[test]
    fn test_rotation_by_pi_moves_zero_to_one() -> Result<()> {
        let mut engine = SimulationEngine::init(1)?;
        engine.apply_gate(&Gate::Rotation { target: 0, theta: PI })?;
        assert!((engine.get_state().probability_of(1) - 1.0).abs() < TEST_TOLERANCE);
        engine.validate_state()
    }

    #[test]
    fn test_out_of_range_gate_leaves_state_untouched() -> Result<()> {
        let mut engine = SimulationEngine::init(2)?;
        let before = engine.get_state().clone();
        let err = engine.apply_gate(&Gate::Phase { target: 5, theta: 1.0 }).unwrap_err();
        assert_eq!(err, WalkError::QubitOutOfRange { qubit: 5, num_qubits: 2 });
        assert_eq!(engine.get_state(), &before);
        Ok(())
    }
}
