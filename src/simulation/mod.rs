// src/simulation/mod.rs

//! Dense state-vector simulation of a [`Circuit`].
//!
//! [`Simulator`] is the public entry point. The internal `SimulationEngine`
//! owns the amplitudes of one execution and applies gates to them in place.

mod results;
pub(crate) mod engine;

pub use results::{Bitstring, OutcomeCounts};

use crate::circuits::Circuit;
use crate::core::{Result, StateVector, WalkError};
use engine::SimulationEngine;

/// Runs circuits against a fresh state vector.
#[derive(Debug, Default, Clone, Copy)]
pub struct Simulator {
    /// Check `Σ|c_i|² = 1` after every gate instead of only at the end.
    strict: bool,
}

impl Simulator {
    /// Creates a simulator that validates the norm once, after the last gate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a simulator that validates the norm after every gate.
    pub fn strict() -> Self {
        Self { strict: true }
    }

    /// Applies every gate of `circuit` to `|0…0⟩` and returns the final state.
    ///
    /// Measurements are not performed; sampling is the backend's job.
    ///
    /// # Errors
    /// * Any index error raised by a gate.
    /// * [`WalkError::Incoherence`] if the final state is not normalised.
    pub fn run(&self, circuit: &Circuit) -> Result<StateVector> {
        let engine = SimulationEngine::init(circuit.num_qubits())?;
        self.evolve(engine, circuit, || false)?
            .ok_or_else(|| WalkError::incoherence("uninterruptible run was interrupted"))
    }

    /// Like [`Simulator::run`], but polls `interrupted` before every gate and
    /// returns `Ok(None)` as soon as it reports `true`.
    pub fn run_interruptible<F>(&self, circuit: &Circuit, interrupted: F) -> Result<Option<StateVector>>
    where
        F: Fn() -> bool,
    {
        let engine = SimulationEngine::init(circuit.num_qubits())?;
        self.evolve(engine, circuit, interrupted)
    }

    /// Applies every gate of `circuit` to `initial`.
    pub fn run_from(&self, circuit: &Circuit, initial: StateVector) -> Result<StateVector> {
        if initial.num_qubits() != circuit.num_qubits() {
            return Err(WalkError::incoherence(format!(
                "initial state has {} qubits but the circuit expects {}",
                initial.num_qubits(),
                circuit.num_qubits()
            )));
        }
        self.evolve(SimulationEngine::from_state(initial), circuit, || false)?
            .ok_or_else(|| WalkError::incoherence("uninterruptible run was interrupted"))
    }

    fn evolve<F>(&self, mut engine: SimulationEngine, circuit: &Circuit, interrupted: F) -> Result<Option<StateVector>>
    where
        F: Fn() -> bool,
    {
        for gate in circuit.gates() {
            if interrupted() {
                return Ok(None);
            }
            engine.apply_gate(gate)?;
            if self.strict {
                engine.validate_state()?;
            }
        }
        engine.validate_state()?;
        Ok(Some(engine.into_state()))
    }
}
