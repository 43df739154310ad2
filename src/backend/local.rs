// src/backend/local.rs
use super::{Backend, ExecutionRequest};
use crate::circuits::Circuit;
use crate::core::{BackendError, Result, StateVector};
use crate::simulation::{OutcomeCounts, Simulator};
use rand::distr::weighted::WeightedIndex;
use rand::distr::{Distribution, StandardUniform};
use rand::rngs::StdRng;
use rand::SeedableRng;

// Shots drawn between cancellation checks.
const CANCEL_POLL_SHOTS: u64 = 1024;

/// In-process backend: exact state-vector simulation followed by sampling
/// from the measured marginal.
#[derive(Debug, Default, Clone, Copy)]
pub struct StateVectorBackend {
    simulator: Simulator,
}

impl StateVectorBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exact probability of every measured outcome, indexed by output value.
    pub fn marginal_probabilities(&self, circuit: &Circuit) -> Result<Vec<f64>> {
        let state = self.simulator.run(circuit)?;
        Ok(marginalize(circuit, &state))
    }
}

fn marginalize(circuit: &Circuit, state: &StateVector) -> Vec<f64> {
    let mut marginal = vec![0.0; 1usize << circuit.measured_bits()];
    for (index, probability) in state.probabilities().into_iter().enumerate() {
        marginal[circuit.outcome_for(index) as usize] += probability;
    }
    marginal
}

impl Backend for StateVectorBackend {
    fn name(&self) -> &str {
        "statevector"
    }

    fn execute(&self, request: &ExecutionRequest) -> std::result::Result<OutcomeCounts, BackendError> {
        let circuit = &request.circuit;
        let cancellation = &request.cancellation;
        let state = self
            .simulator
            .run_interruptible(circuit, || cancellation.is_cancelled())
            .map_err(|e| BackendError::Rejected { message: e.to_string() })?
            .ok_or(BackendError::Cancelled)?;
        let marginal = marginalize(circuit, &state);
        let sampler = WeightedIndex::new(&marginal)
            .map_err(|e| BackendError::Rejected { message: format!("cannot sample outcomes: {}", e) })?;

        let seed: u64 = match request.seed {
            Some(seed) => seed,
            None => StandardUniform.sample(&mut rand::rng()),
        };
        let mut rng = StdRng::seed_from_u64(seed);

        let mut tallies = vec![0u64; marginal.len()];
        for shot in 0..request.shots {
            if shot % CANCEL_POLL_SHOTS == 0 && cancellation.is_cancelled() {
                return Err(BackendError::Cancelled);
            }
            tallies[sampler.sample(&mut rng)] += 1;
        }
        tracing::trace!(seed, shots = request.shots, "sampled state vector");

        OutcomeCounts::from_pairs(
            circuit.measured_bits(),
            tallies.into_iter().enumerate().map(|(value, count)| (value as u64, count)),
        )
        .map_err(|e| BackendError::Rejected { message: e.to_string() })
    }
}
