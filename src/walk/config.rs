//! Walk configuration.

use super::coin::CoinAngles;
use crate::core::{Result, WalkError, COIN_QUBIT, DEFAULT_SHOTS, MAX_QUBITS, MIN_QUBITS};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Order in which the two half-steps of the walk are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepSchedule {
    /// `steps` rounds of (coin A, S+) followed by `steps` rounds of (coin B, S-).
    #[default]
    Sequential,
    /// Each step is one (coin A, S+) round immediately followed by one
    /// (coin B, S-) round.
    Interleaved,
}

/// Everything needed to build and sample one quantum walk.
///
/// Qubit 0 is the coin, qubits `1..num_qubits` hold the position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkConfig {
    /// Register size, coin included.
    pub num_qubits: usize,
    /// Coin used with the `+` translation.
    pub coin_angle_1: CoinAngles,
    /// Coin used with the `-` translation.
    pub coin_angle_2: CoinAngles,
    /// Qubit bracketing the coin rotation with CNOTs.
    pub coin_control: usize,
    /// Number of steps per branch.
    pub step_count: usize,
    /// How the `+` and `-` branches are interleaved.
    pub schedule: StepSchedule,
    /// First measured qubit; qubits `measure_from_index..num_qubits` are
    /// measured with qubit `num_qubits - 1` landing in output bit 0.
    pub measure_from_index: usize,
    /// Qubits flipped to `|1⟩` before the first step. `None` flips the last
    /// qubit.
    pub initial_flips: Option<Vec<usize>>,
    /// Shots per execution.
    pub shots: u64,
    /// Independent executions merged by the aggregator.
    pub iterations: usize,
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            num_qubits: 3,
            coin_angle_1: CoinAngles::heads(),
            coin_angle_2: CoinAngles::tails(),
            coin_control: 1,
            step_count: 1,
            schedule: StepSchedule::Sequential,
            measure_from_index: 1,
            initial_flips: None,
            shots: DEFAULT_SHOTS,
            iterations: 1,
        }
    }
}

impl WalkConfig {
    /// Reference configuration for `num_qubits` qubits and `step_count` steps.
    pub fn new(num_qubits: usize, step_count: usize) -> Self {
        Self { num_qubits, step_count, ..Self::default() }
    }

    /// Parses a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| WalkError::invalid_config("json", e.to_string()))
    }

    /// Sets the shot count.
    pub fn with_shots(mut self, shots: u64) -> Self {
        self.shots = shots;
        self
    }

    /// Sets the iteration count.
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Sets the step schedule.
    pub fn with_schedule(mut self, schedule: StepSchedule) -> Self {
        self.schedule = schedule;
        self
    }

    /// Sets both coins.
    pub fn with_coin_angles(mut self, coin_angle_1: CoinAngles, coin_angle_2: CoinAngles) -> Self {
        self.coin_angle_1 = coin_angle_1;
        self.coin_angle_2 = coin_angle_2;
        self
    }

    /// Sets the first measured qubit.
    pub fn with_measure_from_index(mut self, index: usize) -> Self {
        self.measure_from_index = index;
        self
    }

    /// Sets the qubits prepared in `|1⟩`.
    pub fn with_initial_flips(mut self, flips: Vec<usize>) -> Self {
        self.initial_flips = Some(flips);
        self
    }

    /// Sets the coin's CNOT control qubit.
    pub fn with_coin_control(mut self, control: usize) -> Self {
        self.coin_control = control;
        self
    }

    /// Qubits encoding the position.
    pub fn position_qubits(&self) -> Range<usize> {
        COIN_QUBIT + 1..self.num_qubits
    }

    /// Width of the measured bitstring.
    pub fn measured_bits(&self) -> usize {
        self.num_qubits.saturating_sub(self.measure_from_index)
    }

    /// Qubits flipped before the walk starts.
    pub fn initial_flips(&self) -> Vec<usize> {
        match &self.initial_flips {
            Some(flips) => flips.clone(),
            None => vec![self.num_qubits.saturating_sub(1)],
        }
    }

    /// Rejects configurations that cannot produce a valid circuit.
    ///
    /// Runs before any circuit construction starts.
    pub fn validate(&self) -> Result<()> {
        if !(MIN_QUBITS..=MAX_QUBITS).contains(&self.num_qubits) {
            return Err(WalkError::invalid_config(
                "num_qubits",
                format!("must be within {}..={}, got {}", MIN_QUBITS, MAX_QUBITS, self.num_qubits),
            ));
        }
        if self.coin_control == COIN_QUBIT || self.coin_control >= self.num_qubits {
            return Err(WalkError::invalid_config(
                "coin_control",
                format!("must be a position qubit in 1..{}, got {}", self.num_qubits, self.coin_control),
            ));
        }
        if self.measure_from_index >= self.num_qubits {
            return Err(WalkError::invalid_config(
                "measure_from_index",
                format!("must be below {}, got {}", self.num_qubits, self.measure_from_index),
            ));
        }
        if let Some(&bad) = self.initial_flips().iter().find(|&&q| q >= self.num_qubits) {
            return Err(WalkError::invalid_config(
                "initial_flips",
                format!("qubit {} is outside the {}-qubit register", bad, self.num_qubits),
            ));
        }
        for (name, angles) in [("coin_angle_1", &self.coin_angle_1), ("coin_angle_2", &self.coin_angle_2)] {
            if !angles.is_finite() {
                return Err(WalkError::invalid_config(name, "angles must be finite"));
            }
        }
        if self.shots == 0 {
            return Err(WalkError::invalid_config("shots", "must be at least 1"));
        }
        if self.iterations == 0 {
            return Err(WalkError::invalid_config("iterations", "must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_experiment() {
        let config = WalkConfig::new(4, 2);
        assert_eq!(config.shots, 8192);
        assert_eq!(config.initial_flips(), vec![3]);
        assert_eq!(config.position_qubits(), 1..4);
        assert_eq!(config.measured_bits(), 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_invalid_qubit_counts() {
        for n in [0, 1, MAX_QUBITS + 1] {
            let err = WalkConfig::new(n, 1).validate().unwrap_err();
            assert!(matches!(err, WalkError::InvalidConfig { ref name, .. } if name == "num_qubits"));
        }
    }

    #[test]
    fn test_rejects_bad_indices_and_counts() {
        assert!(WalkConfig::new(3, 1).with_coin_control(0).validate().is_err());
        assert!(WalkConfig::new(3, 1).with_coin_control(3).validate().is_err());
        assert!(WalkConfig::new(3, 1).with_measure_from_index(3).validate().is_err());
        assert!(WalkConfig::new(3, 1).with_initial_flips(vec![5]).validate().is_err());
        assert!(WalkConfig::new(3, 1).with_shots(0).validate().is_err());
        assert!(WalkConfig::new(3, 1).with_iterations(0).validate().is_err());
        assert!(WalkConfig::new(3, 1)
            .with_coin_angles(CoinAngles::new(f64::NAN, 0.0), CoinAngles::tails())
            .validate()
            .is_err());
    }

    #[test]
    fn test_from_json_fills_defaults() -> Result<()> {
        let config = WalkConfig::from_json(r#"{"num_qubits": 5, "step_count": 3, "schedule": "interleaved"}"#)?;
        assert_eq!(config.num_qubits, 5);
        assert_eq!(config.step_count, 3);
        assert_eq!(config.schedule, StepSchedule::Interleaved);
        assert_eq!(config.shots, DEFAULT_SHOTS);
        assert!(WalkConfig::from_json("{not json").is_err());
        Ok(())
    }
}
