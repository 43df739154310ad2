//! Walk composition: coin, translation and measurement sequencing.

use super::coin::apply_coin;
use super::config::{StepSchedule, WalkConfig};
use super::qft::{forward_qft, inverse_qft};
use super::shift::{apply_shift, Direction};
use crate::circuits::{Circuit, CircuitBuilder};
use crate::core::{Result, WalkError};
use std::fmt;

/// Phase of the composer's state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkPhase {
    /// Initial state prepared, no step taken yet.
    Initialized,
    /// A coin has been applied and awaits its translation.
    CoinApplied,
    /// A full step (coin + translation) has completed.
    Translated,
    /// Measurement map appended; the circuit is finished.
    Measured,
}

impl fmt::Display for WalkPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WalkPhase::Initialized => "initialized",
            WalkPhase::CoinApplied => "coin-applied",
            WalkPhase::Translated => "translated",
            WalkPhase::Measured => "measured",
        };
        f.write_str(name)
    }
}

/// Which of the two configured coins to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoinSide {
    /// `coin_angle_1`, paired with S+.
    A,
    /// `coin_angle_2`, paired with S-.
    B,
}

/// Builds a walk circuit one transition at a time.
///
/// ```
/// use qwalk::walk::{CoinSide, Direction, WalkComposer, WalkConfig, WalkPhase};
///
/// let config = WalkConfig::new(3, 1);
/// let mut composer = WalkComposer::new(&config)?;
/// composer.step(CoinSide::A, Direction::Plus)?;
/// let circuit = composer.measure()?;
/// assert_eq!(composer.phase(), WalkPhase::Measured);
/// assert_eq!(circuit.measured_bits(), 2);
/// # Ok::<(), qwalk::WalkError>(())
/// ```
#[derive(Debug)]
pub struct WalkComposer<'a> {
    config: &'a WalkConfig,
    builder: CircuitBuilder,
    phase: WalkPhase,
    steps_taken: usize,
}

impl<'a> WalkComposer<'a> {
    /// Validates `config` and prepares the initial basis state.
    pub fn new(config: &'a WalkConfig) -> Result<Self> {
        config.validate()?;
        let mut builder = CircuitBuilder::new(config.num_qubits);
        for qubit in config.initial_flips() {
            builder.flip(qubit);
        }
        Ok(Self {
            config,
            builder,
            phase: WalkPhase::Initialized,
            steps_taken: 0,
        })
    }

    /// Current state-machine phase.
    pub fn phase(&self) -> WalkPhase {
        self.phase
    }

    /// Completed coin + translation rounds.
    pub fn steps_taken(&self) -> usize {
        self.steps_taken
    }

    /// Applies one of the configured coins.
    pub fn apply_coin(&mut self, side: CoinSide) -> Result<()> {
        self.require_phase(&[WalkPhase::Initialized, WalkPhase::Translated], "apply a coin")?;
        let angles = match side {
            CoinSide::A => &self.config.coin_angle_1,
            CoinSide::B => &self.config.coin_angle_2,
        };
        apply_coin(&mut self.builder, angles, self.config.coin_control)?;
        self.phase = WalkPhase::CoinApplied;
        Ok(())
    }

    /// Translates the position register: inverse QFT, shift, forward QFT.
    pub fn translate(&mut self, direction: Direction) -> Result<()> {
        self.require_phase(&[WalkPhase::CoinApplied], "translate")?;
        let positions = self.config.position_qubits();
        inverse_qft(&mut self.builder, positions.clone())?;
        apply_shift(&mut self.builder, direction)?;
        forward_qft(&mut self.builder, positions)?;
        self.phase = WalkPhase::Translated;
        self.steps_taken += 1;
        Ok(())
    }

    /// One full step: coin followed by translation.
    pub fn step(&mut self, side: CoinSide, direction: Direction) -> Result<()> {
        self.apply_coin(side)?;
        self.translate(direction)
    }

    /// Appends a barrier and the index-reversed measurement map, then builds
    /// the circuit.
    ///
    /// Qubit `n - 1` lands in output bit 0, qubit `n - 2` in bit 1, down to
    /// `measure_from_index`.
    pub fn measure(&mut self) -> Result<Circuit> {
        self.require_phase(&[WalkPhase::Initialized, WalkPhase::Translated], "measure")?;
        let n = self.config.num_qubits;
        let mut builder = std::mem::replace(&mut self.builder, CircuitBuilder::new(n));
        builder.barrier(0..n);
        for (bit, qubit) in (self.config.measure_from_index..n).rev().enumerate() {
            builder.measure(qubit, bit);
        }
        self.phase = WalkPhase::Measured;
        builder.build()
    }

    fn require_phase(&self, allowed: &[WalkPhase], action: &str) -> Result<()> {
        if allowed.contains(&self.phase) {
            Ok(())
        } else {
            Err(WalkError::InvalidTransition {
                from: self.phase.to_string(),
                action: action.to_string(),
            })
        }
    }
}

/// Builds the complete walk circuit described by `config`.
#[tracing::instrument(level = "debug", skip(config), fields(num_qubits = config.num_qubits, steps = config.step_count))]
pub fn compose(config: &WalkConfig) -> Result<Circuit> {
    let mut composer = WalkComposer::new(config)?;
    match config.schedule {
        StepSchedule::Sequential => {
            for _ in 0..config.step_count {
                composer.step(CoinSide::A, Direction::Plus)?;
            }
            for _ in 0..config.step_count {
                composer.step(CoinSide::B, Direction::Minus)?;
            }
        }
        StepSchedule::Interleaved => {
            for _ in 0..config.step_count {
                composer.step(CoinSide::A, Direction::Plus)?;
                composer.step(CoinSide::B, Direction::Minus)?;
            }
        }
    }
    let circuit = composer.measure()?;
    tracing::debug!(
        rounds = composer.steps_taken(),
        gates = circuit.gate_count(),
        measured_bits = circuit.measured_bits(),
        "walk circuit composed"
    );
    Ok(circuit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuits::Measurement;
    use crate::operations::Gate;

    #[test]
    fn test_measurement_map_is_index_reversed() -> Result<()> {
        let circuit = compose(&WalkConfig::new(4, 0))?;
        assert_eq!(
            circuit.measurements(),
            &[
                Measurement { qubit: 3, bit: 0 },
                Measurement { qubit: 2, bit: 1 },
                Measurement { qubit: 1, bit: 2 },
            ]
        );
        Ok(())
    }

    #[test]
    fn test_zero_steps_only_prepares_and_measures() -> Result<()> {
        let circuit = compose(&WalkConfig::new(3, 0))?;
        assert_eq!(
            circuit.gates(),
            &[Gate::Flip { target: 2 }, Gate::Barrier { targets: vec![0, 1, 2] }]
        );
        Ok(())
    }

    #[test]
    fn test_transitions_are_enforced() -> Result<()> {
        let config = WalkConfig::new(3, 1);
        let mut composer = WalkComposer::new(&config)?;
        assert!(matches!(
            composer.translate(Direction::Plus),
            Err(WalkError::InvalidTransition { .. })
        ));
        composer.apply_coin(CoinSide::A)?;
        assert_eq!(composer.phase(), WalkPhase::CoinApplied);
        assert!(composer.apply_coin(CoinSide::B).is_err());
        assert!(composer.measure().is_err());
        composer.translate(Direction::Plus)?;
        assert_eq!(composer.phase(), WalkPhase::Translated);
        composer.measure()?;
        let err = composer.apply_coin(CoinSide::A).unwrap_err();
        assert_eq!(
            err,
            WalkError::InvalidTransition { from: "measured".into(), action: "apply a coin".into() }
        );
        Ok(())
    }

    #[test]
    fn test_schedules_take_same_number_of_steps() -> Result<()> {
        let sequential = compose(&WalkConfig::new(3, 2))?;
        let interleaved = compose(&WalkConfig::new(3, 2).with_schedule(StepSchedule::Interleaved))?;
        assert_eq!(sequential.gate_count(), interleaved.gate_count());
        assert_ne!(sequential.gates(), interleaved.gates());
        Ok(())
    }

    #[test]
    fn test_invalid_config_fails_before_construction() {
        assert!(matches!(
            WalkComposer::new(&WalkConfig::new(1, 1)),
            Err(WalkError::InvalidConfig { .. })
        ));
    }
}
