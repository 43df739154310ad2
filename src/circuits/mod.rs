// src/circuits/mod.rs

//! Ordered gate sequences plus their measurement map.
//!
//! A [`Circuit`] can only be obtained from [`CircuitBuilder::build`], which
//! checks every qubit index and measurement bit. A circuit that reaches a
//! backend is therefore always well formed.

use crate::core::{Result, WalkError};
use crate::operations::Gate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Maps a measured qubit onto a bit of the output bitstring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Measurement {
    /// Measured qubit.
    pub qubit: usize,
    /// Output bit receiving the qubit's value (bit 0 is the rightmost character).
    pub bit: usize,
}

/// An ordered sequence of gates on an `n`-qubit register followed by a
/// measurement of some of its qubits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    num_qubits: usize,
    /// Order is significant: gates are applied front to back.
    gates: Vec<Gate>,
    measurements: Vec<Measurement>,
}

impl Circuit {
    /// Register size.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// The ordered gate sequence.
    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    /// Measurement map, in the order measurements were added.
    pub fn measurements(&self) -> &[Measurement] {
        &self.measurements
    }

    /// Width of the output bitstring.
    pub fn measured_bits(&self) -> usize {
        self.measurements.len()
    }

    /// Total number of gates, barriers included.
    pub fn len(&self) -> usize {
        self.gates.len()
    }

    /// Returns `true` if the circuit contains no gates.
    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    /// Number of gates that act on the state (barriers excluded).
    pub fn gate_count(&self) -> usize {
        self.gates
            .iter()
            .filter(|g| !matches!(g, Gate::Barrier { .. }))
            .count()
    }

    /// Maps a full-register basis index onto the measured output value.
    pub fn outcome_for(&self, basis_index: usize) -> u64 {
        self.measurements.iter().fold(0u64, |acc, m| {
            acc | ((((basis_index >> m.qubit) & 1) as u64) << m.bit)
        })
    }
}

//-------------------------------------------------------------------------
// Circuit Builder
//-------------------------------------------------------------------------

/// Accumulates gates and measurements for a register of fixed size.
///
/// Gates are recorded unchecked; [`CircuitBuilder::build`] validates the whole
/// sequence and refuses to produce a partially valid circuit.
#[derive(Debug, Clone)]
pub struct CircuitBuilder {
    num_qubits: usize,
    gates: Vec<Gate>,
    measurements: Vec<Measurement>,
}

impl CircuitBuilder {
    /// Creates an empty builder for a `num_qubits` register.
    pub fn new(num_qubits: usize) -> Self {
        Self {
            num_qubits,
            gates: Vec::new(),
            measurements: Vec::new(),
        }
    }

    /// Register size the builder targets.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Gates recorded so far.
    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    /// Adds a single gate, consuming and returning the builder for chaining.
    pub fn add_op(mut self, gate: Gate) -> Self {
        self.gates.push(gate);
        self
    }

    /// Adds every gate from an iterator, consuming and returning the builder.
    pub fn add_ops<I>(mut self, gates: I) -> Self
    where
        I: IntoIterator<Item = Gate>,
    {
        self.gates.extend(gates);
        self
    }

    /// Appends a gate in place.
    pub fn push(&mut self, gate: Gate) -> &mut Self {
        self.gates.push(gate);
        self
    }

    /// Appends a Hadamard on `target`.
    pub fn hadamard(&mut self, target: usize) -> &mut Self {
        self.push(Gate::Hadamard { target })
    }

    /// Appends an X on `target`.
    pub fn flip(&mut self, target: usize) -> &mut Self {
        self.push(Gate::Flip { target })
    }

    /// Appends `diag(1, e^{iθ})` on `target`.
    pub fn phase(&mut self, theta: f64, target: usize) -> &mut Self {
        self.push(Gate::Phase { target, theta })
    }

    /// Appends an `Ry(θ)` rotation on `target`.
    pub fn rotation(&mut self, theta: f64, target: usize) -> &mut Self {
        self.push(Gate::Rotation { target, theta })
    }

    /// Appends a controlled phase of `theta` between `control` and `target`.
    pub fn controlled_phase(&mut self, theta: f64, control: usize, target: usize) -> &mut Self {
        self.push(Gate::ControlledPhase { control, target, theta })
    }

    /// Appends a CNOT.
    pub fn cnot(&mut self, control: usize, target: usize) -> &mut Self {
        self.push(Gate::ControlledNot { control, target })
    }

    /// Appends a barrier across `targets`.
    pub fn barrier<I>(&mut self, targets: I) -> &mut Self
    where
        I: IntoIterator<Item = usize>,
    {
        self.push(Gate::Barrier { targets: targets.into_iter().collect() })
    }

    /// Records that `qubit` is measured into output bit `bit`.
    pub fn measure(&mut self, qubit: usize, bit: usize) -> &mut Self {
        self.measurements.push(Measurement { qubit, bit });
        self
    }

    /// Validates every gate and measurement and returns the finished circuit.
    ///
    /// # Errors
    /// * [`WalkError::QubitOutOfRange`] for any index outside the register.
    /// * [`WalkError::DuplicateQubit`] for a two-qubit gate with equal indices.
    /// * [`WalkError::InvalidConfig`] if the measurement map measures a qubit
    ///   twice or its output bits are not exactly `0..len`.
    pub fn build(self) -> Result<Circuit> {
        for gate in &self.gates {
            validate_gate(gate, self.num_qubits)?;
        }

        let mut measured = HashSet::new();
        let mut bits = HashSet::new();
        for m in &self.measurements {
            check_index(m.qubit, self.num_qubits)?;
            if !measured.insert(m.qubit) {
                return Err(WalkError::invalid_config(
                    "measurements",
                    format!("qubit {} is measured more than once", m.qubit),
                ));
            }
            if m.bit >= self.measurements.len() || !bits.insert(m.bit) {
                return Err(WalkError::invalid_config(
                    "measurements",
                    format!("output bit {} is repeated or outside 0..{}", m.bit, self.measurements.len()),
                ));
            }
        }
        if self.measurements.len() > 64 {
            return Err(WalkError::invalid_config("measurements", "at most 64 output bits are supported"));
        }

        Ok(Circuit {
            num_qubits: self.num_qubits,
            gates: self.gates,
            measurements: self.measurements,
        })
    }
}

/// Checks the qubit indices of a single gate against a register size.
pub(crate) fn validate_gate(gate: &Gate, num_qubits: usize) -> Result<()> {
    match gate {
        Gate::ControlledPhase { control, target, .. } | Gate::ControlledNot { control, target } => {
            check_index(*control, num_qubits)?;
            check_index(*target, num_qubits)?;
            if control == target {
                return Err(WalkError::DuplicateQubit { qubit: *target });
            }
            Ok(())
        }
        other => other
            .involved_qubits()
            .into_iter()
            .try_for_each(|q| check_index(q, num_qubits)),
    }
}

fn check_index(qubit: usize, num_qubits: usize) -> Result<()> {
    if qubit < num_qubits {
        Ok(())
    } else {
        Err(WalkError::QubitOutOfRange { qubit, num_qubits })
    }
}

/// One line per gate in application order, then one line per measurement.
impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "qwalk::Circuit[{} gates on {} qubits, {} measured]",
            self.gate_count(),
            self.num_qubits,
            self.measured_bits()
        )?;
        for gate in &self.gates {
            let qubits: Vec<String> = gate.involved_qubits().iter().map(|q| format!("q{}", q)).collect();
            let prefix = match gate {
                Gate::ControlledPhase { .. } | Gate::ControlledNot { .. } => "c",
                _ => "",
            };
            match gate {
                Gate::Phase { theta, .. } | Gate::Rotation { theta, .. } | Gate::ControlledPhase { theta, .. } => {
                    writeln!(f, "  {}{}({:.6}) {}", prefix, gate.symbol(), theta, qubits.join(","))?
                }
                _ => writeln!(f, "  {}{} {}", prefix, gate.symbol(), qubits.join(","))?,
            }
        }
        for m in &self.measurements {
            writeln!(f, "  M{} q{}", m.bit, m.qubit)?;
        }
        Ok(())
    }
}
