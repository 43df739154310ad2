// src/operations/mod.rs

//! Primitive gates the walk circuits are built from.
//!
//! Each variant is a unitary restricted to one or two qubits of the register.
//! [`Gate::Barrier`] is the exception: it only marks an ordering boundary and
//! leaves the state untouched.

use serde::{Deserialize, Serialize};

/// A single gate application inside a [`crate::Circuit`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)] // f64 fields rule out Eq
pub enum Gate {
    /// Hadamard: `1/√2 [[1, 1], [1, -1]]`.
    Hadamard {
        /// Target qubit.
        target: usize,
    },

    /// Pauli X, used to prepare the initial basis state.
    Flip {
        /// Target qubit.
        target: usize,
    },

    /// Phase rotation `diag(1, e^{iθ})` (the `u1` gate).
    Phase {
        /// Target qubit.
        target: usize,
        /// Phase angle in radians.
        theta: f64,
    },

    /// Real rotation `[[cos θ/2, -sin θ/2], [sin θ/2, cos θ/2]]`
    /// (`Ry`, equivalently `u3(θ, 0, 0)`).
    Rotation {
        /// Target qubit.
        target: usize,
        /// Rotation angle in radians.
        theta: f64,
    },

    /// Multiplies the amplitude by `e^{iθ}` when control and target are both 1.
    ControlledPhase {
        /// Control qubit.
        control: usize,
        /// Target qubit.
        target: usize,
        /// Phase angle in radians.
        theta: f64,
    },

    /// Flips the target when the control is 1.
    ControlledNot {
        /// Control qubit.
        control: usize,
        /// Target qubit.
        target: usize,
    },

    /// Synchronisation marker with no numeric effect.
    Barrier {
        /// Qubits the barrier spans.
        targets: Vec<usize>,
    },
}

impl Gate {
    /// Returns every qubit index mentioned by the gate.
    pub fn involved_qubits(&self) -> Vec<usize> {
        match self {
            Gate::Hadamard { target }
            | Gate::Flip { target }
            | Gate::Phase { target, .. }
            | Gate::Rotation { target, .. } => vec![*target],
            Gate::ControlledPhase { control, target, .. }
            | Gate::ControlledNot { control, target } => vec![*control, *target],
            Gate::Barrier { targets } => targets.clone(),
        }
    }

    /// Short symbol used when listing circuits.
    pub fn symbol(&self) -> &'static str {
        match self {
            Gate::Hadamard { .. } => "H",
            Gate::Flip { .. } => "X",
            Gate::Phase { .. } => "P",
            Gate::Rotation { .. } => "Ry",
            Gate::ControlledPhase { .. } => "P",
            Gate::ControlledNot { .. } => "X",
            Gate::Barrier { .. } => "░",
        }
    }

    /// The inverse gate. Barriers are their own inverse.
    pub fn inverse(&self) -> Gate {
        match self {
            Gate::Phase { target, theta } => Gate::Phase { target: *target, theta: -theta },
            Gate::Rotation { target, theta } => Gate::Rotation { target: *target, theta: -theta },
            Gate::ControlledPhase { control, target, theta } => Gate::ControlledPhase {
                control: *control,
                target: *target,
                theta: -theta,
            },
            other => other.clone(),
        }
    }
}
