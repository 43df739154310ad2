//! Coin operator.
//!
//! The coin rotates qubit 0 by `-plus` when the control qubit reads 0 and by
//! `-minus` when it reads 1. It is built as an unconditioned rotation of
//! `-(plus + minus) / 2` followed by a rotation of `-(plus - minus) / 2`
//! bracketed by CNOTs from the control. The bracket is omitted when its
//! rotation is exactly zero.

use crate::circuits::CircuitBuilder;
use crate::core::{Result, WalkError, COIN_QUBIT, DEFAULT_COIN_THETA, PI};
use serde::{Deserialize, Serialize};

/// Rotation angles selected by the control qubit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoinAngles {
    /// Angle applied when the control qubit is 0.
    pub plus: f64,
    /// Angle applied when the control qubit is 1.
    pub minus: f64,
}

impl CoinAngles {
    pub fn new(plus: f64, minus: f64) -> Self {
        Self { plus, minus }
    }

    /// Reference coin for the `+` half-step.
    pub fn heads() -> Self {
        Self::new(DEFAULT_COIN_THETA, DEFAULT_COIN_THETA)
    }

    /// Reference coin for the `-` half-step. Its `plus` angle sits π below
    /// that of [`CoinAngles::heads`]; the two angles cancel in the bare
    /// rotation, leaving only the bracketed `0.4 + π`.
    pub fn tails() -> Self {
        Self::new(DEFAULT_COIN_THETA - PI, -DEFAULT_COIN_THETA + PI)
    }

    /// The coin undoing this one.
    pub fn inverse(&self) -> Self {
        Self::new(-self.plus, -self.minus)
    }

    /// Angle of the unconditioned rotation.
    pub fn bare_rotation(&self) -> f64 {
        -(self.plus + self.minus) / 2.0
    }

    /// Angle of the CNOT-bracketed rotation.
    pub fn bracketed_rotation(&self) -> f64 {
        -(self.plus - self.minus) / 2.0
    }

    pub fn is_finite(&self) -> bool {
        self.plus.is_finite() && self.minus.is_finite()
    }
}

/// Appends the coin on qubit 0 with `control` driving the CNOT bracket.
pub fn apply_coin(builder: &mut CircuitBuilder, angles: &CoinAngles, control: usize) -> Result<()> {
    if control == COIN_QUBIT {
        return Err(WalkError::DuplicateQubit { qubit: control });
    }
    if control >= builder.num_qubits() {
        return Err(WalkError::QubitOutOfRange { qubit: control, num_qubits: builder.num_qubits() });
    }

    builder.rotation(angles.bare_rotation(), COIN_QUBIT);
    let bracketed = angles.bracketed_rotation();
    if bracketed != 0.0 {
        builder
            .cnot(control, COIN_QUBIT)
            .rotation(bracketed, COIN_QUBIT)
            .cnot(control, COIN_QUBIT);
    }
    Ok(())
}
