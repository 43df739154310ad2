//! Fourier-basis shift operators S+ and S-.
//!
//! With `n` qubits, coin on qubit 0 and position qubits `i = 1..n`, S+ is
//!
//! 1. for every `i`: `CNOT(i, 0)`, `Phase(π / 2^{n-i}, 0)`, `CNOT(i, 0)`,
//! 2. `Phase(-π · Σ_{i=1}^{n-1} 2^{-i}, 0)` on the coin,
//! 3. for every `i`: `Phase(π / 2^{n-i}, i)`.
//!
//! On a basis state whose coin reads 0 and whose position qubits hold the
//! Fourier index `k = Σ_i bit_i · 2^{i-1}` the net effect is the phase
//! `e^{2πik / 2^{n-1}}`; states whose coin reads 1 are left alone. S- is the
//! same sequence with every angle negated, which makes it the inverse of S+.

use crate::circuits::CircuitBuilder;
use crate::core::{Result, WalkError, COIN_QUBIT, MIN_QUBITS, PI};
use serde::{Deserialize, Serialize};

/// Direction of a translation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// S+, position `x -> x + 1`.
    Plus,
    /// S-, position `x -> x - 1`.
    Minus,
}

impl Direction {
    /// `+1.0` for [`Direction::Plus`], `-1.0` for [`Direction::Minus`].
    pub fn sign(self) -> f64 {
        match self {
            Direction::Plus => 1.0,
            Direction::Minus => -1.0,
        }
    }
}

/// `Σ_{i=1}^{n-1} 2^{-i} = 1 - 2^{-(n-1)}`, the coefficient of the coin's
/// compensating phase.
///
/// Evaluated in closed form; for any supported register size the result is
/// exact in `f64`.
pub fn compensating_coefficient(num_qubits: usize) -> f64 {
    if num_qubits <= 1 {
        return 0.0;
    }
    1.0 - 0.5f64.powi((num_qubits - 1) as i32)
}

/// Phase kick for position qubit `qubit` in an `num_qubits` register.
fn kick_angle(num_qubits: usize, qubit: usize) -> f64 {
    PI / 2f64.powi((num_qubits - qubit) as i32)
}

/// Appends S+ or S- for the whole register of `builder`.
pub fn apply_shift(builder: &mut CircuitBuilder, direction: Direction) -> Result<()> {
    let num_qubits = builder.num_qubits();
    if num_qubits < MIN_QUBITS {
        return Err(WalkError::invalid_config(
            "num_qubits",
            format!("a shift needs at least {} qubits, got {}", MIN_QUBITS, num_qubits),
        ));
    }
    let sign = direction.sign();

    for i in COIN_QUBIT + 1..num_qubits {
        builder
            .cnot(i, COIN_QUBIT)
            .phase(sign * kick_angle(num_qubits, i), COIN_QUBIT)
            .cnot(i, COIN_QUBIT);
    }
    builder.phase(-sign * compensating_coefficient(num_qubits) * PI, COIN_QUBIT);
    for i in COIN_QUBIT + 1..num_qubits {
        builder.phase(sign * kick_angle(num_qubits, i), i);
    }
    Ok(())
}

/// Closed-form phase angle S± imprints on the basis state `basis_index`.
///
/// Zero when the coin bit is set or there is no position register,
/// otherwise `±2πk / 2^{n-1}` with `k = basis_index >> 1`.
pub fn fourier_phase(direction: Direction, num_qubits: usize, basis_index: usize) -> f64 {
    if num_qubits <= 1 || basis_index & (1 << COIN_QUBIT) != 0 {
        return 0.0;
    }
    let k = (basis_index >> 1) as f64;
    let m = 2f64.powi((num_qubits - 1) as i32);
    direction.sign() * 2.0 * PI * k / m
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operations::Gate;

    #[test]
    fn test_compensating_coefficient_closed_form() {
        assert_eq!(compensating_coefficient(2), 0.5);
        assert_eq!(compensating_coefficient(3), 0.75);
        assert_eq!(compensating_coefficient(4), 0.875);
        let summed: f64 = (1..9).map(|i| 0.5f64.powi(i)).sum();
        assert_eq!(compensating_coefficient(9), summed);
    }

    #[test]
    fn test_minus_negates_every_angle() -> Result<()> {
        let mut plus = CircuitBuilder::new(4);
        apply_shift(&mut plus, Direction::Plus)?;
        let mut minus = CircuitBuilder::new(4);
        apply_shift(&mut minus, Direction::Minus)?;

        assert_eq!(plus.gates().len(), 3 * 3 + 1 + 3);
        for (p, m) in plus.gates().iter().zip(minus.gates()) {
            assert_eq!(&p.inverse(), m);
        }
        Ok(())
    }

    #[test]
    fn test_plus_gate_layout() -> Result<()> {
        let mut builder = CircuitBuilder::new(3);
        apply_shift(&mut builder, Direction::Plus)?;
        let gates = builder.gates();
        assert_eq!(gates[0], Gate::ControlledNot { control: 1, target: 0 });
        assert_eq!(gates[1], Gate::Phase { target: 0, theta: PI / 4.0 });
        assert_eq!(gates[4], Gate::Phase { target: 0, theta: PI / 2.0 });
        assert_eq!(gates[6], Gate::Phase { target: 0, theta: -0.75 * PI });
        assert_eq!(gates[7], Gate::Phase { target: 1, theta: PI / 4.0 });
        assert_eq!(gates[8], Gate::Phase { target: 2, theta: PI / 2.0 });
        Ok(())
    }

    #[test]
    fn test_fourier_phase() {
        // coin set: untouched
        assert_eq!(fourier_phase(Direction::Plus, 3, 0b011), 0.0);
        // k = 1 of M = 4
        assert_eq!(fourier_phase(Direction::Plus, 3, 0b010), PI / 2.0);
        assert_eq!(fourier_phase(Direction::Minus, 3, 0b110), -3.0 * PI / 2.0);
    }

    #[test]
    fn test_fourier_phase_without_position_register() {
        assert_eq!(fourier_phase(Direction::Plus, 0, 0), 0.0);
        assert_eq!(fourier_phase(Direction::Minus, 0, 0b10), 0.0);
        assert_eq!(fourier_phase(Direction::Plus, 1, 0), 0.0);
    }

    #[test]
    fn test_shift_needs_two_qubits() {
        let mut builder = CircuitBuilder::new(1);
        assert!(apply_shift(&mut builder, Direction::Plus).is_err());
    }
}
