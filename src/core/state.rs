// src/core/state.rs

use super::constants::walk_constants::{MAX_QUBITS, NORM_TOLERANCE};
use super::error::{Result, WalkError};
use num_complex::Complex;
use num_traits::{One, Zero};
use std::fmt;

/// Dense amplitude vector over the `2^n` computational basis states of an
/// `n`-qubit register.
///
/// Basis index bit `j` holds the value of qubit `j`, so qubit 0 is the least
/// significant bit. Every gate applied by the engine is unitary, which keeps
/// `Σ|c_i|² = 1` after each operation.
#[derive(Debug, Clone, PartialEq)] // Avoid Eq for floating-point complex numbers
pub struct StateVector {
    num_qubits: usize,
    amplitudes: Vec<Complex<f64>>,
}

impl StateVector {
    /// Creates the `|0…0⟩` state of an `num_qubits`-qubit register.
    pub fn zero(num_qubits: usize) -> Result<Self> {
        Self::basis(num_qubits, 0)
    }

    /// Creates the computational basis state `|index⟩`.
    pub fn basis(num_qubits: usize, index: usize) -> Result<Self> {
        let dim = dimension_for(num_qubits)?;
        if index >= dim {
            return Err(WalkError::incoherence(format!(
                "basis index {} does not exist in a {}-dimensional space",
                index, dim
            )));
        }
        let mut amplitudes = vec![Complex::zero(); dim];
        amplitudes[index] = Complex::one();
        Ok(Self { num_qubits, amplitudes })
    }

    /// Wraps an explicit amplitude vector.
    ///
    /// The length must be a power of two (at least 2) and the vector must be
    /// normalised.
    pub fn from_amplitudes(amplitudes: Vec<Complex<f64>>) -> Result<Self> {
        let dim = amplitudes.len();
        if dim < 2 || !dim.is_power_of_two() {
            return Err(WalkError::incoherence(format!(
                "amplitude vector length {} is not a power of two >= 2",
                dim
            )));
        }
        let num_qubits = dim.trailing_zeros() as usize;
        let state = Self { num_qubits, amplitudes };
        let norm_sq = state.norm_sqr();
        if (norm_sq - 1.0).abs() > NORM_TOLERANCE {
            return Err(WalkError::incoherence(format!(
                "Sum(|c_i|^2) = {} (deviation > {})",
                norm_sq, NORM_TOLERANCE
            )));
        }
        Ok(state)
    }

    /// Provides read-only access to the amplitudes.
    pub fn vector(&self) -> &[Complex<f64>] {
        &self.amplitudes
    }

    /// Provides mutable access for the simulation engine to modify the state.
    pub(crate) fn vector_mut(&mut self) -> &mut [Complex<f64>] {
        &mut self.amplitudes
    }

    /// Number of qubits in the register.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Number of basis states (`2^n`).
    pub fn dim(&self) -> usize {
        self.amplitudes.len()
    }

    /// `Σ|c_i|²`, 1 for a valid state.
    pub fn norm_sqr(&self) -> f64 {
        self.amplitudes.iter().map(|c| c.norm_sqr()).sum()
    }

    /// Born-rule probability of every basis state.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(|c| c.norm_sqr()).collect()
    }

    /// Probability of measuring the basis state `index`, 0 for indices outside
    /// the space.
    pub fn probability_of(&self, index: usize) -> f64 {
        self.amplitudes.get(index).map_or(0.0, |c| c.norm_sqr())
    }
}

fn dimension_for(num_qubits: usize) -> Result<usize> {
    if num_qubits == 0 || num_qubits > MAX_QUBITS {
        return Err(WalkError::invalid_config(
            "num_qubits",
            format!("must be within 1..={}, got {}", MAX_QUBITS, num_qubits),
        ));
    }
    1usize.checked_shl(num_qubits as u32).ok_or_else(|| {
        WalkError::invalid_config("num_qubits", "state vector dimension overflows usize")
    })
}

impl fmt::Display for StateVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "State[")?;
        for (i, c) in self.amplitudes.iter().enumerate() {
            write!(f, "{}{:.4}", if i > 0 { ", " } else { "" }, c)?;
        }
        write!(f, "]")
    }
}
