// src/validation/mod.rs

//! State checks shared by the simulator and the test suites.

use crate::core::{Result, StateVector, WalkError, NORM_TOLERANCE};

/// Checks that `Σ|c_i|² ≈ 1`.
///
/// # Arguments
/// * `state` - The state to check.
/// * `tolerance` - Allowed deviation from 1.0, defaults to `1e-9`.
///
/// # Returns
/// * `Ok(())` if normalised within tolerance.
/// * `Err(WalkError::Incoherence)` otherwise.
pub fn check_normalization(state: &StateVector, tolerance: Option<f64>) -> Result<()> {
    let effective_tolerance = tolerance.unwrap_or(NORM_TOLERANCE);
    let norm_sq = state.norm_sqr();
    if (norm_sq - 1.0).abs() > effective_tolerance || !norm_sq.is_finite() {
        Err(WalkError::incoherence(format!(
            "State vector normalization failed. Sum(|c_i|^2) = {} (Deviation > {})",
            norm_sq, effective_tolerance
        )))
    } else {
        Ok(())
    }
}

/// `|⟨a|b⟩|`, the overlap magnitude of two states of the same dimension.
///
/// Returns 0 when the dimensions differ.
pub fn overlap(a: &StateVector, b: &StateVector) -> f64 {
    if a.dim() != b.dim() {
        return 0.0;
    }
    a.vector()
        .iter()
        .zip(b.vector())
        .map(|(x, y)| x.conj() * y)
        .sum::<num_complex::Complex<f64>>()
        .norm()
}

/// Whether two normalised states are equal up to a global phase factor.
pub fn equal_up_to_global_phase(a: &StateVector, b: &StateVector, tolerance: f64) -> bool {
    a.dim() == b.dim() && (1.0 - overlap(a, b)).abs() <= tolerance
}
