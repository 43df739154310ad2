//! Quantum Fourier transform ladders over a contiguous sub-register.
//!
//! Both ladders couple qubits `m` and `m + d` with a controlled phase of
//! `±π / 2^d`, where `d` is the absolute index distance between the two
//! qubits. Candidate partners are enumerated for every distance up to the
//! register length; partners falling outside the sub-register are skipped
//! by an explicit range check and counted in [`LadderStats::skipped`].
//!
//! [`inverse_qft`] followed by [`forward_qft`] is the identity, and so is the
//! reverse order: the second ladder is the first one read backwards with
//! every angle negated.

use crate::circuits::CircuitBuilder;
use crate::core::{Result, WalkError, PI};
use std::ops::Range;

/// Gate counts produced by one ladder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LadderStats {
    /// Hadamards appended.
    pub hadamards: usize,
    /// Controlled phases appended.
    pub couplings: usize,
    /// Candidate couplings whose partner lay outside the sub-register.
    pub skipped: usize,
}

/// Coupling angle for two qubits `distance` apart (`2π / 2^{distance+1}`).
pub fn coupling_angle(distance: usize) -> f64 {
    PI / 2f64.powi(distance as i32)
}

/// Appends the positive-angle ladder: for each qubit from the low end of
/// `range` upwards, a Hadamard followed by its couplings to the qubits above.
pub fn inverse_qft(builder: &mut CircuitBuilder, range: Range<usize>) -> Result<LadderStats> {
    check_range(builder, &range)?;
    let len = range.len();
    let mut stats = LadderStats::default();

    for m in range.clone() {
        builder.hadamard(m);
        stats.hadamards += 1;
        for distance in 1..=len {
            let partner = m + distance;
            if partner >= range.end {
                stats.skipped += 1;
                continue;
            }
            builder.controlled_phase(coupling_angle(distance), m, partner);
            stats.couplings += 1;
        }
    }

    tracing::trace!(?range, ?stats, "inverse QFT ladder appended");
    Ok(stats)
}

/// Appends the negative-angle ladder: for each qubit from the high end of
/// `range` downwards, its couplings to the qubits above (largest distance
/// first) followed by a Hadamard.
pub fn forward_qft(builder: &mut CircuitBuilder, range: Range<usize>) -> Result<LadderStats> {
    check_range(builder, &range)?;
    let len = range.len();
    let mut stats = LadderStats::default();

    for m in range.clone().rev() {
        for distance in (1..=len).rev() {
            let partner = m + distance;
            if partner >= range.end {
                stats.skipped += 1;
                continue;
            }
            builder.controlled_phase(-coupling_angle(distance), partner, m);
            stats.couplings += 1;
        }
        builder.hadamard(m);
        stats.hadamards += 1;
    }

    tracing::trace!(?range, ?stats, "forward QFT ladder appended");
    Ok(stats)
}

fn check_range(builder: &CircuitBuilder, range: &Range<usize>) -> Result<()> {
    if range.end > builder.num_qubits() {
        return Err(WalkError::QubitOutOfRange {
            qubit: range.end - 1,
            num_qubits: builder.num_qubits(),
        });
    }
    Ok(())
}
