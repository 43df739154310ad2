// src/lib.rs

//! `qwalk` - discrete-time quantum walks on a cyclic qubit register
//!
//! Qubit 0 is the coin, the remaining qubits encode a position on a cycle of
//! `2^(n-1)` sites. Each walk step applies a coin rotation and then translates
//! the position through the Fourier basis. The crate builds the circuit,
//! simulates it on a dense state vector, samples it and aggregates the
//! samples of many iterations into a position distribution.

pub mod core;
pub mod operations;
pub mod circuits;
pub mod simulation;
pub mod validation;
pub mod walk;
pub mod backend;
pub mod aggregate;

// Re-export the most common types for easier top-level use
pub use core::{BackendError, Result, StateVector, WalkError};
pub use operations::Gate;
pub use circuits::{Circuit, CircuitBuilder, Measurement};
pub use simulation::{Bitstring, OutcomeCounts, Simulator};
pub use validation::{check_normalization, equal_up_to_global_phase, overlap};
pub use walk::{compose, CoinAngles, Direction, StepSchedule, WalkComposer, WalkConfig, WalkPhase};
pub use backend::{Backend, Cancellation, ExecutionRequest, Executor, StateVectorBackend};
pub use aggregate::{
    simulate_walk, AggregateReport, Aggregator, Distribution, ExecutionConfig, FailurePolicy,
};

// Example 1: Single translation step
// A walker prepared at position 0 with its coin in |0⟩ moves to position 1
// under one S+ translation.
/// ```
/// use qwalk::{CircuitBuilder, Direction, Simulator, StateVector};
/// use qwalk::walk::{apply_shift, forward_qft, inverse_qft};
///
/// let mut builder = CircuitBuilder::new(3);
/// inverse_qft(&mut builder, 1..3)?;
/// apply_shift(&mut builder, Direction::Plus)?;
/// forward_qft(&mut builder, 1..3)?;
/// let circuit = builder.build()?;
///
/// let state = Simulator::new().run(&circuit)?;
/// // position 1 reads qubit 1 as its most significant bit, so it is |q2=1⟩
/// let expected = StateVector::basis(3, 0b100)?;
/// assert!(qwalk::equal_up_to_global_phase(&state, &expected, 1e-9));
/// # Ok::<(), qwalk::WalkError>(())
/// ```
#[doc(hidden)]
const _: () = (); // Attaches the preceding doc comment block to a hidden item

// Example 2: Full walk with aggregation
// Composes the reference walk on three qubits and samples it on the local
// backend.
/// ```
/// use qwalk::{Aggregator, ExecutionConfig, WalkConfig};
///
/// let walk = WalkConfig::new(3, 1).with_shots(1024).with_iterations(2);
/// let report = Aggregator::local(ExecutionConfig::default().with_seed(5)).run(&walk)?;
///
/// assert_eq!(report.completed, 2);
/// assert_eq!(report.merged.total(), 2048);
/// assert_eq!(report.distribution.entries().len(), 4);
/// assert!((report.distribution.sum() - 1.0).abs() < 1e-9);
/// # Ok::<(), qwalk::WalkError>(())
/// ```
#[doc(hidden)]
const _: () = ();
