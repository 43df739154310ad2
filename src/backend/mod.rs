// src/backend/mod.rs

//! Circuit execution.
//!
//! A [`Backend`] turns a finished [`Circuit`] into outcome counts. The
//! [`Executor`] wraps any backend with a deadline and checks the counts it
//! returns before handing them on.

mod executor;
mod local;
pub mod monitor;

pub use executor::Executor;
pub use local::StateVectorBackend;

use crate::circuits::Circuit;
use crate::core::BackendError;
use crate::simulation::OutcomeCounts;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared flag asking a backend to stop working on a request.
///
/// Clones observe the same flag. Once set it stays set.
#[derive(Debug, Clone, Default)]
pub struct Cancellation(Arc<AtomicBool>);

impl Cancellation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

// Two handles are equal when they share a flag.
impl PartialEq for Cancellation {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// One sampling job.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionRequest {
    /// Circuit to run; its measurement map fixes the key width.
    pub circuit: Circuit,
    /// Number of samples to draw.
    pub shots: u64,
    /// Seed for reproducible sampling. `None` draws a fresh seed.
    pub seed: Option<u64>,
    /// Checked by backends while they work; a set flag means the result is
    /// no longer wanted.
    pub cancellation: Cancellation,
}

impl ExecutionRequest {
    pub fn new(circuit: Circuit, shots: u64) -> Self {
        Self { circuit, shots, seed: None, cancellation: Cancellation::new() }
    }

    /// Fixes the sampling seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Anything able to sample a circuit.
///
/// Implementations must return counts whose keys are exactly
/// `circuit.measured_bits()` wide and whose values sum to `shots`. Long-running
/// implementations should poll `request.cancellation` and return
/// [`BackendError::Cancelled`] once it is set.
pub trait Backend: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Runs `request` to completion.
    fn execute(&self, request: &ExecutionRequest) -> Result<OutcomeCounts, BackendError>;
}
