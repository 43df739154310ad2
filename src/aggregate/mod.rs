// src/aggregate/mod.rs

//! Multi-iteration execution and result aggregation.
//!
//! The [`Aggregator`] runs `iterations` independent compose + execute tasks
//! on the rayon pool, merges their outcome counts and normalises the result
//! into a [`Distribution`]. How failed iterations are handled is decided by
//! the [`FailurePolicy`].

mod distribution;

pub use distribution::{Distribution, PositionProbability};

use crate::backend::{Backend, ExecutionRequest, Executor, StateVectorBackend};
use crate::core::{Result, WalkError};
use crate::simulation::OutcomeCounts;
use crate::walk::{compose, WalkConfig};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// What to do with an iteration that still fails after its retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Fail the whole run.
    #[default]
    Abort,
    /// Drop the iteration, record it, and aggregate the rest.
    DropFailed,
}

/// Execution settings shared by every iteration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionConfig {
    pub failure_policy: FailurePolicy,
    /// Extra attempts per iteration after the first failure.
    pub max_retries: usize,
    /// Deadline for one backend call.
    pub timeout: Option<Duration>,
    /// Base seed; iterations and attempts derive distinct seeds from it.
    pub seed: Option<u64>,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            failure_policy: FailurePolicy::Abort,
            max_retries: 0,
            timeout: None,
            seed: None,
        }
    }
}

impl ExecutionConfig {
    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn with_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.timeout == Some(Duration::ZERO) {
            return Err(WalkError::invalid_config("timeout", "must be positive"));
        }
        Ok(())
    }

    fn seed_for(&self, iteration: usize, attempt: usize) -> Option<u64> {
        self.seed.map(|base| {
            base.wrapping_add((iteration as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15))
                .wrapping_add(attempt as u64)
        })
    }
}

/// An iteration that exhausted its attempts.
#[derive(Debug, Clone, PartialEq)]
pub struct IterationFailure {
    pub iteration: usize,
    pub attempts: usize,
    /// Error of the last attempt.
    pub error: WalkError,
}

/// Result of an aggregation run.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateReport {
    pub distribution: Distribution,
    /// Key-wise sum of every completed iteration's counts.
    pub merged: OutcomeCounts,
    pub completed: usize,
    pub dropped: Vec<IterationFailure>,
    pub policy: FailurePolicy,
    /// Retries spent across all iterations.
    pub retries: usize,
}

enum IterationOutcome {
    Completed { counts: OutcomeCounts, retries: usize },
    Failed { failure: IterationFailure, retries: usize },
}

/// Runs and merges walk iterations against a backend.
#[derive(Debug, Clone)]
pub struct Aggregator {
    executor: Executor,
    config: ExecutionConfig,
}

impl Aggregator {
    /// Wraps `backend` in an [`Executor`] honouring `config.timeout`.
    pub fn new(backend: Arc<dyn Backend>, config: ExecutionConfig) -> Self {
        let executor = match config.timeout {
            Some(timeout) => Executor::new(backend).with_timeout(timeout),
            None => Executor::new(backend),
        };
        Self { executor, config }
    }

    /// Aggregator over the in-process state-vector backend.
    pub fn local(config: ExecutionConfig) -> Self {
        Self::new(Arc::new(StateVectorBackend::new()), config)
    }

    /// Runs `walk.iterations` iterations of `walk.shots` shots each.
    ///
    /// # Errors
    /// * Any configuration or construction error, regardless of policy.
    /// * Under [`FailurePolicy::Abort`], the error of the lowest-numbered
    ///   iteration that exhausted its retries.
    /// * [`WalkError::NoCompletedIterations`] if nothing completed.
    #[tracing::instrument(
        level = "info",
        skip(self, walk),
        fields(num_qubits = walk.num_qubits, steps = walk.step_count, iterations = walk.iterations)
    )]
    pub fn run(&self, walk: &WalkConfig) -> Result<AggregateReport> {
        walk.validate()?;
        self.config.validate()?;

        let outcomes = (0..walk.iterations)
            .into_par_iter()
            .map(|iteration| self.run_iteration(walk, iteration))
            .collect::<Vec<Result<IterationOutcome>>>();

        let mut merged = OutcomeCounts::new(walk.measured_bits());
        let mut completed = 0;
        let mut retries = 0;
        let mut dropped = Vec::new();
        for outcome in outcomes {
            match outcome? {
                IterationOutcome::Completed { counts, retries: spent } => {
                    merged.merge(&counts)?;
                    completed += 1;
                    retries += spent;
                }
                IterationOutcome::Failed { failure, retries: spent } => {
                    retries += spent;
                    if self.config.failure_policy == FailurePolicy::Abort {
                        tracing::error!(iteration = failure.iteration, error = %failure.error, "aborting run");
                        return Err(failure.error);
                    }
                    tracing::warn!(iteration = failure.iteration, error = %failure.error, "dropping iteration");
                    dropped.push(failure);
                }
            }
        }

        if completed == 0 {
            return Err(WalkError::NoCompletedIterations { attempted: walk.iterations });
        }
        let expected = walk.shots.checked_mul(completed as u64).ok_or_else(|| {
            WalkError::malformed(format!("{} iterations of {} shots overflow the total", completed, walk.shots))
        })?;
        let distribution = Distribution::from_counts(&merged, expected)?;
        tracing::info!(completed, dropped = dropped.len(), retries, "aggregation finished");

        Ok(AggregateReport {
            distribution,
            merged,
            completed,
            dropped,
            policy: self.config.failure_policy,
            retries,
        })
    }

    /// Composes and executes one iteration. `Err` is reserved for fatal
    /// construction errors; execution failures come back as
    /// [`IterationOutcome::Failed`].
    fn run_iteration(&self, walk: &WalkConfig, iteration: usize) -> Result<IterationOutcome> {
        let circuit = compose(walk)?;
        let mut request = ExecutionRequest::new(circuit, walk.shots);

        let mut attempt = 0;
        loop {
            request.seed = self.config.seed_for(iteration, attempt);
            match self.executor.run(&request) {
                Ok(counts) => return Ok(IterationOutcome::Completed { counts, retries: attempt }),
                Err(error) if attempt < self.config.max_retries => {
                    tracing::debug!(iteration, attempt, %error, "retrying iteration");
                    attempt += 1;
                }
                Err(error) => {
                    return Ok(IterationOutcome::Failed {
                        failure: IterationFailure { iteration, attempts: attempt + 1, error },
                        retries: attempt,
                    });
                }
            }
        }
    }
}

/// Runs `walk` on the local backend with default execution settings.
pub fn simulate_walk(walk: &WalkConfig) -> Result<AggregateReport> {
    Aggregator::local(ExecutionConfig::default()).run(walk)
}
