//! Round-trip latency probe for a backend.
//!
//! Each round executes a one-qubit circuit (`X` then measure, 100 shots) and
//! records how long the executor took to answer.

use super::{ExecutionRequest, Executor};
use crate::circuits::{Circuit, CircuitBuilder};
use crate::core::{Result, WalkError};
use serde::Serialize;
use std::time::{Duration, Instant};

/// Shots per probe round.
pub const PROBE_SHOTS: u64 = 100;

/// Outcome of one probe round.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatencySample {
    pub round: usize,
    pub latency: Duration,
    /// Error message if the round failed.
    pub failure: Option<String>,
}

/// Summary over every probe round.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatencyReport {
    pub samples: Vec<LatencySample>,
    /// Fastest successful round.
    pub min: Option<Duration>,
    /// Mean over successful rounds.
    pub mean: Option<Duration>,
    /// Slowest successful round.
    pub max: Option<Duration>,
}

impl LatencyReport {
    /// Number of rounds that returned an error.
    pub fn failures(&self) -> usize {
        self.samples.iter().filter(|s| s.failure.is_some()).count()
    }

    fn summarize(samples: Vec<LatencySample>) -> Self {
        let ok: Vec<Duration> = samples
            .iter()
            .filter(|s| s.failure.is_none())
            .map(|s| s.latency)
            .collect();
        let mean = (!ok.is_empty()).then(|| ok.iter().sum::<Duration>() / ok.len() as u32);
        Self {
            min: ok.iter().min().copied(),
            max: ok.iter().max().copied(),
            mean,
            samples,
        }
    }
}

/// `X` on a single qubit followed by its measurement.
pub fn probe_circuit() -> Result<Circuit> {
    let mut builder = CircuitBuilder::new(1);
    builder.flip(0).measure(0, 0);
    builder.build()
}

/// Runs `rounds` probe executions back to back.
///
/// Failed rounds are recorded rather than returned; only an invalid round
/// count or a broken probe circuit is an error.
#[tracing::instrument(level = "info", skip(executor), fields(backend = executor.backend_name()))]
pub fn probe_latency(executor: &Executor, rounds: usize) -> Result<LatencyReport> {
    if rounds == 0 {
        return Err(WalkError::invalid_config("rounds", "must be at least 1"));
    }
    let request = ExecutionRequest::new(probe_circuit()?, PROBE_SHOTS);

    let mut samples = Vec::with_capacity(rounds);
    for round in 0..rounds {
        let start = Instant::now();
        let outcome = executor.run(&request);
        let latency = start.elapsed();
        let failure = match outcome {
            Ok(_) => {
                tracing::debug!(round, ?latency, "probe succeeded");
                None
            }
            Err(e) => {
                tracing::warn!(round, ?latency, error = %e, "probe failed");
                Some(e.to_string())
            }
        };
        samples.push(LatencySample { round, latency, failure });
    }
    Ok(LatencyReport::summarize(samples))
}
