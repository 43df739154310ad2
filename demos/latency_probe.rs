//! Measures round-trip latency of the local backend.
//!
//! ```text
//! cargo run --example latency_probe -- [rounds]
//! ```

use qwalk::backend::monitor::probe_latency;
use qwalk::{Executor, StateVectorBackend};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("qwalk=debug")))
        .init();

    let rounds = match std::env::args().nth(1).map(|raw| raw.parse::<usize>()) {
        None => 10,
        Some(Ok(rounds)) => rounds,
        Some(Err(e)) => {
            eprintln!("error: rounds must be a positive integer ({})", e);
            return ExitCode::from(2);
        }
    };

    let executor = Executor::new(Arc::new(StateVectorBackend::new())).with_timeout(Duration::from_secs(5));
    let report = match probe_latency(&executor, rounds) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("probe failed: {}", e);
            return ExitCode::from(2);
        }
    };

    for sample in &report.samples {
        match &sample.failure {
            None => println!("round {:>3}: {:?}", sample.round + 1, sample.latency),
            Some(message) => println!("round {:>3}: failed after {:?}: {}", sample.round + 1, sample.latency, message),
        }
    }
    println!(
        "min {:?}  mean {:?}  max {:?}  failures {}",
        report.min.unwrap_or_default(),
        report.mean.unwrap_or_default(),
        report.max.unwrap_or_default(),
        report.failures()
    );
    if report.failures() == report.samples.len() {
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}
