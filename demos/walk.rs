//! Runs the reference walk and prints its position distribution.
//!
//! ```text
//! cargo run --example walk -- <qubit_count> <steps> [iterations]
//! ```
//!
//! Set `RUST_LOG=qwalk=debug` to see per-iteration events.

use qwalk::{Aggregator, ExecutionConfig, FailurePolicy, WalkConfig};
use std::process::ExitCode;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

fn parse_arg(args: &[String], index: usize, name: &str) -> Result<Option<usize>, String> {
    match args.get(index) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<usize>()
            .map(Some)
            .map_err(|e| format!("{} must be a non-negative integer, got '{}' ({})", name, raw, e)),
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("qwalk=info")))
        .with_target(false)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let parsed = (|| -> Result<(usize, usize, usize), String> {
        let qubits = parse_arg(&args, 0, "qubit_count")?.ok_or("missing <qubit_count>")?;
        let steps = parse_arg(&args, 1, "steps")?.ok_or("missing <steps>")?;
        let iterations = parse_arg(&args, 2, "iterations")?.unwrap_or(1);
        Ok((qubits, steps, iterations))
    })();
    let (qubits, steps, iterations) = match parsed {
        Ok(values) => values,
        Err(message) => {
            eprintln!("error: {}", message);
            eprintln!("usage: walk <qubit_count> <steps> [iterations]");
            return ExitCode::from(2);
        }
    };

    let walk = WalkConfig::new(qubits, steps).with_iterations(iterations);
    if let Err(e) = walk.validate() {
        eprintln!("error: {}", e);
        return ExitCode::from(2);
    }
    let execution = ExecutionConfig::default()
        .with_policy(FailurePolicy::DropFailed)
        .with_retries(1);

    println!("{}-qubit walk, {} step(s), {} iteration(s)", qubits, steps, iterations);
    let start = Instant::now();
    let report = match Aggregator::local(execution).run(&walk) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("walk failed: {}", e);
            return ExitCode::from(1);
        }
    };
    println!("counts: {}", report.merged);
    println!("execution time: {:?}", start.elapsed());
    println!();
    print!("{}", report.distribution);

    match report.distribution.to_json() {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("could not render distribution: {}", e);
            return ExitCode::from(1);
        }
    }
    ExitCode::SUCCESS
}
