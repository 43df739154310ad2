// src/backend/executor.rs
use super::{Backend, Cancellation, ExecutionRequest};
use crate::core::{BackendError, Result};
use crate::simulation::OutcomeCounts;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Runs requests against a shared backend, optionally under a deadline.
///
/// Without a timeout the backend is called on the current thread. With one,
/// the call moves to a worker thread and the caller stops waiting once the
/// deadline passes. The worker's request is then cancelled so a backend that
/// polls [`ExecutionRequest::cancellation`] stops early; any late result is
/// dropped.
#[derive(Clone)]
pub struct Executor {
    backend: Arc<dyn Backend>,
    timeout: Option<Duration>,
}

impl Executor {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend, timeout: None }
    }

    /// Bounds every call by `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Executes `request` and checks the returned counts.
    ///
    /// # Errors
    /// * [`crate::WalkError::Backend`] for timeouts and backend failures.
    /// * [`crate::WalkError::WidthMismatch`] or
    ///   [`crate::WalkError::MalformedCounts`] if the counts break the
    ///   backend contract.
    #[tracing::instrument(level = "debug", skip(self, request), fields(backend = self.backend.name(), shots = request.shots))]
    pub fn run(&self, request: &ExecutionRequest) -> Result<OutcomeCounts> {
        let counts = self.dispatch(request)?;
        counts.validate(request.circuit.measured_bits(), request.shots)?;
        Ok(counts)
    }

    fn dispatch(&self, request: &ExecutionRequest) -> std::result::Result<OutcomeCounts, BackendError> {
        let Some(timeout) = self.timeout else {
            return self.backend.execute(request);
        };

        let (tx, rx) = mpsc::channel();
        let backend = Arc::clone(&self.backend);
        // each call gets its own flag so retries of a timed-out request start clean
        let cancellation = Cancellation::new();
        let mut owned = request.clone();
        owned.cancellation = cancellation.clone();
        thread::Builder::new()
            .name(format!("{}-worker", backend.name()))
            .spawn(move || {
                // the receiver is gone once the caller has timed out
                let _ = tx.send(backend.execute(&owned));
            })
            .map_err(|e| BackendError::Unavailable { message: e.to_string() })?;

        match rx.recv_timeout(timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => {
                cancellation.cancel();
                tracing::warn!(?timeout, "backend call abandoned");
                Err(BackendError::Timeout { after: timeout })
            }
            Err(RecvTimeoutError::Disconnected) => Err(BackendError::Disconnected),
        }
    }
}

impl std::fmt::Debug for Executor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Executor")
            .field("backend", &self.backend.name())
            .field("timeout", &self.timeout)
            .finish()
    }
}
