//! Error handling logic

use std::time::Duration;
use thiserror::Error;

/// Result type alias for walk construction, simulation and aggregation.
pub type Result<T> = std::result::Result<T, WalkError>;

/// Errors raised while building, simulating or aggregating a quantum walk.
///
/// Construction errors (index, transition and configuration variants) are
/// fatal for the circuit being built. [`WalkError::Backend`] is recoverable at
/// iteration granularity, see [`crate::aggregate::FailurePolicy`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WalkError {
    /// A gate or measurement addresses a qubit outside `[0, num_qubits)`.
    #[error("Qubit {qubit} is out of range for a {num_qubits}-qubit register")]
    QubitOutOfRange {
        /// Offending qubit index.
        qubit: usize,
        /// Register size.
        num_qubits: usize,
    },

    /// A two-qubit gate uses the same qubit as control and target.
    #[error("Qubit {qubit} used as both control and target")]
    DuplicateQubit {
        /// Offending qubit index.
        qubit: usize,
    },

    /// Invalid configuration value, rejected before any circuit is built.
    #[error("Invalid configuration '{name}': {reason}")]
    InvalidConfig {
        /// Parameter name.
        name: String,
        /// Reason why the parameter is invalid.
        reason: String,
    },

    /// The walk composer was asked for a transition its current phase forbids.
    #[error("Cannot {action} while the walk is {from}")]
    InvalidTransition {
        /// Phase the composer was in.
        from: String,
        /// Requested action.
        action: String,
    },

    /// The state vector lost its unit norm or has the wrong dimension.
    #[error("Incoherent state: {message}")]
    Incoherence {
        /// Incoherence failure message
        message: String,
    },

    /// Two outcome tables with different bit widths were combined.
    #[error("Bit width mismatch: expected {expected}, got {actual}")]
    WidthMismatch {
        /// Expected width.
        expected: usize,
        /// Width encountered.
        actual: usize,
    },

    /// Outcome counts returned by a backend violate their contract.
    #[error("Malformed outcome counts: {message}")]
    MalformedCounts {
        /// Description of the violation.
        message: String,
    },

    /// The execution backend failed to complete a run.
    #[error("Backend failure: {0}")]
    Backend(#[from] BackendError),

    /// Every iteration of an aggregation run failed.
    #[error("None of the {attempted} iterations completed")]
    NoCompletedIterations {
        /// Number of iterations attempted.
        attempted: usize,
    },
}

impl WalkError {
    /// Create an invalid configuration error.
    pub fn invalid_config(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create an incoherence error.
    pub fn incoherence(message: impl Into<String>) -> Self {
        Self::Incoherence {
            message: message.into(),
        }
    }

    /// Create a malformed counts error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedCounts {
            message: message.into(),
        }
    }

    /// Whether this error came from the execution backend rather than from
    /// circuit construction.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, WalkError::Backend(_) | WalkError::MalformedCounts { .. })
    }
}

/// Failures of an execution backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The request did not complete within the configured deadline.
    #[error("request timed out after {after:?}")]
    Timeout {
        /// Deadline that elapsed.
        after: Duration,
    },

    /// The backend could not be reached or is not accepting work.
    #[error("backend unavailable: {message}")]
    Unavailable {
        /// Failure message
        message: String,
    },

    /// The backend refused the circuit or request.
    #[error("request rejected: {message}")]
    Rejected {
        /// Failure message
        message: String,
    },

    /// The worker servicing the request went away without answering.
    #[error("backend worker disconnected before replying")]
    Disconnected,

    /// The request was cancelled before it finished.
    #[error("request cancelled")]
    Cancelled,
}
