// src/core/mod.rs

//! Core data structures and types

pub mod error;
pub mod state;

pub use error::{BackendError, Result, WalkError};
pub use state::StateVector;

pub mod constants;
pub use constants::walk_constants::{
    COIN_QUBIT, DEFAULT_COIN_THETA, DEFAULT_SHOTS, MAX_QUBITS, MIN_QUBITS, NORM_TOLERANCE, PI,
};
