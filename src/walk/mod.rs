// src/walk/mod.rs

//! Quantum walk construction.
//!
//! One walk step is a coin on qubit 0 followed by a translation of the
//! position register, where a translation is the inverse QFT, a Fourier-basis
//! shift and the forward QFT. [`compose`] assembles the complete circuit for a
//! [`WalkConfig`].

pub mod coin;
pub mod composer;
pub mod config;
pub mod qft;
pub mod shift;

pub use coin::{apply_coin, CoinAngles};
pub use composer::{compose, CoinSide, WalkComposer, WalkPhase};
pub use config::{StepSchedule, WalkConfig};
pub use qft::{forward_qft, inverse_qft, LadderStats};
pub use shift::{apply_shift, compensating_coefficient, fourier_phase, Direction};
