//! Numeric constants shared by the walk, the simulator and the sampler.

/// Constants used throughout the crate.
pub mod walk_constants {
    /// Used for phase angles (`e^(iθ)`)
    pub const PI: f64 = std::f64::consts::PI;
    /// Largest register the dense simulator accepts (`2^24` amplitudes).
    pub const MAX_QUBITS: usize = 24;
    /// Smallest register: one coin qubit plus one position qubit.
    pub const MIN_QUBITS: usize = 2;
    /// Index of the coin qubit.
    pub const COIN_QUBIT: usize = 0;
    /// Shots per execution used by the reference experiments.
    pub const DEFAULT_SHOTS: u64 = 8192;
    /// Coin angle used by both halves of the reference coin.
    pub const DEFAULT_COIN_THETA: f64 = -0.4;
    /// Allowed deviation of `Σ|c_i|²` from 1.
    pub const NORM_TOLERANCE: f64 = 1e-9;
}
