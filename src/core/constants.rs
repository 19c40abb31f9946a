//! Numeric tolerances and resource bounds used across the engine.

/// Tolerances and limits shared by gate validation, sampling, and state checks.
pub mod engine_constants {
    /// Maximum deviation of `U · U†` from the identity for an operator to
    /// count as unitary.
    pub const UNITARITY_TOLERANCE: f64 = 1e-8;

    /// Allowed deviation of a state vector's squared norm from 1.0.
    pub const NORM_TOLERANCE: f64 = 1e-9;

    /// Amplitudes with `|amp|²` below this are treated as numerical noise and
    /// skipped when accumulating measurement probabilities.
    pub const AMPLITUDE_CUTOFF: f64 = 1e-10;

    /// Guard against floating-point shortfall when walking the cumulative
    /// probability distribution during sampling.
    pub const SAMPLING_EPSILON: f64 = 1e-12;

    /// Upper bound on the register size. Full-register operators are dense
    /// 2^n × 2^n matrices, so the cost grows as 4^n; construction beyond this
    /// bound fails fast instead of attempting the allocation.
    pub const MAX_QUBITS: usize = 12;
}
