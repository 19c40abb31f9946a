// src/validation/mod.rs

//! Standalone checks on states and operators, shared by construction-time
//! validation and tests.

use crate::core::constants::engine_constants::{NORM_TOLERANCE, UNITARITY_TOLERANCE};
use crate::core::{ComplexMatrix, QgridError, QuantumState};

/// Checks that the state vector is normalized (sum of squared amplitudes
/// ≈ 1.0).
///
/// # Arguments
/// * `state` - The state to check.
/// * `tolerance` - Allowed deviation from 1.0; defaults to [`NORM_TOLERANCE`].
pub fn check_normalization(state: &QuantumState, tolerance: Option<f64>) -> Result<(), QgridError> {
    let effective_tolerance = tolerance.unwrap_or(NORM_TOLERANCE);
    let norm_sq: f64 = state.amplitudes().iter().map(|a| a.norm_sqr()).sum();
    if (norm_sq - 1.0).abs() > effective_tolerance {
        Err(QgridError::Validation {
            message: format!(
                "state normalization failed: sum(|amp|²) = {} (deviation > {})",
                norm_sq, effective_tolerance
            ),
        })
    } else {
        Ok(())
    }
}

/// Checks that `matrix · matrix†` is the identity within tolerance.
///
/// # Arguments
/// * `matrix` - The candidate operator matrix.
/// * `tolerance` - Entry-wise deviation bound; defaults to
///   [`UNITARITY_TOLERANCE`].
pub fn check_unitarity(matrix: &ComplexMatrix, tolerance: Option<f64>) -> Result<(), QgridError> {
    let effective_tolerance = tolerance.unwrap_or(UNITARITY_TOLERANCE);
    if matrix.is_unitary(effective_tolerance) {
        Ok(())
    } else {
        Err(QgridError::Validation {
            message: format!(
                "matrix of dimension {} is not unitary within {}",
                matrix.dim(),
                effective_tolerance
            ),
        })
    }
}
