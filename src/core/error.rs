//! Error handling logic

use std::fmt;

/// Error types covering the failure modes of the simulation engine.
///
/// Gate construction, circuit building, interpretation, and measurement all
/// surface failures through this enum; no operation is retried automatically.
#[derive(Debug, Clone, PartialEq, Eq)] // Eq useful for testing error variants
pub enum QgridError {
    /// An operator failed construction-time validation: not unitary within
    /// tolerance, not square, or its dimension is not a power of two.
    /// Fatal for that gate object.
    Validation {
        /// Validation failure message
        message: String,
    },

    /// A circuit cell references a gate name outside the supported set.
    /// Carries the grid position so the editor can highlight the cell.
    UnknownGate {
        /// The unrecognized gate name.
        name: String,
        /// Time-step column of the offending cell.
        step: usize,
        /// Qubit row of the offending cell.
        qubit: usize,
    },

    /// A qubit or step index is out of range, or a matrix/state dimension
    /// mismatch was caught before application.
    IndexOutOfRange {
        /// IndexOutOfRange failure message
        message: String,
    },

    /// The requested register size exceeds what the engine will allocate.
    ResourceLimit {
        /// ResourceLimit failure message
        message: String,
    },
}

impl fmt::Display for QgridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QgridError::Validation { message } => write!(f, "Validation Error: {}", message),
            QgridError::UnknownGate { name, step, qubit } => {
                write!(f, "Unknown Gate: '{}' at step {}, qubit {}", name, step, qubit)
            }
            QgridError::IndexOutOfRange { message } => write!(f, "Index Error: {}", message),
            QgridError::ResourceLimit { message } => write!(f, "Resource Limit: {}", message),
        }
    }
}

// Implement the standard Error trait to allow for easy integration with Rust error handling.
impl std::error::Error for QgridError {}
