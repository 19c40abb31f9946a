// src/core/mod.rs

//! Core data structures and types

// Declare modules within core
pub mod constants;
pub mod error;
pub mod matrix;
pub mod state;

// Re-export public types for convenient access via `qugrid::core::TypeName`
pub use error::QgridError;
pub use matrix::ComplexMatrix;
pub use state::QuantumState;

pub(crate) use state::bit_of;
