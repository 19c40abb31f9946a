// src/lib.rs

//! `qugrid` - A statevector simulation engine for grid-shaped quantum circuits
//!
//! The circuit is a grid: each row is a qubit, each column a discrete time
//! step. The interpreter resolves control and anti-control markers into
//! concrete controlled operators, evolves an immutable-per-step statevector,
//! and samples projective measurements through an injected random source.
//!
//! ```
//! use qugrid::{CircuitBuilder, CircuitInterpreter, GateKind};
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! // Build a Bell pair: H on qubit 0, then X on qubit 1 controlled by qubit 0.
//! let circuit = CircuitBuilder::new(2)
//!     .gate(0, 0, GateKind::H)
//!     .control(1, 0)
//!     .gate(1, 1, GateKind::X)
//!     .build()
//!     .expect("valid circuit");
//!
//! let mut interpreter = CircuitInterpreter::new(2, StdRng::seed_from_u64(42))
//!     .expect("register within bounds");
//! let result = interpreter.run(&circuit).expect("run succeeds");
//!
//! // Amplitude lands on |00> and |11> only.
//! let amps = result.state().amplitudes();
//! assert!((amps[0].norm_sqr() - 0.5).abs() < 1e-9);
//! assert!((amps[3].norm_sqr() - 0.5).abs() < 1e-9);
//! assert!(amps[1].norm_sqr() < 1e-12 && amps[2].norm_sqr() < 1e-12);
//! ```

pub mod backend;
pub mod circuit;
pub mod core;
pub mod gates;
pub mod interpreter;
pub mod measurement;
pub mod validation;

// Re-export the most common types for easier top-level use
pub use crate::circuit::{Circuit, CircuitBuilder, CircuitStep, GateOp, StepItem};
pub use crate::core::{ComplexMatrix, QgridError, QuantumState};
pub use crate::gates::{ControlledGate, GateKind, Operator, RotationAxis};
pub use crate::interpreter::{CircuitInterpreter, MeasurementRecord, RunResult};
pub use crate::measurement::MeasurementEngine;
pub use crate::validation::{check_normalization, check_unitarity};
