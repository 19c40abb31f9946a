// src/gates/mod.rs

//! Gate operators and their embedding into the full register space.
//!
//! An [`Operator`] is a unitarity-checked matrix with a name. [`GateKind`]
//! is the closed set of gates the circuit editor can place; every kind
//! carries its own parameters and builds its operator on demand, so no
//! unreachable gate name can survive past the string boundary.

pub mod controlled;

pub use controlled::ControlledGate;

use crate::core::constants::engine_constants::UNITARITY_TOLERANCE;
use crate::core::{ComplexMatrix, QgridError};
use num_complex::Complex;
use num_traits::Zero;
use std::f64::consts::FRAC_1_SQRT_2;
use std::fmt;

/// A named unitary operator of dimension 2^k.
///
/// Construction validates squareness, power-of-two dimension, and unitarity
/// within [`UNITARITY_TOLERANCE`]; a violation makes the gate object
/// unusable and is reported as [`QgridError::Validation`].
#[derive(Debug, Clone, PartialEq)]
pub struct Operator {
    matrix: ComplexMatrix,
    name: String,
}

impl Operator {
    /// Validates and wraps a matrix as a gate operator.
    pub fn new(matrix: ComplexMatrix, name: impl Into<String>) -> Result<Self, QgridError> {
        let name = name.into();
        let dim = matrix.dim();
        if dim == 0 || !dim.is_power_of_two() {
            return Err(QgridError::Validation {
                message: format!(
                    "operator '{}' has dimension {}, which is not a positive power of two",
                    name, dim
                ),
            });
        }
        if !matrix.is_unitary(UNITARITY_TOLERANCE) {
            return Err(QgridError::Validation {
                message: format!("operator '{}' is not unitary", name),
            });
        }
        Ok(Self { matrix, name })
    }

    /// The underlying matrix.
    pub fn matrix(&self) -> &ComplexMatrix {
        &self.matrix
    }

    /// The operator's display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of qubits this operator acts on (log2 of its dimension).
    pub fn arity(&self) -> usize {
        self.matrix.dim().trailing_zeros() as usize
    }

    /// The conjugate-transpose operator. Unitary whenever `self` is, so the
    /// validity check cannot fail here.
    pub fn dagger(&self) -> Operator {
        Operator {
            matrix: self.matrix.dagger(),
            name: format!("{}†", self.name),
        }
    }

    /// Embeds this operator into the 2^n-dimensional register space at
    /// `target`.
    ///
    /// The result is the tensor product of n positional factors taken in
    /// qubit order: this operator substituted at `target` (consuming k
    /// adjacent positions for a 2^k operator), the 2×2 identity everywhere
    /// else. Taking qubit 0 as the leftmost factor is what places it in the
    /// most significant bits of the basis index.
    pub fn expand(&self, num_qubits: usize, target: usize) -> Result<ComplexMatrix, QgridError> {
        let k = self.arity();
        if target + k > num_qubits {
            return Err(QgridError::IndexOutOfRange {
                message: format!(
                    "operator '{}' ({} qubit) does not fit at target {} in a {}-qubit register",
                    self.name, k, target, num_qubits
                ),
            });
        }
        let mut full = ComplexMatrix::identity(1);
        let mut q = 0;
        while q < num_qubits {
            if q == target {
                full = full.kron(&self.matrix);
                q += k;
            } else {
                full = full.kron(&ComplexMatrix::identity(2));
                q += 1;
            }
        }
        Ok(full)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}:", self.name)?;
        write!(f, "{}", self.matrix)
    }
}

/// A rotation axis for the parameterized rotation gates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RotationAxis {
    X,
    Y,
    Z,
}

impl RotationAxis {
    /// Parses an axis letter from the editor's string boundary.
    pub fn parse(axis: &str) -> Result<Self, QgridError> {
        match axis {
            "X" | "x" => Ok(RotationAxis::X),
            "Y" | "y" => Ok(RotationAxis::Y),
            "Z" | "z" => Ok(RotationAxis::Z),
            _ => Err(QgridError::Validation {
                message: format!("invalid rotation axis: {}", axis),
            }),
        }
    }
}

/// Builds the 2×2 rotation operator for `axis` and angle `theta` using the
/// standard half-angle formulas.
pub fn rotation_operator(axis: RotationAxis, theta: f64) -> Result<Operator, QgridError> {
    let half = theta / 2.0;
    let (cos, sin) = (half.cos(), half.sin());
    let i = Complex::i();
    let (rows, name) = match axis {
        RotationAxis::X => (
            vec![
                vec![Complex::new(cos, 0.0), -i * sin],
                vec![-i * sin, Complex::new(cos, 0.0)],
            ],
            format!("RX({:.4})", theta),
        ),
        RotationAxis::Y => (
            vec![
                vec![Complex::new(cos, 0.0), Complex::new(-sin, 0.0)],
                vec![Complex::new(sin, 0.0), Complex::new(cos, 0.0)],
            ],
            format!("RY({:.4})", theta),
        ),
        RotationAxis::Z => (
            vec![
                vec![Complex::new(cos, -sin), Complex::zero()],
                vec![Complex::zero(), Complex::new(cos, sin)],
            ],
            format!("RZ({:.4})", theta),
        ),
    };
    Operator::new(ComplexMatrix::from_rows(&rows)?, name)
}

/// The closed set of gates the grid can hold.
///
/// Matched exhaustively wherever gates are applied, so an unhandled kind is
/// a compile error rather than a runtime surprise. Rotation kinds carry
/// their angle; there is no separate parameter map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GateKind {
    H,
    X,
    Y,
    Z,
    S,
    T,
    Rx(f64),
    Ry(f64),
    Rz(f64),
    Swap,
}

impl GateKind {
    /// Builds the validated operator for this gate kind.
    pub fn operator(&self) -> Result<Operator, QgridError> {
        let one = Complex::new(1.0, 0.0);
        let zero = Complex::zero();
        let i = Complex::i();
        let h = Complex::new(FRAC_1_SQRT_2, 0.0);
        match self {
            GateKind::H => Operator::new(
                ComplexMatrix::from_rows(&[vec![h, h], vec![h, -h]])?,
                "H",
            ),
            GateKind::X => Operator::new(
                ComplexMatrix::from_rows(&[vec![zero, one], vec![one, zero]])?,
                "X",
            ),
            GateKind::Y => Operator::new(
                ComplexMatrix::from_rows(&[vec![zero, -i], vec![i, zero]])?,
                "Y",
            ),
            GateKind::Z => Operator::new(
                ComplexMatrix::from_rows(&[vec![one, zero], vec![zero, -one]])?,
                "Z",
            ),
            GateKind::S => Operator::new(
                ComplexMatrix::from_rows(&[vec![one, zero], vec![zero, i]])?,
                "S",
            ),
            GateKind::T => Operator::new(
                ComplexMatrix::from_rows(&[
                    vec![one, zero],
                    vec![zero, Complex::new(FRAC_1_SQRT_2, FRAC_1_SQRT_2)],
                ])?,
                "T",
            ),
            GateKind::Rx(theta) => rotation_operator(RotationAxis::X, *theta),
            GateKind::Ry(theta) => rotation_operator(RotationAxis::Y, *theta),
            GateKind::Rz(theta) => rotation_operator(RotationAxis::Z, *theta),
            GateKind::Swap => Operator::new(
                ComplexMatrix::from_rows(&[
                    vec![one, zero, zero, zero],
                    vec![zero, zero, one, zero],
                    vec![zero, one, zero, zero],
                    vec![zero, zero, zero, one],
                ])?,
                "SWAP",
            ),
        }
    }

    /// Number of target qubits this gate acts on.
    pub fn arity(&self) -> usize {
        match self {
            GateKind::Swap => 2,
            _ => 1,
        }
    }

    /// Short symbol used in circuit diagrams.
    pub fn symbol(&self) -> &'static str {
        match self {
            GateKind::H => "H",
            GateKind::X => "X",
            GateKind::Y => "Y",
            GateKind::Z => "Z",
            GateKind::S => "S",
            GateKind::T => "T",
            GateKind::Rx(_) => "RX",
            GateKind::Ry(_) => "RY",
            GateKind::Rz(_) => "RZ",
            GateKind::Swap => "SW",
        }
    }

    /// Resolves an editor-facing gate name, with the rotation angle for the
    /// parameterized kinds. Returns `None` for names outside the supported
    /// set and for rotations placed without an angle.
    pub fn from_name(name: &str, theta: Option<f64>) -> Option<GateKind> {
        match name {
            "H" => Some(GateKind::H),
            "X" => Some(GateKind::X),
            "Y" => Some(GateKind::Y),
            "Z" => Some(GateKind::Z),
            "S" => Some(GateKind::S),
            "T" => Some(GateKind::T),
            "RX" | "Rx" => theta.map(GateKind::Rx),
            "RY" | "Ry" => theta.map(GateKind::Ry),
            "RZ" | "Rz" => theta.map(GateKind::Rz),
            "SWAP" | "SW" => Some(GateKind::Swap),
            _ => None,
        }
    }
}
