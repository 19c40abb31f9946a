// src/core/state.rs

use crate::core::constants::engine_constants::{AMPLITUDE_CUTOFF, MAX_QUBITS};
use crate::core::matrix::ComplexMatrix;
use crate::core::QgridError;
use num_complex::Complex;
use num_traits::Zero;
use std::fmt;

/// Extracts the bit of basis index `index` belonging to `qubit`.
///
/// Qubit 0 occupies the most significant position of the joint basis index:
/// the bit for qubit `q` is `(index >> (n - 1 - q)) & 1`. Every module in the
/// engine reads per-qubit bits through this helper so the convention cannot
/// drift between gate expansion and measurement.
#[inline]
pub(crate) fn bit_of(index: usize, qubit: usize, num_qubits: usize) -> u8 {
    ((index >> (num_qubits - 1 - qubit)) & 1) as u8
}

/// The statevector of an n-qubit register: 2^n complex amplitudes.
///
/// A `QuantumState` is immutable once constructed. Applying a gate or a
/// measurement yields a new state and leaves the original untouched, so a
/// caller stepping through a circuit can retain intermediate states for
/// display or discard them freely.
#[derive(Debug, Clone, PartialEq)]
pub struct QuantumState {
    num_qubits: usize,
    amplitudes: Vec<Complex<f64>>,
}

impl QuantumState {
    /// Creates the all-zero basis state `|0...0>` for `num_qubits` qubits.
    ///
    /// Fails with [`QgridError::ResourceLimit`] when `num_qubits` is zero or
    /// exceeds [`MAX_QUBITS`], before any 2^n allocation is attempted.
    pub fn new(num_qubits: usize) -> Result<Self, QgridError> {
        if num_qubits == 0 {
            return Err(QgridError::ResourceLimit {
                message: "cannot create a state with zero qubits".to_string(),
            });
        }
        if num_qubits > MAX_QUBITS {
            return Err(QgridError::ResourceLimit {
                message: format!(
                    "requested {} qubits exceeds the supported maximum of {}",
                    num_qubits, MAX_QUBITS
                ),
            });
        }
        let dim = 1usize << num_qubits;
        let mut amplitudes = vec![Complex::zero(); dim];
        amplitudes[0] = Complex::new(1.0, 0.0);
        Ok(Self {
            num_qubits,
            amplitudes,
        })
    }

    /// Builds a state directly from an amplitude vector. Internal: callers
    /// inside the crate guarantee `amplitudes.len() == 2^num_qubits`.
    pub(crate) fn from_amplitudes(num_qubits: usize, amplitudes: Vec<Complex<f64>>) -> Self {
        debug_assert_eq!(amplitudes.len(), 1 << num_qubits);
        Self {
            num_qubits,
            amplitudes,
        }
    }

    /// Number of qubits in the register.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Dimension of the amplitude vector (2^n).
    pub fn dim(&self) -> usize {
        self.amplitudes.len()
    }

    /// Read-only view of the amplitude vector.
    pub fn amplitudes(&self) -> &[Complex<f64>] {
        &self.amplitudes
    }

    /// Applies a full-register operator, returning the transformed state.
    ///
    /// The matrix dimension must equal the state dimension; a mismatch is a
    /// caller error surfaced as [`QgridError::IndexOutOfRange`] rather than
    /// an out-of-bounds read.
    pub fn apply(&self, matrix: &ComplexMatrix) -> Result<QuantumState, QgridError> {
        if matrix.dim() != self.dim() {
            return Err(QgridError::IndexOutOfRange {
                message: format!(
                    "operator dimension {} does not match state dimension {}",
                    matrix.dim(),
                    self.dim()
                ),
            });
        }
        Ok(QuantumState {
            num_qubits: self.num_qubits,
            amplitudes: matrix.mul_vec(&self.amplitudes),
        })
    }

    /// Euclidean norm of the amplitude vector. Unitary evolution keeps this
    /// at 1 up to floating-point error.
    pub fn norm(&self) -> f64 {
        self.amplitudes
            .iter()
            .map(|a| a.norm_sqr())
            .sum::<f64>()
            .sqrt()
    }

    /// The probability distribution over computational basis states, keyed by
    /// bit string (qubit 0 first). Entries below [`AMPLITUDE_CUTOFF`] are
    /// omitted. This is the read-only view the display layer consumes.
    pub fn probabilities(&self) -> Vec<(String, f64)> {
        self.amplitudes
            .iter()
            .enumerate()
            .filter_map(|(i, amp)| {
                let p = amp.norm_sqr();
                if p < AMPLITUDE_CUTOFF {
                    return None;
                }
                let bits: String = (0..self.num_qubits)
                    .map(|q| {
                        if bit_of(i, q, self.num_qubits) == 1 {
                            '1'
                        } else {
                            '0'
                        }
                    })
                    .collect();
                Some((bits, p))
            })
            .collect()
    }
}

impl fmt::Display for QuantumState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "State[")?;
        for (i, amp) in self.amplitudes.iter().enumerate() {
            write!(f, "{}{:.4}", if i > 0 { ", " } else { "" }, amp)?;
        }
        write!(f, "]")
    }
}
