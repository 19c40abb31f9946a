// src/core/matrix.rs

//! Dense square complex matrices backing gate operators and full-register
//! expansions.

use crate::core::QgridError;
use num_complex::Complex;
use num_traits::Zero;
use std::fmt;

/// A dense, row-major square matrix over `Complex<f64>`.
///
/// Every operator in the engine, from a 2×2 gate to a full 2^n × 2^n
/// register transformation, is stored in this representation. The Kronecker
/// product places the left factor in the most significant bit positions of
/// the joint index, which is what fixes the engine's qubit-0-is-MSB
/// convention.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexMatrix {
    dim: usize,
    data: Vec<Complex<f64>>,
}

impl ComplexMatrix {
    /// Creates a `dim` × `dim` matrix of zeros.
    pub fn zeros(dim: usize) -> Self {
        Self {
            dim,
            data: vec![Complex::zero(); dim * dim],
        }
    }

    /// Creates the `dim` × `dim` identity matrix.
    pub fn identity(dim: usize) -> Self {
        let mut m = Self::zeros(dim);
        for i in 0..dim {
            m.data[i * dim + i] = Complex::new(1.0, 0.0);
        }
        m
    }

    /// Builds a matrix from explicit rows. Fails if the rows do not form a
    /// square matrix.
    pub fn from_rows(rows: &[Vec<Complex<f64>>]) -> Result<Self, QgridError> {
        let dim = rows.len();
        let mut data = Vec::with_capacity(dim * dim);
        for row in rows {
            if row.len() != dim {
                return Err(QgridError::Validation {
                    message: format!(
                        "matrix is not square: {} rows but a row of length {}",
                        dim,
                        row.len()
                    ),
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Self { dim, data })
    }

    /// The matrix dimension (number of rows = number of columns).
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Returns the entry at `(row, col)`.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Complex<f64> {
        self.data[row * self.dim + col]
    }

    /// Sets the entry at `(row, col)`.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: Complex<f64>) {
        self.data[row * self.dim + col] = value;
    }

    /// Matrix-vector product `self · v`. The caller guarantees matching
    /// dimensions; this is the hot path of every gate application.
    pub fn mul_vec(&self, v: &[Complex<f64>]) -> Vec<Complex<f64>> {
        let mut out = vec![Complex::zero(); self.dim];
        for (row, out_amp) in out.iter_mut().enumerate() {
            let mut acc = Complex::zero();
            for col in 0..self.dim {
                let entry = self.data[row * self.dim + col];
                if !entry.is_zero() {
                    acc += entry * v[col];
                }
            }
            *out_amp = acc;
        }
        out
    }

    /// Matrix product `self · other` for matrices of equal dimension.
    pub fn matmul(&self, other: &ComplexMatrix) -> ComplexMatrix {
        let dim = self.dim;
        let mut out = ComplexMatrix::zeros(dim);
        for row in 0..dim {
            for k in 0..dim {
                let a = self.data[row * dim + k];
                if a.is_zero() {
                    continue;
                }
                for col in 0..dim {
                    out.data[row * dim + col] += a * other.data[k * dim + col];
                }
            }
        }
        out
    }

    /// Kronecker product `self ⊗ other`. The left factor occupies the most
    /// significant bits of the combined row/column indices.
    pub fn kron(&self, other: &ComplexMatrix) -> ComplexMatrix {
        let dim = self.dim * other.dim;
        let mut out = ComplexMatrix::zeros(dim);
        for r1 in 0..self.dim {
            for c1 in 0..self.dim {
                let a = self.data[r1 * self.dim + c1];
                if a.is_zero() {
                    continue;
                }
                for r2 in 0..other.dim {
                    for c2 in 0..other.dim {
                        let row = r1 * other.dim + r2;
                        let col = c1 * other.dim + c2;
                        out.data[row * dim + col] = a * other.data[r2 * other.dim + c2];
                    }
                }
            }
        }
        out
    }

    /// Conjugate transpose `self†`.
    pub fn dagger(&self) -> ComplexMatrix {
        let dim = self.dim;
        let mut out = ComplexMatrix::zeros(dim);
        for row in 0..dim {
            for col in 0..dim {
                out.data[col * dim + row] = self.data[row * dim + col].conj();
            }
        }
        out
    }

    /// Checks `‖self · self† − I‖ < tolerance` entry-wise.
    pub fn is_unitary(&self, tolerance: f64) -> bool {
        let product = self.matmul(&self.dagger());
        let identity = ComplexMatrix::identity(self.dim);
        product.approx_eq(&identity, tolerance)
    }

    /// Entry-wise approximate equality within `tolerance`.
    pub fn approx_eq(&self, other: &ComplexMatrix, tolerance: f64) -> bool {
        self.dim == other.dim
            && self
                .data
                .iter()
                .zip(other.data.iter())
                .all(|(a, b)| (a - b).norm() < tolerance)
    }
}

impl fmt::Display for ComplexMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.dim {
            write!(f, "[")?;
            for col in 0..self.dim {
                let v = self.get(row, col);
                write!(f, "{}{:.4}", if col > 0 { ", " } else { "" }, v)?;
            }
            writeln!(f, "]")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(re: f64, im: f64) -> Complex<f64> {
        Complex::new(re, im)
    }

    #[test]
    fn identity_is_unitary() {
        assert!(ComplexMatrix::identity(4).is_unitary(1e-12));
    }

    #[test]
    fn kron_of_identities_is_identity() {
        let a = ComplexMatrix::identity(2);
        let b = ComplexMatrix::identity(4);
        assert_eq!(a.kron(&b), ComplexMatrix::identity(8));
    }

    #[test]
    fn kron_places_left_factor_in_high_bits() {
        // X ⊗ I on two qubits swaps the high bit: |00> <-> |10>, |01> <-> |11>.
        let x = ComplexMatrix::from_rows(&[
            vec![c(0.0, 0.0), c(1.0, 0.0)],
            vec![c(1.0, 0.0), c(0.0, 0.0)],
        ])
        .unwrap();
        let full = x.kron(&ComplexMatrix::identity(2));
        let v = vec![c(1.0, 0.0), c(0.0, 0.0), c(0.0, 0.0), c(0.0, 0.0)];
        let out = full.mul_vec(&v);
        assert_eq!(out[2], c(1.0, 0.0));
        assert!(out[0].is_zero() && out[1].is_zero() && out[3].is_zero());
    }

    #[test]
    fn from_rows_rejects_ragged_input() {
        let result = ComplexMatrix::from_rows(&[vec![c(1.0, 0.0)], vec![]]);
        assert!(matches!(result, Err(QgridError::Validation { .. })));
    }

    #[test]
    fn dagger_conjugates_and_transposes() {
        let m = ComplexMatrix::from_rows(&[
            vec![c(0.0, 0.0), c(0.0, -1.0)],
            vec![c(0.0, 1.0), c(0.0, 0.0)],
        ])
        .unwrap();
        let d = m.dagger();
        assert_eq!(d.get(0, 1), c(0.0, -1.0));
        assert_eq!(d.get(1, 0), c(0.0, 1.0));
    }
}
