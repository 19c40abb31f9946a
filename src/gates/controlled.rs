// src/gates/controlled.rs

//! Construction of controlled and anti-controlled full-register operators.

use crate::core::{bit_of, ComplexMatrix, QgridError};
use crate::gates::Operator;
use num_complex::Complex;
use std::collections::BTreeMap;

/// A base operator conditioned on a set of control qubits.
///
/// `controls` maps each control qubit to its required bit value: 1 for a
/// control, 0 for an anti-control. Both kinds are handled by the same
/// comparison; no qubit is flipped before or after. `targets` lists the
/// qubits the base operator acts on, in order, with the first target
/// supplying the most significant bit of the operator's own index space.
/// Targets and controls may be any disjoint subsets of the register,
/// contiguous or not.
///
/// Instances are built fresh per application and not cached.
#[derive(Debug, Clone)]
pub struct ControlledGate {
    operator: Operator,
    controls: BTreeMap<usize, u8>,
    targets: Vec<usize>,
}

impl ControlledGate {
    /// Wraps a base operator with control requirements and a target list.
    pub fn new(operator: Operator, controls: BTreeMap<usize, u8>, targets: Vec<usize>) -> Self {
        Self {
            operator,
            controls,
            targets,
        }
    }

    /// Cheap precondition checks: indices in range, controls and targets
    /// disjoint, target count matching the operator arity.
    fn validate(&self, num_qubits: usize) -> Result<(), QgridError> {
        if self.targets.len() != self.operator.arity() {
            return Err(QgridError::Validation {
                message: format!(
                    "operator '{}' acts on {} qubit(s) but {} target(s) were given",
                    self.operator.name(),
                    self.operator.arity(),
                    self.targets.len()
                ),
            });
        }
        for &q in self.targets.iter().chain(self.controls.keys()) {
            if q >= num_qubits {
                return Err(QgridError::IndexOutOfRange {
                    message: format!(
                        "qubit {} is out of range for a {}-qubit register",
                        q, num_qubits
                    ),
                });
            }
        }
        for &q in &self.targets {
            if self.controls.contains_key(&q) {
                return Err(QgridError::Validation {
                    message: format!("qubit {} is both a control and a target", q),
                });
            }
        }
        for (idx, &q) in self.targets.iter().enumerate() {
            if self.targets[..idx].contains(&q) {
                return Err(QgridError::Validation {
                    message: format!("qubit {} appears twice in the target list", q),
                });
            }
        }
        Ok(())
    }

    /// Builds the 2^n × 2^n register operator.
    ///
    /// For each basis index `i`: if any control qubit's bit disagrees with
    /// its required value the column is pass-through (`R[i,i] = 1`).
    /// Otherwise the target bits of `i` form the input pattern `t`, and for
    /// every output pattern `j` the entry `U[j,t]` is scattered to the index
    /// `i'` obtained by substituting the bits of `j` into the target
    /// positions of `i`. This never materializes the base operator's naive
    /// tensor expansion.
    pub fn matrix(&self, num_qubits: usize) -> Result<ComplexMatrix, QgridError> {
        self.validate(num_qubits)?;

        let n = num_qubits;
        let dim = 1usize << n;
        let m = self.targets.len();
        let target_dim = 1usize << m;
        let u = self.operator.matrix();

        let mut result = ComplexMatrix::zeros(dim);
        for i in 0..dim {
            let enabled = self
                .controls
                .iter()
                .all(|(&q, &required)| bit_of(i, q, n) == required);
            if !enabled {
                result.set(i, i, Complex::new(1.0, 0.0));
                continue;
            }

            // Input pattern: target bits of i, first target most significant.
            let mut t = 0usize;
            for (pos, &q) in self.targets.iter().enumerate() {
                t |= (bit_of(i, q, n) as usize) << (m - 1 - pos);
            }

            for j in 0..target_dim {
                let mut out = i;
                for (pos, &q) in self.targets.iter().enumerate() {
                    let mask = 1usize << (n - 1 - q);
                    if (j >> (m - 1 - pos)) & 1 == 1 {
                        out |= mask;
                    } else {
                        out &= !mask;
                    }
                }
                result.set(out, i, result.get(out, i) + u.get(j, t));
            }
        }
        Ok(result)
    }
}
