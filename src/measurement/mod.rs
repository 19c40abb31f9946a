// src/measurement/mod.rs

//! Projective measurement: outcome probabilities, sampling, collapse.

use crate::core::constants::engine_constants::{AMPLITUDE_CUTOFF, SAMPLING_EPSILON};
use crate::core::{bit_of, QgridError, QuantumState};
use num_complex::Complex;
use num_traits::Zero;
use rand::{Rng, RngExt};

/// Samples and collapses projective measurements over a qubit subset.
///
/// The only non-determinism in the engine lives here, behind the injected
/// random source: callers pass any `rand::Rng`, and tests pass a seeded
/// `StdRng` to pin outcomes.
pub struct MeasurementEngine;

impl MeasurementEngine {
    /// Measures `qubits` (in the given order) of `state`.
    ///
    /// Accumulates `|amplitude|²` per outcome pattern, skipping amplitudes
    /// below [`AMPLITUDE_CUTOFF`]; draws one uniform sample from `rng`;
    /// walks outcomes in increasing index order, skipping outcomes whose
    /// accumulated probability is zero, choosing the first whose
    /// running sum (plus [`SAMPLING_EPSILON`] against floating-point
    /// shortfall) reaches the sample, with the last populated outcome as a
    /// rounding fallback. Amplitudes disagreeing with the chosen outcome on
    /// any measured qubit are zeroed and the remainder renormalized; a
    /// zero-norm remainder is left unchanged rather than divided by zero.
    ///
    /// Returns the outcome as a bit string (one character per measured
    /// qubit, in list order) together with the collapsed state.
    pub fn measure<R: Rng>(
        state: &QuantumState,
        qubits: &[usize],
        rng: &mut R,
    ) -> Result<(String, QuantumState), QgridError> {
        let n = state.num_qubits();
        if qubits.is_empty() {
            return Err(QgridError::IndexOutOfRange {
                message: "measurement requires at least one qubit".to_string(),
            });
        }
        for (idx, &q) in qubits.iter().enumerate() {
            if q >= n {
                return Err(QgridError::IndexOutOfRange {
                    message: format!("measured qubit {} is out of range for {} qubits", q, n),
                });
            }
            if qubits[..idx].contains(&q) {
                return Err(QgridError::IndexOutOfRange {
                    message: format!("qubit {} appears twice in the measurement list", q),
                });
            }
        }

        let m = qubits.len();
        let outcome_of = |basis_index: usize| -> usize {
            let mut outcome = 0usize;
            for (pos, &q) in qubits.iter().enumerate() {
                outcome |= (bit_of(basis_index, q, n) as usize) << (m - 1 - pos);
            }
            outcome
        };

        // 1. Outcome distribution over the measured subset.
        let mut probabilities = vec![0.0f64; 1 << m];
        for (i, amp) in state.amplitudes().iter().enumerate() {
            let p = amp.norm_sqr();
            if p < AMPLITUDE_CUTOFF {
                continue;
            }
            probabilities[outcome_of(i)] += p;
        }

        // 2. Sample one outcome.
        let sample: f64 = rng.random();
        let mut running = 0.0;
        let mut chosen = None;
        let mut last_populated = None;
        for (outcome, &p) in probabilities.iter().enumerate() {
            if p <= 0.0 {
                continue;
            }
            last_populated = Some(outcome);
            running += p;
            if running + SAMPLING_EPSILON >= sample {
                chosen = Some(outcome);
                break;
            }
        }
        // Rounding fallback; 0 only if every amplitude was negligible, in
        // which case the collapse below is a no-op.
        let chosen = chosen.or(last_populated).unwrap_or(0);

        // 3. Collapse and renormalize.
        let mut amplitudes = state.amplitudes().to_vec();
        for (i, amp) in amplitudes.iter_mut().enumerate() {
            if outcome_of(i) != chosen {
                *amp = Complex::zero();
            }
        }
        let norm = amplitudes
            .iter()
            .map(|a| a.norm_sqr())
            .sum::<f64>()
            .sqrt();
        if norm > 0.0 {
            for amp in amplitudes.iter_mut() {
                *amp /= norm;
            }
        }

        // 4. Encode the outcome, one character per measured qubit.
        let bits: String = (0..m)
            .map(|pos| {
                if (chosen >> (m - 1 - pos)) & 1 == 1 {
                    '1'
                } else {
                    '0'
                }
            })
            .collect();

        Ok((bits, QuantumState::from_amplitudes(n, amplitudes)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::f64::consts::FRAC_1_SQRT_2;

    #[test]
    fn definite_state_measures_deterministically() {
        // |10> measured on [0, 1] must give "10" for any random draw.
        let state = QuantumState::from_amplitudes(
            2,
            vec![
                Complex::zero(),
                Complex::zero(),
                Complex::new(1.0, 0.0),
                Complex::zero(),
            ],
        );
        for seed in [0u64, 1, 42, 9999] {
            let mut rng = StdRng::seed_from_u64(seed);
            let (bits, collapsed) =
                MeasurementEngine::measure(&state, &[0, 1], &mut rng).unwrap();
            assert_eq!(bits, "10");
            assert_eq!(collapsed, state);
        }
    }

    #[test]
    fn outcome_respects_qubit_list_order() {
        // Same |10> state, but measuring [1, 0] reverses the string.
        let state = QuantumState::from_amplitudes(
            2,
            vec![
                Complex::zero(),
                Complex::zero(),
                Complex::new(1.0, 0.0),
                Complex::zero(),
            ],
        );
        let mut rng = StdRng::seed_from_u64(7);
        let (bits, _) = MeasurementEngine::measure(&state, &[1, 0], &mut rng).unwrap();
        assert_eq!(bits, "01");
    }

    #[test]
    fn superposition_collapses_to_consistent_basis_state() {
        let state = QuantumState::from_amplitudes(
            1,
            vec![
                Complex::new(FRAC_1_SQRT_2, 0.0),
                Complex::new(FRAC_1_SQRT_2, 0.0),
            ],
        );
        let mut rng = StdRng::seed_from_u64(3);
        let (bits, collapsed) = MeasurementEngine::measure(&state, &[0], &mut rng).unwrap();
        let index = usize::from_str_radix(&bits, 2).unwrap();
        assert!((collapsed.amplitudes()[index].norm() - 1.0).abs() < 1e-12);
        assert!((collapsed.norm() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn same_seed_reproduces_outcome() {
        let state = QuantumState::from_amplitudes(
            1,
            vec![
                Complex::new(FRAC_1_SQRT_2, 0.0),
                Complex::new(FRAC_1_SQRT_2, 0.0),
            ],
        );
        let run = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            MeasurementEngine::measure(&state, &[0], &mut rng).unwrap()
        };
        assert_eq!(run(11), run(11));
    }

    #[test]
    fn partial_measurement_preserves_unmeasured_coherence() {
        // (|00> + |01>)/√2: measuring qubit 0 gives "0" and leaves qubit 1
        // in superposition.
        let h = Complex::new(FRAC_1_SQRT_2, 0.0);
        let state = QuantumState::from_amplitudes(
            2,
            vec![h, h, Complex::zero(), Complex::zero()],
        );
        let mut rng = StdRng::seed_from_u64(5);
        let (bits, collapsed) = MeasurementEngine::measure(&state, &[0], &mut rng).unwrap();
        assert_eq!(bits, "0");
        assert!((collapsed.amplitudes()[0] - h).norm() < 1e-12);
        assert!((collapsed.amplitudes()[1] - h).norm() < 1e-12);
    }

    #[test]
    fn zero_norm_state_is_left_unchanged() {
        let state = QuantumState::from_amplitudes(
            1,
            vec![Complex::zero(), Complex::zero()],
        );
        let mut rng = StdRng::seed_from_u64(0);
        let (_, collapsed) = MeasurementEngine::measure(&state, &[0], &mut rng).unwrap();
        assert!(collapsed.amplitudes().iter().all(|a| a.is_zero()));
    }

    #[test]
    fn duplicate_measured_qubit_rejected() {
        let state = QuantumState::new(2).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            MeasurementEngine::measure(&state, &[1, 1], &mut rng),
            Err(QgridError::IndexOutOfRange { .. })
        ));
    }
}
