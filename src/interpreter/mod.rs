// src/interpreter/mod.rs

//! Time-stepped execution of circuit grids against a statevector.
//!
//! The interpreter walks a [`Circuit`] column by column, resolving control
//! and anti-control markers into concrete controlled operators and handing
//! measurement events to the [`MeasurementEngine`]. It owns the injected
//! random source, which is the run's only source of non-determinism:
//! rerunning the same circuit with the same seed reproduces the final state
//! bit for bit.

use crate::circuit::{Circuit, CircuitStep, GateOp, StepItem};
use crate::core::{QgridError, QuantumState};
use crate::gates::ControlledGate;
use crate::measurement::MeasurementEngine;
use rand::Rng;
use std::collections::BTreeMap;
use std::fmt;

/// One measurement event of a run: which step fired, which qubits were read
/// (in order), and the classical bit string that came out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeasurementRecord {
    /// Time-step column of the measurement.
    pub step: usize,
    /// Measured qubits in ascending order.
    pub qubits: Vec<usize>,
    /// One character per measured qubit, in list order.
    pub outcome: String,
}

/// The final state of a run plus its append-only measurement log.
#[derive(Debug, Clone, PartialEq)]
pub struct RunResult {
    state: QuantumState,
    records: Vec<MeasurementRecord>,
}

impl RunResult {
    /// The statevector after the last executed step.
    pub fn state(&self) -> &QuantumState {
        &self.state
    }

    /// Consumes the result, yielding the final state.
    pub fn into_state(self) -> QuantumState {
        self.state
    }

    /// Measurement events in the order they fired.
    pub fn records(&self) -> &[MeasurementRecord] {
        &self.records
    }
}

impl fmt::Display for RunResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Run Result:")?;
        writeln!(f, "  Final state: {}", self.state)?;
        if self.records.is_empty() {
            writeln!(f, "  No measurements.")?;
        } else {
            writeln!(f, "  Measurements:")?;
            for record in &self.records {
                writeln!(
                    f,
                    "    step {}: qubits {:?} -> {}",
                    record.step, record.qubits, record.outcome
                )?;
            }
        }
        Ok(())
    }
}

/// Walks a circuit's time steps, driving state transformations.
///
/// The register size and the random source are explicit constructor
/// arguments; there is no global registry or implicit RNG.
pub struct CircuitInterpreter<R: Rng> {
    num_qubits: usize,
    rng: R,
}

impl<R: Rng> CircuitInterpreter<R> {
    /// Creates an interpreter for `num_qubits` qubits with an injected
    /// random source. The resource bound is checked up front.
    pub fn new(num_qubits: usize, rng: R) -> Result<Self, QgridError> {
        // Probe the bound before any run allocates the state.
        QuantumState::new(num_qubits)?;
        Ok(Self { num_qubits, rng })
    }

    /// Number of qubits this interpreter simulates.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Runs every step of `circuit` from the all-zero state.
    pub fn run(&mut self, circuit: &Circuit) -> Result<RunResult, QgridError> {
        self.run_up_to(circuit, circuit.num_steps())
    }

    /// Runs only the first `up_to` steps, for stepwise "run to" execution.
    ///
    /// Always restarts from the all-zero state, so the result for a given
    /// `up_to` depends only on the circuit and the random draws consumed by
    /// measurements along the way.
    pub fn run_up_to(&mut self, circuit: &Circuit, up_to: usize) -> Result<RunResult, QgridError> {
        if circuit.num_qubits() != self.num_qubits {
            return Err(QgridError::IndexOutOfRange {
                message: format!(
                    "circuit has {} qubit rows but the interpreter simulates {}",
                    circuit.num_qubits(),
                    self.num_qubits
                ),
            });
        }
        if up_to > circuit.num_steps() {
            return Err(QgridError::IndexOutOfRange {
                message: format!(
                    "cannot run to step {} of a {}-step circuit",
                    up_to,
                    circuit.num_steps()
                ),
            });
        }

        let mut state = QuantumState::new(self.num_qubits)?;
        let mut records = Vec::new();
        for (index, step) in circuit.steps()[..up_to].iter().enumerate() {
            state = self.apply_step(state, step, index, &mut records)?;
        }
        Ok(RunResult { state, records })
    }

    /// Applies one time column to the state.
    ///
    /// Cells are partitioned into markers, measured qubits, and gate cells.
    /// Without markers each gate applies independently, in ascending qubit
    /// order. With markers, every gate in the step becomes one
    /// [`ControlledGate`] conditioned on the union of all markers.
    /// Measurements fire after the step's unitaries.
    fn apply_step(
        &mut self,
        state: QuantumState,
        step: &CircuitStep,
        step_index: usize,
        records: &mut Vec<MeasurementRecord>,
    ) -> Result<QuantumState, QgridError> {
        let mut markers: BTreeMap<usize, u8> = BTreeMap::new();
        let mut measured: Vec<usize> = Vec::new();
        let mut gate_cells: Vec<&GateOp> = Vec::new();

        for (qubit, item) in step.cells() {
            match item {
                StepItem::Control => {
                    markers.insert(qubit, 1);
                }
                StepItem::AntiControl => {
                    markers.insert(qubit, 0);
                }
                StepItem::Measure => measured.push(qubit),
                StepItem::Gate(op) => gate_cells.push(op),
            }
        }

        let mut state = state;
        for op in gate_cells {
            let operator = op.kind.operator()?;
            let matrix = if markers.is_empty() && op.targets.len() == 1 {
                operator.expand(self.num_qubits, op.targets[0])?
            } else {
                // Marker union as the control map; empty for an uncontrolled
                // multi-target gate, whose arbitrary target placement the
                // controlled construction already handles.
                ControlledGate::new(operator, markers.clone(), op.targets.clone())
                    .matrix(self.num_qubits)?
            };
            state = state.apply(&matrix)?;
        }

        if !measured.is_empty() {
            let (outcome, collapsed) =
                MeasurementEngine::measure(&state, &measured, &mut self.rng)?;
            records.push(MeasurementRecord {
                step: step_index,
                qubits: measured,
                outcome,
            });
            state = collapsed;
        }

        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::CircuitBuilder;
    use crate::gates::GateKind;
    use num_complex::Complex;
    use num_traits::Zero;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::f64::consts::FRAC_1_SQRT_2;

    const TEST_TOLERANCE: f64 = 1e-9;

    fn interpreter(num_qubits: usize) -> CircuitInterpreter<StdRng> {
        CircuitInterpreter::new(num_qubits, StdRng::seed_from_u64(0)).unwrap()
    }

    /// Asserts two complex vectors are approximately equal component-wise.
    fn assert_complex_vec_approx_equal(
        actual: &[Complex<f64>],
        expected: &[Complex<f64>],
        context: &str,
    ) {
        assert_eq!(actual.len(), expected.len(), "length mismatch - {}", context);
        for (i, (a, e)) in actual.iter().zip(expected.iter()).enumerate() {
            let dist_sq = (a - e).norm_sqr();
            assert!(
                dist_sq < TEST_TOLERANCE * TEST_TOLERANCE,
                "mismatch at index {} - actual: {}, expected: {}, context: {}",
                i,
                a,
                e,
                context
            );
        }
    }

    #[test]
    fn hadamard_creates_equal_superposition() {
        let circuit = CircuitBuilder::new(1).gate(0, 0, GateKind::H).build().unwrap();
        let result = interpreter(1).run(&circuit).unwrap();
        let h = Complex::new(FRAC_1_SQRT_2, 0.0);
        assert_complex_vec_approx_equal(result.state().amplitudes(), &[h, h], "H|0>");
    }

    #[test]
    fn controlled_x_entangles_after_hadamard() {
        // H on qubit 0, then control(q0) + X(q1): the Bell state.
        let circuit = CircuitBuilder::new(2)
            .gate(0, 0, GateKind::H)
            .control(1, 0)
            .gate(1, 1, GateKind::X)
            .build()
            .unwrap();
        let result = interpreter(2).run(&circuit).unwrap();
        let h = Complex::new(FRAC_1_SQRT_2, 0.0);
        assert_complex_vec_approx_equal(
            result.state().amplitudes(),
            &[h, Complex::zero(), Complex::zero(), h],
            "Bell state",
        );
    }

    #[test]
    fn marker_without_gate_is_a_no_op() {
        let circuit = CircuitBuilder::new(2).control(0, 0).build().unwrap();
        let result = interpreter(2).run(&circuit).unwrap();
        assert_eq!(result.state(), &QuantumState::new(2).unwrap());
    }

    #[test]
    fn anti_control_fires_without_preparation() {
        // Anti-control on q0 (still |0>) + X on q1 flips q1.
        let circuit = CircuitBuilder::new(2)
            .anti_control(0, 0)
            .gate(0, 1, GateKind::X)
            .build()
            .unwrap();
        let result = interpreter(2).run(&circuit).unwrap();
        let mut expected = vec![Complex::zero(); 4];
        expected[1] = Complex::new(1.0, 0.0); // |01>
        assert_complex_vec_approx_equal(result.state().amplitudes(), &expected, "anti-control");
    }

    #[test]
    fn simultaneous_gates_apply_in_one_step() {
        let circuit = CircuitBuilder::new(2)
            .gate(0, 0, GateKind::X)
            .gate(0, 1, GateKind::X)
            .build()
            .unwrap();
        let result = interpreter(2).run(&circuit).unwrap();
        let mut expected = vec![Complex::zero(); 4];
        expected[3] = Complex::new(1.0, 0.0); // |11>
        assert_complex_vec_approx_equal(result.state().amplitudes(), &expected, "X ⊗ X");
    }

    #[test]
    fn measurement_appends_record_and_collapses() {
        let circuit = CircuitBuilder::new(1)
            .gate(0, 0, GateKind::X)
            .measure(1, 0)
            .build()
            .unwrap();
        let result = interpreter(1).run(&circuit).unwrap();
        assert_eq!(result.records().len(), 1);
        let record = &result.records()[0];
        assert_eq!(record.step, 1);
        assert_eq!(record.qubits, vec![0]);
        assert_eq!(record.outcome, "1");
        assert!((result.state().amplitudes()[1].norm() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn run_up_to_zero_steps_is_initial_state() {
        let circuit = CircuitBuilder::new(1).gate(0, 0, GateKind::X).build().unwrap();
        let result = interpreter(1).run_up_to(&circuit, 0).unwrap();
        assert_eq!(result.state(), &QuantumState::new(1).unwrap());
    }

    #[test]
    fn run_up_to_past_end_rejected() {
        let circuit = CircuitBuilder::new(1).gate(0, 0, GateKind::X).build().unwrap();
        assert!(matches!(
            interpreter(1).run_up_to(&circuit, 2),
            Err(QgridError::IndexOutOfRange { .. })
        ));
    }

    #[test]
    fn qubit_count_mismatch_rejected() {
        let circuit = CircuitBuilder::new(3).gate(0, 0, GateKind::X).build().unwrap();
        assert!(matches!(
            interpreter(2).run(&circuit),
            Err(QgridError::IndexOutOfRange { .. })
        ));
    }
}
