// src/backend/mod.rs

//! Adapter boundary for delegating execution to an external gate-call
//! backend.
//!
//! The trait mirrors how such toolkits consume circuits: one gate call at a
//! time, with positive controls only. [`translate`] walks a [`Circuit`] in
//! step order and decomposes each column into those calls, realizing
//! anti-controls as flip, apply, flip back. A backend whose bit-ordering
//! convention treats qubit 0 as least significant must remap qubit indices
//! inside its trait impl; the engine will not do it implicitly.

use crate::circuit::{Circuit, GateOp, StepItem};
use crate::core::QgridError;
use crate::gates::GateKind;

/// Per-operation hooks an external backend implements.
pub trait GateBackend {
    /// Apply a single-target gate.
    fn gate(&mut self, kind: GateKind, target: usize) -> Result<(), QgridError>;

    /// Apply a gate conditioned on `controls` all being 1. `targets` lists
    /// every qubit the gate acts on, in order.
    fn controlled_gate(
        &mut self,
        kind: GateKind,
        controls: &[usize],
        targets: &[usize],
    ) -> Result<(), QgridError>;

    /// Swap two qubits.
    fn swap(&mut self, a: usize, b: usize) -> Result<(), QgridError>;

    /// Measure the listed qubits.
    fn measure(&mut self, qubits: &[usize]) -> Result<(), QgridError>;
}

/// Replays `circuit` into `backend`, one step and one gate op at a time.
pub fn translate<B: GateBackend>(circuit: &Circuit, backend: &mut B) -> Result<(), QgridError> {
    for step in circuit.steps() {
        let mut controls: Vec<usize> = Vec::new();
        let mut anti_controls: Vec<usize> = Vec::new();
        let mut measured: Vec<usize> = Vec::new();
        let mut gate_cells: Vec<&GateOp> = Vec::new();

        for (qubit, item) in step.cells() {
            match item {
                StepItem::Control => controls.push(qubit),
                StepItem::AntiControl => anti_controls.push(qubit),
                StepItem::Measure => measured.push(qubit),
                StepItem::Gate(op) => gate_cells.push(op),
            }
        }

        for op in gate_cells {
            if controls.is_empty() && anti_controls.is_empty() {
                match op.kind {
                    GateKind::Swap => backend.swap(op.targets[0], op.targets[1])?,
                    kind => backend.gate(kind, op.targets[0])?,
                }
                continue;
            }

            // The backend only knows positive controls: frame the call with
            // X on each anti-control qubit.
            let all_controls: Vec<usize> =
                controls.iter().chain(anti_controls.iter()).copied().collect();
            for &q in &anti_controls {
                backend.gate(GateKind::X, q)?;
            }
            backend.controlled_gate(op.kind, &all_controls, &op.targets)?;
            for &q in &anti_controls {
                backend.gate(GateKind::X, q)?;
            }
        }

        if !measured.is_empty() {
            backend.measure(&measured)?;
        }
    }
    Ok(())
}
