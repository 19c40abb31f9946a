// src/circuit/mod.rs

//! The circuit grid: rows are qubits, columns are discrete time steps.
//!
//! Each cell of a step holds at most one item. Gate cells carry a
//! [`GateOp`]; control and anti-control markers condition every gate in the
//! same step; measurement markers in one step form a single measurement
//! event. The builder collects placements and validates the whole grid at
//! `build`, so a finished [`Circuit`] is structurally sound.

use crate::core::QgridError;
use crate::gates::GateKind;
use std::collections::BTreeMap;
use std::fmt;

/// A gate placed in the grid: the gate kind plus the qubits it acts on.
///
/// Rotation parameters live inside [`GateKind`], so a `GateOp` is fully
/// self-describing. Multi-target gates occupy the cell of their first
/// target.
#[derive(Debug, Clone, PartialEq)]
pub struct GateOp {
    /// The gate to apply.
    pub kind: GateKind,
    /// Target qubits, in order; the first target supplies the most
    /// significant bit of the gate's own index space.
    pub targets: Vec<usize>,
}

impl GateOp {
    /// A single-target gate op.
    pub fn single(kind: GateKind, target: usize) -> Self {
        Self {
            kind,
            targets: vec![target],
        }
    }
}

/// One occupied cell of a circuit step.
#[derive(Debug, Clone, PartialEq)]
pub enum StepItem {
    /// A gate anchored at this cell.
    Gate(GateOp),
    /// A control marker: gates in this step fire only if this qubit is 1.
    Control,
    /// An anti-control marker: gates in this step fire only if this qubit is 0.
    AntiControl,
    /// A measurement marker for this qubit.
    Measure,
}

/// One time column of the grid: a mapping from qubit index to its cell.
///
/// `BTreeMap` keeps iteration in ascending qubit order, which is the fixed,
/// deterministic order simultaneous gates are applied in.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CircuitStep {
    cells: BTreeMap<usize, StepItem>,
}

impl CircuitStep {
    /// Iterates occupied cells in ascending qubit order.
    pub fn cells(&self) -> impl Iterator<Item = (usize, &StepItem)> {
        self.cells.iter().map(|(&q, item)| (q, item))
    }

    /// The item at `qubit`, if the cell is occupied.
    pub fn get(&self, qubit: usize) -> Option<&StepItem> {
        self.cells.get(&qubit)
    }

    /// True when no cell in this column is occupied.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// An ordered sequence of steps over a fixed-size register.
#[derive(Debug, Clone, PartialEq)]
pub struct Circuit {
    num_qubits: usize,
    steps: Vec<CircuitStep>,
}

impl Circuit {
    /// Number of qubit rows.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// The ordered time steps.
    pub fn steps(&self) -> &[CircuitStep] {
        &self.steps
    }

    /// Number of time columns.
    pub fn num_steps(&self) -> usize {
        self.steps.len()
    }
}

// Fixed cell width for the diagram, e.g. "──H──".
const CELL_WIDTH: usize = 5;

fn format_cell(symbol: &str) -> String {
    let len = symbol.chars().count();
    if len >= CELL_WIDTH {
        symbol.chars().take(CELL_WIDTH).collect()
    } else {
        let dashes = CELL_WIDTH - len;
        let pre = dashes / 2;
        format!("{}{}{}", "─".repeat(pre), symbol, "─".repeat(dashes - pre))
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Circuit[{} steps on {} qubits]",
            self.num_steps(),
            self.num_qubits
        )?;
        for q in 0..self.num_qubits {
            write!(f, "q{}: ", q)?;
            for step in &self.steps {
                let cell = match step.get(q) {
                    Some(StepItem::Gate(op)) => format_cell(op.kind.symbol()),
                    Some(StepItem::Control) => format_cell("●"),
                    Some(StepItem::AntiControl) => format_cell("○"),
                    Some(StepItem::Measure) => format_cell("M"),
                    None => {
                        // Secondary targets of a multi-target gate anchored elsewhere.
                        let spanned = step.cells().any(|(_, item)| match item {
                            StepItem::Gate(op) => op.targets[1..].contains(&q),
                            _ => false,
                        });
                        if spanned {
                            format_cell("╳")
                        } else {
                            "─".repeat(CELL_WIDTH)
                        }
                    }
                };
                write!(f, "{}", cell)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// A recorded placement, resolved and validated at `build`.
#[derive(Debug, Clone)]
enum Placement {
    Item {
        step: usize,
        qubit: usize,
        item: StepItem,
    },
    Named {
        step: usize,
        qubit: usize,
        name: String,
        theta: Option<f64>,
    },
}

/// Chaining builder for [`Circuit`] values.
///
/// Placements are collected as they come from the editor and checked as a
/// whole in [`CircuitBuilder::build`]: qubit rows in range, no
/// double-occupied cells, gate names resolvable.
pub struct CircuitBuilder {
    num_qubits: usize,
    placements: Vec<Placement>,
}

impl CircuitBuilder {
    /// Starts a builder for a `num_qubits`-row grid.
    pub fn new(num_qubits: usize) -> Self {
        Self {
            num_qubits,
            placements: Vec::new(),
        }
    }

    /// Places a single-target gate at `(step, qubit)`.
    pub fn gate(self, step: usize, qubit: usize, kind: GateKind) -> Self {
        self.item(step, qubit, StepItem::Gate(GateOp::single(kind, qubit)))
    }

    /// Places a SWAP between qubits `a` and `b`, anchored at `a`.
    pub fn swap(self, step: usize, a: usize, b: usize) -> Self {
        self.item(
            step,
            a,
            StepItem::Gate(GateOp {
                kind: GateKind::Swap,
                targets: vec![a, b],
            }),
        )
    }

    /// Places a control marker (requires the qubit to be 1).
    pub fn control(self, step: usize, qubit: usize) -> Self {
        self.item(step, qubit, StepItem::Control)
    }

    /// Places an anti-control marker (requires the qubit to be 0).
    pub fn anti_control(self, step: usize, qubit: usize) -> Self {
        self.item(step, qubit, StepItem::AntiControl)
    }

    /// Places a measurement marker.
    pub fn measure(self, step: usize, qubit: usize) -> Self {
        self.item(step, qubit, StepItem::Measure)
    }

    /// Places a gate by its editor-facing name, with the rotation angle for
    /// parameterized gates. Resolution happens at `build`, where an
    /// unrecognized name fails with [`QgridError::UnknownGate`] carrying
    /// this cell's position.
    pub fn gate_named(
        mut self,
        step: usize,
        qubit: usize,
        name: impl Into<String>,
        theta: Option<f64>,
    ) -> Self {
        self.placements.push(Placement::Named {
            step,
            qubit,
            name: name.into(),
            theta,
        });
        self
    }

    fn item(mut self, step: usize, qubit: usize, item: StepItem) -> Self {
        self.placements.push(Placement::Item { step, qubit, item });
        self
    }

    /// Validates all placements and assembles the circuit.
    pub fn build(self) -> Result<Circuit, QgridError> {
        let num_steps = self
            .placements
            .iter()
            .map(|p| match p {
                Placement::Item { step, .. } | Placement::Named { step, .. } => step + 1,
            })
            .max()
            .unwrap_or(0);
        let mut steps = vec![CircuitStep::default(); num_steps];

        for placement in self.placements {
            let (step, qubit, item) = match placement {
                Placement::Item { step, qubit, item } => (step, qubit, item),
                Placement::Named {
                    step,
                    qubit,
                    name,
                    theta,
                } => {
                    let kind = GateKind::from_name(&name, theta).ok_or(
                        QgridError::UnknownGate { name, step, qubit },
                    )?;
                    let targets = if kind.arity() == 1 {
                        vec![qubit]
                    } else {
                        // Multi-target named gates span adjacent rows downward.
                        (qubit..qubit + kind.arity()).collect()
                    };
                    (step, qubit, StepItem::Gate(GateOp { kind, targets }))
                }
            };

            let involved: Vec<usize> = match &item {
                StepItem::Gate(op) => op.targets.clone(),
                _ => vec![qubit],
            };
            for &q in &involved {
                if q >= self.num_qubits {
                    return Err(QgridError::IndexOutOfRange {
                        message: format!(
                            "qubit {} at step {} is out of range for {} qubit rows",
                            q, step, self.num_qubits
                        ),
                    });
                }
            }
            if let StepItem::Gate(op) = &item {
                for (idx, &q) in op.targets.iter().enumerate() {
                    if op.targets[..idx].contains(&q) {
                        return Err(QgridError::Validation {
                            message: format!(
                                "gate at step {} lists qubit {} twice",
                                step, q
                            ),
                        });
                    }
                }
            }
            if steps[step].cells.contains_key(&qubit) {
                return Err(QgridError::Validation {
                    message: format!("cell (step {}, qubit {}) is already occupied", step, qubit),
                });
            }
            steps[step].cells.insert(qubit, item);
        }

        Ok(Circuit {
            num_qubits: self.num_qubits,
            steps,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_assembles_grid_in_step_order() {
        let circuit = CircuitBuilder::new(2)
            .gate(0, 0, GateKind::H)
            .control(1, 0)
            .gate(1, 1, GateKind::X)
            .build()
            .unwrap();
        assert_eq!(circuit.num_steps(), 2);
        assert_eq!(
            circuit.steps()[0].get(0),
            Some(&StepItem::Gate(GateOp::single(GateKind::H, 0)))
        );
        assert_eq!(circuit.steps()[1].get(0), Some(&StepItem::Control));
    }

    #[test]
    fn double_occupied_cell_rejected() {
        let result = CircuitBuilder::new(1)
            .gate(0, 0, GateKind::H)
            .gate(0, 0, GateKind::X)
            .build();
        assert!(matches!(result, Err(QgridError::Validation { .. })));
    }

    #[test]
    fn out_of_range_row_rejected() {
        let result = CircuitBuilder::new(2).gate(0, 2, GateKind::H).build();
        assert!(matches!(result, Err(QgridError::IndexOutOfRange { .. })));
    }

    #[test]
    fn unknown_name_carries_cell_position() {
        let result = CircuitBuilder::new(2)
            .gate_named(3, 1, "CNOT", None)
            .build();
        match result {
            Err(QgridError::UnknownGate { name, step, qubit }) => {
                assert_eq!(name, "CNOT");
                assert_eq!(step, 3);
                assert_eq!(qubit, 1);
            }
            other => panic!("expected UnknownGate, got {:?}", other),
        }
    }

    #[test]
    fn named_rotation_resolves_with_angle() {
        let circuit = CircuitBuilder::new(1)
            .gate_named(0, 0, "RX", Some(1.5))
            .build()
            .unwrap();
        assert_eq!(
            circuit.steps()[0].get(0),
            Some(&StepItem::Gate(GateOp::single(GateKind::Rx(1.5), 0)))
        );
    }

    #[test]
    fn display_draws_every_row() {
        let circuit = CircuitBuilder::new(2)
            .gate(0, 0, GateKind::H)
            .control(1, 0)
            .gate(1, 1, GateKind::X)
            .build()
            .unwrap();
        let diagram = format!("{}", circuit);
        assert!(diagram.contains("q0:"));
        assert!(diagram.contains("q1:"));
        assert!(diagram.contains("H"));
        assert!(diagram.contains("●"));
    }
}
