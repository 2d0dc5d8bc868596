//! Append-only circuit container with incremental depth tracking.

use crate::error::{IrError, IrResult};
use crate::gate::{ArityClass, Gate, GateKind};
use crate::qubit::QubitId;

/// Widest circuit that can be created.
pub const MAX_CIRCUIT_QUBITS: u32 = 4096;

/// Gate counts grouped by arity class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GateCounts {
    /// One-qubit gates.
    pub single: usize,
    /// Two-qubit gates.
    pub two: usize,
    /// Gates on three or more qubits.
    pub multi: usize,
    /// Measurements.
    pub measurement: usize,
}

/// A quantum circuit: an ordered list of gates over a fixed number of qubits.
///
/// Gates can only be appended. Depth is maintained on every insertion: each
/// qubit carries the layer of the last gate that touched it, and a new gate
/// lands one layer after the deepest of its qubits.
#[derive(Debug, Clone, PartialEq)]
pub struct Circuit {
    /// Name of the circuit.
    name: String,
    /// Number of qubits.
    num_qubits: u32,
    /// Gates in insertion order.
    gates: Vec<Gate>,
    /// Layer (1-based) of each gate, parallel to `gates`.
    gate_layers: Vec<usize>,
    /// Current depth of each qubit wire.
    qubit_depths: Vec<usize>,
    /// Maximum over `qubit_depths`.
    depth: usize,
}

impl Circuit {
    /// Create a new empty circuit.
    pub fn new(name: impl Into<String>, num_qubits: u32) -> IrResult<Self> {
        let name = name.into();
        if num_qubits == 0 {
            return Err(IrError::InvalidQubitCount { name });
        }
        if num_qubits > MAX_CIRCUIT_QUBITS {
            return Err(IrError::TooManyQubits {
                name,
                requested: num_qubits,
                max: MAX_CIRCUIT_QUBITS,
            });
        }
        Ok(Self {
            name,
            num_qubits,
            gates: vec![],
            gate_layers: vec![],
            qubit_depths: vec![0; num_qubits as usize],
            depth: 0,
        })
    }

    /// Append a gate.
    ///
    /// The gate is validated and every qubit must lie in `[0, num_qubits)`.
    /// On failure the circuit is left untouched.
    pub fn add_gate(&mut self, gate: Gate) -> IrResult<&mut Self> {
        gate.validate()?;

        if let Some(&qubit) = gate.qubits.iter().find(|q| q.0 >= self.num_qubits) {
            return Err(IrError::QubitOutOfRange {
                qubit,
                num_qubits: self.num_qubits,
                gate_name: Some(gate.name().to_string()),
            });
        }

        let layer = 1 + gate
            .qubits
            .iter()
            .map(|q| self.qubit_depths[q.index()])
            .max()
            .unwrap_or(0);
        for q in &gate.qubits {
            self.qubit_depths[q.index()] = layer;
        }
        self.depth = self.depth.max(layer);

        self.gates.push(gate);
        self.gate_layers.push(layer);
        Ok(self)
    }

    /// Build and append a standard gate.
    pub fn append(
        &mut self,
        kind: GateKind,
        qubits: impl IntoIterator<Item = QubitId>,
        params: impl IntoIterator<Item = f64>,
    ) -> IrResult<&mut Self> {
        self.add_gate(Gate::new(kind, qubits, params)?)
    }

    // =========================================================================
    // Single-qubit gates
    // =========================================================================

    /// Apply identity gate.
    pub fn id(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.append(GateKind::I, [qubit], [])
    }

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.append(GateKind::H, [qubit], [])
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.append(GateKind::X, [qubit], [])
    }

    /// Apply Pauli-Y gate.
    pub fn y(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.append(GateKind::Y, [qubit], [])
    }

    /// Apply Pauli-Z gate.
    pub fn z(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.append(GateKind::Z, [qubit], [])
    }

    /// Apply S gate.
    pub fn s(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.append(GateKind::S, [qubit], [])
    }

    /// Apply T gate.
    pub fn t(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.append(GateKind::T, [qubit], [])
    }

    /// Apply Rx rotation gate.
    pub fn rx(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.append(GateKind::Rx, [qubit], [theta])
    }

    /// Apply Ry rotation gate.
    pub fn ry(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.append(GateKind::Ry, [qubit], [theta])
    }

    /// Apply Rz rotation gate.
    pub fn rz(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.append(GateKind::Rz, [qubit], [theta])
    }

    // =========================================================================
    // Two-qubit gates
    // =========================================================================

    /// Apply CNOT (CX) gate.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.append(GateKind::CX, [control, target], [])
    }

    /// Apply CZ gate.
    pub fn cz(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.append(GateKind::CZ, [control, target], [])
    }

    /// Apply SWAP gate.
    pub fn swap(&mut self, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.append(GateKind::Swap, [q1, q2], [])
    }

    /// Apply controlled-Rx gate.
    pub fn crx(&mut self, theta: f64, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.append(GateKind::CRx, [control, target], [theta])
    }

    /// Apply controlled-Ry gate.
    pub fn cry(&mut self, theta: f64, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.append(GateKind::CRy, [control, target], [theta])
    }

    /// Apply controlled-Rz gate.
    pub fn crz(&mut self, theta: f64, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.append(GateKind::CRz, [control, target], [theta])
    }

    // =========================================================================
    // Three-qubit gates
    // =========================================================================

    /// Apply Toffoli (CCX) gate.
    pub fn ccx(&mut self, c1: QubitId, c2: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.append(GateKind::CCX, [c1, c2, target], [])
    }

    /// Apply Fredkin (CSWAP) gate.
    pub fn cswap(&mut self, control: QubitId, t1: QubitId, t2: QubitId) -> IrResult<&mut Self> {
        self.append(GateKind::CSwap, [control, t1, t2], [])
    }

    // =========================================================================
    // Measurement
    // =========================================================================

    /// Measure a single qubit.
    pub fn measure(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.add_gate(Gate::measure([qubit])?)
    }

    /// Measure every qubit with one measurement gate.
    pub fn measure_all(&mut self) -> IrResult<&mut Self> {
        self.add_gate(Gate::measure((0..self.num_qubits).map(QubitId))?)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// Get the number of gates.
    pub fn num_gates(&self) -> usize {
        self.gates.len()
    }

    /// Check if the circuit has no gates.
    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    /// Get the circuit depth.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Get the gates in insertion order.
    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    /// Get the layer of each gate, parallel to [`Circuit::gates`].
    pub fn gate_layers(&self) -> &[usize] {
        &self.gate_layers
    }

    /// Get the current depth of each qubit wire.
    pub fn qubit_depths(&self) -> &[usize] {
        &self.qubit_depths
    }

    /// Group gate indices by layer. Gates within a layer touch disjoint qubits.
    pub fn layers(&self) -> Vec<Vec<usize>> {
        let mut layers = vec![Vec::new(); self.depth];
        for (index, &layer) in self.gate_layers.iter().enumerate() {
            layers[layer - 1].push(index);
        }
        layers
    }

    /// Count gates by arity class.
    pub fn count_by_class(&self) -> GateCounts {
        let mut counts = GateCounts::default();
        for gate in &self.gates {
            match gate.arity_class() {
                ArityClass::Single => counts.single += 1,
                ArityClass::Two => counts.two += 1,
                ArityClass::Multi => counts.multi += 1,
                ArityClass::Measurement => counts.measurement += 1,
            }
        }
        counts
    }

    // =========================================================================
    // Pre-built circuits
    // =========================================================================

    /// Create a Bell state circuit with a final measurement.
    pub fn bell() -> IrResult<Self> {
        let mut circuit = Self::new("bell", 2)?;
        circuit.h(QubitId(0))?.cx(QubitId(0), QubitId(1))?.measure_all()?;
        Ok(circuit)
    }

    /// Create a GHZ state circuit with a final measurement.
    pub fn ghz(n: u32) -> IrResult<Self> {
        let mut circuit = Self::new("ghz", n)?;
        circuit.h(QubitId(0))?;
        for i in 0..n - 1 {
            circuit.cx(QubitId(i), QubitId(i + 1))?;
        }
        circuit.measure_all()?;
        Ok(circuit)
    }
}

impl<'a> IntoIterator for &'a Circuit {
    type Item = &'a Gate;
    type IntoIter = std::slice::Iter<'a, Gate>;

    fn into_iter(self) -> Self::IntoIter {
        self.gates.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_new_circuit() {
        let circuit = Circuit::new("test", 3).unwrap();
        assert_eq!(circuit.name(), "test");
        assert_eq!(circuit.num_qubits(), 3);
        assert_eq!(circuit.num_gates(), 0);
        assert_eq!(circuit.depth(), 0);
        assert!(circuit.is_empty());
    }

    #[test]
    fn test_zero_qubits_rejected() {
        assert!(matches!(
            Circuit::new("empty", 0),
            Err(IrError::InvalidQubitCount { .. })
        ));
    }

    #[test]
    fn test_width_limit() {
        assert!(Circuit::new("widest", MAX_CIRCUIT_QUBITS).is_ok());
        assert!(matches!(
            Circuit::new("too_wide", MAX_CIRCUIT_QUBITS + 1),
            Err(IrError::TooManyQubits {
                requested,
                max: MAX_CIRCUIT_QUBITS,
                ..
            }) if requested == MAX_CIRCUIT_QUBITS + 1
        ));
    }

    #[test]
    fn test_h_then_cx_has_depth_two() {
        let mut circuit = Circuit::new("bell", 2).unwrap();
        circuit.h(QubitId(0)).unwrap().cx(QubitId(0), QubitId(1)).unwrap();
        assert_eq!(circuit.num_gates(), 2);
        assert_eq!(circuit.depth(), 2);
        assert_eq!(circuit.gate_layers(), &[1, 2]);
    }

    #[test]
    fn test_parallel_gates_share_a_layer() {
        let mut circuit = Circuit::new("test", 4).unwrap();
        circuit
            .h(QubitId(0))
            .unwrap()
            .h(QubitId(1))
            .unwrap()
            .x(QubitId(2))
            .unwrap()
            .cx(QubitId(2), QubitId(3))
            .unwrap();

        assert_eq!(circuit.depth(), 2);
        assert_eq!(circuit.layers(), vec![vec![0, 1, 2], vec![3]]);
        assert_eq!(circuit.qubit_depths(), &[1, 1, 2, 2]);
    }

    #[test]
    fn test_depth_propagates_through_shared_qubits() {
        let mut circuit = Circuit::new("chain", 3).unwrap();
        circuit.h(QubitId(0)).unwrap();
        circuit.h(QubitId(0)).unwrap();
        circuit.cx(QubitId(0), QubitId(1)).unwrap();
        circuit.cx(QubitId(1), QubitId(2)).unwrap();
        // Qubit 2 inherits the chain through qubit 1.
        assert_eq!(circuit.depth(), 4);
        assert_eq!(circuit.qubit_depths(), &[3, 4, 4]);
    }

    #[test]
    fn test_out_of_range_gate_leaves_circuit_unchanged() {
        let mut circuit = Circuit::new("test", 2).unwrap();
        circuit.h(QubitId(0)).unwrap();

        let err = circuit.cx(QubitId(0), QubitId(2)).unwrap_err();
        assert!(matches!(
            err,
            IrError::QubitOutOfRange {
                qubit: QubitId(2),
                num_qubits: 2,
                ..
            }
        ));
        assert_eq!(circuit.num_gates(), 1);
        assert_eq!(circuit.depth(), 1);
        assert_eq!(circuit.qubit_depths(), &[1, 0]);
    }

    #[test]
    fn test_toffoli_with_two_targets_not_appended() {
        let mut circuit = Circuit::new("test", 3).unwrap();
        circuit.h(QubitId(0)).unwrap();

        let err = circuit
            .append(GateKind::CCX, [QubitId(0), QubitId(1)], [])
            .unwrap_err();
        assert!(matches!(err, IrError::QubitCountMismatch { .. }));
        assert_eq!(circuit.num_gates(), 1);
    }

    #[test]
    fn test_hand_built_gate_is_validated() {
        let mut circuit = Circuit::new("test", 1).unwrap();
        let gate = Gate {
            kind: GateKind::Ry,
            qubits: vec![QubitId(0)],
            params: vec![],
            custom: None,
        };
        assert!(matches!(
            circuit.add_gate(gate),
            Err(IrError::MissingParameter { .. })
        ));
        assert!(circuit.is_empty());
    }

    #[test]
    fn test_count_by_class() {
        let mut circuit = Circuit::new("test", 3).unwrap();
        circuit
            .rx(PI / 2.0, QubitId(0))
            .unwrap()
            .cz(QubitId(0), QubitId(1))
            .unwrap()
            .cswap(QubitId(0), QubitId(1), QubitId(2))
            .unwrap()
            .measure_all()
            .unwrap();

        let counts = circuit.count_by_class();
        assert_eq!(counts.single, 1);
        assert_eq!(counts.two, 1);
        assert_eq!(counts.multi, 1);
        assert_eq!(counts.measurement, 1);
    }

    #[test]
    fn test_bell_state() {
        let circuit = Circuit::bell().unwrap();
        assert_eq!(circuit.num_qubits(), 2);
        assert_eq!(circuit.depth(), 3); // H, CX, measure
    }

    #[test]
    fn test_ghz_state() {
        let circuit = Circuit::ghz(5).unwrap();
        assert_eq!(circuit.num_qubits(), 5);
        assert_eq!(circuit.num_gates(), 6);
        assert_eq!(circuit.depth(), 6);
    }

    #[test]
    fn test_clone_is_equal_but_distinct() {
        let original = Circuit::bell().unwrap();
        let copy = original.clone();
        assert_eq!(copy, original);
        assert!(!std::ptr::eq(copy.gates().as_ptr(), original.gates().as_ptr()));
    }
}
