//! Text interchange for circuits.
//!
//! Circuits are written as a JSON document:
//!
//! ```json
//! {
//!   "name": "bell",
//!   "qubitCount": 2,
//!   "gateCount": 2,
//!   "depth": 2.0,
//!   "gates": [
//!     { "type": "h", "qubits": [0] },
//!     { "type": "cx", "qubits": [0, 1] }
//!   ]
//! }
//! ```
//!
//! Rotation gates carry `"params"`; custom gates carry `"name"` and can only be
//! read back through a [`CustomGateRegistry`] that knows the callback.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::circuit::Circuit;
use crate::error::{IrError, IrResult};
use crate::gate::{CustomGate, CustomGateFn, Gate, GateKind};
use crate::qubit::QubitId;
use crate::state::{StateManager, StateResult};

/// Serialized form of a circuit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CircuitDocument {
    /// Circuit name.
    pub name: String,
    /// Number of qubits.
    pub qubit_count: u32,
    /// Number of gates; must equal `gates.len()`.
    pub gate_count: usize,
    /// Circuit depth.
    pub depth: f64,
    /// Gates in order.
    pub gates: Vec<GateRecord>,
}

/// Serialized form of one gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateRecord {
    /// Gate kind name, e.g. `"h"` or `"cx"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Target qubits, controls first.
    pub qubits: Vec<u32>,
    /// Rotation angles, present only when the gate has parameters.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<f64>,
    /// Custom gate name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl From<&Gate> for GateRecord {
    fn from(gate: &Gate) -> Self {
        Self {
            kind: gate.kind.name().to_string(),
            qubits: gate.qubits.iter().map(|q| q.0).collect(),
            params: gate.params.clone(),
            name: gate.custom.as_ref().map(|c| c.name().to_string()),
        }
    }
}

impl From<&Circuit> for CircuitDocument {
    fn from(circuit: &Circuit) -> Self {
        Self {
            name: circuit.name().to_string(),
            qubit_count: circuit.num_qubits(),
            gate_count: circuit.num_gates(),
            depth: circuit.depth() as f64,
            gates: circuit.gates().iter().map(GateRecord::from).collect(),
        }
    }
}

/// Named custom-gate callbacks available when parsing.
#[derive(Default, Clone)]
pub struct CustomGateRegistry {
    gates: FxHashMap<String, Arc<CustomGateFn>>,
}

impl CustomGateRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback under a name, replacing any previous entry.
    pub fn register<F>(&mut self, name: impl Into<String>, op: F)
    where
        F: Fn(&mut dyn StateManager, &[QubitId]) -> StateResult<()> + Send + Sync + 'static,
    {
        self.gates.insert(name.into(), Arc::new(op));
    }

    /// Look up a custom gate by name.
    pub fn get(&self, name: &str) -> Option<CustomGate> {
        self.gates
            .get(name)
            .map(|op| CustomGate::from_shared(name, Arc::clone(op)))
    }

    /// Check if a name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.gates.contains_key(name)
    }

    /// Number of registered gates.
    pub fn len(&self) -> usize {
        self.gates.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }
}

impl CircuitDocument {
    /// Rebuild a circuit, validating every gate.
    pub fn into_circuit(self, registry: &CustomGateRegistry) -> IrResult<Circuit> {
        if self.gate_count != self.gates.len() {
            return Err(IrError::InconsistentDocument(format!(
                "gateCount is {} but {} gates are listed",
                self.gate_count,
                self.gates.len()
            )));
        }

        let mut circuit = Circuit::new(self.name, self.qubit_count)?;
        for record in self.gates {
            let kind: GateKind = record.kind.parse()?;
            let qubits = record.qubits.into_iter().map(QubitId);
            let gate = if kind == GateKind::Custom {
                let name = record.name.ok_or_else(|| IrError::InvalidCustomPayload {
                    gate_name: "custom".to_string(),
                    reason: "custom gate record has no name",
                })?;
                let custom = registry
                    .get(&name)
                    .ok_or(IrError::UnknownCustomGate(name))?;
                Gate::custom(qubits, custom)?
            } else {
                Gate::new(kind, qubits, record.params)?
            };
            circuit.add_gate(gate)?;
        }

        let depth = circuit.depth() as f64;
        if (depth - self.depth).abs() > f64::EPSILON {
            return Err(IrError::InconsistentDocument(format!(
                "depth is {} but the gates produce depth {}",
                self.depth,
                circuit.depth()
            )));
        }

        Ok(circuit)
    }
}

/// Serialize a circuit to compact JSON.
pub fn circuit_to_text(circuit: &Circuit) -> IrResult<String> {
    Ok(serde_json::to_string(&CircuitDocument::from(circuit))?)
}

/// Serialize a circuit to indented JSON.
pub fn circuit_to_text_pretty(circuit: &Circuit) -> IrResult<String> {
    Ok(serde_json::to_string_pretty(&CircuitDocument::from(circuit))?)
}

/// Parse a circuit. Custom gates are rejected.
pub fn circuit_from_text(text: &str) -> IrResult<Circuit> {
    circuit_from_text_with(text, &CustomGateRegistry::new())
}

/// Parse a circuit, resolving custom gates through `registry`.
pub fn circuit_from_text_with(text: &str, registry: &CustomGateRegistry) -> IrResult<Circuit> {
    let document: CircuitDocument = serde_json::from_str(text)?;
    document.into_circuit(registry)
}

/// Write a circuit document to a file.
pub fn write_circuit_file(path: impl AsRef<Path>, circuit: &Circuit) -> IrResult<()> {
    fs::write(path, circuit_to_text_pretty(circuit)?)?;
    Ok(())
}

/// Read a circuit document from a file.
pub fn read_circuit_file(path: impl AsRef<Path>) -> IrResult<Circuit> {
    read_circuit_file_with(path, &CustomGateRegistry::new())
}

/// Read a circuit document from a file, resolving custom gates through `registry`.
pub fn read_circuit_file_with(
    path: impl AsRef<Path>,
    registry: &CustomGateRegistry,
) -> IrResult<Circuit> {
    let text = fs::read_to_string(path)?;
    circuit_from_text_with(&text, registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_document_field_names() {
        let mut circuit = Circuit::new("demo", 2).unwrap();
        circuit
            .h(QubitId(0))
            .unwrap()
            .crz(PI / 4.0, QubitId(0), QubitId(1))
            .unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&circuit_to_text(&circuit).unwrap()).unwrap();

        assert_eq!(value["name"], "demo");
        assert_eq!(value["qubitCount"], 2);
        assert_eq!(value["gateCount"], 2);
        assert_eq!(value["depth"], 2.0);
        assert_eq!(value["gates"][0]["type"], "h");
        assert_eq!(value["gates"][0]["qubits"], serde_json::json!([0]));
        assert!(value["gates"][0].get("params").is_none());
        assert_eq!(value["gates"][1]["type"], "crz");
        assert_eq!(value["gates"][1]["params"], serde_json::json!([PI / 4.0]));
    }

    #[test]
    fn test_roundtrip_standard_gates() {
        let mut circuit = Circuit::new("mixed", 3).unwrap();
        circuit
            .h(QubitId(0))
            .unwrap()
            .ry(0.125, QubitId(1))
            .unwrap()
            .ccx(QubitId(0), QubitId(1), QubitId(2))
            .unwrap()
            .cry(-1.5, QubitId(2), QubitId(0))
            .unwrap()
            .measure(QubitId(2))
            .unwrap();

        let parsed = circuit_from_text(&circuit_to_text(&circuit).unwrap()).unwrap();
        assert_eq!(parsed, circuit);
    }

    #[test]
    fn test_parse_accepts_aliases() {
        let text = r#"{
            "name": "aliases",
            "qubitCount": 3,
            "gateCount": 2,
            "depth": 2,
            "gates": [
                { "type": "CNOT", "qubits": [0, 1] },
                { "type": "toffoli", "qubits": [0, 1, 2] }
            ]
        }"#;
        let circuit = circuit_from_text(text).unwrap();
        assert_eq!(circuit.gates()[0].kind, GateKind::CX);
        assert_eq!(circuit.gates()[1].kind, GateKind::CCX);
    }

    #[test]
    fn test_parse_rejects_bad_documents() {
        let wrong_count = r#"{"name":"c","qubitCount":1,"gateCount":2,"depth":1,
            "gates":[{"type":"h","qubits":[0]}]}"#;
        assert!(matches!(
            circuit_from_text(wrong_count),
            Err(IrError::InconsistentDocument(_))
        ));

        let wrong_depth = r#"{"name":"c","qubitCount":1,"gateCount":1,"depth":3,
            "gates":[{"type":"h","qubits":[0]}]}"#;
        assert!(matches!(
            circuit_from_text(wrong_depth),
            Err(IrError::InconsistentDocument(_))
        ));

        let out_of_range = r#"{"name":"c","qubitCount":1,"gateCount":1,"depth":1,
            "gates":[{"type":"x","qubits":[1]}]}"#;
        assert!(matches!(
            circuit_from_text(out_of_range),
            Err(IrError::QubitOutOfRange { .. })
        ));

        let negative = r#"{"name":"c","qubitCount":1,"gateCount":1,"depth":1,
            "gates":[{"type":"x","qubits":[-1]}]}"#;
        assert!(matches!(
            circuit_from_text(negative),
            Err(IrError::Serialization(_))
        ));

        let missing_angle = r#"{"name":"c","qubitCount":1,"gateCount":1,"depth":1,
            "gates":[{"type":"rx","qubits":[0]}]}"#;
        assert!(matches!(
            circuit_from_text(missing_angle),
            Err(IrError::MissingParameter { .. })
        ));

        let unknown = r#"{"name":"c","qubitCount":1,"gateCount":1,"depth":1,
            "gates":[{"type":"u3","qubits":[0]}]}"#;
        assert!(matches!(
            circuit_from_text(unknown),
            Err(IrError::UnknownGate(_))
        ));
    }

    #[test]
    fn test_parse_rejects_oversized_width() {
        let huge = r#"{"name":"x","qubitCount":4294967295,"gateCount":0,"depth":0,"gates":[]}"#;
        assert!(matches!(
            circuit_from_text(huge),
            Err(IrError::TooManyQubits {
                requested: u32::MAX,
                ..
            })
        ));
    }

    #[test]
    fn test_custom_gates_need_registry() {
        let mut registry = CustomGateRegistry::new();
        registry.register("noop", |_, _| Ok(()));

        let mut circuit = Circuit::new("custom", 2).unwrap();
        circuit
            .add_gate(Gate::custom([QubitId(0), QubitId(1)], registry.get("noop").unwrap()).unwrap())
            .unwrap();
        let text = circuit_to_text(&circuit).unwrap();
        assert!(text.contains(r#""name":"noop""#));

        assert!(matches!(
            circuit_from_text(&text),
            Err(IrError::UnknownCustomGate(name)) if name == "noop"
        ));

        let parsed = circuit_from_text_with(&text, &registry).unwrap();
        assert_eq!(parsed.num_gates(), 1);
        assert_eq!(parsed.gates()[0].name(), "noop");
        // Both circuits share the registry's callback, so they compare equal.
        assert_eq!(parsed, circuit);
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ghz.json");

        let circuit = Circuit::ghz(4).unwrap();
        write_circuit_file(&path, &circuit).unwrap();
        assert_eq!(read_circuit_file(&path).unwrap(), circuit);

        assert!(matches!(
            read_circuit_file(dir.path().join("missing.json")),
            Err(IrError::Io(_))
        ));
    }
}
