//! Error types for the IR crate.

use crate::qubit::QubitId;
use thiserror::Error;

/// Errors that can occur while building, validating or (de)serializing circuits.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// A circuit must have at least one qubit.
    #[error("Circuit '{name}' must have at least one qubit")]
    InvalidQubitCount {
        /// Name of the circuit.
        name: String,
    },

    /// Circuit wider than [`MAX_CIRCUIT_QUBITS`](crate::circuit::MAX_CIRCUIT_QUBITS).
    #[error("Circuit '{name}' requests {requested} qubits, the limit is {max}")]
    TooManyQubits {
        /// Name of the circuit.
        name: String,
        /// Requested qubit count.
        requested: u32,
        /// Supported maximum.
        max: u32,
    },

    /// Gate was given no target qubits.
    #[error("Gate '{gate_name}' requires at least one target qubit")]
    EmptyQubits {
        /// Name of the gate.
        gate_name: String,
    },

    /// Gate requires different number of qubits.
    #[error("Gate '{gate_name}' requires {expected} qubits, got {got}")]
    QubitCountMismatch {
        /// Name of the gate.
        gate_name: String,
        /// Expected number of qubits.
        expected: u32,
        /// Actual number of qubits provided.
        got: u32,
    },

    /// Duplicate qubit in operation.
    #[error("Duplicate qubit {qubit} in operation{}", format_gate_context(.gate_name))]
    DuplicateQubit {
        /// The duplicate qubit.
        qubit: QubitId,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// Qubit index outside `[0, num_qubits)`.
    #[error("Qubit {qubit} out of range for {num_qubits}-qubit circuit{}", format_gate_context(.gate_name))]
    QubitOutOfRange {
        /// The offending qubit.
        qubit: QubitId,
        /// Number of qubits in the circuit.
        num_qubits: u32,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// Rotation gate constructed without its angle.
    #[error("Gate '{gate_name}' requires {expected} parameter(s), got {got}")]
    MissingParameter {
        /// Name of the gate.
        gate_name: String,
        /// Required number of parameters.
        expected: usize,
        /// Actual number of parameters provided.
        got: usize,
    },

    /// Parameters given to a gate kind that takes none.
    #[error("Gate '{gate_name}' takes no parameters, got {got}")]
    UnexpectedParameters {
        /// Name of the gate.
        gate_name: String,
        /// Number of parameters provided.
        got: usize,
    },

    /// Parameter is NaN or infinite.
    #[error("Gate '{gate_name}' has non-finite parameter {value}")]
    NonFiniteParameter {
        /// Name of the gate.
        gate_name: String,
        /// The offending value.
        value: f64,
    },

    /// A custom gate kind without its callback, or a callback on a standard kind.
    #[error("Gate '{gate_name}': {reason}")]
    InvalidCustomPayload {
        /// Name of the gate.
        gate_name: String,
        /// What is wrong with the payload.
        reason: &'static str,
    },

    /// Gate type name not recognised during parsing.
    #[error("Unknown gate type '{0}'")]
    UnknownGate(String),

    /// Custom gate name not present in the registry used for parsing.
    #[error("Custom gate '{0}' is not registered")]
    UnknownCustomGate(String),

    /// Parsed document disagrees with the circuit rebuilt from it.
    #[error("Inconsistent circuit document: {0}")]
    InconsistentDocument(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error while persisting a circuit.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Helper function to format optional gate context.
#[allow(clippy::ref_option)]
fn format_gate_context(gate_name: &Option<String>) -> String {
    match gate_name {
        Some(name) => format!(" (gate: {name})"),
        None => String::new(),
    }
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
