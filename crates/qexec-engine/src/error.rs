//! Error types for the executor.

use std::fmt;

use qexec_ir::{IrError, QubitId, StateError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{ExecutionMode, OptimizationLevel};

/// A mode or optimization level that can be requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum Feature {
    /// An execution mode.
    Mode(ExecutionMode),
    /// An optimization level.
    Optimization(OptimizationLevel),
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Feature::Mode(mode) => write!(f, "execution mode '{mode}'"),
            Feature::Optimization(level) => write!(f, "optimization level '{level}'"),
        }
    }
}

/// Broad category of an [`ExecError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    /// Malformed gate or circuit.
    Construction,
    /// Failure while applying a gate.
    Execution,
    /// State smaller than the circuit.
    Capacity,
    /// Requested mode or level has no implementation.
    Unimplemented,
}

/// Errors that can occur while executing circuits.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExecError {
    /// The state holds fewer qubits than the circuit needs.
    #[error("Circuit needs {required} qubits but the state holds {available}")]
    CapacityExceeded {
        /// Qubits used by the circuit.
        required: u32,
        /// Qubits held by the state.
        available: usize,
    },

    /// Rotation gate without an angle.
    #[error("Missing rotation parameter for gate '{gate_name}'")]
    MissingRotationParameter {
        /// Name of the gate.
        gate_name: String,
    },

    /// Gate addresses a qubit the state does not hold.
    #[error("Qubit {qubit} out of range for {num_qubits}-qubit state (gate: {gate_name})")]
    QubitOutOfRange {
        /// The offending qubit.
        qubit: QubitId,
        /// Qubits held by the state.
        num_qubits: usize,
        /// Name of the gate.
        gate_name: String,
    },

    /// The state manager rejected an operation.
    #[error("State manager failed on gate '{gate_name}': {source}")]
    State {
        /// Name of the gate.
        gate_name: String,
        /// Underlying failure.
        #[source]
        source: StateError,
    },

    /// A custom gate callback failed.
    #[error("Custom gate '{name}' failed: {source}")]
    CustomGate {
        /// Name of the custom gate.
        name: String,
        /// Underlying failure.
        #[source]
        source: StateError,
    },

    /// The requested feature has no implementation.
    #[error("{feature} is not implemented")]
    Unimplemented {
        /// What was requested.
        feature: Feature,
    },

    /// A gate failed part-way through a run. Earlier gates stay applied.
    #[error("Gate {index} ('{gate_name}') failed: {source}")]
    GateFailed {
        /// Position of the gate in the executed order.
        index: usize,
        /// Name of the gate.
        gate_name: String,
        /// Underlying failure.
        #[source]
        source: Box<ExecError>,
    },

    /// Malformed gate or circuit.
    #[error(transparent)]
    Ir(#[from] IrError),
}

impl ExecError {
    /// Broad category, for callers that branch on the kind of failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExecError::CapacityExceeded { .. } => ErrorKind::Capacity,
            ExecError::MissingRotationParameter { .. }
            | ExecError::QubitOutOfRange { .. }
            | ExecError::State { .. }
            | ExecError::CustomGate { .. } => ErrorKind::Execution,
            ExecError::Unimplemented { .. } => ErrorKind::Unimplemented,
            ExecError::GateFailed { source, .. } => source.kind(),
            ExecError::Ir(_) => ErrorKind::Construction,
        }
    }

    /// The innermost error, looking through [`ExecError::GateFailed`].
    pub fn root(&self) -> &ExecError {
        match self {
            ExecError::GateFailed { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Result type for executor operations.
pub type ExecResult<T> = Result<T, ExecError>;
