//! The state-manager contract.
//!
//! A [`StateManager`] owns the simulated amplitudes and exposes one method per
//! fundamental gate. The executor dispatches every gate to exactly one of
//! these methods; custom gate callbacks receive the same interface.

use thiserror::Error;

/// Errors reported by a state manager.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum StateError {
    /// Qubit index not held by this state.
    #[error("Qubit {qubit} out of range for {num_qubits}-qubit state")]
    QubitOutOfRange {
        /// The offending qubit index.
        qubit: usize,
        /// Number of qubits held by the state.
        num_qubits: usize,
    },

    /// The same qubit was passed twice to a multi-qubit operation.
    #[error("Qubit {0} used more than once in one operation")]
    DuplicateQubit(usize),

    /// The requested state is larger than the manager supports.
    #[error("State of {requested} qubits exceeds the supported maximum of {max}")]
    TooManyQubits {
        /// Requested qubit count.
        requested: usize,
        /// Supported maximum.
        max: usize,
    },

    /// Backend-specific failure.
    #[error("State backend error: {0}")]
    Backend(String),
}

/// Result type for state-manager operations.
pub type StateResult<T> = Result<T, StateError>;

/// Check that every qubit is in range and that none repeats.
pub fn check_qubits(num_qubits: usize, qubits: &[usize]) -> StateResult<()> {
    for (i, &q) in qubits.iter().enumerate() {
        if q >= num_qubits {
            return Err(StateError::QubitOutOfRange {
                qubit: q,
                num_qubits,
            });
        }
        if qubits[..i].contains(&q) {
            return Err(StateError::DuplicateQubit(q));
        }
    }
    Ok(())
}

/// A simulated quantum state that gates are applied to.
///
/// Rotation angles are in radians. Two- and three-qubit operations take their
/// control qubit(s) first.
pub trait StateManager {
    /// Number of qubits held by this state.
    fn num_qubits(&self) -> usize;

    /// Identity. Only validates the qubit index.
    fn apply_i(&mut self, qubit: usize) -> StateResult<()> {
        check_qubits(self.num_qubits(), &[qubit])
    }

    /// Pauli-X.
    fn apply_x(&mut self, qubit: usize) -> StateResult<()>;

    /// Pauli-Y.
    fn apply_y(&mut self, qubit: usize) -> StateResult<()>;

    /// Pauli-Z.
    fn apply_z(&mut self, qubit: usize) -> StateResult<()>;

    /// Hadamard.
    fn apply_h(&mut self, qubit: usize) -> StateResult<()>;

    /// Phase gate S = sqrt(Z).
    fn apply_s(&mut self, qubit: usize) -> StateResult<()>;

    /// T gate, the fourth root of Z.
    fn apply_t(&mut self, qubit: usize) -> StateResult<()>;

    /// Rotation around X.
    fn apply_rx(&mut self, qubit: usize, theta: f64) -> StateResult<()>;

    /// Rotation around Y.
    fn apply_ry(&mut self, qubit: usize, theta: f64) -> StateResult<()>;

    /// Rotation around Z.
    fn apply_rz(&mut self, qubit: usize, theta: f64) -> StateResult<()>;

    /// Controlled-X (CNOT).
    fn apply_cx(&mut self, control: usize, target: usize) -> StateResult<()>;

    /// Controlled-Z.
    fn apply_cz(&mut self, control: usize, target: usize) -> StateResult<()>;

    /// SWAP.
    fn apply_swap(&mut self, q1: usize, q2: usize) -> StateResult<()>;

    /// Controlled rotation around X.
    fn apply_crx(&mut self, control: usize, target: usize, theta: f64) -> StateResult<()>;

    /// Controlled rotation around Y.
    fn apply_cry(&mut self, control: usize, target: usize, theta: f64) -> StateResult<()>;

    /// Controlled rotation around Z.
    fn apply_crz(&mut self, control: usize, target: usize, theta: f64) -> StateResult<()>;

    /// Toffoli (CCX).
    fn apply_ccx(&mut self, c1: usize, c2: usize, target: usize) -> StateResult<()>;

    /// Fredkin (CSWAP).
    fn apply_cswap(&mut self, control: usize, t1: usize, t2: usize) -> StateResult<()>;

    /// Projectively measure one qubit, returning the classical bit.
    fn measure(&mut self, qubit: usize) -> StateResult<bool>;
}
