//! qexec Circuit Representation
//!
//! This crate provides the data structures that the qexec executor consumes:
//! gates with validated arity, an append-only circuit that tracks its own
//! depth, the [`StateManager`] contract that simulated states implement, and a
//! JSON text format for exchanging circuits.
//!
//! # Core Components
//!
//! - **Qubits**: [`QubitId`] addresses a qubit within a circuit or a state
//! - **Gates**: [`GateKind`] is the closed set of supported operations; [`Gate`]
//!   binds a kind to its qubits and angles; [`CustomGate`] wraps a user callback
//! - **Circuit**: [`Circuit`] is the builder-style container with incremental
//!   depth tracking
//! - **State**: [`StateManager`] is the per-gate interface a simulator provides
//! - **Serialization**: [`circuit_to_text`] and [`circuit_from_text`]
//!
//! # Example: Building a Bell State
//!
//! ```rust
//! use qexec_ir::{Circuit, QubitId};
//!
//! let mut circuit = Circuit::new("bell_state", 2).unwrap();
//! circuit.h(QubitId(0)).unwrap();
//! circuit.cx(QubitId(0), QubitId(1)).unwrap();
//! circuit.measure_all().unwrap();
//!
//! assert_eq!(circuit.num_gates(), 3);
//! assert_eq!(circuit.depth(), 3);
//! ```
//!
//! # Example: Text Round-Trip
//!
//! ```rust
//! use qexec_ir::{Circuit, circuit_from_text, circuit_to_text};
//!
//! let circuit = Circuit::ghz(3).unwrap();
//! let text = circuit_to_text(&circuit).unwrap();
//! assert_eq!(circuit_from_text(&text).unwrap(), circuit);
//! ```
//!
//! # Supported Gates
//!
//! | Gate | Qubits | Parameters |
//! |------|--------|------------|
//! | `id`, `x`, `y`, `z`, `h`, `s`, `t` | 1 | none |
//! | `rx`, `ry`, `rz` | 1 | angle |
//! | `cx`, `cz`, `swap` | 2 | none |
//! | `crx`, `cry`, `crz` | 2 | angle |
//! | `ccx`, `cswap` | 3 | none |
//! | `measure` | 1 or more | none |
//! | `custom` | 1 or more | callback |

pub mod circuit;
pub mod error;
pub mod gate;
pub mod qubit;
pub mod serialization;
pub mod state;

pub use circuit::{Circuit, GateCounts, MAX_CIRCUIT_QUBITS};
pub use error::{IrError, IrResult};
pub use gate::{ArityClass, CustomGate, CustomGateFn, Gate, GateKind};
pub use qubit::QubitId;
pub use serialization::{
    CircuitDocument, CustomGateRegistry, GateRecord, circuit_from_text, circuit_from_text_with,
    circuit_to_text, circuit_to_text_pretty, read_circuit_file, read_circuit_file_with,
    write_circuit_file,
};
pub use state::{StateError, StateManager, StateResult, check_qubits};
