//! qexec Local Statevector Simulator
//!
//! This crate provides [`Statevector`], a [`StateManager`](qexec_ir::StateManager)
//! that keeps the full `2^n` amplitude vector in memory. It gives exact results
//! and is the default state for the executor and the CLI.
//!
//! # Features
//!
//! - **Exact Simulation**: Full statevector representation
//! - **All Fundamental Gates**: Every gate method of the state-manager contract
//! - **Collapsing Measurement**: Projective measurement with a seedable RNG
//!
//! # Performance
//!
//! | Qubits | Memory | Simulation Speed |
//! |--------|--------|------------------|
//! | 10 | ~16 KB | Instant |
//! | 15 | ~512 KB | Fast |
//! | 20 | ~16 MB | Moderate |
//! | 24 | ~256 MB | Slow |
//!
//! # Example
//!
//! ```rust
//! use qexec_adapter_sim::Statevector;
//! use qexec_ir::StateManager;
//!
//! let mut state = Statevector::with_seed(2, 7).unwrap();
//! state.apply_h(0).unwrap();
//! state.apply_cx(0, 1).unwrap();
//!
//! let probs = state.probabilities();
//! assert!((probs[0b00] - 0.5).abs() < 1e-10);
//! assert!((probs[0b11] - 0.5).abs() < 1e-10);
//!
//! let a = state.measure(0).unwrap();
//! assert_eq!(state.measure(1).unwrap(), a);
//! ```

mod statevector;

pub use statevector::{MAX_QUBITS, Statevector};
