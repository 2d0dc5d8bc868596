//! qexec Circuit Executor
//!
//! This crate applies the gates of a [`Circuit`](qexec_ir::Circuit) to a
//! [`StateManager`](qexec_ir::StateManager), one call per gate, and keeps
//! statistics about what it did.
//!
//! # Overview
//!
//! - [`Executor`] dispatches each gate to the state manager method for its
//!   kind, collects [`ExecutionStats`] and notifies an [`EventSink`].
//! - [`ExecutionMode`] and [`OptimizationLevel`] select an
//!   [`ExecutionStrategy`] and an [`OptimizationStrategy`]. Modes and levels
//!   without an implementation report [`ExecError::Unimplemented`]; under the
//!   default [`FallbackPolicy::Degrade`] the executor substitutes the
//!   implemented strategy and records a [`Fallback`] in the [`RunReport`].
//! - [`ExecutorConfig`] loads from YAML or JSON with environment overrides.
//!
//! A failing gate stops the run. Gates applied before it stay applied: the
//! state is left partially mutated.
//!
//! # Example
//!
//! ```rust
//! use qexec_adapter_sim::Statevector;
//! use qexec_engine::{Executor, RecordingSink};
//! use qexec_ir::Circuit;
//!
//! let circuit = Circuit::bell().unwrap();
//! let mut state = Statevector::with_seed(2, 11).unwrap();
//! let sink = RecordingSink::new();
//!
//! let mut executor = Executor::new(&sink);
//! let report = executor.run_circuit(&circuit, &mut state).unwrap();
//!
//! assert_eq!(report.stats.total_gates, 3);
//! assert_eq!(report.measurements.len(), 2);
//! assert_eq!(report.measurements[0].outcome, report.measurements[1].outcome);
//! ```

pub mod config;
pub mod error;
pub mod event;
pub mod executor;
pub mod optimize;
pub mod schedule;
pub mod stats;

pub use config::{
    ConfigError, ExecutionMode, ExecutorConfig, FallbackPolicy, GateFidelity, OptimizationLevel,
};
pub use error::{ErrorKind, ExecError, ExecResult, Feature};
pub use event::{EventSink, ExecutionEvent, NullSink, RecordingSink, TracingSink};
pub use executor::{
    Executor, ExecutorStatus, Fallback, MeasurementRecord, OptimizationOutcome, RunReport,
};
pub use optimize::{OptimizationStrategy, UnimplementedOptimization, VerbatimCopy, optimizer_for};
pub use schedule::{
    ExecutionStrategy, OptimizedStrategy, SequentialStrategy, UnimplementedStrategy, strategy_for,
};
pub use stats::ExecutionStats;
