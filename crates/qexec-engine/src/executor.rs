//! The gate executor.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use qexec_ir::{Circuit, Gate, GateKind, IrError, QubitId, StateError, StateManager};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::config::{ExecutionMode, ExecutorConfig, FallbackPolicy, OptimizationLevel};
use crate::error::{ExecError, ExecResult, Feature};
use crate::event::{EventSink, ExecutionEvent};
use crate::optimize::{OptimizationStrategy, VerbatimCopy, optimizer_for};
use crate::schedule::{ExecutionStrategy, SequentialStrategy, strategy_for};
use crate::stats::ExecutionStats;

/// Whether a run is in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ExecutorStatus {
    /// Ready for the next run.
    #[default]
    Idle,
    /// Applying gates.
    Running,
}

/// One classical bit read by a measurement gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasurementRecord {
    /// Measured qubit.
    pub qubit: QubitId,
    /// Observed value.
    pub outcome: bool,
}

/// A requested feature that was replaced by an implemented one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fallback {
    /// What the configuration asked for.
    pub requested: Feature,
    /// What ran instead.
    pub substitute: Feature,
}

/// Result of [`Executor::optimize_circuit`].
#[derive(Debug, Clone)]
pub struct OptimizationOutcome {
    /// The new circuit.
    pub circuit: Circuit,
    /// Set when the requested level was substituted.
    pub fallback: Option<Fallback>,
}

/// Summary of a successful run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Unique id of this run.
    pub run_id: Uuid,
    /// Wall-clock start time.
    pub started_at: DateTime<Utc>,
    /// Name of the circuit that ran.
    pub circuit_name: String,
    /// Mode that actually ran.
    pub mode: ExecutionMode,
    /// Executor statistics after the run.
    pub stats: ExecutionStats,
    /// Measurement outcomes in the order they were taken.
    pub measurements: Vec<MeasurementRecord>,
    /// Substitutions made for unimplemented features.
    pub fallbacks: Vec<Fallback>,
    /// Total wall time of the run, scheduling included.
    pub wall_time: Duration,
}

impl RunReport {
    /// Measurement outcomes as a string of `0`/`1`, in measurement order.
    pub fn outcome_bits(&self) -> String {
        self.measurements
            .iter()
            .map(|m| if m.outcome { '1' } else { '0' })
            .collect()
    }
}

/// Applies gates to a state manager and keeps statistics.
///
/// The executor borrows its event sink; the state manager is passed to each
/// call. Neither is owned.
pub struct Executor<'a> {
    sink: &'a dyn EventSink,
    config: ExecutorConfig,
    stats: ExecutionStats,
    status: ExecutorStatus,
}

impl<'a> Executor<'a> {
    /// Create an executor with the default configuration.
    pub fn new(sink: &'a dyn EventSink) -> Self {
        Self::with_config(sink, ExecutorConfig::default())
    }

    /// Create an executor with a given configuration.
    pub fn with_config(sink: &'a dyn EventSink, config: ExecutorConfig) -> Self {
        Self {
            sink,
            config,
            stats: ExecutionStats::default(),
            status: ExecutorStatus::Idle,
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Set the execution mode.
    pub fn set_mode(&mut self, mode: ExecutionMode) {
        self.config.mode = mode;
    }

    /// Set the optimization level used in [`ExecutionMode::Optimized`].
    pub fn set_optimization(&mut self, level: OptimizationLevel) {
        self.config.optimization = level;
    }

    /// Set the fallback policy.
    pub fn set_fallback(&mut self, policy: FallbackPolicy) {
        self.config.fallback = policy;
    }

    /// Current status.
    pub fn status(&self) -> ExecutorStatus {
        self.status
    }

    /// Snapshot of the statistics.
    pub fn stats(&self) -> ExecutionStats {
        self.stats
    }

    /// Zero the statistics.
    pub fn reset_stats(&mut self) {
        self.stats.reset();
    }

    // =========================================================================
    // Gate application
    // =========================================================================

    /// Apply one gate to `state`.
    ///
    /// Statistics are updated and an [`ExecutionEvent::OperationPerformed`] is
    /// emitted whether or not the gate succeeds. Returns the bits read when the
    /// gate is a measurement.
    pub fn apply_gate(
        &mut self,
        gate: &Gate,
        state: &mut dyn StateManager,
    ) -> ExecResult<Vec<MeasurementRecord>> {
        let start = Instant::now();
        let result = dispatch(gate, state);
        let elapsed = start.elapsed();
        let succeeded = result.is_ok();

        let class = gate.arity_class();
        self.stats.record(
            class,
            elapsed,
            succeeded,
            self.config.gate_fidelity.for_class(class),
        );

        self.sink.emit(&ExecutionEvent::OperationPerformed {
            gate: gate.name().to_string(),
            qubits: gate.qubits.clone(),
            succeeded,
            elapsed,
        });
        if succeeded {
            self.sink.emit(&ExecutionEvent::StateChanged {
                num_qubits: state.num_qubits(),
            });
        }

        if let Err(e) = &result {
            debug!("Gate '{}' failed: {}", gate.name(), e);
        }
        result
    }

    // =========================================================================
    // Circuit execution
    // =========================================================================

    /// Run every gate of `circuit` against `state`.
    ///
    /// Fails before touching the state when the state is too small, or when
    /// an unimplemented mode or level is requested under
    /// [`FallbackPolicy::Reject`]. A gate failure stops the run; gates applied
    /// before it are not rolled back.
    #[instrument(skip(self, circuit, state), fields(circuit = %circuit.name()))]
    pub fn run_circuit(
        &mut self,
        circuit: &Circuit,
        state: &mut dyn StateManager,
    ) -> ExecResult<RunReport> {
        let available = state.num_qubits();
        if available < circuit.num_qubits() as usize {
            return Err(ExecError::CapacityExceeded {
                required: circuit.num_qubits(),
                available,
            });
        }

        let wall_start = Instant::now();
        let mut fallbacks = Vec::new();

        let mut strategy = strategy_for(self.config.mode);
        let mut order = match strategy.schedule(circuit) {
            Ok(order) => order,
            Err(err) => {
                self.degrade(err, Feature::Mode(ExecutionMode::Sequential), &mut fallbacks)?;
                strategy = Box::new(SequentialStrategy);
                strategy.schedule(circuit)?
            }
        };

        let optimized;
        let circuit = if strategy.optimizes_first() {
            let outcome = self.optimize_circuit(circuit, self.config.optimization)?;
            fallbacks.extend(outcome.fallback);
            optimized = outcome.circuit;
            order = strategy.schedule(&optimized)?;
            &optimized
        } else {
            circuit
        };

        info!(
            "Running circuit '{}' ({} gates, depth {}) in {} mode",
            circuit.name(),
            circuit.num_gates(),
            circuit.depth(),
            strategy.name()
        );

        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        self.status = ExecutorStatus::Running;
        self.stats.circuit_depth = circuit.depth();

        let mut measurements = Vec::new();
        let mut failure = None;
        let gates = circuit.gates();
        for index in order {
            let gate = &gates[index];
            match self.apply_gate(gate, state) {
                Ok(records) => measurements.extend(records),
                Err(source) => {
                    failure = Some(ExecError::GateFailed {
                        index,
                        gate_name: gate.name().to_string(),
                        source: Box::new(source),
                    });
                    break;
                }
            }
        }

        self.status = ExecutorStatus::Idle;
        let wall_time = wall_start.elapsed();

        if let Some(err) = failure {
            warn!("Run of '{}' aborted: {}", circuit.name(), err);
            return Err(err);
        }

        info!(
            "Completed '{}' in {:?}, fidelity estimate {:.6}",
            circuit.name(),
            wall_time,
            self.stats.fidelity
        );

        Ok(RunReport {
            run_id,
            started_at,
            circuit_name: circuit.name().to_string(),
            mode: strategy.mode(),
            stats: self.stats,
            measurements,
            fallbacks,
            wall_time,
        })
    }

    /// Build a new circuit from `circuit` at the given optimization level.
    ///
    /// Only [`OptimizationLevel::None`] has an implementation. Other levels
    /// follow the fallback policy.
    pub fn optimize_circuit(
        &self,
        circuit: &Circuit,
        level: OptimizationLevel,
    ) -> ExecResult<OptimizationOutcome> {
        let optimizer = optimizer_for(level);
        match optimizer.optimize(circuit) {
            Ok(optimized) => Ok(OptimizationOutcome {
                circuit: optimized,
                fallback: None,
            }),
            Err(err) => {
                let mut fallbacks = Vec::with_capacity(1);
                self.degrade(err, Feature::Optimization(VerbatimCopy.level()), &mut fallbacks)?;
                Ok(OptimizationOutcome {
                    circuit: VerbatimCopy.optimize(circuit)?,
                    fallback: fallbacks.pop(),
                })
            }
        }
    }

    /// Turn an `Unimplemented` error into a recorded fallback when the policy
    /// allows it; pass every other error through.
    fn degrade(
        &self,
        err: ExecError,
        substitute: Feature,
        fallbacks: &mut Vec<Fallback>,
    ) -> ExecResult<()> {
        match (err, self.config.fallback) {
            (ExecError::Unimplemented { feature }, FallbackPolicy::Degrade) => {
                warn!("{} is not implemented, falling back to {}", feature, substitute);
                fallbacks.push(Fallback {
                    requested: feature,
                    substitute,
                });
                Ok(())
            }
            (err, _) => Err(err),
        }
    }
}

// =============================================================================
// Dispatch
// =============================================================================

/// Route a gate to the handler for its class.
fn dispatch(gate: &Gate, state: &mut dyn StateManager) -> ExecResult<Vec<MeasurementRecord>> {
    let num_qubits = state.num_qubits();
    if gate.qubits.is_empty() {
        return Err(IrError::EmptyQubits {
            gate_name: gate.name().to_string(),
        }
        .into());
    }
    if let Some(&qubit) = gate.qubits.iter().find(|q| q.index() >= num_qubits) {
        return Err(ExecError::QubitOutOfRange {
            qubit,
            num_qubits,
            gate_name: gate.name().to_string(),
        });
    }

    let qubits: Vec<usize> = gate.qubits.iter().map(|q| q.index()).collect();
    match gate.kind {
        GateKind::Measure => apply_measurement(gate, &qubits, state),
        GateKind::Custom => apply_custom(gate, state).map(|()| vec![]),
        _ => {
            match *qubits.as_slice() {
                [q] => apply_single(gate, q, state)?,
                [a, b] => apply_two(gate, a, b, state)?,
                [a, b, c] => apply_multi(gate, a, b, c, state)?,
                _ => return Err(arity_mismatch(gate)),
            }
            Ok(vec![])
        }
    }
}

fn state_error(gate: &Gate) -> impl FnOnce(StateError) -> ExecError + '_ {
    move |source| ExecError::State {
        gate_name: gate.name().to_string(),
        source,
    }
}

fn arity_mismatch(gate: &Gate) -> ExecError {
    IrError::QubitCountMismatch {
        gate_name: gate.name().to_string(),
        expected: gate.kind.arity().unwrap_or(0),
        got: gate.qubits.len() as u32,
    }
    .into()
}

fn rotation_angle(gate: &Gate) -> ExecResult<f64> {
    gate.angle().ok_or_else(|| ExecError::MissingRotationParameter {
        gate_name: gate.name().to_string(),
    })
}

fn apply_single(gate: &Gate, q: usize, state: &mut dyn StateManager) -> ExecResult<()> {
    let result = match gate.kind {
        GateKind::I => state.apply_i(q),
        GateKind::X => state.apply_x(q),
        GateKind::Y => state.apply_y(q),
        GateKind::Z => state.apply_z(q),
        GateKind::H => state.apply_h(q),
        GateKind::S => state.apply_s(q),
        GateKind::T => state.apply_t(q),
        GateKind::Rx => state.apply_rx(q, rotation_angle(gate)?),
        GateKind::Ry => state.apply_ry(q, rotation_angle(gate)?),
        GateKind::Rz => state.apply_rz(q, rotation_angle(gate)?),
        _ => return Err(arity_mismatch(gate)),
    };
    result.map_err(state_error(gate))
}

fn apply_two(gate: &Gate, a: usize, b: usize, state: &mut dyn StateManager) -> ExecResult<()> {
    let result = match gate.kind {
        GateKind::CX => state.apply_cx(a, b),
        GateKind::CZ => state.apply_cz(a, b),
        GateKind::Swap => state.apply_swap(a, b),
        GateKind::CRx => state.apply_crx(a, b, rotation_angle(gate)?),
        GateKind::CRy => state.apply_cry(a, b, rotation_angle(gate)?),
        GateKind::CRz => state.apply_crz(a, b, rotation_angle(gate)?),
        _ => return Err(arity_mismatch(gate)),
    };
    result.map_err(state_error(gate))
}

fn apply_multi(
    gate: &Gate,
    a: usize,
    b: usize,
    c: usize,
    state: &mut dyn StateManager,
) -> ExecResult<()> {
    let result = match gate.kind {
        GateKind::CCX => state.apply_ccx(a, b, c),
        GateKind::CSwap => state.apply_cswap(a, b, c),
        _ => return Err(arity_mismatch(gate)),
    };
    result.map_err(state_error(gate))
}

fn apply_measurement(
    gate: &Gate,
    qubits: &[usize],
    state: &mut dyn StateManager,
) -> ExecResult<Vec<MeasurementRecord>> {
    let mut records = Vec::with_capacity(qubits.len());
    for (&q, &qubit) in qubits.iter().zip(&gate.qubits) {
        let outcome = state.measure(q).map_err(state_error(gate))?;
        records.push(MeasurementRecord { qubit, outcome });
    }
    Ok(records)
}

fn apply_custom(gate: &Gate, state: &mut dyn StateManager) -> ExecResult<()> {
    let custom = gate.custom.as_ref().ok_or_else(|| IrError::InvalidCustomPayload {
        gate_name: gate.name().to_string(),
        reason: "custom gate requires a callback",
    })?;
    custom
        .apply(state, &gate.qubits)
        .map_err(|source| ExecError::CustomGate {
            name: custom.name().to_string(),
            source,
        })
}
