//! Execution statistics.

use std::time::Duration;

use qexec_ir::ArityClass;
use serde::{Deserialize, Serialize};

/// Counters accumulated by the executor.
///
/// Every attempted gate is counted, whether or not it succeeded; `errors`
/// counts the failures among them. The fidelity estimate only moves on
/// success.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExecutionStats {
    /// Gates attempted.
    pub total_gates: usize,
    /// One-qubit gates attempted.
    pub single_qubit_gates: usize,
    /// Two-qubit gates attempted.
    pub two_qubit_gates: usize,
    /// Gates on three or more qubits attempted.
    pub multi_qubit_gates: usize,
    /// Measurement gates attempted.
    pub measurements: usize,
    /// Depth of the last circuit run.
    pub circuit_depth: usize,
    /// Time spent applying gates.
    pub execution_time: Duration,
    /// Failed gate applications.
    pub errors: usize,
    /// Product of per-gate fidelities of successfully applied gates.
    pub fidelity: f64,
}

impl Default for ExecutionStats {
    fn default() -> Self {
        Self {
            total_gates: 0,
            single_qubit_gates: 0,
            two_qubit_gates: 0,
            multi_qubit_gates: 0,
            measurements: 0,
            circuit_depth: 0,
            execution_time: Duration::ZERO,
            errors: 0,
            fidelity: 1.0,
        }
    }
}

impl ExecutionStats {
    /// Record one gate application.
    pub fn record(&mut self, class: ArityClass, elapsed: Duration, succeeded: bool, fidelity: f64) {
        self.total_gates += 1;
        match class {
            ArityClass::Single => self.single_qubit_gates += 1,
            ArityClass::Two => self.two_qubit_gates += 1,
            ArityClass::Multi => self.multi_qubit_gates += 1,
            ArityClass::Measurement => self.measurements += 1,
        }
        self.execution_time += elapsed;
        if succeeded {
            self.fidelity *= fidelity;
        } else {
            self.errors += 1;
        }
    }

    /// Zero every counter.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Gates that were applied without error.
    pub fn successful_gates(&self) -> usize {
        self.total_gates - self.errors
    }
}
