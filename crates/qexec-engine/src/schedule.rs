//! Execution strategies: the order in which a circuit's gates are applied.

use qexec_ir::Circuit;

use crate::config::ExecutionMode;
use crate::error::{ExecError, ExecResult, Feature};

/// Decides the order of gate application for one execution mode.
pub trait ExecutionStrategy: Send + Sync {
    /// Get the name of this strategy.
    fn name(&self) -> &'static str;

    /// The mode this strategy implements.
    fn mode(&self) -> ExecutionMode;

    /// Gate indices in application order.
    ///
    /// Returns [`ExecError::Unimplemented`] when the mode has no real
    /// implementation.
    fn schedule(&self, circuit: &Circuit) -> ExecResult<Vec<usize>>;

    /// Whether the circuit is optimized before scheduling.
    fn optimizes_first(&self) -> bool {
        false
    }
}

/// Gates one at a time in insertion order.
#[derive(Debug, Default, Clone, Copy)]
pub struct SequentialStrategy;

impl ExecutionStrategy for SequentialStrategy {
    fn name(&self) -> &'static str {
        "sequential"
    }

    fn mode(&self) -> ExecutionMode {
        ExecutionMode::Sequential
    }

    fn schedule(&self, circuit: &Circuit) -> ExecResult<Vec<usize>> {
        Ok((0..circuit.num_gates()).collect())
    }
}

/// Optimize, then run in insertion order.
#[derive(Debug, Default, Clone, Copy)]
pub struct OptimizedStrategy;

impl ExecutionStrategy for OptimizedStrategy {
    fn name(&self) -> &'static str {
        "optimized"
    }

    fn mode(&self) -> ExecutionMode {
        ExecutionMode::Optimized
    }

    fn schedule(&self, circuit: &Circuit) -> ExecResult<Vec<usize>> {
        SequentialStrategy.schedule(circuit)
    }

    fn optimizes_first(&self) -> bool {
        true
    }
}

/// Placeholder for a declared mode with no algorithm behind it.
#[derive(Debug, Clone, Copy)]
pub struct UnimplementedStrategy {
    mode: ExecutionMode,
}

impl UnimplementedStrategy {
    /// Create a placeholder for `mode`.
    pub fn new(mode: ExecutionMode) -> Self {
        Self { mode }
    }
}

impl ExecutionStrategy for UnimplementedStrategy {
    fn name(&self) -> &'static str {
        self.mode.name()
    }

    fn mode(&self) -> ExecutionMode {
        self.mode
    }

    fn schedule(&self, _circuit: &Circuit) -> ExecResult<Vec<usize>> {
        Err(ExecError::Unimplemented {
            feature: Feature::Mode(self.mode),
        })
    }
}

/// The strategy object for a mode.
pub fn strategy_for(mode: ExecutionMode) -> Box<dyn ExecutionStrategy> {
    match mode {
        ExecutionMode::Sequential => Box::new(SequentialStrategy),
        ExecutionMode::Optimized => Box::new(OptimizedStrategy),
        ExecutionMode::Pipelined | ExecutionMode::Parallel => {
            Box::new(UnimplementedStrategy::new(mode))
        }
    }
}
