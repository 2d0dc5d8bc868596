//! Circuit optimization strategies.

use qexec_ir::Circuit;
use tracing::debug;

use crate::config::OptimizationLevel;
use crate::error::{ExecError, ExecResult, Feature};

/// Produces a new circuit from an existing one for one optimization level.
pub trait OptimizationStrategy: Send + Sync {
    /// Get the name of this strategy.
    fn name(&self) -> &'static str;

    /// The level this strategy implements.
    fn level(&self) -> OptimizationLevel;

    /// Build the optimized circuit. The input is never modified.
    fn optimize(&self, circuit: &Circuit) -> ExecResult<Circuit>;
}

/// Gate-for-gate copy into a fresh circuit.
#[derive(Debug, Default, Clone, Copy)]
pub struct VerbatimCopy;

impl OptimizationStrategy for VerbatimCopy {
    fn name(&self) -> &'static str {
        "verbatim"
    }

    fn level(&self) -> OptimizationLevel {
        OptimizationLevel::None
    }

    fn optimize(&self, circuit: &Circuit) -> ExecResult<Circuit> {
        let mut copy = Circuit::new(circuit.name(), circuit.num_qubits())?;
        for gate in circuit {
            copy.add_gate(gate.clone())?;
        }
        debug!(
            "Copied {} gates, depth {}",
            copy.num_gates(),
            copy.depth()
        );
        Ok(copy)
    }
}

/// Placeholder for a declared level with no algorithm behind it.
#[derive(Debug, Clone, Copy)]
pub struct UnimplementedOptimization {
    level: OptimizationLevel,
}

impl UnimplementedOptimization {
    /// Create a placeholder for `level`.
    pub fn new(level: OptimizationLevel) -> Self {
        Self { level }
    }
}

impl OptimizationStrategy for UnimplementedOptimization {
    fn name(&self) -> &'static str {
        self.level.name()
    }

    fn level(&self) -> OptimizationLevel {
        self.level
    }

    fn optimize(&self, _circuit: &Circuit) -> ExecResult<Circuit> {
        Err(ExecError::Unimplemented {
            feature: Feature::Optimization(self.level),
        })
    }
}

/// The strategy object for a level.
pub fn optimizer_for(level: OptimizationLevel) -> Box<dyn OptimizationStrategy> {
    match level {
        OptimizationLevel::None => Box::new(VerbatimCopy),
        OptimizationLevel::Light | OptimizationLevel::Medium | OptimizationLevel::Aggressive => {
            Box::new(UnimplementedOptimization::new(level))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qexec_ir::QubitId;

    #[test]
    fn test_verbatim_copy_is_equal_and_distinct() {
        let mut circuit = Circuit::new("opt", 3).unwrap();
        circuit
            .h(QubitId(0))
            .unwrap()
            .rz(0.3, QubitId(1))
            .unwrap()
            .ccx(QubitId(0), QubitId(1), QubitId(2))
            .unwrap();

        let copy = VerbatimCopy.optimize(&circuit).unwrap();
        assert_eq!(copy, circuit);
        assert_eq!(copy.depth(), circuit.depth());
        assert!(!std::ptr::eq(&copy, &circuit));
        assert!(!std::ptr::eq(copy.gates().as_ptr(), circuit.gates().as_ptr()));
    }

    #[test]
    fn test_higher_levels_unimplemented() {
        let circuit = Circuit::bell().unwrap();
        for level in OptimizationLevel::ALL {
            let optimizer = optimizer_for(level);
            assert_eq!(optimizer.level(), level);
            let result = optimizer.optimize(&circuit);
            if level == OptimizationLevel::None {
                assert_eq!(result.unwrap(), circuit);
            } else {
                assert!(matches!(
                    result,
                    Err(ExecError::Unimplemented { feature: Feature::Optimization(l) }) if l == level
                ));
            }
        }
    }
}
