//! Quantum gate types.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::{IrError, IrResult};
use crate::qubit::QubitId;
use crate::state::{StateManager, StateResult};

/// The closed set of gate kinds the executor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GateKind {
    // Single-qubit gates
    /// Identity gate.
    I,
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,
    /// Hadamard gate.
    H,
    /// S gate (sqrt(Z)).
    S,
    /// T gate (fourth root of Z).
    T,
    /// Rotation around X axis.
    Rx,
    /// Rotation around Y axis.
    Ry,
    /// Rotation around Z axis.
    Rz,

    // Two-qubit gates
    /// Controlled-X (CNOT) gate.
    CX,
    /// Controlled-Z gate.
    CZ,
    /// SWAP gate.
    Swap,
    /// Controlled rotation around X.
    CRx,
    /// Controlled rotation around Y.
    CRy,
    /// Controlled rotation around Z.
    CRz,

    // Three-qubit gates
    /// Toffoli gate (CCX).
    CCX,
    /// Fredkin gate (CSWAP).
    CSwap,

    /// Measurement of one or more qubits.
    Measure,
    /// User-defined gate backed by a callback.
    Custom,
}

/// Arity bucket of a gate, as counted in execution statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArityClass {
    /// Acts on one qubit.
    Single,
    /// Acts on two qubits.
    Two,
    /// Acts on three or more qubits.
    Multi,
    /// Measurement.
    Measurement,
}

impl ArityClass {
    /// Bucket for an operation touching `num_qubits` qubits.
    pub fn from_qubit_count(num_qubits: usize) -> Self {
        match num_qubits {
            0 | 1 => ArityClass::Single,
            2 => ArityClass::Two,
            _ => ArityClass::Multi,
        }
    }
}

impl GateKind {
    /// Every gate kind, in declaration order.
    pub const ALL: [GateKind; 20] = [
        GateKind::I,
        GateKind::X,
        GateKind::Y,
        GateKind::Z,
        GateKind::H,
        GateKind::S,
        GateKind::T,
        GateKind::Rx,
        GateKind::Ry,
        GateKind::Rz,
        GateKind::CX,
        GateKind::CZ,
        GateKind::Swap,
        GateKind::CRx,
        GateKind::CRy,
        GateKind::CRz,
        GateKind::CCX,
        GateKind::CSwap,
        GateKind::Measure,
        GateKind::Custom,
    ];

    /// Get the name of this gate kind.
    #[inline]
    pub fn name(self) -> &'static str {
        match self {
            GateKind::I => "id",
            GateKind::X => "x",
            GateKind::Y => "y",
            GateKind::Z => "z",
            GateKind::H => "h",
            GateKind::S => "s",
            GateKind::T => "t",
            GateKind::Rx => "rx",
            GateKind::Ry => "ry",
            GateKind::Rz => "rz",
            GateKind::CX => "cx",
            GateKind::CZ => "cz",
            GateKind::Swap => "swap",
            GateKind::CRx => "crx",
            GateKind::CRy => "cry",
            GateKind::CRz => "crz",
            GateKind::CCX => "ccx",
            GateKind::CSwap => "cswap",
            GateKind::Measure => "measure",
            GateKind::Custom => "custom",
        }
    }

    /// Required number of target qubits.
    ///
    /// `None` for measurement and custom gates, which accept any non-empty
    /// qubit list.
    #[inline]
    pub fn arity(self) -> Option<u32> {
        match self {
            GateKind::I
            | GateKind::X
            | GateKind::Y
            | GateKind::Z
            | GateKind::H
            | GateKind::S
            | GateKind::T
            | GateKind::Rx
            | GateKind::Ry
            | GateKind::Rz => Some(1),

            GateKind::CX
            | GateKind::CZ
            | GateKind::Swap
            | GateKind::CRx
            | GateKind::CRy
            | GateKind::CRz => Some(2),

            GateKind::CCX | GateKind::CSwap => Some(3),

            GateKind::Measure | GateKind::Custom => None,
        }
    }

    /// Minimum number of angle parameters.
    #[inline]
    pub fn required_params(self) -> usize {
        usize::from(self.is_rotation())
    }

    /// Check if this is a (possibly controlled) rotation.
    #[inline]
    pub fn is_rotation(self) -> bool {
        matches!(
            self,
            GateKind::Rx | GateKind::Ry | GateKind::Rz | GateKind::CRx | GateKind::CRy | GateKind::CRz
        )
    }
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GateKind {
    type Err = IrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s.to_ascii_lowercase().as_str() {
            "id" | "i" => GateKind::I,
            "x" => GateKind::X,
            "y" => GateKind::Y,
            "z" => GateKind::Z,
            "h" => GateKind::H,
            "s" => GateKind::S,
            "t" => GateKind::T,
            "rx" => GateKind::Rx,
            "ry" => GateKind::Ry,
            "rz" => GateKind::Rz,
            "cx" | "cnot" => GateKind::CX,
            "cz" => GateKind::CZ,
            "swap" => GateKind::Swap,
            "crx" => GateKind::CRx,
            "cry" => GateKind::CRy,
            "crz" => GateKind::CRz,
            "ccx" | "toffoli" => GateKind::CCX,
            "cswap" | "fredkin" => GateKind::CSwap,
            "measure" => GateKind::Measure,
            "custom" => GateKind::Custom,
            _ => return Err(IrError::UnknownGate(s.to_string())),
        };
        Ok(kind)
    }
}

/// Callback type behind a custom gate.
///
/// The closure's captured environment is the gate's associated data.
pub type CustomGateFn = dyn Fn(&mut dyn StateManager, &[QubitId]) -> StateResult<()> + Send + Sync;

/// A user-defined gate: a name plus a shared callback.
#[derive(Clone)]
pub struct CustomGate {
    name: String,
    op: Arc<CustomGateFn>,
}

impl CustomGate {
    /// Create a new custom gate from a closure.
    pub fn new<F>(name: impl Into<String>, op: F) -> Self
    where
        F: Fn(&mut dyn StateManager, &[QubitId]) -> StateResult<()> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            op: Arc::new(op),
        }
    }

    /// Create a custom gate sharing an existing callback.
    pub fn from_shared(name: impl Into<String>, op: Arc<CustomGateFn>) -> Self {
        Self {
            name: name.into(),
            op,
        }
    }

    /// Get the name of the gate.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the callback against a state.
    pub fn apply(&self, state: &mut dyn StateManager, qubits: &[QubitId]) -> StateResult<()> {
        (self.op)(state, qubits)
    }
}

impl fmt::Debug for CustomGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomGate")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl PartialEq for CustomGate {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && Arc::ptr_eq(&self.op, &other.op)
    }
}

/// A gate applied to specific qubits.
///
/// Built through [`Gate::new`] or [`Gate::custom`], both of which validate.
/// Fields are public so that callers can inspect a gate; a gate assembled by
/// hand can be checked with [`Gate::validate`].
#[derive(Debug, Clone, PartialEq)]
pub struct Gate {
    /// The kind of gate.
    pub kind: GateKind,
    /// Target qubits, controls first.
    pub qubits: Vec<QubitId>,
    /// Rotation angles in radians. Empty for non-rotation gates.
    pub params: Vec<f64>,
    /// Callback for [`GateKind::Custom`].
    pub custom: Option<CustomGate>,
}

impl Gate {
    /// Create a standard gate.
    ///
    /// Fails when the qubit list is empty, does not match the kind's arity,
    /// repeats a qubit, or when a rotation lacks its angle.
    pub fn new(
        kind: GateKind,
        qubits: impl IntoIterator<Item = QubitId>,
        params: impl IntoIterator<Item = f64>,
    ) -> IrResult<Self> {
        let gate = Self {
            kind,
            qubits: qubits.into_iter().collect(),
            params: params.into_iter().collect(),
            custom: None,
        };
        gate.validate()?;
        Ok(gate)
    }

    /// Create a custom gate over the given qubits.
    pub fn custom(qubits: impl IntoIterator<Item = QubitId>, custom: CustomGate) -> IrResult<Self> {
        let gate = Self {
            kind: GateKind::Custom,
            qubits: qubits.into_iter().collect(),
            params: vec![],
            custom: Some(custom),
        };
        gate.validate()?;
        Ok(gate)
    }

    /// Create a measurement over the given qubits.
    pub fn measure(qubits: impl IntoIterator<Item = QubitId>) -> IrResult<Self> {
        Self::new(GateKind::Measure, qubits, [])
    }

    /// Check shape and completeness of this gate.
    pub fn validate(&self) -> IrResult<()> {
        let gate_name = self.name();

        if self.qubits.is_empty() {
            return Err(IrError::EmptyQubits {
                gate_name: gate_name.to_string(),
            });
        }

        if let Some(expected) = self.kind.arity() {
            let got = self.qubits.len() as u32;
            if got != expected {
                return Err(IrError::QubitCountMismatch {
                    gate_name: gate_name.to_string(),
                    expected,
                    got,
                });
            }
        }

        for (i, q) in self.qubits.iter().enumerate() {
            if self.qubits[..i].contains(q) {
                return Err(IrError::DuplicateQubit {
                    qubit: *q,
                    gate_name: Some(gate_name.to_string()),
                });
            }
        }

        match (self.kind, &self.custom) {
            (GateKind::Custom, None) => {
                return Err(IrError::InvalidCustomPayload {
                    gate_name: gate_name.to_string(),
                    reason: "custom gate requires a callback",
                });
            }
            (GateKind::Custom, Some(_)) => {}
            (_, Some(_)) => {
                return Err(IrError::InvalidCustomPayload {
                    gate_name: gate_name.to_string(),
                    reason: "only custom gates may carry a callback",
                });
            }
            (_, None) => {}
        }

        let required = self.kind.required_params();
        if self.params.len() < required {
            return Err(IrError::MissingParameter {
                gate_name: gate_name.to_string(),
                expected: required,
                got: self.params.len(),
            });
        }
        if required == 0 && !self.params.is_empty() {
            return Err(IrError::UnexpectedParameters {
                gate_name: gate_name.to_string(),
                got: self.params.len(),
            });
        }
        if let Some(&value) = self.params.iter().find(|p| !p.is_finite()) {
            return Err(IrError::NonFiniteParameter {
                gate_name: gate_name.to_string(),
                value,
            });
        }

        Ok(())
    }

    /// Get the name of this gate. Custom gates report their own name.
    pub fn name(&self) -> &str {
        match &self.custom {
            Some(custom) => custom.name(),
            None => self.kind.name(),
        }
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.qubits.len()
    }

    /// The rotation angle, if one is present.
    pub fn angle(&self) -> Option<f64> {
        self.params.first().copied()
    }

    /// Statistics bucket of this gate.
    pub fn arity_class(&self) -> ArityClass {
        match self.kind {
            GateKind::Measure => ArityClass::Measurement,
            _ => ArityClass::from_qubit_count(self.qubits.len()),
        }
    }

    /// Check if this is a measurement.
    pub fn is_measure(&self) -> bool {
        self.kind == GateKind::Measure
    }
}
