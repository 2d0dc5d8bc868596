//! Execution events and the sinks that receive them.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use qexec_ir::QubitId;
use tracing::{debug, trace};

/// A notification emitted by the executor.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionEvent {
    /// A gate application was attempted.
    ///
    /// Emitted for every attempt, including failed ones.
    OperationPerformed {
        /// Gate name.
        gate: String,
        /// Target qubits.
        qubits: Vec<QubitId>,
        /// Whether the state manager accepted the operation.
        succeeded: bool,
        /// Time spent in the attempt.
        elapsed: Duration,
    },
    /// The simulated state was modified. Emitted only after a successful gate.
    StateChanged {
        /// Qubits held by the state.
        num_qubits: usize,
    },
}

/// Receiver of executor notifications.
///
/// Delivery is fire-and-forget: sinks cannot fail or stop a run.
pub trait EventSink: Send + Sync {
    /// Handle one event.
    fn emit(&self, event: &ExecutionEvent);
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: &ExecutionEvent) {}
}

/// Forwards events to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: &ExecutionEvent) {
        match event {
            ExecutionEvent::OperationPerformed {
                gate,
                qubits,
                succeeded,
                elapsed,
            } => debug!(gate = %gate, ?qubits, succeeded, ?elapsed, "Operation performed"),
            ExecutionEvent::StateChanged { num_qubits } => {
                trace!(num_qubits, "State changed");
            }
        }
    }
}

/// Keeps every event in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<ExecutionEvent>>,
}

impl RecordingSink {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the events received so far.
    pub fn events(&self) -> Vec<ExecutionEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Remove and return the events received so far.
    pub fn take(&self) -> Vec<ExecutionEvent> {
        std::mem::take(&mut *self.events.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Number of events received.
    pub fn len(&self) -> usize {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Check if no events were received.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of failed operations seen.
    pub fn failures(&self) -> usize {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|e| matches!(e, ExecutionEvent::OperationPerformed { succeeded: false, .. }))
            .count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: &ExecutionEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_sink() {
        let sink = RecordingSink::new();
        assert!(sink.is_empty());

        sink.emit(&ExecutionEvent::OperationPerformed {
            gate: "h".into(),
            qubits: vec![QubitId(0)],
            succeeded: false,
            elapsed: Duration::ZERO,
        });
        sink.emit(&ExecutionEvent::StateChanged { num_qubits: 1 });

        assert_eq!(sink.len(), 2);
        assert_eq!(sink.failures(), 1);
        assert_eq!(sink.take().len(), 2);
        assert!(sink.is_empty());
    }
}
