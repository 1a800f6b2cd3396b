//! The node abstraction shared by every graph participant.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::errors::PipelineError;
use crate::records::Record;

/// A unit of the dataflow graph.
///
/// Nodes receive records pushed by their upstream and, after the last
/// record, a single completion signal. Delivery is fully sequential: a
/// `receive` call returns only after the record has descended through every
/// node reachable from this one.
#[async_trait]
pub trait Node: Send + Sync {
    /// The node name used in diagnostics.
    fn name(&self) -> &str;

    /// Delivers one record from upstream.
    async fn receive(&self, item: Record) -> Result<(), PipelineError>;

    /// Delivers the completion signal from upstream.
    ///
    /// Called exactly once per run; receiving it twice is a usage error.
    async fn receive_done(&self) -> Result<(), PipelineError>;
}

/// Completion state of a node.
///
/// Receiving a record after completion, or a second completion signal, is a
/// fatal usage error rather than something to silently tolerate.
#[derive(Debug, Default)]
pub struct DoneState(AtomicBool);

impl DoneState {
    /// Creates an open (not yet completed) state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the completion signal has been received.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Fails when the node has already completed.
    pub fn ensure_open(&self, node: &str) -> Result<(), PipelineError> {
        if self.is_done() {
            return Err(PipelineError::structural(
                node,
                "record pushed after completion signal",
            ));
        }
        Ok(())
    }

    /// Marks the node completed, failing on a duplicate signal.
    pub fn mark(&self, node: &str) -> Result<(), PipelineError> {
        if self.0.swap(true, Ordering::SeqCst) {
            return Err(PipelineError::structural(
                node,
                "completion signal received more than once",
            ));
        }
        Ok(())
    }
}
