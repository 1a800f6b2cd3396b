//! Stage adapter: a transform behavior wired into the graph.

use async_trait::async_trait;
use std::sync::Arc;

use super::fanout::Downstreams;
use super::node::{DoneState, Node};
use crate::errors::PipelineError;
use crate::records::Record;

/// An enrichment behavior applied to every record passing a stage.
///
/// The behavior takes ownership of the record, mutates its private copy and
/// hands it back for delivery downstream. Soft failures stay inside `apply`:
/// the degraded record is returned and a diagnostic logged. Only structural
/// violations surface as errors.
#[async_trait]
pub trait Transform: Send + Sync {
    /// The stage name used in diagnostics.
    fn name(&self) -> &str;

    /// Applies the behavior to one record.
    async fn apply(&self, item: Record) -> Result<Record, PipelineError>;

    /// Hook invoked once when the completion signal arrives, before it is
    /// forwarded downstream.
    async fn on_done(&self) -> Result<(), PipelineError> {
        Ok(())
    }
}

/// A graph node wrapping a [`Transform`] with fan-out and completion
/// bookkeeping.
pub struct StageNode<T: Transform> {
    transform: T,
    downstreams: Downstreams,
    done: DoneState,
}

impl<T: Transform> StageNode<T> {
    /// Wraps a transform into a wirable node.
    pub fn new(transform: T) -> Arc<Self> {
        Arc::new(Self {
            transform,
            downstreams: Downstreams::new(),
            done: DoneState::new(),
        })
    }

    /// Registers `node` downstream and returns it for fluent chaining.
    pub fn pipe<N: Node + 'static>(&self, node: Arc<N>) -> Arc<N> {
        self.downstreams.register(node.clone());
        node
    }

    /// The wrapped transform.
    pub fn transform(&self) -> &T {
        &self.transform
    }
}

#[async_trait]
impl<T: Transform> Node for StageNode<T> {
    fn name(&self) -> &str {
        self.transform.name()
    }

    async fn receive(&self, item: Record) -> Result<(), PipelineError> {
        self.done.ensure_open(self.name())?;
        let item = self.transform.apply(item).await?;
        self.downstreams.push(item).await
    }

    async fn receive_done(&self) -> Result<(), PipelineError> {
        self.done.mark(self.name())?;
        self.transform.on_done().await?;
        self.downstreams.notify_done().await
    }
}

impl<T: Transform> std::fmt::Debug for StageNode<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StageNode")
            .field("name", &self.name())
            .field("downstreams", &self.downstreams)
            .finish()
    }
}
