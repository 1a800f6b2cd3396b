//! Sink adapter: a terminal consumer wired into the graph.

use async_trait::async_trait;
use std::sync::Arc;

use super::node::{DoneState, Node};
use crate::errors::PipelineError;
use crate::records::Record;

/// A terminal consumer of records.
///
/// Finalization (writing output, persisting caches) happens inside
/// `finalize`, which the wrapping node invokes exactly once per run.
#[async_trait]
pub trait Sink: Send + Sync {
    /// The sink name used in diagnostics.
    fn name(&self) -> &str;

    /// Consumes one record.
    async fn collect(&self, item: Record) -> Result<(), PipelineError>;

    /// Hook invoked once when the completion signal arrives.
    async fn finalize(&self) -> Result<(), PipelineError> {
        Ok(())
    }
}

#[async_trait]
impl<S: Sink> Sink for Arc<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn collect(&self, item: Record) -> Result<(), PipelineError> {
        (**self).collect(item).await
    }

    async fn finalize(&self) -> Result<(), PipelineError> {
        (**self).finalize().await
    }
}

/// A graph node wrapping a [`Sink`] with completion bookkeeping.
pub struct SinkNode<S: Sink> {
    sink: S,
    done: DoneState,
}

impl<S: Sink> SinkNode<S> {
    /// Wraps a sink into a wirable node.
    pub fn new(sink: S) -> Arc<Self> {
        Arc::new(Self {
            sink,
            done: DoneState::new(),
        })
    }

    /// The wrapped sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }
}

#[async_trait]
impl<S: Sink> Node for SinkNode<S> {
    fn name(&self) -> &str {
        self.sink.name()
    }

    async fn receive(&self, item: Record) -> Result<(), PipelineError> {
        self.done.ensure_open(self.name())?;
        self.sink.collect(item).await
    }

    async fn receive_done(&self) -> Result<(), PipelineError> {
        self.done.mark(self.name())?;
        self.sink.finalize().await
    }
}

impl<S: Sink> std::fmt::Debug for SinkNode<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SinkNode").field("name", &self.name()).finish()
    }
}
