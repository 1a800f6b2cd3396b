//! Downstream registration and in-order fan-out delivery.

use parking_lot::RwLock;
use std::sync::Arc;

use super::node::Node;
use crate::errors::PipelineError;
use crate::records::Record;

/// The ordered downstream registry owned by sources and stages.
///
/// Registration happens while the graph is being wired; the list is fixed
/// once the run starts. A record is delivered to every registered node in
/// registration order before the next record is pushed, so sibling nodes
/// observe identical sequences.
#[derive(Default)]
pub struct Downstreams {
    targets: RwLock<Vec<Arc<dyn Node>>>,
}

impl Downstreams {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a downstream node at the end of the delivery order.
    pub fn register(&self, node: Arc<dyn Node>) {
        self.targets.write().push(node);
    }

    /// Number of registered downstream nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.targets.read().len()
    }

    /// Whether no downstream node is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.read().is_empty()
    }

    /// Delivers one record to every registered node, in registration order.
    ///
    /// The record is cloned for all but the last node, which takes ownership
    /// of the original.
    pub async fn push(&self, item: Record) -> Result<(), PipelineError> {
        let targets = self.targets.read().clone();
        let Some((last, rest)) = targets.split_last() else {
            return Ok(());
        };
        for target in rest {
            target.receive(item.clone()).await?;
        }
        last.receive(item).await
    }

    /// Forwards the completion signal to every registered node, in
    /// registration order.
    pub async fn notify_done(&self) -> Result<(), PipelineError> {
        let targets = self.targets.read().clone();
        for target in &targets {
            target.receive_done().await?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for Downstreams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Downstreams")
            .field("targets", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{Painting, Record};
    use crate::testing::CollectingSink;

    fn painting_record(inventory_number: &str) -> Record {
        Record::Painting(Painting::new("de", inventory_number))
    }

    #[tokio::test]
    async fn push_without_downstreams_drops_the_record() {
        let downstreams = Downstreams::new();
        assert!(downstreams.push(painting_record("P_001")).await.is_ok());
    }

    #[tokio::test]
    async fn push_delivers_in_registration_order() {
        let downstreams = Downstreams::new();
        let first = CollectingSink::node("first");
        let second = CollectingSink::node("second");
        downstreams.register(first.clone());
        downstreams.register(second.clone());

        downstreams.push(painting_record("P_001")).await.unwrap();
        downstreams.push(painting_record("P_002")).await.unwrap();

        for sink in [&first, &second] {
            let numbers: Vec<String> = sink
                .sink()
                .records()
                .into_iter()
                .map(|record| record.into_painting("test").unwrap().inventory_number)
                .collect();
            assert_eq!(numbers, ["P_001", "P_002"]);
        }
    }

    #[tokio::test]
    async fn notify_done_reaches_every_downstream_once() {
        let downstreams = Downstreams::new();
        let first = CollectingSink::node("first");
        let second = CollectingSink::node("second");
        downstreams.register(first.clone());
        downstreams.register(second.clone());

        downstreams.notify_done().await.unwrap();

        assert_eq!(first.sink().done_count(), 1);
        assert_eq!(second.sink().done_count(), 1);
    }
}
