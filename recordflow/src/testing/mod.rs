//! Test fixtures and helpers for building pipeline graphs in tests.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::errors::PipelineError;
use crate::pipeline::{Sink, SinkNode};
use crate::records::{
    lang, Classification, Graphic, Keyword, Metadata, Painting, Person, Record,
};

/// A sink retaining every received record and counting completion signals.
#[derive(Debug)]
pub struct CollectingSink {
    name: String,
    records: RwLock<Vec<Record>>,
    done_count: AtomicUsize,
}

impl CollectingSink {
    /// Creates a collecting sink.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            records: RwLock::new(Vec::new()),
            done_count: AtomicUsize::new(0),
        })
    }

    /// Creates a collecting sink already wrapped into a wirable node.
    #[must_use]
    pub fn node(name: impl Into<String>) -> Arc<SinkNode<Arc<Self>>> {
        SinkNode::new(Self::new(name))
    }

    /// The records received so far, in arrival order.
    #[must_use]
    pub fn records(&self) -> Vec<Record> {
        self.records.read().clone()
    }

    /// Number of records received so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Whether no record has been received.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// Number of completion signals observed.
    #[must_use]
    pub fn done_count(&self) -> usize {
        self.done_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Sink for CollectingSink {
    fn name(&self) -> &str {
        &self.name
    }

    async fn collect(&self, item: Record) -> Result<(), PipelineError> {
        self.records.write().push(item);
        Ok(())
    }

    async fn finalize(&self) -> Result<(), PipelineError> {
        self.done_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// A painting fixture with metadata, one person and a vocabulary keyword.
#[must_use]
pub fn sample_painting(inventory_number: &str) -> Painting {
    let mut painting = Painting::new(lang::DE, inventory_number);
    painting.titles = vec![format!("Titel {inventory_number}")];
    painting.persons = vec![Person::named("Lucas Cranach der Ältere")];
    painting.keywords = vec![Keyword::new("Schlagwort", "9001")];
    painting.metadata = Some(Metadata::for_lang(lang::DE));
    painting
}

/// A graphic fixture with a classification carrying the given condition
/// text.
#[must_use]
pub fn sample_graphic(inventory_number: &str, condition: &str) -> Graphic {
    let mut graphic = Graphic::new(lang::DE, inventory_number);
    graphic.classification = Some(Classification {
        classification: "Druckgrafik".into(),
        condition: condition.into(),
    });
    graphic
}
