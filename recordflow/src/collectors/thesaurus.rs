//! Collector assembling pushed vocabulary root terms into a tree.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::info;

use crate::errors::PipelineError;
use crate::pipeline::Sink;
use crate::records::{Record, Thesaurus, ThesaurusTerm};

/// Retains vocabulary root terms for later random-access resolution.
#[derive(Debug, Default)]
pub struct ThesaurusCollector {
    roots: RwLock<Vec<ThesaurusTerm>>,
}

impl ThesaurusCollector {
    /// Creates an empty collector.
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// A snapshot of the assembled tree.
    #[must_use]
    pub fn thesaurus(&self) -> Thesaurus {
        Thesaurus::new(self.roots.read().clone())
    }

    /// Number of retained root terms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.roots.read().len()
    }

    /// Whether no root term has been collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roots.read().is_empty()
    }

    /// Releases the retained tree at shutdown.
    pub fn release(&self) {
        self.roots.write().clear();
    }
}

#[async_trait]
impl Sink for ThesaurusCollector {
    fn name(&self) -> &str {
        "thesaurus-collector"
    }

    async fn collect(&self, item: Record) -> Result<(), PipelineError> {
        let term = item.into_thesaurus_root(self.name())?;
        self.roots.write().push(term);
        Ok(())
    }

    async fn finalize(&self) -> Result<(), PipelineError> {
        info!(collector = self.name(), roots = self.len(), "collector completed");
        Ok(())
    }
}
