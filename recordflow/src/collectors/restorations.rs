//! Collector retaining restoration documentations for the painting join.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use crate::errors::PipelineError;
use crate::pipeline::Sink;
use crate::records::{Record, Restoration};

/// Retains restorations keyed by (inventory number, language).
#[derive(Debug, Default)]
pub struct RestorationsCollector {
    entries: RwLock<HashMap<(String, String), Restoration>>,
}

impl RestorationsCollector {
    /// Creates an empty collector.
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Looks up the restoration for an object and language.
    #[must_use]
    pub fn find(&self, inventory_number: &str, lang_code: &str) -> Option<Restoration> {
        self.entries
            .read()
            .get(&(inventory_number.to_string(), lang_code.to_string()))
            .cloned()
    }

    /// Number of retained restorations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the collector is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Releases the retained data at shutdown.
    pub fn release(&self) {
        self.entries.write().clear();
    }
}

#[async_trait]
impl Sink for RestorationsCollector {
    fn name(&self) -> &str {
        "restorations-collector"
    }

    async fn collect(&self, item: Record) -> Result<(), PipelineError> {
        let restoration = item.into_restoration(self.name())?;
        let key = (
            restoration.inventory_number.clone(),
            restoration.lang_code.clone(),
        );
        // Key collisions keep the latest documentation.
        self.entries.write().insert(key, restoration);
        Ok(())
    }

    async fn finalize(&self) -> Result<(), PipelineError> {
        info!(collector = self.name(), retained = self.len(), "collector completed");
        Ok(())
    }
}
