//! Restoration survey join for paintings.

use async_trait::async_trait;
use std::sync::Arc;

use crate::collectors::RestorationsCollector;
use crate::errors::PipelineError;
use crate::pipeline::Transform;
use crate::records::Record;

/// Stage joining restoration surveys onto paintings by inventory number and
/// language.
///
/// Paintings without a matching restoration documentation pass through
/// unchanged.
#[derive(Debug)]
pub struct RestorationExtender {
    name: String,
    collector: Arc<RestorationsCollector>,
}

impl RestorationExtender {
    /// Creates the extender over a filled collector.
    #[must_use]
    pub fn new(collector: Arc<RestorationsCollector>) -> Self {
        Self {
            name: "restoration-extender".into(),
            collector,
        }
    }
}

#[async_trait]
impl Transform for RestorationExtender {
    fn name(&self) -> &str {
        &self.name
    }

    async fn apply(&self, item: Record) -> Result<Record, PipelineError> {
        let mut painting = item.into_painting(&self.name)?;

        if let Some(restoration) = self
            .collector
            .find(&painting.inventory_number, &painting.lang_code)
        {
            painting.restoration_surveys = restoration.surveys;
        }

        Ok(Record::Painting(painting))
    }
}
