//! Search metadata fill-in for paintings.

use async_trait::async_trait;

use crate::errors::PipelineError;
use crate::pipeline::Transform;
use crate::records::Record;

/// Stage populating a painting's search metadata from its own fields.
///
/// Records without a metadata slot pass through unchanged.
#[derive(Debug)]
pub struct MetadataExtender {
    name: String,
}

impl MetadataExtender {
    /// Creates the extender.
    #[must_use]
    pub fn new() -> Self {
        Self {
            name: "metadata-extender".into(),
        }
    }
}

#[async_trait]
impl Transform for MetadataExtender {
    fn name(&self) -> &str {
        &self.name
    }

    async fn apply(&self, item: Record) -> Result<Record, PipelineError> {
        let mut painting = item.into_painting(&self.name)?;

        let title = painting.titles.first().cloned().unwrap_or_default();
        let date = painting
            .dating
            .as_ref()
            .map(|dating| dating.dated.clone())
            .unwrap_or_default();
        let id = painting.inventory_number.clone();

        if let Some(metadata) = painting.metadata.as_mut() {
            metadata.id = id;
            metadata.title = title;
            metadata.subtitle = String::new();
            metadata.date = date;
            metadata.classification = String::new();
            metadata.img_src = String::new();
        }

        Ok(Record::Painting(painting))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{lang, Dating, Metadata, Painting};

    #[tokio::test]
    async fn fills_metadata_from_the_record() {
        let extender = MetadataExtender::new();
        let mut painting = Painting::new(lang::DE, "P_001");
        painting.titles = vec!["Adam und Eva".into(), "Zweittitel".into()];
        painting.dating = Some(Dating {
            dated: "um 1530".into(),
            ..Dating::default()
        });
        painting.metadata = Some(Metadata::for_lang(lang::DE));

        let out = extender
            .apply(Record::Painting(painting))
            .await
            .unwrap()
            .into_painting("test")
            .unwrap();

        let metadata = out.metadata.unwrap();
        assert_eq!(metadata.id, "P_001");
        assert_eq!(metadata.title, "Adam und Eva");
        assert_eq!(metadata.date, "um 1530");
        assert_eq!(metadata.lang_code, lang::DE);
    }

    #[tokio::test]
    async fn records_without_metadata_pass_through() {
        let extender = MetadataExtender::new();
        let painting = Painting::new(lang::DE, "P_001");
        let out = extender
            .apply(Record::Painting(painting))
            .await
            .unwrap()
            .into_painting("test")
            .unwrap();
        assert!(out.metadata.is_none());
    }
}
