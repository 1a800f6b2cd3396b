//! Search sorting number derivation for paintings.

use async_trait::async_trait;

use crate::errors::PipelineError;
use crate::pipeline::Transform;
use crate::records::Record;

/// Sorting number assigned to records without usable sorting information;
/// sorts them behind every dated record.
const FALLBACK_SORTING_NUMBER: &str = "3000";

/// Stage deriving the search sorting number from the raw sorting number.
#[derive(Debug)]
pub struct SortingInfoExtender {
    name: String,
}

impl SortingInfoExtender {
    /// Creates the extender.
    #[must_use]
    pub fn new() -> Self {
        Self {
            name: "sorting-info-extender".into(),
        }
    }

    fn derive(sorting_number: &str) -> String {
        let has_parts = sorting_number
            .split('-')
            .map(str::trim)
            .any(|part| !part.is_empty());
        if has_parts {
            sorting_number.to_owned()
        } else {
            FALLBACK_SORTING_NUMBER.to_owned()
        }
    }
}

#[async_trait]
impl Transform for SortingInfoExtender {
    fn name(&self) -> &str {
        &self.name
    }

    async fn apply(&self, item: Record) -> Result<Record, PipelineError> {
        let mut painting = item.into_painting(&self.name)?;
        painting.search_sorting_number = Self::derive(&painting.sorting_number);
        Ok(Record::Painting(painting))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{lang, Painting};

    #[tokio::test]
    async fn keeps_populated_sorting_numbers() {
        let extender = SortingInfoExtender::new();
        let mut painting = Painting::new(lang::DE, "P_001");
        painting.sorting_number = "1510-05".into();

        let out = extender
            .apply(Record::Painting(painting))
            .await
            .unwrap()
            .into_painting("test")
            .unwrap();
        assert_eq!(out.search_sorting_number, "1510-05");
    }

    #[tokio::test]
    async fn empty_sorting_numbers_fall_back() {
        let extender = SortingInfoExtender::new();
        for raw in ["", "-", " - - "] {
            let mut painting = Painting::new(lang::DE, "P_001");
            painting.sorting_number = raw.into();
            let out = extender
                .apply(Record::Painting(painting))
                .await
                .unwrap()
                .into_painting("test")
                .unwrap();
            assert_eq!(out.search_sorting_number, FALLBACK_SORTING_NUMBER, "raw: {raw:?}");
        }
    }
}
