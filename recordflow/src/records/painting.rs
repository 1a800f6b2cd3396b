//! The painting record variant.

use serde::{Deserialize, Serialize};

use super::common::{Dating, Keyword, Metadata, Person, RestorationSurvey};
use super::thesaurus::ThesaurusLink;

/// One language rendition of a painting record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Painting {
    /// Language of this rendition.
    pub lang_code: String,
    /// Catalog inventory number.
    pub inventory_number: String,
    /// Title entries, most significant first.
    pub titles: Vec<String>,
    /// Dating information.
    pub dating: Option<Dating>,
    /// Involved persons.
    pub persons: Vec<Person>,
    /// Keyword references.
    pub keywords: Vec<Keyword>,
    /// Declared repository.
    pub repository: String,
    /// Declared owner.
    pub owner: String,
    /// Raw sorting number from the source record.
    pub sorting_number: String,
    /// Derived sorting number used by search.
    pub search_sorting_number: String,
    /// Collection/repository category, assigned by rule matching.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection_repository_id: Option<String>,
    /// Restoration surveys joined from the restoration documentation.
    pub restoration_surveys: Vec<RestorationSurvey>,
    /// Resolved vocabulary chains.
    pub thesaurus_items: Vec<ThesaurusLink>,
    /// Search metadata.
    pub metadata: Option<Metadata>,
}

impl Painting {
    /// Creates an empty painting rendition.
    #[must_use]
    pub fn new(lang_code: impl Into<String>, inventory_number: impl Into<String>) -> Self {
        Self {
            lang_code: lang_code.into(),
            inventory_number: inventory_number.into(),
            ..Self::default()
        }
    }

    /// Appends resolved vocabulary chain elements.
    pub fn add_thesaurus_items(&mut self, items: impl IntoIterator<Item = ThesaurusLink>) {
        self.thesaurus_items.extend(items);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_painting_is_empty_apart_from_identity() {
        let painting = Painting::new("de", "P_001");
        assert_eq!(painting.lang_code, "de");
        assert_eq!(painting.inventory_number, "P_001");
        assert!(painting.persons.is_empty());
        assert!(painting.collection_repository_id.is_none());
    }
}
