//! The graphic record variant.

use serde::{Deserialize, Serialize};

use super::common::{Classification, Dating, Metadata, Person};
use super::images::ImageStackSet;

/// One language rendition of a graphic record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Graphic {
    /// Language of this rendition.
    pub lang_code: String,
    /// Catalog inventory number.
    pub inventory_number: String,
    /// Identifier used to locate remote images; usually the inventory number
    /// of the related virtual object.
    pub image_id: String,
    /// Classification, including the condition description.
    pub classification: Option<Classification>,
    /// Condition level derived from the classification.
    pub condition_level: i32,
    /// Dating information.
    pub dating: Option<Dating>,
    /// Involved persons.
    pub persons: Vec<Person>,
    /// Remote image stacks, attached by the existence checker.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<ImageStackSet>,
    /// Search metadata.
    pub metadata: Option<Metadata>,
}

impl Graphic {
    /// Creates an empty graphic rendition.
    #[must_use]
    pub fn new(lang_code: impl Into<String>, inventory_number: impl Into<String>) -> Self {
        let inventory_number = inventory_number.into();
        Self {
            lang_code: lang_code.into(),
            image_id: inventory_number.clone(),
            inventory_number,
            ..Self::default()
        }
    }

    /// The trimmed condition description, empty when no classification is
    /// present.
    #[must_use]
    pub fn condition_text(&self) -> &str {
        self.classification
            .as_ref()
            .map_or("", |classification| classification.condition.trim())
    }
}
