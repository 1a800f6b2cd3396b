//! The literature reference record variant.

use serde::{Deserialize, Serialize};

/// A bibliographic reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LiteratureReference {
    /// Language of this rendition.
    pub lang_code: String,
    /// Reference number identifying the publication.
    pub reference_number: String,
    /// Publication title.
    pub title: String,
    /// Author line as printed.
    pub authors: String,
    /// Place of publication.
    pub publish_location: String,
    /// Year of publication as printed.
    pub publish_date: String,
}

impl LiteratureReference {
    /// Creates an empty reference.
    #[must_use]
    pub fn new(lang_code: impl Into<String>, reference_number: impl Into<String>) -> Self {
        Self {
            lang_code: lang_code.into(),
            reference_number: reference_number.into(),
            ..Self::default()
        }
    }
}
