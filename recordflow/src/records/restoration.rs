//! The restoration record variant.

use serde::{Deserialize, Serialize};

use super::common::RestorationSurvey;

/// A restoration documentation for one object and language.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Restoration {
    /// Language of this rendition.
    pub lang_code: String,
    /// Inventory number of the documented object.
    pub inventory_number: String,
    /// The documented surveys.
    pub surveys: Vec<RestorationSurvey>,
}

impl Restoration {
    /// Creates an empty restoration documentation.
    #[must_use]
    pub fn new(lang_code: impl Into<String>, inventory_number: impl Into<String>) -> Self {
        Self {
            lang_code: lang_code.into(),
            inventory_number: inventory_number.into(),
            surveys: Vec::new(),
        }
    }
}
