//! Entities shared by several record variants.

use serde::{Deserialize, Serialize};

/// Search metadata attached to a record, one instance per language rendition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Metadata {
    /// Identifier of the owning record.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Display subtitle.
    pub subtitle: String,
    /// Display date.
    pub date: String,
    /// Classification label.
    pub classification: String,
    /// Representative image source, if any.
    pub img_src: String,
    /// Language of this rendition.
    pub lang_code: String,
}

impl Metadata {
    /// Creates empty metadata for the given language.
    #[must_use]
    pub fn for_lang(lang_code: impl Into<String>) -> Self {
        Self {
            lang_code: lang_code.into(),
            ..Self::default()
        }
    }
}

/// A person involved with a record (artist, workshop, previous attribution).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Person {
    /// Display name.
    pub name: String,
    /// Qualifier preceding the name.
    pub prefix: String,
    /// Qualifier following the name.
    pub suffix: String,
    /// Categorical attribution identifier, assigned by rule matching.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl Person {
    /// Creates a person with the given display name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// A keyword reference carried by a record.
///
/// Controlled-vocabulary keywords carry the vocabulary identifier in `term`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Keyword {
    /// Keyword category, e.g. `Schlagwort` for vocabulary terms.
    #[serde(rename = "type")]
    pub kind: String,
    /// The keyword value or vocabulary identifier.
    pub term: String,
}

impl Keyword {
    /// Creates a keyword of the given category.
    #[must_use]
    pub fn new(kind: impl Into<String>, term: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            term: term.into(),
        }
    }
}

/// A dating with an optional numeric range.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Dating {
    /// Human-readable dating text.
    pub dated: String,
    /// Begin year, if known.
    pub begin: Option<i32>,
    /// End year, if known.
    pub end: Option<i32>,
    /// Free-text remarks.
    pub remarks: String,
}

/// A classification including the free-text condition description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Classification {
    /// Classification label.
    pub classification: String,
    /// Free-text condition/state description.
    pub condition: String,
}

/// A single survey from a restoration documentation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RestorationSurvey {
    /// Survey category.
    #[serde(rename = "type")]
    pub kind: String,
    /// Survey text.
    pub text: String,
}
