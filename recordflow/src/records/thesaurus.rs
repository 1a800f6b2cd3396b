//! Controlled-vocabulary terms and resolved term chains.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Alternate key carrying a term's vocabulary identifier.
pub const ALT_TERM_IDENTIFIER: &str = "dkultTermIdentifier";

/// Alternate key carrying a term's English label.
pub const ALT_BRITISH_EQUIVALENT: &str = "britishEquivalent";

/// A node in the controlled-vocabulary tree.
///
/// Each term owns its child terms; the tree is acyclic by construction and
/// every non-root term is reachable from exactly one parent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ThesaurusTerm {
    /// Primary label.
    pub term: String,
    /// Alternate values keyed by alternate kind, e.g. the vocabulary
    /// identifier or a language equivalent.
    pub alt: BTreeMap<String, String>,
    /// Child terms.
    pub sub_terms: Vec<ThesaurusTerm>,
}

impl ThesaurusTerm {
    /// Creates a leaf term with the given primary label.
    #[must_use]
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            ..Self::default()
        }
    }

    /// Adds an alternate value, builder style.
    #[must_use]
    pub fn with_alt(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.alt.insert(key.into(), value.into());
        self
    }

    /// Adds a child term, builder style.
    #[must_use]
    pub fn with_sub_term(mut self, sub_term: ThesaurusTerm) -> Self {
        self.sub_terms.push(sub_term);
        self
    }

    /// Returns the alternate value for `key`, if present.
    #[must_use]
    pub fn alt(&self, key: &str) -> Option<&str> {
        self.alt.get(key).map(String::as_str)
    }

    /// Returns the vocabulary identifier, if present.
    #[must_use]
    pub fn identifier(&self) -> Option<&str> {
        self.alt(ALT_TERM_IDENTIFIER)
    }
}

/// A complete controlled-vocabulary tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Thesaurus {
    /// The root terms.
    pub root_terms: Vec<ThesaurusTerm>,
}

impl Thesaurus {
    /// Creates a thesaurus from root terms.
    #[must_use]
    pub fn new(root_terms: Vec<ThesaurusTerm>) -> Self {
        Self { root_terms }
    }

    /// Returns a copy of the tree reduced to branches containing at least one
    /// of the given vocabulary identifiers.
    ///
    /// A term is kept when its own identifier is in `keep` or when any
    /// descendant is kept; ancestors of kept terms survive so chains stay
    /// intact.
    #[must_use]
    pub fn restricted_to(&self, keep: &BTreeSet<String>) -> Self {
        let root_terms = self
            .root_terms
            .iter()
            .filter_map(|term| restrict_term(term, keep))
            .collect();
        Self { root_terms }
    }
}

fn restrict_term(term: &ThesaurusTerm, keep: &BTreeSet<String>) -> Option<ThesaurusTerm> {
    let sub_terms: Vec<ThesaurusTerm> = term
        .sub_terms
        .iter()
        .filter_map(|sub| restrict_term(sub, keep))
        .collect();

    let referenced = term
        .identifier()
        .is_some_and(|id| keep.contains(id));

    if referenced || !sub_terms.is_empty() {
        Some(ThesaurusTerm {
            term: term.term.clone(),
            alt: term.alt.clone(),
            sub_terms,
        })
    } else {
        None
    }
}

/// One element of a resolved ancestor chain.
///
/// Parent linkage is by identifier: element `i`'s `parent_id` equals element
/// `i - 1`'s `id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ThesaurusLink {
    /// Vocabulary identifier, empty when the matched term carries none.
    pub id: String,
    /// Language-appropriate label.
    pub term: String,
    /// Identifier of the preceding chain element.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}
