//! Deduplicated vocabulary references gathered during enrichment.

use parking_lot::RwLock;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Append-only set of vocabulary term ids referenced by processed records.
///
/// Enrichment passes record every resolved term id here; after all domains
/// are processed the set restricts the derived vocabulary export via
/// [`crate::records::Thesaurus::restricted_to`].
#[derive(Debug, Default)]
pub struct MetaReferenceSet {
    ids: RwLock<BTreeSet<String>>,
}

impl MetaReferenceSet {
    /// Creates an empty reference set.
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Records a term id, returning `true` when it was not present before.
    pub fn record(&self, id: impl Into<String>) -> bool {
        self.ids.write().insert(id.into())
    }

    /// Whether the given id has been recorded.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.ids.read().contains(id)
    }

    /// Number of distinct recorded ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.read().len()
    }

    /// Whether no id has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.read().is_empty()
    }

    /// A snapshot of the recorded ids.
    #[must_use]
    pub fn ids(&self) -> BTreeSet<String> {
        self.ids.read().clone()
    }
}
