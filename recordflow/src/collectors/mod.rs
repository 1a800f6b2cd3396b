//! In-process collectors used for cross-record joins.
//!
//! Collectors are sinks that retain records (or fields copied from them) in
//! lookup tables instead of writing output. Stages hold a reference to the
//! collector they join against; each collector is mutated only by its owning
//! node.

mod meta_refs;
mod restorations;
mod thesaurus;

pub use meta_refs::MetaReferenceSet;
pub use restorations::RestorationsCollector;
pub use thesaurus::ThesaurusCollector;
