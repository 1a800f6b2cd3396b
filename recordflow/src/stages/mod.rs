//! Enrichment and classification stages.
//!
//! Every stage implements [`crate::pipeline::Transform`] and is wired into a
//! graph through [`crate::pipeline::StageNode`]. Soft failures (missing
//! identifiers, unreachable remote resources) degrade the record and log a
//! diagnostic; only structural violations abort the run.

mod condition;
mod filters;
mod metadata;
mod remote_images;
mod restorations;
mod sorting;
mod thesaurus_resolver;

pub use condition::{default_condition_rules, ConditionClassifier, ConditionRuleSpec};
pub use filters::{
    FilterCategory, FilterRuleMatcher, FilterRuleSpec, CATEGORY_ATTRIBUTION,
    CATEGORY_COLLECTION_REPOSITORY, CATEGORY_EXAMINATION_ANALYSIS,
};
pub use metadata::MetadataExtender;
pub use remote_images::{
    image_kind, CacheEntry, FetchError, HttpResourceFetcher, ImageKindSelector,
    RemoteImageChecker, RemoteImageData, RemoteImageStack, ResourceFetcher,
};
pub use restorations::RestorationExtender;
pub use sorting::SortingInfoExtender;
pub use thesaurus_resolver::ThesaurusResolver;
