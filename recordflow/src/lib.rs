//! # Recordflow
//!
//! A push-based streaming pipeline for archival catalog records.
//!
//! Recordflow composes independent processing stages into a directed
//! dataflow graph: a source iterates its input records exactly once, pushes
//! each one synchronously through every registered downstream node, and
//! signals completion depth-first after the last record. On top of the
//! engine ride the enrichment stages an archival catalog export needs:
//!
//! - **Remote image checking**: cached existence/content lookups against a
//!   remote image service, including negative caching of absent resources
//! - **Vocabulary resolution**: ancestor-chain lookup in a controlled
//!   vocabulary tree with language-appropriate labels
//! - **Condition classification**: pattern-based mapping of free-text
//!   condition descriptions to numeric levels
//! - **Rule-based identifier assignment**: nested filter trees matched
//!   against record fields
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use recordflow::prelude::*;
//!
//! let source = RecordSource::new("graphics", records);
//! let classifier = StageNode::new(ConditionClassifier::new()?);
//! let exporter = SinkNode::new(JsonLangSink::with_destination("out/graphics.json"));
//!
//! source.pipe(classifier.clone());
//! classifier.pipe(exporter);
//!
//! let report = source.run().await?;
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod collectors;
pub mod errors;
pub mod observability;
pub mod pipeline;
pub mod records;
pub mod sinks;
pub mod stages;
pub mod testing;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::collectors::{MetaReferenceSet, RestorationsCollector, ThesaurusCollector};
    pub use crate::errors::PipelineError;
    pub use crate::pipeline::{
        Downstreams, Node, RecordSource, RunReport, Sink, SinkNode, StageNode, Transform,
    };
    pub use crate::records::{
        lang, Graphic, LiteratureReference, Painting, Record, RecordKind, Restoration,
        Thesaurus, ThesaurusLink, ThesaurusTerm,
    };
    pub use crate::sinks::JsonLangSink;
    pub use crate::stages::{
        ConditionClassifier, FilterCategory, FilterRuleMatcher, FilterRuleSpec,
        HttpResourceFetcher, ImageKindSelector, MetadataExtender, RemoteImageChecker,
        ResourceFetcher, RestorationExtender, SortingInfoExtender, ThesaurusResolver,
    };
}
