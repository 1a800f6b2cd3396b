//! Typed records and the entities they carry.
//!
//! A [`Record`] is the unit that flows through the pipeline graph: one
//! variant per domain entity. The engine itself is agnostic to the variant;
//! every stage narrows to the variant(s) it understands and fails fast on a
//! mismatch.

mod common;
mod graphic;
mod images;
mod literature;
mod painting;
mod record;
mod restoration;
mod thesaurus;

pub use common::{Classification, Dating, Keyword, Metadata, Person, RestorationSurvey};
pub use graphic::Graphic;
pub use images::{
    Dimensions, ImageSource, ImageStack, ImageStackInfos, ImageStackSet, ImageVariant, SIZE_CODES,
};
pub use literature::LiteratureReference;
pub use painting::Painting;
pub use record::{Record, RecordKind};
pub use restoration::Restoration;
pub use thesaurus::{Thesaurus, ThesaurusLink, ThesaurusTerm, ALT_BRITISH_EQUIVALENT, ALT_TERM_IDENTIFIER};

/// Language codes used across the catalog.
pub mod lang {
    /// German, the primary catalog language.
    pub const DE: &str = "de";
    /// English.
    pub const EN: &str = "en";
}
