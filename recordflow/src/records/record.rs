//! The record variants flowing through the pipeline graph.

use serde::Serialize;

use super::graphic::Graphic;
use super::literature::LiteratureReference;
use super::painting::Painting;
use super::restoration::Restoration;
use super::thesaurus::ThesaurusTerm;
use crate::errors::PipelineError;

/// An item flowing through the graph, one variant per domain entity.
///
/// Stages narrow to the variant they understand via the `into_*` accessors;
/// a mismatch is a structural error that aborts the run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Record {
    /// A painting rendition.
    Painting(Painting),
    /// A graphic rendition.
    Graphic(Graphic),
    /// A restoration documentation.
    Restoration(Restoration),
    /// A literature reference.
    Literature(LiteratureReference),
    /// One root term of a controlled-vocabulary tree.
    ThesaurusRoot(ThesaurusTerm),
}

/// The variant tag of a [`Record`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    /// A painting rendition.
    Painting,
    /// A graphic rendition.
    Graphic,
    /// A restoration documentation.
    Restoration,
    /// A literature reference.
    Literature,
    /// A vocabulary root term.
    ThesaurusRoot,
}

impl RecordKind {
    /// The variant name used in diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Painting => "painting",
            Self::Graphic => "graphic",
            Self::Restoration => "restoration",
            Self::Literature => "literature",
            Self::ThesaurusRoot => "thesaurus-root",
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Record {
    /// The variant tag of this record.
    #[must_use]
    pub const fn kind(&self) -> RecordKind {
        match self {
            Self::Painting(_) => RecordKind::Painting,
            Self::Graphic(_) => RecordKind::Graphic,
            Self::Restoration(_) => RecordKind::Restoration,
            Self::Literature(_) => RecordKind::Literature,
            Self::ThesaurusRoot(_) => RecordKind::ThesaurusRoot,
        }
    }

    /// The language of this record, when the variant carries one.
    #[must_use]
    pub fn lang_code(&self) -> Option<&str> {
        match self {
            Self::Painting(painting) => Some(&painting.lang_code),
            Self::Graphic(graphic) => Some(&graphic.lang_code),
            Self::Restoration(restoration) => Some(&restoration.lang_code),
            Self::Literature(reference) => Some(&reference.lang_code),
            Self::ThesaurusRoot(_) => None,
        }
    }

    /// Narrows to a painting, failing fast at the given node on mismatch.
    pub fn into_painting(self, node: &str) -> Result<Painting, PipelineError> {
        match self {
            Self::Painting(painting) => Ok(painting),
            other => Err(PipelineError::unexpected_variant(
                node,
                RecordKind::Painting.as_str(),
                other.kind().as_str(),
            )),
        }
    }

    /// Narrows to a graphic, failing fast at the given node on mismatch.
    pub fn into_graphic(self, node: &str) -> Result<Graphic, PipelineError> {
        match self {
            Self::Graphic(graphic) => Ok(graphic),
            other => Err(PipelineError::unexpected_variant(
                node,
                RecordKind::Graphic.as_str(),
                other.kind().as_str(),
            )),
        }
    }

    /// Narrows to a restoration, failing fast at the given node on mismatch.
    pub fn into_restoration(self, node: &str) -> Result<Restoration, PipelineError> {
        match self {
            Self::Restoration(restoration) => Ok(restoration),
            other => Err(PipelineError::unexpected_variant(
                node,
                RecordKind::Restoration.as_str(),
                other.kind().as_str(),
            )),
        }
    }

    /// Narrows to a vocabulary root term, failing fast at the given node on
    /// mismatch.
    pub fn into_thesaurus_root(self, node: &str) -> Result<ThesaurusTerm, PipelineError> {
        match self {
            Self::ThesaurusRoot(term) => Ok(term),
            other => Err(PipelineError::unexpected_variant(
                node,
                RecordKind::ThesaurusRoot.as_str(),
                other.kind().as_str(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn narrowing_to_the_right_variant_succeeds() {
        let record = Record::Painting(Painting::new("de", "P_001"));
        let painting = record.into_painting("test").unwrap();
        assert_eq!(painting.inventory_number, "P_001");
    }

    #[test]
    fn narrowing_to_the_wrong_variant_is_structural() {
        let record = Record::Graphic(Graphic::new("de", "G_001"));
        let err = record.into_painting("extender").unwrap_err();
        assert!(matches!(err, PipelineError::Structural { .. }));
        assert!(err.to_string().contains("extender"));
    }

    #[test]
    fn lang_code_is_absent_for_vocabulary_roots() {
        let record = Record::ThesaurusRoot(ThesaurusTerm::new("Gemälde"));
        assert_eq!(record.lang_code(), None);
    }
}
