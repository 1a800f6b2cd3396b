//! Controlled-vocabulary term resolution.
//!
//! For every vocabulary keyword on a painting, the resolver searches the
//! term tree depth-first and attaches the full ancestor chain (root to
//! matched term) with language-appropriate labels. Every resolved term id is
//! recorded in the shared [`MetaReferenceSet`] so the derived vocabulary
//! export can be restricted to terms actually in use.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

use crate::collectors::{MetaReferenceSet, ThesaurusCollector};
use crate::errors::PipelineError;
use crate::pipeline::Transform;
use crate::records::{
    lang, Record, Thesaurus, ThesaurusLink, ThesaurusTerm, ALT_BRITISH_EQUIVALENT,
    ALT_TERM_IDENTIFIER,
};

/// Keyword category marking controlled-vocabulary references.
const VOCABULARY_KEYWORD_KIND: &str = "Schlagwort";

/// Upper bound on term-tree depth.
///
/// The tree is acyclic by construction; exceeding this bound indicates a
/// data-integrity violation and fails fast instead of overflowing the stack.
const MAX_TERM_DEPTH: usize = 64;

/// Stage resolving vocabulary keywords into ancestor chains.
pub struct ThesaurusResolver {
    name: String,
    thesaurus: Thesaurus,
    lang_to_alt_key: HashMap<String, String>,
    meta_refs: Arc<MetaReferenceSet>,
}

impl ThesaurusResolver {
    /// Creates a resolver over the tree assembled by `collector`.
    ///
    /// The tree is copied and frozen at construction; English renditions are
    /// labelled with the British-equivalent alternate when available.
    #[must_use]
    pub fn new(collector: &ThesaurusCollector, meta_refs: Arc<MetaReferenceSet>) -> Self {
        let mut lang_to_alt_key = HashMap::new();
        lang_to_alt_key.insert(lang::EN.to_string(), ALT_BRITISH_EQUIVALENT.to_string());
        Self {
            name: "thesaurus-resolver".into(),
            thesaurus: collector.thesaurus(),
            lang_to_alt_key,
            meta_refs,
        }
    }

    /// Resolves `identifier` to its ancestor chain with labels for
    /// `lang_code`.
    ///
    /// An unknown identifier yields an empty chain. Should more than one
    /// root subtree match — impossible while term ids stay unique — the
    /// last searched root wins.
    pub fn resolve(
        &self,
        identifier: &str,
        lang_code: &str,
    ) -> Result<Vec<ThesaurusLink>, PipelineError> {
        let mut chain = Vec::new();
        for root in &self.thesaurus.root_terms {
            let found = self.hierarchy_of(identifier, root, 0)?;
            if !found.is_empty() {
                chain = found;
            }
        }
        Ok(self.map_chain(&chain, lang_code))
    }

    fn hierarchy_of<'a>(
        &self,
        identifier: &str,
        term: &'a ThesaurusTerm,
        depth: usize,
    ) -> Result<Vec<&'a ThesaurusTerm>, PipelineError> {
        if depth > MAX_TERM_DEPTH {
            return Err(PipelineError::structural(
                &self.name,
                format!("term tree deeper than {MAX_TERM_DEPTH} levels"),
            ));
        }

        if term.identifier() == Some(identifier) {
            return Ok(vec![term]);
        }

        for sub_term in &term.sub_terms {
            let found = self.hierarchy_of(identifier, sub_term, depth + 1)?;
            if !found.is_empty() {
                let mut chain = Vec::with_capacity(found.len() + 1);
                chain.push(term);
                chain.extend(found);
                return Ok(chain);
            }
        }

        Ok(Vec::new())
    }

    fn map_chain(&self, chain: &[&ThesaurusTerm], lang_code: &str) -> Vec<ThesaurusLink> {
        let alt_label_key = self.lang_to_alt_key.get(lang_code);

        let mut links = Vec::with_capacity(chain.len());
        let mut prev_id: Option<String> = None;
        for (index, term) in chain.iter().enumerate() {
            let id = term.alt(ALT_TERM_IDENTIFIER).map(str::to_owned);

            let mut label = term.term.clone();
            if let Some(alt_key) = alt_label_key {
                if let Some(alt_label) = term.alt(alt_key) {
                    label = alt_label.to_owned();
                }
            }

            let parent_id = if index > 0 { prev_id.clone() } else { None };
            links.push(ThesaurusLink {
                id: id.clone().unwrap_or_default(),
                term: label,
                parent_id,
            });
            prev_id = id;
        }
        links
    }
}

#[async_trait]
impl Transform for ThesaurusResolver {
    fn name(&self) -> &str {
        &self.name
    }

    async fn apply(&self, item: Record) -> Result<Record, PipelineError> {
        let mut painting = item.into_painting(&self.name)?;

        for keyword in painting.keywords.clone() {
            if keyword.kind != VOCABULARY_KEYWORD_KIND {
                continue;
            }

            let links = self.resolve(&keyword.term, &painting.lang_code)?;
            if links.is_empty() {
                warn!(
                    inventory_number = %painting.inventory_number,
                    identifier = %keyword.term,
                    "vocabulary identifier not found"
                );
                continue;
            }

            for link in &links {
                if !link.id.is_empty() {
                    self.meta_refs.record(link.id.clone());
                }
            }
            painting.add_thesaurus_items(links);
        }

        Ok(Record::Painting(painting))
    }
}

impl std::fmt::Debug for ThesaurusResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThesaurusResolver")
            .field("name", &self.name)
            .field("roots", &self.thesaurus.root_terms.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::Sink;
    use crate::records::{Keyword, Painting};
    use pretty_assertions::assert_eq;

    async fn collector_with_tree() -> Arc<ThesaurusCollector> {
        let tree = ThesaurusTerm::new("Gattung")
            .with_alt(ALT_TERM_IDENTIFIER, "a")
            .with_sub_term(
                ThesaurusTerm::new("Malerei")
                    .with_alt(ALT_TERM_IDENTIFIER, "b")
                    .with_alt(ALT_BRITISH_EQUIVALENT, "painting")
                    .with_sub_term(
                        ThesaurusTerm::new("Tafelmalerei")
                            .with_alt(ALT_TERM_IDENTIFIER, "x")
                            .with_alt(ALT_BRITISH_EQUIVALENT, "panel painting"),
                    ),
            );
        let collector = ThesaurusCollector::new();
        collector
            .collect(Record::ThesaurusRoot(tree))
            .await
            .unwrap();
        collector
    }

    #[tokio::test]
    async fn resolves_the_full_ancestor_chain() {
        let collector = collector_with_tree().await;
        let resolver = ThesaurusResolver::new(&collector, MetaReferenceSet::new());

        let chain = resolver.resolve("x", lang::DE).unwrap();

        let labels: Vec<&str> = chain.iter().map(|link| link.term.as_str()).collect();
        assert_eq!(labels, ["Gattung", "Malerei", "Tafelmalerei"]);
        assert_eq!(chain[0].parent_id, None);
        assert_eq!(chain[1].parent_id.as_deref(), Some("a"));
        assert_eq!(chain[2].parent_id.as_deref(), Some("b"));
    }

    #[tokio::test]
    async fn prefers_language_alternates_for_english() {
        let collector = collector_with_tree().await;
        let resolver = ThesaurusResolver::new(&collector, MetaReferenceSet::new());

        let chain = resolver.resolve("x", lang::EN).unwrap();

        let labels: Vec<&str> = chain.iter().map(|link| link.term.as_str()).collect();
        // The root has no English alternate and keeps its primary label.
        assert_eq!(labels, ["Gattung", "painting", "panel painting"]);
    }

    #[tokio::test]
    async fn unknown_identifiers_yield_an_empty_chain() {
        let collector = collector_with_tree().await;
        let resolver = ThesaurusResolver::new(&collector, MetaReferenceSet::new());
        assert!(resolver.resolve("nope", lang::DE).unwrap().is_empty());
    }

    #[tokio::test]
    async fn vocabulary_keywords_extend_the_painting() {
        let collector = collector_with_tree().await;
        let meta_refs = MetaReferenceSet::new();
        let resolver = ThesaurusResolver::new(&collector, meta_refs.clone());

        let mut painting = Painting::new(lang::DE, "P_001");
        painting.keywords = vec![
            Keyword::new("Schlagwort", "x"),
            Keyword::new("Form", "ignored"),
        ];

        let out = resolver
            .apply(Record::Painting(painting))
            .await
            .unwrap()
            .into_painting("test")
            .unwrap();

        assert_eq!(out.thesaurus_items.len(), 3);
        assert!(meta_refs.contains("a"));
        assert!(meta_refs.contains("b"));
        assert!(meta_refs.contains("x"));
    }

    #[tokio::test]
    async fn missing_identifiers_leave_the_painting_unextended() {
        let collector = collector_with_tree().await;
        let resolver = ThesaurusResolver::new(&collector, MetaReferenceSet::new());

        let mut painting = Painting::new(lang::DE, "P_001");
        painting.keywords = vec![Keyword::new("Schlagwort", "unknown")];

        let out = resolver
            .apply(Record::Painting(painting))
            .await
            .unwrap()
            .into_painting("test")
            .unwrap();
        assert!(out.thesaurus_items.is_empty());
    }

    #[tokio::test]
    async fn over_deep_trees_fail_fast() {
        let mut term = ThesaurusTerm::new("leaf").with_alt(ALT_TERM_IDENTIFIER, "deep");
        for level in 0..(MAX_TERM_DEPTH + 2) {
            term = ThesaurusTerm::new(format!("level-{level}")).with_sub_term(term);
        }
        let collector = ThesaurusCollector::new();
        collector
            .collect(Record::ThesaurusRoot(term))
            .await
            .unwrap();
        let resolver = ThesaurusResolver::new(&collector, MetaReferenceSet::new());

        assert!(matches!(
            resolver.resolve("deep", lang::DE).unwrap_err(),
            PipelineError::Structural { .. }
        ));
    }
}
