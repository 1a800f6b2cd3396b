//! Rule-based identifier assignment.
//!
//! A loaded category tree is flattened depth-first into an ordered rule
//! table at construction; duplicate category ids and missing required
//! categories are configuration errors raised before any record is
//! processed. At match time, attribution rules are evaluated per person and
//! collection/repository rules per record.

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::warn;

use crate::errors::PipelineError;
use crate::pipeline::Transform;
use crate::records::{Painting, Person, Record};

/// Root category holding attribution rules.
pub const CATEGORY_ATTRIBUTION: &str = "attribution";
/// Root category holding collection/repository rules.
pub const CATEGORY_COLLECTION_REPOSITORY: &str = "collection_repository";
/// Root category consumed by the restoration id extension only.
pub const CATEGORY_EXAMINATION_ANALYSIS: &str = "examination_analysis";

/// A node of the loaded filter category tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterCategory {
    /// Category identifier, unique across the flattened tree.
    pub id: String,
    /// Display labels per language.
    pub text: BTreeMap<String, String>,
    /// Match rules carried by this node.
    pub filters: Vec<FilterRuleSpec>,
    /// Child categories.
    pub children: Vec<FilterCategory>,
}

impl FilterCategory {
    /// Creates an empty category.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Adds a match rule, builder style.
    #[must_use]
    pub fn with_filter(mut self, filter: FilterRuleSpec) -> Self {
        self.filters.push(filter);
        self
    }

    /// Adds a child category, builder style.
    #[must_use]
    pub fn with_child(mut self, child: FilterCategory) -> Self {
        self.children.push(child);
        self
    }
}

/// One match rule: per-language pattern clauses over person fields, plus an
/// optional record-level collection/repository pattern.
///
/// An empty pattern string is a valid clause matching only an empty field
/// value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterRuleSpec {
    /// Name clauses keyed by language.
    pub name: BTreeMap<String, String>,
    /// Prefix clauses keyed by language.
    pub prefix: BTreeMap<String, String>,
    /// Suffix clauses keyed by language.
    pub suffix: BTreeMap<String, String>,
    /// Record-level pattern tested against repository and owner.
    pub collection_repository: Option<String>,
}

#[derive(Debug)]
enum Clause {
    /// Matches only an empty field value.
    Empty,
    /// Regular-expression match against the field value.
    Pattern(Regex),
}

impl Clause {
    fn compile(pattern: &str) -> Result<Self, PipelineError> {
        if pattern.is_empty() {
            return Ok(Self::Empty);
        }
        Regex::new(pattern)
            .map(Self::Pattern)
            .map_err(|error| PipelineError::pattern(pattern, error))
    }

    fn matches(&self, value: &str) -> bool {
        match self {
            Self::Empty => value.is_empty(),
            Self::Pattern(pattern) => pattern.is_match(value),
        }
    }
}

#[derive(Debug)]
struct CompiledRule {
    name: HashMap<String, Clause>,
    prefix: HashMap<String, Clause>,
    suffix: HashMap<String, Clause>,
    collection_repository: Option<Regex>,
}

fn compile_clauses(
    clauses: &BTreeMap<String, String>,
) -> Result<HashMap<String, Clause>, PipelineError> {
    clauses
        .iter()
        .map(|(lang_code, pattern)| Ok((lang_code.clone(), Clause::compile(pattern)?)))
        .collect()
}

fn compile_rule(spec: &FilterRuleSpec) -> Result<CompiledRule, PipelineError> {
    let collection_repository = spec
        .collection_repository
        .as_deref()
        .map(|pattern| Regex::new(pattern).map_err(|error| PipelineError::pattern(pattern, error)))
        .transpose()?;
    Ok(CompiledRule {
        name: compile_clauses(&spec.name)?,
        prefix: compile_clauses(&spec.prefix)?,
        suffix: compile_clauses(&spec.suffix)?,
        collection_repository,
    })
}

#[derive(Debug)]
struct FlatCategory {
    id: String,
    rules: Vec<CompiledRule>,
}

/// Flattens a category tree depth-first, parent before children.
fn flatten(root: &FilterCategory) -> Result<Vec<FlatCategory>, PipelineError> {
    let mut seen = HashSet::new();
    let mut flattened = Vec::new();
    flatten_into(root, &mut seen, &mut flattened)?;
    Ok(flattened)
}

fn flatten_into(
    category: &FilterCategory,
    seen: &mut HashSet<String>,
    flattened: &mut Vec<FlatCategory>,
) -> Result<(), PipelineError> {
    if !seen.insert(category.id.clone()) {
        return Err(PipelineError::configuration(format!(
            "duplicate filter category id '{}'",
            category.id
        )));
    }
    let rules = category
        .filters
        .iter()
        .map(compile_rule)
        .collect::<Result<Vec<_>, _>>()?;
    flattened.push(FlatCategory {
        id: category.id.clone(),
        rules,
    });
    for child in &category.children {
        flatten_into(child, seen, flattened)?;
    }
    Ok(())
}

/// Stage assigning attribution and collection/repository ids to paintings.
#[derive(Debug)]
pub struct FilterRuleMatcher {
    name: String,
    attribution: Vec<FlatCategory>,
    collection_repository: Vec<FlatCategory>,
}

impl FilterRuleMatcher {
    /// Builds the matcher from the loaded category roots.
    ///
    /// Both required roots must be present; flattening detects duplicate ids
    /// and compiles every pattern, so all rule errors surface here rather
    /// than during matching.
    pub fn new(categories: &[FilterCategory]) -> Result<Self, PipelineError> {
        let mut attribution = None;
        let mut collection_repository = None;

        for category in categories {
            match category.id.as_str() {
                CATEGORY_ATTRIBUTION => attribution = Some(flatten(category)?),
                CATEGORY_COLLECTION_REPOSITORY => {
                    collection_repository = Some(flatten(category)?);
                }
                // Consumed by the restoration id extension, not here.
                CATEGORY_EXAMINATION_ANALYSIS => {}
                other => warn!(category = other, "unknown filter category"),
            }
        }

        Ok(Self {
            name: "filter-rule-matcher".into(),
            attribution: attribution
                .ok_or_else(|| PipelineError::configuration("missing attribution filters"))?,
            collection_repository: collection_repository.ok_or_else(|| {
                PipelineError::configuration("missing collection repository filters")
            })?,
        })
    }

    fn extend_with_attribution_ids(&self, painting: &mut Painting) {
        let lang_code = painting.lang_code.clone();
        for person in &mut painting.persons {
            for category in &self.attribution {
                for rule in &category.rules {
                    if rule_matches_person(rule, person, &lang_code) {
                        // Later declarations overwrite earlier matches.
                        person.id = Some(category.id.clone());
                    }
                }
            }
        }
    }

    fn extend_with_collection_ids(&self, painting: &mut Painting) {
        for category in &self.collection_repository {
            for rule in &category.rules {
                let Some(pattern) = &rule.collection_repository else {
                    continue;
                };
                if pattern.is_match(&painting.repository) || pattern.is_match(&painting.owner) {
                    painting.collection_repository_id = Some(category.id.clone());
                }
            }
        }
    }
}

fn rule_matches_person(rule: &CompiledRule, person: &Person, lang_code: &str) -> bool {
    let fields = [
        (&rule.name, person.name.as_str()),
        (&rule.suffix, person.suffix.as_str()),
        (&rule.prefix, person.prefix.as_str()),
    ];

    let mut given = 0;
    let mut matching = 0;
    for (clauses, value) in fields {
        if let Some(clause) = clauses.get(lang_code) {
            given += 1;
            if clause.matches(value) {
                matching += 1;
            }
        }
    }
    given > 0 && given == matching
}

#[async_trait]
impl Transform for FilterRuleMatcher {
    fn name(&self) -> &str {
        &self.name
    }

    async fn apply(&self, item: Record) -> Result<Record, PipelineError> {
        let mut painting = item.into_painting(&self.name)?;
        self.extend_with_attribution_ids(&mut painting);
        self.extend_with_collection_ids(&mut painting);
        Ok(Record::Painting(painting))
    }
}
