//! Condition level classification for graphics.
//!
//! Free-text condition descriptions ("II. Zustand, leicht verschmutzt") are
//! mapped to a small integer level per language. Rules are tried in declared
//! order; the first rule with a matching pattern wins. Unmatched text keeps
//! the level already present on the record.

use async_trait::async_trait;
use parking_lot::Mutex;
use regex::{Regex, RegexBuilder};
use std::collections::HashMap;

use crate::errors::PipelineError;
use crate::pipeline::Transform;
use crate::records::{lang, Record};

/// One classification rule: a set of patterns mapping to a level.
#[derive(Debug)]
struct ConditionRule {
    patterns: Vec<Regex>,
    level: i32,
}

/// Rule source: `(language, [(patterns, level)])`.
pub type ConditionRuleSpec = (&'static str, Vec<(Vec<&'static str>, i32)>);

/// The built-in condition rules.
///
/// German descriptions name the state ("I. Zustand") or the edition
/// ("1. Auflage"); English ones use ordinals ("1st state", "1st edition").
#[must_use]
pub fn default_condition_rules() -> Vec<ConditionRuleSpec> {
    vec![
        (
            lang::DE,
            vec![
                (vec![r"^I\.\s*zustand", r"^1\.\s*auflage"], 1),
                (vec![r"^II\.\s*zustand", r"^2\.\s*auflage"], 2),
                (vec![r"^III\.\s*zustand", r"^3\.\s*auflage"], 3),
            ],
        ),
        (
            lang::EN,
            vec![
                (vec![r"^1st\s*state", r"^1st\s*edition"], 1),
                (vec![r"^2nd\s*state", r"^2nd\s*edition"], 2),
                (vec![r"^3rd\s*state", r"^3rd\s*edition"], 3),
            ],
        ),
    ]
}

/// Stage deriving the condition level of graphics.
#[derive(Debug)]
pub struct ConditionClassifier {
    name: String,
    rules: HashMap<String, Vec<ConditionRule>>,
    // Memoizes the rule outcome per (language, trimmed text) for the run.
    // `None` records that no rule matched, so the pass-through default stays
    // intact without re-running the regex set.
    cache: Mutex<HashMap<(String, String), Option<i32>>>,
}

impl ConditionClassifier {
    /// Creates a classifier with the built-in rules.
    pub fn new() -> Result<Self, PipelineError> {
        Self::with_rules(default_condition_rules())
    }

    /// Creates a classifier from explicit rule specs.
    ///
    /// Patterns are compiled case-insensitively at construction; an invalid
    /// pattern is a setup failure, not a match-time one.
    pub fn with_rules(specs: Vec<ConditionRuleSpec>) -> Result<Self, PipelineError> {
        let mut rules = HashMap::new();
        for (lang_code, lang_rules) in specs {
            let mut compiled = Vec::with_capacity(lang_rules.len());
            for (patterns, level) in lang_rules {
                let patterns = patterns
                    .into_iter()
                    .map(|pattern| {
                        RegexBuilder::new(pattern)
                            .case_insensitive(true)
                            .build()
                            .map_err(|error| PipelineError::pattern(pattern, error))
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                compiled.push(ConditionRule { patterns, level });
            }
            rules.insert(lang_code.to_string(), compiled);
        }
        Ok(Self {
            name: "condition-classifier".into(),
            rules,
            cache: Mutex::new(HashMap::new()),
        })
    }

    /// Classifies `condition_text` for `lang_code`, falling back to
    /// `current_level` when no rule matches.
    #[must_use]
    pub fn classify(&self, lang_code: &str, condition_text: &str, current_level: i32) -> i32 {
        let text = condition_text.trim();

        let key = (lang_code.to_string(), text.to_string());
        if let Some(outcome) = self.cache.lock().get(&key) {
            return outcome.unwrap_or(current_level);
        }

        let outcome = self.match_rules(lang_code, text);
        self.cache.lock().insert(key, outcome);
        outcome.unwrap_or(current_level)
    }

    fn match_rules(&self, lang_code: &str, text: &str) -> Option<i32> {
        let rules = self.rules.get(lang_code)?;
        for rule in rules {
            for pattern in &rule.patterns {
                if pattern.is_match(text) {
                    return Some(rule.level);
                }
            }
        }
        None
    }

    #[cfg(test)]
    fn cache_len(&self) -> usize {
        self.cache.lock().len()
    }
}

#[async_trait]
impl Transform for ConditionClassifier {
    fn name(&self) -> &str {
        &self.name
    }

    async fn apply(&self, item: Record) -> Result<Record, PipelineError> {
        let mut graphic = item.into_graphic(&self.name)?;

        if graphic.classification.is_some() {
            let condition = graphic.condition_text().to_string();
            graphic.condition_level =
                self.classify(&graphic.lang_code, &condition, graphic.condition_level);
        }

        Ok(Record::Graphic(graphic))
    }

    async fn on_done(&self) -> Result<(), PipelineError> {
        self.cache.lock().clear();
        Ok(())
    }
}
