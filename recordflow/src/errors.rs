//! Error types for the recordflow pipeline.
//!
//! Only fatal conditions surface as errors: a record of the wrong variant
//! reaching a node, a misused graph (push after completion), or invalid
//! setup data. Soft failures — an identifier missing from a lookup table, an
//! unreachable remote resource — degrade the affected record, emit a
//! diagnostic, and never appear as `Err` values.

use thiserror::Error;

/// The fatal error type for pipeline construction and runs.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A record of the wrong variant reached a node, or the graph was used
    /// outside its contract (record pushed after completion, duplicate
    /// completion signal, tree deeper than the integrity guard).
    #[error("structural error in '{node}': {message}")]
    Structural {
        /// The node that detected the violation.
        node: String,
        /// What went wrong.
        message: String,
    },

    /// Invalid setup data detected before any record is processed
    /// (missing required rule category, duplicate flattened rule id).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A rule pattern failed to compile.
    #[error("invalid pattern '{pattern}': {source}")]
    Pattern {
        /// The offending pattern text.
        pattern: String,
        /// The underlying compile error.
        #[source]
        source: regex::Error,
    },

    /// A cache file could not be read or written.
    #[error("cache io error: {0}")]
    Io(#[from] std::io::Error),

    /// A cache payload could not be encoded or decoded.
    #[error("cache serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PipelineError {
    /// Creates a structural error for the given node.
    #[must_use]
    pub fn structural(node: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Structural {
            node: node.into(),
            message: message.into(),
        }
    }

    /// Creates a structural error for a record variant mismatch at a node
    /// boundary.
    #[must_use]
    pub fn unexpected_variant(node: impl Into<String>, expected: &str, got: &str) -> Self {
        Self::Structural {
            node: node.into(),
            message: format!("expected a '{expected}' record, got '{got}'"),
        }
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Creates a pattern compile error.
    #[must_use]
    pub fn pattern(pattern: impl Into<String>, source: regex::Error) -> Self {
        Self::Pattern {
            pattern: pattern.into(),
            source,
        }
    }
}
