//! Image stack structures attached to records by the remote checker.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The stable set of size codes every variant indexes.
///
/// Size codes missing from a remote payload are filled with zero-dimension
/// placeholders so downstream consumers can rely on all five being present.
pub const SIZE_CODES: [&str; 5] = ["xs", "s", "m", "l", "xl"];

/// Pixel dimensions of an image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Dimensions {
    /// Creates dimensions from width and height.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// A single sized rendition of an image.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageSource {
    /// Pixel dimensions of this rendition.
    pub dimensions: Dimensions,
    /// Fully-qualified source URL, empty for placeholders.
    pub src: String,
}

/// One image variant, indexed by size code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageVariant {
    /// Size code to rendition mapping.
    pub sizes: BTreeMap<String, ImageSource>,
}

impl ImageVariant {
    /// Creates a variant with a zero-dimension placeholder for every size
    /// code in [`SIZE_CODES`].
    #[must_use]
    pub fn with_placeholder_sizes() -> Self {
        let sizes = SIZE_CODES
            .iter()
            .map(|code| ((*code).to_string(), ImageSource::default()))
            .collect();
        Self { sizes }
    }
}

/// Summary information about an image stack.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageStackInfos {
    /// The largest dimensions available in the stack.
    pub max_dimensions: Dimensions,
}

/// All variants of one image kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageStack {
    /// Stack summary.
    pub infos: ImageStackInfos,
    /// The prepared variants.
    pub variants: Vec<ImageVariant>,
}

/// Prepared image stacks attached to a record, keyed by image kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageStackSet {
    /// Image kind to stack mapping.
    pub stacks: BTreeMap<String, ImageStack>,
}
