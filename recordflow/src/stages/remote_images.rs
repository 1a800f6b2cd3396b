//! Cached remote image existence checking.
//!
//! For every graphic carrying an image id, the checker consults a remote
//! image service once per id and run, attaches the prepared image stacks on
//! success and caches negative outcomes so unreachable resources are not
//! retried. The cache is restored from a per-instance file at construction
//! and written back in full when the run completes.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::errors::PipelineError;
use crate::pipeline::Transform;
use crate::records::{
    Dimensions, Graphic, ImageSource, ImageStack, ImageStackInfos, ImageStackSet, ImageVariant,
    Record,
};

/// The image kinds served by the remote image service.
pub mod image_kind {
    /// The representative image shown in overviews.
    pub const REPRESENTATIVE: &str = "representative";
    /// Overall view.
    pub const OVERALL: &str = "overall";
    /// Reverse side.
    pub const REVERSE: &str = "reverse";
    /// Infrared reflectography.
    pub const IRR: &str = "irr";
    /// X-radiograph.
    pub const X_RADIOGRAPH: &str = "x-radiograph";
    /// UV light.
    pub const UV_LIGHT: &str = "uv-light";
    /// Detail shots.
    pub const DETAIL: &str = "detail";
    /// Photomicrographs.
    pub const PHOTOMICROGRAPH: &str = "photomicrograph";
    /// Conservation documentation.
    pub const CONSERVATION: &str = "conservation";
    /// Uncategorized material.
    pub const OTHER: &str = "other";
    /// Analysis material.
    pub const ANALYSIS: &str = "analysis";
    /// RKD material.
    pub const RKD: &str = "rkd";
    /// KOE material.
    pub const KOE: &str = "koe";
    /// Reflected light.
    pub const REFLECTED_LIGHT: &str = "reflected-light";
    /// Transmitted light.
    pub const TRANSMITTED_LIGHT: &str = "transmitted-light";
}

const DEFAULT_SERVER_HOST: &str = "https://lucascranach.org";
const DEFAULT_CACHE_FILENAME: &str = "remote-image-checker.cache.json";

/// Failure talking to the remote image service.
///
/// Never fatal: the checker records a negative cache entry and moves on.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request could not be sent or the body could not be decoded.
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Fetches JSON documents describing remote image stacks.
///
/// `Ok(None)` represents a confirmed absence (non-2xx response).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResourceFetcher: Send + Sync {
    /// Fetches the JSON document at `url`.
    async fn fetch_json(&self, url: &str) -> Result<Option<serde_json::Value>, FetchError>;
}

/// [`ResourceFetcher`] backed by a shared HTTP client.
#[derive(Debug, Clone, Default)]
pub struct HttpResourceFetcher {
    client: reqwest::Client,
}

impl HttpResourceFetcher {
    /// Creates a fetcher with a fresh HTTP client.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ResourceFetcher for HttpResourceFetcher {
    async fn fetch_json(&self, url: &str) -> Result<Option<serde_json::Value>, FetchError> {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Ok(None);
        }
        Ok(Some(response.json().await?))
    }
}

/// Selects the image kind to extract for a record.
#[derive(Clone)]
pub enum ImageKindSelector {
    /// Always the same kind.
    Fixed(String),
    /// Derived from the record and the raw payload.
    Computed(Arc<dyn Fn(&Graphic, &RemoteImageData) -> Option<String> + Send + Sync>),
}

impl ImageKindSelector {
    /// Creates a fixed selector.
    #[must_use]
    pub fn fixed(kind: impl Into<String>) -> Self {
        Self::Fixed(kind.into())
    }

    /// Creates a computed selector.
    #[must_use]
    pub fn computed(
        select: impl Fn(&Graphic, &RemoteImageData) -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        Self::Computed(Arc::new(select))
    }

    fn select(&self, graphic: &Graphic, data: &RemoteImageData) -> Option<String> {
        match self {
            Self::Fixed(kind) => Some(kind.clone()),
            Self::Computed(select) => select(graphic, data),
        }
    }
}

impl std::fmt::Debug for ImageKindSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fixed(kind) => f.debug_tuple("Fixed").field(kind).finish(),
            Self::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// The raw per-object payload served by the remote image service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RemoteImageData {
    /// One stack per image kind.
    pub image_stack: BTreeMap<String, RemoteImageStack>,
}

/// One raw image stack.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RemoteImageStack {
    /// The largest dimensions available in the stack.
    pub max_dimensions: Dimensions,
    /// The raw variants; a single un-wrapped object for representative
    /// images, an array for every other kind.
    pub images: serde_json::Value,
}

/// One size-coded source inside a raw variant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RemoteImageSource {
    dimensions: Dimensions,
    src: String,
    path: Option<String>,
}

type RemoteVariant = BTreeMap<String, RemoteImageSource>;

/// A cache slot for one image id; `raw: None` is a confirmed absence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CacheEntry {
    /// The raw payload, or `None` when the resource is confirmed absent.
    pub raw_images_data: Option<RemoteImageData>,
}

/// Stage attaching remote image stacks to graphics, with a per-run cache.
pub struct RemoteImageChecker {
    name: String,
    fetcher: Arc<dyn ResourceFetcher>,
    selector: ImageKindSelector,
    server_host: String,
    cache_path: PathBuf,
    cache: Mutex<HashMap<String, CacheEntry>>,
}

impl RemoteImageChecker {
    /// Creates a checker whose cache file lives in `cache_dir` under the
    /// default name.
    ///
    /// The directory is created when missing; an existing cache file is
    /// restored, an absent one starts the cache empty.
    pub fn with_cache_at(
        cache_dir: impl AsRef<Path>,
        selector: ImageKindSelector,
        fetcher: Arc<dyn ResourceFetcher>,
    ) -> Result<Self, PipelineError> {
        Self::with_cache_file(
            cache_dir.as_ref().join(DEFAULT_CACHE_FILENAME),
            selector,
            fetcher,
        )
    }

    /// Creates a checker with an explicit cache file path.
    pub fn with_cache_file(
        cache_path: PathBuf,
        selector: ImageKindSelector,
        fetcher: Arc<dyn ResourceFetcher>,
    ) -> Result<Self, PipelineError> {
        if let Some(parent) = cache_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let cache = Self::restore_cache(&cache_path)?;
        Ok(Self {
            name: "remote-image-checker".into(),
            fetcher,
            selector,
            server_host: DEFAULT_SERVER_HOST.into(),
            cache_path,
            cache: Mutex::new(cache),
        })
    }

    /// Overrides the image server host, builder style.
    #[must_use]
    pub fn with_server_host(mut self, host: impl Into<String>) -> Self {
        self.server_host = host.into();
        self
    }

    /// Number of cached entries, positive and negative.
    #[must_use]
    pub fn cache_len(&self) -> usize {
        self.cache.lock().len()
    }

    fn restore_cache(path: &Path) -> Result<HashMap<String, CacheEntry>, PipelineError> {
        if !path.exists() {
            return Ok(HashMap::new());
        }
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn image_data_url(&self, image_id: &str) -> String {
        format!(
            "{}/imageserver/{image_id}/imageData-1.0.json",
            self.server_host
        )
    }

    fn variant_src(&self, image_id: &str, kind_path: &str, src: &str) -> String {
        format!("{}/imageserver/{image_id}/{kind_path}/{src}", self.server_host)
    }

    async fn lookup(&self, image_id: &str) -> CacheEntry {
        let cached = self.cache.lock().get(image_id).cloned();
        if let Some(entry) = cached {
            return entry;
        }

        let url = self.image_data_url(image_id);
        let raw_images_data = match self.fetcher.fetch_json(&url).await {
            Ok(Some(value)) => match serde_json::from_value::<RemoteImageData>(value) {
                Ok(data) => Some(data),
                Err(error) => {
                    warn!(image_id, %error, "remote image payload is malformed");
                    None
                }
            },
            Ok(None) => {
                warn!(image_id, "missing remote images");
                None
            }
            Err(error) => {
                warn!(image_id, %error, "remote image lookup failed");
                None
            }
        };

        let entry = CacheEntry { raw_images_data };
        self.cache
            .lock()
            .insert(image_id.to_string(), entry.clone());
        entry
    }

    fn prepare_stack_set(
        &self,
        image_id: &str,
        kind: &str,
        data: &RemoteImageData,
    ) -> Result<ImageStackSet, PipelineError> {
        let stack = data.image_stack.get(kind).ok_or_else(|| {
            PipelineError::structural(
                &self.name,
                format!("remote payload for '{image_id}' has no '{kind}' stack"),
            )
        })?;

        let mut prepared = ImageStack {
            infos: ImageStackInfos {
                max_dimensions: stack.max_dimensions,
            },
            variants: Vec::new(),
        };
        for raw in raw_variants(stack) {
            prepared.variants.push(self.prepare_variant(image_id, kind, &raw));
        }

        let mut set = ImageStackSet::default();
        set.stacks.insert(kind.to_string(), prepared);
        Ok(set)
    }

    fn prepare_variant(&self, image_id: &str, kind: &str, raw: &RemoteVariant) -> ImageVariant {
        let mut variant = ImageVariant::with_placeholder_sizes();
        for (size, source) in raw {
            let kind_path = source.path.as_deref().unwrap_or(kind);
            variant.sizes.insert(
                size.clone(),
                ImageSource {
                    dimensions: source.dimensions,
                    src: self.variant_src(image_id, kind_path, &source.src),
                },
            );
        }
        variant
    }
}

fn raw_variants(stack: &RemoteImageStack) -> Vec<RemoteVariant> {
    let raw = match &stack.images {
        serde_json::Value::Array(items) => items.clone(),
        serde_json::Value::Null => Vec::new(),
        // Representative images carry a single un-wrapped variant.
        single => vec![single.clone()],
    };
    raw.into_iter()
        .filter_map(|value| match serde_json::from_value::<RemoteVariant>(value) {
            Ok(variant) => Some(variant),
            Err(error) => {
                warn!(%error, "skipping malformed image variant");
                None
            }
        })
        .collect()
}

#[async_trait]
impl Transform for RemoteImageChecker {
    fn name(&self) -> &str {
        &self.name
    }

    async fn apply(&self, item: Record) -> Result<Record, PipelineError> {
        let mut graphic = item.into_graphic(&self.name)?;

        if graphic.image_id.is_empty() {
            warn!(
                inventory_number = %graphic.inventory_number,
                "missing image id, skipping remote check"
            );
            return Ok(Record::Graphic(graphic));
        }

        let image_id = graphic.image_id.clone();
        let entry = self.lookup(&image_id).await;

        if let Some(data) = &entry.raw_images_data {
            if let Some(kind) = self.selector.select(&graphic, data) {
                graphic.images = Some(self.prepare_stack_set(&image_id, &kind, data)?);
            }
        }

        Ok(Record::Graphic(graphic))
    }

    async fn on_done(&self) -> Result<(), PipelineError> {
        let snapshot = self.cache.lock().clone();
        let json = serde_json::to_string(&snapshot)?;
        std::fs::write(&self.cache_path, json)?;
        info!(
            cache = %self.cache_path.display(),
            entries = snapshot.len(),
            "remote image cache persisted"
        );
        self.cache.lock().clear();
        Ok(())
    }
}

impl std::fmt::Debug for RemoteImageChecker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteImageChecker")
            .field("name", &self.name)
            .field("selector", &self.selector)
            .field("cache_path", &self.cache_path)
            .field("cached", &self.cache_len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::SIZE_CODES;
    use crate::testing::sample_graphic;
    use serde_json::json;

    fn overall_payload() -> serde_json::Value {
        json!({
            "imageStack": {
                "overall": {
                    "maxDimensions": { "width": 4000, "height": 3000 },
                    "images": [
                        {
                            "s": {
                                "dimensions": { "width": 600, "height": 450 },
                                "src": "G_001_s.jpg"
                            },
                            "xl": {
                                "dimensions": { "width": 4000, "height": 3000 },
                                "src": "G_001_xl.jpg"
                            }
                        }
                    ]
                }
            }
        })
    }

    fn checker_with(
        dir: &tempfile::TempDir,
        fetcher: MockResourceFetcher,
    ) -> RemoteImageChecker {
        RemoteImageChecker::with_cache_at(
            dir.path(),
            ImageKindSelector::fixed(image_kind::OVERALL),
            Arc::new(fetcher),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn repeated_lookups_issue_a_single_request() {
        let dir = tempfile::tempdir().unwrap();
        let mut fetcher = MockResourceFetcher::new();
        fetcher
            .expect_fetch_json()
            .times(1)
            .returning(|_| Ok(Some(overall_payload())));
        let checker = checker_with(&dir, fetcher);

        let mut attached = Vec::new();
        for _ in 0..3 {
            let record = Record::Graphic(sample_graphic("G_001", ""));
            let graphic = checker.apply(record).await.unwrap().into_graphic("test").unwrap();
            attached.push(graphic.images);
        }

        assert!(attached.iter().all(Option::is_some));
        assert_eq!(attached[0], attached[1]);
        assert_eq!(attached[1], attached[2]);
    }

    #[tokio::test]
    async fn failed_lookups_are_cached_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let mut fetcher = MockResourceFetcher::new();
        fetcher
            .expect_fetch_json()
            .times(1)
            .returning(|_| Ok(None));
        let checker = checker_with(&dir, fetcher);

        for _ in 0..2 {
            let record = Record::Graphic(sample_graphic("G_404", ""));
            let graphic = checker.apply(record).await.unwrap().into_graphic("test").unwrap();
            assert!(graphic.images.is_none());
        }
    }

    #[tokio::test]
    async fn empty_image_id_skips_the_remote_check() {
        let dir = tempfile::tempdir().unwrap();
        let checker = checker_with(&dir, MockResourceFetcher::new());

        let mut graphic = sample_graphic("G_001", "");
        graphic.image_id = String::new();
        let out = checker
            .apply(Record::Graphic(graphic))
            .await
            .unwrap()
            .into_graphic("test")
            .unwrap();
        assert!(out.images.is_none());
    }

    #[tokio::test]
    async fn missing_sizes_become_zero_dimension_placeholders() {
        let dir = tempfile::tempdir().unwrap();
        let mut fetcher = MockResourceFetcher::new();
        fetcher
            .expect_fetch_json()
            .times(1)
            .returning(|_| Ok(Some(overall_payload())));
        let checker = checker_with(&dir, fetcher);

        let record = Record::Graphic(sample_graphic("G_001", ""));
        let graphic = checker.apply(record).await.unwrap().into_graphic("test").unwrap();
        let images = graphic.images.unwrap();
        let variant = &images.stacks["overall"].variants[0];

        for code in SIZE_CODES {
            assert!(variant.sizes.contains_key(code));
        }
        assert_eq!(variant.sizes["xs"].src, "");
        assert_eq!(variant.sizes["xs"].dimensions, Dimensions::default());
        assert_eq!(
            variant.sizes["s"].src,
            "https://lucascranach.org/imageserver/G_001/overall/G_001_s.jpg"
        );
        assert_eq!(variant.sizes["s"].dimensions, Dimensions::new(600, 450));
    }

    #[tokio::test]
    async fn cache_survives_a_round_trip_through_the_cache_file() {
        let dir = tempfile::tempdir().unwrap();

        {
            let mut fetcher = MockResourceFetcher::new();
            fetcher
                .expect_fetch_json()
                .times(1)
                .returning(|_| Ok(Some(overall_payload())));
            let checker = checker_with(&dir, fetcher);
            let record = Record::Graphic(sample_graphic("G_001", ""));
            checker.apply(record).await.unwrap();
            checker.on_done().await.unwrap();
            assert_eq!(checker.cache_len(), 0);
        }

        // A fresh instance over the same cache file needs no network at all.
        let checker = checker_with(&dir, MockResourceFetcher::new());
        assert_eq!(checker.cache_len(), 1);
        let record = Record::Graphic(sample_graphic("G_001", ""));
        let graphic = checker.apply(record).await.unwrap().into_graphic("test").unwrap();
        assert!(graphic.images.is_some());
    }

    #[tokio::test]
    async fn wrong_variant_is_a_structural_error() {
        let dir = tempfile::tempdir().unwrap();
        let checker = checker_with(&dir, MockResourceFetcher::new());
        let record = Record::Painting(crate::records::Painting::new("de", "P_001"));
        assert!(matches!(
            checker.apply(record).await.unwrap_err(),
            PipelineError::Structural { .. }
        ));
    }

    #[test]
    fn representative_stacks_wrap_the_single_variant() {
        let stack = RemoteImageStack {
            max_dimensions: Dimensions::new(100, 100),
            images: json!({
                "m": { "dimensions": { "width": 100, "height": 100 }, "src": "rep.jpg" }
            }),
        };
        let variants = raw_variants(&stack);
        assert_eq!(variants.len(), 1);
        assert_eq!(variants[0]["m"].src, "rep.jpg");
    }
}
