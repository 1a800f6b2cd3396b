//! Flat JSON export, one file per language.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::errors::PipelineError;
use crate::pipeline::Sink;
use crate::records::Record;

/// Bucket label for records that carry no language.
const UNKNOWN_LANG: &str = "unknown";

/// Sink buffering records per language and writing one JSON file per
/// language when the run completes.
///
/// A destination of `out/paintings.json` produces `out/paintings.de.json`,
/// `out/paintings.en.json` and so on, each holding a JSON object with an
/// `items` array in arrival order.
#[derive(Debug)]
pub struct JsonLangSink {
    name: String,
    destination: PathBuf,
    buckets: Mutex<BTreeMap<String, Vec<serde_json::Value>>>,
}

impl JsonLangSink {
    /// Creates a sink writing next to the given destination path.
    #[must_use]
    pub fn with_destination(destination: impl Into<PathBuf>) -> Self {
        Self {
            name: "json-lang-sink".into(),
            destination: destination.into(),
            buckets: Mutex::new(BTreeMap::new()),
        }
    }

    fn lang_path(&self, lang_code: &str) -> PathBuf {
        let stem = self
            .destination
            .file_stem()
            .map_or_else(|| "export".to_string(), |stem| stem.to_string_lossy().into_owned());
        let extension = self
            .destination
            .extension()
            .map_or_else(|| "json".to_string(), |ext| ext.to_string_lossy().into_owned());
        let file_name = format!("{stem}.{lang_code}.{extension}");
        self.destination
            .parent()
            .map_or_else(|| PathBuf::from(&file_name), |parent: &Path| parent.join(&file_name))
    }

    /// Number of buffered records across all languages.
    #[must_use]
    pub fn buffered(&self) -> usize {
        self.buckets.lock().values().map(Vec::len).sum()
    }
}

#[async_trait]
impl Sink for JsonLangSink {
    fn name(&self) -> &str {
        &self.name
    }

    async fn collect(&self, item: Record) -> Result<(), PipelineError> {
        let lang_code = item.lang_code().unwrap_or(UNKNOWN_LANG).to_string();
        let value = serde_json::to_value(&item)?;
        self.buckets.lock().entry(lang_code).or_default().push(value);
        Ok(())
    }

    async fn finalize(&self) -> Result<(), PipelineError> {
        let buckets = std::mem::take(&mut *self.buckets.lock());

        if let Some(parent) = self.destination.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        for (lang_code, items) in buckets {
            let path = self.lang_path(&lang_code);
            let document = serde_json::json!({ "items": items });
            let json = serde_json::to_string_pretty(&document)?;
            std::fs::write(&path, json)?;
            info!(
                sink = %self.name,
                file = %path.display(),
                items = document["items"].as_array().map_or(0, Vec::len),
                "export written"
            );
        }
        Ok(())
    }
}
