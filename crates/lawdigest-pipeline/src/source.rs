//! Where listings and content documents come from.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use lawdigest_core::ProcessingPeriod;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum SourceError {
    #[cfg(feature = "http")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("listing {0} has no law id or detail link")]
    IncompleteListing(String),
    #[error("unexpected response shape: {0}")]
    Shape(String),
}

/// One search-result row: enough to fetch the document's content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LawListing {
    #[serde(rename = "법령ID")]
    pub law_id: Option<String>,
    /// Serial number (법령일련번호), distinguishing revisions of one law.
    #[serde(rename = "법령일련번호")]
    pub mst: Option<String>,
    #[serde(rename = "법령상세링크")]
    pub detail_link: Option<String>,
    #[serde(rename = "법령명한글")]
    pub name: Option<String>,
}

impl LawListing {
    /// Read a listing row, accepting numeric or string field values.
    pub fn from_value(row: &Value) -> Self {
        let field = |key: &str| match row.get(key) {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        };
        Self {
            law_id: field("법령ID"),
            mst: field("법령일련번호"),
            detail_link: field("법령상세링크"),
            name: field("법령명한글"),
        }
    }

    pub fn is_fetchable(&self) -> bool {
        self.law_id.is_some() && self.detail_link.is_some()
    }

    /// Best human-readable label for logs.
    pub fn label(&self) -> &str {
        self.name
            .as_deref()
            .or(self.law_id.as_deref())
            .unwrap_or("unknown")
    }
}

/// Collaborator supplying listings and content for a period.
#[async_trait]
pub trait LawSource: Send + Sync {
    async fn list(&self, period: ProcessingPeriod) -> Result<Vec<LawListing>, SourceError>;

    async fn fetch_content(&self, listing: &LawListing) -> Result<Value, SourceError>;
}

// ── Directory source ──

/// Content documents stored as `<root>/<YYYY-MM>/*.json`, one per file.
///
/// Listings are the files in name order; each listing's detail link is the
/// file path.
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn period_dir(&self, period: ProcessingPeriod) -> PathBuf {
        self.root.join(period.to_string())
    }
}

/// `*.json` files directly under `dir`, sorted by file name.
pub async fn json_files(dir: &Path) -> Result<Vec<PathBuf>, SourceError> {
    let io_err = |source| SourceError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut entries = tokio::fs::read_dir(dir).await.map_err(io_err)?;
    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(io_err)? {
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Read and parse one JSON file.
pub async fn read_json(path: &Path) -> Result<Value, SourceError> {
    let bytes = tokio::fs::read(path).await.map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[async_trait]
impl LawSource for DirSource {
    async fn list(&self, period: ProcessingPeriod) -> Result<Vec<LawListing>, SourceError> {
        let dir = self.period_dir(period);
        if !dir.is_dir() {
            warn!(dir = %dir.display(), "no source directory for period");
            return Ok(Vec::new());
        }
        let listings: Vec<LawListing> = json_files(&dir)
            .await?
            .into_iter()
            .map(|path| LawListing {
                law_id: path.file_stem().map(|s| s.to_string_lossy().into_owned()),
                mst: None,
                detail_link: Some(path.display().to_string()),
                name: None,
            })
            .collect();
        info!(dir = %dir.display(), count = listings.len(), "listed source files");
        Ok(listings)
    }

    async fn fetch_content(&self, listing: &LawListing) -> Result<Value, SourceError> {
        let link = listing
            .detail_link
            .as_deref()
            .ok_or_else(|| SourceError::IncompleteListing(listing.label().to_string()))?;
        read_json(Path::new(link)).await
    }
}

// ── Content fan-out ──

/// Success and failure counts of one content fetch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchTally {
    pub success_count: usize,
    pub error_count: usize,
}

impl FetchTally {
    fn record(mut self, ok: bool) -> Self {
        if ok {
            self.success_count += 1;
        } else {
            self.error_count += 1;
        }
        self
    }
}

/// Fetched content documents, in listing order, plus the tally.
#[derive(Debug, Clone, Default)]
pub struct FetchedContents {
    pub documents: Vec<Value>,
    pub tally: FetchTally,
}

/// Fetch content for every listing with at most `workers` requests in flight.
///
/// Results keep listing order. Failures are logged and counted, never fatal.
pub async fn fetch_contents(
    source: &dyn LawSource,
    listings: &[LawListing],
    workers: usize,
) -> FetchedContents {
    let results: Vec<Result<Value, SourceError>> = stream::iter(listings)
        .map(|listing| async move {
            if !listing.is_fetchable() {
                return Err(SourceError::IncompleteListing(listing.label().to_string()));
            }
            source.fetch_content(listing).await
        })
        .buffered(workers.max(1))
        .collect()
        .await;

    let tally = results
        .iter()
        .fold(FetchTally::default(), |t, r| t.record(r.is_ok()));

    let documents = results
        .into_iter()
        .zip(listings)
        .filter_map(|(result, listing)| match result {
            Ok(doc) => Some(doc),
            Err(e) => {
                warn!(law = listing.label(), error = %e, "content fetch failed");
                None
            }
        })
        .collect();

    info!(
        success = tally.success_count,
        errors = tally.error_count,
        "content fetch complete"
    );
    FetchedContents { documents, tally }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn period() -> ProcessingPeriod {
        ProcessingPeriod::new(2024, 12).unwrap()
    }

    fn write_doc(dir: &Path, name: &str, key: &str) {
        let body = json!({"법령": {"법령키": key, "기본정보": {"법령명_한글": format!("{key} 법")}}});
        std::fs::write(dir.join(name), body.to_string()).unwrap();
    }

    #[test]
    fn listing_from_value_accepts_numbers() {
        let row = json!({"법령ID": "001234", "법령일련번호": 265959, "법령상세링크": "/DRF/x", "법령명한글": " "});
        let listing = LawListing::from_value(&row);
        assert_eq!(listing.law_id.as_deref(), Some("001234"));
        assert_eq!(listing.mst.as_deref(), Some("265959"));
        assert_eq!(listing.name, None);
        assert!(listing.is_fetchable());
        assert_eq!(listing.label(), "001234");
    }

    #[test]
    fn listing_serializes_with_source_field_names() {
        let listing = LawListing {
            law_id: Some("1".into()),
            ..Default::default()
        };
        let json = serde_json::to_value(&listing).unwrap();
        assert_eq!(json["법령ID"], "1");
    }

    #[tokio::test]
    async fn dir_source_lists_sorted_json_files() {
        let tmp = tempfile::TempDir::new().unwrap();
        let dir = tmp.path().join("2024-12");
        std::fs::create_dir(&dir).unwrap();
        write_doc(&dir, "b.json", "002");
        write_doc(&dir, "a.json", "001");
        std::fs::write(dir.join("notes.txt"), "ignored").unwrap();

        let source = DirSource::new(tmp.path());
        let listings = source.list(period()).await.unwrap();
        assert_eq!(listings.len(), 2);
        assert_eq!(listings[0].law_id.as_deref(), Some("a"));

        let doc = source.fetch_content(&listings[0]).await.unwrap();
        assert_eq!(doc["법령"]["법령키"], "001");
    }

    #[tokio::test]
    async fn dir_source_missing_period_is_empty() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = DirSource::new(tmp.path());
        assert!(source.list(period()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn fan_out_keeps_order_and_tallies() {
        let tmp = tempfile::TempDir::new().unwrap();
        let dir = tmp.path().join("2024-12");
        std::fs::create_dir(&dir).unwrap();
        for i in 0..6 {
            write_doc(&dir, &format!("{i:02}.json"), &format!("{i:03}"));
        }
        std::fs::write(dir.join("99.json"), "{not json").unwrap();

        let source = DirSource::new(tmp.path());
        let mut listings = source.list(period()).await.unwrap();
        listings.push(LawListing {
            name: Some("링크 없음".into()),
            ..Default::default()
        });

        let fetched = fetch_contents(&source, &listings, 3).await;
        assert_eq!(fetched.tally.success_count, 6);
        assert_eq!(fetched.tally.error_count, 2);
        let keys: Vec<&str> = fetched
            .documents
            .iter()
            .map(|d| d["법령"]["법령키"].as_str().unwrap())
            .collect();
        assert_eq!(keys, vec!["000", "001", "002", "003", "004", "005"]);
    }

    #[tokio::test]
    async fn zero_workers_still_makes_progress() {
        let fetched = fetch_contents(&DirSource::new("/nonexistent"), &[], 0).await;
        assert_eq!(fetched.tally, FetchTally::default());
    }
}
