//! Append-only post store with URL deduplication
//!
//! Rows are JSON Lines, one `PostRecord` per line. Existing rows are never
//! rewritten: a run loads every URL already on disk, then only appends rows
//! for URLs it has not seen.

pub mod record;

use dashmap::DashSet;
use log::{debug, info, warn};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tokio::time::timeout;

pub use record::{CommentSlots, PostRecord};

/// Timeout for blocking JSON serialization
/// Prevents hangs on pathological data structures
const BLOCKING_SERIALIZATION_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize store row: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Serialization task failed: {0}")]
    Task(String),
}

impl StoreError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Outcome of one append
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AppendOutcome {
    pub written: usize,
    /// Rows skipped because their URL is already persisted
    pub skipped: usize,
}

pub struct PostStore {
    path: PathBuf,
    /// URLs persisted on disk or claimed by the current run
    known: DashSet<String>,
    /// URLs with a row on disk
    persisted: DashSet<String>,
    /// The file's last line was not newline-terminated when loaded
    needs_separator: AtomicBool,
    write_lock: Mutex<()>,
}

impl PostStore {
    /// Open (or prepare) the store at `path`, loading every persisted URL
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let store = Self {
            path,
            known: DashSet::new(),
            persisted: DashSet::new(),
            needs_separator: AtomicBool::new(false),
            write_lock: Mutex::new(()),
        };

        if let Some(parent) = store.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::io(parent, e))?;
        }

        if !tokio::fs::try_exists(&store.path)
            .await
            .map_err(|e| StoreError::io(&store.path, e))?
        {
            info!("No existing posts file found at {}, starting fresh", store.path.display());
            return Ok(store);
        }

        info!("Loading existing posts from {}", store.path.display());
        let content = tokio::fs::read_to_string(&store.path)
            .await
            .map_err(|e| StoreError::io(&store.path, e))?;
        store
            .needs_separator
            .store(!content.is_empty() && !content.ends_with('\n'), Ordering::Relaxed);

        for record in parse_rows(&content, &store.path) {
            store.known.insert(record.url.clone());
            store.persisted.insert(record.url);
        }
        info!("Loaded {} existing posts", store.persisted.len());

        Ok(store)
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the URL is persisted or already claimed by this run
    #[must_use]
    pub fn contains(&self, url: &str) -> bool {
        self.known.contains(url)
    }

    /// Claim a URL for this run; `false` if it is already known
    ///
    /// Exact string match, no normalisation.
    pub fn claim(&self, url: &str) -> bool {
        self.known.insert(url.to_string())
    }

    /// Number of URLs persisted on disk
    #[must_use]
    pub fn persisted_len(&self) -> usize {
        self.persisted.len()
    }

    /// Append rows, skipping any URL that already has a row
    pub async fn append(&self, records: &[PostRecord]) -> Result<AppendOutcome, StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut outcome = AppendOutcome::default();
        let mut buffer = String::new();
        if self.needs_separator.load(Ordering::Relaxed) {
            buffer.push('\n');
        }

        let mut written_urls = Vec::with_capacity(records.len());
        for record in records {
            if self.persisted.contains(&record.url) || written_urls.contains(&&record.url) {
                outcome.skipped += 1;
                continue;
            }
            buffer.push_str(&serde_json::to_string(record)?);
            buffer.push('\n');
            written_urls.push(&record.url);
        }

        if written_urls.is_empty() {
            return Ok(outcome);
        }

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| StoreError::io(&self.path, e))?;
        file.write_all(buffer.as_bytes())
            .await
            .map_err(|e| StoreError::io(&self.path, e))?;
        file.flush().await.map_err(|e| StoreError::io(&self.path, e))?;
        file.sync_data()
            .await
            .map_err(|e| StoreError::io(&self.path, e))?;

        self.needs_separator.store(false, Ordering::Relaxed);
        for url in written_urls {
            self.known.insert(url.clone());
            self.persisted.insert(url.clone());
        }
        outcome.written = records.len() - outcome.skipped;
        debug!("Appended {} rows to {}", outcome.written, self.path.display());

        Ok(outcome)
    }
}

fn parse_rows(content: &str, path: &Path) -> Vec<PostRecord> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .filter_map(|(index, line)| match serde_json::from_str::<PostRecord>(line) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Skipping malformed row {} in {}: {e}", index + 1, path.display());
                None
            }
        })
        .collect()
}

/// Read every row of a store file, in file order
pub async fn load_records(path: &Path) -> Result<Vec<PostRecord>, StoreError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| StoreError::io(path, e))?;
    Ok(parse_rows(&content, path))
}

/// Write a complete JSON Lines file, replacing whatever was at `path`
///
/// Used for derived datasets only; the raw store is append-only.
pub async fn write_json_lines<T>(path: &Path, rows: Vec<T>) -> Result<(), StoreError>
where
    T: Serialize + Send + 'static,
{
    // Serialization (keep spawn_blocking - CPU intensive for large batches)
    let blocking_task = tokio::task::spawn_blocking(move || -> Result<String, serde_json::Error> {
        let mut out = String::new();
        for row in &rows {
            out.push_str(&serde_json::to_string(row)?);
            out.push('\n');
        }
        Ok(out)
    });

    let content = match timeout(BLOCKING_SERIALIZATION_TIMEOUT, blocking_task).await {
        Ok(Ok(result)) => result?,
        Ok(Err(e)) => return Err(StoreError::Task(format!("serialization task panicked: {e}"))),
        Err(_) => {
            warn!("JSON Lines serialization timeout (timeout: {BLOCKING_SERIALIZATION_TIMEOUT:?})");
            return Err(StoreError::Task(format!(
                "serialization timed out after {BLOCKING_SERIALIZATION_TIMEOUT:?}"
            )));
        }
    };

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| StoreError::io(parent, e))?;
    }
    tokio::fs::write(path, content)
        .await
        .map_err(|e| StoreError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comment_tree::reconstruct;
    use crate::page_extractor::{CommentRecord, PostSummary};
    use tempfile::TempDir;

    fn record(url: &str) -> PostRecord {
        PostRecord::from(PostSummary {
            title: format!("title {url}"),
            url: url.to_string(),
            subreddit: "r/test".into(),
            timestamp: "2025-01-01T00:00:00Z".into(),
            vote_count: 1,
            comment_count: 0,
        })
    }

    #[tokio::test]
    async fn append_never_duplicates_urls() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("output.jsonl");

        let store = PostStore::open(&path).await.unwrap();
        let first = store.append(&[record("u1"), record("u2"), record("u1")]).await.unwrap();
        assert_eq!(first, AppendOutcome { written: 2, skipped: 1 });

        let second = store.append(&[record("u2"), record("u3")]).await.unwrap();
        assert_eq!(second, AppendOutcome { written: 1, skipped: 1 });

        let rows = load_records(&path).await.unwrap();
        let urls: Vec<&str> = rows.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(urls, vec!["u1", "u2", "u3"]);
    }

    #[tokio::test]
    async fn reopen_loads_existing_urls_for_dedup() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("output.jsonl");

        let store = PostStore::open(&path).await.unwrap();
        store.append(&[record("u1")]).await.unwrap();
        drop(store);

        let reopened = PostStore::open(&path).await.unwrap();
        assert!(reopened.contains("u1"));
        assert!(!reopened.claim("u1"));
        assert!(reopened.claim("u2"));
        assert!(!reopened.claim("u2"));
        assert_eq!(reopened.persisted_len(), 1);
    }

    #[tokio::test]
    async fn truncated_last_line_is_skipped_and_separated() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("output.jsonl");
        let good = serde_json::to_string(&record("u1")).unwrap();
        tokio::fs::write(&path, format!("{good}\n{{\"url\":\"u2\""))
            .await
            .unwrap();

        let store = PostStore::open(&path).await.unwrap();
        assert!(store.contains("u1"));
        assert!(!store.contains("u2"));

        store.append(&[record("u3")]).await.unwrap();
        let urls: Vec<String> = load_records(&path).await.unwrap().into_iter().map(|r| r.url).collect();
        assert_eq!(urls, vec!["u1", "u3"]);
    }

    #[tokio::test]
    async fn deeply_nested_thread_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("output.jsonl");

        let chain: Vec<CommentRecord> = (0..70u32)
            .map(|depth| CommentRecord {
                id: format!("t1_{depth}"),
                parent_id: depth.checked_sub(1).map(|p| format!("t1_{p}")).unwrap_or_default(),
                depth,
                body: format!("level {depth}"),
                ..CommentRecord::default()
            })
            .collect();
        let mut deep = record("u-deep");
        deep.attach_comments(reconstruct(chain).roots, 70);

        let store = PostStore::open(&path).await.unwrap();
        assert_eq!(store.append(std::slice::from_ref(&deep)).await.unwrap().written, 1);
        drop(store);

        let reopened = PostStore::open(&path).await.unwrap();
        assert!(reopened.contains("u-deep"));
        assert_eq!(reopened.persisted_len(), 1);
        let again = reopened.append(&[deep]).await.unwrap();
        assert_eq!(again, AppendOutcome { written: 0, skipped: 1 });

        let rows = load_records(&path).await.unwrap();
        assert_eq!(rows.len(), 1);
        let thread = rows[0].comments.comment_1.as_ref().unwrap();
        assert_eq!(thread.subtree_len(), 70);
    }
}
