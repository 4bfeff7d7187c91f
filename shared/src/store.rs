use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use tracing::{error, warn};

use crate::types::Document;

lazy_static! {
    /// In-memory mirror of each backing file, keyed by path. The mutex only
    /// guards the map itself; it is never held across a handler's
    /// load-mutate-save cycle, so interleaved handlers can still lose
    /// updates (last write wins). Single logical writer assumed.
    static ref CACHE: Mutex<HashMap<PathBuf, Document>> = Mutex::new(HashMap::new());
}

/// The content store: one JSON document on disk plus the in-process mirror.
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Store {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the current document. The first call per (process, path)
    /// reads the backing file; an absent or unparsable file is replaced by
    /// a default empty document, which is cached and written back on a
    /// best-effort basis. Later calls return the cached copy until the next
    /// successful `save`.
    pub fn load(&self) -> anyhow::Result<Document> {
        if let Some(cached) = CACHE
            .lock()
            .map_err(|_| anyhow::anyhow!("store cache poisoned"))?
            .get(&self.path)
        {
            return Ok(cached.clone());
        }

        let document = match self.read_file() {
            Ok(document) => document,
            Err(e) => {
                warn!(path = %self.path.display(), "could not read database file, starting empty: {e}");
                let document = Document::default();
                if let Err(e) = self.write_file(&document) {
                    warn!("could not seed database file: {e}");
                }
                document
            }
        };

        CACHE
            .lock()
            .map_err(|_| anyhow::anyhow!("store cache poisoned"))?
            .insert(self.path.clone(), document.clone());
        Ok(document)
    }

    /// Replaces the in-memory copy, then serializes it to the backing file.
    /// A failed write is retried exactly once; if the retry also fails the
    /// error is surfaced and the cache stays ahead of the disk.
    pub fn save(&self, document: &Document) -> anyhow::Result<()> {
        CACHE
            .lock()
            .map_err(|_| anyhow::anyhow!("store cache poisoned"))?
            .insert(self.path.clone(), document.clone());

        if let Err(first) = self.write_file(document) {
            warn!(path = %self.path.display(), "database write failed, retrying: {first}");
            if let Err(retry) = self.write_file(document) {
                error!(path = %self.path.display(), "database write retry failed: {retry}");
                return Err(retry);
            }
        }
        Ok(())
    }

    /// Backing file's mtime, for the `Last-Modified` response header.
    /// `None` when the file does not exist yet.
    pub fn last_modified(&self) -> Option<DateTime<Utc>> {
        let modified = fs::metadata(&self.path).ok()?.modified().ok()?;
        Some(modified.into())
    }

    fn read_file(&self) -> anyhow::Result<Document> {
        let raw = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    fn write_file(&self, document: &Document) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let raw = serde_json::to_string_pretty(document)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }
}
