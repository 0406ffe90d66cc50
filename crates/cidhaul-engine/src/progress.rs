use std::collections::HashSet;
use std::io;
use std::path::PathBuf;

use cidhaul_core::Cid;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{info, warn};

#[derive(Debug, Default, Serialize, Deserialize)]
struct ProgressFile {
    downloaded: Vec<Cid>,
}

/// The set of identifiers known to be fully downloaded, persisted as
/// `{"downloaded": [...]}`.
///
/// Loaded once at startup; every successful download adds to the
/// in-memory set and rewrites the whole file under the internal lock
/// (full-overwrite semantics, not an append log). The persisted set
/// is a best-effort subset of the files on disk: a crash between the
/// content write and the progress save leaves the store ahead, which
/// the existence check reconciles on the next run.
///
/// One instance per engine, injected — never a process-wide global —
/// so multiple engines can run with isolated state.
pub struct ProgressSet {
    path: PathBuf,
    inner: Mutex<HashSet<Cid>>,
}

impl ProgressSet {
    /// Load prior progress. A missing or unparseable file starts
    /// fresh; corruption is never fatal.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let set = match std::fs::read(&path) {
            Ok(bytes) => match serde_json::from_slice::<ProgressFile>(&bytes) {
                Ok(file) => {
                    info!(count = file.downloaded.len(), "progress loaded");
                    file.downloaded.into_iter().collect()
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "progress file unreadable, starting fresh"
                    );
                    HashSet::new()
                }
            },
            Err(_) => HashSet::new(),
        };
        Self {
            path,
            inner: Mutex::new(set),
        }
    }

    /// Record one completed identifier: insert under the lock, then
    /// rewrite the whole file before releasing it.
    pub async fn record(&self, cid: Cid) -> io::Result<()> {
        let mut set = self.inner.lock().await;
        set.insert(cid);
        let file = ProgressFile {
            downloaded: set.iter().cloned().collect(),
        };
        let bytes = serde_json::to_vec_pretty(&file).map_err(io::Error::from)?;
        tokio::fs::write(&self.path, bytes).await
    }

    pub async fn contains(&self, cid: &Cid) -> bool {
        self.inner.lock().await.contains(cid)
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.is_empty()
    }
}
