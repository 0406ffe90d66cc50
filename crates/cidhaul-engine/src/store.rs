use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use cidhaul_core::{Cid, FileKind};

/// Flat content-addressed file store: one file per identifier, named
/// `<identifier><extension>`. Files are created once and never
/// mutated or deleted here; deletion is an external concern.
pub struct Store {
    root: PathBuf,
}

impl Store {
    /// Open the store, creating its directory if needed. An
    /// uncreatable directory fails the run before any work begins.
    pub fn open(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, cid: &Cid, kind: FileKind) -> PathBuf {
        self.root.join(format!("{}{}", cid, kind.ext()))
    }

    /// Probe for an already-materialized file under any known
    /// extension. Reads the filesystem directly, so concurrent
    /// workers need no lock here; a benign race means at worst one
    /// redundant, idempotent re-fetch.
    pub fn existing(&self, cid: &Cid) -> Option<(PathBuf, FileKind)> {
        FileKind::ALL.into_iter().find_map(|kind| {
            let path = self.path_for(cid, kind);
            path.exists().then_some((path, kind))
        })
    }

    /// Write content under its classified extension.
    pub async fn write(&self, cid: &Cid, kind: FileKind, data: &[u8]) -> io::Result<PathBuf> {
        let path = self.path_for(cid, kind);
        tokio::fs::write(&path, data).await?;
        Ok(path)
    }

    pub async fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        tokio::fs::read(path).await
    }
}
