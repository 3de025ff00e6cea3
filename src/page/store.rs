//! File-backed page storage
//!
//! One file per page, `{title}.txt`, holding the raw body bytes. No cache, no locks:
//! every call hits the file system and the last writer wins.

use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use super::{Page, Title};

const PAGE_EXTENSION: &str = "txt";

/// Storage failures. The `Display` text is what clients see on a failed save.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("page {title} not found")]
    NotFound { title: String },

    #[error("read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
}

/// Page persistence rooted at a single directory
#[derive(Debug, Clone)]
pub struct PageStore {
    root: PathBuf,
}

impl PageStore {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// File that backs the page with this title
    pub fn path_for(&self, title: &Title) -> PathBuf {
        self.root.join(format!("{title}.{PAGE_EXTENSION}"))
    }

    /// Read a page from disk
    pub async fn load(&self, title: &Title) -> Result<Page, StoreError> {
        let path = self.path_for(title);
        match fs::read(&path).await {
            Ok(body) => Ok(Page::new(title.clone(), body)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(StoreError::NotFound {
                title: title.to_string(),
            }),
            Err(source) => Err(StoreError::Read { path, source }),
        }
    }

    /// Write a page to disk, replacing whatever was there
    ///
    /// New files are created owner read/write only (0600).
    pub async fn save(&self, page: &Page) -> Result<(), StoreError> {
        let path = self.path_for(&page.title);
        write_private(&path, &page.body)
            .await
            .map_err(|source| StoreError::Write { path, source })
    }
}

async fn write_private(path: &Path, body: &[u8]) -> io::Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(0o600);

    let mut file = options.open(path).await?;
    file.write_all(body).await?;
    file.flush().await
}
