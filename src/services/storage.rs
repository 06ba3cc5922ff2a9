//! File storage for export results and import uploads.
//!
//! Everything lands under the media directory, which the HTTP server also
//! serves, so the URL a job records is immediately downloadable.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use uuid::Uuid;

/// Where a saved file ended up: on disk for the worker, as a URL for users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub path: PathBuf,
    pub url: String,
}

pub trait FileStorage {
    /// Persists bytes under a unique name and returns the location.
    fn save_bytes(&self, data: &[u8], filename: &str) -> io::Result<StoredFile>;
    /// Reads back a file previously saved (or uploaded) by this storage.
    fn read_bytes(&self, path: &Path) -> io::Result<Vec<u8>>;
}

#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_dir: PathBuf,
    base_url: String,
}

impl LocalStorage {
    pub fn new(base_dir: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            base_dir: base_dir.into(),
            base_url: base_url.into(),
        }
    }
}

impl FileStorage for LocalStorage {
    fn save_bytes(&self, data: &[u8], filename: &str) -> io::Result<StoredFile> {
        fs::create_dir_all(&self.base_dir)?;
        let unique = format!("{}_{filename}", Uuid::new_v4());
        let path = self.base_dir.join(&unique);
        fs::write(&path, data)?;
        let url = format!("{}/{unique}", self.base_url.trim_end_matches('/'));
        Ok(StoredFile { path, url })
    }

    fn read_bytes(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }
}
