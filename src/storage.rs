//! Storage sinks for extracted assets and the final JSON output.

use std::fs;
use std::io::Write;
use std::path::{Component, Path, PathBuf};

use serde::Serialize;

use crate::error::{Error, Result};

/// Content type used for JSON documents.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Where fonts, images and the final page JSON are written.
///
/// `put_bytes` returns the reference under which the data can later be
/// found; that reference is what ends up in `fontUrl` and image `url`
/// fields.
pub trait StorageSink {
    /// Persist `data` at `relative_path` and return its reference.
    fn put_bytes(&self, data: &[u8], relative_path: &str, content_type: &str) -> Result<String>;

    /// Serialize `value` as pretty-printed JSON and persist it.
    fn put_json<T: Serialize + ?Sized>(&self, relative_path: &str, value: &T) -> Result<String>
    where
        Self: Sized,
    {
        let data = serde_json::to_vec_pretty(value)?;
        self.put_bytes(&data, relative_path, JSON_CONTENT_TYPE)
    }
}

/// Check that `relative_path` stays below the storage root.
pub fn validate_relative_path(relative_path: &str) -> Result<&Path> {
    let path = Path::new(relative_path);
    if relative_path.is_empty() || path.is_absolute() {
        return Err(Error::InvalidPath(relative_path.to_string()));
    }

    let escapes = path.components().any(|component| {
        matches!(
            component,
            Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    });
    if escapes {
        return Err(Error::InvalidPath(relative_path.to_string()));
    }

    Ok(path)
}

/// Filesystem storage rooted at an output directory.
///
/// Every write goes through a temporary file in the target directory that
/// is renamed into place, so readers never observe a partial file.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    /// Create storage rooted at `root`. The directory is created on first
    /// write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute target for a validated relative path.
    pub fn resolve(&self, relative_path: &str) -> Result<PathBuf> {
        Ok(self.root.join(validate_relative_path(relative_path)?))
    }
}

impl StorageSink for LocalStorage {
    fn put_bytes(&self, data: &[u8], relative_path: &str, content_type: &str) -> Result<String> {
        let target = self.resolve(relative_path)?;
        let parent = target.parent().unwrap_or(&self.root);
        fs::create_dir_all(parent)?;

        let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
        tmp.write_all(data)?;
        tmp.flush()?;
        tmp.persist(&target).map_err(|e| {
            Error::Storage(format!("failed to persist {}: {}", target.display(), e.error))
        })?;

        log::debug!(
            "Stored {} bytes ({}) at {}",
            data.len(),
            content_type,
            target.display()
        );
        Ok(target.display().to_string())
    }
}

/// A sink that validates paths and returns them as references without
/// writing anything. Used for dry runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscardStorage;

impl StorageSink for DiscardStorage {
    fn put_bytes(&self, _data: &[u8], relative_path: &str, _content_type: &str) -> Result<String> {
        validate_relative_path(relative_path)?;
        Ok(relative_path.to_string())
    }
}
