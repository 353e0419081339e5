//! One YAML file per feature under `.documinty/features/`.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde_yaml::Value;
use tempfile::NamedTempFile;

use super::error::{Result, StoreError};
use crate::models::{Entry, FeatureDocument};

pub const FEATURE_EXT: &str = "yml";

/// Maps feature names to their persisted entry lists.
///
/// Holds no state besides the directory: every call goes to disk.
#[derive(Debug, Clone)]
pub struct FeatureRepository {
    dir: PathBuf,
}

impl FeatureRepository {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the backing file. Names are not escaped.
    pub fn feature_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", name, FEATURE_EXT))
    }

    pub fn exists(&self, name: &str) -> bool {
        self.feature_path(name).is_file()
    }

    /// Create an empty feature file.
    ///
    /// The file is first created in place so it picks up the process umask;
    /// the save that follows keeps those permissions.
    pub fn create(&self, name: &str) -> Result<()> {
        let path = self.feature_path(name);
        match fs::OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(StoreError::AlreadyExists(name.to_string()));
            }
            Err(e) => return Err(StoreError::io(path, e)),
        }
        self.save(name, &[])
    }

    /// Read a feature's entries.
    ///
    /// An empty document, a missing `entries` key or an `entries` value that is
    /// not a list all load as an empty list.
    pub fn load(&self, name: &str) -> Result<Vec<Entry>> {
        let path = self.feature_path(name);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StoreError::FeatureNotFound(name.to_string()));
            }
            Err(e) => return Err(StoreError::io(path, e)),
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let document: Value = serde_yaml::from_str(&content).map_err(|source| StoreError::Parse {
            path: path.clone(),
            source,
        })?;

        match document.get("entries") {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(entries @ Value::Sequence(_)) => serde_yaml::from_value(entries.clone())
                .map_err(|source| StoreError::Parse { path, source }),
            Some(_) => {
                tracing::warn!(feature = %name, "entries is not a list, treating as empty");
                Ok(Vec::new())
            }
        }
    }

    /// Replace a feature's file with `entries`.
    ///
    /// The document is written to a temporary file in the same directory and
    /// renamed over the target, so readers see either the old or the new list.
    /// The target's permissions carry over to the replacement.
    pub fn save(&self, name: &str, entries: &[Entry]) -> Result<()> {
        let path = self.feature_path(name);
        let content = serde_yaml::to_string(&FeatureDocument::new(entries.to_vec()))?;

        let mut file = NamedTempFile::new_in(&self.dir).map_err(|e| StoreError::io(&self.dir, e))?;
        file.write_all(content.as_bytes())
            .map_err(|e| StoreError::io(file.path(), e))?;

        let permissions = match fs::metadata(&path) {
            Ok(metadata) => Some(metadata.permissions()),
            Err(e) if e.kind() == ErrorKind::NotFound => new_file_permissions(),
            Err(e) => return Err(StoreError::io(&path, e)),
        };
        if let Some(permissions) = permissions {
            file.as_file()
                .set_permissions(permissions)
                .map_err(|e| StoreError::io(file.path(), e))?;
        }
        file.as_file()
            .sync_all()
            .map_err(|e| StoreError::io(file.path(), e))?;

        file.persist(&path)
            .map_err(|e| StoreError::io(&path, e.error))?;

        tracing::debug!(feature = %name, entries = entries.len(), "saved feature file");
        Ok(())
    }

    /// Names of all feature files, extension stripped, sorted.
    ///
    /// A missing directory has no features.
    pub fn list_names(&self) -> Result<Vec<String>> {
        let read_dir = match fs::read_dir(&self.dir) {
            Ok(read_dir) => read_dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::io(&self.dir, e)),
        };

        let mut names = Vec::new();
        for dir_entry in read_dir {
            let path = dir_entry.map_err(|e| StoreError::io(&self.dir, e))?.path();
            if !path.is_file() || path.extension().and_then(|ext| ext.to_str()) != Some(FEATURE_EXT)
            {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}

/// Mode for a feature file saved without an existing target.
#[cfg(unix)]
fn new_file_permissions() -> Option<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn new_file_permissions() -> Option<fs::Permissions> {
    None
}
