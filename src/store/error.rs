use std::path::PathBuf;

use thiserror::Error;

/// Errors returned by [`Store`](super::Store) and its feature repository.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Feature '{0}' already exists")]
    AlreadyExists(String),

    #[error("Feature '{0}' does not exist")]
    FeatureNotFound(String),

    /// Empty or whitespace-only feature names have no usable backing file.
    #[error("Feature name '{0}' is not valid")]
    InvalidFeatureName(String),

    /// `remove_entry` found no entry with the path under the feature.
    #[error("No entries for '{path}' under feature '{feature}'")]
    NoEntries { path: String, feature: String },

    /// A method or description edit found no entry matching both path and feature.
    #[error("No documentation found for '{path}' under feature '{feature}'")]
    EntryNotFound { path: String, feature: String },

    #[error("I/O error on {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Failed to serialize document: {0}")]
    Serialize(#[from] serde_yaml::Error),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// True when the feature exists but no entry matched the request.
    pub fn is_no_match(&self) -> bool {
        matches!(self, Self::NoEntries { .. } | Self::EntryNotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
