//! Persistence and query layer over the `.documinty/` directory.
//!
//! Every operation reloads the feature file it needs, mutates the list in
//! memory and writes the whole file back. Nothing is cached between calls, and
//! a failed operation never writes.

mod error;
mod repository;

use std::fs;
use std::path::{Path, PathBuf};

use crate::models::*;

pub use error::{Result, StoreError};
pub use repository::{FeatureRepository, FEATURE_EXT};

pub const CONFIG_DIR: &str = ".documinty";
pub const CONFIG_FILE: &str = "config.yml";
pub const FEATURES_DIR: &str = "features";

pub struct Store {
    root: PathBuf,
    base_path: PathBuf,
    features: FeatureRepository,
}

impl Store {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let base_path = root.join(CONFIG_DIR);
        let features = FeatureRepository::new(base_path.join(FEATURES_DIR));
        Self {
            root,
            base_path,
            features,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The `.documinty` directory.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn features_path(&self) -> &Path {
        self.features.dir()
    }

    pub fn is_initialized(&self) -> bool {
        self.features.dir().is_dir()
    }

    // ============================================================
    // Bootstrap
    // ============================================================

    /// Create `.documinty/features/` and write `config.yml`.
    ///
    /// Safe to run on an initialized project: directories are reused and the
    /// config is rewritten.
    pub fn init(&self, codebase_name: Option<&str>) -> Result<ProjectConfig> {
        let features_path = self.features.dir();
        fs::create_dir_all(features_path).map_err(|e| StoreError::io(features_path, e))?;

        let config = ProjectConfig::for_root(&self.root, codebase_name);
        let config_path = self.base_path.join(CONFIG_FILE);
        let content = serde_yaml::to_string(&config)?;
        fs::write(&config_path, content).map_err(|e| StoreError::io(&config_path, e))?;

        tracing::info!(
            codebase = %config.codebase_name,
            path = %self.base_path.display(),
            "initialized documinty"
        );
        Ok(config)
    }

    /// Read `config.yml`, or `None` before `init`.
    pub fn config(&self) -> Result<Option<ProjectConfig>> {
        let config_path = self.base_path.join(CONFIG_FILE);
        if !config_path.exists() {
            return Ok(None);
        }
        let content =
            fs::read_to_string(&config_path).map_err(|e| StoreError::io(&config_path, e))?;
        let config = serde_yaml::from_str(&content).map_err(|source| StoreError::Parse {
            path: config_path,
            source,
        })?;
        Ok(Some(config))
    }

    // ============================================================
    // Feature operations
    // ============================================================

    /// Create a feature with no entries. Returns its name.
    pub fn add_feature(&self, name: &str) -> Result<String> {
        if name.trim().is_empty() {
            return Err(StoreError::InvalidFeatureName(name.to_string()));
        }
        self.features.create(name)?;
        tracing::debug!(feature = %name, "created feature");
        Ok(name.to_string())
    }

    pub fn list_features(&self) -> Result<Vec<String>> {
        self.features.list_names()
    }

    /// Feature names containing `query`, case-sensitive.
    pub fn search_features(&self, query: &str) -> Result<Vec<String>> {
        Ok(self
            .features
            .list_names()?
            .into_iter()
            .filter(|name| name.contains(query))
            .collect())
    }

    // ============================================================
    // Entry operations
    // ============================================================

    /// Tag a file under an existing feature.
    ///
    /// Does not check for an existing entry with the same path: repeated calls
    /// append further entries.
    pub fn add_entry(&self, input: CreateEntryInput) -> Result<Entry> {
        let feature = input.feature.clone();
        let mut entries = self.features.load(&feature)?;

        let entry = input.into_entry();
        entries.push(entry.clone());
        self.features.save(&feature, &entries)?;

        tracing::debug!(path = %entry.path, feature = %feature, "added entry");
        Ok(entry)
    }

    /// Entries for `path` across every feature, in feature listing order.
    pub fn entries_for(&self, path: &str) -> Result<Vec<Entry>> {
        let mut results = Vec::new();
        for feature in self.features.list_names()? {
            let entries = match self.features.load(&feature) {
                Ok(entries) => entries,
                // Removed between listing and loading.
                Err(StoreError::FeatureNotFound(_)) => continue,
                Err(e) => return Err(e),
            };
            for mut entry in entries.into_iter().filter(|e| e.path == path) {
                if entry.feature.is_empty() {
                    entry.feature = feature.clone();
                }
                results.push(entry);
            }
        }
        Ok(results)
    }

    pub fn entries_for_feature(&self, feature: &str) -> Result<Vec<Entry>> {
        self.features.load(feature)
    }

    /// Remove every entry for `path` under `feature`, returning what was removed.
    pub fn remove_entry(&self, path: &str, feature: &str) -> Result<Vec<Entry>> {
        let entries = self.features.load(feature)?;
        let (removed, kept): (Vec<Entry>, Vec<Entry>) =
            entries.into_iter().partition(|e| e.path == path);

        if removed.is_empty() {
            return Err(StoreError::NoEntries {
                path: path.to_string(),
                feature: feature.to_string(),
            });
        }

        self.features.save(feature, &kept)?;
        tracing::debug!(path = %path, feature = %feature, removed = removed.len(), "removed entries");
        Ok(removed)
    }

    /// Add or remove method names on the entry for `path` under `feature`.
    pub fn edit_methods(
        &self,
        path: &str,
        feature: &str,
        methods: &[String],
        action: MethodAction,
    ) -> Result<Entry> {
        self.update_entry(path, feature, |entry| entry.apply_methods(methods, action))
            .inspect(|entry| {
                tracing::debug!(
                    path = %path,
                    feature = %feature,
                    action = action.as_str(),
                    methods = ?entry.methods,
                    "edited methods"
                );
            })
    }

    /// Replace the description of the entry for `path` under `feature`.
    pub fn update_description(&self, path: &str, feature: &str, description: &str) -> Result<Entry> {
        self.update_entry(path, feature, |entry| {
            entry.description = description.to_string();
        })
        .inspect(|_| tracing::debug!(path = %path, feature = %feature, "updated description"))
    }

    /// Apply `update` to the first entry matching both `path` and `feature`, then persist.
    fn update_entry(
        &self,
        path: &str,
        feature: &str,
        update: impl FnOnce(&mut Entry),
    ) -> Result<Entry> {
        let mut entries = self.features.load(feature)?;
        let entry = entries
            .iter_mut()
            .find(|e| e.path == path && e.feature == feature)
            .ok_or_else(|| StoreError::EntryNotFound {
                path: path.to_string(),
                feature: feature.to_string(),
            })?;

        update(entry);
        let updated = entry.clone();
        self.features.save(feature, &entries)?;
        Ok(updated)
    }
}
