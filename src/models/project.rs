use std::path::Path;

use serde::{Deserialize, Serialize};

/// Project metadata stored in `.documinty/config.yml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub codebase_name: String,
}

impl ProjectConfig {
    /// Config for `root`, naming the codebase after the root directory unless a
    /// name is given.
    pub fn for_root(root: &Path, codebase_name: Option<&str>) -> Self {
        let codebase_name = match codebase_name {
            Some(name) => name.to_string(),
            None => default_codebase_name(root),
        };
        Self { codebase_name }
    }
}

fn default_codebase_name(root: &Path) -> String {
    let absolute = std::path::absolute(root).unwrap_or_else(|_| root.to_path_buf());
    absolute
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
