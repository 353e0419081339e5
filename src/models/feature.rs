use serde::{Deserialize, Serialize};

use super::Entry;

/// The document stored in `features/<name>.yml`.
///
/// A feature is nothing more than a named, ordered list of entries: the file
/// name is the feature's identity and there is no other feature record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureDocument {
    #[serde(default)]
    pub entries: Vec<Entry>,
}

impl FeatureDocument {
    pub fn new(entries: Vec<Entry>) -> Self {
        Self { entries }
    }
}
