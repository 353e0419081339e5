use serde::{Deserialize, Serialize};

/// A documentation tag for one file under one feature.
///
/// The same path may appear under several features, and even several times
/// under the same feature: entries are never deduplicated on `(path, feature)`.
/// Every field falls back to its default when missing so that hand-edited
/// feature files still load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Path of the documented file, relative to the project root.
    #[serde(default)]
    pub path: String,
    /// Free-form node/type label such as `model` or `controller`.
    #[serde(default)]
    pub node: String,
    #[serde(default)]
    pub feature: String,
    /// Method names. Treated as a set; kept in insertion order for display.
    #[serde(default)]
    pub methods: Vec<String>,
    #[serde(default)]
    pub description: String,
    /// ISO-8601 timestamp supplied by the caller when the entry was created.
    #[serde(default)]
    pub timestamp: String,
}

impl Entry {
    /// Union `methods` into this entry's methods.
    ///
    /// Existing methods keep their position; new distinct names are appended in
    /// the order given. Matching is exact and case-sensitive.
    pub fn add_methods(&mut self, methods: &[String]) {
        for method in methods {
            if !self.methods.contains(method) {
                self.methods.push(method.clone());
            }
        }
    }

    /// Drop every method named in `methods`. Names not present are ignored.
    pub fn remove_methods(&mut self, methods: &[String]) {
        self.methods.retain(|m| !methods.contains(m));
    }

    pub fn apply_methods(&mut self, methods: &[String], action: MethodAction) {
        match action {
            MethodAction::Add => self.add_methods(methods),
            MethodAction::Remove => self.remove_methods(methods),
        }
    }
}

/// How `edit_methods` combines the given names with an entry's methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodAction {
    Add,
    Remove,
}

impl MethodAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Remove => "remove",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "add" => Some(Self::Add),
            "remove" => Some(Self::Remove),
            _ => None,
        }
    }
}

/// Input for tagging a file under a feature.
#[derive(Debug, Clone)]
pub struct CreateEntryInput {
    pub path: String,
    pub node: String,
    /// Name of an existing feature.
    pub feature: String,
    pub methods: Vec<String>,
    /// Set by the caller; the store never generates timestamps.
    pub timestamp: String,
    /// Trimmed before it is stored.
    pub description: String,
}

impl CreateEntryInput {
    /// Build the entry to persist: description trimmed, duplicate methods collapsed.
    pub fn into_entry(self) -> Entry {
        let mut entry = Entry {
            path: self.path,
            node: self.node,
            feature: self.feature,
            methods: Vec::new(),
            description: self.description.trim().to_string(),
            timestamp: self.timestamp,
        };
        entry.add_methods(&self.methods);
        entry
    }
}

/// Split comma-separated method names, trimming each and dropping empty pieces.
pub fn parse_methods(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn entry_with(methods: &[&str]) -> Entry {
        Entry {
            path: "app/models/user.rb".to_string(),
            methods: strings(methods),
            ..Default::default()
        }
    }

    #[test]
    fn test_add_methods_appends_new_names_in_order() {
        let mut entry = entry_with(&["a", "b"]);
        entry.add_methods(&strings(&["c", "a", "d", "c"]));
        assert_eq!(entry.methods, strings(&["a", "b", "c", "d"]));
    }

    #[test]
    fn test_add_methods_is_case_sensitive() {
        let mut entry = entry_with(&["call"]);
        entry.add_methods(&strings(&["Call"]));
        assert_eq!(entry.methods, strings(&["call", "Call"]));
    }

    #[test]
    fn test_remove_methods_ignores_missing_names() {
        let mut entry = entry_with(&["a", "b"]);
        entry.remove_methods(&strings(&["b", "zzz"]));
        assert_eq!(entry.methods, strings(&["a"]));
    }

    #[test]
    fn test_into_entry_trims_description_and_collapses_methods() {
        let entry = CreateEntryInput {
            path: "login.rb".to_string(),
            node: "controller".to_string(),
            feature: "auth".to_string(),
            methods: strings(&["call", "call", "new"]),
            timestamp: "2025-01-01T00:00:00Z".to_string(),
            description: "  Handles login \n".to_string(),
        }
        .into_entry();

        assert_eq!(entry.description, "Handles login");
        assert_eq!(entry.methods, strings(&["call", "new"]));
    }

    #[test]
    fn test_parse_methods() {
        assert_eq!(parse_methods(" foo, bar ,,baz, "), strings(&["foo", "bar", "baz"]));
        assert!(parse_methods("").is_empty());
        assert!(parse_methods(" , ").is_empty());
    }

    #[test]
    fn test_method_action_parse() {
        assert_eq!(MethodAction::parse("add"), Some(MethodAction::Add));
        assert_eq!(MethodAction::parse("remove"), Some(MethodAction::Remove));
        assert_eq!(MethodAction::parse("delete"), None);
        assert_eq!(MethodAction::Remove.as_str(), "remove");
    }
}
