//! Plain-text rendering of entries for terminal output.

use std::path::Path;

use crate::models::Entry;

/// Descriptions longer than this are cut in detailed views.
pub const MAX_DESC_LENGTH: usize = 80;

const SEPARATOR_WIDTH: usize = 40;

/// Cut `text` to [`MAX_DESC_LENGTH`] characters, marking the cut with `(…)`.
pub fn truncate(text: &str) -> String {
    if text.chars().count() <= MAX_DESC_LENGTH {
        return text.to_string();
    }
    let head: String = text.chars().take(MAX_DESC_LENGTH).collect();
    format!("{}(…)", head)
}

/// Detailed block for `show`, ending with a separator line.
///
/// Description and methods lines are omitted when empty.
pub fn render_entry(entry: &Entry) -> String {
    let mut output = String::new();
    push_field(&mut output, "File📄", &entry.path);
    push_field(&mut output, "Node type⚙️", &entry.node);
    push_field(&mut output, "Features🏷️", &entry.feature);
    if !entry.description.is_empty() {
        push_field(&mut output, "Description📝", &truncate(&entry.description));
    }
    if !entry.methods.is_empty() {
        push_field(&mut output, "Methods🛠️", &entry.methods.join(", "));
    }
    push_field(&mut output, "Tagged at⏰", &entry.timestamp);
    output.push_str(&"-".repeat(SEPARATOR_WIDTH));
    output.push('\n');
    output
}

fn push_field(output: &mut String, label: &str, value: &str) {
    output.push_str(label);
    output.push_str(": ");
    output.push_str(value);
    output.push('\n');
}

/// One line per entry for `show-feature`.
pub fn render_feature_line(entry: &Entry) -> String {
    format!("📄{} | ({}) – {}", entry.path, entry.node, entry.description)
}

/// Description view for `describe`.
///
/// The owning feature is named unless the listing is already filtered to one.
pub fn render_description(path: &str, entry: &Entry, filtered: bool) -> String {
    let description = entry.description.trim();
    if description.is_empty() {
        return format!(
            "ℹ️  No description provided for '{}' under '{}'\n",
            path, entry.feature
        );
    }

    let heading = if filtered {
        format!("📋 {}", path)
    } else {
        format!("📋 {} : (FEATURE: {})", path, entry.feature)
    };
    format!("{}\n--→ {}\n", heading, description)
}

/// Group entry paths by parent directory, keeping first-seen order.
///
/// Files at the top level group under `.`. Each group lists file names.
pub fn group_by_directory(entries: &[Entry]) -> Vec<(String, Vec<String>)> {
    let mut groups: Vec<(String, Vec<String>)> = Vec::new();
    for entry in entries {
        let path = Path::new(&entry.path);
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_string_lossy().into_owned(),
            _ => ".".to_string(),
        };
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| entry.path.clone());

        match groups.iter_mut().find(|(d, _)| *d == dir) {
            Some((_, files)) => files.push(file_name),
            None => groups.push((dir, vec![file_name])),
        }
    }
    groups
}

/// Directory-grouped view for `involved`.
///
/// Example output:
/// ```text
/// 🔖 auth
/// 📁 app/controllers
///     📄 sessions_controller.rb
/// 📁 app/models
///     📄 user.rb
/// ```
pub fn render_involved(feature: &str, entries: &[Entry]) -> String {
    let mut output = format!("🔖 {}\n", feature);
    for (dir, files) in group_by_directory(entries) {
        output.push_str(&format!("📁 {}\n", dir));
        for file in files {
            output.push_str(&format!("    📄 {}\n", file));
        }
    }
    output
}
