//! Command-line surface for the `dmt` binary.
//!
//! Commands go through [`Runner`], which talks to the [`Store`] only through
//! its public API, asks for free text through a [`Prompt`] and writes to any
//! [`Write`] sink.

mod prompt;
pub mod render;

use std::io::Write;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::{Local, SecondsFormat};
use clap::{Parser, Subcommand};

use crate::models::*;
use crate::store::{Store, StoreError};

pub use prompt::{Prompt, ScriptedPrompt, StdinPrompt};

pub const DESCRIPTION_PROMPT: &str = "Enter a brief description for this node⚙️:";
pub const METHODS_PROMPT: &str =
    "Enter comma-separated methods for this node (or leave blank if none)🛠️:";
pub const EDIT_METHODS_PROMPT: &str = "Enter comma-separated methods to add to this node🛠️:";

#[derive(Parser)]
#[command(name = "dmt")]
#[command(about = "Lightweight per-feature documentation for the files in your codebase")]
#[command(version)]
pub struct Cli {
    /// Project root holding the `.documinty` directory (defaults to the current directory)
    #[arg(long, global = true, env = "DOCUMINTY_ROOT", value_name = "DIR")]
    pub root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Initialize documinty in your project
    Init {
        /// Custom codebase name
        #[arg(short, long)]
        codebase: Option<String>,
    },
    /// Create a new feature for tagging
    #[command(alias = "feature")]
    Feat { name: String },
    /// List all defined features
    Features,
    /// Tag FILE under an existing feature
    #[command(alias = "document")]
    Doc {
        path: String,
        /// Feature name to group under
        #[arg(short, long)]
        feature: String,
        /// Node/type label
        #[arg(short, long)]
        node: String,
        /// Description (prompted for when omitted)
        #[arg(short, long)]
        description: Option<String>,
        /// Comma-separated methods (prompted for when omitted)
        #[arg(short, long)]
        methods: Option<String>,
    },
    /// Display documentation for FILE
    Show {
        path: String,
        /// Only show documentation under this feature
        #[arg(short, long)]
        feature: Option<String>,
        /// Print entries as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove FILE's tag from an existing feature
    Untag {
        path: String,
        #[arg(short, long)]
        feature: String,
    },
    /// List all files documented under FEATURE
    #[command(alias = "show_feature")]
    ShowFeature {
        feature: String,
        /// Print entries as JSON
        #[arg(long)]
        json: bool,
    },
    /// Display files under FEATURE grouped by directory
    #[command(alias = "involved_f")]
    Involved { feature: String },
    /// List all features whose name contains QUERY
    #[command(alias = "search_f")]
    Search { query: String },
    /// Add or remove methods on a tagged file
    Methods {
        path: String,
        #[arg(short, long)]
        feature: String,
        /// `add` or `remove`
        #[arg(short, long)]
        action: String,
        /// Comma-separated methods (prompted for when omitted)
        #[arg(short, long)]
        methods: Option<String>,
    },
    /// Display only the description for FILE
    Describe {
        path: String,
        /// Only show the description under this feature
        #[arg(short, long)]
        feature: Option<String>,
    },
    /// Update the description for FILE under a feature
    #[command(alias = "update_description")]
    UpdateDescription {
        path: String,
        #[arg(short, long)]
        feature: String,
        /// New description (prompted for when omitted)
        #[arg(short, long)]
        description: Option<String>,
    },
}

/// Executes one command against a store.
pub struct Runner<'a, P, W> {
    store: &'a Store,
    prompt: P,
    out: W,
}

impl<'a, P: Prompt, W: Write> Runner<'a, P, W> {
    pub fn new(store: &'a Store, prompt: P, out: W) -> Self {
        Self { store, prompt, out }
    }

    pub fn prompt(&self) -> &P {
        &self.prompt
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn run(&mut self, command: Commands) -> Result<()> {
        if !matches!(command, Commands::Init { .. }) && !self.store.is_initialized() {
            bail!(
                "documinty is not initialized in {}. Run `dmt init` first",
                self.store.root().display()
            );
        }

        tracing::debug!(?command, "running command");
        match command {
            Commands::Init { codebase } => self.init(codebase.as_deref()),
            Commands::Feat { name } => self.feat(&name),
            Commands::Features => self.features(),
            Commands::Doc {
                path,
                feature,
                node,
                description,
                methods,
            } => self.doc(path, feature, node, description, methods),
            Commands::Show {
                path,
                feature,
                json,
            } => self.show(&path, feature.as_deref(), json),
            Commands::Untag { path, feature } => self.untag(&path, &feature),
            Commands::ShowFeature { feature, json } => self.show_feature(&feature, json),
            Commands::Involved { feature } => self.involved(&feature),
            Commands::Search { query } => self.search(&query),
            Commands::Methods {
                path,
                feature,
                action,
                methods,
            } => self.methods(&path, &feature, &action, methods),
            Commands::Describe { path, feature } => self.describe(&path, feature.as_deref()),
            Commands::UpdateDescription {
                path,
                feature,
                description,
            } => self.update_description(&path, &feature, description),
        }
    }

    fn init(&mut self, codebase: Option<&str>) -> Result<()> {
        let config = self.store.init(codebase)?;
        writeln!(
            self.out,
            "✅ Initialized documinty for '{}' at {}",
            config.codebase_name,
            self.store.base_path().display()
        )?;
        Ok(())
    }

    fn feat(&mut self, name: &str) -> Result<()> {
        match self.store.add_feature(name) {
            Ok(name) => writeln!(self.out, "✅ Created feature '{}'", name)?,
            Err(e @ StoreError::AlreadyExists(_)) => writeln!(self.out, "⚠️ {}", e)?,
            Err(e) => return Err(e.into()),
        }
        Ok(())
    }

    fn features(&mut self) -> Result<()> {
        let features = self.store.list_features()?;
        if features.is_empty() {
            writeln!(self.out, "No features defined.")?;
            return Ok(());
        }

        match self.store.config()? {
            Some(config) => writeln!(self.out, "Defined features for '{}':", config.codebase_name)?,
            None => writeln!(self.out, "Defined features:")?,
        }
        for feature in features {
            writeln!(self.out, "• {}", feature)?;
        }
        Ok(())
    }

    fn doc(
        &mut self,
        path: String,
        feature: String,
        node: String,
        description: Option<String>,
        methods: Option<String>,
    ) -> Result<()> {
        let description = self.answer(description, DESCRIPTION_PROMPT)?;
        let methods = self.answer(methods, METHODS_PROMPT)?;

        let entry = self.store.add_entry(CreateEntryInput {
            path,
            node,
            feature,
            methods: parse_methods(&methods),
            timestamp: Local::now().to_rfc3339_opts(SecondsFormat::Secs, false),
            description,
        })?;

        writeln!(
            self.out,
            "✅ Documented {} as {} under '{}'",
            entry.path, entry.node, entry.feature
        )?;
        Ok(())
    }

    fn show(&mut self, path: &str, feature: Option<&str>, json: bool) -> Result<()> {
        let entries = self.matching_entries(path, feature)?;
        if entries.is_empty() {
            match feature {
                Some(feature) => bail!(
                    "No documentation found for '{}' under feature '{}'",
                    path,
                    feature
                ),
                None => bail!("No documentation found for '{}'", path),
            }
        }

        if json {
            writeln!(self.out, "{}", serde_json::to_string_pretty(&entries)?)?;
            return Ok(());
        }
        for entry in &entries {
            write!(self.out, "{}", render::render_entry(entry))?;
        }
        Ok(())
    }

    fn untag(&mut self, path: &str, feature: &str) -> Result<()> {
        let removed = self.store.remove_entry(path, feature)?;
        for entry in removed {
            writeln!(
                self.out,
                "🗑️  Removed {} ({}) from '{}'",
                entry.path, entry.node, feature
            )?;
        }
        Ok(())
    }

    fn show_feature(&mut self, feature: &str, json: bool) -> Result<()> {
        let entries = self.store.entries_for_feature(feature)?;
        if json {
            writeln!(self.out, "{}", serde_json::to_string_pretty(&entries)?)?;
            return Ok(());
        }

        if entries.is_empty() {
            writeln!(self.out, "No entries under '{}'.", feature)?;
            return Ok(());
        }
        writeln!(self.out, "Entries for '{}':", feature)?;
        for entry in &entries {
            writeln!(self.out, "{}", render::render_feature_line(entry))?;
        }
        Ok(())
    }

    fn involved(&mut self, feature: &str) -> Result<()> {
        let entries = self.store.entries_for_feature(feature)?;
        if entries.is_empty() {
            writeln!(self.out, "No entries under '{}'.", feature)?;
            return Ok(());
        }
        write!(self.out, "{}", render::render_involved(feature, &entries))?;
        Ok(())
    }

    fn search(&mut self, query: &str) -> Result<()> {
        let matches = self.store.search_features(query)?;
        if matches.is_empty() {
            writeln!(self.out, "❌ No features match '{}'", query)?;
            return Ok(());
        }
        writeln!(self.out, "Matching features:")?;
        for feature in matches {
            writeln!(self.out, "• {}", feature)?;
        }
        Ok(())
    }

    fn methods(
        &mut self,
        path: &str,
        feature: &str,
        action: &str,
        methods: Option<String>,
    ) -> Result<()> {
        let Some(action) = MethodAction::parse(action) else {
            bail!("Action not supported must be 'add' OR 'remove'");
        };
        let methods = self.answer(methods, EDIT_METHODS_PROMPT)?;

        let entry = self
            .store
            .edit_methods(path, feature, &parse_methods(&methods), action)?;
        writeln!(
            self.out,
            "✅ Updated methods for {} under '{}': {}",
            entry.path,
            entry.feature,
            entry.methods.join(", ")
        )?;
        Ok(())
    }

    fn describe(&mut self, path: &str, feature: Option<&str>) -> Result<()> {
        let entries = self.matching_entries(path, feature)?;
        if entries.is_empty() {
            match feature {
                Some(feature) => bail!(
                    "No description found for '{}' under feature '{}'",
                    path,
                    feature
                ),
                None => bail!("No description found for '{}'", path),
            }
        }

        for entry in &entries {
            write!(
                self.out,
                "{}",
                render::render_description(path, entry, feature.is_some())
            )?;
        }
        Ok(())
    }

    fn update_description(
        &mut self,
        path: &str,
        feature: &str,
        description: Option<String>,
    ) -> Result<()> {
        let question = format!(
            "Enter a new description for '{}' under '{}':",
            path, feature
        );
        let description = self.answer(description, &question)?;

        let entry = self.store.update_description(path, feature, &description)?;
        writeln!(
            self.out,
            "✅ Description updated for {} under '{}':",
            entry.path, entry.feature
        )?;
        writeln!(self.out, "   {}", entry.description)?;
        Ok(())
    }

    /// Entries for `path`, narrowed to one feature when given.
    fn matching_entries(&self, path: &str, feature: Option<&str>) -> Result<Vec<Entry>> {
        let mut entries = self.store.entries_for(path)?;
        if let Some(feature) = feature {
            entries.retain(|e| e.feature == feature);
        }
        Ok(entries)
    }

    /// Use the value given on the command line, or ask for it.
    fn answer(&mut self, given: Option<String>, question: &str) -> Result<String> {
        match given {
            Some(value) => Ok(value),
            None => self
                .prompt
                .ask(question)
                .with_context(|| format!("Failed to read answer to: {}", question)),
        }
    }
}
