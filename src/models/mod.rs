//! Domain models for documinty.
//!
//! # Core Concepts
//!
//! - [`Entry`]: One documentation tag associating a file path with a feature,
//!   a node label, method names and a description.
//! - [`FeatureDocument`]: The on-disk shape of a feature file, an ordered list of entries.
//! - [`ProjectConfig`]: Project metadata written once by `init`.
//!
//! Features have no record of their own beyond the file that holds their entries.
//! They are created explicitly and are never deleted by the store.

mod entry;
mod feature;
mod project;

pub use entry::*;
pub use feature::*;
pub use project::*;
