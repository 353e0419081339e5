//! documinty: tag the files of a codebase with per-feature documentation.
//!
//! Tags live in `.documinty/features/<feature>.yml` under the project root and
//! are managed through [`store::Store`]. The [`cli`] module builds the `dmt`
//! command-line tool on top of it.

pub mod cli;
pub mod models;
pub mod store;

pub use store::{Store, StoreError};
