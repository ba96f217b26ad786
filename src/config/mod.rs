//! Pipeline configuration loading, parsing, and validation.
//!
//! - [`schema`] - serde struct definitions for the YAML config format
//! - [`loader`] - file loading and eager validation

pub mod loader;
pub mod schema;

pub use loader::{load_config, parse_config, validate_config};
pub use schema::PipelineConfig;
