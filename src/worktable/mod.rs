//! Work table resolution.
//!
//! Maps a tab-separated sample table plus a 1-based array task index to
//! exactly one [`WorkItem`]:
//!
//! - [`table`] - table parsing, layout detection, and row selection
//! - [`basename`] - canonical output naming derived from read file names

pub mod basename;
pub mod table;

pub use basename::derive_base_name;
pub use table::{resolve, ReadLayout, WorkItem};
