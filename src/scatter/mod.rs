//! Scatter-gather coordination via filesystem completion markers.
//!
//! Array-parallel stages that produce partial outputs form a scatter
//! group identified by a shared name prefix. Each member writes one
//! zero-byte marker file after all of its steps succeed; the aggregation
//! stage refuses to run until a marker exists for every expected task
//! index. The scheduler's own hold-release is never trusted as a
//! completion signal: a released hold with missing markers is a hard
//! error, not a race to paper over.

use crate::error::{Result, SeqpipeError};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

/// File suffix of completion markers.
pub const MARKER_SUFFIX: &str = "genotypingcomplete";

/// A scatter-gather group: marker directory plus shared output prefix.
#[derive(Debug, Clone)]
pub struct ScatterGroup {
    dir: PathBuf,
    prefix: String,
}

impl ScatterGroup {
    /// Group rooted at `out_dir`, using the conventional per-group marker
    /// directory `{prefix}.scatter/`.
    pub fn new(out_dir: &Path, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        Self {
            dir: out_dir.join(format!("{prefix}.scatter")),
            prefix,
        }
    }

    /// The group's marker directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Marker path for one member: `{prefix}.{index}.genotypingcomplete`.
    pub fn marker_path(&self, task_index: usize) -> PathBuf {
        self.dir
            .join(format!("{}.{}.{}", self.prefix, task_index, MARKER_SUFFIX))
    }

    /// Record that the member at `task_index` completed all of its steps.
    ///
    /// Creation is atomic (a single `create_new`) and idempotent: a marker
    /// that already exists is a no-op, not an error.
    pub fn write_marker(&self, task_index: usize) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(self.marker_path(task_index))
        {
            Ok(_) => {
                tracing::info!(prefix = %self.prefix, task_index, "wrote completion marker");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => Ok(()),
            Err(e) => Err(SeqpipeError::Io(e)),
        }
    }

    /// Task indices in `1..=expected` whose markers are missing.
    pub fn missing_indices(&self, expected: usize) -> Vec<usize> {
        (1..=expected)
            .filter(|&i| !self.marker_path(i).exists())
            .collect()
    }

    /// Barrier check: every member of a group of size `expected` must have
    /// written its marker.
    ///
    /// # Errors
    ///
    /// Returns `IncompleteScatterGroup` naming the missing task indices.
    pub fn verify_complete(&self, expected: usize) -> Result<()> {
        let missing = self.missing_indices(expected);
        if missing.is_empty() {
            return Ok(());
        }
        Err(SeqpipeError::IncompleteScatterGroup {
            prefix: self.prefix.clone(),
            expected,
            found: expected - missing.len(),
            missing: missing
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", "),
        })
    }
}
