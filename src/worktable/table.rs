//! Work table parsing and row resolution.
//!
//! A work table is a tab-separated file with one row per sample. The column
//! count of the first line fixes the read layout for the whole file:
//! 2 columns means single-end, 3 columns means paired-end. An array task
//! resolves exactly one row, selected by its 1-based task index.

use crate::error::{Result, SeqpipeError};
use crate::worktable::basename::derive_base_name;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Read-group headers start with the `@RG` tag; the original tables carry
/// literal `\t` escapes between fields, so both forms are accepted.
static READ_GROUP_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^@RG(\t|\\t)").expect("READ_GROUP_REGEX must compile"));

/// Read layout of a work table, derived from its column count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadLayout {
    /// Two columns: read file, read-group header.
    SingleEnd,
    /// Three columns: read 1, read-group header, read 2.
    PairedEnd,
}

impl ReadLayout {
    fn from_columns(columns: usize, path: &Path) -> Result<Self> {
        match columns {
            2 => Ok(Self::SingleEnd),
            3 => Ok(Self::PairedEnd),
            n => Err(SeqpipeError::MalformedWorkTable {
                path: path.to_path_buf(),
                columns: n,
            }),
        }
    }

    fn columns(self) -> usize {
        match self {
            Self::SingleEnd => 2,
            Self::PairedEnd => 3,
        }
    }
}

/// One resolved unit of work: the row of the work table assigned to the
/// current array task. Immutable once resolved.
#[derive(Debug, Clone)]
pub struct WorkItem {
    /// Absolute path to the primary (R1) read file.
    pub primary: PathBuf,

    /// Read-group header, passed through to the aligner unmodified.
    pub read_group: String,

    /// Absolute path to the mate (R2) read file; paired-end tables only.
    pub secondary: Option<PathBuf>,

    /// Canonical sample identifier naming all stage outputs.
    pub base_name: String,
}

/// Resolve the row at `task_index` (1-based) of the work table at `path`.
///
/// # Errors
///
/// - `MissingInputFile` if the table or a referenced read file is absent
/// - `MalformedWorkTable` if any row's column count is not 2 or 3, or
///   differs from the first row's
/// - `IndexOutOfRange` if `task_index` is 0 or beyond the last row
pub fn resolve(path: &Path, task_index: usize) -> Result<WorkItem> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            SeqpipeError::MissingInputFile {
                path: path.to_path_buf(),
            }
        } else {
            SeqpipeError::Io(e)
        }
    })?;

    let rows: Vec<&str> = content.lines().filter(|l| !l.trim().is_empty()).collect();
    if rows.is_empty() {
        return Err(SeqpipeError::IndexOutOfRange {
            index: task_index,
            rows: 0,
        });
    }

    let layout = ReadLayout::from_columns(rows[0].split('\t').count(), path)?;

    if task_index == 0 || task_index > rows.len() {
        return Err(SeqpipeError::IndexOutOfRange {
            index: task_index,
            rows: rows.len(),
        });
    }

    let fields: Vec<&str> = rows[task_index - 1].split('\t').collect();
    if fields.len() != layout.columns() {
        return Err(SeqpipeError::MalformedWorkTable {
            path: path.to_path_buf(),
            columns: fields.len(),
        });
    }

    let primary = absolute_read_path(fields[0], path)?;
    let read_group = fields[1].to_string();
    if !READ_GROUP_REGEX.is_match(&read_group) {
        tracing::warn!(
            row = task_index,
            "read-group column does not start with @RG; passing through as-is"
        );
    }

    let secondary = match layout {
        ReadLayout::SingleEnd => None,
        ReadLayout::PairedEnd => Some(absolute_read_path(fields[2], path)?),
    };

    let file_name = primary
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(WorkItem {
        primary,
        read_group,
        secondary,
        base_name: derive_base_name(&file_name),
    })
}

/// Resolve a read-file column to an absolute path, relative paths being
/// taken relative to the table's own directory.
fn absolute_read_path(field: &str, table: &Path) -> Result<PathBuf> {
    let raw = Path::new(field);
    let path = if raw.is_absolute() {
        raw.to_path_buf()
    } else {
        table
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(raw)
    };

    if !path.exists() {
        return Err(SeqpipeError::MissingInputFile { path });
    }
    // canonicalize() only fails for paths that don't exist, checked above.
    Ok(fs::canonicalize(&path)?)
}
