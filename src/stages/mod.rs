//! Concrete pipeline stages.
//!
//! One module per stage, each declaring its ordered steps and its static
//! downstream links:
//!
//! - [`align`] - alignment, sort, duplicate marking (array over samples)
//! - [`metrics`] - flag and index statistics on a BAM
//! - [`refine`] - indel realignment and base-quality recalibration
//! - [`genotype`] - per-slice gVCF calling (array over a BAM list)
//! - [`aggregate`] - barrier-checked joint genotyping
//! - [`coverage`] - depth of coverage over a target-region file

pub mod aggregate;
pub mod align;
pub mod coverage;
pub mod genotype;
pub mod metrics;
pub mod refine;

pub use aggregate::AggregateStage;
pub use align::AlignStage;
pub use coverage::CoverageStage;
pub use genotype::GenotypeStage;
pub use metrics::MetricsStage;
pub use refine::RefineStage;

use crate::error::{Result, SeqpipeError};
use crate::stage::StageContext;
use std::fs;
use std::path::{Path, PathBuf};

/// Require that an input file exists.
pub(crate) fn require_file(path: &Path) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(SeqpipeError::MissingInputFile {
            path: path.to_path_buf(),
        })
    }
}

/// Require that an input file carries the expected extension.
pub(crate) fn require_extension(path: &Path, extension: &str) -> Result<()> {
    if path.extension().and_then(|e| e.to_str()) == Some(extension) {
        Ok(())
    } else {
        Err(SeqpipeError::ConfigValidationError {
            message: format!("'{}' must end in .{}", path.display(), extension),
        })
    }
}

/// Select the 1-based `index`th non-empty line of a list file.
pub(crate) fn nth_line(path: &Path, index: usize) -> Result<PathBuf> {
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
    if index == 0 || index > rows.len() {
        return Err(SeqpipeError::IndexOutOfRange {
            index,
            rows: rows.len(),
        });
    }
    let entry = PathBuf::from(rows[index - 1]);
    if entry.is_absolute() {
        Ok(entry)
    } else {
        // Relative entries are taken relative to the list's own directory.
        Ok(path.parent().unwrap_or_else(|| Path::new(".")).join(entry))
    }
}

/// Count the non-empty lines of a list file.
pub(crate) fn count_lines(path: &Path) -> Result<usize> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            SeqpipeError::MissingInputFile {
                path: path.to_path_buf(),
            }
        } else {
            SeqpipeError::Io(e)
        }
    })?;
    Ok(content.lines().filter(|l| !l.trim().is_empty()).count())
}

/// Sample identifier for a BAM input: its file stem up to the first dot,
/// so `sample.sorted.dedup.bam` keeps naming outputs `sample.*`.
pub(crate) fn bam_base(bam: &Path) -> String {
    bam.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.split('.').next().unwrap_or(n).to_string())
        .unwrap_or_default()
}

/// Telemetry-suppression arguments for GATK-style tools, required when a
/// stage runs with `--no-phone-home`.
pub(crate) fn phone_home_args(ctx: &StageContext<'_>) -> Result<Vec<String>> {
    if !ctx.flags.no_phone_home {
        return Ok(Vec::new());
    }
    let key = ctx.config.phone_home_key.as_ref().ok_or_else(|| {
        SeqpipeError::ConfigValidationError {
            message: "--no-phone-home requires 'phone_home_key' in the configuration".into(),
        }
    })?;
    Ok(vec![
        "-et".into(),
        "NO_ET".into(),
        "-K".into(),
        key.to_string_lossy().into_owned(),
    ])
}

/// Arguments every chained stage receives: the shared configuration,
/// the shared stage log, and the output directory.
pub(crate) fn forward_common(ctx: &StageContext<'_>) -> Vec<String> {
    vec![
        "--config".into(),
        ctx.config_path.to_string_lossy().into_owned(),
        "--log".into(),
        ctx.log_path.to_string_lossy().into_owned(),
        "--out-dir".into(),
        ctx.out_dir.to_string_lossy().into_owned(),
    ]
}
