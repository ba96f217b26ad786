//! Per-instance stage context.

use crate::config::PipelineConfig;
use std::path::PathBuf;

/// Flags controlling optional behavior of a stage invocation.
///
/// Flags are a step-construction input, not a runtime branch: stages
/// consult them while declaring their step lists and pipeline links.
#[derive(Debug, Clone, Copy, Default)]
pub struct StageFlags {
    /// Continue the pipeline: chain into realignment/recalibration.
    pub chain: bool,

    /// Also chain into the depth-of-coverage stage.
    pub coverage: bool,

    /// Splice the quality-encoding fix into the alignment pipe.
    pub fix_quality: bool,

    /// Suppress external telemetry of the GATK-style tools.
    pub no_phone_home: bool,

    /// Skip base-quality recalibration in the refine stage.
    pub skip_recal: bool,
}

/// Everything one running stage instance needs, resolved up front.
///
/// Owned exclusively by that instance; the configuration it borrows is
/// loaded once and never mutated.
#[derive(Debug)]
pub struct StageContext<'a> {
    /// Resolved pipeline configuration.
    pub config: &'a PipelineConfig,

    /// Path the configuration was loaded from, forwarded to chained stages.
    pub config_path: PathBuf,

    /// 1-based array task index assigned by the scheduler.
    pub task_index: usize,

    /// Stage invocation flags.
    pub flags: StageFlags,

    /// Stage log file; chained stages append to the same file.
    pub log_path: PathBuf,

    /// Directory receiving all stage outputs.
    pub out_dir: PathBuf,

    /// Target-region file (`.bed`), forwarded where a stage needs one.
    pub bed: Option<PathBuf>,
}
