//! Stage machinery: context, steps, the execution engine, and the runner.
//!
//! - [`context`] - per-instance [`StageContext`] and invocation flags
//! - [`step`] - fail-fast [`Step`] units and their status
//! - [`engine`] - ordered fail-fast execution
//! - [`log`] - the stage log file artifact

pub mod context;
pub mod engine;
pub mod log;
pub mod step;

pub use context::{StageContext, StageFlags};
pub use log::StageLog;
pub use step::{Step, StepStatus};

use crate::error::Result;
use crate::pipeline::{fire_links, PipelineLink};

/// One script-level unit of pipeline work.
///
/// A stage declares its ordered steps and its static downstream links;
/// the runner supplies fail-fast execution, logging, and chaining.
pub trait Stage {
    /// Stage name as it appears in logs and as the CLI subcommand.
    fn name(&self) -> &'static str;

    /// Eager validation before any step runs and before the log header is
    /// written. A failing preflight creates no partial state.
    fn preflight(&self) -> Result<()> {
        Ok(())
    }

    /// The stage's ordered, fully resolved step list.
    fn steps(&self) -> Result<Vec<Step>>;

    /// Downstream links, evaluated in declaration order on success.
    fn links(&self) -> Vec<PipelineLink> {
        Vec::new()
    }

    /// Success hook, run after the last step and before chaining.
    /// Scatter-gather members write their completion marker here.
    fn on_success(&self) -> Result<()> {
        Ok(())
    }
}

/// Run one stage instance to completion.
///
/// Order: preflight, log header, steps (fail-fast), success hook,
/// pipeline links, log trailer. A step failure propagates immediately:
/// no marker is written, no link fires, and no trailer is appended.
pub fn run_stage(stage: &dyn Stage, ctx: &StageContext<'_>) -> Result<()> {
    stage.preflight()?;

    let mut log = StageLog::open(&ctx.log_path, stage.name(), &ctx.config.genome_build)?;
    let steps = stage.steps()?;
    tracing::info!(stage = stage.name(), steps = steps.len(), task_index = ctx.task_index);

    engine::run_steps(&steps, &mut log)?;
    stage.on_success()?;
    fire_links(&stage.links(), ctx, &mut log);
    log.trailer()?;

    tracing::info!(stage = stage.name(), "stage complete");
    Ok(())
}
