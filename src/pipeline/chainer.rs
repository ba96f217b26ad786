//! Downstream-stage dispatch.
//!
//! At the successful end of a stage, its declared links are evaluated in
//! order and the firing ones are enqueued: either the pipeline executable
//! is spawned directly, or it is handed to the scheduler's submission
//! command when the configuration names one. Both are fire-and-forget;
//! the current stage does not wait, and a downstream failure is invisible
//! to it. An *enqueue* failure, by contrast, is observable here and is
//! logged distinctly.

use crate::error::{Result, SeqpipeError};
use crate::pipeline::link::PipelineLink;
use crate::stage::{StageContext, StageLog};
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// Evaluate `links` in declaration order and enqueue the ones that fire.
///
/// Enqueue failures do not abort the (already successful) stage; they are
/// logged at error level and noted in the stage log.
pub fn fire_links(links: &[PipelineLink], ctx: &StageContext<'_>, log: &mut StageLog) {
    for link in links {
        if !link.should_fire(&ctx.flags) {
            tracing::debug!(stage = link.stage.subcommand(), "link gated off, not firing");
            continue;
        }
        match enqueue(link, ctx) {
            Ok(pid) => {
                tracing::info!(stage = link.stage.subcommand(), pid, "enqueued downstream stage");
                let _ = log.note(&format!(
                    "enqueued downstream stage '{}' (pid {})",
                    link.stage.subcommand(),
                    pid
                ));
            }
            Err(e) => {
                tracing::error!(stage = link.stage.subcommand(), error = %e, "enqueue failed");
                let _ = log.note(&format!(
                    "ENQUEUE FAILED for downstream stage '{}': {}",
                    link.stage.subcommand(),
                    e
                ));
            }
        }
    }
}

/// Spawn one downstream stage, returning its pid (or the submission
/// command's pid when a scheduler is configured).
fn enqueue(link: &PipelineLink, ctx: &StageContext<'_>) -> Result<u32> {
    let exe = pipeline_executable(ctx)?;

    let mut cmd = match &ctx.config.submit {
        Some(submit) => {
            let mut cmd = Command::new(submit);
            cmd.arg(&exe);
            cmd
        }
        None => Command::new(&exe),
    };
    cmd.arg(link.stage.subcommand())
        .args(&link.forward)
        .stdin(Stdio::null());

    let child = cmd.spawn().map_err(|e| SeqpipeError::SpawnFailure {
        stage: link.stage.subcommand().to_string(),
        message: e.to_string(),
    })?;
    Ok(child.id())
}

/// Path of the pipeline executable to launch downstream stages from.
///
/// `scripts_dir` takes precedence so clusters can pin the installed
/// binary; otherwise the currently running executable is reused.
fn pipeline_executable(ctx: &StageContext<'_>) -> Result<PathBuf> {
    match &ctx.config.scripts_dir {
        Some(dir) => Ok(dir.join("seqpipe")),
        None => Ok(std::env::current_exe()?),
    }
}
