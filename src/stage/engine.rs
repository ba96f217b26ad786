//! Step execution engine.
//!
//! Runs a stage's steps strictly in order with fail-fast semantics: the
//! first non-zero exit aborts the stage, later steps never run, and no
//! pipeline chaining happens. Each step's outcome is appended to the
//! stage log as it completes.

use crate::error::{Result, SeqpipeError};
use crate::shell::execute_chain;
use crate::stage::log::StageLog;
use crate::stage::step::{Step, StepStatus};
use chrono::Local;
use std::time::Duration;

/// Execute `steps` in order, logging each to `log`.
///
/// On success, each step's declared cleanup files are removed (best
/// effort) before the next step starts; nothing is deleted on the
/// failure path.
///
/// # Errors
///
/// Returns `StepExecutionFailure` for the first step whose command chain
/// exits non-zero, or the spawn error if a tool cannot be started.
pub fn run_steps(steps: &[Step], log: &mut StageLog) -> Result<()> {
    for step in steps {
        let command = step.chain.render();
        let started = Local::now();
        tracing::info!(step = %step.name, status = %StepStatus::Running, %command);

        let result = match execute_chain(&step.chain) {
            Ok(result) => result,
            Err(e) => {
                // Spawn failures still get a log entry so the stage log
                // shows where execution stopped.
                log.step_entry(&step.name, &command, started, Duration::ZERO, None)?;
                return Err(e);
            }
        };

        log.step_entry(&step.name, &command, started, result.duration, result.exit_code)?;

        if !result.success {
            tracing::error!(
                step = %step.name,
                status = %StepStatus::Failed,
                exit_code = ?result.exit_code,
                "aborting stage"
            );
            return Err(SeqpipeError::StepExecutionFailure {
                step: step.name.clone(),
                command,
                code: result.exit_code,
            });
        }

        tracing::info!(
            step = %step.name,
            status = %StepStatus::Completed,
            elapsed_s = result.duration.as_secs_f64()
        );

        for path in &step.cleanup {
            match std::fs::remove_file(path) {
                Ok(()) => tracing::debug!(path = %path.display(), "removed consumed intermediate"),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "could not remove intermediate")
                }
            }
        }
    }
    Ok(())
}
