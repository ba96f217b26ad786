//! Integration tests for the stage runner through the public API.

use seqpipe::config::PipelineConfig;
use seqpipe::shell::{CommandChain, CommandSpec};
use seqpipe::stage::{run_stage, Stage, StageContext, StageFlags, Step};
use seqpipe::{Result, SeqpipeError};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// A stage whose success hook leaves a probe file, standing in for a
/// scatter member's marker write.
struct ProbeStage {
    steps: Vec<Step>,
    touch_on_success: PathBuf,
}

impl Stage for ProbeStage {
    fn name(&self) -> &'static str {
        "probe"
    }

    fn steps(&self) -> Result<Vec<Step>> {
        Ok(self.steps.clone())
    }

    fn on_success(&self) -> Result<()> {
        fs::write(&self.touch_on_success, "")?;
        Ok(())
    }
}

fn context<'a>(config: &'a PipelineConfig, dir: &TempDir) -> StageContext<'a> {
    StageContext {
        config,
        config_path: dir.path().join("pipeline.yml"),
        task_index: 1,
        flags: StageFlags::default(),
        log_path: dir.path().join("probe.log"),
        out_dir: dir.path().to_path_buf(),
        bed: None,
    }
}

fn ok_step(name: &str) -> Step {
    Step::new(name, CommandChain::new(CommandSpec::new("true")))
}

#[test]
fn successful_stage_logs_every_step_and_the_trailer() {
    let dir = TempDir::new().unwrap();
    let config = PipelineConfig {
        genome_build: "GRCh38".into(),
        ..Default::default()
    };
    let ctx = context(&config, &dir);
    let stage = ProbeStage {
        steps: vec![ok_step("one"), ok_step("two")],
        touch_on_success: dir.path().join("done"),
    };

    run_stage(&stage, &ctx).unwrap();

    let log = fs::read_to_string(&ctx.log_path).unwrap();
    assert!(log.contains("==== seqpipe probe ===="));
    assert!(log.contains("[one] ok"));
    assert!(log.contains("[two] ok"));
    assert!(log.contains("finished:"));
    assert!(dir.path().join("done").exists());
}

#[test]
fn failed_stage_skips_success_hook_and_trailer() {
    let dir = TempDir::new().unwrap();
    let config = PipelineConfig {
        genome_build: "GRCh38".into(),
        ..Default::default()
    };
    let ctx = context(&config, &dir);
    let stage = ProbeStage {
        steps: vec![
            Step::new("boom", CommandChain::new(CommandSpec::new("false"))),
            ok_step("never"),
        ],
        touch_on_success: dir.path().join("done"),
    };

    let err = run_stage(&stage, &ctx).unwrap_err();
    assert!(matches!(err, SeqpipeError::StepExecutionFailure { .. }));

    let log = fs::read_to_string(&ctx.log_path).unwrap();
    assert!(log.contains("[boom] exit=1"));
    assert!(!log.contains("[never]"));
    assert!(!log.contains("finished:"));
    assert!(!dir.path().join("done").exists());
}

#[test]
fn fail_fast_holds_for_longer_step_sequences() {
    // Step i+1 never runs when step i fails, wherever i falls.
    for failing_at in 0..3 {
        let dir = TempDir::new().unwrap();
        let config = PipelineConfig {
            genome_build: "hg19".into(),
            ..Default::default()
        };
        let ctx = context(&config, &dir);

        let steps: Vec<Step> = (0..4)
            .map(|i| {
                let program = if i == failing_at { "false" } else { "true" };
                Step::new(format!("s{i}"), CommandChain::new(CommandSpec::new(program)))
            })
            .collect();
        let stage = ProbeStage {
            steps,
            touch_on_success: dir.path().join("done"),
        };

        assert!(run_stage(&stage, &ctx).is_err());
        let log = fs::read_to_string(&ctx.log_path).unwrap();
        for i in 0..4 {
            let seen = log.contains(&format!("[s{i}]"));
            assert_eq!(seen, i <= failing_at, "step s{i}, failure at {failing_at}");
        }
    }
}
