//! Command dispatching.
//!
//! Routes each CLI subcommand to its stage: loads the configuration once,
//! resolves the unit of work, builds an immutable [`StageContext`], and
//! hands the stage to the runner.

use crate::cli::args::{
    AggregateArgs, AlignArgs, Cli, Commands, CommonArgs, ConfigShowArgs, CoverageArgs,
    GenotypeArgs, MetricsArgs, RefineArgs,
};
use crate::config::{load_config, PipelineConfig};
use crate::error::Result;
use crate::stage::{run_stage, StageContext, StageFlags};
use crate::stages::{
    bam_base, count_lines, nth_line, AggregateStage, AlignStage, CoverageStage, GenotypeStage,
    MetricsStage, RefineStage,
};
use crate::worktable;
use clap::CommandFactory;
use std::path::PathBuf;

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }
}

/// Dispatches CLI subcommands to their stage implementations.
pub struct CommandDispatcher;

impl CommandDispatcher {
    /// Dispatch and execute a command.
    pub fn dispatch(cli: &Cli) -> Result<CommandResult> {
        match &cli.command {
            Commands::Align(args) => run_align(args),
            Commands::Metrics(args) => run_metrics(args),
            Commands::Refine(args) => run_refine(args),
            Commands::Genotype(args) => run_genotype(args),
            Commands::Aggregate(args) => run_aggregate(args),
            Commands::Coverage(args) => run_coverage(args),
            Commands::Config(args) => show_config(args),
            Commands::Completions(args) => {
                clap_complete::generate(
                    args.shell,
                    &mut Cli::command(),
                    "seqpipe",
                    &mut std::io::stdout(),
                );
                Ok(CommandResult::success())
            }
        }
    }
}

fn out_dir_of(common: &CommonArgs) -> PathBuf {
    common
        .out_dir
        .clone()
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

fn context<'a>(
    config: &'a PipelineConfig,
    common: &CommonArgs,
    flags: StageFlags,
    default_log_name: &str,
    bed: Option<PathBuf>,
) -> Result<StageContext<'a>> {
    let out_dir = out_dir_of(common);
    std::fs::create_dir_all(&out_dir)?;
    let log_path = common
        .log
        .clone()
        .unwrap_or_else(|| out_dir.join(format!("{default_log_name}.log")));
    Ok(StageContext {
        config,
        config_path: common.config.clone(),
        task_index: common.task_index,
        flags,
        log_path,
        out_dir,
        bed,
    })
}

fn run_align(args: &AlignArgs) -> Result<CommandResult> {
    let config = load_config(&args.common.config)?;
    let item = worktable::resolve(&args.table, args.common.task_index)?;
    let flags = StageFlags {
        chain: args.chain,
        coverage: args.coverage,
        fix_quality: args.fix_quality,
        no_phone_home: args.no_phone_home,
        skip_recal: args.skip_recal,
    };
    let ctx = context(
        &config,
        &args.common,
        flags,
        &item.base_name,
        args.bed.clone(),
    )?;
    run_stage(&AlignStage::new(&ctx, item), &ctx)?;
    Ok(CommandResult::success())
}

fn run_metrics(args: &MetricsArgs) -> Result<CommandResult> {
    let config = load_config(&args.common.config)?;
    let ctx = context(
        &config,
        &args.common,
        StageFlags::default(),
        &bam_base(&args.bam),
        None,
    )?;
    run_stage(&MetricsStage::new(&ctx, args.bam.clone()), &ctx)?;
    Ok(CommandResult::success())
}

fn run_refine(args: &RefineArgs) -> Result<CommandResult> {
    let config = load_config(&args.common.config)?;
    let flags = StageFlags {
        skip_recal: args.skip_recal,
        no_phone_home: args.no_phone_home,
        ..Default::default()
    };
    let ctx = context(&config, &args.common, flags, &bam_base(&args.bam), None)?;
    run_stage(&RefineStage::new(&ctx, args.bam.clone()), &ctx)?;
    Ok(CommandResult::success())
}

fn run_genotype(args: &GenotypeArgs) -> Result<CommandResult> {
    let config = load_config(&args.common.config)?;
    let bam = nth_line(&args.bams, args.common.task_index)?;
    let flags = StageFlags {
        no_phone_home: args.no_phone_home,
        ..Default::default()
    };
    let log_name = format!("{}.{}", args.prefix, args.common.task_index);
    let ctx = context(&config, &args.common, flags, &log_name, args.bed.clone())?;
    run_stage(&GenotypeStage::new(&ctx, bam, args.prefix.clone()), &ctx)?;
    Ok(CommandResult::success())
}

fn run_aggregate(args: &AggregateArgs) -> Result<CommandResult> {
    let config = load_config(&args.common.config)?;
    let prefix = args.prefix.clone().unwrap_or_else(|| {
        args.list
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    });
    let expected = count_lines(&args.list)?;
    let flags = StageFlags {
        no_phone_home: args.no_phone_home,
        ..Default::default()
    };
    let ctx = context(&config, &args.common, flags, &prefix, None)?;
    run_stage(
        &AggregateStage::new(&ctx, args.list.clone(), prefix, expected),
        &ctx,
    )?;
    Ok(CommandResult::success())
}

fn run_coverage(args: &CoverageArgs) -> Result<CommandResult> {
    let config = load_config(&args.common.config)?;
    let flags = StageFlags {
        no_phone_home: args.no_phone_home,
        ..Default::default()
    };
    let ctx = context(&config, &args.common, flags, &bam_base(&args.bam), None)?;
    run_stage(
        &CoverageStage::new(&ctx, args.bam.clone(), args.bed.clone()),
        &ctx,
    )?;
    Ok(CommandResult::success())
}

fn show_config(args: &ConfigShowArgs) -> Result<CommandResult> {
    let config = load_config(&args.config)?;
    let rendered = if args.json {
        serde_json::to_string_pretty(&config).map_err(anyhow::Error::from)?
    } else {
        serde_yaml::to_string(&config).map_err(anyhow::Error::from)?
    };
    println!("{rendered}");
    Ok(CommandResult::success())
}
