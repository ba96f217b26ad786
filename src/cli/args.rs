//! CLI argument definitions.
//!
//! One subcommand per pipeline stage, using clap's derive macros. Missing
//! required arguments print usage and exit non-zero via clap itself, so a
//! bad invocation never reaches stage code.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// seqpipe - Batch-scheduler orchestration for an alignment and
/// joint-genotyping pipeline.
#[derive(Debug, Parser)]
#[command(name = "seqpipe")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands: the pipeline stages plus utilities.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Align one work-table row, then sort and mark duplicates
    Align(AlignArgs),

    /// Flag and index statistics for an aligned BAM
    Metrics(MetricsArgs),

    /// Indel realignment and base-quality recalibration
    Refine(RefineArgs),

    /// Call one gVCF slice of a scatter group
    Genotype(GenotypeArgs),

    /// Joint-genotype a complete scatter group
    Aggregate(AggregateArgs),

    /// Depth of coverage over a target-region file
    Coverage(CoverageArgs),

    /// Show the resolved pipeline configuration
    Config(ConfigShowArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments shared by every stage subcommand.
#[derive(Debug, Clone, clap::Args)]
pub struct CommonArgs {
    /// Pipeline configuration file (YAML)
    #[arg(short, long)]
    pub config: PathBuf,

    /// Stage log file (default: derived from the primary output name)
    #[arg(long)]
    pub log: Option<PathBuf>,

    /// Output directory (default: current directory)
    #[arg(short, long)]
    pub out_dir: Option<PathBuf>,

    /// 1-based array task index assigned by the scheduler
    #[arg(short = 'i', long, default_value_t = 1, env = "SEQPIPE_TASK_INDEX")]
    pub task_index: usize,
}

/// Arguments for the `align` stage.
#[derive(Debug, Clone, clap::Args)]
pub struct AlignArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Tab-separated work table: 2 columns single-end, 3 paired-end
    #[arg(short, long)]
    pub table: PathBuf,

    /// Continue the pipeline into realignment/recalibration on success
    #[arg(long)]
    pub chain: bool,

    /// Also chain into depth of coverage (requires --bed)
    #[arg(long)]
    pub coverage: bool,

    /// Fix misencoded (phred+64) base qualities during alignment
    #[arg(long)]
    pub fix_quality: bool,

    /// Suppress external telemetry of the GATK-style tools
    #[arg(long)]
    pub no_phone_home: bool,

    /// Skip base-quality recalibration in the chained refine stage
    #[arg(long)]
    pub skip_recal: bool,

    /// Target-region file (.bed), forwarded to chained stages
    #[arg(long)]
    pub bed: Option<PathBuf>,
}

/// Arguments for the `metrics` stage.
#[derive(Debug, Clone, clap::Args)]
pub struct MetricsArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Aligned, duplicate-marked BAM
    #[arg(short, long)]
    pub bam: PathBuf,
}

/// Arguments for the `refine` stage.
#[derive(Debug, Clone, clap::Args)]
pub struct RefineArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Aligned, duplicate-marked BAM
    #[arg(short, long)]
    pub bam: PathBuf,

    /// Skip base-quality recalibration
    #[arg(long)]
    pub skip_recal: bool,

    /// Suppress external telemetry of the GATK-style tools
    #[arg(long)]
    pub no_phone_home: bool,
}

/// Arguments for the `genotype` stage.
#[derive(Debug, Clone, clap::Args)]
pub struct GenotypeArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// List file of input BAMs; the row at the task index is processed
    #[arg(long)]
    pub bams: PathBuf,

    /// Scatter group output-name prefix
    #[arg(short, long)]
    pub prefix: String,

    /// Target-region file (.bed) restricting the calling
    #[arg(long)]
    pub bed: Option<PathBuf>,

    /// Suppress external telemetry of the GATK-style tools
    #[arg(long)]
    pub no_phone_home: bool,
}

/// Arguments for the `aggregate` stage.
#[derive(Debug, Clone, clap::Args)]
pub struct AggregateArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// gVCF list file (one slice path per line, name ending .list)
    #[arg(short, long)]
    pub list: PathBuf,

    /// Scatter group prefix (default: the list file's stem)
    #[arg(short, long)]
    pub prefix: Option<String>,

    /// Suppress external telemetry of the GATK-style tools
    #[arg(long)]
    pub no_phone_home: bool,
}

/// Arguments for the `coverage` stage.
#[derive(Debug, Clone, clap::Args)]
pub struct CoverageArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Aligned, duplicate-marked BAM
    #[arg(short, long)]
    pub bam: PathBuf,

    /// Target-region file (.bed)
    #[arg(long)]
    pub bed: PathBuf,

    /// Suppress external telemetry of the GATK-style tools
    #[arg(long)]
    pub no_phone_home: bool,
}

/// Arguments for the `config` command.
#[derive(Debug, Clone, clap::Args)]
pub struct ConfigShowArgs {
    /// Pipeline configuration file (YAML)
    #[arg(short, long)]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
