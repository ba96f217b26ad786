//! Command-line interface for seqpipe.
//!
//! - [`args`] - argument definitions using clap derive macros
//! - [`dispatcher`] - routing from subcommands to stage implementations

pub mod args;
pub mod dispatcher;

pub use args::{
    AggregateArgs, AlignArgs, Cli, Commands, CommonArgs, CoverageArgs, GenotypeArgs, MetricsArgs,
    RefineArgs,
};
pub use dispatcher::{CommandDispatcher, CommandResult};
