//! seqpipe - Batch-scheduler orchestration for an alignment and
//! joint-genotyping pipeline.
//!
//! Each pipeline stage runs as one OS process, typically a member of a
//! scheduler array. A stage resolves its unit of work, executes an
//! ordered list of external-tool steps with fail-fast semantics and
//! uniform logging, and on success chains into its declared downstream
//! stages. Scatter-gather stages coordinate through filesystem completion
//! markers that the aggregation stage verifies explicitly.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and subcommand dispatch
//! - [`config`] - Pipeline configuration loading and validation
//! - [`error`] - Error types and result aliases
//! - [`pipeline`] - Declared stage links and fire-and-forget chaining
//! - [`scatter`] - Completion markers and the aggregation barrier
//! - [`shell`] - Typed command descriptors and pipe-chain execution
//! - [`stage`] - Stage context, steps, engine, and the stage log
//! - [`stages`] - The concrete pipeline stages
//! - [`worktable`] - Work table resolution for array tasks
//!
//! # Example
//!
//! ```
//! use seqpipe::worktable::derive_base_name;
//!
//! // All outputs of a sample are named from its reads' base name.
//! assert_eq!(derive_base_name("NA12878_R1.fastq.gz"), "NA12878");
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod scatter;
pub mod shell;
pub mod stage;
pub mod stages;
pub mod worktable;

pub use error::{Result, SeqpipeError};
