//! The declared stage graph and its dispatcher.
//!
//! - [`link`] - [`PipelineLink`] declarations (trigger, target, argv)
//! - [`chainer`] - fire-and-forget enqueueing of downstream stages

pub mod chainer;
pub mod link;

pub use chainer::fire_links;
pub use link::{PipelineLink, StageId, Trigger};
