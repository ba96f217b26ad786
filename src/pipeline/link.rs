//! Static downstream-stage declarations.

use crate::stage::StageFlags;

/// Identifier of a pipeline stage, doubling as its CLI subcommand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageId {
    Align,
    Metrics,
    Refine,
    Genotype,
    Aggregate,
    Coverage,
}

impl StageId {
    /// The subcommand used to invoke this stage.
    pub fn subcommand(self) -> &'static str {
        match self {
            StageId::Align => "align",
            StageId::Metrics => "metrics",
            StageId::Refine => "refine",
            StageId::Genotype => "genotype",
            StageId::Aggregate => "aggregate",
            StageId::Coverage => "coverage",
        }
    }
}

/// Condition under which a link fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Fires on every successful completion of the declaring stage.
    Always,

    /// Fires only when the stage ran with `--chain`.
    Chain,

    /// Fires only when the stage ran with `--coverage`.
    Coverage,
}

/// A declared edge of the stage graph: on success of the declaring stage,
/// invoke `stage` with `forward` as its argument vector.
///
/// Links are evaluated in declaration order, but firing is asynchronous
/// and fire-and-forget: nothing downstream may rely on the order in which
/// independently fired stages actually run.
#[derive(Debug, Clone)]
pub struct PipelineLink {
    pub trigger: Trigger,
    pub stage: StageId,
    pub forward: Vec<String>,
}

impl PipelineLink {
    /// Declare an unconditional link.
    pub fn always(stage: StageId, forward: Vec<String>) -> Self {
        Self {
            trigger: Trigger::Always,
            stage,
            forward,
        }
    }

    /// Declare a flag-gated link.
    pub fn gated(trigger: Trigger, stage: StageId, forward: Vec<String>) -> Self {
        Self {
            trigger,
            stage,
            forward,
        }
    }

    /// Whether this link fires for the given invocation flags.
    pub fn should_fire(&self, flags: &StageFlags) -> bool {
        match self.trigger {
            Trigger::Always => true,
            Trigger::Chain => flags.chain,
            Trigger::Coverage => flags.coverage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn always_fires_regardless_of_flags() {
        let link = PipelineLink::always(StageId::Metrics, vec![]);
        assert!(link.should_fire(&StageFlags::default()));
    }

    #[test]
    fn chain_link_requires_chain_flag() {
        let link = PipelineLink::gated(Trigger::Chain, StageId::Refine, vec![]);
        assert!(!link.should_fire(&StageFlags::default()));
        assert!(link.should_fire(&StageFlags {
            chain: true,
            ..Default::default()
        }));
    }

    #[test]
    fn coverage_link_requires_coverage_flag() {
        let link = PipelineLink::gated(Trigger::Coverage, StageId::Coverage, vec![]);
        assert!(!link.should_fire(&StageFlags {
            chain: true,
            ..Default::default()
        }));
        assert!(link.should_fire(&StageFlags {
            coverage: true,
            ..Default::default()
        }));
    }

    #[test]
    fn stage_ids_map_to_subcommands() {
        assert_eq!(StageId::Aggregate.subcommand(), "aggregate");
        assert_eq!(StageId::Align.subcommand(), "align");
    }
}
