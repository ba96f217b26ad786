//! Metrics stage: flag and index statistics for an aligned BAM.
//!
//! Chained unconditionally from `align`; terminal, no links of its own.

use crate::error::Result;
use crate::shell::{CommandChain, CommandSpec};
use crate::stage::{Stage, StageContext, Step};
use crate::stages::{bam_base, require_file};
use std::path::PathBuf;

pub struct MetricsStage<'a> {
    ctx: &'a StageContext<'a>,
    bam: PathBuf,
}

impl<'a> MetricsStage<'a> {
    pub fn new(ctx: &'a StageContext<'a>, bam: PathBuf) -> Self {
        Self { ctx, bam }
    }

    fn out(&self, suffix: &str) -> PathBuf {
        self.ctx
            .out_dir
            .join(format!("{}.{}", bam_base(&self.bam), suffix))
    }
}

impl Stage for MetricsStage<'_> {
    fn name(&self) -> &'static str {
        "metrics"
    }

    fn preflight(&self) -> Result<()> {
        require_file(&self.bam)
    }

    fn steps(&self) -> Result<Vec<Step>> {
        let samtools = &self.ctx.config.samtools;

        let flagstat = CommandChain::new(
            CommandSpec::new(samtools).arg("flagstat").path_arg(&self.bam),
        )
        .stdout_to(self.out("flagstat.txt"));

        let idxstats = CommandChain::new(
            CommandSpec::new(samtools).arg("idxstats").path_arg(&self.bam),
        )
        .stdout_to(self.out("idxstats.txt"));

        Ok(vec![
            Step::new("flagstat", flagstat),
            Step::new("idxstats", idxstats),
        ])
    }
}
