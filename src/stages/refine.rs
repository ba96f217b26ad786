//! Refine stage: indel realignment and base-quality recalibration.
//!
//! Chained from `align` under `--chain`. Recalibration is a step-list
//! construction decision: with `--skip-recal` the stage ends at the
//! realigned BAM and the recalibration steps are never declared.

use crate::error::Result;
use crate::shell::{CommandChain, CommandSpec};
use crate::stage::{Stage, StageContext, Step};
use crate::stages::{bam_base, phone_home_args, require_file};
use std::path::PathBuf;

pub struct RefineStage<'a> {
    ctx: &'a StageContext<'a>,
    bam: PathBuf,
}

impl<'a> RefineStage<'a> {
    pub fn new(ctx: &'a StageContext<'a>, bam: PathBuf) -> Self {
        Self { ctx, bam }
    }

    fn out(&self, suffix: &str) -> PathBuf {
        self.ctx
            .out_dir
            .join(format!("{}.{}", bam_base(&self.bam), suffix))
    }

    fn gatk(&self, tool: &str) -> CommandSpec {
        CommandSpec::new(&self.ctx.config.gatk)
            .arg("-T")
            .arg(tool)
            .arg("-R")
            .path_arg(&self.ctx.config.reference)
    }
}

impl Stage for RefineStage<'_> {
    fn name(&self) -> &'static str {
        "refine"
    }

    fn preflight(&self) -> Result<()> {
        require_file(&self.bam)?;
        // Surfaces a missing phone-home key before any tool runs.
        phone_home_args(self.ctx).map(|_| ())
    }

    fn steps(&self) -> Result<Vec<Step>> {
        let cfg = self.ctx.config;
        let ph = phone_home_args(self.ctx)?;

        let intervals = self.out("intervals");
        let realigned = self.out("realigned.bam");

        let targets = self
            .gatk("RealignerTargetCreator")
            .arg("-I")
            .path_arg(&self.bam)
            .arg("-known")
            .path_arg(&cfg.dbsnp)
            .arg("-o")
            .path_arg(&intervals)
            .args(ph.clone());

        let realign = self
            .gatk("IndelRealigner")
            .arg("-I")
            .path_arg(&self.bam)
            .arg("-targetIntervals")
            .path_arg(&intervals)
            .arg("-o")
            .path_arg(&realigned)
            .args(ph.clone());

        let mut steps = vec![
            Step::new("realign-targets", CommandChain::new(targets)),
            Step::new("indel-realign", CommandChain::new(realign)).cleanup_after(&intervals),
        ];

        if !self.ctx.flags.skip_recal {
            let table = self.out("recal.table");
            let recal_bam = self.out("recal.bam");

            let recal_table = self
                .gatk("BaseRecalibrator")
                .arg("-I")
                .path_arg(&realigned)
                .arg("-knownSites")
                .path_arg(&cfg.dbsnp)
                .arg("-o")
                .path_arg(&table)
                .args(ph.clone());

            let apply = self
                .gatk("PrintReads")
                .arg("-I")
                .path_arg(&realigned)
                .arg("-BQSR")
                .path_arg(&table)
                .arg("-o")
                .path_arg(&recal_bam)
                .args(ph);

            steps.push(Step::new("recalibration-table", CommandChain::new(recal_table)));
            steps.push(Step::new("apply-recalibration", CommandChain::new(apply))
                .cleanup_after(&realigned));
        }

        Ok(steps)
    }
}
