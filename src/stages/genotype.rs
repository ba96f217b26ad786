//! Genotype stage: one scatter-gather member producing a gVCF slice.
//!
//! Runs as a scheduler array over a BAM list; member `k` calls variants
//! for the `k`th BAM and, only after its steps succeed, writes the
//! group's completion marker for task index `k`. The marker is what the
//! downstream `aggregate` stage trusts; the scheduler's hold-release is
//! not a completion signal.

use crate::error::Result;
use crate::scatter::ScatterGroup;
use crate::shell::{CommandChain, CommandSpec};
use crate::stage::{Stage, StageContext, Step};
use crate::stages::{phone_home_args, require_extension, require_file};
use std::path::PathBuf;

pub struct GenotypeStage<'a> {
    ctx: &'a StageContext<'a>,
    bam: PathBuf,
    prefix: String,
    group: ScatterGroup,
}

impl<'a> GenotypeStage<'a> {
    pub fn new(ctx: &'a StageContext<'a>, bam: PathBuf, prefix: String) -> Self {
        let group = ScatterGroup::new(&ctx.out_dir, prefix.clone());
        Self {
            ctx,
            bam,
            prefix,
            group,
        }
    }

    /// This member's gVCF slice: `{prefix}.{index}.g.vcf`.
    pub fn gvcf(&self) -> PathBuf {
        self.ctx
            .out_dir
            .join(format!("{}.{}.g.vcf", self.prefix, self.ctx.task_index))
    }
}

impl Stage for GenotypeStage<'_> {
    fn name(&self) -> &'static str {
        "genotype"
    }

    fn preflight(&self) -> Result<()> {
        require_file(&self.bam)?;
        if let Some(bed) = &self.ctx.bed {
            require_extension(bed, "bed")?;
            require_file(bed)?;
        }
        phone_home_args(self.ctx).map(|_| ())
    }

    fn steps(&self) -> Result<Vec<Step>> {
        let cfg = self.ctx.config;

        let mut caller = CommandSpec::new(&cfg.gatk)
            .arg("-T")
            .arg("HaplotypeCaller")
            .arg("-R")
            .path_arg(&cfg.reference)
            .arg("-I")
            .path_arg(&self.bam)
            .arg("--emitRefConfidence")
            .arg("GVCF")
            .arg("--dbsnp")
            .path_arg(&cfg.dbsnp);
        if let Some(bed) = &self.ctx.bed {
            caller = caller.arg("-L").path_arg(bed);
        }
        caller = caller
            .arg("-o")
            .path_arg(self.gvcf())
            .args(phone_home_args(self.ctx)?);

        Ok(vec![Step::new("haplotype-caller", CommandChain::new(caller))])
    }

    fn on_success(&self) -> Result<()> {
        self.group.write_marker(self.ctx.task_index)
    }
}
