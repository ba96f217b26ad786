//! Coverage stage: depth of coverage over a target-region file.
//!
//! Chained from `align` under `--coverage`; terminal.

use crate::error::Result;
use crate::shell::{CommandChain, CommandSpec};
use crate::stage::{Stage, StageContext, Step};
use crate::stages::{bam_base, phone_home_args, require_extension, require_file};
use std::path::PathBuf;

pub struct CoverageStage<'a> {
    ctx: &'a StageContext<'a>,
    bam: PathBuf,
    bed: PathBuf,
}

impl<'a> CoverageStage<'a> {
    pub fn new(ctx: &'a StageContext<'a>, bam: PathBuf, bed: PathBuf) -> Self {
        Self { ctx, bam, bed }
    }
}

impl Stage for CoverageStage<'_> {
    fn name(&self) -> &'static str {
        "coverage"
    }

    fn preflight(&self) -> Result<()> {
        require_file(&self.bam)?;
        require_extension(&self.bed, "bed")?;
        require_file(&self.bed)?;
        phone_home_args(self.ctx).map(|_| ())
    }

    fn steps(&self) -> Result<Vec<Step>> {
        let cfg = self.ctx.config;
        let out = self
            .ctx
            .out_dir
            .join(format!("{}.coverage", bam_base(&self.bam)));

        let depth = CommandSpec::new(&cfg.gatk)
            .arg("-T")
            .arg("DepthOfCoverage")
            .arg("-R")
            .path_arg(&cfg.reference)
            .arg("-I")
            .path_arg(&self.bam)
            .arg("-L")
            .path_arg(&self.bed)
            .arg("-o")
            .path_arg(&out)
            .args(phone_home_args(self.ctx)?);

        Ok(vec![Step::new("depth-of-coverage", CommandChain::new(depth))])
    }
}
