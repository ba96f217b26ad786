//! Aggregate stage: barrier-checked joint genotyping.
//!
//! Consumes a `.list` of gVCF slice paths. Before any step runs, the
//! scatter barrier is verified: a marker must exist for every expected
//! task index. An incomplete marker set is a hard error; this stage never
//! proceeds just because the scheduler released its hold.

use crate::error::Result;
use crate::scatter::ScatterGroup;
use crate::shell::{CommandChain, CommandSpec};
use crate::stage::{Stage, StageContext, Step};
use crate::stages::{phone_home_args, require_extension, require_file};
use std::path::PathBuf;

pub struct AggregateStage<'a> {
    ctx: &'a StageContext<'a>,
    list: PathBuf,
    prefix: String,
    expected: usize,
}

impl<'a> AggregateStage<'a> {
    /// `expected` is the scatter group size: the number of gVCF slices
    /// (and therefore markers) the list promises.
    pub fn new(ctx: &'a StageContext<'a>, list: PathBuf, prefix: String, expected: usize) -> Self {
        Self {
            ctx,
            list,
            prefix,
            expected,
        }
    }

    /// The cohort VCF this stage produces.
    pub fn vcf(&self) -> PathBuf {
        self.ctx.out_dir.join(format!("{}.vcf", self.prefix))
    }
}

impl Stage for AggregateStage<'_> {
    fn name(&self) -> &'static str {
        "aggregate"
    }

    fn preflight(&self) -> Result<()> {
        require_extension(&self.list, "list")?;
        require_file(&self.list)?;
        phone_home_args(self.ctx).map(|_| ())?;

        let group = ScatterGroup::new(&self.ctx.out_dir, self.prefix.clone());
        group.verify_complete(self.expected)
    }

    fn steps(&self) -> Result<Vec<Step>> {
        let cfg = self.ctx.config;

        let joint = CommandSpec::new(&cfg.gatk)
            .arg("-T")
            .arg("GenotypeGVCFs")
            .arg("-R")
            .path_arg(&cfg.reference)
            .arg("--dbsnp")
            .path_arg(&cfg.dbsnp)
            .arg("-V")
            .path_arg(&self.list)
            .arg("-o")
            .path_arg(self.vcf())
            .args(phone_home_args(self.ctx)?);

        Ok(vec![Step::new("joint-genotype", CommandChain::new(joint))])
    }
}
