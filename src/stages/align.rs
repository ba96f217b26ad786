//! Alignment stage: align one sample's reads, sort, mark duplicates.
//!
//! Runs as one member of a scheduler array, one work-table row per task.
//! On success it always chains into `metrics`, and conditionally into
//! `refine` (`--chain`) and `coverage` (`--coverage`).

use crate::error::{Result, SeqpipeError};
use crate::pipeline::{PipelineLink, StageId, Trigger};
use crate::shell::{CommandChain, CommandSpec};
use crate::stage::{Stage, StageContext, Step};
use crate::stages::{forward_common, require_extension};
use crate::worktable::WorkItem;
use std::path::PathBuf;

pub struct AlignStage<'a> {
    ctx: &'a StageContext<'a>,
    item: WorkItem,
}

impl<'a> AlignStage<'a> {
    pub fn new(ctx: &'a StageContext<'a>, item: WorkItem) -> Self {
        Self { ctx, item }
    }

    fn raw_bam(&self) -> PathBuf {
        self.ctx.out_dir.join(format!("{}.raw.bam", self.item.base_name))
    }

    fn sorted_bam(&self) -> PathBuf {
        self.ctx.out_dir.join(format!("{}.sorted.bam", self.item.base_name))
    }

    /// The stage's primary output, forwarded to every downstream stage.
    pub fn dedup_bam(&self) -> PathBuf {
        self.ctx
            .out_dir
            .join(format!("{}.sorted.dedup.bam", self.item.base_name))
    }

    /// The alignment pipe: aligner, optional quality-encoding filter,
    /// BAM conversion. The filter is spliced between producer and
    /// consumer so it shares the step's fail-fast unit.
    fn alignment_chain(&self) -> CommandChain {
        let cfg = self.ctx.config;

        let mut aligner = CommandSpec::new(&cfg.bwa)
            .arg("mem")
            .arg("-M")
            .arg("-t")
            .arg(cfg.threads.to_string())
            .arg("-R")
            .arg(&self.item.read_group)
            .path_arg(&cfg.reference)
            .path_arg(&self.item.primary);
        if let Some(secondary) = &self.item.secondary {
            aligner = aligner.path_arg(secondary);
        }

        let to_bam = CommandSpec::new(&cfg.samtools).arg("view").arg("-b").arg("-");

        let mut chain = CommandChain::new(aligner)
            .pipe(to_bam)
            .stdout_to(self.raw_bam());
        if self.ctx.flags.fix_quality {
            chain.splice_after(
                0,
                CommandSpec::new(&cfg.seqtk).arg("seq").arg("-Q64").arg("-V").arg("-"),
            );
        }
        chain
    }
}

impl Stage for AlignStage<'_> {
    fn name(&self) -> &'static str {
        "align"
    }

    fn preflight(&self) -> Result<()> {
        if let Some(bed) = &self.ctx.bed {
            require_extension(bed, "bed")?;
        }
        if self.ctx.flags.coverage && self.ctx.bed.is_none() {
            return Err(SeqpipeError::ConfigValidationError {
                message: "--coverage requires --bed".into(),
            });
        }
        Ok(())
    }

    fn steps(&self) -> Result<Vec<Step>> {
        let cfg = self.ctx.config;
        let threads = cfg.threads.to_string();

        let sort = CommandSpec::new(&cfg.sambamba)
            .arg("sort")
            .arg("-t")
            .arg(&threads)
            .arg("--tmpdir")
            .path_arg(&cfg.tmp_dir)
            .arg("-o")
            .path_arg(self.sorted_bam())
            .path_arg(self.raw_bam());

        let markdup = CommandSpec::new(&cfg.sambamba)
            .arg("markdup")
            .arg("-t")
            .arg(&threads)
            .path_arg(self.sorted_bam())
            .path_arg(self.dedup_bam());

        let index = CommandSpec::new(&cfg.samtools)
            .arg("index")
            .path_arg(self.dedup_bam());

        Ok(vec![
            Step::new("align-reads", self.alignment_chain()),
            Step::new("sort", CommandChain::new(sort)).cleanup_after(self.raw_bam()),
            Step::new("mark-duplicates", CommandChain::new(markdup))
                .cleanup_after(self.sorted_bam()),
            Step::new("index", CommandChain::new(index)),
        ])
    }

    fn links(&self) -> Vec<PipelineLink> {
        let bam = self.dedup_bam().to_string_lossy().into_owned();
        let mut common = forward_common(self.ctx);
        common.extend(["--bam".to_string(), bam]);

        let mut refine = common.clone();
        if self.ctx.flags.skip_recal {
            refine.push("--skip-recal".into());
        }
        if self.ctx.flags.no_phone_home {
            refine.push("--no-phone-home".into());
        }

        let mut coverage = common.clone();
        if let Some(bed) = &self.ctx.bed {
            coverage.extend(["--bed".to_string(), bed.to_string_lossy().into_owned()]);
        }

        vec![
            PipelineLink::always(StageId::Metrics, common),
            PipelineLink::gated(Trigger::Chain, StageId::Refine, refine),
            PipelineLink::gated(Trigger::Coverage, StageId::Coverage, coverage),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipelineConfig;
    use crate::stage::StageFlags;
    use std::path::Path;

    fn item() -> WorkItem {
        WorkItem {
            primary: "/data/reads_R1.fastq.gz".into(),
            read_group: "@RG\\tID:S1\\tSM:S1".into(),
            secondary: Some("/data/reads_R2.fastq.gz".into()),
            base_name: "reads".into(),
        }
    }

    fn context(config: &PipelineConfig, flags: StageFlags) -> StageContext<'_> {
        StageContext {
            config,
            config_path: "/cluster/pipeline.yml".into(),
            task_index: 1,
            flags,
            log_path: "/out/reads.log".into(),
            out_dir: "/out".into(),
            bed: None,
        }
    }

    #[test]
    fn alignment_step_pipes_aligner_into_bam_conversion() {
        let config = PipelineConfig::default();
        let ctx = context(&config, StageFlags::default());
        let stage = AlignStage::new(&ctx, item());

        let steps = stage.steps().unwrap();
        assert_eq!(steps[0].name, "align-reads");
        let rendered = steps[0].chain.render();
        assert!(rendered.contains("bwa mem"));
        assert!(rendered.contains("reads_R1.fastq.gz /data/reads_R2.fastq.gz"));
        assert!(rendered.contains("| samtools view -b -"));
        assert!(rendered.ends_with("> /out/reads.raw.bam"));
    }

    #[test]
    fn quality_fix_splices_exactly_one_filter() {
        let config = PipelineConfig::default();

        let plain_ctx = context(&config, StageFlags::default());
        let plain: Vec<_> = AlignStage::new(&plain_ctx, item()).steps().unwrap();

        let fix_ctx = context(
            &config,
            StageFlags {
                fix_quality: true,
                ..Default::default()
            },
        );
        let fixed: Vec<_> = AlignStage::new(&fix_ctx, item()).steps().unwrap();

        assert_eq!(fixed[0].chain.len(), plain[0].chain.len() + 1);
        assert!(fixed[0].chain.render().contains("bwa"));
        assert!(fixed[0]
            .chain
            .render()
            .contains("| seqtk seq -Q64 -V - | samtools view"));

        // Every other step is unchanged by the flag.
        for (p, f) in plain.iter().zip(fixed.iter()).skip(1) {
            assert_eq!(p.chain.render(), f.chain.render());
        }
    }

    #[test]
    fn intermediates_are_cleaned_by_their_consumers() {
        let config = PipelineConfig::default();
        let ctx = context(&config, StageFlags::default());
        let steps = AlignStage::new(&ctx, item()).steps().unwrap();

        assert_eq!(steps[1].name, "sort");
        assert_eq!(steps[1].cleanup, vec![Path::new("/out/reads.raw.bam")]);
        assert_eq!(steps[2].cleanup, vec![Path::new("/out/reads.sorted.bam")]);
        assert!(steps[0].cleanup.is_empty());
    }

    #[test]
    fn metrics_link_is_unconditional_refine_is_gated() {
        let config = PipelineConfig::default();
        let ctx = context(&config, StageFlags::default());
        let links = AlignStage::new(&ctx, item()).links();

        assert_eq!(links[0].stage, StageId::Metrics);
        assert!(links[0].should_fire(&StageFlags::default()));
        assert_eq!(links[1].stage, StageId::Refine);
        assert!(!links[1].should_fire(&StageFlags::default()));
        assert!(links[1].should_fire(&StageFlags {
            chain: true,
            ..Default::default()
        }));
    }

    #[test]
    fn refine_link_forwards_stage_flags() {
        let config = PipelineConfig::default();
        let ctx = context(
            &config,
            StageFlags {
                chain: true,
                skip_recal: true,
                ..Default::default()
            },
        );
        let links = AlignStage::new(&ctx, item()).links();

        let refine = &links[1];
        assert!(refine.forward.contains(&"--skip-recal".to_string()));
        assert!(refine.forward.contains(&"--config".to_string()));
        assert!(refine
            .forward
            .contains(&"/out/reads.sorted.dedup.bam".to_string()));
    }

    #[test]
    fn coverage_without_bed_fails_preflight() {
        let config = PipelineConfig::default();
        let ctx = context(
            &config,
            StageFlags {
                coverage: true,
                ..Default::default()
            },
        );
        assert!(AlignStage::new(&ctx, item()).preflight().is_err());
    }
}
