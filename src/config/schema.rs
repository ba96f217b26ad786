//! Configuration schema definitions for seqpipe.
//!
//! This module contains the struct definitions that map to the pipeline
//! YAML configuration file format. The configuration is loaded once per
//! stage instance and never mutated afterwards; every component receives
//! it by reference.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for pipeline.yml.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Reference genome FASTA.
    pub reference: PathBuf,

    /// Known-variants database (dbSNP VCF), used for recalibration and
    /// passed to the genotyper.
    pub dbsnp: PathBuf,

    /// Genome build identifier (e.g. "GRCh38"), recorded in stage logs.
    pub genome_build: String,

    /// Joint caller / GATK-style toolkit executable.
    #[serde(default = "default_gatk")]
    pub gatk: PathBuf,

    /// Aligner executable.
    #[serde(default = "default_bwa")]
    pub bwa: PathBuf,

    /// samtools executable (BAM conversion, indexing, statistics).
    #[serde(default = "default_samtools")]
    pub samtools: PathBuf,

    /// Sort / duplicate-marking tool executable.
    #[serde(default = "default_sambamba")]
    pub sambamba: PathBuf,

    /// Quality-encoding filter executable, spliced into the alignment
    /// pipe when `--fix-quality` is given.
    #[serde(default = "default_seqtk")]
    pub seqtk: PathBuf,

    /// Directory holding the installed pipeline executable on compute
    /// nodes. When set, downstream stages are launched from here instead
    /// of the current executable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scripts_dir: Option<PathBuf>,

    /// Scheduler submission command (e.g. "qsub"). When set, downstream
    /// stages are enqueued through it rather than spawned directly.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submit: Option<PathBuf>,

    /// GATK phone-home suppression key file, required when a stage runs
    /// with `--no-phone-home`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_home_key: Option<PathBuf>,

    /// Worker threads passed to the aligner and the sorter.
    #[serde(default = "default_threads")]
    pub threads: usize,

    /// Scratch directory for the sorter.
    #[serde(default = "default_tmp_dir")]
    pub tmp_dir: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            reference: PathBuf::new(),
            dbsnp: PathBuf::new(),
            genome_build: String::new(),
            gatk: default_gatk(),
            bwa: default_bwa(),
            samtools: default_samtools(),
            sambamba: default_sambamba(),
            seqtk: default_seqtk(),
            scripts_dir: None,
            submit: None,
            phone_home_key: None,
            threads: default_threads(),
            tmp_dir: default_tmp_dir(),
        }
    }
}

fn default_gatk() -> PathBuf {
    PathBuf::from("gatk")
}

fn default_bwa() -> PathBuf {
    PathBuf::from("bwa")
}

fn default_samtools() -> PathBuf {
    PathBuf::from("samtools")
}

fn default_sambamba() -> PathBuf {
    PathBuf::from("sambamba")
}

fn default_seqtk() -> PathBuf {
    PathBuf::from("seqtk")
}

fn default_threads() -> usize {
    4
}

fn default_tmp_dir() -> PathBuf {
    std::env::temp_dir()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_yaml_fills_tool_defaults() {
        let yaml = r#"
reference: /data/ref/genome.fa
dbsnp: /data/ref/dbsnp.vcf
genome_build: GRCh38
"#;
        let config: PipelineConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.reference, PathBuf::from("/data/ref/genome.fa"));
        assert_eq!(config.bwa, PathBuf::from("bwa"));
        assert_eq!(config.sambamba, PathBuf::from("sambamba"));
        assert_eq!(config.threads, 4);
        assert!(config.submit.is_none());
    }

    #[test]
    fn explicit_tool_paths_override_defaults() {
        let yaml = r#"
reference: ref.fa
dbsnp: dbsnp.vcf
genome_build: hg19
bwa: /opt/bwa/0.7.17/bwa
threads: 12
submit: qsub
"#;
        let config: PipelineConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.bwa, PathBuf::from("/opt/bwa/0.7.17/bwa"));
        assert_eq!(config.threads, 12);
        assert_eq!(config.submit, Some(PathBuf::from("qsub")));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let yaml = "reference: ref.fa\nmystery_knob: 1\n";
        assert!(serde_yaml::from_str::<PipelineConfig>(yaml).is_err());
    }
}
