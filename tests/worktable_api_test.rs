//! Integration tests for work-table resolution through the public API.

use seqpipe::worktable::{derive_base_name, resolve};
use seqpipe::SeqpipeError;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn fixture(rows: &[&str], reads: &[&str]) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    for read in reads {
        fs::write(dir.path().join(read), "@r\nACGT\n+\nIIII\n").unwrap();
    }
    let table = dir.path().join("samples.tsv");
    fs::write(&table, rows.join("\n")).unwrap();
    (dir, table)
}

#[test]
fn paired_end_scenario() {
    // 3-column row at index 1 of a single-row table.
    let (_dir, table) = fixture(
        &["reads_R1.fastq.gz\t@RG\\tID:S1\\tSM:S1\\tPL:ILLUMINA\treads_R2.fastq.gz"],
        &["reads_R1.fastq.gz", "reads_R2.fastq.gz"],
    );

    let item = resolve(&table, 1).unwrap();
    assert!(item.primary.is_absolute());
    assert!(item.primary.ends_with("reads_R1.fastq.gz"));
    assert!(item.secondary.as_ref().unwrap().ends_with("reads_R2.fastq.gz"));
    assert_eq!(item.base_name, "reads");
}

#[test]
fn single_end_scenario() {
    let (_dir, table) = fixture(
        &["sample.fastq.gz\t@RG\\tID:S2\\tSM:S2"],
        &["sample.fastq.gz"],
    );

    let item = resolve(&table, 1).unwrap();
    assert!(item.secondary.is_none());
    assert_eq!(item.base_name, "sample");
}

#[test]
fn every_index_returns_its_own_row() {
    let reads = ["s1.fastq.gz", "s2.fastq.gz", "s3.fastq.gz"];
    let rows: Vec<String> = reads
        .iter()
        .map(|r| format!("{r}\t@RG\\tID:{r}"))
        .collect();
    let row_refs: Vec<&str> = rows.iter().map(String::as_str).collect();
    let (_dir, table) = fixture(&row_refs, &reads);

    for (k, read) in reads.iter().enumerate() {
        let item = resolve(&table, k + 1).unwrap();
        assert!(item.primary.ends_with(read));
    }
    assert!(matches!(
        resolve(&table, 4).unwrap_err(),
        SeqpipeError::IndexOutOfRange { index: 4, rows: 3 }
    ));
}

#[test]
fn base_name_variants_normalize_identically() {
    for name in ["S1_R1.fastq.gz", "S1.fastq.gz_R1", "S1_R1.fq.gz"] {
        assert_eq!(derive_base_name(name), "S1", "variant: {name}");
    }
}
