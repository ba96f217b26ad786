//! Base-name derivation for stage output naming.

/// Derive the canonical sample identifier from a read file name.
///
/// Strips every occurrence of the `_R1` mate marker and the `.fq.gz` /
/// `.fastq.gz` suffixes. The result names all derived outputs of a sample,
/// so the derivation must be deterministic and independent of the order
/// the markers appear in.
///
/// ```
/// use seqpipe::worktable::derive_base_name;
/// assert_eq!(derive_base_name("reads_R1.fastq.gz"), "reads");
/// assert_eq!(derive_base_name("S1_R1.fq.gz"), "S1");
/// ```
pub fn derive_base_name(file_name: &str) -> String {
    // `.fastq.gz` before `.fq.gz`: the former contains no occurrence of
    // the latter, but stripping in a fixed order keeps this obvious.
    const MARKERS: &[&str] = &["_R1", ".fastq.gz", ".fq.gz"];

    let mut name = file_name.to_string();
    for marker in MARKERS {
        while let Some(pos) = name.find(marker) {
            name.replace_range(pos..pos + marker.len(), "");
        }
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_mate_marker_and_suffix() {
        assert_eq!(derive_base_name("S1_R1.fastq.gz"), "S1");
        assert_eq!(derive_base_name("S1_R1.fq.gz"), "S1");
    }

    #[test]
    fn suffix_order_independent() {
        // Marker after the suffix normalizes the same way.
        assert_eq!(derive_base_name("S1.fastq.gz_R1"), "S1");
        assert_eq!(derive_base_name("S1.fq.gz_R1"), "S1");
    }

    #[test]
    fn idempotent() {
        let once = derive_base_name("sample_R1.fastq.gz");
        assert_eq!(derive_base_name(&once), once);
    }

    #[test]
    fn single_end_name_keeps_stem() {
        assert_eq!(derive_base_name("sample.fastq.gz"), "sample");
    }

    #[test]
    fn unmarked_name_is_unchanged() {
        assert_eq!(derive_base_name("already_clean"), "already_clean");
    }

    #[test]
    fn strips_all_occurrences() {
        assert_eq!(derive_base_name("a_R1_b_R1.fq.gz"), "a_b");
    }
}
