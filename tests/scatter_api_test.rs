//! Integration tests for scatter-gather coordination.

use seqpipe::scatter::ScatterGroup;
use seqpipe::SeqpipeError;
use tempfile::TempDir;

#[test]
fn group_of_four_successes_yields_exactly_four_markers() {
    let dir = TempDir::new().unwrap();
    let group = ScatterGroup::new(dir.path(), "cohort");
    for i in 1..=4 {
        group.write_marker(i).unwrap();
    }

    // The aggregation check counts exactly four markers before proceeding.
    group.verify_complete(4).unwrap();
    let entries = std::fs::read_dir(group.dir()).unwrap().count();
    assert_eq!(entries, 4);
}

#[test]
fn fewer_successes_mean_fewer_markers_and_a_failed_barrier() {
    let dir = TempDir::new().unwrap();
    let group = ScatterGroup::new(dir.path(), "cohort");
    for i in [1, 2, 4] {
        group.write_marker(i).unwrap();
    }

    match group.verify_complete(4).unwrap_err() {
        SeqpipeError::IncompleteScatterGroup { found, missing, .. } => {
            assert_eq!(found, 3);
            assert_eq!(missing, "3");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn markers_are_scoped_to_their_group_prefix() {
    let dir = TempDir::new().unwrap();
    let cohort_a = ScatterGroup::new(dir.path(), "batchA");
    let cohort_b = ScatterGroup::new(dir.path(), "batchB");
    cohort_a.write_marker(1).unwrap();

    assert!(cohort_a.verify_complete(1).is_ok());
    assert!(cohort_b.verify_complete(1).is_err());
}
