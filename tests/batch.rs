//! End-to-end batch runs over instance files in a temporary directory.

use std::fs;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use flowshop_neh::batch::{BatchConfig, BatchRunner, ResultRecord, TaskStatus};
use flowshop_neh::flowshop::{read_matrix_csv, Evaluator, Variant};

const INSTANCE_A: &str = "2 3\n2 3 1\n4 1 5\n";
const INSTANCE_B: &str = "3 4\n5 2 7 3\n1 6 4 8\n3 3 2 9\n";
const INSTANCE_C: &str = "1 5\n4 2 9 1 3\n";

fn write_instances(dir: &Path, instances: &[(u32, &str)]) {
    for (index, text) in instances {
        fs::write(dir.join(format!("{index}.txt")), text).unwrap();
    }
}

fn input_prefix(dir: &Path) -> String {
    format!("{}/", dir.display())
}

/// Re-evaluates a recorded sequence against its instance file.
fn assert_matches_direct(dir: &Path, record: &ResultRecord, variant: Variant) {
    let sequence: Vec<usize> = record
        .sequence
        .trim_matches(|c| c == '[' || c == ']')
        .split('-')
        .map(|s| s.parse().unwrap())
        .collect();
    let path = dir.join(format!("{}.txt", record.instance));
    let eval = Evaluator::from_file(path, variant).unwrap();
    let schedule = eval.evaluate(&sequence).unwrap();
    assert_eq!(schedule.makespan(), record.makespan, "{variant}");
    assert_eq!(schedule.total_flow_time(), record.total_flow_time, "{variant}");
}

#[test]
fn test_batch_success_populates_every_row() {
    let dir = tempfile::tempdir().unwrap();
    write_instances(dir.path(), &[(1, INSTANCE_A), (2, INSTANCE_B), (3, INSTANCE_C)]);
    let results = dir.path().join("results.csv");

    let config = BatchConfig::default()
        .with_range(1, 3)
        .with_threads(2)
        .with_variant(Variant::Unlimited)
        .with_input_dir(input_prefix(dir.path()))
        .with_results_file(results.to_str().unwrap())
        .with_seed(11);

    let outcome = BatchRunner::run(&config).unwrap();
    assert_eq!(outcome.status, TaskStatus::Ok);
    assert_eq!(outcome.attempted, 3);
    assert!(outcome.table.is_complete());

    let a = outcome.table.get(1).unwrap();
    assert_eq!(a.instance, 1);
    assert_eq!(a.makespan, 11);
    assert_eq!(a.evaluations, 5);

    // single machine: makespan is the sum of all processing times
    assert_eq!(outcome.table.get(3).unwrap().makespan, 19);

    let text = fs::read_to_string(&results).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("Data Set,cMax,TFT"));
    assert!(lines[1].starts_with("1,11,"));
}

#[test]
fn test_batch_records_match_direct_evaluation() {
    let dir = tempfile::tempdir().unwrap();
    write_instances(dir.path(), &[(0, INSTANCE_B)]);

    for variant in Variant::ALL {
        let config = BatchConfig::default()
            .with_range(0, 0)
            .with_variant(variant)
            .with_input_dir(input_prefix(dir.path()))
            .with_seed(3);
        let outcome = BatchRunner::run(&config).unwrap();
        let record = outcome.table.get(0).unwrap();
        assert_matches_direct(dir.path(), record, variant);
    }
}

#[test]
fn test_batch_writes_time_matrices() {
    let dir = tempfile::tempdir().unwrap();
    write_instances(dir.path(), &[(4, INSTANCE_A), (5, INSTANCE_B)]);
    let template = dir.path().join("times_%TEST%");

    let config = BatchConfig::default()
        .with_range(4, 5)
        .with_threads(2)
        .with_variant(Variant::NoWait)
        .with_input_dir(input_prefix(dir.path()))
        .with_times_file(template.to_str().unwrap());

    let outcome = BatchRunner::run(&config).unwrap();
    assert!(outcome.status.is_ok());

    for (index, machines, jobs) in [(4u32, 2usize, 3usize), (5, 3, 4)] {
        let start = read_matrix_csv(dir.path().join(format!("times_{index}_start.csv"))).unwrap();
        let depart = read_matrix_csv(dir.path().join(format!("times_{index}_depart.csv"))).unwrap();
        assert_eq!((start.rows(), start.cols()), (machines, jobs));
        assert_eq!((depart.rows(), depart.cols()), (machines, jobs));

        let record = outcome.table.get(index).unwrap();
        let last = depart.row(machines - 1);
        assert_eq!(last[jobs - 1], record.makespan);
        assert_eq!(last.iter().sum::<u64>(), record.total_flow_time);
    }
}

#[test]
fn test_batch_fail_fast_single_thread() {
    let dir = tempfile::tempdir().unwrap();
    // instance 2 is missing
    write_instances(dir.path(), &[(1, INSTANCE_A), (3, INSTANCE_C)]);
    let results = dir.path().join("results.csv");

    let config = BatchConfig::default()
        .with_range(1, 3)
        .with_threads(1)
        .with_input_dir(input_prefix(dir.path()))
        .with_results_file(results.to_str().unwrap());

    let outcome = BatchRunner::run(&config).unwrap();
    assert_eq!(outcome.status, TaskStatus::LoadFailed);
    assert_ne!(outcome.status.code(), 0);

    // instance 1 ran before the failure, instance 3 was never started
    assert_eq!(outcome.table.get(1).map(|r| r.makespan), Some(11));
    assert!(outcome.table.get(2).is_none());
    assert!(outcome.table.get(3).is_none());
    assert_eq!(outcome.attempted, 2);

    // failed batches do not export
    assert!(!results.exists());
}

#[test]
fn test_batch_fail_fast_two_threads() {
    let dir = tempfile::tempdir().unwrap();
    write_instances(dir.path(), &[(1, INSTANCE_A), (3, INSTANCE_C)]);

    let config = BatchConfig::default()
        .with_range(1, 3)
        .with_threads(2)
        .with_input_dir(input_prefix(dir.path()));

    let outcome = BatchRunner::run(&config).unwrap();
    assert_eq!(outcome.status, TaskStatus::LoadFailed);
    assert!(outcome.table.get(2).is_none());

    // instance 2 must have started for the batch to fail
    assert!(outcome.attempted >= 2);
    assert!(outcome.table.completed() < 3);
    for record in outcome.table.iter().filter_map(|(_, r)| r) {
        assert_matches_direct(dir.path(), record, Variant::Unlimited);
    }
    if let Some(record) = outcome.table.get(1) {
        assert_eq!(record.makespan, 11);
    }
}

#[test]
fn test_batch_malformed_instance() {
    let dir = tempfile::tempdir().unwrap();
    write_instances(dir.path(), &[(0, "2 3\n1 2 3\n")]);

    let config = BatchConfig::default()
        .with_range(0, 0)
        .with_input_dir(input_prefix(dir.path()));

    let outcome = BatchRunner::run(&config).unwrap();
    assert_eq!(outcome.status, TaskStatus::LoadFailed);
    assert_eq!(outcome.table.completed(), 0);
}

#[test]
fn test_batch_cancelled_before_start() {
    let dir = tempfile::tempdir().unwrap();
    write_instances(dir.path(), &[(1, INSTANCE_A), (2, INSTANCE_B)]);

    let config = BatchConfig::default()
        .with_range(1, 2)
        .with_threads(2)
        .with_input_dir(input_prefix(dir.path()));

    let cancel = Arc::new(AtomicBool::new(true));
    let outcome = BatchRunner::run_with_cancel(&config, Some(cancel)).unwrap();
    assert_eq!(outcome.status, TaskStatus::Cancelled);
    assert_eq!(outcome.attempted, 0);
    assert_eq!(outcome.table.completed(), 0);
}

#[test]
fn test_batch_from_parameter_file() {
    let dir = tempfile::tempdir().unwrap();
    write_instances(dir.path(), &[(7, INSTANCE_B)]);
    let params = dir.path().join("params.toml");
    fs::write(
        &params,
        format!(
            "[test]\nminTestFile = 7\nmaxTestFile = 7\nnumThreads = 99\nalgorithm = 5\ninputFilesDir = \"{}\"\n",
            input_prefix(dir.path())
        ),
    )
    .unwrap();

    let config = BatchConfig::from_file(&params).unwrap();
    assert_eq!(config.threads(), 1);
    assert_eq!(config.variant(), Variant::Unlimited);

    let outcome = BatchRunner::run(&config).unwrap();
    assert!(outcome.status.is_ok());
    assert!(outcome.table.get(7).is_some());
}
