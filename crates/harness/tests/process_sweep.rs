// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Integration tests: process sweep against stand-in shell scripts.

#![cfg(unix)]

use harness::{
    FailurePolicy, HarnessError, InvocationOutcome, ProcessSweepConfig, ProcessTimer,
};
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

// ── Helpers ────────────────────────────────────────────────────

/// Writes an executable `/bin/sh` script into `dir`.
fn write_script(dir: &Path, name: &str, body: &str) {
    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();
}

fn config(dir: &Path, executable: &str, counts: &[u64]) -> ProcessSweepConfig {
    ProcessSweepConfig {
        working_dir: dir.to_path_buf(),
        executable: executable.into(),
        model_path: "../nn/gnn.pt".into(),
        simulation_counts: counts.to_vec(),
        on_failure: FailurePolicy::Continue,
    }
}

fn read_lines(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_owned)
        .collect()
}

// ── Properties ─────────────────────────────────────────────────

#[test]
fn test_arguments_passed_in_order() {
    let dir = tempfile::tempdir().unwrap();
    write_script(dir.path(), "sim.sh", r#"echo "$1 $2" >> args.log"#);

    let mut announced = Vec::new();
    let report = ProcessTimer::new(config(dir.path(), "sim.sh", &[100, 200]))
        .unwrap()
        .run(|n| announced.push(n))
        .unwrap();

    assert_eq!(announced, vec![100, 200]);
    assert!(report.all_succeeded());
    assert_eq!(
        read_lines(&dir.path().join("args.log")),
        vec!["100 ../nn/gnn.pt", "200 ../nn/gnn.pt"]
    );
}

#[test]
fn test_child_runs_in_working_dir() {
    let dir = tempfile::tempdir().unwrap();
    write_script(dir.path(), "where.sh", "pwd > cwd.log");

    ProcessTimer::new(config(dir.path(), "where.sh", &[1]))
        .unwrap()
        .run(|_| {})
        .unwrap();

    let recorded = std::fs::canonicalize(read_lines(&dir.path().join("cwd.log"))[0].trim()).unwrap();
    assert_eq!(recorded, std::fs::canonicalize(dir.path()).unwrap());
}

#[test]
fn test_invocations_do_not_overlap() {
    let dir = tempfile::tempdir().unwrap();
    // A second invocation starting before the first finished would find
    // the lock file still present.
    write_script(
        dir.path(),
        "slow.sh",
        r#"if [ -e running.lock ]; then echo overlap >> overlap.log; fi
touch running.lock
echo "start $1" >> events.log
sleep 0.1
echo "end $1" >> events.log
rm running.lock"#,
    );

    ProcessTimer::new(config(dir.path(), "slow.sh", &[1, 2, 3]))
        .unwrap()
        .run(|_| {})
        .unwrap();

    assert!(!dir.path().join("overlap.log").exists());
    assert_eq!(
        read_lines(&dir.path().join("events.log")),
        vec!["start 1", "end 1", "start 2", "end 2", "start 3", "end 3"]
    );
}

#[test]
fn test_failure_continues_by_default() {
    let dir = tempfile::tempdir().unwrap();
    write_script(
        dir.path(),
        "flaky.sh",
        r#"echo "$1" >> seen.log
if [ "$1" = "200" ]; then exit 3; fi"#,
    );

    let report = ProcessTimer::new(config(dir.path(), "flaky.sh", &[100, 200, 500]))
        .unwrap()
        .run(|_| {})
        .unwrap();

    assert_eq!(read_lines(&dir.path().join("seen.log")), vec!["100", "200", "500"]);
    assert_eq!(report.len(), 3);
    assert_eq!(report.records[1].outcome, InvocationOutcome::Failed { code: Some(3) });
    assert!(report.records[2].outcome.is_success());
    assert_eq!(report.failures().count(), 1);
}

#[test]
fn test_failure_aborts_under_abort_policy() {
    let dir = tempfile::tempdir().unwrap();
    write_script(
        dir.path(),
        "flaky.sh",
        r#"echo "$1" >> seen.log
if [ "$1" = "200" ]; then exit 3; fi"#,
    );

    let mut cfg = config(dir.path(), "flaky.sh", &[100, 200, 500]);
    cfg.on_failure = FailurePolicy::Abort;
    let err = ProcessTimer::new(cfg).unwrap().run(|_| {}).unwrap_err();

    assert!(matches!(
        err,
        HarnessError::InvocationFailed {
            simulation_count: 200,
            ..
        }
    ));
    assert_eq!(read_lines(&dir.path().join("seen.log")), vec!["100", "200"]);
}

#[test]
fn test_wall_time_is_recorded() {
    let dir = tempfile::tempdir().unwrap();
    write_script(dir.path(), "nap.sh", "sleep 0.05");

    let report = ProcessTimer::new(config(dir.path(), "nap.sh", &[10]))
        .unwrap()
        .run(|_| {})
        .unwrap();

    assert!(report.records[0].wall_time.as_millis() >= 40);
}
