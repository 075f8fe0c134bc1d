// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! External-process sweep.
//!
//! Launches `<executable> <simulation-count> <model-path>` once per count,
//! strictly one after another. The child runs in the configured working
//! directory and shares this process's stdin, stdout and stderr; it does its
//! own timing. The harness only records how each launch ended.

use crate::{
    FailurePolicy, HarnessError, InvocationOutcome, InvocationRecord, ProcessSweepConfig,
    ProcessSweepReport,
};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Instant;

/// Runs an external executable across a simulation-count sweep.
#[derive(Debug)]
pub struct ProcessTimer {
    config: ProcessSweepConfig,
}

impl ProcessTimer {
    /// Validates `config` and builds the timer.
    pub fn new(config: ProcessSweepConfig) -> Result<Self, HarnessError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ProcessSweepConfig {
        &self.config
    }

    /// Runs the sweep.
    ///
    /// `on_invocation` is called with each simulation count right before
    /// its launch. A missing working directory is fatal before anything is
    /// launched. A failed invocation is fatal only under
    /// [`FailurePolicy::Abort`].
    pub fn run<F>(&self, mut on_invocation: F) -> Result<ProcessSweepReport, HarnessError>
    where
        F: FnMut(u64),
    {
        let working_dir = &self.config.working_dir;
        if !working_dir.is_dir() {
            return Err(HarnessError::WorkingDirMissing {
                path: working_dir.clone(),
            });
        }
        let program = resolve_program(working_dir, &self.config.executable)?;
        tracing::info!(
            "process sweep: {} invocations of '{}' in '{}'",
            self.config.simulation_counts.len(),
            program.display(),
            working_dir.display()
        );

        let mut report = ProcessSweepReport::default();
        for &count in &self.config.simulation_counts {
            on_invocation(count);
            let record = self.invoke(&program, count);

            if !record.outcome.is_success() {
                match self.config.on_failure {
                    FailurePolicy::Continue => {
                        tracing::warn!("nsim = {count}: '{}' {}", program.display(), record.outcome);
                    }
                    FailurePolicy::Abort => {
                        return Err(HarnessError::InvocationFailed {
                            simulation_count: count,
                            outcome: record.outcome.to_string(),
                        });
                    }
                }
            }
            report.records.push(record);
        }

        tracing::info!(
            "process sweep complete: {} invocations, {} failed",
            report.len(),
            report.failures().count()
        );
        Ok(report)
    }

    /// Launches one invocation and blocks until it exits.
    fn invoke(&self, program: &Path, count: u64) -> InvocationRecord {
        let start = Instant::now();
        let status = Command::new(program)
            .arg(count.to_string())
            .arg(&self.config.model_path)
            .current_dir(&self.config.working_dir)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status();
        let wall_time = start.elapsed();

        let outcome = match status {
            Ok(status) if status.success() => InvocationOutcome::Succeeded,
            Ok(status) => InvocationOutcome::Failed {
                code: status.code(),
            },
            Err(e) => InvocationOutcome::LaunchFailed {
                reason: e.to_string(),
            },
        };
        tracing::debug!("nsim = {count}: {outcome} after {:.3} s", wall_time.as_secs_f64());

        InvocationRecord {
            simulation_count: count,
            outcome,
            wall_time,
        }
    }
}

/// Picks `working_dir/executable` when it exists, as an absolute path so it
/// does not depend on the child's working directory. Otherwise the bare
/// name is left for the `PATH` lookup.
fn resolve_program(working_dir: &Path, executable: &str) -> Result<PathBuf, HarnessError> {
    let local = working_dir.join(executable);
    if local.is_file() {
        return std::fs::canonicalize(&local).map_err(|source| HarnessError::Io {
            path: local,
            source,
        });
    }
    tracing::debug!(
        "'{executable}' not found in '{}', falling back to PATH",
        working_dir.display()
    );
    Ok(PathBuf::from(executable))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_empty_counts() {
        let config = ProcessSweepConfig {
            simulation_counts: vec![],
            ..Default::default()
        };
        assert!(ProcessTimer::new(config).is_err());
    }

    #[test]
    fn test_missing_working_dir_is_fatal() {
        let config = ProcessSweepConfig {
            working_dir: "/nonexistent/build/dir".into(),
            ..Default::default()
        };
        let mut launched = 0;
        let err = ProcessTimer::new(config).unwrap().run(|_| launched += 1).unwrap_err();
        assert!(matches!(err, HarnessError::WorkingDirMissing { .. }));
        assert_eq!(launched, 0);
    }

    #[test]
    fn test_resolve_program_prefers_working_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("sim.exe"), "").unwrap();

        let local = resolve_program(dir.path(), "sim.exe").unwrap();
        assert!(local.is_absolute());
        assert!(local.ends_with("sim.exe"));

        let bare = resolve_program(dir.path(), "other.exe").unwrap();
        assert_eq!(bare, PathBuf::from("other.exe"));
    }

    #[test]
    fn test_unlaunchable_program_is_recorded() {
        let dir = tempfile::tempdir().unwrap();
        let config = ProcessSweepConfig {
            working_dir: dir.path().to_path_buf(),
            executable: "definitely-not-a-real-program-4711".into(),
            simulation_counts: vec![1, 2],
            ..Default::default()
        };
        let report = ProcessTimer::new(config).unwrap().run(|_| {}).unwrap();
        assert_eq!(report.len(), 2);
        assert!(report
            .records
            .iter()
            .all(|r| matches!(r.outcome, InvocationOutcome::LaunchFailed { .. })));
    }
}
