// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Sweep results.
//!
//! Both reports keep exactly one record per swept value, in sweep order.

use crate::HarnessError;
use std::fmt;
use std::path::Path;
use std::time::Duration;

// ── Inference sweep ────────────────────────────────────────────

/// Timing of one batch size.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct LatencyRecord {
    pub batch_size: usize,
    /// Number of timed forward calls.
    pub repetitions: u32,
    /// Wall time of all timed calls together.
    pub total: Duration,
    /// `total / repetitions`, in seconds.
    pub mean_secs: f64,
}

impl LatencyRecord {
    /// Builds a record from the elapsed time of `repetitions` calls.
    pub fn new(batch_size: usize, repetitions: u32, total: Duration) -> Self {
        let mean_secs = if repetitions == 0 {
            0.0
        } else {
            total.as_secs_f64() / f64::from(repetitions)
        };
        Self {
            batch_size,
            repetitions,
            total,
            mean_secs,
        }
    }

    /// Mean per-sample latency in seconds.
    pub fn mean_secs_per_sample(&self) -> f64 {
        self.mean_secs / self.batch_size.max(1) as f64
    }
}

/// All records of an inference sweep.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct LatencyReport {
    pub device: String,
    pub records: Vec<LatencyRecord>,
}

impl LatencyReport {
    pub fn new(device: impl Into<String>) -> Self {
        Self {
            device: device.into(),
            records: Vec::new(),
        }
    }

    pub fn push(&mut self, record: LatencyRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Mean latencies in sweep order.
    pub fn means(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.mean_secs).collect()
    }

    /// Serialises the report as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, HarnessError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Writes the JSON report to `path`.
    pub fn write_json(&self, path: &Path) -> Result<(), HarnessError> {
        write_file(path, &self.to_json()?)
    }
}

impl fmt::Display for LatencyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:>8}  {:>14}  {:>16}", "batch", "mean (ms)", "per sample (us)")?;
        for r in &self.records {
            writeln!(
                f,
                "{:>8}  {:>14.4}  {:>16.3}",
                r.batch_size,
                r.mean_secs * 1e3,
                r.mean_secs_per_sample() * 1e6
            )?;
        }
        Ok(())
    }
}

// ── Process sweep ──────────────────────────────────────────────

/// How one external invocation ended.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum InvocationOutcome {
    /// Exited with status 0.
    Succeeded,
    /// Exited non-zero, or was killed by a signal (`code` is `None`).
    Failed { code: Option<i32> },
    /// The process could not be started.
    LaunchFailed { reason: String },
}

impl InvocationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded)
    }
}

impl fmt::Display for InvocationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Succeeded => f.write_str("succeeded"),
            Self::Failed { code: Some(code) } => write!(f, "exited with code {code}"),
            Self::Failed { code: None } => f.write_str("was terminated by a signal"),
            Self::LaunchFailed { reason } => write!(f, "could not be launched: {reason}"),
        }
    }
}

/// One external invocation.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct InvocationRecord {
    pub simulation_count: u64,
    pub outcome: InvocationOutcome,
    /// Wall time of the blocking call, launch to exit.
    pub wall_time: Duration,
}

/// All records of a process sweep.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct ProcessSweepReport {
    pub records: Vec<InvocationRecord>,
}

impl ProcessSweepReport {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records whose invocation did not succeed.
    pub fn failures(&self) -> impl Iterator<Item = &InvocationRecord> {
        self.records.iter().filter(|r| !r.outcome.is_success())
    }

    pub fn all_succeeded(&self) -> bool {
        self.failures().next().is_none()
    }

    pub fn to_json(&self) -> Result<String, HarnessError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn write_file(path: &Path, content: &str) -> Result<(), HarnessError> {
    std::fs::write(path, content).map_err(|source| HarnessError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_is_total_over_repetitions() {
        let r = LatencyRecord::new(8, 4, Duration::from_millis(2));
        assert!((r.mean_secs - 0.0005).abs() < 1e-12);
        assert!((r.mean_secs_per_sample() - 0.0005 / 8.0).abs() < 1e-12);
    }

    #[test]
    fn test_means_in_order() {
        let mut report = LatencyReport::new("cpu");
        report.push(LatencyRecord::new(1, 1, Duration::from_millis(1)));
        report.push(LatencyRecord::new(2, 1, Duration::from_millis(3)));
        assert_eq!(report.len(), 2);
        assert_eq!(report.means(), vec![0.001, 0.003]);
    }

    #[test]
    fn test_report_json() {
        let mut report = LatencyReport::new("cpu");
        report.push(LatencyRecord::new(4, 10, Duration::from_micros(50)));
        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(json["device"], "cpu");
        assert_eq!(json["records"][0]["batch_size"], 4);
        assert_eq!(json["records"][0]["repetitions"], 10);
    }

    #[test]
    fn test_write_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        LatencyReport::new("cpu").write_json(&path).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("\"records\""));
    }

    #[test]
    fn test_display_table() {
        let mut report = LatencyReport::new("cpu");
        report.push(LatencyRecord::new(16, 1, Duration::from_millis(8)));
        let table = report.to_string();
        assert!(table.contains("batch"));
        assert!(table.contains("8.0000"));
        assert!(table.contains("500.000"));
    }

    #[test]
    fn test_outcome_display_and_failures() {
        let report = ProcessSweepReport {
            records: vec![
                InvocationRecord {
                    simulation_count: 100,
                    outcome: InvocationOutcome::Succeeded,
                    wall_time: Duration::ZERO,
                },
                InvocationRecord {
                    simulation_count: 200,
                    outcome: InvocationOutcome::Failed { code: Some(3) },
                    wall_time: Duration::ZERO,
                },
            ],
        };
        assert!(!report.all_succeeded());
        let failed: Vec<_> = report.failures().map(|r| r.simulation_count).collect();
        assert_eq!(failed, vec![200]);
        assert_eq!(report.records[1].outcome.to_string(), "exited with code 3");

        let json = report.to_json().unwrap();
        assert!(json.contains("\"status\": \"failed\""));
    }
}
