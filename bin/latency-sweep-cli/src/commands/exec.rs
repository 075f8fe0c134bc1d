// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `latency-sweep exec` command: launch the simulator once per count.

use harness::{FailurePolicy, ProcessSweepConfig, ProcessTimer};
use std::path::PathBuf;

/// Flag values that override the configured sweep.
pub struct Overrides {
    pub working_dir: Option<PathBuf>,
    pub executable: Option<String>,
    pub model_path: Option<String>,
    pub simulations: Option<Vec<u64>>,
    pub abort_on_failure: bool,
}

impl Overrides {
    pub fn apply(self, config: &mut ProcessSweepConfig) {
        if let Some(v) = self.working_dir {
            config.working_dir = v;
        }
        if let Some(v) = self.executable {
            config.executable = v;
        }
        if let Some(v) = self.model_path {
            config.model_path = v;
        }
        if let Some(v) = self.simulations {
            config.simulation_counts = v;
        }
        if self.abort_on_failure {
            config.on_failure = FailurePolicy::Abort;
        }
    }
}

pub fn execute(config: ProcessSweepConfig) -> anyhow::Result<()> {
    let timer = ProcessTimer::new(config)?;
    let report = timer.run(|n| println!("{}", nsim_line(n)))?;

    let failed = report.failures().count();
    if failed > 0 {
        tracing::warn!("{failed} of {} invocations did not succeed", report.len());
    }
    Ok(())
}

/// Line printed before each launch.
fn nsim_line(simulation_count: u64) -> String {
    format!("nsim = {simulation_count}")
}
