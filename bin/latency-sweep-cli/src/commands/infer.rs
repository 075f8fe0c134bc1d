// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `latency-sweep infer` command: time forward passes across batch sizes.
//!
//! Prints `batch  <n>` as each batch size starts, then one line with the
//! mean latency per batch size in seconds.

use anyhow::Context;
use harness::{InferenceSweepConfig, InferenceTimer, LatencyReport, SweepPlan};
use rand::{rngs::StdRng, SeedableRng};
use std::path::PathBuf;

/// Flag values that override the configured sweep.
pub struct Overrides {
    pub artifact: Option<PathBuf>,
    pub device: Option<String>,
    pub batch_sizes: Option<Vec<usize>>,
    pub repetitions: Option<u32>,
    pub warmup: Option<u32>,
    pub seed: Option<u64>,
}

impl Overrides {
    pub fn apply(self, config: &mut InferenceSweepConfig) {
        if let Some(v) = self.artifact {
            config.artifact_path = v;
        }
        if let Some(v) = self.device {
            config.device = v;
        }
        if let Some(v) = self.batch_sizes {
            config.batch_sizes = v;
        }
        if let Some(v) = self.repetitions {
            config.repetitions = v;
        }
        if let Some(v) = self.warmup {
            config.warmup = v;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
    }
}

pub fn execute(config: InferenceSweepConfig, json: Option<PathBuf>) -> anyhow::Result<()> {
    let plan = SweepPlan::from_config(&config)?;
    let engine = harness::load_engine(&config).with_context(|| {
        format!(
            "failed to prepare '{}' on '{}'",
            config.artifact_path.display(),
            config.device
        )
    })?;
    tracing::info!("{}", engine.graph().summary());

    let timer = InferenceTimer::new(engine, plan);
    let on_batch = |n: usize| println!("{}", batch_line(n));
    let report = match config.seed {
        Some(seed) => timer.run(&mut StdRng::seed_from_u64(seed), on_batch),
        None => timer.run(&mut rand::thread_rng(), on_batch),
    }?;

    println!("{}", means_line(&report));
    tracing::info!("\n{report}");

    if let Some(path) = json {
        report.write_json(&path)?;
        tracing::info!("report written to {}", path.display());
    }
    Ok(())
}

/// Progress line printed as a batch size starts.
fn batch_line(batch_size: usize) -> String {
    format!("batch  {batch_size}")
}

/// Mean seconds per call, one entry per batch size in sweep order.
fn means_line(report: &LatencyReport) -> String {
    format!("{:?}", report.means())
}
