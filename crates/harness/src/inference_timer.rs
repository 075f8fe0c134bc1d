// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Forward-pass latency sweep.
//!
//! For each batch size in order: build one random input, run the untimed
//! warm-up calls, then time `repetitions` synchronous forward calls and
//! record `elapsed / repetitions`. Outputs are discarded.

use crate::{HarnessError, InferenceSweepConfig, InputShape, LatencyRecord, LatencyReport};
use rand::Rng;
use runtime::{Device, InferenceEngine, InferenceModule, Ready};
use std::time::Instant;
use tensor_core::Tensor;

/// The validated parameters of one inference sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepPlan {
    pub batch_sizes: Vec<usize>,
    pub repetitions: u32,
    pub input: InputShape,
    pub warmup: u32,
    /// Device label carried into the report.
    pub device: String,
}

impl SweepPlan {
    /// Validates `config` and extracts the sweep parameters.
    pub fn from_config(config: &InferenceSweepConfig) -> Result<Self, HarnessError> {
        config.validate()?;
        Ok(Self {
            batch_sizes: config.batch_sizes.clone(),
            repetitions: config.repetitions,
            input: config.input,
            warmup: config.warmup,
            device: config.device.clone(),
        })
    }

    /// Total forward calls the sweep will make.
    pub fn total_calls(&self) -> u64 {
        self.batch_sizes.len() as u64 * (u64::from(self.repetitions) + u64::from(self.warmup))
    }
}

/// Resolves the device and loads the artifact named by `config`.
///
/// Both failures are fatal and happen before any timing.
pub fn load_engine(config: &InferenceSweepConfig) -> Result<InferenceEngine<Ready>, HarnessError> {
    let device = Device::parse(&config.device)?;
    let engine = InferenceEngine::new(&config.artifact_path, device).load_artifact()?;

    let expected = engine.input_shape();
    let template = config.input.sample_shape();
    if expected != &template {
        return Err(HarnessError::ConfigError(format!(
            "input template {template} does not match the artifact's input {expected}"
        )));
    }
    Ok(engine)
}

/// Times forward passes of a loaded module across a batch-size sweep.
pub struct InferenceTimer<M: InferenceModule> {
    module: M,
    plan: SweepPlan,
}

impl<M: InferenceModule> InferenceTimer<M> {
    pub fn new(module: M, plan: SweepPlan) -> Self {
        Self { module, plan }
    }

    pub fn plan(&self) -> &SweepPlan {
        &self.plan
    }

    /// Runs the sweep.
    ///
    /// `on_batch` is called with each batch size before its input is built.
    /// The first failing forward call ends the sweep.
    pub fn run<R, F>(&self, rng: &mut R, mut on_batch: F) -> Result<LatencyReport, HarnessError>
    where
        R: Rng + ?Sized,
        F: FnMut(usize),
    {
        let plan = &self.plan;
        tracing::info!(
            "inference sweep: {} batch sizes, {} repetitions, {} warm-up",
            plan.batch_sizes.len(),
            plan.repetitions,
            plan.warmup
        );

        let mut report = LatencyReport::new(plan.device.clone());
        for &batch_size in &plan.batch_sizes {
            on_batch(batch_size);
            let input = Tensor::randn(plan.input.batched(batch_size), &mut *rng);
            let forward = |input: &Tensor| {
                self.module
                    .forward(input)
                    .map_err(|source| HarnessError::Inference { batch_size, source })
            };

            for _ in 0..plan.warmup {
                forward(&input)?;
            }

            let start = Instant::now();
            for _ in 0..plan.repetitions {
                forward(&input)?;
            }
            let record = LatencyRecord::new(batch_size, plan.repetitions, start.elapsed());

            tracing::debug!(
                "batch {batch_size}: {:.6} s mean over {} calls",
                record.mean_secs,
                record.repetitions
            );
            report.push(record);
        }

        tracing::info!("inference sweep complete: {} records", report.len());
        Ok(report)
    }
}
