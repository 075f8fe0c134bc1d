// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # harness
//!
//! Two independent latency sweeps:
//!
//! - [`InferenceTimer`]: times forward passes of a loaded
//!   [`InferenceModule`](runtime::InferenceModule) over an ordered list of
//!   batch sizes and reports the mean seconds per call.
//! - [`ProcessTimer`]: launches an external executable once per simulation
//!   count, sequentially, and records how each launch ended.
//!
//! Both are single-threaded and block on every call. Parameters come from
//! [`HarnessConfig`], which loads from TOML.

mod config;
mod error;
mod inference_timer;
mod process_timer;
mod report;

pub use config::{
    FailurePolicy, HarnessConfig, InferenceSweepConfig, InputShape, ProcessSweepConfig,
};
pub use error::HarnessError;
pub use inference_timer::{load_engine, InferenceTimer, SweepPlan};
pub use process_timer::ProcessTimer;
pub use report::{
    InvocationOutcome, InvocationRecord, LatencyRecord, LatencyReport, ProcessSweepReport,
};
