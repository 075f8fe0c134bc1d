// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `latency-sweep synth` command: write a synthetic board-policy artifact.

use anyhow::Context;
use model_ir::synthetic::{write_board_policy_network, BoardPolicySpec};
use std::path::PathBuf;

pub fn execute(out: PathBuf, hidden: usize, seed: u64) -> anyhow::Result<()> {
    anyhow::ensure!(hidden > 0, "--hidden must be positive");

    let spec = BoardPolicySpec {
        hidden,
        seed,
        ..Default::default()
    };
    write_board_policy_network(&out, &spec)
        .with_context(|| format!("failed to write artifact to '{}'", out.display()))?;

    let graph = model_ir::ModelLoader::load(&out)?;
    println!("{}", graph.summary());
    println!("written to {}", out.display());
    Ok(())
}
