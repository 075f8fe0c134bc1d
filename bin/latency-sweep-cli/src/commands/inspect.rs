// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `latency-sweep inspect` command: display an artifact's layer chain.
//!
//! Loads the manifest + SafeTensors header and prints per-layer shapes and
//! weight sizes, plus the activation memory a given batch size needs.

use std::path::PathBuf;
use tensor_core::Shape;

pub fn execute(artifact: PathBuf) -> anyhow::Result<()> {
    println!("╔══════════════════════════════════════════════════════╗");
    println!("║           latency-sweep · Artifact Inspector         ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();

    let graph = model_ir::ModelLoader::load(&artifact).map_err(|e| {
        anyhow::anyhow!("failed to load artifact from '{}': {e}", artifact.display())
    })?;

    // ── Summary ────────────────────────────────────────────────
    println!("  Model:  {}", graph.name);
    println!("  Layers: {}", graph.num_layers());
    println!("  Input:  {}", batched(graph.input_shape()));
    println!("  Output: {}", batched(graph.output_shape()));
    println!(
        "  Total weights: {:.2} MB",
        graph.total_weight_bytes() as f64 / (1024.0 * 1024.0),
    );
    println!();

    // ── Per-Layer Detail ───────────────────────────────────────
    println!(
        "  {:<4} {:<20} {:<10} {:>14} {:>14} {:>12}",
        "Idx", "Name", "Type", "Input", "Output", "Weights",
    );
    println!("  {}", "-".repeat(80));

    for layer in graph.iter_layers() {
        println!(
            "  {:<4} {:<20} {:<10} {:>14} {:>14} {:>9.1} KB",
            layer.index,
            truncate(&layer.name, 20),
            layer.layer_type.as_str(),
            layer.input_shape.to_string(),
            layer.output_shape.to_string(),
            layer.estimated_weight_bytes() as f64 / 1024.0,
        );
    }
    println!();

    // ── Activation Memory ──────────────────────────────────────
    let per_sample = graph.max_activation_bytes_per_sample();
    println!("  Peak activation memory by batch size:");
    for batch in [1usize, 8, 32, 128] {
        println!(
            "   n = {:<4} {:>10.1} KB",
            batch,
            (per_sample * batch) as f64 / 1024.0
        );
    }
    println!();
    Ok(())
}

/// Formats a per-sample shape as `(n, d0, d1, ...)`.
fn batched(shape: &Shape) -> String {
    let dims: Vec<String> = shape.dims().iter().map(usize::to_string).collect();
    format!("(n, {})", dims.join(", "))
}

/// Truncates a string to `max_len` with ellipsis if needed.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{head}...")
    }
}
