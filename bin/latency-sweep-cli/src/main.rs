// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # latency-sweep
//!
//! Command-line front end for the inference and process latency sweeps.
//!
//! ## Usage
//! ```bash
//! # Time forward passes of an artifact across batch sizes
//! latency-sweep infer --artifact ../nn/rgnn --batch-sizes 1,2,4,8 --repetitions 1000
//!
//! # Launch the simulator once per simulation count
//! latency-sweep exec --working-dir ../out/build/x64-Release --simulations 100,200,500
//!
//! # Inspect an artifact
//! latency-sweep inspect --artifact ../nn/rgnn
//!
//! # Write a synthetic board-policy artifact
//! latency-sweep synth --out ./nn/synthetic --hidden 128
//! ```
//!
//! Values come from built-in defaults, then the `--config` TOML file, then
//! flags.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "latency-sweep",
    about = "Latency sweeps over neural-network artifacts and simulator executables",
    version,
    author
)]
struct Cli {
    /// Path to a TOML configuration file (flags override its values).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging (repeat for more: -v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Time forward passes of an artifact across batch sizes.
    Infer {
        /// Artifact directory (model.json + model.safetensors).
        #[arg(short, long)]
        artifact: Option<PathBuf>,

        /// Execution device, e.g. "cpu".
        #[arg(short, long)]
        device: Option<String>,

        /// Comma-separated batch sizes (e.g., "1,2,4,8").
        #[arg(short, long, value_delimiter = ',')]
        batch_sizes: Option<Vec<usize>>,

        /// Timed forward calls per batch size.
        #[arg(short, long)]
        repetitions: Option<u32>,

        /// Untimed forward calls per batch size before timing.
        #[arg(long)]
        warmup: Option<u32>,

        /// Seed for the random inputs.
        #[arg(long)]
        seed: Option<u64>,

        /// Also write the full report as JSON to this path.
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// Launch an external executable once per simulation count.
    Exec {
        /// Directory the executable runs in.
        #[arg(short, long)]
        working_dir: Option<PathBuf>,

        /// Executable name.
        #[arg(short, long)]
        executable: Option<String>,

        /// Model path passed as the second argument.
        #[arg(short, long)]
        model_path: Option<String>,

        /// Comma-separated simulation counts (e.g., "100,200,500").
        #[arg(short, long, value_delimiter = ',')]
        simulations: Option<Vec<u64>>,

        /// Stop at the first failed invocation instead of continuing.
        #[arg(long)]
        abort_on_failure: bool,
    },

    /// Inspect an artifact: print layer chain, shapes and weight sizes.
    Inspect {
        /// Artifact directory.
        #[arg(short, long)]
        artifact: PathBuf,
    },

    /// Write a seeded synthetic board-policy artifact.
    Synth {
        /// Output directory.
        #[arg(short, long)]
        out: PathBuf,

        /// Hidden layer width.
        #[arg(long, default_value_t = 128)]
        hidden: usize,

        /// Weight initialisation seed.
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing/logging based on verbosity.
    commands::init_tracing(cli.verbose);

    match cli.command {
        Commands::Infer {
            artifact,
            device,
            batch_sizes,
            repetitions,
            warmup,
            seed,
            json,
        } => {
            let mut config = commands::load_config(cli.config.as_deref())?.inference;
            let overrides = commands::infer::Overrides {
                artifact,
                device,
                batch_sizes,
                repetitions,
                warmup,
                seed,
            };
            overrides.apply(&mut config);
            commands::infer::execute(config, json)
        }
        Commands::Exec {
            working_dir,
            executable,
            model_path,
            simulations,
            abort_on_failure,
        } => {
            let mut config = commands::load_config(cli.config.as_deref())?.process;
            let overrides = commands::exec::Overrides {
                working_dir,
                executable,
                model_path,
                simulations,
                abort_on_failure,
            };
            overrides.apply(&mut config);
            commands::exec::execute(config)
        }
        Commands::Inspect { artifact } => commands::inspect::execute(artifact),
        Commands::Synth { out, hidden, seed } => commands::synth::execute(out, hidden, seed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_infer_list_flags() {
        let cli = Cli::parse_from([
            "latency-sweep",
            "-vv",
            "infer",
            "--batch-sizes",
            "1,2,4",
            "-r",
            "3",
        ]);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Infer {
                batch_sizes,
                repetitions,
                ..
            } => {
                assert_eq!(batch_sizes, Some(vec![1, 2, 4]));
                assert_eq!(repetitions, Some(3));
            }
            _ => panic!("expected infer"),
        }
    }

    #[test]
    fn test_exec_flags_override_config() {
        let cli = Cli::parse_from([
            "latency-sweep",
            "exec",
            "--simulations",
            "100,200",
            "--abort-on-failure",
        ]);
        let Commands::Exec {
            working_dir,
            executable,
            model_path,
            simulations,
            abort_on_failure,
        } = cli.command
        else {
            panic!("expected exec");
        };

        let mut config = harness::ProcessSweepConfig::default();
        commands::exec::Overrides {
            working_dir,
            executable,
            model_path,
            simulations,
            abort_on_failure,
        }
        .apply(&mut config);

        assert_eq!(config.simulation_counts, vec![100, 200]);
        assert_eq!(config.on_failure, harness::FailurePolicy::Abort);
        assert_eq!(config.executable, "Exp3.exe");
    }
}
