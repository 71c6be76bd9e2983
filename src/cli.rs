//! # CLI Module - Command Line Interface for the Branching-Process Engine
//!
//! Three subcommands front the core engine:
//!
//! ## `run`
//!
//! Runs a single replicate from a config file, writing its trajectory to a CSV
//! sink.
//!
//! **Usage**:
//! ```bash
//! branchsim-rs run --config system.toml --output trajectory.csv
//! ```
//!
//! ## `batch`
//!
//! Runs `N` replicates of the same system in parallel, one worker thread per
//! replicate capped by `--threads`, fanned into a single CSV sink.
//!
//! **Usage**:
//! ```bash
//! branchsim-rs batch --config system.toml --replicates 1000 --threads 8 --output trajectories.csv
//! ```
//!
//! ## `envelope-preview`
//!
//! Builds and prints the per-bin envelope table for one rate, for inspecting the
//! envelope builder without running a full simulation.
//!
//! **Usage**:
//! ```bash
//! branchsim-rs envelope-preview --config system.toml --transition 0
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a single replicate from a config file
    Run {
        /// Path to a TOML or JSON system configuration
        #[arg(short, long)]
        config: PathBuf,

        /// Path to the CSV trajectory output
        #[arg(short, long, default_value = "./trajectory.csv")]
        output: PathBuf,

        /// Replicate number to stamp in the output (first column)
        #[arg(long, default_value_t = 0)]
        replicate: u64,

        /// Override the config's seed
        #[arg(long)]
        seed: Option<u64>,

        /// Suppress progress/summary output, in addition to the config's own
        /// `silent` setting
        #[arg(long, default_value_t = false)]
        silent: bool,
    },

    /// Run many replicates in parallel, fanned into one CSV sink
    Batch {
        /// Path to a TOML or JSON system configuration
        #[arg(short, long)]
        config: PathBuf,

        /// Path to the CSV trajectory output
        #[arg(short, long, default_value = "./trajectories.csv")]
        output: PathBuf,

        /// Number of replicates to run
        #[arg(short, long, default_value_t = 100)]
        replicates: usize,

        /// Number of worker threads to use
        #[arg(short, long, default_value_t = 4)]
        threads: usize,

        /// Base seed; replicate `i` uses `seed_base + i`
        #[arg(long)]
        seed: Option<u64>,

        /// Suppress progress/summary output, in addition to the config's own
        /// `silent` setting
        #[arg(long, default_value_t = false)]
        silent: bool,
    },

    /// Build and print the envelope table for one transition's rate, without
    /// running a simulation
    EnvelopePreview {
        /// Path to a TOML or JSON system configuration
        #[arg(short, long)]
        config: PathBuf,

        /// Index of the transition whose rate to preview
        #[arg(short, long, default_value_t = 0)]
        transition: usize,
    },
}
