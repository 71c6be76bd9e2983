use branch_sim::cli::{Cli, Commands};
use branch_sim::config::SystemConfig;
use branch_sim::envelope::{Envelope, EnvelopeSet};
use branch_sim::io::trajectory;
use branch_sim::io::trajectory::{CsvTrajectorySink, TrajectorySink};
use branch_sim::sim::{homogeneous, new_cancel_flag, thinning};
use clap::Parser;
use std::sync::Arc;

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            config,
            output,
            replicate,
            seed,
            silent,
        } => run_single(config, output, replicate, seed, silent),
        Commands::Batch {
            config,
            output,
            replicates,
            threads,
            seed,
            silent,
        } => run_batch_cmd(config, output, replicates, threads, seed, silent),
        Commands::EnvelopePreview { config, transition } => envelope_preview(config, transition),
    };

    if let Err(e) = result {
        log::error!("{e}");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run_single(
    config_path: std::path::PathBuf,
    output: std::path::PathBuf,
    replicate: u64,
    seed_override: Option<u64>,
    silent_flag: bool,
) -> branch_sim::error::SimResult<()> {
    let cfg = SystemConfig::load(&config_path)?;
    let (system, grid, seed, margin, envelope_bins, config_silent) = cfg.try_into_system()?;
    let silent = silent_flag || config_silent;
    let seed = seed_override.unwrap_or(seed);
    let cancel = new_cancel_flag();

    trajectory::write_header(&output, system.k())?;
    let mut sink = CsvTrajectorySink::open_append(&output)?;

    let outcome = if system.is_homogeneous() {
        homogeneous::run(
            &system,
            &grid,
            replicate,
            seed,
            &mut sink as &mut dyn TrajectorySink,
            &cancel,
        )?
    } else {
        let envelopes = build_envelope_set(&system, grid.horizon(), envelope_bins, margin);
        thinning::run(
            &system,
            &envelopes,
            &grid,
            replicate,
            seed,
            &mut sink as &mut dyn TrajectorySink,
            &cancel,
        )?
    };

    log::info!(
        "replicate {replicate} finished: {:?} after {} events",
        outcome.reason,
        outcome.events_fired
    );
    if !silent {
        println!(
            "replicate {replicate}: {:?} ({} events)",
            outcome.reason, outcome.events_fired
        );
    }
    Ok(())
}

fn run_batch_cmd(
    config_path: std::path::PathBuf,
    output: std::path::PathBuf,
    replicates: usize,
    threads: usize,
    seed_override: Option<u64>,
    silent_flag: bool,
) -> branch_sim::error::SimResult<()> {
    let cfg = SystemConfig::load(&config_path)?;
    let (system, grid, seed, margin, envelope_bins, config_silent) = cfg.try_into_system()?;
    let silent = silent_flag || config_silent;
    let seed_base = seed_override.unwrap_or(seed);
    let cancel = new_cancel_flag();

    let envelopes = if system.is_homogeneous() {
        None
    } else {
        Some(Arc::new(build_envelope_set(
            &system,
            grid.horizon(),
            envelope_bins,
            margin,
        )))
    };

    let summary = branch_sim::batch::run_batch(
        Arc::new(system),
        envelopes,
        Arc::new(grid),
        replicates,
        threads,
        seed_base,
        output,
        cancel,
    )?;

    if !silent {
        println!(
            "completed {}/{} replicates in {:.2}s",
            summary.completed, summary.requested, summary.elapsed_secs
        );
    }
    Ok(())
}

fn envelope_preview(
    config_path: std::path::PathBuf,
    transition_idx: usize,
) -> branch_sim::error::SimResult<()> {
    let cfg = SystemConfig::load(&config_path)?;
    let (system, grid, _seed, margin, envelope_bins, _silent) = cfg.try_into_system()?;

    let transition = system.transitions.get(transition_idx).ok_or_else(|| {
        branch_sim::error::SimError::InvalidConfig(format!(
            "no transition at index {transition_idx}"
        ))
    })?;

    let env = Envelope::build(&transition.rate, grid.horizon(), envelope_bins, margin);
    println!("bin,lower,upper,bound");
    let bin_width = env.horizon() / env.n_bins() as f64;
    for b in 0..env.n_bins() {
        let lo = b as f64 * bin_width;
        let hi = (b + 1) as f64 * bin_width;
        println!("{b},{lo},{hi},{}", env.bound_at(lo));
    }
    Ok(())
}

fn build_envelope_set(
    system: &branch_sim::system::System,
    horizon: f64,
    n_bins: usize,
    margin: f64,
) -> EnvelopeSet {
    let envelopes = system
        .transitions
        .iter()
        .map(|t| Envelope::build(&t.rate, horizon, n_bins, margin))
        .collect();
    EnvelopeSet::new(envelopes)
}
