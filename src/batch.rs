//! Parallel replicate batches: runs `N` independent replicates of the same
//! `System` across a bounded worker-thread pool, fanning all of them into one
//! dedicated writer thread so the output CSV sees a single writer. Generalizes
//! this codebase's particle-ensemble generation pipeline (thread pool sized by
//! available parallelism + mpsc fan-in + dedicated I/O thread) from independent
//! particle ensembles to independent simulation replicates.

use crate::envelope::EnvelopeSet;
use crate::error::{SimError, SimResult};
use crate::io::trajectory::{self, ChannelSink};
use crate::sim::{homogeneous, thinning, CancelFlag, ObservationGrid};
use crate::system::System;
use std::path::PathBuf;
use std::sync::mpsc;
use std::sync::Arc;
use std::time::Instant;

pub struct BatchSummary {
    pub completed: usize,
    pub requested: usize,
    pub elapsed_secs: f64,
}

/// Runs `n_replicates` replicates of `system` over `grid`, using up to `threads`
/// worker threads (capped by available parallelism and by `n_replicates` itself,
/// exactly as the ensemble generator caps its own thread count). `envelopes` is
/// required when `system` is not homogeneous.
pub fn run_batch(
    system: Arc<System>,
    envelopes: Option<Arc<EnvelopeSet>>,
    grid: Arc<ObservationGrid>,
    n_replicates: usize,
    threads: usize,
    seed_base: u64,
    output_path: PathBuf,
    cancel: CancelFlag,
) -> SimResult<BatchSummary> {
    if n_replicates == 0 {
        return Err(SimError::InvalidConfig(
            "batch requires at least one replicate".to_string(),
        ));
    }
    if !system.is_homogeneous() && envelopes.is_none() {
        return Err(SimError::InvalidConfig(
            "a time-dependent system requires a pre-built envelope set".to_string(),
        ));
    }

    let available_parallelism = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4);
    let effective_threads = threads.min(available_parallelism).min(n_replicates).max(1);

    log::info!(
        "starting batch: {n_replicates} replicates on {effective_threads} threads (requested {threads}, available {available_parallelism})"
    );

    trajectory::write_header(&output_path, system.k())?;

    let (row_tx, row_rx) = mpsc::channel();
    let writer_handle = trajectory::spawn_writer(output_path.clone(), row_rx);

    let start_time = Instant::now();
    let mut handles = Vec::with_capacity(effective_threads);
    let replicates_per_thread = n_replicates.div_ceil(effective_threads);

    for thread_id in 0..effective_threads {
        let start = thread_id * replicates_per_thread;
        let end = (start + replicates_per_thread).min(n_replicates);
        if start >= n_replicates {
            break;
        }

        let system = Arc::clone(&system);
        let envelopes = envelopes.clone();
        let grid = Arc::clone(&grid);
        let tx = row_tx.clone();
        let cancel = cancel.clone();

        let handle = std::thread::spawn(move || -> SimResult<usize> {
            log::debug!("batch worker {thread_id} starting: replicates {start}..{end}");
            let mut done = 0usize;
            for replicate in start..end {
                let mut sink = ChannelSink::new(tx.clone());
                let seed = seed_base.wrapping_add(replicate as u64);
                let outcome = if let Some(env) = &envelopes {
                    thinning::run(&system, env, &grid, replicate as u64, seed, &mut sink, &cancel)?
                } else {
                    homogeneous::run(&system, &grid, replicate as u64, seed, &mut sink, &cancel)?
                };
                log::info!(
                    "replicate {replicate} finished: {:?} after {} events",
                    outcome.reason, outcome.events_fired
                );
                done += 1;
            }
            log::debug!("batch worker {thread_id} completed");
            Ok(done)
        });
        handles.push(handle);
    }

    drop(row_tx);

    let mut completed = 0usize;
    for handle in handles {
        match handle.join() {
            Ok(Ok(n)) => completed += n,
            Ok(Err(e)) => return Err(e),
            Err(_) => return Err(SimError::Bug("batch worker thread panicked".to_string())),
        }
    }

    match writer_handle.join() {
        Ok(Ok(_rows)) => {}
        Ok(Err(e)) => return Err(e),
        Err(_) => return Err(SimError::Bug("writer thread panicked".to_string())),
    }

    let elapsed_secs = start_time.elapsed().as_secs_f64();
    log::info!("batch complete: {completed}/{n_replicates} replicates in {elapsed_secs:.2}s");

    Ok(BatchSummary {
        completed,
        requested: n_replicates,
        elapsed_secs,
    })
}
