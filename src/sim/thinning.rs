//! Ogata thinning loop (C6) for transitions whose rates vary with time, using the
//! piecewise-constant envelope from `crate::envelope` as the dominating process.

use crate::envelope::EnvelopeSet;
use crate::error::{SimError, SimResult};
use crate::io::trajectory::TrajectorySink;
use crate::sim::{check_stops, is_cancelled, CancelFlag, GridCursor, ObservationGrid, ReplicateRng, RunOutcome, StopReason};
use crate::system::System;
use crate::update::apply_delta;

/// Outcome of the inner candidate-time search: either an accepted event time, or a
/// signal that the envelope has collapsed (`H̄ = 0`) and the replicate should
/// terminate as extinct.
enum Candidate {
    Accepted(f64),
    EnvelopeCollapsed,
    Cancelled,
}

/// Runs one replicate using Ogata thinning against `envelopes`, which must have
/// been built over `[0, grid.horizon()]` with the same bin count for every
/// transition (see `crate::envelope::Envelope::build`).
pub fn run(
    system: &System,
    envelopes: &EnvelopeSet,
    grid: &ObservationGrid,
    replicate: u64,
    seed: u64,
    sink: &mut dyn TrajectorySink,
    cancel: &CancelFlag,
) -> SimResult<RunOutcome> {
    let k = system.k();
    let mut state: Vec<i64> = system.initial_state.clone();
    let mut t = 0.0_f64;
    let mut events_fired = 0u64;
    let mut rng = ReplicateRng::new(seed);
    let mut cursor = GridCursor::new(grid);
    let horizon = grid.horizon();

    loop {
        if is_cancelled(cancel) {
            cursor.flush_final(t, replicate, &state, sink)?;
            return Ok(RunOutcome {
                reason: StopReason::Cancelled,
                events_fired,
            });
        }

        match find_candidate(system, envelopes, &state, t, horizon, &mut rng, cancel)? {
            Candidate::Cancelled => {
                cursor.flush_final(t, replicate, &state, sink)?;
                return Ok(RunOutcome {
                    reason: StopReason::Cancelled,
                    events_fired,
                });
            }
            Candidate::EnvelopeCollapsed => {
                cursor.flush_up_to(horizon, replicate, &state, sink)?;
                return Ok(RunOutcome {
                    reason: StopReason::Extinct,
                    events_fired,
                });
            }
            Candidate::Accepted(t_candidate) => {
                if cursor.flush_up_to(t_candidate, replicate, &state, sink)? {
                    return Ok(RunOutcome {
                        reason: StopReason::GridExhausted,
                        events_fired,
                    });
                }

                // Event selection uses the *true* hazards at the accepted instant.
                let true_rates: Vec<f64> = system
                    .transitions
                    .iter()
                    .map(|tr| tr.rate.eval(t_candidate) * state[tr.from] as f64)
                    .collect();
                let total: f64 = true_rates.iter().sum();

                if !(total > 0.0) {
                    // Envelope said an event was live but the true hazard at this
                    // instant is 0: degenerate, but not an envelope violation since
                    // the dominating bound never claimed a positive exact rate
                    // here necessarily holds; treat as extinction of this event and
                    // resume the loop at the candidate time.
                    t = t_candidate;
                    continue;
                }

                let draw = rng.inner.uniform01() * total;
                let mut cum = 0.0;
                let mut chosen = true_rates.len() - 1;
                for (idx, h) in true_rates.iter().enumerate() {
                    cum += h;
                    if draw < cum {
                        chosen = idx;
                        break;
                    }
                }

                let transition = &system.transitions[chosen];
                let delta = transition
                    .update
                    .sample_delta(transition.from, k, &mut rng.inner);
                apply_delta(&mut state, &delta);

                t = t_candidate;
                events_fired += 1;

                if let Some(reason) = check_stops(system, &state) {
                    cursor.flush_final(t, replicate, &state, sink)?;
                    return Ok(RunOutcome { reason, events_fired });
                }
            }
        }
    }
}

/// Searches for the next accepted event time starting from `t_start`, using the
/// piecewise-constant envelope as the dominating process. Bin boundaries are
/// treated as memoryless restarts: an exponential draw that would cross into the
/// next bin is discarded and redrawn from that bin's (possibly different) bound,
/// rather than having its remaining time reused, consistent with the
/// piecewise-constant hazard the envelope represents.
fn find_candidate(
    system: &System,
    envelopes: &EnvelopeSet,
    state: &[i64],
    t_start: f64,
    horizon: f64,
    rng: &mut ReplicateRng,
    cancel: &CancelFlag,
) -> SimResult<Candidate> {
    let n_bins = envelopes.get(0).n_bins();
    let bin_width = horizon / n_bins as f64;
    let mut t_cum = t_start;

    loop {
        if is_cancelled(cancel) {
            return Ok(Candidate::Cancelled);
        }

        if t_cum >= horizon {
            return Ok(Candidate::Accepted(horizon));
        }

        let b = ((t_cum / horizon * n_bins as f64).floor() as usize).min(n_bins - 1);
        let bin_end = ((b + 1) as f64 * bin_width).min(horizon);

        let h_bar: f64 = system
            .transitions
            .iter()
            .enumerate()
            .map(|(i, tr)| envelopes.bound_at(i, t_cum.min(horizon - 1e-12)) * state[tr.from] as f64)
            .sum();

        if !(h_bar > 0.0) {
            return Ok(Candidate::EnvelopeCollapsed);
        }

        let delta = rng.inner.exponential(h_bar);
        let t_next = t_cum + delta;

        if t_next > bin_end && bin_end < horizon {
            // Memoryless restart: discard the overshoot, resample fresh in the
            // next bin.
            t_cum = bin_end;
            continue;
        }

        let t_candidate = t_next.min(horizon);

        let h_true: f64 = system
            .transitions
            .iter()
            .map(|tr| tr.rate.eval(t_candidate) * state[tr.from] as f64)
            .sum();

        if h_true > h_bar * (1.0 + 1e-6) {
            log::error!("envelope violated during thinning: H={h_true} > H̄={h_bar} at t={t_candidate}");
            return Err(SimError::Bug(format!(
                "envelope violated during thinning: H={h_true} > H̄={h_bar} at t={t_candidate}"
            )));
        }

        let accept_prob = (h_true / h_bar).min(1.0);
        if rng.inner.uniform01() < accept_prob {
            return Ok(Candidate::Accepted(t_candidate));
        }

        // Rejected: carry the envelope forward, resuming the search from here.
        t_cum = t_candidate;
    }
}
