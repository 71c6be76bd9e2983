//! Gillespie SSA loop (C5) for transitions whose rates are all time-constant.

use crate::error::SimResult;
use crate::io::trajectory::TrajectorySink;
use crate::sim::{check_stops, is_cancelled, CancelFlag, GridCursor, ObservationGrid, ReplicateRng, RunOutcome, StopReason};
use crate::system::System;
use crate::update::apply_delta;

/// Runs one replicate of `system` to the observation grid's horizon using the
/// homogeneous (constant-rate) simulator.
///
/// Precondition: `system.is_homogeneous()` — every transition's rate is constant,
/// or the caller otherwise asserts homogeneity. The simulator does not itself
/// re-check this; a time-dependent rate would just be evaluated once at `t=0` and
/// held fixed, silently producing the wrong distribution, so callers should route
/// inhomogeneous systems to `crate::sim::thinning` instead.
pub fn run(
    system: &System,
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

    // Constant rates evaluated once; `t=0` is as good as any instant since they
    // never change.
    let base_rates: Vec<f64> = system.transitions.iter().map(|tr| tr.rate.eval(0.0)).collect();

    loop {
        if is_cancelled(cancel) {
            cursor.flush_final(t, replicate, &state, sink)?;
            return Ok(RunOutcome {
                reason: StopReason::Cancelled,
                events_fired,
            });
        }

        let hazards: Vec<f64> = base_rates
            .iter()
            .zip(system.transitions.iter())
            .map(|(r, tr)| r * state[tr.from] as f64)
            .collect();
        let total: f64 = hazards.iter().sum();

        if !(total > 0.0) {
            cursor.flush_up_to(grid.horizon(), replicate, &state, sink)?;
            return Ok(RunOutcome {
                reason: StopReason::Extinct,
                events_fired,
            });
        }

        let dt = rng.inner.exponential(total);
        let t_candidate = t + dt;

        if cursor.flush_up_to(t_candidate, replicate, &state, sink)? {
            return Ok(RunOutcome {
                reason: StopReason::GridExhausted,
                events_fired,
            });
        }

        let draw = rng.inner.uniform01() * total;
        let mut cum = 0.0;
        let mut chosen = hazards.len() - 1;
        for (idx, h) in hazards.iter().enumerate() {
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
