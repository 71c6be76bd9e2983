//! Simulators (C5 homogeneous, C6 inhomogeneous): the event-driven scheduler that
//! turns a `System` into one sampled trajectory, recorded on the caller's
//! observation grid and terminated by a stopping criterion, extinction, or host
//! cancellation.

use crate::error::{SimError, SimResult};
use crate::io::trajectory::TrajectorySink;
use crate::rng::RandomSource;
use crate::stop::is_extinct;
use crate::system::System;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub mod homogeneous;
pub mod tests;
pub mod thinning;

/// The strictly increasing sequence `0 = τ_0 < τ_1 < … < τ_M` observations are
/// recorded on.
#[derive(Debug, Clone)]
pub struct ObservationGrid(Vec<f64>);

impl ObservationGrid {
    /// Builds a grid from an explicit, strictly increasing sequence of times.
    pub fn new(times: Vec<f64>) -> SimResult<Self> {
        if times.is_empty() {
            return Err(SimError::InvalidConfig(
                "observation grid must not be empty".to_string(),
            ));
        }
        if times[0] != 0.0 {
            return Err(SimError::InvalidConfig(
                "observation grid must start at 0".to_string(),
            ));
        }
        if !times.windows(2).all(|w| w[0] < w[1]) {
            return Err(SimError::InvalidConfig(
                "observation grid must be strictly increasing".to_string(),
            ));
        }
        Ok(ObservationGrid(times))
    }

    /// Builds the implied grid `τ_k = k` for `k = 0..=m`.
    pub fn from_step_count(m: usize) -> SimResult<Self> {
        if m == 0 {
            return Err(SimError::InvalidConfig(
                "step-count grid requires M >= 1".to_string(),
            ));
        }
        Self::new((0..=m).map(|k| k as f64).collect())
    }

    pub fn horizon(&self) -> f64 {
        *self.0.last().expect("grid is non-empty by construction")
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn times(&self) -> &[f64] {
        &self.0
    }
}

/// Why a replicate stopped running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Walked past the last grid point with no stop or extinction firing first.
    GridExhausted,
    /// All components hit 0.
    Extinct,
    /// A user-supplied stopping criterion fired.
    Stopped,
    /// The host's cancellation flag was observed set.
    Cancelled,
}

/// Outcome of one replicate run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOutcome {
    pub reason: StopReason,
    pub events_fired: u64,
}

/// Host-supplied cancellation flag, checked at a bounded cadence by both
/// simulators (every outer-loop iteration, and every inner thinning iteration).
pub type CancelFlag = Arc<AtomicBool>;

pub fn new_cancel_flag() -> CancelFlag {
    Arc::new(AtomicBool::new(false))
}

fn is_cancelled(flag: &CancelFlag) -> bool {
    flag.load(Ordering::Relaxed)
}

/// Shared bookkeeping both simulators use to walk the observation grid and flush
/// rows to the sink as time advances past grid points.
struct GridCursor<'a> {
    grid: &'a ObservationGrid,
    next_idx: usize,
}

impl<'a> GridCursor<'a> {
    fn new(grid: &'a ObservationGrid) -> Self {
        GridCursor { grid, next_idx: 0 }
    }

    /// Emits `(replicate, τ_k, state)` for every grid point crossed by the move to
    /// `t_new`. Returns `true` once every grid point has been emitted (grid
    /// exhausted).
    fn flush_up_to(
        &mut self,
        t_new: f64,
        replicate: u64,
        state: &[i64],
        sink: &mut dyn TrajectorySink,
    ) -> SimResult<bool> {
        let times = self.grid.times();
        while self.next_idx < times.len() && times[self.next_idx] <= t_new {
            sink.emit(replicate, times[self.next_idx], state)?;
            self.next_idx += 1;
        }
        Ok(self.next_idx >= times.len())
    }

    /// Emits one final row at `t`, used for stop/extinction/cancellation flushes
    /// that occur strictly between grid points.
    fn flush_final(
        &mut self,
        t: f64,
        replicate: u64,
        state: &[i64],
        sink: &mut dyn TrajectorySink,
    ) -> SimResult<()> {
        sink.emit(replicate, t, state)
    }
}

pub(crate) fn check_stops(system: &System, state: &[i64]) -> Option<StopReason> {
    if is_extinct(state) {
        return Some(StopReason::Extinct);
    }
    if system.stops.iter().any(|c| c.is_met(state)) {
        return Some(StopReason::Stopped);
    }
    None
}

pub(crate) struct ReplicateRng {
    pub inner: RandomSource,
}

impl ReplicateRng {
    pub fn new(seed: u64) -> Self {
        ReplicateRng {
            inner: RandomSource::from_seed(seed),
        }
    }
}
