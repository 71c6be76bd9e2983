//! Shared test scaffolding for the integration suite: an in-memory sink so tests
//! can assert on the emitted rows directly instead of round-tripping a CSV file.

use branch_sim::error::SimResult;
use branch_sim::io::trajectory::TrajectorySink;

pub struct RecordingSink {
    pub rows: Vec<(u64, f64, Vec<i64>)>,
}

impl RecordingSink {
    pub fn new() -> Self {
        RecordingSink { rows: Vec::new() }
    }

    pub fn last_state(&self) -> &[i64] {
        &self.rows.last().expect("at least one row recorded").2
    }

    pub fn state_at_or_before(&self, t: f64) -> &[i64] {
        &self
            .rows
            .iter()
            .rev()
            .find(|(_, time, _)| *time <= t)
            .expect("a row at or before the requested time")
            .2
    }
}

impl TrajectorySink for RecordingSink {
    fn emit(&mut self, replicate: u64, time: f64, state: &[i64]) -> SimResult<()> {
        self.rows.push((replicate, time, state.to_vec()));
        Ok(())
    }
}

pub fn explicit_grid(times: Vec<f64>) -> branch_sim::sim::ObservationGrid {
    branch_sim::sim::ObservationGrid::new(times).expect("valid observation grid")
}
