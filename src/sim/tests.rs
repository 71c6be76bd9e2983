#[cfg(test)]
mod units {
    use crate::envelope::{Envelope, EnvelopeSet};
    use crate::io::trajectory::MemorySink;
    use crate::rate::Rate;
    use crate::sim::{homogeneous, new_cancel_flag, thinning, ObservationGrid, StopReason};
    use crate::system::{System, Transition};
    use crate::update::Update;

    fn death_system(s0: i64) -> System {
        System::new(
            vec![s0],
            vec![Transition::new(0, Rate::constant(1.0), Update::Fixed(vec![0]))],
            vec![],
        )
        .unwrap()
    }

    #[test]
    fn death_process_is_nonincreasing_and_ends_extinct() {
        let sys = death_system(10);
        let grid = ObservationGrid::from_step_count(20).unwrap();
        let mut sink = MemorySink::new();
        let cancel = new_cancel_flag();
        let outcome = homogeneous::run(&sys, &grid, 0, 42, &mut sink, &cancel).unwrap();

        assert_eq!(outcome.reason, StopReason::Extinct);
        let mut last = i64::MAX;
        for (_, _, state) in &sink.rows {
            assert!(state[0] >= 0);
            assert!(state[0] <= last);
            last = state[0];
        }
        assert_eq!(*sink.rows.last().unwrap().2.first().unwrap(), 0);
    }

    #[test]
    fn replicate_isolation_same_seed_same_output() {
        let sys1 = death_system(10);
        let sys2 = death_system(10);
        let grid = ObservationGrid::from_step_count(20).unwrap();
        let mut sink1 = MemorySink::new();
        let mut sink2 = MemorySink::new();
        let cancel = new_cancel_flag();

        homogeneous::run(&sys1, &grid, 0, 42, &mut sink1, &cancel).unwrap();
        homogeneous::run(&sys2, &grid, 0, 42, &mut sink2, &cancel).unwrap();

        assert_eq!(sink1.rows.len(), sink2.rows.len());
        for (a, b) in sink1.rows.iter().zip(sink2.rows.iter()) {
            assert_eq!(a.1, b.1);
            assert_eq!(a.2, b.2);
        }
    }

    #[test]
    fn yule_process_is_nondecreasing() {
        let sys = System::new(
            vec![1],
            vec![Transition::new(0, Rate::constant(0.5), Update::Fixed(vec![2]))],
            vec![],
        )
        .unwrap();
        let grid = ObservationGrid::from_step_count(10).unwrap();
        let mut sink = MemorySink::new();
        let cancel = new_cancel_flag();
        homogeneous::run(&sys, &grid, 0, 7, &mut sink, &cancel).unwrap();

        let mut last = 0i64;
        for (_, _, state) in &sink.rows {
            assert!(state[0] >= last);
            last = state[0];
        }
    }

    #[test]
    fn stopping_criterion_halts_and_emits_no_further_rows() {
        use crate::stop::{Comparator, StoppingCriterion};
        let sys = System::new(
            vec![1],
            vec![Transition::new(0, Rate::constant(1.0), Update::Fixed(vec![2]))],
            vec![StoppingCriterion::new(vec![0], Comparator::Ge, 50.0)],
        )
        .unwrap();
        let grid = ObservationGrid::from_step_count(1000).unwrap();
        let mut sink = MemorySink::new();
        let cancel = new_cancel_flag();
        let outcome = homogeneous::run(&sys, &grid, 0, 3, &mut sink, &cancel).unwrap();

        assert_eq!(outcome.reason, StopReason::Stopped);
        let last_state = &sink.rows.last().unwrap().2;
        assert!(last_state[0] >= 50);
    }

    #[test]
    fn cancellation_flushes_and_stops() {
        let sys = death_system(1_000_000);
        let grid = ObservationGrid::from_step_count(1_000_000).unwrap();
        let mut sink = MemorySink::new();
        let cancel = new_cancel_flag();
        cancel.store(true, std::sync::atomic::Ordering::Relaxed);
        let outcome = homogeneous::run(&sys, &grid, 0, 1, &mut sink, &cancel).unwrap();
        assert_eq!(outcome.reason, StopReason::Cancelled);
        assert_eq!(sink.rows.len(), 1);
    }

    #[test]
    fn thinning_matches_homogeneous_statistics_for_constant_rate() {
        // A constant rate dressed up as a switch with pre==post exercises the
        // time-dependent loop while staying statistically identical to C5.
        let sys = System::new(
            vec![1],
            vec![Transition::new(
                0,
                Rate::switch(0.5, 0.5, 5.0),
                Update::Fixed(vec![2]),
            )],
            vec![],
        )
        .unwrap();
        let grid = ObservationGrid::from_step_count(10).unwrap();
        let envelopes = EnvelopeSet::new(vec![Envelope::build(
            &sys.transitions[0].rate,
            grid.horizon(),
            50,
            0.01,
        )]);
        let mut sink = MemorySink::new();
        let cancel = new_cancel_flag();
        let outcome = thinning::run(&sys, &envelopes, &grid, 0, 11, &mut sink, &cancel).unwrap();

        assert!(matches!(
            outcome.reason,
            StopReason::GridExhausted | StopReason::Extinct
        ));
        let mut last = 0i64;
        for (_, _, state) in &sink.rows {
            assert!(state[0] >= 0);
            assert!(state[0] >= last);
            last = state[0];
        }
    }

    #[test]
    fn switch_rate_thinning_tracks_rate_change_at_switch_point() {
        let sys = System::new(
            vec![1],
            vec![Transition::new(
                0,
                Rate::switch(0.1, 2.0, 5.0),
                Update::Fixed(vec![2]),
            )],
            vec![],
        )
        .unwrap();
        let grid = ObservationGrid::from_step_count(10).unwrap();
        let envelopes = EnvelopeSet::new(vec![Envelope::build(
            &sys.transitions[0].rate,
            grid.horizon(),
            100,
            0.01,
        )]);
        let mut sink = MemorySink::new();
        let cancel = new_cancel_flag();
        thinning::run(&sys, &envelopes, &grid, 0, 99, &mut sink, &cancel).unwrap();
        assert!(!sink.rows.is_empty());
        for (_, _, state) in &sink.rows {
            assert!(state[0] >= 0);
        }
    }
}
