#[cfg(test)]
mod units {
    use crate::envelope::Envelope;
    use crate::rate::Rate;

    #[test]
    fn constant_envelope_is_flat_with_margin() {
        let r = Rate::constant(2.0);
        let env = Envelope::build(&r, 10.0, 5, 0.01);
        for b in 0..5 {
            assert!((env.bound_at(b as f64 * 2.0 + 0.5) - 2.02).abs() < 1e-9);
        }
    }

    #[test]
    fn envelope_dominates_linear_rate_pointwise() {
        let r = Rate::linear(0.0, 1.0);
        let env = Envelope::build(&r, 10.0, 20, 0.01);
        let mut t = 0.0;
        while t < 10.0 {
            assert!(env.bound_at(t) >= r.eval(t), "envelope must dominate at t={t}");
            t += 0.01;
        }
    }

    #[test]
    fn switch_envelope_matches_closed_form_per_bin() {
        let r = Rate::switch(0.1, 2.0, 5.0);
        let env = Envelope::build(&r, 10.0, 10, 0.0);
        // bin [0,1) .. [4,5) should be 0.1, [5,6).. [9,10) should be 2.0
        assert!((env.bound_at(0.5) - 0.1).abs() < 1e-9);
        assert!((env.bound_at(5.5) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn bin_index_clamps_at_horizon() {
        let r = Rate::constant(1.0);
        let env = Envelope::build(&r, 10.0, 4, 0.0);
        assert_eq!(env.bin_index(10.0), 3);
        assert_eq!(env.bin_index(9.999), 3);
        assert_eq!(env.bin_index(0.0), 0);
    }

    #[test]
    fn pulse_envelope_dominates_pointwise() {
        let r = Rate::pulse(4.0, 1.5, 0.2, 3.0);
        let env = Envelope::build(&r, 20.0, 40, 0.01);
        let mut t = 0.0;
        while t < 20.0 {
            assert!(env.bound_at(t) >= r.eval(t));
            t += 0.05;
        }
    }
}
