#[cfg(test)]
mod units {
    use crate::rate::Rate;

    #[test]
    fn constant_is_flat() {
        let r = Rate::constant(2.5);
        assert_eq!(r.eval(0.0), 2.5);
        assert_eq!(r.eval(100.0), 2.5);
        assert!(r.is_homogeneous());
    }

    #[test]
    fn linear_clamps_at_zero() {
        let r = Rate::linear(-1.0, 1.0);
        assert_eq!(r.eval(0.0), 0.0);
        assert_eq!(r.eval(0.5), 0.0);
        assert!((r.eval(2.0) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn switch_flips_at_threshold() {
        let r = Rate::switch(0.1, 2.0, 5.0);
        assert_eq!(r.eval(4.999), 0.1);
        assert_eq!(r.eval(5.0), 2.0);
        assert_eq!(r.eval(10.0), 2.0);
    }

    #[test]
    fn pulse_square_wave() {
        let r = Rate::pulse(10.0, 3.0, 0.1, 5.0);
        assert_eq!(r.eval(0.0), 0.1);
        assert_eq!(r.eval(2.9), 0.1);
        assert_eq!(r.eval(3.0), 5.0);
        assert_eq!(r.eval(9.9), 5.0);
        // second period
        assert_eq!(r.eval(10.0), 0.1);
        assert_eq!(r.eval(13.5), 5.0);
    }

    #[test]
    fn closed_form_sup_constant() {
        let r = Rate::constant(3.0);
        assert_eq!(r.closed_form_sup(0.0, 10.0), Some(3.0));
    }

    #[test]
    fn closed_form_sup_switch_spans_boundary() {
        let r = Rate::switch(1.0, 4.0, 5.0);
        assert_eq!(r.closed_form_sup(0.0, 3.0), Some(1.0));
        assert_eq!(r.closed_form_sup(6.0, 9.0), Some(4.0));
        assert_eq!(r.closed_form_sup(4.0, 6.0), Some(4.0));
    }

    #[test]
    fn linear_and_pulse_have_no_closed_form_sup() {
        assert!(Rate::linear(0.0, 1.0).closed_form_sup(0.0, 1.0).is_none());
        assert!(Rate::pulse(1.0, 0.5, 0.0, 1.0)
            .closed_form_sup(0.0, 1.0)
            .is_none());
    }
}
