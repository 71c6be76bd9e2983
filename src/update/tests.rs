#[cfg(test)]
mod units {
    use crate::rng::RandomSource;
    use crate::update::{apply_delta, OffspringDistribution, Update};

    #[test]
    fn fixed_update_decrements_parent_slot() {
        let u = Update::Fixed(vec![0, 1]);
        let mut rng = RandomSource::from_seed(1);
        let delta = u.sample_delta(0, 2, &mut rng);
        assert_eq!(delta, vec![-1, 1]);
    }

    #[test]
    fn death_update_is_pure_decrement() {
        let u = Update::Fixed(vec![0]);
        let mut rng = RandomSource::from_seed(1);
        let delta = u.sample_delta(0, 1, &mut rng);
        assert_eq!(delta, vec![-1]);
    }

    #[test]
    fn random_update_masks_components_and_decrements_parent() {
        let u = Update::Random {
            mask: vec![false, true],
            distribution: OffspringDistribution::Poisson { mu: 0.0 },
        };
        let mut rng = RandomSource::from_seed(1);
        let delta = u.sample_delta(0, 2, &mut rng);
        // mu=0 poisson draw is always 0, so component 1 contributes 0 regardless.
        assert_eq!(delta, vec![-1, 0]);
    }

    #[test]
    fn apply_delta_clamps_negative_components_to_zero() {
        let mut state = vec![0i64, 5];
        apply_delta(&mut state, &[-3, -2]);
        assert_eq!(state, vec![0, 3]);
    }

    #[test]
    fn apply_delta_never_errors_on_underflow() {
        let mut state = vec![1i64];
        apply_delta(&mut state, &[-100]);
        assert_eq!(state, vec![0]);
    }

    #[test]
    fn geometric_constructor_rejects_out_of_range_p() {
        assert!(OffspringDistribution::geometric(0.0).is_err());
        assert!(OffspringDistribution::geometric(1.5).is_err());
        assert!(OffspringDistribution::geometric(0.5).is_ok());
        assert!(OffspringDistribution::geometric(1.0).is_ok());
    }

    #[test]
    fn poisson_constructor_rejects_negative_or_non_finite_mu() {
        assert!(OffspringDistribution::poisson(-1.0).is_err());
        assert!(OffspringDistribution::poisson(f64::INFINITY).is_err());
        assert!(OffspringDistribution::poisson(0.0).is_ok());
        assert!(OffspringDistribution::poisson(3.0).is_ok());
    }
}
