#[cfg(test)]
mod moments {
    use approx::*;
    use marginal_hub::prelude::*;
    use rand::SeedableRng;
    use rand_distr::{Distribution, Normal};
    use rand_xoshiro::Xoshiro256PlusPlus;

    /// Naive two-pass reference for the first four moments.
    fn reference(values: &[f64]) -> (f64, f64, f64, f64) {
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;

        let central = |p: i32| values.iter().map(|&v| (v - mean).powi(p)).sum::<f64>() / n;
        let m2 = central(2);
        let m3 = central(3);
        let m4 = central(4);

        (mean, m2, m3 / m2.powf(1.5), m4 / (m2 * m2))
    }

    #[test]
    fn one_pass_matches_two_pass() {
        // Sample a seeded normal stream.
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
        let normal = Normal::new(1.5, 2.5).unwrap();
        let values: Vec<f64> = (0..10_000).map(|_| normal.sample(&mut rng)).collect();

        // Accumulate in one pass.
        let mut accumulator = MomentAccumulator::new();
        accumulator.extend(&values);

        // Compare against the two-pass reference.
        let (mean, variance, skewness, kurtosis) = reference(&values);

        assert_relative_eq!(accumulator.mean(), mean, max_relative = 1e-6);
        assert_relative_eq!(accumulator.variance(), variance, max_relative = 1e-6);
        assert_abs_diff_eq!(accumulator.skewness(), skewness, epsilon = 1e-6);
        assert_relative_eq!(accumulator.kurtosis(), kurtosis, max_relative = 1e-6);
    }

    #[test]
    fn extrema_are_tracked() {
        let mut accumulator = MomentAccumulator::new();
        accumulator.extend(&[3., -1., 2., 7., 0.]);

        assert_eq!(accumulator.min(), -1.);
        assert_eq!(accumulator.max(), 7.);
        assert_eq!(accumulator.n(), 5);
    }

    #[test]
    fn constant_sample_reports_safe_defaults() {
        let mut accumulator = MomentAccumulator::new();
        accumulator.extend(&[4.2; 100]);

        assert_eq!(accumulator.variance(), 0.);
        assert_eq!(accumulator.skewness(), 0.);
        assert_eq!(accumulator.kurtosis(), 1.);
    }

    #[test]
    fn empty_reports_zero_variance() {
        let accumulator = MomentAccumulator::new();

        assert_eq!(accumulator.n(), 0);
        assert_eq!(accumulator.variance(), 0.);
    }

    #[test]
    fn merge_matches_sequential() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(7);
        let normal = Normal::new(-0.5, 1.2).unwrap();
        let values: Vec<f64> = (0..5_000).map(|_| normal.sample(&mut rng)).collect();

        // Accumulate the halves separately, then merge.
        let mut left = MomentAccumulator::new();
        left.extend(&values[..2_000]);
        let mut right = MomentAccumulator::new();
        right.extend(&values[2_000..]);
        left.merge(&right);

        // Accumulate everything sequentially.
        let mut sequential = MomentAccumulator::new();
        sequential.extend(&values);

        assert_eq!(left.n(), sequential.n());
        assert_relative_eq!(left.mean(), sequential.mean(), max_relative = 1e-9);
        assert_relative_eq!(left.variance(), sequential.variance(), max_relative = 1e-9);
        assert_abs_diff_eq!(left.skewness(), sequential.skewness(), epsilon = 1e-9);
        assert_relative_eq!(left.kurtosis(), sequential.kurtosis(), max_relative = 1e-9);
    }

    #[test]
    #[should_panic]
    fn non_finite_value_is_rejected() {
        let mut accumulator = MomentAccumulator::new();
        accumulator.add(f64::NAN);
    }
}

#[cfg(test)]
mod batched {
    use approx::*;
    use marginal_hub::prelude::*;
    use rand::SeedableRng;
    use rand_distr::{Distribution, Normal};
    use rand_xoshiro::Xoshiro256PlusPlus;

    #[test]
    fn lanes_match_scalar_accumulators() {
        // Sample eight seeded columns with distinct parameters.
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(11);
        let columns: Vec<Vec<f32>> = (0..LANES)
            .map(|l| {
                let normal = Normal::new(l as f64 - 3., 0.5 + l as f64).unwrap();
                (0..2_000).map(|_| normal.sample(&mut rng) as f32).collect()
            })
            .collect();

        // Sweep all lanes at once.
        let views: [&[f32]; LANES] = std::array::from_fn(|l| columns[l].as_slice());
        let mut buffer = Vec::new();
        interleave(&views, &mut buffer);
        let mut batched = BatchedMoments::new();
        batched.update_interleaved(&buffer);
        let batched = batched.statistics(0);

        // Compare each lane against a scalar accumulator.
        for (l, column) in columns.iter().enumerate() {
            let mut scalar = MomentAccumulator::new();
            column.iter().for_each(|&v| scalar.add(v as f64));
            let scalar = scalar.statistics(l);

            assert_eq!(batched[l].index(), scalar.index());
            assert_eq!(batched[l].n(), scalar.n());
            assert_eq!(batched[l].min(), scalar.min());
            assert_eq!(batched[l].max(), scalar.max());
            assert_relative_eq!(batched[l].mean(), scalar.mean(), max_relative = 1e-12);
            assert_relative_eq!(batched[l].variance(), scalar.variance(), max_relative = 1e-12);
            assert_abs_diff_eq!(batched[l].skewness(), scalar.skewness(), epsilon = 1e-12);
            assert_relative_eq!(batched[l].kurtosis(), scalar.kurtosis(), max_relative = 1e-12);
        }
    }

    #[test]
    #[should_panic]
    fn ragged_lanes_are_rejected() {
        let short = vec![1.0f32; 10];
        let long = vec![1.0f32; 11];
        let views: [&[f32]; LANES] =
            [&short, &long, &short, &short, &short, &short, &short, &short];

        let mut buffer = Vec::new();
        interleave(&views, &mut buffer);
    }
}

#[cfg(test)]
mod convergence {
    use marginal_hub::prelude::*;
    use rand::SeedableRng;
    use rand_distr::{Distribution, Normal};
    use rand_xoshiro::Xoshiro256PlusPlus;

    #[test]
    fn normal_stream_converges_before_two_hundred_thousand() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
        let normal = Normal::new(3., 2.).unwrap();

        let mut detector = ConvergenceDetector::new();
        let mut consumed = 0;
        for _ in 0..200_000 {
            detector.add(normal.sample(&mut rng));
            consumed += 1;
            if detector.converged() {
                break;
            }
        }

        assert!(detector.converged(), "stream did not converge");
        assert!(consumed < 200_000, "converged too late: {}", consumed);
    }

    #[test]
    fn convergence_is_monotonic() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(13);
        let normal = Normal::new(0., 1.).unwrap();

        let mut detector = ConvergenceDetector::new();
        (0..150_000).for_each(|_| detector.add(normal.sample(&mut rng)));
        assert!(detector.converged());

        // Drifted data must not un-flag convergence.
        (0..20_000).for_each(|_| detector.add(normal.sample(&mut rng) + 50.));
        assert!(detector.converged());
    }

    #[test]
    fn minimum_samples_gate_convergence() {
        // A constant stream has zero drift, but stays unconverged below the
        // sample floor.
        let mut detector = ConvergenceDetector::new();
        (0..4_000).for_each(|_| detector.add(1.));

        assert!(!detector.converged());

        (0..2_000).for_each(|_| detector.add(1.));
        assert!(detector.converged());
    }

    #[test]
    fn per_parameter_flags_are_exposed() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(19);
        let normal = Normal::new(0., 1.).unwrap();

        let mut detector = ConvergenceDetector::new();
        (0..200_000).for_each(|_| detector.add(normal.sample(&mut rng)));

        assert!(detector.mean_converged());
        assert!(detector.variance_converged());
        assert!(detector.skewness_converged());
        assert!(detector.kurtosis_converged());
    }
}

#[cfg(test)]
mod kolmogorov_smirnov {
    use marginal_hub::prelude::*;

    #[test]
    fn perfect_fit_scores_near_zero() {
        // A uniform grid against the identity CDF.
        let sorted: Vec<f64> = (0..1_000).map(|i| (i as f64 + 0.5) / 1_000.).collect();
        let d = ks_statistic(&sorted, |x| x.clamp(0., 1.));

        assert!(d < 1e-3, "unexpected deviation: {}", d);
    }

    #[test]
    fn step_model_matches_constant_sample() {
        // A point mass fitted by a step CDF has no deviation.
        let sorted = vec![2.5; 500];
        let d = ks_statistic(&sorted, |x| match x >= 2.5 {
            true => 1.,
            false => 0.,
        });

        assert_eq!(d, 0.);
    }

    #[test]
    fn shifted_model_scores_high() {
        let sorted: Vec<f64> = (0..1_000).map(|i| i as f64 / 1_000.).collect();
        let d = ks_statistic(&sorted, |x| (x - 0.5).clamp(0., 1.));

        assert!(d > 0.3, "deviation too small: {}", d);
    }

    #[test]
    fn empirical_cdf_steps_at_samples() {
        let sorted = vec![1., 2., 3., 4.];

        assert_eq!(empirical_cdf(&sorted, 0.5), 0.);
        assert_eq!(empirical_cdf(&sorted, 2.), 0.5);
        assert_eq!(empirical_cdf(&sorted, 10.), 1.);
    }
}

#[cfg(test)]
mod mode_detection {
    use marginal_hub::prelude::*;
    use rand::{seq::SliceRandom, SeedableRng};
    use rand_distr::{Distribution, Normal, Uniform};
    use rand_xoshiro::Xoshiro256PlusPlus;

    /// A half-and-half mixture of two seeded normals.
    fn bimodal(n: usize, seed: u64) -> Vec<f64> {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let left = Normal::new(-2., 0.5).unwrap();
        let right = Normal::new(2., 0.5).unwrap();

        (0..n)
            .map(|i| match i % 2 == 0 {
                true => left.sample(&mut rng),
                false => right.sample(&mut rng),
            })
            .collect()
    }

    #[test]
    fn unimodal_normal_detects_one_mode() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(3);
        let normal = Normal::new(0., 1.).unwrap();
        let values: Vec<f64> = (0..10_000).map(|_| normal.sample(&mut rng)).collect();

        let detection = ModeDetector::new(3).detect(&values);

        assert_eq!(detection.modes, 1);
        // The coarse dip signal fires on any strongly non-uniform sample;
        // the mode count is what rules out a mixture downstream.
        assert!(detection.multimodal);
    }

    #[test]
    fn flat_sample_is_not_multimodal() {
        // A uniform sample hugs the ideal-uniform CDF, keeping the dip low.
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(29);
        let uniform = Uniform::new(-1., 1.);
        let values: Vec<f64> = (0..10_000).map(|_| uniform.sample(&mut rng)).collect();

        let detection = ModeDetector::new(3).detect(&values);

        assert_eq!(detection.modes, 1);
        assert!(detection.dip < 0.05, "dip too large: {}", detection.dip);
        assert!(!detection.multimodal);
    }

    #[test]
    fn bimodal_mixture_detects_two_modes() {
        let values = bimodal(20_000, 5);
        let detection = ModeDetector::new(4).detect(&values);

        assert_eq!(detection.modes, 2);
        assert!(detection.multimodal);

        // Peaks sit near the component means, in ascending order.
        assert!((detection.peaks[0] + 2.).abs() < 0.3);
        assert!((detection.peaks[1] - 2.).abs() < 0.3);

        // Weights are balanced and sum to one.
        assert!((detection.weights.iter().sum::<f64>() - 1.).abs() < 1e-9);
        assert!((detection.weights[0] - 0.5).abs() < 0.05);
    }

    #[test]
    fn mode_count_is_permutation_invariant() {
        let mut values = bimodal(10_000, 23);
        let baseline = ModeDetector::new(4).detect(&values);

        let mut rng = Xoshiro256PlusPlus::seed_from_u64(99);
        values.shuffle(&mut rng);
        let shuffled = ModeDetector::new(4).detect(&values);

        assert_eq!(baseline.modes, shuffled.modes);
        assert_eq!(baseline.peaks, shuffled.peaks);
    }

    #[test]
    fn constant_sample_is_unimodal() {
        let detection = ModeDetector::new(3).detect(&[7.; 1_000]);

        assert_eq!(detection.modes, 1);
        assert_eq!(detection.peaks, vec![7.]);
        assert!(!detection.multimodal);
    }

    #[test]
    fn adaptive_detection_resolves_three_modes() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(8);
        let components = [
            Normal::new(-4., 0.4).unwrap(),
            Normal::new(0., 0.4).unwrap(),
            Normal::new(4., 0.4).unwrap(),
        ];
        let values: Vec<f64> = (0..30_000)
            .map(|i| components[i % 3].sample(&mut rng))
            .collect();

        let detection = ModeDetector::new(10).detect_adaptive(&values);

        assert_eq!(detection.modes, 3);
        assert!(detection.multimodal);
    }

    #[test]
    fn dip_statistic_is_reported() {
        let values = bimodal(10_000, 31);
        let detection = ModeDetector::new(4).detect(&values);

        assert!(detection.dip > 0.05, "dip too small: {}", detection.dip);
    }
}
