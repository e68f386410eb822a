#[cfg(test)]
mod helpers {
    use rand::SeedableRng;
    use rand_distr::Distribution;
    use rand_xoshiro::Xoshiro256PlusPlus;

    use marginal_hub::prelude::*;

    /// Sample n values from a seeded distribution, sorted ascending, with
    /// their summary statistics.
    pub fn sample<D: Distribution<f64>>(
        distribution: D,
        n: usize,
        seed: u64,
    ) -> (DimensionStatistics, Vec<f64>) {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let mut values: Vec<f64> = (0..n).map(|_| distribution.sample(&mut rng)).collect();
        values.sort_unstable_by(f64::total_cmp);

        let mut accumulator = MomentAccumulator::new();
        accumulator.extend(&values);

        (accumulator.statistics(0), values)
    }
}

#[cfg(test)]
mod normal {
    use marginal_hub::prelude::*;
    use rand_distr::Normal;

    use super::helpers::sample;

    #[test]
    fn recovers_mean_and_scale() {
        let (statistics, sorted) = sample(Normal::new(5., 2.).unwrap(), 10_000, 42);

        let result = NormalFitter::new().fit(&statistics, &sorted).unwrap();
        assert_eq!(result.model_type(), ModelType::Normal);
        assert!(result.score() < 0.03, "poor fit: {}", result.score());

        let ScalarModel::Normal(model) = result.model() else {
            panic!("expected a normal model");
        };
        assert!((model.mean() - 5.).abs() < 0.1);
        assert!((model.std_dev() - 2.).abs() < 0.1);
        assert_eq!(model.bounds(), None);
    }

    #[test]
    fn clipped_data_yields_the_truncated_form() {
        // Hard-clipping piles mass onto both extremes.
        let (_, mut sorted) = sample(Normal::new(0., 1.).unwrap(), 10_000, 7);
        sorted.iter_mut().for_each(|v| *v = v.clamp(-1., 1.));
        let mut accumulator = MomentAccumulator::new();
        accumulator.extend(&sorted);
        let statistics = accumulator.statistics(0);

        let model = NormalFitter::new().estimate(&statistics, &sorted);
        let ScalarModel::Normal(model) = model else {
            panic!("expected a normal model");
        };

        assert_eq!(model.bounds(), Some((-1., 1.)));
    }

    #[test]
    fn forced_bounds_always_truncate() {
        let (statistics, sorted) = sample(Normal::new(0., 0.1).unwrap(), 1_000, 3);

        let model = NormalFitter::new()
            .with_bounds(-1., 1.)
            .estimate(&statistics, &sorted);
        let ScalarModel::Normal(model) = model else {
            panic!("expected a normal model");
        };

        assert_eq!(model.bounds(), Some((-1., 1.)));
    }

    #[test]
    fn truncated_scale_recovers_the_parent() {
        // Rejection-sample a standard normal into [-1, 1]; the parent scale
        // is 1 even though the sample variance is far smaller.
        let (statistics, sorted) = sample(Normal::new(0., 1.).unwrap(), 40_000, 11);
        let kept: Vec<f64> = sorted.into_iter().filter(|v| v.abs() <= 1.).collect();
        let mut accumulator = MomentAccumulator::new();
        accumulator.extend(&kept);
        let statistics = accumulator.statistics(statistics.index());

        let model = NormalFitter::new()
            .with_bounds(-1., 1.)
            .estimate(&statistics, &kept);
        let ScalarModel::Normal(model) = model else {
            panic!("expected a normal model");
        };

        assert!((model.std_dev() - 1.).abs() < 0.1, "scale: {}", model.std_dev());
    }
}

#[cfg(test)]
mod uniform {
    use marginal_hub::prelude::*;
    use rand_distr::{Normal, Uniform};

    use super::helpers::sample;

    #[test]
    fn support_tracks_the_observed_range() {
        let (statistics, sorted) = sample(Uniform::new(-1., 1.), 10_000, 42);

        let result = UniformFitter::new().fit(&statistics, &sorted).unwrap();
        let ScalarModel::Uniform(model) = result.model() else {
            panic!("expected a uniform model");
        };

        assert!((model.lo() + 1.).abs() < 0.01);
        assert!((model.hi() - 1.).abs() < 0.01);
        assert!(result.score() < 0.03);
    }

    #[test]
    fn extension_widens_the_support() {
        let (statistics, sorted) = sample(Uniform::new(0., 1.), 1_000, 5);

        let model = UniformFitter::new()
            .with_extension(0.1)
            .estimate(&statistics, &sorted);
        let ScalarModel::Uniform(model) = model else {
            panic!("expected a uniform model");
        };

        assert!(model.lo() < statistics.min());
        assert!(model.hi() > statistics.max());
    }

    #[test]
    fn peaked_samples_are_penalized() {
        // A normal sample has kurtosis near 3, well past the 2.5 cutoff.
        let (statistics, sorted) = sample(Normal::new(0., 1.).unwrap(), 10_000, 9);

        let fitter = UniformFitter::new();
        let model = fitter.estimate(&statistics, &sorted);
        let raw = ks_statistic(&sorted, |x| model.cdf(x));
        let result = fitter.fit(&statistics, &sorted).unwrap();

        assert!(result.score() > raw, "penalty missing");
    }
}

#[cfg(test)]
mod beta {
    use marginal_hub::prelude::*;
    use rand_distr::{Beta as BetaDistribution, Uniform};

    use super::helpers::sample;

    #[test]
    fn recovers_the_shapes() {
        let (statistics, sorted) = sample(BetaDistribution::new(2., 5.).unwrap(), 10_000, 42);

        let result = BetaFitter::new().fit(&statistics, &sorted).unwrap();
        let ScalarModel::Beta(model) = result.model() else {
            panic!("expected a beta model");
        };

        assert!((model.alpha() - 2.).abs() < 0.5, "alpha: {}", model.alpha());
        assert!((model.beta() - 5.).abs() < 1., "beta: {}", model.beta());
    }

    #[test]
    fn near_flat_shapes_snap_to_one() {
        let (statistics, sorted) = sample(Uniform::new(0., 1.), 10_000, 17);

        let model = BetaFitter::new().estimate(&statistics, &sorted);
        let ScalarModel::Beta(model) = model else {
            panic!("expected a beta model");
        };

        assert_eq!(model.alpha(), 1.);
        assert_eq!(model.beta(), 1.);
    }
}

#[cfg(test)]
mod gamma {
    use marginal_hub::prelude::*;
    use rand_distr::Gamma as GammaDistribution;

    use super::helpers::sample;

    #[test]
    fn recovers_shape_and_scale() {
        let (statistics, sorted) = sample(GammaDistribution::new(3., 2.).unwrap(), 10_000, 42);

        let result = GammaFitter::new().fit(&statistics, &sorted).unwrap();
        let ScalarModel::Gamma(model) = result.model() else {
            panic!("expected a gamma model");
        };

        assert!((model.shape() - 3.).abs() < 0.4, "shape: {}", model.shape());
        assert!((model.scale() - 2.).abs() < 0.4, "scale: {}", model.scale());
        assert_eq!(model.shift(), 0.);
        assert!(result.score() < 0.03);
    }

    #[test]
    fn negative_data_shifts_the_support() {
        let (statistics, sorted) = sample(GammaDistribution::new(2., 1.).unwrap(), 5_000, 3);
        let shifted: Vec<f64> = sorted.iter().map(|v| v - 10.).collect();
        let mut accumulator = MomentAccumulator::new();
        accumulator.extend(&shifted);
        let statistics = accumulator.statistics(statistics.index());

        let model = GammaFitter::new().estimate(&statistics, &shifted);
        let ScalarModel::Gamma(model) = model else {
            panic!("expected a gamma model");
        };

        assert!(model.shift() <= statistics.min());
    }
}

#[cfg(test)]
mod student_t {
    use marginal_hub::prelude::*;
    use rand_distr::StudentT;

    use super::helpers::sample;

    #[test]
    fn heavy_tails_map_to_low_degrees_of_freedom() {
        let (statistics, sorted) = sample(StudentT::new(5.).unwrap(), 10_000, 42);

        let result = StudentTFitter::new().fit(&statistics, &sorted).unwrap();
        let ScalarModel::StudentT(model) = result.model() else {
            panic!("expected a t model");
        };

        assert!(
            (4. ..=10.).contains(&model.degrees_of_freedom()),
            "dof: {}",
            model.degrees_of_freedom()
        );
    }

    #[test]
    fn light_tails_approach_the_normal_limit() {
        use rand_distr::Uniform;

        let (statistics, sorted) = sample(Uniform::new(0., 1.), 10_000, 5);
        let model = StudentTFitter::new().estimate(&statistics, &sorted);
        let ScalarModel::StudentT(model) = model else {
            panic!("expected a t model");
        };

        assert_eq!(model.degrees_of_freedom(), 100.);
    }
}

#[cfg(test)]
mod support_mismatch {
    use marginal_hub::prelude::*;
    use rand_distr::Normal;

    use super::helpers::sample;

    #[test]
    fn inverse_gamma_reports_the_fixed_penalty() {
        // A standard normal extends below zero.
        let (statistics, sorted) = sample(Normal::new(0., 1.).unwrap(), 1_000, 42);

        let result = InverseGammaFitter::new().fit(&statistics, &sorted).unwrap();

        assert_eq!(result.model_type(), ModelType::InverseGamma);
        assert_eq!(result.score(), SUPPORT_MISMATCH_SCORE);
    }

    #[test]
    fn beta_prime_reports_the_fixed_penalty() {
        let (statistics, sorted) = sample(Normal::new(0., 1.).unwrap(), 1_000, 42);

        let result = BetaPrimeFitter::new().fit(&statistics, &sorted).unwrap();

        assert_eq!(result.model_type(), ModelType::BetaPrime);
        assert_eq!(result.score(), SUPPORT_MISMATCH_SCORE);
    }

    #[test]
    fn beta_prime_keeps_finite_variance_on_positive_data() {
        use rand_distr::Gamma as GammaDistribution;

        let (statistics, sorted) = sample(GammaDistribution::new(4., 0.5).unwrap(), 10_000, 7);

        let model = BetaPrimeFitter::new().estimate(&statistics, &sorted);
        let ScalarModel::BetaPrime(model) = model else {
            panic!("expected a beta-prime model");
        };

        assert!(model.beta() > 2.);
    }
}

#[cfg(test)]
mod empirical {
    use marginal_hub::prelude::*;
    use rand_distr::Normal;

    use super::helpers::sample;

    #[test]
    fn score_carries_the_base_penalty() {
        let (statistics, sorted) = sample(Normal::new(0., 1.).unwrap(), 10_000, 42);

        let result = EmpiricalFitter::new().fit(&statistics, &sorted).unwrap();

        assert_eq!(result.model_type(), ModelType::Empirical);
        assert!(result.score() >= 0.02);
        assert!(result.score() < 0.05, "histogram deviation too large");
    }

    #[test]
    fn histogram_median_sits_near_the_sample_median() {
        let (statistics, sorted) = sample(Normal::new(3., 1.).unwrap(), 10_000, 11);

        let model = EmpiricalFitter::new().estimate(&statistics, &sorted);

        assert!((model.inverse_cdf(0.5) - 3.).abs() < 0.1);
    }

    #[test]
    fn constant_sample_degenerates_to_a_step() {
        let sorted = vec![2.5; 1_000];
        let mut accumulator = MomentAccumulator::new();
        accumulator.extend(&sorted);
        let statistics = accumulator.statistics(0);

        let model = EmpiricalFitter::new().estimate(&statistics, &sorted);

        assert_eq!(model.cdf(2.5), 1.);
        assert_eq!(model.inverse_cdf(0.5), 2.5);
    }
}

#[cfg(test)]
mod pearson_iv {
    use marginal_hub::prelude::*;
    use rand_distr::StudentT;

    use super::helpers::sample;

    #[test]
    fn symmetric_heavy_tails_yield_a_finite_model() {
        let (statistics, sorted) = sample(StudentT::new(6.).unwrap(), 10_000, 42);

        let result = PearsonIvFitter::new().fit(&statistics, &sorted).unwrap();
        let ScalarModel::PearsonIv(model) = result.model() else {
            panic!("expected a Pearson IV model");
        };

        assert!(model.m() > 0.5);
        assert!(model.a() > 0.);
        assert!(result.score() < 0.1, "poor fit: {}", result.score());
    }
}

#[cfg(test)]
mod composite {
    use marginal_hub::prelude::*;
    use rand::SeedableRng;
    use rand_distr::{Distribution, Normal};
    use rand_xoshiro::Xoshiro256PlusPlus;

    /// A half-and-half mixture of two seeded normals, with statistics.
    fn bimodal(n: usize, seed: u64) -> (DimensionStatistics, Vec<f64>) {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let left = Normal::new(-2., 0.5).unwrap();
        let right = Normal::new(2., 0.5).unwrap();
        let mut values: Vec<f64> = (0..n)
            .map(|i| match i % 2 == 0 {
                true => left.sample(&mut rng),
                false => right.sample(&mut rng),
            })
            .collect();
        values.sort_unstable_by(f64::total_cmp);

        let mut accumulator = MomentAccumulator::new();
        accumulator.extend(&values);

        (accumulator.statistics(0), values)
    }

    fn fitter() -> CompositeFitter {
        CompositeFitter::new(ModeDetector::new(4), BestFitSelector::parametric())
    }

    #[test]
    fn bimodal_sample_yields_a_two_component_mixture() {
        let (statistics, sorted) = bimodal(20_000, 42);

        let result = fitter().fit(&statistics, &sorted).unwrap();
        let ScalarModel::Composite(model) = result.model() else {
            panic!("expected a composite model");
        };

        assert_eq!(model.len(), 2);
        assert!((model.weight_sum() - 1.).abs() < 1e-9);
        assert!((model.components()[0].weight - 0.5).abs() < 0.05);
        assert!((model.components()[0].model.location() + 2.).abs() < 0.2);
        assert!((model.components()[1].model.location() - 2.).abs() < 0.2);
    }

    #[test]
    fn unimodal_sample_is_rejected() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(3);
        let normal = Normal::new(0., 1.).unwrap();
        let mut sorted: Vec<f64> = (0..10_000).map(|_| normal.sample(&mut rng)).collect();
        sorted.sort_unstable_by(f64::total_cmp);
        let mut accumulator = MomentAccumulator::new();
        accumulator.extend(&sorted);
        let statistics = accumulator.statistics(0);

        assert!(fitter().fit(&statistics, &sorted).is_none());
    }

    #[test]
    fn sparse_modes_are_rejected() {
        // Forty samples per mode undercut the fifty-sample floor.
        let (statistics, sorted) = bimodal(80, 5);

        assert!(fitter().fit(&statistics, &sorted).is_none());
    }

    #[test]
    fn em_segmentation_also_recovers_the_mixture() {
        let (statistics, sorted) = bimodal(20_000, 23);

        let result = fitter().with_em(10).fit(&statistics, &sorted).unwrap();
        let ScalarModel::Composite(model) = result.model() else {
            panic!("expected a composite model");
        };

        assert_eq!(model.len(), 2);
        assert!((model.components()[0].weight - 0.5).abs() < 0.05);
    }

    #[test]
    fn estimate_degrades_to_a_single_component() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(9);
        let normal = Normal::new(1., 2.).unwrap();
        let mut sorted: Vec<f64> = (0..5_000).map(|_| normal.sample(&mut rng)).collect();
        sorted.sort_unstable_by(f64::total_cmp);
        let mut accumulator = MomentAccumulator::new();
        accumulator.extend(&sorted);
        let statistics = accumulator.statistics(0);

        let model = fitter().estimate(&statistics, &sorted);
        let ScalarModel::Composite(model) = model else {
            panic!("expected a composite model");
        };

        assert_eq!(model.len(), 1);
    }
}
