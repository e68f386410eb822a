#[cfg(test)]
mod contract {
    use marginal_hub::prelude::*;

    /// Quantile levels exercised by the round-trip law.
    const LEVELS: [f64; 7] = [0.01, 0.05, 0.25, 0.5, 0.75, 0.95, 0.99];

    /// A representative model of every family.
    fn catalogue() -> Vec<ScalarModel> {
        vec![
            NormalModel::new(1.5, 2.).into(),
            NormalModel::new(0., 1.).with_bounds(-1., 1.).into(),
            UniformModel::new(-1., 1.).into(),
            BetaModel::new(2., 5., 0., 1.).into(),
            BetaModel::new(0.5, 0.5, -3., 3.).into(),
            GammaModel::new(3., 2., 1.).into(),
            StudentTModel::new(5., 0., 1.).into(),
            InverseGammaModel::new(3., 2.).into(),
            BetaPrimeModel::new(2.5, 4.).into(),
            PearsonIvModel::new(3., 1., 1.2, 0.5).into(),
            EmpiricalModel::from_counts(vec![0., 1., 2., 3., 4.], &[10, 30, 40, 20]).into(),
            CompositeModel::new(vec![
                (0.5, NormalModel::new(-2., 0.5).into()),
                (0.5, NormalModel::new(2., 0.5).into()),
            ])
            .into(),
        ]
    }

    #[test]
    fn cdf_is_monotone_non_decreasing() {
        for model in catalogue() {
            // Grid spanning well past the central mass.
            let center = model.location();
            let spread = f64::max(
                model.inverse_cdf(0.99) - model.inverse_cdf(0.01),
                1e-6,
            );
            let lo = center - 3. * spread;
            let hi = center + 3. * spread;

            let mut previous = -1.;
            for i in 0..1_000 {
                let x = lo + (hi - lo) * i as f64 / 999.;
                let f = model.cdf(x);

                assert!(
                    f >= previous,
                    "{} CDF decreased at {}: {} < {}",
                    model.model_type(),
                    x,
                    f,
                    previous
                );
                assert!((0. ..=1.).contains(&f));
                previous = f;
            }
        }
    }

    #[test]
    fn quantile_round_trips_through_the_cdf() {
        for model in catalogue() {
            for u in LEVELS {
                let x = model.inverse_cdf(u);
                let round = model.cdf(x);

                assert!(
                    (round - u).abs() < 1e-4,
                    "{} round-trip drifted at u = {}: {}",
                    model.model_type(),
                    u,
                    round
                );
            }
        }
    }

    #[test]
    fn sampling_is_deterministic_under_a_fixed_seed() {
        use rand::SeedableRng;
        use rand_xoshiro::Xoshiro256PlusPlus;

        let model: ScalarModel = NormalModel::new(0., 1.).into();

        let mut a = Xoshiro256PlusPlus::seed_from_u64(5);
        let mut b = Xoshiro256PlusPlus::seed_from_u64(5);

        assert_eq!(model.sample_n(&mut a, 100), model.sample_n(&mut b, 100));
    }

    #[test]
    fn complexity_ranks_are_totally_ordered() {
        let ranks: Vec<usize> = [
            ModelType::Normal,
            ModelType::Uniform,
            ModelType::Beta,
            ModelType::Gamma,
            ModelType::StudentT,
            ModelType::InverseGamma,
            ModelType::BetaPrime,
            ModelType::PearsonIv,
            ModelType::Composite,
            ModelType::Empirical,
        ]
        .iter()
        .map(ModelType::complexity)
        .collect();

        assert_eq!(ranks, (1..=10).collect::<Vec<_>>());
    }
}

#[cfg(test)]
mod serialization {
    use marginal_hub::prelude::*;

    #[test]
    fn model_type_tags_are_stable() {
        let tags = [
            (ModelType::Normal, "normal"),
            (ModelType::Uniform, "uniform"),
            (ModelType::Beta, "beta"),
            (ModelType::Gamma, "gamma"),
            (ModelType::StudentT, "student_t"),
            (ModelType::InverseGamma, "inverse_gamma"),
            (ModelType::BetaPrime, "beta_prime"),
            (ModelType::PearsonIv, "pearson_iv"),
            (ModelType::Composite, "composite"),
            (ModelType::Empirical, "empirical"),
        ];

        for (model_type, tag) in tags {
            assert_eq!(model_type.as_str(), tag);
        }
    }

    #[test]
    fn serialized_models_carry_their_tag() {
        let model: ScalarModel = StudentTModel::new(5., 0., 1.).into();
        let json = serde_json::to_value(&model).unwrap();

        assert_eq!(json["model_type"], "student_t");
        assert_eq!(json["degrees_of_freedom"], 5.);
    }

    #[test]
    fn composite_models_nest_children() {
        let model: ScalarModel = CompositeModel::new(vec![
            (0.3, NormalModel::new(-1., 0.5).into()),
            (0.7, UniformModel::new(0., 1.).into()),
        ])
        .into();
        let json = serde_json::to_value(&model).unwrap();

        assert_eq!(json["model_type"], "composite");
        assert_eq!(json["components"][0]["model"]["model_type"], "normal");
        assert_eq!(json["components"][1]["model"]["model_type"], "uniform");
    }

    #[test]
    fn vector_space_model_round_trips() {
        let model = VectorSpaceModel::new(
            vec![
                NormalModel::new(0., 1.).into(),
                UniformModel::new(-1., 1.).into(),
            ],
            10_000,
        );

        let json = serde_json::to_string(&model).unwrap();
        let restored: VectorSpaceModel = serde_json::from_str(&json).unwrap();

        assert_eq!(model, restored);
    }
}

#[cfg(test)]
mod composite {
    use marginal_hub::prelude::*;

    #[test]
    fn weights_normalize_to_unit_mass() {
        let model = CompositeModel::new(vec![
            (2., NormalModel::new(0., 1.).into()),
            (6., NormalModel::new(5., 1.).into()),
        ]);

        assert!((model.weight_sum() - 1.).abs() < 1e-9);
        assert!((model.components()[0].weight - 0.25).abs() < 1e-12);
    }

    #[test]
    fn components_sort_into_canonical_order() {
        let model = CompositeModel::new(vec![
            (0.5, NormalModel::new(3., 1.).into()),
            (0.5, NormalModel::new(-3., 1.).into()),
        ]);

        let locations: Vec<f64> = model
            .components()
            .iter()
            .map(|c| c.model.location())
            .collect();

        assert_eq!(locations, vec![-3., 3.]);
    }

    #[test]
    fn equivalent_mixtures_compare_equal() {
        let a = CompositeModel::new(vec![
            (1., NormalModel::new(2., 1.).into()),
            (3., NormalModel::new(-2., 1.).into()),
        ]);
        let b = CompositeModel::new(vec![
            (0.75, NormalModel::new(-2., 1.).into()),
            (0.25, NormalModel::new(2., 1.).into()),
        ]);

        assert_eq!(a, b);
    }

    #[test]
    fn parameter_count_sums_children_and_free_weights() {
        let model = CompositeModel::new(vec![
            (0.5, NormalModel::new(-2., 0.5).into()),
            (0.5, NormalModel::new(2., 0.5).into()),
        ]);

        // Two means, two scales, one free weight.
        assert_eq!(model.parameter_count(), 5);
    }

    #[test]
    fn mixture_cdf_blends_components() {
        let model = CompositeModel::new(vec![
            (0.5, NormalModel::new(-2., 0.1).into()),
            (0.5, NormalModel::new(2., 0.1).into()),
        ]);

        // Between well-separated components exactly half the mass is seen.
        assert!((model.cdf(0.) - 0.5).abs() < 1e-9);
        assert!(model.cdf(-3.) < 0.01);
        assert!(model.cdf(3.) > 0.99);
    }
}

#[cfg(test)]
mod degenerate {
    use marginal_hub::prelude::*;

    #[test]
    fn degenerate_uniform_steps_at_its_support_point() {
        let model = UniformModel::new(2.5, 2.5);

        assert_eq!(model.cdf(2.5), 1.);
        assert_eq!(model.cdf(2.4999), 0.);
        assert_eq!(model.inverse_cdf(0.5), 2.5);
    }

    #[test]
    fn degenerate_empirical_steps_at_its_support_point() {
        let model = EmpiricalModel::new(vec![2.5, 2.5], vec![0., 1.]);

        assert_eq!(model.cdf(2.5), 1.);
        assert_eq!(model.cdf(2.4), 0.);
        assert_eq!(model.inverse_cdf(0.5), 2.5);
    }

    #[test]
    fn truncated_normal_clamps_to_its_bounds() {
        let model = NormalModel::new(0., 1.).with_bounds(-1., 1.);

        assert_eq!(model.cdf(-1.5), 0.);
        assert_eq!(model.cdf(1.5), 1.);
        assert!(model.inverse_cdf(0.001) >= -1.);
        assert!(model.inverse_cdf(0.999) <= 1.);
    }
}
