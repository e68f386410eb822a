/// Pearson family label determined by the moment-plane position.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum PearsonType {
    /// Normal distribution.
    Normal,
    /// Symmetric Beta (Pearson type II).
    SymmetricBeta,
    /// Student's t (Pearson type VII).
    StudentT,
    /// Beta (Pearson type I).
    Beta,
    /// Gamma (Pearson type III).
    Gamma,
    /// Pearson type IV.
    TypeIv,
    /// Inverse-Gamma (Pearson type V).
    InverseGamma,
    /// Beta-Prime (Pearson type VI).
    BetaPrime,
}

/// Pearson plane classifier.
///
/// Maps $(\beta_1, \beta_2) = (\gamma_1^2, \beta_2)$ to a Pearson family
/// label through the discriminant:
///
/// ```text
///     \kappa = \beta_1 (\beta_2 + 3)^2 /
///              [4 (2\beta_2 - 3\beta_1 - 6)(4\beta_2 - 3\beta_1)]
/// ```
///
/// Symmetric samples branch on kurtosis alone; otherwise the sign and
/// magnitude of \kappa partition the plane.
#[derive(Clone, Copy, Debug)]
pub struct PearsonClassifier {
    kappa_tolerance: f64,
    skew_tolerance: f64,
    kurtosis_tolerance: f64,
}

impl Default for PearsonClassifier {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl PearsonClassifier {
    /// Construct a classifier with tolerances 0.05 on $\kappa$ , 0.1 on
    /// skewness and 0.2 on kurtosis.
    #[inline]
    pub fn new() -> Self {
        Self {
            kappa_tolerance: 0.05,
            skew_tolerance: 0.1,
            kurtosis_tolerance: 0.2,
        }
    }

    /// Classify a (skewness, kurtosis) pair.
    pub fn classify(&self, skewness: f64, kurtosis: f64) -> PearsonType {
        let beta1 = skewness * skewness;
        let beta2 = kurtosis;

        // Symmetric samples branch on kurtosis.
        if f64::abs(skewness) < self.skew_tolerance {
            if f64::abs(beta2 - 3.) < self.kurtosis_tolerance {
                return PearsonType::Normal;
            }
            return match beta2 < 3. {
                true => PearsonType::SymmetricBeta,
                false => PearsonType::StudentT,
            };
        }

        // The Gamma line is the pole of the discriminant.
        let denominator = 4. * (2. * beta2 - 3. * beta1 - 6.) * (4. * beta2 - 3. * beta1);
        if denominator == 0. {
            return PearsonType::Gamma;
        }

        let kappa = beta1 * (beta2 + 3.) * (beta2 + 3.) / denominator;

        if f64::abs(kappa) < self.kappa_tolerance {
            return PearsonType::Gamma;
        }
        if kappa < 0. {
            return PearsonType::Beta;
        }
        if f64::abs(kappa - 1.) < self.kappa_tolerance {
            return PearsonType::InverseGamma;
        }
        match kappa < 1. {
            true => PearsonType::TypeIv,
            false => PearsonType::BetaPrime,
        }
    }
}
