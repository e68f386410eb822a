use statrs::function::{beta, erf, gamma};

/// Natural logarithm of the Gamma function $\ln \Gamma(x)$ .
#[inline]
pub fn ln_gamma(x: f64) -> f64 {
    gamma::ln_gamma(x)
}

/// Gamma function $\Gamma(x)$ .
#[inline]
pub fn gamma_function(x: f64) -> f64 {
    gamma::gamma(x)
}

/// Regularized lower incomplete Gamma function $P(a, x)$ .
#[inline]
pub fn regularized_gamma(a: f64, x: f64) -> f64 {
    gamma::gamma_lr(a, x)
}

/// Regularized incomplete Beta function $I_x(a, b)$ .
#[inline]
pub fn regularized_beta(a: f64, b: f64, x: f64) -> f64 {
    beta::beta_reg(a, b, x)
}

/// Error function $\operatorname{erf}(x)$ .
#[inline]
pub fn error_function(x: f64) -> f64 {
    erf::erf(x)
}

/// Standard normal CDF computed as:
///     \Phi(z) = 1 / 2 * (1 + erf(z / sqrt(2))) .
#[inline]
pub fn std_normal_cdf(z: f64) -> f64 {
    0.5 * (1. + erf::erf(z * std::f64::consts::FRAC_1_SQRT_2))
}

/// Standard normal quantile computed as:
///     \Phi^-1(u) = sqrt(2) * erf^-1(2 * u - 1) .
#[inline]
pub fn std_normal_quantile(u: f64) -> f64 {
    // Assert u in (0, 1).
    assert!(
        0. < u && u < 1.,
        "Standard normal quantile is defined on the open unit interval."
    );

    std::f64::consts::SQRT_2 * erf::erf_inv(2. * u - 1.)
}
