/// Invert a non-decreasing CDF by bisection.
///
/// The initial bracket `[lo, hi]` is expanded geometrically until it encloses
/// the target probability, then bisected to a fixed relative tolerance.
///
/// # Arguments
///
/// * `cdf` - The cumulative distribution function to invert.
/// * `lo` - Lower end of the initial bracket.
/// * `hi` - Upper end of the initial bracket.
/// * `u` - The target probability.
///
/// # Returns
///
/// A value x such that `cdf(x)` is approximately u.
///
pub fn invert_cdf<F>(cdf: F, mut lo: f64, mut hi: f64, u: f64) -> f64
where
    F: Fn(f64) -> f64,
{
    // Assert u in [0, 1].
    assert!(
        (0. ..=1.).contains(&u),
        "Target probability must be in the unit interval."
    );
    // Assert the bracket is ordered.
    assert!(lo <= hi, "Bracket must be ordered.");

    // Expand the bracket downward until it encloses u.
    let mut span = f64::max(hi - lo, 1e-9);
    while cdf(lo) > u && span < 1e30 {
        lo -= span;
        span *= 2.;
    }
    // Expand the bracket upward until it encloses u.
    let mut span = f64::max(hi - lo, 1e-9);
    while cdf(hi) < u && span < 1e30 {
        hi += span;
        span *= 2.;
    }

    // Bisect to tolerance.
    for _ in 0..200 {
        let mid = 0.5 * (lo + hi);
        if cdf(mid) < u {
            lo = mid;
        } else {
            hi = mid;
        }
        // Stop when the bracket collapses.
        if hi - lo <= 1e-12 * f64::max(1., f64::abs(mid)) {
            break;
        }
    }

    0.5 * (lo + hi)
}
