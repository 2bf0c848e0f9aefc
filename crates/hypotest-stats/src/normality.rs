//! D'Agostino-Pearson omnibus test for normality.
//!
//! The omnibus statistic combines two z-scores:
//!
//! - the skewness z-score from D'Agostino's transformation of `sqrt(b1)`
//! - the kurtosis z-score from the Anscombe-Glynn transformation of `b2`
//!
//! `K² = Z_skew² + Z_kurt²` is approximately chi-square distributed with two
//! degrees of freedom under the null hypothesis of normality.
//!
//! A sample with zero variance has undefined moments; every test in this
//! module reports a `NaN` statistic and p-value for it rather than an error.

use crate::{TestError, TestResult, descriptive::DescriptiveStats, distribution};

/// Minimum sample size accepted by [`skew_test`] and [`normal_test`].
pub const MIN_SKEW_TEST_SAMPLES: usize = 8;

/// Minimum sample size accepted by [`kurtosis_test`].
pub const MIN_KURTOSIS_TEST_SAMPLES: usize = 5;

/// Tests whether the skewness differs from that of a normal distribution.
///
/// Returns the z-score and its two-sided p-value.
#[expect(clippy::cast_precision_loss)]
pub fn skew_test(sample: &[f64]) -> Result<TestResult, TestError> {
    let stats = describe(sample, "skew test", MIN_SKEW_TEST_SAMPLES)?;
    let n = stats.count as f64;

    let y = stats.skewness() * (((n + 1.0) * (n + 3.0)) / (6.0 * (n - 2.0))).sqrt();
    let beta2 = 3.0 * (n * n + 27.0 * n - 70.0) * (n + 1.0) * (n + 3.0)
        / ((n - 2.0) * (n + 5.0) * (n + 7.0) * (n + 9.0));
    let w2 = -1.0 + (2.0 * (beta2 - 1.0)).sqrt();
    let delta = 1.0 / (0.5 * w2.ln()).sqrt();
    let alpha = (2.0 / (w2 - 1.0)).sqrt();
    let z = delta * (y / alpha).asinh();

    Ok(TestResult {
        statistic: z,
        p_value: distribution::normal_two_sided(z)?,
    })
}

/// Tests whether the kurtosis differs from that of a normal distribution.
///
/// Returns the z-score and its two-sided p-value. The approximation is rough
/// below 20 observations but still defined from 5 upwards.
#[expect(clippy::cast_precision_loss)]
pub fn kurtosis_test(sample: &[f64]) -> Result<TestResult, TestError> {
    let stats = describe(sample, "kurtosis test", MIN_KURTOSIS_TEST_SAMPLES)?;
    let n = stats.count as f64;

    let b2 = stats.kurtosis();
    let expected = 3.0 * (n - 1.0) / (n + 1.0);
    let var_b2 = 24.0 * n * (n - 2.0) * (n - 3.0)
        / ((n + 1.0) * (n + 1.0) * (n + 3.0) * (n + 5.0));
    let x = (b2 - expected) / var_b2.sqrt();

    let sqrt_beta1 = 6.0 * (n * n - 5.0 * n + 2.0) / ((n + 7.0) * (n + 9.0))
        * ((6.0 * (n + 3.0) * (n + 5.0)) / (n * (n - 2.0) * (n - 3.0))).sqrt();
    let a = 6.0
        + 8.0 / sqrt_beta1 * (2.0 / sqrt_beta1 + (1.0 + 4.0 / (sqrt_beta1 * sqrt_beta1)).sqrt());
    let term1 = 1.0 - 2.0 / (9.0 * a);
    let denom = 1.0 + x * (2.0 / (a - 4.0)).sqrt();
    let term2 = if denom == 0.0 {
        f64::NAN
    } else {
        denom.signum() * ((1.0 - 2.0 / a) / denom.abs()).cbrt()
    };
    let z = (term1 - term2) / (2.0 / (9.0 * a)).sqrt();

    Ok(TestResult {
        statistic: z,
        p_value: distribution::normal_two_sided(z)?,
    })
}

/// D'Agostino-Pearson omnibus normality test.
///
/// # Examples
///
/// ```
/// use hypotest_stats::normality::normal_test;
///
/// let sample = (1..=10).map(f64::from).collect::<Vec<_>>();
/// let result = normal_test(&sample).unwrap();
/// assert!((result.statistic - 0.978_249).abs() < 1e-5);
/// assert!(result.p_value > 0.05);
///
/// // Zero variance has no defined skewness or kurtosis
/// let constant = normal_test(&[1.0; 10]).unwrap();
/// assert!(constant.statistic.is_nan());
/// assert!(constant.p_value.is_nan());
///
/// assert!(normal_test(&[1.0, 2.0, 3.0]).is_err());
/// ```
pub fn normal_test(sample: &[f64]) -> Result<TestResult, TestError> {
    if sample.len() < MIN_SKEW_TEST_SAMPLES {
        return Err(TestError::TooFewObservations {
            test: "normality test",
            required: MIN_SKEW_TEST_SAMPLES,
            actual: sample.len(),
        });
    }
    let skew = skew_test(sample)?;
    let kurtosis = kurtosis_test(sample)?;
    let statistic = skew.statistic.powi(2) + kurtosis.statistic.powi(2);
    Ok(TestResult {
        statistic,
        p_value: distribution::chi2_sf(statistic, 2.0)?,
    })
}

fn describe(
    sample: &[f64],
    test: &'static str,
    required: usize,
) -> Result<DescriptiveStats, TestError> {
    let too_few = || TestError::TooFewObservations {
        test,
        required,
        actual: sample.len(),
    };
    if sample.len() < required {
        return Err(too_few());
    }
    DescriptiveStats::new(sample.iter().copied()).ok_or_else(too_few)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_distr::{Distribution as _, Exp1};
    use rand_pcg::Pcg64Mcg;
    use statrs::distribution::{ContinuousCDF as _, Normal};

    use super::*;

    fn normal_quantiles(n: u32) -> Vec<f64> {
        let dist = Normal::new(0.0, 1.0).unwrap();
        (1..=n)
            .map(|i| dist.inverse_cdf((f64::from(i) - 0.5) / f64::from(n)))
            .collect()
    }

    #[test]
    fn test_normal_quantiles_look_normal() {
        let result = normal_test(&normal_quantiles(50)).unwrap();
        assert!((result.statistic - 0.005_59).abs() < 1e-3);
        assert!(result.p_value > 0.99);
    }

    #[test]
    fn test_exponential_quantiles_are_not_normal() {
        let sample = (1..=100)
            .map(|i| -(1.0 - (f64::from(i) - 0.5) / 100.0).ln())
            .collect::<Vec<_>>();
        let skew = skew_test(&sample).unwrap();
        assert!((skew.statistic - 5.581_71).abs() < 1e-3);
        let kurtosis = kurtosis_test(&sample).unwrap();
        assert!((kurtosis.statistic - 3.809_94).abs() < 1e-3);
        let result = normal_test(&sample).unwrap();
        assert!((result.statistic - 45.671_17).abs() < 1e-2);
        assert!(result.p_value < 1e-9);
    }

    #[test]
    fn test_symmetric_sample_has_zero_skew() {
        let sample = (1..=10).map(f64::from).collect::<Vec<_>>();
        let skew = skew_test(&sample).unwrap();
        assert!(skew.statistic.abs() < 1e-12);
        assert!((skew.p_value - 1.0).abs() < 1e-12);
        let kurtosis = kurtosis_test(&sample).unwrap();
        assert!((kurtosis.statistic + 0.989_065).abs() < 1e-5);
    }

    #[test]
    fn test_random_exponential_sample_is_rejected() {
        let mut rng = Pcg64Mcg::seed_from_u64(42);
        let sample = (0..500).map(|_| Exp1.sample(&mut rng)).collect::<Vec<f64>>();
        assert!(normal_test(&sample).unwrap().p_value < 1e-6);
    }

    #[test]
    fn test_too_few_observations() {
        let err = normal_test(&[1.0; 7]).unwrap_err();
        assert!(matches!(
            err,
            TestError::TooFewObservations {
                required: 8,
                actual: 7,
                ..
            }
        ));
        assert!(kurtosis_test(&[1.0, 2.0, 3.0, 4.0]).is_err());
    }

    #[test]
    fn test_constant_sample_is_nan() {
        let result = normal_test(&[1.0; 12]).unwrap();
        assert!(result.statistic.is_nan());
        assert!(result.p_value.is_nan());
    }

    #[test]
    fn test_inexact_constant_sample_is_nan() {
        for c in [0.1, 25_000.3, 1234.567] {
            for n in [13, 30, 101] {
                let result = normal_test(&vec![c; n]).unwrap();
                assert!(result.statistic.is_nan(), "c={c} n={n} stat={}", result.statistic);
                assert!(result.p_value.is_nan());
            }
        }
    }
}
