//! Tail probabilities of the reference distributions used by the tests.
//!
//! Statistics that are `NaN` propagate to a `NaN` p-value, and an infinite
//! statistic has a tail probability of zero.

use statrs::distribution::{ChiSquared, ContinuousCDF, FisherSnedecor, Normal};

use crate::TestError;

/// Survival function `P(X > statistic)` of a chi-square distribution.
pub fn chi2_sf(statistic: f64, dof: f64) -> Result<f64, TestError> {
    if let Some(p) = degenerate_tail(statistic) {
        return Ok(p);
    }
    let dist = ChiSquared::new(dof).map_err(TestError::distribution)?;
    Ok(dist.sf(statistic).clamp(0.0, 1.0))
}

/// Survival function `P(X > statistic)` of an F distribution.
pub fn f_sf(statistic: f64, dof_num: f64, dof_den: f64) -> Result<f64, TestError> {
    if let Some(p) = degenerate_tail(statistic) {
        return Ok(p);
    }
    let dist = FisherSnedecor::new(dof_num, dof_den).map_err(TestError::distribution)?;
    Ok(dist.sf(statistic).clamp(0.0, 1.0))
}

/// Two-sided p-value of a standard normal z-score.
pub fn normal_two_sided(z: f64) -> Result<f64, TestError> {
    if let Some(p) = degenerate_tail(z.abs()) {
        return Ok(p);
    }
    let dist = Normal::new(0.0, 1.0).map_err(TestError::distribution)?;
    Ok((2.0 * dist.sf(z.abs())).clamp(0.0, 1.0))
}

fn degenerate_tail(statistic: f64) -> Option<f64> {
    if statistic.is_nan() {
        Some(f64::NAN)
    } else if statistic == f64::INFINITY {
        Some(0.0)
    } else {
        None
    }
}
