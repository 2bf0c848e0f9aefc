//! Pearson chi-square tests on frequency data.

use crate::{TestError, TestResult, distribution};

/// Result of a chi-square test of independence on a contingency table.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct IndependenceResult {
    pub statistic: f64,
    pub p_value: f64,
    /// `(rows - 1) * (cols - 1)`.
    pub degrees_of_freedom: usize,
    /// Expected counts under independence, same shape as the observed table.
    pub expected: Vec<Vec<f64>>,
}

/// Chi-square goodness-of-fit test.
///
/// With `expected = None` the expected frequencies are uniform over the
/// observed categories. Explicit expectations must have the same length as
/// `observed` and be strictly positive.
pub fn goodness_of_fit(observed: &[f64], expected: Option<&[f64]>) -> Result<TestResult, TestError> {
    if observed.len() < 2 {
        return Err(TestError::TooFewObservations {
            test: "chi-square goodness-of-fit",
            required: 2,
            actual: observed.len(),
        });
    }
    if observed.iter().any(|o| !o.is_finite() || *o < 0.0) {
        return Err(TestError::InvalidFrequencies {
            reason: "observed frequencies must be finite and non-negative".to_owned(),
        });
    }
    let total = observed.iter().sum::<f64>();
    if total <= 0.0 {
        return Err(TestError::InvalidFrequencies {
            reason: "observed frequencies sum to zero".to_owned(),
        });
    }

    let expected = match expected {
        Some(expected) => {
            if expected.len() != observed.len() {
                return Err(TestError::InvalidFrequencies {
                    reason: format!(
                        "expected has {} categories, observed has {}",
                        expected.len(),
                        observed.len()
                    ),
                });
            }
            if expected.iter().any(|e| !e.is_finite() || *e <= 0.0) {
                return Err(TestError::InvalidFrequencies {
                    reason: "expected frequencies must be strictly positive".to_owned(),
                });
            }
            expected.to_vec()
        }
        None => uniform_expected(observed),
    };

    let statistic = observed
        .iter()
        .zip(&expected)
        .map(|(o, e)| (o - e).powi(2) / e)
        .sum::<f64>();
    #[expect(clippy::cast_precision_loss)]
    let dof = (observed.len() - 1) as f64;
    Ok(TestResult {
        statistic,
        p_value: distribution::chi2_sf(statistic, dof)?,
    })
}

/// Uniform expected frequencies: `total / k` for every category.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn uniform_expected(observed: &[f64]) -> Vec<f64> {
    if observed.is_empty() {
        return vec![];
    }
    let mean = observed.iter().sum::<f64>() / observed.len() as f64;
    vec![mean; observed.len()]
}

/// Chi-square test of independence on an `r × c` table of counts.
///
/// Yates' continuity correction is applied when there is exactly one degree
/// of freedom. A table with a single row or column has zero degrees of
/// freedom; its statistic is `0` and its p-value `1`.
///
/// # Examples
///
/// ```
/// use hypotest_stats::chi_square::independence;
///
/// let table = vec![vec![10, 10, 20], vec![20, 20, 20]];
/// let result = independence(&table).unwrap();
/// assert_eq!(result.degrees_of_freedom, 2);
/// assert!((result.statistic - 2.777_777).abs() < 1e-5);
/// ```
#[expect(clippy::cast_precision_loss)]
pub fn independence(observed: &[Vec<u64>]) -> Result<IndependenceResult, TestError> {
    let rows = observed.len();
    let cols = observed.first().map_or(0, Vec::len);
    if rows == 0 || cols == 0 {
        return Err(TestError::TooFewObservations {
            test: "chi-square independence",
            required: 1,
            actual: 0,
        });
    }
    if observed.iter().any(|row| row.len() != cols) {
        return Err(TestError::InvalidFrequencies {
            reason: "contingency table rows differ in length".to_owned(),
        });
    }

    let row_totals = observed
        .iter()
        .map(|row| row.iter().sum::<u64>() as f64)
        .collect::<Vec<_>>();
    let col_totals = (0..cols)
        .map(|j| observed.iter().map(|row| row[j]).sum::<u64>() as f64)
        .collect::<Vec<_>>();
    let total = row_totals.iter().sum::<f64>();
    if row_totals.iter().chain(&col_totals).any(|t| *t <= 0.0) {
        return Err(TestError::InvalidFrequencies {
            reason: "every row and column of the contingency table needs a non-zero total"
                .to_owned(),
        });
    }

    let expected = row_totals
        .iter()
        .map(|r| col_totals.iter().map(|c| r * c / total).collect::<Vec<_>>())
        .collect::<Vec<_>>();
    let degrees_of_freedom = (rows - 1) * (cols - 1);

    if degrees_of_freedom == 0 {
        return Ok(IndependenceResult {
            statistic: 0.0,
            p_value: 1.0,
            degrees_of_freedom,
            expected,
        });
    }

    let yates = degrees_of_freedom == 1;
    let statistic = observed
        .iter()
        .zip(&expected)
        .flat_map(|(obs_row, exp_row)| obs_row.iter().zip(exp_row))
        .map(|(&o, &e)| {
            let mut diff = (o as f64 - e).abs();
            if yates {
                diff = (diff - 0.5).max(0.0);
            }
            diff * diff / e
        })
        .sum::<f64>();

    Ok(IndependenceResult {
        statistic,
        p_value: distribution::chi2_sf(statistic, degrees_of_freedom as f64)?,
        degrees_of_freedom,
        expected,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_goodness_of_fit_uniform() {
        let result = goodness_of_fit(&[16.0, 18.0, 16.0, 14.0, 12.0, 12.0], None).unwrap();
        assert!((result.statistic - 2.0).abs() < 1e-12);
        assert!((result.p_value - 0.849_145).abs() < 1e-5);
    }

    #[test]
    fn test_goodness_of_fit_explicit_expected() {
        let result = goodness_of_fit(&[30.0, 10.0], Some(&[20.0, 20.0])).unwrap();
        assert!((result.statistic - 10.0).abs() < 1e-12);
        assert!(result.p_value < 0.01);
    }

    #[test]
    fn test_goodness_of_fit_rejects_bad_input() {
        assert!(goodness_of_fit(&[5.0], None).is_err());
        assert!(goodness_of_fit(&[0.0, 0.0], None).is_err());
        assert!(goodness_of_fit(&[1.0, -1.0], None).is_err());
        assert!(goodness_of_fit(&[1.0, 2.0], Some(&[1.0])).is_err());
        assert!(goodness_of_fit(&[1.0, 2.0], Some(&[1.0, 0.0])).is_err());
    }

    #[test]
    fn test_independence_with_yates_correction() {
        // Expected counts are all 15; |O - E| = 5 is corrected to 4.5
        let table = vec![vec![20, 10], vec![10, 20]];
        let result = independence(&table).unwrap();
        assert_eq!(result.degrees_of_freedom, 1);
        assert!((result.statistic - 4.0 * 4.5 * 4.5 / 15.0).abs() < 1e-12);
        assert_eq!(result.expected, vec![vec![15.0, 15.0], vec![15.0, 15.0]]);
    }

    #[test]
    fn test_independence_without_association() {
        let table = vec![vec![10, 20, 30], vec![20, 40, 60]];
        let result = independence(&table).unwrap();
        assert!(result.statistic.abs() < 1e-12);
        assert!((result.p_value - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_independence_single_row() {
        let result = independence(&[vec![3, 4, 5]]).unwrap();
        assert_eq!(result.degrees_of_freedom, 0);
        assert_eq!(result.statistic, 0.0);
        assert_eq!(result.p_value, 1.0);
    }

    #[test]
    fn test_independence_rejects_ragged_or_empty() {
        assert!(independence(&[]).is_err());
        assert!(independence(&[vec![1, 2], vec![3]]).is_err());
        assert!(independence(&[vec![0, 0], vec![1, 2]]).is_err());
    }
}
