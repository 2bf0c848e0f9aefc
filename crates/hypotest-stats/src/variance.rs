//! Levene's test for homogeneity of variances.

use crate::{TestError, TestResult, descriptive::median_of_sorted, distribution};

/// Location each group's absolute deviations are measured from.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Center {
    /// Brown-Forsythe variant, robust to skewed data.
    #[default]
    Median,
    /// Levene's original formulation.
    Mean,
}

/// Levene's test across two or more groups, jointly.
///
/// `W = (N - k) Σ nᵢ (Z̄ᵢ - Z̄)² / ((k - 1) Σᵢ Σⱼ (Zᵢⱼ - Z̄ᵢ)²)` where
/// `Zᵢⱼ = |Yᵢⱼ - centerᵢ|`; the p-value is the upper tail of
/// `F(k - 1, N - k)`.
///
/// When every group is constant the statistic is `NaN`.
///
/// # Examples
///
/// ```
/// use hypotest_stats::variance::{Center, levene};
///
/// let spread = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
/// let constant = [1.0; 10];
/// let result = levene(&[&spread[..], &constant[..]], Center::Median).unwrap();
/// assert!((result.statistic - 28.125).abs() < 1e-9);
/// assert!(result.p_value < 0.001);
/// ```
#[expect(clippy::cast_precision_loss)]
pub fn levene(groups: &[&[f64]], center: Center) -> Result<TestResult, TestError> {
    if groups.len() < 2 {
        return Err(TestError::TooFewGroups {
            test: "Levene's test",
            required: 2,
            actual: groups.len(),
        });
    }
    if let Some(group) = groups.iter().find(|g| g.is_empty()) {
        return Err(TestError::TooFewObservations {
            test: "Levene's test",
            required: 1,
            actual: group.len(),
        });
    }

    let deviations = groups
        .iter()
        .map(|group| {
            let c = group_center(group, center);
            group.iter().map(|y| (y - c).abs()).collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();
    let group_means = deviations
        .iter()
        .map(|z| z.iter().sum::<f64>() / z.len() as f64)
        .collect::<Vec<_>>();

    let k = groups.len() as f64;
    let n_total = groups.iter().map(|g| g.len()).sum::<usize>() as f64;
    let grand_mean = deviations
        .iter()
        .zip(&group_means)
        .map(|(z, mean)| mean * z.len() as f64)
        .sum::<f64>()
        / n_total;

    let between = deviations
        .iter()
        .zip(&group_means)
        .map(|(z, mean)| z.len() as f64 * (mean - grand_mean).powi(2))
        .sum::<f64>();
    let within = deviations
        .iter()
        .zip(&group_means)
        .flat_map(|(z, mean)| z.iter().map(move |zij| (zij - mean).powi(2)))
        .sum::<f64>();

    let statistic = ((n_total - k) * between) / ((k - 1.0) * within);
    Ok(TestResult {
        statistic,
        p_value: distribution::f_sf(statistic, k - 1.0, n_total - k)?,
    })
}

#[expect(clippy::cast_precision_loss)]
fn group_center(group: &[f64], center: Center) -> f64 {
    match center {
        Center::Median => {
            let mut sorted = group.to_vec();
            sorted.sort_by(f64::total_cmp);
            median_of_sorted(&sorted)
        }
        Center::Mean => group.iter().sum::<f64>() / group.len() as f64,
    }
}
