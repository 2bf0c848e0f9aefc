/// Precomputed percentile values for a sample.
///
/// # Examples
///
/// ```
/// use hypotest_stats::percentiles::Percentiles;
///
/// let values = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
/// let percentiles = Percentiles::new(&values, &[25.0, 50.0, 75.0]);
///
/// assert_eq!(percentiles.get(50.0), Some(5.5));
/// assert_eq!(percentiles.get(25.0), Some(3.25));
/// ```
#[derive(Debug, Clone)]
pub struct Percentiles {
    /// Percentile-value pairs in the order they were requested.
    /// Each tuple contains (percentile, value) where percentile is 0.0-100.0.
    values: Vec<(f64, f64)>,
}

impl Percentiles {
    /// Computes percentiles from sorted values.
    ///
    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted in ascending order.
    #[must_use]
    pub fn from_sorted(sorted_values: &[f64], percentile_points: &[f64]) -> Self {
        assert!(
            sorted_values.is_sorted_by(|a, b| a <= b),
            "values must be sorted in ascending order"
        );

        let values = percentile_points
            .iter()
            .map(|&p| (p, compute_percentile(sorted_values, p)))
            .collect();
        Self { values }
    }

    /// Computes percentiles from unsorted values.
    #[must_use]
    pub fn new(values: &[f64], percentile_points: &[f64]) -> Self {
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        Self::from_sorted(&sorted, percentile_points)
    }

    /// Gets the value at a specific percentile.
    ///
    /// Returns `None` if the percentile was not precomputed.
    #[must_use]
    pub fn get(&self, percentile: f64) -> Option<f64> {
        self.values.iter().find_map(|(p, value)| {
            if (*p - percentile).abs() < f64::EPSILON {
                Some(*value)
            } else {
                None
            }
        })
    }

    /// Returns an iterator over all (percentile, value) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.values.iter().copied()
    }
}

/// Computes a single percentile value from sorted data.
///
/// Uses linear interpolation between the closest ranks: the `k`-th percentile
/// sits at fractional position `(n - 1) * k / 100`.
///
/// Returns `f64::NAN` if the input is empty.
///
/// # Examples
///
/// ```
/// use hypotest_stats::percentiles::compute_percentile;
///
/// let values = [1.0, 2.0, 3.0, 4.0];
/// assert_eq!(compute_percentile(&values, 50.0), 2.5);
/// assert_eq!(compute_percentile(&values, 0.0), 1.0);
/// assert_eq!(compute_percentile(&values, 100.0), 4.0);
/// ```
#[expect(
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss
)]
#[must_use]
pub fn compute_percentile(sorted_values: &[f64], percentile: f64) -> f64 {
    if sorted_values.is_empty() {
        return f64::NAN;
    }
    let last = sorted_values.len() - 1;
    let position = (last as f64 * percentile.clamp(0.0, 100.0)) / 100.0;
    let lower = position.floor() as usize;
    let upper = (lower + 1).min(last);
    let fraction = position - position.floor();
    sorted_values[lower] + (sorted_values[upper] - sorted_values[lower]) * fraction
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpolates_between_ranks() {
        let values = [10.0, 20.0, 30.0, 40.0, 50.0];
        assert_eq!(compute_percentile(&values, 25.0), 20.0);
        assert!((compute_percentile(&values, 10.0) - 14.0).abs() < 1e-9);
        assert!((compute_percentile(&values, 90.0) - 46.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_value() {
        assert_eq!(compute_percentile(&[7.0], 75.0), 7.0);
    }

    #[test]
    fn test_missing_percentile_is_none() {
        let percentiles = Percentiles::new(&[3.0, 1.0, 2.0], &[50.0]);
        assert_eq!(percentiles.get(50.0), Some(2.0));
        assert_eq!(percentiles.get(25.0), None);
        assert_eq!(percentiles.iter().count(), 1);
    }
}
