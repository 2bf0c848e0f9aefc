/// Descriptive statistics summarizing a sample.
///
/// Besides the usual location and spread measures this keeps the biased
/// central moments `m2`, `m3` and `m4`, which the normality tests are built on.
#[derive(Debug, Clone, serde::Serialize)]
pub struct DescriptiveStats {
    /// Number of observations.
    pub count: usize,
    /// The minimum value in the sample.
    pub min: f64,
    /// The maximum value in the sample.
    pub max: f64,
    /// The arithmetic mean of the sample.
    pub mean: f64,
    /// The median (average of the two middle values for even counts).
    pub median: f64,
    /// The unbiased sample variance (`ddof = 1`). `NaN` for a single observation.
    pub variance: f64,
    /// The sample standard deviation (`sqrt(variance)`).
    pub std_dev: f64,
    /// Second central moment (`ddof = 0`).
    pub m2: f64,
    /// Third central moment.
    pub m3: f64,
    /// Fourth central moment.
    pub m4: f64,
}

/// Relative tolerance under which the second moment counts as zero.
pub const ZERO_VARIANCE_TOLERANCE: f64 = 1e-15;

impl DescriptiveStats {
    /// Computes descriptive statistics from unsorted values.
    ///
    /// # Returns
    ///
    /// * `Some(DescriptiveStats)` - if the sample contains at least one value
    /// * `None` - if the sample is empty
    ///
    /// # Examples
    ///
    /// ```
    /// # use hypotest_stats::descriptive::DescriptiveStats;
    /// let stats = DescriptiveStats::new([5.0, 2.0, 4.0, 1.0, 3.0]).unwrap();
    /// assert_eq!(stats.min, 1.0);
    /// assert_eq!(stats.max, 5.0);
    /// assert_eq!(stats.mean, 3.0);
    /// assert_eq!(stats.median, 3.0);
    /// assert_eq!(stats.variance, 2.5);
    /// ```
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut values = values.into_iter().collect::<Vec<_>>();
        values.sort_by(f64::total_cmp);
        Self::from_sorted(&values)
    }

    /// Computes descriptive statistics from pre-sorted values.
    ///
    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted in ascending order.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn from_sorted(sorted_values: &[f64]) -> Option<Self> {
        assert!(
            sorted_values.is_sorted_by(|a, b| a <= b),
            "values must be sorted in ascending order"
        );

        let min = *sorted_values.first()?;
        let max = *sorted_values.last()?;
        let count = sorted_values.len();
        let n = count as f64;
        let mean = sorted_values.iter().sum::<f64>() / n;
        let median = median_of_sorted(sorted_values);

        let (mut m2, mut m3, mut m4) = (0.0, 0.0, 0.0);
        for &v in sorted_values {
            let d = v - mean;
            let d2 = d * d;
            m2 += d2;
            m3 += d2 * d;
            m4 += d2 * d2;
        }
        let sum_sq = m2;
        m2 /= n;
        m3 /= n;
        m4 /= n;

        let variance = if count > 1 {
            sum_sq / (n - 1.0)
        } else {
            f64::NAN
        };

        Some(Self {
            count,
            min,
            max,
            mean,
            median,
            variance,
            std_dev: variance.sqrt(),
            m2,
            m3,
            m4,
        })
    }

    /// Returns `true` when all observations are equal, or when the second
    /// moment is zero up to floating-point resolution relative to the mean.
    ///
    /// A constant sample whose mean is not exactly representable still leaves
    /// rounding noise in `m2`, so equal extremes are checked first.
    #[must_use]
    pub fn has_zero_variance(&self) -> bool {
        self.min.total_cmp(&self.max).is_eq()
            || self.m2 <= (ZERO_VARIANCE_TOLERANCE * self.mean).powi(2)
    }

    /// Biased sample skewness `m3 / m2^1.5`, `NaN` for zero variance.
    #[must_use]
    pub fn skewness(&self) -> f64 {
        if self.has_zero_variance() {
            return f64::NAN;
        }
        self.m3 / self.m2.powf(1.5)
    }

    /// Biased Pearson kurtosis `m4 / m2^2` (3.0 for a normal distribution),
    /// `NaN` for zero variance.
    #[must_use]
    pub fn kurtosis(&self) -> f64 {
        if self.has_zero_variance() {
            return f64::NAN;
        }
        self.m4 / (self.m2 * self.m2)
    }
}

/// Median of sorted values; `NaN` when empty.
#[must_use]
pub fn median_of_sorted(sorted_values: &[f64]) -> f64 {
    let len = sorted_values.len();
    match len {
        0 => f64::NAN,
        _ if len % 2 == 1 => sorted_values[len / 2],
        _ => f64::midpoint(sorted_values[len / 2 - 1], sorted_values[len / 2]),
    }
}
