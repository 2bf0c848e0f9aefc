use crate::{descriptive::DescriptiveStats, percentiles::Percentiles};

/// Five-number summary drawn by a box plot.
///
/// Whiskers reach the most extreme observations within `1.5 × IQR` of the
/// quartiles; observations beyond them are reported as outliers.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct BoxSummary {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub lower_whisker: f64,
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

/// Mean with a one-standard-deviation error bar, as drawn by a point plot.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct MeanSpread {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; `NaN` for a single observation.
    pub std_dev: f64,
}

/// Multiplier applied to the interquartile range to place the whiskers.
pub const WHISKER_RANGE: f64 = 1.5;

const QUARTILE_POINTS: [f64; 3] = [25.0, 50.0, 75.0];

impl BoxSummary {
    /// Summarizes a sample; `None` when it is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// # use hypotest_stats::boxplot::BoxSummary;
    /// let summary = BoxSummary::new(&[1.0, 2.0, 3.0, 4.0, 5.0, 100.0]).unwrap();
    /// assert_eq!(summary.median, 3.5);
    /// assert_eq!(summary.outliers, vec![100.0]);
    /// assert_eq!(summary.upper_whisker, 5.0);
    /// ```
    #[must_use]
    pub fn new(sample: &[f64]) -> Option<Self> {
        let mut sorted = sample
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .collect::<Vec<_>>();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(f64::total_cmp);

        let quartiles = Percentiles::from_sorted(&sorted, &QUARTILE_POINTS);
        let [q1, median, q3] = QUARTILE_POINTS.map(|p| quartiles.get(p).unwrap_or(f64::NAN));
        let iqr = q3 - q1;
        let low_fence = q1 - WHISKER_RANGE * iqr;
        let high_fence = q3 + WHISKER_RANGE * iqr;

        let inside = sorted
            .iter()
            .copied()
            .filter(|v| (low_fence..=high_fence).contains(v));
        let lower_whisker = inside.clone().next().unwrap_or(q1);
        let upper_whisker = inside.last().unwrap_or(q3);
        let outliers = sorted
            .iter()
            .copied()
            .filter(|v| !(low_fence..=high_fence).contains(v))
            .collect();

        Some(Self {
            q1,
            median,
            q3,
            lower_whisker,
            upper_whisker,
            outliers,
        })
    }
}

impl MeanSpread {
    /// `None` when the sample is empty.
    #[must_use]
    pub fn new(sample: &[f64]) -> Option<Self> {
        let stats = DescriptiveStats::new(sample.iter().copied())?;
        Some(Self {
            count: stats.count,
            mean: stats.mean,
            std_dev: stats.std_dev,
        })
    }
}
