use std::ops::Range;

/// An equal-width histogram of a sample.
///
/// The bins span `[min, max]` of the data; the last bin is closed on the right
/// so the maximum is counted.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Histogram {
    /// The bins comprising the histogram, in ascending order.
    pub bins: Vec<HistogramBin>,
    /// Total number of values counted.
    pub total: u64,
}

/// A single bin in a histogram.
#[derive(Debug, Clone, serde::Serialize)]
pub struct HistogramBin {
    /// The range of values covered by this bin.
    pub range: Range<f64>,
    /// The number of values that fall within this bin's range.
    pub count: u64,
}

impl HistogramBin {
    /// Center of the bin.
    #[must_use]
    pub fn midpoint(&self) -> f64 {
        f64::midpoint(self.range.start, self.range.end)
    }

    /// Width of the bin.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.range.end - self.range.start
    }
}

impl Histogram {
    /// Creates a histogram with `num_bins` equal-width bins.
    ///
    /// Non-finite values are ignored. When all values are equal the single
    /// point is widened to a unit range centred on it.
    ///
    /// # Examples
    ///
    /// ```
    /// # use hypotest_stats::histogram::Histogram;
    /// let values = [1.0, 2.0, 2.0, 3.0, 4.0];
    /// let histogram = Histogram::new(values, 3);
    /// assert_eq!(histogram.bins.len(), 3);
    /// assert_eq!(histogram.total, 5);
    /// ```
    #[expect(
        clippy::cast_precision_loss,
        clippy::cast_sign_loss,
        clippy::cast_possible_truncation
    )]
    #[must_use]
    pub fn new<I>(values: I, num_bins: usize) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let values = values
            .into_iter()
            .filter(|v| v.is_finite())
            .collect::<Vec<_>>();
        if values.is_empty() || num_bins == 0 {
            return Self {
                bins: vec![],
                total: 0,
            };
        }

        let mut min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let mut max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if max - min < f64::EPSILON * min.abs().max(1.0) {
            // Concentrated at a single value
            min -= 0.5;
            max += 0.5;
        }

        let width = (max - min) / num_bins as f64;
        let mut bins = (0..num_bins)
            .map(|idx| HistogramBin {
                // Recompute bounds from `min` to avoid accumulating rounding errors
                range: (min + idx as f64 * width)..(min + (idx + 1) as f64 * width),
                count: 0,
            })
            .collect::<Vec<_>>();
        if let Some(last) = bins.last_mut() {
            last.range.end = max;
        }

        for &val in &values {
            let idx = (((val - min) / width).floor() as usize).min(num_bins - 1);
            bins[idx].count += 1;
        }

        Self {
            bins,
            total: values.len() as u64,
        }
    }

    /// Bin heights normalized so the histogram area integrates to one.
    ///
    /// Returns `(bin center, density)` pairs.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn density(&self) -> Vec<(f64, f64)> {
        if self.total == 0 {
            return vec![];
        }
        let total = self.total as f64;
        self.bins
            .iter()
            .map(|bin| (bin.midpoint(), bin.count as f64 / (total * bin.width())))
            .collect()
    }
}
