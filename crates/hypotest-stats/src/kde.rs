use std::f64::consts::PI;

use crate::descriptive::DescriptiveStats;

/// Gaussian kernel density estimate with Scott's rule bandwidth.
///
/// The bandwidth is `σ · n^(-1/5)` where `σ` is the sample standard
/// deviation.
#[derive(Debug, Clone)]
pub struct GaussianKde {
    points: Vec<f64>,
    bandwidth: f64,
}

impl GaussianKde {
    /// Builds the estimator.
    ///
    /// Returns `None` for samples with fewer than two finite values or zero
    /// variance, where no bandwidth can be derived.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn new(sample: &[f64]) -> Option<Self> {
        let points = sample
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .collect::<Vec<_>>();
        if points.len() < 2 {
            return None;
        }
        let stats = DescriptiveStats::new(points.iter().copied())?;
        if stats.has_zero_variance() {
            return None;
        }
        let bandwidth = stats.std_dev * (points.len() as f64).powf(-0.2);
        Some(Self { points, bandwidth })
    }

    #[must_use]
    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    /// Density at `x`.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn evaluate(&self, x: f64) -> f64 {
        let norm = 1.0 / (self.points.len() as f64 * self.bandwidth * (2.0 * PI).sqrt());
        self.points
            .iter()
            .map(|p| {
                let u = (x - p) / self.bandwidth;
                (-0.5 * u * u).exp()
            })
            .sum::<f64>()
            * norm
    }

    /// Evaluates the density on `num_points` evenly spaced points over
    /// `[start, end]`.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn curve(&self, start: f64, end: f64, num_points: usize) -> Vec<(f64, f64)> {
        match num_points {
            0 => vec![],
            1 => vec![(start, self.evaluate(start))],
            _ => {
                let step = (end - start) / (num_points - 1) as f64;
                (0..num_points)
                    .map(|i| {
                        let x = start + i as f64 * step;
                        (x, self.evaluate(x))
                    })
                    .collect()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degenerate_samples() {
        assert!(GaussianKde::new(&[]).is_none());
        assert!(GaussianKde::new(&[1.0]).is_none());
        assert!(GaussianKde::new(&[2.0; 5]).is_none());
    }

    #[test]
    fn test_scott_bandwidth() {
        let sample = [1.0, 2.0, 3.0, 4.0, 5.0];
        let kde = GaussianKde::new(&sample).unwrap();
        let expected = 2.5_f64.sqrt() * 5.0_f64.powf(-0.2);
        assert!((kde.bandwidth() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_density_integrates_to_one() {
        let sample = [0.3, 1.2, 1.9, 2.0, 2.4, 3.3, 4.1, 5.0];
        let kde = GaussianKde::new(&sample).unwrap();
        let curve = kde.curve(-10.0, 15.0, 2001);
        let step = 25.0 / 2000.0;
        let area = curve.iter().map(|(_, d)| d * step).sum::<f64>();
        assert!((area - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_symmetric_sample_peaks_at_center() {
        let kde = GaussianKde::new(&[-1.0, 0.0, 1.0]).unwrap();
        assert!(kde.evaluate(0.0) > kde.evaluate(0.5));
        assert!((kde.evaluate(0.5) - kde.evaluate(-0.5)).abs() < 1e-12);
    }
}
