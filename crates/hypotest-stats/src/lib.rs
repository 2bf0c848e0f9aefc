//! Statistical routines backing the hypotest toolkit.
//!
//! This crate provides the numeric side of the toolkit:
//!
//! - **Descriptive statistics**: mean, median, variance and central moments
//! - **Percentiles**: linearly interpolated percentile lookup
//! - **Histogram generation**: equal-width bins with density normalization
//! - **Kernel density estimation**: Gaussian KDE for smoothed density curves
//! - **Box plot summaries**: quartiles, Tukey whiskers and outliers
//! - **Normality testing**: D'Agostino-Pearson omnibus test
//! - **Variance homogeneity**: Levene's test
//! - **Chi-square tests**: independence and goodness-of-fit
//!
//! # Examples
//!
//! ## Testing a sample for normality
//!
//! ```
//! use hypotest_stats::normality::normal_test;
//!
//! let sample = [2.1, 2.5, 1.9, 2.2, 2.8, 2.0, 2.4, 2.3, 2.6, 1.8];
//! let result = normal_test(&sample).unwrap();
//! assert!(result.p_value > 0.0 && result.p_value <= 1.0);
//! ```
//!
//! ## Comparing variances across groups
//!
//! ```
//! use hypotest_stats::variance::{Center, levene};
//!
//! let a = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let b = [2.0, 4.0, 6.0, 8.0, 10.0];
//! let result = levene(&[&a[..], &b[..]], Center::Median).unwrap();
//! assert!(result.statistic > 0.0);
//! ```
//!
//! ## Goodness of fit against a uniform distribution
//!
//! ```
//! use hypotest_stats::chi_square::goodness_of_fit;
//!
//! let result = goodness_of_fit(&[10.0, 10.0, 10.0], None).unwrap();
//! assert_eq!(result.statistic, 0.0);
//! assert_eq!(result.p_value, 1.0);
//! ```

pub mod boxplot;
pub mod chi_square;
pub mod descriptive;
pub mod distribution;
pub mod histogram;
pub mod kde;
pub mod normality;
pub mod percentiles;
pub mod variance;

/// Errors reported by the statistical tests.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum TestError {
    #[display("{test} requires at least {required} observations, got {actual}")]
    TooFewObservations {
        test: &'static str,
        required: usize,
        actual: usize,
    },
    #[display("{test} requires at least {required} groups, got {actual}")]
    TooFewGroups {
        test: &'static str,
        required: usize,
        actual: usize,
    },
    #[display("invalid frequencies: {reason}")]
    InvalidFrequencies { reason: String },
    #[display("invalid distribution parameters: {message}")]
    Distribution { message: String },
}

impl TestError {
    pub(crate) fn distribution<E>(err: E) -> Self
    where
        E: std::error::Error,
    {
        Self::Distribution {
            message: err.to_string(),
        }
    }
}

/// Statistic and p-value pair returned by the two-number tests.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct TestResult {
    pub statistic: f64,
    pub p_value: f64,
}
