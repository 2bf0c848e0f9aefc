//! Group comparison diagnostics
//!
//! Checks the two assumptions behind a parametric comparison of group means:
//! each group is roughly normal (D'Agostino-Pearson) and the groups share a
//! common variance (Levene, median-centred).

use hypotest_stats::{
    histogram::Histogram,
    kde::GaussianKde,
    normality::{MIN_SKEW_TEST_SAMPLES, normal_test},
    variance::{self, Center},
};

use crate::{
    AnalysisError,
    figure::{DensityBin, Figure, Panel, Plot, Renderer, render_logged},
    groups::GroupedSamples,
    table::{CategoryKey, RecordTable},
};

/// Smallest group that is tested for normality.
pub const MIN_NORMALITY_SAMPLES: usize = MIN_SKEW_TEST_SAMPLES;
/// Smallest group that takes part in Levene's test.
pub const MIN_LEVENE_SAMPLES: usize = 2;

const DENSITY_CURVE_POINTS: usize = 200;

/// Knobs of [`diagnose`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiagnoseOptions {
    /// Significance level; must lie strictly between 0 and 1.
    pub alpha: f64,
    /// Whether to build and render the distribution figure.
    pub visualize: bool,
    /// Histogram bins per panel.
    pub bins: usize,
}

impl Default for DiagnoseOptions {
    fn default() -> Self {
        Self {
            alpha: 0.05,
            visualize: true,
            bins: 30,
        }
    }
}

impl DiagnoseOptions {
    pub fn validate(&self) -> Result<(), AnalysisError> {
        validate_alpha(self.alpha)?;
        if self.bins == 0 {
            return Err(AnalysisError::InvalidParameter {
                name: "bins",
                reason: "at least one histogram bin is required".to_owned(),
            });
        }
        Ok(())
    }
}

pub(crate) fn validate_alpha(alpha: f64) -> Result<(), AnalysisError> {
    if alpha > 0.0 && alpha < 1.0 {
        Ok(())
    } else {
        Err(AnalysisError::InvalidParameter {
            name: "alpha",
            reason: format!("significance level must lie in (0, 1), got {alpha}"),
        })
    }
}

/// Normality classification of one group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, serde::Serialize)]
pub enum NormalityVerdict {
    #[display("Normal")]
    #[serde(rename = "Normal")]
    Normal,
    #[display("Not Normal")]
    #[serde(rename = "Not Normal")]
    NotNormal,
    #[display("Too few samples")]
    #[serde(rename = "Too few samples")]
    TooFewSamples,
}

/// Variance homogeneity classification across groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, serde::Serialize)]
pub enum VarianceVerdict {
    #[display("Equal Variances")]
    #[serde(rename = "Equal Variances")]
    EqualVariances,
    #[display("Unequal Variances")]
    #[serde(rename = "Unequal Variances")]
    UnequalVariances,
    #[display("Insufficient data across groups")]
    #[serde(rename = "Insufficient data across groups")]
    InsufficientData,
}

/// Normality test outcome for one group.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct GroupNormality {
    pub group: CategoryKey,
    pub sample_size: usize,
    /// `K²` statistic; `None` below [`MIN_NORMALITY_SAMPLES`].
    pub statistic: Option<f64>,
    pub p_value: Option<f64>,
    pub result: NormalityVerdict,
}

/// Levene test outcome across all groups with enough data.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct LeveneSummary {
    /// Number of groups that took part in the test.
    pub groups_tested: usize,
    pub statistic: Option<f64>,
    pub p_value: Option<f64>,
    pub result: VarianceVerdict,
}

/// Result of [`diagnose`].
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct DiagnosticsSummary {
    /// One entry per group, in first-seen group order.
    pub normality: Vec<GroupNormality>,
    pub levene: LeveneSummary,
}

impl DiagnosticsSummary {
    #[must_use]
    pub fn normality_for(&self, group: &CategoryKey) -> Option<&GroupNormality> {
        self.normality.iter().find(|n| n.group == *group)
    }
}

/// Runs normality and variance diagnostics of `value_column` split by
/// `group_column`, then renders the per-group distributions when
/// `options.visualize` is set.
///
/// A rendering failure is logged and does not affect the returned summary.
pub fn diagnose(
    table: &RecordTable,
    group_column: &str,
    value_column: &str,
    options: &DiagnoseOptions,
    renderer: &mut dyn Renderer,
) -> Result<DiagnosticsSummary, AnalysisError> {
    options.validate()?;
    let samples = GroupedSamples::from_table(table, group_column, value_column)?;
    tracing::info!(
        group_column,
        value_column,
        groups = samples.len(),
        alpha = options.alpha,
        "running group diagnostics"
    );

    let summary = summarize_groups(&samples, options.alpha)?;

    if options.visualize {
        if let Some(figure) = distribution_figure(&samples, options.bins) {
            render_logged(renderer, &figure);
        } else {
            tracing::debug!("no groups to plot");
        }
    }

    Ok(summary)
}

/// Computes the diagnostics summary of already grouped samples.
pub fn summarize_groups(
    samples: &GroupedSamples,
    alpha: f64,
) -> Result<DiagnosticsSummary, AnalysisError> {
    validate_alpha(alpha)?;

    let mut normality = Vec::with_capacity(samples.len());
    for group in samples.iter() {
        let entry = group_normality(&group.key, &group.values, alpha)?;
        tracing::debug!(
            group = %entry.group,
            n = entry.sample_size,
            p_value = ?entry.p_value,
            result = %entry.result,
            "normality"
        );
        normality.push(entry);
    }

    let tested = samples
        .iter()
        .filter(|g| g.values.len() >= MIN_LEVENE_SAMPLES)
        .map(|g| g.values.as_slice())
        .collect::<Vec<_>>();
    let levene = if tested.len() >= 2 {
        let result = variance::levene(&tested, Center::Median)?;
        LeveneSummary {
            groups_tested: tested.len(),
            statistic: Some(result.statistic),
            p_value: Some(result.p_value),
            result: if result.p_value > alpha {
                VarianceVerdict::EqualVariances
            } else {
                VarianceVerdict::UnequalVariances
            },
        }
    } else {
        LeveneSummary {
            groups_tested: tested.len(),
            statistic: None,
            p_value: None,
            result: VarianceVerdict::InsufficientData,
        }
    };
    tracing::debug!(
        groups = levene.groups_tested,
        p_value = ?levene.p_value,
        result = %levene.result,
        "levene"
    );

    Ok(DiagnosticsSummary { normality, levene })
}

fn group_normality(
    key: &CategoryKey,
    values: &[f64],
    alpha: f64,
) -> Result<GroupNormality, AnalysisError> {
    if values.len() < MIN_NORMALITY_SAMPLES {
        return Ok(GroupNormality {
            group: key.clone(),
            sample_size: values.len(),
            statistic: None,
            p_value: None,
            result: NormalityVerdict::TooFewSamples,
        });
    }
    let result = normal_test(values)?;
    // NaN p-values (constant samples) fail the comparison
    let verdict = if result.p_value > alpha {
        NormalityVerdict::Normal
    } else {
        NormalityVerdict::NotNormal
    };
    Ok(GroupNormality {
        group: key.clone(),
        sample_size: values.len(),
        statistic: Some(result.statistic),
        p_value: Some(result.p_value),
        result: verdict,
    })
}

/// One stacked density-histogram panel per group, in group order.
///
/// Returns `None` when there are no groups.
#[must_use]
pub fn distribution_figure(samples: &GroupedSamples, bins: usize) -> Option<Figure> {
    let panels = samples
        .iter()
        .map(|group| Panel {
            title: format!(
                "{} Distribution for {} = {}",
                samples.value_column, samples.group_column, group.key
            ),
            x_label: samples.value_column.clone(),
            y_label: "Density".to_owned(),
            plot: density_plot(&group.values, bins),
        })
        .collect();
    Figure::stacked(
        format!(
            "Distribution of {} by {}",
            samples.value_column, samples.group_column
        ),
        panels,
    )
}

fn density_plot(values: &[f64], bins: usize) -> Plot {
    let histogram = Histogram::new(values.iter().copied(), bins);
    let bins = histogram
        .bins
        .iter()
        .zip(histogram.density())
        .map(|(bin, (_, density))| DensityBin {
            start: bin.range.start,
            end: bin.range.end,
            count: bin.count,
            density,
        })
        .collect::<Vec<_>>();

    let density = match (GaussianKde::new(values), bins.first(), bins.last()) {
        (Some(kde), Some(first), Some(last)) => {
            kde.curve(first.start, last.end, DENSITY_CURVE_POINTS)
        }
        _ => vec![],
    };

    Plot::DensityHistogram { bins, density }
}
