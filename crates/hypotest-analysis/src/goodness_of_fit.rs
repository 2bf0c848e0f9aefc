//! Chi-square goodness-of-fit of one categorical column against a uniform
//! distribution

use hypotest_stats::chi_square;

use crate::{
    AnalysisError,
    figure::{BarSeries, Figure, Panel, Plot, Renderer, render_logged},
    table::{CategoryKey, RecordTable, Value},
};

/// Observed and expected frequency of one category.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct CategoryFrequency {
    pub category: CategoryKey,
    pub observed: u64,
    pub expected: f64,
}

/// Result of [`chi_square_goodness_of_fit`].
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct GoodnessOfFit {
    pub column: String,
    /// Categories in sorted key order.
    pub frequencies: Vec<CategoryFrequency>,
    pub statistic: f64,
    pub p_value: f64,
    pub degrees_of_freedom: usize,
}

/// Counts the categories of `column` and tests them against equal expected
/// frequencies, then renders observed and expected counts side by side.
///
/// Missing cells are dropped. A rendering failure is logged and does not
/// affect the returned result.
#[expect(clippy::cast_precision_loss)]
pub fn chi_square_goodness_of_fit(
    table: &RecordTable,
    column: &str,
    renderer: &mut dyn Renderer,
) -> Result<GoodnessOfFit, AnalysisError> {
    let mut counts: Vec<(CategoryKey, u64)> = vec![];
    for key in table.column(column)?.values().iter().filter_map(Value::to_key) {
        match counts.iter_mut().find(|(k, _)| *k == key) {
            Some((_, n)) => *n += 1,
            None => counts.push((key, 1)),
        }
    }
    counts.sort_by(|(a, _), (b, _)| a.cmp(b));
    if counts.len() < 2 {
        return Err(AnalysisError::InsufficientData {
            reason: format!(
                "column '{column}' has {} distinct categories, at least 2 are required",
                counts.len()
            ),
        });
    }
    tracing::info!(
        column,
        categories = counts.len(),
        "running chi-square goodness-of-fit test"
    );

    let observed = counts.iter().map(|(_, n)| *n as f64).collect::<Vec<_>>();
    let expected = chi_square::uniform_expected(&observed);
    let test = chi_square::goodness_of_fit(&observed, Some(&expected))?;

    let result = GoodnessOfFit {
        column: column.to_owned(),
        degrees_of_freedom: counts.len() - 1,
        frequencies: counts
            .into_iter()
            .zip(expected)
            .map(|((category, observed), expected)| CategoryFrequency {
                category,
                observed,
                expected,
            })
            .collect(),
        statistic: test.statistic,
        p_value: test.p_value,
    };
    tracing::debug!(
        statistic = result.statistic,
        p_value = result.p_value,
        "chi-square goodness-of-fit"
    );

    render_logged(renderer, &frequency_figure(&result));
    Ok(result)
}

/// Grouped bars of observed against expected frequencies.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn frequency_figure(result: &GoodnessOfFit) -> Figure {
    let freqs = &result.frequencies;
    Figure::single(
        format!(
            "Observed vs Expected Frequencies\nChi2: {:.2}, p-value: {:.4}",
            result.statistic, result.p_value
        ),
        Panel {
            title: format!("Frequencies of {}", result.column),
            x_label: result.column.clone(),
            y_label: "Frequency".to_owned(),
            plot: Plot::GroupedBars {
                categories: freqs.iter().map(|f| f.category.to_string()).collect(),
                series: vec![
                    BarSeries {
                        label: "Observed".to_owned(),
                        values: freqs.iter().map(|f| f.observed as f64).collect(),
                    },
                    BarSeries {
                        label: "Expected".to_owned(),
                        values: freqs.iter().map(|f| f.expected).collect(),
                    },
                ],
            },
        },
    )
}
