//! Chi-square test of independence between two categorical columns

use hypotest_stats::chi_square;

use crate::{
    AnalysisError,
    figure::{Figure, Panel, Plot, Renderer, render_logged},
    table::{CategoryKey, RecordTable},
};

/// Cross-tabulated counts of two categorical columns.
///
/// Row and column keys are sorted; only rows of the record table where both
/// cells are present are counted.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Crosstab {
    pub row_keys: Vec<CategoryKey>,
    pub col_keys: Vec<CategoryKey>,
    pub counts: Vec<Vec<u64>>,
}

impl Crosstab {
    pub fn from_table(
        table: &RecordTable,
        row_column: &str,
        col_column: &str,
    ) -> Result<Self, AnalysisError> {
        let rows = table.column(row_column)?;
        let cols = table.column(col_column)?;

        let pairs = rows
            .values()
            .iter()
            .zip(cols.values())
            .filter_map(|(r, c)| Some((r.to_key()?, c.to_key()?)))
            .collect::<Vec<_>>();

        let mut row_keys = pairs.iter().map(|(r, _)| r.clone()).collect::<Vec<_>>();
        row_keys.sort();
        row_keys.dedup();
        let mut col_keys = pairs.iter().map(|(_, c)| c.clone()).collect::<Vec<_>>();
        col_keys.sort();
        col_keys.dedup();

        let mut counts = vec![vec![0; col_keys.len()]; row_keys.len()];
        for (r, c) in &pairs {
            // Both keys were collected from `pairs`, so the searches succeed
            if let (Ok(i), Ok(j)) = (row_keys.binary_search(r), col_keys.binary_search(c)) {
                counts[i][j] += 1;
            }
        }

        Ok(Self {
            row_keys,
            col_keys,
            counts,
        })
    }

    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.iter().flatten().sum()
    }
}

/// Result of [`chi_square_independence`].
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ChiSquareIndependence {
    pub row_column: String,
    pub col_column: String,
    pub observed: Crosstab,
    pub statistic: f64,
    pub p_value: f64,
    pub degrees_of_freedom: usize,
    /// Expected counts under independence, shaped like `observed.counts`.
    pub expected: Vec<Vec<f64>>,
}

/// Cross-tabulates two columns, tests them for independence and renders the
/// contingency table as a heatmap.
///
/// Yates' continuity correction is applied to 2×2 tables. A rendering failure
/// is logged and does not affect the returned result.
pub fn chi_square_independence(
    table: &RecordTable,
    row_column: &str,
    col_column: &str,
    renderer: &mut dyn Renderer,
) -> Result<ChiSquareIndependence, AnalysisError> {
    let observed = Crosstab::from_table(table, row_column, col_column)?;
    if observed.total() == 0 {
        return Err(AnalysisError::InsufficientData {
            reason: format!("no rows with both '{row_column}' and '{col_column}' present"),
        });
    }
    tracing::info!(
        row_column,
        col_column,
        rows = observed.row_keys.len(),
        cols = observed.col_keys.len(),
        "running chi-square test of independence"
    );

    let test = chi_square::independence(&observed.counts)?;
    let result = ChiSquareIndependence {
        row_column: row_column.to_owned(),
        col_column: col_column.to_owned(),
        observed,
        statistic: test.statistic,
        p_value: test.p_value,
        degrees_of_freedom: test.degrees_of_freedom,
        expected: test.expected,
    };
    tracing::debug!(
        statistic = result.statistic,
        p_value = result.p_value,
        dof = result.degrees_of_freedom,
        "chi-square independence"
    );

    render_logged(renderer, &contingency_figure(&result));
    Ok(result)
}

/// Annotated heatmap of the observed contingency table.
#[must_use]
pub fn contingency_figure(result: &ChiSquareIndependence) -> Figure {
    let labels = |keys: &[CategoryKey]| -> Vec<String> {
        keys.iter().map(ToString::to_string).collect()
    };
    Figure::single(
        format!(
            "Contingency Table: {} vs {}\nChi2: {:.2}, p-value: {:.4}",
            result.row_column, result.col_column, result.statistic, result.p_value
        ),
        Panel {
            title: format!("{} vs {}", result.row_column, result.col_column),
            x_label: result.col_column.clone(),
            y_label: result.row_column.clone(),
            plot: Plot::Heatmap {
                row_labels: labels(&result.observed.row_keys),
                col_labels: labels(&result.observed.col_keys),
                counts: result.observed.counts.clone(),
            },
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{figure::NullRenderer, table::Column};

    fn furnishing_table() -> RecordTable {
        // city x furnishing: Delhi [10, 10, 20], Pune [20, 20, 20]
        let mut city = vec![];
        let mut furnishing = vec![];
        for (c, counts) in [("Pune", [20, 20, 20]), ("Delhi", [10, 10, 20])] {
            for (f, n) in ["Furnished", "Semi", "Unfurnished"].iter().zip(counts) {
                city.extend(std::iter::repeat_n(Some(c), n));
                furnishing.extend(std::iter::repeat_n(Some(*f), n));
            }
        }
        // Incomplete rows are skipped
        city.push(None);
        furnishing.push(Some("Semi"));
        city.push(Some("Pune"));
        furnishing.push(None);
        RecordTable::from_columns(vec![
            Column::new("city", city),
            Column::new("furnishing", furnishing),
        ])
        .unwrap()
    }

    #[test]
    fn test_crosstab_sorted_keys() {
        let crosstab = Crosstab::from_table(&furnishing_table(), "city", "furnishing").unwrap();
        let rows = crosstab
            .row_keys
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>();
        assert_eq!(rows, vec!["Delhi", "Pune"]);
        assert_eq!(crosstab.counts, vec![vec![10, 10, 20], vec![20, 20, 20]]);
        assert_eq!(crosstab.total(), 100);
    }

    #[test]
    fn test_independence_statistic() {
        let result =
            chi_square_independence(&furnishing_table(), "city", "furnishing", &mut NullRenderer)
                .unwrap();
        assert_eq!(result.degrees_of_freedom, 2);
        assert!((result.statistic - 2.777_777).abs() < 1e-5);
        assert!(result.p_value > 0.05);
        assert!((result.expected[0][0] - 12.0).abs() < 1e-12);
    }

    #[test]
    fn test_heatmap_title() {
        let result =
            chi_square_independence(&furnishing_table(), "city", "furnishing", &mut NullRenderer)
                .unwrap();
        let figure = contingency_figure(&result);
        assert!(figure.title.starts_with("Contingency Table: city vs furnishing\nChi2: 2.78"));
        assert!(matches!(
            &figure.panels[0].plot,
            Plot::Heatmap { row_labels, .. } if row_labels.len() == 2
        ));
    }

    #[test]
    fn test_no_complete_rows() {
        let table = RecordTable::from_columns(vec![
            Column::new("a", [Some("x"), None]),
            Column::new("b", [None, Some("y")]),
        ])
        .unwrap();
        assert!(matches!(
            chi_square_independence(&table, "a", "b", &mut NullRenderer),
            Err(AnalysisError::InsufficientData { .. })
        ));
    }

    #[test]
    fn test_single_category_has_zero_dof() {
        let table = RecordTable::from_columns(vec![
            Column::new("a", ["x", "x", "x"]),
            Column::new("b", ["p", "q", "q"]),
        ])
        .unwrap();
        let result = chi_square_independence(&table, "a", "b", &mut NullRenderer).unwrap();
        assert_eq!(result.degrees_of_freedom, 0);
        assert_eq!(result.statistic, 0.0);
        assert_eq!(result.p_value, 1.0);
    }
}
