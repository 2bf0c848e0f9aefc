//! Visual comparison of a chosen subset of groups

use hypotest_stats::boxplot::{BoxSummary, MeanSpread};

use crate::{
    AnalysisError,
    figure::{Figure, Labeled, Panel, Plot, Renderer, render_logged},
    groups::GroupedSamples,
    table::{CategoryKey, RecordTable, Value},
};

/// Box and mean summaries of one group.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct GroupSummary {
    pub group: CategoryKey,
    pub box_summary: BoxSummary,
    pub mean_spread: MeanSpread,
}

/// Result of [`compare_groups_visual`].
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct GroupComparison {
    pub group_column: String,
    pub value_column: String,
    /// Requested groups with at least one value, in first-seen order.
    pub groups: Vec<GroupSummary>,
    /// Requested groups with no values in the data.
    pub missing_groups: Vec<String>,
}

/// Summarizes the requested groups and renders a box plot and a mean plot of
/// them.
///
/// Requested labels are parsed like CSV cells, so `"2"` and `"2.0"` both
/// select the numeric key 2; a label also selects the key with the same
/// display text. A rendering failure is logged and does not affect the
/// returned result.
pub fn compare_groups_visual(
    table: &RecordTable,
    group_column: &str,
    value_column: &str,
    groups: &[String],
    renderer: &mut dyn Renderer,
) -> Result<GroupComparison, AnalysisError> {
    if groups.is_empty() {
        return Err(AnalysisError::InvalidParameter {
            name: "groups",
            reason: "at least one group must be selected".to_owned(),
        });
    }
    let requested = groups
        .iter()
        .map(|label| (label, Value::parse(label).to_key()))
        .collect::<Vec<_>>();
    let samples = GroupedSamples::from_table_filtered(table, group_column, value_column, |key| {
        requested
            .iter()
            .any(|(label, parsed)| selects(label, parsed.as_ref(), key))
    })?;
    tracing::info!(
        group_column,
        value_column,
        requested = groups.len(),
        found = samples.len(),
        "comparing groups"
    );

    let summaries = samples
        .iter()
        .filter_map(|group| {
            Some(GroupSummary {
                group: group.key.clone(),
                box_summary: BoxSummary::new(&group.values)?,
                mean_spread: MeanSpread::new(&group.values)?,
            })
        })
        .collect::<Vec<_>>();
    let missing_groups = requested
        .iter()
        .filter(|(label, parsed)| {
            !summaries
                .iter()
                .any(|s| selects(label, parsed.as_ref(), &s.group))
        })
        .map(|(label, _)| (*label).clone())
        .collect::<Vec<_>>();
    for group in &missing_groups {
        tracing::warn!(group_column, group = %group, "requested group has no data");
    }

    let result = GroupComparison {
        group_column: group_column.to_owned(),
        value_column: value_column.to_owned(),
        groups: summaries,
        missing_groups,
    };
    if !result.groups.is_empty() {
        render_logged(renderer, &box_plot_figure(&result, groups));
        render_logged(renderer, &mean_plot_figure(&result, groups));
    }
    Ok(result)
}

fn selects(label: &str, parsed: Option<&CategoryKey>, key: &CategoryKey) -> bool {
    parsed == Some(key) || key.to_string() == label
}

/// Box plot of every summarized group.
#[must_use]
pub fn box_plot_figure(result: &GroupComparison, requested: &[String]) -> Figure {
    Figure::single(
        format!(
            "Boxplot of {} for {}",
            result.value_column,
            requested.join(", ")
        ),
        Panel {
            title: format!("{} by {}", result.value_column, result.group_column),
            x_label: result.group_column.clone(),
            y_label: result.value_column.clone(),
            plot: Plot::BoxPlot {
                boxes: result
                    .groups
                    .iter()
                    .map(|g| Labeled {
                        label: g.group.to_string(),
                        value: g.box_summary.clone(),
                    })
                    .collect(),
            },
        },
    )
}

/// Mean with a standard deviation error bar for every summarized group.
#[must_use]
pub fn mean_plot_figure(result: &GroupComparison, requested: &[String]) -> Figure {
    Figure::single(
        format!(
            "Mean Plot of {}  for {}",
            result.value_column,
            requested.join(", ")
        ),
        Panel {
            title: format!("Mean {} by {}", result.value_column, result.group_column),
            x_label: result.group_column.clone(),
            y_label: result.value_column.clone(),
            plot: Plot::PointPlot {
                points: result
                    .groups
                    .iter()
                    .map(|g| Labeled {
                        label: g.group.to_string(),
                        value: g.mean_spread,
                    })
                    .collect(),
            },
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        figure::{NullRenderer, RenderError},
        table::Column,
    };

    #[derive(Default)]
    struct Recording(Vec<String>);

    impl Renderer for Recording {
        fn render(&mut self, figure: &Figure) -> Result<(), RenderError> {
            self.0.push(figure.title.clone());
            Ok(())
        }
    }

    fn rent_table() -> RecordTable {
        RecordTable::from_columns(vec![
            Column::new(
                "bhk",
                [1.0, 2.0, 1.0, 3.0, 2.0, 1.0, 2.0, 3.0, 1.0, 2.0],
            ),
            Column::new(
                "rent",
                [
                    Some(10.0),
                    Some(20.0),
                    Some(12.0),
                    Some(35.0),
                    Some(22.0),
                    Some(14.0),
                    None,
                    Some(40.0),
                    Some(100.0),
                    Some(24.0),
                ],
            ),
        ])
        .unwrap()
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn test_selected_groups_only() {
        let result = compare_groups_visual(
            &rent_table(),
            "bhk",
            "rent",
            &strings(&["2", "1"]),
            &mut NullRenderer,
        )
        .unwrap();
        let labels = result
            .groups
            .iter()
            .map(|g| g.group.to_string())
            .collect::<Vec<_>>();
        // First-seen order, not request order
        assert_eq!(labels, vec!["1", "2"]);
        assert!(result.missing_groups.is_empty());

        let ones = &result.groups[0];
        assert_eq!(ones.mean_spread.count, 4);
        assert!((ones.mean_spread.mean - 34.0).abs() < 1e-12);
        assert_eq!(ones.box_summary.outliers, vec![100.0]);

        let twos = &result.groups[1];
        assert_eq!(twos.mean_spread.count, 3);
        assert!((twos.mean_spread.std_dev - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_two_figures_rendered() {
        let mut renderer = Recording::default();
        compare_groups_visual(
            &rent_table(),
            "bhk",
            "rent",
            &strings(&["1", "3"]),
            &mut renderer,
        )
        .unwrap();
        assert_eq!(
            renderer.0,
            vec!["Boxplot of rent for 1, 3", "Mean Plot of rent  for 1, 3"]
        );
    }

    #[test]
    fn test_unknown_group_is_reported() {
        let result = compare_groups_visual(
            &rent_table(),
            "bhk",
            "rent",
            &strings(&["3", "7"]),
            &mut NullRenderer,
        )
        .unwrap();
        assert_eq!(result.groups.len(), 1);
        assert_eq!(result.missing_groups, vec!["7"]);
    }

    #[test]
    fn test_no_matching_group_renders_nothing() {
        let mut renderer = Recording::default();
        let result = compare_groups_visual(
            &rent_table(),
            "bhk",
            "rent",
            &strings(&["9"]),
            &mut renderer,
        )
        .unwrap();
        assert!(result.groups.is_empty());
        assert!(renderer.0.is_empty());
    }

    #[test]
    fn test_numeric_labels_match_by_value() {
        let result = compare_groups_visual(
            &rent_table(),
            "bhk",
            "rent",
            &strings(&["2.0", " 3 ", "03"]),
            &mut NullRenderer,
        )
        .unwrap();
        let labels = result
            .groups
            .iter()
            .map(|g| g.group.to_string())
            .collect::<Vec<_>>();
        assert_eq!(labels, vec!["2", "3"]);
        assert!(result.missing_groups.is_empty());
    }

    #[test]
    fn test_text_labels_match_text_keys() {
        let table = RecordTable::from_columns(vec![
            Column::new("furnishing", ["Furnished", "Unfurnished", "Furnished"]),
            Column::new("rent", [10.0, 20.0, 30.0]),
        ])
        .unwrap();
        let result = compare_groups_visual(
            &table,
            "furnishing",
            "rent",
            &strings(&["Furnished", "Semi-Furnished"]),
            &mut NullRenderer,
        )
        .unwrap();
        assert_eq!(result.groups.len(), 1);
        assert_eq!(result.groups[0].mean_spread.count, 2);
        assert_eq!(result.missing_groups, vec!["Semi-Furnished"]);
    }

    #[test]
    fn test_empty_selection_is_rejected() {
        assert!(matches!(
            compare_groups_visual(&rent_table(), "bhk", "rent", &[], &mut NullRenderer),
            Err(AnalysisError::InvalidParameter { name: "groups", .. })
        ));
    }
}
