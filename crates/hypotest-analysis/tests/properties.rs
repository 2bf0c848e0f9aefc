//! Property-based tests of the group diagnostics
//!
//! Tables are generated as `(group, value)` rows with missing values mixed in.

use hypotest_analysis::{
    diagnostics::{
        DiagnoseOptions, MIN_LEVENE_SAMPLES, MIN_NORMALITY_SAMPLES, NormalityVerdict,
        VarianceVerdict, diagnose,
    },
    figure::{Figure, NullRenderer, RenderError, Renderer},
    table::{CategoryKey, Column, RecordTable},
};
use proptest::prelude::*;

#[derive(Default)]
struct CountingRenderer {
    calls: usize,
}

impl Renderer for CountingRenderer {
    fn render(&mut self, _figure: &Figure) -> Result<(), RenderError> {
        self.calls += 1;
        Ok(())
    }
}

fn rows() -> impl Strategy<Value = Vec<(Option<u8>, Option<f64>)>> {
    prop::collection::vec(
        (
            prop::option::weighted(0.95, 0u8..5),
            prop::option::weighted(0.9, -1000.0f64..1000.0),
        ),
        0..80,
    )
}

fn build_table(rows: &[(Option<u8>, Option<f64>)]) -> RecordTable {
    RecordTable::from_columns(vec![
        Column::new("bhk", rows.iter().map(|(g, _)| g.map(f64::from))),
        Column::new("rent", rows.iter().map(|(_, v)| *v)),
    ])
    .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_one_normality_entry_per_group(rows in rows()) {
        let table = build_table(&rows);
        let options = DiagnoseOptions { visualize: false, ..DiagnoseOptions::default() };
        let summary = diagnose(&table, "bhk", "rent", &options, &mut NullRenderer).unwrap();

        let keys = table.distinct_keys("bhk").unwrap();
        prop_assert_eq!(summary.normality.len(), keys.len());
        for (entry, key) in summary.normality.iter().zip(&keys) {
            prop_assert_eq!(&entry.group, key);

            let n = rows
                .iter()
                .filter(|(g, v)| {
                    let group = g.map(|g| CategoryKey::Number(f64::from(g)));
                    group.as_ref() == Some(key) && v.is_some()
                })
                .count();
            prop_assert_eq!(entry.sample_size, n);
            prop_assert_eq!(entry.result == NormalityVerdict::TooFewSamples, n < MIN_NORMALITY_SAMPLES);
            prop_assert_eq!(entry.statistic.is_none(), n < MIN_NORMALITY_SAMPLES);
        }
    }

    #[test]
    fn prop_diagnose_is_idempotent(rows in rows(), alpha in 0.001f64..0.999) {
        let table = build_table(&rows);
        let options = DiagnoseOptions { alpha, visualize: false, ..DiagnoseOptions::default() };
        let first = diagnose(&table, "bhk", "rent", &options, &mut NullRenderer).unwrap();
        let second = diagnose(&table, "bhk", "rent", &options, &mut NullRenderer).unwrap();
        // NaN statistics compare unequal, their JSON form does not
        prop_assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn prop_visualize_does_not_change_summary(rows in rows()) {
        let table = build_table(&rows);
        let mut renderer = CountingRenderer::default();

        let hidden = DiagnoseOptions { visualize: false, ..DiagnoseOptions::default() };
        let without = diagnose(&table, "bhk", "rent", &hidden, &mut renderer).unwrap();
        prop_assert_eq!(renderer.calls, 0);

        let with = diagnose(&table, "bhk", "rent", &DiagnoseOptions::default(), &mut renderer).unwrap();
        let has_groups = !table.distinct_keys("bhk").unwrap().is_empty();
        prop_assert_eq!(renderer.calls, usize::from(has_groups));

        prop_assert_eq!(
            serde_json::to_string(&without).unwrap(),
            serde_json::to_string(&with).unwrap()
        );
    }

    #[test]
    fn prop_levene_needs_two_groups(rows in rows(), alpha in 0.001f64..0.999) {
        let table = build_table(&rows);
        let options = DiagnoseOptions { alpha, visualize: false, ..DiagnoseOptions::default() };
        let summary = diagnose(&table, "bhk", "rent", &options, &mut NullRenderer).unwrap();

        let eligible = summary
            .normality
            .iter()
            .filter(|n| n.sample_size >= MIN_LEVENE_SAMPLES)
            .count();
        prop_assert_eq!(summary.levene.groups_tested, eligible);
        prop_assert_eq!(summary.levene.result == VarianceVerdict::InsufficientData, eligible < 2);
        prop_assert_eq!(summary.levene.p_value.is_none(), eligible < 2);
        if let Some(p) = summary.levene.p_value {
            prop_assert_eq!(summary.levene.result == VarianceVerdict::EqualVariances, p > alpha);
        }
    }

    #[test]
    fn prop_normal_iff_p_above_alpha(rows in rows(), alpha in 0.001f64..0.999) {
        let table = build_table(&rows);
        let options = DiagnoseOptions { alpha, visualize: false, ..DiagnoseOptions::default() };
        let summary = diagnose(&table, "bhk", "rent", &options, &mut NullRenderer).unwrap();

        for entry in summary.normality.iter().filter(|n| n.sample_size >= MIN_NORMALITY_SAMPLES) {
            let p = entry.p_value.unwrap();
            prop_assert_ne!(entry.result, NormalityVerdict::TooFewSamples);
            prop_assert_eq!(entry.result == NormalityVerdict::Normal, p > alpha);
        }
    }
}
