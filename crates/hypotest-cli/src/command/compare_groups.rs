//! Visual group comparison command

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use hypotest_analysis::comparison::{self, GroupComparison};

use crate::{
    render::FigureArg,
    util::{self, Output},
};

#[derive(Debug, Clone, Args)]
pub(crate) struct CompareGroupsArg {
    /// CSV file with a header row
    pub csv: PathBuf,

    /// Column whose values define the groups
    #[arg(long)]
    pub group_column: String,

    /// Numeric column to compare
    #[arg(long)]
    pub value_column: String,

    /// Groups to compare (comma-separated)
    #[arg(long, value_delimiter = ',', required = true)]
    pub groups: Vec<String>,

    #[clap(flatten)]
    pub figure: FigureArg,

    /// Write the summaries as JSON to this path (`-` for stdout)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

pub(crate) fn run(arg: &CompareGroupsArg) -> anyhow::Result<()> {
    let table = util::read_csv_file(&arg.csv)?;
    let mut renderer = arg.figure.renderer();
    let result = comparison::compare_groups_visual(
        &table,
        &arg.group_column,
        &arg.value_column,
        &arg.groups,
        &mut *renderer,
    )
    .with_context(|| {
        format!(
            "Failed to compare '{}' across groups of '{}'",
            arg.value_column, arg.group_column
        )
    })?;

    print_result(&result);
    Output::save_json(&result, arg.output.as_deref())?;
    Ok(())
}

fn print_result(result: &GroupComparison) {
    println!(
        "Group Comparison: {} by {}",
        result.value_column, result.group_column
    );
    println!("==========================================\n");

    println!(
        "  {:<20} {:>8} {:>12} {:>12} {:>12} {:>12} {:>12} {:>9}",
        result.group_column, "N", "Mean", "StdDev", "Q1", "Median", "Q3", "Outliers"
    );
    println!("  {}", "-".repeat(105));
    for group in &result.groups {
        let spread = &group.mean_spread;
        let summary = &group.box_summary;
        println!(
            "  {:<20} {:>8} {:>12.2} {:>12.2} {:>12.2} {:>12.2} {:>12.2} {:>9}",
            group.group.to_string(),
            spread.count,
            spread.mean,
            spread.std_dev,
            summary.q1,
            summary.median,
            summary.q3,
            summary.outliers.len(),
        );
    }
    if !result.missing_groups.is_empty() {
        println!();
        println!("  No data for: {}", result.missing_groups.join(", "));
    }
}
