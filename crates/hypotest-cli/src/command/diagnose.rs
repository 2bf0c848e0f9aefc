//! Group comparison diagnostics command

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use hypotest_analysis::diagnostics::{self, DiagnoseOptions, DiagnosticsSummary};

use crate::{
    render::FigureArg,
    util::{self, Output},
};

#[derive(Debug, Clone, Args)]
pub(crate) struct DiagnoseArg {
    /// CSV file with a header row
    pub csv: PathBuf,

    /// Column whose values define the groups
    #[arg(long, default_value = "bhk")]
    pub group_column: String,

    /// Numeric column to test within each group
    #[arg(long, default_value = "rent")]
    pub value_column: String,

    /// Significance level
    #[arg(long, default_value_t = 0.05)]
    pub alpha: f64,

    /// Histogram bins per group panel
    #[arg(long, default_value_t = 30)]
    pub bins: usize,

    #[clap(flatten)]
    pub figure: FigureArg,

    /// Write the summary as JSON to this path (`-` for stdout)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

pub(crate) fn run(arg: &DiagnoseArg) -> anyhow::Result<()> {
    let table = util::read_csv_file(&arg.csv)?;
    let options = DiagnoseOptions {
        alpha: arg.alpha,
        visualize: arg.figure.visualize(),
        bins: arg.bins,
    };
    let mut renderer = arg.figure.renderer();
    let summary = diagnostics::diagnose(
        &table,
        &arg.group_column,
        &arg.value_column,
        &options,
        &mut *renderer,
    )
    .with_context(|| {
        format!(
            "Failed to diagnose '{}' grouped by '{}'",
            arg.value_column, arg.group_column
        )
    })?;

    print_summary(arg, &summary);
    Output::save_json(&summary, arg.output.as_deref())?;
    Ok(())
}

fn print_summary(arg: &DiagnoseArg, summary: &DiagnosticsSummary) {
    println!(
        "Group Diagnostics: {} by {} (alpha = {})",
        arg.value_column, arg.group_column, arg.alpha
    );
    println!("==========================================\n");

    println!("Normality (D'Agostino-Pearson)");
    println!(
        "  {:<20} {:>8} {:>12} {:>10}  Result",
        arg.group_column, "N", "K2", "p-value"
    );
    println!("  {}", "-".repeat(70));
    for entry in &summary.normality {
        println!(
            "  {:<20} {:>8} {:>12} {:>10}  {}",
            entry.group.to_string(),
            entry.sample_size,
            util::format_optional(entry.statistic, 4),
            util::format_optional(entry.p_value, 4),
            entry.result,
        );
    }
    println!();

    let levene = &summary.levene;
    println!("Equality of variances (Levene, median-centred)");
    println!("  Groups tested: {}", levene.groups_tested);
    println!("  Statistic:     {}", util::format_optional(levene.statistic, 4));
    println!("  p-value:       {}", util::format_optional(levene.p_value, 4));
    println!("  Result:        {}", levene.result);
}
