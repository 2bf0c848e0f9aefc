//! Chi-square test of independence command

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use hypotest_analysis::contingency::{self, ChiSquareIndependence};

use crate::{
    render::FigureArg,
    util::{self, Output},
};

#[derive(Debug, Clone, Args)]
pub(crate) struct ChiSquareArg {
    /// CSV file with a header row
    pub csv: PathBuf,

    /// Column providing the contingency table rows
    #[arg(long)]
    pub row_column: String,

    /// Column providing the contingency table columns
    #[arg(long)]
    pub col_column: String,

    #[clap(flatten)]
    pub figure: FigureArg,

    /// Write the result as JSON to this path (`-` for stdout)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

pub(crate) fn run(arg: &ChiSquareArg) -> anyhow::Result<()> {
    let table = util::read_csv_file(&arg.csv)?;
    let mut renderer = arg.figure.renderer();
    let result = contingency::chi_square_independence(
        &table,
        &arg.row_column,
        &arg.col_column,
        &mut *renderer,
    )
    .with_context(|| {
        format!(
            "Failed to test independence of '{}' and '{}'",
            arg.row_column, arg.col_column
        )
    })?;

    print_result(&result);
    Output::save_json(&result, arg.output.as_deref())?;
    Ok(())
}

fn print_result(result: &ChiSquareIndependence) {
    println!(
        "Chi-square Test of Independence: {} vs {}",
        result.row_column, result.col_column
    );
    println!("==========================================\n");

    let observed = &result.observed;
    print!("  {:<20}", result.row_column);
    for key in &observed.col_keys {
        print!(" {:>12}", key.to_string());
    }
    println!();
    println!("  {}", "-".repeat(20 + 13 * observed.col_keys.len()));
    for (key, (counts, expected)) in observed
        .row_keys
        .iter()
        .zip(observed.counts.iter().zip(&result.expected))
    {
        print!("  {:<20}", key.to_string());
        for (count, expected) in counts.iter().zip(expected) {
            print!(" {:>12}", format!("{count} ({expected:.1})"));
        }
        println!();
    }
    println!("  (observed counts, expected counts in parentheses)");
    println!();

    println!("  Chi2:               {:.4}", result.statistic);
    println!("  Degrees of freedom: {}", result.degrees_of_freedom);
    println!("  p-value:            {:.4}", result.p_value);
}
