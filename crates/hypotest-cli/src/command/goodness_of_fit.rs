//! Chi-square goodness-of-fit command

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use hypotest_analysis::goodness_of_fit::{self, GoodnessOfFit};

use crate::{
    render::FigureArg,
    util::{self, Output},
};

#[derive(Debug, Clone, Args)]
pub(crate) struct GoodnessOfFitArg {
    /// CSV file with a header row
    pub csv: PathBuf,

    /// Categorical column to test
    #[arg(long)]
    pub column: String,

    #[clap(flatten)]
    pub figure: FigureArg,

    /// Write the result as JSON to this path (`-` for stdout)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

pub(crate) fn run(arg: &GoodnessOfFitArg) -> anyhow::Result<()> {
    let table = util::read_csv_file(&arg.csv)?;
    let mut renderer = arg.figure.renderer();
    let result = goodness_of_fit::chi_square_goodness_of_fit(&table, &arg.column, &mut *renderer)
        .with_context(|| format!("Failed to test goodness of fit of '{}'", arg.column))?;

    print_result(&result);
    Output::save_json(&result, arg.output.as_deref())?;
    Ok(())
}

fn print_result(result: &GoodnessOfFit) {
    println!("Chi-square Goodness-of-Fit: {}", result.column);
    println!("==========================================\n");

    println!("  {:<20} {:>10} {:>10}", result.column, "Observed", "Expected");
    println!("  {}", "-".repeat(42));
    for freq in &result.frequencies {
        println!(
            "  {:<20} {:>10} {:>10.2}",
            freq.category.to_string(),
            freq.observed,
            freq.expected
        );
    }
    println!();

    println!("  Chi2:               {:.4}", result.statistic);
    println!("  Degrees of freedom: {}", result.degrees_of_freedom);
    println!("  p-value:            {:.4}", result.p_value);
}
