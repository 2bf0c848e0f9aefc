use clap::{Parser, Subcommand};

use self::{
    chi_square::ChiSquareArg, compare_groups::CompareGroupsArg, diagnose::DiagnoseArg,
    goodness_of_fit::GoodnessOfFitArg,
};

mod chi_square;
mod compare_groups;
mod diagnose;
mod goodness_of_fit;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Which analysis to run
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Check per-group normality and equality of variances across groups
    Diagnose(#[clap(flatten)] DiagnoseArg),
    /// Chi-square test of independence between two categorical columns
    ChiSquare(#[clap(flatten)] ChiSquareArg),
    /// Chi-square goodness-of-fit of one column against equal frequencies
    GoodnessOfFit(#[clap(flatten)] GoodnessOfFitArg),
    /// Box plot and mean plot of selected groups
    CompareGroups(#[clap(flatten)] CompareGroupsArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Diagnose(arg) => diagnose::run(&arg)?,
        Mode::ChiSquare(arg) => chi_square::run(&arg)?,
        Mode::GoodnessOfFit(arg) => goodness_of_fit::run(&arg)?,
        Mode::CompareGroups(arg) => compare_groups::run(&arg)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory as _;

    use super::*;

    #[test]
    fn test_command_definition() {
        CommandArgs::command().debug_assert();
    }

    #[test]
    fn test_diagnose_defaults() {
        let args = CommandArgs::try_parse_from(["hypotest", "diagnose", "rent.csv"]).unwrap();
        let Mode::Diagnose(arg) = args.mode else {
            panic!("expected diagnose");
        };
        assert_eq!(arg.group_column, "bhk");
        assert_eq!(arg.value_column, "rent");
        assert!((arg.alpha - 0.05).abs() < f64::EPSILON);
        assert_eq!(arg.bins, 30);
        assert!(arg.figure.visualize());
        assert!(arg.output.is_none());
    }

    #[test]
    fn test_compare_groups_list() {
        let args = CommandArgs::try_parse_from([
            "hypotest",
            "compare-groups",
            "rent.csv",
            "--group-column",
            "bhk",
            "--value-column",
            "rent",
            "--groups",
            "1,2,3",
            "--no-visualize",
        ])
        .unwrap();
        let Mode::CompareGroups(arg) = args.mode else {
            panic!("expected compare-groups");
        };
        assert_eq!(arg.groups, vec!["1", "2", "3"]);
        assert!(!arg.figure.visualize());
    }

    #[test]
    fn test_no_visualize_conflicts_with_figure_dir() {
        let result = CommandArgs::try_parse_from([
            "hypotest",
            "goodness-of-fit",
            "rent.csv",
            "--column",
            "city",
            "--no-visualize",
            "--figure-dir",
            "figs",
        ]);
        assert!(result.is_err());
    }
}
