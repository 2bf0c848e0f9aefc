//! Hypothesis-testing diagnostics over tabular data
//!
//! This crate turns a [`table::RecordTable`] plus column names into test
//! results and chart descriptions. Computation and rendering are separate:
//! each operation builds a serializable result and a [`figure::Figure`], then
//! optionally hands the figure to a [`figure::Renderer`]. A rendering failure
//! is logged and never changes or suppresses the computed result.
//!
//! # Operations
//!
//! - [`diagnostics::diagnose`]: per-group normality and cross-group Levene test
//! - [`contingency::chi_square_independence`]: contingency table, chi-square
//!   test of independence and heatmap
//! - [`goodness_of_fit::chi_square_goodness_of_fit`]: observed vs uniform
//!   expected frequencies of one column
//! - [`comparison::compare_groups_visual`]: box plot and mean plot of a subset
//!   of groups
//!
//! # Example
//!
//! ```
//! use hypotest_analysis::{
//!     diagnostics::{DiagnoseOptions, NormalityVerdict, VarianceVerdict, diagnose},
//!     figure::NullRenderer,
//!     table::{Column, RecordTable},
//! };
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//!
//! let mut groups = vec!["A"; 10];
//! groups.extend(["B"; 10]);
//! let mut rent = (1..=10).map(f64::from).collect::<Vec<_>>();
//! rent.extend([1.0; 10]);
//!
//! let table = RecordTable::from_columns(vec![
//!     Column::new("group", groups),
//!     Column::new("rent", rent),
//! ])?;
//!
//! let summary = diagnose(&table, "group", "rent", &DiagnoseOptions::default(), &mut NullRenderer)?;
//! assert_eq!(summary.normality.len(), 2);
//! assert_eq!(summary.normality[1].result, NormalityVerdict::NotNormal);
//! assert_eq!(summary.levene.result, VarianceVerdict::UnequalVariances);
//! # Ok(())
//! # }
//! ```

pub mod comparison;
pub mod contingency;
pub mod diagnostics;
pub mod figure;
pub mod goodness_of_fit;
pub mod groups;
pub mod table;

use hypotest_stats::TestError;

/// Errors reported by the analysis operations.
#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum AnalysisError {
    #[display("column '{column}' not found")]
    #[from(skip)]
    MissingColumn { column: String },
    #[display("non-numeric value '{value}' in column '{column}' at row {row}")]
    #[from(skip)]
    NonNumericValue {
        column: String,
        row: usize,
        value: String,
    },
    #[display("invalid parameter '{name}': {reason}")]
    #[from(skip)]
    InvalidParameter { name: &'static str, reason: String },
    #[display("insufficient data: {reason}")]
    #[from(skip)]
    InsufficientData { reason: String },
    #[display("failed to read CSV: {_0}")]
    Csv(csv::Error),
    #[display("I/O error: {_0}")]
    Io(std::io::Error),
    #[display("statistical test failed: {_0}")]
    Test(TestError),
}
