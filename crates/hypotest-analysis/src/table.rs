//! Column-oriented record table
//!
//! A [`RecordTable`] holds an ordered set of rows over named columns. Cells are
//! [`Value`]s: missing, numeric or text. Operations never mutate a table; rows
//! with a missing cell in a column an operation needs are skipped by that
//! operation only.
//!
//! # Loading CSV
//!
//! ```
//! use hypotest_analysis::table::{RecordTable, Value};
//!
//! let csv = "bhk,rent\n1,12000\n2,\n2,NA\n3,31000\n";
//! let table = RecordTable::from_csv_reader(csv.as_bytes()).unwrap();
//! assert_eq!(table.num_rows(), 4);
//! assert_eq!(table.column("rent").unwrap().values()[1], Value::Missing);
//! ```

use std::{cmp::Ordering, fmt, fs::File, io, path::Path};

use crate::AnalysisError;

/// Cell text treated as missing (compared case-insensitively, after trimming).
const MISSING_MARKERS: &[&str] = &["", "na", "n/a", "nan", "null", "none"];

/// A single table cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Missing,
    Number(f64),
    Text(String),
}

impl Value {
    /// Parses CSV cell text: missing markers, then numbers, then text.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim();
        if MISSING_MARKERS
            .iter()
            .any(|m| trimmed.eq_ignore_ascii_case(m))
        {
            return Self::Missing;
        }
        match trimmed.parse::<f64>() {
            Ok(v) if v.is_nan() => Self::Missing,
            Ok(v) => Self::Number(v),
            Err(_) => Self::Text(trimmed.to_owned()),
        }
    }

    #[must_use]
    pub fn is_missing(&self) -> bool {
        match self {
            Self::Missing => true,
            Self::Number(v) => v.is_nan(),
            Self::Text(_) => false,
        }
    }

    /// Category key of a non-missing cell.
    #[must_use]
    pub fn to_key(&self) -> Option<CategoryKey> {
        match self {
            Self::Number(v) if !v.is_nan() => Some(CategoryKey::Number(*v)),
            Self::Text(s) => Some(CategoryKey::Text(s.clone())),
            Self::Number(_) | Self::Missing => None,
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        if value.is_nan() {
            Self::Missing
        } else {
            Self::Number(value)
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Missing, Into::into)
    }
}

/// A non-missing cell used as a group or category label.
///
/// Numbers order before texts; numbers compare with `total_cmp`.
#[derive(Debug, Clone)]
pub enum CategoryKey {
    Number(f64),
    Text(String),
}

impl PartialEq for CategoryKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for CategoryKey {}

impl PartialOrd for CategoryKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CategoryKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a.total_cmp(b),
            (Self::Number(_), Self::Text(_)) => Ordering::Less,
            (Self::Text(_), Self::Number(_)) => Ordering::Greater,
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
        }
    }
}

impl fmt::Display for CategoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(v) => write!(f, "{v}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl serde::Serialize for CategoryKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

/// A named column of cells.
#[derive(Debug, Clone)]
pub struct Column {
    name: String,
    values: Vec<Value>,
}

impl Column {
    #[must_use]
    pub fn new<V>(name: impl Into<String>, values: impl IntoIterator<Item = V>) -> Self
    where
        V: Into<Value>,
    {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Numeric reading of the cell at `row`: `Ok(None)` when missing.
    pub fn number_at(&self, row: usize) -> Result<Option<f64>, AnalysisError> {
        match &self.values[row] {
            Value::Number(v) if !v.is_nan() => Ok(Some(*v)),
            Value::Number(_) | Value::Missing => Ok(None),
            Value::Text(text) => Err(AnalysisError::NonNumericValue {
                column: self.name.clone(),
                row,
                value: text.clone(),
            }),
        }
    }
}

/// Ordered rows over named columns, stored column-wise.
#[derive(Debug, Clone, Default)]
pub struct RecordTable {
    columns: Vec<Column>,
    num_rows: usize,
}

impl RecordTable {
    /// Builds a table from columns of equal length.
    pub fn from_columns(columns: Vec<Column>) -> Result<Self, AnalysisError> {
        let num_rows = columns.first().map_or(0, |c| c.values.len());
        if let Some(column) = columns.iter().find(|c| c.values.len() != num_rows) {
            return Err(AnalysisError::InvalidParameter {
                name: "columns",
                reason: format!(
                    "column '{}' has {} rows, expected {num_rows}",
                    column.name,
                    column.values.len()
                ),
            });
        }
        Ok(Self { columns, num_rows })
    }

    /// Reads a CSV file with a header row.
    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self, AnalysisError> {
        let file = File::open(path.as_ref())?;
        Self::from_csv_reader(io::BufReader::new(file))
    }

    /// Reads CSV data with a header row from any reader.
    pub fn from_csv_reader<R>(reader: R) -> Result<Self, AnalysisError>
    where
        R: io::Read,
    {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::Headers)
            .from_reader(reader);
        let headers = reader.headers()?.clone();
        let mut columns = headers
            .iter()
            .map(|name| Column {
                name: name.to_owned(),
                values: vec![],
            })
            .collect::<Vec<_>>();

        for record in reader.records() {
            let record = record?;
            for (idx, column) in columns.iter_mut().enumerate() {
                column
                    .values
                    .push(record.get(idx).map_or(Value::Missing, Value::parse));
            }
        }

        Self::from_columns(columns)
    }

    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(Column::name)
    }

    /// Looks up a column by name.
    pub fn column(&self, name: &str) -> Result<&Column, AnalysisError> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| AnalysisError::MissingColumn {
                column: name.to_owned(),
            })
    }

    /// Distinct non-missing keys of a column in first-seen order.
    pub fn distinct_keys(&self, name: &str) -> Result<Vec<CategoryKey>, AnalysisError> {
        let mut keys: Vec<CategoryKey> = vec![];
        for key in self.column(name)?.values.iter().filter_map(Value::to_key) {
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cells() {
        assert_eq!(Value::parse(" 12.5 "), Value::Number(12.5));
        assert_eq!(Value::parse("NA"), Value::Missing);
        assert_eq!(Value::parse("nan"), Value::Missing);
        assert_eq!(Value::parse("None"), Value::Missing);
        assert_eq!(Value::parse(""), Value::Missing);
        assert_eq!(Value::parse("Semi-Furnished"), Value::Text("Semi-Furnished".into()));
    }

    #[test]
    fn test_category_key_order() {
        let mut keys = vec![
            CategoryKey::Text("b".into()),
            CategoryKey::Number(3.0),
            CategoryKey::Text("a".into()),
            CategoryKey::Number(1.0),
        ];
        keys.sort();
        let labels = keys.iter().map(ToString::to_string).collect::<Vec<_>>();
        assert_eq!(labels, vec!["1", "3", "a", "b"]);
    }

    #[test]
    fn test_distinct_keys_first_seen_order() {
        let table = RecordTable::from_columns(vec![Column::new(
            "city",
            [Some("Pune"), None, Some("Delhi"), Some("Pune"), Some("Agra")],
        )])
        .unwrap();
        let keys = table.distinct_keys("city").unwrap();
        let labels = keys.iter().map(ToString::to_string).collect::<Vec<_>>();
        assert_eq!(labels, vec!["Pune", "Delhi", "Agra"]);
    }

    #[test]
    fn test_missing_column() {
        let table = RecordTable::default();
        assert!(matches!(
            table.column("rent"),
            Err(AnalysisError::MissingColumn { column }) if column == "rent"
        ));
    }

    #[test]
    fn test_ragged_columns_rejected() {
        let result = RecordTable::from_columns(vec![
            Column::new("a", [1.0, 2.0]),
            Column::new("b", [1.0]),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_non_numeric_value() {
        let column = Column::new("rent", [Value::Number(1.0), Value::from("lots")]);
        assert_eq!(column.number_at(0).unwrap(), Some(1.0));
        assert!(matches!(
            column.number_at(1),
            Err(AnalysisError::NonNumericValue { row: 1, .. })
        ));
    }

    #[test]
    fn test_csv_numbers() {
        let csv = "a,b\n1,2\n3,4\n";
        let table = RecordTable::from_csv_reader(csv.as_bytes()).unwrap();
        assert_eq!(table.num_rows(), 2);
        assert_eq!(table.column_names().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(table.column("b").unwrap().values()[1], Value::Number(4.0));
    }
}
