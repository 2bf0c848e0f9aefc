//! Partitioning a numeric column by a categorical column

use crate::{
    AnalysisError,
    table::{CategoryKey, RecordTable},
};

/// Non-missing numeric values of one group.
#[derive(Debug, Clone)]
pub struct GroupSample {
    pub key: CategoryKey,
    pub values: Vec<f64>,
}

/// Per-group samples of a value column, in first-seen group order.
///
/// Every distinct non-missing group key is present, even when all of its
/// values are missing (its sample is then empty).
#[derive(Debug, Clone)]
pub struct GroupedSamples {
    pub group_column: String,
    pub value_column: String,
    pub groups: Vec<GroupSample>,
}

impl GroupedSamples {
    /// Splits `value_column` by the keys of `group_column`.
    ///
    /// A non-missing, non-numeric cell in `value_column` among rows with a group
    /// key is an error.
    pub fn from_table(
        table: &RecordTable,
        group_column: &str,
        value_column: &str,
    ) -> Result<Self, AnalysisError> {
        Self::from_table_filtered(table, group_column, value_column, |_| true)
    }

    /// Like [`Self::from_table`], keeping only group keys accepted by `keep`.
    pub fn from_table_filtered<F>(
        table: &RecordTable,
        group_column: &str,
        value_column: &str,
        mut keep: F,
    ) -> Result<Self, AnalysisError>
    where
        F: FnMut(&CategoryKey) -> bool,
    {
        let group_col = table.column(group_column)?;
        let value_col = table.column(value_column)?;

        let mut groups: Vec<GroupSample> = vec![];
        for (row, cell) in group_col.values().iter().enumerate() {
            let Some(key) = cell.to_key() else {
                continue;
            };
            if !keep(&key) {
                continue;
            }
            let value = value_col.number_at(row)?;
            let idx = match groups.iter().position(|g| g.key == key) {
                Some(idx) => idx,
                None => {
                    groups.push(GroupSample {
                        key,
                        values: vec![],
                    });
                    groups.len() - 1
                }
            };
            groups[idx].values.extend(value);
        }

        Ok(Self {
            group_column: group_column.to_owned(),
            value_column: value_column.to_owned(),
            groups,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &GroupSample> {
        self.groups.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
