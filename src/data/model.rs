use std::collections::BTreeSet;
use std::fmt;

use thiserror::Error;

// ---------------------------------------------------------------------------
// ColumnKind – numeric or categorical, inferred at load time
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    Numeric,
    Categorical,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKind::Numeric => write!(f, "numeric"),
            ColumnKind::Categorical => write!(f, "categorical"),
        }
    }
}

// ---------------------------------------------------------------------------
// ColumnData – typed cell storage, `None` marks an absent cell
// ---------------------------------------------------------------------------

/// Cell storage for one column.  Integer and float columns are both
/// [`ColumnKind::Numeric`]; they are kept apart so integers display without a
/// decimal point.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Integer(Vec<Option<i64>>),
    Float(Vec<Option<f64>>),
    Text(Vec<Option<String>>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Integer(v) => v.len(),
            ColumnData::Float(v) => v.len(),
            ColumnData::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn kind(&self) -> ColumnKind {
        match self {
            ColumnData::Integer(_) | ColumnData::Float(_) => ColumnKind::Numeric,
            ColumnData::Text(_) => ColumnKind::Categorical,
        }
    }

    fn is_missing(&self, row: usize) -> bool {
        match self {
            ColumnData::Integer(v) => v[row].is_none(),
            ColumnData::Float(v) => v[row].is_none(),
            ColumnData::Text(v) => v[row].is_none(),
        }
    }

    /// Gather the given rows (in the given order) into new storage.
    fn take(&self, rows: &[usize]) -> ColumnData {
        match self {
            ColumnData::Integer(v) => ColumnData::Integer(rows.iter().map(|&r| v[r]).collect()),
            ColumnData::Float(v) => ColumnData::Float(rows.iter().map(|&r| v[r]).collect()),
            ColumnData::Text(v) => {
                ColumnData::Text(rows.iter().map(|&r| v[r].clone()).collect())
            }
        }
    }
}

/// Render a float the way a dataframe would: integral values keep one decimal.
pub fn format_float(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e16 {
        format!("{v:.1}")
    } else {
        format!("{v}")
    }
}

// ---------------------------------------------------------------------------
// Column – a named, typed sequence of cells
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    data: ColumnData,
}

impl Column {
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ColumnKind {
        self.data.kind()
    }

    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Value at `row` as `f64`, or `None` when absent or the column is categorical.
    pub fn numeric_value(&self, row: usize) -> Option<f64> {
        match &self.data {
            ColumnData::Integer(v) => v[row].map(|i| i as f64),
            ColumnData::Float(v) => v[row],
            ColumnData::Text(_) => None,
        }
    }

    /// All present values of a numeric column, in row order.
    pub fn present_values(&self) -> Vec<f64> {
        (0..self.len())
            .filter_map(|row| self.numeric_value(row))
            .collect()
    }

    /// Display text of the cell at `row`; `None` when absent.
    pub fn cell_text(&self, row: usize) -> Option<String> {
        match &self.data {
            ColumnData::Integer(v) => v[row].map(|i| i.to_string()),
            ColumnData::Float(v) => v[row].map(format_float),
            ColumnData::Text(v) => v[row].clone(),
        }
    }

    pub fn missing_count(&self) -> usize {
        (0..self.len()).filter(|&row| self.data.is_missing(row)).count()
    }
}

// ---------------------------------------------------------------------------
// Dataset – immutable columnar table
// ---------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DatasetError {
    #[error("column '{column}' has {found} rows, expected {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("duplicate column name '{0}'")]
    DuplicateColumn(String),
}

/// An ordered set of equal-length, uniquely named columns.
///
/// There is no way to mutate a `Dataset` after construction; filtering goes
/// through [`Dataset::take_rows`], which builds a new value.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    columns: Vec<Column>,
    row_count: usize,
}

impl Dataset {
    /// Build a dataset, checking that names are unique and lengths agree.
    pub fn new(columns: Vec<Column>) -> Result<Self, DatasetError> {
        let mut seen = BTreeSet::new();
        for col in &columns {
            if !seen.insert(col.name()) {
                return Err(DatasetError::DuplicateColumn(col.name().to_string()));
            }
        }

        let row_count = columns.first().map(Column::len).unwrap_or(0);
        if let Some(bad) = columns.iter().find(|c| c.len() != row_count) {
            return Err(DatasetError::LengthMismatch {
                column: bad.name().to_string(),
                expected: row_count,
                found: bad.len(),
            });
        }

        Ok(Self { columns, row_count })
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    /// The column called `name`, only if it is numeric.
    pub fn numeric_column(&self, name: &str) -> Option<&Column> {
        self.column(name).filter(|c| c.kind() == ColumnKind::Numeric)
    }

    pub fn numeric_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns
            .iter()
            .filter(|c| c.kind() == ColumnKind::Numeric)
    }

    pub fn numeric_column_names(&self) -> Vec<String> {
        self.numeric_columns().map(|c| c.name().to_string()).collect()
    }

    /// A new dataset holding only `rows` (indices into `self`), same columns.
    pub fn take_rows(&self, rows: &[usize]) -> Dataset {
        let columns = self
            .columns
            .iter()
            .map(|c| Column::new(c.name(), c.data().take(rows)))
            .collect();
        Dataset {
            columns,
            row_count: rows.len(),
        }
    }
}
