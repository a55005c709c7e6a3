use std::collections::BTreeMap;

use thiserror::Error;

use super::model::{ColumnKind, Dataset};

#[derive(Debug, Error, PartialEq)]
pub enum FilterError {
    #[error("{column}: '{input}' is not a number")]
    NotNumeric { column: String, input: String },

    #[error("{column}: min {min} is greater than max {max}")]
    InvertedBound { column: String, min: f64, max: f64 },

    #[error("no column named '{0}'")]
    UnknownColumn(String),

    #[error("column '{0}' is not numeric")]
    NotNumericColumn(String),
}

// ---------------------------------------------------------------------------
// Bound – an optional closed interval on one column
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bound {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl Bound {
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }

    /// Parse the text of a min/max input pair.  Blank means unbounded.
    pub fn parse(column: &str, min_text: &str, max_text: &str) -> Result<Self, FilterError> {
        let parse_one = |text: &str| -> Result<Option<f64>, FilterError> {
            let text = text.trim();
            if text.is_empty() {
                return Ok(None);
            }
            match text.parse::<f64>() {
                Ok(v) if !v.is_nan() => Ok(Some(v)),
                _ => Err(FilterError::NotNumeric {
                    column: column.to_string(),
                    input: text.to_string(),
                }),
            }
        };
        Ok(Self::new(parse_one(min_text)?, parse_one(max_text)?))
    }

    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// Whether a cell value satisfies this bound.  An absent value fails any
    /// active side.
    pub fn admits(&self, value: Option<f64>) -> bool {
        if self.is_unbounded() {
            return true;
        }
        let Some(v) = value else {
            return false;
        };
        self.min.map_or(true, |min| v >= min) && self.max.map_or(true, |max| v <= max)
    }
}

// ---------------------------------------------------------------------------
// FilterSpec – per-column bounds
// ---------------------------------------------------------------------------

/// Column name → bound.  Unbounded entries are never stored, so an empty
/// spec means "no constraint".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSpec {
    bounds: BTreeMap<String, Bound>,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bound(mut self, column: impl Into<String>, bound: Bound) -> Self {
        self.set(column, bound);
        self
    }

    pub fn set(&mut self, column: impl Into<String>, bound: Bound) {
        let column = column.into();
        if bound.is_unbounded() {
            self.bounds.remove(&column);
        } else {
            self.bounds.insert(column, bound);
        }
    }

    pub fn get(&self, column: &str) -> Option<&Bound> {
        self.bounds.get(column)
    }

    pub fn bounds(&self) -> impl Iterator<Item = (&str, &Bound)> {
        self.bounds.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.bounds.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bounds.len()
    }

    /// Check every key names a numeric column of `ds` and no bound is inverted.
    pub fn validate(&self, ds: &Dataset) -> Result<(), FilterError> {
        for (column, bound) in &self.bounds {
            let col = ds
                .column(column)
                .ok_or_else(|| FilterError::UnknownColumn(column.clone()))?;
            if col.kind() != ColumnKind::Numeric {
                return Err(FilterError::NotNumericColumn(column.clone()));
            }
            if let (Some(min), Some(max)) = (bound.min, bound.max) {
                if min > max {
                    return Err(FilterError::InvertedBound {
                        column: column.clone(),
                        min,
                        max,
                    });
                }
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Filter application
// ---------------------------------------------------------------------------

/// Indices of rows of `raw` that satisfy every bound in `spec`.
///
/// A bound on a column `raw` lacks, or on a categorical column, sees only
/// absent values and so rejects every row.
pub fn retained_rows(raw: &Dataset, spec: &FilterSpec) -> Vec<usize> {
    let constraints: Vec<_> = spec
        .bounds()
        .map(|(name, bound)| (raw.numeric_column(name), bound))
        .collect();

    (0..raw.row_count())
        .filter(|&row| {
            constraints.iter().all(|(col, bound)| {
                bound.admits(col.and_then(|c| c.numeric_value(row)))
            })
        })
        .collect()
}

/// Apply `spec` to `raw`, producing the working dataset.
pub fn apply(raw: &Dataset, spec: &FilterSpec) -> Dataset {
    if spec.is_empty() {
        return raw.clone();
    }
    raw.take_rows(&retained_rows(raw, spec))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Column, ColumnData};

    fn sample() -> Dataset {
        Dataset::new(vec![
            Column::new(
                "a",
                ColumnData::Integer(vec![Some(1), Some(5), None, Some(3), Some(9)]),
            ),
            Column::new(
                "b",
                ColumnData::Float(vec![Some(0.1), Some(0.2), Some(0.3), None, Some(0.5)]),
            ),
            Column::new(
                "c",
                ColumnData::Text(vec![
                    Some("p".into()),
                    Some("q".into()),
                    Some("r".into()),
                    Some("s".into()),
                    Some("t".into()),
                ]),
            ),
        ])
        .unwrap()
    }

    #[test]
    fn empty_spec_is_identity() {
        let ds = sample();
        assert_eq!(apply(&ds, &FilterSpec::new()), ds);
    }

    #[test]
    fn keeps_rows_in_order_and_all_columns() {
        let ds = sample();
        let spec = FilterSpec::new().with_bound("a", Bound::new(Some(2.0), None));
        let out = apply(&ds, &spec);
        assert_eq!(out.row_count(), 3);
        assert_eq!(out.column_count(), 3);
        assert_eq!(out.column("a").unwrap().present_values(), vec![5.0, 3.0, 9.0]);
        assert_eq!(out.column("c").unwrap().cell_text(0).as_deref(), Some("q"));
    }

    #[test]
    fn missing_fails_active_bound() {
        let ds = sample();
        let spec = FilterSpec::new().with_bound("b", Bound::new(None, Some(10.0)));
        let out = apply(&ds, &spec);
        assert_eq!(out.row_count(), 4);
        assert_eq!(out.column("b").unwrap().missing_count(), 0);
    }

    #[test]
    fn bounds_are_inclusive() {
        let ds = sample();
        let spec = FilterSpec::new().with_bound("a", Bound::new(Some(3.0), Some(5.0)));
        assert_eq!(retained_rows(&ds, &spec), vec![1, 3]);
    }

    #[test]
    fn reapplying_is_stable() {
        let ds = sample();
        let spec = FilterSpec::new()
            .with_bound("a", Bound::new(Some(2.0), None))
            .with_bound("b", Bound::new(None, Some(0.4)));
        let once = apply(&ds, &spec);
        assert_eq!(apply(&once, &spec), once);
    }

    #[test]
    fn tightening_never_adds_rows() {
        let ds = sample();
        let mut previous = ds.row_count();
        for min in [0.0, 2.0, 4.0, 6.0, 10.0] {
            let spec = FilterSpec::new().with_bound("a", Bound::new(Some(min), None));
            let n = apply(&ds, &spec).row_count();
            assert!(n <= previous, "min={min}: {n} > {previous}");
            previous = n;
        }
        assert_eq!(previous, 0);
    }

    #[test]
    fn unbounded_entries_are_dropped() {
        let spec = FilterSpec::new().with_bound("a", Bound::default());
        assert!(spec.is_empty());
    }

    #[test]
    fn parse_blank_and_numbers() {
        assert_eq!(Bound::parse("a", " ", "").unwrap(), Bound::default());
        assert_eq!(
            Bound::parse("a", "1.5", "-2").unwrap(),
            Bound::new(Some(1.5), Some(-2.0))
        );
    }

    #[test]
    fn parse_rejects_text() {
        let err = Bound::parse("a", "abc", "").unwrap_err();
        assert_eq!(
            err,
            FilterError::NotNumeric {
                column: "a".into(),
                input: "abc".into()
            }
        );
        assert!(Bound::parse("a", "", "NaN").is_err());
    }

    #[test]
    fn validate_catches_bad_specs() {
        let ds = sample();
        let inverted = FilterSpec::new().with_bound("a", Bound::new(Some(5.0), Some(1.0)));
        assert!(matches!(
            inverted.validate(&ds),
            Err(FilterError::InvertedBound { .. })
        ));

        let unknown = FilterSpec::new().with_bound("zz", Bound::new(Some(0.0), None));
        assert_eq!(
            unknown.validate(&ds),
            Err(FilterError::UnknownColumn("zz".into()))
        );

        let text = FilterSpec::new().with_bound("c", Bound::new(Some(0.0), None));
        assert_eq!(
            text.validate(&ds),
            Err(FilterError::NotNumericColumn("c".into()))
        );

        let ok = FilterSpec::new().with_bound("b", Bound::new(Some(0.2), Some(0.2)));
        assert!(ok.validate(&ds).is_ok());
    }
}
