use super::model::{format_float, Column, Dataset};

/// Descriptive statistics for one numeric column.
///
/// `None` marks a statistic that is undefined for the column (no present
/// values, or fewer than two for the standard deviation).  Values are rounded
/// to three decimals.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub column: String,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub std: Option<f64>,
    pub missing: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

pub const SUMMARY_HEADERS: [&str; 7] = ["Column", "Mean", "Median", "Std", "Missing", "Min", "Max"];

impl SummaryRow {
    /// Cells in [`SUMMARY_HEADERS`] order, with `undefined` for missing statistics.
    pub fn display_cells(&self) -> Vec<String> {
        let stat = |v: Option<f64>| v.map_or_else(|| "undefined".to_string(), format_float);
        vec![
            self.column.clone(),
            stat(self.mean),
            stat(self.median),
            stat(self.std),
            self.missing.to_string(),
            stat(self.min),
            stat(self.max),
        ]
    }
}

pub fn round3(v: f64) -> f64 {
    (v * 1000.0).round() / 1000.0
}

/// One [`SummaryRow`] per numeric column, in column order.
pub fn summarize(ds: &Dataset) -> Vec<SummaryRow> {
    ds.numeric_columns().map(summarize_column).collect()
}

fn summarize_column(col: &Column) -> SummaryRow {
    let mut values = col.present_values();
    values.sort_by(f64::total_cmp);

    let n = values.len();
    let mean = (n > 0).then(|| values.iter().sum::<f64>() / n as f64);
    let median = (n > 0).then(|| {
        if n % 2 == 1 {
            values[n / 2]
        } else {
            (values[n / 2 - 1] + values[n / 2]) / 2.0
        }
    });
    let std = mean.filter(|_| n >= 2).map(|m| {
        let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
        (ss / (n - 1) as f64).sqrt()
    });

    SummaryRow {
        column: col.name().to_string(),
        mean: mean.map(round3),
        median: median.map(round3),
        std: std.map(round3),
        missing: col.missing_count(),
        min: values.first().copied().map(round3),
        max: values.last().copied().map(round3),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::ColumnData;

    #[test]
    fn basic_statistics_skip_missing() {
        let ds = Dataset::new(vec![Column::new(
            "a",
            ColumnData::Integer(vec![Some(1), Some(2), Some(3), None]),
        )])
        .unwrap();

        let rows = summarize(&ds);
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.column, "a");
        assert_eq!(row.mean, Some(2.0));
        assert_eq!(row.median, Some(2.0));
        assert_eq!(row.std, Some(1.0));
        assert_eq!(row.missing, 1);
        assert_eq!(row.min, Some(1.0));
        assert_eq!(row.max, Some(3.0));
        assert_eq!(
            row.display_cells(),
            vec!["a", "2.0", "2.0", "1.0", "1", "1.0", "3.0"]
        );
    }

    #[test]
    fn all_missing_is_undefined() {
        let ds = Dataset::new(vec![Column::new(
            "empty",
            ColumnData::Float(vec![None, None]),
        )])
        .unwrap();

        let row = &summarize(&ds)[0];
        assert_eq!(row.mean, None);
        assert_eq!(row.median, None);
        assert_eq!(row.std, None);
        assert_eq!(row.min, None);
        assert_eq!(row.max, None);
        assert_eq!(row.missing, 2);
        assert_eq!(row.display_cells()[1], "undefined");
        assert_eq!(row.display_cells()[4], "2");
    }

    #[test]
    fn single_value_has_no_std() {
        let ds = Dataset::new(vec![Column::new(
            "one",
            ColumnData::Float(vec![Some(4.25), None]),
        )])
        .unwrap();

        let row = &summarize(&ds)[0];
        assert_eq!(row.mean, Some(4.25));
        assert_eq!(row.std, None);
    }

    #[test]
    fn even_median_and_rounding() {
        let ds = Dataset::new(vec![Column::new(
            "v",
            ColumnData::Float(
                [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]
                    .into_iter()
                    .map(Some)
                    .collect(),
            ),
        )])
        .unwrap();

        let row = &summarize(&ds)[0];
        assert_eq!(row.median, Some(4.5));
        assert_eq!(row.mean, Some(5.0));
        // sqrt(32 / 7) = 2.13809...
        assert_eq!(row.std, Some(2.138));
    }

    #[test]
    fn only_numeric_columns_in_order() {
        let ds = Dataset::new(vec![
            Column::new("z", ColumnData::Float(vec![Some(1.0)])),
            Column::new("t", ColumnData::Text(vec![Some("x".into())])),
            Column::new("a", ColumnData::Integer(vec![Some(2)])),
        ])
        .unwrap();

        let names: Vec<_> = summarize(&ds).into_iter().map(|r| r.column).collect();
        assert_eq!(names, vec!["z", "a"]);
    }
}
