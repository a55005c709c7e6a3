//! Declarative plot specifications derived from a dataset.
//!
//! Each builder returns `None` when the plot cannot be drawn from the inputs
//! (column unset, not numeric, too few columns).  That is a normal outcome,
//! the UI shows a notice in place of the chart.

use super::model::{Column, Dataset};

pub const DEFAULT_BIN_COUNT: usize = 30;

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct HistogramSpec {
    pub column: String,
    /// Present values in row order.
    pub values: Vec<f64>,
    pub bin_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

impl HistogramSpec {
    /// Equal-width bins over `[min, max]`; the last bin is closed on the right.
    /// A column whose values are all equal gets a single unit-width bin.
    /// Non-finite values are not binned.
    pub fn bins(&self) -> Vec<HistogramBin> {
        let finite: Vec<f64> = self.values.iter().copied().filter(|v| v.is_finite()).collect();
        let Some(min) = finite.iter().copied().reduce(f64::min) else {
            return Vec::new();
        };
        let max = finite.iter().copied().fold(min, f64::max);

        if max == min {
            return vec![HistogramBin {
                start: min - 0.5,
                end: min + 0.5,
                count: finite.len(),
            }];
        }

        let n = self.bin_count.max(1);
        let width = (max - min) / n as f64;
        let mut counts = vec![0usize; n];
        for &v in &finite {
            let idx = (((v - min) / width) as usize).min(n - 1);
            counts[idx] += 1;
        }

        counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| HistogramBin {
                start: min + i as f64 * width,
                end: min + (i + 1) as f64 * width,
                count,
            })
            .collect()
    }
}

pub fn histogram_spec(ds: &Dataset, column: Option<&str>, bin_count: usize) -> Option<HistogramSpec> {
    let col = ds.numeric_column(column?)?;
    Some(HistogramSpec {
        column: col.name().to_string(),
        values: col.present_values(),
        bin_count,
    })
}

// ---------------------------------------------------------------------------
// Scatter + ordinary least squares trend line
// ---------------------------------------------------------------------------

/// `y = slope * x + intercept`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendLine {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
}

impl TrendLine {
    pub fn at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterSpec {
    pub x_column: String,
    pub y_column: String,
    /// Rows where both values are present, in row order.
    pub points: Vec<(f64, f64)>,
    /// `None` with fewer than two points or when every x is equal.
    pub fit: Option<TrendLine>,
}

impl ScatterSpec {
    /// Whether there are enough points to be worth drawing.
    pub fn is_renderable(&self) -> bool {
        self.points.len() >= 2
    }

    /// The fitted line's end points across the x range of the data.
    pub fn fit_segment(&self) -> Option<[(f64, f64); 2]> {
        let fit = self.fit?;
        let lo = self.points.iter().map(|p| p.0).reduce(f64::min)?;
        let hi = self.points.iter().map(|p| p.0).reduce(f64::max)?;
        Some([(lo, fit.at(lo)), (hi, fit.at(hi))])
    }
}

pub fn scatter_spec(ds: &Dataset, x_column: Option<&str>, y_column: Option<&str>) -> Option<ScatterSpec> {
    let x = ds.numeric_column(x_column?)?;
    let y = ds.numeric_column(y_column?)?;

    let points = complete_pairs(x, y);
    let fit = ordinary_least_squares(&points);
    Some(ScatterSpec {
        x_column: x.name().to_string(),
        y_column: y.name().to_string(),
        points,
        fit,
    })
}

fn complete_pairs(x: &Column, y: &Column) -> Vec<(f64, f64)> {
    (0..x.len())
        .filter_map(|row| Some((x.numeric_value(row)?, y.numeric_value(row)?)))
        .collect()
}

pub fn ordinary_least_squares(points: &[(f64, f64)]) -> Option<TrendLine> {
    if points.len() < 2 {
        return None;
    }
    let n = points.len() as f64;
    let mean_x = points.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = points.iter().map(|p| p.1).sum::<f64>() / n;

    let (mut sxx, mut sxy, mut syy) = (0.0, 0.0, 0.0);
    for &(x, y) in points {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxx += dx * dx;
        sxy += dx * dy;
        syy += dy * dy;
    }
    if sxx == 0.0 {
        return None;
    }

    let slope = sxy / sxx;
    let r_squared = if syy == 0.0 { 1.0 } else { (sxy * sxy) / (sxx * syy) };
    Some(TrendLine {
        slope,
        intercept: mean_y - slope * mean_x,
        r_squared,
    })
}

// ---------------------------------------------------------------------------
// Correlation matrix
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationSpec {
    pub column_names: Vec<String>,
    /// `matrix[i][j]` is Pearson's r between columns i and j, `None` when
    /// undefined for that pair.
    pub matrix: Vec<Vec<Option<f64>>>,
}

/// Pairwise Pearson correlation over every numeric column; `None` when there
/// are fewer than two numeric columns.
pub fn correlation_spec(ds: &Dataset) -> Option<CorrelationSpec> {
    let cols: Vec<&Column> = ds.numeric_columns().collect();
    if cols.len() < 2 {
        return None;
    }

    let n = cols.len();
    let mut matrix = vec![vec![None; n]; n];
    for i in 0..n {
        for j in i..n {
            let r = pearson(&complete_pairs(cols[i], cols[j]));
            matrix[i][j] = r;
            matrix[j][i] = r;
        }
    }

    Some(CorrelationSpec {
        column_names: cols.iter().map(|c| c.name().to_string()).collect(),
        matrix,
    })
}

/// Undefined below two pairs or when either side has zero variance.
pub fn pearson(pairs: &[(f64, f64)]) -> Option<f64> {
    if pairs.len() < 2 {
        return None;
    }
    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for &(x, y) in pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some((cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0))
}
