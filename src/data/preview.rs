use super::model::Dataset;

pub const DEFAULT_ROW_LIMIT: usize = 50;
pub const DEFAULT_CELL_CHAR_LIMIT: usize = 50;

/// Token shown for an absent cell.
pub const MISSING_TOKEN: &str = "NA";

/// A bounded, stringified view of the first rows of a dataset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreviewGrid {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Row count of the dataset the grid was taken from.
    pub total_rows: usize,
}

/// First `row_limit` rows, every column, each cell cut to `cell_char_limit`
/// characters.
pub fn preview(ds: &Dataset, row_limit: usize, cell_char_limit: usize) -> PreviewGrid {
    let headers = ds.columns().iter().map(|c| c.name().to_string()).collect();

    let rows = (0..ds.row_count().min(row_limit))
        .map(|row| {
            ds.columns()
                .iter()
                .map(|col| match col.cell_text(row) {
                    Some(text) => truncate_chars(&text, cell_char_limit),
                    None => MISSING_TOKEN.to_string(),
                })
                .collect()
        })
        .collect();

    PreviewGrid {
        headers,
        rows,
        total_rows: ds.row_count(),
    }
}

fn truncate_chars(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text.to_string(),
    }
}
