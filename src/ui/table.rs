use eframe::egui::{self, Ui};
use egui_extras::{Column as TableColumn, TableBuilder};

use crate::data::preview::PreviewGrid;
use crate::data::summary::{SummaryRow, SUMMARY_HEADERS};

// ---------------------------------------------------------------------------
// Data table and summary grids
// ---------------------------------------------------------------------------

pub fn preview_table(ui: &mut Ui, grid: &PreviewGrid) {
    if grid.headers.is_empty() {
        ui.label("Dataset has no columns.");
        return;
    }
    let rows: Vec<&[String]> = grid.rows.iter().map(Vec::as_slice).collect();
    string_table(ui, "preview_table", &grid.headers, &rows);
}

pub fn summary_table(ui: &mut Ui, summary: &[SummaryRow]) {
    if summary.is_empty() {
        ui.label("No numeric columns.");
        return;
    }
    let headers: Vec<String> = SUMMARY_HEADERS.iter().map(|h| h.to_string()).collect();
    let cells: Vec<Vec<String>> = summary.iter().map(SummaryRow::display_cells).collect();
    let rows: Vec<&[String]> = cells.iter().map(Vec::as_slice).collect();
    string_table(ui, "summary_table", &headers, &rows);
}

fn string_table(ui: &mut Ui, id: &str, headers: &[String], rows: &[&[String]]) {
    let text_height = egui::TextStyle::Body.resolve(ui.style()).size * 1.5;

    ui.push_id(id, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .vscroll(true)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .columns(
                TableColumn::initial(110.0).at_least(40.0).clip(true),
                headers.len(),
            )
            .header(20.0, |mut header| {
                for h in headers {
                    header.col(|ui| {
                        ui.strong(h);
                    });
                }
            })
            .body(|body| {
                body.rows(text_height, rows.len(), |mut row| {
                    let cells = rows[row.index()];
                    for cell in cells {
                        row.col(|ui| {
                            ui.label(cell);
                        });
                    }
                });
            });
    });
}
