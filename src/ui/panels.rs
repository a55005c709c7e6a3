use std::path::PathBuf;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::app::{FilterInput, Status, Tab, UiState};
use crate::data::filter::{Bound, FilterError, FilterSpec};
use crate::state::{LoadedSession, Session, SessionEvent};
use crate::ui::table;

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu, selected file and status line.
pub fn top_bar(ui: &mut Ui, state: &UiState, events: &mut Vec<SessionEvent>) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                if let Some(path) = open_file_dialog() {
                    events.push(SessionEvent::LoadRequested(path));
                }
                ui.close_menu();
            }
        });

        ui.separator();

        if state.selected_file.is_empty() {
            ui.label("No file selected");
        } else {
            ui.label(format!("Selected file: {}", state.selected_file));
        }
    });

    match &state.status {
        Some(Status::Info(msg)) => {
            ui.label(msg);
        }
        Some(Status::Error(msg)) => {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
        None => {
            ui.label("CSV Data Explorer");
        }
    }
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Open dataset")
        .add_filter("Supported files", &["csv", "tsv", "xls", "xlsx"])
        .add_filter("CSV", &["csv"])
        .add_filter("Excel", &["xls", "xlsx"])
        .add_filter("All files", &["*"])
        .pick_file()
}

// ---------------------------------------------------------------------------
// Central panel – tabs
// ---------------------------------------------------------------------------

pub fn central_tabs(
    ui: &mut Ui,
    session: &Session,
    state: &mut UiState,
    events: &mut Vec<SessionEvent>,
) {
    ui.horizontal(|ui: &mut Ui| {
        ui.selectable_value(&mut state.tab, Tab::DataTable, "Data Table");
        ui.selectable_value(&mut state.tab, Tab::Summary, "Summary");
        ui.selectable_value(&mut state.tab, Tab::Filters, "Filters");
    });
    ui.separator();

    let Some(loaded) = session.loaded() else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a file to explore it  (File → Open…)");
        });
        return;
    };

    match state.tab {
        Tab::DataTable => {
            ui.label(format!(
                "Preview (first {} of {} rows):",
                loaded.views.preview.rows.len(),
                loaded.views.preview.total_rows
            ));
            table::preview_table(ui, &loaded.views.preview);
        }
        Tab::Summary => {
            ui.label("Numeric Column Statistics:");
            table::summary_table(ui, &loaded.views.summary);
        }
        Tab::Filters => filters_tab(ui, loaded, state, events),
    }
}

// ---------------------------------------------------------------------------
// Filters tab
// ---------------------------------------------------------------------------

fn filters_tab(
    ui: &mut Ui,
    loaded: &LoadedSession,
    state: &mut UiState,
    events: &mut Vec<SessionEvent>,
) {
    ui.label("Range Filters (leave blank to ignore):");
    ui.add_space(4.0);

    if state.filter_inputs.is_empty() {
        ui.label("No numeric columns to filter.");
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, true])
        .max_height(ui.available_height() - 40.0)
        .show(ui, |ui: &mut Ui| {
            egui::Grid::new("filter_grid")
                .num_columns(4)
                .spacing([8.0, 4.0])
                .show(ui, |ui: &mut Ui| {
                    for (col, input) in state.filter_inputs.iter_mut() {
                        ui.label(format!("{col}:"));
                        ui.add(
                            egui::TextEdit::singleline(&mut input.min)
                                .hint_text("Min")
                                .desired_width(100.0),
                        );
                        ui.add(
                            egui::TextEdit::singleline(&mut input.max)
                                .hint_text("Max")
                                .desired_width(100.0),
                        );
                        if loaded.filter.get(col).is_some() {
                            ui.label(RichText::new("active").weak());
                        } else {
                            ui.label("");
                        }
                        ui.end_row();
                    }
                });
        });

    ui.horizontal(|ui: &mut Ui| {
        if ui.button("Apply Filters").clicked() {
            match build_filter_spec(state.filter_inputs.iter()) {
                Ok(spec) => events.push(SessionEvent::FilterChanged(spec)),
                Err(e) => {
                    log::warn!("Rejected filter input: {e}");
                    state.status = Some(Status::Error(format!("Invalid filter: {e}")));
                }
            }
        }
        if ui.button("Clear").clicked() {
            for input in state.filter_inputs.values_mut() {
                *input = FilterInput::default();
            }
            events.push(SessionEvent::FilterChanged(FilterSpec::new()));
        }
    });
}

/// Parse every Min/Max pair; the first unparsable value rejects the lot.
pub fn build_filter_spec<'a>(
    mut inputs: impl Iterator<Item = (&'a String, &'a FilterInput)>,
) -> Result<FilterSpec, FilterError> {
    inputs.try_fold(FilterSpec::new(), |spec, (col, input)| {
        Ok(spec.with_bound(col.clone(), Bound::parse(col, &input.min, &input.max)?))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn inputs(pairs: &[(&str, &str, &str)]) -> BTreeMap<String, FilterInput> {
        pairs
            .iter()
            .map(|(c, min, max)| {
                (
                    c.to_string(),
                    FilterInput {
                        min: min.to_string(),
                        max: max.to_string(),
                    },
                )
            })
            .collect()
    }

    #[test]
    fn blank_inputs_give_empty_spec() {
        let map = inputs(&[("a", "", ""), ("b", " ", "")]);
        assert!(build_filter_spec(map.iter()).unwrap().is_empty());
    }

    #[test]
    fn parses_bounds_per_column() {
        let map = inputs(&[("a", "1", ""), ("b", "", "2.5")]);
        let spec = build_filter_spec(map.iter()).unwrap();
        assert_eq!(spec.get("a"), Some(&Bound::new(Some(1.0), None)));
        assert_eq!(spec.get("b"), Some(&Bound::new(None, Some(2.5))));
    }

    #[test]
    fn one_bad_value_rejects_everything() {
        let map = inputs(&[("a", "1", ""), ("b", "ten", "")]);
        let err = build_filter_spec(map.iter()).unwrap_err();
        assert!(matches!(err, FilterError::NotNumeric { .. }));
    }
}
