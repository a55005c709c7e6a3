use std::collections::BTreeMap;

use eframe::egui;

use crate::color::DivergingScale;
use crate::config::ViewerConfig;
use crate::state::{Session, SessionEvent};
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// UI-only state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    DataTable,
    Summary,
    Filters,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    Info(String),
    Error(String),
}

/// Raw text of one column's Min/Max inputs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterInput {
    pub min: String,
    pub max: String,
}

/// Widget state that never reaches the session.
#[derive(Debug, Default)]
pub struct UiState {
    pub tab: Tab,
    pub selected_file: String,
    pub status: Option<Status>,
    pub filter_inputs: BTreeMap<String, FilterInput>,
    pub heatmap_scale: DivergingScale,
}

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct CsvLensApp {
    pub session: Session,
    pub ui: UiState,
}

impl CsvLensApp {
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            session: Session::new(config),
            ui: UiState::default(),
        }
    }

    /// Hand one event to the session and reflect the outcome in the status line.
    pub fn dispatch(&mut self, event: SessionEvent) {
        let is_load = matches!(event, SessionEvent::LoadRequested(_));
        let is_filter = matches!(event, SessionEvent::FilterChanged(_));

        if let SessionEvent::LoadRequested(path) = &event {
            self.ui.selected_file = path.display().to_string();
        }

        if let Err(e) = self.session.handle(event) {
            self.ui.status = Some(Status::Error(e.to_string()));
            return;
        }

        let Some(loaded) = self.session.loaded() else {
            return;
        };
        if is_load {
            self.ui.filter_inputs = loaded
                .raw
                .numeric_column_names()
                .into_iter()
                .map(|name| (name, FilterInput::default()))
                .collect();
            self.ui.status = Some(Status::Info(format!(
                "Loaded: {} | Rows: {}, Columns: {}",
                loaded.source.display(),
                loaded.raw.row_count(),
                loaded.raw.column_count()
            )));
        } else if is_filter {
            self.ui.status = Some(Status::Info(format!(
                "Filtered: {} of {} rows",
                loaded.working.row_count(),
                loaded.raw.row_count()
            )));
        }
    }
}

impl eframe::App for CsvLensApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut events = Vec::new();

        // ---- Top panel: menu bar and status ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &self.ui, &mut events);
        });

        // ---- Right side panel: plots ----
        egui::SidePanel::right("plot_panel")
            .default_width(520.0)
            .resizable(true)
            .show(ctx, |ui| {
                plot::plot_panel(ui, &self.session, &self.ui.heatmap_scale, &mut events);
            });

        // ---- Central panel: table / summary / filters ----
        egui::CentralPanel::default().show(ctx, |ui| {
            panels::central_tabs(ui, &self.session, &mut self.ui, &mut events);
        });

        for event in events {
            self.dispatch(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{Bound, FilterSpec};

    #[test]
    fn dispatch_reports_load_and_filter() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("d.csv");
        std::fs::write(&path, "a,b\n1,x\n2,y\n3,z\n").unwrap();

        let mut app = CsvLensApp::new(ViewerConfig::default());
        app.dispatch(SessionEvent::LoadRequested(path.clone()));
        assert_eq!(app.ui.selected_file, path.display().to_string());
        assert!(app.ui.filter_inputs.contains_key("a"));
        assert!(!app.ui.filter_inputs.contains_key("b"));
        match &app.ui.status {
            Some(Status::Info(msg)) => assert!(msg.ends_with("| Rows: 3, Columns: 2")),
            other => panic!("unexpected status {other:?}"),
        }

        app.dispatch(SessionEvent::FilterChanged(
            FilterSpec::new().with_bound("a", Bound::new(Some(2.0), None)),
        ));
        assert_eq!(
            app.ui.status,
            Some(Status::Info("Filtered: 2 of 3 rows".into()))
        );
    }

    #[test]
    fn dispatch_surfaces_load_errors() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = CsvLensApp::new(ViewerConfig::default());
        app.dispatch(SessionEvent::LoadRequested(dir.path().join("gone.csv")));
        match &app.ui.status {
            Some(Status::Error(msg)) => assert!(msg.starts_with("Error loading file")),
            other => panic!("unexpected status {other:?}"),
        }
        assert!(app.session.loaded().is_none());
    }
}
