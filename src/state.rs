use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::ViewerConfig;
use crate::data::filter::{self, FilterError, FilterSpec};
use crate::data::loader::{self, LoadError};
use crate::data::model::Dataset;
use crate::data::plots::{
    correlation_spec, histogram_spec, scatter_spec, CorrelationSpec, HistogramSpec, ScatterSpec,
};
use crate::data::preview::{preview, PreviewGrid};
use crate::data::summary::{summarize, SummaryRow};

// ---------------------------------------------------------------------------
// Events and errors
// ---------------------------------------------------------------------------

/// Which plot input a selection change targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionSlot {
    Histogram,
    ScatterX,
    ScatterY,
}

impl fmt::Display for SelectionSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionSlot::Histogram => write!(f, "histogram column"),
            SelectionSlot::ScatterX => write!(f, "scatter X column"),
            SelectionSlot::ScatterY => write!(f, "scatter Y column"),
        }
    }
}

/// Everything the presentation layer can ask the session to do.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    LoadRequested(PathBuf),
    FilterChanged(FilterSpec),
    SelectionChanged(SelectionSlot, Option<String>),
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Error loading file: {0}")]
    Load(#[from] LoadError),

    #[error("Invalid filter: {0}")]
    Filter(#[from] FilterError),

    #[error("no dataset loaded")]
    NotLoaded,

    #[error("'{column}' is not a numeric column and cannot be the {slot}")]
    InvalidSelection { slot: SelectionSlot, column: String },
}

// ---------------------------------------------------------------------------
// Session state
// ---------------------------------------------------------------------------

/// The user's chosen plot columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnSelection {
    pub histogram: Option<String>,
    pub scatter_x: Option<String>,
    pub scatter_y: Option<String>,
}

impl ColumnSelection {
    /// Histogram and scatter X on the first numeric column, scatter Y on the
    /// second (or the first again when there is only one).
    pub fn defaults_for(ds: &Dataset) -> Self {
        let numeric = ds.numeric_column_names();
        let first = numeric.first().cloned();
        let second = numeric.get(1).cloned().or_else(|| first.clone());
        Self {
            histogram: first.clone(),
            scatter_x: first,
            scatter_y: second,
        }
    }

    pub fn get(&self, slot: SelectionSlot) -> Option<&str> {
        match slot {
            SelectionSlot::Histogram => self.histogram.as_deref(),
            SelectionSlot::ScatterX => self.scatter_x.as_deref(),
            SelectionSlot::ScatterY => self.scatter_y.as_deref(),
        }
    }

    fn set(&mut self, slot: SelectionSlot, column: Option<String>) {
        match slot {
            SelectionSlot::Histogram => self.histogram = column,
            SelectionSlot::ScatterX => self.scatter_x = column,
            SelectionSlot::ScatterY => self.scatter_y = column,
        }
    }
}

/// Outputs handed to the UI; always recomputed from the working dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedViews {
    pub preview: PreviewGrid,
    pub summary: Vec<SummaryRow>,
    pub histogram: Option<HistogramSpec>,
    pub scatter: Option<ScatterSpec>,
    pub correlation: Option<CorrelationSpec>,
}

/// A session with a dataset loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedSession {
    pub source: PathBuf,
    pub raw: Dataset,
    /// `raw` with `filter` applied.
    pub working: Dataset,
    pub filter: FilterSpec,
    pub selection: ColumnSelection,
    pub views: DerivedViews,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Empty,
    Loaded(Box<LoadedSession>),
}

// ---------------------------------------------------------------------------
// Session controller
// ---------------------------------------------------------------------------

/// Owns the session state.  Every change goes through [`Session::handle`],
/// which finishes all recomputation before returning.
pub struct Session {
    config: ViewerConfig,
    state: SessionState,
}

impl Session {
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            config,
            state: SessionState::Empty,
        }
    }

    pub fn loaded(&self) -> Option<&LoadedSession> {
        match &self.state {
            SessionState::Loaded(loaded) => Some(&**loaded),
            SessionState::Empty => None,
        }
    }

    /// Apply one event.  On error the state is exactly what it was before.
    pub fn handle(&mut self, event: SessionEvent) -> Result<(), SessionError> {
        match event {
            SessionEvent::LoadRequested(path) => self.load(&path),
            SessionEvent::FilterChanged(spec) => self.change_filter(spec),
            SessionEvent::SelectionChanged(slot, column) => self.change_selection(slot, column),
        }
    }

    fn load(&mut self, path: &Path) -> Result<(), SessionError> {
        let raw = loader::load_file(path).map_err(|e| {
            log::error!("Failed to load {}: {e}", path.display());
            e
        })?;
        log::info!(
            "Loaded {} with {} rows and columns {:?}",
            path.display(),
            raw.row_count(),
            raw.columns().iter().map(|c| c.name()).collect::<Vec<_>>()
        );

        let selection = ColumnSelection::defaults_for(&raw);
        let working = raw.clone();
        let views = derive_views(&self.config, &working, &selection);
        self.state = SessionState::Loaded(Box::new(LoadedSession {
            source: path.to_path_buf(),
            raw,
            working,
            filter: FilterSpec::new(),
            selection,
            views,
        }));
        Ok(())
    }

    fn change_filter(&mut self, spec: FilterSpec) -> Result<(), SessionError> {
        let SessionState::Loaded(loaded) = &mut self.state else {
            return Err(SessionError::NotLoaded);
        };
        let loaded = loaded.as_mut();

        if let Err(e) = spec.validate(&loaded.raw) {
            log::warn!("Rejected filter update: {e}");
            return Err(e.into());
        }

        let working = filter::apply(&loaded.raw, &spec);
        log::info!(
            "Applied {} bound(s): {} of {} rows retained",
            spec.len(),
            working.row_count(),
            loaded.raw.row_count()
        );

        loaded.views = derive_views(&self.config, &working, &loaded.selection);
        loaded.working = working;
        loaded.filter = spec;
        Ok(())
    }

    fn change_selection(
        &mut self,
        slot: SelectionSlot,
        column: Option<String>,
    ) -> Result<(), SessionError> {
        let SessionState::Loaded(loaded) = &mut self.state else {
            return Err(SessionError::NotLoaded);
        };
        let loaded = loaded.as_mut();

        if let Some(name) = &column {
            if loaded.working.numeric_column(name).is_none() {
                return Err(SessionError::InvalidSelection {
                    slot,
                    column: name.clone(),
                });
            }
        }

        loaded.selection.set(slot, column);
        let selection = &loaded.selection;
        match slot {
            SelectionSlot::Histogram => {
                loaded.views.histogram = histogram_spec(
                    &loaded.working,
                    selection.histogram.as_deref(),
                    self.config.histogram_bins,
                );
            }
            SelectionSlot::ScatterX | SelectionSlot::ScatterY => {
                loaded.views.scatter = scatter_spec(
                    &loaded.working,
                    selection.scatter_x.as_deref(),
                    selection.scatter_y.as_deref(),
                );
            }
        }
        log::debug!("Recomputed {slot} view");
        Ok(())
    }
}

fn derive_views(config: &ViewerConfig, working: &Dataset, selection: &ColumnSelection) -> DerivedViews {
    log::debug!("Recomputing derived views over {} rows", working.row_count());
    DerivedViews {
        preview: preview(working, config.row_limit, config.cell_char_limit),
        summary: summarize(working),
        histogram: histogram_spec(
            working,
            selection.histogram.as_deref(),
            config.histogram_bins,
        ),
        scatter: scatter_spec(
            working,
            selection.scatter_x.as_deref(),
            selection.scatter_y.as_deref(),
        ),
        correlation: correlation_spec(working),
    }
}
