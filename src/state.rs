use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::data::loader::load_file;
use crate::data::model::{DateRange, RentalTable};
use crate::data::pipeline::{build_dashboard, DashboardView};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset (read-only once set).
    pub dataset: Option<RentalTable>,

    /// Where `dataset` came from.
    pub data_path: Option<PathBuf>,

    /// Currently selected inclusive range.
    pub range: Option<DateRange>,

    /// Output of the pipeline for `range`; replaced wholesale on every change.
    pub view: Option<DashboardView>,

    /// Currency code for the styled total.
    pub currency: String,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            dataset: None,
            data_path: None,
            range: None,
            view: None,
            currency: "AUD".to_string(),
            status_message: None,
        }
    }
}

impl AppState {
    pub fn new(currency: impl Into<String>) -> Self {
        Self {
            currency: currency.into(),
            ..Self::default()
        }
    }

    /// Ingest a newly loaded dataset and show `initial` (or the full span).
    pub fn set_dataset(&mut self, dataset: RentalTable, path: PathBuf, initial: Option<DateRange>) {
        self.range = initial.or_else(|| DateRange::full(&dataset));
        self.dataset = Some(dataset);
        self.data_path = Some(path);
        self.status_message = None;
        self.rebuild();
    }

    /// A dataset is loaded but holds no records, so there is no range to pick.
    pub fn dataset_is_empty(&self) -> bool {
        self.dataset.as_ref().is_some_and(RentalTable::is_empty)
    }

    /// Min/max date of the loaded dataset.
    pub fn bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.dataset.as_ref()?.date_bounds()
    }

    /// Select a new range, clamped into the dataset bounds. Rebuilds the view
    /// only when the effective range changed.
    pub fn set_range(&mut self, range: DateRange) {
        let range = match self.bounds() {
            Some(bounds) => range.clamp_to(bounds),
            None => range,
        };
        if self.range == Some(range) {
            return;
        }
        log::debug!("Date range changed to {range}");
        self.range = Some(range);
        self.rebuild();
    }

    /// Go back to the full dataset span.
    pub fn reset_range(&mut self) {
        if let Some((start, end)) = self.bounds() {
            self.set_range(DateRange::new(start, end));
        }
    }

    /// Re-run the pipeline for the current dataset and range.
    pub fn rebuild(&mut self) {
        self.view = match (&self.dataset, self.range) {
            (Some(ds), Some(range)) => Some(build_dashboard(ds, range, &self.currency)),
            _ => None,
        };
    }

    /// Load another dataset from `path`. A failure keeps the current dataset
    /// and is reported through `status_message`.
    pub fn load_path(&mut self, path: &Path) {
        match load_file(path) {
            Ok(dataset) => self.set_dataset(dataset, path.to_path_buf(), None),
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }
}
