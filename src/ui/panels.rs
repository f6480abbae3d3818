use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::DatePickerButton;

use crate::data::model::DateRange;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – date range picker
// ---------------------------------------------------------------------------

/// Render the left panel holding the range selection.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Bike Sharing");
    ui.separator();

    if state.dataset_is_empty() {
        ui.label("The loaded dataset contains no records.");
        return;
    }
    let (Some((min, max)), Some(range)) = (state.bounds(), state.range) else {
        ui.label("No dataset loaded.");
        return;
    };

    ui.strong("Date range");

    let mut start = range.start;
    let mut end = range.end;
    let mut changed = false;

    egui::Grid::new("date_range")
        .num_columns(2)
        .spacing([8.0, 6.0])
        .show(ui, |ui: &mut Ui| {
            ui.label("From");
            changed |= ui
                .add(DatePickerButton::new(&mut start).id_salt("range_start"))
                .changed();
            ui.end_row();

            ui.label("To");
            changed |= ui
                .add(DatePickerButton::new(&mut end).id_salt("range_end"))
                .changed();
            ui.end_row();
        });

    if changed {
        state.set_range(DateRange::new(start, end));
    }

    if ui.small_button("Full range").clicked() {
        state.reset_range();
    }

    ui.separator();
    ui.label(format!("Available: {min} – {max}"));

    if let (Some(view), Some(ds)) = (&state.view, &state.dataset) {
        ui.label(format!("{} of {} days selected", view.record_count, ds.len()));
    }

    if state.range.is_some_and(|r| r.is_inverted()) {
        ui.label(RichText::new("Start date is after end date").color(Color32::YELLOW));
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let (Some(ds), Some(path)) = (&state.dataset, &state.data_path) {
            ui.label(format!("{} records from {}", ds.len(), path.display()));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open rental data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
    }
}
