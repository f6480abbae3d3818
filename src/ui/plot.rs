use eframe::egui::{RichText, ScrollArea, Ui};
use egui_plot::{Bar, BarChart, Line, Plot, PlotPoints, Points};

use crate::color::{highlight_max, HIGHLIGHT};
use crate::data::summary::{HolidayRow, MonthlyRow, SeasonRow};
use crate::format::group_digits;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Dashboard (central panel)
// ---------------------------------------------------------------------------

/// Render metrics and charts for the current view.
pub fn dashboard(ui: &mut Ui, state: &AppState) {
    let Some(view) = &state.view else {
        let message = if state.dataset_is_empty() {
            "The dataset has no records  (File → Open… another file)"
        } else {
            "Open a dataset to begin  (File → Open…)"
        };
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading(message);
        });
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Bike Sharing Dashboard");
            ui.add_space(8.0);

            ui.label(RichText::new("Monthly Rentals").size(18.0).strong());
            ui.columns(2, |cols: &mut [Ui]| {
                metric(
                    &mut cols[0],
                    "Total Rentals",
                    &group_digits(view.metrics.total_rentals, ','),
                );
                metric(&mut cols[1], "Totality", &view.metrics.total_display);
            });
            monthly_chart(ui, &view.monthly);

            ui.add_space(12.0);
            ui.label(RichText::new("Rental Demographics").size(18.0).strong());
            ui.columns(2, |cols: &mut [Ui]| {
                season_chart(&mut cols[0], &view.by_season);
                holiday_chart(&mut cols[1], &view.by_holiday);
            });
        });
}

fn metric(ui: &mut Ui, label: &str, value: &str) {
    ui.vertical(|ui: &mut Ui| {
        ui.label(RichText::new(label).weak());
        ui.label(RichText::new(value).size(28.0).strong());
    });
}

// ---------------------------------------------------------------------------
// Charts
// ---------------------------------------------------------------------------

/// Axis text for a category plotted at integer x positions.
fn category_label(labels: &[String], value: f64) -> String {
    let idx = value.round();
    if idx < 0.0 || (value - idx).abs() > 1e-6 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}

/// Line chart of monthly totals. Months are plotted at consecutive x
/// positions, so gaps in the data are not stretched out.
fn monthly_chart(ui: &mut Ui, monthly: &[MonthlyRow]) {
    let labels: Vec<String> = monthly.iter().map(MonthlyRow::label).collect();
    let series: Vec<[f64; 2]> = monthly
        .iter()
        .enumerate()
        .map(|(i, m)| [i as f64, m.total as f64])
        .collect();

    Plot::new("monthly_plot")
        .height(320.0)
        .x_axis_label("Month")
        .y_axis_label("Rentals")
        .x_axis_formatter(move |mark, _range| category_label(&labels, mark.value))
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(PlotPoints::from(series.clone()))
                    .name("Rentals")
                    .color(HIGHLIGHT)
                    .width(2.0),
            );
            plot_ui.points(Points::new(PlotPoints::from(series)).radius(4.0).color(HIGHLIGHT));
        });
}

fn season_chart(ui: &mut Ui, rows: &[SeasonRow]) {
    let entries = rows
        .iter()
        .map(|r| (r.season.to_string(), r.total))
        .collect();
    bar_chart(ui, "season_plot", "Rentals by Season", "Season", entries);
}

fn holiday_chart(ui: &mut Ui, rows: &[HolidayRow]) {
    let entries = rows
        .iter()
        .map(|r| (r.holiday.to_string(), r.total))
        .collect();
    bar_chart(ui, "holiday_plot", "Rentals by Holiday", "Holiday", entries);
}

fn bar_chart(ui: &mut Ui, id: &str, title: &str, x_label: &str, entries: Vec<(String, u64)>) {
    ui.label(RichText::new(title).strong());

    let totals: Vec<u64> = entries.iter().map(|(_, total)| *total).collect();
    let bars: Vec<Bar> = entries
        .iter()
        .zip(highlight_max(&totals))
        .enumerate()
        .map(|(i, ((name, total), color))| {
            Bar::new(i as f64, *total as f64)
                .name(name)
                .fill(color)
                .width(0.6)
        })
        .collect();
    let labels: Vec<String> = entries.into_iter().map(|(name, _)| name).collect();

    Plot::new(id)
        .height(260.0)
        .x_axis_label(x_label)
        .y_axis_label("Total Rentals")
        .x_axis_formatter(move |mark, _range| category_label(&labels, mark.value))
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| plot_ui.bar_chart(BarChart::new(bars)));
}
