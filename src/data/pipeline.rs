use super::filter::filter_range;
use super::model::{DateRange, RentalTable};
use super::summary::{
    holiday_summary, monthly_summary, season_summary, HolidayRow, MonthlyRow, SeasonRow,
};
use crate::format::format_currency;

// ---------------------------------------------------------------------------
// Dashboard view: everything the UI draws for one date range
// ---------------------------------------------------------------------------

/// Headline numbers above the monthly chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metrics {
    /// Sum of the monthly totals.
    pub total_rentals: u64,
    /// The same value as currency-styled text.
    pub total_display: String,
}

/// Derived data for one `(table, range)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardView {
    pub range: DateRange,
    /// Number of records inside the range.
    pub record_count: usize,
    pub metrics: Metrics,
    pub monthly: Vec<MonthlyRow>,
    pub by_season: Vec<SeasonRow>,
    pub by_holiday: Vec<HolidayRow>,
}

/// Filter `table` to `range` and derive every summary from the result.
///
/// Pure: the same inputs always produce an identical view, and nothing is
/// remembered between calls.
pub fn build_dashboard(table: &RentalTable, range: DateRange, currency: &str) -> DashboardView {
    let filtered = filter_range(table, &range);

    let monthly = monthly_summary(&filtered);
    let total_rentals: u64 = monthly.iter().map(|m| m.total).sum();

    DashboardView {
        range,
        record_count: filtered.len(),
        metrics: Metrics {
            total_rentals,
            total_display: format_currency(total_rentals, currency),
        },
        by_season: season_summary(&filtered),
        by_holiday: holiday_summary(&filtered),
        monthly,
    }
}
