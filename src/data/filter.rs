use super::model::{DateRange, RentalTable};

// ---------------------------------------------------------------------------
// Range filter: keep records whose date lies inside the selected range
// ---------------------------------------------------------------------------

/// Return indices of records with `range.start <= date <= range.end`.
///
/// Indices are ascending, so the relative order of the input is preserved.
/// An inverted range (`start > end`) matches nothing.
pub fn filtered_indices(table: &RentalTable, range: &DateRange) -> Vec<usize> {
    if range.is_inverted() {
        log::debug!("inverted date range {range}: nothing selected");
        return Vec::new();
    }
    table
        .records()
        .iter()
        .enumerate()
        .filter(|(_, r)| range.contains(r.date))
        .map(|(i, _)| i)
        .collect()
}

/// Build a new table holding only the records inside `range`.
pub fn filter_range(table: &RentalTable, range: &DateRange) -> RentalTable {
    let records = filtered_indices(table, range)
        .into_iter()
        .map(|i| table.records()[i].clone())
        .collect();
    RentalTable::from_records(records)
}
