//! Group-wise totals over a (filtered) rental table.
//!
//! Every function here is pure: one output row per group that actually occurs
//! in the input, no zero-filled rows for missing months or categories.

use std::collections::{BTreeMap, BTreeSet};

use chrono::Datelike;

use super::model::{Holiday, RentalTable, Season};

// ---------------------------------------------------------------------------
// Monthly
// ---------------------------------------------------------------------------

/// Totals for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyRow {
    pub year: i32,
    /// 1-12
    pub month: u32,
    /// Number of distinct record ids in the month.
    pub distinct_records: usize,
    /// Sum of `count` over the month.
    pub total: u64,
}

impl MonthlyRow {
    /// `YYYY-MM` label used on the chart axis.
    pub fn label(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }
}

/// Group by calendar month, chronologically ascending.
pub fn monthly_summary(table: &RentalTable) -> Vec<MonthlyRow> {
    let mut groups: BTreeMap<(i32, u32), (BTreeSet<i64>, u64)> = BTreeMap::new();
    for r in table.records() {
        let (ids, total) = groups.entry((r.date.year(), r.date.month())).or_default();
        ids.insert(r.id);
        *total += r.count;
    }

    groups
        .into_iter()
        .map(|((year, month), (ids, total))| MonthlyRow {
            year,
            month,
            distinct_records: ids.len(),
            total,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Season
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeasonRow {
    pub season: Season,
    pub total: u64,
}

/// Sum `count` per season, in spring → winter order.
pub fn season_summary(table: &RentalTable) -> Vec<SeasonRow> {
    let mut groups: BTreeMap<Season, u64> = BTreeMap::new();
    for r in table.records() {
        *groups.entry(r.season).or_default() += r.count;
    }
    groups
        .into_iter()
        .map(|(season, total)| SeasonRow { season, total })
        .collect()
}

// ---------------------------------------------------------------------------
// Holiday
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HolidayRow {
    pub holiday: Holiday,
    pub total: u64,
}

/// Sum `count` per holiday flag, `no` before `yes`.
pub fn holiday_summary(table: &RentalTable) -> Vec<HolidayRow> {
    let mut groups: BTreeMap<Holiday, u64> = BTreeMap::new();
    for r in table.records() {
        *groups.entry(r.holiday).or_default() += r.count;
    }
    groups
        .into_iter()
        .map(|(holiday, total)| HolidayRow { holiday, total })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::data::filter::filter_range;
    use crate::data::model::{DateRange, Record};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn rec(id: i64, date: NaiveDate, season: Season, holiday: Holiday, count: u64) -> Record {
        Record {
            id,
            date,
            season,
            holiday,
            count,
        }
    }

    fn three_records() -> RentalTable {
        RentalTable::from_records(vec![
            rec(1, day(2011, 1, 1), Season::Winter, Holiday::No, 10),
            rec(2, day(2011, 2, 15), Season::Winter, Holiday::No, 5),
            rec(3, day(2011, 6, 1), Season::Summer, Holiday::Yes, 7),
        ])
    }

    #[test]
    fn winter_months_scenario() {
        let filtered = filter_range(
            &three_records(),
            &DateRange::new(day(2011, 1, 1), day(2011, 2, 28)),
        );

        let monthly: Vec<(String, usize, u64)> = monthly_summary(&filtered)
            .iter()
            .map(|m| (m.label(), m.distinct_records, m.total))
            .collect();
        assert_eq!(
            monthly,
            vec![("2011-01".to_string(), 1, 10), ("2011-02".to_string(), 1, 5)]
        );

        assert_eq!(
            season_summary(&filtered),
            vec![SeasonRow {
                season: Season::Winter,
                total: 15
            }]
        );
        assert_eq!(
            holiday_summary(&filtered),
            vec![HolidayRow {
                holiday: Holiday::No,
                total: 15
            }]
        );
    }

    #[test]
    fn months_without_records_are_absent() {
        let monthly = monthly_summary(&three_records());
        let labels: Vec<String> = monthly.iter().map(MonthlyRow::label).collect();
        assert_eq!(labels, vec!["2011-01", "2011-02", "2011-06"]);
    }

    #[test]
    fn monthly_counts_distinct_ids_and_sums_counts() {
        let table = RentalTable::from_records(vec![
            rec(1, day(2012, 3, 1), Season::Spring, Holiday::No, 100),
            rec(2, day(2012, 3, 1), Season::Spring, Holiday::No, 50),
            rec(3, day(2012, 3, 31), Season::Spring, Holiday::Yes, 25),
            rec(4, day(2011, 12, 31), Season::Winter, Holiday::No, 1),
        ]);
        let monthly = monthly_summary(&table);
        assert_eq!(monthly.len(), 2);
        assert_eq!(monthly[0].label(), "2011-12");
        assert_eq!(monthly[1].distinct_records, 3);
        assert_eq!(monthly[1].total, 175);
    }

    #[test]
    fn season_rows_follow_fixed_order() {
        let table = RentalTable::from_records(vec![
            rec(1, day(2011, 1, 1), Season::Winter, Holiday::No, 1),
            rec(2, day(2011, 10, 1), Season::Fall, Holiday::No, 2),
            rec(3, day(2011, 4, 1), Season::Spring, Holiday::No, 3),
        ]);
        let order: Vec<Season> = season_summary(&table).iter().map(|r| r.season).collect();
        assert_eq!(order, vec![Season::Spring, Season::Fall, Season::Winter]);
    }

    #[test]
    fn category_totals_conserve_filtered_count() {
        let table = three_records();
        let total = table.total_count();
        let by_season: u64 = season_summary(&table).iter().map(|r| r.total).sum();
        let by_holiday: u64 = holiday_summary(&table).iter().map(|r| r.total).sum();
        assert_eq!(by_season, total);
        assert_eq!(by_holiday, total);
        assert_eq!(
            holiday_summary(&table)
                .iter()
                .map(|r| r.holiday)
                .collect::<Vec<_>>(),
            vec![Holiday::No, Holiday::Yes]
        );
    }

    #[test]
    fn empty_input_gives_empty_summaries() {
        let empty = RentalTable::default();
        assert!(monthly_summary(&empty).is_empty());
        assert!(season_summary(&empty).is_empty());
        assert!(holiday_summary(&empty).is_empty());
    }
}
