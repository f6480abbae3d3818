use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;

use crate::data::model::{DateRange, RentalTable};

/// Command-line / environment configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "bike-dashboard", version, about = "Bike-sharing usage dashboard")]
pub struct Config {
    /// Dataset to load at startup (.csv, .json or .parquet).
    #[arg(long, env = "BIKE_DASHBOARD_DATA", default_value = "dashboard/all_data.csv")]
    pub data: PathBuf,

    /// First day of the initial range (YYYY-MM-DD). Defaults to the earliest date.
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// Last day of the initial range (YYYY-MM-DD). Defaults to the latest date.
    #[arg(long)]
    pub end: Option<NaiveDate>,

    /// Currency code shown in front of the styled total.
    #[arg(long, default_value = "AUD")]
    pub currency: String,
}

impl Config {
    /// Initial range for `table`: the full span, narrowed by `--start`/`--end`
    /// and clamped into the dataset bounds.
    pub fn initial_range(&self, table: &RentalTable) -> Option<DateRange> {
        let full = DateRange::full(table)?;
        let requested = DateRange::new(
            self.start.unwrap_or(full.start),
            self.end.unwrap_or(full.end),
        );
        Some(requested.clamp_to((full.start, full.end)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Holiday, Record, Season};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn table() -> RentalTable {
        let rec = |id, date| Record {
            id,
            date,
            season: Season::Spring,
            holiday: Holiday::No,
            count: 1,
        };
        RentalTable::from_records(vec![rec(1, day(2011, 1, 1)), rec(2, day(2012, 12, 31))])
    }

    #[test]
    fn defaults() {
        let config = Config::try_parse_from(["bike-dashboard"]).unwrap();
        assert_eq!(config.currency, "AUD");
        assert!(config.start.is_none());
        assert_eq!(
            config.initial_range(&table()),
            Some(DateRange::new(day(2011, 1, 1), day(2012, 12, 31)))
        );
    }

    #[test]
    fn explicit_range_is_clamped() {
        let config = Config::try_parse_from([
            "bike-dashboard",
            "--data",
            "day.csv",
            "--start",
            "2010-05-01",
            "--end",
            "2011-06-30",
        ])
        .unwrap();
        assert_eq!(config.data, PathBuf::from("day.csv"));
        assert_eq!(
            config.initial_range(&table()),
            Some(DateRange::new(day(2011, 1, 1), day(2011, 6, 30)))
        );
    }

    #[test]
    fn bad_date_is_rejected() {
        assert!(Config::try_parse_from(["bike-dashboard", "--start", "yesterday"]).is_err());
    }
}
