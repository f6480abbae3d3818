use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;

// ---------------------------------------------------------------------------
// Season / Holiday – the two categorical dimensions
// ---------------------------------------------------------------------------

/// Meteorological season of a record.
///
/// The derived `Ord` is the fixed display sequence spring → winter, which the
/// season summary relies on for its row order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
}

impl Season {
    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Fall => "fall",
            Season::Winter => "winter",
        }
    }
}

impl FromStr for Season {
    type Err = String;

    /// Accepts the season name (any case, `autumn` as an alias of `fall`) or
    /// the numeric codes 1-4 used by the public bike-sharing dataset.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "spring" | "1" => Ok(Season::Spring),
            "summer" | "2" => Ok(Season::Summer),
            "fall" | "autumn" | "3" => Ok(Season::Fall),
            "winter" | "4" => Ok(Season::Winter),
            other => Err(format!("unknown season '{other}'")),
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Holiday indicator. `No` sorts before `Yes`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Holiday {
    No,
    Yes,
}

impl Holiday {
    pub fn as_str(&self) -> &'static str {
        match self {
            Holiday::No => "no",
            Holiday::Yes => "yes",
        }
    }
}

impl FromStr for Holiday {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "no" | "n" | "0" | "false" => Ok(Holiday::No),
            "yes" | "y" | "1" | "true" => Ok(Holiday::Yes),
            other => Err(format!("unknown holiday flag '{other}'")),
        }
    }
}

impl fmt::Display for Holiday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Record – one row of the dataset
// ---------------------------------------------------------------------------

/// A single day-level rental record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Unique record identifier (`instant`).
    pub id: i64,
    /// Calendar day (`dteday`).
    pub date: NaiveDate,
    pub season: Season,
    pub holiday: Holiday,
    /// Number of rentals attributed to the record (`cnt_x`).
    pub count: u64,
}

// ---------------------------------------------------------------------------
// RentalTable – ordered collection of records
// ---------------------------------------------------------------------------

/// An ordered, immutable-by-convention sequence of records.
///
/// Filtering and aggregation always build new values; nothing mutates rows
/// in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RentalTable {
    records: Vec<Record>,
}

impl RentalTable {
    /// Wrap records as-is, keeping their order.
    pub fn from_records(records: Vec<Record>) -> Self {
        RentalTable { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Smallest and largest date in the table, `None` when empty.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.records.iter().map(|r| r.date).min()?;
        let max = self.records.iter().map(|r| r.date).max()?;
        Some((min, max))
    }

    /// Sum of `count` over every record.
    pub fn total_count(&self) -> u64 {
        self.records.iter().map(|r| r.count).sum()
    }
}

// ---------------------------------------------------------------------------
// DateRange – inclusive user selection
// ---------------------------------------------------------------------------

/// Inclusive `[start, end]` day range.
///
/// `start > end` is representable on purpose: it is what a user can pick in
/// the UI, and it filters to nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        DateRange { start, end }
    }

    /// The range spanning the whole table, `None` when the table is empty.
    pub fn full(table: &RentalTable) -> Option<Self> {
        table
            .date_bounds()
            .map(|(start, end)| DateRange { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }

    /// Clamp both ends into `bounds` (the dataset's min/max date).
    pub fn clamp_to(&self, bounds: (NaiveDate, NaiveDate)) -> Self {
        let (lo, hi) = bounds;
        DateRange {
            start: self.start.clamp(lo, hi),
            end: self.end.clamp(lo, hi),
        }
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} – {}", self.start, self.end)
    }
}
