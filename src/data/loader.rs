use std::borrow::Cow;
use std::collections::HashSet;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use arrow::array::Array;
use arrow::util::display::array_value_to_string;
use chrono::{NaiveDate, NaiveDateTime};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::{Map, Value as JsonValue};
use thiserror::Error;

use super::model::{Holiday, Record, RentalTable, Season};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Everything that can go wrong while reading the raw dataset.
///
/// A load is all-or-nothing: one bad row rejects the whole file so that the
/// totals shown later never silently miss records.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("row {row}: {reason}")]
    MalformedRow { row: usize, reason: String },

    #[error("unexpected file layout: {0}")]
    Layout(String),

    #[error("CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parquet: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the rental dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with `instant,dteday,season,holiday,cnt_x` (primary)
/// * `.json`    – `[{ "instant": 1, "dteday": "2011-01-01", ... }, ...]`
/// * `.parquet` – flat columns with the same names
///
/// The returned table is sorted by date; rows sharing a date keep file order.
pub fn load_file(path: &Path) -> Result<RentalTable, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => Err(LoadError::UnsupportedFormat(other.to_string())),
    }?;

    match table.date_bounds() {
        Some((min, max)) => log::info!(
            "Loaded {} records from {} ({min} .. {max})",
            table.len(),
            path.display()
        ),
        None => log::warn!("{} contains no records", path.display()),
    }

    Ok(table)
}

fn open(path: &Path) -> Result<File, LoadError> {
    File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ---------------------------------------------------------------------------
// Column resolution
// ---------------------------------------------------------------------------

const ID_COLUMN: &str = "instant";
const DATE_COLUMN: &str = "dteday";
const SEASON_COLUMN: &str = "season";
const HOLIDAY_COLUMN: &str = "holiday";
/// `cnt_x` is the merged-dataset name; plain `cnt` is accepted as a fallback.
const COUNT_COLUMNS: [&str; 2] = ["cnt_x", "cnt"];

/// Positions of the required columns within a header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ColumnIndex {
    id: usize,
    date: usize,
    season: usize,
    holiday: usize,
    count: usize,
}

impl ColumnIndex {
    fn resolve<S: AsRef<str>>(headers: &[S]) -> Result<Self, LoadError> {
        let find = |name: &'static str| {
            headers
                .iter()
                .position(|h| h.as_ref().trim() == name)
                .ok_or(LoadError::MissingColumn(name))
        };
        let count = COUNT_COLUMNS
            .iter()
            .find_map(|name| headers.iter().position(|h| h.as_ref().trim() == *name))
            .ok_or(LoadError::MissingColumn(COUNT_COLUMNS[0]))?;

        Ok(ColumnIndex {
            id: find(ID_COLUMN)?,
            date: find(DATE_COLUMN)?,
            season: find(SEASON_COLUMN)?,
            holiday: find(HOLIDAY_COLUMN)?,
            count,
        })
    }
}

// ---------------------------------------------------------------------------
// Row validation
// ---------------------------------------------------------------------------

/// The textual cells of one row, before validation.
struct RawFields<'a> {
    id: &'a str,
    date: &'a str,
    season: &'a str,
    holiday: &'a str,
    count: &'a str,
}

/// Accumulates validated records, enforces id uniqueness and keeps the
/// grand total of `count` representable, so no later sum can overflow.
#[derive(Default)]
struct RecordBuilder {
    seen_ids: HashSet<i64>,
    records: Vec<Record>,
    total: u64,
}

impl RecordBuilder {
    /// Validate and append one row. `row` is the 1-based data row number.
    fn push(&mut self, row: usize, raw: RawFields<'_>) -> Result<(), LoadError> {
        let malformed = |reason: String| LoadError::MalformedRow { row, reason };

        let id = raw
            .id
            .trim()
            .parse::<i64>()
            .map_err(|_| malformed(format!("id '{}' is not an integer", raw.id)))?;
        let date = parse_date(raw.date)
            .ok_or_else(|| malformed(format!("unparsable date '{}'", raw.date)))?;
        let season = raw.season.parse::<Season>().map_err(malformed)?;
        let holiday = raw.holiday.parse::<Holiday>().map_err(malformed)?;
        let count = parse_count(raw.count).ok_or_else(|| {
            malformed(format!("count '{}' is not a non-negative integer", raw.count))
        })?;

        if !self.seen_ids.insert(id) {
            return Err(malformed(format!("duplicate id {id}")));
        }
        self.total = self
            .total
            .checked_add(count)
            .ok_or_else(|| malformed(format!("count {count} overflows the dataset total")))?;

        self.records.push(Record {
            id,
            date,
            season,
            holiday,
            count,
        });
        Ok(())
    }

    fn finish(mut self) -> RentalTable {
        // `sort_by_key` is stable: equal dates keep their file order.
        self.records.sort_by_key(|r| r.date);
        RentalTable::from_records(self.records)
    }
}

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Largest whole float that converts to `u64` exactly.
const MAX_EXACT_FLOAT: f64 = (1u64 << 53) as f64;

/// Integer counts, also tolerating whole floats such as `985.0` up to 2^53.
fn parse_count(s: &str) -> Option<u64> {
    let s = s.trim();
    if let Ok(n) = s.parse::<u64>() {
        return Some(n);
    }
    let f = s.parse::<f64>().ok()?;
    (f.is_finite() && (0.0..=MAX_EXACT_FLOAT).contains(&f) && f.fract() == 0.0)
        .then_some(f as u64)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<RentalTable, LoadError> {
    load_csv_reader(open(path)?)
}

/// Parse CSV text from any reader. Extra columns are ignored.
pub fn load_csv_reader<R: Read>(reader: R) -> Result<RentalTable, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
    let columns = ColumnIndex::resolve(&headers)?;

    let mut builder = RecordBuilder::default();
    for (row_no, result) in reader.records().enumerate() {
        let row = row_no + 1;
        let record = result?;
        let cell = |idx: usize| record.get(idx).unwrap_or("");

        builder.push(
            row,
            RawFields {
                id: cell(columns.id),
                date: cell(columns.date),
                season: cell(columns.season),
                holiday: cell(columns.holiday),
                count: cell(columns.count),
            },
        )?;
    }

    Ok(builder.finish())
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "instant": 1, "dteday": "2011-01-01", "season": "winter", "holiday": "no", "cnt_x": 985 },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<RentalTable, LoadError> {
    let mut text = String::new();
    open(path)?
        .read_to_string(&mut text)
        .map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    load_json_str(&text)
}

fn load_json_str(text: &str) -> Result<RentalTable, LoadError> {
    let root: JsonValue = serde_json::from_str(text)?;
    let rows = root
        .as_array()
        .ok_or_else(|| LoadError::Layout("expected a top-level JSON array".into()))?;

    let mut builder = RecordBuilder::default();
    for (i, value) in rows.iter().enumerate() {
        let row = i + 1;
        let obj = value.as_object().ok_or_else(|| LoadError::MalformedRow {
            row,
            reason: "not a JSON object".into(),
        })?;

        let id = json_field(obj, row, &[ID_COLUMN])?;
        let date = json_field(obj, row, &[DATE_COLUMN])?;
        let season = json_field(obj, row, &[SEASON_COLUMN])?;
        let holiday = json_field(obj, row, &[HOLIDAY_COLUMN])?;
        let count = json_field(obj, row, &COUNT_COLUMNS)?;

        builder.push(
            row,
            RawFields {
                id: &id,
                date: &date,
                season: &season,
                holiday: &holiday,
                count: &count,
            },
        )?;
    }

    Ok(builder.finish())
}

/// Text of the first present key in `names`; numbers and booleans are
/// rendered so the shared row validation can parse them.
fn json_field<'a>(
    obj: &'a Map<String, JsonValue>,
    row: usize,
    names: &[&str],
) -> Result<Cow<'a, str>, LoadError> {
    let value = names
        .iter()
        .find_map(|name| obj.get(*name))
        .ok_or_else(|| LoadError::MalformedRow {
            row,
            reason: format!("missing '{}'", names[0]),
        })?;

    match value {
        JsonValue::String(s) => Ok(Cow::Borrowed(s.as_str())),
        JsonValue::Number(n) => Ok(Cow::Owned(n.to_string())),
        JsonValue::Bool(b) => Ok(Cow::Owned(b.to_string())),
        other => Err(LoadError::MalformedRow {
            row,
            reason: format!("'{}' has unsupported value {other}", names[0]),
        }),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with flat columns named like the CSV header.
///
/// Column types are not fixed: ids/counts may be Int32 or Int64, the date may
/// be Utf8 or Date32, and the categorical columns Utf8 or integer codes.
/// Cells are rendered to text and validated like CSV cells.
fn load_parquet(path: &Path) -> Result<RentalTable, LoadError> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(open(path)?)?;
    let reader = builder.build()?;

    let mut records = RecordBuilder::default();
    let mut row = 0usize;

    for batch_result in reader {
        let batch = batch_result?;
        let names: Vec<String> = batch
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect();
        let columns = ColumnIndex::resolve(&names)?;

        for i in 0..batch.num_rows() {
            row += 1;
            let cell = |idx: usize| -> Result<String, LoadError> {
                let col = batch.column(idx);
                if col.is_null(i) {
                    return Err(LoadError::MalformedRow {
                        row,
                        reason: format!("null value in column '{}'", names[idx]),
                    });
                }
                Ok(array_value_to_string(col, i)?)
            };

            let id = cell(columns.id)?;
            let date = cell(columns.date)?;
            let season = cell(columns.season)?;
            let holiday = cell(columns.holiday)?;
            let count = cell(columns.count)?;

            records.push(
                row,
                RawFields {
                    id: &id,
                    date: &date,
                    season: &season,
                    holiday: &holiday,
                    count: &count,
                },
            )?;
        }
    }

    Ok(records.finish())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn fixture(name: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("tests/fixtures")
            .join(name)
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn loads_fixture_sorted_by_date() {
        let table = load_file(&fixture("day_sample.csv")).expect("fixture loads");
        assert_eq!(table.len(), 12);

        let dates: Vec<NaiveDate> = table.records().iter().map(|r| r.date).collect();
        let mut sorted = dates.clone();
        sorted.sort();
        assert_eq!(dates, sorted);
        assert_eq!(table.date_bounds(), Some((day(2011, 1, 1), day(2012, 3, 20))));
    }

    #[test]
    fn equal_dates_keep_file_order() {
        let csv = "\
instant,dteday,season,holiday,cnt_x
5,2011-02-01,winter,no,50
3,2011-01-15,winter,no,30
4,2011-01-15,winter,yes,40
1,2011-01-15,winter,no,10
";
        let table = load_csv_reader(csv.as_bytes()).unwrap();
        let ids: Vec<i64> = table.records().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 4, 1, 5]);
    }

    #[test]
    fn accepts_cnt_alias_numeric_codes_and_extra_columns() {
        let csv = "\
,instant,dteday,season,yr,holiday,cnt
0,1,2011-01-01 00:00:00,1,0,0,985
1,2,2011/01/02,4,0,1,801.0
";
        let table = load_csv_reader(csv.as_bytes()).unwrap();
        let r = &table.records()[0];
        assert_eq!(r.date, day(2011, 1, 1));
        assert_eq!(r.season, Season::Spring);
        assert_eq!(r.holiday, Holiday::No);
        assert_eq!(r.count, 985);
        assert_eq!(table.records()[1].season, Season::Winter);
        assert_eq!(table.records()[1].holiday, Holiday::Yes);
        assert_eq!(table.records()[1].count, 801);
    }

    #[test]
    fn missing_column_is_rejected() {
        let csv = "instant,dteday,season,cnt_x\n1,2011-01-01,winter,10\n";
        let err = load_csv_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn("holiday")), "{err}");
    }

    #[test]
    fn malformed_date_rejects_whole_load() {
        let csv = "\
instant,dteday,season,holiday,cnt_x
1,2011-01-01,winter,no,10
2,not-a-date,winter,no,5
";
        let err = load_csv_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::MalformedRow { row: 2, .. }), "{err}");
    }

    #[test]
    fn negative_count_and_duplicate_id_are_malformed() {
        let negative = "instant,dteday,season,holiday,cnt_x\n1,2011-01-01,winter,no,-3\n";
        assert!(matches!(
            load_csv_reader(negative.as_bytes()),
            Err(LoadError::MalformedRow { row: 1, .. })
        ));

        let duplicate = "\
instant,dteday,season,holiday,cnt_x
7,2011-01-01,winter,no,1
7,2011-01-02,winter,no,2
";
        let err = load_csv_reader(duplicate.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("duplicate id 7"), "{err}");
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_file(Path::new("definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }), "{err}");
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = load_file(Path::new("data.xlsx")).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedFormat(ext) if ext == "xlsx"));
    }

    #[test]
    fn json_records_load_like_csv() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"[
                {{"instant": 2, "dteday": "2011-06-01", "season": "summer", "holiday": 1, "cnt_x": 7}},
                {{"instant": 1, "dteday": "2011-01-01", "season": "winter", "holiday": "no", "cnt_x": 10}}
            ]"#
        )
        .unwrap();

        let table = load_file(file.path()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.records()[0].id, 1);
        assert_eq!(table.records()[1].holiday, Holiday::Yes);
        assert_eq!(table.total_count(), 17);
    }

    #[test]
    fn json_must_be_an_array() {
        let err = load_json_str(r#"{"instant": 1}"#).unwrap_err();
        assert!(matches!(err, LoadError::Layout(_)));
    }

    #[test]
    fn parquet_with_typed_columns() {
        use std::sync::Arc;

        use arrow::array::{ArrayRef, Date32Array, Int32Array, Int64Array};
        use arrow::datatypes::{DataType, Field, Schema};
        use arrow::record_batch::RecordBatch;
        use parquet::arrow::ArrowWriter;

        let schema = Arc::new(Schema::new(vec![
            Field::new("instant", DataType::Int32, false),
            Field::new("dteday", DataType::Date32, false),
            Field::new("season", DataType::Int64, false),
            Field::new("holiday", DataType::Int64, false),
            Field::new("cnt", DataType::Int64, false),
        ]));
        // 15_340 and 15_000 days after the epoch: 2012-01-01 and 2011-01-26.
        let columns: Vec<ArrayRef> = vec![
            Arc::new(Int32Array::from(vec![1, 2])),
            Arc::new(Date32Array::from(vec![15_340, 15_000])),
            Arc::new(Int64Array::from(vec![4, 1])),
            Arc::new(Int64Array::from(vec![1, 0])),
            Arc::new(Int64Array::from(vec![300, 200])),
        ];
        let batch = RecordBatch::try_new(schema.clone(), columns).unwrap();

        let file = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
        let mut writer = ArrowWriter::try_new(file.reopen().unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let table = load_file(file.path()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.records()[0].date, day(2011, 1, 26));
        assert_eq!(table.records()[0].season, Season::Spring);
        assert_eq!(table.records()[1].id, 1);
        assert_eq!(table.records()[1].holiday, Holiday::Yes);
        assert_eq!(table.total_count(), 500);
    }

    #[test]
    fn total_past_u64_max_is_rejected() {
        let csv = "\
instant,dteday,season,holiday,cnt_x
1,2011-01-01,winter,no,18446744073709551615
2,2011-01-02,winter,no,1
";
        let err = load_csv_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::MalformedRow { row: 2, .. }), "{err}");
        assert!(err.to_string().contains("overflows"), "{err}");

        let at_limit = "\
instant,dteday,season,holiday,cnt_x
1,2011-01-01,winter,no,18446744073709551614
2,2011-01-02,winter,no,1
";
        let table = load_csv_reader(at_limit.as_bytes()).unwrap();
        assert_eq!(table.total_count(), u64::MAX);
    }

    #[test]
    fn float_counts_beyond_exact_range_are_malformed() {
        let huge = "instant,dteday,season,holiday,cnt_x\n1,2011-01-01,winter,no,1e30\n";
        assert!(matches!(
            load_csv_reader(huge.as_bytes()),
            Err(LoadError::MalformedRow { row: 1, .. })
        ));

        assert_eq!(parse_count("9007199254740992.0"), Some(1 << 53));
        assert_eq!(parse_count("18014398509481984.0"), None);
        assert_eq!(parse_count("12.5"), None);
        assert_eq!(parse_count("NaN"), None);
    }
}
