use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Date32Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Datelike, NaiveDate};
use clap::Parser;
use parquet::arrow::ArrowWriter;

/// Write a synthetic two-year daily bike-rental dataset as CSV and Parquet.
#[derive(Debug, Parser)]
struct Args {
    /// Directory receiving `all_data.csv` and `all_data.parquet`.
    #[arg(long, default_value = "dashboard")]
    output_dir: PathBuf,

    /// PRNG seed.
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// One generated day.
struct Day {
    id: i64,
    date: NaiveDate,
    season: &'static str,
    holiday: &'static str,
    weekday: u32,
    count: i64,
}

/// Astronomical seasons, matching how the public dataset labels days.
fn season_of(date: NaiveDate) -> &'static str {
    match (date.month(), date.day()) {
        (3, 21..=31) | (4..=5, _) | (6, 1..=20) => "spring",
        (6, 21..=30) | (7..=8, _) | (9, 1..=22) => "summer",
        (9, 23..=30) | (10..=11, _) | (12, 1..=20) => "fall",
        _ => "winter",
    }
}

/// Fixed-date and first/last-weekday public holidays.
fn is_holiday(date: NaiveDate) -> bool {
    let (m, d, wd) = (date.month(), date.day(), date.weekday().num_days_from_monday());
    let nth_monday = |n: u32| wd == 0 && (d - 1) / 7 + 1 == n;
    match m {
        1 => d == 1 || nth_monday(3),
        2 => nth_monday(3),
        5 => wd == 0 && d > 24,
        7 => d == 4,
        9 => nth_monday(1),
        10 => nth_monday(2),
        11 => d == 11 || (wd == 3 && (d - 1) / 7 + 1 == 4),
        12 => d == 25,
        _ => false,
    }
}

fn generate(seed: u64) -> Vec<Day> {
    let mut rng = SimpleRng::new(seed);
    let first = NaiveDate::from_ymd_opt(2011, 1, 1).expect("valid date");
    let last = NaiveDate::from_ymd_opt(2012, 12, 31).expect("valid date");

    first
        .iter_days()
        .take_while(|d| *d <= last)
        .enumerate()
        .map(|(i, date)| {
            let season = season_of(date);
            let holiday = is_holiday(date);
            let base = match season {
                "spring" => 4_000.0,
                "summer" => 5_600.0,
                "fall" => 4_700.0,
                _ => 2_300.0,
            };
            // Usage grows roughly 60% from the first to the second year.
            let growth = 1.0 + 0.6 * (i as f64 / 730.0);
            let factor = if holiday { 0.8 } else { 1.0 };
            let count = (rng.gauss(base * growth * factor, 600.0)).max(20.0).round() as i64;

            Day {
                id: i as i64 + 1,
                date,
                season,
                holiday: if holiday { "yes" } else { "no" },
                weekday: date.weekday().num_days_from_sunday(),
                count,
            }
        })
        .collect()
}

fn write_csv(days: &[Day], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(["instant", "dteday", "season", "holiday", "weekday", "cnt_x"])?;
    for day in days {
        writer.write_record([
            day.id.to_string(),
            day.date.format("%Y-%m-%d").to_string(),
            day.season.to_string(),
            day.holiday.to_string(),
            day.weekday.to_string(),
            day.count.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(days: &[Day], path: &Path) -> Result<()> {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).expect("valid date");

    let schema = Arc::new(Schema::new(vec![
        Field::new("instant", DataType::Int64, false),
        Field::new("dteday", DataType::Date32, false),
        Field::new("season", DataType::Utf8, false),
        Field::new("holiday", DataType::Utf8, false),
        Field::new("weekday", DataType::Int64, false),
        Field::new("cnt_x", DataType::Int64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from_iter_values(days.iter().map(|d| d.id))),
            Arc::new(Date32Array::from_iter_values(
                days.iter().map(|d| (d.date - epoch).num_days() as i32),
            )),
            Arc::new(StringArray::from_iter_values(days.iter().map(|d| d.season))),
            Arc::new(StringArray::from_iter_values(days.iter().map(|d| d.holiday))),
            Arc::new(Int64Array::from_iter_values(days.iter().map(|d| d.weekday as i64))),
            Arc::new(Int64Array::from_iter_values(days.iter().map(|d| d.count))),
        ],
    )
    .context("building record batch")?;

    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    std::fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("creating {}", args.output_dir.display()))?;

    let days = generate(args.seed);

    let csv_path = args.output_dir.join("all_data.csv");
    write_csv(&days, &csv_path)?;
    let parquet_path = args.output_dir.join("all_data.parquet");
    write_parquet(&days, &parquet_path)?;

    let total: i64 = days.iter().map(|d| d.count).sum();
    println!(
        "Wrote {} days ({} rentals) to {} and {}",
        days.len(),
        total,
        csv_path.display(),
        parquet_path.display()
    );
    Ok(())
}
