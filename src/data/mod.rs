/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse + validate → RentalTable (sorted by date)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  inclusive DateRange → filtered RentalTable
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  summary  │  monthly / season / holiday totals
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ pipeline  │  DashboardView (metrics + summaries) → UI
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod pipeline;
pub mod summary;
