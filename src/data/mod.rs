/// Data layer: core types, loading, filtering and view statistics.
///
/// Architecture:
/// ```text
///  .csv / .tsv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → RawPaper rows
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  model    │  normalize (dates, journal, word count) → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  year range → FilteredView (row indices)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  stats    │  top journals, per-year counts, summary, titles
///   └──────────┘
/// ```

pub mod dates;
pub mod filter;
pub mod loader;
pub mod model;
pub mod stats;
