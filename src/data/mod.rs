/// Data layer: core table types and CSV ingestion.
///
/// Architecture:
/// ```text
///      .csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse stream → DataTable
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ DataTable │  Vec<DataPoint>, ordered parameter names
///   └──────────┘
///        │
///        ├──► analysis  (delta series, nearest-X lookup)
///        └──► chart     (batched overview + delta plot specs)
/// ```
///
/// The table is populated exactly once by the loader and read-only afterwards.

pub mod loader;
pub mod model;
