/// Data layer: core types, loading, filtering, summaries and export.
///
/// Architecture:
/// ```text
///  .csv (;) / .xlsx upload bytes
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse bytes → Dataset (csv first, spreadsheet fallback)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  age range, then 8 categorical allow-lists → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  summary  │  target value → percentage
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  export   │  Dataset → csv / xlsx bytes
///   └──────────┘
/// ```

pub mod error;
pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod summary;
