/// Data layer: core types, loading, caching, and filtering.
///
/// Architecture:
/// ```text
///  uploaded .csv bytes
///        │
///        ▼
///   ┌──────────┐
///   │  cache    │  file identity → parsed Table (one entry)
///   └──────────┘
///        │ miss
///        ▼
///   ┌──────────┐
///   │  loader   │  parse CSV → Table
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Table    │  rows of CellValue, column index
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  Year / Term selection → FilteredView
///   └──────────┘
/// ```

pub mod cache;
pub mod columns;
pub mod filter;
pub mod loader;
pub mod model;
