/// Data layer: typed model, loading, filtering and derived views.
///
/// Architecture:
/// ```text
///  .csv / .tsv / .xls / .xlsx
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  model    │  immutable columns, numeric / categorical
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  numeric range bounds → working Dataset
///   └──────────┘
///        │
///        ▼
///   ┌─────────────────────────────┐
///   │ preview · summary · plots   │  derived views
///   └─────────────────────────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod plots;
pub mod preview;
pub mod summary;
