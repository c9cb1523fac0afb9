/// Data layer: listing types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → drop invalid rows → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  Vec<Listing>, sorted models, column bounds
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  ranges ∧ model set → filtered indices
///   └──────────┘
///        │
///        ├──────────────┐
///        ▼              ▼
///   ┌──────────┐   ┌───────────┐
///   │  stats    │   │ histogram │
///   └──────────┘   └───────────┘
/// ```

pub mod filter;
pub mod histogram;
pub mod loader;
pub mod model;
pub mod stats;
