/// Data layer: loading, preparation, filtering, and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → RawTable
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ prepare   │  coerce cells, derive net profit & calendar keys
///   └──────────┘      → SalesDataset (immutable, cached per path)
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  year/category/payment/validity → index view
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ aggregate │  monthly trend, product rollup, segment query
///   └──────────┘
/// ```

pub mod aggregate;
pub mod cache;
pub mod filter;
pub mod loader;
pub mod model;
pub mod prepare;
