/// Data layer: core types, loading, normalisation, filtering and pivoting.
///
/// Architecture:
/// ```text
///  .csv / .tsv / .parquet   (one per comparison)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → RawTable
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ normalize  │  canonical headers → Vec<ExpressionRecord>
///   └───────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ UnifiedTable  │  all records, tagged by comparison
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐     ┌─────────┐
///   │  filter   │ ──▶ │  pivot   │  gene × comparison matrix
///   └──────────┘     └─────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod normalize;
pub mod pivot;
