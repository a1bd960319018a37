/// Data layer: loading simulation output and reducing it to plottable series.
///
/// Architecture:
/// ```text
///  trial rows:  equilibrium  poincare  h_0 … h_N
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse whitespace table → Table
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  model    │  column / history reductions → SeriesSet, Histogram
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
