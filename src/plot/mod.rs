/// Plot layer: a [`Figure`] value describes the chart, `render` draws it.
///
/// ```text
///   SeriesSet / distribution  +  FigureOptions
///                  │
///                  ▼
///            ┌──────────┐
///            │  figure   │  labels, scales, marker, typeface
///            └──────────┘
///                  │
///                  ▼
///            ┌──────────┐
///            │  render   │  plotters → png / jpg / bmp / tiff / gif / svg
///            └──────────┘
/// ```

pub mod figure;
pub mod render;
pub mod style;
pub mod tex;

pub use figure::{Drawing, Figure};
