use std::ops::Range;

use crate::data::model::Histogram;
use crate::options::FigureOptions;

use super::style::{Marker, Scale};
use super::tex;

// ---------------------------------------------------------------------------
// Figure – explicit canvas handed to the renderer
// ---------------------------------------------------------------------------

/// What the figure shows.
#[derive(Debug, Clone, PartialEq)]
pub enum Drawing {
    /// Normalized histogram, drawn as filled bars.
    Bars(Histogram),
    /// A curve through `(x[i], y[i])`.
    Curve { x: Vec<f64>, y: Vec<f64> },
}

/// Text face used for the title, labels and ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Typeface {
    SansSerif,
    /// Selected by `usetex=True`.
    Serif,
}

/// A fully described plot. Building one has no side effects; drawing it is
/// left to [`super::render::export`].
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub drawing: Drawing,
    pub title: String,
    pub xlabel: String,
    pub ylabel: String,
    pub fontsize: u32,
    pub marker: Marker,
    pub xscale: Scale,
    pub yscale: Scale,
    pub typeface: Typeface,
}

impl Figure {
    /// Combine a drawing with resolved options. Labels the user did not set
    /// fall back to `default_x` / `default_y`. With `usetex` the text goes
    /// through the TeX shim and switches to a serif face.
    pub fn new(drawing: Drawing, opts: &FigureOptions, default_x: &str, default_y: &str) -> Self {
        let text = |s: &str| {
            if opts.usetex {
                tex::render(s)
            } else {
                s.to_string()
            }
        };
        Figure {
            drawing,
            title: text(&opts.title),
            xlabel: text(opts.xlabel.as_deref().unwrap_or(default_x)),
            ylabel: text(opts.ylabel.as_deref().unwrap_or(default_y)),
            fontsize: opts.fontsize,
            marker: opts.marker.clone(),
            xscale: opts.xscale,
            yscale: opts.yscale,
            typeface: if opts.usetex {
                Typeface::Serif
            } else {
                Typeface::SansSerif
            },
        }
    }

    /// Points along x and y that must be visible.
    fn extents(&self) -> (Vec<f64>, Vec<f64>) {
        match &self.drawing {
            Drawing::Bars(h) => {
                let mut ys = h.frequency.clone();
                ys.push(0.0);
                (h.edges.clone(), ys)
            }
            Drawing::Curve { x, y } => (x.clone(), y.clone()),
        }
    }

    /// Axis ranges honouring each axis scale.
    pub fn ranges(&self) -> (Range<f64>, Range<f64>) {
        let (xs, ys) = self.extents();
        (
            axis_range(&xs, self.xscale, 0.0),
            axis_range(&ys, self.yscale, 0.05),
        )
    }
}

/// Range covering `values`, with `headroom` (fraction of the span) added on
/// top. Log axes only consider positive values and pad by a factor instead.
pub fn axis_range(values: &[f64], scale: Scale, headroom: f64) -> Range<f64> {
    let finite = values.iter().copied().filter(|v| match scale {
        Scale::Linear => v.is_finite(),
        Scale::Log => v.is_finite() && *v > 0.0,
    });
    let (min, max) = finite.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });

    if min > max {
        return match scale {
            Scale::Linear => 0.0..1.0,
            Scale::Log => 1.0..10.0,
        };
    }

    match scale {
        Scale::Linear => {
            if min == max {
                let pad = if min == 0.0 { 0.5 } else { min.abs() * 0.05 };
                return (min - pad)..(max + pad);
            }
            min..(max + (max - min) * headroom)
        }
        Scale::Log => {
            let factor = 1.0 + headroom.max(0.05) * 4.0;
            (min / factor)..(max * factor)
        }
    }
}
