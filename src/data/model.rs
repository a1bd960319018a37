use std::fmt;

// ---------------------------------------------------------------------------
// Column layout of a simulation output row
// ---------------------------------------------------------------------------

/// Steps until the two boxes first held equal populations.
pub const EQUILIBRIUM_COLUMN: usize = 0;
/// Steps until the initial state recurred.
pub const POINCARE_COLUMN: usize = 1;
/// First column of the per-state history counts.
pub const HISTORY_START: usize = 2;

// ---------------------------------------------------------------------------
// Table – one loaded data file
// ---------------------------------------------------------------------------

/// A rectangular numeric table, one row per simulation trial.
///
/// Values are stored row-major. The loader guarantees every row has the same
/// width, so the table is never ragged.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    rows: usize,
    cols: usize,
    values: Vec<f64>,
}

impl Table {
    /// Build a table from rows of equal width. Returns `None` if the rows are
    /// ragged or there are none.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Option<Self> {
        let cols = rows.first()?.len();
        if rows.iter().any(|r| r.len() != cols) {
            return None;
        }
        let n_rows = rows.len();
        let values = rows.into_iter().flatten().collect();
        Some(Table {
            rows: n_rows,
            cols,
            values,
        })
    }

    /// Number of rows (trials).
    #[cfg(test)]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns, including the two step-count columns.
    #[cfg(test)]
    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.values[i * self.cols..(i + 1) * self.cols]
    }

    /// Copy out column `index`, or `None` if the table is narrower.
    pub fn column(&self, index: usize) -> Option<Vec<f64>> {
        if index >= self.cols {
            return None;
        }
        Some((0..self.rows).map(|r| self.row(r)[index]).collect())
    }

    /// Number of history columns (everything after the two step counts).
    pub fn history_width(&self) -> usize {
        self.cols.saturating_sub(HISTORY_START)
    }

    /// Particle count N: a history of N particles has N + 1 states.
    pub fn particle_count(&self) -> Option<usize> {
        self.history_width().checked_sub(1)
    }

    /// Column-wise sums of the history block over all rows.
    pub fn history_totals(&self) -> Vec<f64> {
        let mut totals = vec![0.0; self.history_width()];
        for r in 0..self.rows {
            for (total, v) in totals.iter_mut().zip(&self.row(r)[HISTORY_START..]) {
                *total += v;
            }
        }
        totals
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} rows x {} columns", self.rows, self.cols)
    }
}

// ---------------------------------------------------------------------------
// SeriesSet – what gets plotted in cycle modes
// ---------------------------------------------------------------------------

/// Extracted data for the equilibrium / Poincaré plots.
#[derive(Debug, Clone, PartialEq)]
pub enum SeriesSet {
    /// Raw per-trial step counts from a single file.
    Samples(Vec<f64>),
    /// One mean per file against its particle count, ascending in `n`.
    Scaling { n: Vec<usize>, mean: Vec<f64> },
}

impl SeriesSet {
    /// Build the multi-file series. Pairs are sorted by particle count; the
    /// sort is stable so files with equal N keep their input order.
    pub fn scaling(mut pairs: Vec<(usize, f64)>) -> Self {
        pairs.sort_by_key(|&(n, _)| n);
        let (n, mean) = pairs.into_iter().unzip();
        SeriesSet::Scaling { n, mean }
    }

    /// Number of plotted points (samples or files).
    pub fn len(&self) -> usize {
        match self {
            SeriesSet::Samples(s) => s.len(),
            SeriesSet::Scaling { n, .. } => n.len(),
        }
    }
}

/// Arithmetic mean; `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Scale `values` so they sum to one. `None` if the total is not positive.
pub fn normalize(values: &[f64]) -> Option<Vec<f64>> {
    let total: f64 = values.iter().sum();
    if total.is_nan() || total <= 0.0 {
        return None;
    }
    Some(values.iter().map(|v| v / total).collect())
}

// ---------------------------------------------------------------------------
// Histogram – normalized frequency of step counts
// ---------------------------------------------------------------------------

/// Widest span still binned on whole numbers; above it f64 no longer holds
/// every integer exactly.
const MAX_INTEGRAL_SPAN: f64 = 4_503_599_627_370_496.0; // 2^52

/// Bins of equal width with the fraction of samples falling in each.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// `frequency.len() + 1` ascending bin edges.
    pub edges: Vec<f64>,
    /// Fraction of samples per bin; sums to 1 for a non-empty sample set.
    pub frequency: Vec<f64>,
}

impl Histogram {
    /// Bin `samples` into at most `max_bins` bins.
    ///
    /// Step counts are integers, so when every sample is integral the bins are
    /// centred on whole numbers and never narrower than one step.
    pub fn from_samples(samples: &[f64], max_bins: usize) -> Self {
        let finite: Vec<f64> = samples.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.is_empty() {
            return Histogram {
                edges: Vec::new(),
                frequency: Vec::new(),
            };
        }

        let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
        let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let span = max - min;
        let integral = finite.iter().all(|v| v.fract() == 0.0);
        let max_bins = max_bins.max(1);

        let (lo, width, bins) = if integral && span < MAX_INTEGRAL_SPAN {
            let steps = span as usize + 1;
            let bins = max_bins.min(steps);
            let width = (steps as f64 / bins as f64).ceil();
            let bins = (steps as f64 / width).ceil() as usize;
            (min - 0.5, width, bins)
        } else if span == 0.0 {
            (min - 0.5, 1.0, 1)
        } else {
            (min, span / max_bins as f64, max_bins)
        };

        let mut counts = vec![0usize; bins];
        for v in &finite {
            let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
            counts[idx] += 1;
        }

        let n = finite.len() as f64;
        Histogram {
            edges: (0..=bins).map(|i| lo + i as f64 * width).collect(),
            frequency: counts.into_iter().map(|c| c as f64 / n).collect(),
        }
    }

    pub fn bins(&self) -> usize {
        self.frequency.len()
    }

    /// Iterate `(left edge, right edge, frequency)` per bin.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64, f64)> + '_ {
        self.edges
            .windows(2)
            .zip(&self.frequency)
            .map(|(e, &f)| (e[0], e[1], f))
    }
}
