use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::data::loader;
use crate::data::model::{
    self, Histogram, SeriesSet, Table, EQUILIBRIUM_COLUMN, POINCARE_COLUMN,
};
use crate::error::{Error, Result};
use crate::options::{self, CycleOptions, DistributionOptions, FigureOptions, OptionSet};
use crate::plot::{Drawing, Figure};

// ---------------------------------------------------------------------------
// Mode selection
// ---------------------------------------------------------------------------

/// The plot kinds selectable with `@Name`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeKind {
    Equilibrium,
    Poincare,
    Distribution,
}

impl ModeKind {
    pub const ALL: [ModeKind; 3] = [
        ModeKind::Equilibrium,
        ModeKind::Poincare,
        ModeKind::Distribution,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ModeKind::Equilibrium => "Equilibrium",
            ModeKind::Poincare => "Poincare",
            ModeKind::Distribution => "Distribution",
        }
    }

    /// One-line description for the usage text.
    pub fn summary(self) -> &'static str {
        match self {
            ModeKind::Equilibrium => "steps to first equilibrium: histogram (one file) or mean vs N",
            ModeKind::Poincare => "steps to Poincare recurrence: histogram (one file) or mean vs N",
            ModeKind::Distribution => "normalized occupation history of a single file",
        }
    }

    /// Keyword options this mode accepts, with defaults.
    pub fn help_rows(self) -> Vec<(&'static str, &'static str, String)> {
        match self {
            ModeKind::Equilibrium | ModeKind::Poincare => CycleOptions::help_rows(),
            ModeKind::Distribution => DistributionOptions::help_rows(),
        }
    }
}

impl fmt::Display for ModeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ModeKind {
    type Err = Error;

    /// Parse a `@Name` selector.
    fn from_str(s: &str) -> Result<Self> {
        let name = s.strip_prefix('@').ok_or_else(|| {
            Error::Usage(format!("expected a mode selector such as @Poincare, got '{s}'"))
        })?;
        ModeKind::ALL
            .into_iter()
            .find(|k| k.name() == name)
            .ok_or_else(|| Error::Usage(format!("'{name}' is not a recognized mode")))
    }
}

// ---------------------------------------------------------------------------
// Mode – selected plot with its resolved options
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    Equilibrium(CycleOptions),
    Poincare(CycleOptions),
    Distribution(DistributionOptions),
}

impl Mode {
    /// Resolve the user's `key=value` options against the mode's defaults.
    pub fn resolve(kind: ModeKind, raw: &BTreeMap<String, String>) -> Result<Self> {
        let mode = match kind {
            ModeKind::Equilibrium => Mode::Equilibrium(options::resolve(raw)?),
            ModeKind::Poincare => Mode::Poincare(options::resolve(raw)?),
            ModeKind::Distribution => Mode::Distribution(options::resolve(raw)?),
        };
        log::debug!("Resolved options: {mode:?}");
        Ok(mode)
    }

    pub fn kind(&self) -> ModeKind {
        match self {
            Mode::Equilibrium(_) => ModeKind::Equilibrium,
            Mode::Poincare(_) => ModeKind::Poincare,
            Mode::Distribution(_) => ModeKind::Distribution,
        }
    }

    pub fn figure_options(&self) -> &FigureOptions {
        match self {
            Mode::Equilibrium(o) | Mode::Poincare(o) => &o.figure,
            Mode::Distribution(o) => &o.figure,
        }
    }

    pub fn outfile(&self) -> &Path {
        &self.figure_options().outfile
    }

    /// Load the data files and build the figure. Nothing is drawn or written.
    pub fn prepare(&self, paths: &[PathBuf]) -> Result<Figure> {
        match self {
            Mode::Equilibrium(opts) => cycle_figure(paths, EQUILIBRIUM_COLUMN, opts),
            Mode::Poincare(opts) => cycle_figure(paths, POINCARE_COLUMN, opts),
            Mode::Distribution(opts) => distribution_figure(paths, opts),
        }
    }

    /// Prepare the figure and write it to the configured output file.
    pub fn run(&self, paths: &[PathBuf]) -> Result<()> {
        let figure = self.prepare(paths)?;
        crate::plot::render::export(&figure, self.outfile())
    }
}

// ---------------------------------------------------------------------------
// Equilibrium / Poincaré
// ---------------------------------------------------------------------------

fn cycle_figure(paths: &[PathBuf], column: usize, opts: &CycleOptions) -> Result<Figure> {
    if paths.is_empty() {
        return Err(Error::Usage("at least one data file is required".to_string()));
    }

    let tables = loader::load_all(paths)?;
    let files: Vec<(&Path, Table)> = paths.iter().map(PathBuf::as_path).zip(tables).collect();
    let series = cycle_series(&files, column)?;
    log::debug!("Cycle series over column {column}: {} points", series.len());

    let figure = match series {
        SeriesSet::Samples(samples) => {
            let histogram = Histogram::from_samples(&samples, opts.resolution);
            if histogram.bins() == 1 {
                log::warn!("All {} samples fall in a single bin", samples.len());
            }
            Figure::new(Drawing::Bars(histogram), &opts.figure, "steps", "frequency")
        }
        SeriesSet::Scaling { n, mean } => {
            let x = n.into_iter().map(|v| v as f64).collect();
            Figure::new(Drawing::Curve { x, y: mean }, &opts.figure, "N", "steps")
        }
    };
    Ok(figure)
}

/// Extract the plotted series from `column` of every loaded file.
///
/// A single file yields its raw samples. Several files yield one mean per
/// file paired with that file's particle count, sorted by particle count.
pub fn cycle_series(files: &[(&Path, Table)], column: usize) -> Result<SeriesSet> {
    let select = |path: &Path, table: &Table| {
        table
            .column(column)
            .ok_or_else(|| Error::load(path, format!("no column {}", column + 1)))
    };

    if let [(path, table)] = files {
        return Ok(SeriesSet::Samples(select(*path, table)?));
    }

    let mut pairs = Vec::with_capacity(files.len());
    for (path, table) in files {
        let samples = select(*path, table)?;
        let n = table
            .particle_count()
            .ok_or_else(|| Error::load(*path, "no history columns to derive N from"))?;
        let mean = model::mean(&samples).ok_or_else(|| Error::load(*path, "no data rows"))?;
        pairs.push((n, mean));
    }
    Ok(SeriesSet::scaling(pairs))
}

// ---------------------------------------------------------------------------
// Distribution
// ---------------------------------------------------------------------------

fn distribution_figure(paths: &[PathBuf], opts: &DistributionOptions) -> Result<Figure> {
    let path = match paths {
        [] => return Err(Error::Usage("Distribution needs one data file".to_string())),
        [path] => path,
        _ => {
            return Err(Error::Argument(format!(
                "Distribution takes exactly one data file, got {}",
                paths.len()
            )))
        }
    };

    let table = loader::load_table(path)?;
    let y = distribution(&table).ok_or_else(|| Error::load(path, "history holds no counts"))?;
    let x = (0..y.len()).map(|i| i as f64).collect();
    Ok(Figure::new(
        Drawing::Curve { x, y },
        &opts.figure,
        options::DISTRIBUTION_XLABEL,
        options::DISTRIBUTION_YLABEL,
    ))
}

/// History counts summed over all trials and scaled to sum to one.
pub fn distribution(table: &Table) -> Option<Vec<f64>> {
    model::normalize(&table.history_totals())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(width: usize, rows: &[(f64, f64)]) -> Table {
        Table::from_rows(
            rows.iter()
                .map(|&(eq, pc)| {
                    let mut row = vec![eq, pc];
                    row.extend((0..width).map(|i| i as f64 + 1.0));
                    row
                })
                .collect(),
        )
        .unwrap()
    }

    fn raw(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn selector_needs_marker_and_known_name() {
        assert_eq!("@Poincare".parse::<ModeKind>().unwrap(), ModeKind::Poincare);
        assert!(matches!("Poincare".parse::<ModeKind>(), Err(Error::Usage(_))));
        assert!(matches!("@poincare".parse::<ModeKind>(), Err(Error::Usage(_))));
        assert!(matches!("@Bogus".parse::<ModeKind>(), Err(Error::Usage(_))));
    }

    #[test]
    fn single_file_yields_raw_samples_of_selected_column() {
        let t = table(3, &[(10.0, 100.0), (12.0, 140.0)]);
        let files = [(Path::new("a.dat"), t)];
        assert_eq!(
            cycle_series(&files, EQUILIBRIUM_COLUMN).unwrap(),
            SeriesSet::Samples(vec![10.0, 12.0])
        );
        assert_eq!(
            cycle_series(&files, POINCARE_COLUMN).unwrap(),
            SeriesSet::Samples(vec![100.0, 140.0])
        );
    }

    #[test]
    fn multi_file_sorts_means_by_particle_count() {
        // history widths 3, 5, 4 give N = 2, 4, 3
        let files = [
            (Path::new("n2.dat"), table(3, &[(1.0, 20.0), (1.0, 40.0)])),
            (Path::new("n4.dat"), table(5, &[(1.0, 400.0)])),
            (Path::new("n3.dat"), table(4, &[(1.0, 90.0), (1.0, 110.0)])),
        ];
        let unsorted: Vec<usize> = files
            .iter()
            .map(|(_, t)| t.particle_count().unwrap())
            .collect();
        assert_eq!(unsorted, vec![2, 4, 3]);

        let series = cycle_series(&files, POINCARE_COLUMN).unwrap();
        assert_eq!(
            series,
            SeriesSet::Scaling {
                n: vec![2, 3, 4],
                mean: vec![30.0, 100.0, 400.0],
            }
        );
    }

    #[test]
    fn multi_file_without_history_fails() {
        let bare = Table::from_rows(vec![vec![1.0, 2.0]]).unwrap();
        let files = [
            (Path::new("a.dat"), bare.clone()),
            (Path::new("b.dat"), bare),
        ];
        assert!(matches!(
            cycle_series(&files, POINCARE_COLUMN),
            Err(Error::Load { .. })
        ));
    }

    #[test]
    fn distribution_sums_to_one() {
        let t = Table::from_rows(vec![
            vec![3.0, 8.0, 1.0, 4.0, 2.0],
            vec![5.0, 6.0, 2.0, 6.0, 1.0],
        ])
        .unwrap();
        let d = distribution(&t).unwrap();
        assert_eq!(d.len(), 3);
        assert!((d.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert!((d[1] - 10.0 / 16.0).abs() < 1e-12);
    }

    #[test]
    fn distribution_rejects_several_files_before_loading() {
        let mode = Mode::resolve(ModeKind::Distribution, &raw(&[("outfile", "d.png")])).unwrap();
        // neither file exists, so a load attempt would produce a Load error
        let paths = [PathBuf::from("/missing/a.dat"), PathBuf::from("/missing/b.dat")];
        assert!(matches!(mode.prepare(&paths), Err(Error::Argument(_))));
    }

    #[test]
    fn distribution_requires_outfile_before_rendering() {
        let err = Mode::resolve(ModeKind::Distribution, &BTreeMap::new()).unwrap_err();
        assert!(matches!(err, Error::Argument(_)));
    }

    #[test]
    fn cycle_mode_without_files_is_a_usage_error() {
        let mode = Mode::resolve(ModeKind::Equilibrium, &raw(&[("outfile", "e.png")])).unwrap();
        assert!(matches!(mode.prepare(&[]), Err(Error::Usage(_))));
    }

    #[test]
    fn poincare_over_two_files_gives_two_points() {
        let dir = tempfile::tempdir().unwrap();
        let rows = "4 10 1 2 1\n6 14 0 3 1\n5 12 2 1 1\n";
        let paths = [dir.path().join("a.dat"), dir.path().join("b.dat")];
        for p in &paths {
            std::fs::write(p, rows).unwrap();
        }

        let outfile = dir.path().join("p.svg");
        let mode = Mode::resolve(
            ModeKind::Poincare,
            &raw(&[("outfile", outfile.to_str().unwrap())]),
        )
        .unwrap();
        let figure = mode.prepare(&paths).unwrap();

        match figure.drawing {
            Drawing::Curve { x, y } => {
                assert_eq!(x, vec![2.0, 2.0]);
                assert_eq!(y, vec![12.0, 12.0]);
            }
            other => panic!("expected a curve, got {other:?}"),
        }
        assert_eq!(figure.xlabel, "N");
        assert_eq!(figure.ylabel, "steps");
        assert!(!outfile.exists());
    }

    #[test]
    fn single_file_histogram_is_normalized() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("one.dat");
        std::fs::write(&path, "4 10 1 2 1\n6 14 0 3 1\n5 12 2 1 1\n4 30 1 1 2\n").unwrap();

        let mode = Mode::resolve(ModeKind::Equilibrium, &raw(&[("outfile", "e.png")])).unwrap();
        let figure = mode.prepare(&[path]).unwrap();
        match figure.drawing {
            Drawing::Bars(h) => {
                assert!((h.frequency.iter().sum::<f64>() - 1.0).abs() < 1e-12);
            }
            other => panic!("expected bars, got {other:?}"),
        }
        assert_eq!(figure.xlabel, "steps");
    }

    #[test]
    fn user_labels_override_mode_defaults() {
        let mode = Mode::resolve(
            ModeKind::Poincare,
            &raw(&[("outfile", "p.png"), ("xlabel", "particles"), ("usetex", "False")]),
        )
        .unwrap();
        assert_eq!(mode.kind(), ModeKind::Poincare);
        assert_eq!(mode.outfile(), Path::new("p.png"));
        assert_eq!(mode.figure_options().xlabel.as_deref(), Some("particles"));
    }
}
