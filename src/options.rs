use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::plot::style::{Marker, Scale};

// ---------------------------------------------------------------------------
// Shared figure options
// ---------------------------------------------------------------------------

/// Options every plot mode understands.
#[derive(Debug, Clone, PartialEq)]
pub struct FigureOptions {
    pub title: String,
    /// `None` lets the mode pick a label suited to what it draws.
    pub xlabel: Option<String>,
    pub ylabel: Option<String>,
    pub marker: Marker,
    pub fontsize: u32,
    pub outfile: PathBuf,
    pub usetex: bool,
    pub xscale: Scale,
    pub yscale: Scale,
}

impl Default for FigureOptions {
    fn default() -> Self {
        Self {
            title: String::new(),
            xlabel: None,
            ylabel: None,
            marker: Marker::default(),
            fontsize: 14,
            outfile: PathBuf::new(),
            usetex: true,
            xscale: Scale::Linear,
            yscale: Scale::Linear,
        }
    }
}

impl FigureOptions {
    const KEYS: &'static [&'static str] = &[
        "title", "xlabel", "ylabel", "marker", "fontsize", "outfile", "usetex", "xscale", "yscale",
    ];

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "title" => self.title = value.to_string(),
            "xlabel" => self.xlabel = Some(value.to_string()),
            "ylabel" => self.ylabel = Some(value.to_string()),
            "marker" => {
                self.marker = value
                    .parse()
                    .map_err(|_| Error::type_error(key, value, "marker format"))?
            }
            "fontsize" => self.fontsize = parse_fontsize(key, value)?,
            "outfile" => self.outfile = PathBuf::from(value),
            "usetex" => self.usetex = parse_bool(key, value)?,
            "xscale" => self.xscale = parse_scale(key, value)?,
            "yscale" => self.yscale = parse_scale(key, value)?,
            _ => return Err(unrecognized(key)),
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Per-mode option sets
// ---------------------------------------------------------------------------

/// A mode's complete set of recognized options with their defaults.
pub trait OptionSet: Default {
    /// Every key accepted on the command line.
    fn keys() -> Vec<&'static str>;

    /// Overwrite one option from its raw string value.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    fn figure(&self) -> &FigureOptions;

    /// `(key, type, default)` rows for the mode's help text.
    fn help_rows() -> Vec<(&'static str, &'static str, String)>;
}

/// Options for the equilibrium and Poincaré plots.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleOptions {
    /// Upper bound on the number of histogram bins.
    pub resolution: usize,
    pub figure: FigureOptions,
}

impl Default for CycleOptions {
    fn default() -> Self {
        Self {
            resolution: 1000,
            figure: FigureOptions::default(),
        }
    }
}

impl OptionSet for CycleOptions {
    fn keys() -> Vec<&'static str> {
        let mut keys = vec!["resolution"];
        keys.extend_from_slice(FigureOptions::KEYS);
        keys
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "resolution" => self.resolution = parse_int(key, value)?,
            _ => self.figure.set(key, value)?,
        }
        Ok(())
    }

    fn figure(&self) -> &FigureOptions {
        &self.figure
    }

    fn help_rows() -> Vec<(&'static str, &'static str, String)> {
        let mut rows = vec![("resolution", "int", "1000 (max histogram bins)".to_string())];
        rows.extend(figure_help_rows(
            "steps (one file) / N (several)",
            "frequency (one file) / steps (several)",
        ));
        rows
    }
}

/// Options for the distribution-history plot.
#[derive(Debug, Clone, PartialEq)]
pub struct DistributionOptions {
    pub figure: FigureOptions,
}

pub const DISTRIBUTION_XLABEL: &str = "distribution (box1:box2)";
pub const DISTRIBUTION_YLABEL: &str = "frequency";

impl Default for DistributionOptions {
    fn default() -> Self {
        Self {
            figure: FigureOptions {
                xlabel: Some(DISTRIBUTION_XLABEL.to_string()),
                ylabel: Some(DISTRIBUTION_YLABEL.to_string()),
                ..FigureOptions::default()
            },
        }
    }
}

impl OptionSet for DistributionOptions {
    fn keys() -> Vec<&'static str> {
        FigureOptions::KEYS.to_vec()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.figure.set(key, value)
    }

    fn figure(&self) -> &FigureOptions {
        &self.figure
    }

    fn help_rows() -> Vec<(&'static str, &'static str, String)> {
        figure_help_rows(DISTRIBUTION_XLABEL, DISTRIBUTION_YLABEL)
    }
}

fn figure_help_rows(xlabel: &str, ylabel: &str) -> Vec<(&'static str, &'static str, String)> {
    let d = FigureOptions::default();
    vec![
        ("marker", "str", d.marker.to_string()),
        ("xlabel", "str", xlabel.to_string()),
        ("ylabel", "str", ylabel.to_string()),
        ("title", "str", "(empty)".to_string()),
        ("fontsize", "int", d.fontsize.to_string()),
        ("outfile", "path", "(required)".to_string()),
        ("usetex", "bool", python_bool(d.usetex).to_string()),
        ("xscale", "linear|log", d.xscale.to_string()),
        ("yscale", "linear|log", d.yscale.to_string()),
    ]
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Merge user `key=value` overrides into the mode defaults.
///
/// Fails on the first unrecognized key or value that does not coerce, and
/// when no output file was given.
pub fn resolve<T: OptionSet>(raw: &BTreeMap<String, String>) -> Result<T> {
    let keys = T::keys();
    let mut options = T::default();
    for (key, value) in raw {
        if !keys.contains(&key.as_str()) {
            return Err(unrecognized(key));
        }
        options.set(key, value)?;
    }

    if options.figure().outfile.as_os_str().is_empty() {
        return Err(Error::Argument(
            "outfile is required (e.g. outfile=figure.png)".to_string(),
        ));
    }
    Ok(options)
}

const MAX_FONTSIZE: u32 = 512;

fn unrecognized(key: &str) -> Error {
    Error::Argument(format!("'{key}' is not a recognized option"))
}

fn parse_int<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| Error::type_error(key, value, "non-negative integer"))
}

/// Font size in points, limited to what fits on the canvas.
fn parse_fontsize(key: &str, value: &str) -> Result<u32> {
    match parse_int::<u32>(key, value)? {
        size @ 1..=MAX_FONTSIZE => Ok(size),
        _ => Err(Error::type_error(key, value, "font size between 1 and 512")),
    }
}

/// Only the literal strings `True` and `False` are booleans.
fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value {
        "True" => Ok(true),
        "False" => Ok(false),
        _ => Err(Error::type_error(key, value, "boolean (True or False)")),
    }
}

fn parse_scale(key: &str, value: &str) -> Result<Scale> {
    value
        .parse()
        .map_err(|_| Error::type_error(key, value, "scale (linear or log)"))
}

fn python_bool(b: bool) -> &'static str {
    if b {
        "True"
    } else {
        "False"
    }
}
