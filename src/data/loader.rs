use std::path::Path;

use crate::error::{Error, Result};

use super::model::Table;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a simulation output file as a numeric table.
///
/// Expected layout, one trial per line:
///
/// ```text
/// # equilibrium poincare h_0 h_1 ... h_N
/// 12   4096   3 17 25 9 2
/// 8    2210   1 11 30 7 0
/// ```
///
/// Fields are separated by any run of whitespace. Blank lines and `#`
/// comments are ignored. Every data line must have the same number of fields.
pub fn load_table(path: &Path) -> Result<Table> {
    let text = std::fs::read_to_string(path).map_err(|e| Error::load(path, e.to_string()))?;
    let table = parse_table(&text).map_err(|reason| Error::load(path, reason))?;
    log::info!("Loaded {} from {}", table, path.display());
    Ok(table)
}

/// Load every path in order, stopping at the first failure.
pub fn load_all<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<Table>> {
    paths.iter().map(|p| load_table(p.as_ref())).collect()
}

// ---------------------------------------------------------------------------
// Text parsing
// ---------------------------------------------------------------------------

fn parse_table(text: &str) -> std::result::Result<Table, String> {
    let mut rows: Vec<Vec<f64>> = Vec::new();

    for (line_no, line) in text.lines().enumerate() {
        let line_no = line_no + 1;
        let content = match line.find('#') {
            Some(pos) => &line[..pos],
            None => line,
        };
        if content.trim().is_empty() {
            continue;
        }

        let row = parse_row(content, line_no)?;

        if let Some(first) = rows.first() {
            if row.len() != first.len() {
                return Err(format!(
                    "line {line_no}: expected {} columns, found {}",
                    first.len(),
                    row.len()
                ));
            }
        }
        rows.push(row);
    }

    Table::from_rows(rows).ok_or_else(|| "no data rows".to_string())
}

fn parse_row(line: &str, line_no: usize) -> std::result::Result<Vec<f64>, String> {
    line.split_whitespace()
        .enumerate()
        .map(|(col, tok)| {
            tok.parse::<f64>()
                .map_err(|_| format!("line {line_no}, column {}: '{tok}' is not a number", col + 1))
        })
        .collect()
}
