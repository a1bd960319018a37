use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::PathBuf;

use crate::app::ModeKind;
use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Command line shape:  ehrenfest-plot @Mode [file...] [key=value...]
// ---------------------------------------------------------------------------

const HELP_TOKENS: [&str; 3] = ["-h", "--help", "help"];

/// What the user asked for.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Print the general usage text.
    Usage,
    /// Print one mode's options.
    ModeHelp(ModeKind),
    /// Draw a plot from the remaining tokens.
    Plot { mode: ModeKind, tokens: Tokens },
}

/// Tokens after the mode selector, split by kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tokens {
    /// Data file paths, in command-line order.
    pub positional: Vec<PathBuf>,
    /// `key=value` options; a repeated key keeps its last value.
    pub options: BTreeMap<String, String>,
}

/// Interpret the arguments following the program name.
pub fn parse_command<S: AsRef<str>>(args: &[S]) -> Result<Command> {
    let Some((selector, rest)) = args.split_first() else {
        return Ok(Command::Usage);
    };
    let selector = selector.as_ref();
    if HELP_TOKENS.contains(&selector) {
        return Ok(Command::Usage);
    }

    let mode: ModeKind = selector.parse()?;
    if let Some(next) = rest.first() {
        if HELP_TOKENS.contains(&next.as_ref()) {
            return Ok(Command::ModeHelp(mode));
        }
    }

    Ok(Command::Plot {
        mode,
        tokens: tokenize(rest)?,
    })
}

/// Split raw tokens into positional paths and `key=value` options.
///
/// A token without `=` is a path, one `=` separates a key from its value,
/// and a token with more than one `=` is rejected.
pub fn tokenize<S: AsRef<str>>(raw: &[S]) -> Result<Tokens> {
    let mut tokens = Tokens::default();
    for token in raw {
        let token = token.as_ref();
        let mut parts = token.split('=');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(path), None, _) => tokens.positional.push(PathBuf::from(path)),
            (Some(key), Some(value), None) => {
                tokens.options.insert(key.to_string(), value.to_string());
            }
            _ => {
                return Err(Error::Argument(format!(
                    "'{token}' is not a valid key=value option"
                )))
            }
        }
    }
    Ok(tokens)
}

// ---------------------------------------------------------------------------
// Help text
// ---------------------------------------------------------------------------

pub fn usage(program: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Visualize output of the Ehrenfest model simulation.\n");
    let _ = writeln!(out, "usage: {program} @Mode [file...] [key=value...]");
    let _ = writeln!(out, "       {program} @Mode --help\n");
    let _ = writeln!(out, "modes:");
    for kind in ModeKind::ALL {
        let _ = writeln!(out, "  @{:<14}{}", kind.name(), kind.summary());
    }
    let _ = writeln!(out, "\ndata files hold one trial per line:");
    let _ = writeln!(out, "  <equilibrium steps> <poincare steps> <h_0> ... <h_N>");
    let _ = writeln!(
        out,
        "\nthe output format follows the outfile extension (png, jpg, bmp, tiff, gif, svg)."
    );
    let _ = writeln!(out, "set RUST_LOG=info (or debug) for progress messages.");
    out
}

pub fn mode_help(program: &str, kind: ModeKind) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "@{}: {}\n", kind.name(), kind.summary());
    let files = match kind {
        ModeKind::Distribution => "file",
        ModeKind::Equilibrium | ModeKind::Poincare => "file...",
    };
    let _ = writeln!(out, "usage: {program} @{} {files} [key=value...]\n", kind.name());
    let _ = writeln!(out, "options:");
    for (key, ty, default) in kind.help_rows() {
        let _ = writeln!(out, "  {key:<12}{ty:<12}{default}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_paths_from_options() {
        let t = tokenize(&["a.dat", "b.dat", "outfile=x.png", "usetex=False"]).unwrap();
        assert_eq!(t.positional, vec![PathBuf::from("a.dat"), PathBuf::from("b.dat")]);
        assert_eq!(t.options.len(), 2);
        assert_eq!(t.options["outfile"], "x.png");
        assert_eq!(t.options["usetex"], "False");
    }

    #[test]
    fn two_equals_signs_is_an_argument_error() {
        let err = tokenize(&["a=b=c"]).unwrap_err();
        assert!(matches!(err, Error::Argument(ref m) if m.contains("a=b=c")), "{err}");
    }

    #[test]
    fn empty_value_and_repeated_keys() {
        let t = tokenize(&["title=", "fontsize=10", "fontsize=12"]).unwrap();
        assert_eq!(t.options["title"], "");
        assert_eq!(t.options["fontsize"], "12");
    }

    #[test]
    fn no_arguments_prints_usage() {
        assert_eq!(parse_command::<&str>(&[]).unwrap(), Command::Usage);
        assert_eq!(parse_command(&["--help"]).unwrap(), Command::Usage);
    }

    #[test]
    fn help_after_mode_prints_mode_help() {
        for h in HELP_TOKENS {
            assert_eq!(
                parse_command(&["@Distribution", h]).unwrap(),
                Command::ModeHelp(ModeKind::Distribution)
            );
        }
    }

    #[test]
    fn bad_selector_is_a_usage_error() {
        assert!(matches!(parse_command(&["@Nope"]), Err(Error::Usage(_))));
        assert!(matches!(parse_command(&["a.dat"]), Err(Error::Usage(_))));
    }

    #[test]
    fn plot_command_carries_tokens() {
        let cmd = parse_command(&["@Poincare", "a.dat", "outfile=p.svg"]).unwrap();
        match cmd {
            Command::Plot { mode, tokens } => {
                assert_eq!(mode, ModeKind::Poincare);
                assert_eq!(tokens.positional, vec![PathBuf::from("a.dat")]);
                assert_eq!(tokens.options["outfile"], "p.svg");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn help_texts_list_modes_and_options() {
        let u = usage("ehrenfest-plot");
        for kind in ModeKind::ALL {
            assert!(u.contains(&format!("@{}", kind.name())));
        }
        let h = mode_help("ehrenfest-plot", ModeKind::Equilibrium);
        assert!(h.contains("resolution"));
        assert!(h.contains("usetex"));
        assert!(!mode_help("ehrenfest-plot", ModeKind::Distribution).contains("resolution"));
    }
}
