mod app;
mod cli;
mod data;
mod error;
mod options;
mod plot;

use std::process::ExitCode;

use anyhow::Context;

use app::Mode;
use cli::Command;

fn main() -> ExitCode {
    env_logger::init();

    let mut args = std::env::args();
    let program = args.next().unwrap_or_else(|| "ehrenfest-plot".to_string());
    let args: Vec<String> = args.collect();

    match run(&program, &args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(program: &str, args: &[String]) -> anyhow::Result<()> {
    match cli::parse_command(args)? {
        Command::Usage => print!("{}", cli::usage(program)),
        Command::ModeHelp(kind) => print!("{}", cli::mode_help(program, kind)),
        Command::Plot { mode, tokens } => {
            let mode = Mode::resolve(mode, &tokens.options)
                .with_context(|| format!("@{mode} options"))?;
            mode.run(&tokens.positional)
                .with_context(|| format!("@{} plot", mode.kind()))?;
        }
    }
    Ok(())
}
