//! `lolcode` — run a LOLCODE (`.lol`) source file to completion.
//!
//! The driver's job is thin by design: load the source, wire the
//! standard-streams print sink and input provider into a fresh
//! [`Interpreter`], run the lex → parse → evaluate pipeline, and surface
//! whichever error kind stopped it in its exact wire format. Anything
//! more belongs in the core crates, not here.

mod config;
mod error;

use std::fs;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser as _;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use config::Config;
use error::CliError;
use lolcode_eval::{Interpreter, StdinProvider, StdoutSink};
use lolcode_lex::Lexer;
use lolcode_par::Parser;
use lolcode_util::LolError;

fn main() -> ExitCode {
    let config = Config::parse();
    init_logging(&config);

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(RunFailure::Lol(err)) => {
            eprint!("{err}");
            ExitCode::FAILURE
        }
        Err(RunFailure::Other(err)) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

enum RunFailure {
    Lol(LolError),
    Other(anyhow::Error),
}

impl From<LolError> for RunFailure {
    fn from(err: LolError) -> Self {
        RunFailure::Lol(err)
    }
}

impl From<anyhow::Error> for RunFailure {
    fn from(err: anyhow::Error) -> Self {
        RunFailure::Other(err)
    }
}

fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.tracing_filter()));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_thread_ids(false))
        .try_init();
}

#[tracing::instrument(level = "debug", skip(config))]
fn run(config: &Config) -> Result<(), RunFailure> {
    let source = read_source(&config.source)?;

    let tokens = Lexer::new(&source).tokenize()?;
    let program = Parser::new(tokens).parse_program()?;

    let mut interpreter = Interpreter::with_io(Box::new(StdoutSink), Box::new(StdinProvider));
    interpreter.run(&program)?;

    Ok(())
}

fn read_source(path: &std::path::Path) -> Result<String, RunFailure> {
    fs::read_to_string(path)
        .map_err(|source| CliError::SourceUnreadable {
            path: path.to_path_buf(),
            source,
        })
        .with_context(|| format!("reading {}", path.display()))
        .map_err(RunFailure::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_parses_and_is_reused_by_run() {
        let config = Config::parse_from(["lolcode", "program.lol"]);
        assert_eq!(config.source.to_string_lossy(), "program.lol");
    }
}
