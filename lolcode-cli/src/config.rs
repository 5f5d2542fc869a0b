//! Command-line configuration for the `lolcode` terminal driver.
//!
//! A `clap`-derived struct scaled down to the one thing this driver
//! does: run a single `.lol` source file to completion.

use std::path::PathBuf;

use clap::Parser;

/// Run a LOLCODE (`.lol`) source file.
#[derive(Parser, Debug)]
#[command(name = "lolcode")]
#[command(author = "LOLCode Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Run a LOLCODE (.lol) source file", long_about = None)]
pub struct Config {
    /// Path to the `.lol` source file to run
    pub source: PathBuf,

    /// Increase logging verbosity (repeatable: -v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbosity: u8,
}

impl Config {
    /// Translates the repeated `-v` count into a `tracing` filter
    /// directive, matching the `lolcode=` target used by every pipeline
    /// stage's `#[tracing::instrument]` spans.
    pub fn tracing_filter(&self) -> &'static str {
        match self.verbosity {
            0 => "lolcode=warn",
            1 => "lolcode=info",
            2 => "lolcode=debug",
            _ => "lolcode=trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_source_path() {
        let config = Config::parse_from(["lolcode", "program.lol"]);
        assert_eq!(config.source, PathBuf::from("program.lol"));
        assert_eq!(config.verbosity, 0);
    }

    #[test]
    fn repeated_verbose_flags_accumulate() {
        let config = Config::parse_from(["lolcode", "-vv", "program.lol"]);
        assert_eq!(config.verbosity, 2);
        assert_eq!(config.tracing_filter(), "lolcode=debug");
    }
}
