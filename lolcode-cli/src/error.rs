//! Error handling for the `lolcode` terminal driver.
//!
//! `lolcode-lex`/`lolcode-par`/`lolcode-eval` already return the core's
//! `LolError`, which renders to the exact wire format a user expects to
//! see on stderr. This module only adds the one error class the core
//! itself never produces: a source file that cannot be read.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Could not Read Source File '{path}': {source}")]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
