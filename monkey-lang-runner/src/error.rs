use std::path::PathBuf;

use monkey_lang_core::parser::ParseError;
use rustyline::error::ReadlineError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunError {
    #[error("could not read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("parser errors:\n{}", format_errors(.0))]
    Parse(Vec<ParseError>),
    #[error("could not write output: {0}")]
    Output(#[from] std::io::Error),
    #[error("line editor failed: {0}")]
    Readline(#[from] ReadlineError),
}

/// One tab-indented line per error.
pub fn format_errors(errors: &[ParseError]) -> String {
    errors
        .iter()
        .map(|error| format!("\t{error}"))
        .collect::<Vec<String>>()
        .join("\n")
}
