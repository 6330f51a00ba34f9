use std::process::ExitStatus;

use gocanon_syntax::{ParseFailure, PrintError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FormatError {
    /// The source did not parse; nothing was changed.
    #[error("parse failed: {0}")]
    Parse(#[from] ParseFailure),
    #[error("cannot print tree: {0}")]
    Serialization(#[from] PrintError),
    #[error(transparent)]
    ExternalTool(#[from] ToolError),
}

/// Failures of the base formatter subprocess.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("base formatter `{0}` not found")]
    NotFound(String),
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },
    #[error("`{command}` exited with {status}: {stderr}")]
    Failed {
        command: String,
        status: ExitStatus,
        stderr: String,
    },
    #[error("`{0}` produced invalid UTF-8")]
    InvalidOutput(String),
}
