// Error types for the exec module

use std::io;
use std::process::ExitStatus;

use thiserror::Error;

/// Subprocess execution errors
#[derive(Debug, Error)]
pub enum ExecError {
    #[error("program name is empty")]
    EmptyProgram,

    #[error("failed to start {program}: {source}")]
    Start {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("command {program} failed: {status}")]
    Run { program: String, status: ExitStatus },

    #[error("failed to wait on {program}: {source}")]
    Wait {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("command {program} cancelled")]
    Cancelled { program: String },
}

pub type Result<T> = std::result::Result<T, ExecError>;
