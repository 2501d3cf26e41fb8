// Error types for the Go toolchain wrapper

use thiserror::Error;

use crate::exec::ExecError;

/// Go toolchain wrapper errors
#[derive(Debug, Error)]
pub enum GoError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("no package specified for installation")]
    NoPackages,

    #[error("failed to install {package}: {source}")]
    Install {
        package: String,
        #[source]
        source: ExecError,
    },

    #[error("failed to run '{command}': {source}")]
    ModTask {
        command: String,
        #[source]
        source: ExecError,
    },

    #[error(transparent)]
    Exec(#[from] ExecError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GoError>;
