// Error types for the Helm wrapper

use thiserror::Error;

use crate::exec::ExecError;

/// Helm wrapper errors
#[derive(Debug, Error)]
pub enum HelmError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error(transparent)]
    Exec(#[from] ExecError),
}

pub type Result<T> = std::result::Result<T, HelmError>;
