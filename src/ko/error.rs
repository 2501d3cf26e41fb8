// Error types for the ko wrapper

use thiserror::Error;

use crate::exec::ExecError;

/// Ko wrapper errors
#[derive(Debug, Error)]
pub enum KoError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error(transparent)]
    Exec(#[from] ExecError),
}

pub type Result<T> = std::result::Result<T, KoError>;
