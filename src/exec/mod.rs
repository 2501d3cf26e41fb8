// Exec module - generic subprocess execution with streamed output

pub mod error;
pub mod runner;
pub mod spawn;
pub mod stream;
pub mod types;

pub use error::{ExecError, Result};
pub use runner::Runner;
pub use spawn::{ChildHandle, OutputStream, Spawner, TokioSpawner};
pub use types::{CommandSpec, StreamKind};
