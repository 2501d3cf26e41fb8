// Runner - spawns a child, drains both pipes, waits, classifies the outcome

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::exec::error::{ExecError, Result};
use crate::exec::spawn::{Spawner, TokioSpawner};
use crate::exec::stream::spawn_drain;
use crate::exec::types::{CommandSpec, StreamKind};

/// Subprocess runner. Cheap to clone; construct one and hand it to whichever
/// wrapper needs it.
#[derive(Clone)]
pub struct Runner {
    spawner: Arc<dyn Spawner>,
}

impl Runner {
    /// Runner backed by the system spawner.
    pub fn new() -> Self {
        Self {
            spawner: Arc::new(TokioSpawner),
        }
    }

    /// Runner backed by a custom spawner.
    pub fn with_spawner(spawner: Arc<dyn Spawner>) -> Self {
        Self { spawner }
    }

    /// Run `program` with `args`, inheriting stdin and the caller's
    /// environment. Output goes through the logging sink when
    /// `stream_to_log` is set, otherwise straight to the terminal.
    pub async fn run(
        &self,
        cancel: &CancellationToken,
        program: &str,
        stream_to_log: bool,
        args: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<()> {
        self.run_spec(cancel, CommandSpec::new(program, args), stream_to_log)
            .await
    }

    /// Run a full `CommandSpec`, for invocations that need a working
    /// directory or environment overrides.
    pub async fn run_spec(
        &self,
        cancel: &CancellationToken,
        spec: CommandSpec,
        stream_to_log: bool,
    ) -> Result<()> {
        if spec.program.is_empty() {
            return Err(ExecError::EmptyProgram);
        }

        debug!(program = %spec.program, args = ?spec.args, "spawning");

        let mut child = self
            .spawner
            .spawn(&spec)
            .map_err(|source| ExecError::Start {
                program: spec.program.clone(),
                source,
            })?;

        let stdout = child.take_stdout();
        let stderr = child.take_stderr();

        // Drains must start before the wait: a full pipe buffer blocks the child.
        let out_drain = spawn_drain(stdout, StreamKind::Stdout, stream_to_log, cancel.clone());
        let err_drain = spawn_drain(stderr, StreamKind::Stderr, stream_to_log, cancel.clone());

        let mut cancelled = false;
        let waited = tokio::select! {
            waited = child.wait() => waited,
            _ = cancel.cancelled() => {
                cancelled = true;
                warn!(program = %spec.program, "cancellation requested, terminating child");
                if let Err(error) = child.start_kill() {
                    warn!(program = %spec.program, %error, "failed to terminate child");
                }
                child.wait().await
            }
        };

        // Join both drains so tail output lands before the result does.
        let _ = out_drain.await;
        let _ = err_drain.await;

        if cancelled {
            return Err(ExecError::Cancelled {
                program: spec.program,
            });
        }

        match waited {
            Ok(status) if status.success() => Ok(()),
            Ok(status) => {
                if cancel.is_cancelled() {
                    Err(ExecError::Cancelled {
                        program: spec.program,
                    })
                } else {
                    Err(ExecError::Run {
                        program: spec.program,
                        status,
                    })
                }
            }
            Err(source) => {
                if cancel.is_cancelled() {
                    Err(ExecError::Cancelled {
                        program: spec.program,
                    })
                } else {
                    Err(ExecError::Wait {
                        program: spec.program,
                        source,
                    })
                }
            }
        }
    }
}

impl Default for Runner {
    fn default() -> Self {
        Self::new()
    }
}
