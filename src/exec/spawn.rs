// Spawn capability - the narrow seam between the runner and the OS
#![allow(dead_code)]

use std::io;
use std::process::{ExitStatus, Stdio};

use async_trait::async_trait;
use tokio::io::AsyncRead;
use tokio::process::Command;

use crate::exec::types::CommandSpec;

/// Boxed readable end of a child output pipe.
pub type OutputStream = Box<dyn AsyncRead + Send + Unpin>;

/// Handle to a started child process.
#[async_trait]
pub trait ChildHandle: Send {
    /// Take ownership of the stdout pipe. Returns `None` once taken.
    fn take_stdout(&mut self) -> Option<OutputStream>;

    /// Take ownership of the stderr pipe. Returns `None` once taken.
    fn take_stderr(&mut self) -> Option<OutputStream>;

    /// Wait for the child to exit.
    async fn wait(&mut self) -> io::Result<ExitStatus>;

    /// Begin terminating the child without waiting for it to exit.
    fn start_kill(&mut self) -> io::Result<()>;
}

/// Capability to start child processes from a `CommandSpec`.
pub trait Spawner: Send + Sync {
    fn spawn(&self, spec: &CommandSpec) -> io::Result<Box<dyn ChildHandle>>;
}

/// Production spawner backed by `tokio::process`.
#[derive(Debug, Default)]
pub struct TokioSpawner;

impl Spawner for TokioSpawner {
    fn spawn(&self, spec: &CommandSpec) -> io::Result<Box<dyn ChildHandle>> {
        let mut command = Command::new(&spec.program);
        command
            .args(&spec.args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        if let Some(dir) = &spec.current_dir {
            command.current_dir(dir);
        }
        for (key, value) in &spec.envs {
            command.env(key, value);
        }

        let child = command.spawn()?;
        Ok(Box::new(TokioChild { child }))
    }
}

struct TokioChild {
    child: tokio::process::Child,
}

#[async_trait]
impl ChildHandle for TokioChild {
    fn take_stdout(&mut self) -> Option<OutputStream> {
        self.child
            .stdout
            .take()
            .map(|stream| Box::new(stream) as OutputStream)
    }

    fn take_stderr(&mut self) -> Option<OutputStream> {
        self.child
            .stderr
            .take()
            .map(|stream| Box::new(stream) as OutputStream)
    }

    async fn wait(&mut self) -> io::Result<ExitStatus> {
        self.child.wait().await
    }

    fn start_kill(&mut self) -> io::Result<()> {
        self.child.start_kill()
    }
}
