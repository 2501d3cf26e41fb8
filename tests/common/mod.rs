// Shared test doubles and helpers
#![allow(dead_code)]

use std::io::{self, Write};
use std::process::ExitStatus;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::exec::spawn::{ChildHandle, OutputStream, Spawner};
use crate::exec::types::CommandSpec;

/// Spawner double that records every spec and hands out canned children.
pub struct RecordingSpawner {
    calls: Mutex<Vec<CommandSpec>>,
    exit_code: i32,
    stdout: &'static [u8],
    stderr: &'static [u8],
}

impl RecordingSpawner {
    pub fn succeeding() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            exit_code: 0,
            stdout: b"",
            stderr: b"",
        })
    }

    pub fn with_exit_code(exit_code: i32) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            exit_code,
            stdout: b"",
            stderr: b"",
        })
    }

    pub fn with_output(stdout: &'static [u8], stderr: &'static [u8]) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            exit_code: 0,
            stdout,
            stderr,
        })
    }

    pub fn recorded(&self) -> Vec<CommandSpec> {
        self.calls.lock().unwrap().clone()
    }
}

impl Spawner for RecordingSpawner {
    fn spawn(&self, spec: &CommandSpec) -> io::Result<Box<dyn ChildHandle>> {
        self.calls.lock().unwrap().push(spec.clone());
        Ok(Box::new(CannedChild {
            stdout: Some(Box::new(self.stdout)),
            stderr: Some(Box::new(self.stderr)),
            exit_code: self.exit_code,
        }))
    }
}

/// Spawner double whose spawn always fails.
pub struct FailingSpawner;

impl Spawner for FailingSpawner {
    fn spawn(&self, _spec: &CommandSpec) -> io::Result<Box<dyn ChildHandle>> {
        Err(io::Error::new(io::ErrorKind::NotFound, "no such program"))
    }
}

/// Child double with canned streams and exit code.
struct CannedChild {
    stdout: Option<OutputStream>,
    stderr: Option<OutputStream>,
    exit_code: i32,
}

#[async_trait]
impl ChildHandle for CannedChild {
    fn take_stdout(&mut self) -> Option<OutputStream> {
        self.stdout.take()
    }

    fn take_stderr(&mut self) -> Option<OutputStream> {
        self.stderr.take()
    }

    async fn wait(&mut self) -> io::Result<ExitStatus> {
        Ok(exit_status(self.exit_code))
    }

    fn start_kill(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Build a real `ExitStatus` from a plain exit code.
#[cfg(unix)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    ExitStatus::from_raw(code << 8)
}

/// Captures formatted log output for assertions.
pub struct LogCapture {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    /// Install a capturing subscriber as the thread default. Keep the guard
    /// alive for the duration of the test.
    pub fn install() -> (Self, tracing::subscriber::DefaultGuard) {
        let buf = Arc::new(Mutex::new(Vec::new()));
        let writer_buf = Arc::clone(&buf);
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_target(false)
            .with_ansi(false)
            .with_writer(move || CaptureWriter(Arc::clone(&writer_buf)))
            .finish();
        let guard = tracing::subscriber::set_default(subscriber);
        (Self { buf }, guard)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buf.lock().unwrap()).into_owned()
    }
}

pub struct CaptureWriter(Arc<Mutex<Vec<u8>>>);

impl Write for CaptureWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
