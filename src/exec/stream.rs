// Output drains - one task per child pipe

use std::io;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::exec::spawn::OutputStream;
use crate::exec::types::StreamKind;

/// Initial per-line buffer; grows on demand up to `MAX_LINE_BYTES`.
pub const INITIAL_LINE_BYTES: usize = 64 * 1024;

/// Hard cap on a single logged line. Longer lines are a stream-read error.
pub const MAX_LINE_BYTES: usize = 1024 * 1024;

const COPY_CHUNK_BYTES: usize = 8 * 1024;

/// Spawn the drain for one child pipe. Must run before the child is waited
/// on: an unconsumed pipe fills its OS buffer and stalls the writer.
pub(crate) fn spawn_drain(
    stream: Option<OutputStream>,
    kind: StreamKind,
    stream_to_log: bool,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let Some(stream) = stream else {
            return;
        };
        if stream_to_log {
            drain_to_log(stream, kind, cancel).await;
        } else {
            drain_to_terminal(stream, kind, cancel).await;
        }
    })
}

/// Re-emit the pipe line by line: stdout at info, stderr at error severity.
async fn drain_to_log(stream: OutputStream, kind: StreamKind, cancel: CancellationToken) {
    let mut reader = BufReader::with_capacity(INITIAL_LINE_BYTES, stream);
    let mut line = Vec::with_capacity(INITIAL_LINE_BYTES);

    loop {
        line.clear();
        let has_line = tokio::select! {
            _ = cancel.cancelled() => {
                warn!(stream = kind.as_str(), "stream consumption cancelled");
                return;
            }
            read = read_line_capped(&mut reader, &mut line) => match read {
                Ok(has_line) => has_line,
                Err(error) => {
                    error!(stream = kind.as_str(), %error, "failed to read stream");
                    return;
                }
            }
        };

        if !has_line {
            return;
        }

        let text = String::from_utf8_lossy(&line);
        match kind {
            StreamKind::Stdout => info!("{text}"),
            StreamKind::Stderr => error!("{text}"),
        }
    }
}

/// Read one `\n`-terminated line into `line`, without the terminator.
///
/// Returns `Ok(false)` at end of stream with nothing buffered; a final
/// unterminated line comes back as a regular line. Accumulating more than
/// `MAX_LINE_BYTES` fails with `InvalidData`.
async fn read_line_capped<R>(reader: &mut R, line: &mut Vec<u8>) -> io::Result<bool>
where
    R: AsyncBufRead + Unpin,
{
    loop {
        let (found, used) = {
            let available = reader.fill_buf().await?;
            if available.is_empty() {
                return Ok(!line.is_empty());
            }
            match available.iter().position(|&byte| byte == b'\n') {
                Some(at) => {
                    line.extend_from_slice(&available[..at]);
                    (true, at + 1)
                }
                None => {
                    line.extend_from_slice(available);
                    (false, available.len())
                }
            }
        };
        reader.consume(used);

        if line.len() > MAX_LINE_BYTES {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("line exceeds {MAX_LINE_BYTES} bytes"),
            ));
        }
        if found {
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            return Ok(true);
        }
    }
}

/// Copy raw bytes to the caller's own stdout or stderr.
async fn drain_to_terminal(mut stream: OutputStream, kind: StreamKind, cancel: CancellationToken) {
    let mut sink: Box<dyn AsyncWrite + Send + Unpin> = match kind {
        StreamKind::Stdout => Box::new(tokio::io::stdout()),
        StreamKind::Stderr => Box::new(tokio::io::stderr()),
    };
    let mut buf = [0u8; COPY_CHUNK_BYTES];

    loop {
        let read = tokio::select! {
            _ = cancel.cancelled() => {
                warn!(stream = kind.as_str(), "stream consumption cancelled");
                break;
            }
            read = stream.read(&mut buf) => match read {
                Ok(0) => break,
                Ok(read) => read,
                Err(error) => {
                    error!(stream = kind.as_str(), %error, "failed to read stream");
                    break;
                }
            }
        };
        if sink.write_all(&buf[..read]).await.is_err() {
            break;
        }
    }

    let _ = sink.flush().await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reads_lines_without_terminators() {
        let mut reader = BufReader::new(b"one\ntwo\r\n".as_slice());
        let mut line = Vec::new();

        assert!(read_line_capped(&mut reader, &mut line).await.unwrap());
        assert_eq!(line, b"one");

        line.clear();
        assert!(read_line_capped(&mut reader, &mut line).await.unwrap());
        assert_eq!(line, b"two");

        line.clear();
        assert!(!read_line_capped(&mut reader, &mut line).await.unwrap());
    }

    #[tokio::test]
    async fn returns_final_unterminated_line() {
        let mut reader = BufReader::new(b"tail".as_slice());
        let mut line = Vec::new();

        assert!(read_line_capped(&mut reader, &mut line).await.unwrap());
        assert_eq!(line, b"tail");
    }

    #[tokio::test]
    async fn allows_lines_at_the_cap() {
        let mut exact = vec![b'a'; MAX_LINE_BYTES];
        exact.push(b'\n');
        let mut reader = BufReader::new(exact.as_slice());
        let mut line = Vec::new();

        assert!(read_line_capped(&mut reader, &mut line).await.unwrap());
        assert_eq!(line.len(), MAX_LINE_BYTES);
    }

    #[tokio::test]
    async fn rejects_lines_over_the_cap() {
        let oversized = vec![b'a'; MAX_LINE_BYTES + 1];
        let mut reader = BufReader::new(oversized.as_slice());
        let mut line = Vec::new();

        let error = read_line_capped(&mut reader, &mut line).await.unwrap_err();
        assert_eq!(error.kind(), io::ErrorKind::InvalidData);
    }
}
