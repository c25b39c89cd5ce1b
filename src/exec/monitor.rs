// src/exec/monitor.rs

//! Line reader for the application's combined output stream.

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader, Split};

/// One read from the output stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonitorRead {
    /// A non-empty line, terminator stripped.
    Line(String),
    /// An empty line. Not echoed or classified.
    Blank,
    /// The stream reported end-of-file.
    Exhausted,
}

/// Reads the combined stdout/stderr of the application one line at a time.
///
/// Bytes that are not valid UTF-8 are replaced rather than treated as a read
/// failure, so a binary blob in the output cannot abort a run.
pub struct OutputMonitor<R> {
    segments: Split<BufReader<R>>,
    exhausted: bool,
}

impl<R: AsyncRead + Unpin> OutputMonitor<R> {
    pub fn new(stream: R) -> Self {
        Self {
            segments: BufReader::new(stream).split(b'\n'),
            exhausted: false,
        }
    }

    /// Whether end-of-file has been observed.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Read the next line.
    ///
    /// Cancel safe: if the future is dropped before completing, no data is
    /// lost and the next call resumes where this one left off.
    pub async fn next_line(&mut self) -> std::io::Result<MonitorRead> {
        match self.segments.next_segment().await? {
            Some(mut bytes) => {
                if bytes.last() == Some(&b'\r') {
                    bytes.pop();
                }
                if bytes.is_empty() {
                    Ok(MonitorRead::Blank)
                } else {
                    Ok(MonitorRead::Line(String::from_utf8_lossy(&bytes).into_owned()))
                }
            }
            None => {
                self.exhausted = true;
                Ok(MonitorRead::Exhausted)
            }
        }
    }
}
