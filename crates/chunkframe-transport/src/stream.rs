use std::fs::File;
use std::io::Read;
use std::net::TcpStream;
use std::time::Duration;

use crate::error::Result;

/// An open byte source. Implements `Read`.
///
/// Every endpoint kind opens into this type, so the read loop is written once.
pub struct ByteStream {
    inner: ByteStreamInner,
    label: String,
}

enum ByteStreamInner {
    Tcp(TcpStream),
    #[cfg(unix)]
    Unix(std::os::unix::net::UnixStream),
    File(File),
    Stdin(std::io::Stdin),
}

impl Read for ByteStream {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match &mut self.inner {
            ByteStreamInner::Tcp(stream) => stream.read(buf),
            #[cfg(unix)]
            ByteStreamInner::Unix(stream) => stream.read(buf),
            ByteStreamInner::File(file) => file.read(buf),
            ByteStreamInner::Stdin(stdin) => stdin.read(buf),
        }
    }
}

impl ByteStream {
    pub(crate) fn from_tcp(stream: TcpStream, label: String) -> Self {
        Self {
            inner: ByteStreamInner::Tcp(stream),
            label,
        }
    }

    #[cfg(unix)]
    pub(crate) fn from_unix(stream: std::os::unix::net::UnixStream, label: String) -> Self {
        Self {
            inner: ByteStreamInner::Unix(stream),
            label,
        }
    }

    pub(crate) fn from_file(file: File, label: String) -> Self {
        Self {
            inner: ByteStreamInner::File(file),
            label,
        }
    }

    /// Wrap the process's standard input.
    pub fn stdin() -> Self {
        Self {
            inner: ByteStreamInner::Stdin(std::io::stdin()),
            label: "stdin".to_string(),
        }
    }

    /// Set read timeout on the underlying socket.
    ///
    /// Files and stdin have no read timeout; the call is a no-op for them.
    pub fn set_read_timeout(&self, timeout: Option<Duration>) -> Result<()> {
        match &self.inner {
            ByteStreamInner::Tcp(stream) => stream.set_read_timeout(timeout).map_err(Into::into),
            #[cfg(unix)]
            ByteStreamInner::Unix(stream) => stream.set_read_timeout(timeout).map_err(Into::into),
            ByteStreamInner::File(_) | ByteStreamInner::Stdin(_) => {
                if timeout.is_some() {
                    tracing::debug!(source = %self.label, "read timeout not supported; ignoring");
                }
                Ok(())
            }
        }
    }

    /// Whether the source is a socket.
    pub fn is_socket(&self) -> bool {
        match &self.inner {
            ByteStreamInner::Tcp(_) => true,
            #[cfg(unix)]
            ByteStreamInner::Unix(_) => true,
            ByteStreamInner::File(_) | ByteStreamInner::Stdin(_) => false,
        }
    }

    /// Human-readable description of the source, for logs.
    pub fn describe(&self) -> &str {
        &self.label
    }
}

impl std::fmt::Debug for ByteStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match &self.inner {
            ByteStreamInner::Tcp(_) => "tcp",
            #[cfg(unix)]
            ByteStreamInner::Unix(_) => "unix",
            ByteStreamInner::File(_) => "file",
            ByteStreamInner::Stdin(_) => "stdin",
        };
        f.debug_struct("ByteStream")
            .field("type", &kind)
            .field("source", &self.label)
            .finish()
    }
}
