use std::collections::VecDeque;
use std::io::{ErrorKind, Read};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chunkframe_transport::ByteStream;
use tracing::debug;

use crate::error::{FrameError, Result};
use crate::packet::Packet;
use crate::session::{FramingSession, SessionStats};
use crate::sink::PacketSink;

/// Default size of a single read: 4 KiB.
pub const DEFAULT_READ_CHUNK_SIZE: usize = 4 * 1024;

/// Configuration for the blocking read loop.
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Maximum bytes requested per read. Default: 4 KiB.
    pub chunk_size: usize,
    /// Read timeout applied to socket sources. A timed-out read is an idle
    /// tick of [`PacketReader::run`], not an error.
    pub read_timeout: Option<Duration>,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_READ_CHUNK_SIZE,
            read_timeout: None,
        }
    }
}

/// Reads raw chunks from any `Read` source and frames them into packets.
///
/// One read buffer is reused for every chunk.
pub struct PacketReader<T> {
    inner: T,
    session: FramingSession,
    pending: VecDeque<Packet>,
    chunk: Vec<u8>,
}

impl<T: Read> PacketReader<T> {
    /// Create a packet reader with default read configuration.
    pub fn new(inner: T, session: FramingSession) -> Self {
        Self::with_config(inner, session, ReaderConfig::default())
    }

    /// Create a packet reader with explicit read configuration.
    pub fn with_config(inner: T, session: FramingSession, config: ReaderConfig) -> Self {
        Self {
            inner,
            session,
            pending: VecDeque::new(),
            chunk: vec![0u8; config.chunk_size.max(1)],
        }
    }

    /// Read the next packet (blocking).
    ///
    /// Returns `Err(FrameError::ConnectionClosed)` at end of stream; bytes
    /// still waiting for a delimiter are dropped.
    pub fn read_packet(&mut self) -> Result<Packet> {
        loop {
            if let Some(packet) = self.pending.pop_front() {
                return Ok(packet);
            }

            let read = match self.inner.read(&mut self.chunk) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            };

            if read == 0 {
                self.end_of_stream();
                return Err(FrameError::ConnectionClosed);
            }

            self.session
                .feed_into(&self.chunk[..read], &mut self.pending);
        }
    }

    /// Read and frame until end of stream or until `running` is cleared.
    ///
    /// `running` is checked once per iteration, so a cleared flag takes
    /// effect after the read in progress returns. End of stream finishes the
    /// loop successfully.
    pub fn run<S: PacketSink + ?Sized>(
        &mut self,
        sink: &mut S,
        running: &AtomicBool,
    ) -> Result<SessionStats> {
        while let Some(packet) = self.pending.pop_front() {
            sink.deliver(packet);
        }

        while running.load(Ordering::SeqCst) {
            let read = match self.inner.read(&mut self.chunk) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err)
                    if matches!(err.kind(), ErrorKind::TimedOut | ErrorKind::WouldBlock) =>
                {
                    continue
                }
                Err(err) => return Err(FrameError::Io(err)),
            };

            if read == 0 {
                self.end_of_stream();
                break;
            }

            self.session.feed_into(&self.chunk[..read], sink);
        }

        Ok(self.session.stats())
    }

    fn end_of_stream(&mut self) {
        debug!(pending = self.session.buffered(), "end of stream");
        self.session.reset();
    }

    /// Discard buffered bytes and queued packets, e.g. after reconnecting.
    pub fn reset(&mut self) {
        self.pending.clear();
        self.session.reset();
    }

    /// The framing session driven by this reader.
    pub fn session(&self) -> &FramingSession {
        &self.session
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl PacketReader<ByteStream> {
    /// Create a packet reader for `ByteStream` and apply read timeout from config.
    pub fn with_config_stream(
        inner: ByteStream,
        session: FramingSession,
        config: ReaderConfig,
    ) -> Result<Self> {
        inner
            .set_read_timeout(config.read_timeout)
            .map_err(transport_to_frame_error)?;
        Ok(Self::with_config(inner, session, config))
    }
}

fn transport_to_frame_error(err: chunkframe_transport::TransportError) -> FrameError {
    match err {
        chunkframe_transport::TransportError::Io(io) => FrameError::Io(io),
        chunkframe_transport::TransportError::Connect { source, .. }
        | chunkframe_transport::TransportError::Open { source, .. } => FrameError::Io(source),
        other => FrameError::Io(std::io::Error::other(other.to_string())),
    }
}
