//! Delimiter-based packet reassembly for chunked byte streams.
//!
//! Raw chunks from a socket or serial line are appended to an accumulation
//! buffer and scanned for packet boundaries using one of two strategies:
//! - Fixed-length windows bounded by a start byte and a stop byte
//! - Variable-length packets terminated by a multi-byte sequence
//!
//! Chunk boundaries carry no meaning: the same stream yields the same
//! packets however it was split. When no boundary shows up before the
//! buffer reaches its ceiling, the bytes are flushed as an overflow packet
//! and framing carries on.

pub mod buffer;
#[cfg(feature = "async")]
pub mod codec;
pub mod config;
pub mod error;
pub mod fixed;
pub mod framer;
pub mod packet;
pub mod reader;
pub mod sequence;
pub mod session;
pub mod sink;

pub use buffer::AccumulationBuffer;
#[cfg(feature = "async")]
pub use codec::PacketCodec;
pub use config::{
    FramingConfig, SessionConfig, DEFAULT_DELIMITER, DEFAULT_MAX_BYTES, DEFAULT_PACKET_LENGTH,
};
pub use error::{FrameError, Result};
pub use fixed::FixedDelimiterFramer;
pub use framer::{FrameExtractor, Framer};
pub use packet::{Packet, PacketKind};
pub use reader::{PacketReader, ReaderConfig, DEFAULT_READ_CHUNK_SIZE};
pub use sequence::MultiByteDelimiterFramer;
pub use session::{FramingSession, SessionStats};
pub use sink::PacketSink;
