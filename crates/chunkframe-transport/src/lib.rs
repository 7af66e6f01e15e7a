//! Blocking byte sources for chunkframe.
//!
//! Opens the transport a stream session reads from and nothing more: no
//! framing, no retry, no device configuration. A serial device node is
//! read as-is, so line settings must be applied before it is opened.
//!
//! - TCP client sockets (`tcp://host:port` or `host:port`)
//! - Unix domain sockets (`unix:///path`, unix only)
//! - Filesystem paths (device nodes, FIFOs, capture files)
//! - Standard input (`-`)

pub mod endpoint;
pub mod error;
pub mod stream;

pub use endpoint::Endpoint;
pub use error::{Result, TransportError};
pub use stream::ByteStream;
