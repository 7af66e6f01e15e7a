//! Reassemble delimited packets from chunked socket and serial streams.
//!
//! A transport hands over raw chunks in whatever sizes it reads them; the
//! framing layer turns them into whole packets, using either fixed-length
//! start/stop-byte windows or a terminating byte sequence.
//!
//! # Crate Structure
//!
//! - [`transport`]: Blocking byte sources (TCP, Unix sockets, device nodes, stdin)
//! - [`frame`]: Accumulation buffer, framers, sessions and the read loop
//!
//! # Example
//!
//! ```
//! use chunkframe::frame::{FramingSession, SessionConfig};
//!
//! let mut session = FramingSession::new(SessionConfig::delimited(b"\r\n".to_vec())).unwrap();
//! assert!(session.feed(b"hel").is_empty());
//! let packets = session.feed(b"lo\r\nwor");
//! assert_eq!(packets[0].as_ref(), b"hello\r\n");
//! assert_eq!(session.pending(), b"wor");
//! ```

/// Re-export transport types.
pub mod transport {
    pub use chunkframe_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use chunkframe_frame::*;
}
