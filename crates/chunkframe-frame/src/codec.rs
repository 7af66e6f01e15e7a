//! `tokio_util` codec adapter.

use std::collections::VecDeque;

use bytes::BytesMut;
use tokio_util::codec::Decoder;

use crate::config::SessionConfig;
use crate::error::{FrameError, Result};
use crate::packet::Packet;
use crate::session::FramingSession;

/// Drives a [`FramingSession`] from a `FramedRead`.
///
/// Every byte handed to [`Decoder::decode`] moves into the session, so the
/// same chunk-boundary guarantees hold on async sources.
#[derive(Debug)]
pub struct PacketCodec {
    session: FramingSession,
    pending: VecDeque<Packet>,
}

impl PacketCodec {
    pub fn new(config: SessionConfig) -> Result<Self> {
        Ok(Self::from_session(FramingSession::new(config)?))
    }

    pub fn from_session(session: FramingSession) -> Self {
        Self {
            session,
            pending: VecDeque::new(),
        }
    }

    pub fn session(&self) -> &FramingSession {
        &self.session
    }

    pub fn into_session(self) -> FramingSession {
        self.session
    }
}

impl Decoder for PacketCodec {
    type Item = Packet;
    type Error = FrameError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Packet>> {
        if !src.is_empty() {
            let chunk = src.split();
            self.session.feed_into(&chunk, &mut self.pending);
        }
        Ok(self.pending.pop_front())
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Packet>> {
        let packet = self.decode(src)?;
        if packet.is_none() {
            self.session.reset();
        }
        Ok(packet)
    }
}
