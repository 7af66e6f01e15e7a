use serde::Serialize;
use tracing::debug;

use crate::buffer::AccumulationBuffer;
use crate::config::SessionConfig;
use crate::error::Result;
use crate::framer::{FrameExtractor, Framer};
use crate::packet::Packet;
use crate::sink::PacketSink;

/// Counters for one session. Not cleared by [`FramingSession::reset`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    /// Chunks fed.
    pub chunks: u64,
    /// Raw bytes fed.
    pub bytes_in: u64,
    /// Packets emitted, overflow packets included.
    pub packets: u64,
    /// Overflow packets emitted.
    pub overflows: u64,
    /// Bytes dropped because they preceded a fixed-length window.
    pub discarded: u64,
}

/// One stream session: an accumulation buffer and the framer scanning it.
///
/// Owned by a single reader. Independent sessions share nothing, so several
/// streams can be framed side by side.
#[derive(Debug)]
pub struct FramingSession {
    config: SessionConfig,
    buffer: AccumulationBuffer,
    framer: Framer,
    stats: SessionStats,
}

impl FramingSession {
    /// Start a session. Fails if the configuration can never frame.
    pub fn new(config: SessionConfig) -> Result<Self> {
        config.validate()?;
        let framer = Framer::from_config(&config.framing)?;
        debug!(
            mode = config.framing.mode_name(),
            max_bytes = config.max_bytes,
            "framing session started"
        );
        Ok(Self {
            buffer: AccumulationBuffer::new(config.max_bytes),
            framer,
            config,
            stats: SessionStats::default(),
        })
    }

    /// Push a raw chunk and collect the packets it completed.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<Packet> {
        let mut packets = Vec::new();
        self.feed_into(chunk, &mut packets);
        packets
    }

    /// Push a raw chunk and hand each completed packet to `sink`.
    pub fn feed_into<S: PacketSink + ?Sized>(&mut self, chunk: &[u8], sink: &mut S) {
        self.stats.chunks += 1;
        self.stats.bytes_in += chunk.len() as u64;
        self.buffer.append(chunk);

        while let Some(packet) = self.framer.next_packet(&mut self.buffer) {
            self.stats.packets += 1;
            if packet.is_overflow() {
                self.stats.overflows += 1;
            }
            sink.deliver(packet);
        }
    }

    /// Discard pending bytes without emitting them.
    pub fn reset(&mut self) {
        if !self.buffer.is_empty() {
            debug!(pending = self.buffer.len(), "discarding pending bytes");
        }
        self.buffer.reset();
        self.framer.reset();
    }

    /// Bytes waiting for a delimiter.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Pending bytes, oldest first.
    pub fn pending(&self) -> &[u8] {
        self.buffer.as_slice()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn stats(&self) -> SessionStats {
        SessionStats {
            discarded: self.framer.discarded(),
            ..self.stats
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packet::PacketKind;

    const A: u8 = b'A';
    const B: u8 = b'B';
    const C: u8 = b'C';
    const D: u8 = b'D';

    fn crlf_session() -> FramingSession {
        FramingSession::new(SessionConfig::default()).unwrap()
    }

    #[test]
    fn rejects_invalid_config() {
        assert!(FramingSession::new(SessionConfig::delimited(Vec::new())).is_err());
    }

    #[test]
    fn residual_bytes_prefix_next_packet() {
        let mut session = crlf_session();

        let packets = session.feed(&[A, B, 13, 10, 58, 58, 58, C, D]);
        assert_eq!(packets.len(), 1);
        assert_eq!(packets[0].as_ref(), &[A, B, 13, 10, 58, 58, 58]);
        assert_eq!(session.pending(), &[C, D]);

        let packets = session.feed(&[13, 10, 58, 58, 58]);
        assert_eq!(packets.len(), 1);
        assert_eq!(packets[0].as_ref(), &[C, D, 13, 10, 58, 58, 58]);
        assert_eq!(session.buffered(), 0);
    }

    #[test]
    fn overflow_boundary_flushes_once() {
        let mut session =
            FramingSession::new(SessionConfig::default().with_max_bytes(32)).unwrap();

        let packets = session.feed(&[0x11; 32]);

        assert_eq!(packets.len(), 1);
        assert_eq!(packets[0].kind, PacketKind::Overflow);
        assert_eq!(packets[0].len(), 32);
        assert_eq!(session.buffered(), 0);
        assert_eq!(session.stats().overflows, 1);
    }

    #[test]
    fn just_below_ceiling_keeps_accumulating() {
        let mut session =
            FramingSession::new(SessionConfig::default().with_max_bytes(32)).unwrap();

        assert!(session.feed(&[0x11; 31]).is_empty());
        assert_eq!(session.buffered(), 31);
    }

    #[test]
    fn reset_on_empty_is_noop() {
        let mut session = crlf_session();
        session.reset();
        session.reset();

        assert_eq!(session.buffered(), 0);
        assert_eq!(session.stats(), SessionStats::default());
    }

    #[test]
    fn reset_keeps_statistics() {
        let mut session = crlf_session();
        session.feed(&[]);
        session.feed(b"x");
        session.reset();
        session.reset();

        assert_eq!(session.buffered(), 0);
        let stats = session.stats();
        assert_eq!(stats.chunks, 2);
        assert_eq!(stats.bytes_in, 1);
        assert_eq!(stats.packets, 0);

        session.feed(b"y\r\n:::");
        assert_eq!(session.stats().chunks, 3);
        assert_eq!(session.stats().packets, 1);
    }

    #[test]
    fn reset_mid_accumulation_discards_without_emitting() {
        let mut session = crlf_session();
        let mut emitted = Vec::new();

        session.feed_into(b"partial\r\n:", &mut emitted);
        session.reset();
        session.feed_into(b"::", &mut emitted);

        assert!(emitted.is_empty());
        assert_eq!(session.pending(), b"::");

        session.feed_into(b"\r\n:::", &mut emitted);
        assert_eq!(emitted.len(), 1);
        assert_eq!(emitted[0].as_ref(), b"::\r\n:::");
    }

    #[test]
    fn fixed_no_false_positive() {
        let mut session = FramingSession::new(SessionConfig::fixed(0x7E, 0x7F, 4)).unwrap();

        assert!(session.feed(&[0x01, 0x02, 0x03, 0x7F]).is_empty());
        assert_eq!(session.buffered(), 4);

        let packets = session.feed(&[0x7E, 0x00, 0x00, 0x7F]);
        assert_eq!(packets.len(), 1);
        assert_eq!(packets[0].as_ref(), &[0x7E, 0x00, 0x00, 0x7F]);
        assert_eq!(session.stats().discarded, 4);
    }

    #[test]
    fn sink_called_once_per_packet_in_order() {
        let mut session = FramingSession::new(SessionConfig::delimited(b";".to_vec())).unwrap();
        let mut order = Vec::new();

        session.feed_into(b"a;bb;ccc;", &mut |packet: Packet| order.push(packet.len()));

        assert_eq!(order, vec![2, 3, 4]);
    }

    #[test]
    fn stats_track_traffic() {
        let mut session = FramingSession::new(
            SessionConfig::delimited(b"\n".to_vec()).with_max_bytes(4),
        )
        .unwrap();

        session.feed(b"ab\n");
        session.feed(b"cdefg");

        let stats = session.stats();
        assert_eq!(stats.chunks, 2);
        assert_eq!(stats.bytes_in, 8);
        assert_eq!(stats.packets, 2);
        assert_eq!(stats.overflows, 1);
        assert_eq!(session.pending(), b"g");
    }

    #[test]
    fn sessions_are_independent() {
        let mut left = crlf_session();
        let mut right = crlf_session();

        left.feed(b"left");
        assert_eq!(right.buffered(), 0);

        let packets = right.feed(b"right\r\n:::");
        assert_eq!(packets[0].as_ref(), b"right\r\n:::");
        assert_eq!(left.pending(), b"left");
    }
}
