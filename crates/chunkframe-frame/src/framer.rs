//! Packet boundary detection strategies.

use crate::buffer::AccumulationBuffer;
use crate::config::FramingConfig;
use crate::error::Result;
use crate::fixed::FixedDelimiterFramer;
use crate::packet::Packet;
use crate::sequence::MultiByteDelimiterFramer;

/// Scans an [`AccumulationBuffer`] for the next packet.
///
/// Implementations remember how far they have scanned, so each byte is
/// inspected once no matter how the stream was chunked. Bytes after an
/// extracted packet stay in the buffer.
pub trait FrameExtractor {
    /// Scan bytes appended since the last call and split off the next packet.
    ///
    /// Returns `None` when the buffer holds no complete packet yet. Call
    /// repeatedly until `None` to drain every packet a chunk completed.
    fn next_packet(&mut self, buf: &mut AccumulationBuffer) -> Option<Packet>;

    /// Forget scan progress. Must accompany every external buffer reset.
    fn reset(&mut self);

    /// Bytes dropped so far because they preceded a packet window.
    fn discarded(&self) -> u64 {
        0
    }
}

/// A framer selected from a [`FramingConfig`].
#[derive(Debug, Clone)]
pub enum Framer {
    Fixed(FixedDelimiterFramer),
    MultiByte(MultiByteDelimiterFramer),
}

impl Framer {
    /// Build the framer for a configuration.
    pub fn from_config(config: &FramingConfig) -> Result<Self> {
        match config {
            FramingConfig::FixedDelimiter {
                start_byte,
                stop_byte,
                packet_length,
            } => FixedDelimiterFramer::new(*start_byte, *stop_byte, *packet_length).map(Self::Fixed),
            FramingConfig::MultiByteDelimiter { sequence } => {
                MultiByteDelimiterFramer::new(sequence.clone()).map(Self::MultiByte)
            }
        }
    }
}

impl FrameExtractor for Framer {
    fn next_packet(&mut self, buf: &mut AccumulationBuffer) -> Option<Packet> {
        match self {
            Framer::Fixed(framer) => framer.next_packet(buf),
            Framer::MultiByte(framer) => framer.next_packet(buf),
        }
    }

    fn reset(&mut self) {
        match self {
            Framer::Fixed(framer) => framer.reset(),
            Framer::MultiByte(framer) => framer.reset(),
        }
    }

    fn discarded(&self) -> u64 {
        match self {
            Framer::Fixed(framer) => framer.discarded(),
            Framer::MultiByte(framer) => framer.discarded(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_DELIMITER;

    #[test]
    fn builds_fixed_framer() {
        let framer = Framer::from_config(&FramingConfig::FixedDelimiter {
            start_byte: 1,
            stop_byte: 2,
            packet_length: 4,
        })
        .unwrap();
        assert!(matches!(framer, Framer::Fixed(_)));
    }

    #[test]
    fn builds_sequence_framer() {
        let framer = Framer::from_config(&FramingConfig::default()).unwrap();
        assert!(matches!(framer, Framer::MultiByte(_)));
    }

    #[test]
    fn dispatches_to_selected_strategy() {
        let mut framer = Framer::from_config(&FramingConfig::MultiByteDelimiter {
            sequence: DEFAULT_DELIMITER.to_vec(),
        })
        .unwrap();
        let mut buf = AccumulationBuffer::new(64);
        buf.append(b"ok\r\n:::rest");

        let packet = framer.next_packet(&mut buf).unwrap();
        assert_eq!(packet.as_ref(), b"ok\r\n:::");
        assert!(framer.next_packet(&mut buf).is_none());
        assert_eq!(buf.as_slice(), b"rest");
        assert_eq!(framer.discarded(), 0);
    }

    #[test]
    fn rejects_invalid_strategy_params() {
        assert!(Framer::from_config(&FramingConfig::MultiByteDelimiter { sequence: vec![] }).is_err());
        assert!(Framer::from_config(&FramingConfig::FixedDelimiter {
            start_byte: 1,
            stop_byte: 2,
            packet_length: 0,
        })
        .is_err());
    }
}
