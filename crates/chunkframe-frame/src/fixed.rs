use tracing::{debug, trace};

use crate::buffer::AccumulationBuffer;
use crate::error::{FrameError, Result};
use crate::framer::FrameExtractor;
use crate::packet::Packet;

/// Extracts fixed-length packets bounded by a start byte and a stop byte.
///
/// A packet is recognised at a stop byte when the byte exactly
/// `packet_length - 1` positions earlier is the start byte. Other start
/// bytes inside the window are not considered. Bytes preceding a recognised
/// window are dropped.
#[derive(Debug, Clone)]
pub struct FixedDelimiterFramer {
    start_byte: u8,
    stop_byte: u8,
    packet_length: usize,
    /// Number of buffered bytes already inspected.
    scanned: usize,
    discarded: u64,
}

impl FixedDelimiterFramer {
    pub fn new(start_byte: u8, stop_byte: u8, packet_length: usize) -> Result<Self> {
        if packet_length == 0 {
            return Err(FrameError::invalid_config("packet_length must be at least 1"));
        }
        Ok(Self {
            start_byte,
            stop_byte,
            packet_length,
            scanned: 0,
            discarded: 0,
        })
    }

    fn window_ends_at(&self, data: &[u8], end: usize) -> bool {
        data[end - 1] == self.stop_byte
            && end >= self.packet_length
            && data[end - self.packet_length] == self.start_byte
    }
}

impl FrameExtractor for FixedDelimiterFramer {
    fn next_packet(&mut self, buf: &mut AccumulationBuffer) -> Option<Packet> {
        while self.scanned < buf.len() {
            self.scanned += 1;
            let end = self.scanned;

            if self.window_ends_at(buf.as_slice(), end) {
                let skipped = end - self.packet_length;
                if skipped > 0 {
                    debug!(skipped, "dropping bytes before fixed window");
                    buf.discard(skipped);
                    self.discarded += skipped as u64;
                }
                self.scanned = 0;
                trace!(len = self.packet_length, "fixed packet extracted");
                return Some(Packet::delimited(buf.split_to(self.packet_length)));
            }

            if end >= buf.max_bytes() {
                self.scanned = 0;
                debug!(len = end, "no fixed window before overflow ceiling");
                return Some(Packet::overflow(buf.split_to(end)));
            }
        }
        None
    }

    fn reset(&mut self) {
        self.scanned = 0;
    }

    fn discarded(&self) -> u64 {
        self.discarded
    }
}
