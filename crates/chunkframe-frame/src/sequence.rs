use tracing::{debug, trace};

use crate::buffer::AccumulationBuffer;
use crate::error::{FrameError, Result};
use crate::framer::FrameExtractor;
use crate::packet::Packet;

/// Extracts variable-length packets terminated by a byte sequence.
///
/// The emitted packet includes the terminating sequence. Bytes that arrived
/// after the sequence stay buffered as the start of the next packet.
#[derive(Debug, Clone)]
pub struct MultiByteDelimiterFramer {
    sequence: Vec<u8>,
    last: u8,
    /// Number of buffered bytes already inspected.
    scanned: usize,
}

impl MultiByteDelimiterFramer {
    pub fn new(sequence: impl Into<Vec<u8>>) -> Result<Self> {
        let sequence = sequence.into();
        let Some(&last) = sequence.last() else {
            return Err(FrameError::invalid_config(
                "delimiter sequence must not be empty",
            ));
        };
        Ok(Self {
            sequence,
            last,
            scanned: 0,
        })
    }

    /// Compare the sequence against the bytes ending at `end`, last byte
    /// first. The first mismatch abandons the position.
    fn terminates_at(&self, data: &[u8], end: usize) -> bool {
        data[end - 1] == self.last
            && end >= self.sequence.len()
            && self
                .sequence
                .iter()
                .rev()
                .zip(data[..end].iter().rev())
                .all(|(want, got)| want == got)
    }
}

impl FrameExtractor for MultiByteDelimiterFramer {
    fn next_packet(&mut self, buf: &mut AccumulationBuffer) -> Option<Packet> {
        while self.scanned < buf.len() {
            self.scanned += 1;
            let end = self.scanned;

            if self.terminates_at(buf.as_slice(), end) {
                self.scanned = 0;
                trace!(len = end, residual = buf.len() - end, "delimited packet extracted");
                return Some(Packet::delimited(buf.split_to(end)));
            }

            if end >= buf.max_bytes() {
                self.scanned = 0;
                debug!(len = end, "no delimiter before overflow ceiling");
                return Some(Packet::overflow(buf.split_to(end)));
            }
        }
        None
    }

    fn reset(&mut self) {
        self.scanned = 0;
    }
}
