use bytes::BytesMut;

/// Why a packet was emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketKind {
    /// A complete, delimited packet.
    Delimited,
    /// Best-effort flush of bytes that reached the overflow ceiling without a
    /// delimiter.
    Overflow,
}

impl PacketKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PacketKind::Delimited => "delimited",
            PacketKind::Overflow => "overflow",
        }
    }
}

/// A packet split off the accumulation buffer.
///
/// The payload is owned: mutating it has no effect on the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    pub kind: PacketKind,
    pub payload: BytesMut,
}

impl Packet {
    /// Create a delimited packet.
    pub fn delimited(payload: impl Into<BytesMut>) -> Self {
        Self {
            kind: PacketKind::Delimited,
            payload: payload.into(),
        }
    }

    /// Create an overflow packet.
    pub fn overflow(payload: impl Into<BytesMut>) -> Self {
        Self {
            kind: PacketKind::Overflow,
            payload: payload.into(),
        }
    }

    pub fn is_overflow(&self) -> bool {
        self.kind == PacketKind::Overflow
    }

    pub fn len(&self) -> usize {
        self.payload.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}

impl AsRef<[u8]> for Packet {
    fn as_ref(&self) -> &[u8] {
        self.payload.as_ref()
    }
}

impl AsMut<[u8]> for Packet {
    fn as_mut(&mut self) -> &mut [u8] {
        self.payload.as_mut()
    }
}
