use std::collections::VecDeque;
use std::sync::mpsc::Sender;

use crate::packet::Packet;

/// Receives every packet a session extracts, in order.
///
/// Called synchronously from the feeding context, once per packet, before the
/// next chunk is accepted. Delivery is never retried.
pub trait PacketSink {
    fn deliver(&mut self, packet: Packet);
}

impl<F: FnMut(Packet)> PacketSink for F {
    fn deliver(&mut self, packet: Packet) {
        self(packet)
    }
}

impl PacketSink for Vec<Packet> {
    fn deliver(&mut self, packet: Packet) {
        self.push(packet);
    }
}

impl PacketSink for VecDeque<Packet> {
    fn deliver(&mut self, packet: Packet) {
        self.push_back(packet);
    }
}

impl PacketSink for Sender<Packet> {
    fn deliver(&mut self, packet: Packet) {
        if self.send(packet).is_err() {
            tracing::debug!("packet receiver dropped; discarding packet");
        }
    }
}
