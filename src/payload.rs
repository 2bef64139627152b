//! Payload layouts exchanged by the demos.

use crate::role::Role;
use std::fmt;

/// A fixed layout record that fits in a single radio packet.
///
/// The hooks describe how the "next value to send" evolves, so the role loops stay the same for
/// every payload type.
pub trait Payload: Copy + fmt::Display {
    /// Encoded size in bytes.
    const SIZE: usize;

    fn encode(&self, buf: &mut [u8]);

    /// Decodes a payload from `buf`. Missing bytes read as zero.
    fn decode(buf: &[u8]) -> Self;

    /// Called once when a role starts using this payload.
    fn prepare(&mut self, _role: Role) {}

    /// Called after a confirmed delivery, with the ACK payload when one came back.
    fn advance(&mut self, _reply: Option<&Self>) {}

    /// Called on the receiver after `received` came in, before the reply is re-armed.
    fn respond_to(&mut self, _received: &Self) {}
}

/// Text and counter record of the acknowledgement payload demo.
///
/// Laid out as 7 bytes of NUL padded text followed by the counter.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AckPayload {
    message: [u8; 7],
    pub counter: u8,
}

impl AckPayload {
    /// Only the first 6 bytes of the text are kept, the 7th stays a NUL terminator.
    pub fn new(message: &str, counter: u8) -> Self {
        let mut payload = Self {
            message: [0; 7],
            counter,
        };
        payload.set_message(message);
        payload
    }

    pub fn set_message(&mut self, message: &str) {
        self.message = [0; 7];
        let len = message.len().min(6);
        self.message[..len].copy_from_slice(&message.as_bytes()[..len]);
    }

    /// Text up to the first NUL byte.
    pub fn message(&self) -> String {
        let end = self.message.iter().position(|&b| b == 0).unwrap_or(7);
        String::from_utf8_lossy(&self.message[..end]).into_owned()
    }
}

impl Payload for AckPayload {
    const SIZE: usize = 8;

    fn encode(&self, buf: &mut [u8]) {
        buf[..7].copy_from_slice(&self.message);
        buf[7] = self.counter;
    }

    fn decode(buf: &[u8]) -> Self {
        let mut raw = [0u8; Self::SIZE];
        let len = buf.len().min(Self::SIZE);
        raw[..len].copy_from_slice(&buf[..len]);
        let mut message = [0u8; 7];
        message.copy_from_slice(&raw[..7]);
        Self {
            message,
            counter: raw[7],
        }
    }

    fn prepare(&mut self, role: Role) {
        match role {
            Role::Transmitter => self.set_message("Hello "),
            Role::Receiver => self.set_message("World "),
        }
    }

    fn advance(&mut self, reply: Option<&Self>) {
        if let Some(reply) = reply {
            self.counter = reply.counter.wrapping_add(1);
        }
    }

    fn respond_to(&mut self, received: &Self) {
        self.counter = received.counter.wrapping_add(1);
    }
}

impl fmt::Display for AckPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.message(), self.counter)
    }
}

/// Single float record of the getting started demo, sent little endian.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct FloatPayload(pub f32);

impl FloatPayload {
    const STEP: f32 = 0.01;
}

impl Payload for FloatPayload {
    const SIZE: usize = 4;

    fn encode(&self, buf: &mut [u8]) {
        buf[..4].copy_from_slice(&self.0.to_le_bytes());
    }

    fn decode(buf: &[u8]) -> Self {
        let mut raw = [0u8; 4];
        let len = buf.len().min(4);
        raw[..len].copy_from_slice(&buf[..len]);
        Self(f32::from_le_bytes(raw))
    }

    fn advance(&mut self, _reply: Option<&Self>) {
        self.0 += Self::STEP;
    }
}

impl fmt::Display for FloatPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ack_payload_layout() {
        let payload = AckPayload::new("Hello ", 7);
        let mut buf = [0xffu8; 8];
        payload.encode(&mut buf);
        assert_eq!(&buf, b"Hello \0\x07");
        assert_eq!(payload.to_string(), "Hello 7");
    }

    #[test]
    fn long_messages_keep_terminator() {
        let payload = AckPayload::new("Greetings", 0);
        assert_eq!(payload.message(), "Greeti");
    }

    #[test]
    fn short_buffers_decode_as_zero() {
        let payload = AckPayload::decode(b"World");
        assert_eq!(payload.message(), "World");
        assert_eq!(payload.counter, 0);
    }

    #[test]
    fn transmitter_adopts_reply_counter() {
        let mut payload = AckPayload::new("Hello ", 3);
        payload.advance(None);
        assert_eq!(payload.counter, 3);
        payload.advance(Some(&AckPayload::new("World ", 9)));
        assert_eq!(payload.counter, 10);
    }

    #[test]
    fn receiver_counter_wraps() {
        let mut reply = AckPayload::new("World ", 0);
        reply.respond_to(&AckPayload::new("Hello ", 255));
        assert_eq!(reply.counter, 0);
    }

    #[test]
    fn prepare_sets_role_message() {
        let mut payload = AckPayload::default();
        payload.prepare(Role::Receiver);
        assert_eq!(payload.message(), "World ");
        assert_eq!(payload.to_string(), "World 0");
        payload.prepare(Role::Transmitter);
        assert_eq!(payload.to_string(), "Hello 0");
    }

    #[test]
    fn float_payload_steps_on_delivery() {
        let mut payload = FloatPayload(0.0);
        payload.advance(None);
        payload.advance(None);
        assert_eq!(payload.to_string(), "0.02");
        let mut buf = [0u8; 4];
        payload.encode(&mut buf);
        assert_eq!(FloatPayload::decode(&buf), payload);
    }
}
