#![allow(dead_code)]

use nrf24_demos::cancel::CancelToken;
use nrf24_demos::config::{DataPipe, PALevel};
use nrf24_demos::Transport;
use std::collections::VecDeque;
use std::convert::Infallible;

/// Transport double replaying scripted outcomes and recording what the demo did.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    /// Answer of `begin`.
    pub responding: bool,
    /// Outcomes of successive writes, `default_delivery` once exhausted.
    pub deliveries: VecDeque<bool>,
    pub default_delivery: bool,
    /// ACK payload coming back with each delivered write.
    pub ack_replies: VecDeque<Option<Vec<u8>>>,
    /// Payloads that show up on the given poll of `available` while listening (1-based).
    pub incoming: VecDeque<(usize, DataPipe, Vec<u8>)>,
    /// Cancel the token once this many writes went out.
    pub cancel_after_writes: Option<(usize, CancelToken)>,

    pub polls: usize,
    pub sent: Vec<Vec<u8>>,
    pub ack_payloads: Vec<(DataPipe, Vec<u8>)>,
    pub writing_address: Vec<u8>,
    pub reading_pipes: Vec<(DataPipe, Vec<u8>)>,
    pub pa_level: Option<PALevel>,
    pub dynamic_payloads: bool,
    pub ack_payloads_enabled: bool,
    pub listening: bool,
    pub powered_down: bool,
    rx_fifo: VecDeque<(DataPipe, Vec<u8>)>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self {
            responding: true,
            ..Self::default()
        }
    }

    pub fn always_failing() -> Self {
        Self::new()
    }

    pub fn with_deliveries(outcomes: &[bool]) -> Self {
        Self {
            deliveries: outcomes.iter().copied().collect(),
            ..Self::new()
        }
    }

    pub fn receive_at(mut self, poll: usize, pipe: DataPipe, payload: &[u8]) -> Self {
        self.incoming.push_back((poll, pipe, payload.to_vec()));
        self
    }
}

impl Transport for ScriptedTransport {
    type Error = Infallible;

    fn begin(&mut self) -> Result<bool, Self::Error> {
        Ok(self.responding)
    }

    fn set_pa_level(&mut self, level: PALevel) -> Result<(), Self::Error> {
        self.pa_level = Some(level);
        Ok(())
    }

    fn open_writing_pipe(&mut self, addr: &[u8]) -> Result<(), Self::Error> {
        self.writing_address = addr.to_vec();
        Ok(())
    }

    fn open_reading_pipe(&mut self, pipe: DataPipe, addr: &[u8]) -> Result<(), Self::Error> {
        self.reading_pipes.push((pipe, addr.to_vec()));
        Ok(())
    }

    fn start_listening(&mut self) -> Result<(), Self::Error> {
        self.listening = true;
        Ok(())
    }

    fn stop_listening(&mut self) -> Result<(), Self::Error> {
        self.listening = false;
        Ok(())
    }

    fn write(&mut self, buf: &[u8]) -> Result<bool, Self::Error> {
        self.sent.push(buf.to_vec());
        let delivered = self
            .deliveries
            .pop_front()
            .unwrap_or(self.default_delivery);
        if delivered {
            if let Some(Some(reply)) = self.ack_replies.pop_front() {
                self.rx_fifo.push_back((DataPipe::DP0, reply));
            }
        }
        if let Some((after, token)) = &self.cancel_after_writes {
            if self.sent.len() >= *after {
                token.cancel();
            }
        }
        Ok(delivered)
    }

    fn available(&mut self) -> Result<Option<DataPipe>, Self::Error> {
        if self.listening {
            self.polls += 1;
            while self
                .incoming
                .front()
                .is_some_and(|(at, _, _)| *at <= self.polls)
            {
                if let Some((_, pipe, payload)) = self.incoming.pop_front() {
                    self.rx_fifo.push_back((pipe, payload));
                }
            }
        }
        Ok(self.rx_fifo.front().map(|(pipe, _)| *pipe))
    }

    fn dynamic_payload_size(&mut self) -> Result<u8, Self::Error> {
        Ok(self
            .rx_fifo
            .front()
            .map(|(_, payload)| payload.len() as u8)
            .unwrap_or(0))
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let Some((_, payload)) = self.rx_fifo.pop_front() else {
            return Ok(0);
        };
        let n = payload.len().min(buf.len());
        buf[..n].copy_from_slice(&payload[..n]);
        Ok(n)
    }

    fn write_ack_payload(&mut self, pipe: DataPipe, buf: &[u8]) -> Result<bool, Self::Error> {
        self.ack_payloads.push((pipe, buf.to_vec()));
        Ok(true)
    }

    fn enable_dynamic_payloads(&mut self) -> Result<(), Self::Error> {
        self.dynamic_payloads = true;
        Ok(())
    }

    fn enable_ack_payload(&mut self) -> Result<(), Self::Error> {
        self.ack_payloads_enabled = true;
        Ok(())
    }

    fn power_down(&mut self) -> Result<(), Self::Error> {
        self.powered_down = true;
        Ok(())
    }
}

/// Encoded text and counter payload.
pub fn ack_bytes(message: &str, counter: u8) -> Vec<u8> {
    use nrf24_demos::payload::{AckPayload, Payload};
    let mut buf = vec![0u8; AckPayload::SIZE];
    AckPayload::new(message, counter).encode(&mut buf);
    buf
}
