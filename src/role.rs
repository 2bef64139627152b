//! Transmitter and receiver loops.

use crate::clock::Clock;
use crate::error::{Error, Result};
use crate::payload::Payload;
use crate::session::Session;
use crate::timer::Stopwatch;
use crate::transport::Transport;
use crate::MAX_PAYLOAD_SIZE;
use std::io::Write;
use tracing::{debug, info, warn};

/// What a node does for the duration of one loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Transmitter,
    Receiver,
}

impl Role {
    /// `1` is the transmitter, `0` the receiver.
    pub fn from_flag(flag: u8) -> Self {
        if flag == 1 {
            Role::Transmitter
        } else {
            Role::Receiver
        }
    }
}

/// How a transmitter loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxOutcome {
    /// The failure limit was reached.
    Stopped {
        failures: u32,
        delivered: u32,
    },
    Cancelled,
}

/// How a receiver loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RxOutcome {
    /// Nothing arrived for the whole idle timeout.
    IdleTimeout {
        received: u32,
    },
    Cancelled,
}

/// Runs `role` once on the session.
pub fn run<T, C, W, P>(session: &mut Session<T, C, W, P>, role: Role) -> Result<()>
where
    T: Transport,
    C: Clock,
    W: Write,
    P: Payload,
{
    match role {
        Role::Transmitter => transmit(session).map(|_| ()),
        Role::Receiver => receive(session).map(|_| ()),
    }
}

/// Sends the session payload until the failure limit is reached.
///
/// Every confirmed delivery advances the payload, adopting the ACK payload when one came back.
pub fn transmit<T, C, W, P>(session: &mut Session<T, C, W, P>) -> Result<TxOutcome>
where
    T: Transport,
    C: Clock,
    W: Write,
    P: Payload,
{
    info!("entering TX role");
    session.payload.prepare(Role::Transmitter);
    session
        .transport
        .stop_listening()
        .map_err(Error::transport)?;

    let limit = session.settings.failure_limit;
    let mut buf = [0u8; MAX_PAYLOAD_SIZE as usize];
    let mut failures = 0;
    let mut delivered = 0;
    while failures < limit {
        if session.is_cancelled() {
            return Ok(TxOutcome::Cancelled);
        }

        session.payload.encode(&mut buf);
        let watch = Stopwatch::start(session.clock.now());
        let report = session
            .transport
            .write(&buf[..P::SIZE])
            .map_err(Error::transport)?;
        let elapsed = watch.stop(session.clock.now());

        if report {
            delivered += 1;
            write!(
                session.out,
                "Transmission successful! Time to transmit = {} us. Sent: {}",
                elapsed, session.payload
            )?;
            if session.settings.ack_payloads {
                let reply = read_ack_payload(session)?;
                session.payload.advance(reply.as_ref());
            } else {
                writeln!(session.out)?;
                session.payload.advance(None);
            }
        } else {
            failures += 1;
            warn!(failures, "payload not delivered");
            writeln!(session.out, "Transmission failed or timed out")?;
        }

        // Slow transmissions down so the output stays readable
        session.clock.sleep(session.settings.tx_interval);
    }

    writeln!(
        session.out,
        "{} failures detected. Leaving TX role.",
        failures
    )?;
    Ok(TxOutcome::Stopped {
        failures,
        delivered,
    })
}

fn read_ack_payload<T, C, W, P>(session: &mut Session<T, C, W, P>) -> Result<Option<P>>
where
    T: Transport,
    W: Write,
    P: Payload,
{
    let pipe = match session.transport.available().map_err(Error::transport)? {
        Some(pipe) => pipe,
        None => {
            writeln!(session.out, " Received an empty ACK packet.")?;
            return Ok(None);
        }
    };
    let size = session
        .transport
        .dynamic_payload_size()
        .map_err(Error::transport)?;
    let mut buf = [0u8; MAX_PAYLOAD_SIZE as usize];
    let n = session
        .transport
        .read(&mut buf[..P::SIZE])
        .map_err(Error::transport)?;
    let reply = P::decode(&buf[..n]);
    writeln!(
        session.out,
        " Received {} bytes on pipe {}: {}",
        size, pipe, reply
    )?;
    Ok(Some(reply))
}

/// Listens until nothing arrives for the idle timeout.
///
/// With ACK payloads the session payload is the reply: it is loaded before listening and
/// re-armed with `received + 1` after every receipt. Otherwise the session payload tracks the
/// last value received.
pub fn receive<T, C, W, P>(session: &mut Session<T, C, W, P>) -> Result<RxOutcome>
where
    T: Transport,
    C: Clock,
    W: Write,
    P: Payload,
{
    info!("entering RX role");
    let ack_payloads = session.settings.ack_payloads;
    let mut buf = [0u8; MAX_PAYLOAD_SIZE as usize];

    if ack_payloads {
        session.payload.prepare(Role::Receiver);
        arm_reply(session, &mut buf)?;
    }
    session
        .transport
        .start_listening()
        .map_err(Error::transport)?;

    let mut received = 0;
    let mut idle_since = session.clock.now();
    while session.clock.now().saturating_sub(idle_since) < session.settings.idle_timeout {
        if session.is_cancelled() {
            return Ok(RxOutcome::Cancelled);
        }

        let Some(from) = session.transport.available().map_err(Error::transport)? else {
            session.clock.sleep(session.settings.poll_interval);
            continue;
        };

        let size = if ack_payloads {
            session
                .transport
                .dynamic_payload_size()
                .map_err(Error::transport)? as usize
        } else {
            P::SIZE
        };
        let n = session
            .transport
            .read(&mut buf[..size.min(MAX_PAYLOAD_SIZE as usize)])
            .map_err(Error::transport)?;
        let incoming = P::decode(&buf[..n]);
        received += 1;
        debug!(pipe = from.pipe(), bytes = size, "payload received");

        write!(
            session.out,
            "Received {} bytes on pipe {}: {}",
            size, from, incoming
        )?;
        if ack_payloads {
            writeln!(session.out, " Sent: {}", session.payload)?;
        } else {
            writeln!(session.out)?;
        }
        idle_since = session.clock.now();

        if ack_payloads {
            session.payload.respond_to(&incoming);
            arm_reply(session, &mut buf)?;
        } else {
            session.payload = incoming;
        }
    }

    writeln!(
        session.out,
        "Nothing received in {} seconds. Leaving RX role.",
        session.settings.idle_timeout.as_secs()
    )?;
    // Recommended idle behavior is TX mode
    session
        .transport
        .stop_listening()
        .map_err(Error::transport)?;
    Ok(RxOutcome::IdleTimeout { received })
}

fn arm_reply<T, C, W, P>(session: &mut Session<T, C, W, P>, buf: &mut [u8]) -> Result<()>
where
    T: Transport,
    P: Payload,
{
    session.payload.encode(buf);
    let queued = session
        .transport
        .write_ack_payload(session.settings.rx_pipe, &buf[..P::SIZE])
        .map_err(Error::transport)?;
    if !queued {
        warn!("ACK payload could not be queued");
    }
    Ok(())
}
