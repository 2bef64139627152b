//! Shared driver of the demo binaries.

use crate::cancel::CancelToken;
use crate::cli::{self, Command, Invocation, Node};
use crate::clock::Clock;
use crate::error::{Error, Result};
use crate::payload::Payload;
use crate::role;
use crate::session::{DemoSettings, Session};
use crate::transport::Transport;
use std::io::{BufRead, Write};
use tracing::{info, warn};

/// Address pair of the two nodes. Node `n` transmits on `ADDRESSES[n]` and listens on the other.
pub const ADDRESSES: [&[u8; 5]; 2] = [b"1Node", b"2Node"];

/// One demo program: its help text and loop constants.
#[derive(Debug, Clone, Copy)]
pub struct Demo {
    pub about: &'static str,
    /// Printed when the radio does not answer.
    pub not_responding: &'static str,
    pub settings: DemoSettings,
}

impl Demo {
    /// A single float is sent and incremented after every delivery.
    pub fn getting_started() -> Self {
        Self {
            about: "A simple example of sending data from 1 nRF24L01 transceiver to another.\n\n\
                    This example was written to be used on 2 devices acting as 'nodes'.",
            not_responding: "nRF24L01 is not responding!!",
            settings: DemoSettings::default(),
        }
    }

    /// A text and counter payload travels one way, the reply comes back on the ACK packet.
    pub fn ack_payloads() -> Self {
        Self {
            about: "A simple example of sending data from 1 nRF24L01 transceiver to another\n\
                    with Acknowledgement (ACK) payloads attached to ACK packets.\n\n\
                    This example was written to be used on 2 devices acting as 'nodes'.",
            not_responding: "radio hardware is not responding!!",
            settings: DemoSettings {
                ack_payloads: true,
                ..DemoSettings::default()
            },
        }
    }
}

/// Terminal and radio handles of one run.
#[derive(Debug)]
pub struct Io<T, C, R, W> {
    pub transport: T,
    pub clock: C,
    pub input: R,
    pub out: W,
    pub cancel: CancelToken,
}

/// Runs a demo from the process arguments until the user quits, the flagged role finishes or the
/// run is cancelled.
///
/// Hardware that does not respond and usage errors are reported on `out` and end the run
/// normally. Returns the session when a role could be set up, so callers can inspect it.
pub fn run<A, S, T, C, R, W, P>(
    args: A,
    demo: &Demo,
    io: Io<T, C, R, W>,
    payload: P,
) -> Result<Option<Session<T, C, W, P>>>
where
    A: IntoIterator<Item = S>,
    S: Into<std::ffi::OsString>,
    T: Transport,
    C: Clock,
    R: BufRead,
    W: Write,
    P: Payload,
{
    let Io {
        mut transport,
        clock,
        mut input,
        mut out,
        cancel,
    } = io;

    if !transport.begin().map_err(Error::transport)? {
        writeln!(out, "{}", demo.not_responding)?;
        return Ok(None);
    }

    let (program, node, role) = match cli::parse(args, demo.about) {
        Invocation::Usage(usage) => {
            writeln!(out, "{}", usage)?;
            return Ok(None);
        }
        Invocation::Run {
            program,
            node,
            role,
        } => (program, node, role),
    };
    writeln!(out, "{}", program)?;

    let node = match node {
        Some(node) => node,
        None => cli::prompt_node(&mut input, &mut out)?,
    };
    configure(&mut transport, &demo.settings, node)?;
    info!(node = node.index(), "radio configured");

    let mut session = Session::new(transport, clock, out, payload, demo.settings, cancel);
    match role {
        Some(role) => role::run(&mut session, role)?,
        None => select_role(&mut session, &mut input)?,
    }

    if session.is_cancelled() {
        shutdown(&mut session)?;
    }
    Ok(Some(session))
}

/// Applies the demo's radio setup for `node`.
pub fn configure<T: Transport>(
    transport: &mut T,
    settings: &DemoSettings,
    node: Node,
) -> Result<()> {
    if settings.ack_payloads {
        // ACK payloads are dynamically sized
        transport
            .enable_dynamic_payloads()
            .map_err(Error::transport)?;
        transport.enable_ack_payload().map_err(Error::transport)?;
    }
    // Low power avoids supply problems with nodes close to each other
    transport
        .set_pa_level(settings.pa_level)
        .map_err(Error::transport)?;
    transport
        .open_writing_pipe(ADDRESSES[node.index()])
        .map_err(Error::transport)?;
    transport
        .open_reading_pipe(settings.rx_pipe, ADDRESSES[node.peer_index()])
        .map_err(Error::transport)
}

/// Prompts for roles until the user quits, input ends or the run is cancelled.
pub fn select_role<T, C, W, P, R>(session: &mut Session<T, C, W, P>, input: &mut R) -> Result<()>
where
    T: Transport,
    C: Clock,
    W: Write,
    P: Payload,
    R: BufRead,
{
    while !session.is_cancelled() {
        match cli::prompt_role(input, &mut session.out)? {
            Command::Start(role) => role::run(session, role)?,
            Command::Quit => break,
            Command::Invalid(c) => {
                writeln!(session.out, "{} is an invalid input. Please try again.", c)?
            }
            Command::Empty => {}
        }
    }
    Ok(())
}

fn shutdown<T, C, W, P>(session: &mut Session<T, C, W, P>) -> Result<()>
where
    T: Transport,
    W: Write,
{
    warn!("interrupted, powering down");
    writeln!(session.out, " Interrupt signal detected. Exiting...")?;
    session.transport.power_down().map_err(Error::transport)
}
