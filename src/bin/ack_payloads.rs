//! Sends a text and counter payload from one node to the other, the reply travels back attached
//! to the acknowledgement packet.
//!
//! `ctrl+c` stops the running role and powers the radio down. While a prompt waits for input
//! the interrupt is only seen after Enter, press `ctrl+c` a second time to exit at once.
use anyhow::Result;
use nrf24_demos::app::{self, Demo, Io};
use nrf24_demos::cancel::CancelToken;
use nrf24_demos::clock::SystemClock;
use nrf24_demos::config::{NrfConfig, PALevel};
use nrf24_demos::linux::{self, BoardConfig};
use nrf24_demos::payload::AckPayload;
use tracing::error;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    // Every outcome exits with status 0, failures are only reported
    if let Err(e) = run() {
        error!("{e:#}");
    }
}

fn run() -> Result<()> {
    let demo = Demo::ack_payloads();
    let config = NrfConfig::default()
        .pa_level(PALevel::Low)
        .ack_payloads_enabled(true);
    let board = BoardConfig::from_env()?;
    let radio = match linux::open_radio(&board, config) {
        Ok(radio) => radio,
        Err(e) => {
            // Same exit status as a radio that does not answer
            error!("{e}");
            println!("{}", demo.not_responding);
            return Ok(());
        }
    };

    let cancel = CancelToken::new();
    let handler = cancel.clone();
    ctrlc::set_handler(move || {
        if handler.cancel() {
            std::process::exit(0);
        }
    })?;

    let stdin = std::io::stdin();
    let io = Io {
        transport: radio,
        clock: SystemClock::new(),
        input: stdin.lock(),
        out: std::io::stdout(),
        cancel,
    };
    app::run(std::env::args_os(), &demo, io, AckPayload::default())?;
    Ok(())
}
