mod common;

use common::ScriptedTransport;
use nrf24_demos::app::{self, Demo, Io};
use nrf24_demos::cancel::CancelToken;
use nrf24_demos::clock::ManualClock;
use nrf24_demos::config::{DataPipe, PALevel};
use nrf24_demos::payload::{AckPayload, FloatPayload, Payload};

fn run_demo<P: Payload>(
    demo: Demo,
    args: &[&str],
    input: &str,
    transport: &mut ScriptedTransport,
    cancel: CancelToken,
    payload: P,
) -> String {
    let mut out = Vec::new();
    let io = Io {
        transport: &mut *transport,
        clock: ManualClock::new(),
        input: input.as_bytes(),
        out: &mut out,
        cancel,
    };
    app::run(args.iter().copied(), &demo, io, payload).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn unresponsive_radio_ends_run() {
    let mut transport = ScriptedTransport::new();
    transport.responding = false;

    let out = run_demo(
        Demo::ack_payloads(),
        &["ack_payloads", "-n", "0", "-r", "1"],
        "",
        &mut transport,
        CancelToken::new(),
        AckPayload::default(),
    );

    assert_eq!(out, "radio hardware is not responding!!\n");
    assert!(transport.writing_address.is_empty());
    assert!(transport.sent.is_empty());
}

#[test]
fn getting_started_names_the_chip_when_unresponsive() {
    let mut transport = ScriptedTransport::new();
    transport.responding = false;

    let out = run_demo(
        Demo::getting_started(),
        &["getting_started"],
        "0\n",
        &mut transport,
        CancelToken::new(),
        FloatPayload(0.0),
    );

    assert_eq!(out, "nRF24L01 is not responding!!\n");
    assert!(transport.reading_pipes.is_empty());
}

#[test]
fn odd_argument_count_prints_usage_only() {
    let mut transport = ScriptedTransport::new();

    let out = run_demo(
        Demo::getting_started(),
        &["getting_started", "-n"],
        "0\nt\n",
        &mut transport,
        CancelToken::new(),
        FloatPayload(0.0),
    );

    assert!(out.contains("Usage"));
    assert!(out.contains("--role"));
    assert!(!out.contains("Which radio"));
    assert!(transport.sent.is_empty());
    assert!(transport.reading_pipes.is_empty());
}

#[test]
fn flags_run_transmitter_without_prompting() {
    let mut transport = ScriptedTransport::always_failing();

    let out = run_demo(
        Demo::ack_payloads(),
        &["ack_payloads", "-n", "1", "-r", "1"],
        "",
        &mut transport,
        CancelToken::new(),
        AckPayload::default(),
    );

    assert!(out.starts_with("ack_payloads\n"));
    assert!(!out.contains("Which radio"));
    assert!(!out.contains("*** PRESS"));
    assert!(out.ends_with("6 failures detected. Leaving TX role.\n"));
    assert_eq!(transport.writing_address, b"2Node");
    let listening_on = vec![(DataPipe::DP1, b"1Node".to_vec())];
    assert_eq!(transport.reading_pipes, listening_on);
    assert!(transport.dynamic_payloads);
    assert!(transport.ack_payloads_enabled);
    assert_eq!(transport.pa_level, Some(PALevel::Low));
}

#[test]
fn flags_run_receiver_on_node_zero() {
    let mut transport = ScriptedTransport::new();

    let out = run_demo(
        Demo::getting_started(),
        &["getting_started", "--node", "0", "--role", "0"],
        "",
        &mut transport,
        CancelToken::new(),
        FloatPayload(0.0),
    );

    let last = "Nothing received in 6 seconds. Leaving RX role.\n";
    assert!(out.ends_with(last));
    assert_eq!(transport.writing_address, b"1Node");
    let listening_on = vec![(DataPipe::DP1, b"2Node".to_vec())];
    assert_eq!(transport.reading_pipes, listening_on);
    assert!(!transport.dynamic_payloads);
    assert!(!transport.ack_payloads_enabled);
}

#[test]
fn interactive_session_until_quit() {
    let mut transport = ScriptedTransport::always_failing();

    let out = run_demo(
        Demo::getting_started(),
        &["getting_started"],
        "1\nx\nt\nq\n",
        &mut transport,
        CancelToken::new(),
        FloatPayload(0.0),
    );

    let prompt = "Which radio is this? Enter '0' or '1'. Defaults to '0' ";
    assert!(out.contains(prompt));
    assert!(out.contains("x is an invalid input. Please try again.\n"));
    assert!(out.contains("6 failures detected. Leaving TX role.\n"));
    assert_eq!(out.matches("*** PRESS 'Q' to exit").count(), 3);
    assert_eq!(transport.writing_address, b"2Node");
    assert!(!transport.powered_down);
}

#[test]
fn end_of_input_quits_role_prompt() {
    let mut transport = ScriptedTransport::new();

    let out = run_demo(
        Demo::ack_payloads(),
        &["ack_payloads", "-n", "0"],
        "",
        &mut transport,
        CancelToken::new(),
        AckPayload::default(),
    );

    assert_eq!(out.matches("*** PRESS 'T'").count(), 1);
    assert!(transport.sent.is_empty());
}

#[test]
fn interrupt_powers_radio_down() {
    let cancel = CancelToken::new();
    let mut transport = ScriptedTransport::always_failing();
    transport.cancel_after_writes = Some((1, cancel.clone()));

    let out = run_demo(
        Demo::getting_started(),
        &["getting_started", "-n", "0", "-r", "1"],
        "",
        &mut transport,
        cancel,
        FloatPayload(0.0),
    );

    assert!(out.ends_with(" Interrupt signal detected. Exiting...\n"));
    assert!(!out.contains("failures detected"));
    assert_eq!(transport.sent.len(), 1);
    assert!(transport.powered_down);
}

#[test]
fn io_handles_print_for_debugging() {
    let io = Io {
        transport: ScriptedTransport::new(),
        clock: ManualClock::new(),
        input: &b""[..],
        out: Vec::<u8>::new(),
        cancel: CancelToken::new(),
    };
    assert!(format!("{:?}", io).starts_with("Io {"));
}
