mod common;

use common::{ack_bytes, ScriptedTransport};
use nrf24_demos::cancel::CancelToken;
use nrf24_demos::clock::{Clock, ManualClock};
use nrf24_demos::config::DataPipe;
use nrf24_demos::payload::{AckPayload, FloatPayload, Payload};
use nrf24_demos::role::{self, RxOutcome, TxOutcome};
use nrf24_demos::session::{DemoSettings, Session};
use std::time::Duration;

type TestSession<P> = Session<ScriptedTransport, ManualClock, Vec<u8>, P>;

fn session<P: Payload>(
    transport: ScriptedTransport,
    payload: P,
    ack_payloads: bool,
) -> TestSession<P> {
    let settings = DemoSettings {
        ack_payloads,
        ..DemoSettings::default()
    };
    Session::new(
        transport,
        ManualClock::new(),
        Vec::new(),
        payload,
        settings,
        CancelToken::new(),
    )
}

fn output<P>(session: &TestSession<P>) -> String {
    String::from_utf8(session.out().clone()).unwrap()
}

#[test]
fn transmitter_stops_after_exactly_six_failures() {
    let mut session = session(ScriptedTransport::always_failing(), FloatPayload(0.0), false);

    let outcome = role::transmit(&mut session).unwrap();

    assert_eq!(
        outcome,
        TxOutcome::Stopped {
            failures: 6,
            delivered: 0
        }
    );
    assert_eq!(session.transport().sent.len(), 6);
    let out = output(&session);
    assert_eq!(out.matches("Transmission failed or timed out").count(), 6);
    assert!(out.ends_with("6 failures detected. Leaving TX role.\n"));
    // one interval after every attempt
    assert_eq!(session.clock().now(), Duration::from_secs(6));
}

#[test]
fn deliveries_do_not_reset_failure_count() {
    let transport = ScriptedTransport::with_deliveries(&[false, true, false, true, false]);
    let mut session = session(transport, FloatPayload(0.0), false);

    let outcome = role::transmit(&mut session).unwrap();

    assert_eq!(
        outcome,
        TxOutcome::Stopped {
            failures: 6,
            delivered: 2
        }
    );
    assert_eq!(session.transport().sent.len(), 8);
}

#[test]
fn float_payload_steps_after_each_delivery() {
    let transport = ScriptedTransport::with_deliveries(&[true, true, false]);
    let mut session = session(transport, FloatPayload(0.0), false);

    role::transmit(&mut session).unwrap();

    let sent: Vec<String> = session
        .transport()
        .sent
        .iter()
        .map(|buf| FloatPayload::decode(buf).to_string())
        .collect();
    assert_eq!(&sent[..3], &["0.00", "0.01", "0.02"]);
    assert_eq!(session.transport().sent[0].len(), FloatPayload::SIZE);

    let out = output(&session);
    let first = "Transmission successful! Time to transmit = 0 us. Sent: 0.00\n";
    assert!(out.contains(first));
    assert!(out.contains("Sent: 0.01\n"));
    assert_eq!(session.payload().to_string(), "0.02");
}

#[test]
fn transmitter_adopts_ack_payload_counter() {
    let mut transport = ScriptedTransport::with_deliveries(&[true, true, true]);
    transport.ack_replies = [
        Some(ack_bytes("World ", 5)),
        None,
        Some(ack_bytes("World ", 9)),
    ]
    .into_iter()
    .collect();
    let mut session = session(transport, AckPayload::default(), true);

    role::transmit(&mut session).unwrap();

    let sent = &session.transport().sent;
    let counters: Vec<u8> = sent.iter().map(|buf| buf[7]).collect();
    // an empty ACK leaves the counter alone
    assert_eq!(&counters[..4], &[0, 6, 6, 10]);
    assert!(sent.iter().all(|buf| buf.starts_with(b"Hello ")));

    let out = output(&session);
    for line in [
        "Sent: Hello 0 Received 8 bytes on pipe 0: World 5\n",
        "Sent: Hello 6 Received an empty ACK packet.\n",
        "Sent: Hello 6 Received 8 bytes on pipe 0: World 9\n",
    ] {
        assert!(out.contains(line), "missing {:?}", line);
    }
}

#[test]
fn receiver_gives_up_after_six_idle_seconds() {
    let mut session = session(ScriptedTransport::new(), FloatPayload(0.0), false);

    let outcome = role::receive(&mut session).unwrap();

    assert_eq!(outcome, RxOutcome::IdleTimeout { received: 0 });
    assert_eq!(session.clock().now(), Duration::from_secs(6));
    assert_eq!(
        output(&session),
        "Nothing received in 6 seconds. Leaving RX role.\n"
    );
    assert!(!session.transport().listening);
}

#[test]
fn receipt_restarts_idle_window() {
    let payload = FloatPayload(1.5);
    let mut bytes = [0u8; 4];
    payload.encode(&mut bytes);
    // polls are 1 ms apart, so this one lands at 3 s
    let transport = ScriptedTransport::new().receive_at(3001, DataPipe::DP1, &bytes);
    let mut session = session(transport, FloatPayload(0.0), false);

    let outcome = role::receive(&mut session).unwrap();

    assert_eq!(outcome, RxOutcome::IdleTimeout { received: 1 });
    assert_eq!(session.clock().now(), Duration::from_secs(9));
    let out = output(&session);
    assert!(out.starts_with("Received 4 bytes on pipe 1: 1.50\n"));
    assert_eq!(*session.payload(), payload);
}

#[test]
fn receiver_answers_with_incremented_counter() {
    let transport = ScriptedTransport::new()
        .receive_at(1, DataPipe::DP1, &ack_bytes("Hello ", 0))
        .receive_at(5, DataPipe::DP1, &ack_bytes("Hello ", 6));
    let mut session = session(transport, AckPayload::default(), true);

    let outcome = role::receive(&mut session).unwrap();

    assert_eq!(outcome, RxOutcome::IdleTimeout { received: 2 });
    let armed: Vec<(DataPipe, String)> = session
        .transport()
        .ack_payloads
        .iter()
        .map(|(pipe, buf)| (*pipe, AckPayload::decode(buf).to_string()))
        .collect();
    assert_eq!(
        armed,
        vec![
            (DataPipe::DP1, "World 0".to_string()),
            (DataPipe::DP1, "World 1".to_string()),
            (DataPipe::DP1, "World 7".to_string()),
        ]
    );

    let out = output(&session);
    for line in [
        "Received 8 bytes on pipe 1: Hello 0 Sent: World 0\n",
        "Received 8 bytes on pipe 1: Hello 6 Sent: World 1\n",
    ] {
        assert!(out.contains(line), "missing {:?}", line);
    }
}

#[test]
fn cancellation_stops_transmitter_between_attempts() {
    let cancel = CancelToken::new();
    let mut transport = ScriptedTransport::always_failing();
    transport.cancel_after_writes = Some((2, cancel.clone()));
    let mut session = Session::new(
        transport,
        ManualClock::new(),
        Vec::new(),
        FloatPayload(0.0),
        DemoSettings::default(),
        cancel,
    );

    assert_eq!(role::transmit(&mut session).unwrap(), TxOutcome::Cancelled);
    assert_eq!(session.transport().sent.len(), 2);
    assert!(!output(&session).contains("failures detected"));
}

#[test]
fn cancelled_receiver_returns_at_once() {
    let cancel = CancelToken::new();
    cancel.cancel();
    let mut session = Session::new(
        ScriptedTransport::new(),
        ManualClock::new(),
        Vec::new(),
        FloatPayload(0.0),
        DemoSettings::default(),
        cancel,
    );

    assert_eq!(role::receive(&mut session).unwrap(), RxOutcome::Cancelled);
    assert_eq!(session.transport().polls, 0);
}
