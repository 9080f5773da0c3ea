use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex};

use launchpad_pro::message::{self, SYSEX_HEADER};
use launchpad_pro::mock::{MockInput, MockOutput};
use launchpad_pro::{
    Channel, Direction, LaunchpadPro, Layout, LedFrame, Message, MidiError, MockBackend, Mode,
    Session,
};

type MockSession = Session<MockOutput, MockInput>;

fn open_standalone() -> (MockBackend, MockSession) {
    let _ = env_logger::builder().is_test(true).try_init();

    let backend = MockBackend::launchpad_pro();
    let device = LaunchpadPro::discover_with(backend.clone(), Mode::Standalone).unwrap();
    assert_eq!(device.binding().input, "MIDIIN2 (Launchpad Pro)");
    assert_eq!(device.binding().output, "MIDIOUT2 (Launchpad Pro)");

    let session = device.open().unwrap();
    (backend, session)
}

fn sysex(command: u8, rest: &[u8]) -> Vec<u8> {
    let mut bytes = vec![240];
    bytes.extend(&SYSEX_HEADER);
    bytes.push(command);
    bytes.extend(rest);
    bytes.push(247);
    bytes
}

#[test]
fn csv_frame_reaches_the_wire() {
    let (backend, mut session) = open_standalone();

    let frame = LedFrame::from_reader("r,g,b\n1,2,3\n4,5,6\n".as_bytes()).unwrap();
    assert_eq!(frame.colors(), &[1, 2, 3, 4, 5, 6][..]);
    assert_eq!(
        message::set_lit(frame.colors()).data(),
        &[0, 32, 41, 2, 16, 14, 1, 2, 3, 4, 5, 6][..]
    );

    session.set_lit(frame.colors()).unwrap();
    assert_eq!(backend.sent(), vec![sysex(14, &[1, 2, 3, 4, 5, 6])]);
}

#[test]
fn commands_are_sent_in_call_order() {
    let (backend, mut session) = open_standalone();

    session.change_layout(Layout::Programmer).unwrap();
    session.change_layout(Layout::Note).unwrap();
    session.column_lit(1, &[5, 5]).unwrap();
    session.row_lit(1, &[9]).unwrap();
    session.all_lit(0).unwrap();

    assert_eq!(
        backend.sent(),
        vec![
            sysex(44, &[3]),
            sysex(44, &[0]),
            sysex(12, &[1, 5, 5]),
            sysex(13, &[1, 9]),
            sysex(14, &[0]),
        ]
    );
}

#[test]
fn oversized_payloads_are_cut_not_refused() {
    let (backend, mut session) = open_standalone();

    let line: Vec<u8> = (20..32).collect();
    session.column_lit(2, &line).unwrap();

    let frame: Vec<u8> = vec![3; 100];
    session.set_lit(&frame).unwrap();

    let sent = backend.sent();
    assert_eq!(sent[0], sysex(12, &[2, 20, 21, 22, 23, 24, 25, 26, 27, 28]));
    assert_eq!(sent[1], sysex(14, &[3; 96]));
}

#[test]
fn note_fan_out_on_channel() {
    let (backend, mut session) = open_standalone();

    session.all_on(Channel::new(1).unwrap()).unwrap();
    session.all_off(Channel::new(3).unwrap()).unwrap();

    let sent = backend.sent();
    assert_eq!(sent.len(), 196);
    let expected_on: Vec<Vec<u8>> = (1..=98).map(|note| vec![0x90, note, 127]).collect();
    assert_eq!(&sent[..98], &expected_on[..]);
    assert!(sent[98..].iter().all(|msg| msg[0] == 0x82 && msg[2] == 64));
    assert_eq!(sent[195][1], 98);
}

#[test]
fn last_registered_handler_wins() {
    let (backend, mut session) = open_standalone();

    // The default handler only logs
    assert!(backend.receive(1, &[0x90, 11, 127]));

    let first = Arc::new(Mutex::new(Vec::new()));
    let second = Arc::new(Mutex::new(Vec::new()));

    let sink = Arc::clone(&first);
    session.on_message(move |_, msg| sink.lock().unwrap().push(msg));
    backend.receive(2, &[0x90, 11, 127]);

    let sink = Arc::clone(&second);
    session.on_message(move |timestamp, msg| sink.lock().unwrap().push((timestamp, msg)));
    backend.receive(3, &[0x90, 11, 0]);
    backend.receive(4, &[240, 0, 32, 41, 2, 16, 44, 3, 247]);

    assert_eq!(
        *first.lock().unwrap(),
        vec![Message::Press {
            channel: 0,
            note: 11,
            velocity: 127
        }]
    );
    assert_eq!(
        *second.lock().unwrap(),
        vec![
            (3, Message::Release { channel: 0, note: 11 }),
            (4, Message::Sysex(vec![0, 32, 41, 2, 16, 44, 3])),
        ]
    );
}

#[test]
fn replacing_a_panicked_handler_restores_delivery() {
    let (backend, mut session) = open_standalone();

    session.on_message(|_, _| panic!("handler failure"));
    let press: [u8; 3] = [0x90, 11, 127];
    let delivery = panic::catch_unwind(AssertUnwindSafe(|| backend.receive(1, &press)));
    assert!(delivery.is_err());

    let hits = Arc::new(Mutex::new(0));
    let counter = Arc::clone(&hits);
    session.on_message(move |_, _| *counter.lock().unwrap() += 1);

    assert!(backend.receive(2, &press));
    assert!(backend.receive(3, &[0x90, 11, 0]));
    assert_eq!(*hits.lock().unwrap(), 2);
}

#[test]
fn handler_given_at_open() {
    let _ = env_logger::builder().is_test(true).try_init();
    let backend = MockBackend::launchpad_pro();
    let device = LaunchpadPro::discover_with(backend.clone(), Mode::Hardware).unwrap();

    let presses = Arc::new(Mutex::new(0));
    let counter = Arc::clone(&presses);
    let _session = device
        .open_with_handler(move |_, msg| {
            if msg.is_press() {
                *counter.lock().unwrap() += 1;
            }
        })
        .unwrap();

    backend.receive(0, &[0x90, 81, 40]);
    backend.receive(0, &[0xB0, 91, 127]);
    backend.receive(0, &[0x90, 82, 90]);
    assert_eq!(*presses.lock().unwrap(), 2);
}

#[test]
fn close_clears_resets_and_releases_once() {
    let (backend, mut session) = open_standalone();
    assert!(session.is_open());

    session.close().unwrap();
    assert!(!session.is_open());

    let sent = backend.sent();
    // clear, then 16 x (all notes off, reset controllers), then 16 x all sound off
    assert_eq!(sent.len(), 1 + 32 + 16);
    assert_eq!(sent[0], sysex(14, &[0]));
    assert_eq!(sent[1], vec![0xB0, 123, 0]);
    assert_eq!(sent[2], vec![0xB0, 121, 0]);
    assert_eq!(sent[33], vec![0xB0, 120, 0]);
    assert_eq!(sent[48], vec![0xBF, 120, 0]);
    assert_eq!(backend.outputs_closed(), 1);
    assert_eq!(backend.inputs_closed(), 1);

    // Second close is a no-op
    session.close().unwrap();
    assert_eq!(backend.sent().len(), 49);
    assert_eq!(backend.outputs_closed(), 1);
    assert_eq!(backend.inputs_closed(), 1);

    // Nothing is delivered any more, and sends are refused
    assert!(!backend.receive(0, &[0x90, 11, 127]));
    assert!(matches!(session.all_lit(5), Err(MidiError::SessionClosed)));

    drop(session);
    assert_eq!(backend.outputs_closed(), 1);
}

#[test]
fn drop_closes_the_session() {
    let (backend, session) = open_standalone();
    drop(session);
    assert_eq!(backend.outputs_closed(), 1);
    assert_eq!(backend.inputs_closed(), 1);
}

#[test]
fn teardown_releases_ports_even_when_sends_fail() {
    let (backend, mut session) = open_standalone();

    backend.set_fail_sends(true);
    assert!(matches!(
        session.change_layout(Layout::Programmer),
        Err(MidiError::Disconnected)
    ));
    assert!(matches!(
        session.all_on(Channel::default()),
        Err(MidiError::Disconnected)
    ));

    assert!(matches!(session.close(), Err(MidiError::Disconnected)));
    assert!(!session.is_open());
    assert_eq!(backend.outputs_closed(), 1);
    assert_eq!(backend.inputs_closed(), 1);
    assert!(backend.sent().is_empty());
}

#[test]
fn discovery_failures() {
    let missing = MockBackend::new(vec!["MIDIIN2 (Launchpad Pro)"], vec!["Some Synth"]);
    match LaunchpadPro::discover_with(missing, Mode::Standalone) {
        Err(e @ MidiError::NoPortFound { .. }) => {
            assert!(e.is_configuration());
            assert!(matches!(
                e,
                MidiError::NoPortFound {
                    direction: Direction::Output,
                    ..
                }
            ));
        }
        Err(other) => panic!("unexpected error {}", other),
        Ok(_) => panic!("resolution should have failed"),
    }

    let doubled = MockBackend::new(
        vec!["MIDIIN2 (Launchpad Pro)", "MIDIIN2 (Launchpad Pro) [2]"],
        vec!["MIDIOUT2 (Launchpad Pro)"],
    );
    assert!(matches!(
        LaunchpadPro::discover_with(doubled, Mode::Standalone),
        Err(MidiError::TooManyPorts {
            direction: Direction::Input,
            ..
        })
    ));
}
