//! The parts shared by the `lp-frame` and `lp-showcase` programs: command line options, logging
//! setup, the lighting sequences and the exit prompt.

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::mpsc::{Receiver, Sender};
use std::time::Duration;

use crate::message::{Channel, Layout};
use crate::midi_io::{InputConnection, OutputConnection};
use crate::{LedFrame, Message, MidiError, Mode, Session};

pub const EXIT_PROMPT: &str = "Press Ctrl+C to exit or enter quit.";

/// Colors used for the column and row steps of the showcase
pub const SHOWCASE_LINE: [u8; 10] = [12, 13, 14, 15, 16, 17, 18, 19, 20, 21];
/// Color used for the light-all step of the showcase
pub const SHOWCASE_FILL: u8 = 6;

#[derive(clap::Args, Debug, Clone)]
pub struct CommonArgs {
    /// Which Launchpad Pro interface to use: ableton, standalone or hardware
    #[arg(short, long, default_value_t = Mode::Standalone)]
    pub mode: Mode,

    /// CSV file with one header line followed by rows of palette indices
    #[arg(short, long, default_value = "led.csv")]
    pub csv: PathBuf,

    /// Log filter, e.g. `debug` or `launchpad_pro=trace`. Defaults to RUST_LOG, then `info`
    #[arg(long)]
    pub log_level: Option<String>,
}

/// Set up `env_logger`. An explicit filter wins over `RUST_LOG`.
pub fn init_logging(filter: Option<&str>) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if let Some(filter) = filter {
        builder.parse_filters(filter);
    }
    // A logger may already be installed, e.g. when called twice
    let _ = builder.try_init();
}

/// Programmer layout, the whole grid in `fill`, then the frame on top.
pub fn light_frame<O, I>(
    session: &mut Session<O, I>,
    frame: &LedFrame,
    fill: u8,
) -> Result<(), MidiError>
where
    O: OutputConnection,
    I: InputConnection,
{
    session.change_layout(Layout::Programmer)?;
    session.all_lit(fill)?;
    session.set_lit(frame.colors())?;
    log::info!(
        "Lit {} pads from the frame",
        frame.len().min(crate::message::MAX_FRAME_COLORS)
    );
    Ok(())
}

/// Runs through every lighting command once, pausing `pause` between the steps.
pub fn showcase<O, I>(
    session: &mut Session<O, I>,
    frame: &LedFrame,
    pause: Duration,
) -> Result<(), MidiError>
where
    O: OutputConnection,
    I: InputConnection,
{
    let channel = Channel::default();

    session.change_layout(Layout::Programmer)?;

    // LEDs through sysex
    session.set_lit(frame.colors())?;
    std::thread::sleep(pause);
    session.column_lit(0, &SHOWCASE_LINE)?;
    std::thread::sleep(pause);
    session.row_lit(0, &SHOWCASE_LINE)?;
    std::thread::sleep(pause);
    session.all_lit(SHOWCASE_FILL)?;
    std::thread::sleep(pause);

    // LEDs through notes
    session.all_on(channel)?;
    std::thread::sleep(pause);
    session.all_off(channel)?;

    Ok(())
}

/// Close the session at exit. A failed teardown, e.g. after the device was unplugged, is only
/// reported: the user asked to quit and the ports are released either way.
pub fn shut_down<O, I>(session: &mut Session<O, I>)
where
    O: OutputConnection,
    I: InputConnection,
{
    if let Err(e) = session.close() {
        log::error!("Teardown did not complete cleanly: {}", e);
    }
}

/// Whether [print_message] echoes `msg`. Pad presses and releases, control changes and sysex
/// replies are echoed; pressure updates would flood the terminal.
pub fn is_printed(msg: &Message) -> bool {
    matches!(
        msg,
        Message::Press { .. }
            | Message::Release { .. }
            | Message::ControlChange { .. }
            | Message::Sysex(_)
    )
}

pub fn print_message(_timestamp: u64, msg: Message) {
    if is_printed(&msg) {
        println!("{}", msg);
    } else {
        log::trace!("Ignoring {}", msg);
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum ExitEvent {
    Line(String),
    Interrupt,
    EndOfInput,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ExitReason {
    Quit,
    Interrupted,
    EndOfInput,
}

pub fn is_exit_command(line: &str) -> bool {
    matches!(line.trim(), "quit" | "q")
}

/// Forward Ctrl+C to `events`.
pub fn forward_interrupts(events: Sender<ExitEvent>) -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(move || {
        let _ = events.send(ExitEvent::Interrupt);
    })
}

/// Feed the lines of `input` into `events` from a background thread.
pub fn forward_lines<R>(input: R, events: Sender<ExitEvent>)
where
    R: BufRead + Send + 'static,
{
    std::thread::spawn(move || {
        for line in input.lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    log::warn!("Reading standard input failed: {}", e);
                    break;
                }
            };
            if events.send(ExitEvent::Line(line)).is_err() {
                return;
            }
        }
        let _ = events.send(ExitEvent::EndOfInput);
    });
}

/// Block until the user asks to quit, hits Ctrl+C, or the input ends.
pub fn wait_for_exit(events: &Receiver<ExitEvent>, mut prompt: impl Write) -> ExitReason {
    loop {
        let _ = write!(prompt, "{}", EXIT_PROMPT);
        let _ = prompt.flush();

        match events.recv() {
            Ok(ExitEvent::Line(line)) if is_exit_command(&line) => return ExitReason::Quit,
            Ok(ExitEvent::Line(line)) => log::debug!("Ignoring input {:?}", line),
            Ok(ExitEvent::Interrupt) => return ExitReason::Interrupted,
            Ok(ExitEvent::EndOfInput) | Err(_) => return ExitReason::EndOfInput,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LaunchpadPro, MockBackend};
    use std::sync::mpsc::channel;

    #[test]
    fn exit_commands() {
        assert!(is_exit_command("quit"));
        assert!(is_exit_command("q\r"));
        assert!(!is_exit_command("exit"));
        assert!(!is_exit_command(""));
    }

    #[test]
    fn shut_down_survives_an_unplugged_device() {
        let backend = MockBackend::launchpad_pro();
        let device = LaunchpadPro::discover_with(backend.clone(), Mode::Standalone).unwrap();
        let mut session = device.open().unwrap();

        backend.set_fail_sends(true);
        shut_down(&mut session);

        assert!(!session.is_open());
        assert_eq!(backend.outputs_closed(), 1);
        assert_eq!(backend.inputs_closed(), 1);
    }

    #[test]
    fn presses_and_releases_are_echoed() {
        assert!(is_printed(&Message::decode(&[0x90, 81, 100])));
        assert!(is_printed(&Message::decode(&[0x90, 81, 0])));
        assert!(is_printed(&Message::decode(&[0xB0, 91, 127])));
        assert!(is_printed(&Message::decode(&[240, 0, 32, 41, 2, 16, 44, 3, 247])));
        assert!(!is_printed(&Message::decode(&[0xA0, 44, 12])));
        assert!(!is_printed(&Message::decode(&[0xF8])));
    }

    #[test]
    fn waits_for_quit() {
        let (sender, events) = channel();
        forward_lines("hello\n\nq\nnever read\n".as_bytes(), sender);

        let mut prompt = Vec::new();
        assert_eq!(wait_for_exit(&events, &mut prompt), ExitReason::Quit);
        let prompt = String::from_utf8(prompt).unwrap();
        assert_eq!(prompt.matches(EXIT_PROMPT).count(), 3);
    }

    #[test]
    fn interrupt_and_end_of_input() {
        let (sender, events) = channel();
        sender.send(ExitEvent::Line("x".to_owned())).unwrap();
        sender.send(ExitEvent::Interrupt).unwrap();
        assert_eq!(wait_for_exit(&events, std::io::sink()), ExitReason::Interrupted);

        let (sender, events) = channel();
        forward_lines("".as_bytes(), sender);
        assert_eq!(wait_for_exit(&events, std::io::sink()), ExitReason::EndOfInput);
    }

    #[test]
    fn frame_sequence() {
        let backend = MockBackend::launchpad_pro();
        let device = LaunchpadPro::discover_with(backend.clone(), Mode::Standalone).unwrap();
        let mut session = device.open().unwrap();

        let frame = LedFrame::from_colors(vec![1, 2, 3]);
        light_frame(&mut session, &frame, 21).unwrap();

        assert_eq!(
            backend.sent(),
            vec![
                vec![240, 0, 32, 41, 2, 16, 44, 3, 247],
                vec![240, 0, 32, 41, 2, 16, 14, 21, 247],
                vec![240, 0, 32, 41, 2, 16, 14, 1, 2, 3, 247],
            ]
        );
    }

    #[test]
    fn showcase_sequence() {
        let backend = MockBackend::launchpad_pro();
        let device = LaunchpadPro::discover_with(backend.clone(), Mode::Standalone).unwrap();
        let mut session = device.open().unwrap();

        showcase(&mut session, &LedFrame::default(), Duration::from_millis(0)).unwrap();

        let sent = backend.sent();
        // layout, frame, column, row, fill, then 98 note-ons and 98 note-offs
        assert_eq!(sent.len(), 5 + 2 * 98);
        // Exactly 10 colors fit, so nothing is cut
        assert_eq!(sent[2][6], 12);
        assert_eq!(sent[2].len(), 5 + 2 + 1 + 10 + 1);
        assert_eq!(sent[2][8..18], SHOWCASE_LINE);
        assert_eq!(sent[3][6], 13);
        assert_eq!(sent[3][8..18], SHOWCASE_LINE);
        assert_eq!(sent[4], vec![240, 0, 32, 41, 2, 16, 14, 6, 247]);
        assert_eq!(sent[5], vec![0x90, 1, 127]);
        assert_eq!(sent[200], vec![0x80, 98, 64]);
    }
}
