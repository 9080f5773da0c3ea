use std::sync::{Arc, Mutex};

use crate::message::{self, Channel, Layout, SysexMessage};
use crate::midi_io::{
    InputConnection, MidiBackend, MidirBackend, MidirInput, MidirOutput, OutputConnection,
};
use crate::{resolve, Message, MidiError, Mode, PaletteColor, PortBinding};

/// Callback for inbound messages. Receives the transport timestamp in microseconds.
pub type Handler = Box<dyn FnMut(u64, Message) + Send + 'static>;

/// The handler installed when none is given. It only logs.
pub fn default_handler() -> Handler {
    Box::new(|timestamp, msg| log::debug!("Received msg at {}: {}", timestamp, msg))
}

/// A Launchpad Pro whose ports have been found, but not yet opened.
///
/// ```no_run
/// use launchpad_pro::{Layout, LaunchpadPro, Mode};
///
/// let device = LaunchpadPro::discover(Mode::Standalone)?;
/// let mut session = device.open_with_handler(|_, msg| println!("{}", msg))?;
/// session.change_layout(Layout::Programmer)?;
/// session.all_lit(5)?;
/// session.close()?;
/// # Ok::<(), launchpad_pro::MidiError>(())
/// ```
pub struct LaunchpadPro<B: MidiBackend = MidirBackend> {
    backend: B,
    binding: PortBinding,
}

impl LaunchpadPro<MidirBackend> {
    /// Search the system's MIDI ports for exactly one Launchpad Pro input and output in `mode`.
    pub fn discover(mode: Mode) -> Result<Self, MidiError> {
        Self::discover_with(MidirBackend::new(), mode)
    }
}

impl<B: MidiBackend> LaunchpadPro<B> {
    /// Like [LaunchpadPro::discover], but enumerating through the given backend.
    pub fn discover_with(backend: B, mode: Mode) -> Result<Self, MidiError> {
        let inputs = backend.input_port_names()?;
        let outputs = backend.output_port_names()?;
        log::debug!("Available inputs: {:?}, outputs: {:?}", inputs, outputs);

        let binding = resolve(mode, &inputs, &outputs)?;
        log::info!(
            "Using Launchpad Pro input {:?} and output {:?} ({} mode)",
            binding.input,
            binding.output,
            mode
        );

        Ok(Self { backend, binding })
    }

    pub fn binding(&self) -> &PortBinding {
        &self.binding
    }

    pub fn mode(&self) -> Mode {
        self.binding.mode
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Open both ports. Inbound messages are logged.
    pub fn open(&self) -> Result<Session<B::Output, B::Input>, MidiError> {
        self.open_handler(default_handler())
    }

    /// Open both ports, calling `handler` for every inbound message.
    ///
    /// The handler runs on whichever thread the MIDI backend delivers messages on.
    pub fn open_with_handler<F>(
        &self,
        handler: F,
    ) -> Result<Session<B::Output, B::Input>, MidiError>
    where
        F: FnMut(u64, Message) + Send + 'static,
    {
        self.open_handler(Box::new(handler))
    }

    fn open_handler(&self, handler: Handler) -> Result<Session<B::Output, B::Input>, MidiError> {
        let slot = Arc::new(Mutex::new(handler));

        let callback_slot = Arc::clone(&slot);
        let input = self.backend.connect_input(
            &self.binding.input,
            Box::new(move |timestamp: u64, data: &[u8]| {
                let msg = Message::decode(data);
                // The slot stays usable after a handler panicked
                let mut handler = match callback_slot.lock() {
                    Ok(handler) => handler,
                    Err(poisoned) => poisoned.into_inner(),
                };
                (handler)(timestamp, msg);
            }),
        )?;

        let output = match self.backend.connect_output(&self.binding.output) {
            Ok(output) => output,
            Err(e) => {
                input.close();
                return Err(e);
            }
        };

        log::info!("Opened Launchpad Pro session on {:?}", self.binding.output);

        Ok(Session {
            binding: self.binding.clone(),
            output: Some(output),
            input: Some(input),
            handler: slot,
        })
    }
}

/// An open connection to a Launchpad Pro.
///
/// All sends take `&mut self`, so messages can't interleave on the wire. To send from several
/// threads, put the session behind a `Mutex`.
///
/// Only one session per device should be open at a time; this is not checked. The ports are
/// released by [Session::close], or when the session is dropped.
pub struct Session<O = MidirOutput, I = MidirInput>
where
    O: OutputConnection,
    I: InputConnection,
{
    binding: PortBinding,
    output: Option<O>,
    input: Option<I>,
    handler: Arc<Mutex<Handler>>,
}

impl<O: OutputConnection, I: InputConnection> Session<O, I> {
    pub fn binding(&self) -> &PortBinding {
        &self.binding
    }

    pub fn is_open(&self) -> bool {
        self.output.is_some() || self.input.is_some()
    }

    /// Replace the inbound message handler. Only the most recently registered handler is called.
    pub fn on_message<F>(&mut self, handler: F)
    where
        F: FnMut(u64, Message) + Send + 'static,
    {
        match self.handler.lock() {
            Ok(mut slot) => *slot = Box::new(handler),
            Err(poisoned) => *poisoned.into_inner() = Box::new(handler),
        }
    }

    /// Send raw bytes to the device
    pub fn send_raw(&mut self, bytes: &[u8]) -> Result<(), MidiError> {
        log::trace!("Sending {:?}", bytes);
        match self.output.as_mut() {
            Some(output) => output.send(bytes),
            None => Err(MidiError::SessionClosed),
        }
    }

    pub fn send_sysex(&mut self, msg: &SysexMessage) -> Result<(), MidiError> {
        self.send_raw(&msg.to_bytes())
    }

    pub fn change_layout(&mut self, layout: Layout) -> Result<(), MidiError> {
        self.send_sysex(&message::change_layout(layout))
    }

    /// Light a column, colors ordered bottom to top. Only the first 9 of more than 10 colors
    /// are sent.
    pub fn column_lit(&mut self, column: u8, colors: &[u8]) -> Result<(), MidiError> {
        self.send_sysex(&message::column_lit(column, colors))
    }

    /// Light a row, colors ordered left to right. Only the first 9 of more than 10 colors are
    /// sent.
    pub fn row_lit(&mut self, row: u8, colors: &[u8]) -> Result<(), MidiError> {
        self.send_sysex(&message::row_lit(row, colors))
    }

    pub fn all_lit(&mut self, color: u8) -> Result<(), MidiError> {
        self.send_sysex(&message::all_lit(color))
    }

    pub fn all_lit_multiple(&mut self, colors: &[u8]) -> Result<(), MidiError> {
        self.send_sysex(&message::all_lit_multiple(colors))
    }

    /// Light every pad in scan order. Frames longer than 96 colors are cut.
    pub fn set_lit(&mut self, colors: &[u8]) -> Result<(), MidiError> {
        self.send_sysex(&message::set_lit(colors))
    }

    /// Light every pad by sending a full-velocity note-on for each pad note. Stops at the first
    /// failed send.
    pub fn all_on(&mut self, channel: Channel) -> Result<(), MidiError> {
        for msg in message::all_on(channel) {
            self.send_raw(&msg)?;
        }
        Ok(())
    }

    /// Send a note-off for each pad note. Stops at the first failed send.
    pub fn all_off(&mut self, channel: Channel) -> Result<(), MidiError> {
        for msg in message::all_off(channel) {
            self.send_raw(&msg)?;
        }
        Ok(())
    }

    /// Clear the LEDs, reset the device and release both ports.
    ///
    /// Every step is attempted even if an earlier one failed. Failures are logged, and the first
    /// one is returned. Closing an already closed session does nothing.
    pub fn close(&mut self) -> Result<(), MidiError> {
        if !self.is_open() {
            return Ok(());
        }

        let mut first_error = None;
        let mut note = |step: &str, result: Result<(), MidiError>| {
            if let Err(e) = result {
                log::warn!("Teardown step '{}' failed: {}", step, e);
                first_error.get_or_insert(e);
            }
        };

        note("clear", self.all_lit(PaletteColor::BLACK.id()));
        note("reset", self.send_each(message::reset_messages()));
        note("panic", self.send_each(message::panic_messages()));

        if let Some(output) = self.output.take() {
            output.close();
        }
        if let Some(input) = self.input.take() {
            input.close();
        }
        log::info!("Closed Launchpad Pro session on {:?}", self.binding.output);

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Send every message, keep going after failures and report the first one
    fn send_each(&mut self, messages: impl Iterator<Item = [u8; 3]>) -> Result<(), MidiError> {
        let mut first_error = None;
        for msg in messages {
            if let Err(e) = self.send_raw(&msg) {
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl<O: OutputConnection, I: InputConnection> Drop for Session<O, I> {
    fn drop(&mut self) {
        if self.is_open() {
            let _ = self.close();
        }
    }
}
