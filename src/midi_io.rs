use midir::{Ignore, MidiInput, MidiInputConnection, MidiOutput, MidiOutputConnection};

use crate::mode::Direction;
use crate::MidiError;

/// Raw inbound callback: receives the transport timestamp in microseconds and the message bytes.
pub type RawCallback = Box<dyn FnMut(u64, &[u8]) + Send + 'static>;

/// An open connection to an output port.
pub trait OutputConnection {
    fn send(&mut self, bytes: &[u8]) -> Result<(), MidiError>;

    /// Release the port.
    fn close(self);
}

/// An open connection to an input port. Messages are delivered through the callback that was
/// given when connecting; they stop arriving once the connection is closed.
pub trait InputConnection {
    fn close(self);
}

/// The MIDI system a [crate::LaunchpadPro] talks to: enumerates port names and connects to
/// ports by name.
pub trait MidiBackend {
    type Output: OutputConnection;
    type Input: InputConnection;

    fn input_port_names(&self) -> Result<Vec<String>, MidiError>;
    fn output_port_names(&self) -> Result<Vec<String>, MidiError>;

    fn connect_output(&self, port_name: &str) -> Result<Self::Output, MidiError>;

    #[must_use = "If not saved, the connection will be immediately dropped"]
    fn connect_input(
        &self,
        port_name: &str,
        callback: RawCallback,
    ) -> Result<Self::Input, MidiError>;
}

/// Collect the names of all ports. Ports whose name can't be queried are skipped.
fn port_names<T: midir::MidiIO>(midi_io: &T) -> Vec<String> {
    let mut names = Vec::new();
    for port in midi_io.ports() {
        let name = crate::ok_or_continue!(midi_io.port_name(&port));
        names.push(name);
    }
    names
}

fn find_port<T: midir::MidiIO>(midi_io: &T, port_name: &str) -> Option<T::Port> {
    for port in midi_io.ports() {
        let name = crate::ok_or_continue!(midi_io.port_name(&port));

        if name == port_name {
            return Some(port);
        }
    }

    None
}

/// The system MIDI backend, implemented with `midir`.
#[derive(Debug, Clone)]
pub struct MidirBackend {
    client_name: String,
}

impl MidirBackend {
    pub fn new() -> Self {
        Self::with_client_name(crate::APPLICATION_NAME)
    }

    /// The client name shows up in the port listings of other MIDI software.
    pub fn with_client_name(client_name: impl Into<String>) -> Self {
        Self {
            client_name: client_name.into(),
        }
    }

    fn midi_input(&self) -> Result<MidiInput, MidiError> {
        let mut midi_input = MidiInput::new(&self.client_name)?;
        // We want to see the Launchpad's sysex replies as well
        midi_input.ignore(Ignore::None);
        Ok(midi_input)
    }

    fn midi_output(&self) -> Result<MidiOutput, MidiError> {
        Ok(MidiOutput::new(&self.client_name)?)
    }
}

impl Default for MidirBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MidiBackend for MidirBackend {
    type Output = MidirOutput;
    type Input = MidirInput;

    fn input_port_names(&self) -> Result<Vec<String>, MidiError> {
        Ok(port_names(&self.midi_input()?))
    }

    fn output_port_names(&self) -> Result<Vec<String>, MidiError> {
        Ok(port_names(&self.midi_output()?))
    }

    fn connect_output(&self, port_name: &str) -> Result<MidirOutput, MidiError> {
        let midi_output = self.midi_output()?;
        let port = find_port(&midi_output, port_name).ok_or_else(|| MidiError::PortVanished {
            direction: Direction::Output,
            name: port_name.to_owned(),
        })?;

        let connection = midi_output.connect(&port, &format!("{} output", self.client_name))?;
        Ok(MidirOutput { connection })
    }

    fn connect_input(
        &self,
        port_name: &str,
        mut callback: RawCallback,
    ) -> Result<MidirInput, MidiError> {
        let midi_input = self.midi_input()?;
        let port = find_port(&midi_input, port_name).ok_or_else(|| MidiError::PortVanished {
            direction: Direction::Input,
            name: port_name.to_owned(),
        })?;

        let midir_callback = move |timestamp: u64, data: &[u8], _: &mut ()| {
            (callback)(timestamp, data);
        };

        let connection = midi_input.connect(
            &port,
            &format!("{} input", self.client_name),
            midir_callback,
            (),
        )?;
        Ok(MidirInput { connection })
    }
}

pub struct MidirOutput {
    connection: MidiOutputConnection,
}

impl OutputConnection for MidirOutput {
    fn send(&mut self, bytes: &[u8]) -> Result<(), MidiError> {
        self.connection.send(bytes)?;
        Ok(())
    }

    fn close(self) {
        let _ = self.connection.close();
    }
}

pub struct MidirInput {
    connection: MidiInputConnection<()>,
}

impl InputConnection for MidirInput {
    fn close(self) {
        let _ = self.connection.close();
    }
}
