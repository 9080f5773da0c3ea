//! An in-memory [MidiBackend] for tests and dry runs.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::midi_io::{InputConnection, MidiBackend, OutputConnection, RawCallback};
use crate::mode::Direction;
use crate::MidiError;

#[derive(Default)]
struct Shared {
    sent: Mutex<Vec<Vec<u8>>>,
    callback: Mutex<Option<RawCallback>>,
    fail_sends: AtomicBool,
    outputs_closed: AtomicUsize,
    inputs_closed: AtomicUsize,
}

/// Pretends to be the system's MIDI setup. Every byte sequence sent through one of its
/// connections is recorded, and inbound messages can be injected with [MockBackend::receive].
///
/// Clones share their state, so a clone kept by a test observes what a session sends.
#[derive(Clone, Default)]
pub struct MockBackend {
    inputs: Vec<String>,
    outputs: Vec<String>,
    shared: Arc<Shared>,
}

impl MockBackend {
    pub fn new<S: Into<String>>(
        inputs: impl IntoIterator<Item = S>,
        outputs: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            inputs: inputs.into_iter().map(Into::into).collect(),
            outputs: outputs.into_iter().map(Into::into).collect(),
            shared: Arc::default(),
        }
    }

    /// The port names a Launchpad Pro shows on Windows
    pub fn launchpad_pro() -> Self {
        Self::new(
            vec![
                "Launchpad Pro",
                "MIDIIN2 (Launchpad Pro)",
                "MIDIIN3 (Launchpad Pro)",
            ],
            vec![
                "Launchpad Pro",
                "MIDIOUT2 (Launchpad Pro)",
                "MIDIOUT3 (Launchpad Pro)",
            ],
        )
    }

    /// Everything sent so far, one entry per send
    pub fn sent(&self) -> Vec<Vec<u8>> {
        match self.shared.sent.lock() {
            Ok(sent) => sent.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn clear_sent(&self) {
        if let Ok(mut sent) = self.shared.sent.lock() {
            sent.clear();
        }
    }

    /// Make every following send fail, like an unplugged device would
    pub fn set_fail_sends(&self, fail: bool) {
        self.shared.fail_sends.store(fail, Ordering::SeqCst);
    }

    /// Deliver `data` to the connected input, if any. Returns whether it was delivered.
    pub fn receive(&self, timestamp: u64, data: &[u8]) -> bool {
        // A panicking handler poisons the lock, later messages still get through
        let mut callback = match self.shared.callback.lock() {
            Ok(callback) => callback,
            Err(poisoned) => poisoned.into_inner(),
        };
        match callback.as_mut() {
            Some(callback) => {
                (callback)(timestamp, data);
                true
            }
            None => false,
        }
    }

    pub fn outputs_closed(&self) -> usize {
        self.shared.outputs_closed.load(Ordering::SeqCst)
    }

    pub fn inputs_closed(&self) -> usize {
        self.shared.inputs_closed.load(Ordering::SeqCst)
    }

    fn check_port(names: &[String], direction: Direction, name: &str) -> Result<(), MidiError> {
        if names.iter().any(|candidate| candidate == name) {
            Ok(())
        } else {
            Err(MidiError::PortVanished {
                direction,
                name: name.to_owned(),
            })
        }
    }
}

impl MidiBackend for MockBackend {
    type Output = MockOutput;
    type Input = MockInput;

    fn input_port_names(&self) -> Result<Vec<String>, MidiError> {
        Ok(self.inputs.clone())
    }

    fn output_port_names(&self) -> Result<Vec<String>, MidiError> {
        Ok(self.outputs.clone())
    }

    fn connect_output(&self, port_name: &str) -> Result<MockOutput, MidiError> {
        Self::check_port(&self.outputs, Direction::Output, port_name)?;
        Ok(MockOutput {
            shared: Arc::clone(&self.shared),
        })
    }

    fn connect_input(
        &self,
        port_name: &str,
        callback: RawCallback,
    ) -> Result<MockInput, MidiError> {
        Self::check_port(&self.inputs, Direction::Input, port_name)?;
        match self.shared.callback.lock() {
            Ok(mut slot) => *slot = Some(callback),
            Err(poisoned) => *poisoned.into_inner() = Some(callback),
        }
        Ok(MockInput {
            shared: Arc::clone(&self.shared),
        })
    }
}

pub struct MockOutput {
    shared: Arc<Shared>,
}

impl OutputConnection for MockOutput {
    fn send(&mut self, bytes: &[u8]) -> Result<(), MidiError> {
        if self.shared.fail_sends.load(Ordering::SeqCst) {
            return Err(MidiError::Disconnected);
        }
        if let Ok(mut sent) = self.shared.sent.lock() {
            sent.push(bytes.to_vec());
        }
        Ok(())
    }

    fn close(self) {
        self.shared.outputs_closed.fetch_add(1, Ordering::SeqCst);
    }
}

pub struct MockInput {
    shared: Arc<Shared>,
}

impl InputConnection for MockInput {
    fn close(self) {
        match self.shared.callback.lock() {
            Ok(mut slot) => *slot = None,
            Err(poisoned) => *poisoned.into_inner() = None,
        }
        self.shared.inputs_closed.fetch_add(1, Ordering::SeqCst);
    }
}
