use crate::mode::Direction;

#[derive(Debug)]
pub enum MidiError {
    InputConnectError(midir::ConnectError<midir::MidiInput>),
    OutputConnectError(midir::ConnectError<midir::MidiOutput>),
    InitError(midir::InitError),
    PortInfoError(midir::PortInfoError),
    SendError(midir::SendError),
    /// No port name contained the mode's pattern
    NoPortFound {
        direction: Direction,
        // The pattern that was searched for
        pattern: &'static str,
    },
    /// More than one port name contained the mode's pattern. Only a single device is supported
    TooManyPorts {
        direction: Direction,
        pattern: &'static str,
        candidates: Vec<String>,
    },
    /// A resolved port disappeared between enumeration and connecting
    PortVanished { direction: Direction, name: String },
    UnknownLayout(String),
    InvalidChannel(u8),
    /// The session was already closed
    SessionClosed,
    /// Raised by the mock backend to simulate an unplugged device
    Disconnected,
}

impl MidiError {
    /// Whether this error stems from port resolution, i.e. from the MIDI setup of the machine
    /// rather than from a call made on an open session.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::NoPortFound { .. } | Self::TooManyPorts { .. } | Self::PortVanished { .. }
        )
    }

    /// Whether this error was caused by an argument that the device can't make sense of
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::UnknownLayout(_) | Self::InvalidChannel(_))
    }
}

impl std::fmt::Display for MidiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InputConnectError(_) => f.write_str("connecting to MIDI input port failed"),
            Self::OutputConnectError(_) => f.write_str("connecting to MIDI output port failed"),
            Self::InitError(_) => f.write_str("MIDI context initialization failed"),
            Self::PortInfoError(_) => f.write_str("MIDI Port retrieval failed"),
            Self::SendError(_) => f.write_str("sending MIDI message failed"),
            Self::NoPortFound { direction, pattern } => write!(
                f,
                "Launchpad Pro ({}) does not exist: no port matches {:?}",
                direction, pattern
            ),
            Self::TooManyPorts {
                direction,
                pattern,
                candidates,
            } => write!(
                f,
                "too many Launchpad Pro ({}) ports match {:?}, only one is supported: {:?}",
                direction, pattern, candidates
            ),
            Self::PortVanished { direction, name } => {
                write!(f, "{} port {:?} is no longer available", direction, name)
            }
            Self::UnknownLayout(name) => write!(
                f,
                "unknown layout {:?} (expected note, drum, fader or programmer)",
                name
            ),
            Self::InvalidChannel(channel) => {
                write!(f, "channel {} is invalid (select from 1~16)", channel)
            }
            Self::SessionClosed => f.write_str("the session has already been closed"),
            Self::Disconnected => f.write_str("the device is disconnected"),
        }
    }
}

impl std::error::Error for MidiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InputConnectError(e) => Some(e),
            Self::OutputConnectError(e) => Some(e),
            Self::InitError(e) => Some(e),
            Self::PortInfoError(e) => Some(e),
            Self::SendError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<midir::ConnectError<midir::MidiInput>> for MidiError {
    fn from(e: midir::ConnectError<midir::MidiInput>) -> Self {
        Self::InputConnectError(e)
    }
}

impl From<midir::ConnectError<midir::MidiOutput>> for MidiError {
    fn from(e: midir::ConnectError<midir::MidiOutput>) -> Self {
        Self::OutputConnectError(e)
    }
}

impl From<midir::InitError> for MidiError {
    fn from(e: midir::InitError) -> Self {
        Self::InitError(e)
    }
}

impl From<midir::PortInfoError> for MidiError {
    fn from(e: midir::PortInfoError) -> Self {
        Self::PortInfoError(e)
    }
}

impl From<midir::SendError> for MidiError {
    fn from(e: midir::SendError) -> Self {
        Self::SendError(e)
    }
}

/// Errors while reading an LED frame from CSV
#[derive(Debug)]
pub enum FrameError {
    Io(std::io::Error),
    /// A cell that isn't a color index in `0..=255`. `line` and `column` are 1-based
    InvalidCell {
        line: usize,
        column: usize,
        value: String,
    },
}

impl std::fmt::Display for FrameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(_) => f.write_str("reading the LED frame failed"),
            Self::InvalidCell {
                line,
                column,
                value,
            } => write!(
                f,
                "invalid color index {:?} at line {}, column {}",
                value, line, column
            ),
        }
    }
}

impl std::error::Error for FrameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::InvalidCell { .. } => None,
        }
    }
}

impl From<std::io::Error> for FrameError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
