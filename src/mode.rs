//! Finding the Launchpad Pro among the system's MIDI ports.
//!
//! The Launchpad Pro exposes several MIDI interfaces, each for a different purpose. Which one we
//! talk to is chosen by the [Mode]; the ports are recognized by a substring of their name.

use crate::MidiError;

/// Which of the Launchpad Pro's MIDI interfaces to use. See the "Launchpad Pro Programmers
/// Reference Guide" for what each interface does.
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Mode {
    /// The Live port, reserved for Ableton Live
    Ableton,
    /// The Standalone port. Use this one to drive the pads yourself
    Standalone,
    /// The hardware MIDI DIN port
    Hardware,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Ableton, Mode::Standalone, Mode::Hardware];

    /// Substring identifying the input port of this mode
    pub fn input_pattern(self) -> &'static str {
        match self {
            Self::Ableton => "Launchpad Pro",
            Self::Standalone => "MIDIIN2 (Launchpad Pro)",
            Self::Hardware => "MIDIIN3 (Launchpad Pro)",
        }
    }

    /// Substring identifying the output port of this mode
    pub fn output_pattern(self) -> &'static str {
        match self {
            Self::Ableton => "Launchpad Pro",
            Self::Standalone => "MIDIOUT2 (Launchpad Pro)",
            Self::Hardware => "MIDIOUT3 (Launchpad Pro)",
        }
    }

    pub fn pattern(self, direction: Direction) -> &'static str {
        match direction {
            Direction::Input => self.input_pattern(),
            Direction::Output => self.output_pattern(),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Ableton => "ableton",
            Self::Standalone => "standalone",
            Self::Hardware => "hardware",
        }
    }
}

impl Default for Mode {
    fn default() -> Self {
        Self::Standalone
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct UnknownMode(pub String);

impl std::fmt::Display for UnknownMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown mode {:?} (expected ableton, standalone or hardware)",
            self.0
        )
    }
}

impl std::error::Error for UnknownMode {}

impl std::str::FromStr for Mode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|mode| mode.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownMode(s.to_owned()))
    }
}

#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq)]
pub enum Direction {
    Input,
    Output,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Input => f.write_str("input"),
            Self::Output => f.write_str("output"),
        }
    }
}

/// The input and output port that belong to one Launchpad Pro in one [Mode].
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PortBinding {
    pub mode: Mode,
    pub input: String,
    pub output: String,
}

fn select_port<S: AsRef<str>>(
    mode: Mode,
    direction: Direction,
    available: &[S],
) -> Result<String, MidiError> {
    let pattern = mode.pattern(direction);
    let mut matching = available
        .iter()
        .map(|name| AsRef::<str>::as_ref(name))
        .filter(|name| name.contains(pattern));

    match (matching.next(), matching.next()) {
        (Some(name), None) => Ok(name.to_owned()),
        (None, _) => Err(MidiError::NoPortFound { direction, pattern }),
        (Some(first), Some(second)) => {
            let candidates = [first, second]
                .iter()
                .copied()
                .chain(matching)
                .map(str::to_owned)
                .collect();
            Err(MidiError::TooManyPorts {
                direction,
                pattern,
                candidates,
            })
        }
    }
}

/// Select exactly one input and one output port for `mode` out of the given port names.
///
/// The input side is checked completely before the output side, so a missing or ambiguous input
/// port is always reported as such, whatever the output ports look like.
pub fn resolve<S: AsRef<str>>(
    mode: Mode,
    available_inputs: &[S],
    available_outputs: &[S],
) -> Result<PortBinding, MidiError> {
    let input = select_port(mode, Direction::Input, available_inputs)?;
    let output = select_port(mode, Direction::Output, available_outputs)?;

    Ok(PortBinding {
        mode,
        input,
        output,
    })
}
