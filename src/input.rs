use crate::message::{SYSEX_END, SYSEX_START};

#[derive(Debug, Eq, PartialEq, Hash, Clone)]
/// A message received from the Launchpad Pro
pub enum Message {
    /// A pad was pressed. In programmer layout, `note` identifies the pad
    Press { channel: u8, note: u8, velocity: u8 },
    /// A pad was released. The Launchpad reports this as a note-on with zero velocity
    Release { channel: u8, note: u8 },
    /// Pressure on a held pad changed
    Aftertouch { channel: u8, note: u8, pressure: u8 },
    /// Pressure across all held pads changed
    ChannelPressure { channel: u8, pressure: u8 },
    /// A control button was pressed or released
    ControlChange { channel: u8, control: u8, value: u8 },
    /// Sysex payload without the start and end bytes
    Sysex(Vec<u8>),
    /// Anything else, as raw bytes
    Other(Vec<u8>),
}

impl Message {
    /// Decode a raw MIDI message. Never fails: data that isn't understood ends up in
    /// [Message::Other].
    pub fn decode(data: &[u8]) -> Message {
        match *data {
            [SYSEX_START, ref payload @ .., SYSEX_END] => Message::Sysex(payload.to_vec()),
            [status, note, velocity] if status & 0xF0 == 0x90 => {
                let channel = status & 0x0F;
                if velocity == 0 {
                    Message::Release { channel, note }
                } else {
                    Message::Press {
                        channel,
                        note,
                        velocity,
                    }
                }
            }
            [status, note, _] if status & 0xF0 == 0x80 => Message::Release {
                channel: status & 0x0F,
                note,
            },
            [status, note, pressure] if status & 0xF0 == 0xA0 => Message::Aftertouch {
                channel: status & 0x0F,
                note,
                pressure,
            },
            [status, control, value] if status & 0xF0 == 0xB0 => Message::ControlChange {
                channel: status & 0x0F,
                control,
                value,
            },
            [status, pressure] if status & 0xF0 == 0xD0 => Message::ChannelPressure {
                channel: status & 0x0F,
                pressure,
            },
            _ => Message::Other(data.to_vec()),
        }
    }

    pub fn is_press(&self) -> bool {
        matches!(self, Self::Press { .. })
    }

    pub fn is_release(&self) -> bool {
        matches!(self, Self::Release { .. })
    }
}

impl std::fmt::Display for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Press { note, velocity, .. } => {
                write!(f, "note on: {}, velocity={}", note, velocity)
            }
            Self::Release { note, .. } => write!(f, "note off: {}", note),
            Self::Aftertouch { note, pressure, .. } => {
                write!(f, "aftertouch: {}, pressure={}", note, pressure)
            }
            Self::ChannelPressure { pressure, .. } => write!(f, "channel pressure: {}", pressure),
            Self::ControlChange { control, value, .. } => {
                write!(f, "cc on: {}, value={}", control, value)
            }
            Self::Sysex(data) => write!(f, "sysex: {:?}", data),
            Self::Other(data) => write!(f, "other: {:?}", data),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pad_press_and_release() {
        assert_eq!(
            Message::decode(&[0x90, 81, 100]),
            Message::Press {
                channel: 0,
                note: 81,
                velocity: 100
            }
        );
        assert_eq!(
            Message::decode(&[0x90, 81, 0]),
            Message::Release { channel: 0, note: 81 }
        );
        assert_eq!(
            Message::decode(&[0x82, 11, 64]),
            Message::Release { channel: 2, note: 11 }
        );
    }

    #[test]
    fn control_and_pressure() {
        assert_eq!(
            Message::decode(&[0xB0, 91, 127]),
            Message::ControlChange {
                channel: 0,
                control: 91,
                value: 127
            }
        );
        assert_eq!(
            Message::decode(&[0xA0, 44, 12]),
            Message::Aftertouch {
                channel: 0,
                note: 44,
                pressure: 12
            }
        );
        assert_eq!(
            Message::decode(&[0xD0, 9]),
            Message::ChannelPressure {
                channel: 0,
                pressure: 9
            }
        );
    }

    #[test]
    fn sysex_is_unframed() {
        assert_eq!(
            Message::decode(&[240, 0, 32, 41, 2, 16, 44, 3, 247]),
            Message::Sysex(vec![0, 32, 41, 2, 16, 44, 3])
        );
    }

    #[test]
    fn garbage_does_not_panic() {
        assert_eq!(Message::decode(&[]), Message::Other(vec![]));
        assert_eq!(Message::decode(&[0xF8]), Message::Other(vec![0xF8]));
        assert_eq!(Message::decode(&[240, 1, 2]), Message::Other(vec![240, 1, 2]));
    }
}
