//! Construction of the messages sent to the Launchpad Pro.
//!
//! Everything in here is pure: the functions only build bytes, sending is up to
//! [crate::Session]. Sysex messages all share the Novation manufacturer id and the Launchpad Pro
//! device id, followed by a command byte.

use std::convert::TryFrom;

use crate::MidiError;

/// Manufacturer id (Novation, `00 20 29`), product type and the Launchpad Pro device id
pub const SYSEX_HEADER: [u8; 5] = [0, 32, 41, 2, 16];

pub const SYSEX_START: u8 = 240;
pub const SYSEX_END: u8 = 247;

pub const CMD_CHANGE_LAYOUT: u8 = 44;
pub const CMD_LIGHT_COLUMN: u8 = 12;
pub const CMD_LIGHT_ROW: u8 = 13;
pub const CMD_LIGHT_ALL: u8 = 14;

/// Maximum amount of colors in a column or row message
pub const MAX_LINE_COLORS: usize = 10;
/// How many colors of an oversized column or row are kept
const LINE_COLORS_KEPT: usize = 9;
/// Maximum amount of colors in a bulk message
pub const MAX_FRAME_COLORS: usize = 96;

/// The note numbers covered by [all_on] and [all_off]
pub const PAD_NOTES: std::ops::RangeInclusive<u8> = 1..=98;

pub const NOTE_OFF_VELOCITY: u8 = 64;
pub const FULL_VELOCITY: u8 = 127;

const CC_ALL_SOUND_OFF: u8 = 120;
const CC_RESET_ALL_CONTROLLERS: u8 = 121;
const CC_ALL_NOTES_OFF: u8 = 123;

/// The layouts of the Launchpad Pro. They decide what the pads send when pressed and how
/// incoming notes light them up.
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Layout {
    Note = 0,
    Drum = 1,
    Fader = 2,
    /// Every pad sends and receives its own fixed note. This is the one to use for custom
    /// lighting and pad handling
    Programmer = 3,
}

impl Layout {
    pub const ALL: [Layout; 4] = [Layout::Note, Layout::Drum, Layout::Fader, Layout::Programmer];

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Note => "note",
            Self::Drum => "drum",
            Self::Fader => "fader",
            Self::Programmer => "programmer",
        }
    }
}

impl std::fmt::Display for Layout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Layout {
    type Err = MidiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|layout| layout.name() == s)
            .ok_or_else(|| MidiError::UnknownLayout(s.to_owned()))
    }
}

/// A MIDI channel, numbered 1 to 16 like on the device.
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct Channel(u8);

impl Channel {
    pub fn new(number: u8) -> Result<Self, MidiError> {
        if (1..=16).contains(&number) {
            Ok(Self(number))
        } else {
            Err(MidiError::InvalidChannel(number))
        }
    }

    /// The 1-based channel number
    pub fn number(self) -> u8 {
        self.0
    }

    /// The 0-based value that goes into the status byte
    pub fn index(self) -> u8 {
        self.0 - 1
    }

    pub fn all() -> impl Iterator<Item = Channel> {
        (1..=16).map(Channel)
    }
}

impl Default for Channel {
    fn default() -> Self {
        Self(1)
    }
}

impl TryFrom<u8> for Channel {
    type Error = MidiError;

    fn try_from(number: u8) -> Result<Self, Self::Error> {
        Self::new(number)
    }
}

/// A Launchpad Pro sysex message.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub struct SysexMessage {
    data: Vec<u8>,
    truncated_from: Option<usize>,
}

impl SysexMessage {
    fn new(command: u8, args: &[u8]) -> Self {
        let mut data = Vec::with_capacity(SYSEX_HEADER.len() + 1 + args.len());
        data.extend(&SYSEX_HEADER);
        data.push(command);
        data.extend(args);
        Self {
            data,
            truncated_from: None,
        }
    }

    fn with_colors(command: u8, args: &[u8], colors: &[u8], truncated_from: Option<usize>) -> Self {
        let mut self_ = Self::new(command, args);
        self_.data.extend(colors);
        self_.truncated_from = truncated_from;
        self_
    }

    /// The message without the surrounding sysex start and end bytes
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// The command byte following the header
    pub fn command(&self) -> u8 {
        self.data[SYSEX_HEADER.len()]
    }

    /// If the color list had to be shortened to fit the device limits, its original length
    pub fn truncated_from(&self) -> Option<usize> {
        self.truncated_from
    }

    /// The message as it goes over the wire
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.data.len() + 2);
        bytes.push(SYSEX_START);
        bytes.extend(&self.data);
        bytes.push(SYSEX_END);
        bytes
    }
}

/// Switch the device to another layout
pub fn change_layout(layout: Layout) -> SysexMessage {
    SysexMessage::new(CMD_CHANGE_LAYOUT, &[layout.code()])
}

fn truncate_line<'a>(what: &str, colors: &'a [u8]) -> (&'a [u8], Option<usize>) {
    if colors.len() > MAX_LINE_COLORS {
        log::warn!(
            "{} max is {} colors, got {}. Only the first {} are used",
            what,
            MAX_LINE_COLORS,
            colors.len(),
            LINE_COLORS_KEPT
        );
        (&colors[..LINE_COLORS_KEPT], Some(colors.len()))
    } else {
        (colors, None)
    }
}

/// Light a column, colors ordered bottom to top.
///
/// More than [MAX_LINE_COLORS] colors are cut down to the first 9, with a warning.
pub fn column_lit(column: u8, colors: &[u8]) -> SysexMessage {
    let (colors, truncated_from) = truncate_line("Column", colors);
    SysexMessage::with_colors(CMD_LIGHT_COLUMN, &[column], colors, truncated_from)
}

/// Light a row, colors ordered left to right.
///
/// More than [MAX_LINE_COLORS] colors are cut down to the first 9, with a warning.
pub fn row_lit(row: u8, colors: &[u8]) -> SysexMessage {
    let (colors, truncated_from) = truncate_line("Row", colors);
    SysexMessage::with_colors(CMD_LIGHT_ROW, &[row], colors, truncated_from)
}

/// Light all pads in a single color
pub fn all_lit(color: u8) -> SysexMessage {
    SysexMessage::new(CMD_LIGHT_ALL, &[color])
}

/// Send an arbitrary list of colors with the light-all command. Unlike [set_lit] there is no
/// length limit.
pub fn all_lit_multiple(colors: &[u8]) -> SysexMessage {
    SysexMessage::new(CMD_LIGHT_ALL, colors)
}

/// Light the whole grid, one color per pad in the device's scan order.
///
/// Frames longer than [MAX_FRAME_COLORS] are cut down to the first 96 colors, with a warning.
pub fn set_lit(colors: &[u8]) -> SysexMessage {
    if colors.len() > MAX_FRAME_COLORS {
        log::warn!(
            "current color length is {}. Max color length is {}",
            colors.len(),
            MAX_FRAME_COLORS
        );
        SysexMessage::with_colors(
            CMD_LIGHT_ALL,
            &[],
            &colors[..MAX_FRAME_COLORS],
            Some(colors.len()),
        )
    } else {
        SysexMessage::with_colors(CMD_LIGHT_ALL, &[], colors, None)
    }
}

pub fn note_on(channel: Channel, note: u8, velocity: u8) -> [u8; 3] {
    [0x90 | channel.index(), note, velocity]
}

pub fn note_off(channel: Channel, note: u8) -> [u8; 3] {
    [0x80 | channel.index(), note, NOTE_OFF_VELOCITY]
}

pub fn control_change(channel: Channel, control: u8, value: u8) -> [u8; 3] {
    [0xB0 | channel.index(), control, value]
}

/// Full-velocity note-ons for every pad note, ascending
pub fn all_on(channel: Channel) -> impl Iterator<Item = [u8; 3]> {
    PAD_NOTES.map(move |note| note_on(channel, note, FULL_VELOCITY))
}

/// Note-offs for every pad note, ascending
pub fn all_off(channel: Channel) -> impl Iterator<Item = [u8; 3]> {
    PAD_NOTES.map(move |note| note_off(channel, note))
}

/// "All notes off" followed by "reset all controllers", on every channel
pub fn reset_messages() -> impl Iterator<Item = [u8; 3]> {
    Channel::all().flat_map(|channel| {
        vec![
            control_change(channel, CC_ALL_NOTES_OFF, 0),
            control_change(channel, CC_RESET_ALL_CONTROLLERS, 0),
        ]
    })
}

/// "All sound off" on every channel
pub fn panic_messages() -> impl Iterator<Item = [u8; 3]> {
    Channel::all().map(|channel| control_change(channel, CC_ALL_SOUND_OFF, 0))
}
