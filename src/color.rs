/// A color from the Launchpad Pro color palette. See the "Launchpad Pro Programmers Reference
/// Guide" for the palette.
///
/// The id is not checked against the palette size; what the device does with ids above 127 is up
/// to the device.
///
/// Everywhere where a color index is expected, a PaletteColor can be passed with `.into()`:
/// ```no_run
/// # use launchpad_pro::PaletteColor;
/// # let mut session: launchpad_pro::Session = unimplemented!();
/// session.all_lit(PaletteColor::GREEN.into())?;
/// # Ok::<(), launchpad_pro::MidiError>(())
/// ```
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PaletteColor {
    pub id: u8,
}

impl PaletteColor {
    pub const fn new(id: u8) -> Self {
        Self { id }
    }

    pub fn id(&self) -> u8 {
        self.id
    }

    /// Look up one of the named colors, ignoring case. `-` and `_` are interchangeable.
    pub fn by_name(name: &str) -> Option<PaletteColor> {
        let name = name.trim().replace('-', "_");
        NAMED_COLORS
            .iter()
            .find(|(candidate, _)| candidate.eq_ignore_ascii_case(&name))
            .map(|&(_, color)| color)
    }

    // Basic colors, the top row
    pub const BLACK: PaletteColor = Self { id: 0 };
    pub const DARK_GRAY: PaletteColor = Self { id: 1 };
    pub const LIGHT_GRAY: PaletteColor = Self { id: 2 };
    pub const WHITE: PaletteColor = Self { id: 3 };

    // Third column from the right
    pub const LIGHT_RED: PaletteColor = Self { id: 4 };
    pub const RED: PaletteColor = Self { id: 5 };
    pub const ORANGE: PaletteColor = Self { id: 9 };
    pub const YELLOW: PaletteColor = Self { id: 13 };
    pub const LIME_GREEN: PaletteColor = Self { id: 17 };
    pub const GREEN: PaletteColor = Self { id: 21 };
    pub const LIGHT_BLUE: PaletteColor = Self { id: 37 };
    pub const BLUE: PaletteColor = Self { id: 45 };
    pub const PURPLE: PaletteColor = Self { id: 49 };
    pub const MAGENTA: PaletteColor = Self { id: 53 };
    pub const PINK: PaletteColor = Self { id: 57 };
    pub const BROWN: PaletteColor = Self { id: 61 };

    pub const CYAN: PaletteColor = Self { id: 90 };
}

/// Name to palette index mapping for the named colors.
pub static NAMED_COLORS: [(&str, PaletteColor); 17] = [
    ("black", PaletteColor::BLACK),
    ("dark_gray", PaletteColor::DARK_GRAY),
    ("light_gray", PaletteColor::LIGHT_GRAY),
    ("white", PaletteColor::WHITE),
    ("light_red", PaletteColor::LIGHT_RED),
    ("red", PaletteColor::RED),
    ("orange", PaletteColor::ORANGE),
    ("yellow", PaletteColor::YELLOW),
    ("lime_green", PaletteColor::LIME_GREEN),
    ("green", PaletteColor::GREEN),
    ("light_blue", PaletteColor::LIGHT_BLUE),
    ("blue", PaletteColor::BLUE),
    ("purple", PaletteColor::PURPLE),
    ("magenta", PaletteColor::MAGENTA),
    ("pink", PaletteColor::PINK),
    ("brown", PaletteColor::BROWN),
    ("cyan", PaletteColor::CYAN),
];

impl From<u8> for PaletteColor {
    fn from(id: u8) -> Self {
        Self::new(id)
    }
}

impl From<PaletteColor> for u8 {
    fn from(color: PaletteColor) -> Self {
        color.id
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct UnknownColor(pub String);

impl std::fmt::Display for UnknownColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?} is neither a color name nor a palette index", self.0)
    }
}

impl std::error::Error for UnknownColor {}

/// Parses either a palette index (`"72"`) or a color name (`"red"`)
impl std::str::FromStr for PaletteColor {
    type Err = UnknownColor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(id) = s.trim().parse::<u8>() {
            return Ok(Self::new(id));
        }
        Self::by_name(s).ok_or_else(|| UnknownColor(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_lookup() {
        assert_eq!(PaletteColor::by_name("red"), Some(PaletteColor::RED));
        assert_eq!(PaletteColor::by_name("Light-Blue"), Some(PaletteColor::LIGHT_BLUE));
        assert_eq!(PaletteColor::by_name("chartreuse"), None);
    }

    #[test]
    fn parse_index_or_name() {
        assert_eq!("6".parse::<PaletteColor>().unwrap().id(), 6);
        assert_eq!("cyan".parse::<PaletteColor>().unwrap(), PaletteColor::CYAN);
        assert!("300".parse::<PaletteColor>().is_err());
    }
}
