use std::io::BufRead;
use std::path::Path;

use crate::FrameError;

/// The colors of every pad in the device's scan order, as read from a CSV file.
///
/// The first line of the file is a header and is skipped. All other lines hold comma separated
/// palette indices and are concatenated in order:
/// ```text
/// r,g,b
/// 1,2,3
/// 4,5,6
/// ```
/// yields the frame `[1, 2, 3, 4, 5, 6]`. Cells may be wrapped in double quotes, but a quoted
/// cell can't contain a comma; every cell has to be a single palette index anyway.
#[derive(Debug, Clone, Default, Hash, Eq, PartialEq)]
pub struct LedFrame {
    colors: Vec<u8>,
}

impl LedFrame {
    pub fn from_colors(colors: Vec<u8>) -> Self {
        Self { colors }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, FrameError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, FrameError> {
        let mut colors = Vec::new();

        for (index, line) in reader.lines().enumerate().skip(1) {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            for (column, cell) in line.split(',').enumerate() {
                let cell = unquote(cell.trim());
                let color = cell.parse::<u8>().map_err(|_| FrameError::InvalidCell {
                    line: index + 1,
                    column: column + 1,
                    value: cell.to_owned(),
                })?;
                colors.push(color);
            }
        }

        Ok(Self { colors })
    }

    pub fn colors(&self) -> &[u8] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

/// Strip one pair of surrounding double quotes, as spreadsheet exports put them around cells
fn unquote(cell: &str) -> &str {
    cell.strip_prefix('"')
        .and_then(|cell| cell.strip_suffix('"'))
        .map_or(cell, str::trim)
}

impl AsRef<[u8]> for LedFrame {
    fn as_ref(&self) -> &[u8] {
        &self.colors
    }
}
