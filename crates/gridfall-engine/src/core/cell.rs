/// Color of a placed or falling cell.
///
/// The lowercase names returned by [`Self::as_name`] are the exact words used
/// by the text save format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellColor {
    Cyan,
    Yellow,
    Blue,
    Orange,
    Magenta,
    Green,
    Red,
}

impl CellColor {
    #[must_use]
    pub const fn as_name(self) -> &'static str {
        match self {
            CellColor::Cyan => "cyan",
            CellColor::Yellow => "yellow",
            CellColor::Blue => "blue",
            CellColor::Orange => "orange",
            CellColor::Magenta => "magenta",
            CellColor::Green => "green",
            CellColor::Red => "red",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "cyan" => Some(CellColor::Cyan),
            "yellow" => Some(CellColor::Yellow),
            "blue" => Some(CellColor::Blue),
            "orange" => Some(CellColor::Orange),
            "magenta" => Some(CellColor::Magenta),
            "green" => Some(CellColor::Green),
            "red" => Some(CellColor::Red),
            _ => None,
        }
    }
}

/// One colored occupant of a board position.
///
/// The row is signed: a cell belonging to a falling piece may sit above the
/// visible grid (row < 0) until the piece descends into view. Cells stored in
/// the grid always have coordinates matching their slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    color: CellColor,
    row: i32,
    column: i32,
}

impl Cell {
    #[must_use]
    pub const fn new(color: CellColor, row: i32, column: i32) -> Self {
        Self { color, row, column }
    }

    #[must_use]
    pub fn color(&self) -> CellColor {
        self.color
    }

    #[must_use]
    pub fn row(&self) -> i32 {
        self.row
    }

    #[must_use]
    pub fn column(&self) -> i32 {
        self.column
    }

    pub(crate) fn set_position(&mut self, row: i32, column: i32) {
        self.row = row;
        self.column = column;
    }

    pub(crate) fn set_row(&mut self, row: i32) {
        self.row = row;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_names_round_trip() {
        let colors = [
            CellColor::Cyan,
            CellColor::Yellow,
            CellColor::Blue,
            CellColor::Orange,
            CellColor::Magenta,
            CellColor::Green,
            CellColor::Red,
        ];
        for color in colors {
            assert_eq!(CellColor::from_name(color.as_name()), Some(color));
        }
        assert_eq!(CellColor::from_name("pink"), None);
        assert_eq!(CellColor::from_name("Cyan"), None);
        assert_eq!(CellColor::from_name(""), None);
    }
}
