use rand::{Rng, distr::StandardUniform, prelude::Distribution};

use super::cell::{Cell, CellColor};

/// A falling-block piece: a kind, a fractional pivot point, a rotation state,
/// and the boolean occupancy grid the 4 cell positions are derived from.
///
/// # Coordinate System
///
/// - The column axis is x, the row axis is y; y increases downward
/// - The pivot is fractional (the I and O kinds rotate around a grid corner)
/// - Cell rows are signed: a piece may sit partly or wholly above the visible
///   grid (row < 0) right after spawning
///
/// Every mutation (rotation, translation, reset) re-derives all 4 cells from
/// the pivot and the occupancy grid, so the cells are always consistent with
/// the pivot. Equality compares kind, pivot, and rotation state only; the
/// cells are implied.
#[derive(Debug, Clone)]
pub struct Piece {
    kind: PieceKind,
    pivot: Pivot,
    rotation: RotationState,
    occupancy: Occupancy,
    cells: [Cell; 4],
}

impl PartialEq for Piece {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.pivot == other.pivot && self.rotation == other.rotation
    }
}

impl Piece {
    /// Creates a piece of the given kind at its spawn pivot and orientation.
    #[must_use]
    pub fn new(kind: PieceKind) -> Self {
        let mut piece = Self {
            kind,
            pivot: kind.spawn_pivot(),
            rotation: RotationState::default(),
            occupancy: Occupancy::spawn(kind),
            cells: [Cell::new(kind.color(), 0, 0); 4],
        };
        piece.update_cells();
        piece
    }

    /// Returns the piece to its spawn pivot and orientation.
    ///
    /// A piece going into or coming back from hold reappears exactly as a
    /// freshly drawn one.
    pub fn reset(&mut self) {
        self.pivot = self.kind.spawn_pivot();
        self.rotation = RotationState::default();
        self.occupancy = Occupancy::spawn(self.kind);
        self.update_cells();
    }

    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub fn pivot(&self) -> Pivot {
        self.pivot
    }

    #[must_use]
    pub fn rotation_state(&self) -> RotationState {
        self.rotation
    }

    #[must_use]
    pub fn cells(&self) -> &[Cell; 4] {
        &self.cells
    }

    /// Rotates the occupancy grid 90° clockwise and advances the rotation
    /// state. No legality check happens here; that is the board's job.
    pub fn rotate_cw(&mut self) {
        self.occupancy = self.occupancy.rotated_cw();
        self.rotation = self.rotation.rotated_cw();
        self.update_cells();
    }

    /// Rotates the occupancy grid 90° counter-clockwise and steps the
    /// rotation state back.
    pub fn rotate_ccw(&mut self) {
        self.occupancy = self.occupancy.rotated_ccw();
        self.rotation = self.rotation.rotated_ccw();
        self.update_cells();
    }

    /// Moves the pivot (and with it all 4 cells) down one row.
    pub fn fall(&mut self) {
        self.set_pivot(self.pivot.x, self.pivot.y + 1.0);
    }

    /// Moves the pivot one column to the left.
    pub fn move_left(&mut self) {
        self.set_pivot(self.pivot.x - 1.0, self.pivot.y);
    }

    /// Moves the pivot one column to the right.
    pub fn move_right(&mut self) {
        self.set_pivot(self.pivot.x + 1.0, self.pivot.y);
    }

    /// Places the pivot and re-derives the cell positions.
    pub fn set_pivot(&mut self, x: f64, y: f64) {
        self.pivot = Pivot { x, y };
        self.update_cells();
    }

    /// Applies `state` clockwise quarter turns from the current orientation.
    ///
    /// Used by the save codec to rebuild a piece from its recorded state.
    pub fn set_rotation_state(&mut self, state: u8) {
        for _ in 0..state % 4 {
            self.rotate_cw();
        }
    }

    // The pivot's fractional part always matches the occupancy center offset
    // (x.5 pivots go with 4x4 grids, integral pivots with 3x3 grids), so the
    // derived coordinates are exact integers and the cast never truncates.
    #[expect(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    fn update_cells(&mut self) {
        let offset = self.occupancy.center_offset();
        let mut index = 0;
        for row in 0..self.occupancy.size() {
            for col in 0..self.occupancy.size() {
                if self.occupancy.is_occupied(row, col) {
                    let cell_row = (self.pivot.y - offset + row as f64) as i32;
                    let cell_column = (self.pivot.x - offset + col as f64) as i32;
                    self.cells[index].set_position(cell_row, cell_column);
                    index += 1;
                }
            }
        }
    }
}

/// Fractional anchor point a piece rotates around.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pivot {
    pub x: f64,
    pub y: f64,
}

/// Rotation state of a piece: clockwise 90° steps from spawn orientation,
/// wrapping modulo 4. Selects the kick table row during rotation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RotationState(u8);

impl RotationState {
    #[must_use]
    pub fn rotated_cw(self) -> Self {
        RotationState((self.0 + 1) % 4)
    }

    #[must_use]
    pub fn rotated_ccw(self) -> Self {
        RotationState((self.0 + 3) % 4)
    }

    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }

    pub(crate) const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

/// Enum representing the type of piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece.
    I = 0,
    /// O-piece.
    O = 1,
    /// J-piece.
    J = 2,
    /// L-piece.
    L = 3,
    /// T-piece.
    T = 4,
    /// S-piece.
    S = 5,
    /// Z-piece.
    Z = 6,
}

impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        match rng.random_range(0..=6) {
            0 => PieceKind::I,
            1 => PieceKind::O,
            2 => PieceKind::J,
            3 => PieceKind::L,
            4 => PieceKind::T,
            5 => PieceKind::S,
            _ => PieceKind::Z,
        }
    }
}

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    /// Returns the single character representation of this piece kind.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::O => 'O',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
            PieceKind::T => 'T',
            PieceKind::S => 'S',
            PieceKind::Z => 'Z',
        }
    }

    /// Parses a piece kind from a single character.
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(PieceKind::I),
            'O' => Some(PieceKind::O),
            'J' => Some(PieceKind::J),
            'L' => Some(PieceKind::L),
            'T' => Some(PieceKind::T),
            'S' => Some(PieceKind::S),
            'Z' => Some(PieceKind::Z),
            _ => None,
        }
    }

    #[must_use]
    pub const fn color(self) -> CellColor {
        match self {
            PieceKind::I => CellColor::Cyan,
            PieceKind::O => CellColor::Yellow,
            PieceKind::J => CellColor::Blue,
            PieceKind::L => CellColor::Orange,
            PieceKind::T => CellColor::Magenta,
            PieceKind::S => CellColor::Green,
            PieceKind::Z => CellColor::Red,
        }
    }

    #[must_use]
    pub const fn spawn_pivot(self) -> Pivot {
        match self {
            PieceKind::I => Pivot { x: 4.5, y: 1.5 },
            PieceKind::O => Pivot { x: 4.5, y: 0.5 },
            _ => Pivot { x: 4.0, y: 1.0 },
        }
    }

    /// The 4 occupied (row, col) positions within the spawn occupancy grid.
    ///
    /// Useful for drawing kind previews without building a whole [`Piece`].
    #[must_use]
    pub fn spawn_offsets(self) -> [(usize, usize); 4] {
        let occupancy = Occupancy::spawn(self);
        let mut offsets = [(0, 0); 4];
        let mut index = 0;
        for row in 0..occupancy.size() {
            for col in 0..occupancy.size() {
                if occupancy.is_occupied(row, col) {
                    offsets[index] = (row, col);
                    index += 1;
                }
            }
        }
        offsets
    }
}

/// Square boolean grid describing which positions a piece occupies.
///
/// Side 4 for I and O, side 3 for the rest; rotation is a 90° matrix
/// transform of this grid. Cell coordinates are derived by anchoring the
/// grid's center on the piece's pivot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Occupancy {
    size: usize,
    cells: [[bool; 4]; 4],
}

impl Occupancy {
    pub(crate) fn spawn(kind: PieceKind) -> Self {
        let mut cells = [[false; 4]; 4];
        let size = match kind {
            PieceKind::I => {
                cells[1][0] = true;
                cells[1][1] = true;
                cells[1][2] = true;
                cells[1][3] = true;
                4
            }
            PieceKind::O => {
                cells[1][1] = true;
                cells[1][2] = true;
                cells[2][1] = true;
                cells[2][2] = true;
                4
            }
            PieceKind::J => {
                cells[0][0] = true;
                cells[1][0] = true;
                cells[1][1] = true;
                cells[1][2] = true;
                3
            }
            PieceKind::L => {
                cells[0][2] = true;
                cells[1][0] = true;
                cells[1][1] = true;
                cells[1][2] = true;
                3
            }
            PieceKind::T => {
                cells[0][1] = true;
                cells[1][0] = true;
                cells[1][1] = true;
                cells[1][2] = true;
                3
            }
            PieceKind::S => {
                cells[0][1] = true;
                cells[0][2] = true;
                cells[1][0] = true;
                cells[1][1] = true;
                3
            }
            PieceKind::Z => {
                cells[0][0] = true;
                cells[0][1] = true;
                cells[1][1] = true;
                cells[1][2] = true;
                3
            }
        };
        Self { size, cells }
    }

    pub(crate) fn size(self) -> usize {
        self.size
    }

    pub(crate) fn is_occupied(self, row: usize, col: usize) -> bool {
        self.cells[row][col]
    }

    pub(crate) fn center_offset(self) -> f64 {
        if self.size == 4 { 1.5 } else { 1.0 }
    }

    fn rotated_cw(self) -> Self {
        let mut rotated = [[false; 4]; 4];
        for row in 0..self.size {
            for col in 0..self.size {
                rotated[col][self.size - 1 - row] = self.cells[row][col];
            }
        }
        Self {
            size: self.size,
            cells: rotated,
        }
    }

    fn rotated_ccw(self) -> Self {
        let mut rotated = [[false; 4]; 4];
        for row in 0..self.size {
            for col in 0..self.size {
                rotated[row][col] = self.cells[col][self.size - 1 - row];
            }
        }
        Self {
            size: self.size,
            cells: rotated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted_cells(piece: &Piece) -> Vec<(i32, i32)> {
        let mut cells: Vec<_> = piece
            .cells()
            .iter()
            .map(|cell| (cell.row(), cell.column()))
            .collect();
        cells.sort_unstable();
        cells
    }

    #[test]
    fn spawn_cell_positions() {
        let cases = [
            (PieceKind::I, vec![(1, 3), (1, 4), (1, 5), (1, 6)]),
            (PieceKind::O, vec![(0, 4), (0, 5), (1, 4), (1, 5)]),
            (PieceKind::J, vec![(0, 3), (1, 3), (1, 4), (1, 5)]),
            (PieceKind::L, vec![(0, 5), (1, 3), (1, 4), (1, 5)]),
            (PieceKind::T, vec![(0, 4), (1, 3), (1, 4), (1, 5)]),
            (PieceKind::S, vec![(0, 4), (0, 5), (1, 3), (1, 4)]),
            (PieceKind::Z, vec![(0, 3), (0, 4), (1, 4), (1, 5)]),
        ];
        for (kind, expected) in cases {
            let piece = Piece::new(kind);
            assert_eq!(sorted_cells(&piece), expected, "kind {kind:?}");
        }
    }

    #[test]
    fn spawn_colors() {
        assert_eq!(Piece::new(PieceKind::I).cells()[0].color(), CellColor::Cyan);
        assert_eq!(Piece::new(PieceKind::Z).cells()[0].color(), CellColor::Red);
    }

    #[test]
    fn four_clockwise_rotations_are_identity() {
        for kind in [
            PieceKind::I,
            PieceKind::O,
            PieceKind::J,
            PieceKind::L,
            PieceKind::T,
            PieceKind::S,
            PieceKind::Z,
        ] {
            let original = Piece::new(kind);
            let mut piece = original.clone();
            for _ in 0..4 {
                piece.rotate_cw();
            }
            assert_eq!(piece, original);
            assert_eq!(sorted_cells(&piece), sorted_cells(&original));
        }
    }

    #[test]
    fn four_counter_clockwise_rotations_are_identity() {
        let original = Piece::new(PieceKind::T);
        let mut piece = original.clone();
        for _ in 0..4 {
            piece.rotate_ccw();
        }
        assert_eq!(piece, original);
    }

    #[test]
    fn clockwise_then_counter_clockwise_is_identity() {
        let original = Piece::new(PieceKind::S);
        let mut piece = original.clone();
        piece.rotate_cw();
        assert_ne!(piece, original);
        piece.rotate_ccw();
        assert_eq!(piece, original);
    }

    #[test]
    fn t_piece_clockwise_cells() {
        let mut piece = Piece::new(PieceKind::T);
        piece.rotate_cw();
        assert_eq!(piece.rotation_state().value(), 1);
        assert_eq!(sorted_cells(&piece), vec![(0, 4), (1, 4), (1, 5), (2, 4)]);
    }

    #[test]
    fn fall_and_moves_shift_cells_with_pivot() {
        let mut piece = Piece::new(PieceKind::J);
        piece.fall();
        piece.move_right();
        piece.move_right();
        piece.move_left();
        assert_eq!(piece.pivot(), Pivot { x: 5.0, y: 2.0 });
        assert_eq!(sorted_cells(&piece), vec![(1, 4), (2, 4), (2, 5), (2, 6)]);
    }

    #[test]
    fn clone_is_independent() {
        let original = Piece::new(PieceKind::L);
        let mut clone = original.clone();
        assert_eq!(clone, original);
        clone.rotate_cw();
        clone.fall();
        assert_ne!(clone, original);
        assert_eq!(original.rotation_state().value(), 0);
        assert_eq!(original.pivot(), PieceKind::L.spawn_pivot());
    }

    #[test]
    fn reset_restores_spawn_placement() {
        let mut piece = Piece::new(PieceKind::T);
        piece.rotate_cw();
        piece.set_pivot(6.0, 5.0);
        piece.reset();
        assert_eq!(piece, Piece::new(PieceKind::T));
        assert_eq!(piece.pivot(), PieceKind::T.spawn_pivot());
        assert_eq!(sorted_cells(&piece), vec![(0, 4), (1, 3), (1, 4), (1, 5)]);
    }

    #[test]
    fn set_rotation_state_matches_repeated_turns() {
        for state in 0..4 {
            let mut by_state = Piece::new(PieceKind::Z);
            by_state.set_rotation_state(state);
            let mut by_turns = Piece::new(PieceKind::Z);
            for _ in 0..state {
                by_turns.rotate_cw();
            }
            assert_eq!(by_state, by_turns);
        }
    }

    #[test]
    fn kind_char_round_trip() {
        for kind in [
            PieceKind::I,
            PieceKind::O,
            PieceKind::J,
            PieceKind::L,
            PieceKind::T,
            PieceKind::S,
            PieceKind::Z,
        ] {
            assert_eq!(PieceKind::from_char(kind.as_char()), Some(kind));
        }
        assert_eq!(PieceKind::from_char('X'), None);
        assert_eq!(PieceKind::from_char('i'), None);
    }

    #[test]
    fn spawn_offsets_match_spawn_cells() {
        let offsets = PieceKind::T.spawn_offsets();
        assert_eq!(offsets, [(0, 1), (1, 0), (1, 1), (1, 2)]);
    }
}
