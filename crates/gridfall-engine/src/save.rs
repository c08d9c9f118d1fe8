//! Text persistence codec for the full board state.
//!
//! The format is line-oriented with 210 records for the 20×10 grid:
//!
//! | records | content |
//! |---|---|
//! | 1–200 | grid cells in row-major order: a color name, or empty if vacant |
//! | 201 | falling piece: kind char, pivot x, pivot y, rotation state |
//! | 202 | held piece's kind char, or empty |
//! | 203–206 | the 4 queued kind chars, one per record |
//! | 207 | lines-cleared counter |
//! | 208 | score |
//! | 209 | `true`/`false`: hold available |
//! | 210 | `true`/`false`: game over (no trailing newline) |
//!
//! Decoding is all-or-nothing: any missing or malformed record aborts with an
//! error naming the offending record, and no partial board escapes. The
//! format does not carry generator state, so a decoded board gets a freshly
//! seeded supply holding the 4 recorded queue kinds.

use crate::{
    core::{BOARD_HEIGHT, BOARD_WIDTH, Cell, CellColor, Piece, PieceKind},
    engine::{Board, BoardState, Grid, PieceSupply},
};

const RECORD_COUNT: usize = BOARD_WIDTH * BOARD_HEIGHT + 10;

/// A structurally short or malformed save text.
///
/// `line` is the 1-based record number the decoder was reading when it gave
/// up.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum SaveFormatError {
    #[display("save data ended early at record {line}")]
    UnexpectedEnd { line: usize },
    #[display("unknown cell color at record {line}")]
    InvalidColor { line: usize },
    #[display("invalid piece kind at record {line}")]
    InvalidPiece { line: usize },
    #[display("invalid number at record {line}")]
    InvalidNumber { line: usize },
    #[display("invalid boolean flag at record {line}")]
    InvalidFlag { line: usize },
}

/// Serializes the board into the 210-record save text.
#[must_use]
pub fn encode(board: &Board) -> String {
    let mut records: Vec<String> = Vec::with_capacity(RECORD_COUNT);

    for row in board.grid_rows() {
        for slot in row {
            records.push(match slot {
                Some(cell) => cell.color().as_name().to_owned(),
                None => String::new(),
            });
        }
    }

    let falling = board.falling_piece();
    let pivot = falling.pivot();
    records.push(format!(
        "{} {} {} {}",
        falling.kind().as_char(),
        pivot.x,
        pivot.y,
        falling.rotation_state().value()
    ));

    records.push(match board.held_piece() {
        Some(piece) => piece.kind().as_char().to_string(),
        None => String::new(),
    });

    for kind in board.queued_pieces() {
        records.push(kind.as_char().to_string());
    }

    records.push(board.lines_cleared().to_string());
    records.push(board.score().to_string());
    records.push(board.can_hold().to_string());
    records.push(board.is_game_over().to_string());

    records.join("\n")
}

/// Rebuilds a board from save text produced by [`encode`].
///
/// A held piece is recorded by kind only, so it is restored at its spawn
/// placement; the falling piece is rebuilt from its recorded pivot and
/// rotation state. Content past record 210 is ignored.
pub fn decode(text: &str) -> Result<Board, SaveFormatError> {
    let mut records = Records::new(text);

    let mut grid: Grid = [[None; BOARD_WIDTH]; BOARD_HEIGHT];
    #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    for (row, grid_row) in grid.iter_mut().enumerate() {
        for (column, slot) in grid_row.iter_mut().enumerate() {
            let record = records.next()?;
            if !record.is_empty() {
                let color = CellColor::from_name(record).ok_or(SaveFormatError::InvalidColor {
                    line: records.line(),
                })?;
                *slot = Some(Cell::new(color, row as i32, column as i32));
            }
        }
    }

    let falling = parse_piece_record(records.next()?, records.line())?;

    let held_record = records.next()?;
    let held = if held_record.is_empty() {
        None
    } else {
        Some(Piece::new(parse_kind(held_record, records.line())?))
    };

    let mut queue = [PieceKind::I; PieceSupply::LOOKAHEAD];
    for slot in &mut queue {
        *slot = parse_kind(records.next()?, records.line())?;
    }

    let lines_cleared = parse_number(records.next()?, records.line())?;
    let score = parse_number(records.next()?, records.line())?;
    let can_hold = parse_flag(records.next()?, records.line())?;
    let game_over = parse_flag(records.next()?, records.line())?;

    Ok(Board::from_state(BoardState {
        grid,
        falling,
        held,
        queue,
        lines_cleared,
        score,
        can_hold,
        game_over,
    }))
}

struct Records<'a> {
    lines: std::str::Lines<'a>,
    line: usize,
}

impl<'a> Records<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines(),
            line: 0,
        }
    }

    fn next(&mut self) -> Result<&'a str, SaveFormatError> {
        self.line += 1;
        self.lines
            .next()
            .ok_or(SaveFormatError::UnexpectedEnd { line: self.line })
    }

    fn line(&self) -> usize {
        self.line
    }
}

fn parse_piece_record(record: &str, line: usize) -> Result<Piece, SaveFormatError> {
    let mut fields = record.split_whitespace();
    let kind_field = fields
        .next()
        .ok_or(SaveFormatError::InvalidPiece { line })?;
    let kind = parse_kind(kind_field, line)?;
    let x = parse_coordinate(fields.next(), line)?;
    let y = parse_coordinate(fields.next(), line)?;
    let state: u8 = fields
        .next()
        .and_then(|field| field.parse().ok())
        .ok_or(SaveFormatError::InvalidNumber { line })?;

    let mut piece = Piece::new(kind);
    piece.set_pivot(x, y);
    piece.set_rotation_state(state);
    Ok(piece)
}

fn parse_coordinate(field: Option<&str>, line: usize) -> Result<f64, SaveFormatError> {
    field
        .and_then(|field| field.parse().ok())
        .ok_or(SaveFormatError::InvalidNumber { line })
}

fn parse_kind(record: &str, line: usize) -> Result<PieceKind, SaveFormatError> {
    let mut chars = record.chars();
    let c = chars.next().ok_or(SaveFormatError::InvalidPiece { line })?;
    if chars.next().is_some() {
        return Err(SaveFormatError::InvalidPiece { line });
    }
    PieceKind::from_char(c).ok_or(SaveFormatError::InvalidPiece { line })
}

fn parse_number(record: &str, line: usize) -> Result<u32, SaveFormatError> {
    record
        .parse()
        .map_err(|_| SaveFormatError::InvalidNumber { line })
}

fn parse_flag(record: &str, line: usize) -> Result<bool, SaveFormatError> {
    match record {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(SaveFormatError::InvalidFlag { line }),
    }
}
