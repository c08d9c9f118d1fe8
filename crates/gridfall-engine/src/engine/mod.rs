//! Game-state orchestration.
//!
//! - [`Board`] — the 20×10 grid, the falling and held pieces, counters, and
//!   every gameplay operation (gravity, moves, kick-searched rotation, row
//!   clearing, hold, reset)
//! - [`PieceSupply`] — seedable piece generation with a fixed 4-piece
//!   look-ahead queue
//! - [`SupplySeed`] — seed for deterministic piece generation
//!
//! A typical game loop calls [`Board::fall`] on a timer and the move, rotate,
//! hard-fall, and hold operations in response to input, then reads the board
//! back through its getters for rendering. All operations are total: illegal
//! requests are refused silently, and once the game-over flag is set every
//! mutating call short-circuits until [`Board::reset`].

pub use self::{board::*, supply::*};

pub(crate) use self::board::{BoardState, Grid};

mod board;
mod supply;
