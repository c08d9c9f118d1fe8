//! Core data structures: cells, pieces, and the wall-kick tables.

pub use self::{cell::*, kicks::RotationDirection, piece::*};

pub(crate) mod cell;
pub(crate) mod kicks;
pub(crate) mod piece;

/// Number of columns in the visible grid.
pub const BOARD_WIDTH: usize = 10;
/// Number of rows in the visible grid.
pub const BOARD_HEIGHT: usize = 20;
