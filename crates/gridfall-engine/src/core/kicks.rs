//! Wall-kick offset tables for rotation retries.
//!
//! A rotation is first tried in place; when that placement is illegal the
//! board walks one of these offset lists, in order, and applies the first
//! offset whose translated-then-rotated placement is fully legal. The lists
//! are indexed by the piece's current rotation state.

use super::piece::PieceKind;

/// Direction of a quarter turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationDirection {
    Clockwise,
    CounterClockwise,
}

/// Kick offsets (x, y) tried in order for one rotation state.
pub(crate) type KickOffsets = [(f64, f64); 4];

/// {J,L,S,T,Z} (and O, which never gets past the in-place attempt), clockwise.
const COMMON_CW: [KickOffsets; 4] = [
    [(-1.0, 0.0), (-1.0, -1.0), (0.0, 2.0), (-1.0, 2.0)],
    [(1.0, 0.0), (1.0, 1.0), (0.0, -2.0), (1.0, -2.0)],
    [(1.0, 0.0), (1.0, -1.0), (0.0, 2.0), (1.0, 2.0)],
    [(-1.0, 0.0), (-1.0, 1.0), (0.0, -2.0), (-1.0, -2.0)],
];

/// {J,L,S,T,Z}, counter-clockwise.
const COMMON_CCW: [KickOffsets; 4] = [
    [(1.0, 0.0), (1.0, -1.0), (0.0, 2.0), (1.0, 2.0)],
    [(1.0, 0.0), (1.0, 1.0), (0.0, -2.0), (1.0, -2.0)],
    [(-1.0, 0.0), (-1.0, -1.0), (0.0, 2.0), (-1.0, 2.0)],
    [(-1.0, 0.0), (-1.0, 1.0), (0.0, -2.0), (-1.0, -2.0)],
];

/// I kind, clockwise.
const I_CW: [KickOffsets; 4] = [
    [(-2.0, 0.0), (1.0, 0.0), (-2.0, 1.0), (1.0, -2.0)],
    [(-1.0, 0.0), (2.0, 0.0), (-1.0, -2.0), (2.0, 1.0)],
    [(2.0, 0.0), (-1.0, 0.0), (2.0, -1.0), (-1.0, 2.0)],
    [(1.0, 0.0), (-2.0, 0.0), (1.0, 2.0), (-2.0, -1.0)],
];

/// I kind, counter-clockwise, spawn state only. States 1-3 have no dedicated
/// counter-clockwise lists; see [`kick_plan`].
const I_CCW_SPAWN: KickOffsets = [(-1.0, 0.0), (2.0, 0.0), (-1.0, -2.0), (2.0, 1.0)];

/// I kind, counter-clockwise fallback for states 1-3. These entries pair with
/// a *clockwise* turn: past the spawn state, the I kind retries a failed
/// counter-clockwise rotation with clockwise offsets and a clockwise turn.
/// Long-standing behavior, kept as-is (see DESIGN.md).
const I_CCW_FALLBACK: [KickOffsets; 3] = [
    [(2.0, 0.0), (-1.0, 0.0), (2.0, -1.0), (-1.0, 2.0)],
    [(1.0, 0.0), (-2.0, 0.0), (1.0, 2.0), (-2.0, -1.0)],
    [(-2.0, 0.0), (1.0, 0.0), (-2.0, 1.0), (1.0, -2.0)],
];

/// Returns the offsets to try for a failed in-place rotation, together with
/// the direction of the turn each retry actually applies.
pub(crate) fn kick_plan(
    kind: PieceKind,
    direction: RotationDirection,
    state: usize,
) -> (&'static KickOffsets, RotationDirection) {
    match (kind, direction) {
        (PieceKind::I, RotationDirection::Clockwise) => {
            (&I_CW[state], RotationDirection::Clockwise)
        }
        (PieceKind::I, RotationDirection::CounterClockwise) => {
            if state == 0 {
                (&I_CCW_SPAWN, RotationDirection::CounterClockwise)
            } else {
                (&I_CCW_FALLBACK[state - 1], RotationDirection::Clockwise)
            }
        }
        (_, RotationDirection::Clockwise) => (&COMMON_CW[state], RotationDirection::Clockwise),
        (_, RotationDirection::CounterClockwise) => {
            (&COMMON_CCW[state], RotationDirection::CounterClockwise)
        }
    }
}
