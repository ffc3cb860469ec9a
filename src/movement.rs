use crate::grid::{Dir, Grid, Pos};

/// Outcome of a movement request. On collision the player is already back
/// at `start`; the caller only needs `collided` for feedback effects.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct MoveResult {
    pub pos: Pos,
    pub collided: bool,
}

/// Applies a four-directional step. Walking into a wall or off the grid is
/// a death: the result carries the start cell, not the blocked position.
pub fn try_move(grid: &Grid, current: Pos, dir: Dir, start: Pos) -> MoveResult {
    match grid.step(current, dir) {
        Some(next) if grid.is_open(next) => MoveResult {
            pos: next,
            collided: false,
        },
        _ => MoveResult {
            pos: start,
            collided: true,
        },
    }
}
