use rand::Rng;
use std::collections::VecDeque;

use crate::grid::{Cell, Dir, Grid, Pos};

/// Maze generation flavor.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GenMode {
    /// Carve a random walk from start to exit first, then sprinkle walls
    /// everywhere else. At least one route always survives.
    CarvedPath,
    /// Every interior cell rolls independently. No connectivity guarantee.
    PureRandom,
}

/// Builds a fresh occupancy grid. Border cells are always walls, start and
/// exit always end up open. All randomness comes from `rng`, so a seeded
/// generator reproduces the same maze.
pub fn generate(
    width: usize,
    height: usize,
    start: Pos,
    exit: Pos,
    wall_chance: f64,
    mode: GenMode,
    rng: &mut impl Rng,
) -> Grid {
    let mut grid = Grid::filled(width, height, Cell::Wall);

    match mode {
        GenMode::CarvedPath => {
            carve_walk(&mut grid, start, exit, rng);
            // Cells the walk skipped roll for wall placement.
            for y in 1..height - 1 {
                for x in 1..width - 1 {
                    let pos = Pos::new(x, y);
                    if grid.is_open(pos) {
                        continue;
                    }
                    let cell = if rng.gen_bool(wall_chance) {
                        Cell::Wall
                    } else {
                        Cell::Open
                    };
                    grid.set(pos, cell);
                }
            }
        }
        GenMode::PureRandom => {
            for y in 1..height - 1 {
                for x in 1..width - 1 {
                    let cell = if rng.gen_bool(wall_chance) {
                        Cell::Wall
                    } else {
                        Cell::Open
                    };
                    grid.set(Pos::new(x, y), cell);
                }
            }
        }
    }

    grid.set(start, Cell::Open);
    grid.set(exit, Cell::Open);

    clear_neighborhood(&mut grid, start);
    if mode == GenMode::PureRandom {
        // The carved walk already leaves the exit approach open; the pure
        // random roll gives no such promise.
        clear_neighborhood(&mut grid, exit);
    }

    grid
}

/// Random walk stepping one cell at a time toward `exit`, opening every
/// visited cell. When both axes still differ a coin decides which one
/// advances, so every iteration makes progress and the walk terminates for
/// any rng.
fn carve_walk(grid: &mut Grid, start: Pos, exit: Pos, rng: &mut impl Rng) {
    let mut pos = start;
    grid.set(pos, Cell::Open);
    while pos != exit {
        let step_x = pos.x != exit.x && (pos.y == exit.y || rng.gen_bool(0.5));
        if step_x {
            pos.x = if pos.x < exit.x { pos.x + 1 } else { pos.x - 1 };
        } else {
            pos.y = if pos.y < exit.y { pos.y + 1 } else { pos.y - 1 };
        }
        grid.set(pos, Cell::Open);
    }
}

/// Opens the 3x3 block around `center`, clipped to the interior so the
/// border stays solid.
fn clear_neighborhood(grid: &mut Grid, center: Pos) {
    for dy in -1isize..=1 {
        for dx in -1isize..=1 {
            let nx = center.x as isize + dx;
            let ny = center.y as isize + dy;
            if !grid.in_bounds(nx, ny) {
                continue;
            }
            let pos = Pos::new(nx as usize, ny as usize);
            if grid.is_border(pos) {
                continue;
            }
            grid.set(pos, Cell::Open);
        }
    }
}

/// Flood fill over open cells from `start`.
pub fn reachable(grid: &Grid, start: Pos) -> Vec<Vec<bool>> {
    let mut seen = vec![vec![false; grid.width()]; grid.height()];
    if !grid.is_open(start) {
        return seen;
    }
    let mut q = VecDeque::new();
    seen[start.y][start.x] = true;
    q.push_back(start);
    while let Some(pos) = q.pop_front() {
        for dir in Dir::ALL {
            let Some(next) = grid.step(pos, dir) else {
                continue;
            };
            if seen[next.y][next.x] || !grid.is_open(next) {
                continue;
            }
            seen[next.y][next.x] = true;
            q.push_back(next);
        }
    }
    seen
}
