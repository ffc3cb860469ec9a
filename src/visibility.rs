use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::grid::{Dir, Grid, Pos};

pub const REVEAL_PERIOD: Duration = Duration::from_secs(10);
pub const REVEAL_DURATION: Duration = Duration::from_secs(2);

/// What the renderer is allowed to know about one cell.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RevealState {
    Hidden,
    RevealedWall,
    RevealedPath,
    RevealedExit,
    Player,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RevealPhase {
    /// Lights out: only the player shows.
    Dark,
    /// Pulse window: the whole layout shows.
    Revealed,
}

/// Whether a reveal pulse keeps the maze or rebuilds it.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RevealPolicy {
    Static,
    Regenerate,
}

/// Pure per-cell display classification. The player always wins the cell it
/// stands on; everything else depends on the phase.
pub fn classify(grid: &Grid, player: Pos, exit: Pos, phase: RevealPhase, cell: Pos) -> RevealState {
    if cell == player {
        return RevealState::Player;
    }
    match phase {
        RevealPhase::Dark => RevealState::Hidden,
        RevealPhase::Revealed => {
            if cell == exit {
                RevealState::RevealedExit
            } else if grid.is_open(cell) {
                RevealState::RevealedPath
            } else {
                RevealState::RevealedWall
            }
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RevealEvent {
    /// Lights just came on.
    Pulse,
    /// Pulse window ended, back to dark.
    Fade,
}

/// Timed reveal cycle. Deadlines are explicit handles so a round transition
/// can cancel the cycle outright instead of letting a stale pulse fire into
/// the next round.
#[derive(Clone, Copy, Debug)]
pub struct RevealCycle {
    phase: RevealPhase,
    next_pulse: Option<Instant>,
    fade_at: Option<Instant>,
}

impl RevealCycle {
    /// Starts dark with the first pulse one full period away.
    pub fn armed(now: Instant) -> Self {
        RevealCycle {
            phase: RevealPhase::Dark,
            next_pulse: Some(now + REVEAL_PERIOD),
            fade_at: None,
        }
    }

    pub fn cancelled() -> Self {
        RevealCycle {
            phase: RevealPhase::Dark,
            next_pulse: None,
            fade_at: None,
        }
    }

    pub fn phase(&self) -> RevealPhase {
        self.phase
    }

    pub fn cancel(&mut self) {
        self.phase = RevealPhase::Dark;
        self.next_pulse = None;
        self.fade_at = None;
    }

    /// Advances the cycle to `now`. At most one event per call; the caller
    /// polls every frame so pulse and fade never pile up.
    pub fn poll(&mut self, now: Instant) -> Option<RevealEvent> {
        if let Some(fade_at) = self.fade_at {
            if now >= fade_at {
                self.fade_at = None;
                self.phase = RevealPhase::Dark;
                return Some(RevealEvent::Fade);
            }
            return None;
        }
        if let Some(next_pulse) = self.next_pulse {
            if now >= next_pulse {
                self.phase = RevealPhase::Revealed;
                self.fade_at = Some(now + REVEAL_DURATION);
                self.next_pulse = Some(now + REVEAL_PERIOD);
                return Some(RevealEvent::Pulse);
            }
        }
        None
    }
}

/// Nearest open cell by breadth-first ring search, for a player stranded by
/// regeneration. Searches through walls since the player may be enclosed.
pub fn nearest_open(grid: &Grid, from: Pos) -> Pos {
    if grid.is_open(from) {
        return from;
    }
    let mut seen = vec![vec![false; grid.width()]; grid.height()];
    let mut q = VecDeque::new();
    seen[from.y][from.x] = true;
    q.push_back(from);
    while let Some(pos) = q.pop_front() {
        for dir in Dir::ALL {
            let Some(next) = grid.step(pos, dir) else {
                continue;
            };
            if seen[next.y][next.x] {
                continue;
            }
            if grid.is_open(next) {
                return next;
            }
            seen[next.y][next.x] = true;
            q.push_back(next);
        }
    }
    // A generated grid always has open cells; unreachable in practice.
    from
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Cell;

    fn tiny_grid() -> Grid {
        let mut grid = Grid::filled(5, 5, Cell::Wall);
        for y in 1..4 {
            for x in 1..4 {
                grid.set(Pos::new(x, y), Cell::Open);
            }
        }
        grid.set(Pos::new(2, 2), Cell::Wall);
        grid
    }

    #[test]
    fn dark_phase_hides_everything_but_player() {
        let grid = tiny_grid();
        let player = Pos::new(1, 1);
        let exit = Pos::new(3, 3);
        assert_eq!(
            classify(&grid, player, exit, RevealPhase::Dark, player),
            RevealState::Player
        );
        assert_eq!(
            classify(&grid, player, exit, RevealPhase::Dark, exit),
            RevealState::Hidden
        );
        assert_eq!(
            classify(&grid, player, exit, RevealPhase::Dark, Pos::new(2, 2)),
            RevealState::Hidden
        );
    }

    #[test]
    fn revealed_phase_distinguishes_cells() {
        let grid = tiny_grid();
        let player = Pos::new(1, 1);
        let exit = Pos::new(3, 3);
        assert_eq!(
            classify(&grid, player, exit, RevealPhase::Revealed, Pos::new(2, 2)),
            RevealState::RevealedWall
        );
        assert_eq!(
            classify(&grid, player, exit, RevealPhase::Revealed, Pos::new(2, 1)),
            RevealState::RevealedPath
        );
        assert_eq!(
            classify(&grid, player, exit, RevealPhase::Revealed, exit),
            RevealState::RevealedExit
        );
        assert_eq!(
            classify(&grid, player, exit, RevealPhase::Revealed, player),
            RevealState::Player
        );
    }

    #[test]
    fn classify_is_idempotent() {
        let grid = tiny_grid();
        let player = Pos::new(1, 1);
        let exit = Pos::new(3, 3);
        for phase in [RevealPhase::Dark, RevealPhase::Revealed] {
            for y in 0..grid.height() {
                for x in 0..grid.width() {
                    let cell = Pos::new(x, y);
                    let first = classify(&grid, player, exit, phase, cell);
                    let second = classify(&grid, player, exit, phase, cell);
                    assert_eq!(first, second);
                }
            }
        }
    }

    #[test]
    fn cycle_pulses_then_fades() {
        let t0 = Instant::now();
        let mut cycle = RevealCycle::armed(t0);
        assert_eq!(cycle.phase(), RevealPhase::Dark);
        assert_eq!(cycle.poll(t0 + Duration::from_secs(5)), None);

        assert_eq!(
            cycle.poll(t0 + REVEAL_PERIOD),
            Some(RevealEvent::Pulse)
        );
        assert_eq!(cycle.phase(), RevealPhase::Revealed);

        let pulse_at = t0 + REVEAL_PERIOD;
        assert_eq!(cycle.poll(pulse_at + Duration::from_secs(1)), None);
        assert_eq!(
            cycle.poll(pulse_at + REVEAL_DURATION),
            Some(RevealEvent::Fade)
        );
        assert_eq!(cycle.phase(), RevealPhase::Dark);
    }

    #[test]
    fn cancelled_cycle_never_fires() {
        let t0 = Instant::now();
        let mut cycle = RevealCycle::armed(t0);
        cycle.cancel();
        assert_eq!(cycle.poll(t0 + REVEAL_PERIOD * 3), None);
        assert_eq!(cycle.phase(), RevealPhase::Dark);
    }

    #[test]
    fn nearest_open_finds_adjacent_cell() {
        let grid = tiny_grid();
        let relocated = nearest_open(&grid, Pos::new(2, 2));
        assert!(grid.is_open(relocated));
        let dist = relocated.x.abs_diff(2) + relocated.y.abs_diff(2);
        assert_eq!(dist, 1);
    }

    #[test]
    fn nearest_open_keeps_open_position() {
        let grid = tiny_grid();
        assert_eq!(nearest_open(&grid, Pos::new(1, 1)), Pos::new(1, 1));
    }

    #[test]
    fn nearest_open_searches_through_walls() {
        let mut grid = Grid::filled(7, 7, Cell::Wall);
        grid.set(Pos::new(5, 5), Cell::Open);
        assert_eq!(nearest_open(&grid, Pos::new(1, 1)), Pos::new(5, 5));
    }
}
