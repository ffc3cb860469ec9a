use rand::Rng;
use std::str::FromStr;
use std::time::{Duration, Instant};

use crate::error::GameError;
use crate::generator::{generate, GenMode};
use crate::grid::{Dir, Grid, Pos, GRID_H, GRID_W};
use crate::movement::try_move;
use crate::visibility::{nearest_open, RevealCycle, RevealEvent, RevealPhase, RevealPolicy};

pub const START: Pos = Pos::new(1, 1);
pub const EXIT: Pos = Pos::new(13, 13);

const INITIAL_TIME_SECS: u32 = 60;
const TIME_DECAY_PER_LEVEL: u32 = 10;
const MIN_TIME_SECS: u32 = 20;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Difficulty {
    Easy,
    Normal,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard];

    pub fn wall_chance(self) -> f64 {
        match self {
            Difficulty::Easy => 0.12,
            Difficulty::Normal => 0.22,
            Difficulty::Hard => 0.35,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
        }
    }
}

impl FromStr for Difficulty {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "normal" => Ok(Difficulty::Normal),
            "hard" => Ok(Difficulty::Hard),
            other => Err(GameError::InvalidDifficulty(other.to_string())),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ClockEvent {
    Expired,
}

/// Countdown for one round. Expires at most once; a cancelled clock stays
/// silent no matter how many stale ticks still arrive.
#[derive(Clone, Copy, Debug)]
pub struct RoundClock {
    remaining: u32,
    live: bool,
}

impl RoundClock {
    pub fn new(secs: u32) -> Self {
        RoundClock {
            remaining: secs,
            live: secs > 0,
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn cancel(&mut self) {
        self.live = false;
    }

    pub fn tick(&mut self) -> Option<ClockEvent> {
        if !self.live {
            return None;
        }
        self.remaining -= 1;
        if self.remaining == 0 {
            self.live = false;
            return Some(ClockEvent::Expired);
        }
        None
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SessionEvent {
    /// Countdown hit zero, the round is lost.
    TimedOut,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct MoveOutcome {
    pub collided: bool,
    pub won: bool,
}

/// One play session: the grid, the player, the countdown and the reveal
/// cycle, advanced round by round until the clock runs out.
pub struct GameSession {
    grid: Grid,
    player: Pos,
    level: u32,
    difficulty: Difficulty,
    mode: GenMode,
    policy: RevealPolicy,
    clock: RoundClock,
    reveal: RevealCycle,
    next_second: Option<Instant>,
}

impl GameSession {
    pub fn new(
        difficulty: Difficulty,
        mode: GenMode,
        policy: RevealPolicy,
        now: Instant,
        rng: &mut impl Rng,
    ) -> Self {
        let mut session = GameSession {
            grid: Grid::filled(GRID_W, GRID_H, crate::grid::Cell::Wall),
            player: START,
            level: 1,
            difficulty,
            mode,
            policy,
            clock: RoundClock::new(0),
            reveal: RevealCycle::cancelled(),
            next_second: None,
        };
        session.setup_round(now, rng);
        session
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn player(&self) -> Pos {
        self.player
    }

    pub fn exit(&self) -> Pos {
        EXIT
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn time_left(&self) -> u32 {
        self.clock.remaining()
    }

    pub fn reveal_phase(&self) -> RevealPhase {
        self.reveal.phase()
    }

    pub fn time_budget(level: u32) -> u32 {
        INITIAL_TIME_SECS
            .saturating_sub(level.saturating_sub(1) * TIME_DECAY_PER_LEVEL)
            .max(MIN_TIME_SECS)
    }

    /// Cancels both timers, then rebuilds the round: player back at start,
    /// fresh maze, full time budget, reveal cycle re-armed from `now`.
    fn setup_round(&mut self, now: Instant, rng: &mut impl Rng) {
        self.clock.cancel();
        self.reveal.cancel();

        self.player = START;
        self.grid = generate(
            GRID_W,
            GRID_H,
            START,
            EXIT,
            self.difficulty.wall_chance(),
            self.mode,
            rng,
        );
        self.clock = RoundClock::new(Self::time_budget(self.level));
        self.reveal = RevealCycle::armed(now);
        self.next_second = Some(now + Duration::from_secs(1));
    }

    /// Win transition: next level, shorter clock.
    pub fn advance_round(&mut self, now: Instant, rng: &mut impl Rng) {
        self.level += 1;
        self.setup_round(now, rng);
    }

    /// Applies a directional move. A collision has already reset the player
    /// to the start cell when this returns.
    pub fn apply_move(&mut self, dir: Dir) -> MoveOutcome {
        let result = try_move(&self.grid, self.player, dir, START);
        self.player = result.pos;
        MoveOutcome {
            collided: result.collided,
            won: !result.collided && self.player == EXIT,
        }
    }

    /// Drives both timers up to `now`. Returns the loss event when the
    /// countdown expires; reveal pulses are absorbed internally (the
    /// renderer reads `reveal_phase` each frame).
    pub fn poll(&mut self, now: Instant, rng: &mut impl Rng) -> Option<SessionEvent> {
        while let Some(due) = self.next_second {
            if now < due {
                break;
            }
            self.next_second = Some(due + Duration::from_secs(1));
            if let Some(ClockEvent::Expired) = self.clock.tick() {
                self.end_round();
                return Some(SessionEvent::TimedOut);
            }
        }

        if let Some(RevealEvent::Pulse) = self.reveal.poll(now) {
            if self.policy == RevealPolicy::Regenerate {
                self.regenerate_maze(rng);
            }
        }
        None
    }

    /// Stops both timers for good; used on loss and on quit.
    pub fn end_round(&mut self) {
        self.clock.cancel();
        self.reveal.cancel();
        self.next_second = None;
    }

    fn regenerate_maze(&mut self, rng: &mut impl Rng) {
        self.grid = generate(
            GRID_W,
            GRID_H,
            START,
            EXIT,
            self.difficulty.wall_chance(),
            self.mode,
            rng,
        );
        self.free_stranded_player();
    }

    /// The fresh grid may have put a wall under the player; relocate before
    /// anything renders.
    fn free_stranded_player(&mut self) {
        if self.grid.is_open(self.player) {
            return;
        }
        let relocated = nearest_open(&self.grid, self.player);
        log::debug!(
            "player stranded at ({}, {}), relocated to ({}, {})",
            self.player.x,
            self.player.y,
            relocated.x,
            relocated.y
        );
        self.player = relocated;
    }
}
