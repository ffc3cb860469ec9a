use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::{Duration, Instant};

use darkmaze::{
    generate, reachable, Cell, Difficulty, Dir, GameSession, GenMode, Pos, RevealPolicy,
    SessionEvent, EXIT, START,
};

#[test]
fn carved_fifteen_by_fifteen_has_a_route_to_the_exit() {
    let mut rng = StdRng::seed_from_u64(2024);
    let grid = generate(15, 15, START, EXIT, 0.22, GenMode::CarvedPath, &mut rng);
    assert_eq!(grid.get(START), Cell::Open);
    assert_eq!(grid.get(EXIT), Cell::Open);
    let seen = reachable(&grid, START);
    assert!(seen[EXIT.y][EXIT.x]);
}

#[test]
fn first_move_right_from_start_succeeds() {
    // (2, 1) sits inside the 3x3 clearing around the start, so the first
    // step right can never collide.
    let mut rng = StdRng::seed_from_u64(9);
    let now = Instant::now();
    let mut session = GameSession::new(
        Difficulty::Hard,
        GenMode::CarvedPath,
        RevealPolicy::Static,
        now,
        &mut rng,
    );
    let outcome = session.apply_move(Dir::Right);
    assert!(!outcome.collided);
    assert_eq!(session.player(), Pos::new(2, 1));
}

#[test]
fn walking_into_a_wall_resets_to_start() {
    // The cell above the start is on the border, always a wall.
    let mut rng = StdRng::seed_from_u64(9);
    let now = Instant::now();
    let mut session = GameSession::new(
        Difficulty::Normal,
        GenMode::CarvedPath,
        RevealPolicy::Static,
        now,
        &mut rng,
    );
    let outcome = session.apply_move(Dir::Up);
    assert!(outcome.collided);
    assert_eq!(session.player(), START);
}

#[test]
fn sixty_seconds_without_a_win_loses_exactly_once() {
    let mut rng = StdRng::seed_from_u64(77);
    let t0 = Instant::now();
    let mut session = GameSession::new(
        Difficulty::Normal,
        GenMode::CarvedPath,
        RevealPolicy::Static,
        t0,
        &mut rng,
    );
    assert_eq!(session.time_left(), 60);

    let mut losses = 0;
    for s in 1..=90 {
        if let Some(SessionEvent::TimedOut) =
            session.poll(t0 + Duration::from_secs(s), &mut rng)
        {
            losses += 1;
        }
    }
    assert_eq!(losses, 1);
}

#[test]
fn reaching_the_exit_starts_a_shorter_round() {
    let mut rng = StdRng::seed_from_u64(123);
    let t0 = Instant::now();
    let mut session = GameSession::new(
        Difficulty::Easy,
        GenMode::CarvedPath,
        RevealPolicy::Static,
        t0,
        &mut rng,
    );

    // Walk a flood-fill path from start to exit; the carved mode guarantees
    // one exists.
    let path = shortest_path(&session);
    for dir in path {
        let outcome = session.apply_move(dir);
        assert!(!outcome.collided);
        if outcome.won {
            session.advance_round(t0 + Duration::from_secs(5), &mut rng);
        }
    }
    assert_eq!(session.level(), 2);
    assert_eq!(session.time_left(), 50);
    assert_eq!(session.player(), START);
}

/// BFS parent chase over the session grid, start to exit.
fn shortest_path(session: &GameSession) -> Vec<Dir> {
    use std::collections::VecDeque;

    let grid = session.grid();
    let mut parent: Vec<Vec<Option<(Pos, Dir)>>> =
        vec![vec![None; grid.width()]; grid.height()];
    let mut seen = vec![vec![false; grid.width()]; grid.height()];
    let mut q = VecDeque::new();
    seen[START.y][START.x] = true;
    q.push_back(START);
    while let Some(pos) = q.pop_front() {
        if pos == EXIT {
            break;
        }
        for dir in Dir::ALL {
            let Some(next) = grid.step(pos, dir) else {
                continue;
            };
            if seen[next.y][next.x] || !grid.is_open(next) {
                continue;
            }
            seen[next.y][next.x] = true;
            parent[next.y][next.x] = Some((pos, dir));
            q.push_back(next);
        }
    }

    let mut dirs = Vec::new();
    let mut pos = EXIT;
    while pos != START {
        let (prev, dir) = parent[pos.y][pos.x].expect("exit must be reachable");
        dirs.push(dir);
        pos = prev;
    }
    dirs.reverse();
    dirs
}
