use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{ExecutableCommand, QueueableCommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::{self, Stdout, Write};
use std::thread;
use std::time::{Duration, Instant};

use darkmaze::render::{render, render_game_over, Renderer};
use darkmaze::{
    Difficulty, Dir, GameSession, GenMode, RevealPolicy, SessionEvent, GRID_H, GRID_W,
};

const DEFAULT_RENDER_FPS: u64 = 60;
const FLASH_MS: u64 = 700;

struct Settings {
    frame_time: Duration,
    seed: Option<u64>,
    difficulty: Option<Difficulty>,
    mode: GenMode,
    policy: RevealPolicy,
}

/// Env-var knobs. `MAZE_DIFFICULTY` fails fast on an unknown value; the
/// rest fall back to defaults.
fn read_settings() -> Result<Settings, darkmaze::GameError> {
    let render_fps = std::env::var("MAZE_FPS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(DEFAULT_RENDER_FPS);
    let seed = std::env::var("MAZE_SEED")
        .ok()
        .and_then(|v| v.parse::<u64>().ok());
    let difficulty = match std::env::var("MAZE_DIFFICULTY") {
        Ok(v) => Some(v.parse::<Difficulty>()?),
        Err(_) => None,
    };
    let mode = match std::env::var("MAZE_MODE").ok().as_deref() {
        Some("random") => GenMode::PureRandom,
        _ => GenMode::CarvedPath,
    };
    let policy = match std::env::var("MAZE_REVEAL").ok().as_deref() {
        Some("regen") => RevealPolicy::Regenerate,
        _ => RevealPolicy::Static,
    };
    Ok(Settings {
        frame_time: Duration::from_micros(1_000_000 / render_fps.max(1)),
        seed,
        difficulty,
        mode,
        policy,
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = read_settings()?;

    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(Hide)?;

    let result = run(&mut stdout, &settings);

    stdout.execute(Show)?;
    stdout.execute(LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    result?;
    Ok(())
}

enum PlayOutcome {
    Quit,
    GameOver,
}

fn run(stdout: &mut Stdout, settings: &Settings) -> io::Result<()> {
    let mut rng = match settings.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    loop {
        let difficulty = match settings.difficulty {
            Some(d) => d,
            None => match menu(stdout)? {
                Some(d) => d,
                None => return Ok(()),
            },
        };

        match play(stdout, difficulty, settings, &mut rng)? {
            PlayOutcome::Quit => return Ok(()),
            PlayOutcome::GameOver => {
                // Back to the menu, unless the menu was skipped via env.
                if settings.difficulty.is_some() {
                    return Ok(());
                }
            }
        }
    }
}

/// Difficulty select screen. `None` means the player quit.
fn menu(stdout: &mut Stdout) -> io::Result<Option<Difficulty>> {
    let mut selected = 1usize; // normal
    loop {
        draw_menu(stdout, selected)?;
        if !event::poll(Duration::from_millis(50))? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match key.code {
                KeyCode::Up | KeyCode::Char('k') => {
                    selected = selected.checked_sub(1).unwrap_or(Difficulty::ALL.len() - 1);
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    selected = (selected + 1) % Difficulty::ALL.len();
                }
                KeyCode::Enter => return Ok(Some(Difficulty::ALL[selected])),
                KeyCode::Char('h') => how_to(stdout)?,
                KeyCode::Char('q') | KeyCode::Esc => return Ok(None),
                _ => {}
            }
        }
    }
}

fn draw_menu(stdout: &mut Stdout, selected: usize) -> io::Result<()> {
    let mut lines: Vec<(String, Color)> = vec![
        ("D A R K   M A Z E".to_string(), Color::Yellow),
        (String::new(), Color::Reset),
    ];
    for (idx, difficulty) in Difficulty::ALL.iter().enumerate() {
        let marker = if idx == selected { "> " } else { "  " };
        let color = if idx == selected {
            Color::Green
        } else {
            Color::White
        };
        lines.push((format!("{}{}", marker, difficulty.label()), color));
    }
    lines.push((String::new(), Color::Reset));
    lines.push((
        "enter: play   h: how to play   q: quit".to_string(),
        Color::DarkGrey,
    ));
    draw_screen(stdout, &lines)
}

fn how_to(stdout: &mut Stdout) -> io::Result<()> {
    let lines: Vec<(String, Color)> = [
        "HOW TO PLAY",
        "",
        "The maze is pitch dark; only you glow.",
        "Every 10 seconds the lights flicker on for 2 seconds.",
        "Memorize the layout and reach the door before time runs out.",
        "Touch a wall and you are dragged back to the start.",
        "",
        "Move with the arrow keys.",
        "",
        "press any key to go back",
    ]
    .into_iter()
    .map(|s| (s.to_string(), Color::White))
    .collect();
    draw_screen(stdout, &lines)?;
    wait_any_key()
}

fn draw_screen(stdout: &mut Stdout, lines: &[(String, Color)]) -> io::Result<()> {
    let (term_w, term_h) = terminal::size()?;
    stdout.queue(Clear(ClearType::All))?;
    let top = term_h.saturating_sub(lines.len() as u16) / 2;
    for (i, (line, color)) in lines.iter().enumerate() {
        let x = term_w.saturating_sub(line.len() as u16) / 2;
        stdout.queue(MoveTo(x, top + i as u16))?;
        stdout.queue(SetForegroundColor(*color))?;
        stdout.queue(Print(line))?;
        stdout.queue(ResetColor)?;
    }
    stdout.flush()
}

fn wait_any_key() -> io::Result<()> {
    loop {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return Ok(());
                }
            }
        }
    }
}

fn play(
    stdout: &mut Stdout,
    difficulty: Difficulty,
    settings: &Settings,
    rng: &mut StdRng,
) -> io::Result<PlayOutcome> {
    let mut session = GameSession::new(
        difficulty,
        settings.mode,
        settings.policy,
        Instant::now(),
        rng,
    );
    let mut renderer = Renderer::new(GRID_W, GRID_H);
    let mut flash_until: Option<Instant> = None;
    stdout.execute(Clear(ClearType::All))?;

    loop {
        let frame_start = Instant::now();

        while event::poll(Duration::from_millis(0))? {
            if let Event::Key(key) = event::read()? {
                match key.kind {
                    KeyEventKind::Press | KeyEventKind::Repeat => {
                        let dir = match key.code {
                            KeyCode::Char('q') | KeyCode::Esc => {
                                session.end_round();
                                return Ok(PlayOutcome::Quit);
                            }
                            KeyCode::Up => Some(Dir::Up),
                            KeyCode::Down => Some(Dir::Down),
                            KeyCode::Left => Some(Dir::Left),
                            KeyCode::Right => Some(Dir::Right),
                            _ => None,
                        };
                        if let Some(dir) = dir {
                            let outcome = session.apply_move(dir);
                            if outcome.collided {
                                flash_until =
                                    Some(Instant::now() + Duration::from_millis(FLASH_MS));
                            }
                            if outcome.won {
                                session.advance_round(Instant::now(), rng);
                                flash_until = None;
                                renderer.invalidate();
                            }
                        }
                    }
                    _ => {}
                }
            }
        }

        let now = Instant::now();
        let flash = flash_until.is_some_and(|t| now < t);
        if !flash {
            flash_until = None;
        }

        if let Some(SessionEvent::TimedOut) = session.poll(now, rng) {
            render(stdout, &session, &mut renderer, false)?;
            render_game_over(stdout, &session)?;
            wait_any_key()?;
            return Ok(PlayOutcome::GameOver);
        }

        render(stdout, &session, &mut renderer, flash)?;

        let elapsed = frame_start.elapsed();
        if elapsed < settings.frame_time {
            thread::sleep(settings.frame_time - elapsed);
        }
    }
}
