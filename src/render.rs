use crossterm::cursor::MoveTo;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::QueueableCommand;
use std::io::{self, Stdout, Write};
use unicode_width::UnicodeWidthStr;

use crate::grid::Pos;
use crate::session::GameSession;
use crate::visibility::{classify, RevealState};

pub const CELL_W: usize = 2;

#[derive(Clone, Copy, PartialEq)]
enum Glyph {
    Player,
    Wall,
    Path,
    Exit,
    Hidden,
    Flash,
}

#[derive(Clone, Copy, PartialEq)]
struct CellView {
    glyph: Glyph,
    color: Color,
}

/// Diff renderer: keeps the last frame and repaints only cells that
/// changed, so the dark phase costs almost nothing per frame.
pub struct Renderer {
    last: Vec<CellView>,
    last_hud: String,
    needs_full: bool,
    origin_x: u16,
    origin_y: u16,
}

impl Renderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            last: vec![
                CellView {
                    glyph: Glyph::Hidden,
                    color: Color::Reset,
                };
                width * height
            ],
            last_hud: String::new(),
            needs_full: true,
            origin_x: 0,
            origin_y: 1,
        }
    }

    pub fn invalidate(&mut self) {
        self.needs_full = true;
    }
}

pub fn render(
    stdout: &mut Stdout,
    session: &GameSession,
    renderer: &mut Renderer,
    flash: bool,
) -> io::Result<()> {
    let width = session.grid().width();
    let height = session.grid().height();
    let needed_h = (height + 2) as u16;
    let needed_w = (width * CELL_W) as u16;

    stdout.queue(MoveTo(0, 0))?;

    let (term_w, term_h) = terminal::size()?;
    if term_w < needed_w || term_h < needed_h {
        stdout.queue(Clear(ClearType::All))?;
        let msg = format!(
            "Terminal too small. Need at least {}x{} (cols x rows). Current: {}x{}.",
            needed_w, needed_h, term_w, term_h
        );
        stdout.queue(Print(msg))?;
        stdout.flush()?;
        renderer.needs_full = true;
        return Ok(());
    }

    let origin_x = (term_w - needed_w) / 2;
    let origin_y = (term_h - needed_h) / 2 + 1;
    if origin_x != renderer.origin_x || origin_y != renderer.origin_y {
        renderer.origin_x = origin_x;
        renderer.origin_y = origin_y;
        renderer.needs_full = true;
    }

    let hud = format!(
        "Level: {}  Time: {}  Difficulty: {}  (q to quit)",
        session.level(),
        session.time_left(),
        session.difficulty().label()
    );
    if renderer.needs_full || hud != renderer.last_hud {
        stdout.queue(MoveTo(renderer.origin_x, renderer.origin_y - 1))?;
        stdout.queue(SetForegroundColor(Color::White))?;
        stdout.queue(Clear(ClearType::CurrentLine))?;
        stdout.queue(Print(&hud))?;
        stdout.queue(ResetColor)?;
        renderer.last_hud = hud;
    }

    for y in 0..height {
        for x in 0..width {
            let pos = Pos { x, y };
            let cell = cell_for(session, pos, flash);
            let idx = y * width + x;
            if renderer.needs_full || cell != renderer.last[idx] {
                renderer.last[idx] = cell;
                draw_cell(stdout, renderer, x, y, cell)?;
            }
        }
    }
    renderer.needs_full = false;

    stdout.flush()?;
    Ok(())
}

fn cell_for(session: &GameSession, pos: Pos, flash: bool) -> CellView {
    if flash && pos != session.player() {
        return CellView {
            glyph: Glyph::Flash,
            color: Color::Red,
        };
    }
    let state = classify(
        session.grid(),
        session.player(),
        session.exit(),
        session.reveal_phase(),
        pos,
    );
    match state {
        RevealState::Player => CellView {
            glyph: Glyph::Player,
            color: Color::Yellow,
        },
        RevealState::RevealedWall => CellView {
            glyph: Glyph::Wall,
            color: Color::DarkGrey,
        },
        RevealState::RevealedPath => CellView {
            glyph: Glyph::Path,
            color: Color::White,
        },
        RevealState::RevealedExit => CellView {
            glyph: Glyph::Exit,
            color: Color::Green,
        },
        RevealState::Hidden => CellView {
            glyph: Glyph::Hidden,
            color: Color::Reset,
        },
    }
}

fn draw_cell(
    stdout: &mut Stdout,
    renderer: &Renderer,
    x: usize,
    y: usize,
    cell: CellView,
) -> io::Result<()> {
    let (text, color) = match cell.glyph {
        Glyph::Player => ("😃", cell.color),
        Glyph::Wall => ("██", cell.color),
        Glyph::Path => ("░░", cell.color),
        Glyph::Exit => ("🚪", cell.color),
        Glyph::Hidden => ("  ", cell.color),
        Glyph::Flash => ("▓▓", cell.color),
    };
    let x_pos = renderer.origin_x + (x * CELL_W) as u16;
    let y_pos = renderer.origin_y + y as u16;
    stdout.queue(MoveTo(x_pos, y_pos))?;
    stdout.queue(SetForegroundColor(color))?;
    stdout.queue(Print(text))?;
    let w = UnicodeWidthStr::width(text);
    if w < CELL_W {
        for _ in 0..(CELL_W - w) {
            stdout.queue(Print(' '))?;
        }
    }
    stdout.queue(ResetColor)?;
    Ok(())
}

pub fn render_game_over(stdout: &mut Stdout, session: &GameSession) -> io::Result<()> {
    let (term_w, term_h) = terminal::size()?;
    let height = session.grid().height();
    let needed_h = (height + 2) as u16;
    let needed_w = (session.grid().width() * CELL_W) as u16;
    if term_w < needed_w || term_h < needed_h {
        stdout.queue(MoveTo(0, needed_h))?;
    } else {
        let origin_x = (term_w - needed_w) / 2;
        let origin_y = (term_h - needed_h) / 2 + 1;
        stdout.queue(MoveTo(origin_x, origin_y + height as u16))?;
    }
    stdout.queue(Print(format!(
        "Time's up! You made it to level {}. (press any key)",
        session.level()
    )))?;
    stdout.flush()?;
    Ok(())
}
