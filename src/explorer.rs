//! Terminal-based world explorer using ratatui
//!
//! Roguelike-style walk through the streamed world: the player moves tile by
//! tile, crosses chunk borders, takes stairs into dungeons and only sees what
//! the field of view reveals.

use std::error::Error;
use std::io::stdout;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    style::{Color, Style},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::chunks::{ChunkStore, SURFACE};
use crate::point;
use crate::session::Session;
use crate::tiles::Tile;

/// Dimmed color for remembered but currently unseen tiles
const REMEMBERED: Color = Color::DarkGray;

struct Explorer<S: ChunkStore> {
    session: Session<S>,
    show_help: bool,
    message: Option<String>,
}

impl<S: ChunkStore> Explorer<S> {
    fn new(session: Session<S>) -> Self {
        Explorer {
            session,
            show_help: false,
            message: None,
        }
    }

    fn step(&mut self, direction: point::Direction) {
        match self.session.move_player(direction) {
            Ok(true) => {}
            Ok(false) => self.message = Some("Blocked".to_string()),
            Err(e) => self.message = Some(format!("Error: {}", e)),
        }
    }

    fn use_stairs(&mut self, down: bool) {
        let result = if down { self.session.descend() } else { self.session.ascend() };
        self.message = match result {
            Ok(true) => None,
            Ok(false) => Some(if down { "No way down here" } else { "No way up here" }.to_string()),
            Err(e) => Some(format!("Error: {}", e)),
        };
    }

    fn render_map(&self, area: Rect, buf: &mut Buffer) {
        let tiles = self.session.snapshot();
        let player = self.session.canvas().player_position();

        // Centre the canvas in the available area
        let offset_x = (area.width as i32 - tiles.width as i32) / 2;
        let offset_y = (area.height as i32 - tiles.height as i32) / 2;

        for (p, tile) in tiles.iter() {
            let screen_x = area.x as i32 + offset_x + p.col;
            let screen_y = area.y as i32 + offset_y + p.row;
            if screen_x < area.x as i32
                || screen_y < area.y as i32
                || screen_x >= (area.x + area.width) as i32
                || screen_y >= (area.y + area.height) as i32
            {
                continue;
            }

            let (ch, style) = if p == player {
                ('@', Style::default().fg(Color::Yellow).bg(Color::Black))
            } else {
                tile_display(tile)
            };
            buf.get_mut(screen_x as u16, screen_y as u16).set_char(ch).set_style(style);
        }
    }

    fn render_help(&self, area: Rect, buf: &mut Buffer) {
        let help_text = [
            "=== World Explorer ===",
            "",
            "Movement:",
            "  Arrow keys / WASD / HJKL - Walk",
            "",
            "Stairs:",
            "  > - Go down",
            "  < - Go up",
            "",
            "Other:",
            "  ? - Toggle this help",
            "  Q / Esc - Save and quit",
            "",
            "Press any key to close",
        ];

        let width = 40;
        let height = help_text.len() as u16 + 2;
        let x = area.x + (area.width.saturating_sub(width)) / 2;
        let y = area.y + (area.height.saturating_sub(height)) / 2;
        let help_area = Rect::new(x, y, width.min(area.width), height.min(area.height));

        Clear.render(help_area, buf);
        let block = Block::default()
            .title(" Help ")
            .borders(Borders::ALL)
            .style(Style::default().bg(Color::DarkGray));
        let inner = block.inner(help_area);
        block.render(help_area, buf);

        for (i, line) in help_text.iter().enumerate() {
            if i as u16 >= inner.height {
                break;
            }
            buf.set_string(inner.x, inner.y + i as u16, line, Style::default().fg(Color::White));
        }
    }

    fn status_line(&self) -> String {
        let player = self.session.player();
        let depth = if player.depth == SURFACE {
            "Surface".to_string()
        } else {
            format!("Depth {}", player.depth + 1)
        };
        let under = self
            .session
            .tile_under_player()
            .map(|t| t.kind.def().name)
            .unwrap_or("?");
        let msg = self.message.as_ref().map(|m| format!(" | {}", m)).unwrap_or_default();
        format!(
            " Chunk {} | Tile {} | {} | {}{} | ?:Help  Q:Quit",
            player.chunk, player.local, depth, under, msg
        )
    }
}

/// Glyph and style of a tile on screen. Unseen tiles are blank.
fn tile_display(tile: &Tile) -> (char, Style) {
    if tile.visible {
        let [r, g, b] = tile.color();
        (tile.glyph(), Style::default().fg(Color::Rgb(r, g, b)).bg(Color::Black))
    } else if tile.seen {
        (tile.glyph(), Style::default().fg(REMEMBERED).bg(Color::Black))
    } else {
        (' ', Style::default().bg(Color::Black))
    }
}

pub fn run_explorer<S: ChunkStore>(session: Session<S>) -> Result<(), Box<dyn Error>> {
    // Setup terminal
    terminal::enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut explorer = Explorer::new(session);

    loop {
        terminal.draw(|f| {
            let size = f.area();
            let main_chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(1), Constraint::Length(1)])
                .split(size);

            let map_area = main_chunks[0];
            explorer.render_map(map_area, f.buffer_mut());

            let status_para = Paragraph::new(explorer.status_line())
                .style(Style::default().bg(Color::DarkGray).fg(Color::White));
            f.render_widget(status_para, main_chunks[1]);

            if explorer.show_help {
                explorer.render_help(map_area, f.buffer_mut());
            }
        })?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if explorer.show_help {
                    explorer.show_help = false;
                    continue;
                }
                explorer.message = None;

                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => break,
                    KeyCode::Char('?') => explorer.show_help = true,
                    KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('k') => explorer.step(point::Direction::Up),
                    KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('j') => explorer.step(point::Direction::Down),
                    KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('h') => explorer.step(point::Direction::Left),
                    KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('l') => {
                        explorer.step(point::Direction::Right)
                    }
                    KeyCode::Char('>') => explorer.use_stairs(true),
                    KeyCode::Char('<') => explorer.use_stairs(false),
                    _ => {}
                }
            }
        }
    }

    // Cleanup
    terminal::disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    explorer.session.flush()?;
    Ok(())
}
