// Terminal UI: rendering and the event-polling loop
// Thin shell around the core: feeds pointer positions and button edges into
// the input resolver and draws the per-cell visual state back out.

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
    MouseEventKind,
};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Span, Spans, Text};
use ratatui::widgets::{Block, Borders, Paragraph};
use std::error::Error;
use std::io;
use std::time::{Duration, Instant};

use crate::field::{Minefield, Reveal};
use crate::input::{ButtonState, GridLayout, InputResolver};
use crate::palette::{Tuned, number_color};

// Screen footprint of one cell button
const CELL_COLS: u16 = 2;
const CELL_ROWS: u16 = 1;

pub fn run(width: i32, height: i32, mines: usize) -> Result<(), Box<dyn Error>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnableMouseCapture, terminal::EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, width, height, mines);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        terminal::LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;
    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    width: i32,
    height: i32,
    mines: usize,
) -> Result<(), Box<dyn Error>> {
    let mut field = Minefield::new(width, height, mines)?;
    let mut resolver = InputResolver::new(GridLayout {
        origin: (0, 0),
        cell_cols: CELL_COLS,
        cell_rows: CELL_ROWS,
        width,
        height,
    });
    let mut pointer: (u16, u16) = (0, 0);
    // Some(true) = field cleared, Some(false) = mine hit
    let mut outcome: Option<bool> = None;
    let mut board_origin: (u16, u16) = (0, 0);

    // Fixed glyphs and terminal-matched colors, resolved once
    let up_bg = Color::Gray.tuned();
    let hover_bg = Color::DarkGray.tuned();
    let down_bg = Color::Black.tuned();
    let opened_bg = Color::White.tuned();
    let flag_fg = Color::Red.tuned();
    let mine_fg = Color::Black.tuned();
    let mine_bg = Color::LightRed.tuned();
    let menu_key_fg = Color::Yellow.tuned();
    let num_colors: [Color; 8] = std::array::from_fn(|i| number_color(i as u8 + 1));

    let board_w = width as u16 * CELL_COLS + 2;
    let board_h = height as u16 * CELL_ROWS + 2;

    let tick_rate = Duration::from_millis(200);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| {
            let size = f.size();
            // Menu and status rows need three lines each around the board
            if size.width < board_w || size.height < board_h + 6 {
                let warn = Paragraph::new(Text::from(vec![
                    Spans::from(Span::raw("Terminal too small.")),
                    Spans::from(Span::raw(format!(
                        "Minimum required: {} x {}",
                        board_w,
                        board_h + 6
                    ))),
                ]))
                .block(Block::default().borders(Borders::ALL).title("Resize"))
                .alignment(Alignment::Center);
                f.render_widget(warn, center_rect(30.min(size.width), 4.min(size.height), size));
                return;
            }

            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints(
                    [
                        Constraint::Length(3),
                        Constraint::Min(board_h),
                        Constraint::Length(3),
                    ]
                    .as_ref(),
                )
                .split(size);

            // menu row
            let menu = Paragraph::new(Spans::from(vec![
                Span::raw(" "),
                Span::styled("N", Style::default().fg(menu_key_fg).add_modifier(Modifier::BOLD)),
                Span::raw(": New   "),
                Span::styled("Esc", Style::default().fg(menu_key_fg).add_modifier(Modifier::BOLD)),
                Span::raw(": Exit "),
            ]))
            .block(Block::default().borders(Borders::ALL).title("Mines"))
            .alignment(Alignment::Left);
            f.render_widget(menu, chunks[0]);

            // board, centered; the inner origin anchors pointer hit-testing
            let board_area = center_rect(board_w, board_h, chunks[1]);
            board_origin = (board_area.x + 1, board_area.y + 1);

            let mut lines = Vec::with_capacity(height as usize);
            for y in 0..height {
                let mut spans = Vec::with_capacity(width as usize);
                for x in 0..width {
                    let Some(cell) = field.cell(x, y) else {
                        continue;
                    };
                    let span = if cell.is_opened {
                        if cell.is_mine {
                            Span::styled(" \u{263c}", Style::default().fg(mine_fg).bg(mine_bg))
                        } else if cell.adjacent_mines > 0 {
                            let n = (cell.adjacent_mines as usize - 1).min(7);
                            Span::styled(
                                format!(" {}", cell.adjacent_mines),
                                Style::default()
                                    .fg(num_colors[n])
                                    .bg(opened_bg)
                                    .add_modifier(Modifier::BOLD),
                            )
                        } else {
                            Span::styled("  ", Style::default().bg(opened_bg))
                        }
                    } else if cell.is_flagged {
                        Span::styled(" \u{2691}", Style::default().fg(flag_fg).bg(up_bg))
                    } else {
                        let bg = match resolver.visual_state(x, y, pointer, &field) {
                            ButtonState::Up => up_bg,
                            ButtonState::Hover => hover_bg,
                            ButtonState::Down => down_bg,
                        };
                        Span::styled("  ", Style::default().bg(bg))
                    };
                    spans.push(span);
                }
                lines.push(Spans::from(spans));
            }
            let board = Paragraph::new(Text::from(lines))
                .block(Block::default().borders(Borders::ALL))
                .alignment(Alignment::Left);
            f.render_widget(board, board_area);

            // status row
            let message = match outcome {
                Some(true) => "   Field cleared!  N: play again",
                Some(false) => "   BOOM!  N: try again",
                None => "",
            };
            let status = Paragraph::new(Spans::from(vec![
                Span::raw(format!(" Mines: {}", field.remaining_mines())),
                Span::styled(
                    message,
                    Style::default().fg(menu_key_fg).add_modifier(Modifier::BOLD),
                ),
            ]))
            .block(Block::default().borders(Borders::ALL))
            .alignment(Alignment::Left);
            f.render_widget(status, chunks[2]);
        })?;

        // The board may have moved (resize); keep hit-testing in line with
        // what was just drawn.
        resolver.set_layout(GridLayout {
            origin: board_origin,
            cell_cols: CELL_COLS,
            cell_rows: CELL_ROWS,
            width,
            height,
        });

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => match key.code {
                    KeyCode::Esc | KeyCode::Char('q') => break,
                    KeyCode::Char('n') | KeyCode::F(2) => {
                        field = Minefield::new(width, height, mines)?;
                        resolver.reset();
                        outcome = None;
                    }
                    _ => {}
                },
                Event::Mouse(me) => {
                    pointer = (me.column, me.row);
                    // Board input is dead after game over until a new game
                    if outcome.is_none() {
                        match me.kind {
                            MouseEventKind::Down(MouseButton::Left) => {
                                resolver.press(me.column, me.row, &field);
                            }
                            MouseEventKind::Up(MouseButton::Left) => {
                                match resolver.release(me.column, me.row, &mut field) {
                                    Reveal::Exploded => {
                                        field.reveal_all_mines();
                                        outcome = Some(false);
                                    }
                                    Reveal::Opened => {
                                        if field.is_cleared() {
                                            outcome = Some(true);
                                        }
                                    }
                                    Reveal::Ignored => {}
                                }
                            }
                            MouseEventKind::Down(MouseButton::Right) => {
                                resolver.flag(me.column, me.row, &mut field);
                            }
                            _ => {}
                        }
                    }
                }
                _ => {}
            }
        }
        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }
    }

    Ok(())
}

fn center_rect(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}
