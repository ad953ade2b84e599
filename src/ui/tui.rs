//! Terminal scoreboard window.
//!
//! Full-screen ratatui view: score header, rink canvas with the monitored
//! team's shots (x) and goals (sweater numbers), and the announcement log.
//! `q` or Esc quits the program.

use std::io;
use std::time::Duration;

use crossterm::event::{Event, KeyCode};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::canvas::{Canvas, Points};
use ratatui::widgets::{Block, List, ListItem, Paragraph};
use ratatui::{Frame, Terminal};

use crate::ui::{GameView, SharedGameView};

/// Initialize the terminal for TUI mode.
pub fn init_terminal() -> io::Result<Terminal<ratatui::backend::CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

/// Restore the terminal to normal mode.
pub fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}

/// Run the scoreboard until the user quits.
pub async fn run_scoreboard(view: SharedGameView) -> io::Result<()> {
    let mut terminal = init_terminal()?;

    loop {
        let snapshot = view.snapshot().await;
        terminal.draw(|frame| render(frame, &snapshot))?;

        if crossterm::event::poll(Duration::from_millis(250))? {
            if let Event::Key(key) = crossterm::event::read()? {
                if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) {
                    break;
                }
            }
        }
    }

    restore_terminal()
}

fn render(frame: &mut Frame, view: &GameView) {
    let chunks = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(12),
        Constraint::Length(8),
    ])
    .split(frame.area());

    let header = if view.opponent_abbrev.is_empty() {
        "Waiting for a game".to_string()
    } else {
        format!(
            "{} {}  :  {} {}   ({})",
            view.monitored_abbrev,
            view.monitored_score,
            view.opponent_abbrev,
            view.opponent_score,
            view.game_state
        )
    };
    frame.render_widget(
        Paragraph::new(header)
            .centered()
            .block(Block::bordered().title("goalhorn — q to quit")),
        chunks[0],
    );

    let shot_points: Vec<(f64, f64)> = view.shots.iter().map(|s| (s.x, s.y)).collect();
    let goals = view.goals.clone();
    let canvas = Canvas::default()
        .block(Block::bordered().title("Shots on goal"))
        .x_bounds([-100.0, 100.0])
        .y_bounds([-43.0, 43.0])
        .paint(move |ctx| {
            ctx.draw(&Points {
                coords: &shot_points,
                color: Color::Cyan,
            });
            for goal in &goals {
                let label = goal
                    .sweater
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| "G".to_string());
                ctx.print(
                    goal.x,
                    goal.y,
                    Line::styled(label, Style::default().fg(Color::Yellow)),
                );
            }
        });
    frame.render_widget(canvas, chunks[1]);

    let items: Vec<ListItem> = view
        .log
        .iter()
        .rev()
        .map(|line| ListItem::new(line.clone()))
        .collect();
    frame.render_widget(
        List::new(items).block(Block::bordered().title("Events")),
        chunks[2],
    );
}
