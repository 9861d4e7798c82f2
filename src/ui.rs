//! Terminal UI rendering with ratatui

use crate::settings::VisualSettings;
use blockfall::board::{BOARD_HEIGHT, BOARD_WIDTH, Cell};
use blockfall::game::{GamePhase, GameState};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

const EMPTY: &str = "  ";

/// Total width needed: board(22) + side panel(20)
const GAME_WIDTH: u16 = 42;
/// Total height needed: board(20) + 2 for borders
const GAME_HEIGHT: u16 = BOARD_HEIGHT as u16 + 2;

/// Render the game screen
pub fn render_game(frame: &mut Frame, state: &GameState, visual: &VisualSettings) {
    let area = frame.area();
    let game_area = center_rect(area, GAME_WIDTH, GAME_HEIGHT);

    // board | next + stats + controls
    let main_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(BOARD_WIDTH as u16 * 2 + 2),
            Constraint::Length(20),
        ])
        .split(game_area);

    render_board(frame, main_layout[0], state, visual);

    let right_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // 4x4 preview + borders
            Constraint::Length(10),
            Constraint::Min(4),
        ])
        .split(main_layout[1]);

    render_next(frame, right_layout[0], state, visual);
    render_stats(frame, right_layout[1], state);
    render_controls(frame, right_layout[2]);

    match state.phase() {
        GamePhase::Paused => render_overlay(frame, area, "PAUSED", "Press P to resume"),
        GamePhase::GameOver => {
            let stats = state.stats();
            let subtitle = format!("Score {} | Lines {}", stats.score, stats.lines);
            render_overlay(frame, area, "GAME OVER", &subtitle);
        }
        GamePhase::Running => {}
    }
}

fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

fn render_board(frame: &mut Frame, area: Rect, state: &GameState, visual: &VisualSettings) {
    let (block_char, ghost_char) = visual.block_chars();

    let block = Block::default()
        .title(" BLOCKFALL ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let painted = state.painted_board(visual.show_ghost);
    let lines: Vec<Line> = painted
        .rows()
        .map(|row| {
            let spans: Vec<Span> = row
                .iter()
                .map(|cell| match *cell {
                    Cell::Filled(color) => Span::styled(block_char, Style::default().fg(color)),
                    Cell::Ghost(color) => Span::styled(ghost_char, Style::default().fg(color).dim()),
                    Cell::Empty => Span::raw(EMPTY),
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_next(frame: &mut Frame, area: Rect, state: &GameState, visual: &VisualSettings) {
    let (block_char, _) = visual.block_chars();

    let block = Block::default()
        .title(" NEXT ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines: Vec<Line> = state
        .next_preview()
        .iter()
        .map(|row| {
            let spans: Vec<Span> = row
                .iter()
                .map(|cell| match cell {
                    Some(color) => Span::styled(block_char, Style::default().fg(*color)),
                    None => Span::raw(EMPTY),
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

fn render_stats(frame: &mut Frame, area: Rect, state: &GameState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let stats = state.stats();
    let phase_color = match state.phase() {
        GamePhase::Running => Color::Green,
        GamePhase::Paused => Color::Yellow,
        GamePhase::GameOver => Color::Red,
    };

    let lines = vec![
        Line::from(Span::styled("SCORE", Style::default().fg(Color::Gray))),
        Line::from(Span::styled(
            format!("{}", stats.score),
            Style::default().fg(Color::Yellow).bold(),
        )),
        Line::from(Span::styled("LINES", Style::default().fg(Color::Gray))),
        Line::from(Span::styled(
            format!("{}", stats.lines),
            Style::default().fg(Color::Green),
        )),
        // Levels are shown counting from 1
        Line::from(Span::styled("LEVEL", Style::default().fg(Color::Gray))),
        Line::from(Span::styled(
            format!("{}", stats.level + 1),
            Style::default().fg(Color::Cyan),
        )),
        Line::raw(""),
        Line::styled(state.phase().name(), Style::default().fg(phase_color).bold()),
    ];

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let hint = Style::default().fg(Color::DarkGray);
    let lines = vec![
        Line::styled(" ← →  move", hint),
        Line::styled(" ↓    soft drop", hint),
        Line::styled(" ↑    rotate", hint),
        Line::styled(" SPC  hard drop", hint),
        Line::styled(" P/R  pause/reset", hint),
        Line::styled(" Q    quit", hint),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_overlay(frame: &mut Frame, area: Rect, title: &str, subtitle: &str) {
    let popup_width = 28u16;
    let popup_height = 6u16;
    let popup_area = center_rect(area, popup_width, popup_height);

    // Clear the background
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .style(Style::default().bg(Color::Black));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let text = vec![
        Line::styled(title, Style::default().fg(Color::Yellow).bold()),
        Line::raw(""),
        Line::styled(subtitle, Style::default().fg(Color::Gray)),
        Line::styled("Press R to restart", Style::default().fg(Color::DarkGray)),
    ];

    let paragraph = Paragraph::new(text).alignment(Alignment::Center);
    frame.render_widget(paragraph, inner);
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockfall::randomizer::ScriptedSource;
    use blockfall::tetromino::TetrominoType;
    use ratatui::{Terminal, backend::TestBackend};

    fn screen_text(state: &GameState) -> String {
        let backend = TestBackend::new(60, 26);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render_game(frame, state, &VisualSettings::default()))
            .unwrap();
        let buffer = terminal.backend().buffer();
        buffer.content().iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn test_renders_running_game() {
        let mut source = ScriptedSource::new([TetrominoType::T, TetrominoType::I]);
        let state = GameState::new(&mut source);
        let text = screen_text(&state);
        assert!(text.contains("BLOCKFALL"));
        assert!(text.contains("NEXT"));
        assert!(text.contains("Running"));
        assert!(!text.contains("PAUSED"));
    }

    #[test]
    fn test_renders_pause_overlay() {
        let mut source = ScriptedSource::new([TetrominoType::T]);
        let state = GameState::new(&mut source).toggle_pause().state;
        assert!(screen_text(&state).contains("PAUSED"));
    }
}
