use crate::models::{ContentView, ErrorBanner, Focus};
use crate::session::App;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

fn key_span(key: &'static str) -> Span<'static> {
    Span::styled(
        key,
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )
}

/// Key hints for whatever currently has focus.
pub fn help_spans(app: &App) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let mut hint = |key: &'static str, label: &'static str| {
        spans.push(key_span(key));
        spans.push(Span::from(label));
    };

    match (app.focus, &app.content) {
        (Focus::Categories, _) => {
            hint("↑/↓", " Navigate  ");
            hint("Enter", " Select  ");
            hint("m", " Mode  ");
        }
        (Focus::TestConfig, _) => {
            hint("0-9", " Count  ");
            hint("Enter", " Load test  ");
            hint("Esc", " Back  ");
        }
        (Focus::Content, ContentView::Flashcard) => {
            hint("←/→", " Prev/Next  ");
            hint("Space", " Reveal  ");
            hint("s", " Shuffle  ");
            hint("m", " Mode  ");
        }
        (Focus::Content, ContentView::Test) => {
            hint("↑/↓", " Row  ");
            hint("Enter", " Check  ");
            hint("PgDn", " Next batch  ");
            hint("Esc", " Back  ");
        }
        (Focus::Content, ContentView::Placeholder(_)) => {
            hint("m", " Mode  ");
        }
    }
    hint("Tab", " Focus  ");
    if app.editing_text() {
        hint("Ctrl+C", " Quit");
    } else {
        hint("q", " Quit");
    }
    spans
}

pub fn draw_help(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(10), Constraint::Length(14)])
        .split(area);

    let help = Paragraph::new(Line::from(help_spans(app)))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[0]);

    let activity = if app.in_flight > 0 {
        Span::styled("Loading...", Style::default().fg(Color::Yellow))
    } else {
        Span::styled("Ready", Style::default().fg(Color::Green))
    };
    let status = Paragraph::new(Line::from(activity))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(status, chunks[1]);
}

pub fn draw_error_banner(f: &mut Frame, area: Rect, banner: &ErrorBanner) {
    let text = format!("{} failed: {}", banner.operation, banner.message);
    let paragraph = Paragraph::new(text)
        .style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Error")
                .border_style(Style::default().fg(Color::Red)),
        );
    f.render_widget(paragraph, area);
}

pub fn draw_placeholder(f: &mut Frame, area: Rect, message: &str, focused: bool) {
    let paragraph = Paragraph::new(message.to_string())
        .style(
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).border_style(if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        }));
    f.render_widget(paragraph, area);
}
