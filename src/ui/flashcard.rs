use crate::models::{CardView, Focus};
use crate::session::App;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

fn control_style(enabled: bool) -> Style {
    if enabled {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

pub fn draw_flashcard(f: &mut Frame, area: Rect, app: &App) {
    let Some(card) = app.card.as_ref() else {
        return;
    };

    let title = format!(
        "Flashcards: {}",
        app.state.selected_category.as_deref().unwrap_or_default()
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(if app.focus == Focus::Content {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        });
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Min(2),
            Constraint::Length(5),
            Constraint::Length(1),
        ])
        .split(inner);

    let question = Paragraph::new(card.header())
        .style(Style::default().add_modifier(Modifier::BOLD))
        .wrap(Wrap { trim: true });
    f.render_widget(question, chunks[0]);

    draw_face(f, chunks[1], card);

    let controls = Paragraph::new(Line::from(vec![
        Span::styled("← Prev", control_style(!card.is_first())),
        Span::from("    "),
        Span::styled("Next →", control_style(!card.is_last())),
        Span::from("    "),
        Span::styled("s", control_style(true)),
        Span::from(" Shuffle"),
    ]));
    f.render_widget(controls, chunks[2]);
}

fn draw_face(f: &mut Frame, area: Rect, card: &CardView) {
    let style = if card.revealed {
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC)
    };

    let face = Paragraph::new(card.face())
        .style(style)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Space"));
    f.render_widget(face, area);
}
