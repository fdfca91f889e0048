use crate::models::{Focus, TestItem};
use crate::session::App;
use crate::utils::cursor_column;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Lines taken by one question row: question, input, result, spacer.
pub const ROW_HEIGHT: usize = 4;
const ANSWER_PREFIX: &str = "   Answer: ";

/// First visible line so that the selected row fits in `visible` lines.
pub fn scroll_for_row(row: usize, visible: usize) -> usize {
    let bottom = (row + 1) * ROW_HEIGHT;
    bottom.saturating_sub(visible.max(ROW_HEIGHT))
}

fn row_style(item: &TestItem) -> Style {
    match item.result {
        Some(true) => Style::default().fg(Color::Green),
        Some(false) => Style::default().fg(Color::Red),
        None => Style::default(),
    }
}

fn row_lines(index: usize, item: &TestItem, selected: bool) -> Vec<Line<'static>> {
    let marker = if selected { "> " } else { "  " };
    let mut question_style = row_style(item).add_modifier(Modifier::BOLD);
    if selected {
        question_style = question_style.fg(Color::Yellow);
    }

    let question = Line::from(Span::styled(
        format!("{marker}Q{}: {}", index + 1, item.question),
        question_style,
    ));

    let input = Line::from(vec![
        Span::from(ANSWER_PREFIX),
        Span::styled(
            item.user_answer.clone(),
            Style::default().add_modifier(Modifier::UNDERLINED),
        ),
        Span::from("  "),
        Span::styled(
            "[Check]",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
    ]);

    let result = if item.checking {
        Line::from(Span::styled(
            "   Checking...",
            Style::default().fg(Color::Yellow),
        ))
    } else {
        match item.result_message() {
            Some(message) => Line::from(Span::styled(
                format!("   {message}"),
                row_style(item).add_modifier(Modifier::BOLD),
            )),
            None => Line::from(""),
        }
    };

    vec![question, input, result, Line::from("")]
}

pub fn draw_test(f: &mut Frame, area: Rect, app: &App) {
    let focused = app.focus == Focus::Content;
    let items = &app.state.test_items;

    let title = format!(
        "Test: {} ({} questions)",
        app.state.selected_category.as_deref().unwrap_or_default(),
        items.len()
    );

    let mut text = Text::default();
    if items.is_empty() {
        text.push_line(Line::from(Span::styled(
            "No questions.",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )));
    }
    for (i, item) in items.iter().enumerate() {
        for line in row_lines(i, item, focused && i == app.selected_row) {
            text.push_line(line);
        }
    }

    let visible = area.height.saturating_sub(2) as usize;
    let scroll = scroll_for_row(app.selected_row, visible);

    let form = Paragraph::new(text)
        .scroll((scroll as u16, 0))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(if focused {
                    Style::default().fg(Color::Cyan)
                } else {
                    Style::default()
                }),
        );
    f.render_widget(form, area);

    if focused && let Some(item) = items.get(app.selected_row) {
        let line = app.selected_row * ROW_HEIGHT + 1 - scroll;
        let column = ANSWER_PREFIX.len() + cursor_column(&item.user_answer, app.answer_cursor);
        if line < visible && column + 2 < area.width as usize {
            f.set_cursor_position((area.x + 1 + column as u16, area.y + 1 + line as u16));
        }
    }
}
