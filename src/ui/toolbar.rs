use crate::models::{Focus, Mode};
use crate::session::App;
use crate::ui::layout::split_toolbar;
use crate::utils::cursor_column;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const COUNT_LABEL: &str = "Questions per test: ";

fn mode_span(mode: Mode, current: Mode) -> Span<'static> {
    let label = format!(" {} ", mode.label());
    if mode == current {
        Span::styled(
            label,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED),
        )
    } else {
        Span::styled(label, Style::default().fg(Color::DarkGray))
    }
}

pub fn draw_toolbar(f: &mut Frame, area: Rect, app: &App) {
    let (mode_area, config_area) = split_toolbar(area);

    let mode = Paragraph::new(Line::from(vec![
        mode_span(Mode::Flashcards, app.state.mode),
        Span::from(" "),
        mode_span(Mode::Test, app.state.mode),
    ]))
    .block(Block::default().borders(Borders::ALL).title("Mode (m)"));
    f.render_widget(mode, mode_area);

    if !app.test_config_visible() {
        return;
    }

    let focused = app.focus == Focus::TestConfig;
    let count = if app.test_size_input.is_empty() {
        Span::styled(
            app.settings.default_test_size.to_string(),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )
    } else {
        Span::styled(
            app.test_size_input.clone(),
            Style::default().add_modifier(Modifier::UNDERLINED),
        )
    };

    let config = Paragraph::new(Line::from(vec![
        Span::from(COUNT_LABEL),
        count,
        Span::from("   "),
        Span::styled(
            "Enter",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::from(" Load test"),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title("[2] Test")
            .border_style(if focused {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default().fg(Color::DarkGray)
            }),
    );
    f.render_widget(config, config_area);

    if focused {
        let column = COUNT_LABEL.len() + cursor_column(&app.test_size_input, usize::MAX);
        f.set_cursor_position((config_area.x + 1 + column as u16, config_area.y + 1));
    }
}
