use crate::models::Focus;
use crate::session::App;
use crate::utils::truncate_to_width;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

pub fn draw_categories(f: &mut Frame, area: Rect, app: &App) {
    let focused = app.focus == Focus::Categories;
    let name_width = (area.width as usize).saturating_sub(6);

    let items: Vec<ListItem> = if app.state.categories.is_empty() {
        vec![ListItem::new("No categories").style(
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )]
    } else {
        app.state
            .categories
            .iter()
            .map(|name| {
                let active = app.state.selected_category.as_deref() == Some(name.as_str());
                let marker = if active { "● " } else { "  " };
                let style = if active {
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                ListItem::new(format!("{marker}{}", truncate_to_width(name, name_width)))
                    .style(style)
            })
            .collect()
    };

    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let highlight = if focused {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::REVERSED)
    } else {
        Style::default().add_modifier(Modifier::DIM)
    };

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("[1] Categories")
                .border_style(border_style),
        )
        .highlight_style(highlight);

    let selected = (!app.state.categories.is_empty()).then_some(app.category_cursor);
    let mut state = ListState::default().with_selected(selected);
    f.render_stateful_widget(list, area, &mut state);
}
