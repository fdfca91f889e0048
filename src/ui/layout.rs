use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub struct AppLayout {
    pub toolbar: Rect,
    pub categories: Rect,
    /// Present only while an error is being shown.
    pub banner: Option<Rect>,
    pub content: Rect,
    pub help: Rect,
}

pub fn calculate_app_chunks(area: Rect, show_banner: bool) -> AppLayout {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(area);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(rows[1]);

    let (banner, content) = if show_banner {
        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(3)])
            .split(body[1]);
        (Some(right[0]), right[1])
    } else {
        (None, body[1])
    };

    AppLayout {
        toolbar: rows[0],
        categories: body[0],
        banner,
        content,
        help: rows[2],
    }
}

/// Split the toolbar into the mode selector and the test configuration.
pub fn split_toolbar(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(28), Constraint::Min(10)])
        .split(area);
    (chunks[0], chunks[1])
}
