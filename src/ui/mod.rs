pub mod layout;
mod categories;
mod flashcard;
mod status;
mod test_form;
mod toolbar;

pub use categories::draw_categories;
pub use flashcard::draw_flashcard;
pub use layout::{calculate_app_chunks, AppLayout};
pub use status::{draw_error_banner, draw_help, draw_placeholder, help_spans};
pub use test_form::draw_test;
pub use toolbar::draw_toolbar;

use crate::models::{ContentView, Focus};
use crate::session::App;
use ratatui::Frame;

/// Redraw the whole screen from `app`.
pub fn draw(f: &mut Frame, app: &App) {
    let layout = calculate_app_chunks(f.area(), app.error.is_some());

    draw_toolbar(f, layout.toolbar, app);
    draw_categories(f, layout.categories, app);
    if let (Some(area), Some(banner)) = (layout.banner, app.error.as_ref()) {
        draw_error_banner(f, area, banner);
    }

    match &app.content {
        ContentView::Placeholder(message) => {
            draw_placeholder(f, layout.content, message, app.focus == Focus::Content)
        }
        ContentView::Flashcard => draw_flashcard(f, layout.content, app),
        ContentView::Test => draw_test(f, layout.content, app),
    }

    draw_help(f, layout.help, app);
}
