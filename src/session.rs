use crate::api::{CheckRequest, QuestionQuery};
use crate::error::ApiError;
use crate::models::{
    ApiRequest, ApiResponse, CardView, ContentView, ErrorBanner, Focus, Mode, QaItem,
    SessionState, TestItem, Ticket,
};
use crate::utils::byte_index;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use rand::seq::SliceRandom;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

pub const SELECT_CATEGORY: &str = "Please select a category.";
pub const CONFIGURE_TEST: &str = "Configure and load a test.";
pub const NO_CARDS: &str = "No cards.";
pub const LOADING_CARDS: &str = "Loading cards...";
pub const LOADING_TEST: &str = "Loading test...";
pub const CARDS_FAILED: &str = "Could not load cards.";
pub const TEST_FAILED: &str = "Could not load test.";

pub const DEFAULT_FLASHCARD_LIMIT: usize = 1000;
pub const DEFAULT_TEST_SIZE: usize = 5;
const MAX_TEST_SIZE_DIGITS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppSettings {
    pub flashcard_limit: usize,
    pub default_test_size: usize,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            flashcard_limit: DEFAULT_FLASHCARD_LIMIT,
            default_test_size: DEFAULT_TEST_SIZE,
        }
    }
}

/// Owns the session state and every view-level detail around it. All
/// mutation goes through these methods; network work leaves as
/// [`ApiRequest`]s and comes back through [`App::apply_response`].
#[derive(Debug)]
pub struct App {
    pub state: SessionState,
    pub settings: AppSettings,
    pub focus: Focus,
    pub content: ContentView,
    pub card: Option<CardView>,
    pub category_cursor: usize,
    pub test_size_input: String,
    pub selected_row: usize,
    /// Char offset into the selected row's answer.
    pub answer_cursor: usize,
    pub error: Option<ErrorBanner>,
    pub in_flight: usize,
    pub should_quit: bool,
    epoch: u64,
    test_generation: u64,
    /// Position of the first loaded test item in the category.
    test_offset: usize,
    flashcards_requested: Option<u64>,
    api_tx: UnboundedSender<ApiRequest>,
}

impl App {
    pub fn new(settings: AppSettings, api_tx: UnboundedSender<ApiRequest>) -> Self {
        Self {
            state: SessionState::default(),
            settings,
            focus: Focus::Categories,
            content: ContentView::Placeholder(SELECT_CATEGORY.to_string()),
            card: None,
            category_cursor: 0,
            test_size_input: String::new(),
            selected_row: 0,
            answer_cursor: 0,
            error: None,
            in_flight: 0,
            should_quit: false,
            epoch: 0,
            test_generation: 0,
            test_offset: 0,
            flashcards_requested: None,
            api_tx,
        }
    }

    pub fn ticket(&self) -> Ticket {
        Ticket {
            epoch: self.epoch,
            test_generation: self.test_generation,
        }
    }

    fn send(&mut self, request: ApiRequest) {
        debug!(?request, "issuing request");
        self.error = None;
        match self.api_tx.send(request) {
            Ok(()) => self.in_flight += 1,
            Err(_) => self.report("Request", "API worker is not running".to_string()),
        }
    }

    fn report(&mut self, operation: &'static str, message: String) {
        warn!("{operation} failed: {message}");
        self.error = Some(ErrorBanner { operation, message });
    }

    fn report_api(&mut self, operation: &'static str, error: &ApiError) {
        let message = match error.status() {
            Some(404) => format!("{error} (not found on the server)"),
            Some(status) if status >= 500 => format!("{error} (server error)"),
            _ => error.to_string(),
        };
        self.report(operation, message);
    }

    pub fn load_categories(&mut self) {
        self.send(ApiRequest::Categories);
    }

    pub fn move_category_cursor(&mut self, delta: isize) {
        let last = self.state.categories.len().saturating_sub(1);
        self.category_cursor = self.category_cursor.saturating_add_signed(delta).min(last);
    }

    pub fn select_category_under_cursor(&mut self) {
        if let Some(name) = self.state.categories.get(self.category_cursor).cloned() {
            self.select_category(&name);
        }
    }

    /// Reset everything tied to the old category, then load the current mode.
    pub fn select_category(&mut self, name: &str) {
        info!(category = name, "category selected");
        self.state.select_category(name);
        self.epoch += 1;
        self.test_generation += 1;
        self.flashcards_requested = None;
        self.card = None;
        self.selected_row = 0;
        self.answer_cursor = 0;
        if let Some(pos) = self.state.categories.iter().position(|c| c == name) {
            self.category_cursor = pos;
        }
        self.load_mode();
    }

    pub fn set_mode(&mut self, mode: Mode) {
        info!(mode = mode.as_str(), "mode changed");
        self.state.mode = mode;
        if mode == Mode::Flashcards && self.focus == Focus::TestConfig {
            self.focus = Focus::Categories;
        }
        self.load_mode();
    }

    pub fn toggle_mode(&mut self) {
        self.set_mode(self.state.mode.toggled());
    }

    /// The test configuration controls are only shown in test mode.
    pub fn test_config_visible(&self) -> bool {
        self.state.mode == Mode::Test
    }

    pub fn load_mode(&mut self) {
        let Some(category) = self.state.selected_category.clone() else {
            self.content = ContentView::Placeholder(SELECT_CATEGORY.to_string());
            return;
        };

        match self.state.mode {
            Mode::Flashcards => {
                if !self.state.flashcards.is_empty() {
                    self.render_flashcard();
                    return;
                }
                self.content = ContentView::Placeholder(LOADING_CARDS.to_string());
                if self.flashcards_requested == Some(self.epoch) {
                    return;
                }
                self.flashcards_requested = Some(self.epoch);
                let query =
                    QuestionQuery::new(&category, Mode::Flashcards, self.settings.flashcard_limit);
                self.send(ApiRequest::Flashcards {
                    ticket: self.ticket(),
                    query,
                });
            }
            Mode::Test => {
                self.content = ContentView::Placeholder(CONFIGURE_TEST.to_string());
            }
        }
    }

    pub fn render_flashcard(&mut self) {
        match self.state.current_card() {
            Some(item) => {
                self.card = Some(CardView::new(
                    self.state.flash_index,
                    self.state.flashcards.len(),
                    item,
                ));
                self.content = ContentView::Flashcard;
            }
            None => {
                self.card = None;
                self.content = ContentView::Placeholder(NO_CARDS.to_string());
            }
        }
    }

    pub fn next_card(&mut self) {
        if self.state.next_card() {
            self.render_flashcard();
        }
    }

    pub fn prev_card(&mut self) {
        if self.state.prev_card() {
            self.render_flashcard();
        }
    }

    pub fn toggle_reveal(&mut self) {
        if let Some(card) = self.card.as_mut() {
            card.toggle();
        }
    }

    pub fn shuffle_cards(&mut self) {
        if self.state.flashcards.is_empty() {
            return;
        }
        self.state.flashcards.shuffle(&mut rand::thread_rng());
        self.state.flash_index = 0;
        self.render_flashcard();
    }

    /// Question count from the configuration input, falling back to the
    /// default when it is blank or not a number. Zero asks for every item.
    pub fn test_size(&self) -> usize {
        self.test_size_input
            .trim()
            .parse::<usize>()
            .unwrap_or(self.settings.default_test_size)
    }

    pub fn test_offset(&self) -> usize {
        self.test_offset
    }

    pub fn load_test(&mut self) {
        self.request_test(0);
    }

    /// Replace the test with the items following the current batch.
    pub fn load_next_test_batch(&mut self) {
        if self.state.test_items.is_empty() {
            return;
        }
        self.request_test(self.test_offset + self.state.test_items.len());
    }

    fn request_test(&mut self, offset: usize) {
        let Some(category) = self.state.selected_category.clone() else {
            self.content = ContentView::Placeholder(SELECT_CATEGORY.to_string());
            return;
        };

        self.test_generation += 1;
        self.test_offset = offset;
        let mut query = QuestionQuery::new(&category, Mode::Test, self.test_size());
        if offset > 0 {
            query = query.with_offset(offset);
        }
        self.content = ContentView::Placeholder(LOADING_TEST.to_string());
        self.send(ApiRequest::Test {
            ticket: self.ticket(),
            query,
        });
    }

    pub fn render_test(&mut self) {
        self.selected_row = self
            .selected_row
            .min(self.state.test_items.len().saturating_sub(1));
        self.answer_cursor = self.selected_answer().chars().count();
        self.content = ContentView::Test;
    }

    fn selected_answer(&self) -> &str {
        self.state
            .test_items
            .get(self.selected_row)
            .map(|item| item.user_answer.as_str())
            .unwrap_or_default()
    }

    pub fn select_row(&mut self, delta: isize) {
        let last = self.state.test_items.len().saturating_sub(1);
        self.selected_row = self.selected_row.saturating_add_signed(delta).min(last);
        self.answer_cursor = self.selected_answer().chars().count();
    }

    pub fn insert_char(&mut self, c: char) {
        let cursor = self.answer_cursor;
        if let Some(item) = self.state.test_items.get_mut(self.selected_row) {
            let at = byte_index(&item.user_answer, cursor);
            item.user_answer.insert(at, c);
            self.answer_cursor += 1;
        }
    }

    pub fn backspace(&mut self) {
        if self.answer_cursor == 0 {
            return;
        }
        let cursor = self.answer_cursor;
        if let Some(item) = self.state.test_items.get_mut(self.selected_row) {
            let at = byte_index(&item.user_answer, cursor - 1);
            item.user_answer.remove(at);
            self.answer_cursor -= 1;
        }
    }

    pub fn delete(&mut self) {
        let cursor = self.answer_cursor;
        if let Some(item) = self.state.test_items.get_mut(self.selected_row)
            && cursor < item.user_answer.chars().count()
        {
            let at = byte_index(&item.user_answer, cursor);
            item.user_answer.remove(at);
        }
    }

    pub fn move_answer_cursor(&mut self, delta: isize) {
        let len = self.selected_answer().chars().count();
        self.answer_cursor = self.answer_cursor.saturating_add_signed(delta).min(len);
    }

    /// Send one row's answer for grading. Other rows are never touched.
    pub fn check_row(&mut self, row: usize) {
        let Some(category) = self.state.selected_category.clone() else {
            return;
        };
        let Some(item) = self.state.test_items.get_mut(row) else {
            return;
        };
        item.checking = true;
        let body = CheckRequest {
            category,
            question: item.question.clone(),
            answer: item.user_answer.clone(),
        };
        self.send(ApiRequest::Check {
            ticket: self.ticket(),
            row,
            body,
        });
    }

    pub fn apply_response(&mut self, response: ApiResponse) {
        self.in_flight = self.in_flight.saturating_sub(1);
        match response {
            ApiResponse::Categories(Ok(categories)) => {
                info!(count = categories.len(), "categories loaded");
                self.state.categories = categories;
                self.move_category_cursor(0);
            }
            ApiResponse::Categories(Err(e)) => self.report_api("Loading categories", &e),
            ApiResponse::Flashcards { ticket, result } => {
                if ticket.epoch != self.epoch {
                    debug!(?ticket, "discarding stale flashcards");
                    return;
                }
                self.flashcards_requested = None;
                match result {
                    Ok(items) => self.apply_flashcards(items),
                    Err(e) => {
                        self.report_api("Loading cards", &e);
                        if self.state.mode == Mode::Flashcards {
                            self.content = ContentView::Placeholder(CARDS_FAILED.to_string());
                        }
                    }
                }
            }
            ApiResponse::Test { ticket, result } => {
                if ticket != self.ticket() {
                    debug!(?ticket, "discarding stale test");
                    return;
                }
                match result {
                    Ok(items) => {
                        info!(count = items.len(), "test loaded");
                        self.state.test_items = items.into_iter().map(TestItem::from).collect();
                        self.selected_row = 0;
                        if self.state.mode == Mode::Test {
                            self.render_test();
                        }
                    }
                    Err(e) => {
                        self.report_api("Loading test", &e);
                        if self.state.mode == Mode::Test {
                            self.content = ContentView::Placeholder(TEST_FAILED.to_string());
                        }
                    }
                }
            }
            ApiResponse::Check {
                ticket,
                row,
                result,
            } => {
                if ticket != self.ticket() {
                    debug!(?ticket, row, "discarding stale check");
                    return;
                }
                let Some(item) = self.state.test_items.get_mut(row) else {
                    return;
                };
                item.checking = false;
                match result {
                    Ok(graded) => {
                        item.result = Some(graded.correct);
                        item.expected = Some(graded.expected);
                    }
                    Err(e) => self.report_api("Checking answer", &e),
                }
            }
        }
    }

    fn apply_flashcards(&mut self, items: Vec<QaItem>) {
        info!(count = items.len(), "flashcards loaded");
        self.state.flashcards = items;
        self.state.flash_index = 0;
        if self.state.mode == Mode::Flashcards {
            self.render_flashcard();
        }
    }

    fn focus_order(&self) -> Vec<Focus> {
        if self.test_config_visible() {
            vec![Focus::Categories, Focus::TestConfig, Focus::Content]
        } else {
            vec![Focus::Categories, Focus::Content]
        }
    }

    pub fn cycle_focus(&mut self, forward: bool) {
        let order = self.focus_order();
        let pos = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        let next = if forward {
            (pos + 1) % order.len()
        } else {
            (pos + order.len() - 1) % order.len()
        };
        self.focus = order[next];
    }

    /// Whether printable keys go into a text field rather than commands.
    pub fn editing_text(&self) -> bool {
        match self.focus {
            Focus::TestConfig => true,
            Focus::Content => self.content == ContentView::Test,
            Focus::Categories => false,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        match key.code {
            KeyCode::Tab => return self.cycle_focus(true),
            KeyCode::BackTab => return self.cycle_focus(false),
            KeyCode::Esc if self.editing_text() => {
                self.focus = Focus::Categories;
                return;
            }
            KeyCode::Esc => {
                self.should_quit = true;
                return;
            }
            _ => {}
        }

        match self.focus {
            Focus::Categories => self.handle_categories_key(key),
            Focus::TestConfig => self.handle_test_config_key(key),
            Focus::Content => match self.content {
                ContentView::Flashcard => self.handle_flashcard_key(key),
                ContentView::Test => self.handle_test_key(key),
                ContentView::Placeholder(_) => self.handle_command_key(key),
            },
        }
    }

    fn handle_command_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('m') => self.toggle_mode(),
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('1') => self.focus = Focus::Categories,
            KeyCode::Char('2') if self.test_config_visible() => self.focus = Focus::TestConfig,
            _ => {}
        }
    }

    fn handle_categories_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.move_category_cursor(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_category_cursor(1),
            KeyCode::Enter => self.select_category_under_cursor(),
            _ => self.handle_command_key(key),
        }
    }

    fn handle_test_config_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(c)
                if c.is_ascii_digit() && self.test_size_input.len() < MAX_TEST_SIZE_DIGITS =>
            {
                self.test_size_input.push(c);
            }
            KeyCode::Backspace => {
                self.test_size_input.pop();
            }
            KeyCode::Enter => {
                self.load_test();
                self.focus = Focus::Content;
            }
            _ => {}
        }
    }

    fn handle_flashcard_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Left | KeyCode::Char('p') => self.prev_card(),
            KeyCode::Right | KeyCode::Char('n') => self.next_card(),
            KeyCode::Enter | KeyCode::Char(' ') => self.toggle_reveal(),
            KeyCode::Char('s') => self.shuffle_cards(),
            _ => self.handle_command_key(key),
        }
    }

    fn handle_test_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up => self.select_row(-1),
            KeyCode::Down => self.select_row(1),
            KeyCode::Enter => self.check_row(self.selected_row),
            KeyCode::Left => self.move_answer_cursor(-1),
            KeyCode::Right => self.move_answer_cursor(1),
            KeyCode::Home => self.answer_cursor = 0,
            KeyCode::End => self.answer_cursor = self.selected_answer().chars().count(),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            KeyCode::PageDown => self.load_next_test_batch(),
            KeyCode::Char(c) => self.insert_char(c),
            _ => {}
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::api::CheckResponse;
    use crate::error::ApiError;
    use tokio::sync::mpsc::{self, UnboundedReceiver};

    pub fn test_app() -> (App, UnboundedReceiver<ApiRequest>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (App::new(AppSettings::default(), tx), rx)
    }

    pub fn items(pairs: &[(&str, &str)]) -> Vec<QaItem> {
        pairs
            .iter()
            .map(|(q, a)| QaItem {
                question: q.to_string(),
                answer: a.to_string(),
            })
            .collect()
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn capitals() -> Vec<QaItem> {
        items(&[
            ("Capital of France?", "Paris"),
            ("Capital of Japan?", "Tokyo"),
            ("Capital of Peru?", "Lima"),
        ])
    }

    /// Select `category` and answer its flashcard request with `deck`.
    pub fn open_deck(
        app: &mut App,
        rx: &mut UnboundedReceiver<ApiRequest>,
        category: &str,
        deck: Vec<QaItem>,
    ) {
        app.state.categories = vec![category.to_string()];
        app.select_category(category);
        match rx.try_recv() {
            Ok(ApiRequest::Flashcards { ticket, .. }) => app.apply_response(ApiResponse::Flashcards {
                ticket,
                result: Ok(deck),
            }),
            other => panic!("expected flashcards request, got {other:?}"),
        }
    }

    /// Switch to test mode, load a test of `qpp` questions answered with `deck`.
    pub fn open_test(
        app: &mut App,
        rx: &mut UnboundedReceiver<ApiRequest>,
        qpp: &str,
        deck: Vec<QaItem>,
    ) -> usize {
        app.set_mode(Mode::Test);
        app.test_size_input = qpp.to_string();
        app.load_test();
        match rx.try_recv() {
            Ok(ApiRequest::Test { ticket, query }) => {
                app.apply_response(ApiResponse::Test {
                    ticket,
                    result: Ok(deck),
                });
                query.limit
            }
            other => panic!("expected test request, got {other:?}"),
        }
    }

    #[test]
    fn test_initial_placeholder() {
        let (app, _rx) = test_app();
        assert_eq!(
            app.content,
            ContentView::Placeholder(SELECT_CATEGORY.to_string())
        );
        assert_eq!(app.state.mode, Mode::Flashcards);
    }

    #[test]
    fn test_load_categories_issues_request() {
        let (mut app, mut rx) = test_app();
        app.load_categories();
        assert!(matches!(rx.try_recv(), Ok(ApiRequest::Categories)));
        assert_eq!(app.in_flight, 1);

        app.apply_response(ApiResponse::Categories(Ok(vec![
            "Capitals".to_string(),
            "Math".to_string(),
        ])));
        assert_eq!(app.state.categories.len(), 2);
        assert_eq!(app.in_flight, 0);
    }

    #[test]
    fn test_select_category_resets_before_fetch() {
        let (mut app, mut rx) = test_app();
        open_deck(&mut app, &mut rx, "Capitals", capitals());
        app.next_card();
        app.state.test_items = items(&[("q", "a")]).into_iter().map(TestItem::from).collect();

        app.select_category("Math");

        assert_eq!(app.state.flash_index, 0);
        assert!(app.state.flashcards.is_empty());
        assert!(app.state.test_items.is_empty());
        assert_eq!(
            app.content,
            ContentView::Placeholder(LOADING_CARDS.to_string())
        );
        match rx.try_recv() {
            Ok(ApiRequest::Flashcards { query, .. }) => {
                assert_eq!(query.category, "Math");
                assert_eq!(query.mode, Mode::Flashcards);
                assert_eq!(query.limit, 1000);
            }
            other => panic!("expected flashcards request, got {other:?}"),
        }
    }

    #[test]
    fn test_capitals_navigation_scenario() {
        let (mut app, mut rx) = test_app();
        open_deck(&mut app, &mut rx, "Capitals", capitals());

        assert_eq!(app.content, ContentView::Flashcard);
        let header = |app: &App| app.card.as_ref().unwrap().header();
        assert_eq!(header(&app), "Q1/3: Capital of France?");

        app.next_card();
        app.next_card();
        assert_eq!(header(&app), "Q3/3: Capital of Peru?");

        app.next_card();
        assert_eq!(header(&app), "Q3/3: Capital of Peru?");
        assert_eq!(app.state.flash_index, 2);
    }

    #[test]
    fn test_prev_is_noop_at_first_card() {
        let (mut app, mut rx) = test_app();
        open_deck(&mut app, &mut rx, "Capitals", capitals());
        app.toggle_reveal();
        app.prev_card();
        assert_eq!(app.state.flash_index, 0);
        // No re-render happened, so the card stays revealed.
        assert!(app.card.as_ref().unwrap().revealed);
    }

    #[test]
    fn test_reveal_resets_on_navigation() {
        let (mut app, mut rx) = test_app();
        open_deck(&mut app, &mut rx, "Capitals", capitals());

        app.toggle_reveal();
        assert_eq!(app.card.as_ref().unwrap().face(), "Paris");
        app.next_card();
        assert_eq!(app.card.as_ref().unwrap().face(), "Reveal answer");
        app.prev_card();
        assert_eq!(app.card.as_ref().unwrap().face(), "Reveal answer");
    }

    #[test]
    fn test_empty_deck_shows_no_cards() {
        let (mut app, mut rx) = test_app();
        open_deck(&mut app, &mut rx, "Empty", vec![]);
        assert_eq!(app.content, ContentView::Placeholder(NO_CARDS.to_string()));
        assert!(app.card.is_none());
    }

    #[test]
    fn test_cached_flashcards_are_not_refetched() {
        let (mut app, mut rx) = test_app();
        open_deck(&mut app, &mut rx, "Capitals", capitals());
        app.next_card();

        app.set_mode(Mode::Test);
        app.set_mode(Mode::Flashcards);

        assert!(rx.try_recv().is_err());
        assert_eq!(app.card.as_ref().unwrap().position, 2);
    }

    #[test]
    fn test_mode_toggle_while_loading_does_not_duplicate_fetch() {
        let (mut app, mut rx) = test_app();
        app.select_category("Capitals");
        assert!(rx.try_recv().is_ok());

        app.set_mode(Mode::Test);
        app.set_mode(Mode::Flashcards);
        assert!(rx.try_recv().is_err());
        assert_eq!(
            app.content,
            ContentView::Placeholder(LOADING_CARDS.to_string())
        );
    }

    #[test]
    fn test_test_mode_shows_configure_placeholder() {
        let (mut app, mut rx) = test_app();
        app.select_category("Capitals");
        let _ = rx.try_recv();
        app.set_mode(Mode::Test);
        assert_eq!(
            app.content,
            ContentView::Placeholder(CONFIGURE_TEST.to_string())
        );
        assert!(app.test_config_visible());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_mode_without_category_shows_select_prompt() {
        let (mut app, mut rx) = test_app();
        app.set_mode(Mode::Test);
        assert_eq!(
            app.content,
            ContentView::Placeholder(SELECT_CATEGORY.to_string())
        );
        app.load_test();
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_test_size_defaults() {
        let (mut app, _rx) = test_app();
        assert_eq!(app.test_size(), 5);
        app.test_size_input = "abc".to_string();
        assert_eq!(app.test_size(), 5);
        app.test_size_input = "0".to_string();
        assert_eq!(app.test_size(), 0);
        app.test_size_input = "12".to_string();
        assert_eq!(app.test_size(), 12);
    }

    #[test]
    fn test_load_test_requests_count() {
        let (mut app, mut rx) = test_app();
        open_deck(&mut app, &mut rx, "Math", vec![]);
        let limit = open_test(&mut app, &mut rx, "", items(&[("2+2?", "4")]));
        assert_eq!(limit, 5);
        let limit = open_test(&mut app, &mut rx, "12", items(&[("2+2?", "4")]));
        assert_eq!(limit, 12);
        let limit = open_test(&mut app, &mut rx, "0", items(&[("2+2?", "4")]));
        assert_eq!(limit, 0);
    }

    #[test]
    fn test_next_batch_requests_following_offset() {
        let (mut app, mut rx) = test_app();
        open_deck(&mut app, &mut rx, "Math", vec![]);
        open_test(&mut app, &mut rx, "2", items(&[("1+1?", "2"), ("2+2?", "4")]));
        assert_eq!(app.test_offset(), 0);
        app.insert_char('2');
        app.check_row(0);
        let (old_ticket, old_row) = match rx.try_recv() {
            Ok(ApiRequest::Check { ticket, row, .. }) => (ticket, row),
            other => panic!("expected check request, got {other:?}"),
        };

        app.focus = Focus::Content;
        app.handle_key(key(KeyCode::PageDown));
        let ticket = match rx.try_recv() {
            Ok(ApiRequest::Test { ticket, query }) => {
                assert_eq!(query.category, "Math");
                assert_eq!(query.limit, 2);
                assert_eq!(query.offset, Some(2));
                ticket
            }
            other => panic!("expected test request, got {other:?}"),
        };
        assert_eq!(app.test_offset(), 2);

        app.apply_response(ApiResponse::Test {
            ticket,
            result: Ok(items(&[("3+3?", "6")])),
        });
        assert_eq!(app.state.test_items[0].question, "3+3?");

        // Grading of the previous batch no longer applies.
        app.apply_response(ApiResponse::Check {
            ticket: old_ticket,
            row: old_row,
            result: Ok(CheckResponse {
                correct: true,
                expected: "2".to_string(),
            }),
        });
        assert_eq!(app.state.test_items[0].result, None);

        app.handle_key(key(KeyCode::PageDown));
        match rx.try_recv() {
            Ok(ApiRequest::Test { query, .. }) => assert_eq!(query.offset, Some(3)),
            other => panic!("expected test request, got {other:?}"),
        }
    }

    #[test]
    fn test_reload_starts_from_first_batch() {
        let (mut app, mut rx) = test_app();
        open_deck(&mut app, &mut rx, "Math", vec![]);
        open_test(&mut app, &mut rx, "1", items(&[("1+1?", "2")]));
        app.load_next_test_batch();
        let _ = rx.try_recv();

        app.load_test();
        match rx.try_recv() {
            Ok(ApiRequest::Test { query, .. }) => assert_eq!(query.offset, None),
            other => panic!("expected test request, got {other:?}"),
        }
        assert_eq!(app.test_offset(), 0);
    }

    #[test]
    fn test_next_batch_without_items_is_noop() {
        let (mut app, mut rx) = test_app();
        open_deck(&mut app, &mut rx, "Math", vec![]);
        open_test(&mut app, &mut rx, "3", vec![]);
        app.load_next_test_batch();
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_stale_test_after_category_change_is_discarded() {
        let (mut app, mut rx) = test_app();
        open_deck(&mut app, &mut rx, "Math", vec![]);
        app.set_mode(Mode::Test);
        app.load_test();
        let old_ticket = match rx.try_recv() {
            Ok(ApiRequest::Test { ticket, .. }) => ticket,
            other => panic!("expected test request, got {other:?}"),
        };

        app.select_category("Capitals");
        app.apply_response(ApiResponse::Test {
            ticket: old_ticket,
            result: Ok(items(&[("2+2?", "4")])),
        });

        assert!(app.state.test_items.is_empty());
        assert_ne!(app.content, ContentView::Test);
    }

    #[test]
    fn test_stale_test_after_reload_is_discarded() {
        let (mut app, mut rx) = test_app();
        open_deck(&mut app, &mut rx, "Math", vec![]);
        app.set_mode(Mode::Test);
        app.load_test();
        app.load_test();
        let first = match rx.try_recv() {
            Ok(ApiRequest::Test { ticket, .. }) => ticket,
            other => panic!("expected test request, got {other:?}"),
        };
        let second = match rx.try_recv() {
            Ok(ApiRequest::Test { ticket, .. }) => ticket,
            other => panic!("expected test request, got {other:?}"),
        };

        app.apply_response(ApiResponse::Test {
            ticket: second,
            result: Ok(items(&[("3+3?", "6")])),
        });
        app.apply_response(ApiResponse::Test {
            ticket: first,
            result: Ok(items(&[("2+2?", "4"), ("5+5?", "10")])),
        });

        assert_eq!(app.state.test_items.len(), 1);
        assert_eq!(app.state.test_items[0].question, "3+3?");
        assert_eq!(app.content, ContentView::Test);
    }

    #[test]
    fn test_check_scenario_updates_only_that_row() {
        let (mut app, mut rx) = test_app();
        open_deck(&mut app, &mut rx, "Math", vec![]);
        open_test(&mut app, &mut rx, "2", items(&[("2+2?", "4"), ("3+3?", "6")]));
        assert_eq!(app.content, ContentView::Test);
        assert_eq!(app.state.test_items.len(), 2);

        app.insert_char('4');
        assert_eq!(app.state.test_items[0].user_answer, "4");
        app.check_row(0);

        let (ticket, row) = match rx.try_recv() {
            Ok(ApiRequest::Check { ticket, row, body }) => {
                assert_eq!(body.category, "Math");
                assert_eq!(body.question, "2+2?");
                assert_eq!(body.answer, "4");
                (ticket, row)
            }
            other => panic!("expected check request, got {other:?}"),
        };
        assert!(app.state.test_items[0].checking);

        app.apply_response(ApiResponse::Check {
            ticket,
            row,
            result: Ok(CheckResponse {
                correct: true,
                expected: "4".to_string(),
            }),
        });

        let first = &app.state.test_items[0];
        assert_eq!(first.result, Some(true));
        assert!(!first.checking);
        assert_eq!(first.result_message().as_deref(), Some("Correct"));
        let second = &app.state.test_items[1];
        assert_eq!(second.result, None);
        assert!(second.user_answer.is_empty());
    }

    #[test]
    fn test_answer_editing_keys() {
        let (mut app, mut rx) = test_app();
        open_deck(&mut app, &mut rx, "Math", vec![]);
        open_test(&mut app, &mut rx, "2", items(&[("2+2?", "4"), ("3+3?", "6")]));
        app.focus = Focus::Content;

        for c in "héllo".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        app.handle_key(key(KeyCode::Left));
        app.handle_key(key(KeyCode::Backspace));
        assert_eq!(app.state.test_items[0].user_answer, "hélo");
        app.handle_key(key(KeyCode::Home));
        app.handle_key(key(KeyCode::Delete));
        assert_eq!(app.state.test_items[0].user_answer, "élo");

        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Char('6')));
        assert_eq!(app.state.test_items[1].user_answer, "6");
        assert_eq!(app.state.test_items[0].user_answer, "élo");
        // 'q' is text while editing, not a quit command.
        assert!(!app.should_quit);
    }

    #[test]
    fn test_stale_flashcards_are_discarded() {
        let (mut app, mut rx) = test_app();
        app.select_category("Capitals");
        let stale = match rx.try_recv() {
            Ok(ApiRequest::Flashcards { ticket, .. }) => ticket,
            other => panic!("expected flashcards request, got {other:?}"),
        };
        app.select_category("Math");
        let fresh = match rx.try_recv() {
            Ok(ApiRequest::Flashcards { ticket, .. }) => ticket,
            other => panic!("expected flashcards request, got {other:?}"),
        };

        app.apply_response(ApiResponse::Flashcards {
            ticket: fresh,
            result: Ok(items(&[("2+2?", "4")])),
        });
        app.apply_response(ApiResponse::Flashcards {
            ticket: stale,
            result: Ok(capitals()),
        });

        assert_eq!(app.state.flashcards.len(), 1);
        assert_eq!(app.card.as_ref().unwrap().header(), "Q1/1: 2+2?");
    }

    #[test]
    fn test_stale_check_after_reload_is_discarded() {
        let (mut app, mut rx) = test_app();
        open_deck(&mut app, &mut rx, "Math", vec![]);
        open_test(&mut app, &mut rx, "1", items(&[("2+2?", "4")]));
        app.check_row(0);
        let (ticket, row) = match rx.try_recv() {
            Ok(ApiRequest::Check { ticket, row, .. }) => (ticket, row),
            other => panic!("expected check request, got {other:?}"),
        };

        open_test(&mut app, &mut rx, "1", items(&[("2+2?", "4")]));
        app.apply_response(ApiResponse::Check {
            ticket,
            row,
            result: Ok(CheckResponse {
                correct: false,
                expected: "4".to_string(),
            }),
        });
        assert_eq!(app.state.test_items[0].result, None);
    }

    #[test]
    fn test_failed_fetch_surfaces_error() {
        let (mut app, mut rx) = test_app();
        app.select_category("Capitals");
        let ticket = match rx.try_recv() {
            Ok(ApiRequest::Flashcards { ticket, .. }) => ticket,
            other => panic!("expected flashcards request, got {other:?}"),
        };
        app.apply_response(ApiResponse::Flashcards {
            ticket,
            result: Err(ApiError::Status {
                status: 500,
                url: "http://localhost/api/questions".to_string(),
            }),
        });

        let banner = app.error.as_ref().unwrap();
        assert_eq!(banner.operation, "Loading cards");
        assert!(banner.message.contains("500"));
        assert_eq!(
            app.content,
            ContentView::Placeholder(CARDS_FAILED.to_string())
        );

        // A new request clears the banner and retries the fetch.
        app.load_mode();
        assert!(app.error.is_none());
        assert!(rx.try_recv().is_ok());
    }

    #[test]
    fn test_failed_check_keeps_previous_result() {
        let (mut app, mut rx) = test_app();
        open_deck(&mut app, &mut rx, "Math", vec![]);
        open_test(&mut app, &mut rx, "1", items(&[("2+2?", "4")]));
        app.state.test_items[0].result = Some(false);
        app.check_row(0);
        let ticket = app.ticket();
        let _ = rx.try_recv();

        app.apply_response(ApiResponse::Check {
            ticket,
            row: 0,
            result: Err(ApiError::Status {
                status: 404,
                url: "http://localhost/api/check".to_string(),
            }),
        });
        let item = &app.state.test_items[0];
        assert_eq!(item.result, Some(false));
        assert!(!item.checking);
        assert!(app.error.is_some());
    }

    #[test]
    fn test_worker_gone_reports_error() {
        let (mut app, rx) = test_app();
        drop(rx);
        app.load_categories();
        assert_eq!(app.in_flight, 0);
        assert!(app.error.is_some());
    }

    #[test]
    fn test_shuffle_restarts_deck() {
        let (mut app, mut rx) = test_app();
        open_deck(&mut app, &mut rx, "Capitals", capitals());
        app.next_card();
        app.shuffle_cards();
        assert_eq!(app.state.flash_index, 0);
        assert_eq!(app.state.flashcards.len(), 3);
        assert_eq!(app.card.as_ref().unwrap().position, 1);
    }

    #[test]
    fn test_category_keys_select_under_cursor() {
        let (mut app, mut rx) = test_app();
        app.apply_response(ApiResponse::Categories(Ok(vec![
            "Capitals".to_string(),
            "Math".to_string(),
        ])));
        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Down));
        assert_eq!(app.category_cursor, 1);
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.state.selected_category.as_deref(), Some("Math"));
        assert!(matches!(rx.try_recv(), Ok(ApiRequest::Flashcards { .. })));
    }

    #[test]
    fn test_flashcard_keys() {
        let (mut app, mut rx) = test_app();
        open_deck(&mut app, &mut rx, "Capitals", capitals());
        app.focus = Focus::Content;
        app.handle_key(key(KeyCode::Right));
        assert_eq!(app.state.flash_index, 1);
        app.handle_key(key(KeyCode::Char(' ')));
        assert_eq!(app.card.as_ref().unwrap().face(), "Tokyo");
        app.handle_key(key(KeyCode::Left));
        assert_eq!(app.state.flash_index, 0);
        app.handle_key(key(KeyCode::Char('m')));
        assert_eq!(app.state.mode, Mode::Test);
    }

    #[test]
    fn test_focus_cycle_skips_hidden_test_config() {
        let (mut app, _rx) = test_app();
        app.cycle_focus(true);
        assert_eq!(app.focus, Focus::Content);
        app.set_mode(Mode::Test);
        app.cycle_focus(false);
        assert_eq!(app.focus, Focus::TestConfig);
        app.set_mode(Mode::Flashcards);
        assert_eq!(app.focus, Focus::Categories);
    }

    #[test]
    fn test_test_config_keys() {
        let (mut app, mut rx) = test_app();
        app.select_category("Math");
        let _ = rx.try_recv();
        app.set_mode(Mode::Test);
        app.focus = Focus::TestConfig;
        for c in ['1', 'x', '2'] {
            app.handle_key(key(KeyCode::Char(c)));
        }
        assert_eq!(app.test_size_input, "12");
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.focus, Focus::Content);
        match rx.try_recv() {
            Ok(ApiRequest::Test { query, .. }) => assert_eq!(query.limit, 12),
            other => panic!("expected test request, got {other:?}"),
        }
    }

    #[test]
    fn test_quit_keys() {
        let (mut app, _rx) = test_app();
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);

        let (mut app, _rx) = test_app();
        app.handle_key(key(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[test]
    fn test_number_keys_jump_to_panels() {
        let (mut app, mut rx) = test_app();
        open_deck(&mut app, &mut rx, "Capitals", capitals());
        app.focus = Focus::Content;

        // The test panel is hidden in flashcard mode.
        app.handle_key(key(KeyCode::Char('2')));
        assert_eq!(app.focus, Focus::Content);
        app.handle_key(key(KeyCode::Char('1')));
        assert_eq!(app.focus, Focus::Categories);

        app.set_mode(Mode::Test);
        app.handle_key(key(KeyCode::Char('2')));
        assert_eq!(app.focus, Focus::TestConfig);
        // Digits are count input once the panel has focus.
        app.handle_key(key(KeyCode::Char('1')));
        assert_eq!(app.focus, Focus::TestConfig);
        assert_eq!(app.test_size_input, "1");
    }

    #[test]
    fn test_error_banner_explains_status() {
        let (mut app, mut rx) = test_app();
        app.select_category("Nope");
        let ticket = match rx.try_recv() {
            Ok(ApiRequest::Flashcards { ticket, .. }) => ticket,
            other => panic!("expected flashcards request, got {other:?}"),
        };
        app.apply_response(ApiResponse::Flashcards {
            ticket,
            result: Err(ApiError::Status {
                status: 404,
                url: "http://127.0.0.1:8000/api/questions".to_string(),
            }),
        });

        let banner = app.error.as_ref().unwrap();
        assert_eq!(banner.operation, "Loading cards");
        assert!(banner.message.starts_with("HTTP 404"));
        assert!(banner.message.ends_with("(not found on the server)"));

        app.load_categories();
        app.apply_response(ApiResponse::Categories(Err(ApiError::Status {
            status: 503,
            url: "http://127.0.0.1:8000/api/categories".to_string(),
        })));
        assert!(app.error.as_ref().unwrap().message.ends_with("(server error)"));
    }
}
