use crate::api::{CheckRequest, CheckResponse, QuestionQuery};
use crate::error::ApiResult;
use serde::{Deserialize, Serialize};

pub const REVEAL_PROMPT: &str = "Reveal answer";

/// Which view the content pane is driven by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Flashcards,
    Test,
}

impl Mode {
    /// Value of the `mode` query parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Flashcards => "flashcards",
            Mode::Test => "test",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Mode::Flashcards => "Flashcards",
            Mode::Test => "Test",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Mode::Flashcards => Mode::Test,
            Mode::Test => Mode::Flashcards,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaItem {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestItem {
    pub question: String,
    pub answer: String,
    pub user_answer: String,
    /// `None` until the server has graded the row.
    pub result: Option<bool>,
    pub expected: Option<String>,
    pub checking: bool,
}

impl From<QaItem> for TestItem {
    fn from(item: QaItem) -> Self {
        Self {
            question: item.question,
            answer: item.answer,
            user_answer: String::new(),
            result: None,
            expected: None,
            checking: false,
        }
    }
}

impl TestItem {
    pub fn result_message(&self) -> Option<String> {
        match self.result {
            Some(true) => Some("Correct".to_string()),
            Some(false) => Some(format!(
                "Incorrect. Answer: {}",
                self.expected.as_deref().unwrap_or_default()
            )),
            None => None,
        }
    }
}

/// Everything the study session knows. One instance, owned by [`crate::App`].
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub categories: Vec<String>,
    pub selected_category: Option<String>,
    pub mode: Mode,
    pub flash_index: usize,
    pub flashcards: Vec<QaItem>,
    pub test_items: Vec<TestItem>,
}

impl SessionState {
    /// Switch to `category`, dropping everything fetched for the previous one.
    pub fn select_category(&mut self, category: &str) {
        self.selected_category = Some(category.to_string());
        self.flash_index = 0;
        self.flashcards.clear();
        self.test_items.clear();
    }

    /// Returns `false` when already on the last card.
    pub fn next_card(&mut self) -> bool {
        if self.flash_index < self.flashcards.len().saturating_sub(1) {
            self.flash_index += 1;
            true
        } else {
            false
        }
    }

    /// Returns `false` when already on the first card.
    pub fn prev_card(&mut self) -> bool {
        if self.flash_index > 0 {
            self.flash_index -= 1;
            true
        } else {
            false
        }
    }

    pub fn current_card(&self) -> Option<&QaItem> {
        self.flashcards.get(self.flash_index)
    }
}

/// View model of the card on screen. Rebuilt on every flashcard render, so
/// the reveal flag never survives navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
    pub position: usize,
    pub total: usize,
    pub question: String,
    pub answer: String,
    pub revealed: bool,
}

impl CardView {
    pub fn new(index: usize, total: usize, item: &QaItem) -> Self {
        Self {
            position: index + 1,
            total,
            question: item.question.clone(),
            answer: item.answer.clone(),
            revealed: false,
        }
    }

    pub fn header(&self) -> String {
        format!("Q{}/{}: {}", self.position, self.total, self.question)
    }

    pub fn face(&self) -> &str {
        if self.revealed {
            &self.answer
        } else {
            REVEAL_PROMPT
        }
    }

    pub fn toggle(&mut self) {
        self.revealed = !self.revealed;
    }

    pub fn is_first(&self) -> bool {
        self.position <= 1
    }

    pub fn is_last(&self) -> bool {
        self.position >= self.total
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Categories,
    TestConfig,
    Content,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentView {
    Placeholder(String),
    Flashcard,
    Test,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorBanner {
    pub operation: &'static str,
    pub message: String,
}

/// Identifies the state a request was issued against. A response whose ticket
/// no longer matches the controller's current one is stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Ticket {
    pub epoch: u64,
    pub test_generation: u64,
}

#[derive(Debug)]
pub enum ApiRequest {
    Categories,
    Flashcards {
        ticket: Ticket,
        query: QuestionQuery,
    },
    Test {
        ticket: Ticket,
        query: QuestionQuery,
    },
    Check {
        ticket: Ticket,
        row: usize,
        body: CheckRequest,
    },
}

#[derive(Debug)]
pub enum ApiResponse {
    Categories(ApiResult<Vec<String>>),
    Flashcards {
        ticket: Ticket,
        result: ApiResult<Vec<QaItem>>,
    },
    Test {
        ticket: Ticket,
        result: ApiResult<Vec<QaItem>>,
    },
    Check {
        ticket: Ticket,
        row: usize,
        result: ApiResult<CheckResponse>,
    },
}
