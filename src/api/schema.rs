//! Wire shapes of the study API endpoints.

use crate::models::{Mode, QaItem};
use serde::{Deserialize, Serialize};

/// `GET /api/categories`
#[derive(Debug, Clone, Deserialize)]
pub struct CategoriesResponse {
    pub categories: Vec<String>,
}

/// `GET /api/questions`
#[derive(Debug, Clone, Deserialize)]
pub struct QuestionsResponse {
    pub items: Vec<QaItem>,
}

/// Query string of `GET /api/questions`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionQuery {
    pub category: String,
    pub mode: Mode,
    pub limit: usize,
    pub offset: Option<usize>,
}

impl QuestionQuery {
    pub fn new(category: &str, mode: Mode, limit: usize) -> Self {
        Self {
            category: category.to_string(),
            mode,
            limit,
            offset: None,
        }
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }
}

/// Body of `POST /api/check`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckRequest {
    pub category: String,
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CheckResponse {
    pub correct: bool,
    pub expected: String,
}
