pub mod client;
pub mod schema;

pub use client::{StudyApi, StudyClient, DEFAULT_SERVER_URL};
pub use schema::{CategoriesResponse, CheckRequest, CheckResponse, QuestionQuery, QuestionsResponse};
