use crate::api::DEFAULT_SERVER_URL;
use crate::session::{AppSettings, DEFAULT_FLASHCARD_LIMIT, DEFAULT_TEST_SIZE};
use clap::Parser;
use std::path::PathBuf;

/// Terminal client for studying flashcards and short-answer tests.
#[derive(Debug, Clone, Parser)]
#[command(name = "study-portal", version)]
pub struct Config {
    /// Base URL of the study API
    #[arg(long, env = "STUDY_PORTAL_URL", default_value = DEFAULT_SERVER_URL)]
    pub server_url: String,

    /// Maximum number of flashcards fetched per category
    #[arg(long, default_value_t = DEFAULT_FLASHCARD_LIMIT, value_parser = positive_count)]
    pub flashcard_limit: usize,

    /// Question count used when the test size field is blank or invalid
    #[arg(long, default_value_t = DEFAULT_TEST_SIZE, value_parser = positive_count)]
    pub default_test_size: usize,

    /// File receiving the log output
    #[arg(long, env = "STUDY_PORTAL_LOG", default_value = "study-portal.log")]
    pub log_file: PathBuf,
}

impl Config {
    pub fn settings(&self) -> AppSettings {
        AppSettings {
            flashcard_limit: self.flashcard_limit,
            default_test_size: self.default_test_size,
        }
    }
}

fn positive_count(raw: &str) -> Result<usize, String> {
    match raw.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}
