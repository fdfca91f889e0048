pub mod api;
pub mod api_worker;
pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod session;
pub mod ui;
pub mod utils;

// Re-exports for convenience
pub use api::{StudyApi, StudyClient};
pub use api_worker::spawn_api_worker;
pub use config::Config;
pub use error::{ApiError, ApiResult};
pub use models::{ApiRequest, ApiResponse, Mode, QaItem, SessionState, TestItem};
pub use session::{App, AppSettings};
pub use ui::draw;
