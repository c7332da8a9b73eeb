//! ModelGen: turns a commercial photo-shoot configuration (model, product and
//! scene) into a generation prompt and renders it with Gemini image models.

pub mod catalog;
pub mod config;
pub mod gemini;
pub mod models;
pub mod prompt;
pub mod reference;
pub mod routes;
pub mod session;

pub use config::Config;
pub use gemini::{GeminiClient, GeminiError, ImageGenerator};
pub use prompt::compose;
pub use routes::{router, AppState};
