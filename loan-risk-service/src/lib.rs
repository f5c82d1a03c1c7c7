pub mod config;
pub mod error;
pub mod llm;
pub mod models;
pub mod prompt;
pub mod relay;
pub mod service;
pub mod telemetry;

pub use config::ServiceConfig;
pub use error::RelayError;
pub use llm::{CompletionClient, GroqClient};
pub use models::*;
pub use service::{AppState, build_router};
