pub mod app;
pub mod cli;
pub mod constants;
pub mod runtime;
pub mod service;
pub mod session;
pub mod tui;
pub mod utils;

pub use app::{load_config, Config};
pub use service::{HttpPredictionService, PredictionService};
pub use session::{SessionController, TranscriptEntry, Verdict};
pub use tui::run_ui;
pub use utils::SkinChatError;
