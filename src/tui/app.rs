use crate::app::Config;
use crate::session::{DispatchOutcome, SessionController};

/// Application state for different input modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Viewing the conversation, single-key shortcuts active
    Normal,
    /// Typing a symptom description
    Insert,
    /// Entering a `:` command
    Command,
}

/// Terminal application state. Conversation state lives in the session.
pub struct App {
    /// Shared session (transcript, verdicts, pending inputs)
    pub session: SessionController,
    /// Current input mode
    pub mode: InputMode,
    /// Command buffer for `:` commands
    pub command: String,
    /// Is the app running?
    pub running: bool,
    /// Lines scrolled up from the bottom of the transcript
    pub scroll_offset: u16,
    /// Show the verdict panel
    pub show_verdicts: bool,
    /// Service base URL for display
    pub service_url: String,
    /// Status message
    pub status_message: Option<String>,
}

impl App {
    /// Create a new app instance
    pub fn new(session: SessionController, config: &Config) -> Self {
        Self {
            session,
            mode: InputMode::Insert,
            command: String::new(),
            running: true,
            scroll_offset: 0,
            show_verdicts: config.ui.show_verdicts,
            service_url: config.service.base_url.clone(),
            status_message: None,
        }
    }

    /// Set status message
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    /// Clear status message
    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    /// Show a finished dispatch in the status bar and follow the transcript
    pub fn report(&mut self, outcome: &DispatchOutcome) {
        self.set_status(outcome.summary());
        if !matches!(outcome, DispatchOutcome::Rejected { .. }) {
            self.scroll_offset = 0;
        }
    }

    /// Copy preset `index` (zero-based) into the pending text
    pub fn apply_preset(&mut self, index: usize) {
        match self.session.apply_preset(index) {
            Ok(_) => {
                self.mode = InputMode::Insert;
                self.set_status(format!("Suggestion {} copied, press Enter to send", index + 1));
            }
            Err(e) => self.set_status(e.to_string()),
        }
    }

    /// Scroll transcript view up
    pub fn scroll_up(&mut self, amount: u16) {
        self.scroll_offset = self.scroll_offset.saturating_add(amount);
    }

    /// Scroll transcript view down
    pub fn scroll_down(&mut self, amount: u16) {
        self.scroll_offset = self.scroll_offset.saturating_sub(amount);
    }

    pub fn toggle_verdicts(&mut self) {
        self.show_verdicts = !self.show_verdicts;
    }

    /// Quit the application
    pub fn quit(&mut self) {
        self.running = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::PRESET_PROMPTS;
    use crate::service::MockPredictionService;
    use crate::session::Channel;
    use std::sync::Arc;

    fn app() -> App {
        let session = SessionController::new(Arc::new(MockPredictionService::new()));
        App::new(session, &Config::default())
    }

    #[test]
    fn test_apply_preset_fills_input() {
        let mut app = app();
        app.mode = InputMode::Normal;
        app.apply_preset(0);

        assert_eq!(app.mode, InputMode::Insert);
        assert_eq!(app.session.snapshot().pending_text, PRESET_PROMPTS[0]);
    }

    #[test]
    fn test_apply_missing_preset_reports() {
        let mut app = app();
        app.apply_preset(99);

        assert!(app.status_message.is_some());
        assert!(app.session.snapshot().pending_text.is_empty());
    }

    #[test]
    fn test_report_resets_scroll_for_new_entries() {
        let mut app = app();
        app.scroll_up(10);
        app.report(&DispatchOutcome::TransportFailed {
            channel: Channel::Text,
        });
        assert_eq!(app.scroll_offset, 0);

        app.scroll_up(4);
        app.report(&DispatchOutcome::Rejected {
            prompt: "wait".to_string(),
        });
        assert_eq!(app.scroll_offset, 4);
        assert_eq!(app.status_message.as_deref(), Some("wait"));
    }
}
