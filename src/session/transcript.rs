use serde::Serialize;
use std::path::PathBuf;

/// Local display reference for an uploaded image.
///
/// Built before the upload is sent, so it stays valid whatever the network does.
/// Only the name leaves the machine; the local path is never serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageRef {
    pub name: String,
    #[serde(skip_serializing)]
    pub path: PathBuf,
}

/// One exchange in the conversation. Never mutated once appended.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum TranscriptEntry {
    #[serde(rename = "text", rename_all = "camelCase")]
    Text { user_text: String, bot_text: String },

    #[serde(rename = "image", rename_all = "camelCase")]
    Image {
        user_image_ref: ImageRef,
        bot_text: String,
    },
}

impl TranscriptEntry {
    pub fn text(user_text: impl Into<String>, bot_text: impl Into<String>) -> Self {
        Self::Text {
            user_text: user_text.into(),
            bot_text: bot_text.into(),
        }
    }

    pub fn image(user_image_ref: ImageRef, bot_text: impl Into<String>) -> Self {
        Self::Image {
            user_image_ref,
            bot_text: bot_text.into(),
        }
    }

    pub fn bot_text(&self) -> &str {
        match self {
            Self::Text { bot_text, .. } | Self::Image { bot_text, .. } => bot_text,
        }
    }

    /// Display form of this entry
    pub fn render(&self) -> RenderedExchange<'_> {
        match self {
            Self::Text {
                user_text,
                bot_text,
            } => RenderedExchange {
                user: user_text.clone(),
                bot: bot_text,
                is_image: false,
            },
            Self::Image {
                user_image_ref,
                bot_text,
            } => RenderedExchange {
                user: format!("[image] {}", user_image_ref.name),
                bot: bot_text,
                is_image: true,
            },
        }
    }
}

/// A transcript entry projected for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedExchange<'a> {
    pub user: String,
    pub bot: &'a str,
    pub is_image: bool,
}

/// Append-only, insertion-ordered log of exchanges
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry after every existing one
    pub fn append(&mut self, entry: TranscriptEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&TranscriptEntry> {
        self.entries.last()
    }

    /// Project the entries, in order, into display lines
    pub fn render(&self) -> Vec<RenderedExchange<'_>> {
        self.entries.iter().map(TranscriptEntry::render).collect()
    }
}
