use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Author {
    User,
    Assistant,
}

/// One chat bubble. Never edited: a placeholder or a partial stream is
/// replaced by a fresh message with a newer id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: u64,
    pub content: String,
    pub author: Author,
    pub loading: bool,
}

impl ChatMessage {
    fn new(content: String, author: Author, loading: bool) -> Self {
        Self {
            id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
            content,
            author,
            loading,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(content.into(), Author::User, false)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(content.into(), Author::Assistant, false)
    }

    /// "waiting for reply" placeholder.
    pub fn placeholder() -> Self {
        Self::new("⏳ Yanıt bekleniyor...".to_string(), Author::Assistant, true)
    }

    /// Partial streamed reply, still loading.
    pub fn partial(content: impl Into<String>) -> Self {
        Self::new(content.into(), Author::Assistant, true)
    }

    pub fn is_user(&self) -> bool {
        self.author == Author::User
    }
}
