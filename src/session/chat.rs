use super::message::ChatMessage;
use super::responder::{LocalResponder, Response};
use crate::config::ChatConfig;
use crate::kernel::dialogue::ConversationState;
use crate::services::backend::BackendClient;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tracing::{debug, info, warn};

const EMPTY_INPUT_REPLY: &str = "Bir şey yazmadın.";
const OFFLINE_REPLY: &str = "📡 Sunucu ayarlı değil. Yerel komutlar çalışmaya devam ediyor.";

/// Lets an update through at most once per interval.
#[derive(Debug, Clone)]
pub struct Throttle {
    interval: Duration,
    last: Option<Instant>,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Self { interval, last: None }
    }

    pub fn ready(&mut self, now: Instant) -> bool {
        match self.last {
            Some(last) if now.duration_since(last) < self.interval => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }
}

/// The foreground chat: ordered history, its own pending question, and
/// backend fallthrough with throttled streaming.
///
/// `send` takes `&mut self`, so turns in one session are strictly ordered.
pub struct ChatSession {
    responder: Arc<LocalResponder>,
    backend: Option<BackendClient>,
    streaming: bool,
    config: ChatConfig,
    history: Vec<ChatMessage>,
    state: ConversationState,
    pending_since: Option<Instant>,
    updates: watch::Sender<Vec<ChatMessage>>,
}

impl ChatSession {
    pub fn new(
        responder: Arc<LocalResponder>,
        backend: Option<BackendClient>,
        streaming: bool,
        config: ChatConfig,
    ) -> Self {
        let (updates, _) = watch::channel(Vec::new());
        Self {
            responder,
            backend,
            streaming,
            config,
            history: Vec::new(),
            state: ConversationState::None,
            pending_since: None,
            updates,
        }
    }

    /// Snapshot stream of the history for a renderer.
    pub fn subscribe(&self) -> watch::Receiver<Vec<ChatMessage>> {
        self.updates.subscribe()
    }

    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    pub fn state(&self) -> &ConversationState {
        &self.state
    }

    /// Runs one user turn and returns the final assistant message.
    pub async fn send(&mut self, text: &str) -> ChatMessage {
        self.send_at(text, Instant::now()).await
    }

    pub async fn send_at(&mut self, text: &str, now: Instant) -> ChatMessage {
        self.expire_pending(now);
        let text = text.trim();
        if text.is_empty() {
            return ChatMessage::assistant(EMPTY_INPUT_REPLY);
        }
        self.push(ChatMessage::user(text));

        let reply = match self.responder.respond(&mut self.state, text) {
            Response::Local(local) => {
                self.pending_since = local.expects_answer.then_some(now);
                ChatMessage::assistant(local.text)
            }
            Response::Forward => {
                self.pending_since = None;
                self.ask_backend(text).await
            }
        };
        self.push(reply.clone());
        reply
    }

    /// Forgets the conversation here and on the backend.
    pub async fn clear(&mut self) {
        self.history.clear();
        self.state = ConversationState::None;
        self.pending_since = None;
        self.updates.send_replace(Vec::new());
        if let Some(backend) = &self.backend {
            if let Err(e) = backend.clear_history().await {
                warn!(error = %e, "backend history not cleared");
            }
        }
    }

    /// Drops a question nobody answered in time.
    fn expire_pending(&mut self, now: Instant) {
        let expiry = Duration::from_secs(self.config.pending_expiry_secs);
        if let Some(since) = self.pending_since {
            if self.state.is_pending() && now.duration_since(since) >= expiry {
                info!("pending question expired");
                self.state = ConversationState::None;
                self.pending_since = None;
            }
        }
    }

    async fn ask_backend(&mut self, text: &str) -> ChatMessage {
        let Some(backend) = self.backend.clone() else {
            return ChatMessage::assistant(OFFLINE_REPLY);
        };

        self.push(ChatMessage::placeholder());

        if self.streaming {
            let history = &mut self.history;
            let updates = &self.updates;
            let mut throttle = Throttle::new(Duration::from_millis(self.config.stream_throttle_ms));
            let mut partial = String::new();

            let streamed = backend
                .chat_stream(text, |token| {
                    partial.push_str(token);
                    if throttle.ready(Instant::now()) {
                        replace_loading(history, ChatMessage::partial(partial.clone()));
                        updates.send_replace(history.clone());
                    }
                })
                .await;

            match streamed {
                Ok(reply) if !reply.trim().is_empty() => {
                    self.drop_loading();
                    return ChatMessage::assistant(reply.trim());
                }
                Ok(_) => debug!("stream produced nothing; falling back to /chat"),
                Err(e) => warn!(error = %e, "stream failed; falling back to /chat"),
            }
        }

        let message = match backend.chat(text).await {
            Ok(reply) => ChatMessage::assistant(reply),
            Err(e) => {
                warn!(error = %e, "chat request failed");
                ChatMessage::assistant(e.friendly_message())
            }
        };
        self.drop_loading();
        message
    }

    fn drop_loading(&mut self) {
        if self.history.last().is_some_and(|m| m.loading) {
            self.history.pop();
        }
    }

    fn push(&mut self, message: ChatMessage) {
        self.history.push(message);
        let overflow = self.history.len().saturating_sub(self.config.history_limit);
        if overflow > 0 {
            self.history.drain(..overflow);
        }
        self.updates.send_replace(self.history.clone());
    }
}

fn replace_loading(history: &mut Vec<ChatMessage>, message: ChatMessage) {
    if history.last().is_some_and(|m| m.loading) {
        history.pop();
    }
    history.push(message);
}
