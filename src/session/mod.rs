pub mod chat;
pub mod message;
pub mod responder;
pub mod voice;

pub use chat::{ChatSession, Throttle};
pub use message::{Author, ChatMessage};
pub use responder::{LocalReply, LocalResponder, Response};
pub use voice::{VoiceDevices, VoiceSession};
