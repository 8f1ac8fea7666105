/// Declares a lazily compiled regex. Holds `None` if the pattern fails to
/// compile, which the matchers treat as "no match".
macro_rules! pattern {
    ($name:ident, $re:expr) => {
        static $name: once_cell::sync::Lazy<Option<regex::Regex>> =
            once_cell::sync::Lazy::new(|| regex::Regex::new($re).ok());
    };
}

pub mod actions;
pub mod config;
pub mod error;
pub mod kernel;
pub mod notes;
pub mod platform;
pub mod services;
pub mod session;

pub use actions::{ActionExecutor, ContactResolver};
pub use config::AtlasConfig;
pub use error::{AtlasError, Result};
pub use kernel::apps::{AppIntent, AppLaunchDetector, ExecutionContext};
pub use kernel::dialogue::{ConversationMachine, ConversationState, DialogueStyle, Turn};
pub use kernel::intent::{Action, IntentDetector};
pub use kernel::wake::WakeSessionController;
