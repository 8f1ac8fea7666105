pub mod machine;
pub mod prompts;
pub mod state;

pub use machine::{classify_answer, Answer, ConversationMachine};
pub use prompts::DialogueStyle;
pub use state::{ConversationState, Turn};
