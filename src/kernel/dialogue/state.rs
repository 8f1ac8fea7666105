use crate::kernel::intent::Action;
use serde::{Deserialize, Serialize};

/// The open question a session is waiting on, if any.
///
/// One instance per session; chat and voice never share one.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConversationState {
    #[default]
    None,
    /// Asked what to send to `contact`.
    WaitingMessage { contact: String },
    /// Asked for a yes/no. No message means the pending action is a call.
    WaitingConfirm {
        contact: String,
        message: Option<String>,
    },
}

impl ConversationState {
    pub fn is_pending(&self) -> bool {
        !matches!(self, ConversationState::None)
    }

    /// The action a "yes" would execute.
    pub fn pending_action(&self) -> Option<Action> {
        match self {
            ConversationState::WaitingConfirm { contact, message: Some(message) } => {
                Some(Action::Whatsapp {
                    contact: contact.clone(),
                    message: Some(message.clone()),
                })
            }
            ConversationState::WaitingConfirm { contact, message: None } => Some(Action::Call {
                contact: contact.clone(),
            }),
            _ => None,
        }
    }
}

/// Output of one dialogue step.
///
/// `reply` is the text to show or speak; `action` is what the caller must
/// execute now. Neither set means the utterance was not handled locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub state: ConversationState,
    pub reply: Option<String>,
    pub action: Option<Action>,
}

impl Turn {
    pub(crate) fn ask(state: ConversationState, question: String) -> Self {
        Self { state, reply: Some(question), action: None }
    }

    pub(crate) fn execute(action: Action) -> Self {
        Self { state: ConversationState::None, reply: None, action: Some(action) }
    }

    pub(crate) fn say(text: String) -> Self {
        Self { state: ConversationState::None, reply: Some(text), action: None }
    }

    pub(crate) fn unhandled() -> Self {
        Self { state: ConversationState::None, reply: None, action: None }
    }

    pub fn is_handled(&self) -> bool {
        self.reply.is_some() || self.action.is_some()
    }

    /// A question is open after this turn, so the next utterance answers it.
    pub fn expects_answer(&self) -> bool {
        self.state.is_pending()
    }
}
