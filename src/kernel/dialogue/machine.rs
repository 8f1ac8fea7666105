use super::prompts::DialogueStyle;
use super::state::{ConversationState, Turn};
use crate::kernel::intent::{Action, IntentDetector};
use crate::kernel::text::{is_match, normalize};

pattern!(SEND_YES, r"^(?:evet|gönder|göndersene|yolla|tamam|olur|yap|ok)\b");
pattern!(CALL_YES, r"^(?:evet|ara|tamam|olur|yap|ok)\b");
pattern!(ANSWER_NO, r"^(?:hayır|iptal|vazgeç|dur|istemiyorum|gerek\s*yok|yok|olmaz)\b");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Yes,
    No,
    Unclear,
}

/// Reads a yes/no reply. Calls also accept "ara", messages "gönder"/"yolla".
pub fn classify_answer(utterance: &str, for_call: bool) -> Answer {
    let text = normalize(utterance);
    let yes = if for_call { &CALL_YES } else { &SEND_YES };
    if is_match(yes, &text) {
        Answer::Yes
    } else if is_match(&ANSWER_NO, &text) {
        Answer::No
    } else {
        Answer::Unclear
    }
}

/// The per-session confirmation protocol for calls and messages.
///
/// Holds no state itself: each session owns a [`ConversationState`] and
/// threads it through [`process_turn`](Self::process_turn).
#[derive(Debug, Clone, Copy)]
pub struct ConversationMachine {
    detector: IntentDetector,
    style: DialogueStyle,
}

impl ConversationMachine {
    pub fn new(style: DialogueStyle) -> Self {
        Self { detector: IntentDetector::new(), style }
    }

    pub fn style(&self) -> DialogueStyle {
        self.style
    }

    pub fn process_turn(&self, state: &ConversationState, utterance: &str) -> Turn {
        match state {
            ConversationState::None => self.start(utterance),
            ConversationState::WaitingMessage { contact } => self.take_message(contact, utterance),
            ConversationState::WaitingConfirm { contact, message } => {
                self.confirm(state, contact, message.as_deref(), utterance)
            }
        }
    }

    fn start(&self, utterance: &str) -> Turn {
        match self.detector.detect(utterance) {
            Some(Action::Whatsapp { contact, message: None }) => {
                let question = self.style.ask_message(&contact);
                Turn::ask(ConversationState::WaitingMessage { contact }, question)
            }
            Some(Action::Whatsapp { contact, message: Some(message) }) => {
                let question = self.style.confirm_message(&contact, &message);
                Turn::ask(
                    ConversationState::WaitingConfirm { contact, message: Some(message) },
                    question,
                )
            }
            Some(Action::Call { contact }) => {
                let question = self.style.confirm_call(&contact);
                Turn::ask(ConversationState::WaitingConfirm { contact, message: None }, question)
            }
            Some(action) => Turn::execute(action),
            None => Turn::unhandled(),
        }
    }

    /// The whole utterance is the body; it is not re-classified.
    fn take_message(&self, contact: &str, utterance: &str) -> Turn {
        let body = utterance.trim();
        if body.is_empty() {
            return Turn::ask(
                ConversationState::WaitingMessage { contact: contact.to_string() },
                self.style.empty_message(),
            );
        }
        Turn::ask(
            ConversationState::WaitingConfirm {
                contact: contact.to_string(),
                message: Some(body.to_string()),
            },
            self.style.confirm_message(contact, body),
        )
    }

    fn confirm(
        &self,
        state: &ConversationState,
        contact: &str,
        message: Option<&str>,
        utterance: &str,
    ) -> Turn {
        let for_call = message.is_none();
        match classify_answer(utterance, for_call) {
            Answer::Yes => match state.pending_action() {
                Some(action) => Turn::execute(action),
                None => Turn::unhandled(),
            },
            Answer::No if for_call => Turn::say(self.style.call_cancelled()),
            Answer::No => Turn::say(self.style.message_cancelled()),
            Answer::Unclear => {
                // A fresh local command replaces the open question.
                let fresh = self.start(utterance);
                if fresh.is_handled() {
                    tracing::debug!("pending confirmation superseded");
                    return fresh;
                }
                let question = match message {
                    Some(message) => self.style.confirm_message(contact, message),
                    None => self.style.confirm_call(contact),
                };
                Turn::ask(state.clone(), self.style.not_understood(&question))
            }
        }
    }
}
