use crate::actions::{ActionExecutor, ActionReport, AppLauncher};
use crate::kernel::apps::AppLaunchDetector;
use crate::kernel::dialogue::{ConversationMachine, ConversationState, DialogueStyle};
use crate::notes::NoteStore;
use crate::platform::Platform;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// A reply produced on the device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalReply {
    pub text: String,
    /// A question is open; the next utterance answers it.
    pub expects_answer: bool,
    /// Set when an action or app launch actually ran.
    pub report: Option<ActionReport>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Local(LocalReply),
    /// Not a local command (or a TV app request); send to the backend chat.
    Forward,
}

/// The local half of a turn, shared by chat and voice sessions: pending
/// question first, then local actions, then phone app launches.
pub struct LocalResponder {
    machine: ConversationMachine,
    apps: AppLaunchDetector,
    executor: Arc<ActionExecutor>,
    launcher: AppLauncher,
}

impl LocalResponder {
    pub fn new(style: DialogueStyle, executor: Arc<ActionExecutor>, launcher: AppLauncher) -> Self {
        Self {
            machine: ConversationMachine::new(style),
            apps: AppLaunchDetector::new(),
            executor,
            launcher,
        }
    }

    /// Wires an executor and launcher over one platform.
    pub fn from_platform(
        style: DialogueStyle,
        platform: &Platform,
        notes: Arc<Mutex<dyn NoteStore>>,
    ) -> Self {
        let executor = Arc::new(ActionExecutor::new(platform, notes));
        Self::new(style, executor, AppLauncher::new(platform.apps.clone()))
    }

    /// Applies one utterance to the session's `state`.
    pub fn respond(&self, state: &mut ConversationState, utterance: &str) -> Response {
        let turn = self.machine.process_turn(state, utterance);
        *state = turn.state.clone();

        if let Some(action) = &turn.action {
            let report = self.executor.run(action);
            return Response::Local(LocalReply {
                text: report.text.clone(),
                expects_answer: false,
                report: Some(report),
            });
        }
        if let Some(reply) = turn.reply {
            return Response::Local(LocalReply {
                text: reply,
                expects_answer: state.is_pending(),
                report: None,
            });
        }

        match self.apps.detect(utterance) {
            Some(intent) if intent.runs_locally() => {
                let report = self.launcher.launch(&intent);
                Response::Local(LocalReply {
                    text: report.text.clone(),
                    expects_answer: false,
                    report: Some(report),
                })
            }
            Some(intent) => {
                debug!(app = intent.key, context = ?intent.context, "app request forwarded");
                Response::Forward
            }
            None => Response::Forward,
        }
    }
}
