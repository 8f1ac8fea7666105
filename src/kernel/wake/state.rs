use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WakeState {
    /// Acquiring or loading the offline recognition model.
    Loading,
    /// Continuous low-power listening for a wake phrase.
    IdleWake,
    /// Acknowledging, then capturing one command.
    Command,
    /// Waiting for the turn pipeline to produce a reply.
    Processing,
    Speaking,
    /// Terminal.
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFailure {
    /// Download or extraction failed; retried after the long delay.
    Download,
    /// Files present but unusable; the driver deletes them and retries soon.
    Corrupt,
}

/// Events reported by the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WakeInput {
    Start { microphone_permitted: bool },
    ModelReady,
    ModelFailed(ModelFailure),
    /// Final result from the offline recognizer.
    IdleHeard(String),
    IdleFailed,
    /// One-shot recognizer started receiving audio.
    CaptureReady,
    CaptureResult(String),
    CaptureFailed { permission_denied: bool },
    Processed { reply: String, expects_answer: bool },
    PlaybackFinished,
    StopRequested,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeechPurpose {
    /// Short prompt before capture starts.
    Acknowledgement,
    Reply,
    /// Reply that opened a follow-up question; capture resumes right after.
    Question,
    Farewell,
}

/// Side effects for the driver to perform, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WakeEffect {
    PrepareModel,
    StartIdleListening,
    StopIdleListening,
    Speak { text: String, purpose: SpeechPurpose },
    CancelPlayback,
    MuteStreams,
    RestoreStreams,
    StartCapture,
    CancelCapture,
    Process(String),
    ResetConversation,
    Shutdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WakeTimings {
    pub command_timeout: Duration,
    pub model_retry: Duration,
    pub corrupt_model_retry: Duration,
    pub idle_restart_base: Duration,
    pub idle_restart_cap: Duration,
    pub stop_delay: Duration,
}

impl Default for WakeTimings {
    fn default() -> Self {
        Self {
            command_timeout: Duration::from_secs(12),
            model_retry: Duration::from_secs(60),
            corrupt_model_retry: Duration::from_secs(5),
            idle_restart_base: Duration::from_secs(2),
            idle_restart_cap: Duration::from_secs(30),
            stop_delay: Duration::from_secs(3),
        }
    }
}

impl WakeTimings {
    /// Exponential backoff for the n-th consecutive idle recognizer failure.
    pub fn idle_backoff(&self, failures: u32) -> Duration {
        let shift = failures.saturating_sub(1).min(16);
        self.idle_restart_base
            .saturating_mul(1u32 << shift)
            .min(self.idle_restart_cap)
    }
}
