use async_trait::async_trait;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecognizerError {
    /// Microphone permission revoked; the session cannot continue.
    #[error("recognizer permission denied")]
    PermissionDenied,

    #[error("recognizer error: {0}")]
    Engine(String),
}

/// Offline continuous recognizer used while idle. Each call resolves with the
/// next final phrase.
#[async_trait]
pub trait PhraseListener: Send + Sync {
    /// Loads the extracted model; an error means the files are unusable.
    async fn load(&self, model_dir: &Path) -> Result<(), RecognizerError>;

    async fn next_phrase(&self) -> Result<String, RecognizerError>;
}

/// One-shot high-accuracy recognizer used for a command.
#[async_trait]
pub trait CommandRecognizer: Send + Sync {
    /// `on_ready` fires once audio actually starts flowing.
    async fn capture(
        &self,
        on_ready: Box<dyn FnOnce() + Send>,
    ) -> Result<String, RecognizerError>;
}

#[async_trait]
pub trait SpeechOutput: Send + Sync {
    /// Resolves when playback has finished.
    async fn speak(&self, text: &str) -> crate::Result<()>;
}

/// Plays a WAV payload, resolving when playback ends.
#[async_trait]
pub trait WavPlayer: Send + Sync {
    async fn play(&self, wav: Vec<u8>) -> crate::Result<()>;
}

/// The system feedback streams (beeps, notification, ring, DTMF) silenced
/// while a command is captured.
pub trait AudioStreams: Send + Sync {
    fn mute_feedback(&self);
    fn restore_feedback(&self);
}
