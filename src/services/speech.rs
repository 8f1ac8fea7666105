//! Spoken replies: text cleanup, backend text-to-speech with a local
//! fallback voice.

use crate::error::AtlasError;
use crate::platform::{SpeechOutput, WavPlayer};
use crate::services::backend::BackendClient;
use async_trait::async_trait;
use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

pattern!(MARKUP, r"[*#`_~\[\]()]");
pattern!(PICTOGRAPH, r"[\p{Extended_Pictographic}\u{FE0F}\u{200D}]");
pattern!(SPACES, r"\s+");

/// Strips markdown and emoji, collapses whitespace and caps the length so the
/// voice reads only words.
pub fn clean_for_speech(text: &str, max_chars: usize) -> String {
    let mut out = text.to_string();
    for pattern in [&MARKUP, &PICTOGRAPH] {
        if let Some(re) = pattern.as_ref() {
            out = re.replace_all(&out, "").into_owned();
        }
    }
    if let Some(re) = SPACES.as_ref() {
        out = re.replace_all(&out, " ").into_owned();
    }
    out.trim().chars().take(max_chars).collect()
}

/// Playback length of a WAV payload; rejects anything that is not WAV.
pub fn wav_duration(bytes: &[u8]) -> Result<Duration, AtlasError> {
    let reader = hound::WavReader::new(Cursor::new(bytes))
        .map_err(|e| AtlasError::Speech(format!("invalid wav: {e}")))?;
    let spec = reader.spec();
    if spec.sample_rate == 0 {
        return Err(AtlasError::Speech("wav with zero sample rate".to_string()));
    }
    Ok(Duration::from_secs_f64(
        reader.duration() as f64 / spec.sample_rate as f64,
    ))
}

/// Speaks through the backend voice, falling back to the local engine when
/// the backend is unreachable or returns something unplayable.
pub struct BackendSpeech {
    backend: BackendClient,
    player: Arc<dyn WavPlayer>,
    fallback: Arc<dyn SpeechOutput>,
    max_chars: usize,
}

impl BackendSpeech {
    pub fn new(
        backend: BackendClient,
        player: Arc<dyn WavPlayer>,
        fallback: Arc<dyn SpeechOutput>,
        max_chars: usize,
    ) -> Self {
        Self { backend, player, fallback, max_chars }
    }

    async fn speak_remote(&self, text: &str) -> Result<(), AtlasError> {
        let wav = self.backend.tts(text).await?;
        let length = wav_duration(&wav)?;
        debug!(?length, "playing backend speech");
        self.player.play(wav).await
    }
}

#[async_trait]
impl SpeechOutput for BackendSpeech {
    async fn speak(&self, text: &str) -> crate::Result<()> {
        let clean = clean_for_speech(text, self.max_chars);
        if clean.is_empty() {
            return Ok(());
        }
        match self.speak_remote(&clean).await {
            Ok(()) => Ok(()),
            Err(e) => {
                warn!(error = %e, "backend speech failed; using local voice");
                self.fallback.speak(&clean).await
            }
        }
    }
}
