//! Background wake session on a terminal: each stdin line stands in for a
//! recognized phrase, and replies are printed instead of spoken.

use async_trait::async_trait;
use atlas::kernel::dialogue::DialogueStyle;
use atlas::notes::{InMemoryNoteStore, NoteStore};
use atlas::platform::{
    CommandRecognizer, InMemoryContactBook, PhraseListener, Platform, RecognizerError,
    SimulatedPhone, SpeechOutput, WavPlayer,
};
use atlas::services::backend::BackendClient;
use atlas::services::model::ModelManager;
use atlas::services::speech::{clean_for_speech, wav_duration, BackendSpeech};
use atlas::session::{LocalResponder, VoiceDevices, VoiceSession};
use atlas::{AtlasConfig, WakeSessionController};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, Mutex as AsyncMutex};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Both recognizers read the same stdin queue; only one listens at a time.
#[derive(Clone)]
struct ConsoleEars {
    lines: Arc<AsyncMutex<mpsc::UnboundedReceiver<String>>>,
}

impl ConsoleEars {
    async fn next_line(&self) -> Result<String, RecognizerError> {
        self.lines
            .lock()
            .await
            .recv()
            .await
            .ok_or_else(|| RecognizerError::Engine("stdin closed".to_string()))
    }
}

#[async_trait]
impl PhraseListener for ConsoleEars {
    async fn load(&self, model_dir: &Path) -> Result<(), RecognizerError> {
        tracing::debug!(dir = %model_dir.display(), "console listener needs no model");
        Ok(())
    }

    async fn next_phrase(&self) -> Result<String, RecognizerError> {
        self.next_line().await
    }
}

#[async_trait]
impl CommandRecognizer for ConsoleEars {
    async fn capture(
        &self,
        on_ready: Box<dyn FnOnce() + Send>,
    ) -> Result<String, RecognizerError> {
        println!("🎙️  (komut bekleniyor)");
        on_ready();
        self.next_line().await
    }
}

struct ConsoleVoice {
    max_chars: usize,
}

#[async_trait]
impl SpeechOutput for ConsoleVoice {
    async fn speak(&self, text: &str) -> atlas::Result<()> {
        println!("🔊 {}", clean_for_speech(text, self.max_chars));
        Ok(())
    }
}

#[async_trait]
impl WavPlayer for ConsoleVoice {
    async fn play(&self, wav: Vec<u8>) -> atlas::Result<()> {
        let length = wav_duration(&wav)?;
        println!("🔊 ({:.1} sn ses)", length.as_secs_f64());
        tokio::time::sleep(length).await;
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = AtlasConfig::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "config unreadable; using defaults");
        AtlasConfig::default()
    });
    let backend_voice = std::env::args().any(|arg| arg == "--backend-voice");

    let phone = Arc::new(SimulatedPhone::new().with_contacts(
        InMemoryContactBook::new()
            .with("Ahmet Yılmaz", "+90 532 111 22 33")
            .with("Annem", "+90 533 444 55 66"),
    ));
    let platform = Platform::simulated(phone.clone());
    let notes: Arc<Mutex<dyn NoteStore>> = Arc::new(Mutex::new(InMemoryNoteStore::new()));
    let responder = Arc::new(LocalResponder::from_platform(
        DialogueStyle::Voice,
        &platform,
        notes,
    ));
    let backend = (!config.backend.base_url.trim().is_empty())
        .then(|| BackendClient::new(&config.backend));

    let console = Arc::new(ConsoleVoice { max_chars: config.wake.speech_char_limit });
    let speech: Arc<dyn SpeechOutput> = match (&backend, backend_voice) {
        (Some(client), true) => Arc::new(BackendSpeech::new(
            client.clone(),
            console.clone(),
            console.clone(),
            config.wake.speech_char_limit,
        )),
        _ => console,
    };

    // The console listener reads no model files, so the directory only
    // needs its completion marker.
    let model_dir = AtlasConfig::data_dir().join("console-model");
    std::fs::create_dir_all(&model_dir)?;
    std::fs::write(model_dir.join(&config.wake.model_marker), b"")?;
    let models = ModelManager::from_config(&config.wake, model_dir);

    let (line_tx, line_rx) = mpsc::unbounded_channel();
    let ears = ConsoleEars { lines: Arc::new(AsyncMutex::new(line_rx)) };
    let devices = VoiceDevices {
        listener: Arc::new(ears.clone()),
        recognizer: Arc::new(ears),
        speech,
        streams: phone.clone(),
        permissions: phone,
    };

    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                if line_tx.send(line).is_err() {
                    break;
                }
            }
            cancel.cancel();
        }
    });
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        }
    });

    println!("\"Hey Atlas\" yazın, sonra komutu yazın. Kapatmak için \"Atlası kapat\".");
    let session = VoiceSession::new(
        WakeSessionController::new(config.wake.timings()),
        responder,
        backend,
        models,
        devices,
    );
    session.run(cancel).await;
    Ok(())
}
