use async_trait::async_trait;
use atlas::kernel::wake::phrases::{ACKNOWLEDGEMENT, FAREWELL, MICROPHONE_DENIED};
use atlas::kernel::wake::WakeTimings;
use atlas::notes::{InMemoryNoteStore, NoteStore};
use atlas::platform::{
    CommandRecognizer, DeviceCall, Permission, PhraseListener, Platform, RecognizerError,
    SimulatedPhone, SpeechOutput,
};
use atlas::services::model::ModelManager;
use atlas::session::{LocalResponder, VoiceDevices, VoiceSession};
use atlas::{DialogueStyle, WakeSessionController};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

/// Returns the n-th scripted phrase on the n-th call; `None` entries and
/// calls past the end never resolve.
struct ScriptedEars {
    script: Vec<Option<&'static str>>,
    next: AtomicUsize,
}

impl ScriptedEars {
    fn new(script: Vec<Option<&'static str>>) -> Self {
        Self { script, next: AtomicUsize::new(0) }
    }

    async fn hear(&self) -> String {
        let i = self.next.fetch_add(1, Ordering::SeqCst);
        match self.script.get(i).copied().flatten() {
            Some(text) => text.to_string(),
            None => std::future::pending().await,
        }
    }
}

#[async_trait]
impl PhraseListener for ScriptedEars {
    async fn load(&self, _model_dir: &Path) -> Result<(), RecognizerError> {
        Ok(())
    }

    async fn next_phrase(&self) -> Result<String, RecognizerError> {
        Ok(self.hear().await)
    }
}

#[async_trait]
impl CommandRecognizer for ScriptedEars {
    async fn capture(
        &self,
        on_ready: Box<dyn FnOnce() + Send>,
    ) -> Result<String, RecognizerError> {
        on_ready();
        Ok(self.hear().await)
    }
}

#[derive(Default)]
struct Transcript {
    spoken: Mutex<Vec<String>>,
}

#[async_trait]
impl SpeechOutput for Transcript {
    async fn speak(&self, text: &str) -> atlas::Result<()> {
        self.spoken.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

struct Rig {
    phone: Arc<SimulatedPhone>,
    speech: Arc<Transcript>,
    session: VoiceSession,
    _model_dir: TempDir,
}

fn rig(idle: Vec<Option<&'static str>>, commands: Vec<Option<&'static str>>) -> Rig {
    let phone = Arc::new(SimulatedPhone::new());
    let notes: Arc<Mutex<dyn NoteStore>> = Arc::new(Mutex::new(InMemoryNoteStore::new()));
    let responder = Arc::new(LocalResponder::from_platform(
        DialogueStyle::Voice,
        &Platform::simulated(phone.clone()),
        notes,
    ));

    let model_dir = TempDir::new().unwrap();
    std::fs::write(model_dir.path().join("vosk.conf"), "").unwrap();
    let models = ModelManager::new("http://127.0.0.1:1/unused.zip", model_dir.path().to_path_buf(), "vosk.conf");

    let speech = Arc::new(Transcript::default());
    let devices = VoiceDevices {
        listener: Arc::new(ScriptedEars::new(idle)),
        recognizer: Arc::new(ScriptedEars::new(commands)),
        speech: speech.clone(),
        streams: phone.clone(),
        permissions: phone.clone(),
    };
    let session = VoiceSession::new(
        WakeSessionController::new(WakeTimings::default()),
        responder,
        None,
        models,
        devices,
    );
    Rig { phone, speech, session, _model_dir: model_dir }
}

#[tokio::test]
async fn test_wake_command_and_stop() {
    // The idle listener keeps polling after a phrase, so the second call
    // stays pending until the task is replaced.
    let rig = rig(
        vec![Some("hey atlas"), None, Some("atlası kapat")],
        vec![Some("feneri aç")],
    );

    tokio::time::timeout(Duration::from_secs(5), rig.session.run(CancellationToken::new()))
        .await
        .expect("session should stop on its own");

    assert_eq!(
        *rig.speech.spoken.lock().unwrap(),
        vec![
            ACKNOWLEDGEMENT.to_string(),
            "🔦 Fener açıldı.".to_string(),
            FAREWELL.to_string(),
        ]
    );
    assert!(rig.phone.torch_on());
    assert!(!rig.phone.feedback_muted());

    let calls = rig.phone.calls();
    let mutes = calls.iter().filter(|c| **c == DeviceCall::MuteFeedback).count();
    let restores = calls.iter().filter(|c| **c == DeviceCall::RestoreFeedback).count();
    assert_eq!(mutes, 1);
    assert_eq!(restores, 1);
}

#[tokio::test]
async fn test_question_keeps_listening_for_answer() {
    let rig = rig(
        vec![Some("hey atlas"), None, Some("atlası kapat")],
        vec![Some("ahmete yaz"), Some("geliyorum"), Some("hayır")],
    );

    tokio::time::timeout(Duration::from_secs(5), rig.session.run(CancellationToken::new()))
        .await
        .expect("session should stop on its own");

    let spoken = rig.speech.spoken.lock().unwrap().clone();
    assert_eq!(spoken.len(), 5);
    assert_eq!(spoken[1], "Ahmet'a ne yazmamı istersin?");
    assert_eq!(spoken[2], "Ahmet'a \"geliyorum\" göndermemi ister misin?");
    assert_eq!(spoken[3], "Tamam, mesaj iptal edildi.");
    assert!(!rig.phone.feedback_muted());
}

#[tokio::test]
async fn test_missing_microphone_permission() {
    let rig = rig(vec![], vec![]);
    rig.phone.revoke(Permission::Microphone);

    tokio::time::timeout(Duration::from_secs(5), rig.session.run(CancellationToken::new()))
        .await
        .expect("session should stop on its own");

    assert_eq!(*rig.speech.spoken.lock().unwrap(), vec![MICROPHONE_DENIED.to_string()]);
}

#[tokio::test]
async fn test_cancellation_stops_idle_session() {
    let rig = rig(vec![], vec![]);
    let cancel = CancellationToken::new();
    let handle = tokio::spawn(rig.session.run(cancel.clone()));

    tokio::time::sleep(Duration::from_millis(300)).await;
    cancel.cancel();

    tokio::time::timeout(Duration::from_secs(2), handle)
        .await
        .expect("session should honour cancellation")
        .unwrap();
    assert!(rig.speech.spoken.lock().unwrap().is_empty());
    assert!(!rig.phone.feedback_muted());
}
