use super::responder::{LocalResponder, Response};
use crate::kernel::dialogue::ConversationState;
use crate::kernel::wake::{ModelFailure, WakeEffect, WakeInput, WakeSessionController};
use crate::platform::{
    AudioStreams, CommandRecognizer, Permission, PermissionGate, PhraseListener, RecognizerError,
    SpeechOutput,
};
use crate::services::backend::BackendClient;
use crate::services::model::ModelManager;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

const UNREACHABLE_REPLY: &str = "Üzgünüm, sunucuya bağlanamıyorum.";

/// Platform pieces the background session drives.
#[derive(Clone)]
pub struct VoiceDevices {
    pub listener: Arc<dyn PhraseListener>,
    pub recognizer: Arc<dyn CommandRecognizer>,
    pub speech: Arc<dyn SpeechOutput>,
    pub streams: Arc<dyn AudioStreams>,
    pub permissions: Arc<dyn PermissionGate>,
}

/// Keeps the feedback streams muted until released or dropped.
struct MuteGuard {
    streams: Arc<dyn AudioStreams>,
    engaged: bool,
}

impl MuteGuard {
    fn new(streams: Arc<dyn AudioStreams>) -> Self {
        Self { streams, engaged: false }
    }

    fn engage(&mut self) {
        if !self.engaged {
            self.streams.mute_feedback();
            self.engaged = true;
        }
    }

    fn release(&mut self) {
        if self.engaged {
            self.streams.restore_feedback();
            self.engaged = false;
        }
    }
}

impl Drop for MuteGuard {
    fn drop(&mut self) {
        self.release();
    }
}

#[derive(Default)]
struct Tasks {
    idle: Option<JoinHandle<()>>,
    capture: Option<JoinHandle<()>>,
    playback: Option<JoinHandle<()>>,
    work: Vec<JoinHandle<()>>,
}

impl Tasks {
    fn replace(slot: &mut Option<JoinHandle<()>>, handle: JoinHandle<()>) {
        if let Some(old) = slot.replace(handle) {
            old.abort();
        }
    }

    fn cancel(slot: &mut Option<JoinHandle<()>>) {
        if let Some(handle) = slot.take() {
            handle.abort();
        }
    }

    fn abort_all(&mut self) {
        Self::cancel(&mut self.idle);
        Self::cancel(&mut self.capture);
        Self::cancel(&mut self.playback);
        for handle in self.work.drain(..) {
            handle.abort();
        }
    }
}

/// Background wake session: runs [`WakeSessionController`] against the
/// platform, with its own conversation state separate from any chat.
pub struct VoiceSession {
    controller: WakeSessionController,
    responder: Arc<LocalResponder>,
    backend: Option<BackendClient>,
    models: ModelManager,
    http: reqwest::Client,
    devices: VoiceDevices,
    state: ConversationState,
}

impl VoiceSession {
    pub fn new(
        controller: WakeSessionController,
        responder: Arc<LocalResponder>,
        backend: Option<BackendClient>,
        models: ModelManager,
        devices: VoiceDevices,
    ) -> Self {
        Self {
            controller,
            responder,
            backend,
            models,
            http: reqwest::Client::new(),
            devices,
            state: ConversationState::None,
        }
    }

    /// Runs until a stop phrase, a fatal recognizer error, or `cancel`.
    /// Every task is aborted and the streams restored before returning.
    pub async fn run(mut self, cancel: CancellationToken) {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut tasks = Tasks::default();
        let mut mute = MuteGuard::new(self.devices.streams.clone());

        let mut cadence = tokio::time::interval(Duration::from_millis(100));
        cadence.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        let microphone_permitted = self.devices.permissions.is_granted(Permission::Microphone);
        let _ = tx.send(WakeInput::Start { microphone_permitted });

        info!("voice session started");
        loop {
            let cancelled = tokio::select! {
                _ = cancel.cancelled() => true,
                _ = cadence.tick() => false,
            };
            let now = std::time::Instant::now();

            // 1. Drain driver events
            let mut effects = Vec::new();
            if cancelled {
                effects.extend(self.controller.handle(WakeInput::StopRequested, now));
            }
            while let Ok(input) = rx.try_recv() {
                effects.extend(self.controller.handle(input, now));
            }

            // 2. Deadlines
            effects.extend(self.controller.poll(now));

            // 3. Side effects
            for effect in effects {
                self.execute(effect, &tx, &mut tasks, &mut mute);
            }
            tasks.work.retain(|h| !h.is_finished());

            if self.controller.is_stopped() {
                break;
            }
        }

        tasks.abort_all();
        mute.release();
        info!("voice session stopped");
    }

    fn execute(
        &mut self,
        effect: WakeEffect,
        tx: &UnboundedSender<WakeInput>,
        tasks: &mut Tasks,
        mute: &mut MuteGuard,
    ) {
        debug!(?effect, "wake effect");
        match effect {
            WakeEffect::PrepareModel => {
                let models = self.models.clone();
                let http = self.http.clone();
                let listener = self.devices.listener.clone();
                let tx = tx.clone();
                tasks.work.push(tokio::spawn(async move {
                    let input = prepare_model(&models, &http, listener.as_ref()).await;
                    let _ = tx.send(input);
                }));
            }
            WakeEffect::StartIdleListening => {
                let listener = self.devices.listener.clone();
                let tx = tx.clone();
                Tasks::replace(
                    &mut tasks.idle,
                    tokio::spawn(async move {
                        loop {
                            match listener.next_phrase().await {
                                Ok(text) => {
                                    if tx.send(WakeInput::IdleHeard(text)).is_err() {
                                        break;
                                    }
                                }
                                Err(e) => {
                                    debug!(error = %e, "idle recognizer stopped");
                                    let _ = tx.send(WakeInput::IdleFailed);
                                    break;
                                }
                            }
                        }
                    }),
                );
            }
            WakeEffect::StopIdleListening => Tasks::cancel(&mut tasks.idle),
            WakeEffect::Speak { text, .. } => {
                let speech = self.devices.speech.clone();
                let tx = tx.clone();
                Tasks::replace(
                    &mut tasks.playback,
                    tokio::spawn(async move {
                        if let Err(e) = speech.speak(&text).await {
                            warn!(error = %e, "speech playback failed");
                        }
                        let _ = tx.send(WakeInput::PlaybackFinished);
                    }),
                );
            }
            WakeEffect::CancelPlayback => Tasks::cancel(&mut tasks.playback),
            WakeEffect::MuteStreams => mute.engage(),
            WakeEffect::RestoreStreams => mute.release(),
            WakeEffect::StartCapture => {
                let recognizer = self.devices.recognizer.clone();
                let tx = tx.clone();
                Tasks::replace(
                    &mut tasks.capture,
                    tokio::spawn(async move {
                        let ready_tx = tx.clone();
                        let on_ready = Box::new(move || {
                            let _ = ready_tx.send(WakeInput::CaptureReady);
                        });
                        let input = match recognizer.capture(on_ready).await {
                            Ok(text) => WakeInput::CaptureResult(text),
                            Err(RecognizerError::PermissionDenied) => {
                                WakeInput::CaptureFailed { permission_denied: true }
                            }
                            Err(e) => {
                                debug!(error = %e, "capture failed");
                                WakeInput::CaptureFailed { permission_denied: false }
                            }
                        };
                        let _ = tx.send(input);
                    }),
                );
            }
            WakeEffect::CancelCapture => Tasks::cancel(&mut tasks.capture),
            WakeEffect::Process(text) => self.process(text, tx, tasks),
            WakeEffect::ResetConversation => self.state = ConversationState::None,
            WakeEffect::Shutdown => {
                tasks.abort_all();
                mute.release();
            }
        }
    }

    fn process(&mut self, text: String, tx: &UnboundedSender<WakeInput>, tasks: &mut Tasks) {
        match self.responder.respond(&mut self.state, &text) {
            Response::Local(reply) => {
                let _ = tx.send(WakeInput::Processed {
                    reply: reply.text,
                    expects_answer: reply.expects_answer,
                });
            }
            Response::Forward => {
                let backend = self.backend.clone();
                let tx = tx.clone();
                tasks.work.push(tokio::spawn(async move {
                    let reply = match backend {
                        Some(backend) => match backend.chat(&text).await {
                            Ok(reply) => reply,
                            Err(e) => {
                                warn!(error = %e, "voice chat request failed");
                                e.friendly_message()
                            }
                        },
                        None => UNREACHABLE_REPLY.to_string(),
                    };
                    let _ = tx.send(WakeInput::Processed { reply, expects_answer: false });
                }));
            }
        }
    }
}

async fn prepare_model(
    models: &ModelManager,
    http: &reqwest::Client,
    listener: &dyn PhraseListener,
) -> WakeInput {
    if let Err(e) = models.ensure(http).await {
        warn!(error = %e, "model acquisition failed");
        return WakeInput::ModelFailed(ModelFailure::Download);
    }
    match listener.load(models.dir()).await {
        Ok(()) => WakeInput::ModelReady,
        Err(e) => {
            warn!(error = %e, "model load failed; removing it");
            if let Err(e) = models.remove() {
                warn!(error = %e, "could not remove model");
            }
            WakeInput::ModelFailed(ModelFailure::Corrupt)
        }
    }
}
