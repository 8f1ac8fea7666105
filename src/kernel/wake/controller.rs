use super::phrases::{self, Phrase};
use super::state::{ModelFailure, SpeechPurpose, WakeEffect, WakeInput, WakeState, WakeTimings};
use std::time::Instant;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Retry {
    Model,
    IdleListening,
}

/// Background listening state machine.
///
/// Pure reducer: the driver feeds [`WakeInput`]s plus the current time and
/// performs the returned effects. Deadlines are checked by [`poll`](Self::poll).
///
/// Mute pairing: every `MuteStreams` is followed by exactly one
/// `RestoreStreams`, on whichever exit path comes first.
#[derive(Debug)]
pub struct WakeSessionController {
    state: WakeState,
    timings: WakeTimings,
    speaking: Option<SpeechPurpose>,
    muted: bool,
    capturing: bool,
    command_deadline: Option<Instant>,
    retry: Option<(Instant, Retry)>,
    stop_deadline: Option<Instant>,
    idle_failures: u32,
}

impl WakeSessionController {
    pub fn new(timings: WakeTimings) -> Self {
        Self {
            state: WakeState::Loading,
            timings,
            speaking: None,
            muted: false,
            capturing: false,
            command_deadline: None,
            retry: None,
            stop_deadline: None,
            idle_failures: 0,
        }
    }

    pub fn state(&self) -> WakeState {
        self.state
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn is_stopped(&self) -> bool {
        self.state == WakeState::Stopped
    }

    /// Earliest pending deadline, for drivers that sleep instead of ticking.
    pub fn next_deadline(&self) -> Option<Instant> {
        [
            self.command_deadline,
            self.retry.map(|(at, _)| at),
            self.stop_deadline,
        ]
        .into_iter()
        .flatten()
        .min()
    }

    pub fn handle(&mut self, input: WakeInput, now: Instant) -> Vec<WakeEffect> {
        if self.is_stopped() {
            debug!(?input, "wake controller stopped; input ignored");
            return Vec::new();
        }

        let mut effects = Vec::new();
        match input {
            WakeInput::Start { microphone_permitted } => {
                if microphone_permitted {
                    self.state = WakeState::Loading;
                    effects.push(WakeEffect::PrepareModel);
                } else {
                    warn!("microphone permission missing; shutting down");
                    self.farewell(phrases::MICROPHONE_DENIED, now, &mut effects);
                }
            }

            WakeInput::ModelReady if self.state == WakeState::Loading => {
                info!("offline model ready; listening for wake phrase");
                self.enter_idle(&mut effects);
            }

            WakeInput::ModelFailed(failure) if self.state == WakeState::Loading => {
                let delay = match failure {
                    ModelFailure::Download => self.timings.model_retry,
                    ModelFailure::Corrupt => self.timings.corrupt_model_retry,
                };
                warn!(?failure, retry_in = ?delay, "offline model unavailable");
                self.retry = Some((now + delay, Retry::Model));
            }

            WakeInput::IdleHeard(text) if self.state == WakeState::IdleWake => {
                self.idle_failures = 0;
                match phrases::classify(&text) {
                    Some(Phrase::Stop) => {
                        info!("stop phrase heard");
                        effects.push(WakeEffect::StopIdleListening);
                        self.farewell(phrases::FAREWELL, now, &mut effects);
                    }
                    Some(Phrase::Wake) => {
                        info!("wake phrase heard");
                        effects.push(WakeEffect::StopIdleListening);
                        effects.push(WakeEffect::ResetConversation);
                        self.state = WakeState::Command;
                        self.speak(phrases::ACKNOWLEDGEMENT, SpeechPurpose::Acknowledgement, &mut effects);
                    }
                    None => {}
                }
            }

            WakeInput::IdleFailed if self.state == WakeState::IdleWake => {
                self.idle_failures += 1;
                let delay = self.timings.idle_backoff(self.idle_failures);
                debug!(failures = self.idle_failures, retry_in = ?delay, "idle recognizer failed");
                self.retry = Some((now + delay, Retry::IdleListening));
            }

            WakeInput::CaptureReady if self.capturing => {
                self.restore(&mut effects);
            }

            WakeInput::CaptureResult(text) if self.capturing => {
                self.end_capture(&mut effects);
                let text = text.trim().to_string();
                if text.is_empty() {
                    debug!("empty capture; back to idle");
                    self.enter_idle(&mut effects);
                } else if phrases::is_stop(&text) {
                    info!("stop command captured");
                    self.farewell(phrases::FAREWELL, now, &mut effects);
                } else {
                    self.state = WakeState::Processing;
                    effects.push(WakeEffect::Process(text));
                }
            }

            WakeInput::CaptureFailed { permission_denied } if self.capturing => {
                self.end_capture(&mut effects);
                if permission_denied {
                    warn!("recognizer permission denied; terminating session");
                    self.shutdown(&mut effects);
                } else {
                    debug!("capture failed; back to idle");
                    self.enter_idle(&mut effects);
                }
            }

            WakeInput::Processed { reply, expects_answer } if self.state == WakeState::Processing => {
                let purpose = if expects_answer {
                    SpeechPurpose::Question
                } else {
                    SpeechPurpose::Reply
                };
                self.state = WakeState::Speaking;
                self.speak(&reply, purpose, &mut effects);
            }

            WakeInput::PlaybackFinished => match self.speaking.take() {
                Some(SpeechPurpose::Acknowledgement) | Some(SpeechPurpose::Question) => {
                    self.begin_capture(now, &mut effects);
                }
                Some(SpeechPurpose::Reply) => self.enter_idle(&mut effects),
                Some(SpeechPurpose::Farewell) => self.shutdown(&mut effects),
                None => debug!("playback finished with nothing playing"),
            },

            WakeInput::StopRequested => {
                info!("stop requested");
                self.shutdown(&mut effects);
            }

            other => debug!(?other, state = ?self.state, "input ignored in this state"),
        }
        effects
    }

    /// Fires whichever deadlines have passed.
    pub fn poll(&mut self, now: Instant) -> Vec<WakeEffect> {
        let mut effects = Vec::new();
        if self.is_stopped() {
            return effects;
        }

        if self.stop_deadline.is_some_and(|at| now >= at) {
            self.shutdown(&mut effects);
            return effects;
        }

        if self.command_deadline.is_some_and(|at| now >= at) {
            info!("command capture timed out");
            self.end_capture(&mut effects);
            self.enter_idle(&mut effects);
        }

        if let Some((at, retry)) = self.retry {
            if now >= at {
                self.retry = None;
                match retry {
                    Retry::Model if self.state == WakeState::Loading => {
                        effects.push(WakeEffect::PrepareModel);
                    }
                    Retry::IdleListening if self.state == WakeState::IdleWake => {
                        effects.push(WakeEffect::StartIdleListening);
                    }
                    _ => {}
                }
            }
        }
        effects
    }

    fn enter_idle(&mut self, effects: &mut Vec<WakeEffect>) {
        self.state = WakeState::IdleWake;
        effects.push(WakeEffect::StartIdleListening);
    }

    fn speak(&mut self, text: &str, purpose: SpeechPurpose, effects: &mut Vec<WakeEffect>) {
        self.speaking = Some(purpose);
        effects.push(WakeEffect::Speak { text: text.to_string(), purpose });
    }

    fn farewell(&mut self, text: &str, now: Instant, effects: &mut Vec<WakeEffect>) {
        self.state = WakeState::Speaking;
        self.stop_deadline = Some(now + self.timings.stop_delay);
        self.speak(text, SpeechPurpose::Farewell, effects);
    }

    fn begin_capture(&mut self, now: Instant, effects: &mut Vec<WakeEffect>) {
        self.state = WakeState::Command;
        if !self.muted {
            self.muted = true;
            effects.push(WakeEffect::MuteStreams);
        }
        self.capturing = true;
        self.command_deadline = Some(now + self.timings.command_timeout);
        effects.push(WakeEffect::StartCapture);
    }

    /// Closes the capture on every exit path: result, failure, timeout, stop.
    fn end_capture(&mut self, effects: &mut Vec<WakeEffect>) {
        if self.capturing {
            self.capturing = false;
            effects.push(WakeEffect::CancelCapture);
        }
        self.command_deadline = None;
        self.restore(effects);
    }

    fn restore(&mut self, effects: &mut Vec<WakeEffect>) {
        if self.muted {
            self.muted = false;
            effects.push(WakeEffect::RestoreStreams);
        }
    }

    fn shutdown(&mut self, effects: &mut Vec<WakeEffect>) {
        self.end_capture(effects);
        if self.speaking.take().is_some() {
            effects.push(WakeEffect::CancelPlayback);
        }
        if matches!(self.state, WakeState::IdleWake) {
            effects.push(WakeEffect::StopIdleListening);
        }
        self.retry = None;
        self.stop_deadline = None;
        self.state = WakeState::Stopped;
        effects.push(WakeEffect::Shutdown);
    }
}
