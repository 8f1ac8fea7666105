use atlas::kernel::wake::phrases::{ACKNOWLEDGEMENT, FAREWELL, MICROPHONE_DENIED};
use atlas::kernel::wake::{
    classify_phrase, ModelFailure, Phrase, SpeechPurpose, WakeEffect, WakeInput, WakeState,
    WakeTimings,
};
use atlas::WakeSessionController;
use std::time::{Duration, Instant};

fn count(effects: &[WakeEffect], wanted: &WakeEffect) -> usize {
    effects.iter().filter(|e| *e == wanted).count()
}

/// Drives a fresh controller to the point where a command is being captured.
fn capturing(now: Instant) -> (WakeSessionController, Vec<WakeEffect>) {
    let mut controller = WakeSessionController::new(WakeTimings::default());
    let mut log = Vec::new();
    log.extend(controller.handle(WakeInput::Start { microphone_permitted: true }, now));
    log.extend(controller.handle(WakeInput::ModelReady, now));
    log.extend(controller.handle(WakeInput::IdleHeard("hey atlas".into()), now));
    log.extend(controller.handle(WakeInput::PlaybackFinished, now));
    (controller, log)
}

#[test]
fn test_wake_phrase_to_capture() {
    let now = Instant::now();
    let (controller, log) = capturing(now);

    assert_eq!(controller.state(), WakeState::Command);
    assert!(controller.is_muted());
    assert!(log.contains(&WakeEffect::PrepareModel));
    assert!(log.contains(&WakeEffect::StopIdleListening));
    assert!(log.contains(&WakeEffect::ResetConversation));
    assert!(log.contains(&WakeEffect::Speak {
        text: ACKNOWLEDGEMENT.to_string(),
        purpose: SpeechPurpose::Acknowledgement,
    }));
    assert_eq!(count(&log, &WakeEffect::MuteStreams), 1);
    assert_eq!(log.last(), Some(&WakeEffect::StartCapture));
}

#[test]
fn test_capture_result_processed_and_spoken() {
    let now = Instant::now();
    let (mut controller, _) = capturing(now);

    let effects = controller.handle(WakeInput::CaptureReady, now);
    assert_eq!(effects, vec![WakeEffect::RestoreStreams]);
    assert!(!controller.is_muted());

    let effects = controller.handle(WakeInput::CaptureResult(" feneri aç ".into()), now);
    assert!(effects.contains(&WakeEffect::CancelCapture));
    assert!(effects.contains(&WakeEffect::Process("feneri aç".into())));
    // already restored once; never twice
    assert_eq!(count(&effects, &WakeEffect::RestoreStreams), 0);
    assert_eq!(controller.state(), WakeState::Processing);

    let effects = controller.handle(
        WakeInput::Processed { reply: "🔦 Fener açıldı.".into(), expects_answer: false },
        now,
    );
    assert_eq!(controller.state(), WakeState::Speaking);
    assert!(matches!(
        effects.as_slice(),
        [WakeEffect::Speak { purpose: SpeechPurpose::Reply, .. }]
    ));

    let effects = controller.handle(WakeInput::PlaybackFinished, now);
    assert_eq!(effects, vec![WakeEffect::StartIdleListening]);
    assert_eq!(controller.state(), WakeState::IdleWake);
}

#[test]
fn test_question_reply_resumes_capture() {
    let now = Instant::now();
    let (mut controller, _) = capturing(now);
    controller.handle(WakeInput::CaptureResult("ahmete yaz".into()), now);
    controller.handle(
        WakeInput::Processed { reply: "Ahmet'a ne yazmamı istersin?".into(), expects_answer: true },
        now,
    );

    let effects = controller.handle(WakeInput::PlaybackFinished, now);
    assert_eq!(effects, vec![WakeEffect::MuteStreams, WakeEffect::StartCapture]);
    assert_eq!(controller.state(), WakeState::Command);
}

#[test]
fn test_command_timeout_restores_exactly_once() {
    let now = Instant::now();
    let (mut controller, log) = capturing(now);
    assert_eq!(count(&log, &WakeEffect::MuteStreams), 1);

    assert!(controller.poll(now + Duration::from_secs(11)).is_empty());

    let effects = controller.poll(now + Duration::from_secs(12));
    assert_eq!(count(&effects, &WakeEffect::RestoreStreams), 1);
    assert!(effects.contains(&WakeEffect::CancelCapture));
    assert!(effects.contains(&WakeEffect::StartIdleListening));
    assert_eq!(controller.state(), WakeState::IdleWake);

    // late result from the cancelled capture is ignored
    let effects = controller.handle(WakeInput::CaptureResult("geç kaldım".into()), now);
    assert!(effects.is_empty());
    assert!(controller.poll(now + Duration::from_secs(30)).is_empty());
}

#[test]
fn test_capture_failure_paths() {
    let now = Instant::now();
    let (mut controller, _) = capturing(now);
    let effects = controller.handle(WakeInput::CaptureFailed { permission_denied: false }, now);
    assert_eq!(count(&effects, &WakeEffect::RestoreStreams), 1);
    assert_eq!(controller.state(), WakeState::IdleWake);

    let (mut controller, _) = capturing(now);
    let effects = controller.handle(WakeInput::CaptureFailed { permission_denied: true }, now);
    assert_eq!(count(&effects, &WakeEffect::RestoreStreams), 1);
    assert_eq!(effects.last(), Some(&WakeEffect::Shutdown));
    assert!(controller.is_stopped());
}

#[test]
fn test_empty_capture_returns_to_idle() {
    let now = Instant::now();
    let (mut controller, _) = capturing(now);
    let effects = controller.handle(WakeInput::CaptureResult("  ".into()), now);
    assert!(effects.contains(&WakeEffect::StartIdleListening));
    assert!(!effects.iter().any(|e| matches!(e, WakeEffect::Process(_))));
}

#[test]
fn test_stop_phrase_says_farewell_then_stops() {
    let now = Instant::now();
    let mut controller = WakeSessionController::new(WakeTimings::default());
    controller.handle(WakeInput::Start { microphone_permitted: true }, now);
    controller.handle(WakeInput::ModelReady, now);

    let effects = controller.handle(WakeInput::IdleHeard("atlası kapat".into()), now);
    assert!(effects.contains(&WakeEffect::Speak {
        text: FAREWELL.to_string(),
        purpose: SpeechPurpose::Farewell,
    }));
    assert!(!controller.is_stopped());

    let effects = controller.handle(WakeInput::PlaybackFinished, now);
    assert_eq!(effects.last(), Some(&WakeEffect::Shutdown));
    assert!(controller.is_stopped());

    // terminal
    assert!(controller.handle(WakeInput::ModelReady, now).is_empty());
}

#[test]
fn test_farewell_deadline_stops_without_playback_end() {
    let now = Instant::now();
    let mut controller = WakeSessionController::new(WakeTimings::default());
    controller.handle(WakeInput::Start { microphone_permitted: true }, now);
    controller.handle(WakeInput::ModelReady, now);
    controller.handle(WakeInput::IdleHeard("kendini kapat".into()), now);

    assert_eq!(controller.next_deadline(), Some(now + Duration::from_secs(3)));
    let effects = controller.poll(now + Duration::from_secs(3));
    assert!(effects.contains(&WakeEffect::CancelPlayback));
    assert!(controller.is_stopped());
}

#[test]
fn test_microphone_denied_at_start() {
    let now = Instant::now();
    let mut controller = WakeSessionController::new(WakeTimings::default());
    let effects = controller.handle(WakeInput::Start { microphone_permitted: false }, now);
    assert_eq!(
        effects,
        vec![WakeEffect::Speak {
            text: MICROPHONE_DENIED.to_string(),
            purpose: SpeechPurpose::Farewell,
        }]
    );
}

#[test]
fn test_model_failures_retry() {
    let now = Instant::now();
    let mut controller = WakeSessionController::new(WakeTimings::default());
    controller.handle(WakeInput::Start { microphone_permitted: true }, now);

    controller.handle(WakeInput::ModelFailed(ModelFailure::Download), now);
    assert!(controller.poll(now + Duration::from_secs(59)).is_empty());
    assert_eq!(
        controller.poll(now + Duration::from_secs(60)),
        vec![WakeEffect::PrepareModel]
    );

    controller.handle(WakeInput::ModelFailed(ModelFailure::Corrupt), now);
    assert_eq!(
        controller.poll(now + Duration::from_secs(5)),
        vec![WakeEffect::PrepareModel]
    );
}

#[test]
fn test_idle_failures_back_off() {
    let timings = WakeTimings::default();
    assert_eq!(timings.idle_backoff(1), Duration::from_secs(2));
    assert_eq!(timings.idle_backoff(2), Duration::from_secs(4));
    assert_eq!(timings.idle_backoff(4), Duration::from_secs(16));
    assert_eq!(timings.idle_backoff(10), Duration::from_secs(30));

    let now = Instant::now();
    let mut controller = WakeSessionController::new(timings);
    controller.handle(WakeInput::Start { microphone_permitted: true }, now);
    controller.handle(WakeInput::ModelReady, now);
    controller.handle(WakeInput::IdleFailed, now);
    assert!(controller.poll(now + Duration::from_secs(1)).is_empty());
    assert_eq!(
        controller.poll(now + Duration::from_secs(2)),
        vec![WakeEffect::StartIdleListening]
    );

    // a heard phrase resets the count
    controller.handle(WakeInput::IdleHeard("merhaba".into()), now);
    controller.handle(WakeInput::IdleFailed, now);
    assert_eq!(controller.next_deadline(), Some(now + Duration::from_secs(2)));
}

#[test]
fn test_stop_request_mid_capture() {
    let now = Instant::now();
    let (mut controller, _) = capturing(now);
    let effects = controller.handle(WakeInput::StopRequested, now);
    assert_eq!(count(&effects, &WakeEffect::RestoreStreams), 1);
    assert!(effects.contains(&WakeEffect::CancelCapture));
    assert_eq!(effects.last(), Some(&WakeEffect::Shutdown));
    assert!(controller.is_stopped());
}

#[test]
fn test_phrase_classification() {
    assert_eq!(classify_phrase("Hey Atlas"), Some(Phrase::Wake));
    assert_eq!(classify_phrase("merhaba atlas nasılsın"), Some(Phrase::Wake));
    assert_eq!(classify_phrase("atlası kapat"), Some(Phrase::Stop));
    assert_eq!(classify_phrase("servisi durdur"), Some(Phrase::Stop));
    assert_eq!(classify_phrase("bugün hava güzel"), None);
}
