use serde::{Deserialize, Serialize};

/// A local action recognised in free-form text.
///
/// Built by [`IntentDetector`](super::IntentDetector) and consumed once by the
/// executor. Messaging carries `None` when the user has not dictated a body yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    FlashlightOn,
    FlashlightOff,
    Battery,
    Wifi,
    Camera,
    Note(String),
    MediaPlay,
    MediaPause,
    MediaNext,
    MediaPrev,
    Alarm {
        time: Option<AlarmTime>,
        period: Option<DayPeriod>,
    },
    Timer {
        seconds: u32,
    },
    Call {
        contact: String,
    },
    Whatsapp {
        contact: String,
        message: Option<String>,
    },
}

impl Action {
    /// Calls and outgoing messages never execute on the first turn.
    pub fn needs_confirmation(&self) -> bool {
        matches!(self, Action::Call { .. } | Action::Whatsapp { .. })
    }

    pub fn kind(&self) -> ActionKind {
        match self {
            Action::FlashlightOn | Action::FlashlightOff => ActionKind::Flashlight,
            Action::Battery => ActionKind::Battery,
            Action::Wifi => ActionKind::Wifi,
            Action::Camera => ActionKind::Camera,
            Action::Note(_) => ActionKind::Note,
            Action::MediaPlay | Action::MediaPause | Action::MediaNext | Action::MediaPrev => {
                ActionKind::Media
            }
            Action::Timer { .. } => ActionKind::Timer,
            Action::Alarm { .. } => ActionKind::Alarm,
            Action::Whatsapp { .. } => ActionKind::Message,
            Action::Call { .. } => ActionKind::Call,
        }
    }
}

/// Matcher families, listed in evaluation priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    Flashlight,
    Battery,
    Wifi,
    Camera,
    Note,
    Media,
    Timer,
    Alarm,
    Message,
    Call,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DayPeriod {
    Am,
    Pm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlarmTime {
    pub hour: u8,
    pub minute: u8,
}

impl AlarmTime {
    /// Applies a 12-hour period to the spoken hour. Without a period the hour
    /// is taken literally (24h clock).
    pub fn resolve(self, period: Option<DayPeriod>) -> AlarmTime {
        let hour = match period {
            Some(DayPeriod::Pm) if self.hour < 12 => self.hour + 12,
            Some(DayPeriod::Am) if self.hour == 12 => 0,
            _ => self.hour,
        };
        AlarmTime { hour, minute: self.minute }
    }
}
