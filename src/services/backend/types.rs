//! Wire types for the PC backend, plus adapters from the loosely shaped
//! JSON it returns to canonical structs. Missing or oddly named fields fall
//! back to defaults instead of failing the request.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Shown when `/chat` answers without any reply field.
pub const NO_REPLY: &str = "Yanıt alınamadı.";

#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest<'a> {
    pub message: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct TtsRequest<'a> {
    pub text: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct SttRequest {
    pub audio_base64: String,
    pub sample_rate: u32,
}

/// Outcome of a `/chat` body: a reply, or the backend's own error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatOutcome {
    Reply(String),
    Rejected(String),
}

impl ChatOutcome {
    /// `{response|reply|message}` or `{success: false, error}`.
    pub fn from_value(value: &Value) -> Self {
        if value.get("success").and_then(Value::as_bool) == Some(false) {
            let error = first_str(value, &["error", "message"]).unwrap_or("bilinmeyen hata");
            return ChatOutcome::Rejected(error.to_string());
        }
        let reply = first_str(value, &["response", "reply", "message"])
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .unwrap_or(NO_REPLY);
        ChatOutcome::Reply(reply.to_string())
    }
}

/// Transcript from `/stt` (`text` or `transcript`).
pub fn transcript_from(value: &Value) -> Option<String> {
    first_str(value, &["text", "transcript"])
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

/// Home device snapshot from `/durum`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceStatus {
    pub light_on: bool,
    pub light_brightness: u8,
    pub light_color: String,
    pub tv_connected: bool,
    pub ai_ready: bool,
}

impl Default for DeviceStatus {
    fn default() -> Self {
        Self {
            light_on: false,
            light_brightness: 100,
            light_color: "beyaz".to_string(),
            tv_connected: false,
            ai_ready: false,
        }
    }
}

impl DeviceStatus {
    /// Accepts both the Turkish and the English field names.
    pub fn from_value(value: &Value) -> Self {
        let defaults = Self::default();
        let light = value.get("ampul").or_else(|| value.get("light"));
        let tv = value.get("tv");
        let ai = value.get("ai");

        Self {
            light_on: light
                .and_then(|l| first_bool(l, &["acik", "on"]))
                .unwrap_or(defaults.light_on),
            light_brightness: light
                .and_then(|l| first_number(l, &["parlaklik", "brightness"]))
                .map(|b| b.clamp(0.0, 100.0).round() as u8)
                .unwrap_or(defaults.light_brightness),
            light_color: light
                .and_then(|l| first_str(l, &["renk", "color"]))
                .map(str::to_string)
                .unwrap_or(defaults.light_color),
            tv_connected: tv
                .and_then(|t| first_bool(t, &["bagli", "connected"]))
                .unwrap_or(defaults.tv_connected),
            ai_ready: ai
                .and_then(|a| first_bool(a, &["hazir", "ready"]))
                .unwrap_or(defaults.ai_ready),
        }
    }
}

/// Acknowledgement from a device control endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandAck {
    pub success: bool,
    pub message: Option<String>,
}

impl CommandAck {
    pub fn from_value(value: &Value) -> Self {
        Self {
            success: first_bool(value, &["success", "ok"]).unwrap_or(true),
            message: first_str(value, &["message", "mesaj", "error"]).map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LightCommand {
    On,
    Off,
    Status,
    Brightness(u8),
    Color { color: String, brightness: u8 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TvCommand {
    On,
    Off,
    VolumeUp,
    VolumeDown,
    Mute,
    Volume(u8),
    ChannelUp,
    ChannelDown,
    Channel(u16),
}

/// How a control command goes on the wire.
#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    Get(&'static str),
    Post(&'static str, Value),
}

impl LightCommand {
    pub fn route(&self) -> Route {
        match self {
            LightCommand::On => Route::Get("/tapo/ac"),
            LightCommand::Off => Route::Get("/tapo/kapat"),
            LightCommand::Status => Route::Get("/tapo/durum"),
            LightCommand::Brightness(level) => {
                Route::Post("/tapo/parlaklik", serde_json::json!({ "level": level }))
            }
            LightCommand::Color { color, brightness } => Route::Post(
                "/tapo/renk",
                serde_json::json!({ "renk": color, "parlaklik": brightness }),
            ),
        }
    }
}

impl TvCommand {
    pub fn route(&self) -> Route {
        match self {
            TvCommand::On => Route::Get("/tv/ac"),
            TvCommand::Off => Route::Get("/tv/kapat"),
            TvCommand::VolumeUp => Route::Get("/tv/ses/artir"),
            TvCommand::VolumeDown => Route::Get("/tv/ses/azalt"),
            TvCommand::Mute => Route::Get("/tv/sessiz"),
            TvCommand::Volume(level) => Route::Post("/tv/ses", serde_json::json!({ "seviye": level })),
            TvCommand::ChannelUp => Route::Get("/tv/kanal/artir"),
            TvCommand::ChannelDown => Route::Get("/tv/kanal/azalt"),
            TvCommand::Channel(n) => Route::Post("/tv/kanal", serde_json::json!({ "numara": n })),
        }
    }
}

fn first_str<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter().find_map(|k| value.get(*k).and_then(Value::as_str))
}

fn first_bool(value: &Value, keys: &[&str]) -> Option<bool> {
    keys.iter().find_map(|k| value.get(*k).and_then(Value::as_bool))
}

fn first_number(value: &Value, keys: &[&str]) -> Option<f64> {
    keys.iter().find_map(|k| value.get(*k).and_then(Value::as_f64))
}
