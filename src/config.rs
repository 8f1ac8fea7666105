//! Runtime configuration.
//!
//! Loaded from `<config dir>/atlas/config.toml`; every field has a default so
//! a missing file or a partial file both work. `ATLAS_BASE_URL` and
//! `ATLAS_API_KEY` override the file.

use crate::error::ConfigError;
use crate::kernel::wake::WakeTimings;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const ENV_BASE_URL: &str = "ATLAS_BASE_URL";
pub const ENV_API_KEY: &str = "ATLAS_API_KEY";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AtlasConfig {
    pub backend: BackendConfig,
    pub chat: ChatConfig,
    pub wake: WakeConfig,
    pub notes: NotesConfig,
}

/// Remote PC backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub base_url: String,
    /// Sent as `X-API-Key` when non-empty.
    pub api_key: String,
    pub connect_timeout_secs: u64,
    pub read_timeout_secs: u64,
    /// Use `/chat/stream` first, falling back to `/chat`.
    pub streaming: bool,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://192.168.0.13:8766".to_string(),
            api_key: String::new(),
            connect_timeout_secs: 10,
            read_timeout_secs: 120,
            streaming: true,
        }
    }
}

impl BackendConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Minimum gap between streamed token updates.
    pub stream_throttle_ms: u64,
    pub history_limit: usize,
    /// A pending question older than this is dropped before the next turn.
    pub pending_expiry_secs: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            stream_throttle_ms: 50,
            history_limit: 100,
            pending_expiry_secs: 180,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WakeConfig {
    pub model_url: String,
    /// Directory name for the extracted model under the data dir.
    pub model_dir: String,
    /// File whose presence marks a complete extraction.
    pub model_marker: String,
    pub command_timeout_secs: u64,
    pub model_retry_secs: u64,
    pub corrupt_model_retry_secs: u64,
    pub idle_restart_base_secs: u64,
    pub idle_restart_cap_secs: u64,
    pub stop_delay_secs: u64,
    /// Max characters sent to text-to-speech.
    pub speech_char_limit: usize,
}

impl Default for WakeConfig {
    fn default() -> Self {
        Self {
            model_url: "https://alphacephei.com/vosk/models/vosk-model-small-tr-0.3.zip"
                .to_string(),
            model_dir: "vosk-model-tr".to_string(),
            model_marker: "vosk.conf".to_string(),
            command_timeout_secs: 12,
            model_retry_secs: 60,
            corrupt_model_retry_secs: 5,
            idle_restart_base_secs: 2,
            idle_restart_cap_secs: 30,
            stop_delay_secs: 3,
            speech_char_limit: 500,
        }
    }
}

impl WakeConfig {
    pub fn timings(&self) -> WakeTimings {
        WakeTimings {
            command_timeout: Duration::from_secs(self.command_timeout_secs),
            model_retry: Duration::from_secs(self.model_retry_secs),
            corrupt_model_retry: Duration::from_secs(self.corrupt_model_retry_secs),
            idle_restart_base: Duration::from_secs(self.idle_restart_base_secs),
            idle_restart_cap: Duration::from_secs(self.idle_restart_cap_secs),
            stop_delay: Duration::from_secs(self.stop_delay_secs),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NotesConfig {
    /// Notes JSON file; `None` uses the data dir.
    pub path: Option<PathBuf>,
}

impl AtlasConfig {
    /// `<config dir>/atlas/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("atlas").join("config.toml"))
    }

    /// `<data dir>/atlas`, holding notes and the offline model.
    pub fn data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("atlas")
    }

    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Reads `path`; a missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_toml(&text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Default location plus environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match Self::default_path() {
            Some(path) => Self::load_from(&path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(ENV_BASE_URL).filter(|v| !v.trim().is_empty()) {
            self.backend.base_url = url.trim().trim_end_matches('/').to_string();
        }
        if let Some(key) = lookup(ENV_API_KEY) {
            self.backend.api_key = key.trim().to_string();
        }
    }

    pub fn notes_path(&self) -> PathBuf {
        self.notes
            .path
            .clone()
            .unwrap_or_else(|| Self::data_dir().join("notes.json"))
    }

    pub fn model_path(&self) -> PathBuf {
        Self::data_dir().join(&self.wake.model_dir)
    }
}
