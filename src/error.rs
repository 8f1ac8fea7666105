//! Error types for the assistant core.

/// A platform side effect that could not be performed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlatformError {
    #[error("permission denied: {0:?}")]
    PermissionDenied(crate::platform::Permission),

    /// Feature missing on this device (no torch, no app to handle the request).
    #[error("unavailable: {0}")]
    Unavailable(String),

    #[error("platform call failed: {0}")]
    Failed(String),
}

/// Backend request failure, categorised for user-facing messages.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("API key rejected")]
    Unauthorized,

    #[error("backend not ready")]
    Unavailable,

    #[error("cannot reach backend: {0}")]
    Connectivity(String),

    #[error("HTTP {0}")]
    Status(u16),

    #[error("malformed response: {0}")]
    Malformed(String),

    /// The backend answered with `success: false`.
    #[error("backend reported: {0}")]
    Remote(String),
}

impl BackendError {
    /// Short Turkish message shown or spoken in place of a reply.
    pub fn friendly_message(&self) -> String {
        match self {
            BackendError::Unauthorized => {
                "🔑 API anahtarı geçersiz. Ayarlardan güncelleyin.".to_string()
            }
            BackendError::Unavailable => {
                "⚠️ Sunucu henüz hazır değil. Biraz bekleyin.".to_string()
            }
            BackendError::Connectivity(_) => {
                "📡 Sunucuya bağlanılamıyor. PC açık ve aynı ağda mı?".to_string()
            }
            other => format!("❌ Sunucu hatası: {other}"),
        }
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() || e.is_connect() {
            BackendError::Connectivity(e.to_string())
        } else if e.is_decode() {
            BackendError::Malformed(e.to_string())
        } else if let Some(status) = e.status() {
            BackendError::from_status(status.as_u16())
        } else {
            BackendError::Connectivity(e.to_string())
        }
    }
}

impl BackendError {
    pub fn from_status(code: u16) -> Self {
        match code {
            401 | 403 => BackendError::Unauthorized,
            503 => BackendError::Unavailable,
            _ => BackendError::Status(code),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum NoteError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("note not found: {0}")]
    NotFound(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("download failed: {0}")]
    Download(String),

    #[error("archive error: {0}")]
    Archive(String),

    #[error("model incomplete: missing {0}")]
    Incomplete(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum AtlasError {
    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error(transparent)]
    Notes(#[from] NoteError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("speech error: {0}")]
    Speech(String),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, AtlasError>;
