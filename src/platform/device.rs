use crate::error::PlatformError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaKey {
    Play,
    Pause,
    Next,
    Previous,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatteryStatus {
    /// 0..=100
    pub level: u8,
    pub charging: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WifiStatus {
    pub enabled: bool,
    pub ssid: Option<String>,
    pub rssi_dbm: i32,
}

impl WifiStatus {
    pub fn quality(&self) -> &'static str {
        match self.rssi_dbm {
            r if r >= -50 => "Mükemmel",
            r if r >= -60 => "İyi",
            r if r >= -70 => "Orta",
            _ => "Zayıf",
        }
    }
}

/// Device-local side effects. Repeating a call in the same state is a no-op
/// at the hardware layer (turning an already lit torch on succeeds).
pub trait DeviceActions: Send + Sync {
    fn set_torch(&self, on: bool) -> Result<(), PlatformError>;
    fn battery(&self) -> Result<BatteryStatus, PlatformError>;
    fn wifi(&self) -> Result<WifiStatus, PlatformError>;
    fn open_camera(&self) -> Result<(), PlatformError>;
    fn send_media_key(&self, key: MediaKey) -> Result<(), PlatformError>;
    /// Sets an alarm without showing the clock UI.
    fn set_alarm(&self, hour: u8, minute: u8) -> Result<(), PlatformError>;
    /// Opens the alarm list so the user picks a time.
    fn open_alarms(&self) -> Result<(), PlatformError>;
    fn start_timer(&self, seconds: u32) -> Result<(), PlatformError>;
    fn place_call(&self, number: &str) -> Result<(), PlatformError>;
    /// Pre-fills the dialer; needs no call permission.
    fn open_dialer(&self, number: &str) -> Result<(), PlatformError>;
}

pub trait AppHost: Send + Sync {
    fn is_installed(&self, package: &str) -> bool;
    fn launch_package(&self, package: &str) -> Result<(), PlatformError>;
    fn launch_system_action(&self, action: &str) -> Result<(), PlatformError>;
    fn open_url(&self, url: &str) -> Result<(), PlatformError>;
}

/// A message ready to hand to the messaging app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRequest {
    pub contact: String,
    pub phone: String,
    pub text: String,
    pub deep_link: String,
}

/// Opens the compose screen and presses send on the user's behalf.
pub trait MessageComposer: Send + Sync {
    fn send_and_confirm(&self, request: &MessageRequest) -> Result<(), PlatformError>;
}
