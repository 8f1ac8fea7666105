use super::contacts::{ContactBook, ContactEntry, InMemoryContactBook};
use super::device::{
    AppHost, BatteryStatus, DeviceActions, MediaKey, MessageComposer, MessageRequest, WifiStatus,
};
use super::voice::AudioStreams;
use super::{Permission, PermissionGate};
use crate::error::PlatformError;
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

/// A side effect the simulated phone performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceCall {
    Torch(bool),
    Camera,
    Media(MediaKey),
    Alarm { hour: u8, minute: u8 },
    AlarmList,
    Timer(u32),
    Call(String),
    Dialer(String),
    Launch(String),
    SystemAction(String),
    Url(String),
    Message(MessageRequest),
    MuteFeedback,
    RestoreFeedback,
}

#[derive(Debug)]
struct PhoneState {
    torch: bool,
    has_torch: bool,
    battery: BatteryStatus,
    wifi: WifiStatus,
    granted: HashSet<Permission>,
    installed: HashSet<String>,
    contacts: InMemoryContactBook,
    feedback_muted: bool,
    calls: Vec<DeviceCall>,
}

/// In-process phone used by the console binaries and tests. Records every
/// side effect instead of touching hardware.
#[derive(Debug)]
pub struct SimulatedPhone {
    state: Mutex<PhoneState>,
}

impl Default for SimulatedPhone {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedPhone {
    /// All permissions granted, a few common apps installed, empty contacts.
    pub fn new() -> Self {
        let granted = [
            Permission::Contacts,
            Permission::Camera,
            Permission::CallPhone,
            Permission::Microphone,
        ]
        .into_iter()
        .collect();
        let installed = ["com.spotify.music", "com.android.chrome", "com.whatsapp"]
            .into_iter()
            .map(String::from)
            .collect();
        Self {
            state: Mutex::new(PhoneState {
                torch: false,
                has_torch: true,
                battery: BatteryStatus { level: 76, charging: false },
                wifi: WifiStatus {
                    enabled: true,
                    ssid: Some("Ev".to_string()),
                    rssi_dbm: -55,
                },
                granted,
                installed,
                contacts: InMemoryContactBook::new(),
                feedback_muted: false,
                calls: Vec::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, PhoneState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn with_contacts(self, contacts: InMemoryContactBook) -> Self {
        self.lock().contacts = contacts;
        self
    }

    pub fn revoke(&self, permission: Permission) {
        self.lock().granted.remove(&permission);
    }

    pub fn grant(&self, permission: Permission) {
        self.lock().granted.insert(permission);
    }

    pub fn install(&self, package: &str) {
        self.lock().installed.insert(package.to_string());
    }

    pub fn set_battery(&self, level: u8, charging: bool) {
        self.lock().battery = BatteryStatus { level, charging };
    }

    pub fn set_wifi(&self, wifi: WifiStatus) {
        self.lock().wifi = wifi;
    }

    pub fn remove_torch(&self) {
        self.lock().has_torch = false;
    }

    pub fn torch_on(&self) -> bool {
        self.lock().torch
    }

    pub fn feedback_muted(&self) -> bool {
        self.lock().feedback_muted
    }

    pub fn calls(&self) -> Vec<DeviceCall> {
        self.lock().calls.clone()
    }

    fn record(&self, call: DeviceCall) {
        tracing::debug!(?call, "simulated device call");
        self.lock().calls.push(call);
    }
}

impl PermissionGate for SimulatedPhone {
    fn is_granted(&self, permission: Permission) -> bool {
        self.lock().granted.contains(&permission)
    }
}

impl DeviceActions for SimulatedPhone {
    fn set_torch(&self, on: bool) -> Result<(), PlatformError> {
        {
            let mut state = self.lock();
            if !state.has_torch {
                return Err(PlatformError::Unavailable("torch".to_string()));
            }
            state.torch = on;
        }
        self.record(DeviceCall::Torch(on));
        Ok(())
    }

    fn battery(&self) -> Result<BatteryStatus, PlatformError> {
        Ok(self.lock().battery)
    }

    fn wifi(&self) -> Result<WifiStatus, PlatformError> {
        Ok(self.lock().wifi.clone())
    }

    fn open_camera(&self) -> Result<(), PlatformError> {
        self.record(DeviceCall::Camera);
        Ok(())
    }

    fn send_media_key(&self, key: MediaKey) -> Result<(), PlatformError> {
        self.record(DeviceCall::Media(key));
        Ok(())
    }

    fn set_alarm(&self, hour: u8, minute: u8) -> Result<(), PlatformError> {
        self.record(DeviceCall::Alarm { hour, minute });
        Ok(())
    }

    fn open_alarms(&self) -> Result<(), PlatformError> {
        self.record(DeviceCall::AlarmList);
        Ok(())
    }

    fn start_timer(&self, seconds: u32) -> Result<(), PlatformError> {
        self.record(DeviceCall::Timer(seconds));
        Ok(())
    }

    fn place_call(&self, number: &str) -> Result<(), PlatformError> {
        if !self.is_granted(Permission::CallPhone) {
            return Err(PlatformError::PermissionDenied(Permission::CallPhone));
        }
        self.record(DeviceCall::Call(number.to_string()));
        Ok(())
    }

    fn open_dialer(&self, number: &str) -> Result<(), PlatformError> {
        self.record(DeviceCall::Dialer(number.to_string()));
        Ok(())
    }
}

impl AppHost for SimulatedPhone {
    fn is_installed(&self, package: &str) -> bool {
        self.lock().installed.contains(package)
    }

    fn launch_package(&self, package: &str) -> Result<(), PlatformError> {
        if !self.is_installed(package) {
            return Err(PlatformError::Unavailable(package.to_string()));
        }
        self.record(DeviceCall::Launch(package.to_string()));
        Ok(())
    }

    fn launch_system_action(&self, action: &str) -> Result<(), PlatformError> {
        self.record(DeviceCall::SystemAction(action.to_string()));
        Ok(())
    }

    fn open_url(&self, url: &str) -> Result<(), PlatformError> {
        self.record(DeviceCall::Url(url.to_string()));
        Ok(())
    }
}

impl ContactBook for SimulatedPhone {
    fn find_exact(&self, name: &str) -> Option<String> {
        self.lock().contacts.find_exact(name)
    }

    fn find_containing(&self, term: &str) -> Option<String> {
        self.lock().contacts.find_containing(term)
    }

    fn all(&self) -> Vec<ContactEntry> {
        self.lock().contacts.all()
    }
}

impl MessageComposer for SimulatedPhone {
    fn send_and_confirm(&self, request: &MessageRequest) -> Result<(), PlatformError> {
        if !self.is_installed("com.whatsapp") {
            return Err(PlatformError::Unavailable("com.whatsapp".to_string()));
        }
        self.record(DeviceCall::Message(request.clone()));
        Ok(())
    }
}

impl AudioStreams for SimulatedPhone {
    fn mute_feedback(&self) {
        self.lock().feedback_muted = true;
        self.record(DeviceCall::MuteFeedback);
    }

    fn restore_feedback(&self) {
        self.lock().feedback_muted = false;
        self.record(DeviceCall::RestoreFeedback);
    }
}
