//! Seams for everything the core does to the device.
//!
//! The core only talks to these traits; a host application supplies real
//! implementations, binaries and tests use [`SimulatedPhone`].

pub mod contacts;
pub mod device;
pub mod simulated;
pub mod voice;

pub use contacts::{ContactBook, ContactEntry, InMemoryContactBook};
pub use device::{
    AppHost, BatteryStatus, DeviceActions, MediaKey, MessageComposer, MessageRequest, WifiStatus,
};
pub use simulated::{DeviceCall, SimulatedPhone};
pub use voice::{
    AudioStreams, CommandRecognizer, PhraseListener, RecognizerError, SpeechOutput, WavPlayer,
};

use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Permission {
    Contacts,
    Camera,
    CallPhone,
    Microphone,
}

pub trait PermissionGate: Send + Sync {
    fn is_granted(&self, permission: Permission) -> bool;
}

/// Everything the action layer needs, wired once by the owning application.
#[derive(Clone)]
pub struct Platform {
    pub device: Arc<dyn DeviceActions>,
    pub apps: Arc<dyn AppHost>,
    pub permissions: Arc<dyn PermissionGate>,
    pub contacts: Arc<dyn ContactBook>,
    pub composer: Arc<dyn MessageComposer>,
}

impl Platform {
    /// One simulated phone behind every seam.
    pub fn simulated(phone: Arc<SimulatedPhone>) -> Self {
        Self {
            device: phone.clone(),
            apps: phone.clone(),
            permissions: phone.clone(),
            contacts: phone.clone(),
            composer: phone,
        }
    }
}
