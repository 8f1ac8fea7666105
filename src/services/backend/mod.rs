pub mod client;
pub mod types;

pub use client::{BackendClient, API_KEY_HEADER};
pub use types::{ChatOutcome, CommandAck, DeviceStatus, LightCommand, TvCommand, NO_REPLY};
