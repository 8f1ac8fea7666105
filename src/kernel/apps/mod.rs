pub mod catalog;
pub mod detector;

pub use catalog::{AppEntry, APPS, IMAGE_CAPTURE_ACTION, TV_NATIVE_APPS};
pub use detector::{AppIntent, AppLaunchDetector, ExecutionContext};
