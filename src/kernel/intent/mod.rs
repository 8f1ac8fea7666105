pub mod detector;
pub mod parse;
pub mod types;

pub use detector::{is_excluded_name, IntentDetector};
pub use parse::{parse_alarm_time, parse_duration, DEFAULT_TIMER_SECS};
pub use types::*;
