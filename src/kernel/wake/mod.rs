pub mod controller;
pub mod phrases;
pub mod state;

pub use controller::WakeSessionController;
pub use phrases::{classify as classify_phrase, Phrase};
pub use state::*;
