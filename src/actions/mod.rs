pub mod contacts;
pub mod executor;
pub mod launcher;

pub use contacts::ContactResolver;
pub use executor::{duration_label, whatsapp_link, ActionExecutor, ActionReport, Outcome};
pub use launcher::AppLauncher;
