use super::executor::{ActionReport, Outcome};
use crate::kernel::apps::{AppIntent, IMAGE_CAPTURE_ACTION};
use crate::platform::AppHost;
use std::sync::Arc;
use tracing::{info, warn};

/// Opens phone-local apps: the installed package first, then the web
/// fallback if the catalog has one.
#[derive(Clone)]
pub struct AppLauncher {
    host: Arc<dyn AppHost>,
}

impl AppLauncher {
    pub fn new(host: Arc<dyn AppHost>) -> Self {
        Self { host }
    }

    pub fn launch(&self, intent: &AppIntent) -> ActionReport {
        if self.try_launch(intent) {
            info!(app = intent.key, "app launched");
            ActionReport {
                outcome: Outcome::Success,
                text: format!("📱 {} açılıyor!", intent.display_name),
            }
        } else {
            ActionReport {
                outcome: Outcome::Failure,
                text: format!("❌ {} bulunamadı veya yüklü değil.", intent.display_name),
            }
        }
    }

    fn try_launch(&self, intent: &AppIntent) -> bool {
        if intent.package == IMAGE_CAPTURE_ACTION {
            return self.host.launch_system_action(intent.package).is_ok();
        }
        if self.host.is_installed(intent.package) {
            match self.host.launch_package(intent.package) {
                Ok(()) => return true,
                Err(e) => warn!(error = %e, app = intent.key, "launch failed; trying fallback"),
            }
        }
        match intent.fallback_url {
            Some(url) => self.host.open_url(url).is_ok(),
            None => false,
        }
    }
}
