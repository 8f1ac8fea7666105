use super::contacts::ContactResolver;
use crate::error::PlatformError;
use crate::kernel::intent::{Action, AlarmTime, DayPeriod};
use crate::kernel::text::to_title_tr;
use crate::notes::{Note, NoteStore};
use crate::platform::{
    BatteryStatus, DeviceActions, MediaKey, MessageComposer, MessageRequest, Permission,
    PermissionGate, Platform, WifiStatus,
};
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

/// Status category of an executed action. Part of the reply contract: the
/// reply text carries a matching marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    /// Needs the user: missing permission, unknown contact, dialer fallback.
    Warning,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionReport {
    pub outcome: Outcome,
    pub text: String,
}

impl ActionReport {
    fn success(text: impl Into<String>) -> Self {
        Self { outcome: Outcome::Success, text: text.into() }
    }

    fn warning(text: impl Into<String>) -> Self {
        Self { outcome: Outcome::Warning, text: text.into() }
    }

    fn failure(text: impl Into<String>) -> Self {
        Self { outcome: Outcome::Failure, text: format!("❌ {}", text.into()) }
    }
}

const CONTACTS_DENIED: &str =
    "⚠️ Rehber izni verilmemiş. Lütfen Ayarlar'dan ATLAS için Rehber iznini aç.";

/// Performs a detected [`Action`] on the device.
///
/// Never panics and never returns an error: every platform failure becomes a
/// short reply in the same channel as success.
pub struct ActionExecutor {
    device: Arc<dyn DeviceActions>,
    permissions: Arc<dyn PermissionGate>,
    composer: Arc<dyn MessageComposer>,
    contacts: ContactResolver,
    notes: Arc<Mutex<dyn NoteStore>>,
}

impl ActionExecutor {
    pub fn new(platform: &Platform, notes: Arc<Mutex<dyn NoteStore>>) -> Self {
        Self {
            device: platform.device.clone(),
            permissions: platform.permissions.clone(),
            composer: platform.composer.clone(),
            contacts: ContactResolver::new(platform.contacts.clone(), platform.permissions.clone()),
            notes,
        }
    }

    pub fn execute(&self, action: &Action) -> String {
        self.run(action).text
    }

    pub fn run(&self, action: &Action) -> ActionReport {
        let report = match action {
            Action::FlashlightOn => self.torch(true),
            Action::FlashlightOff => self.torch(false),
            Action::Battery => self.battery(),
            Action::Wifi => self.wifi(),
            Action::Camera => self.camera(),
            Action::Note(text) => self.note(text),
            Action::MediaPlay => self.media(MediaKey::Play),
            Action::MediaPause => self.media(MediaKey::Pause),
            Action::MediaNext => self.media(MediaKey::Next),
            Action::MediaPrev => self.media(MediaKey::Previous),
            Action::Alarm { time, period } => self.alarm(*time, *period),
            Action::Timer { seconds } => self.timer(*seconds),
            Action::Call { contact } => self.call(contact),
            Action::Whatsapp { contact, message } => self.whatsapp(contact, message.as_deref()),
        };
        info!(kind = ?action.kind(), outcome = ?report.outcome, "action executed");
        report
    }

    fn torch(&self, on: bool) -> ActionReport {
        match self.device.set_torch(on) {
            Ok(()) if on => ActionReport::success("🔦 Fener açıldı."),
            Ok(()) => ActionReport::success("🔦 Fener kapatıldı."),
            Err(PlatformError::Unavailable(_)) => ActionReport::failure("Bu cihazda fener yok."),
            Err(e) => {
                warn!(error = %e, "torch failed");
                ActionReport::failure("Fener kontrol edilemedi.")
            }
        }
    }

    fn battery(&self) -> ActionReport {
        match self.device.battery() {
            Ok(status) => ActionReport::success(battery_text(status)),
            Err(e) => {
                warn!(error = %e, "battery read failed");
                ActionReport::failure("Pil durumu okunamadı.")
            }
        }
    }

    fn wifi(&self) -> ActionReport {
        match self.device.wifi() {
            Ok(status) => ActionReport::success(wifi_text(&status)),
            Err(e) => {
                warn!(error = %e, "wifi read failed");
                ActionReport::failure("WiFi durumu okunamadı.")
            }
        }
    }

    fn camera(&self) -> ActionReport {
        if !self.permissions.is_granted(Permission::Camera) {
            return ActionReport::warning(
                "⚠️ Kamera izni verilmemiş. Lütfen Ayarlar'dan Kamera iznini aç.",
            );
        }
        match self.device.open_camera() {
            Ok(()) => ActionReport::success("📷 Kamera açılıyor."),
            Err(e) => {
                warn!(error = %e, "camera failed");
                ActionReport::failure("Kamera açılamadı.")
            }
        }
    }

    fn note(&self, text: &str) -> ActionReport {
        let text = text.trim();
        if text.is_empty() {
            return ActionReport::warning("Ne not almamı istiyorsun?");
        }
        let saved = match self.notes.lock() {
            Ok(mut store) => store.insert(Note::new(text)),
            Err(poisoned) => poisoned.into_inner().insert(Note::new(text)),
        };
        match saved {
            Ok(()) => ActionReport::success(format!("📝 Not alındı: \"{text}\"")),
            Err(e) => {
                warn!(error = %e, "note save failed");
                ActionReport::failure("Not kaydedilemedi.")
            }
        }
    }

    fn media(&self, key: MediaKey) -> ActionReport {
        if let Err(e) = self.device.send_media_key(key) {
            warn!(error = %e, ?key, "media key failed");
            return ActionReport::failure("Medya komutu gönderilemedi.");
        }
        ActionReport::success(match key {
            MediaKey::Pause => "⏸ Müzik duraklatıldı.",
            MediaKey::Play => "▶ Müzik oynatılıyor.",
            MediaKey::Next => "⏭ Sıradaki şarkı.",
            MediaKey::Previous => "⏮ Önceki şarkı.",
        })
    }

    fn alarm(&self, time: Option<AlarmTime>, period: Option<DayPeriod>) -> ActionReport {
        let Some(time) = time else {
            return match self.device.open_alarms() {
                Ok(()) => ActionReport::success("⏰ Alarm ekranı açıldı, saati seçebilirsin."),
                Err(e) => {
                    warn!(error = %e, "alarm list failed");
                    ActionReport::failure("Alarm uygulaması açılamadı.")
                }
            };
        };
        let at = time.resolve(period);
        match self.device.set_alarm(at.hour, at.minute) {
            Ok(()) => ActionReport::success(format!(
                "⏰ Alarm saat {}:{:02} için kuruldu!",
                at.hour, at.minute
            )),
            Err(e) => {
                warn!(error = %e, "alarm failed");
                ActionReport::failure("Alarm kurulamadı.")
            }
        }
    }

    fn timer(&self, seconds: u32) -> ActionReport {
        match self.device.start_timer(seconds) {
            Ok(()) => ActionReport::success(format!(
                "⏱ {} zamanlayıcı kuruldu!",
                duration_label(seconds)
            )),
            Err(e) => {
                warn!(error = %e, "timer failed");
                ActionReport::failure("Zamanlayıcı kurulamadı.")
            }
        }
    }

    fn call(&self, contact: &str) -> ActionReport {
        let name = to_title_tr(contact);
        let number = match self.resolve(contact) {
            Ok(number) => number,
            Err(report) => return report,
        };

        if self.permissions.is_granted(Permission::CallPhone) {
            match self.device.place_call(&number) {
                Ok(()) => return ActionReport::success(format!("📞 {name} aranıyor...")),
                Err(e) => warn!(error = %e, "direct call failed; opening dialer"),
            }
        }
        match self.device.open_dialer(&number) {
            Ok(()) => ActionReport::warning(
                "📞 Arama ekranı açıldı. Direkt araması için telefon izni verin.",
            ),
            Err(e) => {
                warn!(error = %e, "dialer failed");
                ActionReport::failure("Arama başlatılamadı.")
            }
        }
    }

    fn whatsapp(&self, contact: &str, message: Option<&str>) -> ActionReport {
        let Some(text) = message.map(str::trim).filter(|m| !m.is_empty()) else {
            return ActionReport::warning(format!(
                "{}'a ne yazmamı istersin?",
                to_title_tr(contact)
            ));
        };
        let number = match self.resolve(contact) {
            Ok(number) => number,
            Err(report) => return report,
        };

        let request = MessageRequest {
            contact: contact.to_string(),
            deep_link: whatsapp_link(&number, text),
            phone: number,
            text: text.to_string(),
        };
        match self.composer.send_and_confirm(&request) {
            Ok(()) => ActionReport::success(format!(
                "💬 {}'a gönderiliyor: \"{text}\"",
                to_title_tr(contact)
            )),
            Err(e) => {
                warn!(error = %e, "message compose failed");
                ActionReport::failure("WhatsApp açılamadı. Yüklü mü?")
            }
        }
    }

    fn resolve(&self, contact: &str) -> Result<String, ActionReport> {
        if !self.contacts.can_read() {
            return Err(ActionReport::warning(CONTACTS_DENIED));
        }
        self.contacts.lookup(contact).ok_or_else(|| {
            ActionReport::warning(format!(
                "⚠️ '{contact}' rehberde bulunamadı. Rehberdeki tam adını söyler misin?"
            ))
        })
    }
}

fn battery_text(status: BatteryStatus) -> String {
    let icon = match status {
        BatteryStatus { charging: true, .. } => "⚡",
        BatteryStatus { level, .. } if level >= 80 => "🟢",
        BatteryStatus { level, .. } if level >= 30 => "🟡",
        _ => "🔴",
    };
    if status.charging {
        format!("{icon} Şarj oluyor: %{}", status.level)
    } else {
        format!("{icon} Pil: %{}", status.level)
    }
}

fn wifi_text(status: &WifiStatus) -> String {
    if !status.enabled {
        return "📡 WiFi kapalı.".to_string();
    }
    match &status.ssid {
        Some(ssid) => format!(
            "📡 WiFi: {ssid}, {} ({} dBm)",
            status.quality(),
            status.rssi_dbm
        ),
        None => "📡 WiFi açık ama bir ağa bağlı değil.".to_string(),
    }
}

/// "1 saat 5 dakika", "10 dakika 30 saniye", "45 saniye"
pub fn duration_label(seconds: u32) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    let mut parts = Vec::new();
    if hours > 0 {
        parts.push(format!("{hours} saat"));
    }
    if minutes > 0 {
        parts.push(format!("{minutes} dakika"));
    }
    if secs > 0 || parts.is_empty() {
        parts.push(format!("{secs} saniye"));
    }
    parts.join(" ")
}

/// `https://api.whatsapp.com/send?phone=<digits>&text=<encoded>`
pub fn whatsapp_link(number: &str, text: &str) -> String {
    let digits: String = number.chars().filter(|c| c.is_ascii_digit()).collect();
    format!(
        "https://api.whatsapp.com/send?phone={digits}&text={}",
        urlencoding::encode(text)
    )
}
