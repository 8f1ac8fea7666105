use atlas::actions::{duration_label, whatsapp_link, ActionExecutor, ContactResolver, Outcome};
use atlas::kernel::intent::{AlarmTime, DayPeriod};
use atlas::notes::{InMemoryNoteStore, NoteCategory, NoteStore};
use atlas::platform::{
    DeviceCall, InMemoryContactBook, MediaKey, Permission, Platform, SimulatedPhone, WifiStatus,
};
use atlas::Action;
use std::sync::{Arc, Mutex};

struct Harness {
    phone: Arc<SimulatedPhone>,
    notes: Arc<Mutex<InMemoryNoteStore>>,
    executor: ActionExecutor,
}

fn harness() -> Harness {
    let phone = Arc::new(
        SimulatedPhone::new().with_contacts(
            InMemoryContactBook::new()
                .with("Ahmet Yılmaz", "+90 532 111 22 33")
                .with("Baba", "+90 535 777 88 99")
                .with("Annem", "+90 533 444 55 66"),
        ),
    );
    let notes = Arc::new(Mutex::new(InMemoryNoteStore::new()));
    let executor = ActionExecutor::new(&Platform::simulated(phone.clone()), notes.clone());
    Harness { phone, notes, executor }
}

#[test]
fn test_flashlight_is_idempotent() {
    let h = harness();
    assert_eq!(h.executor.execute(&Action::FlashlightOn), "🔦 Fener açıldı.");
    assert_eq!(h.executor.execute(&Action::FlashlightOn), "🔦 Fener açıldı.");
    assert!(h.phone.torch_on());
    assert_eq!(h.executor.execute(&Action::FlashlightOff), "🔦 Fener kapatıldı.");
    assert!(!h.phone.torch_on());
}

#[test]
fn test_flashlight_missing_hardware() {
    let h = harness();
    h.phone.remove_torch();
    let report = h.executor.run(&Action::FlashlightOn);
    assert_eq!(report.outcome, Outcome::Failure);
    assert!(report.text.starts_with("❌ "));
}

#[test]
fn test_battery_icons() {
    let h = harness();
    h.phone.set_battery(85, false);
    assert_eq!(h.executor.execute(&Action::Battery), "🟢 Pil: %85");
    h.phone.set_battery(40, false);
    assert_eq!(h.executor.execute(&Action::Battery), "🟡 Pil: %40");
    h.phone.set_battery(10, false);
    assert_eq!(h.executor.execute(&Action::Battery), "🔴 Pil: %10");
    h.phone.set_battery(10, true);
    assert_eq!(h.executor.execute(&Action::Battery), "⚡ Şarj oluyor: %10");
}

#[test]
fn test_wifi_report() {
    let h = harness();
    assert_eq!(h.executor.execute(&Action::Wifi), "📡 WiFi: Ev, İyi (-55 dBm)");
    h.phone.set_wifi(WifiStatus { enabled: false, ssid: None, rssi_dbm: 0 });
    assert_eq!(h.executor.execute(&Action::Wifi), "📡 WiFi kapalı.");
}

#[test]
fn test_camera_needs_permission() {
    let h = harness();
    h.phone.revoke(Permission::Camera);
    let report = h.executor.run(&Action::Camera);
    assert_eq!(report.outcome, Outcome::Warning);
    assert!(!h.phone.calls().contains(&DeviceCall::Camera));

    h.phone.grant(Permission::Camera);
    assert_eq!(h.executor.run(&Action::Camera).outcome, Outcome::Success);
    assert!(h.phone.calls().contains(&DeviceCall::Camera));
}

#[test]
fn test_note_is_stored_with_category() {
    let h = harness();
    let reply = h.executor.execute(&Action::Note("Marketten süt al".to_string()));
    assert_eq!(reply, "📝 Not alındı: \"Marketten süt al\"");

    let notes = h.notes.lock().unwrap().all();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].category, NoteCategory::Shopping);
}

#[test]
fn test_media_keys() {
    let h = harness();
    assert_eq!(h.executor.execute(&Action::MediaPause), "⏸ Müzik duraklatıldı.");
    assert_eq!(h.executor.execute(&Action::MediaNext), "⏭ Sıradaki şarkı.");
    assert!(h.phone.calls().contains(&DeviceCall::Media(MediaKey::Pause)));
}

#[test]
fn test_alarm_and_timer() {
    let h = harness();
    let reply = h.executor.execute(&Action::Alarm {
        time: Some(AlarmTime { hour: 7, minute: 5 }),
        period: Some(DayPeriod::Pm),
    });
    assert_eq!(reply, "⏰ Alarm saat 19:05 için kuruldu!");

    h.executor.execute(&Action::Alarm { time: None, period: None });

    let reply = h.executor.execute(&Action::Timer { seconds: 630 });
    assert_eq!(reply, "⏱ 10 dakika 30 saniye zamanlayıcı kuruldu!");

    let calls = h.phone.calls();
    assert!(calls.contains(&DeviceCall::Alarm { hour: 19, minute: 5 }));
    assert!(calls.contains(&DeviceCall::AlarmList));
    assert!(calls.contains(&DeviceCall::Timer(630)));
}

#[test]
fn test_call_with_and_without_phone_permission() {
    let h = harness();
    let report = h.executor.run(&Action::Call { contact: "babam".to_string() });
    assert_eq!(report.outcome, Outcome::Success);
    assert_eq!(report.text, "📞 Babam aranıyor...");
    assert!(h.phone.calls().contains(&DeviceCall::Call("+90 535 777 88 99".to_string())));

    h.phone.revoke(Permission::CallPhone);
    let report = h.executor.run(&Action::Call { contact: "babam".to_string() });
    assert_eq!(report.outcome, Outcome::Warning);
    assert!(h.phone.calls().contains(&DeviceCall::Dialer("+90 535 777 88 99".to_string())));
}

#[test]
fn test_call_unknown_contact() {
    let h = harness();
    let report = h.executor.run(&Action::Call { contact: "zeynep".to_string() });
    assert_eq!(report.outcome, Outcome::Warning);
    assert!(report.text.contains("'zeynep' rehberde bulunamadı"));
}

#[test]
fn test_contacts_permission_denied() {
    let h = harness();
    h.phone.revoke(Permission::Contacts);
    let report = h.executor.run(&Action::Call { contact: "baba".to_string() });
    assert_eq!(report.outcome, Outcome::Warning);
    assert!(report.text.contains("Rehber izni"));
}

#[test]
fn test_whatsapp_message() {
    let h = harness();
    let report = h.executor.run(&Action::Whatsapp {
        contact: "ahmet".to_string(),
        message: Some("akşam görüşürüz".to_string()),
    });
    assert_eq!(report.outcome, Outcome::Success);
    assert_eq!(report.text, "💬 Ahmet'a gönderiliyor: \"akşam görüşürüz\"");

    let sent = h.phone.calls().into_iter().find_map(|call| match call {
        DeviceCall::Message(request) => Some(request),
        _ => None,
    });
    let sent = sent.expect("message request recorded");
    assert_eq!(sent.phone, "+90 532 111 22 33");
    assert!(sent.deep_link.starts_with("https://api.whatsapp.com/send?phone=905321112233&text="));
}

#[test]
fn test_whatsapp_without_body_asks() {
    let h = harness();
    let reply = h.executor.execute(&Action::Whatsapp { contact: "ahmet".to_string(), message: None });
    assert_eq!(reply, "Ahmet'a ne yazmamı istersin?");
}

#[test]
fn test_contact_resolver_stems() {
    let phone = Arc::new(SimulatedPhone::new().with_contacts(
        InMemoryContactBook::new()
            .with("Ahmet Yılmaz", "111")
            .with("Baba", "222")
            .with("Annem", "333"),
    ));
    let resolver = ContactResolver::new(phone.clone(), phone.clone());

    assert_eq!(resolver.lookup("babam").as_deref(), Some("222"));
    assert_eq!(resolver.lookup("ahmete").as_deref(), Some("111"));
    assert_eq!(resolver.lookup("AHMET").as_deref(), Some("111"));
    assert_eq!(resolver.lookup("anne").as_deref(), Some("333"));
    assert_eq!(resolver.lookup("zeynep"), None);
    assert_eq!(resolver.lookup("  "), None);

    phone.revoke(Permission::Contacts);
    assert!(!resolver.can_read());
    assert_eq!(resolver.lookup("baba"), None);
}

#[test]
fn test_labels_and_links() {
    assert_eq!(duration_label(45), "45 saniye");
    assert_eq!(duration_label(3900), "1 saat 5 dakika");
    assert_eq!(duration_label(0), "0 saniye");
    assert_eq!(
        whatsapp_link("+90 (532) 111", "selam nasılsın"),
        "https://api.whatsapp.com/send?phone=90532111&text=selam%20nas%C4%B1ls%C4%B1n"
    );
}
