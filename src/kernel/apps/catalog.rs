/// One launchable application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppEntry {
    pub key: &'static str,
    pub display_name: &'static str,
    pub package: &'static str,
    pub fallback_url: Option<&'static str>,
}

/// System action used instead of a package for the camera.
pub const IMAGE_CAPTURE_ACTION: &str = "android.media.action.IMAGE_CAPTURE";

const fn app(
    key: &'static str,
    display_name: &'static str,
    package: &'static str,
    fallback_url: Option<&'static str>,
) -> AppEntry {
    AppEntry { key, display_name, package, fallback_url }
}

pub static APPS: &[AppEntry] = &[
    // music
    app("spotify", "Spotify", "com.spotify.music", Some("https://open.spotify.com")),
    app("youtube müzik", "YouTube Music", "com.google.android.apps.youtube.music", None),
    app("music", "YouTube Music", "com.google.android.apps.youtube.music", None),
    // video
    app("youtube", "YouTube", "com.google.android.youtube", Some("https://youtube.com")),
    app("netflix", "Netflix", "com.netflix.mediaclient", Some("https://netflix.com")),
    app("amazon prime", "Amazon Prime", "com.amazon.avod.thirdpartyclient", Some("https://primevideo.com")),
    app("amazon", "Amazon Prime", "com.amazon.avod.thirdpartyclient", Some("https://primevideo.com")),
    app("twitch", "Twitch", "tv.twitch.android.app", Some("https://twitch.tv")),
    app("disney", "Disney+", "com.disney.disneyplus", Some("https://disneyplus.com")),
    app("tubi", "Tubi", "com.tubitv", None),
    // social
    app("instagram", "Instagram", "com.instagram.android", None),
    app("whatsapp", "WhatsApp", "com.whatsapp", None),
    app("twitter", "Twitter / X", "com.twitter.android", Some("https://x.com")),
    app("x", "Twitter / X", "com.twitter.android", Some("https://x.com")),
    app("tiktok", "TikTok", "com.zhiliaoapp.musically", Some("https://tiktok.com")),
    app("telegram", "Telegram", "org.telegram.messenger", None),
    app("facebook", "Facebook", "com.facebook.katana", Some("https://facebook.com")),
    app("snapchat", "Snapchat", "com.snapchat.android", None),
    app("linkedin", "LinkedIn", "com.linkedin.android", Some("https://linkedin.com")),
    app("reddit", "Reddit", "com.reddit.frontpage", Some("https://reddit.com")),
    // google
    app("harita", "Haritalar", "com.google.android.apps.maps", Some("https://maps.google.com")),
    app("maps", "Haritalar", "com.google.android.apps.maps", Some("https://maps.google.com")),
    app("chrome", "Chrome", "com.android.chrome", None),
    app("gmail", "Gmail", "com.google.android.gm", Some("https://gmail.com")),
    app("drive", "Google Drive", "com.google.android.apps.docs", Some("https://drive.google.com")),
    app("meet", "Google Meet", "com.google.android.apps.tachyon", None),
    app("takvim", "Takvim", "com.google.android.calendar", None),
    app("translate", "Çevirici", "com.google.android.apps.translate", None),
    app("fotoğraflar", "Fotoğraflar", "com.google.android.apps.photos", None),
    app("fotolar", "Fotoğraflar", "com.google.android.apps.photos", None),
    // system
    app("kamera", "Kamera", IMAGE_CAPTURE_ACTION, None),
    app("galeri", "Galeri", "com.google.android.apps.photos", None),
    app("ayarlar", "Ayarlar", "com.android.settings", None),
    app("hesap makinesi", "Hesap Makinesi", "com.android.calculator2", None),
    app("dosyalar", "Dosyalar", "com.google.android.documentsui", None),
    app("tarayıcı", "Chrome", "com.android.chrome", None),
    app("mesajlar", "Mesajlar", "com.android.mms", None),
    app("sms", "Mesajlar", "com.android.mms", None),
    app("telefon", "Telefon", "com.android.phone", None),
    app("müzik", "Müzik", "com.google.android.music", None),
    // games
    app("clash", "Clash of Clans", "com.supercell.clashofclans", None),
    app("pubg", "PUBG", "com.tencent.ig", None),
    app("fortnite", "Fortnite", "com.epicgames.fortnite", None),
];

/// Apps usually watched on the TV; without an explicit device they are
/// ambiguous rather than phone-local.
pub const TV_NATIVE_APPS: &[&str] = &[
    "netflix", "amazon", "amazon prime", "disney", "twitch", "youtube", "spotify", "dazn", "hbo",
    "hbo max", "apple tv", "crunchyroll", "tubi", "plex",
];

pub fn is_tv_native(key: &str) -> bool {
    TV_NATIVE_APPS.contains(&key)
}

/// Catalog entries ordered longest key first, so "youtube müzik" wins over
/// "youtube" and "amazon prime" over "amazon".
pub fn by_key_length() -> Vec<&'static AppEntry> {
    let mut entries: Vec<&'static AppEntry> = APPS.iter().collect();
    entries.sort_by(|a, b| b.key.chars().count().cmp(&a.key.chars().count()));
    entries
}
