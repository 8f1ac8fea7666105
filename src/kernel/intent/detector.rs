use super::parse::{parse_alarm_time, parse_duration};
use super::types::{Action, ActionKind};
use crate::kernel::text::{find_captures, is_match, normalize};

/// Words that make a captured "contact" something other than a person: the
/// assistant itself, apps, media, scheduling vocabulary. A word is rejected
/// when it is one of these or one of these plus a case ending ("alarmı",
/// "müziği", "netflix'ten"); "sabahat" and "kurt" stay names.
pub const EXCLUDED_KEYWORDS: &[&str] = &[
    "asistan", "atlas", "furkan", "servis", "uygulama", "netflix", "spotify", "youtube", "tv",
    "televizyon", "haber", "müzik", "şarkı", "alarm", "timer", "zamanlayıcı", "not", "liste",
    "hatırlatıcı", "hatırlat", "oluştur", "kur", "ekle", "için", "kadar", "yarın", "bugün",
    "akşam", "sabah", "öğlen", "internet", "google",
];

/// Pronouns and fillers; any of them as a word rejects the candidate
/// ("beni ara" means "call me", not a contact named Beni).
pub const PRONOUNS: &[&str] = &[
    "bana", "sana", "ona", "bize", "size", "onlara", "ben", "sen", "o", "biz", "siz", "onlar",
    "beni", "seni", "onu", "bizi", "sizi", "onları", "bunu", "şunu", "bunları", "bir", "şey",
    "burada", "orada", "şurada", "şun",
];

/// Case and possessive endings a keyword may carry and still count as the
/// keyword.
const KEYWORD_ENDINGS: &[&str] = &[
    "ı", "i", "u", "ü", "yı", "yi", "yu", "yü", "nı", "ni", "nu", "nü", "a", "e", "ya", "ye",
    "na", "ne", "da", "de", "ta", "te", "dan", "den", "tan", "ten", "ın", "in", "un", "ün", "nın",
    "nin", "nun", "nün", "yla", "yle", "la", "le", "m", "ım", "im", "um", "üm", "sı", "si", "su",
    "sü", "lar", "ler", "ları", "leri",
];

const MAX_NAME_WORDS: usize = 3;

pattern!(FLASHLIGHT, r"(?:el\s*)?(?:fener(?:i|ı)?|torch)\s*(aç|kapat)");
pattern!(BATTERY, r"\b(?:pil|batarya|şarj)");
pattern!(
    WIFI,
    r"\b(?:wifi|wi-fi|internet|kablosuz)\w*\s*(?:durumu|bağlı|ne\b|hız|sinyal|açık\s*mı)"
);
pattern!(CAMERA, r"(?:fotoğraf|resim)\s*çek|selfie\s*çek|kamera(?:yı)?\s*aç");
pattern!(NOTE, r"(?i)(?:not\s*al|not\s*et|kaydet)\s*[:：]\s*(.+)");
pattern!(MEDIA_PAUSE, r"(?:müzik|şarkı)\w*\s*(?:durdur|duraklat|pause)");
pattern!(MEDIA_PLAY, r"(?:müzik|şarkı)\w*\s*(?:devam|başlat|çal|play)");
pattern!(
    MEDIA_NEXT,
    r"(?:sıradaki|sonraki|ileri)\s*(?:şarkı|parça)|şarkıyı\s*geç|\bnext\b"
);
pattern!(MEDIA_PREV, r"(?:önceki|geri)\s*(?:şarkı|parça)|\bprevious\b");
pattern!(TIMER, r"zamanlayıcı|timer|kronometre|geri\s*sayım");
pattern!(ALARM, r"alarm\s*kur|alarm\s*ayarla|\balarma?\b.*\d|^\d.*alarm");

pattern!(
    MESSAGE_VIA_APP,
    r"(.+?)\s+(?:whatsapp|wp)['a]?\s*(?:tan|ten|'tan|'ten)?\s*(?:yaz|mesaj\s*at|gönder)(?:\s*[:：]\s*(.+))?$"
);
pattern!(
    MESSAGE_DATIVE_APOSTROPHE,
    r"^(.+?)['’]y?[ea]\s+(?:yaz|mesaj\s*(?:at|gönder|yolla))(?:\s*[:：]\s*(.+))?$"
);
pattern!(
    MESSAGE_DATIVE_BUFFERED,
    r"^(.+?[aeıioöuü])y[ea]\s+(?:yaz|mesaj\s*(?:at|gönder|yolla))(?:\s*[:：]\s*(.+))?$"
);
pattern!(MESSAGE_COLON, r"(.+?)\s+yaz\s*[:：]\s*(.+)$");
pattern!(
    MESSAGE_BARE,
    r"^(.+?)\s+(?:yaz|mesaj\s*(?:at|gönder|yolla))\s*(?:[:：]\s*(.+))?$"
);
pattern!(CALL_TRAILING, r"^(.+?)\s+ara(?:yalım|yın|r\s*mısın|ma)?$");
pattern!(CALL_LEADING, r"^(?:ara|telefon\s*et|call)\s+(.+)$");

/// One utterance in both forms the matchers need.
struct Utterance<'a> {
    raw: &'a str,
    text: String,
}

type Matcher = fn(&Utterance<'_>) -> Option<Action>;

struct Rule {
    kind: ActionKind,
    matcher: Matcher,
}

/// Evaluation order. Earlier rules shadow later ones when phrases overlap
/// ("alarm" inside a messaging phrase, "şarkı" inside a call phrase).
const RULES: [Rule; 10] = [
    Rule { kind: ActionKind::Flashlight, matcher: match_flashlight },
    Rule { kind: ActionKind::Battery, matcher: match_battery },
    Rule { kind: ActionKind::Wifi, matcher: match_wifi },
    Rule { kind: ActionKind::Camera, matcher: match_camera },
    Rule { kind: ActionKind::Note, matcher: match_note },
    Rule { kind: ActionKind::Media, matcher: match_media },
    Rule { kind: ActionKind::Timer, matcher: match_timer },
    Rule { kind: ActionKind::Alarm, matcher: match_alarm },
    Rule { kind: ActionKind::Message, matcher: match_message },
    Rule { kind: ActionKind::Call, matcher: match_call },
];

/// Classifies free-form Turkish text into a local [`Action`].
///
/// Total and deterministic: `None` means "not a local action", which the
/// caller forwards to the remote chat.
#[derive(Debug, Default, Clone, Copy)]
pub struct IntentDetector;

impl IntentDetector {
    pub fn new() -> Self {
        Self
    }

    pub fn detect(&self, text: &str) -> Option<Action> {
        let raw = text.trim();
        if raw.is_empty() {
            return None;
        }
        let utterance = Utterance { raw, text: normalize(raw) };

        RULES.iter().find_map(|rule| {
            let action = (rule.matcher)(&utterance)?;
            tracing::debug!(kind = ?rule.kind, "local intent matched");
            Some(action)
        })
    }

    /// The matcher families in the order they are tried.
    pub fn priority(&self) -> Vec<ActionKind> {
        RULES.iter().map(|rule| rule.kind).collect()
    }
}

/// True when a captured contact candidate is not plausibly a person's name.
pub fn is_excluded_name(candidate: &str) -> bool {
    let name = normalize(candidate);
    if name.chars().count() < 2 {
        return true;
    }
    if name.chars().any(|c| c.is_ascii_digit()) {
        return true;
    }
    let words: Vec<&str> = name.split_whitespace().collect();
    if words.len() > MAX_NAME_WORDS {
        return true;
    }
    if words.iter().any(|w| PRONOUNS.contains(w)) {
        return true;
    }
    words.iter().any(|w| is_keyword_form(w))
}

/// True for a keyword, optionally followed by an apostrophe or one of the
/// [`KEYWORD_ENDINGS`]. A final `k` may soften to `ğ` before a vowel.
fn is_keyword_form(word: &str) -> bool {
    let word = word.split(['\'', '’']).next().unwrap_or(word);
    EXCLUDED_KEYWORDS.iter().any(|keyword| {
        if word == *keyword {
            return true;
        }
        let softened = keyword.strip_suffix('k').map(|stem| format!("{stem}ğ"));
        [Some(keyword.to_string()), softened]
            .into_iter()
            .flatten()
            .any(|stem| {
                word.strip_prefix(stem.as_str())
                    .is_some_and(|rest| KEYWORD_ENDINGS.contains(&rest))
            })
    })
}

fn match_flashlight(u: &Utterance<'_>) -> Option<Action> {
    let caps = find_captures(&FLASHLIGHT, &u.text)?;
    match caps.get(1)?.as_str() {
        "aç" => Some(Action::FlashlightOn),
        _ => Some(Action::FlashlightOff),
    }
}

fn match_battery(u: &Utterance<'_>) -> Option<Action> {
    is_match(&BATTERY, &u.text).then_some(Action::Battery)
}

fn match_wifi(u: &Utterance<'_>) -> Option<Action> {
    is_match(&WIFI, &u.text).then_some(Action::Wifi)
}

fn match_camera(u: &Utterance<'_>) -> Option<Action> {
    is_match(&CAMERA, &u.text).then_some(Action::Camera)
}

fn match_note(u: &Utterance<'_>) -> Option<Action> {
    // Run against the original text so the note keeps its casing.
    let caps = find_captures(&NOTE, u.raw).or_else(|| find_captures(&NOTE, &u.text))?;
    let body = caps.get(1)?.as_str().trim();
    Some(Action::Note(body.to_string()))
}

fn match_media(u: &Utterance<'_>) -> Option<Action> {
    if is_match(&MEDIA_PAUSE, &u.text) {
        Some(Action::MediaPause)
    } else if is_match(&MEDIA_PLAY, &u.text) {
        Some(Action::MediaPlay)
    } else if is_match(&MEDIA_NEXT, &u.text) {
        Some(Action::MediaNext)
    } else if is_match(&MEDIA_PREV, &u.text) {
        Some(Action::MediaPrev)
    } else {
        None
    }
}

fn match_timer(u: &Utterance<'_>) -> Option<Action> {
    is_match(&TIMER, &u.text).then(|| Action::Timer {
        seconds: parse_duration(&u.text),
    })
}

fn match_alarm(u: &Utterance<'_>) -> Option<Action> {
    if !is_match(&ALARM, &u.text) {
        return None;
    }
    let (time, period) = parse_alarm_time(&u.text);
    Some(Action::Alarm { time, period })
}

fn match_message(u: &Utterance<'_>) -> Option<Action> {
    // Explicit dative forms first; the bare forms keep the whole name unless
    // its last vowel reads as a harmonising dative ending ("ahmete").
    let patterns: [(&Option<regex::Regex>, fn(&str) -> String); 5] = [
        (&*MESSAGE_VIA_APP, str::to_string),
        (&*MESSAGE_DATIVE_APOSTROPHE, str::to_string),
        (&*MESSAGE_DATIVE_BUFFERED, str::to_string),
        (&*MESSAGE_COLON, strip_dative_vowel),
        (&*MESSAGE_BARE, strip_dative_vowel),
    ];
    patterns.into_iter().find_map(|(pattern, stem)| {
        let caps = find_captures(pattern, &u.text)?;
        let contact = stem(&clean_contact(caps.get(1)?.as_str()));
        if is_excluded_name(&contact) {
            return None;
        }
        let message = caps
            .get(2)
            .map(|m| m.as_str().trim().to_string())
            .filter(|m| !m.is_empty());
        Some(Action::Whatsapp { contact, message })
    })
}

fn match_call(u: &Utterance<'_>) -> Option<Action> {
    let captured = find_captures(&CALL_TRAILING, &u.text)
        .and_then(|caps| caps.get(1).map(|m| strip_object_suffix(m.as_str())))
        .or_else(|| {
            find_captures(&CALL_LEADING, &u.text)
                .and_then(|caps| caps.get(1).map(|m| m.as_str().to_string()))
        })?;
    let contact = clean_contact(&captured);
    if is_excluded_name(&contact) {
        return None;
    }
    Some(Action::Call { contact })
}

/// Drops trailing quotes, apostrophes and whitespace left over from capture.
fn clean_contact(raw: &str) -> String {
    raw.trim()
        .trim_end_matches(|c: char| c == '\'' || c == '’' || c == '"' || c.is_whitespace())
        .trim()
        .to_string()
}

/// "ahmet'i" -> "ahmet", "anneyi" -> "anne", "ahmeti" -> "ahmet".
fn strip_object_suffix(raw: &str) -> String {
    let name = raw.trim();
    if let Some(idx) = name.rfind(['\'', '’']) {
        return name[..idx].to_string();
    }
    let chars: Vec<char> = name.chars().collect();
    let n = chars.len();
    if n > 3
        && chars[n - 2] == 'y'
        && matches!(chars[n - 1], 'ı' | 'i' | 'u' | 'ü')
        && is_vowel(chars[n - 3])
    {
        return chars[..n - 2].iter().collect();
    }
    strip_harmonic_suffix(name, accusative_vowel)
}

/// "ahmete" -> "ahmet", "anneme" -> "annem"; "ayşe", "anne" and "ali" are
/// names, not datives, and stay whole.
fn strip_dative_vowel(name: &str) -> String {
    strip_harmonic_suffix(name, dative_vowel)
}

/// Drops a final case vowel when the last word reads as `stem + vowel`:
/// the stem has at least two vowels, ends in a single consonant after a
/// vowel, and the dropped vowel is the one vowel harmony asks for.
/// Anything else is a name ending in a vowel and is kept as spoken.
fn strip_harmonic_suffix(name: &str, expected: fn(char) -> char) -> String {
    let chars: Vec<char> = name.chars().collect();
    let word_start = chars
        .iter()
        .rposition(|c| c.is_whitespace())
        .map_or(0, |i| i + 1);
    let word = &chars[word_start..];
    let n = word.len();
    if n < 4 {
        return name.to_string();
    }
    let (stem, last) = (&word[..n - 1], word[n - 1]);
    let single_final_consonant = !is_vowel(stem[n - 2]) && is_vowel(stem[n - 3]);
    let vowels = stem.iter().filter(|c| is_vowel(**c)).count();
    let harmonises = stem
        .iter()
        .rev()
        .find(|c| is_vowel(**c))
        .is_some_and(|v| expected(*v) == last);
    if single_final_consonant && vowels >= 2 && harmonises {
        chars[..chars.len() - 1].iter().collect()
    } else {
        name.to_string()
    }
}

fn dative_vowel(stem_vowel: char) -> char {
    match stem_vowel {
        'a' | 'ı' | 'o' | 'u' => 'a',
        _ => 'e',
    }
}

fn accusative_vowel(stem_vowel: char) -> char {
    match stem_vowel {
        'a' | 'ı' => 'ı',
        'e' | 'i' => 'i',
        'o' | 'u' => 'u',
        _ => 'ü',
    }
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'ı' | 'i' | 'o' | 'ö' | 'u' | 'ü')
}
