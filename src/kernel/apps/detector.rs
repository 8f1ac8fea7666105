use super::catalog::{by_key_length, is_tv_native, AppEntry};
use crate::kernel::text::{is_match, normalize};
use serde::{Deserialize, Serialize};

/// Where an "open app" request should run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionContext {
    Phone,
    Tv,
    /// No device named and the app is usually a TV app.
    Ambiguous,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppIntent {
    pub key: &'static str,
    pub display_name: &'static str,
    pub package: &'static str,
    pub context: ExecutionContext,
    pub fallback_url: Option<&'static str>,
}

impl AppIntent {
    fn new(entry: &AppEntry, context: ExecutionContext) -> Self {
        Self {
            key: entry.key,
            display_name: entry.display_name,
            package: entry.package,
            context,
            fallback_url: entry.fallback_url,
        }
    }

    pub fn runs_locally(&self) -> bool {
        self.context == ExecutionContext::Phone
    }
}

pattern!(PHONE_PREFIX, r"(?:telefon\w*\s+|phone\s+|mobil\w*\s+)");
pattern!(TV_PREFIX, r"(?:\btv[\w']*\s+|televizyon[\w']*\s+|ekran\w*\s+)");
pattern!(
    OPEN_SUFFIX,
    r"(?:\s+aç\w*|\s+başlat\w*|\s+open|\s+launch|\s+çalıştır\w*)$"
);
pattern!(TRAILING_OPEN, r"\s+aç[ıioöuü]?$");

/// Recognises "[telefonda|tvde] <app> aç" and resolves the app and device.
#[derive(Debug, Default, Clone, Copy)]
pub struct AppLaunchDetector;

impl AppLaunchDetector {
    pub fn new() -> Self {
        Self
    }

    pub fn detect(&self, text: &str) -> Option<AppIntent> {
        let t = normalize(text);
        if !has_open_verb(&t) {
            return None;
        }

        let has_phone_prefix = is_match(&PHONE_PREFIX, &t);
        let has_tv_prefix = is_match(&TV_PREFIX, &t);

        let mut fragment = t.clone();
        for pattern in [&PHONE_PREFIX, &TV_PREFIX, &OPEN_SUFFIX, &TRAILING_OPEN] {
            if let Some(re) = pattern.as_ref() {
                fragment = re.replace_all(&fragment, " ").into_owned();
            }
        }
        let fragment = fragment.trim();

        let entry = by_key_length()
            .into_iter()
            .find(|entry| contains_at_word_start(fragment, entry.key))?;

        let context = if has_phone_prefix {
            ExecutionContext::Phone
        } else if has_tv_prefix {
            ExecutionContext::Tv
        } else if is_tv_native(entry.key) {
            ExecutionContext::Ambiguous
        } else {
            ExecutionContext::Phone
        };

        tracing::debug!(app = entry.key, ?context, "app launch detected");
        Some(AppIntent::new(entry, context))
    }
}

fn has_open_verb(t: &str) -> bool {
    is_match(&OPEN_SUFFIX, t)
        || t.contains(" aç")
        || t.ends_with("aç")
        || t.contains(" başlat")
        || t.contains("open ")
        || t.contains("launch ")
}

/// Key occurs at the start of a word; inflections after it are allowed
/// ("spotify'ı", "haritayı").
fn contains_at_word_start(haystack: &str, key: &str) -> bool {
    haystack.match_indices(key).any(|(idx, _)| {
        haystack[..idx]
            .chars()
            .next_back()
            .map_or(true, |prev| prev.is_whitespace())
    })
}
