use crate::kernel::text::{is_match, normalize};

pub const ACKNOWLEDGEMENT: &str = "Evet?";
pub const FAREWELL: &str = "Tamam, kapanıyorum.";
pub const MICROPHONE_DENIED: &str =
    "Mikrofon izni verilmemiş. Ayarlardan mikrofon iznini açman gerekiyor.";

pattern!(
    WAKE,
    r"hey\s*furkan|hey\s*atlas|furkan\s*atlas|atlas[ıi]?m?\s*aç|merhaba\s*atlas"
);
pattern!(
    STOP,
    r"kendini\s*kapat|atlas[ıi]\s*kapat|servisi\s*durdur|dinlemeyi\s*kapat"
);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phrase {
    Wake,
    Stop,
}

/// Stop phrases take precedence: "atlası kapat" also contains "atlas".
pub fn classify(text: &str) -> Option<Phrase> {
    let text = normalize(text);
    if is_match(&STOP, &text) {
        Some(Phrase::Stop)
    } else if is_match(&WAKE, &text) {
        Some(Phrase::Wake)
    } else {
        None
    }
}

pub fn is_stop(text: &str) -> bool {
    classify(text) == Some(Phrase::Stop)
}
