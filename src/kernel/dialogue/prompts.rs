use crate::kernel::text::to_title_tr;

/// How questions are phrased for the channel they go out on. Chat replies
/// carry markdown and emoji; spoken replies are plain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogueStyle {
    Chat,
    Voice,
}

impl DialogueStyle {
    pub fn ask_message(self, contact: &str) -> String {
        let name = to_title_tr(contact);
        match self {
            DialogueStyle::Chat => format!("💬 {name}'a ne yazmamı istersin?"),
            DialogueStyle::Voice => format!("{name}'a ne yazmamı istersin?"),
        }
    }

    pub fn confirm_message(self, contact: &str, message: &str) -> String {
        let name = to_title_tr(contact);
        match self {
            DialogueStyle::Chat => {
                format!("📩 {name}'a **\"{message}\"** göndermemi ister misin?\n_(Evet / Hayır)_")
            }
            DialogueStyle::Voice => format!("{name}'a \"{message}\" göndermemi ister misin?"),
        }
    }

    pub fn confirm_call(self, contact: &str) -> String {
        let name = to_title_tr(contact);
        match self {
            DialogueStyle::Chat => {
                format!("📞 **{name}**'ı aramak istiyorsun, emin misin?\n_(Evet / Hayır)_")
            }
            DialogueStyle::Voice => format!("{name}'ı aramak istiyor musun?"),
        }
    }

    pub fn message_cancelled(self) -> String {
        match self {
            DialogueStyle::Chat => "❌ Mesaj iptal edildi.".to_string(),
            DialogueStyle::Voice => "Tamam, mesaj iptal edildi.".to_string(),
        }
    }

    pub fn call_cancelled(self) -> String {
        match self {
            DialogueStyle::Chat => "❌ Arama iptal edildi.".to_string(),
            DialogueStyle::Voice => "Tamam, arama iptal edildi.".to_string(),
        }
    }

    pub fn empty_message(self) -> String {
        match self {
            DialogueStyle::Chat => "Mesaj anlaşılamadı, tekrar yazar mısın?".to_string(),
            DialogueStyle::Voice => "Mesaj anlaşılamadı, tekrar söyler misin?".to_string(),
        }
    }

    pub fn not_understood(self, question: &str) -> String {
        format!("Anlamadım. {question}")
    }
}
