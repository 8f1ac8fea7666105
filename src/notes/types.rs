use crate::kernel::text::to_lower_tr;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoteCategory {
    Shopping,
    Idea,
    Reminder,
    Personal,
    Work,
    General,
}

impl NoteCategory {
    /// Checked in this order; the first category with a keyword hit wins.
    const KEYWORDS: [(NoteCategory, &'static [&'static str]); 5] = [
        (
            NoteCategory::Shopping,
            &[
                "al", "satın", "market", "ekmek", "süt", "yumurta", "meyve", "sebze", "alış",
                "dükkan", "liste", "lazım", "gerek",
            ],
        ),
        (
            NoteCategory::Idea,
            &[
                "fikir", "proje", "plan", "düşünce", "öğren", "araştır", "dene", "geliştir",
                "uygula", "keşfet",
            ],
        ),
        (
            NoteCategory::Reminder,
            &[
                "unutma", "hatırla", "önemli", "acil", "randevu", "toplantı", "deadline",
                "son gün", "teslim", "saat", "tarih", "yarın", "bugün", "hafta",
            ],
        ),
        (
            NoteCategory::Personal,
            &["ben", "benim", "kişisel", "günlük", "hisset", "duygu", "aile", "arkadaş"],
        ),
        (
            NoteCategory::Work,
            &["iş", "toplantı", "rapor", "sunum", "müşteri", "ofis", "görev"],
        ),
    ];

    /// Keyword guess, matched at word starts.
    pub fn detect(text: &str) -> NoteCategory {
        let lower = to_lower_tr(text);
        let words: Vec<&str> = lower.split_whitespace().collect();
        if words.is_empty() {
            return NoteCategory::General;
        }
        Self::KEYWORDS
            .iter()
            .find(|(_, keywords)| {
                keywords.iter().any(|k| {
                    if k.contains(' ') {
                        lower.contains(k)
                    } else {
                        words.iter().any(|w| w.starts_with(k))
                    }
                })
            })
            .map(|(category, _)| *category)
            .unwrap_or(NoteCategory::General)
    }

    pub fn label(self) -> &'static str {
        match self {
            NoteCategory::Shopping => "Alışveriş",
            NoteCategory::Idea => "Fikir",
            NoteCategory::Reminder => "Hatırlatıcı",
            NoteCategory::Personal => "Kişisel",
            NoteCategory::Work => "İş",
            NoteCategory::General => "Genel",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            NoteCategory::Shopping => "🛒",
            NoteCategory::Idea => "💡",
            NoteCategory::Reminder => "⏰",
            NoteCategory::Personal => "👤",
            NoteCategory::Work => "💼",
            NoteCategory::General => "📌",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: Uuid,
    pub text: String,
    pub category: NoteCategory,
    pub created_at: DateTime<Utc>,
}

impl Note {
    pub fn new(text: &str) -> Self {
        let text = text.trim().to_string();
        Self {
            id: Uuid::new_v4(),
            category: NoteCategory::detect(&text),
            text,
            created_at: Utc::now(),
        }
    }
}
