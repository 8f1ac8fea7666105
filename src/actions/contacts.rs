use crate::kernel::text::{to_lower_tr, to_title_tr, to_upper_tr};
use crate::platform::{ContactBook, Permission, PermissionGate};
use std::sync::Arc;

/// Resolves a spoken name to a phone number.
///
/// Search terms, in order: the name itself, the name without a possessive
/// `-m` ("babam" -> "baba"), and the name without a trailing case vowel
/// ("ahmete" -> "ahmet"). Each term is tried exactly (as spoken, Title Case,
/// UPPER CASE) and then as a substring; a full scan of the book comes last.
///
/// The first hit wins. Two contacts sharing a name are not disambiguated.
#[derive(Clone)]
pub struct ContactResolver {
    book: Arc<dyn ContactBook>,
    permissions: Arc<dyn PermissionGate>,
}

impl ContactResolver {
    pub fn new(book: Arc<dyn ContactBook>, permissions: Arc<dyn PermissionGate>) -> Self {
        Self { book, permissions }
    }

    pub fn can_read(&self) -> bool {
        self.permissions.is_granted(Permission::Contacts)
    }

    pub fn lookup(&self, name: &str) -> Option<String> {
        if !self.can_read() {
            tracing::debug!("contacts permission missing; lookup skipped");
            return None;
        }
        let terms = search_terms(name);
        if terms.is_empty() {
            return None;
        }

        for term in &terms {
            let variants = [term.clone(), to_title_tr(term), to_upper_tr(term)];
            if let Some(number) = variants.iter().find_map(|v| self.book.find_exact(v)) {
                return Some(number);
            }
            if let Some(number) = self.book.find_containing(term) {
                return Some(number);
            }
        }

        self.book.all().into_iter().find_map(|entry| {
            let display = to_lower_tr(&entry.display_name);
            terms
                .iter()
                .any(|term| display == *term || display.contains(term.as_str()))
                .then_some(entry.number)
        })
    }
}

pub fn search_terms(name: &str) -> Vec<String> {
    let base = to_lower_tr(name.trim());
    if base.is_empty() {
        return Vec::new();
    }
    let mut terms = vec![base.clone()];
    let chars: Vec<char> = base.chars().collect();
    let n = chars.len();

    if n > 2 && chars[n - 1] == 'm' {
        push_unique(&mut terms, chars[..n - 1].iter().collect());
    }
    if n > 3 && is_vowel(chars[n - 1]) && !is_vowel(chars[n - 2]) {
        push_unique(&mut terms, chars[..n - 1].iter().collect());
    }
    terms
}

fn push_unique(terms: &mut Vec<String>, term: String) {
    if !terms.contains(&term) {
        terms.push(term);
    }
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'ı' | 'i' | 'o' | 'ö' | 'u' | 'ü')
}
