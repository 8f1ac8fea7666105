//! Turkish-locale casing helpers.
//!
//! The standard library casing functions are locale-free, so dotted and
//! dotless i (`i`/`İ`, `ı`/`I`) come out wrong for Turkish input.

use regex::{Captures, Regex};

pub fn to_lower_tr(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            'I' => out.push('ı'),
            'İ' => out.push('i'),
            _ => out.extend(c.to_lowercase()),
        }
    }
    out
}

pub fn to_upper_tr(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        out.extend(upper_char(c));
    }
    out
}

/// Upper-cases the first letter of every whitespace separated word and
/// lower-cases the rest ("ahmet yılmaz" -> "Ahmet Yılmaz").
pub fn to_title_tr(text: &str) -> String {
    let lowered = to_lower_tr(text);
    let mut out = String::with_capacity(lowered.len());
    let mut at_word_start = true;
    for c in lowered.chars() {
        if c.is_whitespace() {
            at_word_start = true;
            out.push(c);
        } else if at_word_start {
            out.extend(upper_char(c));
            at_word_start = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Lower-cases and trims; the canonical form every detector runs on.
pub fn normalize(text: &str) -> String {
    to_lower_tr(text.trim())
}

/// True when the (lazily compiled) pattern matches. A pattern that failed to
/// compile never matches.
pub fn is_match(pattern: &Option<Regex>, text: &str) -> bool {
    pattern.as_ref().is_some_and(|re| re.is_match(text))
}

pub fn find_captures<'t>(pattern: &Option<Regex>, text: &'t str) -> Option<Captures<'t>> {
    pattern.as_ref()?.captures(text)
}

fn upper_char(c: char) -> Vec<char> {
    match c {
        'i' => vec!['İ'],
        'ı' => vec!['I'],
        _ => c.to_uppercase().collect(),
    }
}
