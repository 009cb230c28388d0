//! Text canonicalization for reliable keyword matching
//!
//! Inbound message text arrives with arbitrary casing, Portuguese accents,
//! and whitespace. Classification matches against unaccented lowercase
//! keywords, so everything is folded into that shape first.

/// Canonicalize raw message text: trim, lowercase, fold diacritics, and
/// collapse internal whitespace runs to single spaces.
pub fn normalize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_space = false;

    for ch in raw.trim().chars() {
        if ch.is_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_space && !out.is_empty() {
            out.push(' ');
        }
        pending_space = false;
        for lower in ch.to_lowercase() {
            out.push(fold_diacritic(lower));
        }
    }

    out
}

/// Strip everything but ASCII digits, for numeric menu selection
pub fn digits_only(text: &str) -> String {
    text.chars().filter(char::is_ascii_digit).collect()
}

// Covers the accented characters that occur in Portuguese input.
fn fold_diacritic(ch: char) -> char {
    match ch {
        'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        'ñ' => 'n',
        _ => ch,
    }
}
