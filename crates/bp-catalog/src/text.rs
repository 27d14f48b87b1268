use regex::Regex;
use std::sync::LazyLock;

static DECIMAL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]+$").unwrap());
static LOWER_HEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9a-f]*$").unwrap());

/// Non-empty and ASCII digits only.
pub fn is_decimal(s: &str) -> bool {
    DECIMAL.is_match(s)
}

/// Lowercase hex digits only. The empty string qualifies.
pub fn is_lower_hex(s: &str) -> bool {
    LOWER_HEX.is_match(s)
}

/// Positions of each distinct character, in order of first appearance.
pub fn char_index(s: &str) -> Vec<(char, Vec<usize>)> {
    let mut index: Vec<(char, Vec<usize>)> = Vec::new();
    for (i, c) in s.chars().enumerate() {
        match index.iter_mut().find(|(seen, _)| *seen == c) {
            Some((_, positions)) => positions.push(i),
            None => index.push((c, vec![i])),
        }
    }
    index
}

/// Split after the first `at` characters (not bytes).
pub fn split_chars(s: &str, at: usize) -> (&str, &str) {
    let byte = s.char_indices().nth(at).map_or(s.len(), |(i, _)| i);
    s.split_at(byte)
}

/// Character at `index`; negative indices count from the end.
pub fn char_at(s: &str, index: isize) -> Option<char> {
    if index >= 0 {
        s.chars().nth(index as usize)
    } else {
        s.chars().rev().nth(index.unsigned_abs() - 1)
    }
}
