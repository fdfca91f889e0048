use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Byte offset of the `char_index`-th char, or the string length past the end.
pub fn byte_index(s: &str, char_index: usize) -> usize {
    s.char_indices()
        .nth(char_index)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// Terminal column of a cursor sitting before the `char_index`-th char.
pub fn cursor_column(s: &str, char_index: usize) -> usize {
    s[..byte_index(s, char_index)].width()
}

/// Cut `s` to at most `max_width` terminal columns, marking the cut with "...".
pub fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let budget = max_width.saturating_sub(3);
    let mut out = String::new();
    let mut used = 0;
    for ch in s.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        out.push(ch);
        used += w;
    }
    if max_width >= 3 {
        out.push_str("...");
    }
    out
}
