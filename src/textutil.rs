//! Shared text helpers for ANSI-aware width and UTF-8-safe indexing.
//!
//! Prompts arrive pre-colorized, so any column arithmetic has to count the
//! characters a terminal actually paints. Buffer offsets are byte offsets and
//! must only ever land on char boundaries.

/// Remove ANSI escape sequences (CSI and two-byte `ESC x` forms).
pub fn strip_ansi(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '\x1b' {
            out.push(ch);
            continue;
        }
        match chars.peek() {
            Some('[') => {
                chars.next();
                // Parameters and intermediates run until a final byte in @..~.
                for c in chars.by_ref() {
                    if ('@'..='~').contains(&c) {
                        break;
                    }
                }
            }
            Some(_) => {
                chars.next();
            }
            None => {}
        }
    }
    out
}

/// Number of terminal cells a string occupies once color codes are removed.
///
/// Uses a single-cell-per-char approximation.
pub fn visible_length(text: &str) -> usize {
    strip_ansi(text).chars().count()
}

/// Clip a string to at most `max_width` visible characters.
pub fn clip_to_width(s: &str, max_width: usize) -> String {
    s.chars().take(max_width).collect()
}

/// Byte offset of the char boundary immediately before `offset`.
pub fn prev_boundary(s: &str, offset: usize) -> usize {
    s[..offset]
        .char_indices()
        .next_back()
        .map(|(idx, _)| idx)
        .unwrap_or(0)
}

/// Byte offset of the char boundary immediately after `offset`.
pub fn next_boundary(s: &str, offset: usize) -> usize {
    s[offset..]
        .chars()
        .next()
        .map(|ch| offset + ch.len_utf8())
        .unwrap_or(s.len())
}
