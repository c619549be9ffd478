//! Text hygiene for generated content.
//!
//! Generated strings reach two sinks: the terminal, where the danger is
//! embedded escape sequences, and exported markup, where the danger is
//! live tags.

/// Escape `&`, `<` and `>` so the text can be embedded in markup.
pub fn escape_markup(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
    out
}

/// Drop control characters (ESC, BEL, CSI, …) so generated text cannot
/// drive the terminal.  Tabs become a space; newlines are kept.
pub fn terminal_safe(s: &str) -> String {
    s.chars()
        .filter_map(|c| match c {
            '\n' => Some('\n'),
            '\t' => Some(' '),
            c if c.is_control() => None,
            c => Some(c),
        })
        .collect()
}
