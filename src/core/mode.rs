//! Study mode: which kind of content is requested and which container is shown.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Count shown on the generate button when the count field is unusable.
pub const FALLBACK_LABEL_COUNT: i64 = 5;

/// Exactly one mode is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Flashcard,
    Mcq,
}

impl Mode {
    /// Tab order, left to right.
    pub const ALL: [Mode; 2] = [Mode::Flashcard, Mode::Mcq];

    /// Map a tab label (or any user-supplied mode name) to a mode.
    /// Anything that is not recognisably "mcq" selects flashcards.
    pub fn from_tab_label(label: &str) -> Self {
        if label.trim().eq_ignore_ascii_case("mcq") {
            Mode::Mcq
        } else {
            Mode::Flashcard
        }
    }

    /// Wire value used in the request body.
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Flashcard => "flashcard",
            Mode::Mcq => "mcq",
        }
    }

    /// Label drawn on the tab.
    pub fn tab_label(self) -> &'static str {
        match self {
            Mode::Flashcard => "Flashcards",
            Mode::Mcq => "MCQ",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Mode::Flashcard => Mode::Mcq,
            Mode::Mcq => Mode::Flashcard,
        }
    }

    /// Text of the generate button for the raw contents of the count field.
    pub fn generate_label(self, count_input: &str) -> String {
        let n = label_count(count_input);
        match self {
            Mode::Flashcard => format!("Generate Flashcards ({n})"),
            Mode::Mcq => format!("Generate MCQ Quiz ({n})"),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Leading integer of `input`, or [`FALLBACK_LABEL_COUNT`] if there is none
/// or it is zero.  Negative values are shown as typed; validation rejects
/// them later.
pub fn label_count(input: &str) -> i64 {
    leading_int(input)
        .filter(|&n| n != 0)
        .unwrap_or(FALLBACK_LABEL_COUNT)
}

/// Parse an optional sign followed by decimal digits at the start of `input`
/// (after leading whitespace).  Trailing garbage is ignored.
pub(crate) fn leading_int(input: &str) -> Option<i64> {
    let s = input.trim_start();
    let (sign, digits) = match s.as_bytes().first() {
        Some(b'-') => (-1, &s[1..]),
        Some(b'+') => (1, &s[1..]),
        _ => (1, s),
    };
    let end = digits
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(digits.len(), |(i, _)| i);
    if end == 0 {
        return None;
    }
    digits[..end].parse::<i64>().ok().map(|n| n * sign)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unrecognised_labels_select_flashcards() {
        assert_eq!(Mode::from_tab_label("MCQ"), Mode::Mcq);
        assert_eq!(Mode::from_tab_label("  mcq "), Mode::Mcq);
        assert_eq!(Mode::from_tab_label("Flashcards"), Mode::Flashcard);
        assert_eq!(Mode::from_tab_label("quiz"), Mode::Flashcard);
        assert_eq!(Mode::from_tab_label(""), Mode::Flashcard);
    }

    #[test]
    fn button_label_tracks_count_field() {
        assert_eq!(Mode::Flashcard.generate_label("3"), "Generate Flashcards (3)");
        assert_eq!(Mode::Mcq.generate_label("12"), "Generate MCQ Quiz (12)");
        assert_eq!(Mode::Mcq.generate_label(""), "Generate MCQ Quiz (5)");
        assert_eq!(Mode::Flashcard.generate_label("0"), "Generate Flashcards (5)");
        assert_eq!(Mode::Flashcard.generate_label("7abc"), "Generate Flashcards (7)");
    }

    #[test]
    fn leading_int_matches_lenient_parsing() {
        assert_eq!(leading_int(" 42"), Some(42));
        assert_eq!(leading_int("-3"), Some(-3));
        assert_eq!(leading_int("x1"), None);
        assert_eq!(leading_int("-"), None);
    }

    #[test]
    fn wire_names() {
        assert_eq!(serde_json::to_string(&Mode::Mcq).unwrap(), "\"mcq\"");
        assert_eq!(Mode::Flashcard.to_string(), "flashcard");
        assert_eq!(Mode::Flashcard.toggled(), Mode::Mcq);
    }
}
