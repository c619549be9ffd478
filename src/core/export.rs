//! Study-sheet export: the current deck or quiz as a standalone HTML page.
//!
//! Layout follows the printed sheet: a topic title, then one numbered block
//! per item.  Every generated string goes through [`escape_markup`].

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, Local};

use super::deck::Deck;
use super::quiz::Quiz;
use super::sanitize::escape_markup;

/// What to put on the sheet.
pub enum Sheet<'a> {
    Flashcards(&'a Deck),
    Quiz(&'a Quiz),
}

/// Render the sheet to an HTML string.
pub fn render_html(topic: &str, sheet: &Sheet<'_>, generated_at: DateTime<Local>) -> String {
    let topic = escape_markup(topic);
    let mut out = String::new();
    let _ = writeln!(out, "<!DOCTYPE html>");
    let _ = writeln!(out, "<html><head><meta charset=\"utf-8\"><title>{topic}</title></head>");
    let _ = writeln!(out, "<body>");
    let _ = writeln!(out, "<h1><b>Topic:</b> {topic}</h1>");
    let _ = writeln!(
        out,
        "<p><small>Generated {}</small></p>",
        generated_at.format("%Y-%m-%d %H:%M")
    );

    match sheet {
        Sheet::Flashcards(deck) => {
            for (idx, card) in deck.cards.iter().enumerate() {
                let _ = writeln!(
                    out,
                    "<p><b>{}. Q:</b> {}<br><b>A:</b> {}</p>",
                    idx + 1,
                    escape_markup(&card.front),
                    escape_markup(&card.back),
                );
            }
        }
        Sheet::Quiz(quiz) => {
            for (idx, q) in quiz.questions.iter().enumerate() {
                let _ = writeln!(out, "<p><b>{}. Q:</b> {}</p>", idx + 1, escape_markup(&q.question));
                let _ = writeln!(out, "<ul>");
                for opt in &q.options {
                    let _ = writeln!(out, "<li>{}</li>", escape_markup(opt));
                }
                let _ = writeln!(out, "</ul>");
                let answer = q.correct_answer.as_deref().unwrap_or("");
                let _ = writeln!(out, "<p><b>Answer:</b> {}</p>", escape_markup(answer));
            }
        }
    }

    let _ = writeln!(out, "</body></html>");
    out
}

/// Make `topic` usable as a file stem: path separators and control
/// characters become `_`; an empty result becomes `export`.
pub fn file_stem(topic: &str) -> String {
    let stem: String = topic
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    if stem.is_empty() || stem.chars().all(|c| c == '.') {
        "export".to_string()
    } else {
        stem
    }
}

/// Target path `{dir}/{topic}.{ext}`.
pub fn target_path(dir: &Path, topic: &str, ext: &str) -> PathBuf {
    dir.join(format!("{}.{ext}", file_stem(topic)))
}

/// Render and write the sheet into `dir`, returning the written path.
pub fn write_sheet(dir: &Path, topic: &str, sheet: &Sheet<'_>) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("creating {}", dir.display()))?;
    let path = target_path(dir, topic, "html");
    let html = render_html(topic, sheet, Local::now());
    std::fs::write(&path, html).with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;
    use crate::core::items::{FlashcardItem, McqItem};

    #[test]
    fn flashcard_sheet_escapes_item_text() {
        let deck = Deck::from_items(
            vec![FlashcardItem {
                front: "<script>alert(1)</script>".into(),
                back: "a & b > c".into(),
            }],
            Instant::now(),
        );
        let html = render_html("HTML <tags>", &Sheet::Flashcards(&deck), Local::now());
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(html.contains("a &amp; b &gt; c"));
        assert!(html.contains("<b>Topic:</b> HTML &lt;tags&gt;"));
        assert!(html.contains("<b>1. Q:</b>"));
    }

    #[test]
    fn quiz_sheet_lists_options_and_answer() {
        let quiz = Quiz::from_items(vec![McqItem {
            question: "Capital?".into(),
            options: vec!["Paris".into(), "London".into()],
            correct_answer: Some("Paris".into()),
        }]);
        let html = render_html("Geo", &Sheet::Quiz(&quiz), Local::now());
        assert!(html.contains("<li>Paris</li>"));
        assert!(html.contains("<li>London</li>"));
        assert!(html.contains("<b>Answer:</b> Paris"));
    }

    #[test]
    fn stems_are_filesystem_safe() {
        assert_eq!(file_stem("Photosynthesis"), "Photosynthesis");
        assert_eq!(file_stem("a/b\\c"), "a_b_c");
        assert_eq!(file_stem("   "), "export");
        assert_eq!(file_stem(".."), "export");
        assert_eq!(
            target_path(Path::new("/tmp"), "Rust", "csv"),
            PathBuf::from("/tmp/Rust.csv")
        );
    }
}
