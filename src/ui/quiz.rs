//! Quiz view: numbered questions, one selectable row per option and a
//! trailing submit row.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use super::layout::point_in_rect;
use super::theme::Theme;
use crate::core::deck::wrap_lines;
use crate::core::quiz::{OptionMark, Quiz, QuizRow};

const OPTION_INDENT: usize = 4;
const SUBMIT_LABEL: &str = "[ Submit Quiz ]";

/// Every display line of the quiz at `width`, tagged with the selectable row
/// it belongs to (question text and spacers carry `None`).
fn quiz_lines(
    quiz: &Quiz,
    width: u16,
    cursor: Option<QuizRow>,
) -> Vec<(Line<'static>, Option<QuizRow>)> {
    let width = width.max(1) as usize;
    let option_width = width.saturating_sub(OPTION_INDENT).max(1);
    let mut out = Vec::new();
    if !quiz.is_rendered() {
        return out;
    }

    for (qi, q) in quiz.questions.iter().enumerate() {
        for line in wrap_lines(&format!("{}. {}", qi + 1, q.question), width) {
            out.push((Line::styled(line, Theme::question_style()), None));
        }

        for (oi, opt) in q.options.iter().enumerate() {
            let row = QuizRow::Option { question: qi, option: oi };
            let mark = q.marks.get(oi).copied().unwrap_or_default();
            let mut style = match mark {
                OptionMark::Neutral => Theme::option_style(),
                OptionMark::Correct => Theme::option_correct_style(),
                OptionMark::Incorrect => Theme::option_incorrect_style(),
            };
            if cursor == Some(row) {
                style = if mark == OptionMark::Neutral {
                    style.patch(Theme::cursor_style())
                } else {
                    style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
                };
            }
            let tick = if q.chosen == Some(oi) { "✓" } else { " " };

            for (i, chunk) in wrap_lines(opt, option_width).into_iter().enumerate() {
                let lead = if i == 0 {
                    Span::styled(format!("  {tick} "), Theme::checkmark_style())
                } else {
                    Span::raw(" ".repeat(OPTION_INDENT))
                };
                out.push((Line::from(vec![lead, Span::styled(chunk, style)]), Some(row)));
            }
        }
        out.push((Line::raw(""), None));
    }

    let mut submit = Theme::submit_style();
    if cursor == Some(QuizRow::Submit) {
        submit = submit.add_modifier(Modifier::REVERSED);
    }
    out.push((Line::styled(SUBMIT_LABEL, submit), Some(QuizRow::Submit)));
    out
}

/// Row under each display line, for hit-testing and scrolling.
pub fn line_rows(quiz: &Quiz, width: u16) -> Vec<Option<QuizRow>> {
    quiz_lines(quiz, width, None).into_iter().map(|(_, r)| r).collect()
}

/// Selectable row under a click inside the quiz `area`.
pub fn row_at(quiz: &Quiz, area: Rect, x: u16, y: u16) -> Option<QuizRow> {
    if !quiz.is_rendered() || !point_in_rect(area, x, y) {
        return None;
    }
    let line = (y - area.y) as usize + quiz.scroll as usize;
    line_rows(quiz, area.width).get(line).copied().flatten()
}

/// Adjust `quiz.scroll` so every line of the cursor row is visible.
pub fn scroll_to_cursor(quiz: &mut Quiz, area: Rect) {
    let Some(target) = quiz.current_row() else {
        return;
    };
    let rows = line_rows(quiz, area.width);
    let Some(first) = rows.iter().position(|r| *r == Some(target)) else {
        return;
    };
    let last = rows.iter().rposition(|r| *r == Some(target)).unwrap_or(first);
    let (first, last) = (first as u16, last as u16);
    let view = area.height.max(1);

    if first < quiz.scroll {
        quiz.scroll = first;
    } else if last >= quiz.scroll.saturating_add(view) {
        quiz.scroll = (last + 1).saturating_sub(view).min(first);
    }
}

/// Scroll by `delta` lines, clamped to the content.
pub fn scroll_by(quiz: &mut Quiz, area: Rect, delta: i32) {
    let total = line_rows(quiz, area.width).len() as i32;
    let max = (total - area.height as i32).max(0);
    quiz.scroll = (quiz.scroll as i32 + delta).clamp(0, max) as u16;
}

pub struct QuizWidget<'a> {
    pub quiz: &'a Quiz,
    pub focused: bool,
}

impl Widget for QuizWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if !self.quiz.is_rendered() {
            Paragraph::new("No quiz yet. Enter a topic and generate.")
                .style(Theme::field_label_style())
                .render(area, buf);
            return;
        }

        let cursor = self.focused.then(|| self.quiz.current_row()).flatten();
        let lines: Vec<Line> = quiz_lines(self.quiz, area.width, cursor)
            .into_iter()
            .map(|(l, _)| l)
            .collect();
        Paragraph::new(lines)
            .scroll((self.quiz.scroll, 0))
            .render(area, buf);
    }
}
