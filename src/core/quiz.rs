//! Multiple-choice quiz: selection state and grading.
//!
//! Each question owns its single selection (`chosen`), so choosing a new
//! option implicitly clears the previous one.  Grading recolours every
//! option and produces a [`Score`].

use std::fmt;

use super::items::McqItem;
use super::sanitize::terminal_safe;

/// Colouring applied to an option row by the last grading pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OptionMark {
    #[default]
    Neutral,
    Correct,
    Incorrect,
}

#[derive(Debug, Clone)]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: Option<String>,
    /// Index into `options` of the user's pick.
    pub chosen: Option<usize>,
    /// Per-option marks from the last submit (all neutral before grading).
    pub marks: Vec<OptionMark>,
}

impl QuizQuestion {
    fn new(item: McqItem) -> Self {
        let options: Vec<String> = item.options.iter().map(|o| terminal_safe(o)).collect();
        Self {
            question: terminal_safe(&item.question),
            marks: vec![OptionMark::Neutral; options.len()],
            options,
            correct_answer: item.correct_answer.as_deref().map(terminal_safe),
            chosen: None,
        }
    }

    pub fn chosen_text(&self) -> Option<&str> {
        self.chosen
            .and_then(|i| self.options.get(i))
            .map(String::as_str)
    }

    pub fn is_correct(&self) -> bool {
        matches!(
            (self.chosen_text(), self.correct_answer.as_deref()),
            (Some(c), Some(a)) if c == a
        )
    }

    fn grade(&mut self) {
        let chosen = self.chosen_text().map(str::to_owned);
        let correct = self.correct_answer.as_deref();
        self.marks = self
            .options
            .iter()
            .map(|opt| {
                if Some(opt.as_str()) == correct {
                    OptionMark::Correct
                } else if chosen.as_deref() == Some(opt.as_str()) {
                    OptionMark::Incorrect
                } else {
                    OptionMark::Neutral
                }
            })
            .collect();
    }
}

/// Result of one submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Score {
    pub correct: usize,
    pub total: usize,
}

impl Score {
    /// `round(100 * correct / total)`, or `None` for an empty quiz.
    pub fn percent(&self) -> Option<u32> {
        if self.total == 0 {
            return None;
        }
        let pct = (self.correct as f64 / self.total as f64 * 100.0).round();
        Some(pct as u32)
    }

    /// Message-area text, e.g. `You scored 2/3 (67%).`
    pub fn message(&self) -> String {
        format!("You scored {self}.")
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.percent() {
            Some(p) => write!(f, "{}/{} ({p}%)", self.correct, self.total),
            None => write!(f, "{}/{} (N/A)", self.correct, self.total),
        }
    }
}

/// A selectable row in the quiz view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizRow {
    Option { question: usize, option: usize },
    Submit,
}

#[derive(Debug, Clone, Default)]
pub struct Quiz {
    pub questions: Vec<QuizQuestion>,
    /// Index into [`Quiz::rows`] of the highlighted row.
    pub cursor: usize,
    /// First visible line of the quiz view.
    pub scroll: u16,
    pub last_score: Option<Score>,
    /// `false` until a generation has been rendered; a default quiz has no
    /// rows at all, not even the submit row.
    rendered: bool,
}

impl Quiz {
    /// Build a fresh quiz, discarding whatever was shown before.
    pub fn from_items(items: Vec<McqItem>) -> Self {
        Self {
            questions: items.into_iter().map(QuizQuestion::new).collect(),
            cursor: 0,
            scroll: 0,
            last_score: None,
            rendered: true,
        }
    }

    pub fn is_rendered(&self) -> bool {
        self.rendered
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Every selectable row in display order; the submit row is always last
    /// once the quiz is rendered.
    pub fn rows(&self) -> Vec<QuizRow> {
        if !self.rendered {
            return Vec::new();
        }
        let mut rows = Vec::new();
        for (qi, q) in self.questions.iter().enumerate() {
            for oi in 0..q.options.len() {
                rows.push(QuizRow::Option { question: qi, option: oi });
            }
        }
        rows.push(QuizRow::Submit);
        rows
    }

    /// Highlighted row, `None` before anything is rendered.
    pub fn current_row(&self) -> Option<QuizRow> {
        let rows = self.rows();
        rows.get(self.cursor).or(rows.last()).copied()
    }

    pub fn cursor_down(&mut self) {
        if self.cursor + 1 < self.rows().len() {
            self.cursor += 1;
        }
    }

    pub fn cursor_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Mark `option` as the single choice for `question`.
    pub fn choose(&mut self, question: usize, option: usize) {
        if let Some(q) = self.questions.get_mut(question) {
            if option < q.options.len() {
                q.chosen = Some(option);
            }
        }
    }

    /// Grade every question and remember the score.
    pub fn grade(&mut self) -> Score {
        for q in &mut self.questions {
            q.grade();
        }
        let score = Score {
            correct: self.questions.iter().filter(|q| q.is_correct()).count(),
            total: self.questions.len(),
        };
        self.last_score = Some(score);
        self.scroll = 0;
        score
    }
}
