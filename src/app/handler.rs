//! Input handling: maps key/mouse events to state mutations.

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use super::cycle;
use super::state::{ActiveView, AppState, Focus};
use crate::api::DownloadFormat;
use crate::config::{Action, AppConfig};
use crate::core::mode::Mode;
use crate::core::quiz::QuizRow;
use crate::ui::cards::card_at;
use crate::ui::form::{form_hit, tab_label_at, FormHit};
use crate::ui::layout::{point_in_rect, AppLayout};
use crate::ui::quiz::{row_at, scroll_by, scroll_to_cursor};

/// Lines moved per mouse-wheel notch in the quiz view.
const WHEEL_LINES: i32 = 3;

/// Process a key event, dispatching based on the active view and focus.
pub fn handle_key(state: &mut AppState, key: KeyEvent) {
    // Ctrl+c always quits, regardless of view.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return;
    }

    match state.active_view {
        ActiveView::Help => handle_help_key(state, key),
        ActiveView::Study if state.focus.is_form() => handle_form_key(state, key),
        ActiveView::Study => handle_content_key(state, key, Instant::now()),
    }
}

/// Append pasted text to the focused text field.
pub fn handle_paste(state: &mut AppState, text: &str) {
    let clean = text.chars().filter(|c| !c.is_control());
    match state.focus {
        Focus::Topic => state.topic.extend(clean),
        Focus::Count => state.count.extend(clean),
        Focus::Difficulty | Focus::Content => {}
    }
}

/// Advance the spinner and apply any card height resync that is due.
pub fn on_tick(state: &mut AppState, now: Instant) {
    state.tick = state.tick.wrapping_add(1);
    let inner = AppLayout::from_area(state.terminal_area).content_inner();
    if state.deck.tick(now, inner.width) {
        state.deck.scroll_to_selected(inner.height);
    }
}

/// Track the new terminal size and remeasure cards against it right away.
pub fn on_resize(state: &mut AppState, width: u16, height: u16) {
    state.terminal_area = Rect::new(0, 0, width, height);
    let inner = AppLayout::from_area(state.terminal_area).content_inner();
    state.deck.remeasure(inner.width);
    state.deck.scroll_to_selected(inner.height);
}

// ── Help overlay ────────────────────────────────────────────────

fn handle_help_key(state: &mut AppState, key: KeyEvent) {
    let closes = matches!(key.code, KeyCode::Esc | KeyCode::Char('q'))
        || state.config.match_key(key) == Some(Action::Help);
    if closes {
        state.active_view = ActiveView::Study;
    }
}

// ── Form (free text entry) ──────────────────────────────────────

fn handle_form_key(state: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Tab => {
            state.focus = state.focus.next();
            return;
        }
        KeyCode::BackTab => {
            state.focus = state.focus.prev();
            return;
        }
        KeyCode::Esc => {
            state.focus = Focus::Content;
            return;
        }
        KeyCode::Enter => {
            cycle::request_generation(state);
            return;
        }
        _ => {}
    }

    let typing = !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);
    let field = match state.focus {
        Focus::Topic => &mut state.topic,
        Focus::Count => &mut state.count,
        Focus::Difficulty => {
            match key.code {
                KeyCode::Left => set_difficulty(state, AppConfig::prev_difficulty),
                KeyCode::Right | KeyCode::Char(' ') => {
                    set_difficulty(state, AppConfig::next_difficulty)
                }
                _ => {}
            }
            return;
        }
        Focus::Content => return,
    };
    match key.code {
        KeyCode::Char(c) if typing => field.push(c),
        KeyCode::Backspace => {
            field.pop();
        }
        _ => {}
    }
}

fn set_difficulty(state: &mut AppState, step: fn(&str) -> &'static str) {
    let next = step(&state.difficulty);
    state.difficulty = next.to_string();
    state.config.difficulty = next.to_string();
    state.config_dirty = true;
}

// ── Content pane (configurable bindings) ────────────────────────

fn handle_content_key(state: &mut AppState, key: KeyEvent, now: Instant) {
    match key.code {
        KeyCode::Tab => {
            state.focus = state.focus.next();
            return;
        }
        KeyCode::BackTab => {
            state.focus = state.focus.prev();
            return;
        }
        _ => {}
    }

    let Some(action) = state.config.match_key(key) else {
        return;
    };
    let inner = AppLayout::from_area(state.terminal_area).content_inner();

    match action {
        Action::Quit => state.should_quit = true,
        Action::Help => state.active_view = ActiveView::Help,
        Action::MoveDown => match state.mode {
            Mode::Flashcard => {
                state.deck.select_next();
                state.deck.scroll_to_selected(inner.height);
            }
            Mode::Mcq => {
                state.quiz.cursor_down();
                scroll_to_cursor(&mut state.quiz, inner);
            }
        },
        Action::MoveUp => match state.mode {
            Mode::Flashcard => {
                state.deck.select_prev();
                state.deck.scroll_to_selected(inner.height);
            }
            Mode::Mcq => {
                state.quiz.cursor_up();
                scroll_to_cursor(&mut state.quiz, inner);
            }
        },
        Action::Activate => match state.mode {
            Mode::Flashcard => state.deck.flip_selected(now),
            Mode::Mcq => {
                if let Some(row) = state.quiz.current_row() {
                    activate_quiz_row(state, row);
                }
            }
        },
        Action::SwitchMode => state.set_mode(state.mode.toggled()),
        Action::Generate => cycle::request_generation(state),
        Action::EditForm => state.focus = Focus::Topic,
        Action::CycleDifficulty => set_difficulty(state, AppConfig::next_difficulty),
        Action::Submit => {
            if state.mode == Mode::Mcq {
                cycle::submit_quiz(state);
            }
        }
        Action::DownloadCsv => cycle::request_download(state, DownloadFormat::Csv),
        Action::DownloadPdf => cycle::request_download(state, DownloadFormat::Pdf),
        Action::ExportSheet => cycle::export_sheet(state),
        Action::DeleteGeneration => cycle::request_delete(state),
    }
}

fn activate_quiz_row(state: &mut AppState, row: QuizRow) {
    match row {
        QuizRow::Option { question, option } => state.quiz.choose(question, option),
        QuizRow::Submit => cycle::submit_quiz(state),
    }
}

// ── Mouse ───────────────────────────────────────────────────────

/// Process a mouse event.
pub fn handle_mouse(state: &mut AppState, mouse: MouseEvent) {
    handle_mouse_at(state, mouse, Instant::now());
}

fn handle_mouse_at(state: &mut AppState, mouse: MouseEvent, now: Instant) {
    if state.active_view == ActiveView::Help {
        if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
            state.active_view = ActiveView::Study;
        }
        return;
    }

    let layout = AppLayout::from_area(state.terminal_area);
    let inner = layout.content_inner();
    let (x, y) = (mouse.column, mouse.row);

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if let Some(label) = tab_label_at(layout.tabs_area, x, y) {
                state.set_mode(Mode::from_tab_label(label));
                return;
            }

            match form_hit(layout.form_area, x, y) {
                Some(FormHit::Button) => {
                    cycle::request_generation(state);
                    return;
                }
                Some(FormHit::Field(Focus::Difficulty)) => {
                    if state.focus == Focus::Difficulty {
                        set_difficulty(state, AppConfig::next_difficulty);
                    }
                    state.focus = Focus::Difficulty;
                    return;
                }
                Some(FormHit::Field(field)) => {
                    state.focus = field;
                    return;
                }
                None => {}
            }

            if !point_in_rect(layout.content_area, x, y) {
                return;
            }
            state.focus = Focus::Content;
            match state.mode {
                Mode::Flashcard => {
                    if let Some(idx) = card_at(&state.deck, inner, x, y) {
                        state.deck.flip(idx, now);
                    }
                }
                Mode::Mcq => {
                    if let Some(row) = row_at(&state.quiz, inner, x, y) {
                        if let Some(pos) = state.quiz.rows().iter().position(|r| *r == row) {
                            state.quiz.cursor = pos;
                        }
                        activate_quiz_row(state, row);
                    }
                }
            }
        }
        MouseEventKind::ScrollDown if point_in_rect(layout.content_area, x, y) => {
            match state.mode {
                Mode::Flashcard => {
                    state.deck.select_next();
                    state.deck.scroll_to_selected(inner.height);
                }
                Mode::Mcq => scroll_by(&mut state.quiz, inner, WHEEL_LINES),
            }
        }
        MouseEventKind::ScrollUp if point_in_rect(layout.content_area, x, y) => {
            match state.mode {
                Mode::Flashcard => {
                    state.deck.select_prev();
                    state.deck.scroll_to_selected(inner.height);
                }
                Mode::Mcq => scroll_by(&mut state.quiz, inner, -WHEEL_LINES),
            }
        }
        _ => {}
    }
}
