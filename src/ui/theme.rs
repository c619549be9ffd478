//! Colour palette and text styles used across the UI.

use ratatui::style::{Color, Modifier, Style};

/// Central theme: change colours here and they propagate everywhere.
pub struct Theme;

impl Theme {
    // ── tabs & form ────────────────────────────────────────────
    pub fn tab_active_style() -> Style {
        Style::default()
            .bg(Color::Indexed(61))
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    }

    pub fn tab_inactive_style() -> Style {
        Style::default().fg(Color::Gray)
    }

    pub fn field_label_style() -> Style {
        Style::default().fg(Color::DarkGray)
    }

    pub fn field_style(focused: bool) -> Style {
        if focused {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        }
    }

    pub fn button_style() -> Style {
        Style::default()
            .bg(Color::Indexed(61))
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    }

    // ── message area ───────────────────────────────────────────
    pub fn info_style() -> Style {
        Style::default().bg(Color::Indexed(238)).fg(Color::White)
    }

    pub fn error_style() -> Style {
        Style::default()
            .bg(Color::Indexed(161))
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    }

    // ── cards ──────────────────────────────────────────────────
    pub fn card_front_style() -> Style {
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    }

    pub fn card_back_style() -> Style {
        Style::default().fg(Color::Cyan)
    }

    pub fn card_border_style(selected: bool) -> Style {
        if selected {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        }
    }

    // ── quiz ───────────────────────────────────────────────────
    pub fn question_style() -> Style {
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    }

    pub fn option_style() -> Style {
        Style::default().fg(Color::Gray)
    }

    pub fn option_correct_style() -> Style {
        Style::default().bg(Color::Green).fg(Color::Black)
    }

    pub fn option_incorrect_style() -> Style {
        Style::default().bg(Color::Red).fg(Color::White)
    }

    pub fn checkmark_style() -> Style {
        Style::default()
            .fg(Color::LightGreen)
            .add_modifier(Modifier::BOLD)
    }

    pub fn cursor_style() -> Style {
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD)
    }

    pub fn submit_style() -> Style {
        Style::default()
            .bg(Color::Green)
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD)
    }

    // ── chrome ─────────────────────────────────────────────────
    pub fn border_style() -> Style {
        Style::default().fg(Color::Gray)
    }

    pub fn title_style() -> Style {
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD)
    }

    pub fn status_bar_style() -> Style {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    }
}
