//! Layout helpers: split the terminal area into regions.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Primary screen layout: tab bar, form, message line, content pane and a
/// bottom status bar.
#[derive(Debug, Clone, Copy)]
pub struct AppLayout {
    pub tabs_area: Rect,
    pub form_area: Rect,
    pub message_area: Rect,
    pub content_area: Rect,
    pub status_area: Rect,
}

impl AppLayout {
    /// Compute the layout from the full terminal area.
    pub fn from_area(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // mode tabs
                Constraint::Length(3), // form (bordered)
                Constraint::Length(1), // message area
                Constraint::Min(3),    // deck / quiz
                Constraint::Length(1), // status bar
            ])
            .split(area);

        Self {
            tabs_area: chunks[0],
            form_area: chunks[1],
            message_area: chunks[2],
            content_area: chunks[3],
            status_area: chunks[4],
        }
    }

    /// Content area minus its border.
    pub fn content_inner(&self) -> Rect {
        inset(self.content_area, 1)
    }
}

/// The four form fields, laid out left to right inside the form border.
#[derive(Debug, Clone, Copy)]
pub struct FormLayout {
    pub topic: Rect,
    pub count: Rect,
    pub difficulty: Rect,
    pub button: Rect,
}

impl FormLayout {
    pub fn from_area(form_area: Rect) -> Self {
        let inner = inset(form_area, 1);
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Min(16),
                Constraint::Length(12),
                Constraint::Length(26),
                Constraint::Length(28),
            ])
            .split(inner);

        Self {
            topic: chunks[0],
            count: chunks[1],
            difficulty: chunks[2],
            button: chunks[3],
        }
    }
}

/// Shrink `area` by `margin` cells on every side.
pub fn inset(area: Rect, margin: u16) -> Rect {
    Rect {
        x: area.x.saturating_add(margin),
        y: area.y.saturating_add(margin),
        width: area.width.saturating_sub(margin * 2),
        height: area.height.saturating_sub(margin * 2),
    }
}

pub fn point_in_rect(r: Rect, x: u16, y: u16) -> bool {
    x >= r.x && x < r.x.saturating_add(r.width) && y >= r.y && y < r.y.saturating_add(r.height)
}
