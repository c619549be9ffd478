//! Mode tabs and the request form (topic, count, difficulty, generate button).

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use super::layout::{point_in_rect, FormLayout};
use super::theme::Theme;
use crate::app::state::Focus;
use crate::core::mode::Mode;

const APP_TITLE: &str = " studydeck ";

// ───────────────────────────────────────── tabs ──────────────

/// Screen rectangles of the mode tabs, in [`Mode::ALL`] order.
pub fn tab_rects(area: Rect) -> Vec<(Mode, Rect)> {
    let mut x = area.x + APP_TITLE.len() as u16 + 1;
    let mut out = Vec::with_capacity(Mode::ALL.len());
    for mode in Mode::ALL {
        let w = mode.tab_label().len() as u16 + 2;
        out.push((mode, Rect::new(x, area.y, w, 1)));
        x += w + 1;
    }
    out
}

/// Label of the tab under the pointer, if any.
pub fn tab_label_at(area: Rect, x: u16, y: u16) -> Option<&'static str> {
    tab_rects(area)
        .into_iter()
        .find(|(_, r)| point_in_rect(*r, x, y))
        .map(|(mode, _)| mode.tab_label())
}

pub struct TabsBar {
    pub mode: Mode,
}

impl Widget for TabsBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_string(area.x, area.y, APP_TITLE, Theme::title_style());
        for (mode, rect) in tab_rects(area) {
            if rect.x >= area.x + area.width {
                break;
            }
            let style = if mode == self.mode {
                Theme::tab_active_style()
            } else {
                Theme::tab_inactive_style()
            };
            let text = format!(" {} ", mode.tab_label());
            buf.set_stringn(
                rect.x,
                rect.y,
                text,
                (area.x + area.width - rect.x) as usize,
                style,
            );
        }
    }
}

// ───────────────────────────────────────── form ──────────────

/// Part of the form under a mouse click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormHit {
    Field(Focus),
    Button,
}

pub fn form_hit(form_area: Rect, x: u16, y: u16) -> Option<FormHit> {
    let l = FormLayout::from_area(form_area);
    if point_in_rect(l.button, x, y) {
        Some(FormHit::Button)
    } else if point_in_rect(l.topic, x, y) {
        Some(FormHit::Field(Focus::Topic))
    } else if point_in_rect(l.count, x, y) {
        Some(FormHit::Field(Focus::Count))
    } else if point_in_rect(l.difficulty, x, y) {
        Some(FormHit::Field(Focus::Difficulty))
    } else {
        None
    }
}

pub struct FormWidget<'a> {
    pub topic: &'a str,
    pub count: &'a str,
    pub difficulty: &'a str,
    pub button_label: &'a str,
    pub focus: Focus,
}

impl Widget for FormWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Block::default()
            .borders(Borders::ALL)
            .border_style(Theme::border_style())
            .render(area, buf);

        let l = FormLayout::from_area(area);

        text_field("Topic", self.topic, self.focus == Focus::Topic, l.topic, buf);
        text_field("Count", self.count, self.focus == Focus::Count, l.count, buf);

        let focused = self.focus == Focus::Difficulty;
        Paragraph::new(Line::from(vec![
            Span::styled(" Difficulty ", Theme::field_label_style()),
            Span::styled(format!("‹ {} ›", self.difficulty), Theme::field_style(focused)),
        ]))
        .render(l.difficulty, buf);

        Paragraph::new(Line::from(Span::styled(
            format!(" {} ", self.button_label),
            Theme::button_style(),
        )))
        .right_aligned()
        .render(l.button, buf);
    }
}

/// `Label value▏`, scrolled so the end of the value (and the caret) stays visible.
fn text_field(label: &str, value: &str, focused: bool, area: Rect, buf: &mut Buffer) {
    let prefix = format!(" {label} ");
    let room = (area.width as usize).saturating_sub(prefix.len() + 1);
    let chars: Vec<char> = value.chars().collect();
    let visible: String = chars[chars.len().saturating_sub(room)..].iter().collect();
    let mut spans = vec![
        Span::styled(prefix, Theme::field_label_style()),
        Span::styled(visible, Theme::field_style(focused)),
    ];
    if focused {
        spans.push(Span::styled("▏", Theme::field_style(true)));
    }
    Paragraph::new(Line::from(spans)).render(area, buf);
}
