//! Waiting indicator: a small spinner + label rendered at the right edge
//! of a one-row area while backend requests are in flight.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

/// Braille-dot spinner frames.  Cycles through these on each tick.
const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub struct BusyIndicator<'a> {
    /// Whether to show the indicator at all.
    pub visible: bool,
    /// Monotonically increasing tick counter (drives the spinner frame).
    pub tick: u64,
    pub label: &'a str,
}

impl Widget for BusyIndicator<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let label = format!(" {} {} ", frame_for(self.tick), self.label);
        let label_width = label.chars().count() as u16;
        if !self.visible || area.width < label_width + 1 || area.height == 0 {
            return;
        }

        let x = area.x + area.width.saturating_sub(label_width + 1);
        let line = Line::from(Span::styled(
            label,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ));

        buf.set_line(x, area.y, &line, label_width);
    }
}

pub fn frame_for(tick: u64) -> &'static str {
    SPINNER_FRAMES[(tick as usize) % SPINNER_FRAMES.len()]
}
