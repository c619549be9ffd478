//! Flip-card view: one bordered card per flashcard, stacked vertically,
//! each drawn at its tracked height.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::Line,
    widgets::{Block, BorderType, Borders, Paragraph, Widget},
};

use super::theme::Theme;
use crate::core::deck::{wrap_lines, Deck, CARD_CHROME_COLS};

/// Vertical placement of each visible card inside `area`.
pub fn card_rects(deck: &Deck, area: Rect) -> Vec<(usize, Rect)> {
    let mut out = Vec::new();
    let bottom = area.y.saturating_add(area.height);
    let mut y = area.y;
    for (idx, card) in deck.cards.iter().enumerate().skip(deck.offset) {
        if y >= bottom {
            break;
        }
        let h = card.display_height().min(bottom - y);
        out.push((idx, Rect::new(area.x, y, area.width, h)));
        y = y.saturating_add(h);
    }
    out
}

/// Index of the card under row `y`, if any.
pub fn card_at(deck: &Deck, area: Rect, x: u16, y: u16) -> Option<usize> {
    card_rects(deck, area)
        .into_iter()
        .find(|(_, r)| super::layout::point_in_rect(*r, x, y))
        .map(|(idx, _)| idx)
}

pub struct DeckWidget<'a> {
    pub deck: &'a Deck,
    pub focused: bool,
}

impl Widget for DeckWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.deck.is_empty() {
            Paragraph::new("No flashcards yet. Enter a topic and generate.")
                .style(Theme::field_label_style())
                .render(area, buf);
            return;
        }

        let total = self.deck.len();
        for (idx, rect) in card_rects(self.deck, area) {
            let card = &self.deck.cards[idx];
            let selected = self.focused && idx == self.deck.selected;
            let face = if card.flipped { "answer" } else { "question" };

            let block = Block::default()
                .title(format!(" {}/{total} · {face} ", idx + 1))
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Theme::card_border_style(selected));
            let inner = block.inner(rect);
            block.render(rect, buf);

            let style = if card.flipped {
                Theme::card_back_style()
            } else {
                Theme::card_front_style()
            };
            let text_width = rect.width.saturating_sub(CARD_CHROME_COLS).max(1) as usize;
            let mut lines = vec![Line::raw("")];
            lines.extend(
                wrap_lines(card.active_face(), text_width)
                    .into_iter()
                    .map(|l| Line::styled(l, style).centered()),
            );
            // Two columns of padding either side inside the border.
            let text_area = Rect {
                x: inner.x.saturating_add(2),
                width: inner.width.saturating_sub(4),
                ..inner
            };
            Paragraph::new(lines).render(text_area, buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;
    use crate::core::items::FlashcardItem;

    fn deck(n: usize) -> Deck {
        let items = (1..=n)
            .map(|i| FlashcardItem { front: format!("Q{i}"), back: format!("A{i}") })
            .collect();
        let now = Instant::now();
        let mut d = Deck::from_items(items, now);
        d.tick(now, 40);
        d
    }

    fn screen(buf: &Buffer) -> String {
        let mut s = String::new();
        for y in 0..buf.area.height {
            for x in 0..buf.area.width {
                s.push_str(buf[(x, y)].symbol());
            }
            s.push('\n');
        }
        s
    }

    #[test]
    fn renders_each_card_and_flipped_face() {
        let mut d = deck(3);
        d.flip(0, Instant::now());
        let area = Rect::new(0, 0, 40, 15);
        let mut buf = Buffer::empty(area);
        DeckWidget { deck: &d, focused: true }.render(area, &mut buf);
        let text = screen(&buf);
        assert!(text.contains("A1"));
        assert!(!text.contains("Q1"));
        assert!(text.contains("Q2"));
        assert!(text.contains("Q3"));
        assert!(text.contains("1/3"));
    }

    #[test]
    fn clicks_map_to_cards() {
        let d = deck(3);
        let area = Rect::new(0, 0, 40, 20);
        let h = d.cards[0].height;
        assert_eq!(card_at(&d, area, 5, 0), Some(0));
        assert_eq!(card_at(&d, area, 5, h), Some(1));
        assert_eq!(card_at(&d, area, 5, h * 2 + 1), Some(2));
        assert_eq!(card_at(&d, area, 5, h * 3 + 1), None);
    }

    #[test]
    fn empty_deck_shows_hint() {
        let area = Rect::new(0, 0, 60, 3);
        let mut buf = Buffer::empty(area);
        DeckWidget { deck: &Deck::default(), focused: false }.render(area, &mut buf);
        assert!(screen(&buf).contains("No flashcards yet"));
    }
}
