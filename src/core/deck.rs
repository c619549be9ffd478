//! Flashcard deck: the model behind the flip-card view.
//!
//! Each card has two faces and a height.  The height follows the active
//! face, but only after the flip has settled: flipping schedules a resync
//! [`FLIP_SETTLE`] in the future and [`Deck::tick`] applies it.  A freshly
//! built card is due immediately so its first frame measures the front face.

use std::time::{Duration, Instant};

use super::items::FlashcardItem;
use super::sanitize::terminal_safe;

/// Time a flip takes to settle before the card height follows the new face.
pub const FLIP_SETTLE: Duration = Duration::from_millis(400);

/// Rows taken by the card border plus one row of padding above and below.
pub const CARD_CHROME_ROWS: u16 = 4;
/// Columns taken by the card border plus two columns of padding each side.
pub const CARD_CHROME_COLS: u16 = 6;

/// Height used for a card that has not been measured yet.
pub const UNMEASURED_HEIGHT: u16 = CARD_CHROME_ROWS + 1;

#[derive(Debug, Clone)]
pub struct FlipCard {
    pub front: String,
    pub back: String,
    pub flipped: bool,
    /// Current outer height in rows (0 until first measured).
    pub height: u16,
    /// When the height should next be resynced to the active face.
    resync_at: Option<Instant>,
}

impl FlipCard {
    fn new(item: FlashcardItem, now: Instant) -> Self {
        Self {
            front: terminal_safe(&item.front),
            back: terminal_safe(&item.back),
            flipped: false,
            height: 0,
            resync_at: Some(now),
        }
    }

    /// Text of whichever face is showing.
    pub fn active_face(&self) -> &str {
        if self.flipped {
            &self.back
        } else {
            &self.front
        }
    }

    /// Height to draw with, never smaller than an empty card.
    pub fn display_height(&self) -> u16 {
        if self.height == 0 {
            UNMEASURED_HEIGHT
        } else {
            self.height
        }
    }

    pub fn resync_pending(&self) -> bool {
        self.resync_at.is_some()
    }
}

/// The rendered flashcards plus selection.
#[derive(Debug, Clone, Default)]
pub struct Deck {
    pub cards: Vec<FlipCard>,
    pub selected: usize,
    /// Index of the first visible card.
    pub offset: usize,
    /// Width the heights were last measured against.
    measured_width: u16,
}

impl Deck {
    /// Build a fresh deck, discarding whatever was shown before.
    pub fn from_items(items: Vec<FlashcardItem>, now: Instant) -> Self {
        Self {
            cards: items.into_iter().map(|i| FlipCard::new(i, now)).collect(),
            selected: 0,
            offset: 0,
            measured_width: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Toggle the card at `idx` and schedule its height resync.
    pub fn flip(&mut self, idx: usize, now: Instant) {
        if let Some(card) = self.cards.get_mut(idx) {
            card.flipped = !card.flipped;
            card.resync_at = Some(now + FLIP_SETTLE);
            self.selected = idx;
        }
    }

    pub fn flip_selected(&mut self, now: Instant) {
        self.flip(self.selected, now);
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.cards.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Apply every resync that is due at `now`, measuring against `width`
    /// (the outer card width).  Returns `true` if any height changed.
    pub fn tick(&mut self, now: Instant, width: u16) -> bool {
        if width != self.measured_width {
            return self.remeasure(width);
        }
        let mut changed = false;
        for card in &mut self.cards {
            match card.resync_at {
                Some(due) if due <= now => {
                    card.resync_at = None;
                    let h = face_height(card.active_face(), width);
                    changed |= h != card.height;
                    card.height = h;
                }
                _ => {}
            }
        }
        changed
    }

    /// Measure every card against a new width right away.  Pending flip
    /// resyncs are satisfied by this too.
    pub fn remeasure(&mut self, width: u16) -> bool {
        self.measured_width = width;
        let mut changed = false;
        for card in &mut self.cards {
            card.resync_at = None;
            let h = face_height(card.active_face(), width);
            changed |= h != card.height;
            card.height = h;
        }
        changed
    }

    /// Adjust `offset` so the selected card fits in `viewport_rows`.
    pub fn scroll_to_selected(&mut self, viewport_rows: u16) {
        if self.cards.is_empty() {
            return;
        }
        if self.selected < self.offset {
            self.offset = self.selected;
            return;
        }
        loop {
            let used: u16 = self.cards[self.offset..=self.selected]
                .iter()
                .map(FlipCard::display_height)
                .sum();
            if used <= viewport_rows || self.offset == self.selected {
                break;
            }
            self.offset += 1;
        }
    }
}

/// Outer height of a card showing `text` at outer width `width`.
pub fn face_height(text: &str, width: u16) -> u16 {
    let inner = width.saturating_sub(CARD_CHROME_COLS).max(1) as usize;
    let lines = wrapped_line_count(text, inner).max(1);
    u16::try_from(lines)
        .unwrap_or(u16::MAX)
        .saturating_add(CARD_CHROME_ROWS)
}

/// Greedy word-wrap line count; words longer than `width` are split.
pub fn wrapped_line_count(text: &str, width: usize) -> usize {
    wrap_lines(text, width).len()
}

/// Greedy word wrap.  Runs of whitespace collapse to one space, explicit
/// newlines are kept, and words longer than `width` are hard-split.
/// Always returns at least one (possibly empty) line per input line.
pub fn wrap_lines(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut out = Vec::new();
    for line in text.split('\n') {
        let mut cur = String::new();
        let mut col = 0;
        for word in line.split_whitespace() {
            let len = word.chars().count();
            if col == 0 && len <= width {
                cur.push_str(word);
                col = len;
            } else if col > 0 && col + 1 + len <= width {
                cur.push(' ');
                cur.push_str(word);
                col += 1 + len;
            } else if len <= width {
                out.push(std::mem::take(&mut cur));
                cur.push_str(word);
                col = len;
            } else {
                if col > 0 {
                    out.push(std::mem::take(&mut cur));
                }
                let chars: Vec<char> = word.chars().collect();
                let mut chunks = chars.chunks(width).peekable();
                while let Some(chunk) = chunks.next() {
                    let piece: String = chunk.iter().collect();
                    if chunks.peek().is_some() {
                        out.push(piece);
                    } else {
                        col = chunk.len();
                        cur = piece;
                    }
                }
            }
        }
        out.push(cur);
    }
    out
}
