//! Central application state.
//!
//! All mutable state lives here so that the rest of the app can be pure
//! functions over `&AppState` (rendering) or `&mut AppState` (event handling).

use ratatui::layout::Rect;

use super::api_runtime::ApiJob;
use crate::config::AppConfig;
use crate::core::{
    deck::Deck,
    items::GenerationId,
    mode::Mode,
    quiz::Quiz,
};

/// Which view / overlay is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveView {
    #[default]
    Study,
    Help,
}

/// Which part of the screen receives keystrokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Topic,
    Count,
    Difficulty,
    Content,
}

impl Focus {
    pub fn next(self) -> Self {
        match self {
            Focus::Topic => Focus::Count,
            Focus::Count => Focus::Difficulty,
            Focus::Difficulty => Focus::Content,
            Focus::Content => Focus::Topic,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Focus::Topic => Focus::Content,
            Focus::Count => Focus::Topic,
            Focus::Difficulty => Focus::Count,
            Focus::Content => Focus::Difficulty,
        }
    }

    pub fn is_form(self) -> bool {
        self != Focus::Content
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Error,
}

/// Text shown in the message area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub text: String,
    pub kind: MessageKind,
}

/// The generation whose content is currently rendered.
#[derive(Debug, Clone)]
pub struct CurrentGeneration {
    pub topic: String,
    pub mode: Mode,
    pub id: GenerationId,
}

/// Top-level application state.
pub struct AppState {
    /// Active study mode (which container is visible).
    pub mode: Mode,
    /// Raw contents of the topic field.
    pub topic: String,
    /// Raw contents of the count field.
    pub count: String,
    pub difficulty: String,
    pub focus: Focus,
    /// Rendered flashcards (survives mode switches).
    pub deck: Deck,
    /// Rendered quiz (survives mode switches).
    pub quiz: Quiz,
    pub message: Option<Message>,
    /// Most recently rendered generation, used by download/delete.
    pub current: Option<CurrentGeneration>,
    /// Topic each container was last rendered for, used by export.
    pub deck_topic: Option<String>,
    pub quiz_topic: Option<String>,
    /// Requests spawned but not yet answered.
    pub in_flight: usize,
    /// Jobs queued by handlers; the main loop spawns them after each frame.
    pub pending_jobs: Vec<ApiJob>,
    /// Controls the main event loop.
    pub should_quit: bool,
    pub active_view: ActiveView,
    /// User-configurable settings and keybindings.
    pub config: AppConfig,
    /// Set when `config` changed and should be written back to disk.
    pub config_dirty: bool,
    /// Monotonic tick counter (drives the spinner frame).
    pub tick: u64,
    /// Full terminal area as of the last draw, for mouse hit-testing.
    pub terminal_area: Rect,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            mode: Mode::default(),
            topic: String::new(),
            count: config.default_count.to_string(),
            difficulty: config.difficulty.clone(),
            focus: Focus::default(),
            deck: Deck::default(),
            quiz: Quiz::default(),
            message: None,
            current: None,
            deck_topic: None,
            quiz_topic: None,
            in_flight: 0,
            pending_jobs: Vec::new(),
            should_quit: false,
            active_view: ActiveView::default(),
            config,
            config_dirty: false,
            tick: 0,
            terminal_area: Rect::new(0, 0, 80, 24),
        }
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.message = Some(Message {
            text: text.into(),
            kind: MessageKind::Info,
        });
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.message = Some(Message {
            text: text.into(),
            kind: MessageKind::Error,
        });
    }

    /// Select a mode.  Content of both modes is kept; only visibility changes.
    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    /// Label of the generate button for the current mode and count field.
    pub fn generate_label(&self) -> String {
        self.mode.generate_label(&self.count)
    }

    pub fn busy(&self) -> bool {
        self.in_flight > 0
    }
}
