//! Core study model – requests, item decoding, the flashcard deck and the quiz.
//!
//! Nothing in this module depends on any TUI or rendering crate, nor on the
//! HTTP client.  Every type is `Send + Sync` so it can cross async tasks.

pub mod deck;
pub mod export;
pub mod items;
pub mod mode;
pub mod quiz;
pub mod request;
pub mod sanitize;
