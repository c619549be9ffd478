//! Application orchestration: state management, event loop plumbing,
//! backend jobs and input handling.

pub mod api_runtime;
pub mod cycle;
pub mod event;
pub mod handler;
pub mod state;
