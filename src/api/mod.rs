//! HTTP client for the study backend.
//!
//! The backend is an external collaborator; this module only speaks its
//! wire contract (`/login`, `/api/generate`, `/api/download`,
//! `/api/delete_generation`).

pub mod client;
pub mod error;

pub use client::{DownloadFormat, StudyClient};
pub use error::ApiError;
