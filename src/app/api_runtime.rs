//! Background backend calls to keep the UI loop responsive.
//!
//! Handlers queue an [`ApiJob`]; the main loop hands it to [`spawn_job`],
//! which runs it on its own task and reports exactly one [`ApiUpdate`].
//! Jobs are independent: nothing cancels or orders them.

use std::path::PathBuf;

use tokio::sync::mpsc;
use tracing::{error, info};

use crate::api::{ApiError, DownloadFormat, StudyClient};
use crate::core::items::{GenerationId, GenerationResponse};
use crate::core::mode::Mode;
use crate::core::request::GenerationRequest;

/// Work requested by an input handler.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiJob {
    Login {
        email: String,
        password: String,
    },
    Generate(GenerationRequest),
    Download {
        id: GenerationId,
        format: DownloadFormat,
        path: PathBuf,
    },
    Delete {
        id: GenerationId,
    },
}

/// Outcome of a finished job.
#[derive(Debug)]
pub enum ApiUpdate {
    LoggedIn {
        email: String,
        result: Result<(), ApiError>,
    },
    Generated {
        /// Mode and topic captured when the request was issued.
        mode: Mode,
        topic: String,
        result: Result<GenerationResponse, ApiError>,
    },
    Downloaded {
        format: DownloadFormat,
        result: Result<PathBuf, ApiError>,
    },
    Deleted {
        result: Result<(), ApiError>,
    },
}

pub fn spawn_job(client: StudyClient, tx: mpsc::UnboundedSender<ApiUpdate>, job: ApiJob) {
    tokio::spawn(async move {
        let update = run_job(&client, job).await;
        let _ = tx.send(update);
    });
}

async fn run_job(client: &StudyClient, job: ApiJob) -> ApiUpdate {
    match job {
        ApiJob::Login { email, password } => {
            let result = client.login(&email, &password).await;
            ApiUpdate::LoggedIn { email, result }
        }
        ApiJob::Generate(req) => {
            let result = client.generate(&req).await;
            if let Err(e) = &result {
                if e.is_unexpected() {
                    error!(error = %e, topic = %req.topic, "generation request failed");
                } else {
                    info!(error = %e, "generation refused");
                }
            }
            ApiUpdate::Generated {
                mode: req.mode,
                topic: req.topic,
                result,
            }
        }
        ApiJob::Download { id, format, path } => {
            let result = download_to(client, &id, format, path).await;
            if let Err(e) = &result {
                error!(error = %e, format = format.as_str(), "download failed");
            }
            ApiUpdate::Downloaded { format, result }
        }
        ApiJob::Delete { id } => {
            let result = client.delete_generation(&id).await;
            if let Err(e) = &result {
                error!(error = %e, id = %id, "delete failed");
            }
            ApiUpdate::Deleted { result }
        }
    }
}

async fn download_to(
    client: &StudyClient,
    id: &GenerationId,
    format: DownloadFormat,
    path: PathBuf,
) -> Result<PathBuf, ApiError> {
    let bytes = client.download(id, format).await?;
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(&path, bytes).await?;
    info!(path = %path.display(), "saved download");
    Ok(path)
}
