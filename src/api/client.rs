//! `reqwest`-backed client.  Cheap to clone; every clone shares the same
//! connection pool and cookie jar (and therefore the login session).

use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use super::error::ApiError;
use crate::core::items::{GenerationId, GenerationResponse};
use crate::core::request::GenerationRequest;

/// Formats offered by `/api/download`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadFormat {
    Csv,
    Pdf,
}

impl DownloadFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            DownloadFormat::Csv => "csv",
            DownloadFormat::Pdf => "pdf",
        }
    }
}

/// Error-only payload shared by the auxiliary endpoints.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct DeleteBody {
    #[serde(default)]
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Clone)]
pub struct StudyClient {
    http: Client,
    base_url: String,
}

impl StudyClient {
    /// Build a client for the backend at `base_url` (e.g. `http://127.0.0.1:5000`).
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let http = Client::builder().cookie_store(true).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Open a session.  The backend redirects to `/` on success and
    /// re-renders the login page on failure.
    pub async fn login(&self, email: &str, password: &str) -> Result<(), ApiError> {
        let resp = self
            .http
            .post(self.url("/login"))
            .form(&[("email", email), ("password", password)])
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ApiError::Server {
                status,
                message: None,
            });
        }
        if resp.url().path().trim_end_matches('/').ends_with("/login") {
            return Err(ApiError::Auth);
        }
        info!(email, "logged in");
        Ok(())
    }

    /// `POST /api/generate`.  Succeeds only for a 2xx reply whose body
    /// decodes and carries no non-empty `error`.
    pub async fn generate(&self, req: &GenerationRequest) -> Result<GenerationResponse, ApiError> {
        info!(topic = %req.topic, num_items = req.num_items, mode = %req.mode, "requesting generation");
        let resp = self
            .http
            .post(self.url("/api/generate"))
            .json(req)
            .send()
            .await?;
        let status = resp.status();
        let bytes = resp.bytes().await?;
        let body: GenerationResponse = serde_json::from_slice(&bytes)?;

        let error = body.error.clone().filter(|e| !e.is_empty());
        if !status.is_success() || error.is_some() {
            return Err(ApiError::Server {
                status,
                message: error,
            });
        }
        debug!(items = body.items.len(), id = %body.generation_id, "generation received");
        Ok(body)
    }

    /// `POST /api/download`: returns the raw file bytes.
    pub async fn download(
        &self,
        id: &GenerationId,
        format: DownloadFormat,
    ) -> Result<Vec<u8>, ApiError> {
        if id.is_unsaved() {
            return Err(ApiError::NotSaved);
        }
        let resp = self
            .http
            .post(self.url("/api/download"))
            .json(&json!({ "generation_id": id, "format": format.as_str() }))
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(server_error(resp).await);
        }
        Ok(resp.bytes().await?.to_vec())
    }

    /// `POST /api/delete_generation`.
    pub async fn delete_generation(&self, id: &GenerationId) -> Result<(), ApiError> {
        if id.is_unsaved() {
            return Err(ApiError::NotSaved);
        }
        let resp = self
            .http
            .post(self.url("/api/delete_generation"))
            .json(&json!({ "generation_id": id }))
            .send()
            .await?;
        let status = resp.status();
        let body: DeleteBody = serde_json::from_slice(&resp.bytes().await?)?;
        if !status.is_success() || !body.ok {
            return Err(ApiError::Server {
                status,
                message: body.error.filter(|e| !e.is_empty()),
            });
        }
        Ok(())
    }
}

/// Turn a non-success response into [`ApiError::Server`], keeping the
/// `error` text if the body has one.
async fn server_error(resp: Response) -> ApiError {
    let status = resp.status();
    let message = match resp.bytes().await {
        Ok(bytes) => serde_json::from_slice::<ErrorBody>(&bytes)
            .ok()
            .and_then(|b| b.error)
            .filter(|e| !e.is_empty()),
        Err(_) => None,
    };
    ApiError::Server { status, message }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::State;
    use axum::http::{header, HeaderMap, StatusCode};
    use axum::response::{IntoResponse, Redirect, Response};
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::Value;

    use super::*;
    use crate::core::mode::Mode;

    type Seen = Arc<Mutex<Vec<Value>>>;

    /// Spawn `app` on an ephemeral port and return its base URL.
    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn photosynthesis() -> GenerationRequest {
        GenerationRequest::from_form("Photosynthesis", "3", Mode::Flashcard, "easy").unwrap()
    }

    async fn flashcards(State(seen): State<Seen>, Json(body): Json<Value>) -> Json<Value> {
        seen.lock().unwrap().push(body);
        Json(serde_json::json!({
            "items": [
                {"question": "Q1", "answer": "A1"},
                {"question": "Q2", "answer": "A2"},
                {"question": "Q3", "answer": "A3"},
            ],
            "generation_id": 7,
        }))
    }

    #[tokio::test]
    async fn generate_posts_one_request_with_expected_body() {
        let seen: Seen = Arc::default();
        let app = Router::new()
            .route("/api/generate", post(flashcards))
            .with_state(seen.clone());
        let client = StudyClient::new(&serve(app).await).unwrap();

        let resp = client.generate(&photosynthesis()).await.unwrap();
        assert_eq!(resp.items.len(), 3);
        assert_eq!(resp.generation_id.to_string(), "7");

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(
            seen[0],
            serde_json::json!({
                "topic": "Photosynthesis",
                "numItems": 3,
                "mode": "flashcard",
                "difficulty": "easy",
                "explanations": true,
            })
        );
    }

    #[tokio::test]
    async fn error_field_fails_even_with_ok_status() {
        let app = Router::new().route(
            "/api/generate",
            post(|| async { Json(serde_json::json!({"error": "rate limited"})) }),
        );
        let client = StudyClient::new(&serve(app).await).unwrap();
        let err = client.generate(&photosynthesis()).await.unwrap_err();
        assert_eq!(err.user_message("Generation"), "rate limited");
    }

    #[tokio::test]
    async fn bad_status_without_text_uses_fallback() {
        let app = Router::new().route(
            "/api/generate",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, Json(serde_json::json!({}))) }),
        );
        let client = StudyClient::new(&serve(app).await).unwrap();
        let err = client.generate(&photosynthesis()).await.unwrap_err();
        assert_eq!(err.user_message("Generation"), "Generation failed.");
    }

    #[tokio::test]
    async fn non_json_body_is_a_decode_failure() {
        let app = Router::new().route("/api/generate", post(|| async { "<html>oops</html>" }));
        let client = StudyClient::new(&serve(app).await).unwrap();
        let err = client.generate(&photosynthesis()).await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
        assert_eq!(err.user_message("Generation"), "Generation failed. Try again.");
    }

    #[tokio::test]
    async fn unreachable_server_is_a_transport_failure() {
        // Bind then drop to get a port nobody listens on.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let client = StudyClient::new(&format!("http://{addr}")).unwrap();
        let err = client.generate(&photosynthesis()).await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }

    async fn login(body: String) -> Response {
        if body.contains("password=secret") {
            ([(header::SET_COOKIE, "session=abc; Path=/")], Redirect::to("/")).into_response()
        } else {
            "<form>login</form>".into_response()
        }
    }

    async fn guarded_generate(headers: HeaderMap) -> Response {
        let authed = headers
            .get(header::COOKIE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|c| c.contains("session=abc"));
        if authed {
            Json(serde_json::json!({"items": [], "generation_id": 1})).into_response()
        } else {
            (
                StatusCode::UNAUTHORIZED,
                Json(serde_json::json!({"error": "User not authenticated."})),
            )
                .into_response()
        }
    }

    fn session_app() -> Router {
        Router::new()
            .route("/", get(|| async { "home" }))
            .route("/login", post(login).get(|| async { "<form>login</form>" }))
            .route("/api/generate", post(guarded_generate))
    }

    #[tokio::test]
    async fn session_cookie_is_reused_after_login() {
        let client = StudyClient::new(&serve(session_app()).await).unwrap();

        let err = client.generate(&photosynthesis()).await.unwrap_err();
        assert_eq!(err.user_message("Generation"), "User not authenticated.");

        client.login("me@example.com", "secret").await.unwrap();
        client.generate(&photosynthesis()).await.unwrap();
    }

    #[tokio::test]
    async fn wrong_password_is_reported() {
        let client = StudyClient::new(&serve(session_app()).await).unwrap();
        let err = client.login("me@example.com", "nope").await.unwrap_err();
        assert!(matches!(err, ApiError::Auth));
    }

    #[tokio::test]
    async fn download_returns_bytes_or_server_error() {
        let app = Router::new().route(
            "/api/download",
            post(|Json(body): Json<Value>| async move {
                if body["generation_id"] == 7 && body["format"] == "csv" {
                    "Question,Answer\nQ1,A1\n".into_response()
                } else {
                    (
                        StatusCode::NOT_FOUND,
                        Json(serde_json::json!({"error": "Generation not found."})),
                    )
                        .into_response()
                }
            }),
        );
        let client = StudyClient::new(&serve(app).await).unwrap();

        let id = GenerationId(serde_json::json!(7));
        let bytes = client.download(&id, DownloadFormat::Csv).await.unwrap();
        assert_eq!(bytes, b"Question,Answer\nQ1,A1\n");

        let err = client.download(&id, DownloadFormat::Pdf).await.unwrap_err();
        assert_eq!(err.user_message("Download"), "Generation not found.");

        let err = client
            .download(&GenerationId::default(), DownloadFormat::Csv)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotSaved));
    }

    #[tokio::test]
    async fn delete_requires_ok_flag() {
        let app = Router::new().route(
            "/api/delete_generation",
            post(|Json(body): Json<Value>| async move {
                if body["generation_id"] == 7 {
                    (StatusCode::OK, Json(serde_json::json!({"ok": true})))
                } else {
                    (StatusCode::NOT_FOUND, Json(serde_json::json!({"error": "Not found"})))
                }
            }),
        );
        let client = StudyClient::new(&serve(app).await).unwrap();
        client
            .delete_generation(&GenerationId(serde_json::json!(7)))
            .await
            .unwrap();
        let err = client
            .delete_generation(&GenerationId(serde_json::json!(8)))
            .await
            .unwrap_err();
        assert_eq!(err.user_message("Delete"), "Not found");
    }
}
