//! The generation cycle: validate the form, queue the request, and render
//! whatever comes back.  Also the follow-up actions on a rendered
//! generation (download, export, delete).

use std::time::Instant;

use tracing::{debug, info, warn};

use super::api_runtime::{ApiJob, ApiUpdate};
use super::state::{AppState, CurrentGeneration};
use crate::api::DownloadFormat;
use crate::core::deck::Deck;
use crate::core::export::{self, Sheet};
use crate::core::items::{FlashcardItem, McqItem};
use crate::core::mode::Mode;
use crate::core::quiz::Quiz;
use crate::core::request::GenerationRequest;

pub const WAITING_MESSAGE: &str = "Generating... please wait (may take a few seconds)";
const NOTHING_RENDERED: &str = "Generate something first.";

/// Validate the form and queue one generate request.  On invalid input
/// only the message changes.
pub fn request_generation(state: &mut AppState) {
    let req = match GenerationRequest::from_form(
        &state.topic,
        &state.count,
        state.mode,
        &state.difficulty,
    ) {
        Ok(req) => req,
        Err(e) => {
            state.error(e.to_string());
            return;
        }
    };
    if state.config.default_count != req.num_items {
        state.config.default_count = req.num_items;
        state.config_dirty = true;
    }
    state.info(WAITING_MESSAGE);
    state.in_flight += 1;
    state.pending_jobs.push(ApiJob::Generate(req));
}

/// Queue a sign-in; the backend refuses generation without a session.
pub fn request_login(state: &mut AppState, email: String, password: String) {
    state.info(format!("Signing in as {email}..."));
    state.in_flight += 1;
    state.pending_jobs.push(ApiJob::Login { email, password });
}

/// Apply a finished job to the state.
pub fn apply_update(state: &mut AppState, update: ApiUpdate, now: Instant) {
    state.in_flight = state.in_flight.saturating_sub(1);
    match update {
        ApiUpdate::LoggedIn { email, result } => match result {
            Ok(()) => state.info(format!("Signed in as {email}.")),
            Err(e) => state.error(e.user_message("Sign-in")),
        },
        ApiUpdate::Generated { mode, topic, result } => match result {
            Ok(resp) => {
                render_generation(state, mode, &resp.items, now);
                match mode {
                    Mode::Flashcard => state.deck_topic = Some(topic.clone()),
                    Mode::Mcq => state.quiz_topic = Some(topic.clone()),
                }
                state.current = Some(CurrentGeneration {
                    topic,
                    mode,
                    id: resp.generation_id,
                });
            }
            // Prior content stays; only the message changes.
            Err(e) => state.error(e.user_message("Generation")),
        },
        ApiUpdate::Downloaded { format, result } => match result {
            Ok(path) => state.info(format!(
                "Saved {} to {}.",
                format.as_str().to_uppercase(),
                path.display()
            )),
            Err(e) => state.error(e.user_message("Download")),
        },
        ApiUpdate::Deleted { result } => match result {
            Ok(()) => {
                if let Some(current) = state.current.as_mut() {
                    current.id = Default::default();
                }
                state.info("Generation deleted.");
            }
            Err(e) => state.error(e.user_message("Delete")),
        },
    }
}

/// Replace the container for `mode` with freshly decoded items.
fn render_generation(state: &mut AppState, mode: Mode, items: &[serde_json::Value], now: Instant) {
    match mode {
        Mode::Flashcard => {
            state.deck = Deck::from_items(FlashcardItem::decode_all(items), now);
            debug!(cards = state.deck.len(), "rendered flashcards");
            state.info(format!(
                "Generated {} flashcards. Press Space or click a card to flip.",
                state.deck.len()
            ));
        }
        Mode::Mcq => {
            state.quiz = Quiz::from_items(McqItem::decode_all(items));
            debug!(questions = state.quiz.len(), "rendered quiz");
            state.info(format!(
                "Generated {} MCQs. Select answers and press Submit.",
                state.quiz.len()
            ));
        }
    }
}

/// Grade the quiz and show the score.
pub fn submit_quiz(state: &mut AppState) {
    // No submit control exists until a quiz has been rendered.
    if !state.quiz.is_rendered() {
        return;
    }
    let score = state.quiz.grade();
    info!(correct = score.correct, total = score.total, "quiz graded");
    state.info(score.message());
}

/// Queue a download of the current generation.
pub fn request_download(state: &mut AppState, format: DownloadFormat) {
    let Some(current) = &state.current else {
        state.error(NOTHING_RENDERED);
        return;
    };
    if current.id.is_unsaved() {
        state.error(crate::api::ApiError::NotSaved.to_string());
        return;
    }
    let path = export::target_path(&state.config.download_dir, &current.topic, format.as_str());
    let job = ApiJob::Download {
        id: current.id.clone(),
        format,
        path,
    };
    state.info(format!("Downloading {}...", format.as_str().to_uppercase()));
    state.in_flight += 1;
    state.pending_jobs.push(job);
}

/// Queue deletion of the current generation on the server.
pub fn request_delete(state: &mut AppState) {
    let Some(current) = &state.current else {
        state.error(NOTHING_RENDERED);
        return;
    };
    if current.id.is_unsaved() {
        state.error(crate::api::ApiError::NotSaved.to_string());
        return;
    }
    let job = ApiJob::Delete {
        id: current.id.clone(),
    };
    state.in_flight += 1;
    state.pending_jobs.push(job);
}

/// Write the visible deck or quiz as an HTML study sheet.
pub fn export_sheet(state: &mut AppState) {
    let (topic, sheet, what) = match state.mode {
        Mode::Flashcard => (&state.deck_topic, Sheet::Flashcards(&state.deck), "flashcards"),
        Mode::Mcq => (&state.quiz_topic, Sheet::Quiz(&state.quiz), "quiz"),
    };
    let Some(topic) = topic else {
        state.error(NOTHING_RENDERED);
        return;
    };
    match export::write_sheet(&state.config.download_dir, topic, &sheet) {
        Ok(path) => state.info(format!("Exported {what} sheet to {}.", path.display())),
        Err(e) => {
            warn!(error = %e, "export failed");
            state.error(format!("Export failed: {e}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::api::ApiError;
    use crate::app::state::MessageKind;
    use crate::config::AppConfig;
    use crate::core::items::{GenerationId, GenerationResponse};

    fn state_with(topic: &str, count: &str, mode: Mode) -> AppState {
        let mut state = AppState::new(AppConfig::default());
        state.topic = topic.into();
        state.count = count.into();
        state.mode = mode;
        state
    }

    fn response(items: serde_json::Value, id: serde_json::Value) -> GenerationResponse {
        serde_json::from_value(json!({"items": items, "generation_id": id})).unwrap()
    }

    #[test]
    fn valid_form_queues_exactly_one_request() {
        let mut state = state_with("Photosynthesis", "3", Mode::Flashcard);
        state.difficulty = "easy".into();
        request_generation(&mut state);

        assert_eq!(state.pending_jobs.len(), 1);
        let ApiJob::Generate(req) = &state.pending_jobs[0] else {
            panic!("expected a generate job");
        };
        assert_eq!(req.num_items, 3);
        assert_eq!(req.mode, Mode::Flashcard);
        assert_eq!(req.difficulty, "easy");
        assert!(req.explanations);
        assert_eq!(state.message.as_ref().unwrap().text, WAITING_MESSAGE);
        assert!(state.busy());
        assert_eq!(state.config.default_count, 3);
        assert!(state.config_dirty);
    }

    #[test]
    fn invalid_form_queues_nothing() {
        for (topic, count) in [("", "3"), ("   ", "3"), ("Rust", "0"), ("Rust", "-1"), ("Rust", "many")] {
            let mut state = state_with(topic, count, Mode::Mcq);
            request_generation(&mut state);
            assert!(state.pending_jobs.is_empty(), "{topic:?}/{count:?}");
            assert_eq!(state.message.as_ref().unwrap().kind, MessageKind::Error);
            assert!(!state.busy());
        }
    }

    #[test]
    fn flashcard_response_renders_one_card_per_item() {
        let now = Instant::now();
        let mut state = state_with("Photosynthesis", "3", Mode::Flashcard);
        request_generation(&mut state);
        let resp = response(
            json!([
                {"question": "Q1", "answer": "A1"},
                {"question": "Q2", "answer": "A2"},
                {"question": "Q3", "answer": "A3"},
            ]),
            json!(1),
        );
        apply_update(
            &mut state,
            ApiUpdate::Generated {
                mode: Mode::Flashcard,
                topic: "Photosynthesis".into(),
                result: Ok(resp),
            },
            now,
        );

        assert_eq!(state.deck.len(), 3);
        state.deck.flip(0, now);
        assert_eq!(state.deck.cards[0].active_face(), "A1");
        assert!(!state.busy());
        assert_eq!(
            state.message.as_ref().unwrap().text,
            "Generated 3 flashcards. Press Space or click a card to flip."
        );
    }

    #[test]
    fn response_renders_into_the_mode_it_was_requested_for() {
        let mut state = state_with("Geo", "1", Mode::Mcq);
        request_generation(&mut state);
        // User switches tabs while the request is in flight.
        state.set_mode(Mode::Flashcard);
        let resp = response(
            json!([{"question": "Capital?", "options": ["Paris", "London"], "correct_answer": "Paris"}]),
            json!(2),
        );
        apply_update(
            &mut state,
            ApiUpdate::Generated { mode: Mode::Mcq, topic: "Geo".into(), result: Ok(resp) },
            Instant::now(),
        );
        assert_eq!(state.quiz.len(), 1);
        assert!(state.deck.is_empty());
    }

    #[test]
    fn failure_keeps_previous_content() {
        let now = Instant::now();
        let mut state = state_with("Photosynthesis", "1", Mode::Flashcard);
        let resp = response(json!([{"question": "Q1", "answer": "A1"}]), json!(1));
        apply_update(
            &mut state,
            ApiUpdate::Generated { mode: Mode::Flashcard, topic: "P".into(), result: Ok(resp) },
            now,
        );

        apply_update(
            &mut state,
            ApiUpdate::Generated {
                mode: Mode::Flashcard,
                topic: "P".into(),
                result: Err(ApiError::Server {
                    status: reqwest::StatusCode::TOO_MANY_REQUESTS,
                    message: Some("rate limited".into()),
                }),
            },
            now,
        );
        assert_eq!(state.deck.len(), 1);
        let msg = state.message.as_ref().unwrap();
        assert_eq!(msg.text, "rate limited");
        assert_eq!(msg.kind, MessageKind::Error);
    }

    #[test]
    fn mcq_scenario_scores_zero_for_wrong_pick() {
        let mut state = state_with("Geo", "1", Mode::Mcq);
        let resp = response(
            json!([{"question": "Capital?", "options": ["Paris", "London"], "correct_answer": "Paris"}]),
            json!(2),
        );
        apply_update(
            &mut state,
            ApiUpdate::Generated { mode: Mode::Mcq, topic: "Geo".into(), result: Ok(resp) },
            Instant::now(),
        );
        state.quiz.choose(0, 1);
        submit_quiz(&mut state);
        assert_eq!(state.message.as_ref().unwrap().text, "You scored 0/1 (0%).");
    }

    #[test]
    fn follow_up_actions_need_a_saved_generation() {
        let mut state = state_with("Geo", "1", Mode::Mcq);
        request_download(&mut state, DownloadFormat::Csv);
        assert_eq!(state.message.as_ref().unwrap().text, NOTHING_RENDERED);

        state.current = Some(CurrentGeneration {
            topic: "Geo".into(),
            mode: Mode::Mcq,
            id: GenerationId::default(),
        });
        request_delete(&mut state);
        assert_eq!(
            state.message.as_ref().unwrap().text,
            "This generation was not saved on the server."
        );
        assert!(state.pending_jobs.is_empty());

        state.current.as_mut().unwrap().id = GenerationId(json!(9));
        request_download(&mut state, DownloadFormat::Pdf);
        assert!(matches!(
            &state.pending_jobs[0],
            ApiJob::Download { format: DownloadFormat::Pdf, path, .. } if path.ends_with("Geo.pdf")
        ));
    }

    #[test]
    fn export_writes_the_visible_tab() {
        let dir = std::env::temp_dir().join(format!("studydeck-export-{}", std::process::id()));
        let mut state = state_with("Cells", "1", Mode::Flashcard);
        state.config.download_dir = dir.clone();
        let now = Instant::now();
        let cards = response(json!([{"question": "Mitochondria?", "answer": "Powerhouse"}]), json!(1));
        apply_update(
            &mut state,
            ApiUpdate::Generated { mode: Mode::Flashcard, topic: "Cells".into(), result: Ok(cards) },
            now,
        );
        let quiz = response(
            json!([{"question": "Capital?", "options": ["Paris"], "correct_answer": "Paris"}]),
            json!(2),
        );
        apply_update(
            &mut state,
            ApiUpdate::Generated { mode: Mode::Mcq, topic: "Geo".into(), result: Ok(quiz) },
            now,
        );

        export_sheet(&mut state);
        let html = std::fs::read_to_string(dir.join("Cells.html")).unwrap();
        assert!(html.contains("Mitochondria?"));
        assert!(!html.contains("Capital?"));
        assert!(state.message.as_ref().unwrap().text.starts_with("Exported flashcards sheet"));

        state.set_mode(Mode::Mcq);
        export_sheet(&mut state);
        assert!(std::fs::read_to_string(dir.join("Geo.html")).unwrap().contains("Capital?"));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn export_needs_content_in_the_visible_tab() {
        let mut state = state_with("Geo", "1", Mode::Flashcard);
        state.current = Some(CurrentGeneration {
            topic: "Geo".into(),
            mode: Mode::Mcq,
            id: GenerationId(json!(3)),
        });
        export_sheet(&mut state);
        assert_eq!(state.message.as_ref().unwrap().text, NOTHING_RENDERED);
    }

    #[test]
    fn overlapping_generations_last_applied_wins() {
        let now = Instant::now();
        let mut state = state_with("Cells", "1", Mode::Flashcard);
        request_generation(&mut state);
        state.topic = "Atoms".into();
        request_generation(&mut state);
        assert_eq!(state.in_flight, 2);
        assert_eq!(state.pending_jobs.len(), 2);

        // The later request answers first.
        let atoms = response(json!([{"question": "Atom?", "answer": "Unit"}]), json!(8));
        let cells = response(
            json!([{"question": "Cell?", "answer": "Unit of life"}, {"question": "Wall?"}]),
            json!(7),
        );
        apply_update(
            &mut state,
            ApiUpdate::Generated { mode: Mode::Flashcard, topic: "Atoms".into(), result: Ok(atoms) },
            now,
        );
        assert_eq!(state.in_flight, 1);
        apply_update(
            &mut state,
            ApiUpdate::Generated { mode: Mode::Flashcard, topic: "Cells".into(), result: Ok(cells) },
            now,
        );

        assert_eq!(state.in_flight, 0);
        assert!(!state.busy());
        assert_eq!(state.deck.len(), 2);
        assert_eq!(state.deck.cards[0].front, "Cell?");
        let current = state.current.as_ref().unwrap();
        assert_eq!(current.topic, "Cells");
        assert_eq!(current.id, GenerationId(json!(7)));
        assert_eq!(state.deck_topic.as_deref(), Some("Cells"));
    }

    #[test]
    fn submit_is_ignored_before_any_quiz_is_rendered() {
        let mut state = state_with("Geo", "1", Mode::Mcq);
        submit_quiz(&mut state);
        assert!(state.message.is_none());
        assert!(state.quiz.last_score.is_none());
    }

    #[test]
    fn empty_quiz_response_can_still_be_submitted() {
        let mut state = state_with("Geo", "1", Mode::Mcq);
        apply_update(
            &mut state,
            ApiUpdate::Generated {
                mode: Mode::Mcq,
                topic: "Geo".into(),
                result: Ok(response(json!([]), json!(4))),
            },
            Instant::now(),
        );
        assert!(state.quiz.is_rendered());
        submit_quiz(&mut state);
        assert_eq!(state.message.as_ref().unwrap().text, "You scored 0/0 (N/A).");
    }

    #[test]
    fn delete_clears_the_stored_id() {
        let mut state = state_with("Geo", "1", Mode::Mcq);
        state.current = Some(CurrentGeneration {
            topic: "Geo".into(),
            mode: Mode::Mcq,
            id: GenerationId(json!(9)),
        });
        request_delete(&mut state);
        apply_update(&mut state, ApiUpdate::Deleted { result: Ok(()) }, Instant::now());
        assert!(state.current.as_ref().unwrap().id.is_unsaved());
        assert_eq!(state.message.as_ref().unwrap().text, "Generation deleted.");
    }
}
