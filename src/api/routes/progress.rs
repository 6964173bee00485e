//! Progress Routes
//!
//! Lesson tests and their history.
//!
//! - GET /progress/all - History of every lesson
//! - GET /progress/:folder/:lesson - History of one lesson
//! - POST /progress/:folder/:lesson - Append a test attempt
//! - GET /progress/generate_test/:folder/:lesson - Draw test questions
//! - POST /progress/evaluate_test/:folder/:lesson - Score an attempt

use axum::{
    extract::{Path, State},
    Json,
};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::api::dto::{MessageResponse, TestRequest};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::assessment::{evaluate_attempt, generate_test, GeneratedTest, LessonProgress, TestAttempt};

/// GET /progress/all
pub async fn get_all_progress(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<BTreeMap<String, LessonProgress>>> {
    let store = state.store.read().await;
    Ok(Json(store.load_learning_progress()?))
}

/// GET /progress/:folder/:lesson
pub async fn get_lesson_progress(
    State(state): State<Arc<AppState>>,
    Path((folder, lesson)): Path<(String, String)>,
) -> ApiResult<Json<LessonProgress>> {
    let store = state.store.read().await;
    let progress = store.lesson_progress(&folder, &lesson)?;
    tracing::debug!(folder, lesson, tests = progress.tests.len(), "Retrieved lesson progress");
    Ok(Json(progress))
}

/// POST /progress/:folder/:lesson
pub async fn save_lesson_progress(
    State(state): State<Arc<AppState>>,
    Path((folder, lesson)): Path<(String, String)>,
    Json(req): Json<TestRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let test = require_test(req)?;

    let store = state.store.write().await;
    store.append_test(&folder, &lesson, test)?;

    Ok(Json(MessageResponse {
        message: format!("Test result saved for lesson {}", lesson),
    }))
}

/// GET /progress/generate_test/:folder/:lesson
///
/// A lesson without a Dutch/English table yields no questions.
pub async fn generate_lesson_test(
    State(state): State<Arc<AppState>>,
    Path((folder, lesson)): Path<(String, String)>,
) -> ApiResult<Json<GeneratedTest>> {
    let content = {
        let store = state.store.read().await;
        store
            .read_text(&folder, &lesson)?
            .ok_or_else(|| ApiError::NotFound("Lesson file not found".to_string()))?
    };

    let test = generate_test(&content, state.config.test_size, &mut rand::thread_rng());
    tracing::info!(folder, lesson, questions = test.questions.len(), "Generated test");

    Ok(Json(test))
}

/// POST /progress/evaluate_test/:folder/:lesson
///
/// Scores every question with partial credit and returns the attempt.
pub async fn evaluate_test(
    Path((folder, lesson)): Path<(String, String)>,
    Json(req): Json<TestRequest>,
) -> ApiResult<Json<TestAttempt>> {
    let mut test = require_test(req)?;
    evaluate_attempt(&mut test);

    tracing::info!(folder, lesson, score = test.score, "Test evaluated");
    Ok(Json(test))
}

fn require_test(req: TestRequest) -> ApiResult<TestAttempt> {
    req.test
        .ok_or_else(|| ApiError::Validation("No test data provided".to_string()))
}
