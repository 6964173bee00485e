//! Practice Routes
//!
//! Lesson browsing, sentence tables and per-lesson practice progress.
//!
//! - GET /practice/folders - List the user's folders
//! - GET /practice/files?folder= - List markdown files in a folder
//! - GET /practice/load_text?filename=&folder= - Parse a lesson's sentence table
//! - GET /practice/progress?filename=&folder= - Load practice progress
//! - POST /practice/progress - Replace practice progress
//! - POST /practice/progress/reset - Clear practice progress
//! - POST /practice/translate - Look up the translation of a sentence

use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::api::dto::{
    FolderQuery, LessonQuery, LoadTextResponse, ProgressResponse, ResetProgressRequest,
    SaveProgressRequest, SuccessResponse, TranslateRequest, TranslateResponse,
};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::practice::table::{extract_keywords, parse_sentence_table, translate};
use crate::practice::ProgressRecord;
use crate::store::StoreError;

/// GET /practice/folders
pub async fn list_folders(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<String>>> {
    let store = state.store.read().await;
    let folders = store.list_folders()?;
    tracing::debug!(count = folders.len(), "Listed folders");
    Ok(Json(folders))
}

/// GET /practice/files?folder=
pub async fn list_files(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FolderQuery>,
) -> ApiResult<Json<Vec<String>>> {
    let store = state.store.read().await;
    let files = store.list_files(&query.folder)?;
    tracing::debug!(folder = %query.folder, count = files.len(), "Listed files");
    Ok(Json(files))
}

/// GET /practice/load_text?filename=&folder=
///
/// Returns the sentence pairs of the lesson table, keywords found in the
/// target-language sentences and the raw content.
pub async fn load_text(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LessonQuery>,
) -> ApiResult<Json<LoadTextResponse>> {
    let filename = require_filename(query.filename.as_deref())?;

    let store = state.store.read().await;
    let content = store
        .read_text(&query.folder, filename)?
        .ok_or_else(|| ApiError::NotFound(format!("File '{}' not found", filename)))?;

    let sentences = parse_sentence_table(&content);
    let target_text = sentences
        .iter()
        .map(|s| s.target_lang.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    let keywords = extract_keywords(&target_text);

    tracing::info!(
        folder = %query.folder,
        filename,
        sentences = sentences.len(),
        "Loaded text for practice"
    );

    Ok(Json(LoadTextResponse {
        sentences,
        keywords,
        content,
    }))
}

/// GET /practice/progress?filename=&folder=
///
/// Missing or unreadable progress is returned as an empty record.
pub async fn load_progress(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LessonQuery>,
) -> ApiResult<Json<ProgressResponse>> {
    let filename = require_filename(query.filename.as_deref())?;

    let store = state.store.read().await;
    let progress = match store.load_practice_progress(&query.folder, filename) {
        Ok(progress) => progress,
        Err(e @ StoreError::InvalidName(_)) => return Err(e.into()),
        Err(e) => {
            tracing::error!(folder = %query.folder, filename, error = %e, "Error loading progress");
            ProgressRecord::new()
        }
    };

    Ok(Json(ProgressResponse { progress }))
}

/// POST /practice/progress
///
/// Replaces the stored record. An empty record is rejected; clearing goes
/// through the reset route.
pub async fn save_progress(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SaveProgressRequest>,
) -> ApiResult<Json<SuccessResponse>> {
    let filename = require_filename(req.filename.as_deref())?;
    if req.progress.is_empty() {
        return Err(ApiError::Validation("No progress data provided".to_string()));
    }

    let store = state.store.write().await;
    store.save_practice_progress(&req.folder, filename, &req.progress)?;

    Ok(Json(SuccessResponse { success: true }))
}

/// POST /practice/progress/reset
pub async fn reset_progress(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ResetProgressRequest>,
) -> ApiResult<Json<SuccessResponse>> {
    let filename = require_filename(req.filename.as_deref())?;

    let store = state.store.write().await;
    store.save_practice_progress(&req.folder, filename, &ProgressRecord::new())?;
    tracing::info!(folder = %req.folder, filename, "Practice progress reset");

    Ok(Json(SuccessResponse { success: true }))
}

/// POST /practice/translate
pub async fn translate_sentence(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TranslateRequest>,
) -> ApiResult<Json<TranslateResponse>> {
    let filename = req.filename.as_deref().unwrap_or("");
    if req.sentence.is_empty() || filename.is_empty() {
        return Err(ApiError::Validation(
            "Sentence and filename are required".to_string(),
        ));
    }

    let store = state.store.read().await;
    let content = store
        .read_text(&req.folder, filename)?
        .ok_or_else(|| ApiError::NotFound(format!("File '{}' not found", filename)))?;

    let sentences = parse_sentence_table(&content);
    let translation = translate(&sentences, &req.sentence)
        .ok_or_else(|| ApiError::NotFound("Sentence not found".to_string()))?;

    Ok(Json(TranslateResponse {
        sentence: req.sentence.clone(),
        translation: translation.to_string(),
    }))
}

fn require_filename(filename: Option<&str>) -> ApiResult<&str> {
    match filename {
        Some(name) if !name.is_empty() => Ok(name),
        _ => Err(ApiError::Validation("No filename provided".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_filename() {
        assert_eq!(require_filename(Some("les.md")).unwrap(), "les.md");
        assert!(require_filename(Some("")).is_err());
        assert!(require_filename(None).is_err());
    }
}
