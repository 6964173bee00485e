//! Wordbank Routes
//!
//! - GET /wordbank/ - Organized wordbank markdown
//! - GET /wordbank/saved - Words saved from exercises
//! - POST /wordbank/save_word - Append a word to the saved words

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::dto::{MessageResponse, SaveWordRequest, WordbankResponse};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::practice::{Difficulty, WordEntry};

/// GET /wordbank/
pub async fn get_wordbank(State(state): State<Arc<AppState>>) -> ApiResult<Json<WordbankResponse>> {
    let store = state.store.read().await;
    let content = store.wordbank()?.ok_or_else(|| {
        tracing::warn!("Wordbank file not found");
        ApiError::NotFound("Wordbank file not found".to_string())
    })?;

    Ok(Json(WordbankResponse { content }))
}

/// GET /wordbank/saved
pub async fn get_saved_words(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<WordbankResponse>> {
    let store = state.store.read().await;
    let content = store
        .saved_words()?
        .ok_or_else(|| ApiError::NotFound("Saved wordbank file not found".to_string()))?;

    Ok(Json(WordbankResponse { content }))
}

/// POST /wordbank/save_word
pub async fn save_word(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SaveWordRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let entry = validate_save_word(&req)?;

    let store = state.store.write().await;
    store.save_word(&entry)?;

    Ok(Json(MessageResponse {
        message: "Word saved successfully".to_string(),
    }))
}

fn validate_save_word(req: &SaveWordRequest) -> ApiResult<WordEntry> {
    let non_empty = |field: &Option<String>| field.as_deref().filter(|s| !s.is_empty()).map(str::to_string);

    let (Some(dutch), Some(english), Some(difficulty)) = (
        non_empty(&req.dutch),
        non_empty(&req.english),
        non_empty(&req.difficulty),
    ) else {
        return Err(ApiError::Validation("Invalid word data".to_string()));
    };

    let difficulty: Difficulty = difficulty
        .parse()
        .map_err(|e: crate::practice::PracticeError| ApiError::Validation(e.to_string()))?;

    Ok(WordEntry::new(dutch, english, difficulty))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_save_word() {
        let req = SaveWordRequest {
            dutch: Some("huis".to_string()),
            english: Some("house".to_string()),
            difficulty: Some("\u{1F7E5}".to_string()),
        };
        assert_eq!(
            validate_save_word(&req).unwrap(),
            WordEntry::new("huis", "house", Difficulty::Hard)
        );

        let missing = SaveWordRequest {
            english: Some(String::new()),
            ..req.clone()
        };
        assert!(validate_save_word(&missing).is_err());

        let bad_marker = SaveWordRequest {
            difficulty: Some("red".to_string()),
            ..req
        };
        assert!(validate_save_word(&bad_marker).is_err());
    }
}
