//! Typo Routes
//!
//! Mistakes from vocabulary practice, replayed in personalized mode.
//!
//! - POST /typo/wordbank/save_typo - Log a typo
//! - GET /typo/wordbank/get_typos - Typos as hard wordbank entries

use axum::{extract::State, Json};
use serde_json::Value;
use std::sync::Arc;

use crate::api::dto::{MessageResponse, TyposResponse};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::practice::{Difficulty, TypoEntry, WordEntry};

const REQUIRED_FIELDS: [&str; 4] = ["userAnswer", "correctAnswer", "english", "timestamp"];

/// POST /typo/wordbank/save_typo
pub async fn save_typo(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> ApiResult<Json<MessageResponse>> {
    let typo = parse_typo(body)?;

    let store = state.store.write().await;
    store.append_typo(typo)?;
    tracing::info!("Typo saved for review");

    Ok(Json(MessageResponse {
        message: "Typo saved successfully".to_string(),
    }))
}

/// GET /typo/wordbank/get_typos
pub async fn get_typos(State(state): State<Arc<AppState>>) -> ApiResult<Json<TyposResponse>> {
    let store = state.store.read().await;
    let typos = store
        .load_typos()?
        .into_iter()
        .map(|t| WordEntry::new(t.correct_answer, t.english, Difficulty::Hard))
        .collect();

    Ok(Json(TyposResponse { typos }))
}

/// Check the required fields, then decode
fn parse_typo(body: Value) -> ApiResult<TypoEntry> {
    let Some(object) = body.as_object() else {
        return Err(ApiError::Validation("No data provided".to_string()));
    };

    let missing: Vec<&str> = REQUIRED_FIELDS
        .iter()
        .copied()
        .filter(|field| !object.contains_key(*field))
        .collect();
    if !missing.is_empty() {
        return Err(ApiError::Validation(format!(
            "Missing fields: {}",
            missing.join(", ")
        )));
    }

    serde_json::from_value(body)
        .map_err(|e| ApiError::Validation(format!("Invalid typo data: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_typo() {
        let typo = parse_typo(json!({
            "userAnswer": "hius",
            "correctAnswer": "huis",
            "english": "house",
            "timestamp": "2024-05-01T10:00:00.000Z"
        }))
        .unwrap();
        assert_eq!(typo.correct_answer, "huis");
    }

    #[test]
    fn test_missing_fields_listed() {
        let err = parse_typo(json!({"userAnswer": "hius", "english": "house"})).unwrap_err();
        assert_eq!(err.to_string(), "Missing fields: correctAnswer, timestamp");

        assert!(parse_typo(json!([1, 2])).is_err());
    }
}
