use axum::{Json, extract::State, response::IntoResponse};
use tracing::debug;
use validator::Validate;

use crate::{
    api::{app_state::AppState, dto::chat_dto::*},
    error::AppError,
    security::validators,
    services::ChatQuery,
};

pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<impl IntoResponse, AppError> {
    request.validate()?;
    let query = validators::validate_chat_query(&state.validator, &request.query)?;
    let location = validators::validate_location(request.location.as_deref())?;

    debug!(
        language = %request.language,
        mode = ?request.mode,
        has_location = location.is_some(),
        "Chat request received"
    );

    let chat_query = ChatQuery {
        query,
        language: request.language,
        mode: request.mode,
        age_years: request.age_years,
        location,
    };

    let reply = state.assistant.answer(&chat_query).await;
    state.metrics.record_chat(reply.urgency);
    debug!(urgency = %reply.urgency, confidence = reply.confidence, "Chat answered");

    Ok(Json(ChatResponse::from(reply)))
}
