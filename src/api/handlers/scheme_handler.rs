use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use tracing::debug;
use validator::Validate;

use crate::{
    api::{
        app_state::AppState,
        dto::{chat_dto::SourceItem, scheme_dto::*},
    },
    error::AppError,
};

pub async fn search_schemes(
    State(state): State<AppState>,
    Query(params): Query<SchemeQueryParams>,
) -> Result<impl IntoResponse, AppError> {
    params.validate()?;
    let query = params.q.trim().to_string();
    debug!("Scheme query: {}, language: {}", query, params.language);

    let matches = state.scheme_navigator.search(&query);
    if matches.is_empty() {
        return Err(AppError::NotFound(format!(
            "No government health scheme matches '{}'",
            query
        )));
    }

    let answer = state
        .scheme_navigator
        .format_response(&matches, params.language);

    Ok(Json(SchemeResponse {
        query,
        language: params.language.code().to_string(),
        answer: answer.answer,
        next_steps: answer.next_steps,
        sources: answer.sources.into_iter().map(SourceItem::from).collect(),
    }))
}
