use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use tracing::debug;
use validator::Validate;

use crate::{
    api::{app_state::AppState, dto::disease_dto::*},
    error::AppError,
};

pub async fn search_diseases(
    State(state): State<AppState>,
    Query(params): Query<DiseaseSearchParams>,
) -> Result<impl IntoResponse, AppError> {
    params.validate()?;
    let query = params.q.trim().to_string();
    debug!("Disease search: {}, limit: {}", query, params.limit);

    let matches: Vec<DiseaseMatchItem> = state
        .disease_matcher
        .search(&query, params.limit)
        .into_iter()
        .map(DiseaseMatchItem::from)
        .collect();
    state.metrics.record_disease_search();

    Ok(Json(DiseaseSearchResponse { query, matches }))
}
