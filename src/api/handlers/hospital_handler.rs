use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use tracing::{debug, warn};
use validator::Validate;

use crate::{
    api::{app_state::AppState, dto::hospital_dto::*},
    error::AppError,
    security::validators,
    services::HospitalError,
};

pub async fn nearest_hospitals(
    State(state): State<AppState>,
    Query(params): Query<NearestHospitalParams>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(e) = params.validate() {
        state.metrics.record_hospital_lookup("invalid");
        return Err(e.into());
    }
    if let Err(e) = validators::validate_pincode_format(&params.pincode) {
        state.metrics.record_hospital_lookup("invalid");
        return Err(e.into());
    }

    let service = state
        .hospital_service
        .as_ref()
        .ok_or_else(|| AppError::Upstream("Hospital lookup is disabled on this server".to_string()))?;

    debug!("Nearest hospitals for pincode: {}", params.pincode);

    match service.lookup_nearest(&params.pincode, params.limit).await {
        Ok(lookup) => {
            let outcome = if lookup.cached { "cached" } else { "remote" };
            state.metrics.record_hospital_lookup(outcome);
            Ok(Json(lookup))
        }
        Err(e) => {
            let outcome = match e {
                HospitalError::InvalidPincode(_) => "invalid",
                HospitalError::LookupFailed(_) | HospitalError::Http(_) => "failed",
            };
            state.metrics.record_hospital_lookup(outcome);
            warn!(pincode = %params.pincode, error = %e, "Hospital lookup failed");
            Err(e.into())
        }
    }
}
