//! Disease Routes

use axum::{Router, routing::get};

use crate::api::app_state::AppState;
use crate::api::handlers::disease_handler::*;

/// 创建疾病检索路由器
pub fn create_disease_router() -> Router<AppState> {
    Router::new().route("/diseases/search", get(search_diseases))
}
