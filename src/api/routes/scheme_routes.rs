//! Scheme Routes

use axum::{Router, routing::get};

use crate::api::app_state::AppState;
use crate::api::handlers::scheme_handler::*;

/// 创建政府计划路由器
pub fn create_scheme_router() -> Router<AppState> {
    Router::new().route("/schemes", get(search_schemes))
}
