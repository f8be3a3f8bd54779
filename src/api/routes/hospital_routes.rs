//! Hospital Routes

use axum::{Router, routing::get};

use crate::api::app_state::AppState;
use crate::api::handlers::hospital_handler::*;

/// 创建医院查询路由器
pub fn create_hospital_router() -> Router<AppState> {
    Router::new().route("/hospitals/nearest", get(nearest_hospitals))
}
