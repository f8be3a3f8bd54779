//! Routes 模块
//!
//! 定义 API 路由。

pub mod chat_routes;
pub mod disease_routes;
pub mod hospital_routes;
pub mod scheme_routes;
