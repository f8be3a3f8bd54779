//! Handlers 模块
//!
//! HTTP 请求处理程序。

pub mod chat_handler;
pub mod disease_handler;
pub mod hospital_handler;
pub mod scheme_handler;

pub use chat_handler::*;
pub use disease_handler::*;
pub use hospital_handler::*;
pub use scheme_handler::*;
