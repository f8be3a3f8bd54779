//! DTO 模块
//!
//! 数据传输对象，用于 API 请求和响应的序列化。

pub mod chat_dto;
pub mod disease_dto;
pub mod hospital_dto;
pub mod scheme_dto;

pub use chat_dto::*;
pub use disease_dto::*;
pub use hospital_dto::*;
pub use scheme_dto::*;
