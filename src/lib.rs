//! Arogya - 多语言健康助手
//!
//! 基于本地知识库的词法检索、疾病库匹配和红旗症状分诊，
//! 为用户提供带免责声明的健康信息、政府医疗计划指引和最近医院查询。

pub mod api;
pub mod config;
pub mod error;
pub mod index;
pub mod models;
pub mod observability;
pub mod security;
pub mod services;
pub mod storage;
