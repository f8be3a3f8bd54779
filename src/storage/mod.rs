//! 存储层模块
//!
//! 启动时从本地 JSON 数据文件加载知识库、疾病库与政府计划，全部保存在内存中且只读。

pub mod knowledge_store;
pub mod loader;

pub use knowledge_store::{KnowledgeStore, SourceSummary, build_index};
pub use loader::{load_disease_records, load_schemes, read_json_array};

use std::path::PathBuf;
use thiserror::Error;

/// 数据加载错误
///
/// 单个数据源出错只跳过该数据源；所有数据源都不可用时启动失败。
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("无法读取数据源 {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("数据源格式错误 {}: {reason}", .path.display())]
    Malformed { path: PathBuf, reason: String },

    #[error("数据源 {} 第 {index} 条记录缺少必填字段 '{field}'", .path.display())]
    MissingField {
        path: PathBuf,
        index: usize,
        field: &'static str,
    },

    #[error("数据源 {} 中存在重复 id '{id}'", .path.display())]
    DuplicateId { path: PathBuf, id: String },

    #[error("配置的 {attempted} 个数据源均不可用")]
    NoUsableSource { attempted: usize },
}
