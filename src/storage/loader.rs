//! JSON 数据文件加载

use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::path::Path;

use super::DataLoadError;
use crate::models::{DiseaseRecord, Scheme};

/// 读取 JSON 数组文件
pub fn read_json_array<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, DataLoadError> {
    let raw = std::fs::read_to_string(path).map_err(|source| DataLoadError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&raw).map_err(|e| DataLoadError::Malformed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// 加载疾病库
///
/// 名称不能为空，`id` 在文件内唯一。
pub fn load_disease_records(path: &Path) -> Result<Vec<DiseaseRecord>, DataLoadError> {
    let records: Vec<DiseaseRecord> = read_json_array(path)?;
    let mut seen = HashSet::with_capacity(records.len());

    for (index, record) in records.iter().enumerate() {
        if record.name.trim().is_empty() {
            return Err(DataLoadError::MissingField {
                path: path.to_path_buf(),
                index,
                field: "name",
            });
        }
        if !seen.insert(record.id.as_str()) {
            return Err(DataLoadError::DuplicateId {
                path: path.to_path_buf(),
                id: record.id.clone(),
            });
        }
    }

    Ok(records)
}

/// 加载政府计划列表
pub fn load_schemes(path: &Path) -> Result<Vec<Scheme>, DataLoadError> {
    let schemes: Vec<Scheme> = read_json_array(path)?;

    for (index, scheme) in schemes.iter().enumerate() {
        if scheme.name.trim().is_empty() {
            return Err(DataLoadError::MissingField {
                path: path.to_path_buf(),
                index,
                field: "name",
            });
        }
    }

    Ok(schemes)
}
