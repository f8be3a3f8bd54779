use crate::config::config::AppConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

/// 环境变量前缀
pub const ENV_PREFIX: &str = "AROGYA_";

/// 聊天查询的最小长度
pub const MIN_QUERY_LENGTH: usize = 2;

/// 配置加载器
pub struct ConfigLoader;

impl ConfigLoader {
    /// 从默认路径加载配置
    ///
    /// 合并顺序（后者覆盖前者）：
    /// 1. 开发环境默认值
    /// 2. ./config.toml
    /// 3. `AROGYA_` 前缀的环境变量，`__` 表示嵌套，例如 `AROGYA_SERVER__PORT`
    pub fn load() -> Result<AppConfig, figment::Error> {
        Self::load_from(default_config_path())
    }

    /// 从指定路径加载配置
    pub fn load_from(path: impl AsRef<Path>) -> Result<AppConfig, figment::Error> {
        Self::figment(path.as_ref()).extract()
    }

    fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(AppConfig::development()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// 验证配置
    pub fn validate(config: &AppConfig) -> Result<(), ConfigValidationError> {
        if config.server.port == 0 {
            return Err(ConfigValidationError::InvalidPort);
        }

        if config.data.knowledge_paths.is_empty() {
            return Err(ConfigValidationError::MissingKnowledgeSources);
        }

        let threshold = config.triage.caution_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ConfigValidationError::InvalidThreshold(threshold));
        }

        if !(0.0..=1.0).contains(&config.disease.min_score) {
            return Err(ConfigValidationError::InvalidThreshold(config.disease.min_score));
        }

        if config.retrieval.top_k == 0 {
            return Err(ConfigValidationError::InvalidTopK);
        }

        if config.security.max_query_length < MIN_QUERY_LENGTH {
            return Err(ConfigValidationError::InvalidQueryLength(
                config.security.max_query_length,
            ));
        }

        if config.hospital.enabled
            && (config.hospital.nominatim_url.is_empty() || config.hospital.overpass_url.is_empty())
        {
            return Err(ConfigValidationError::InvalidPath(
                "hospital.nominatim_url / hospital.overpass_url".into(),
            ));
        }

        Ok(())
    }
}

/// 配置验证错误
#[derive(thiserror::Error, Debug)]
pub enum ConfigValidationError {
    #[error("服务端口无效，必须大于 0")]
    InvalidPort,

    #[error("未配置任何知识库数据源")]
    MissingKnowledgeSources,

    #[error("阈值无效，必须在 0 到 1 之间: {0}")]
    InvalidThreshold(f32),

    #[error("top_k 无效，必须大于 0")]
    InvalidTopK,

    #[error("配置路径无效: {0}")]
    InvalidPath(String),

    #[error("查询长度上限无效，至少为 2: {0}")]
    InvalidQueryLength(usize),
}

/// 获取默认配置文件路径
pub fn default_config_path() -> PathBuf {
    PathBuf::from("config.toml")
}

/// 检查配置文件是否存在
pub fn config_exists() -> bool {
    default_config_path().exists()
}
