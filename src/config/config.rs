use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// 服务地址
    pub host: String,
    /// 服务端口
    pub port: u16,
    /// 请求超时（秒）
    pub request_timeout: u64,
    /// 最大请求体大小（字节）
    pub max_request_size: usize,
}

/// 数据文件配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DataConfig {
    /// 知识库数据源，按顺序加载
    pub knowledge_paths: Vec<PathBuf>,
    /// 疾病库
    pub disease_path: PathBuf,
    /// 政府计划
    pub schemes_path: PathBuf,
}

/// 检索配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RetrievalConfig {
    /// 默认返回条数
    pub top_k: usize,
    /// 最低得分，低于该值的条目不返回
    pub min_score: f32,
}

/// 疾病匹配配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DiseaseConfig {
    /// 词元重叠匹配的最低得分
    pub min_score: f32,
    /// 扩展词元的权重
    pub expansion_weight: f32,
    /// 仅凭词元重叠时视为高质量匹配的得分
    pub high_quality_score: f32,
}

/// 分诊配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TriageConfig {
    /// 置信度低于该值时降级为 caution
    pub caution_threshold: f32,
}

/// 医院查询配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct HospitalConfig {
    /// 是否启用在线查询
    pub enabled: bool,
    /// 缓存文件
    pub cache_path: PathBuf,
    /// 种子数据文件
    pub seed_path: Option<PathBuf>,
    /// 缓存有效期（小时）
    pub cache_ttl_hours: u64,
    /// Nominatim 地址
    pub nominatim_url: String,
    /// Overpass 地址
    pub overpass_url: String,
    /// HTTP User-Agent
    pub user_agent: String,
    /// 地理编码超时（秒）
    pub geocode_timeout: u64,
    /// 医院检索超时（秒）
    pub search_timeout: u64,
    /// 检索半径（米）
    pub search_radius_m: u32,
    /// 缓存中保留的医院数量
    pub max_results: usize,
    /// 聊天回答中医院查询的整体超时（秒）
    pub chat_lookup_timeout: u64,
    /// 内存中保留的位置查询结果上限
    pub location_cache_capacity: usize,
}

/// 安全配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SecurityConfig {
    /// 是否添加安全响应头
    pub security_headers: bool,
    /// 允许的跨域来源，空表示任意
    pub allowed_origins: Vec<String>,
    /// 查询文本最大长度
    pub max_query_length: usize,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别
    pub level: String,
    /// 结构化日志格式
    pub structured: bool,
    /// 日志文件目录
    pub log_dir: Option<PathBuf>,
}

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// 服务器配置
    pub server: ServerConfig,
    /// 数据文件配置
    pub data: DataConfig,
    /// 检索配置
    pub retrieval: RetrievalConfig,
    /// 疾病匹配配置
    pub disease: DiseaseConfig,
    /// 分诊配置
    pub triage: TriageConfig,
    /// 医院查询配置
    pub hospital: HospitalConfig,
    /// 安全配置
    pub security: SecurityConfig,
    /// 日志配置
    pub logging: LoggingConfig,
    /// 应用名称
    pub app_name: String,
    /// 环境
    pub environment: String,
}

impl AppConfig {
    /// 创建开发环境配置
    pub fn development() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".into(),
                port: 8000,
                request_timeout: 30,
                max_request_size: 64 * 1024,
            },
            data: DataConfig {
                knowledge_paths: vec![
                    PathBuf::from("./data/medical_knowledge.json"),
                    PathBuf::from("./data/national_health_portal.json"),
                ],
                disease_path: PathBuf::from("./data/disease_knowledge.json"),
                schemes_path: PathBuf::from("./data/schemes.json"),
            },
            retrieval: RetrievalConfig {
                top_k: 3,
                min_score: 0.1,
            },
            disease: DiseaseConfig {
                min_score: 0.3,
                expansion_weight: 0.35,
                high_quality_score: 0.62,
            },
            triage: TriageConfig {
                caution_threshold: 0.35,
            },
            hospital: HospitalConfig {
                enabled: true,
                cache_path: PathBuf::from("./data/hospital_cache.json"),
                seed_path: Some(PathBuf::from("./data/pincode_hospitals_seed.json")),
                cache_ttl_hours: 12,
                nominatim_url: "https://nominatim.openstreetmap.org".into(),
                overpass_url: "https://overpass-api.de".into(),
                user_agent: "arogya-health-assistant/0.1".into(),
                geocode_timeout: 15,
                search_timeout: 30,
                search_radius_m: 30_000,
                max_results: 25,
                chat_lookup_timeout: 20,
                location_cache_capacity: 256,
            },
            security: SecurityConfig {
                security_headers: true,
                allowed_origins: Vec::new(),
                max_query_length: 800,
            },
            logging: LoggingConfig {
                level: "debug".into(),
                structured: false,
                log_dir: None,
            },
            app_name: "arogya".into(),
            environment: "development".into(),
        }
    }

    /// 创建生产环境配置
    pub fn production() -> Self {
        let mut config = Self::development();
        config.environment = "production".into();
        config.logging.level = "info".into();
        config.logging.structured = true;
        config.logging.log_dir = Some(PathBuf::from("./logs"));
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_development_defaults() {
        let config = AppConfig::development();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.data.knowledge_paths.len(), 2);
        assert!((config.triage.caution_threshold - 0.35).abs() < f32::EPSILON);
        assert_eq!(config.hospital.cache_ttl_hours, 12);
    }

    #[test]
    fn test_production_overrides() {
        let config = AppConfig::production();
        assert_eq!(config.environment, "production");
        assert_eq!(config.logging.level, "info");
        assert!(config.logging.structured);
    }
}
