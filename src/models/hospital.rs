use serde::{Deserialize, Serialize};

/// 医院
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Hospital {
    /// 名称
    pub name: String,
    /// 与查询位置的距离（公里）
    pub distance_km: f64,
    /// 地址
    #[serde(default = "default_address")]
    pub address: String,
    /// 纬度
    pub latitude: f64,
    /// 经度
    pub longitude: f64,
    /// 数据来源
    #[serde(default)]
    pub source: String,
    /// 联系方式
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
}

fn default_address() -> String {
    "Address details not available".to_string()
}

/// 最近医院查询结果
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HospitalLookup {
    /// 邮政编码
    pub pincode: String,
    /// 解析出的位置描述
    pub location: String,
    /// 数据来源
    pub source: String,
    /// 是否来自缓存或种子数据
    pub cached: bool,
    /// 按距离升序排列的医院
    pub hospitals: Vec<Hospital>,
}
