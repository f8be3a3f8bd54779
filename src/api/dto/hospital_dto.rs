//! 医院查询 DTO

use serde::Deserialize;
use validator::Validate;

fn default_limit() -> usize {
    5
}

/// 最近医院查询参数
#[derive(Debug, Deserialize, Validate)]
pub struct NearestHospitalParams {
    /// 六位邮政编码
    #[validate(length(equal = 6))]
    pub pincode: String,
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 10))]
    pub limit: usize,
}
