//! 评分函数
//!
//! 检索排序的全部常数都集中在这里，便于单独测试和调参。

/// 长文本惩罚系数
pub const LENGTH_DAMPING: f32 = 0.15;

/// 标题命中奖励（按标题命中权重占查询权重的比例缩放）
pub const TITLE_BONUS: f32 = 0.10;

/// 条目语言与请求语言一致时的奖励
pub const LANGUAGE_BONUS: f32 = 0.03;

/// 条目分类与查询分类提示一致时的奖励
pub const CATEGORY_BONUS: f32 = 0.05;

/// 置信度校准曲线陡度
pub const CALIBRATION_STEEPNESS: f32 = 3.0;

/// 达到该词元数的查询只命中一个词元时视为无效匹配
pub const SPARSE_QUERY_MIN_TOKENS: usize = 4;

/// 逆文档频率（BM25 形式，恒为正）
///
/// `idf(df, n) = ln(1 + (n - df + 0.5) / (df + 0.5))`
pub fn idf(doc_freq: usize, total_docs: usize) -> f32 {
    let n = total_docs as f32;
    let df = (doc_freq.min(total_docs)) as f32;
    (1.0 + (n - df + 0.5) / (df + 0.5)).ln()
}

/// 长度归一化因子，随条目长度对数增长
///
/// `1 + LENGTH_DAMPING * ln(1 + entry_len / query_len)`
pub fn length_normalization(entry_len: usize, query_len: usize) -> f32 {
    let ratio = entry_len as f32 / query_len.max(1) as f32;
    1.0 + LENGTH_DAMPING * (1.0 + ratio).ln()
}

/// 加权重叠得分，范围 `[0, 1]`
///
/// `matched_weight` 为命中词元的 idf 之和，`query_weight` 为全部查询词元的 idf 之和。
pub fn overlap_score(
    matched_weight: f32,
    query_weight: f32,
    entry_len: usize,
    query_len: usize,
) -> f32 {
    if matched_weight <= 0.0 || query_weight <= 0.0 {
        return 0.0;
    }
    let coverage = (matched_weight / query_weight).min(1.0);
    coverage / length_normalization(entry_len, query_len)
}

/// 稀疏命中：长查询只命中一个词元
pub fn is_sparse_overlap(query_len: usize, overlap: usize) -> bool {
    query_len >= SPARSE_QUERY_MIN_TOKENS && overlap <= 1
}

/// 把检索得分映射为 `[0, 1]` 的置信度
///
/// 这是启发式的排序分数，不是概率。
pub fn calibrate_confidence(score: f32) -> f32 {
    if !score.is_finite() || score <= 0.0 {
        return 0.0;
    }
    let s = score.min(1.0);
    let k = CALIBRATION_STEEPNESS;
    ((1.0 - (-k * s).exp()) / (1.0 - (-k).exp())).clamp(0.0, 1.0)
}

/// 四舍五入到指定小数位
pub fn round_to(value: f32, places: i32) -> f32 {
    let factor = 10f32.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idf_rare_tokens_weigh_more() {
        assert!(idf(1, 100) > idf(50, 100));
        assert!(idf(100, 100) > 0.0);
    }

    #[test]
    fn test_length_normalization_grows_with_entry_length() {
        assert!(length_normalization(200, 2) > length_normalization(20, 2));
        assert!(length_normalization(0, 3) >= 1.0);
    }

    #[test]
    fn test_overlap_score_bounds() {
        assert_eq!(overlap_score(0.0, 4.0, 10, 2), 0.0);
        let full = overlap_score(4.0, 4.0, 1, 2);
        assert!(full > 0.0 && full <= 1.0);
        let partial = overlap_score(2.0, 4.0, 1, 2);
        assert!(partial < full);
    }

    #[test]
    fn test_sparse_overlap_rule() {
        assert!(is_sparse_overlap(4, 1));
        assert!(!is_sparse_overlap(4, 2));
        assert!(!is_sparse_overlap(3, 1));
    }

    #[test]
    fn test_calibration_is_monotone_and_bounded() {
        assert_eq!(calibrate_confidence(0.0), 0.0);
        assert!((calibrate_confidence(1.0) - 1.0).abs() < 1e-6);
        assert!(calibrate_confidence(0.2) < calibrate_confidence(0.4));
        assert_eq!(calibrate_confidence(f32::NAN), 0.0);
        assert!(calibrate_confidence(3.0) <= 1.0);
    }
}
