// ==========================================
// 预测对账系统 - 主键规范化
// ==========================================
// 职责: 客户号/月份统一为规范形式,预测侧与目标侧必须走同一套规则
// 红线: 无法解析的月份强制为 0,不中断运行
// ==========================================

use crate::domain::types::ForecastKey;

pub struct KeyNormalizer;

impl KeyNormalizer {
    /// 客户号规范化: 去空白 → 去掉尾部 ".0"（Excel 数值列）→ 大写
    ///
    /// # 示例
    /// - `"42.0"` → `"42"`
    /// - `" abc "` → `"ABC"`
    pub fn normalize_customer(&self, raw: &str) -> String {
        let trimmed = raw.trim();
        let without_float_suffix = trimmed.strip_suffix(".0").unwrap_or(trimmed);
        without_float_suffix.trim().to_uppercase()
    }

    /// 月份规范化: 数值解析后向零截断；空值/非数值/超界一律为 0
    ///
    /// # 示例
    /// - `"3"` → 3
    /// - `"202501.0"` → 202501
    /// - `"Jan"` → 0
    pub fn normalize_month(&self, raw: &str) -> i32 {
        match raw.trim().parse::<f64>() {
            Ok(value) if value.is_finite() => {
                let truncated = value.trunc();
                if truncated >= i32::MIN as f64 && truncated <= i32::MAX as f64 {
                    truncated as i32
                } else {
                    0
                }
            }
            _ => 0,
        }
    }

    /// 生成规范化的连接主键
    pub fn normalize_key(&self, customer_raw: &str, month_raw: &str) -> ForecastKey {
        ForecastKey::new(
            self.normalize_customer(customer_raw),
            self.normalize_month(month_raw),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_customer_float_suffix_removed() {
        assert_eq!(KeyNormalizer.normalize_customer("42.0"), "42");
        assert_eq!(KeyNormalizer.normalize_customer(" 42.0 "), "42");
    }

    #[test]
    fn test_customer_trimmed_and_uppercased() {
        assert_eq!(KeyNormalizer.normalize_customer(" abc "), "ABC");
        assert_eq!(KeyNormalizer.normalize_customer("Obi-Nord"), "OBI-NORD");
    }

    #[test]
    fn test_customer_only_single_trailing_zero_decimal() {
        assert_eq!(KeyNormalizer.normalize_customer("42.05"), "42.05");
        assert_eq!(KeyNormalizer.normalize_customer("1.00"), "1.00");
        assert_eq!(KeyNormalizer.normalize_customer("10"), "10");
    }

    #[test]
    fn test_month_parsing() {
        assert_eq!(KeyNormalizer.normalize_month("3"), 3);
        assert_eq!(KeyNormalizer.normalize_month(" 12 "), 12);
        assert_eq!(KeyNormalizer.normalize_month("202501"), 202501);
        assert_eq!(KeyNormalizer.normalize_month("202501.0"), 202501);
        assert_eq!(KeyNormalizer.normalize_month("7.9"), 7);
    }

    #[test]
    fn test_month_invalid_coerces_to_zero() {
        assert_eq!(KeyNormalizer.normalize_month(""), 0);
        assert_eq!(KeyNormalizer.normalize_month("Jan"), 0);
        assert_eq!(KeyNormalizer.normalize_month("NaN"), 0);
        assert_eq!(KeyNormalizer.normalize_month("1e20"), 0);
    }

    #[test]
    fn test_key_normalization_is_symmetric() {
        let forecast_side = KeyNormalizer.normalize_key("c1.0", "1.0");
        let target_side = KeyNormalizer.normalize_key(" C1 ", "1");
        assert_eq!(forecast_side, target_side);
    }
}
