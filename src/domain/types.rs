// ==========================================
// 预测对账系统 - 领域类型定义
// ==========================================
// 红线: 所有连接 (join) 只允许使用规范化后的 ForecastKey 精确匹配
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// ForecastKey - 对账主键 (客户, 月份)
// ==========================================
// 客户号: 大写、去空白、无 ".0" 尾缀
// 月份: 整数 (1-12 或 YYYYMM), 无法解析时为 0
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ForecastKey {
    pub customer_id: String,
    pub month: i32,
}

impl ForecastKey {
    pub fn new(customer_id: impl Into<String>, month: i32) -> Self {
        Self {
            customer_id: customer_id.into(),
            month,
        }
    }
}

impl fmt::Display for ForecastKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.customer_id, self.month)
    }
}

// ==========================================
// 目标计划来源
// ==========================================
// 序列化格式: SCREAMING_SNAKE_CASE
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TargetSourceKind {
    Simulated, // 固定种子模拟的演示计划
    File,      // 外部提供的目标计划文件
}

impl fmt::Display for TargetSourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetSourceKind::Simulated => write!(f, "SIMULATED"),
            TargetSourceKind::File => write!(f, "FILE"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forecast_key_ordering() {
        let mut keys = vec![
            ForecastKey::new("B", 1),
            ForecastKey::new("A", 2),
            ForecastKey::new("A", 1),
        ];
        keys.sort();
        assert_eq!(keys[0], ForecastKey::new("A", 1));
        assert_eq!(keys[1], ForecastKey::new("A", 2));
        assert_eq!(keys[2], ForecastKey::new("B", 1));
    }

    #[test]
    fn test_forecast_key_display() {
        assert_eq!(ForecastKey::new("C1", 202501).to_string(), "C1/202501");
    }

    #[test]
    fn test_target_source_kind_serde() {
        let json = serde_json::to_string(&TargetSourceKind::Simulated).unwrap();
        assert_eq!(json, "\"SIMULATED\"");
        let kind: TargetSourceKind = serde_json::from_str("\"FILE\"").unwrap();
        assert_eq!(kind, TargetSourceKind::File);
    }
}
