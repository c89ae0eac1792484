// ==========================================
// 预测对账系统 - 预测领域模型
// ==========================================
// 职责: 自下而上预测行、自上而下目标计划及其派生结果
// 生命周期: 每次运行从输入文件重新计算,运行间不持久化
// ==========================================

use crate::domain::types::{ForecastKey, TargetSourceKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// ForecastLine - 预测行
// ==========================================
// 红线: 事实来源,加载后只读
// 用途: 导入层写入,引擎层只读
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastLine {
    pub article_id: String,  // 物料号 (matnr)
    pub customer_id: String, // 客户/工厂 (werk),已规范化
    pub month: i32,          // 预测月份 (1-12 或 YYYYMM),已规范化
    pub quantity: f64,       // 预测数量 (> 0)
}

impl ForecastLine {
    pub fn key(&self) -> ForecastKey {
        ForecastKey::new(self.customer_id.clone(), self.month)
    }
}

// ==========================================
// RawForecastRecord - 导入中间结构体
// ==========================================
// 用途: 字段映射产物,键尚未规范化
// 生命周期: 仅在导入流程内
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawForecastRecord {
    pub article_id: String,
    pub customer_raw: String,
    pub month_raw: String,
    pub quantity: f64,
    pub row_number: usize, // 原始文件行号
}

// ==========================================
// TargetEntry - 目标计划条目
// ==========================================
// 每个 (客户, 月份) 一条,可为模拟数据或外部提供
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetEntry {
    pub customer_id: String,
    pub month: i32,
    pub target_quantity: f64,
}

impl TargetEntry {
    pub fn key(&self) -> ForecastKey {
        ForecastKey::new(self.customer_id.clone(), self.month)
    }
}

// ==========================================
// AggregatedActual - 按 (客户, 月份) 汇总的预测
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedActual {
    pub customer_id: String,
    pub month: i32,
    pub summed_quantity: f64,
}

impl AggregatedActual {
    pub fn key(&self) -> ForecastKey {
        ForecastKey::new(self.customer_id.clone(), self.month)
    }
}

// ==========================================
// ReconciliationFactor - 调整系数
// ==========================================
// factor = target / actual,边界规则见 engine::factor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationFactor {
    pub customer_id: String,
    pub month: i32,
    pub factor: f64,
}

impl ReconciliationFactor {
    pub fn key(&self) -> ForecastKey {
        ForecastKey::new(self.customer_id.clone(), self.month)
    }
}

// ==========================================
// SmoothedForecastLine - 平滑后的预测行
// ==========================================
// 与输入 ForecastLine 一一对应,不新增不丢弃
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmoothedForecastLine {
    pub article_id: String,
    pub customer_id: String,
    pub month: i32,
    pub quantity: f64,
    pub factor: f64,
    pub smoothed_quantity: i64, // round(quantity × factor)
}

// ==========================================
// MonthlyComparison - 平滑前后月度合计
// ==========================================
// 用途: 输出工作簿中的对比图数据
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyComparison {
    pub month: i32,
    pub original_total: f64,
    pub smoothed_total: i64,
}

// ==========================================
// ReconcileReport - 对账运行汇总
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcileReport {
    pub run_id: String,                 // 运行 ID（UUID）
    pub started_at: DateTime<Utc>,      // 开始时间
    pub elapsed_ms: i64,                // 耗时（毫秒）
    pub input_rows: usize,              // 源文件数据行数
    pub dropped_rows: usize,            // 缺失/非正数量被剔除的行数
    pub skipped_records: usize,         // CSV 中无法读取的记录数（预测 + 目标）
    pub forecast_lines: usize,          // 有效预测行数
    pub target_source: TargetSourceKind, // 目标计划来源
    pub target_entries: usize,          // 目标计划条目数
    pub skipped_target_rows: usize,     // 目标量缺失/无法解析的行数
    pub matched_keys: usize,            // 内连接命中的 (客户, 月份) 数
    pub unmatched_lines: usize,         // 无目标、按系数 1.0 透传的行数
    pub average_factor: f64,            // 系数表平均值
    pub original_total: f64,            // 平滑前总量
    pub smoothed_total: i64,            // 平滑后总量
    pub output_path: String,            // 输出文件路径
    pub chart_written: bool,            // 是否写入对比图
    pub used_csv_fallback: bool,        // 是否走了 CSV 兜底解析
    pub lowercased_headers: bool,       // 是否走了小写表头兜底
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_agree_across_entities() {
        let line = ForecastLine {
            article_id: "A1".to_string(),
            customer_id: "C1".to_string(),
            month: 3,
            quantity: 10.0,
        };
        let target = TargetEntry {
            customer_id: "C1".to_string(),
            month: 3,
            target_quantity: 12.0,
        };
        assert_eq!(line.key(), target.key());
    }

    #[test]
    fn test_smoothed_line_serializes_flat() {
        let line = SmoothedForecastLine {
            article_id: "A1".to_string(),
            customer_id: "C1".to_string(),
            month: 1,
            quantity: 100.0,
            factor: 1.5,
            smoothed_quantity: 150,
        };
        let value = serde_json::to_value(&line).unwrap();
        assert_eq!(value["smoothed_quantity"], 150);
        assert_eq!(value["factor"], 1.5);
    }
}
