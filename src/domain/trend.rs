// ==========================================
// 预测对账系统 - 趋势偏差领域模型
// ==========================================
// 职责: 件数预测与销售计划(欧元)两条不同量纲序列的趋势对比
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// PrognosisPoint - 按 (客户, 期间) 汇总的件数预测
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrognosisPoint {
    pub customer: String,
    pub period: NaiveDate, // 期间首日 (YYYY-MM-01)
    pub quantity: f64,
}

// ==========================================
// PlanPoint - 销售计划(交叉表展开后)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanPoint {
    pub customer: String,
    pub period: NaiveDate,
    pub revenue: f64,
}

// ==========================================
// TrendPoint - 归一化后的对比点
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub customer: String,
    pub period: NaiveDate,
    pub quantity: f64,
    pub revenue: f64,
    pub prognosis_trend: f64, // [0, 1]
    pub plan_trend: f64,      // [0, 1]
    pub deviation: f64,       // prognosis_trend - plan_trend
}

// ==========================================
// CustomerDeviation - 客户平均绝对偏差
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerDeviation {
    pub customer: String,
    pub mean_abs_deviation: f64,
}

// ==========================================
// TrendReport - 单个预测期的分析汇总
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendReport {
    pub run_id: String,
    pub suffix: String,               // 输出文件后缀 (如 _prog1)
    pub prognosis_points: usize,      // 汇总后的预测点数
    pub skipped_periods: usize,       // 期间无法解析而跳过的行数
    pub plan_period_columns: usize,   // 销售计划中识别出的期间列数
    pub plan_skipped_columns: Vec<String>, // 销售计划中跳过的列（合计 / Baureihe 等）
    pub compared_points: usize,       // 内连接后的对比点数
    pub customers: usize,             // 参与对比的客户数
    pub flagged: Vec<CustomerDeviation>, // 偏差最大的前 N 个客户
    pub output_path: String,
    pub charts_written: usize,
}
