// ==========================================
// 预测对账系统 - 数据概况领域模型
// ==========================================
// 职责: 原始导出表的缺失值统计与物料交付排名
// ==========================================

use serde::{Deserialize, Serialize};

/// 单列缺失值计数
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMissingCount {
    pub column: String,
    pub missing: usize,
}

/// 按 (物料号, 物料名称) 汇总的实际交付量
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleDelivery {
    pub article_id: String,
    pub article_name: String,
    pub delivered_quantity: f64,
}

// ==========================================
// ProfileReport - 概况运行汇总
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileReport {
    pub run_id: String,
    pub input_rows: usize,
    pub rows_without_name: usize, // 缺少物料名称而被剔除的行数
    pub missing_counts: Vec<ColumnMissingCount>,
    pub articles: usize,
    pub output_path: String,
}
