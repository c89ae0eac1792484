// ==========================================
// 预测对账系统 - 核心库
// ==========================================
// 职责: 自下而上的物料级预测对齐到 (客户, 月份) 目标计划
// 附带: 趋势偏差分析 / 原始数据概况
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 导入层 - 外部表格
pub mod importer;

// 引擎层 - 计算规则
pub mod engine;

// 导出层 - 工作簿 / CSV
pub mod exporter;

// 配置层
pub mod config;

// 日志系统
pub mod logging;

// API 层 - 流程编排
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

pub use domain::{
    ForecastKey, ForecastLine, ReconcileReport, ReconciliationFactor, SmoothedForecastLine,
    TargetEntry, TrendReport,
};

pub use engine::{compute_factor, Aggregator, FactorCalculator, Smoother, TargetSimulator};

pub use api::{ApiError, ApiResult, ProfileApi, ReconcileApi, TrendApi};

pub use config::AppConfig;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "Prognoseabgleich";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
