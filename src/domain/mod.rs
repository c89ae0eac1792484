// ==========================================
// 预测对账系统 - 领域模型层
// ==========================================
// 职责: 定义预测行、目标计划、派生结果等领域实体
// 红线: 不含文件读写逻辑,不含引擎逻辑
// ==========================================

pub mod forecast;
pub mod profile;
pub mod trend;
pub mod types;

// 重导出核心类型
pub use forecast::{
    AggregatedActual, ForecastLine, MonthlyComparison, RawForecastRecord, ReconcileReport,
    ReconciliationFactor, SmoothedForecastLine, TargetEntry,
};
pub use profile::{ArticleDelivery, ColumnMissingCount, ProfileReport};
pub use trend::{CustomerDeviation, PlanPoint, PrognosisPoint, TrendPoint, TrendReport};
pub use types::{ForecastKey, TargetSourceKind};
