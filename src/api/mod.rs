// ==========================================
// 预测对账系统 - API 层
// ==========================================
// 职责: 编排导入 → 引擎 → 导出,供命令行入口调用
// ==========================================

pub mod error;
pub mod profile_api;
pub mod reconcile_api;
pub mod trend_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use profile_api::ProfileApi;
pub use reconcile_api::ReconcileApi;
pub use trend_api::{TrendApi, TREND_FILE_PREFIX};
