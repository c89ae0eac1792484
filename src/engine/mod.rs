// ==========================================
// 预测对账系统 - 引擎层
// ==========================================
// 职责: 无状态的计算规则（汇总 / 系数 / 平滑 / 趋势 / 概况）
// 红线: 引擎不读写文件,输入输出均为领域对象
// ==========================================

pub mod aggregator;
pub mod factor;
pub mod profiler;
pub mod simulation;
pub mod smoother;
pub mod summary;
pub mod trend;

// 重导出核心引擎
pub use aggregator::Aggregator;
pub use factor::{compute_factor, FactorCalculator};
pub use profiler::DataProfiler;
pub use simulation::TargetSimulator;
pub use smoother::{smooth_quantity, SmoothResult, Smoother};
pub use summary::MonthlySummary;
pub use trend::{min_max_scale, TrendAnalyzer};
