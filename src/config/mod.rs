// ==========================================
// 预测对账系统 - 配置层
// ==========================================
// 职责: 显式配置结构,取代脚本中的全局路径常量
// 存储: JSON 配置文件 (缺省时使用内置默认值)
// ==========================================

pub mod app_config;
pub mod error;

// 重导出核心配置
pub use app_config::{
    AppConfig, ForecastColumns, ProfileConfig, ReconConfig, TargetSource, TrendConfig,
    TrendHorizon, DEFAULT_CONFIG_FILE,
};
pub use error::{ConfigError, ConfigResult};
