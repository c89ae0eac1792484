// ==========================================
// 预测对账系统 - 配置层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use std::path::PathBuf;
use thiserror::Error;

/// 配置层错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败 ({}): {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("配置文件解析失败 ({}): {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("配置值无效: {0}")]
    Invalid(String),
}

/// Result 类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
