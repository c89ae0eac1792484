// ==========================================
// 预测对账系统 - API层错误类型
// ==========================================
// 职责: 汇总各层错误,对外提供统一的 Result 类型
// ==========================================

use crate::config::ConfigError;
use crate::exporter::ExportError;
use crate::importer::ImportError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    #[error("导入失败: {0}")]
    Import(#[from] ImportError),

    #[error("导出失败: {0}")]
    Export(#[from] ExportError),

    /// 预测与目标计划没有任何共同的 (客户, 月份) 键
    #[error("内连接结果为空: 预测侧 {forecast_keys} 个键, 目标侧 {target_keys} 个键, 无共同键")]
    EmptyJoinResult {
        forecast_keys: usize,
        target_keys: usize,
    },
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_carry_context() {
        let err = ApiError::EmptyJoinResult {
            forecast_keys: 3,
            target_keys: 2,
        };
        assert!(err.to_string().contains("预测侧 3"));

        let err: ApiError = ImportError::MissingFile("final.xlsx".to_string()).into();
        assert!(matches!(err, ApiError::Import(ImportError::MissingFile(_))));
        assert!(err.to_string().contains("final.xlsx"));
    }
}
