// ==========================================
// 预测对账系统 - 导出层
// ==========================================
// 职责: 将计算结果写出为 .xlsx（含原生图表）或 .csv
// 红线: 写出前自动创建输出目录；格式由扩展名决定
// ==========================================

pub mod error;
pub mod format;
pub mod profile_writer;
pub mod reconcile_writer;
pub mod trend_writer;

pub use error::{ExportError, ExportResult};
pub use format::{ensure_parent_dir, OutputFormat};
pub use profile_writer::ArticleRankingWriter;
pub use reconcile_writer::{ReconciliationWriter, MONTHLY_SHEET, RESULT_SHEET};
pub use trend_writer::TrendWorkbookWriter;
