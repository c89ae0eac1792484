// ==========================================
// 预测对账系统 - 导入层
// ==========================================
// 职责: 外部表格导入,生成规范化的领域数据
// 支持: Excel (工作簿优先), CSV (兜底)
// ==========================================

// 模块声明
pub mod data_cleaner;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod forecast_importer;
pub mod importer_trait;
pub mod key_normalizer;
pub mod plan_crosstab;
pub mod prognosis_importer;
pub mod schema;
pub mod target_importer;

// 重导出核心类型
pub use data_cleaner::DataCleaner;
pub use error::{ImportError, ImportResult};
pub use field_mapper::FieldMapper as FieldMapperImpl;
pub use file_parser::{CsvParser, ExcelParser, ParsedSheet, RawRow, UniversalFileParser};
pub use forecast_importer::{ForecastImport, ForecastImporter};
pub use key_normalizer::KeyNormalizer;
pub use plan_crosstab::{PlanCrosstabImporter, PlanImport};
pub use prognosis_importer::{PrognosisImport, PrognosisImporter};
pub use schema::{ColumnResolution, SchemaValidator};
pub use target_importer::{TargetColumns, TargetImport, TargetImporter};

// 重导出 Trait 接口
pub use importer_trait::{FieldMapper, FileParser, LineColumns};
