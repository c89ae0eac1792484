// ==========================================
// 预测对账系统 - 目标计划导入器
// ==========================================
// 职责: 读取外部目标计划 (客户, 月份, 目标量)
// 红线: 主键规范化规则与预测侧完全一致
// ==========================================

use crate::domain::forecast::TargetEntry;
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::{ParsedSheet, UniversalFileParser};
use crate::importer::importer_trait::FileParser;
use crate::importer::key_normalizer::KeyNormalizer;
use crate::importer::schema::SchemaValidator;
use std::path::Path;
use tracing::{info, instrument, warn};

/// 目标计划表列名
#[derive(Debug, Clone, Copy)]
pub struct TargetColumns<'a> {
    pub customer: &'a str,
    pub month: &'a str,
    pub target: &'a str,
}

#[derive(Debug, Clone, Default)]
pub struct TargetImport {
    pub entries: Vec<TargetEntry>,
    pub skipped_rows: usize, // 目标量缺失/无法解析的行数
    pub skipped_records: usize, // CSV 中无法读取的记录数
    pub used_csv_fallback: bool,
    pub lowercased_headers: bool,
}

pub struct TargetImporter {
    file_parser: Box<dyn FileParser>,
}

impl Default for TargetImporter {
    fn default() -> Self {
        Self::new(Box::new(UniversalFileParser))
    }
}

impl TargetImporter {
    pub fn new(file_parser: Box<dyn FileParser>) -> Self {
        Self { file_parser }
    }

    #[instrument(skip(self, file_path, columns), fields(path = %file_path.as_ref().display()))]
    pub fn import<P: AsRef<Path>>(
        &self,
        file_path: P,
        columns: TargetColumns<'_>,
    ) -> ImportResult<TargetImport> {
        let sheet = self.file_parser.parse_sheet(file_path.as_ref())?;
        self.import_sheet(&sheet, columns)
    }

    pub fn import_sheet(
        &self,
        sheet: &ParsedSheet,
        columns: TargetColumns<'_>,
    ) -> ImportResult<TargetImport> {
        let required = vec![
            columns.customer.to_string(),
            columns.month.to_string(),
            columns.target.to_string(),
        ];
        let resolution = SchemaValidator.resolve(&sheet.headers, &required)?;

        let mut entries = Vec::new();
        let mut skipped_rows = 0;
        for (idx, row) in sheet.rows.iter().enumerate() {
            let target = resolution
                .value(row, columns.target)
                .and_then(|v| DataCleaner.parse_german_number(v));

            let target_quantity = match target {
                Some(value) => value,
                None => {
                    warn!(row_number = idx + 1, "目标量缺失或无法解析,已跳过");
                    skipped_rows += 1;
                    continue;
                }
            };

            let key = KeyNormalizer.normalize_key(
                resolution.value(row, columns.customer).unwrap_or(""),
                resolution.value(row, columns.month).unwrap_or(""),
            );
            entries.push(TargetEntry {
                customer_id: key.customer_id,
                month: key.month,
                target_quantity,
            });
        }

        if entries.is_empty() {
            return Err(ImportError::EmptyInput("目标计划中没有有效条目".to_string()));
        }

        info!(entries = entries.len(), skipped = skipped_rows, "目标计划导入完成");

        Ok(TargetImport {
            entries,
            skipped_rows,
            skipped_records: sheet.skipped_records,
            used_csv_fallback: sheet.used_fallback,
            lowercased_headers: resolution.lowercased,
        })
    }
}
