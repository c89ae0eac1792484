// ==========================================
// 预测对账系统 - 预测数据导入器
// ==========================================
// 流程: 解析 → 表结构校验 → 字段映射 → 主键规范化
// 第二预测期 (progmo2/prog_mg2) 两列都存在时追加到第一预测期之后
// ==========================================

use crate::config::ForecastColumns;
use crate::domain::forecast::ForecastLine;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::FieldMapper;
use crate::importer::file_parser::{ParsedSheet, UniversalFileParser};
use crate::importer::importer_trait::{FieldMapper as FieldMapperTrait, FileParser, LineColumns};
use crate::importer::key_normalizer::KeyNormalizer;
use crate::importer::schema::{ColumnResolution, SchemaValidator};
use std::path::Path;
use tracing::{debug, info, instrument, warn};

// ==========================================
// ForecastImport - 导入结果
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ForecastImport {
    pub lines: Vec<ForecastLine>,
    pub input_rows: usize,      // 源文件数据行数
    pub dropped_rows: usize,    // 被剔除的 (行, 预测期) 数
    pub second_horizon: bool,   // 是否追加了第二预测期
    pub skipped_records: usize, // CSV 中无法读取的记录数
    pub used_csv_fallback: bool,
    pub lowercased_headers: bool,
}

// ==========================================
// ForecastImporter
// ==========================================
pub struct ForecastImporter {
    file_parser: Box<dyn FileParser>,
    field_mapper: Box<dyn FieldMapperTrait>,
    normalizer: KeyNormalizer,
    validator: SchemaValidator,
}

impl Default for ForecastImporter {
    fn default() -> Self {
        Self::new(Box::new(UniversalFileParser), Box::new(FieldMapper))
    }
}

impl ForecastImporter {
    pub fn new(file_parser: Box<dyn FileParser>, field_mapper: Box<dyn FieldMapperTrait>) -> Self {
        Self {
            file_parser,
            field_mapper,
            normalizer: KeyNormalizer,
            validator: SchemaValidator,
        }
    }

    /// 从文件导入预测行
    #[instrument(skip(self, file_path, columns), fields(path = %file_path.as_ref().display()))]
    pub fn import<P: AsRef<Path>>(
        &self,
        file_path: P,
        columns: &ForecastColumns,
    ) -> ImportResult<ForecastImport> {
        // === 步骤 1: 解析文件 ===
        debug!("步骤 1: 解析文件");
        let sheet = self.file_parser.parse_sheet(file_path.as_ref())?;
        self.import_sheet(&sheet, columns)
    }

    /// 从已解析的表导入预测行
    pub fn import_sheet(
        &self,
        sheet: &ParsedSheet,
        columns: &ForecastColumns,
    ) -> ImportResult<ForecastImport> {
        // === 步骤 2: 表结构校验 ===
        debug!("步骤 2: 表结构校验");
        let mut resolution = self.validator.resolve(&sheet.headers, &columns.required())?;

        let second = self.resolve_second_horizon(sheet, columns, &mut resolution);

        // === 步骤 3: 字段映射 + 规范化 ===
        debug!("步骤 3: 字段映射");
        let mut horizons = vec![self.line_columns(
            &resolution,
            columns,
            &columns.month,
            &columns.quantity,
        )?];
        if let Some((month, quantity)) = &second {
            horizons.push(self.line_columns(&resolution, columns, month, quantity)?);
        }

        let mut lines = Vec::new();
        let mut dropped_rows = 0;
        for horizon in &horizons {
            for (idx, row) in sheet.rows.iter().enumerate() {
                let row_number = idx + 1;
                match self.field_mapper.map_forecast_record(row, horizon, row_number) {
                    Ok(Some(record)) => {
                        let key = self
                            .normalizer
                            .normalize_key(&record.customer_raw, &record.month_raw);
                        lines.push(ForecastLine {
                            article_id: record.article_id,
                            customer_id: key.customer_id,
                            month: key.month,
                            quantity: record.quantity,
                        });
                    }
                    Ok(None) => dropped_rows += 1,
                    Err(e) => {
                        warn!(row_number, error = %e, "字段映射失败,已剔除");
                        dropped_rows += 1;
                    }
                }
            }
        }

        if lines.is_empty() {
            return Err(ImportError::EmptyInput(
                "预测数据中没有月份与正数量齐全的行".to_string(),
            ));
        }

        info!(
            lines = lines.len(),
            dropped = dropped_rows,
            second_horizon = second.is_some(),
            "预测数据导入完成"
        );
        if let Some(first) = lines.first() {
            debug!(customer = %first.customer_id, "示例客户");
        }

        Ok(ForecastImport {
            lines,
            input_rows: sheet.row_count(),
            dropped_rows,
            second_horizon: second.is_some(),
            skipped_records: sheet.skipped_records,
            used_csv_fallback: sheet.used_fallback,
            lowercased_headers: resolution.lowercased,
        })
    }

    /// 第二预测期: 月份列与数量列都找到时才启用
    fn resolve_second_horizon(
        &self,
        sheet: &ParsedSheet,
        columns: &ForecastColumns,
        resolution: &mut ColumnResolution,
    ) -> Option<(String, String)> {
        let month = columns.second_month.as_ref()?;
        let quantity = columns.second_quantity.as_ref()?;

        let has_month = self
            .validator
            .resolve_optional(&sheet.headers, resolution, month);
        let has_quantity = self
            .validator
            .resolve_optional(&sheet.headers, resolution, quantity);

        if has_month && has_quantity {
            Some((month.clone(), quantity.clone()))
        } else {
            None
        }
    }

    fn line_columns<'a>(
        &self,
        resolution: &'a ColumnResolution,
        columns: &ForecastColumns,
        month: &str,
        quantity: &str,
    ) -> ImportResult<LineColumns<'a>> {
        let lookup = |name: &str| {
            resolution
                .actual(name)
                .ok_or_else(|| ImportError::MissingExpectedColumns {
                    missing: vec![name.to_string()],
                    available: Vec::new(),
                })
        };

        Ok(LineColumns {
            article: lookup(&columns.article)?,
            customer: lookup(&columns.customer)?,
            month: lookup(month)?,
            quantity: lookup(quantity)?,
        })
    }
}
