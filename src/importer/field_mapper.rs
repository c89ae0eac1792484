// ==========================================
// 预测对账系统 - 字段映射器实现
// ==========================================
// 职责: 源字段 → RawForecastRecord + 数量类型转换
// 规则: 月份或数量缺失 → 剔除；数量 <= 0 → 剔除；数量非数值 → 错误
// ==========================================

use crate::domain::forecast::RawForecastRecord;
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::RawRow;
use crate::importer::importer_trait::{FieldMapper as FieldMapperTrait, LineColumns};

pub struct FieldMapper;

impl FieldMapperTrait for FieldMapper {
    fn map_forecast_record(
        &self,
        row: &RawRow,
        columns: &LineColumns<'_>,
        row_number: usize,
    ) -> ImportResult<Option<RawForecastRecord>> {
        let month_raw = match self.get_string(row, columns.month) {
            Some(value) => value,
            None => return Ok(None),
        };

        let quantity = match self.parse_f64(row, columns.quantity, row_number)? {
            Some(value) if value > 0.0 => value,
            _ => return Ok(None),
        };

        Ok(Some(RawForecastRecord {
            article_id: self.get_string(row, columns.article).unwrap_or_default(),
            customer_raw: self.get_string(row, columns.customer).unwrap_or_default(),
            month_raw,
            quantity,
            row_number,
        }))
    }
}

impl FieldMapper {
    /// 提取字符串字段（空白视为缺失）
    fn get_string(&self, row: &RawRow, key: &str) -> Option<String> {
        DataCleaner.normalize_null(row.get(key).map(String::as_str))
    }

    /// 解析浮点数
    fn parse_f64(&self, row: &RawRow, key: &str, row_number: usize) -> ImportResult<Option<f64>> {
        match self.get_string(row, key) {
            None => Ok(None),
            // 德式导出中的 `12,5` / `1.250` 同样接受
            Some(value) => DataCleaner
                .parse_german_number(&value)
                .map(Some)
                .ok_or_else(|| ImportError::TypeConversionError {
                    row: row_number,
                    field: key.to_string(),
                    message: format!("无法解析为浮点数: {}", value),
                }),
        }
    }
}
