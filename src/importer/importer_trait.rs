// ==========================================
// 预测对账系统 - 导入接口 Trait
// ==========================================
// 职责: 定义导入管道各阶段接口（不包含实现）
// ==========================================

use crate::domain::forecast::RawForecastRecord;
use crate::importer::error::ImportResult;
use crate::importer::file_parser::{ParsedSheet, RawRow};
use std::path::Path;

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文件解析接口（阶段 0）
// 实现者: ExcelParser, CsvParser, UniversalFileParser
pub trait FileParser: Send + Sync {
    /// 解析文件为表头 + 原始行记录（HashMap<列名, 值>）
    ///
    /// # 返回
    /// - Ok(ParsedSheet): 表头（保持源顺序）与行记录
    /// - Err: 文件缺失、格式错误
    fn parse_sheet(&self, file_path: &Path) -> ImportResult<ParsedSheet>;
}

// ==========================================
// FieldMapper Trait
// ==========================================
// 用途: 字段映射接口（阶段 1）
// 实现者: FieldMapper
pub trait FieldMapper: Send + Sync {
    /// 将原始行记录映射为 RawForecastRecord
    ///
    /// # 参数
    /// - row: 原始行记录
    /// - columns: 已解析的实际列名
    /// - row_number: 行号（从 1 开始,用于诊断）
    ///
    /// # 返回
    /// - Ok(Some): 月份与数量齐全且数量 > 0
    /// - Ok(None): 月份/数量缺失或数量 <= 0,按规则剔除
    /// - Err: 数量无法解析
    fn map_forecast_record(
        &self,
        row: &RawRow,
        columns: &LineColumns<'_>,
        row_number: usize,
    ) -> ImportResult<Option<RawForecastRecord>>;
}

/// 单个预测期使用的实际列名
#[derive(Debug, Clone, Copy)]
pub struct LineColumns<'a> {
    pub article: &'a str,
    pub customer: &'a str,
    pub month: &'a str,
    pub quantity: &'a str,
}
