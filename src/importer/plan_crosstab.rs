// ==========================================
// 预测对账系统 - 销售计划交叉表导入器
// ==========================================
// 格式: 首列为客户,其余表头为 "<年份> <月份缩写>"（德文缩写）
//       或双行表头: 第一行年份（合并单元格）, 第二行月份缩写
// 跳过: 表头含 Ergebnis / Baureihe / Unnamed 或无法解析为期间的列
// 数值: 德式格式（`.` 千位分隔, `,` 小数点）
// ==========================================

use crate::domain::trend::PlanPoint;
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::{ParsedSheet, UniversalFileParser};
use crate::importer::importer_trait::FileParser;
use crate::importer::key_normalizer::KeyNormalizer;
use chrono::NaiveDate;
use std::path::Path;
use tracing::{debug, info, instrument};

/// 非数据列的表头标记
const SKIPPED_HEADER_MARKERS: [&str; 3] = ["Ergebnis", "Baureihe", "Unnamed"];

#[derive(Debug, Clone, Default)]
pub struct PlanImport {
    pub points: Vec<PlanPoint>,
    pub period_columns: usize,
    pub skipped_columns: Vec<String>,
}

pub struct PlanCrosstabImporter {
    file_parser: Box<dyn FileParser>,
}

impl Default for PlanCrosstabImporter {
    fn default() -> Self {
        Self::new(Box::new(UniversalFileParser))
    }
}

impl PlanCrosstabImporter {
    pub fn new(file_parser: Box<dyn FileParser>) -> Self {
        Self { file_parser }
    }

    #[instrument(skip(self, file_path), fields(path = %file_path.as_ref().display()))]
    pub fn import<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<PlanImport> {
        let sheet = self.file_parser.parse_sheet(file_path.as_ref())?;
        self.import_sheet(&sheet)
    }

    /// 将交叉表展开为长表 (客户, 期间, 计划额)
    pub fn import_sheet(&self, sheet: &ParsedSheet) -> ImportResult<PlanImport> {
        let customer_column = sheet.headers.first().ok_or_else(|| {
            ImportError::MissingExpectedColumns {
                missing: vec!["<客户列>".to_string()],
                available: Vec::new(),
            }
        })?;

        // 单行表头优先; 无期间列时按双行表头 (年份行 + 月份行) 解析
        let (period_columns, skipped_columns, data_start) = match single_row_periods(sheet) {
            (periods, skipped) if !periods.is_empty() => (periods, skipped, 0),
            (_, single_skipped) => match two_row_periods(sheet) {
                (periods, skipped) if !periods.is_empty() => (periods, skipped, 1),
                _ => {
                    debug!(skipped = ?single_skipped, "未识别到期间列");
                    return Err(ImportError::MissingExpectedColumns {
                        missing: vec!["<年份 月份> 期间列".to_string()],
                        available: sheet.headers.clone(),
                    });
                }
            },
        };
        debug!(
            periods = period_columns.len(),
            skipped = ?skipped_columns,
            two_row_header = data_start == 1,
            "交叉表期间列识别完成"
        );

        let mut points = Vec::new();
        for row in sheet.rows.iter().skip(data_start) {
            let customer_raw = row.get(customer_column).map(String::as_str).unwrap_or("");
            let customer = KeyNormalizer.normalize_customer(customer_raw);
            // 空客户行与合计行不参与对比
            if customer.is_empty() || customer.contains("ERGEBNIS") {
                continue;
            }

            for (header, period) in &period_columns {
                let revenue = row
                    .get(*header)
                    .and_then(|v| DataCleaner.parse_german_number(v));
                if let Some(revenue) = revenue {
                    points.push(PlanPoint {
                        customer: customer.clone(),
                        period: *period,
                        revenue,
                    });
                }
            }
        }

        if points.is_empty() {
            return Err(ImportError::EmptyInput("销售计划中没有有效数值".to_string()));
        }

        info!(
            points = points.len(),
            period_columns = period_columns.len(),
            skipped_columns = skipped_columns.len(),
            "销售计划已展开"
        );
        Ok(PlanImport {
            points,
            period_columns: period_columns.len(),
            skipped_columns,
        })
    }
}

/// 期间列 (表头, 期间) 与被跳过的表头
type PeriodColumns<'a> = (Vec<(&'a str, NaiveDate)>, Vec<String>);

/// 单行表头: 每列表头即 "<年份> <月份>"
fn single_row_periods(sheet: &ParsedSheet) -> PeriodColumns<'_> {
    let mut periods = Vec::new();
    let mut skipped = Vec::new();
    for header in sheet.headers.iter().skip(1) {
        let marked = SKIPPED_HEADER_MARKERS.iter().any(|m| header.contains(m));
        match parse_period_label(header) {
            Some(period) if !marked => periods.push((header.as_str(), period)),
            _ => skipped.push(header.clone()),
        }
    }
    (periods, skipped)
}

/// 双行表头: 表头行为年份（合并单元格向右延续）, 首个数据行为月份缩写
fn two_row_periods(sheet: &ParsedSheet) -> PeriodColumns<'_> {
    let mut periods = Vec::new();
    let mut skipped = Vec::new();
    let month_row = match sheet.rows.first() {
        Some(row) => row,
        None => return (periods, skipped),
    };

    let mut year: Option<i32> = None;
    for header in sheet.headers.iter().skip(1) {
        let trimmed = header.trim();
        if let Some(y) = parse_year(trimmed) {
            year = Some(y);
        } else if !trimmed.starts_with("Unnamed") {
            // 合计 / Baureihe 等非年份表头结束当前年份分组
            year = None;
        }

        let month_cell = month_row.get(header).map(String::as_str).unwrap_or("");
        let marked = header.contains("Ergebnis")
            || header.contains("Baureihe")
            || month_cell.contains("Ergebnis");
        let period = match (year, german_month(month_cell)) {
            (Some(y), Some(m)) if !marked => NaiveDate::from_ymd_opt(y, m, 1),
            _ => None,
        };
        match period {
            Some(period) => periods.push((header.as_str(), period)),
            None => skipped.push(header.clone()),
        }
    }
    (periods, skipped)
}

/// 四位年份; Excel 数值单元格可能读为 "2025.0"
fn parse_year(value: &str) -> Option<i32> {
    let digits = value.strip_suffix(".0").unwrap_or(value);
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// 解析 "<年份><分隔符><月份缩写>" 或 "<月份缩写><分隔符><年份>"
///
/// 分隔符: 空格 / `-` / `/` / `_` / `.`
pub fn parse_period_label(label: &str) -> Option<NaiveDate> {
    let parts: Vec<&str> = label
        .split(|c: char| c.is_whitespace() || matches!(c, '-' | '/' | '_' | '.'))
        .filter(|p| !p.is_empty())
        .collect();

    let (year, month) = match parts.as_slice() {
        [a, b] => match (a.parse::<i32>(), b.parse::<i32>()) {
            (Ok(year), Err(_)) => (year, german_month(b)?),
            (Err(_), Ok(year)) => (year, german_month(a)?),
            _ => return None,
        },
        _ => return None,
    };

    if !(1000..=9999).contains(&year) {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// 德文月份缩写 → 月份数字
pub fn german_month(abbr: &str) -> Option<u32> {
    let month = match abbr.trim().to_uppercase().as_str() {
        "JAN" => 1,
        "FEB" => 2,
        "MAR" | "MÄR" | "MRZ" => 3,
        "APR" => 4,
        "MAI" => 5,
        "JUN" => 6,
        "JUL" => 7,
        "AUG" => 8,
        "SEP" => 9,
        "OKT" => 10,
        "NOV" => 11,
        "DEZ" => 12,
        _ => return None,
    };
    Some(month)
}
