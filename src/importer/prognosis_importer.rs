// ==========================================
// 预测对账系统 - 件数预测导入器（趋势分析用）
// ==========================================
// 职责: 从原始导出表抽取 (客户, 期间 YYYYMM, 预测件数)
// 规则: 期间无法解析为年月的行跳过并计数；数量缺失按 0 计
// ==========================================

use crate::config::TrendHorizon;
use crate::domain::trend::PrognosisPoint;
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::error::ImportResult;
use crate::importer::file_parser::ParsedSheet;
use crate::importer::key_normalizer::KeyNormalizer;
use crate::importer::schema::SchemaValidator;
use chrono::NaiveDate;
use tracing::{debug, warn};

#[derive(Debug, Clone, Default)]
pub struct PrognosisImport {
    pub rows: Vec<PrognosisPoint>, // 未汇总的行级数据
    pub skipped_periods: usize,
}

pub struct PrognosisImporter;

impl PrognosisImporter {
    pub fn extract(
        &self,
        sheet: &ParsedSheet,
        customer_column: &str,
        horizon: &TrendHorizon,
    ) -> ImportResult<PrognosisImport> {
        let required = vec![
            customer_column.to_string(),
            horizon.period_column.clone(),
            horizon.quantity_column.clone(),
        ];
        let resolution = SchemaValidator.resolve(&sheet.headers, &required)?;

        let mut rows = Vec::new();
        let mut skipped_periods = 0;
        for row in &sheet.rows {
            let period = resolution
                .value(row, &horizon.period_column)
                .and_then(parse_year_month);
            let period = match period {
                Some(p) => p,
                None => {
                    skipped_periods += 1;
                    continue;
                }
            };

            let quantity = resolution
                .value(row, &horizon.quantity_column)
                .and_then(|v| DataCleaner.parse_german_number(v))
                .unwrap_or(0.0);

            rows.push(PrognosisPoint {
                customer: KeyNormalizer
                    .normalize_customer(resolution.value(row, customer_column).unwrap_or("")),
                period,
                quantity,
            });
        }

        if skipped_periods > 0 {
            warn!(
                skipped = skipped_periods,
                column = %horizon.period_column,
                "期间无法解析为 YYYYMM 的行已跳过"
            );
        }
        debug!(rows = rows.len(), suffix = %horizon.suffix, "预测期数据抽取完成");

        Ok(PrognosisImport {
            rows,
            skipped_periods,
        })
    }
}

/// `YYYYMM`（允许工作簿数值带 `.0`）→ 当月首日
pub fn parse_year_month(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    let digits = trimmed.strip_suffix(".0").unwrap_or(trimmed);
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let number = KeyNormalizer.normalize_month(digits);
    NaiveDate::from_ymd_opt(number / 100, (number % 100) as u32, 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importer::file_parser::RawRow;

    fn horizon() -> TrendHorizon {
        TrendHorizon {
            period_column: "progmo".to_string(),
            quantity_column: "prog_mg1".to_string(),
            suffix: "_prog1".to_string(),
        }
    }

    fn row(values: &[(&str, &str)]) -> RawRow {
        values
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_parse_year_month() {
        assert_eq!(parse_year_month("202501"), NaiveDate::from_ymd_opt(2025, 1, 1));
        assert_eq!(parse_year_month("202512.0"), NaiveDate::from_ymd_opt(2025, 12, 1));
        assert_eq!(parse_year_month("202513"), None);
        assert_eq!(parse_year_month("2025-01"), None);
        assert_eq!(parse_year_month("1"), None);
    }

    #[test]
    fn test_extract_skips_bad_periods() {
        let sheet = ParsedSheet {
            headers: vec![
                "Baumarkt".to_string(),
                "progmo".to_string(),
                "prog_mg1".to_string(),
            ],
            rows: vec![
                row(&[("Baumarkt", "obi"), ("progmo", "202501"), ("prog_mg1", "10")]),
                row(&[("Baumarkt", "obi"), ("progmo", ""), ("prog_mg1", "10")]),
                row(&[("Baumarkt", "obi"), ("progmo", "202502"), ("prog_mg1", "")]),
            ],
            ..ParsedSheet::default()
        };

        let result = PrognosisImporter
            .extract(&sheet, "Baumarkt", &horizon())
            .unwrap();

        assert_eq!(result.rows.len(), 2);
        assert_eq!(result.skipped_periods, 1);
        assert_eq!(result.rows[0].customer, "OBI");
        assert_eq!(result.rows[1].quantity, 0.0);
    }
}
