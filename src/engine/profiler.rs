// ==========================================
// 预测对账系统 - 数据概况引擎
// ==========================================
// 职责: 缺失值统计 / 剔除无物料名称的行 / 物料交付量排名
// ==========================================

use crate::domain::profile::{ArticleDelivery, ColumnMissingCount};
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::file_parser::{ParsedSheet, RawRow};
use std::collections::BTreeMap;

pub struct DataProfiler;

impl DataProfiler {
    /// 按表头顺序统计每列空单元格数
    pub fn missing_counts(&self, sheet: &ParsedSheet) -> Vec<ColumnMissingCount> {
        sheet
            .headers
            .iter()
            .map(|column| ColumnMissingCount {
                column: column.clone(),
                missing: sheet
                    .rows
                    .iter()
                    .filter(|row| is_blank(row, column))
                    .count(),
            })
            .collect()
    }

    /// 剔除必填列为空的行,返回 (保留的行, 剔除行数)
    pub fn drop_missing<'a>(
        &self,
        sheet: &'a ParsedSheet,
        column: &str,
    ) -> (Vec<&'a RawRow>, usize) {
        let kept: Vec<&RawRow> = sheet
            .rows
            .iter()
            .filter(|row| !is_blank(row, column))
            .collect();
        let dropped = sheet.rows.len() - kept.len();
        (kept, dropped)
    }

    /// 按 (物料号, 物料名称) 汇总交付量,降序排列（并列按物料号）
    ///
    /// 无法解析的交付量按 0 计
    pub fn article_ranking(
        &self,
        rows: &[&RawRow],
        article_column: &str,
        name_column: &str,
        delivered_column: &str,
    ) -> Vec<ArticleDelivery> {
        let mut totals: BTreeMap<(String, String), f64> = BTreeMap::new();
        for row in rows {
            let key = (cell(row, article_column), cell(row, name_column));
            let delivered = row
                .get(delivered_column)
                .and_then(|v| DataCleaner.parse_german_number(v))
                .unwrap_or(0.0);
            *totals.entry(key).or_insert(0.0) += delivered;
        }

        let mut ranking: Vec<ArticleDelivery> = totals
            .into_iter()
            .map(|((article_id, article_name), delivered_quantity)| ArticleDelivery {
                article_id,
                article_name,
                delivered_quantity,
            })
            .collect();

        ranking.sort_by(|a, b| {
            b.delivered_quantity
                .total_cmp(&a.delivered_quantity)
                .then_with(|| a.article_id.cmp(&b.article_id))
        });
        ranking
    }
}

fn is_blank(row: &RawRow, column: &str) -> bool {
    row.get(column).map_or(true, |v| v.trim().is_empty())
}

fn cell(row: &RawRow, column: &str) -> String {
    row.get(column).map(|v| v.trim().to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet() -> ParsedSheet {
        let headers: Vec<String> = ["matnr", "Baumarktartikel", "bedmo_mg"]
            .iter()
            .map(|h| h.to_string())
            .collect();
        let data: [[&str; 3]; 5] = [
            ["A1", "Spaten", "10"],
            ["A2", "Rechen", "40"],
            ["A1", "Spaten", "25"],
            ["A3", "", "99"],
            ["A4", "Eimer", "n/a"],
        ];
        let rows = data
            .iter()
            .map(|values| {
                headers
                    .iter()
                    .cloned()
                    .zip(values.iter().map(|v| v.to_string()))
                    .collect::<RawRow>()
            })
            .collect();
        ParsedSheet {
            headers,
            rows,
            ..ParsedSheet::default()
        }
    }

    #[test]
    fn test_missing_counts_in_header_order() {
        let counts = DataProfiler.missing_counts(&sheet());

        assert_eq!(counts.len(), 3);
        assert_eq!(counts[0].column, "matnr");
        assert_eq!(counts[0].missing, 0);
        assert_eq!(counts[1].column, "Baumarktartikel");
        assert_eq!(counts[1].missing, 1);
    }

    #[test]
    fn test_article_ranking() {
        let sheet = sheet();
        let (rows, dropped) = DataProfiler.drop_missing(&sheet, "Baumarktartikel");
        assert_eq!(dropped, 1);

        let ranking =
            DataProfiler.article_ranking(&rows, "matnr", "Baumarktartikel", "bedmo_mg");

        assert_eq!(ranking.len(), 3);
        assert_eq!(ranking[0].article_id, "A2");
        assert_eq!(ranking[0].delivered_quantity, 40.0);
        assert_eq!(ranking[1].article_id, "A1");
        assert_eq!(ranking[1].delivered_quantity, 35.0);
        assert_eq!(ranking[2].article_name, "Eimer");
        assert_eq!(ranking[2].delivered_quantity, 0.0);
    }
}
