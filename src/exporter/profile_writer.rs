// ==========================================
// 预测对账系统 - 物料交付排名输出
// ==========================================
// .xlsx: Artikel（排名） + Fehlende Werte（缺失值统计）
// .csv: 仅排名
// ==========================================

use crate::domain::profile::{ArticleDelivery, ColumnMissingCount};
use crate::exporter::error::ExportResult;
use crate::exporter::format::{ensure_parent_dir, OutputFormat};
use crate::exporter::reconcile_writer::write_header;
use rust_xlsxwriter::{Format, Workbook};
use std::path::Path;
use tracing::info;

pub struct ArticleRankingWriter;

impl ArticleRankingWriter {
    pub fn write(
        &self,
        path: &Path,
        articles: &[ArticleDelivery],
        missing_counts: &[ColumnMissingCount],
    ) -> ExportResult<()> {
        let format = OutputFormat::from_path(path)?;
        ensure_parent_dir(path)?;

        match format {
            OutputFormat::Csv => {
                let mut writer = csv::Writer::from_path(path)?;
                for article in articles {
                    writer.serialize(article)?;
                }
                writer.flush()?;
            }
            OutputFormat::Xlsx => {
                let mut workbook = Workbook::new();
                let header = Format::new().set_bold();

                let sheet = workbook.add_worksheet().set_name("Artikel")?;
                write_header(
                    sheet,
                    &["article_id", "article_name", "delivered_quantity"],
                    &header,
                )?;
                for (idx, article) in articles.iter().enumerate() {
                    let row = idx as u32 + 1;
                    sheet.write_string(row, 0, &article.article_id)?;
                    sheet.write_string(row, 1, &article.article_name)?;
                    sheet.write_number(row, 2, article.delivered_quantity)?;
                }

                let sheet = workbook.add_worksheet().set_name("Fehlende Werte")?;
                write_header(sheet, &["column", "missing"], &header)?;
                for (idx, count) in missing_counts.iter().enumerate() {
                    let row = idx as u32 + 1;
                    sheet.write_string(row, 0, &count.column)?;
                    sheet.write_number(row, 1, count.missing as f64)?;
                }

                workbook.save(path)?;
            }
        }

        info!(path = %path.display(), articles = articles.len(), "物料交付排名已写出");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_csv_ranking() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ranking.csv");
        let articles = vec![ArticleDelivery {
            article_id: "A2".to_string(),
            article_name: "Rechen".to_string(),
            delivered_quantity: 40.0,
        }];

        ArticleRankingWriter.write(&path, &articles, &[]).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("article_id,article_name,delivered_quantity"));
        assert!(content.contains("A2,Rechen,40.0"));
    }
}
