// ==========================================
// 预测对账系统 - 趋势偏差工作簿输出
// ==========================================
// 工作表: Trends（对比明细） / Ranking（偏差排名） / Diagramme（重点客户折线图）
// 图表失败只告警,不影响工作簿写出
// ==========================================

use crate::domain::trend::{CustomerDeviation, TrendPoint};
use crate::exporter::error::ExportResult;
use crate::exporter::format::ensure_parent_dir;
use crate::exporter::reconcile_writer::write_header;
use rust_xlsxwriter::{Chart, ChartType, Format, Workbook, Worksheet, XlsxError};
use std::path::Path;
use tracing::{info, warn};

const TRENDS_SHEET: &str = "Trends";
const RANKING_SHEET: &str = "Ranking";
const CHARTS_SHEET: &str = "Diagramme";

/// 两张图之间的行距
const CHART_ROW_SPACING: u32 = 20;

pub struct TrendWorkbookWriter;

impl TrendWorkbookWriter {
    /// 写出趋势工作簿,返回成功插入的图表数
    ///
    /// `points` 须按 (客户, 期间) 排序
    pub fn write(
        &self,
        path: &Path,
        points: &[TrendPoint],
        ranking: &[CustomerDeviation],
        top_n: usize,
    ) -> ExportResult<usize> {
        ensure_parent_dir(path)?;

        let mut workbook = Workbook::new();
        let header = Format::new().set_bold();

        let sheet = workbook.add_worksheet().set_name(TRENDS_SHEET)?;
        write_header(
            sheet,
            &[
                "Baumarkt",
                "Periode",
                "Prognose_Menge",
                "Plan_Umsatz",
                "Trend_Prognose",
                "Trend_Plan",
                "Abweichung",
            ],
            &header,
        )?;
        for (idx, point) in points.iter().enumerate() {
            let row = idx as u32 + 1;
            sheet.write_string(row, 0, &point.customer)?;
            sheet.write_string(row, 1, point.period.format("%Y-%m").to_string())?;
            sheet.write_number(row, 2, point.quantity)?;
            sheet.write_number(row, 3, point.revenue)?;
            sheet.write_number(row, 4, point.prognosis_trend)?;
            sheet.write_number(row, 5, point.plan_trend)?;
            sheet.write_number(row, 6, point.deviation)?;
        }

        let sheet = workbook.add_worksheet().set_name(RANKING_SHEET)?;
        write_header(
            sheet,
            &["Rang", "Baumarkt", "Mittlere_Abweichung", "Auffaellig"],
            &header,
        )?;
        for (idx, entry) in ranking.iter().enumerate() {
            let row = idx as u32 + 1;
            sheet.write_number(row, 0, row)?;
            sheet.write_string(row, 1, &entry.customer)?;
            sheet.write_number(row, 2, entry.mean_abs_deviation)?;
            if idx < top_n {
                sheet.write_string(row, 3, "ja")?;
            }
        }

        let sheet = workbook.add_worksheet().set_name(CHARTS_SHEET)?;
        let mut charts_written = 0;
        for (slot, entry) in ranking.iter().take(top_n).enumerate() {
            let Some((first, last)) = customer_rows(points, &entry.customer) else {
                continue;
            };
            let top_row = slot as u32 * CHART_ROW_SPACING;
            match insert_customer_chart(sheet, top_row, &entry.customer, first, last) {
                Ok(()) => charts_written += 1,
                Err(e) => warn!(customer = %entry.customer, error = %e, "趋势图生成失败,已跳过"),
            }
        }

        workbook.save(path)?;
        info!(
            path = %path.display(),
            points = points.len(),
            charts = charts_written,
            "趋势工作簿已写出"
        );
        Ok(charts_written)
    }
}

/// 客户在 Trends 表中的首末数据行（工作表行号,含表头偏移）
fn customer_rows(points: &[TrendPoint], customer: &str) -> Option<(u32, u32)> {
    let first = points.iter().position(|p| p.customer == customer)?;
    let count = points[first..]
        .iter()
        .take_while(|p| p.customer == customer)
        .count();
    Some((first as u32 + 1, (first + count) as u32))
}

fn insert_customer_chart(
    sheet: &mut Worksheet,
    row: u32,
    customer: &str,
    first: u32,
    last: u32,
) -> Result<(), XlsxError> {
    let mut chart = Chart::new(ChartType::Line);
    chart
        .add_series()
        .set_categories((TRENDS_SHEET, first, 1, last, 1))
        .set_values((TRENDS_SHEET, first, 4, last, 4))
        .set_name("Prognose (normiert)");
    chart
        .add_series()
        .set_categories((TRENDS_SHEET, first, 1, last, 1))
        .set_values((TRENDS_SHEET, first, 5, last, 5))
        .set_name("Plan (normiert)");
    chart
        .title()
        .set_name(format!("Trendvergleich {}", customer).as_str());
    chart.x_axis().set_name("Periode");
    chart.y_axis().set_name("Trend [0-1]");

    sheet.insert_chart(row, 0, &chart)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn point(customer: &str, month: u32, deviation: f64) -> TrendPoint {
        TrendPoint {
            customer: customer.to_string(),
            period: NaiveDate::from_ymd_opt(2025, month, 1).unwrap(),
            quantity: 1.0,
            revenue: 1.0,
            prognosis_trend: deviation.max(0.0),
            plan_trend: (-deviation).max(0.0),
            deviation,
        }
    }

    #[test]
    fn test_customer_rows() {
        let points = vec![point("A", 1, 0.0), point("B", 1, 0.5), point("B", 2, -0.5)];

        assert_eq!(customer_rows(&points, "A"), Some((1, 1)));
        assert_eq!(customer_rows(&points, "B"), Some((2, 3)));
        assert_eq!(customer_rows(&points, "C"), None);
    }

    #[test]
    fn test_write_charts_only_for_top_customers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Abweichungsanalyse_Trends_prog1.xlsx");
        let points = vec![
            point("A", 1, 0.0),
            point("A", 2, 0.0),
            point("B", 1, 1.0),
            point("B", 2, -1.0),
        ];
        let ranking = vec![
            CustomerDeviation {
                customer: "B".to_string(),
                mean_abs_deviation: 1.0,
            },
            CustomerDeviation {
                customer: "A".to_string(),
                mean_abs_deviation: 0.0,
            },
        ];

        let charts = TrendWorkbookWriter.write(&path, &points, &ranking, 1).unwrap();

        assert_eq!(charts, 1);
        assert!(path.exists());
    }
}
