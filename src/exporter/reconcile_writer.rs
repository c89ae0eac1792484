// ==========================================
// 预测对账系统 - 对账结果输出
// ==========================================
// 输出列: article_id / customer_id / month / quantity / factor / smoothed_quantity
// .xlsx: 第二个工作表为月度对比 + 折线图（原始 vs 平滑）
// .csv: 仅明细,无图表
// ==========================================

use crate::domain::forecast::{MonthlyComparison, SmoothedForecastLine};
use crate::exporter::error::ExportResult;
use crate::exporter::format::{ensure_parent_dir, OutputFormat};
use rust_xlsxwriter::{Chart, ChartType, Format, Workbook, Worksheet, XlsxError};
use std::path::Path;
use tracing::{info, warn};

pub const RESULT_SHEET: &str = "Forecast";
pub const MONTHLY_SHEET: &str = "Monatsvergleich";

const RESULT_HEADERS: [&str; 6] = [
    "article_id",
    "customer_id",
    "month",
    "quantity",
    "factor",
    "smoothed_quantity",
];

pub struct ReconciliationWriter {
    write_chart: bool,
}

impl ReconciliationWriter {
    pub fn new(write_chart: bool) -> Self {
        Self { write_chart }
    }

    /// 写出对账结果,返回是否写入了图表
    pub fn write(
        &self,
        path: &Path,
        lines: &[SmoothedForecastLine],
        monthly: &[MonthlyComparison],
    ) -> ExportResult<bool> {
        let format = OutputFormat::from_path(path)?;
        ensure_parent_dir(path)?;

        let chart_written = match format {
            OutputFormat::Csv => {
                self.write_csv(path, lines)?;
                false
            }
            OutputFormat::Xlsx => self.write_xlsx(path, lines, monthly)?,
        };

        info!(path = %path.display(), rows = lines.len(), chart_written, "对账结果已写出");
        Ok(chart_written)
    }

    fn write_csv(&self, path: &Path, lines: &[SmoothedForecastLine]) -> ExportResult<()> {
        let mut writer = csv::Writer::from_path(path)?;
        if lines.is_empty() {
            writer.write_record(RESULT_HEADERS)?;
        }
        for line in lines {
            writer.serialize(line)?;
        }
        writer.flush()?;
        Ok(())
    }

    fn write_xlsx(
        &self,
        path: &Path,
        lines: &[SmoothedForecastLine],
        monthly: &[MonthlyComparison],
    ) -> ExportResult<bool> {
        let mut workbook = Workbook::new();
        let header = Format::new().set_bold();

        let sheet = workbook.add_worksheet().set_name(RESULT_SHEET)?;
        write_header(sheet, &RESULT_HEADERS, &header)?;
        for (idx, line) in lines.iter().enumerate() {
            let row = idx as u32 + 1;
            sheet.write_string(row, 0, &line.article_id)?;
            sheet.write_string(row, 1, &line.customer_id)?;
            sheet.write_number(row, 2, line.month)?;
            sheet.write_number(row, 3, line.quantity)?;
            sheet.write_number(row, 4, line.factor)?;
            sheet.write_number(row, 5, line.smoothed_quantity as f64)?;
        }

        let sheet = workbook.add_worksheet().set_name(MONTHLY_SHEET)?;
        write_header(sheet, &["month", "original_total", "smoothed_total"], &header)?;
        for (idx, entry) in monthly.iter().enumerate() {
            let row = idx as u32 + 1;
            sheet.write_number(row, 0, entry.month)?;
            sheet.write_number(row, 1, entry.original_total)?;
            sheet.write_number(row, 2, entry.smoothed_total as f64)?;
        }

        let mut chart_written = false;
        if self.write_chart && !monthly.is_empty() {
            match insert_monthly_chart(sheet, monthly.len() as u32) {
                Ok(()) => chart_written = true,
                Err(e) => warn!(error = %e, "月度对比图生成失败,已跳过"),
            }
        }

        workbook.save(path)?;
        Ok(chart_written)
    }
}

fn insert_monthly_chart(sheet: &mut Worksheet, last_row: u32) -> Result<(), XlsxError> {
    let mut chart = Chart::new(ChartType::Line);
    chart
        .add_series()
        .set_categories((MONTHLY_SHEET, 1, 0, last_row, 0))
        .set_values((MONTHLY_SHEET, 1, 1, last_row, 1))
        .set_name("Original");
    chart
        .add_series()
        .set_categories((MONTHLY_SHEET, 1, 0, last_row, 0))
        .set_values((MONTHLY_SHEET, 1, 2, last_row, 2))
        .set_name("Geglättet");
    chart.title().set_name("Prognose vor und nach Glättung");
    chart.x_axis().set_name("Monat");
    chart.y_axis().set_name("Menge");

    sheet.insert_chart(1, 4, &chart)?;
    Ok(())
}

pub(crate) fn write_header(
    sheet: &mut Worksheet,
    headers: &[&str],
    format: &Format,
) -> Result<(), XlsxError> {
    for (col, name) in headers.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *name, format)?;
    }
    Ok(())
}
