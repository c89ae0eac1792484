// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 在临时目录中生成 CSV / 工作簿测试文件,回读输出结果
// ==========================================

#![allow(dead_code)]

use forecast_recon::domain::SmoothedForecastLine;
use rust_xlsxwriter::Workbook;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

/// 写出文本文件（按行拼接）
pub fn write_lines(dir: &Path, name: &str, lines: &[&str]) -> PathBuf {
    let path = dir.join(name);
    let mut content = lines.join("\n");
    content.push('\n');
    fs::write(&path, content).expect("写入测试文件失败");
    path
}

/// 写出单工作表工作簿
///
/// 可解析为数值的单元格按数值写入,与真实导出表一致
pub fn write_xlsx(dir: &Path, name: &str, headers: &[&str], rows: &[&[&str]]) -> PathBuf {
    let path = dir.join(name);
    build_xlsx(&path, headers, rows).expect("写入测试工作簿失败");
    path
}

fn build_xlsx(path: &Path, headers: &[&str], rows: &[&[&str]]) -> Result<(), Box<dyn Error>> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    for (col, header) in headers.iter().enumerate() {
        sheet.write_string(0, col as u16, *header)?;
    }
    for (idx, values) in rows.iter().enumerate() {
        let row = idx as u32 + 1;
        for (col, value) in values.iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            match value.parse::<f64>() {
                Ok(number) => sheet.write_number(row, col as u16, number)?,
                Err(_) => sheet.write_string(row, col as u16, *value)?,
            };
        }
    }

    workbook.save(path)?;
    Ok(())
}

/// 回读 CSV 对账结果
pub fn read_result_csv(path: &Path) -> Vec<SmoothedForecastLine> {
    let mut reader = csv::Reader::from_path(path).expect("打开结果文件失败");
    reader
        .deserialize()
        .collect::<Result<Vec<SmoothedForecastLine>, _>>()
        .expect("结果文件格式错误")
}

/// 工作簿中的工作表名称
pub fn sheet_names(path: &Path) -> Vec<String> {
    use calamine::{open_workbook_auto, Reader};
    let workbook = open_workbook_auto(path).expect("打开工作簿失败");
    workbook.sheet_names().to_vec()
}
