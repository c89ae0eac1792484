// ==========================================
// 预测对账系统 - 文件解析器实现
// ==========================================
// 阶段 0: 文件读取与解析
// 支持: Excel (.xlsx/.xlsm/.xls/.xlsb/.ods) / CSV (.csv/.txt)
// 兜底: 工作簿解析失败时按 CSV 再试一次（自动识别分隔符）
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use crate::importer::importer_trait::FileParser;
use calamine::{open_workbook_auto, Reader};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info, warn};

/// 原始行记录（列名 → 去空白后的单元格文本）
pub type RawRow = HashMap<String, String>;

// ==========================================
// ParsedSheet - 解析结果
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ParsedSheet {
    pub headers: Vec<String>,  // 表头（保持源顺序）
    pub rows: Vec<RawRow>,     // 数据行（已跳过全空行）
    pub used_fallback: bool,   // 是否经 CSV 兜底解析
    pub skipped_records: usize, // CSV 中无法读取而跳过的记录数
}

impl ParsedSheet {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_sheet(&self, file_path: &Path) -> ImportResult<ParsedSheet> {
        let path = file_path;

        // 检查文件存在
        if !path.exists() {
            return Err(ImportError::MissingFile(path.display().to_string()));
        }

        let delimiter = sniff_delimiter(path)?;
        debug!(delimiter = %(delimiter as char).escape_default(), "CSV 分隔符识别完成");

        // 打开 CSV 文件
        let file = File::open(path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .delimiter(delimiter)
            .from_reader(file);

        // 读取表头（非 UTF-8 字节按有损方式转换）
        let raw_headers: Vec<String> = reader
            .byte_headers()?
            .iter()
            .map(|h| {
                String::from_utf8_lossy(h)
                    .trim_start_matches('\u{feff}')
                    .trim()
                    .to_string()
            })
            .collect();

        if raw_headers.iter().all(|h| h.is_empty()) {
            return Err(ImportError::CsvParseError("CSV 文件无表头".to_string()));
        }
        let headers = normalize_headers(raw_headers);

        // 读取所有行,坏行跳过
        let mut rows = Vec::new();
        let mut skipped_records = 0;
        for (row_idx, result) in reader.byte_records().enumerate() {
            let record = match result {
                Ok(record) => record,
                Err(e) => {
                    warn!(row = row_idx + 2, error = %e, "CSV 记录无法读取,已跳过");
                    skipped_records += 1;
                    continue;
                }
            };

            let mut row_map = HashMap::new();
            for (col_idx, value) in record.iter().enumerate() {
                if let Some(header) = headers.get(col_idx) {
                    row_map.insert(
                        header.clone(),
                        String::from_utf8_lossy(value).trim().to_string(),
                    );
                }
            }

            // 跳过完全空白的行
            if row_map.values().all(|v| v.is_empty()) {
                continue;
            }

            rows.push(row_map);
        }

        Ok(ParsedSheet {
            headers,
            rows,
            used_fallback: false,
            skipped_records,
        })
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl FileParser for ExcelParser {
    fn parse_sheet(&self, file_path: &Path) -> ImportResult<ParsedSheet> {
        let path = file_path;

        // 检查文件存在
        if !path.exists() {
            return Err(ImportError::MissingFile(path.display().to_string()));
        }

        // 打开工作簿（按扩展名/内容自动识别 xlsx/xls/xlsb/ods）
        let mut workbook = open_workbook_auto(path)?;

        // 读取第一个 sheet
        let sheet_names = workbook.sheet_names();
        let sheet_name = sheet_names
            .first()
            .cloned()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无工作表".to_string()))?;

        let range = workbook.worksheet_range(&sheet_name)?;

        // 提取表头（第一行）
        let mut rows = range.rows();
        let header_row = rows
            .next()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无数据行".to_string()))?;

        let headers = normalize_headers(
            header_row
                .iter()
                .map(|cell| cell.to_string().trim().to_string())
                .collect(),
        );

        // 读取数据行
        let mut records = Vec::new();
        for data_row in rows {
            let mut row_map = HashMap::new();

            for (col_idx, cell) in data_row.iter().enumerate() {
                if let Some(header) = headers.get(col_idx) {
                    row_map.insert(header.clone(), cell.to_string().trim().to_string());
                }
            }

            // 跳过完全空白的行
            if row_map.values().all(|v| v.is_empty()) {
                continue;
            }

            records.push(row_map);
        }

        Ok(ParsedSheet {
            headers,
            rows: records,
            used_fallback: false,
            skipped_records: 0,
        })
    }
}

// ==========================================
// 通用文件解析器（工作簿优先,CSV 兜底）
// ==========================================
pub struct UniversalFileParser;

impl UniversalFileParser {
    pub fn parse<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<ParsedSheet> {
        self.parse_sheet(file_path.as_ref())
    }
}

impl FileParser for UniversalFileParser {
    fn parse_sheet(&self, file_path: &Path) -> ImportResult<ParsedSheet> {
        let path = file_path;

        if !path.exists() {
            return Err(ImportError::MissingFile(path.display().to_string()));
        }

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        // 明确的文本格式直接按 CSV 解析
        if ext == "csv" || ext == "txt" {
            let sheet = CsvParser.parse_sheet(path)?;
            info!(rows = sheet.row_count(), path = %path.display(), "CSV 已加载");
            return Ok(sheet);
        }

        let primary = match ExcelParser.parse_sheet(path) {
            Ok(sheet) => {
                info!(rows = sheet.row_count(), path = %path.display(), "Excel 已加载");
                return Ok(sheet);
            }
            Err(e) => e,
        };

        warn!(path = %path.display(), error = %primary, "工作簿解析失败,尝试 CSV 兜底");

        match CsvParser.parse_sheet(path) {
            Ok(mut sheet) => {
                sheet.used_fallback = true;
                info!(rows = sheet.row_count(), path = %path.display(), "CSV 兜底已加载");
                Ok(sheet)
            }
            Err(fallback) => Err(ImportError::UnreadableFormat {
                path: path.display().to_string(),
                primary: primary.to_string(),
                fallback: fallback.to_string(),
            }),
        }
    }
}

// ==========================================
// 辅助函数
// ==========================================

/// 根据首行出现次数识别分隔符（`,` `;` 制表符 `|`,并列时取靠前者）
fn sniff_delimiter(path: &Path) -> ImportResult<u8> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut first_line = Vec::new();
    reader.read_until(b'\n', &mut first_line)?;

    if first_line.contains(&0) {
        return Err(ImportError::CsvParseError("文件包含二进制内容".to_string()));
    }

    let candidates = [b',', b';', b'\t', b'|'];
    let mut best = b',';
    let mut best_count = 0;
    for candidate in candidates {
        let count = first_line.iter().filter(|&&b| b == candidate).count();
        if count > best_count {
            best = candidate;
            best_count = count;
        }
    }
    Ok(best)
}

/// 空表头命名为 `Unnamed: N`,重复表头追加 `.1`、`.2` 后缀
fn normalize_headers(raw: Vec<String>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    raw.into_iter()
        .enumerate()
        .map(|(idx, header)| {
            let base = if header.is_empty() {
                format!("Unnamed: {}", idx)
            } else {
                header
            };
            let count = seen.entry(base.clone()).or_insert(0);
            let name = if *count == 0 {
                base
            } else {
                format!("{}.{}", base, count)
            };
            *count += 1;
            name
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{Builder, NamedTempFile};

    fn csv_file(content: &str) -> NamedTempFile {
        let mut temp_file = Builder::new().suffix(".csv").tempfile().unwrap();
        write!(temp_file, "{}", content).unwrap();
        temp_file
    }

    #[test]
    fn test_csv_parser_valid_file() {
        let temp_file =
            csv_file("matnr,werk,progmo,prog_mg1\nA1,42.0,202501,100\nA2,abc,202502,50\n");

        let sheet = CsvParser.parse_sheet(temp_file.path()).unwrap();

        assert_eq!(sheet.headers, vec!["matnr", "werk", "progmo", "prog_mg1"]);
        assert_eq!(sheet.rows.len(), 2);
        assert_eq!(sheet.rows[0].get("werk"), Some(&"42.0".to_string()));
        assert_eq!(sheet.rows[1].get("prog_mg1"), Some(&"50".to_string()));
    }

    #[test]
    fn test_csv_parser_semicolon_delimiter() {
        let temp_file = csv_file("matnr;werk;progmo;prog_mg1\nA1;W1;3;12,5\n");

        let sheet = CsvParser.parse_sheet(temp_file.path()).unwrap();

        assert_eq!(sheet.headers.len(), 4);
        assert_eq!(sheet.rows[0].get("prog_mg1"), Some(&"12,5".to_string()));
    }

    #[test]
    fn test_csv_parser_file_not_found() {
        let result = CsvParser.parse_sheet(Path::new("non_existent.csv"));
        assert!(matches!(result, Err(ImportError::MissingFile(_))));
    }

    #[test]
    fn test_csv_parser_skip_empty_rows() {
        let temp_file = csv_file("matnr,menge\nA1,2.5\n,\nA2,3.0\n");

        let sheet = CsvParser.parse_sheet(temp_file.path()).unwrap();

        // 应跳过空行
        assert_eq!(sheet.rows.len(), 2);
    }

    #[test]
    fn test_universal_parser_falls_back_to_csv() {
        // 扩展名声称是工作簿,实际内容是 CSV
        let mut temp_file = Builder::new().suffix(".xlsx").tempfile().unwrap();
        write!(temp_file, "matnr,werk\nA1,W1\n").unwrap();

        let sheet = UniversalFileParser.parse(temp_file.path()).unwrap();

        assert!(sheet.used_fallback);
        assert_eq!(sheet.rows.len(), 1);
    }

    #[test]
    fn test_universal_parser_reports_both_failures() {
        let mut temp_file = Builder::new().suffix(".xlsx").tempfile().unwrap();
        temp_file.write_all(&[0x50, 0x4b, 0x00, 0x01, 0x02]).unwrap();

        let result = UniversalFileParser.parse(temp_file.path());

        assert!(matches!(result, Err(ImportError::UnreadableFormat { .. })));
    }

    #[test]
    fn test_universal_parser_missing_file() {
        let result = UniversalFileParser.parse("no_such_file.xlsx");
        assert!(matches!(result, Err(ImportError::MissingFile(_))));
    }

    #[test]
    fn test_normalize_headers_blank_and_duplicates() {
        let headers = normalize_headers(vec![
            "Baumarkt".to_string(),
            "".to_string(),
            "Baumarkt".to_string(),
        ]);
        assert_eq!(headers, vec!["Baumarkt", "Unnamed: 1", "Baumarkt.1"]);
    }
}
