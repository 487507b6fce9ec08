// ==========================================
// 标牌报价估算引擎 - 文件解析器实现
// ==========================================
// 支持: Excel (.xlsx/.xls) / CSV (.csv)
// 输出: 表头 + 原始行（单元格一律按字符串保留，类型转换由映射阶段负责）
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook_auto, Reader};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

/// 原始数据行
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    pub row_number: usize,              // 文件行号（表头为第 1 行）
    pub cells: HashMap<String, String>, // 表头 → 单元格文本
}

/// 原始工作表
#[derive(Debug, Clone, Default)]
pub struct RawSheet {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

// ==========================================
// FileParser Trait
// ==========================================
pub trait FileParser {
    fn parse_to_raw_sheet(&self, file_path: &Path) -> ImportResult<RawSheet>;
}

fn ensure_exists(path: &Path) -> ImportResult<()> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    Ok(())
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// 按表头组装一行；完全空白的行返回 None
fn build_row<I>(headers: &[String], row_number: usize, values: I) -> Option<RawRow>
where
    I: IntoIterator<Item = String>,
{
    let mut cells = HashMap::new();
    for (col_idx, value) in values.into_iter().enumerate() {
        if let Some(header) = headers.get(col_idx) {
            if header.is_empty() {
                continue;
            }
            cells.insert(header.clone(), value.trim().to_string());
        }
    }

    if cells.values().all(|v| v.is_empty()) {
        return None;
    }
    Some(RawRow { row_number, cells })
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_to_raw_sheet(&self, file_path: &Path) -> ImportResult<RawSheet> {
        ensure_exists(file_path)?;

        let ext = extension_of(file_path);
        if ext != "csv" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let file = File::open(file_path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().trim_start_matches('\u{feff}').to_string())
            .collect();

        let mut rows = Vec::new();
        for (row_idx, result) in reader.records().enumerate() {
            let record = result?;
            let values = record.iter().map(str::to_string);
            if let Some(row) = build_row(&headers, row_idx + 2, values) {
                rows.push(row);
            }
        }

        Ok(RawSheet { headers, rows })
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl FileParser for ExcelParser {
    fn parse_to_raw_sheet(&self, file_path: &Path) -> ImportResult<RawSheet> {
        ensure_exists(file_path)?;

        let ext = extension_of(file_path);
        if ext != "xlsx" && ext != "xls" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let mut workbook = open_workbook_auto(file_path)?;

        // 读取第一个 sheet
        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无工作表".to_string()))?;

        let range = workbook.worksheet_range(&sheet_name)?;

        let mut sheet_rows = range.rows();
        let header_row = sheet_rows
            .next()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无表头行".to_string()))?;

        let headers: Vec<String> = header_row
            .iter()
            .map(|cell| cell.to_string().trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for (row_idx, data_row) in sheet_rows.enumerate() {
            let values = data_row.iter().map(|cell| cell.to_string());
            if let Some(row) = build_row(&headers, row_idx + 2, values) {
                rows.push(row);
            }
        }

        Ok(RawSheet { headers, rows })
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl UniversalFileParser {
    pub fn parse<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<RawSheet> {
        let path = file_path.as_ref();
        match extension_of(path).as_str() {
            "csv" => CsvParser.parse_to_raw_sheet(path),
            "xlsx" | "xls" => ExcelParser.parse_to_raw_sheet(path),
            other => Err(ImportError::UnsupportedFormat(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    fn csv_file(lines: &[&str]) -> tempfile::NamedTempFile {
        let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        file
    }

    #[test]
    fn test_csv_parser_valid_file() {
        let file = csv_file(&["Sign Type,Width,Height,Qty", "A,6,8,12", "B,10,4,3"]);

        let sheet = CsvParser.parse_to_raw_sheet(file.path()).unwrap();

        assert_eq!(sheet.headers, vec!["Sign Type", "Width", "Height", "Qty"]);
        assert_eq!(sheet.rows.len(), 2);
        assert_eq!(sheet.rows[0].row_number, 2);
        assert_eq!(sheet.rows[0].cells.get("Width"), Some(&"6".to_string()));
    }

    #[test]
    fn test_csv_parser_file_not_found() {
        let result = CsvParser.parse_to_raw_sheet(Path::new("non_existent.csv"));
        assert!(matches!(result, Err(ImportError::FileNotFound(_))));
    }

    #[test]
    fn test_csv_parser_skip_empty_rows_keeps_row_numbers() {
        let file = csv_file(&["Sign Type,Qty", "A,2", ",", "B,3"]);

        let sheet = CsvParser.parse_to_raw_sheet(file.path()).unwrap();

        assert_eq!(sheet.rows.len(), 2);
        assert_eq!(sheet.rows[1].row_number, 4);
    }

    #[test]
    fn test_universal_parser_rejects_unknown_extension() {
        let file = Builder::new().suffix(".txt").tempfile().unwrap();
        let result = UniversalFileParser.parse(file.path());
        assert!(matches!(result, Err(ImportError::UnsupportedFormat(ext)) if ext == "txt"));
    }
}
