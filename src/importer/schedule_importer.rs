// ==========================================
// 标牌报价估算引擎 - 标牌清单导入器
// ==========================================
// 流程: 文件解析 → 表头归一 → 字段映射 → 报价行
// 规则: 单行类型转换失败时记录违规并跳过，不影响其它行
//       数量/尺寸的业务合法性留给计算引擎判定
// ==========================================

use crate::domain::estimate::EstimateLine;
use crate::domain::sign::SignSpec;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::{RawRow, RawSheet, UniversalFileParser};
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, instrument, warn};

// ===== 标准字段 =====
const FIELD_SIGN_TYPE: &str = "sign_type";
const FIELD_DESCRIPTION: &str = "description";
const FIELD_WIDTH: &str = "width";
const FIELD_HEIGHT: &str = "height";
const FIELD_DIAMETER: &str = "diameter";
const FIELD_QUANTITY: &str = "quantity";
const FIELD_WINDOWED: &str = "windowed";
const FIELD_WINDOW_HEIGHT: &str = "window_height";

/// 归一化表头 → 标准字段
fn canonical_field(header: &str) -> Option<&'static str> {
    let normalized = normalize_header(header);
    let field = match normalized.as_str() {
        "sign type" | "type" | "sign" | "类型" | "标牌类型" => FIELD_SIGN_TYPE,
        "description" | "desc" | "message" | "描述" | "说明" => FIELD_DESCRIPTION,
        "width" | "w" | "宽" | "宽度" => FIELD_WIDTH,
        "height" | "length" | "h" | "高" | "高度" => FIELD_HEIGHT,
        "diameter" | "dia" | "直径" => FIELD_DIAMETER,
        "qty" | "quantity" | "count" | "数量" => FIELD_QUANTITY,
        "windowed" | "window" | "视窗" => FIELD_WINDOWED,
        "window height" | "window h" | "视窗高" | "视窗高度" => FIELD_WINDOW_HEIGHT,
        _ => return None,
    };
    Some(field)
}

/// 表头归一: 小写、去括号单位、下划线/连字符视为空格
fn normalize_header(header: &str) -> String {
    let without_unit = match header.find(['(', '（']) {
        Some(idx) => &header[..idx],
        None => header,
    };
    without_unit
        .trim()
        .to_lowercase()
        .replace(['_', '-'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// 单行导入违规
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportViolation {
    pub row_number: usize,
    pub field: String,
    pub message: String,
}

/// 清单导入结果
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleImport {
    pub source: String,
    pub total_rows: usize,
    pub lines: Vec<EstimateLine>,
    pub violations: Vec<ImportViolation>,
}

// ==========================================
// ScheduleImporter - 标牌清单导入器
// ==========================================
#[derive(Default)]
pub struct ScheduleImporter {
    // 无状态导入器
}

impl ScheduleImporter {
    pub fn new() -> Self {
        Self {}
    }

    /// 从文件导入标牌清单
    #[instrument(skip_all, fields(path = %file_path.as_ref().display()))]
    pub fn import_file<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<ScheduleImport> {
        let path = file_path.as_ref();
        let sheet = UniversalFileParser.parse(path)?;
        self.import_sheet(&path.display().to_string(), sheet)
    }

    /// 从已解析的工作表导入
    pub fn import_sheet(&self, source: &str, sheet: RawSheet) -> ImportResult<ScheduleImport> {
        let columns = self.map_headers(&sheet.headers)?;

        let total_rows = sheet.rows.len();
        let mut lines = Vec::with_capacity(total_rows);
        let mut violations = Vec::new();

        for row in &sheet.rows {
            match self.map_row(row, &columns) {
                Ok(line) => lines.push(line),
                Err(ImportError::TypeConversionError { row, field, message }) => {
                    warn!(row, field = %field, message = %message, "清单行无法解析，已跳过");
                    violations.push(ImportViolation {
                        row_number: row,
                        field,
                        message,
                    });
                }
                Err(e) => return Err(e),
            }
        }

        info!(
            total_rows,
            imported = lines.len(),
            skipped = violations.len(),
            "标牌清单导入完成"
        );

        Ok(ScheduleImport {
            source: source.to_string(),
            total_rows,
            lines,
            violations,
        })
    }

    /// 表头映射（标准字段 → 原始表头），并检查必需列
    fn map_headers(&self, headers: &[String]) -> ImportResult<HashMap<&'static str, String>> {
        let mut columns = HashMap::new();
        for header in headers {
            if let Some(field) = canonical_field(header) {
                // 同一标准字段出现多列时取第一列
                columns.entry(field).or_insert_with(|| header.clone());
            }
        }

        for required in [FIELD_SIGN_TYPE, FIELD_QUANTITY] {
            if !columns.contains_key(required) {
                return Err(ImportError::MissingColumn(required.to_string()));
            }
        }
        let has_rect = columns.contains_key(FIELD_WIDTH) && columns.contains_key(FIELD_HEIGHT);
        if !has_rect && !columns.contains_key(FIELD_DIAMETER) {
            return Err(ImportError::MissingColumn(format!(
                "{}+{} 或 {}",
                FIELD_WIDTH, FIELD_HEIGHT, FIELD_DIAMETER
            )));
        }

        Ok(columns)
    }

    fn map_row(
        &self,
        row: &RawRow,
        columns: &HashMap<&'static str, String>,
    ) -> ImportResult<EstimateLine> {
        let get = |field: &'static str| cell(row, columns, field);
        let violation = |field: &'static str, message: String| ImportError::TypeConversionError {
            row: row.row_number,
            field: field.to_string(),
            message,
        };

        let sign_type = get(FIELD_SIGN_TYPE)
            .ok_or_else(|| violation(FIELD_SIGN_TYPE, "标牌类型为空".to_string()))?
            .to_string();

        let quantity_raw = get(FIELD_QUANTITY)
            .ok_or_else(|| violation(FIELD_QUANTITY, "数量为空".to_string()))?;
        let quantity = parse_quantity(quantity_raw)
            .ok_or_else(|| violation(FIELD_QUANTITY, format!("无法解析为整数: {}", quantity_raw)))?;

        let windowed = match get(FIELD_WINDOWED) {
            None => false,
            Some(raw) => parse_flag(raw)
                .ok_or_else(|| violation(FIELD_WINDOWED, format!("无法解析为是/否: {}", raw)))?,
        };

        let spec = match get(FIELD_DIAMETER) {
            Some(raw) => {
                let d = parse_inches(raw)
                    .ok_or_else(|| violation(FIELD_DIAMETER, format!("无法解析为尺寸: {}", raw)))?;
                SignSpec::round(d, quantity)
            }
            None => {
                let mut dims = [0.0; 2];
                for (slot, field) in dims.iter_mut().zip([FIELD_WIDTH, FIELD_HEIGHT]) {
                    let raw = get(field)
                        .ok_or_else(|| violation(field, "尺寸为空".to_string()))?;
                    *slot = parse_inches(raw)
                        .ok_or_else(|| violation(field, format!("无法解析为尺寸: {}", raw)))?;
                }
                SignSpec::new(dims[0], dims[1], quantity)
            }
        };

        // 填写视窗高度即视为带视窗
        let spec = match get(FIELD_WINDOW_HEIGHT) {
            Some(raw) => {
                let wh = parse_inches(raw).ok_or_else(|| {
                    violation(FIELD_WINDOW_HEIGHT, format!("无法解析为尺寸: {}", raw))
                })?;
                spec.with_window_height(wh)
            }
            None => spec.with_window(windowed),
        };

        Ok(EstimateLine {
            sign_type,
            description: get(FIELD_DESCRIPTION).map(str::to_string),
            spec,
        })
    }
}

/// 读取标准字段对应的非空单元格
fn cell<'a>(
    row: &'a RawRow,
    columns: &HashMap<&'static str, String>,
    field: &str,
) -> Option<&'a str> {
    columns
        .get(field)
        .and_then(|header| row.cells.get(header))
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
}

/// 解析英寸尺寸，允许 `6"`、`6 in`、`6in`
fn parse_inches(raw: &str) -> Option<f64> {
    let lower = raw.trim().to_lowercase();
    let number = lower
        .trim_end_matches('"')
        .trim_end_matches("in")
        .trim_end_matches('"')
        .trim();
    number.parse::<f64>().ok()
}

/// 解析数量，允许 `12.0` 形式的整数
fn parse_quantity(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if let Ok(v) = raw.parse::<i64>() {
        return Some(v);
    }
    let f = raw.parse::<f64>().ok()?;
    if f.is_finite() && f.fract() == 0.0 {
        Some(f as i64)
    } else {
        None
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "y" | "yes" | "true" | "1" | "x" | "是" => Some(true),
        "n" | "no" | "false" | "0" | "否" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(headers: &[&str], rows: &[&[&str]]) -> RawSheet {
        let headers: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
        let rows = rows
            .iter()
            .enumerate()
            .map(|(idx, values)| RawRow {
                row_number: idx + 2,
                cells: headers
                    .iter()
                    .cloned()
                    .zip(values.iter().map(|v| v.to_string()))
                    .collect(),
            })
            .collect();
        RawSheet { headers, rows }
    }

    #[test]
    fn test_header_normalization() {
        assert_eq!(canonical_field("Sign Type"), Some(FIELD_SIGN_TYPE));
        assert_eq!(canonical_field("sign_type"), Some(FIELD_SIGN_TYPE));
        assert_eq!(canonical_field("Width (in)"), Some(FIELD_WIDTH));
        assert_eq!(canonical_field("Length"), Some(FIELD_HEIGHT));
        assert_eq!(canonical_field("数量"), Some(FIELD_QUANTITY));
        assert_eq!(canonical_field("Window Height (in)"), Some(FIELD_WINDOW_HEIGHT));
        assert_eq!(canonical_field("Window"), Some(FIELD_WINDOWED));
        assert_eq!(canonical_field("Notes"), None);
    }

    #[test]
    fn test_import_rect_round_and_windowed() {
        let s = sheet(
            &["Type", "W", "Length", "Diameter", "QTY", "Window", "Description"],
            &[
                &["A", "6\"", "8 in", "", "12", "", "Room ID"],
                &["B", "", "", "10", "4.0", "yes", ""],
            ],
        );
        let result = ScheduleImporter::new().import_sheet("mem", s).unwrap();

        assert!(result.violations.is_empty());
        assert_eq!(result.lines.len(), 2);

        let a = &result.lines[0];
        assert_eq!(a.sign_type, "A");
        assert_eq!(a.spec, SignSpec::new(6.0, 8.0, 12));
        assert_eq!(a.description.as_deref(), Some("Room ID"));

        let b = &result.lines[1];
        assert_eq!(b.spec, SignSpec::round(10.0, 4).with_window(true));
        assert_eq!(b.description, None);
    }

    #[test]
    fn test_window_height_column() {
        let s = sheet(
            &["Type", "Width", "Height", "Qty", "Window Height"],
            &[
                &["A", "8", "10", "5", "2.5"],
                &["B", "8", "10", "5", ""],
                &["C", "8", "10", "5", "tall"],
            ],
        );
        let result = ScheduleImporter::new().import_sheet("mem", s).unwrap();

        assert_eq!(result.lines.len(), 2);
        assert_eq!(result.lines[0].spec, SignSpec::new(8.0, 10.0, 5).with_window_height(2.5));
        assert!(!result.lines[1].spec.windowed);
        assert_eq!(result.violations.len(), 1);
        assert_eq!(result.violations[0].field, FIELD_WINDOW_HEIGHT);
        assert_eq!(result.violations[0].row_number, 4);
    }

    #[test]
    fn test_map_row_reports_type_conversion() {
        let s = sheet(&["Type", "Width", "Height", "Qty"], &[&["A", "6", "6", "many"]]);
        let importer = ScheduleImporter::new();
        let columns = importer.map_headers(&s.headers).unwrap();
        let err = importer.map_row(&s.rows[0], &columns).unwrap_err();
        assert!(matches!(
            err,
            ImportError::TypeConversionError { row: 2, ref field, .. } if field == FIELD_QUANTITY
        ));
        assert!(err.to_string().contains("many"));
    }

    #[test]
    fn test_bad_rows_reported_and_skipped() {
        let s = sheet(
            &["类型", "宽", "高", "数量"],
            &[
                &["A", "6", "6", "10"],
                &["B", "six", "6", "10"],
                &["C", "6", "6", "2.5"],
                &["", "6", "6", "1"],
                &["E", "6", "6", "0"],
            ],
        );
        let result = ScheduleImporter::new().import_sheet("mem", s).unwrap();

        assert_eq!(result.total_rows, 5);
        // 数量 0 交给引擎判定
        let types: Vec<&str> = result.lines.iter().map(|l| l.sign_type.as_str()).collect();
        assert_eq!(types, vec!["A", "E"]);

        assert_eq!(result.violations.len(), 3);
        assert_eq!(result.violations[0].row_number, 3);
        assert_eq!(result.violations[0].field, FIELD_WIDTH);
        assert_eq!(result.violations[1].field, FIELD_QUANTITY);
        assert_eq!(result.violations[2].field, FIELD_SIGN_TYPE);
    }

    #[test]
    fn test_missing_required_columns() {
        let s = sheet(&["Type", "Width", "Height"], &[]);
        assert!(matches!(
            ScheduleImporter::new().import_sheet("mem", s),
            Err(ImportError::MissingColumn(c)) if c == FIELD_QUANTITY
        ));

        let s = sheet(&["Type", "Width", "Qty"], &[]);
        assert!(matches!(
            ScheduleImporter::new().import_sheet("mem", s),
            Err(ImportError::MissingColumn(_))
        ));
    }

    #[test]
    fn test_parse_helpers() {
        assert_eq!(parse_inches("12\""), Some(12.0));
        assert_eq!(parse_inches("7.5in"), Some(7.5));
        assert_eq!(parse_inches("abc"), None);
        assert_eq!(parse_quantity("3"), Some(3));
        assert_eq!(parse_quantity("-2"), Some(-2));
        assert_eq!(parse_quantity("1.5"), None);
        assert_eq!(parse_flag("Y"), Some(true));
        assert_eq!(parse_flag("maybe"), None);
    }
}
