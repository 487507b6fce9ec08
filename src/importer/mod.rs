// ==========================================
// 标牌报价估算引擎 - 导入层
// ==========================================
// 职责: 标牌清单（Excel / CSV）→ 报价行
// ==========================================

// 模块声明
pub mod error;
pub mod file_parser;
pub mod schedule_importer;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use file_parser::{CsvParser, ExcelParser, FileParser, RawRow, RawSheet, UniversalFileParser};
pub use schedule_importer::{ImportViolation, ScheduleImport, ScheduleImporter};
