// ==========================================
// 标牌清单导入集成测试
// ==========================================
// 测试目标: 文件解析 → 表头别名 → 报价行；坏行记录并跳过
// ==========================================


use sign_estimating::domain::SignSpec;
use sign_estimating::importer::{ImportError, ScheduleImporter};
use test_helpers::{sample_schedule_csv, write_schedule_csv};

#[test]
fn test_import_sample_schedule() {
    let file = sample_schedule_csv().expect("Failed to write csv");

    let result = ScheduleImporter::new()
        .import_file(file.path())
        .expect("import should succeed");

    assert_eq!(result.total_rows, 6);
    assert_eq!(result.lines.len(), 5);
    assert_eq!(result.violations.len(), 1);

    let violation = &result.violations[0];
    assert_eq!(violation.row_number, 7);
    assert_eq!(violation.field, "width");

    let c = &result.lines[2];
    assert_eq!(c.sign_type, "C");
    assert_eq!(c.description.as_deref(), Some("Directory"));
    assert_eq!(c.spec, SignSpec::new(12.0, 12.0, 4).with_window(true));

    let d = &result.lines[3];
    assert_eq!(d.spec, SignSpec::round(10.0, 6));

    // 数量 0 的行照常导入，由引擎拒绝
    assert_eq!(result.lines[4].spec.quantity, 0);
}

#[test]
fn test_import_chinese_headers() {
    let file = write_schedule_csv(&["类型,宽,高,数量", "RID-1,8,2,30", "SN-1,6,9,4"])
        .expect("Failed to write csv");

    let result = ScheduleImporter::new().import_file(file.path()).unwrap();

    assert!(result.violations.is_empty());
    assert_eq!(result.lines[0].sign_type, "RID-1");
    assert_eq!(result.lines[0].spec, SignSpec::new(8.0, 2.0, 30));
    assert_eq!(result.lines[1].spec, SignSpec::new(6.0, 9.0, 4));
}

#[test]
fn test_missing_quantity_column() {
    let file = write_schedule_csv(&["Sign Type,Width,Height", "A,6,6"]).unwrap();
    let err = ScheduleImporter::new().import_file(file.path()).unwrap_err();
    assert!(matches!(err, ImportError::MissingColumn(_)));
}

#[test]
fn test_missing_file_and_unknown_format() {
    let err = ScheduleImporter::new()
        .import_file("/definitely/not/here.csv")
        .unwrap_err();
    assert!(matches!(err, ImportError::FileNotFound(_)));

    let file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
    let err = ScheduleImporter::new().import_file(file.path()).unwrap_err();
    assert!(matches!(err, ImportError::UnsupportedFormat(_)));
}

#[test]
fn test_header_only_file() {
    let file = write_schedule_csv(&["Type,Width,Length,Qty"]).unwrap();
    let result = ScheduleImporter::new().import_file(file.path()).unwrap();
    assert_eq!(result.total_rows, 0);
    assert!(result.lines.is_empty());
}
