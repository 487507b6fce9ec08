// ==========================================
// ConfigManager 集成测试
// ==========================================
// 测试目标: 参数目录读取、命名方案持久化、快照导出/恢复
// ==========================================


use sign_estimating::config::{
    config_keys, ConfigError, ConfigManager, PricingCatalog, PricingProfile, GLOBAL_PROFILE_ID,
};
use sign_estimating::domain::{LaborBasis, LaborRatePair, PressSheetConfig, SignSpec};
use test_helpers::{create_test_db, insert_test_config, open_test_connection};

#[tokio::test]
async fn test_config_manager_creation() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");

    let config_manager = ConfigManager::new(&db_path);
    assert!(
        config_manager.is_ok(),
        "ConfigManager should be created successfully"
    );
}

#[tokio::test]
async fn test_creates_schema_on_fresh_file() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path = dir.path().join("catalog.db");

    let manager = ConfigManager::new(db_path.to_str().unwrap()).expect("Failed to create ConfigManager");
    let press = manager.get_press_sheet_config().await.unwrap();
    assert_eq!(press, PressSheetConfig::default());
}

#[tokio::test]
async fn test_scalar_config_overrides() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let conn = open_test_connection(&db_path).expect("Failed to open db");
    insert_test_config(&conn).expect("Failed to insert test config");

    let manager = ConfigManager::new(&db_path).expect("Failed to create ConfigManager");

    let press = manager.get_press_sheet_config().await.unwrap();
    assert_eq!(press.width_in, 12.0);
    assert_eq!(press.height_in, 18.0);
    assert_eq!(press.molds_per_master_sheet, 20);
    assert_eq!(press.master_width_in, 49.0);

    let rates = manager.get_material_rates().await.unwrap();
    assert_eq!(rates.base_sheet.per_sheet(press.master_area_sqin()), 300.0);

    let curve = manager.get_pricing_curve().await.unwrap();
    assert_eq!(curve.min_margin_multiplier, 1.5);
    assert_eq!(curve.reference_price, 55.0);
}

#[tokio::test]
async fn test_bad_scalar_falls_back_to_default() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let manager = ConfigManager::new(&db_path).expect("Failed to create ConfigManager");

    manager.set_config_value(config_keys::FLOOR_PRICE, "cheap").unwrap();
    manager.set_config_value(config_keys::LABOR_BASIS, "sometimes").unwrap();

    let curve = manager.get_pricing_curve().await.unwrap();
    assert_eq!(curve.floor_price, 35.0);
    let labor = manager.get_labor_rates().await.unwrap();
    assert_eq!(labor.basis, LaborBasis::Standard);
}

#[tokio::test]
async fn test_global_profile_resolution_and_compute() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let conn = open_test_connection(&db_path).expect("Failed to open db");
    insert_test_config(&conn).expect("Failed to insert test config");
    let manager = ConfigManager::new(&db_path).expect("Failed to create ConfigManager");

    let profile = manager.resolve_profile(None).await.unwrap();
    assert_eq!(profile.profile_id, GLOBAL_PROFILE_ID);

    // 12×18 压板: 6×6 排 2×3 = 6 块
    let result = profile.compute(&SignSpec::new(6.0, 6.0, 50)).unwrap();
    assert_eq!(result.batch.signs_per_mold, 6);
    assert!((result.usage.sheets_needed - 9.0 / 20.0).abs() < 1e-12);
}

#[tokio::test]
async fn test_named_profile_persists_across_reopen() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");

    let mut profile = PricingProfile {
        profile_id: "gc-markup".to_string(),
        title: "GC 加价".to_string(),
        description: Some("管理费 15%，加价 2.4".to_string()),
        ..PricingProfile::default()
    };
    profile.labor.overhead_pct = 15.0;
    profile.labor.rate_pair = Some(LaborRatePair::default());
    profile.labor.basis = LaborBasis::BestCase;
    profile.curve.min_margin_multiplier = 2.4;

    {
        let manager = ConfigManager::new(&db_path).expect("Failed to create ConfigManager");
        manager.save_pricing_profile(&profile).unwrap();
    }

    let manager = ConfigManager::new(&db_path).expect("Failed to reopen ConfigManager");
    let loaded = manager.resolve_profile(Some("gc-markup")).await.unwrap();
    assert_eq!(loaded, profile);
    assert_eq!(manager.list_pricing_profile_ids().unwrap(), vec!["gc-markup"]);

    // 默认方案 ID
    manager
        .set_config_value(config_keys::DEFAULT_PROFILE_ID, "gc-markup")
        .unwrap();
    let resolved = manager.resolve_profile(None).await.unwrap();
    assert_eq!(resolved.profile_id, "gc-markup");
}

#[tokio::test]
async fn test_missing_profile_and_corrupt_json() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let manager = ConfigManager::new(&db_path).expect("Failed to create ConfigManager");

    let err = manager.resolve_profile(Some("nope")).await.unwrap_err();
    assert!(matches!(err, ConfigError::ProfileNotFound(_)));

    manager
        .set_config_value("pricing_profile/broken", "{not json")
        .unwrap();
    let err = manager.resolve_profile(Some("broken")).await.unwrap_err();
    assert!(matches!(err, ConfigError::Serde(_)));
}

#[tokio::test]
async fn test_snapshot_round_trip_between_catalogs() {
    let (_src_file, src_path) = create_test_db().expect("Failed to create test db");
    let (_dst_file, dst_path) = create_test_db().expect("Failed to create test db");

    let source = ConfigManager::new(&src_path).unwrap();
    source.set_config_value(config_keys::REFERENCE_PRICE, "60").unwrap();
    source.save_pricing_profile(&PricingProfile::default()).unwrap();
    let snapshot = source.get_config_snapshot().unwrap();

    let target = ConfigManager::new(&dst_path).unwrap();
    let restored = target.restore_config_from_snapshot(&snapshot).unwrap();
    assert_eq!(restored, 2);

    let curve = target.get_pricing_curve().await.unwrap();
    assert_eq!(curve.reference_price, 60.0);
    assert_eq!(
        target.load_pricing_profile("default").unwrap(),
        Some(PricingProfile::default())
    );
}
