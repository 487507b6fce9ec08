// ==========================================
// 标牌报价估算引擎 - 配置管理器
// ==========================================
// 职责: 参数目录加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// 约定: 标量参数按 config_keys 存放；命名方案存为 JSON
//       （key = pricing_profile/{profile_id}）
// ==========================================

use crate::config::catalog_trait::PricingCatalog;
use crate::config::error::{ConfigError, ConfigResult};
use crate::config::pricing_profile::PricingProfile;
use crate::db::{ensure_catalog_schema, open_sqlite_connection, read_schema_version, CURRENT_SCHEMA_VERSION};
use crate::domain::rates::{
    LaborRatePair, LaborRates, LayerRate, MaterialRates, PressSheetConfig, PricingCurveConfig,
};
use crate::domain::types::{CostAllocation, SubstrateKind};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection};
use std::collections::BTreeMap;
use std::fmt::Display;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, warn};

/// 命名方案在 config_kv 中的 key 前缀
const PROFILE_KEY_PREFIX: &str = "pricing_profile/";

/// 快照元信息 key 前缀（恢复时跳过）
const SNAPSHOT_META_PREFIX: &str = "__meta_";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例（库文件不存在时自动创建）
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> ConfigResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Self::prepare(&conn)?;
        info!(db_path, "参数目录已打开");

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：会对传入连接再次应用统一 PRAGMA 并补齐表结构（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> ConfigResult<Self> {
        {
            let conn_guard = conn.lock().map_err(|e| ConfigError::Lock(e.to_string()))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
            Self::prepare(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    fn prepare(conn: &Connection) -> ConfigResult<()> {
        ensure_catalog_schema(conn)?;
        if let Some(version) = read_schema_version(conn)? {
            if version != CURRENT_SCHEMA_VERSION {
                warn!(
                    found = version,
                    expected = CURRENT_SCHEMA_VERSION,
                    "参数目录 schema_version 与当前版本不一致"
                );
            }
        }
        Ok(())
    }

    fn lock(&self) -> ConfigResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| ConfigError::Lock(e.to_string()))
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        let conn = self.lock()?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 写入配置值（UPSERT）
    pub fn set_config_value(&self, key: &str, value: &str) -> ConfigResult<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        debug!(config_key = key, "配置已写入");
        Ok(())
    }

    /// 读取并解析配置值，缺失或格式错误时使用默认值
    fn get_parsed_or_default<T>(&self, key: &str, default: T) -> ConfigResult<T>
    where
        T: FromStr + Display,
        T::Err: Display,
    {
        let raw = match self.get_config_value(key)? {
            Some(v) => v,
            None => return Ok(default),
        };

        match raw.trim().parse::<T>() {
            Ok(v) => Ok(v),
            Err(e) => {
                warn!(
                    config_key = key,
                    raw_value = %raw,
                    default = %default,
                    error = %e,
                    "配置值格式错误，使用默认值"
                );
                Ok(default)
            }
        }
    }

    // ===== 命名方案 =====

    /// 保存命名方案（存在则覆盖）
    pub fn save_pricing_profile(&self, profile: &PricingProfile) -> ConfigResult<()> {
        let id = profile.profile_id.trim();
        if id.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "profile_id".to_string(),
                message: "方案 ID 不能为空".to_string(),
            });
        }
        profile.validate().map_err(|e| ConfigError::InvalidValue {
            key: format!("{}{}", PROFILE_KEY_PREFIX, id),
            message: e.to_string(),
        })?;

        let raw = serde_json::to_string(profile)?;
        self.set_config_value(&format!("{}{}", PROFILE_KEY_PREFIX, id), &raw)?;
        info!(profile_id = id, "报价参数方案已保存");
        Ok(())
    }

    /// 读取命名方案
    pub fn load_pricing_profile(&self, profile_id: &str) -> ConfigResult<Option<PricingProfile>> {
        let id = profile_id.trim();
        if id.is_empty() {
            return Ok(None);
        }

        let raw = match self.get_config_value(&format!("{}{}", PROFILE_KEY_PREFIX, id))? {
            Some(v) => v,
            None => return Ok(None),
        };

        let profile: PricingProfile = serde_json::from_str(&raw)?;
        Ok(Some(profile))
    }

    /// 列出全部命名方案 ID（按字典序）
    pub fn list_pricing_profile_ids(&self) -> ConfigResult<Vec<String>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT key FROM config_kv WHERE scope_id = 'global' AND key LIKE ?1 ORDER BY key",
        )?;
        let rows = stmt.query_map(params![format!("{}%", PROFILE_KEY_PREFIX)], |row| {
            row.get::<_, String>(0)
        })?;

        let mut ids = Vec::new();
        for row in rows {
            let key = row?;
            if let Some(id) = key.strip_prefix(PROFILE_KEY_PREFIX) {
                ids.push(id.to_string());
            }
        }
        Ok(ids)
    }

    // ===== 快照 =====

    /// 获取所有配置的快照（JSON格式）
    ///
    /// # 用途
    /// - 报价归档时记录当时的参数
    /// - 参数回滚
    pub fn get_config_snapshot(&self) -> ConfigResult<String> {
        let conn = self.lock()?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;

        let mut config_map: BTreeMap<String, String> = BTreeMap::new();
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }
        config_map.insert(
            format!("{}exported_at", SNAPSHOT_META_PREFIX),
            Utc::now().to_rfc3339(),
        );

        Ok(serde_json::to_string(&config_map)?)
    }

    /// 从配置快照恢复配置
    ///
    /// # 返回
    /// - Ok(usize): 恢复的配置项数量
    ///
    /// # 注意
    /// - 此方法会覆盖同名的 global 配置
    /// - 元信息（__meta_ 前缀）不回写
    pub fn restore_config_from_snapshot(&self, snapshot_json: &str) -> ConfigResult<usize> {
        let config_map: BTreeMap<String, String> = serde_json::from_str(snapshot_json)?;

        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        let mut count = 0;
        for (key, value) in config_map.iter() {
            if key.starts_with(SNAPSHOT_META_PREFIX) {
                continue;
            }
            count += tx.execute(
                "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
                 ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
                params![key, value],
            )?;
        }

        tx.commit()?;
        info!(restored = count, "配置快照已恢复");

        Ok(count)
    }
}

// ==========================================
// PricingCatalog Trait 实现
// ==========================================
#[async_trait]
impl PricingCatalog for ConfigManager {
    async fn get_press_sheet_config(&self) -> ConfigResult<PressSheetConfig> {
        let d = PressSheetConfig::default();
        Ok(PressSheetConfig {
            width_in: self.get_parsed_or_default(config_keys::PRESS_WIDTH_IN, d.width_in)?,
            height_in: self.get_parsed_or_default(config_keys::PRESS_HEIGHT_IN, d.height_in)?,
            molds_per_master_sheet: self
                .get_parsed_or_default(config_keys::MOLDS_PER_MASTER_SHEET, d.molds_per_master_sheet)?,
            master_width_in: self
                .get_parsed_or_default(config_keys::MASTER_WIDTH_IN, d.master_width_in)?,
            master_height_in: self
                .get_parsed_or_default(config_keys::MASTER_HEIGHT_IN, d.master_height_in)?,
            window_sheet_width_in: self
                .get_parsed_or_default(config_keys::WINDOW_SHEET_WIDTH_IN, d.window_sheet_width_in)?,
            window_sheet_height_in: self
                .get_parsed_or_default(config_keys::WINDOW_SHEET_HEIGHT_IN, d.window_sheet_height_in)?,
        })
    }

    async fn get_material_rates(&self) -> ConfigResult<MaterialRates> {
        let kind = self.get_parsed_or_default(config_keys::SUBSTRATE_KIND, SubstrateKind::default())?;
        let d = MaterialRates::default().with_substrate(kind);

        let base = self.get_parsed_or_default(
            config_keys::BASE_SHEET_COST,
            d.base_sheet.per_sheet(0.0),
        )?;
        let substrate =
            self.get_parsed_or_default(config_keys::SUBSTRATE_COST, d.substrate.per_sheet(0.0))?;
        let window = self.get_parsed_or_default(
            config_keys::WINDOW_INSERT_COST,
            d.window_insert.per_sheet(0.0),
        )?;

        Ok(MaterialRates {
            base_sheet: LayerRate::PerSheet(base),
            substrate: LayerRate::PerSheet(substrate),
            window_insert: LayerRate::PerSheet(window),
            ink_per_sign: self.get_parsed_or_default(config_keys::INK_PER_SIGN, d.ink_per_sign)?,
            paint_per_sign: self.get_parsed_or_default(config_keys::PAINT_PER_SIGN, d.paint_per_sign)?,
            hotstamp_per_sign: self
                .get_parsed_or_default(config_keys::HOTSTAMP_PER_SIGN, d.hotstamp_per_sign)?,
            tape_per_mold: self.get_parsed_or_default(config_keys::TAPE_PER_MOLD, d.tape_per_mold)?,
            lube_per_mold: self.get_parsed_or_default(config_keys::LUBE_PER_MOLD, d.lube_per_mold)?,
            allocation: self.get_parsed_or_default(config_keys::COST_ALLOCATION, CostAllocation::default())?,
        })
    }

    async fn get_labor_rates(&self) -> ConfigResult<LaborRates> {
        let d = LaborRates::default();

        // 最好/最坏每模成本需成对配置
        let best = self.get_config_value(config_keys::LABOR_BEST_PER_MOLD)?;
        let worst = self.get_config_value(config_keys::LABOR_WORST_PER_MOLD)?;
        let rate_pair = match (best, worst) {
            (Some(_), Some(_)) => {
                let fallback = LaborRatePair::default();
                Some(LaborRatePair {
                    best_per_mold: self
                        .get_parsed_or_default(config_keys::LABOR_BEST_PER_MOLD, fallback.best_per_mold)?,
                    worst_per_mold: self
                        .get_parsed_or_default(config_keys::LABOR_WORST_PER_MOLD, fallback.worst_per_mold)?,
                })
            }
            (None, None) => None,
            _ => {
                warn!("最好/最坏每模成本仅配置了一项，忽略");
                None
            }
        };

        Ok(LaborRates {
            minutes_per_mold: self.get_parsed_or_default(config_keys::MINUTES_PER_MOLD, d.minutes_per_mold)?,
            hourly_rate: self.get_parsed_or_default(config_keys::SHOP_HOURLY_RATE, d.hourly_rate)?,
            rate_pair,
            basis: self.get_parsed_or_default(config_keys::LABOR_BASIS, d.basis)?,
            overhead_pct: self.get_parsed_or_default(config_keys::OVERHEAD_PCT, d.overhead_pct)?,
        })
    }

    async fn get_pricing_curve(&self) -> ConfigResult<PricingCurveConfig> {
        let d = PricingCurveConfig::default();
        Ok(PricingCurveConfig {
            reference_area_sqin: self
                .get_parsed_or_default(config_keys::REFERENCE_AREA_SQIN, d.reference_area_sqin)?,
            reference_price: self.get_parsed_or_default(config_keys::REFERENCE_PRICE, d.reference_price)?,
            floor_price: self.get_parsed_or_default(config_keys::FLOOR_PRICE, d.floor_price)?,
            growth_factor: self.get_parsed_or_default(config_keys::GROWTH_FACTOR, d.growth_factor)?,
            rounding_increment: self
                .get_parsed_or_default(config_keys::ROUNDING_INCREMENT, d.rounding_increment)?,
            min_margin_multiplier: self
                .get_parsed_or_default(config_keys::MIN_MARGIN_MULTIPLIER, d.min_margin_multiplier)?,
        })
    }

    async fn get_pricing_profile(&self, profile_id: &str) -> ConfigResult<Option<PricingProfile>> {
        self.load_pricing_profile(profile_id)
    }

    async fn get_default_profile_id(&self) -> ConfigResult<Option<String>> {
        Ok(self
            .get_config_value(config_keys::DEFAULT_PROFILE_ID)?
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty()))
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 压板/大板几何
    pub const PRESS_WIDTH_IN: &str = "press_width_in";
    pub const PRESS_HEIGHT_IN: &str = "press_height_in";
    pub const MOLDS_PER_MASTER_SHEET: &str = "molds_per_master_sheet";
    pub const MASTER_WIDTH_IN: &str = "master_width_in";
    pub const MASTER_HEIGHT_IN: &str = "master_height_in";
    pub const WINDOW_SHEET_WIDTH_IN: &str = "window_sheet_width_in";
    pub const WINDOW_SHEET_HEIGHT_IN: &str = "window_sheet_height_in";

    // 物料费率（面板/基材每张大板，视窗每张视窗板）
    pub const BASE_SHEET_COST: &str = "base_sheet_cost";
    pub const SUBSTRATE_KIND: &str = "substrate_kind";
    pub const SUBSTRATE_COST: &str = "substrate_cost";
    pub const WINDOW_INSERT_COST: &str = "window_insert_cost";

    // 耗材
    pub const INK_PER_SIGN: &str = "ink_per_sign";
    pub const PAINT_PER_SIGN: &str = "paint_per_sign";
    pub const HOTSTAMP_PER_SIGN: &str = "hotstamp_per_sign";
    pub const TAPE_PER_MOLD: &str = "tape_per_mold";
    pub const LUBE_PER_MOLD: &str = "lube_per_mold";

    // 分摊口径（produced / ordered）
    pub const COST_ALLOCATION: &str = "cost_allocation";

    // 人工
    pub const MINUTES_PER_MOLD: &str = "minutes_per_mold";
    pub const SHOP_HOURLY_RATE: &str = "shop_hourly_rate";
    pub const LABOR_BASIS: &str = "labor_basis";
    pub const LABOR_BEST_PER_MOLD: &str = "labor_best_per_mold";
    pub const LABOR_WORST_PER_MOLD: &str = "labor_worst_per_mold";
    pub const OVERHEAD_PCT: &str = "overhead_pct";

    // 价格曲线
    pub const REFERENCE_AREA_SQIN: &str = "reference_area_sqin";
    pub const REFERENCE_PRICE: &str = "reference_price";
    pub const FLOOR_PRICE: &str = "floor_price";
    pub const GROWTH_FACTOR: &str = "growth_factor";
    pub const ROUNDING_INCREMENT: &str = "rounding_increment";
    pub const MIN_MARGIN_MULTIPLIER: &str = "min_margin_multiplier";

    // 方案选择
    pub const DEFAULT_PROFILE_ID: &str = "default_profile_id";
}
