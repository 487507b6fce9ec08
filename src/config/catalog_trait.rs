// ==========================================
// 标牌报价估算引擎 - 参数目录读取 Trait
// ==========================================
// 职责: 定义 API 层所需的参数读取接口（不包含实现）
// 实现者: ConfigManager（config_kv 表）、StaticCatalog（内存）
// 红线: 不包含配置写入、不包含计算逻辑
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::config::pricing_profile::PricingProfile;
use crate::domain::rates::{LaborRates, MaterialRates, PressSheetConfig, PricingCurveConfig};
use async_trait::async_trait;

/// 全局参数组装出的方案 ID
pub const GLOBAL_PROFILE_ID: &str = "global";

// ==========================================
// PricingCatalog Trait
// ==========================================
#[async_trait]
pub trait PricingCatalog: Send + Sync {
    // ===== 全局分节参数 =====

    /// 获取压板/大板几何
    async fn get_press_sheet_config(&self) -> ConfigResult<PressSheetConfig>;

    /// 获取物料费率
    async fn get_material_rates(&self) -> ConfigResult<MaterialRates>;

    /// 获取人工费率
    async fn get_labor_rates(&self) -> ConfigResult<LaborRates>;

    /// 获取价格曲线
    async fn get_pricing_curve(&self) -> ConfigResult<PricingCurveConfig>;

    // ===== 命名方案 =====

    /// 按 ID 读取命名方案
    ///
    /// # 返回
    /// - Some(profile): 方案存在
    /// - None: 方案不存在
    async fn get_pricing_profile(&self, profile_id: &str) -> ConfigResult<Option<PricingProfile>>;

    /// 默认方案 ID（未指定方案时使用）
    ///
    /// # 默认值
    /// - None（使用全局分节参数）
    async fn get_default_profile_id(&self) -> ConfigResult<Option<String>> {
        Ok(None)
    }

    /// 由全局分节参数组装方案
    async fn get_global_profile(&self) -> ConfigResult<PricingProfile> {
        Ok(PricingProfile {
            profile_id: GLOBAL_PROFILE_ID.to_string(),
            title: "全局参数".to_string(),
            description: None,
            press: self.get_press_sheet_config().await?,
            rates: self.get_material_rates().await?,
            labor: self.get_labor_rates().await?,
            curve: self.get_pricing_curve().await?,
        })
    }

    /// 解析本次计算使用的方案
    ///
    /// 顺序: 显式 ID → 默认方案 ID → 全局分节参数
    async fn resolve_profile(&self, profile_id: Option<&str>) -> ConfigResult<PricingProfile> {
        let requested = match profile_id.map(str::trim).filter(|id| !id.is_empty()) {
            Some(id) => Some(id.to_string()),
            None => self.get_default_profile_id().await?,
        };

        match requested {
            Some(id) if id == GLOBAL_PROFILE_ID => self.get_global_profile().await,
            Some(id) => self
                .get_pricing_profile(&id)
                .await?
                .ok_or(ConfigError::ProfileNotFound(id)),
            None => self.get_global_profile().await,
        }
    }
}
