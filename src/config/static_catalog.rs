use crate::config::catalog_trait::PricingCatalog;
use crate::config::error::ConfigResult;
use crate::config::pricing_profile::PricingProfile;
use crate::domain::rates::{LaborRates, MaterialRates, PressSheetConfig, PricingCurveConfig};
use async_trait::async_trait;
use std::collections::HashMap;

/// 内存参数目录（测试与无数据库场景）
///
/// 全局分节参数取自 `global`，命名方案按 profile_id 存放。
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    global: PricingProfile,
    profiles: HashMap<String, PricingProfile>,
    default_profile_id: Option<String>,
}

impl StaticCatalog {
    pub fn new(global: PricingProfile) -> Self {
        Self {
            global,
            profiles: HashMap::new(),
            default_profile_id: None,
        }
    }

    pub fn with_profile(mut self, profile: PricingProfile) -> Self {
        self.profiles.insert(profile.profile_id.clone(), profile);
        self
    }

    pub fn with_default_profile(mut self, profile_id: impl Into<String>) -> Self {
        self.default_profile_id = Some(profile_id.into());
        self
    }
}

#[async_trait]
impl PricingCatalog for StaticCatalog {
    async fn get_press_sheet_config(&self) -> ConfigResult<PressSheetConfig> {
        Ok(self.global.press.clone())
    }

    async fn get_material_rates(&self) -> ConfigResult<MaterialRates> {
        Ok(self.global.rates.clone())
    }

    async fn get_labor_rates(&self) -> ConfigResult<LaborRates> {
        Ok(self.global.labor.clone())
    }

    async fn get_pricing_curve(&self) -> ConfigResult<PricingCurveConfig> {
        Ok(self.global.curve.clone())
    }

    async fn get_pricing_profile(&self, profile_id: &str) -> ConfigResult<Option<PricingProfile>> {
        Ok(self.profiles.get(profile_id).cloned())
    }

    async fn get_default_profile_id(&self) -> ConfigResult<Option<String>> {
        Ok(self.default_profile_id.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::catalog_trait::GLOBAL_PROFILE_ID;
    use crate::config::error::ConfigError;

    fn gc_profile() -> PricingProfile {
        PricingProfile {
            profile_id: "gc".to_string(),
            title: "GC".to_string(),
            curve: PricingCurveConfig {
                min_margin_multiplier: 2.4,
                ..PricingCurveConfig::default()
            },
            ..PricingProfile::default()
        }
    }

    #[tokio::test]
    async fn test_resolve_order() {
        let catalog = StaticCatalog::default().with_profile(gc_profile());

        let global = catalog.resolve_profile(None).await.unwrap();
        assert_eq!(global.profile_id, GLOBAL_PROFILE_ID);
        assert_eq!(global.curve, PricingCurveConfig::default());

        let gc = catalog.resolve_profile(Some("gc")).await.unwrap();
        assert_eq!(gc.curve.min_margin_multiplier, 2.4);

        let catalog = catalog.with_default_profile("gc");
        let resolved = catalog.resolve_profile(Some("  ")).await.unwrap();
        assert_eq!(resolved.profile_id, "gc");
    }

    #[tokio::test]
    async fn test_unknown_profile() {
        let catalog = StaticCatalog::default();
        let err = catalog.resolve_profile(Some("nope")).await.unwrap_err();
        assert!(matches!(err, ConfigError::ProfileNotFound(id) if id == "nope"));
    }
}
