use crate::domain::rates::{LaborRates, MaterialRates, PressSheetConfig, PricingCurveConfig};
use crate::domain::results::FullComputation;
use crate::domain::sign::SignSpec;
use crate::engine::error::EngineResult;
use crate::engine::pipeline::compute_full;
use serde::{Deserialize, Serialize};

/// 报价参数方案（持久化对象）
///
/// 存储位置：config_kv（scope_id='global'，key='pricing_profile/{profile_id}'）
/// 缺省的分节按目录默认值补齐；分节内字段必须完整。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingProfile {
    /// 方案 ID（用于选择/引用）
    pub profile_id: String,

    /// 显示名称
    pub title: String,

    /// 说明（可选）
    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub press: PressSheetConfig,

    #[serde(default)]
    pub rates: MaterialRates,

    #[serde(default)]
    pub labor: LaborRates,

    #[serde(default)]
    pub curve: PricingCurveConfig,
}

impl Default for PricingProfile {
    fn default() -> Self {
        Self {
            profile_id: "default".to_string(),
            title: "默认报价参数".to_string(),
            description: None,
            press: PressSheetConfig::default(),
            rates: MaterialRates::default(),
            labor: LaborRates::default(),
            curve: PricingCurveConfig::default(),
        }
    }
}

impl PricingProfile {
    /// 用本方案计算单行
    pub fn compute(&self, spec: &SignSpec) -> EngineResult<FullComputation> {
        compute_full(spec, &self.press, &self.rates, &self.labor, &self.curve)
    }

    /// 校验全部分节
    pub fn validate(&self) -> EngineResult<()> {
        self.press.validate()?;
        self.rates.validate()?;
        self.labor.validate()?;
        self.curve.validate()
    }
}
