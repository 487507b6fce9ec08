// ==========================================
// 标牌报价估算引擎 - 领域类型定义
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 定价依据 (Pricing Basis)
// ==========================================
// 成本底价与尺寸曲线价取高者，记录胜出的一方
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PricingBasis {
    CostFloor, // 成本底价
    SizeCurve, // 尺寸曲线价
}

impl PricingBasis {
    pub fn as_str(&self) -> &'static str {
        match self {
            PricingBasis::CostFloor => "cost-floor",
            PricingBasis::SizeCurve => "size-curve",
        }
    }

    /// 本地化显示名称
    pub fn label(&self) -> String {
        match self {
            PricingBasis::CostFloor => crate::i18n::t("pricing.basis.cost_floor"),
            PricingBasis::SizeCurve => crate::i18n::t("pricing.basis.size_curve"),
        }
    }
}

impl fmt::Display for PricingBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 人工计价口径 (Labor Basis)
// ==========================================
// Standard: 模时 × 小时费率
// BestCase / WorstCase: 使用每模固定人工成本对
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LaborBasis {
    #[default]
    Standard,
    BestCase,
    WorstCase,
}

impl LaborBasis {
    pub fn as_str(&self) -> &'static str {
        match self {
            LaborBasis::Standard => "standard",
            LaborBasis::BestCase => "best_case",
            LaborBasis::WorstCase => "worst_case",
        }
    }

    pub fn label(&self) -> String {
        match self {
            LaborBasis::Standard => crate::i18n::t("labor.basis.standard"),
            LaborBasis::BestCase => crate::i18n::t("labor.basis.best_case"),
            LaborBasis::WorstCase => crate::i18n::t("labor.basis.worst_case"),
        }
    }
}

impl fmt::Display for LaborBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for LaborBasis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "standard" => Ok(LaborBasis::Standard),
            "best_case" | "best-case" | "best" => Ok(LaborBasis::BestCase),
            "worst_case" | "worst-case" | "worst" => Ok(LaborBasis::WorstCase),
            other => Err(format!("未知人工计价口径: {}", other)),
        }
    }
}

// ==========================================
// 成本分摊口径 (Cost Allocation)
// ==========================================
// Produced: 每块耗材按实际产出块数计，单位成本按产出块数分摊（含库存）
// Ordered: 每块耗材与分摊分母均按订购数量，库存成本由订购块数承担
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CostAllocation {
    #[default]
    Produced,
    Ordered,
}

impl CostAllocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            CostAllocation::Produced => "produced",
            CostAllocation::Ordered => "ordered",
        }
    }
}

impl fmt::Display for CostAllocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for CostAllocation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "produced" => Ok(CostAllocation::Produced),
            "ordered" => Ok(CostAllocation::Ordered),
            other => Err(format!("未知成本分摊口径: {}", other)),
        }
    }
}

// ==========================================
// 基材类型 (Substrate Kind)
// ==========================================
// 每张大板价格为目录默认值，可被 MaterialRates 覆写
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SubstrateKind {
    #[default]
    AbsEighth,          // ABS 1/8"
    AbsThreeSixteenth,  // ABS 3/16"
    AcrylicEighth,      // 亚克力 1/8"
}

impl SubstrateKind {
    /// 目录默认单张价格（美元/张）
    pub fn default_sheet_cost(&self) -> f64 {
        match self {
            SubstrateKind::AbsEighth => 80.0,
            SubstrateKind::AbsThreeSixteenth => 130.0,
            SubstrateKind::AcrylicEighth => 110.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SubstrateKind::AbsEighth => "abs_eighth",
            SubstrateKind::AbsThreeSixteenth => "abs_three_sixteenth",
            SubstrateKind::AcrylicEighth => "acrylic_eighth",
        }
    }
}

impl fmt::Display for SubstrateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SubstrateKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "abs_eighth" | "abs" | "abs_1/8" => Ok(SubstrateKind::AbsEighth),
            "abs_three_sixteenth" | "abs_3/16" => Ok(SubstrateKind::AbsThreeSixteenth),
            "acrylic_eighth" | "acrylic" | "acrylic_1/8" => Ok(SubstrateKind::AcrylicEighth),
            other => Err(format!("未知基材类型: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labor_basis_from_str() {
        assert_eq!("worst".parse::<LaborBasis>().unwrap(), LaborBasis::WorstCase);
        assert_eq!(" Best-Case ".parse::<LaborBasis>().unwrap(), LaborBasis::BestCase);
        assert_eq!("standard".parse::<LaborBasis>().unwrap(), LaborBasis::Standard);
        assert!("overtime".parse::<LaborBasis>().is_err());
    }

    #[test]
    fn test_cost_allocation_from_str() {
        assert_eq!("Ordered".parse::<CostAllocation>().unwrap(), CostAllocation::Ordered);
        assert_eq!(CostAllocation::default(), CostAllocation::Produced);
        assert!("stock".parse::<CostAllocation>().is_err());
    }

    #[test]
    fn test_substrate_defaults() {
        assert_eq!(SubstrateKind::AbsEighth.default_sheet_cost(), 80.0);
        assert_eq!(SubstrateKind::AbsThreeSixteenth.default_sheet_cost(), 130.0);
        assert_eq!(SubstrateKind::AcrylicEighth.default_sheet_cost(), 110.0);
        assert_eq!("acrylic".parse::<SubstrateKind>().unwrap(), SubstrateKind::AcrylicEighth);
    }

    #[test]
    fn test_pricing_basis_serde() {
        let json = serde_json::to_string(&PricingBasis::CostFloor).unwrap();
        assert_eq!(json, "\"cost-floor\"");
        let basis: PricingBasis = serde_json::from_str("\"size-curve\"").unwrap();
        assert_eq!(basis, PricingBasis::SizeCurve);
    }
}
