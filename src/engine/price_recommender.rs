// ==========================================
// 标牌报价估算引擎 - 售价推荐引擎
// ==========================================
// 职责: 成本底价与尺寸曲线价取高，按步长取整
// 红线: 售价对面积单调不减（固定成本），对成本单调不减（固定面积）
// ==========================================

use crate::domain::rates::PricingCurveConfig;
use crate::domain::results::PriceResult;
use crate::domain::types::PricingBasis;
use crate::engine::error::{EngineError, EngineResult};
use tracing::{debug, instrument};

// ==========================================
// PriceRecommender - 售价推荐引擎
// ==========================================
#[derive(Debug, Default, Clone, Copy)]
pub struct PriceRecommender {
    // 无状态引擎
}

impl PriceRecommender {
    pub fn new() -> Self {
        Self {}
    }

    /// 推荐售价
    ///
    /// 1) cost_floor = unit_cost × min_margin_multiplier
    /// 2) size_price = max(尺寸曲线价, floor_price)
    /// 3) unit_price = round(max(cost_floor, size_price) / 步长) × 步长
    ///
    /// 两者相等时记为尺寸曲线价。
    #[instrument(skip(self, curve))]
    pub fn price(
        &self,
        unit_cost: f64,
        area_sqin: f64,
        curve: &PricingCurveConfig,
    ) -> EngineResult<PriceResult> {
        if !unit_cost.is_finite() || unit_cost < 0.0 {
            return Err(EngineError::InvalidCost(unit_cost));
        }
        if !area_sqin.is_finite() || area_sqin <= 0.0 {
            return Err(EngineError::invalid_dimension("area_sqin", area_sqin));
        }
        curve.validate()?;

        let unit_cost_floor = unit_cost * curve.min_margin_multiplier;
        let size_curve_price = Self::size_curve_price(area_sqin, curve);

        let (raw_price, basis) = if unit_cost_floor > size_curve_price {
            (unit_cost_floor, PricingBasis::CostFloor)
        } else {
            (size_curve_price, PricingBasis::SizeCurve)
        };
        let unit_price = round_to_increment(raw_price, curve.rounding_increment);

        debug!(unit_cost_floor, size_curve_price, unit_price, basis = %basis, "售价推荐完成");

        Ok(PriceResult {
            unit_price,
            unit_cost_floor,
            size_curve_price,
            basis,
        })
    }

    /// 尺寸参考价（含最低价）
    ///
    /// - 面积 ≤ 参考面积: 按比例线性下调
    /// - 面积 > 参考面积: ref × (1 + (ratio − 1) × growth)，增速由 growth 控制
    pub fn size_curve_price(area_sqin: f64, curve: &PricingCurveConfig) -> f64 {
        let ratio = area_sqin / curve.reference_area_sqin;
        let raw = if area_sqin <= curve.reference_area_sqin {
            curve.reference_price * ratio
        } else {
            curve.reference_price * (1.0 + (ratio - 1.0) * curve.growth_factor)
        };
        raw.max(curve.floor_price)
    }
}

/// 按步长取整，恰好落在中点时取偶数倍（银行家舍入）
pub fn round_to_increment(value: f64, increment: f64) -> f64 {
    (value / increment).round_ties_even() * increment
}
