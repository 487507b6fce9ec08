// ==========================================
// 标牌报价估算引擎 - 计算管线编排
// ==========================================
// 职责: 批次优化 → 物料用量 → 成本汇总 → 售价推荐
// 入口: compute_full（每个标牌类型/报价行调用一次）
// 红线: 先校验全部输入，首个失败直接返回，不产生部分结果
// ==========================================

use crate::domain::estimate::LineEconomics;
use crate::domain::rates::{LaborRates, MaterialRates, PressSheetConfig, PricingCurveConfig};
use crate::domain::results::FullComputation;
use crate::domain::sign::SignSpec;
use crate::engine::batch_optimizer::BatchOptimizer;
use crate::engine::cost_aggregator::CostAggregator;
use crate::engine::error::EngineResult;
use crate::engine::material_usage::MaterialUsageCalculator;
use crate::engine::price_recommender::PriceRecommender;
use tracing::{info, instrument};

/// 单行完整计算
///
/// 校验顺序: 规格 → 压板 → 物料费率 → 人工费率 → 价格曲线
#[instrument(skip_all, fields(
    dimensions = %spec.dimensions_display(),
    quantity = spec.quantity
))]
pub fn compute_full(
    spec: &SignSpec,
    press: &PressSheetConfig,
    rates: &MaterialRates,
    labor: &LaborRates,
    curve: &PricingCurveConfig,
) -> EngineResult<FullComputation> {
    spec.validate()?;
    press.validate()?;
    rates.validate()?;
    labor.validate()?;
    curve.validate()?;

    let batch = BatchOptimizer::new().optimize(spec, press)?;
    let usage = MaterialUsageCalculator::new().usage(&batch, spec, press)?;
    let cost = CostAggregator::new(press).cost(&batch, &usage, rates, labor)?;
    let price = PriceRecommender::new().price(cost.total_unit_cost, spec.area_sqin(), curve)?;

    info!(
        molds_needed = batch.molds_needed,
        waste_percent = usage.waste_percent,
        total_unit_cost = cost.total_unit_cost,
        unit_price = price.unit_price,
        basis = %price.basis,
        "报价行计算完成"
    );

    Ok(FullComputation {
        batch,
        usage,
        cost,
        price,
    })
}

impl LineEconomics {
    /// 由完整计算结果派生行级经济指标
    pub fn from_computation(result: &FullComputation, labor: &LaborRates) -> Self {
        let qty = result.batch.quantity as f64;
        let unit_price = result.price.unit_price;
        let total_unit_cost = result.cost.total_unit_cost;

        let profit_margin_pct = if unit_price > 0.0 {
            (unit_price - total_unit_cost) / unit_price * 100.0
        } else {
            0.0
        };

        Self {
            line_total: qty * unit_price,
            material_extended: qty * result.cost.material_unit_cost,
            labor_extended: qty * result.cost.labor_unit_cost,
            labor_hours: result.batch.molds_needed as f64 * labor.hours_per_mold(),
            breakeven_price: total_unit_cost,
            profit_margin_pct,
        }
    }
}
